use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic generation clock for issued requests.
///
/// Clones share the same counter.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a new clock; the first generation handed out is 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Returns the most recently issued generation (0 if none).
	pub fn current(&self) -> u64 {
		self.next.load(Ordering::Acquire)
	}
}

/// Generation-scoped cancellation token for one scheduled slot.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	pub fn new(generation: u64) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	pub const fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generation_clock_is_monotonic_and_shared() {
		let clock = GenerationClock::new();
		let shared = clock.clone();
		assert_eq!(clock.current(), 0);
		assert_eq!(clock.next(), 1);
		assert_eq!(shared.next(), 2);
		assert_eq!(clock.current(), 2);
	}

	#[test]
	fn test_generation_token_cancel() {
		let token = GenerationToken::new(7);
		let copy = token.clone();
		assert_eq!(token.generation(), 7);
		assert!(!copy.is_cancelled());
		token.cancel();
		assert!(copy.is_cancelled());
	}
}
