//! Process-lifetime cache of backend command availability.

use std::sync::atomic::{AtomicBool, Ordering};

use super::AnalysisBackend;

/// Result of a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityState {
	/// The command is exposed by the backend.
	Available,
	/// The command is missing (or the query failed).
	Missing {
		/// True only for the first missing report of this process.
		first_report: bool,
	},
}

/// Capability cache.
///
/// A capability that has been seen once is assumed never to disappear, so a
/// positive answer short-circuits every later check. A negative answer is
/// not cached: the next check queries again, but only the first negative
/// answer is flagged for reporting.
#[derive(Debug, Default)]
pub struct CapabilityCache {
	available: AtomicBool,
	reported_missing: AtomicBool,
}

impl CapabilityCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns true once the capability has been observed.
	pub fn is_known_available(&self) -> bool {
		self.available.load(Ordering::Acquire)
	}

	/// Checks whether `backend` exposes `command`.
	pub async fn check<B: AnalysisBackend + ?Sized>(&self, backend: &B, command: &str) -> CapabilityState {
		if self.is_known_available() {
			return CapabilityState::Available;
		}

		let present = match backend.commands().await {
			Ok(commands) => commands.iter().any(|c| c == command),
			Err(err) => {
				tracing::warn!(command, error = %err, "capability.query_failed");
				false
			}
		};

		if present {
			self.available.store(true, Ordering::Release);
			tracing::debug!(command, "capability.available");
			return CapabilityState::Available;
		}

		let first_report = !self.reported_missing.swap(true, Ordering::AcqRel);
		tracing::warn!(command, first_report, "capability.missing");
		CapabilityState::Missing { first_report }
	}
}
