//! Single-slot debounce timer.
//!
//! A [`Debouncer`] owns at most one pending delayed task. Scheduling a new
//! one cancels the previous slot first, so two timers can never race. Once a
//! timer has fired, its work runs to completion; cancellation only affects
//! the waiting phase.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::{GenerationClock, GenerationToken, TaskClass, spawn};

#[derive(Debug)]
struct Slot {
	token: GenerationToken,
	fired: Arc<AtomicBool>,
}

impl Slot {
	fn is_waiting(&self) -> bool {
		!self.token.is_cancelled() && !self.fired.load(Ordering::Acquire)
	}
}

/// Cancelable delayed task handle returned by [`Debouncer`].
///
/// Resolves to `None` if the timer was canceled before firing.
#[derive(Debug)]
pub struct DelayedTask<T> {
	generation: u64,
	handle: JoinHandle<Option<T>>,
}

impl<T> DelayedTask<T> {
	/// Debounce generation of this slot.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_finished(&self) -> bool {
		self.handle.is_finished()
	}

	/// Waits for the task. Canceled timers and panicked work yield `None`.
	pub async fn join(self) -> Option<T> {
		match self.handle.await {
			Ok(output) => output,
			Err(err) => {
				tracing::warn!(generation = self.generation, error = %err, "debounce.join_failed");
				None
			}
		}
	}
}

/// Debounce timer with exactly one replaceable slot.
#[derive(Debug)]
pub struct Debouncer {
	class: TaskClass,
	clock: GenerationClock,
	slot: Mutex<Option<Slot>>,
}

impl Debouncer {
	pub fn new(class: TaskClass) -> Self {
		Self {
			class,
			clock: GenerationClock::new(),
			slot: Mutex::new(None),
		}
	}

	/// Replaces any pending timer with one that runs `work` after `delay`.
	///
	/// `work` is only invoked at expiry, so it observes state as of expiry.
	pub fn schedule<F, Fut>(&self, delay: Duration, work: F) -> DelayedTask<Fut::Output>
	where
		F: FnOnce() -> Fut + Send + 'static,
		Fut: Future + Send + 'static,
		Fut::Output: Send + 'static,
	{
		self.spawn_slot(Some(delay), work)
	}

	/// Cancels any pending timer and runs `work` immediately.
	pub fn fire_now<F, Fut>(&self, work: F) -> DelayedTask<Fut::Output>
	where
		F: FnOnce() -> Fut + Send + 'static,
		Fut: Future + Send + 'static,
		Fut::Output: Send + 'static,
	{
		self.spawn_slot(None, work)
	}

	/// Cancels the pending timer. Returns true if one was still waiting.
	pub fn cancel(&self) -> bool {
		let Some(slot) = self.slot.lock().take() else {
			return false;
		};
		let was_waiting = slot.is_waiting();
		slot.token.cancel();
		was_waiting
	}

	/// Returns true if a timer is waiting to fire.
	pub fn is_pending(&self) -> bool {
		self.slot.lock().as_ref().is_some_and(Slot::is_waiting)
	}

	fn spawn_slot<F, Fut>(&self, delay: Option<Duration>, work: F) -> DelayedTask<Fut::Output>
	where
		F: FnOnce() -> Fut + Send + 'static,
		Fut: Future + Send + 'static,
		Fut::Output: Send + 'static,
	{
		let generation = self.clock.next();
		let token = GenerationToken::new(generation);
		let fired = Arc::new(AtomicBool::new(false));

		{
			let mut slot = self.slot.lock();
			if let Some(previous) = slot.take() {
				if previous.is_waiting() {
					tracing::trace!(replaced = previous.token.generation(), generation, "debounce.replace");
				}
				previous.token.cancel();
			}
			*slot = Some(Slot {
				token: token.clone(),
				fired: fired.clone(),
			});
		}

		let class = self.class;
		let handle = spawn(class, async move {
			if let Some(delay) = delay {
				tokio::select! {
					biased;
					_ = token.cancelled() => {
						tracing::trace!(generation, "debounce.cancelled");
						return None;
					}
					_ = tokio::time::sleep(delay) => {}
				}
			}
			fired.store(true, Ordering::Release);
			tracing::trace!(generation, worker_class = class.as_str(), "debounce.fire");
			Some(work().await)
		});

		DelayedTask { generation, handle }
	}
}

#[cfg(test)]
mod tests;
