use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::*;

#[tokio::test(start_paused = true)]
async fn test_replaced_timer_never_fires() {
	let debouncer = Debouncer::new(TaskClass::Background);
	let fired = Arc::new(AtomicUsize::new(0));

	let f = fired.clone();
	let first = debouncer.schedule(Duration::from_millis(500), move || async move {
		f.fetch_add(1, Ordering::SeqCst);
		"first"
	});
	tokio::time::sleep(Duration::from_millis(200)).await;

	let f = fired.clone();
	let second = debouncer.schedule(Duration::from_millis(500), move || async move {
		f.fetch_add(10, Ordering::SeqCst);
		"second"
	});

	assert_eq!(first.join().await, None);
	assert_eq!(second.join().await, Some("second"));
	assert_eq!(fired.load(Ordering::SeqCst), 10);
}

#[tokio::test(start_paused = true)]
async fn test_work_observes_state_at_expiry() {
	let debouncer = Debouncer::new(TaskClass::Background);
	let state = Arc::new(AtomicUsize::new(1));

	let s = state.clone();
	let task = debouncer.schedule(Duration::from_millis(300), move || async move { s.load(Ordering::SeqCst) });
	state.store(42, Ordering::SeqCst);

	assert_eq!(task.join().await, Some(42));
}

#[tokio::test(start_paused = true)]
async fn test_fire_now_cancels_pending_timer() {
	let debouncer = Debouncer::new(TaskClass::Interactive);
	let pending = debouncer.schedule(Duration::from_secs(1), || async { 1 });
	assert!(debouncer.is_pending());

	let immediate = debouncer.fire_now(|| async { 2 });
	assert_eq!(immediate.join().await, Some(2));
	assert_eq!(pending.join().await, None);
	assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_reports_waiting_timer_once() {
	let debouncer = Debouncer::new(TaskClass::Background);
	let task = debouncer.schedule(Duration::from_secs(1), || async {});
	assert!(debouncer.cancel());
	assert!(!debouncer.cancel());
	assert_eq!(task.join().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_generations_increase_per_slot() {
	let debouncer = Debouncer::new(TaskClass::Background);
	let a = debouncer.schedule(Duration::from_millis(10), || async {});
	let b = debouncer.schedule(Duration::from_millis(10), || async {});
	assert!(b.generation() > a.generation());
	b.join().await;
}
