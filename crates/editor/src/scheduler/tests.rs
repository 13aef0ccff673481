use std::sync::Arc;
use std::time::Duration;

use lively_lsp::{ANALYSIS_COMMAND, AnalysisClient, JsonValue};
use lively_primitives::TerminationResult;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::time::Instant;

use super::*;
use crate::testing::{FakeBackend, FakeReply, result};

const URI: &str = "file:///demo.js";

fn doc(version: i32) -> DocumentSnapshot {
	DocumentSnapshot::new(URI, version, format!("// <Example :name=\"v{version}\" />\nf()\n"))
}

fn ok_reply() -> FakeReply {
	FakeReply::termination(TerminationResult::succeeded(result(URI, vec![]), 7))
}

fn scheduler(backend: &Arc<FakeBackend>) -> (RequestScheduler<FakeBackend>, mpsc::UnboundedReceiver<SchedulerEvent>) {
	RequestScheduler::new(AnalysisClient::new(backend.clone()), SchedulerConfig::default())
}

fn analysis_calls(backend: &FakeBackend) -> Vec<Vec<JsonValue>> {
	backend
		.calls()
		.into_iter()
		.filter(|(command, _)| command == ANALYSIS_COMMAND)
		.map(|(_, arguments)| arguments)
		.collect()
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_edits_issues_one_request_for_latest_version() {
	let backend = Arc::new(FakeBackend::new(ok_reply()));
	let (scheduler, _rx) = scheduler(&backend);

	let mut pending = Vec::new();
	for version in 1..=5 {
		pending.push(scheduler.on_document_changed(doc(version)).unwrap());
		tokio::time::sleep(Duration::from_millis(100)).await;
	}
	let last = pending.pop().unwrap();
	for earlier in pending {
		assert_eq!(earlier.join().await, None);
	}

	let outcome = last.join().await.unwrap().unwrap();
	assert_eq!(outcome.request.version, 5);
	assert_eq!(outcome.request.trigger, Trigger::Edit);
	assert_eq!(analysis_calls(&backend), vec![vec![json!(URI)]]);
}

#[tokio::test(start_paused = true)]
async fn test_request_reads_state_at_expiry() {
	let backend = Arc::new(FakeBackend::new(ok_reply()));
	let (scheduler, _rx) = scheduler(&backend);
	let start = Instant::now();

	let first = scheduler.on_document_changed(doc(1)).unwrap();
	tokio::time::sleep(Duration::from_millis(700)).await;
	let second = scheduler.on_document_changed(doc(2)).unwrap();

	assert_eq!(first.join().await, None);
	let outcome = second.join().await.unwrap().unwrap();
	assert_eq!(outcome.request.version, 2);
	assert!(start.elapsed() >= Duration::from_millis(1450));
}

#[tokio::test(start_paused = true)]
async fn test_document_without_marker_is_ignored() {
	let backend = Arc::new(FakeBackend::new(ok_reply()));
	let (scheduler, _rx) = scheduler(&backend);

	assert!(scheduler.on_document_changed(DocumentSnapshot::new(URI, 1, "plain()")).is_none());
	assert!(scheduler.request_now(DocumentSnapshot::new(URI, 1, "plain()")).is_none());
	assert!(!scheduler.is_pending());
	assert!(backend.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pointer_selection_fires_immediately_with_scope() {
	let backend = Arc::new(FakeBackend::new(ok_reply()));
	let (scheduler, _rx) = scheduler(&backend);
	let start = Instant::now();

	let edit = scheduler.on_document_changed(doc(1)).unwrap();
	let pointer = scheduler.on_selection_changed(doc(1), 3, "x + 1", SelectionKind::Pointer).unwrap();

	let outcome = pointer.join().await.unwrap().unwrap();
	assert!(start.elapsed() < Duration::from_millis(750));
	assert_eq!(outcome.request.trigger, Trigger::Selection(SelectionKind::Pointer));
	assert_eq!(outcome.request.params, AnalysisParams::scoped(URI, 3, "x + 1"));
	assert_eq!(edit.join().await, None);
	assert_eq!(analysis_calls(&backend), vec![vec![json!(URI), json!(3), json!("x + 1")]]);
}

#[tokio::test(start_paused = true)]
async fn test_pointer_selection_keeps_scope_when_edit_follows_in_same_tick() {
	let backend = Arc::new(FakeBackend::new(ok_reply()));
	let (scheduler, _rx) = scheduler(&backend);

	let pointer = scheduler.on_selection_changed(doc(1), 3, "x + 1", SelectionKind::Pointer).unwrap();
	let edit = scheduler.on_document_changed(doc(2)).unwrap();

	let outcome = pointer.join().await.unwrap().unwrap();
	assert_eq!(outcome.request.trigger, Trigger::Selection(SelectionKind::Pointer));
	assert_eq!(outcome.request.version, 1);
	assert_eq!(outcome.request.params, AnalysisParams::scoped(URI, 3, "x + 1"));

	let outcome = edit.join().await.unwrap().unwrap();
	assert_eq!(outcome.request.trigger, Trigger::Edit);
	assert_eq!(outcome.request.version, 2);
	assert_eq!(analysis_calls(&backend), vec![vec![json!(URI), json!(3), json!("x + 1")], vec![json!(URI)]]);
}

#[tokio::test(start_paused = true)]
async fn test_request_now_is_not_rewritten_by_later_selection() {
	let backend = Arc::new(FakeBackend::new(ok_reply()));
	let (scheduler, _rx) = scheduler(&backend);

	let now = scheduler.request_now(doc(1)).unwrap();
	let selection = scheduler.on_selection_changed(doc(1), 0, "", SelectionKind::Other).unwrap();

	let outcome = now.join().await.unwrap().unwrap();
	assert_eq!(outcome.request.trigger, Trigger::Explicit);
	assert_eq!(outcome.request.params, AnalysisParams::file(URI));
	assert_eq!(selection.join().await.unwrap().unwrap().request.trigger, Trigger::Selection(SelectionKind::Other));
}

#[tokio::test(start_paused = true)]
async fn test_keyboard_selection_waits_for_longer_debounce() {
	let backend = Arc::new(FakeBackend::new(ok_reply()));
	let (scheduler, _rx) = scheduler(&backend);
	let start = Instant::now();

	let pending = scheduler.on_selection_changed(doc(1), 0, "f()", SelectionKind::Other).unwrap();
	tokio::time::sleep(Duration::from_millis(1000)).await;
	assert!(scheduler.is_pending());
	assert!(backend.calls().is_empty());

	let outcome = pending.join().await.unwrap().unwrap();
	assert!(start.elapsed() >= Duration::from_millis(1500));
	assert!(outcome.request.params.is_scoped());
}

#[tokio::test(start_paused = true)]
async fn test_missing_capability_reports_once() {
	let backend = Arc::new(FakeBackend::without_commands(ok_reply()));
	let (scheduler, mut rx) = scheduler(&backend);

	assert_eq!(scheduler.request_now(doc(1)).unwrap().join().await, Some(None));
	assert_eq!(scheduler.request_now(doc(2)).unwrap().join().await, Some(None));

	assert_eq!(rx.try_recv().ok(), Some(SchedulerEvent::CapabilityMissing));
	assert!(rx.try_recv().is_err());
	assert!(backend.calls().is_empty());
	assert_eq!(scheduler.current_generation(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_missing_capability_with_closed_receiver_is_quiet() {
	let backend = Arc::new(FakeBackend::without_commands(ok_reply()));
	let (scheduler, rx) = scheduler(&backend);
	drop(rx);

	assert_eq!(scheduler.request_now(doc(1)).unwrap().join().await, Some(None));
	assert_eq!(scheduler.current_generation(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_absent_answer_becomes_no_result() {
	let backend = Arc::new(FakeBackend::new(FakeReply::Nothing));
	let (scheduler, mut rx) = scheduler(&backend);

	let outcome = scheduler.request_now(doc(1)).unwrap().join().await.unwrap().unwrap();
	assert_eq!(outcome.termination, TerminationResult::no_result());
	assert_eq!(rx.try_recv().ok(), Some(SchedulerEvent::Completed(outcome)));
}

#[tokio::test(start_paused = true)]
async fn test_backend_error_becomes_failed_termination() {
	let backend = Arc::new(FakeBackend::new(FakeReply::Error("engine crashed".into())));
	let (scheduler, _rx) = scheduler(&backend);

	let outcome = scheduler.request_now(doc(1)).unwrap().join().await.unwrap().unwrap();
	assert_eq!(outcome.termination.error_message(), Some("backend error: engine crashed"));
	assert!(outcome.termination.result.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_disabling_drops_pending_timer_and_ignores_events() {
	let backend = Arc::new(FakeBackend::new(ok_reply()));
	let (scheduler, _rx) = scheduler(&backend);

	let pending = scheduler.on_document_changed(doc(1)).unwrap();
	scheduler.set_enabled(false);
	assert_eq!(pending.join().await, None);
	assert!(scheduler.on_document_changed(doc(2)).is_none());
	assert!(scheduler.on_selection_changed(doc(2), 0, "f()", SelectionKind::Pointer).is_none());
	assert!(backend.calls().is_empty());

	scheduler.set_enabled(true);
	assert!(scheduler.request_now(doc(3)).unwrap().join().await.flatten().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_requests_complete_in_arrival_order() {
	let backend = Arc::new(FakeBackend::new(ok_reply()));
	backend.push_delay(Duration::from_millis(500));
	backend.push_delay(Duration::from_millis(10));
	let (scheduler, mut rx) = scheduler(&backend);

	let slow = scheduler.request_now(doc(1)).unwrap();
	tokio::task::yield_now().await;
	let fast = scheduler.request_now(doc(2)).unwrap();

	let fast = fast.join().await.unwrap().unwrap();
	let slow = slow.join().await.unwrap().unwrap();
	assert!(slow.generation() < fast.generation());

	let order: Vec<u64> = std::iter::from_fn(|| rx.try_recv().ok())
		.filter_map(|event| match event {
			SchedulerEvent::Completed(outcome) => Some(outcome.generation()),
			SchedulerEvent::CapabilityMissing => None,
		})
		.collect();
	assert_eq!(order, vec![fast.generation(), slow.generation()]);
}
