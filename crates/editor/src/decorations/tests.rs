use lively_primitives::{AnalysisResult, AnalysisSnapshot, ProbeType};
use pretty_assertions::assert_eq;

use super::*;
use crate::testing::{RecordingHost, probe, result};

const URI: &str = "file:///demo.js";

fn reconciler() -> DecorationReconciler<RecordingHost> {
	DecorationReconciler::new(RecordingHost::default(), DecorationColors::default())
}

fn snapshot(lines: &[u32]) -> AnalysisSnapshot {
	AnalysisSnapshot::new(result(URI, lines.iter().map(|&line| probe(ProbeType::Probe, line, &[("a", &["1"])])).collect()))
}

#[test]
fn test_identical_probe_reuses_handle() {
	let mut decorations = reconciler();
	let first = decorations.reconcile(URI, true, &probe(ProbeType::Probe, 4, &[("b", &["1"]), ("a", &["2"])]));
	let second = decorations.reconcile(URI, true, &probe(ProbeType::Probe, 4, &[("a", &["99"]), ("b", &["3"])]));

	assert_eq!(first, second);
	assert!(decorations.host().disposed.is_empty());
	assert_eq!(decorations.host().created.len(), 1);
}

#[test]
fn test_changed_example_set_replaces_handle() {
	let mut decorations = reconciler();
	let first = decorations.reconcile(URI, true, &probe(ProbeType::Probe, 4, &[("a", &["1"])]));
	let second = decorations.reconcile(URI, true, &probe(ProbeType::Probe, 4, &[("a", &["1"]), ("b", &["2"])]));

	assert_ne!(first, second);
	assert_eq!(decorations.host().disposed, vec![first]);
	assert_eq!(decorations.host().created.len(), 2);
	assert_eq!(decorations.handle_at(URI, 4), Some(&second));
}

#[test]
fn test_changed_assertion_truth_replaces_handle() {
	let mut decorations = reconciler();
	let passing = decorations.reconcile(URI, true, &probe(ProbeType::Assertion, 1, &[("a", &["true"])]));
	let failing = decorations.reconcile(URI, true, &probe(ProbeType::Assertion, 1, &[("a", &["false"])]));

	assert_ne!(passing, failing);
	assert_eq!(decorations.host().disposed, vec![passing]);
	assert_eq!(
		decorations.host().created,
		vec![(passing, DecorationKind::AssertionPassed), (failing, DecorationKind::AssertionFailed)]
	);
}

#[test]
fn test_reached_status_change_replaces_handle() {
	let mut decorations = reconciler();
	let unreached = decorations.reconcile(URI, true, &probe(ProbeType::Probe, 2, &[]));
	let reached = decorations.reconcile(URI, true, &probe(ProbeType::Probe, 2, &[("a", &["1"])]));

	assert_ne!(unreached, reached);
	assert_eq!(decorations.host().created[0].1, DecorationKind::Unreached);
	assert_eq!(decorations.host().disposed, vec![unreached]);
}

#[test]
fn test_empty_examples_only_unreached_when_final() {
	let mut decorations = reconciler();
	decorations.reconcile(URI, false, &probe(ProbeType::Example, 0, &[]));
	assert_eq!(decorations.host().created[0].1, DecorationKind::Example);
	assert_eq!(decorations.identity_at(URI, 0).map(|i| i.unreached), Some(false));
}

#[test]
fn test_probe_type_change_replaces_handle() {
	let mut decorations = reconciler();
	let orphan = decorations.reconcile(URI, true, &probe(ProbeType::Orphan, 3, &[("a", &["1"])]));
	let probed = decorations.reconcile(URI, true, &probe(ProbeType::Probe, 3, &[("a", &["1"])]));
	assert_ne!(orphan, probed);
	assert_eq!(decorations.live_handles(), 1);
}

#[test]
fn test_clear_redundant_disposes_only_missing_lines() {
	let mut decorations = reconciler();
	decorations.apply_snapshot(&snapshot(&[2, 5, 9]), true);
	let line_5 = decorations.handle_at(URI, 5).copied();
	let line_9 = decorations.handle_at(URI, 9).copied();
	let line_2 = decorations.handle_at(URI, 2).copied().unwrap();

	let disposed = decorations.clear_redundant_decorations(&snapshot(&[5, 9]));

	assert_eq!(disposed, 1);
	assert_eq!(decorations.host().disposed, vec![line_2]);
	assert_eq!(decorations.handle_at(URI, 5).copied(), line_5);
	assert_eq!(decorations.handle_at(URI, 9).copied(), line_9);
	assert_eq!(decorations.lines(URI), vec![5, 9]);
}

#[test]
fn test_clear_redundant_drops_files_missing_from_result() {
	let mut decorations = reconciler();
	decorations.apply_snapshot(&snapshot(&[1, 2]), true);

	let disposed = decorations.clear_redundant_decorations(&AnalysisSnapshot::new(AnalysisResult::default()));
	assert_eq!(disposed, 2);
	assert_eq!(decorations.live_handles(), 0);
	assert!(decorations.lines(URI).is_empty());
}

#[test]
fn test_clear_all_is_idempotent() {
	let mut decorations = reconciler();
	decorations.apply_snapshot(&snapshot(&[0, 1, 2]), true);

	assert_eq!(decorations.clear_all_decorations(), 3);
	let disposed_after_first = decorations.host().disposed.len();
	assert_eq!(decorations.clear_all_decorations(), 0);
	assert_eq!(decorations.host().disposed.len(), disposed_after_first);
}

#[test]
fn test_apply_snapshot_reuses_unchanged_lines() {
	let mut decorations = reconciler();
	let first = decorations.apply_snapshot(&snapshot(&[2, 5]), true);
	assert_eq!(first.created, 2);

	let second = decorations.apply_snapshot(&snapshot(&[2, 5, 7]), true);
	assert_eq!(
		second,
		ReconcileStats {
			created: 1,
			reused: 2,
			disposed: 0,
			skipped_files: 0,
		}
	);
	assert!(decorations.host().disposed.is_empty());
}

#[test]
fn test_apply_snapshot_pushes_annotation_text() {
	let mut decorations = reconciler();
	decorations.apply_snapshot(&AnalysisSnapshot::new(result(URI, vec![probe(ProbeType::Probe, 3, &[("a", &["7"])])])), true);

	let (uri, handle, options) = decorations.host().set.last().cloned().unwrap();
	assert_eq!(uri, URI);
	assert_eq!(Some(&handle), decorations.handle_at(URI, 3));
	assert_eq!(options, vec![DecorationOptions {
		line: 3,
		text: "\u{202F}a: 7\u{202F}".into(),
	}]);
}

#[test]
fn test_invisible_files_are_skipped() {
	let mut decorations = reconciler();
	decorations.host_mut().hidden.insert(URI.to_string());

	let stats = decorations.apply_snapshot(&snapshot(&[1]), true);
	assert_eq!(stats.skipped_files, 1);
	assert_eq!(decorations.live_handles(), 0);
	assert!(decorations.host().created.is_empty());
}

#[test]
fn test_unknown_probe_type_gets_fallback_style() {
	let mut decorations = reconciler();
	decorations.reconcile(URI, true, &probe(ProbeType::Unknown, 0, &[("a", &["1"])]));
	assert_eq!(decorations.host().created[0].1, DecorationKind::Fallback);
}

#[test]
fn test_at_most_one_handle_per_line() {
	let mut decorations = reconciler();
	for round in 0..4 {
		let name = format!("ex{round}");
		decorations.reconcile(URI, true, &probe(ProbeType::Probe, 1, &[(name.as_str(), &["1"])]));
	}
	assert_eq!(decorations.live_handles(), 1);
	assert_eq!(decorations.host().disposed.len(), 3);
}
