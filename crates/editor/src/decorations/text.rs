//! Inline annotation text rendered after a decorated line.

use lively_primitives::{AbstractProbe, ExampleResult, ObservedValue, ProbeType};

/// Padding around annotation text.
const PAD: char = '\u{202F}';

const SEPARATOR: &str = " | ";

/// Annotation text for one probe line.
pub fn annotation_text(probe: &AbstractProbe, unreached: bool) -> String {
	let body = if unreached {
		"not reached".to_string()
	} else {
		match probe.probe_type {
			ProbeType::Example => join(probe.examples.iter().filter_map(|e| e.observed_values.first().map(value_text))),
			ProbeType::Assertion => join(probe.examples.iter().map(assertion_text)),
			_ => join(probe.examples.iter().map(example_text)),
		}
	};
	format!("{PAD}{body}{PAD}")
}

fn join(parts: impl Iterator<Item = String>) -> String {
	parts.collect::<Vec<_>>().join(SEPARATOR)
}

fn assertion_text(example: &ExampleResult) -> String {
	let holds = example.observed_values.iter().all(ObservedValue::is_true);
	format!("{} {}", example.example_name, if holds { '✓' } else { '✗' })
}

fn example_text(example: &ExampleResult) -> String {
	let values: Vec<String> = example.observed_values.iter().map(value_text).collect();
	format!("{}: {}", example.example_name, values.join(", "))
}

fn value_text(value: &ObservedValue) -> String {
	if let Some(error) = value.error_message() {
		return format!("error: {error}");
	}
	if value.display_string.trim_start().starts_with("<svg") {
		return "[image]".to_string();
	}
	value.display_string.clone()
}
