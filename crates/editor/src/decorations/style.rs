//! Visual classification of probe lines.

use lively_primitives::{AbstractProbe, ProbeType};

use crate::config::DecorationColors;

/// Styling bucket of one decorated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
	AssertionPassed,
	AssertionFailed,
	Example,
	Probe,
	Orphan,
	Selection,
	/// Line never reached by any example in a final result.
	Unreached,
	/// Replacement probes and types this client does not know.
	Fallback,
}

impl DecorationKind {
	/// Classifies a probe. `unreached` overrides the probe type.
	pub fn classify(probe: &AbstractProbe, unreached: bool) -> Self {
		if unreached {
			return Self::Unreached;
		}
		match probe.probe_type {
			ProbeType::Assertion if probe.all_observed_true() => Self::AssertionPassed,
			ProbeType::Assertion => Self::AssertionFailed,
			ProbeType::Example => Self::Example,
			ProbeType::Probe => Self::Probe,
			ProbeType::Orphan => Self::Orphan,
			ProbeType::Selection => Self::Selection,
			ProbeType::Replacement | ProbeType::Unknown => {
				tracing::warn!(line = probe.line_index, probe_type = %probe.probe_type, "decorations.unknown_probe_type");
				Self::Fallback
			}
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AssertionPassed => "assertion-passed",
			Self::AssertionFailed => "assertion-failed",
			Self::Example => "example",
			Self::Probe => "probe",
			Self::Orphan => "orphan",
			Self::Selection => "selection",
			Self::Unreached => "unreached",
			Self::Fallback => "fallback",
		}
	}
}

/// Everything a host needs to create one decoration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationStyle {
	pub kind: DecorationKind,
	pub foreground: String,
	pub background: String,
	/// Gap between the line end and the annotation.
	pub margin: &'static str,
	pub italic: bool,
}

impl DecorationStyle {
	pub fn new(kind: DecorationKind, colors: &DecorationColors) -> Self {
		Self {
			kind,
			foreground: colors.foreground.clone(),
			background: colors.background(kind).to_string(),
			margin: "1rem",
			italic: matches!(kind, DecorationKind::Unreached | DecorationKind::Orphan),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::probe;

	#[test]
	fn test_assertion_classification_follows_truth() {
		let passed = probe(ProbeType::Assertion, 0, &[("a", &["true"]), ("b", &["true", "true"])]);
		let failed = probe(ProbeType::Assertion, 0, &[("a", &["true"]), ("b", &["false"])]);
		assert_eq!(DecorationKind::classify(&passed, false), DecorationKind::AssertionPassed);
		assert_eq!(DecorationKind::classify(&failed, false), DecorationKind::AssertionFailed);
	}

	#[test]
	fn test_unreached_overrides_type() {
		let example = probe(ProbeType::Example, 0, &[]);
		assert_eq!(DecorationKind::classify(&example, true), DecorationKind::Unreached);
		assert_eq!(DecorationKind::classify(&example, false), DecorationKind::Example);
	}

	#[test]
	fn test_replacement_and_unknown_fall_back() {
		assert_eq!(DecorationKind::classify(&probe(ProbeType::Replacement, 0, &[]), false), DecorationKind::Fallback);
		assert_eq!(DecorationKind::classify(&probe(ProbeType::Unknown, 0, &[]), false), DecorationKind::Fallback);
	}

	#[test]
	fn test_style_uses_configured_colors() {
		let colors = DecorationColors::default();
		let style = DecorationStyle::new(DecorationKind::AssertionFailed, &colors);
		assert_eq!(style.background, "#bd0000");
		assert_eq!(style.foreground, "white");
		assert!(!style.italic);
		assert!(DecorationStyle::new(DecorationKind::Unreached, &colors).italic);
	}
}
