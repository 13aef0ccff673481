use serde::{Deserialize, Serialize};

/// Classification of an annotated source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbeType {
	/// Assertion whose observed values are expected to be `true`.
	Assertion,
	/// Example declaration line (`<Example ... />`).
	Example,
	/// Probe whose example was removed or is not attached to any example.
	Orphan,
	/// Regular probe reporting observed values.
	Probe,
	/// Replacement probe substituting an expression.
	Replacement,
	/// Probe synthesized from the current editor selection.
	Selection,
	/// Any type this client does not know about.
	#[serde(other)]
	Unknown,
}

impl ProbeType {
	/// Returns the wire name of this probe type.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Assertion => "ASSERTION",
			Self::Example => "EXAMPLE",
			Self::Orphan => "ORPHAN",
			Self::Probe => "PROBE",
			Self::Replacement => "REPLACEMENT",
			Self::Selection => "SELECTION",
			Self::Unknown => "UNKNOWN",
		}
	}
}

impl std::fmt::Display for ProbeType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One evaluated expression outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedValue {
	/// Human-readable rendering (may embed an SVG payload).
	#[serde(default)]
	pub display_string: String,
	/// Failure message, if evaluation failed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Source text that produced this value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expression: Option<String>,
	#[serde(default)]
	pub interop_properties: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta_qualified_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta_simple_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub member_names: Option<Vec<String>>,
	/// Parallel to [`Self::member_names`].
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub member_display_strings: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub elements: Option<Vec<String>>,
}

impl ObservedValue {
	/// Creates a successful value with only a display string.
	pub fn display(display_string: impl Into<String>) -> Self {
		Self {
			display_string: display_string.into(),
			..Self::default()
		}
	}

	/// Creates a failed value.
	pub fn failed(error: impl Into<String>) -> Self {
		Self {
			error: Some(error.into()),
			..Self::default()
		}
	}

	/// Returns the error message when one is present and non-empty.
	pub fn error_message(&self) -> Option<&str> {
		self.error.as_deref().filter(|e| !e.is_empty())
	}

	/// Returns true if member names and member display strings line up.
	pub fn is_consistent(&self) -> bool {
		match (&self.member_names, &self.member_display_strings) {
			(Some(names), Some(displays)) => names.len() == displays.len(),
			(Some(names), None) => names.is_empty(),
			(None, _) => true,
		}
	}

	/// Iterates `(member name, member display string)` pairs.
	///
	/// Stops at the shorter of the two sequences when the value is inconsistent.
	pub fn member_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
		let names = self.member_names.as_deref().unwrap_or_default();
		let displays = self.member_display_strings.as_deref().unwrap_or_default();
		names.iter().zip(displays).map(|(n, d)| (n.as_str(), d.as_str()))
	}

	/// Returns true if this value stringifies to the literal truth value.
	pub fn is_true(&self) -> bool {
		self.display_string == "true"
	}
}

/// Observed values of one probe under one example, in occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleResult {
	pub example_name: String,
	#[serde(default)]
	pub observed_values: Vec<ObservedValue>,
}

impl ExampleResult {
	pub fn new(example_name: impl Into<String>, observed_values: Vec<ObservedValue>) -> Self {
		Self {
			example_name: example_name.into(),
			observed_values,
		}
	}

	/// Display strings of all observed values that rendered something.
	pub fn display_strings(&self) -> Vec<&str> {
		self.observed_values
			.iter()
			.map(|v| v.display_string.as_str())
			.filter(|s| !s.is_empty())
			.collect()
	}
}

/// One source line annotated for observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbstractProbe {
	pub probe_type: ProbeType,
	/// Zero-based line index, only stable within one result.
	pub line_index: u32,
	/// One entry per example that reached this line. Empty means never reached.
	#[serde(default)]
	pub examples: Vec<ExampleResult>,
}

impl AbstractProbe {
	pub fn new(probe_type: ProbeType, line_index: u32, examples: Vec<ExampleResult>) -> Self {
		Self {
			probe_type,
			line_index,
			examples,
		}
	}

	/// Returns true if no example reached this line.
	pub fn is_unreached(&self) -> bool {
		self.examples.is_empty()
	}

	/// Example names in sorted order.
	pub fn sorted_example_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.examples.iter().map(|e| e.example_name.clone()).collect();
		names.sort();
		names
	}

	/// Returns true if every observed value across every example is `true`.
	///
	/// Vacuously true when nothing was observed.
	pub fn all_observed_true(&self) -> bool {
		self.examples
			.iter()
			.flat_map(|e| &e.observed_values)
			.all(ObservedValue::is_true)
	}

	/// Looks up the results of a named example.
	pub fn example(&self, name: &str) -> Option<&ExampleResult> {
		self.examples.iter().find(|e| e.example_name == name)
	}

	/// 1-based line number for display.
	pub fn display_line(&self) -> u32 {
		self.line_index + 1
	}
}

/// Probes reported for one file. Unordered and possibly sparse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
	pub uri: String,
	#[serde(default)]
	pub language_id: String,
	#[serde(default)]
	pub probes: Vec<AbstractProbe>,
}

/// One complete analysis run across all files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
	#[serde(default)]
	pub files: Vec<FileResult>,
}

impl AnalysisResult {
	/// Looks up the result of one file.
	pub fn file(&self, uri: &str) -> Option<&FileResult> {
		self.files.iter().find(|f| f.uri == uri)
	}
}

/// Outcome of one analysis request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminationResult {
	#[serde(default)]
	pub time_to_run_millis: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<AnalysisResult>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl TerminationResult {
	/// Message used when the backend answered with nothing at all.
	pub const NO_RESULT: &'static str = "No result";

	/// Outcome synthesized for an absent backend answer.
	pub fn no_result() -> Self {
		Self::failed(Self::NO_RESULT)
	}

	/// Outcome carrying only an error message.
	pub fn failed(error: impl Into<String>) -> Self {
		Self {
			time_to_run_millis: 0,
			result: None,
			error: Some(error.into()),
		}
	}

	/// Successful outcome.
	pub fn succeeded(result: AnalysisResult, time_to_run_millis: u64) -> Self {
		Self {
			time_to_run_millis,
			result: Some(result),
			error: None,
		}
	}

	/// Returns the error message when one is present and non-empty.
	pub fn error_message(&self) -> Option<&str> {
		self.error.as_deref().filter(|e| !e.is_empty())
	}

	/// Returns true if neither a result nor an error is usable.
	pub fn is_empty(&self) -> bool {
		self.result.is_none() && self.error_message().is_none()
	}
}
