//! Wire-level names and payloads shared with the analysis backend.

use lively_primitives::AnalysisResult;
use lsp_types::ExecuteCommandParams;
use lsp_types::notification::Notification;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Command executing one analysis run.
pub const ANALYSIS_COMMAND: &str = "babylonian_analysis";

/// Command evaluating a single expression in the context of a file.
pub const DISPLAY_EXPRESSION_COMMAND: &str = "display_expression";

/// Notification pushing an analysis result outside of a request.
#[derive(Debug)]
pub enum BabylonianAnalysisResult {}

impl Notification for BabylonianAnalysisResult {
	type Params = AnalysisResult;
	const METHOD: &'static str = "textDocument/babylonianAnalysisResult";
}

/// Untyped notification as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnyNotification {
	/// Method name.
	pub method: String,
	/// Raw params, `null` when absent.
	#[serde(default)]
	pub params: JsonValue,
}

impl AnyNotification {
	/// Builds a notification from a typed payload.
	pub fn new<N: Notification>(params: N::Params) -> crate::Result<Self> {
		Ok(Self {
			method: N::METHOD.to_owned(),
			params: serde_json::to_value(params)?,
		})
	}
}

/// Arguments of one [`ANALYSIS_COMMAND`] invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisParams {
	/// File URI to analyze.
	pub uri: String,
	/// Zero-based line of the selection scoping this request.
	pub line: Option<u32>,
	/// Selected text scoping this request.
	pub selected_text: Option<String>,
}

impl AnalysisParams {
	/// Unscoped analysis of a whole file.
	pub fn file(uri: impl Into<String>) -> Self {
		Self {
			uri: uri.into(),
			..Self::default()
		}
	}

	/// Analysis scoped to a selection.
	pub fn scoped(uri: impl Into<String>, line: u32, selected_text: impl Into<String>) -> Self {
		Self {
			uri: uri.into(),
			line: Some(line),
			selected_text: Some(selected_text.into()),
		}
	}

	/// Returns true if the request carries selection hints.
	pub fn is_scoped(&self) -> bool {
		self.line.is_some()
	}

	/// Positional command arguments: `[uri]` or `[uri, line, text]`.
	pub fn to_arguments(&self) -> Vec<JsonValue> {
		let mut arguments = vec![JsonValue::String(self.uri.clone())];
		if let Some(line) = self.line {
			arguments.push(JsonValue::from(line));
			arguments.push(JsonValue::String(self.selected_text.clone().unwrap_or_default()));
		}
		arguments
	}
}

/// Builds `workspace/executeCommand` params.
pub fn execute_command_params(command: &str, arguments: Vec<JsonValue>) -> ExecuteCommandParams {
	ExecuteCommandParams {
		command: command.to_owned(),
		arguments,
		work_done_progress_params: Default::default(),
	}
}
