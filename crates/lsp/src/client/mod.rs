//! Typed client for the analysis backend.

use std::sync::Arc;

use async_trait::async_trait;
use lively_primitives::{ObservedValue, TerminationResult};
use lsp_types::ExecuteCommandParams;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::protocol::{ANALYSIS_COMMAND, AnalysisParams, DISPLAY_EXPRESSION_COMMAND, execute_command_params};
use crate::{Error, Result};

mod capabilities;

pub use capabilities::{CapabilityCache, CapabilityState};

/// Transport executing backend commands.
///
/// Implemented by whatever carries `workspace/executeCommand` to the
/// analysis engine (a language client, a test double, a recorded session).
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
	/// Lists the commands the backend currently exposes.
	async fn commands(&self) -> Result<Vec<String>>;

	/// Executes a command. `Ok(None)` means the backend answered with nothing.
	async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<JsonValue>>;
}

/// Typed wrapper around an [`AnalysisBackend`].
pub struct AnalysisClient<B: ?Sized> {
	backend: Arc<B>,
	capabilities: CapabilityCache,
}

impl<B: ?Sized> std::fmt::Debug for AnalysisClient<B> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AnalysisClient")
			.field("capabilities", &self.capabilities)
			.finish_non_exhaustive()
	}
}

impl<B: AnalysisBackend + ?Sized> AnalysisClient<B> {
	/// Creates a client with an empty capability cache.
	pub fn new(backend: Arc<B>) -> Self {
		Self {
			backend,
			capabilities: CapabilityCache::new(),
		}
	}

	/// Returns the wrapped backend.
	pub fn backend(&self) -> &Arc<B> {
		&self.backend
	}

	/// Checks (and caches) whether the analysis command is available.
	pub async fn analysis_capability(&self) -> CapabilityState {
		self.capabilities.check(self.backend.as_ref(), ANALYSIS_COMMAND).await
	}

	/// Returns true if the backend currently lists `command`. Not cached.
	pub async fn supports(&self, command: &str) -> Result<bool> {
		Ok(self.backend.commands().await?.iter().any(|c| c == command))
	}

	/// Runs one analysis. `Ok(None)` when the backend returned no value.
	pub async fn request_analysis(&self, params: &AnalysisParams) -> Result<Option<TerminationResult>> {
		tracing::debug!(uri = %params.uri, scoped = params.is_scoped(), "analysis.execute");
		self.execute(ANALYSIS_COMMAND, params.to_arguments()).await
	}

	/// Evaluates `expression` in the context of the file at `uri`.
	pub async fn display_expression(&self, uri: &str, expression: &str) -> Result<Option<ObservedValue>> {
		if !self.supports(DISPLAY_EXPRESSION_COMMAND).await? {
			return Err(Error::CommandUnavailable(DISPLAY_EXPRESSION_COMMAND.to_owned()));
		}
		self.execute(
			DISPLAY_EXPRESSION_COMMAND,
			vec![JsonValue::String(uri.to_owned()), JsonValue::String(expression.to_owned())],
		)
		.await
	}

	async fn execute<T: DeserializeOwned>(&self, command: &str, arguments: Vec<JsonValue>) -> Result<Option<T>> {
		match self.backend.execute_command(execute_command_params(command, arguments)).await? {
			None | Some(JsonValue::Null) => Ok(None),
			Some(value) => Ok(Some(serde_json::from_value(value)?)),
		}
	}
}
