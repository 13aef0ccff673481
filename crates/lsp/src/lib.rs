//! Analysis backend plumbing over the language server connection.
//!
//! The analysis engine is a black box reached through two channels:
//! - a request/response command ([`ANALYSIS_COMMAND`]) executed through
//!   `workspace/executeCommand`, answering with a
//!   [`TerminationResult`](lively_primitives::TerminationResult);
//! - a pushed notification ([`protocol::BabylonianAnalysisResult`]) carrying an
//!   [`AnalysisResult`](lively_primitives::AnalysisResult) at any time.
//!
//! [`AnalysisClient`] wraps any [`AnalysisBackend`] with typed helpers and a
//! process-lifetime capability cache. [`router::NotificationRouter`] decodes
//! pushed notifications by method name.
#![warn(missing_docs)]

/// Re-export of the [`lsp_types`] dependency of this crate.
pub use lsp_types;
pub use serde_json::Value as JsonValue;

pub mod client;
pub mod protocol;
pub mod router;

pub use client::{AnalysisBackend, AnalysisClient, CapabilityCache, CapabilityState};
pub use protocol::{ANALYSIS_COMMAND, AnalysisParams, AnyNotification, DISPLAY_EXPRESSION_COMMAND};

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The backend failed to execute a command.
	#[error("backend error: {0}")]
	Backend(String),
	/// The backend replied with an undecodable payload.
	#[error("deserialization failed: {0}")]
	Deserialize(#[from] serde_json::Error),
	/// The backend does not expose a required command.
	#[error("command unavailable: {0}")]
	CommandUnavailable(String),
	/// No handler is registered for a notification method.
	#[error("{0}")]
	Routing(String),
}
