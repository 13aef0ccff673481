//! Method-keyed dispatch of pushed notifications.

use std::collections::HashMap;

use lively_primitives::AnalysisResult;
use lsp_types::notification::Notification;
use serde_json::Value as JsonValue;
use tokio::sync::mpsc;

use crate::protocol::{AnyNotification, BabylonianAnalysisResult};
use crate::{Error, Result};

type Handler = Box<dyn Fn(JsonValue) -> Result<()> + Send + Sync>;

/// Routes untyped notifications to typed handlers.
///
/// Notifications whose method starts with `$/` are optional by protocol and
/// silently ignored when unhandled; anything else unhandled is a
/// [`Error::Routing`] error.
#[derive(Default)]
pub struct NotificationRouter {
	handlers: HashMap<&'static str, Handler>,
}

impl std::fmt::Debug for NotificationRouter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NotificationRouter")
			.field("methods", &self.handlers.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl NotificationRouter {
	/// Creates an empty router.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a typed handler, replacing any previous one for the method.
	pub fn on<N, F>(&mut self, handler: F) -> &mut Self
	where
		N: Notification,
		F: Fn(N::Params) + Send + Sync + 'static,
	{
		self.handlers.insert(
			N::METHOD,
			Box::new(move |params| {
				let params = serde_json::from_value::<N::Params>(params)?;
				handler(params);
				Ok(())
			}),
		);
		self
	}

	/// Forwards every pushed analysis result into `tx`.
	pub fn forward_analysis_results(&mut self, tx: mpsc::UnboundedSender<AnalysisResult>) -> &mut Self {
		self.on::<BabylonianAnalysisResult, _>(move |result| {
			if tx.send(result).is_err() {
				tracing::debug!("analysis.notification_receiver_closed");
			}
		})
	}

	/// Returns true if a handler exists for `method`.
	pub fn handles(&self, method: &str) -> bool {
		self.handlers.contains_key(method)
	}

	/// Dispatches one notification.
	pub fn dispatch(&self, notif: AnyNotification) -> Result<()> {
		match self.handlers.get(notif.method.as_str()) {
			Some(handler) => handler(notif.params),
			None if notif.method.starts_with("$/") => Ok(()),
			None => Err(Error::Routing(format!("unhandled notification: {}", notif.method))),
		}
	}
}
