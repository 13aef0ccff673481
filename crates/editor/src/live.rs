//! Live analysis session.
//!
//! [`LiveSession`] is the controller a host embeds: it owns the scheduler,
//! the decoration reconciler and the last applied result, and turns
//! scheduler events and pushed results into decorations and notifications.
//! The feature starts disabled until [`LiveSession::toggle`] turns it on.

use std::sync::Arc;
use std::time::Duration;

use lively_lsp::{AnalysisBackend, AnalysisClient};
use lively_primitives::{AnalysisResult, AnalysisSnapshot};
use tokio::sync::mpsc;

use crate::config::LiveConfig;
use crate::decorations::{DecorationHost, DecorationReconciler, ReconcileStats};
use crate::navigation::NavigationRouter;
use crate::notifications::{Notification, Notifier, Suggestion};
use crate::scheduler::{AnalysisOutcome, DocumentSnapshot, RequestScheduler, SchedulerEvent};
use crate::store::ResultStore;
use crate::webview::HostMessage;

pub const ENABLED_MESSAGE: &str = "Babylonian Analysis enabled";
pub const DISABLED_MESSAGE: &str = "Babylonian Analysis disabled";

pub struct LiveSession<B: ?Sized, H: DecorationHost, N> {
	scheduler: RequestScheduler<B>,
	decorations: DecorationReconciler<H>,
	store: ResultStore,
	notifier: N,
	status_dismiss: Duration,
	drop_stale: bool,
	newest_applied: u64,
}

impl<B: ?Sized, H: DecorationHost + std::fmt::Debug, N> std::fmt::Debug for LiveSession<B, H, N> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LiveSession")
			.field("scheduler", &self.scheduler)
			.field("live_handles", &self.decorations.live_handles())
			.field("newest_applied", &self.newest_applied)
			.finish_non_exhaustive()
	}
}

impl<B, H, N> LiveSession<B, H, N>
where
	B: AnalysisBackend + ?Sized + 'static,
	H: DecorationHost,
	N: Notifier,
{
	/// Creates a disabled session and the receiver of its scheduler events.
	///
	/// The host drives the session by feeding every received event to
	/// [`Self::handle_scheduler_event`].
	pub fn new(client: AnalysisClient<B>, host: H, notifier: N, config: &LiveConfig) -> (Self, mpsc::UnboundedReceiver<SchedulerEvent>) {
		let (scheduler, events) = RequestScheduler::new(client, config.scheduler_config());
		scheduler.set_enabled(false);
		let session = Self {
			scheduler,
			decorations: DecorationReconciler::new(host, config.colors.clone()),
			store: ResultStore::new(),
			notifier,
			status_dismiss: config.status_dismiss(),
			drop_stale: config.drop_stale_responses,
			newest_applied: 0,
		};
		(session, events)
	}

	pub fn is_enabled(&self) -> bool {
		self.scheduler.is_enabled()
	}

	pub fn scheduler(&self) -> &RequestScheduler<B> {
		&self.scheduler
	}

	pub fn decorations(&self) -> &DecorationReconciler<H> {
		&self.decorations
	}

	pub fn notifier(&self) -> &N {
		&self.notifier
	}

	pub fn store(&self) -> &ResultStore {
		&self.store
	}

	/// Navigation router reading this session's results.
	pub fn navigation(&self) -> NavigationRouter {
		NavigationRouter::new(self.store.clone())
	}

	/// Flips the feature and returns the new state.
	///
	/// Enabling requests an analysis of `active` right away. Disabling drops
	/// the pending timer, every decoration and the stored result. Responses
	/// still in flight are ignored once they arrive.
	pub fn toggle(&mut self, active: Option<DocumentSnapshot>) -> bool {
		let enabled = !self.is_enabled();
		self.scheduler.set_enabled(enabled);
		let message = if enabled {
			if let Some(document) = active {
				let _ = self.scheduler.request_now(document);
			}
			ENABLED_MESSAGE
		} else {
			self.decorations.clear_all_decorations();
			self.store.reset();
			DISABLED_MESSAGE
		};
		tracing::debug!(enabled, "live.toggle");
		self.notifier.notify(Notification::status(message, self.status_dismiss));
		enabled
	}

	/// Applies one scheduler event. Returns the reconciliation stats when
	/// decorations were updated.
	pub fn handle_scheduler_event(&mut self, event: SchedulerEvent) -> Option<ReconcileStats> {
		match event {
			SchedulerEvent::CapabilityMissing => {
				tracing::warn!("live.capability_missing");
				self.notifier.notify(Notification::suggest(Suggestion::InstallLiveComponent));
				None
			}
			SchedulerEvent::Completed(outcome) => self.handle_outcome(outcome),
		}
	}

	/// Applies a result pushed by the backend outside any request.
	pub fn handle_pushed_result(&mut self, result: AnalysisResult) -> Option<ReconcileStats> {
		if !self.is_enabled() {
			tracing::trace!("live.pushed_result_ignored");
			return None;
		}
		Some(self.apply(result, false))
	}

	/// Messages bringing a panel up to date with `document` and the stored result.
	pub fn host_messages(&self, document: &DocumentSnapshot) -> Vec<HostMessage> {
		let probes = self
			.store
			.current()
			.and_then(|snapshot| snapshot.file(&document.uri).map(|file| file.table.probes().to_vec()))
			.unwrap_or_default();
		vec![
			HostMessage::Background {
				background: document.text.to_string(),
			},
			HostMessage::Result { result: probes },
		]
	}

	fn handle_outcome(&mut self, outcome: AnalysisOutcome) -> Option<ReconcileStats> {
		let generation = outcome.generation();
		if !self.is_enabled() {
			tracing::trace!(generation, "live.outcome_ignored");
			return None;
		}
		if self.drop_stale && generation < self.newest_applied {
			tracing::warn!(generation, newest = self.newest_applied, "live.stale_response_dropped");
			return None;
		}
		if let Some(error) = outcome.termination.error_message() {
			tracing::debug!(generation, %error, "live.analysis_failed");
			self.notifier.notify(Notification::failure(error, self.status_dismiss));
			return None;
		}
		let result = outcome.termination.result?;
		self.newest_applied = self.newest_applied.max(generation);
		Some(self.apply(result, true))
	}

	fn apply(&mut self, result: AnalysisResult, is_final: bool) -> ReconcileStats {
		let snapshot = Arc::new(AnalysisSnapshot::new(result));
		let stats = self.decorations.apply_snapshot(&snapshot, is_final);
		self.store.replace(snapshot);
		stats
	}
}
