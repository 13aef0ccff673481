//! Debounced analysis request scheduling.
//!
//! Edit and selection events are coalesced into a bounded rate of analysis
//! requests through a single [`Debouncer`] slot. Every event stores the
//! document snapshot it carries; the timer reads the latest stored intent at
//! expiry, so a request always reflects the newest state rather than the
//! state at scheduling time.
//!
//! Requests already issued are never canceled. Their outcomes are sent over
//! the [`SchedulerEvent`] channel in completion order, each stamped with the
//! generation it was issued under.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lively_lsp::{AnalysisBackend, AnalysisClient, AnalysisParams, CapabilityState};
use lively_primitives::TerminationResult;
use lively_worker::{Debouncer, DelayedTask, GenerationClock, TaskClass};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Timer and gating settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
	pub edit_debounce: Duration,
	pub selection_debounce: Duration,
	/// Documents without this marker never trigger an analysis.
	pub example_marker: String,
}

impl Default for SchedulerConfig {
	fn default() -> Self {
		Self {
			edit_debounce: Duration::from_millis(750),
			selection_debounce: Duration::from_millis(1500),
			example_marker: "<Example ".to_string(),
		}
	}
}

/// Content of a document at one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
	pub uri: String,
	pub version: i32,
	pub text: Arc<str>,
}

impl DocumentSnapshot {
	pub fn new(uri: impl Into<String>, version: i32, text: impl Into<Arc<str>>) -> Self {
		Self {
			uri: uri.into(),
			version,
			text: text.into(),
		}
	}

	/// Returns true if the document declares at least one example.
	pub fn contains_marker(&self, marker: &str) -> bool {
		self.text.contains(marker)
	}
}

/// How a selection change came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
	/// Direct pointer selection; requested immediately.
	Pointer,
	/// Keyboard, command or any other source; debounced.
	Other,
}

/// What caused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
	Edit,
	Selection(SelectionKind),
	/// Explicit request, e.g. enabling the feature.
	Explicit,
}

impl Trigger {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Edit => "edit",
			Self::Selection(SelectionKind::Pointer) => "pointer-selection",
			Self::Selection(SelectionKind::Other) => "selection",
			Self::Explicit => "explicit",
		}
	}
}

/// One issued analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
	pub generation: u64,
	pub trigger: Trigger,
	/// Document version the request was issued for.
	pub version: i32,
	pub params: AnalysisParams,
}

/// Normalized response to one [`AnalysisRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
	pub request: AnalysisRequest,
	pub termination: TerminationResult,
	/// Wall time between issuing the request and receiving the answer.
	pub elapsed: Duration,
}

impl AnalysisOutcome {
	pub fn generation(&self) -> u64 {
		self.request.generation
	}
}

/// Events emitted by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
	Completed(AnalysisOutcome),
	/// The backend lacks the analysis command. Sent once per process.
	CapabilityMissing,
}

/// Handle of a scheduled request. Resolves to `None` when the timer was
/// replaced before firing or the capability was missing.
pub type PendingRequest = DelayedTask<Option<AnalysisOutcome>>;

#[derive(Debug, Clone)]
struct Intent {
	document: DocumentSnapshot,
	scope: Option<(u32, String)>,
	trigger: Trigger,
}

impl Intent {
	fn params(&self) -> AnalysisParams {
		match &self.scope {
			Some((line, text)) => AnalysisParams::scoped(self.document.uri.clone(), *line, text.clone()),
			None => AnalysisParams::file(self.document.uri.clone()),
		}
	}
}

struct Shared<B: ?Sized> {
	client: AnalysisClient<B>,
	generations: GenerationClock,
	latest: Mutex<Option<Intent>>,
	events: mpsc::UnboundedSender<SchedulerEvent>,
}

impl<B: AnalysisBackend + ?Sized> Shared<B> {
	async fn run_latest(self: Arc<Self>) -> Option<AnalysisOutcome> {
		let intent = self.latest.lock().clone()?;
		self.run(intent).await
	}

	async fn run(&self, intent: Intent) -> Option<AnalysisOutcome> {
		if let CapabilityState::Missing { first_report } = self.client.analysis_capability().await {
			if first_report {
				if self.events.send(SchedulerEvent::CapabilityMissing).is_err() {
					tracing::trace!("analysis.receiver_closed");
				}
			}
			return None;
		}

		let request = AnalysisRequest {
			generation: self.generations.next(),
			trigger: intent.trigger,
			version: intent.document.version,
			params: intent.params(),
		};
		tracing::debug!(
			generation = request.generation,
			uri = %request.params.uri,
			version = request.version,
			trigger = request.trigger.as_str(),
			"analysis.request"
		);

		let started = Instant::now();
		let termination = match self.client.request_analysis(&request.params).await {
			Ok(Some(termination)) => termination,
			Ok(None) => TerminationResult::no_result(),
			Err(err) => {
				tracing::warn!(generation = request.generation, error = %err, "analysis.backend_failed");
				TerminationResult::failed(err.to_string())
			}
		};
		let elapsed = started.elapsed();
		tracing::debug!(
			generation = request.generation,
			elapsed_ms = elapsed.as_millis() as u64,
			time_to_run_ms = termination.time_to_run_millis,
			failed = termination.error_message().is_some(),
			"analysis.complete"
		);

		let outcome = AnalysisOutcome {
			request,
			termination,
			elapsed,
		};
		if self.events.send(SchedulerEvent::Completed(outcome.clone())).is_err() {
			tracing::trace!(generation = outcome.generation(), "analysis.receiver_closed");
		}
		Some(outcome)
	}
}

/// Turns document and selection events into analysis requests.
pub struct RequestScheduler<B: ?Sized> {
	shared: Arc<Shared<B>>,
	debouncer: Debouncer,
	config: SchedulerConfig,
	enabled: AtomicBool,
}

impl<B: ?Sized> std::fmt::Debug for RequestScheduler<B> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RequestScheduler")
			.field("config", &self.config)
			.field("enabled", &self.enabled)
			.field("debouncer", &self.debouncer)
			.finish_non_exhaustive()
	}
}

impl<B: AnalysisBackend + ?Sized + 'static> RequestScheduler<B> {
	/// Creates an enabled scheduler and the receiver for its events.
	pub fn new(client: AnalysisClient<B>, config: SchedulerConfig) -> (Self, mpsc::UnboundedReceiver<SchedulerEvent>) {
		let (events, rx) = mpsc::unbounded_channel();
		let scheduler = Self {
			shared: Arc::new(Shared {
				client,
				generations: GenerationClock::new(),
				latest: Mutex::new(None),
				events,
			}),
			debouncer: Debouncer::new(TaskClass::Interactive),
			config,
			enabled: AtomicBool::new(true),
		};
		(scheduler, rx)
	}

	pub fn client(&self) -> &AnalysisClient<B> {
		&self.shared.client
	}

	pub fn config(&self) -> &SchedulerConfig {
		&self.config
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled.load(Ordering::Acquire)
	}

	/// Enables or disables scheduling. Disabling drops the pending timer.
	pub fn set_enabled(&self, enabled: bool) {
		self.enabled.store(enabled, Ordering::Release);
		if !enabled {
			self.debouncer.cancel();
			self.shared.latest.lock().take();
		}
	}

	/// Returns true if a debounce timer is waiting.
	pub fn is_pending(&self) -> bool {
		self.debouncer.is_pending()
	}

	/// Most recently issued generation (0 before the first request).
	pub fn current_generation(&self) -> u64 {
		self.shared.generations.current()
	}

	/// Restarts the edit debounce for `document`.
	pub fn on_document_changed(&self, document: DocumentSnapshot) -> Option<PendingRequest> {
		self.admit(document, None, Trigger::Edit).map(|_| self.schedule(self.config.edit_debounce))
	}

	/// Schedules a request scoped to the selection at `line`.
	///
	/// Pointer selections fire immediately; others wait for the selection
	/// debounce.
	pub fn on_selection_changed(&self, document: DocumentSnapshot, line: u32, selected_text: impl Into<String>, kind: SelectionKind) -> Option<PendingRequest> {
		let intent = self.admit(document, Some((line, selected_text.into())), Trigger::Selection(kind))?;
		match kind {
			SelectionKind::Pointer => Some(self.fire(intent)),
			SelectionKind::Other => Some(self.schedule(self.config.selection_debounce)),
		}
	}

	/// Requests an unscoped analysis right away, bypassing the debounce.
	pub fn request_now(&self, document: DocumentSnapshot) -> Option<PendingRequest> {
		self.admit(document, None, Trigger::Explicit).map(|intent| self.fire(intent))
	}

	/// Stores the intent if the event may trigger a request, returning a copy of it.
	fn admit(&self, document: DocumentSnapshot, scope: Option<(u32, String)>, trigger: Trigger) -> Option<Intent> {
		if !self.is_enabled() {
			tracing::trace!(uri = %document.uri, trigger = trigger.as_str(), "analysis.disabled");
			return None;
		}
		if !document.contains_marker(&self.config.example_marker) {
			tracing::trace!(uri = %document.uri, "analysis.no_examples");
			return None;
		}
		let intent = Intent { document, scope, trigger };
		*self.shared.latest.lock() = Some(intent.clone());
		Some(intent)
	}

	fn schedule(&self, delay: Duration) -> PendingRequest {
		let shared = self.shared.clone();
		self.debouncer.schedule(delay, move || shared.run_latest())
	}

	/// Runs `intent` right away. Later events cannot rewrite what it sends.
	fn fire(&self, intent: Intent) -> PendingRequest {
		let shared = self.shared.clone();
		self.debouncer.fire_now(move || async move { shared.run(intent).await })
	}
}

#[cfg(test)]
mod tests;
