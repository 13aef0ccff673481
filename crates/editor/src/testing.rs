//! Test doubles shared by unit tests.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use lively_lsp::lsp_types::ExecuteCommandParams;
use lively_lsp::{ANALYSIS_COMMAND, AnalysisBackend, DISPLAY_EXPRESSION_COMMAND, Error, JsonValue};
use lively_primitives::{AbstractProbe, AnalysisResult, ExampleResult, FileResult, ObservedValue, ProbeType, TerminationResult};
use parking_lot::Mutex;

use crate::decorations::{DecorationHost, DecorationKind, DecorationOptions, DecorationStyle};

#[derive(Debug, Clone)]
pub(crate) enum FakeReply {
	Value(JsonValue),
	Nothing,
	Error(String),
}

impl FakeReply {
	pub(crate) fn termination(termination: TerminationResult) -> Self {
		Self::Value(serde_json::to_value(termination).unwrap())
	}
}

/// Scriptable backend recording every command it receives.
#[derive(Debug)]
pub(crate) struct FakeBackend {
	commands: Mutex<Vec<String>>,
	reply: Mutex<FakeReply>,
	delays: Mutex<VecDeque<Duration>>,
	calls: Mutex<Vec<(String, Vec<JsonValue>)>>,
}

impl FakeBackend {
	pub(crate) fn new(reply: FakeReply) -> Self {
		Self {
			commands: Mutex::new(vec![ANALYSIS_COMMAND.to_owned(), DISPLAY_EXPRESSION_COMMAND.to_owned()]),
			reply: Mutex::new(reply),
			delays: Mutex::new(VecDeque::new()),
			calls: Mutex::new(Vec::new()),
		}
	}

	pub(crate) fn without_commands(reply: FakeReply) -> Self {
		let backend = Self::new(reply);
		backend.commands.lock().clear();
		backend
	}

	pub(crate) fn set_reply(&self, reply: FakeReply) {
		*self.reply.lock() = reply;
	}

	/// Delays the next calls, one entry per call.
	pub(crate) fn push_delay(&self, delay: Duration) {
		self.delays.lock().push_back(delay);
	}

	pub(crate) fn calls(&self) -> Vec<(String, Vec<JsonValue>)> {
		self.calls.lock().clone()
	}
}

#[async_trait]
impl AnalysisBackend for FakeBackend {
	async fn commands(&self) -> lively_lsp::Result<Vec<String>> {
		Ok(self.commands.lock().clone())
	}

	async fn execute_command(&self, params: ExecuteCommandParams) -> lively_lsp::Result<Option<JsonValue>> {
		self.calls.lock().push((params.command.clone(), params.arguments.clone()));
		let delay = self.delays.lock().pop_front();
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		let reply = self.reply.lock().clone();
		match reply {
			FakeReply::Value(value) => Ok(Some(value)),
			FakeReply::Nothing => Ok(None),
			FakeReply::Error(message) => Err(Error::Backend(message)),
		}
	}
}

/// Probe with one display string per observed value.
pub(crate) fn probe(probe_type: ProbeType, line: u32, examples: &[(&str, &[&str])]) -> AbstractProbe {
	AbstractProbe::new(
		probe_type,
		line,
		examples
			.iter()
			.map(|(name, values)| ExampleResult::new(*name, values.iter().map(|v| ObservedValue::display(*v)).collect()))
			.collect(),
	)
}

pub(crate) fn result(uri: &str, probes: Vec<AbstractProbe>) -> AnalysisResult {
	AnalysisResult {
		files: vec![FileResult {
			uri: uri.to_owned(),
			language_id: "js".to_owned(),
			probes,
		}],
	}
}

/// Decoration host recording every call, with `u32` handles.
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
	next: u32,
	pub(crate) created: Vec<(u32, DecorationKind)>,
	pub(crate) disposed: Vec<u32>,
	pub(crate) set: Vec<(String, u32, Vec<DecorationOptions>)>,
	pub(crate) hidden: HashSet<String>,
}

impl DecorationHost for RecordingHost {
	type Handle = u32;

	fn create_decoration_type(&mut self, style: &DecorationStyle) -> u32 {
		self.next += 1;
		self.created.push((self.next, style.kind));
		self.next
	}

	fn dispose_decoration_type(&mut self, handle: u32) {
		self.disposed.push(handle);
	}

	fn set_decorations(&mut self, uri: &str, handle: &u32, decorations: Vec<DecorationOptions>) {
		self.set.push((uri.to_string(), *handle, decorations));
	}

	fn is_visible(&self, uri: &str) -> bool {
		!self.hidden.contains(uri)
	}
}
