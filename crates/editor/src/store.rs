//! Process-scoped holder of the last applied analysis snapshot.

use std::sync::Arc;

use lively_primitives::{AnalysisSnapshot, ObservedValue};
use parking_lot::RwLock;

/// Last applied snapshot, shared between the session and navigation.
///
/// Clones share the same slot. Starts empty; [`Self::reset`] returns it to
/// that state.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
	current: Arc<RwLock<Option<Arc<AnalysisSnapshot>>>>,
}

impl ResultStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the stored snapshot, returning the previous one.
	pub fn replace(&self, snapshot: Arc<AnalysisSnapshot>) -> Option<Arc<AnalysisSnapshot>> {
		self.current.write().replace(snapshot)
	}

	pub fn current(&self) -> Option<Arc<AnalysisSnapshot>> {
		self.current.read().clone()
	}

	pub fn reset(&self) {
		self.current.write().take();
	}

	/// Resolves an observed value of the stored snapshot.
	pub fn observed_value(&self, uri: &str, line: u32, example_name: &str, index: usize) -> Option<ObservedValue> {
		self.current()?.observed_value(uri, line, example_name, index).cloned()
	}
}
