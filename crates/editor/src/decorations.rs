//! Per-line decoration reconciliation.
//!
//! The reconciler owns every decoration handle it creates. For each open file
//! it keeps at most one handle per line, tagged with the [`DecorationIdentity`]
//! it was created for. A new result only disposes handles whose identity
//! changed or whose line disappeared; identical lines keep their handle so
//! the host never flickers.
//!
//! Per result the order is fixed: [`DecorationReconciler::clear_redundant_decorations`]
//! first, then one [`DecorationReconciler::reconcile`] per probe.

use std::collections::{BTreeMap, HashMap};

use lively_primitives::{AbstractProbe, AnalysisSnapshot, ProbeType};

use crate::config::DecorationColors;

mod style;
mod text;

pub use style::{DecorationKind, DecorationStyle};
pub use text::annotation_text;

/// Host editor decoration primitives.
pub trait DecorationHost {
	/// Opaque handle of a created decoration type.
	type Handle: Clone + PartialEq + std::fmt::Debug;

	fn create_decoration_type(&mut self, style: &DecorationStyle) -> Self::Handle;

	fn dispose_decoration_type(&mut self, handle: Self::Handle);

	/// Replaces the ranges decorated with `handle` in the editor showing `uri`.
	fn set_decorations(&mut self, uri: &str, handle: &Self::Handle, decorations: Vec<DecorationOptions>);

	/// Returns true if an editor currently shows `uri`.
	fn is_visible(&self, uri: &str) -> bool;
}

/// One decorated range: the end of `line`, annotated with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationOptions {
	pub line: u32,
	pub text: String,
}

/// Everything that affects how a line is drawn.
///
/// Two probes with equal identities render identically, so their handle can
/// be reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecorationIdentity {
	pub uri: String,
	pub line: u32,
	pub probe_type: ProbeType,
	/// Final result with no example reaching the line.
	pub unreached: bool,
	/// Sorted example names.
	pub examples: Vec<String>,
	/// Truth value of an assertion. `None` for other probe types.
	pub assertion_holds: Option<bool>,
}

impl DecorationIdentity {
	pub fn of(uri: &str, is_final: bool, probe: &AbstractProbe) -> Self {
		Self {
			uri: uri.to_string(),
			line: probe.line_index,
			probe_type: probe.probe_type,
			unreached: is_final && probe.is_unreached(),
			examples: probe.sorted_example_names(),
			assertion_holds: (probe.probe_type == ProbeType::Assertion).then(|| probe.all_observed_true()),
		}
	}
}

#[derive(Debug)]
struct CacheEntry<H> {
	identity: DecorationIdentity,
	handle: H,
}

/// Handle churn of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
	pub created: usize,
	pub reused: usize,
	pub disposed: usize,
	/// Files in the result that no editor shows.
	pub skipped_files: usize,
}

/// Owner of all decoration handles, keyed by file and line.
#[derive(Debug)]
pub struct DecorationReconciler<H: DecorationHost> {
	host: H,
	colors: DecorationColors,
	cache: HashMap<String, BTreeMap<u32, CacheEntry<H::Handle>>>,
	stats: ReconcileStats,
}

impl<H: DecorationHost> DecorationReconciler<H> {
	pub fn new(host: H, colors: DecorationColors) -> Self {
		Self {
			host,
			colors,
			cache: HashMap::new(),
			stats: ReconcileStats::default(),
		}
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	/// Returns the handle for `probe`, reusing the cached one when its identity is unchanged.
	pub fn reconcile(&mut self, uri: &str, is_final: bool, probe: &AbstractProbe) -> H::Handle {
		let identity = DecorationIdentity::of(uri, is_final, probe);
		let lines = self.cache.entry(uri.to_string()).or_default();

		if let Some(entry) = lines.get(&probe.line_index) {
			if entry.identity == identity {
				self.stats.reused += 1;
				tracing::trace!(%uri, line = probe.line_index, "decorations.reuse");
				return entry.handle.clone();
			}
		}

		if let Some(stale) = lines.remove(&probe.line_index) {
			self.host.dispose_decoration_type(stale.handle);
			self.stats.disposed += 1;
		}

		let kind = DecorationKind::classify(probe, identity.unreached);
		let handle = self.host.create_decoration_type(&DecorationStyle::new(kind, &self.colors));
		tracing::trace!(%uri, line = probe.line_index, kind = kind.as_str(), "decorations.create");
		lines.insert(
			probe.line_index,
			CacheEntry {
				identity,
				handle: handle.clone(),
			},
		);
		self.stats.created += 1;
		handle
	}

	/// Disposes handles of files missing from `snapshot` and of lines no longer probed.
	///
	/// Returns the number of disposed handles.
	pub fn clear_redundant_decorations(&mut self, snapshot: &AnalysisSnapshot) -> usize {
		let mut disposed = 0;
		let host = &mut self.host;
		self.cache.retain(|uri, lines| {
			let Some(file) = snapshot.file(uri) else {
				for (_, entry) in std::mem::take(lines) {
					host.dispose_decoration_type(entry.handle);
					disposed += 1;
				}
				return false;
			};

			let stale: Vec<u32> = lines.keys().copied().filter(|line| !file.table.contains_line(*line)).collect();
			for line in stale {
				if let Some(entry) = lines.remove(&line) {
					host.dispose_decoration_type(entry.handle);
					disposed += 1;
				}
			}
			!lines.is_empty()
		});
		if disposed > 0 {
			tracing::debug!(disposed, "decorations.clear_redundant");
		}
		self.stats.disposed += disposed;
		disposed
	}

	/// Disposes every handle. A second call is a no-op.
	pub fn clear_all_decorations(&mut self) -> usize {
		let mut disposed = 0;
		for (_, lines) in self.cache.drain() {
			for (_, entry) in lines {
				self.host.dispose_decoration_type(entry.handle);
				disposed += 1;
			}
		}
		if disposed > 0 {
			tracing::debug!(disposed, "decorations.clear_all");
		}
		disposed
	}

	/// Reconciles a whole snapshot and pushes annotation text for every visible file.
	pub fn apply_snapshot(&mut self, snapshot: &AnalysisSnapshot, is_final: bool) -> ReconcileStats {
		self.stats = ReconcileStats::default();
		self.clear_redundant_decorations(snapshot);

		for file in snapshot.files() {
			if !self.host.is_visible(&file.uri) {
				tracing::trace!(uri = %file.uri, "decorations.not_visible");
				self.stats.skipped_files += 1;
				continue;
			}
			for probe in file.table.iter() {
				let handle = self.reconcile(&file.uri, is_final, probe);
				let unreached = is_final && probe.is_unreached();
				let options = DecorationOptions {
					line: probe.line_index,
					text: annotation_text(probe, unreached),
				};
				self.host.set_decorations(&file.uri, &handle, vec![options]);
			}
		}

		let stats = std::mem::take(&mut self.stats);
		tracing::debug!(
			created = stats.created,
			reused = stats.reused,
			disposed = stats.disposed,
			skipped_files = stats.skipped_files,
			"decorations.reconcile"
		);
		stats
	}

	/// Cached handle of one line.
	pub fn handle_at(&self, uri: &str, line: u32) -> Option<&H::Handle> {
		self.cache.get(uri)?.get(&line).map(|entry| &entry.handle)
	}

	/// Identity the handle of one line was created for.
	pub fn identity_at(&self, uri: &str, line: u32) -> Option<&DecorationIdentity> {
		self.cache.get(uri)?.get(&line).map(|entry| &entry.identity)
	}

	/// Number of live handles across all files.
	pub fn live_handles(&self) -> usize {
		self.cache.values().map(BTreeMap::len).sum()
	}

	/// Decorated lines of one file in ascending order.
	pub fn lines(&self, uri: &str) -> Vec<u32> {
		self.cache.get(uri).map(|lines| lines.keys().copied().collect()).unwrap_or_default()
	}
}

#[cfg(test)]
mod tests;
