//! Line-indexed views over analysis results.
//!
//! Results arrive as flat, unordered probe lists. Both the decoration
//! reconciler and the result tree builder need "probe at line N" lookups, so
//! the map is built once per result here instead of scanning per row.

use std::collections::BTreeMap;

use crate::model::{AbstractProbe, AnalysisResult, FileResult, ObservedValue};

/// Probes of one file with a line index built once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeTable {
	probes: Vec<AbstractProbe>,
	/// Line index -> position in `probes`. First probe wins on duplicates.
	by_line: BTreeMap<u32, usize>,
}

impl ProbeTable {
	/// Builds the line index for a probe list.
	pub fn new(probes: Vec<AbstractProbe>) -> Self {
		let mut by_line = BTreeMap::new();
		for (pos, probe) in probes.iter().enumerate() {
			by_line.entry(probe.line_index).or_insert(pos);
		}
		Self { probes, by_line }
	}

	/// Returns the probe attached to a zero-based line.
	pub fn probe_at(&self, line: u32) -> Option<&AbstractProbe> {
		self.by_line.get(&line).map(|&pos| &self.probes[pos])
	}

	/// Returns true if some probe covers the line.
	pub fn contains_line(&self, line: u32) -> bool {
		self.by_line.contains_key(&line)
	}

	/// Covered lines in ascending order.
	pub fn lines(&self) -> impl Iterator<Item = u32> + '_ {
		self.by_line.keys().copied()
	}

	/// Indexed probes in ascending line order.
	pub fn iter(&self) -> impl Iterator<Item = &AbstractProbe> {
		self.by_line.values().map(|&pos| &self.probes[pos])
	}

	/// All probes in arrival order, duplicates included.
	pub fn probes(&self) -> &[AbstractProbe] {
		&self.probes
	}

	pub fn len(&self) -> usize {
		self.by_line.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_line.is_empty()
	}
}

/// One file of an [`AnalysisSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
	pub uri: String,
	pub language_id: String,
	pub table: ProbeTable,
}

impl From<FileResult> for FileSnapshot {
	fn from(file: FileResult) -> Self {
		Self {
			uri: file.uri,
			language_id: file.language_id,
			table: ProbeTable::new(file.probes),
		}
	}
}

/// Immutable, indexed view of one completed analysis run.
///
/// A new snapshot replaces the previous one; snapshots are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisSnapshot {
	files: Vec<FileSnapshot>,
}

impl AnalysisSnapshot {
	pub fn new(result: AnalysisResult) -> Self {
		Self {
			files: result.files.into_iter().map(FileSnapshot::from).collect(),
		}
	}

	/// Looks up a file by URI.
	pub fn file(&self, uri: &str) -> Option<&FileSnapshot> {
		self.files.iter().find(|f| f.uri == uri)
	}

	pub fn files(&self) -> &[FileSnapshot] {
		&self.files
	}

	/// Resolves one observed value by its navigation coordinates.
	pub fn observed_value(&self, uri: &str, line: u32, example_name: &str, index: usize) -> Option<&ObservedValue> {
		self.file(uri)?
			.table
			.probe_at(line)?
			.example(example_name)?
			.observed_values
			.get(index)
	}
}

impl From<AnalysisResult> for AnalysisSnapshot {
	fn from(result: AnalysisResult) -> Self {
		Self::new(result)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::model::{ExampleResult, ProbeType};

	fn probe(probe_type: ProbeType, line: u32) -> AbstractProbe {
		AbstractProbe::new(probe_type, line, vec![])
	}

	#[test]
	fn test_table_indexes_unordered_probes() {
		let table = ProbeTable::new(vec![probe(ProbeType::Probe, 9), probe(ProbeType::Example, 2), probe(ProbeType::Assertion, 5)]);
		assert_eq!(table.lines().collect::<Vec<_>>(), vec![2, 5, 9]);
		assert_eq!(table.probe_at(5).map(|p| p.probe_type), Some(ProbeType::Assertion));
		assert!(table.probe_at(3).is_none());
		assert_eq!(table.len(), 3);
	}

	#[test]
	fn test_table_first_probe_wins_on_duplicate_line() {
		let table = ProbeTable::new(vec![probe(ProbeType::Probe, 1), probe(ProbeType::Assertion, 1)]);
		assert_eq!(table.probe_at(1).map(|p| p.probe_type), Some(ProbeType::Probe));
		assert_eq!(table.len(), 1);
		assert_eq!(table.probes().len(), 2);
	}

	#[test]
	fn test_snapshot_resolves_observed_value() {
		let result = AnalysisResult {
			files: vec![FileResult {
				uri: "file:///a.js".into(),
				language_id: "js".into(),
				probes: vec![AbstractProbe::new(
					ProbeType::Probe,
					3,
					vec![ExampleResult::new("ex", vec![ObservedValue::display("1"), ObservedValue::display("2")])],
				)],
			}],
		};
		let snapshot = AnalysisSnapshot::new(result);

		assert_eq!(snapshot.observed_value("file:///a.js", 3, "ex", 1), Some(&ObservedValue::display("2")));
		assert_eq!(snapshot.observed_value("file:///a.js", 3, "ex", 2), None);
		assert_eq!(snapshot.observed_value("file:///a.js", 3, "other", 0), None);
		assert_eq!(snapshot.observed_value("file:///b.js", 3, "ex", 0), None);
	}
}
