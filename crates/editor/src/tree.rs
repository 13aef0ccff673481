//! Example block reconstruction.
//!
//! Results arrive as a flat, line-indexed probe list. The interactive panel
//! needs them grouped the way the source reads: a run of example declaration
//! rows followed by the body rows they exercise. A block ends at the first
//! declaration row after its body has started; that row opens the next block.

use lively_primitives::{AbstractProbe, ExampleResult, ProbeTable, ProbeType};

mod views;

pub use views::{AssertionView, ExampleDeclaration, ProbeSlider, ProbeView, indentation};

/// One source row with the probe data attached to its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleRow {
	/// Zero-based line index.
	pub line_index: u32,
	/// One-based line number for display.
	pub display_line: u32,
	pub text: String,
	/// `None` for rows no probe covers.
	pub probe_type: Option<ProbeType>,
	pub examples: Vec<ExampleResult>,
}

impl ExampleRow {
	fn new(line_index: u32, text: &str, probe: Option<&AbstractProbe>) -> Self {
		Self {
			line_index,
			display_line: line_index + 1,
			text: text.to_string(),
			probe_type: probe.map(|p| p.probe_type),
			examples: probe.map(|p| p.examples.clone()).unwrap_or_default(),
		}
	}

	pub fn is_declaration(&self) -> bool {
		self.probe_type == Some(ProbeType::Example)
	}

	/// Rows no probe covers carry no annotation.
	pub fn is_inert(&self) -> bool {
		self.probe_type.is_none()
	}

	/// Name of the example a declaration row declares.
	///
	/// Taken from the result when the example ran, else from the `:name`
	/// attribute, else synthesized from the line number.
	pub fn example_name(&self) -> String {
		if let Some(example) = self.examples.first() {
			return example.example_name.clone();
		}
		ExampleDeclaration::parse(&self.text)
			.name
			.unwrap_or_else(|| format!("example@{}", self.display_line))
	}
}

/// Declaration rows plus the body rows they annotate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleBlock {
	/// First declaration line, zero-based.
	pub start_line: u32,
	/// Exclusive end: the next block's first line or the row count.
	pub end_line: u32,
	pub examples: Vec<ExampleRow>,
	pub rows: Vec<ExampleRow>,
}

impl ExampleBlock {
	fn starting_at(start_line: u32) -> Self {
		Self {
			start_line,
			end_line: start_line,
			examples: Vec::new(),
			rows: Vec::new(),
		}
	}

	pub fn contains_line(&self, line: u32) -> bool {
		(self.start_line..self.end_line).contains(&line)
	}

	/// Example names in declaration order.
	pub fn example_names(&self) -> Vec<String> {
		self.examples.iter().map(ExampleRow::example_name).collect()
	}
}

/// Groups `source` rows into example blocks.
///
/// Rows before the first declaration belong to no block. A source without
/// declarations yields no blocks.
pub fn build_blocks(source: &str, table: &ProbeTable) -> Vec<ExampleBlock> {
	let mut blocks = Vec::new();
	let mut current: Option<ExampleBlock> = None;
	let mut in_body = false;
	let mut row_count = 0;

	for (index, text) in source.lines().enumerate() {
		let line = index as u32;
		row_count = line + 1;
		let row = ExampleRow::new(line, text, table.probe_at(line));

		if row.is_declaration() {
			if in_body {
				if let Some(mut block) = current.take() {
					block.end_line = line;
					blocks.push(block);
				}
				in_body = false;
			}
			current.get_or_insert_with(|| ExampleBlock::starting_at(line)).examples.push(row);
		} else {
			in_body = true;
			match current.as_mut() {
				Some(block) => block.rows.push(row),
				None => tracing::trace!(line, "tree.row_outside_block"),
			}
		}
	}

	if let Some(mut block) = current {
		block.end_line = row_count;
		blocks.push(block);
	}
	tracing::debug!(blocks = blocks.len(), rows = row_count, "tree.build");
	blocks
}
