//! Panel-side view model driven by host messages.

use lively_primitives::{ProbeTable, ProbeType};

use super::protocol::{EditorConfig, HostMessage, PanelMessage};
use super::scroll::ScrollSync;
use crate::selection::{BlockSelection, ColorAssigner};
use crate::tree::{AssertionView, ExampleBlock, ExampleDeclaration, ExampleRow, ProbeView, build_blocks};

/// Rendered form of one body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowView {
	Probe(ProbeView),
	Assertion(AssertionView),
	/// Row without observed values.
	Plain { line_index: u32, text: String },
}

impl RowView {
	fn new(row: &ExampleRow, selection: &BlockSelection) -> Self {
		let selected = selection.selected();
		match row.probe_type {
			Some(ProbeType::Assertion) => Self::Assertion(AssertionView::new(row, &selected)),
			Some(ProbeType::Example) | None => Self::plain(row),
			Some(_) if row.examples.is_empty() => Self::plain(row),
			Some(_) => Self::Probe(ProbeView::new(row, &selected)),
		}
	}

	fn plain(row: &ExampleRow) -> Self {
		Self::Plain {
			line_index: row.line_index,
			text: row.text.clone(),
		}
	}

	fn reselect(&mut self, selection: &BlockSelection) {
		let selected = selection.selected();
		match self {
			Self::Probe(view) => view.reselect(&selected),
			Self::Assertion(view) => view.reselect(&selected),
			Self::Plain { .. } => {}
		}
	}
}

/// One block with its selection and row views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockView {
	pub block: ExampleBlock,
	pub selection: BlockSelection,
	pub rows: Vec<RowView>,
}

/// What a host message changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelUpdate {
	/// Blocks were rebuilt.
	Blocks,
	/// Scroll the panel to this fraction of its height.
	ScrollTo(f64),
	/// Source text or editor styling changed; blocks are rebuilt on the next result.
	Styled,
	Unchanged,
}

/// State of the interactive panel.
#[derive(Debug, Clone)]
pub struct PanelModel {
	background: String,
	editor_config: Option<EditorConfig>,
	probes: ProbeTable,
	colors: ColorAssigner,
	blocks: Vec<BlockView>,
	scroll: ScrollSync,
}

impl PanelModel {
	pub fn new(palette: Vec<String>) -> Self {
		Self {
			background: String::new(),
			editor_config: None,
			probes: ProbeTable::default(),
			colors: ColorAssigner::new(palette),
			blocks: Vec::new(),
			scroll: ScrollSync::new(),
		}
	}

	pub fn blocks(&self) -> &[BlockView] {
		&self.blocks
	}

	pub fn editor_config(&self) -> Option<&EditorConfig> {
		self.editor_config.as_ref()
	}

	pub fn handle(&mut self, message: HostMessage) -> PanelUpdate {
		match message {
			HostMessage::Result { result } => {
				self.probes = ProbeTable::new(result);
				self.rebuild();
				PanelUpdate::Blocks
			}
			HostMessage::Background { background } => {
				self.scroll.set_source(&background);
				self.background = background;
				PanelUpdate::Styled
			}
			HostMessage::EditorConfig { editor_config } => {
				self.editor_config = Some(editor_config);
				PanelUpdate::Styled
			}
			HostMessage::Scroll { line, .. } => self.scroll.on_editor_scroll(line).map_or(PanelUpdate::Unchanged, PanelUpdate::ScrollTo),
		}
	}

	/// Selects or deselects an example of one block and refreshes its rows.
	pub fn toggle_example(&mut self, block: usize, name: &str, selected: bool) -> bool {
		let Some(view) = self.blocks.get_mut(block) else {
			return false;
		};
		if !view.selection.toggle(name, selected) {
			return false;
		}
		for row in &mut view.rows {
			row.reselect(&view.selection);
		}
		true
	}

	/// Panel scrolled by the user. Returns the message asking the editor to follow.
	pub fn on_panel_scroll(&mut self, fraction: f64) -> Option<PanelMessage> {
		self.scroll.on_panel_scroll(fraction).map(|line| PanelMessage::Scroll { line })
	}

	/// Message rewriting the declaration at zero-based `line_index`.
	pub fn submit_example(&self, line_index: u32, declaration: &ExampleDeclaration) -> PanelMessage {
		PanelMessage::EditExample {
			edit_line: declaration.to_text(),
			line: line_index + 1,
		}
	}

	/// Message adding an example declaration above one-based `line_nr`.
	pub fn create_example(&self, line_nr: u32, name: impl Into<String>, value: impl Into<String>) -> PanelMessage {
		PanelMessage::CreateExample {
			line_nr,
			name: name.into(),
			value: value.into(),
		}
	}

	fn rebuild(&mut self) {
		let previous = std::mem::take(&mut self.blocks);
		self.blocks = build_blocks(&self.background, &self.probes)
			.into_iter()
			.map(|block| {
				let names = block.example_names();
				let selection = previous
					.iter()
					.find(|old| old.block.start_line == block.start_line && old.block.example_names() == names)
					.map(|old| old.selection.clone())
					.unwrap_or_else(|| BlockSelection::new(&block, &mut self.colors));
				let rows = block.rows.iter().map(|row| RowView::new(row, &selection)).collect();
				BlockView { block, selection, rows }
			})
			.collect();
		let live: Vec<String> = self.blocks.iter().flat_map(|view| view.block.example_names()).collect();
		self.colors.retain(&live);
		tracing::debug!(blocks = self.blocks.len(), "panel.rebuild");
	}
}
