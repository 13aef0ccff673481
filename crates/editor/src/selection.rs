//! Example selection and stable display identifiers.

use std::collections::{HashMap, VecDeque};

use crate::tree::ExampleBlock;

/// Palette index of `name`: a left-to-right polynomial hash over UTF-16 code units.
///
/// Deterministic across runs. Distinct names may collide.
pub fn glyph_index(name: &str, size: usize) -> usize {
	if size == 0 {
		return 0;
	}
	let size = size as u128;
	name.encode_utf16().fold(0u128, |index, unit| (31 * index + u128::from(unit)) % size) as usize
}

/// Glyph for `name`, or `None` for an empty palette.
pub fn glyph_for<'a, S: AsRef<str>>(name: &str, glyphs: &'a [S]) -> Option<&'a str> {
	glyphs.get(glyph_index(name, glyphs.len())).map(AsRef::as_ref)
}

/// Hands out palette colors round-robin, refilling the pool once exhausted.
///
/// A name keeps its color until [`ColorAssigner::retain`] drops it.
#[derive(Debug, Clone)]
pub struct ColorAssigner {
	palette: Vec<String>,
	pool: VecDeque<String>,
	assigned: HashMap<String, String>,
}

impl ColorAssigner {
	pub fn new(palette: Vec<String>) -> Self {
		Self {
			pool: palette.iter().cloned().collect(),
			palette,
			assigned: HashMap::new(),
		}
	}

	/// Color of `name`, assigning the next pool color on first use.
	pub fn color_for(&mut self, name: &str) -> String {
		if let Some(color) = self.assigned.get(name) {
			return color.clone();
		}
		if self.pool.is_empty() {
			self.pool.extend(self.palette.iter().cloned());
		}
		let color = self.pool.pop_front().unwrap_or_default();
		self.assigned.insert(name.to_string(), color.clone());
		color
	}

	/// Forgets every name not in `live`. A forgotten name gets a fresh color next time.
	pub fn retain<S: AsRef<str>>(&mut self, live: &[S]) {
		self.assigned.retain(|name, _| live.iter().any(|l| l.as_ref() == name));
	}

	pub fn assigned_names(&self) -> impl Iterator<Item = &str> {
		self.assigned.keys().map(String::as_str)
	}
}

/// Active example of a block, with its display color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedExample {
	pub name: String,
	pub color: String,
}

/// One declared example of a block and its checkbox state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleEntry {
	pub name: String,
	pub color: String,
	pub selected: bool,
	/// Set on the last selected entry so it cannot be deselected.
	pub disabled: bool,
}

/// Which examples of one block are active. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSelection {
	entries: Vec<ExampleEntry>,
}

impl BlockSelection {
	/// Selects every declared example.
	pub fn new(block: &ExampleBlock, colors: &mut ColorAssigner) -> Self {
		let mut selection = Self {
			entries: block
				.example_names()
				.into_iter()
				.map(|name| ExampleEntry {
					color: colors.color_for(&name),
					name,
					selected: true,
					disabled: false,
				})
				.collect(),
		};
		selection.update_disabled();
		selection
	}

	pub fn entries(&self) -> &[ExampleEntry] {
		&self.entries
	}

	/// Selects or deselects `name`. Returns false if nothing changed.
	///
	/// Deselecting the last selected example is refused.
	pub fn toggle(&mut self, name: &str, selected: bool) -> bool {
		let selected_count = self.entries.iter().filter(|e| e.selected).count();
		let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) else {
			return false;
		};
		if entry.selected == selected {
			return false;
		}
		if !selected && selected_count <= 1 {
			tracing::trace!(example = name, "selection.keep_last");
			return false;
		}
		entry.selected = selected;
		self.update_disabled();
		true
	}

	pub fn selected(&self) -> Vec<SelectedExample> {
		self.entries
			.iter()
			.filter(|e| e.selected)
			.map(|e| SelectedExample {
				name: e.name.clone(),
				color: e.color.clone(),
			})
			.collect()
	}

	fn update_disabled(&mut self) {
		let only_one = self.entries.iter().filter(|e| e.selected).count() == 1;
		for entry in &mut self.entries {
			entry.disabled = only_one && entry.selected;
		}
	}
}
