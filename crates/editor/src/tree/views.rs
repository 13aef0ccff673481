//! Per-row view models of the interactive panel.

use std::sync::LazyLock;

use regex::Regex;

use super::ExampleRow;
use crate::selection::SelectedExample;

/// Color of values whose example is not selected.
const UNSELECTED_COLOR: &str = "black";

/// Number of leading spaces of a source row.
pub fn indentation(text: &str) -> usize {
	text.chars().take_while(|c| *c == ' ').count()
}

/// Slider over the values one probe observed under one example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSlider {
	pub example_name: String,
	pub color: String,
	pub values: Vec<String>,
	/// One-based.
	position: usize,
}

impl ProbeSlider {
	pub fn position(&self) -> usize {
		self.position
	}

	/// Value under the slider, `None` when the probe observed nothing.
	pub fn current(&self) -> Option<&str> {
		self.values.get(self.position - 1).map(String::as_str)
	}

	/// Moves the slider, clamped to the observed values. Returns the new position.
	pub fn set_position(&mut self, position: usize) -> usize {
		self.position = position.clamp(1, self.values.len().max(1));
		self.position
	}
}

/// Probe row: one slider per selected example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeView {
	pub line_index: u32,
	/// Row text without surrounding whitespace.
	pub text: String,
	pub indent: usize,
	pub sliders: Vec<ProbeSlider>,
	observed: Vec<(String, Vec<String>)>,
}

impl ProbeView {
	pub fn new(row: &ExampleRow, selected: &[SelectedExample]) -> Self {
		let mut view = Self {
			line_index: row.line_index,
			text: row.text.trim().to_string(),
			indent: indentation(&row.text),
			sliders: Vec::new(),
			observed: row
				.examples
				.iter()
				.map(|e| (e.example_name.clone(), e.display_strings().into_iter().map(str::to_string).collect()))
				.collect(),
		};
		view.reselect(selected);
		view
	}

	/// Rebuilds the sliders for a new selection, keeping positions of examples that stay selected.
	pub fn reselect(&mut self, selected: &[SelectedExample]) {
		let previous = std::mem::take(&mut self.sliders);
		self.sliders = self
			.observed
			.iter()
			.filter_map(|(name, values)| {
				let color = selected.iter().find(|s| &s.name == name)?.color.clone();
				let position = previous.iter().find(|s| &s.example_name == name).map_or(1, ProbeSlider::position);
				Some(ProbeSlider {
					example_name: name.clone(),
					color,
					values: values.clone(),
					position,
				})
			})
			.collect();
	}

	pub fn slider(&self, example_name: &str) -> Option<&ProbeSlider> {
		self.sliders.iter().find(|s| s.example_name == example_name)
	}

	/// Moves one example's slider and returns the value now shown.
	pub fn slide(&mut self, example_name: &str, position: usize) -> Option<&str> {
		let slider = self.sliders.iter_mut().find(|s| s.example_name == example_name)?;
		slider.set_position(position);
		slider.current()
	}
}

/// First value of one selected example on an assertion row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionValue {
	pub example_name: String,
	pub color: String,
	pub display: String,
}

/// Assertion row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionView {
	pub line_index: u32,
	pub indent: usize,
	pub values: Vec<AssertionValue>,
	first_values: Vec<(String, String)>,
}

impl AssertionView {
	pub fn new(row: &ExampleRow, selected: &[SelectedExample]) -> Self {
		let mut view = Self {
			line_index: row.line_index,
			indent: indentation(&row.text),
			values: Vec::new(),
			first_values: row
				.examples
				.iter()
				.map(|e| (e.example_name.clone(), e.observed_values.first().map(|v| v.display_string.clone()).unwrap_or_default()))
				.collect(),
		};
		view.reselect(selected);
		view
	}

	pub fn reselect(&mut self, selected: &[SelectedExample]) {
		self.values = self
			.first_values
			.iter()
			.filter_map(|(name, display)| {
				let chosen = selected.iter().find(|s| &s.name == name)?;
				Some(AssertionValue {
					example_name: name.clone(),
					color: chosen.color.clone(),
					display: display.clone(),
				})
			})
			.collect();
	}

	pub fn color_of(&self, example_name: &str) -> &str {
		self.values
			.iter()
			.find(|v| v.example_name == example_name)
			.map_or(UNSELECTED_COLOR, |v| v.color.as_str())
	}
}

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(:?[^"'\s=]+)=["']([^"']+)["']"#).expect("attribute pattern is valid"));

/// Parsed `<Example ... />` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleDeclaration {
	/// Value of `:name`.
	pub name: Option<String>,
	/// Remaining `key="value"` attributes in source order.
	pub inputs: Vec<(String, String)>,
}

impl ExampleDeclaration {
	pub fn parse(text: &str) -> Self {
		let mut declaration = Self::default();
		for capture in ATTRIBUTE.captures_iter(text) {
			let (key, value) = (&capture[1], &capture[2]);
			if key == ":name" {
				declaration.name = Some(value.to_string());
			} else {
				declaration.set_input(key, value);
			}
		}
		declaration
	}

	/// Sets an input, keeping its position when it already exists.
	pub fn set_input(&mut self, key: &str, value: &str) {
		match self.inputs.iter_mut().find(|(k, _)| k == key) {
			Some((_, existing)) => *existing = value.to_string(),
			None => self.inputs.push((key.to_string(), value.to_string())),
		}
	}

	/// Regenerates the declaration comment.
	pub fn to_text(&self) -> String {
		let mut text = String::from("// <Example");
		if let Some(name) = &self.name {
			text.push_str(&format!(" :name=\"{name}\""));
		}
		for (key, value) in &self.inputs {
			text.push_str(&format!(" {key}=\"{value}\""));
		}
		text.push_str(" />");
		text
	}
}
