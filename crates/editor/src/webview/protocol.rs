//! JSON envelopes exchanged with the interactive panel.
//!
//! Envelopes carry no tag field; the variant is picked by which keys are present.

use lively_primitives::AbstractProbe;
use serde::{Deserialize, Serialize};

/// Marker for the `"type": "scroll"` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollTag {
	#[serde(rename = "scroll")]
	Scroll,
}

/// `[fontFamily, fontSize]` of the host editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig(pub String, pub f64);

impl EditorConfig {
	pub fn font_family(&self) -> &str {
		&self.0
	}

	pub fn font_size(&self) -> f64 {
		self.1
	}
}

/// Host to panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostMessage {
	Scroll {
		#[serde(rename = "type")]
		kind: ScrollTag,
		/// First visible editor line.
		line: u32,
		/// URI of the scrolled document.
		source: String,
	},
	Result {
		result: Vec<AbstractProbe>,
	},
	/// Full source text of the document.
	Background {
		background: String,
	},
	EditorConfig {
		#[serde(rename = "editorConfig")]
		editor_config: EditorConfig,
	},
}

impl HostMessage {
	pub fn scroll(line: u32, source: impl Into<String>) -> Self {
		Self::Scroll {
			kind: ScrollTag::Scroll,
			line,
			source: source.into(),
		}
	}

	/// Encodes the message as posted to the panel.
	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}
}

/// Panel to host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PanelMessage {
	/// Replace the declaration at one-based `line` with `edit_line`.
	EditExample {
		#[serde(rename = "editLine")]
		edit_line: String,
		line: u32,
	},
	/// Insert a new example declaration above one-based `line_nr`.
	CreateExample {
		#[serde(rename = "lineNr")]
		line_nr: u32,
		name: String,
		value: String,
	},
	/// Scroll the editor to `line`.
	Scroll {
		line: u32,
	},
}

impl PanelMessage {
	/// Decodes a message posted by the panel.
	pub fn from_json(text: &str) -> serde_json::Result<Self> {
		serde_json::from_str(text)
	}
}
