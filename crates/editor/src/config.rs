//! Live analysis configuration.
//!
//! Loaded from a TOML file with kebab-case keys. Every field has a default, so
//! an empty file (or no file at all) yields a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::decorations::DecorationKind;
use crate::scheduler::SchedulerConfig;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config: {0}")]
	Io(#[from] std::io::Error),
	#[error("failed to parse config: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("invalid value for `{field}`: {reason}")]
	Invalid { field: &'static str, reason: String },
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Default example colors, assigned round-robin in declaration order.
pub const DEFAULT_EXAMPLE_PALETTE: &[&str] = &["#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#9a6324"];

/// Default glyphs for example names.
pub const DEFAULT_GLYPHS: &[&str] = &["🍎", "🍊", "🍋", "🍇", "🍉", "🍓", "🥝", "🍒", "🥥", "🍑"];

/// User-facing settings of the live analysis engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LiveConfig {
	/// Delay between the last edit and the analysis request.
	pub edit_debounce_ms: u64,
	/// Delay for keyboard-driven selection changes. Twice the edit delay when unset.
	pub selection_debounce_ms: Option<u64>,
	/// How long status messages stay visible.
	pub status_dismiss_ms: u64,
	/// Drop responses older than the newest applied one.
	pub drop_stale_responses: bool,
	/// Documents without this marker never trigger an analysis.
	pub example_marker: String,
	pub colors: DecorationColors,
	pub example_palette: Vec<String>,
	pub glyphs: Vec<String>,
}

impl Default for LiveConfig {
	fn default() -> Self {
		Self {
			edit_debounce_ms: 750,
			selection_debounce_ms: None,
			status_dismiss_ms: 3000,
			drop_stale_responses: false,
			example_marker: "<Example ".to_string(),
			colors: DecorationColors::default(),
			example_palette: DEFAULT_EXAMPLE_PALETTE.iter().map(|c| c.to_string()).collect(),
			glyphs: DEFAULT_GLYPHS.iter().map(|g| g.to_string()).collect(),
		}
	}
}

impl LiveConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a config file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)?;
		Self::from_toml_str(&content)
	}

	pub fn edit_debounce(&self) -> Duration {
		Duration::from_millis(self.edit_debounce_ms)
	}

	pub fn selection_debounce(&self) -> Duration {
		Duration::from_millis(self.selection_debounce_ms.unwrap_or(self.edit_debounce_ms.saturating_mul(2)))
	}

	pub fn status_dismiss(&self) -> Duration {
		Duration::from_millis(self.status_dismiss_ms)
	}

	/// Timer and gating settings for the request scheduler.
	pub fn scheduler_config(&self) -> SchedulerConfig {
		SchedulerConfig {
			edit_debounce: self.edit_debounce(),
			selection_debounce: self.selection_debounce(),
			example_marker: self.example_marker.clone(),
		}
	}

	/// Rejects settings the engine cannot run with.
	pub fn validate(&self) -> Result<()> {
		if self.edit_debounce_ms == 0 {
			return Err(invalid("edit-debounce-ms", "must be greater than zero"));
		}
		if self.selection_debounce_ms == Some(0) {
			return Err(invalid("selection-debounce-ms", "must be greater than zero"));
		}
		if self.example_marker.trim().is_empty() {
			return Err(invalid("example-marker", "must not be blank"));
		}
		if self.example_palette.is_empty() {
			return Err(invalid("example-palette", "needs at least one color"));
		}
		if self.glyphs.is_empty() {
			return Err(invalid("glyphs", "needs at least one glyph"));
		}
		Ok(())
	}
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
	ConfigError::Invalid {
		field,
		reason: reason.to_string(),
	}
}

/// Decoration colors per probe classification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DecorationColors {
	pub foreground: String,
	pub assertion_passed: String,
	pub assertion_failed: String,
	pub example: String,
	pub probe: String,
	pub orphan: String,
	pub selection: String,
	pub unreached: String,
	pub fallback: String,
}

impl Default for DecorationColors {
	fn default() -> Self {
		Self {
			foreground: "white".to_string(),
			assertion_passed: "#0d9e00".to_string(),
			assertion_failed: "#bd0000".to_string(),
			example: "#636360".to_string(),
			probe: "#4e7ec2".to_string(),
			orphan: "grey".to_string(),
			selection: "#c24eb8".to_string(),
			unreached: "#5c5c5c".to_string(),
			fallback: "red".to_string(),
		}
	}
}

impl DecorationColors {
	/// Background color for a decoration kind.
	pub fn background(&self, kind: DecorationKind) -> &str {
		match kind {
			DecorationKind::AssertionPassed => &self.assertion_passed,
			DecorationKind::AssertionFailed => &self.assertion_failed,
			DecorationKind::Example => &self.example,
			DecorationKind::Probe => &self.probe,
			DecorationKind::Orphan => &self.orphan,
			DecorationKind::Selection => &self.selection,
			DecorationKind::Unreached => &self.unreached,
			DecorationKind::Fallback => &self.fallback,
		}
	}
}

/// Outcome of loading a config file that must never block startup.
#[derive(Debug, Default)]
pub struct ConfigLoadReport {
	/// Loaded config, or the defaults when loading failed.
	pub config: LiveConfig,
	/// Read or parse errors keyed by source file path.
	pub errors: Vec<(PathBuf, String)>,
}

/// Loads `path` if it exists, falling back to defaults on any error.
pub fn load_or_default(path: &Path) -> ConfigLoadReport {
	let mut report = ConfigLoadReport::default();
	if !path.exists() {
		return report;
	}

	match LiveConfig::load(path) {
		Ok(config) => report.config = config,
		Err(error) => {
			tracing::warn!(path = %path.display(), %error, "config.load_failed");
			report.errors.push((path.to_path_buf(), error.to_string()));
		}
	}
	report
}
