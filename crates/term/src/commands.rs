//! Subcommand implementations. Each renders its report into a `String`.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use lively_editor::LiveConfig;
use lively_editor::decorations::{DecorationHost, DecorationOptions, DecorationReconciler, DecorationStyle, annotation_text};
use lively_editor::explorer::{ExplorerItem, ObjectExplorer};
use lively_editor::navigation::{DebugTarget, NavigationRequest, NavigationRouter, NavigationTarget};
use lively_editor::selection::{BlockSelection, ColorAssigner, glyph_for};
use lively_editor::store::ResultStore;
use lively_editor::tree::build_blocks;
use lively_primitives::{AnalysisResult, AnalysisSnapshot, ObservedValue, ProbeTable, TerminationResult};

const PAD: char = '\u{202F}';

/// Reads a recorded result file.
pub fn read_result(path: &Path) -> Result<AnalysisResult> {
	let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
	parse_result(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Accepts a bare analysis result or the termination result wrapping one.
pub fn parse_result(text: &str) -> Result<AnalysisResult> {
	let value: serde_json::Value = serde_json::from_str(text)?;
	if value.get("files").is_some() {
		return Ok(serde_json::from_value(value)?);
	}
	let termination: TerminationResult = serde_json::from_value(value)?;
	if let Some(error) = termination.error_message() {
		bail!("analysis failed: {error}");
	}
	termination.result.context("termination result carries no analysis result")
}

pub fn blocks(source: &Path, result: &Path, uri: Option<&str>, config: &LiveConfig) -> Result<String> {
	let text = std::fs::read_to_string(source).with_context(|| format!("failed to read {}", source.display()))?;
	render_blocks(&text, &read_result(result)?, uri, config)
}

pub fn render_blocks(source: &str, result: &AnalysisResult, uri: Option<&str>, config: &LiveConfig) -> Result<String> {
	let file = match uri {
		Some(uri) => result.file(uri).with_context(|| format!("result has no file {uri}"))?,
		None => result.files.first().context("result has no files")?,
	};
	let table = ProbeTable::new(file.probes.clone());
	let mut colors = ColorAssigner::new(config.example_palette.clone());
	let mut out = String::new();

	for (index, block) in build_blocks(source, &table).iter().enumerate() {
		let selection = BlockSelection::new(block, &mut colors);
		let examples: Vec<String> = selection
			.entries()
			.iter()
			.map(|entry| format!("{} {}", glyph_for(&entry.name, &config.glyphs).unwrap_or("*"), entry.name))
			.collect();
		writeln!(out, "block {} (lines {}-{}): {}", index + 1, block.start_line + 1, block.end_line, examples.join(", "))?;

		for row in &block.rows {
			write!(out, "{:>4} | {}", row.display_line, row.text)?;
			if let Some(probe) = table.probe_at(row.line_index) {
				let annotation = annotation_text(probe, probe.is_unreached());
				write!(out, "  # {}", annotation.trim_matches(PAD))?;
			}
			writeln!(out)?;
		}
	}
	Ok(out)
}

/// Host recording the decoration plan instead of drawing it.
#[derive(Debug, Default)]
struct PlanHost {
	next: usize,
	styles: HashMap<usize, DecorationStyle>,
	text: HashMap<(String, u32), String>,
}

impl DecorationHost for PlanHost {
	type Handle = usize;

	fn create_decoration_type(&mut self, style: &DecorationStyle) -> usize {
		self.next += 1;
		self.styles.insert(self.next, style.clone());
		self.next
	}

	fn dispose_decoration_type(&mut self, handle: usize) {
		self.styles.remove(&handle);
	}

	fn set_decorations(&mut self, uri: &str, _handle: &usize, decorations: Vec<DecorationOptions>) {
		for decoration in decorations {
			self.text.insert((uri.to_string(), decoration.line), decoration.text);
		}
	}

	fn is_visible(&self, _uri: &str) -> bool {
		true
	}
}

pub fn decorations(result: &Path, is_final: bool, config: &LiveConfig) -> Result<String> {
	render_decorations(read_result(result)?, is_final, config)
}

pub fn render_decorations(result: AnalysisResult, is_final: bool, config: &LiveConfig) -> Result<String> {
	let snapshot = AnalysisSnapshot::new(result);
	let mut reconciler = DecorationReconciler::new(PlanHost::default(), config.colors.clone());
	let stats = reconciler.apply_snapshot(&snapshot, is_final);
	let mut out = String::new();

	for file in snapshot.files() {
		writeln!(out, "{}", file.uri)?;
		for line in reconciler.lines(&file.uri) {
			let host = reconciler.host();
			let Some(style) = reconciler.handle_at(&file.uri, line).and_then(|handle| host.styles.get(handle)) else {
				continue;
			};
			let text = host.text.get(&(file.uri.clone(), line)).map_or("", |t| t.trim_matches(PAD));
			writeln!(out, "{:>4}  {:<16} {:<8} {}", line + 1, style.kind.as_str(), style.background, text)?;
		}
	}
	writeln!(out, "{} decorations", stats.created)?;
	Ok(out)
}

/// Navigation target capturing the value a details view would show.
#[derive(Debug, Default)]
struct Capture {
	value: Option<ObservedValue>,
}

impl NavigationTarget for Capture {
	fn show_details(&mut self, value: &ObservedValue) {
		self.value = Some(value.clone());
	}

	fn start_debugging(&mut self, target: &DebugTarget) {
		tracing::warn!(uri = %target.file_uri, line = target.line_index, "inspect.debugging_unsupported");
	}
}

pub fn inspect(result: &Path, uri: &str, line_index: u32, example: &str, index: usize) -> Result<String> {
	render_inspect(read_result(result)?, uri, line_index, example, index)
}

pub fn render_inspect(result: AnalysisResult, uri: &str, line_index: u32, example: &str, index: usize) -> Result<String> {
	let store = ResultStore::new();
	store.replace(Arc::new(AnalysisSnapshot::new(result)));
	let router = NavigationRouter::new(store);

	let request = NavigationRequest::ShowProbeDetails {
		file_uri: uri.to_string(),
		line_index,
		example_name: example.to_string(),
		observed_value_index: index,
	};
	let mut capture = Capture::default();
	router.handle(&request, &mut capture);
	let Some(value) = capture.value else {
		bail!("no observed value #{index} for example {example} at {uri}:{}", line_index + 1);
	};

	let mut explorer = ObjectExplorer::new();
	explorer.show(&value);
	let mut out = String::new();
	write_items(&mut out, explorer.items(), 0)?;
	Ok(out)
}

fn write_items(out: &mut String, items: &[ExplorerItem], depth: usize) -> std::fmt::Result {
	for item in items {
		writeln!(out, "{:indent$}{}  ({})", "", item.label, item.description, indent = depth * 2)?;
		if let Some(children) = &item.children {
			write_items(out, children, depth + 1)?;
		}
	}
	Ok(())
}
