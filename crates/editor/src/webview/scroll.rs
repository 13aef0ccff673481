//! Bidirectional scroll synchronization between editor and panel.
//!
//! Scrolling the panel in response to the editor produces a panel scroll
//! event of its own. Events landing within [`ECHO_WINDOW`] lines of the
//! editor line are treated as that echo and swallowed once.

/// Tolerance, in lines, for recognizing an echoed scroll.
pub const ECHO_WINDOW: f64 = 0.7;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollSync {
	editor_line: f64,
	editor_is_scrolling: bool,
	total_lines: usize,
}

impl ScrollSync {
	pub fn new() -> Self {
		Self::default()
	}

	/// Updates the line count of the mirrored document.
	pub fn set_source(&mut self, text: &str) {
		self.total_lines = text.lines().count();
	}

	pub fn total_lines(&self) -> usize {
		self.total_lines
	}

	/// Editor scrolled to `line`. Returns the panel position as a fraction of its height.
	pub fn on_editor_scroll(&mut self, line: u32) -> Option<f64> {
		self.editor_line = f64::from(line);
		self.editor_is_scrolling = true;
		if self.total_lines == 0 {
			return None;
		}
		Some(self.editor_line / self.total_lines as f64)
	}

	/// Panel scrolled to `fraction` of its height. Returns the line the editor should reveal.
	pub fn on_panel_scroll(&mut self, fraction: f64) -> Option<u32> {
		let float_line = fraction * self.total_lines as f64;
		let is_echo = (self.editor_line - ECHO_WINDOW..=self.editor_line + ECHO_WINDOW).contains(&float_line);
		if is_echo && self.editor_is_scrolling {
			self.editor_is_scrolling = false;
			return None;
		}
		if self.editor_is_scrolling {
			return None;
		}
		Some(float_line.ceil().max(0.0) as u32)
	}
}
