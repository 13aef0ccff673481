/// Position in zero-based line/character coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TextPosition {
	/// Zero-based line index.
	pub line: u32,
	/// Zero-based character offset in the line.
	pub character: u32,
}

impl TextPosition {
	/// Creates a new position.
	pub const fn new(line: u32, character: u32) -> Self {
		Self { line, character }
	}

	/// Returns the position reached after inserting `text` here.
	pub fn advance(self, text: &str) -> Self {
		let mut line = self.line;
		let mut character = self.character;
		let mut chars = text.chars().peekable();
		while let Some(ch) = chars.next() {
			match ch {
				'\r' if chars.peek() == Some(&'\n') => {}
				'\n' | '\r' => {
					line += 1;
					character = 0;
				}
				_ => character += 1,
			}
		}
		Self { line, character }
	}
}

/// Range with start and end positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
	/// Start position (inclusive).
	pub start: TextPosition,
	/// End position (exclusive).
	pub end: TextPosition,
}

impl TextRange {
	/// Creates a new range.
	pub const fn new(start: TextPosition, end: TextPosition) -> Self {
		Self { start, end }
	}

	/// Creates a zero-length range at a position.
	pub const fn point(pos: TextPosition) -> Self {
		Self { start: pos, end: pos }
	}

	/// Returns true if start and end coincide.
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}
}
