//! Evaluating a selected expression and inserting its value.

use lively_lsp::{AnalysisBackend, AnalysisClient};
use lively_primitives::{ObservedValue, TextPosition, TextRange};

/// Range to evaluate: the selection, or its whole line when the selection is empty.
pub fn expression_range(text: &str, selection: TextRange) -> TextRange {
	if !selection.is_empty() {
		return selection;
	}
	let line = selection.start.line;
	let length = text.lines().nth(line as usize).map_or(0, |l| l.chars().count() as u32);
	TextRange::new(TextPosition::new(line, 0), TextPosition::new(line, length))
}

/// Text covered by `range`. Positions past the end are clamped.
pub fn text_in_range(text: &str, range: TextRange) -> String {
	let start = offset_of(text, range.start);
	let end = offset_of(text, range.end).max(start);
	text[start..end].to_string()
}

fn offset_of(text: &str, position: TextPosition) -> usize {
	let mut offset = 0;
	for (index, line) in text.split_inclusive('\n').enumerate() {
		if index == position.line as usize {
			let content = line.trim_end_matches(['\n', '\r']);
			let within = content
				.char_indices()
				.nth(position.character as usize)
				.map_or(content.len(), |(byte, _)| byte);
			return offset + within;
		}
		offset += line.len();
	}
	text.len()
}

/// Edit produced by evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionInsertion {
	/// Where the value is inserted: the end of the evaluated range.
	pub at: TextPosition,
	pub text: String,
	/// Selection covering the inserted text afterwards.
	pub selection: TextRange,
}

impl ExpressionInsertion {
	/// Inserts the error when evaluation failed, else the display string.
	pub fn new(range: TextRange, value: &ObservedValue) -> Self {
		let text = value.error_message().unwrap_or(&value.display_string).to_string();
		let at = range.end;
		Self {
			selection: TextRange::new(at, at.advance(&text)),
			at,
			text,
		}
	}
}

/// Evaluated expression plus the edit showing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedExpression {
	pub value: ObservedValue,
	pub insertion: ExpressionInsertion,
}

/// Evaluates the selected expression of `text`.
///
/// `Ok(None)` when the backend returned nothing.
pub async fn display_expression<B>(client: &AnalysisClient<B>, uri: &str, text: &str, selection: TextRange) -> lively_lsp::Result<Option<DisplayedExpression>>
where
	B: AnalysisBackend + ?Sized,
{
	let range = expression_range(text, selection);
	let expression = text_in_range(text, range);
	tracing::debug!(%uri, line = range.start.line, "display_expression.request");

	let Some(value) = client.display_expression(uri, &expression).await? else {
		return Ok(None);
	};
	Ok(Some(DisplayedExpression {
		insertion: ExpressionInsertion::new(range, &value),
		value,
	}))
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use lively_lsp::DISPLAY_EXPRESSION_COMMAND;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;
	use crate::testing::{FakeBackend, FakeReply};

	const SOURCE: &str = "let a = 1;\nlet b = a + 2;\r\nb * 3";

	fn pos(line: u32, character: u32) -> TextPosition {
		TextPosition::new(line, character)
	}

	#[test]
	fn test_empty_selection_expands_to_line() {
		let range = expression_range(SOURCE, TextRange::point(pos(1, 4)));
		assert_eq!(range, TextRange::new(pos(1, 0), pos(1, 14)));
		assert_eq!(text_in_range(SOURCE, range), "let b = a + 2;");
	}

	#[test]
	fn test_text_in_range_spans_lines() {
		assert_eq!(text_in_range(SOURCE, TextRange::new(pos(0, 4), pos(1, 5))), "a = 1;\nlet b");
		assert_eq!(text_in_range(SOURCE, TextRange::new(pos(2, 0), pos(9, 0))), "b * 3");
	}

	#[test]
	fn test_insertion_prefers_error() {
		let range = TextRange::new(pos(2, 0), pos(2, 5));
		let insertion = ExpressionInsertion::new(range, &ObservedValue {
			display_string: "15".into(),
			error: Some("boom".into()),
			..ObservedValue::default()
		});
		assert_eq!(insertion.text, "boom");
		assert_eq!(insertion.selection, TextRange::new(pos(2, 5), pos(2, 9)));
	}

	#[test]
	fn test_multi_line_insertion_selection() {
		let insertion = ExpressionInsertion::new(TextRange::point(pos(3, 7)), &ObservedValue::display("{\n  x: 1\n}"));
		assert_eq!(insertion.at, pos(3, 7));
		assert_eq!(insertion.selection.end, pos(5, 1));
	}

	#[tokio::test]
	async fn test_display_expression_sends_selected_text() {
		let backend = Arc::new(FakeBackend::new(FakeReply::Value(json!({"displayString": "3", "interopProperties": []}))));
		let client = AnalysisClient::new(backend.clone());

		let shown = display_expression(&client, "file:///a.js", SOURCE, TextRange::new(pos(2, 0), pos(2, 1)))
			.await
			.unwrap()
			.unwrap();

		assert_eq!(shown.value, ObservedValue::display("3"));
		assert_eq!(shown.insertion.selection, TextRange::new(pos(2, 1), pos(2, 2)));
		assert_eq!(backend.calls(), vec![(DISPLAY_EXPRESSION_COMMAND.to_string(), vec![json!("file:///a.js"), json!("b")])]);
	}

	#[tokio::test]
	async fn test_display_expression_without_answer() {
		let backend = Arc::new(FakeBackend::new(FakeReply::Nothing));
		let client = AnalysisClient::new(backend);
		assert_eq!(display_expression(&client, "file:///a.js", SOURCE, TextRange::point(pos(0, 0))).await.unwrap(), None);
	}
}
