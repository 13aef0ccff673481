//! Tree view model for inspecting one observed value.

use lively_primitives::ObservedValue;

/// One node of the object explorer tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerItem {
	pub label: String,
	pub description: String,
	/// Theme icon identifier.
	pub icon: Option<&'static str>,
	/// `None` for leaves.
	pub children: Option<Vec<ExplorerItem>>,
}

impl ExplorerItem {
	fn leaf(label: impl Into<String>, description: impl Into<String>, icon: Option<&'static str>) -> Self {
		Self {
			label: label.into(),
			description: description.into(),
			icon,
			children: None,
		}
	}

	fn group(description: &str, icon: &'static str, children: Vec<ExplorerItem>) -> Self {
		Self {
			label: children.len().to_string(),
			description: description.to_string(),
			icon: Some(icon),
			children: Some(children),
		}
	}

	pub fn is_leaf(&self) -> bool {
		self.children.is_none()
	}
}

/// Current contents of the object explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectExplorer {
	items: Vec<ExplorerItem>,
}

impl Default for ObjectExplorer {
	fn default() -> Self {
		Self {
			items: vec![ExplorerItem::leaf("", "Display an expression first...", Some("info"))],
		}
	}
}

impl ObjectExplorer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn items(&self) -> &[ExplorerItem] {
		&self.items
	}

	/// Replaces the tree with a description of `value`.
	pub fn show(&mut self, value: &ObservedValue) {
		self.items = Self::describe(value);
	}

	/// Top-level items describing `value`.
	pub fn describe(value: &ObservedValue) -> Vec<ExplorerItem> {
		let mut items = vec![ExplorerItem::leaf(value.display_string.clone(), "displayString", Some("symbol-string"))];

		if let Some(expression) = value.expression.as_deref().filter(|e| !e.is_empty()) {
			items.push(ExplorerItem::leaf(expression.replace('\n', "\\n"), "expression", Some("code")));
		}
		if let Some(error) = value.error_message() {
			items.push(ExplorerItem::leaf(error, "error", Some("error")));
		}
		if let Some(name) = value.meta_qualified_name.as_deref().filter(|n| !n.is_empty()) {
			items.push(ExplorerItem::leaf(name, "metaQualifiedName", Some("dash")));
		}
		if let Some(name) = value.meta_simple_name.as_deref().filter(|n| !n.is_empty()) {
			items.push(ExplorerItem::leaf(name, "metaSimpleName", Some("dash")));
		}

		if !value.interop_properties.is_empty() {
			let properties = value.interop_properties.iter().map(|p| ExplorerItem::leaf(p.clone(), "", None)).collect();
			items.push(ExplorerItem::group("interopProperties", "symbol-property", properties));
		}

		if !value.is_consistent() {
			tracing::warn!(
				names = value.member_names.as_ref().map_or(0, Vec::len),
				displays = value.member_display_strings.as_ref().map_or(0, Vec::len),
				"explorer.inconsistent_members"
			);
		}
		let mut members: Vec<ExplorerItem> = value
			.member_pairs()
			.filter(|(name, display)| !name.is_empty() && !display.is_empty())
			.map(|(name, display)| ExplorerItem::leaf(name, display, None))
			.collect();
		if !members.is_empty() {
			members.sort_by(|a, b| a.label.cmp(&b.label));
			items.push(ExplorerItem::group("interopMembers", "package", members));
		}

		if let Some(elements) = &value.elements {
			let elements = elements
				.iter()
				.enumerate()
				.filter(|(_, element)| !element.is_empty())
				.map(|(index, element)| ExplorerItem::leaf(element.clone(), format!("#{index}"), None))
				.collect();
			items.push(ExplorerItem::group("interopElements", "list-ordered", elements));
		}

		items
	}
}
