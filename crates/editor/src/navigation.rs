//! Navigation URIs embedded in annotation hovers.
//!
//! Two path-scoped actions carry flat query parameters. Malformed input is
//! never an error: parsing yields `None` and the action is skipped.

use lively_primitives::ObservedValue;
use url::Url;
use url::form_urlencoded;

use crate::store::ResultStore;

pub const SHOW_PROBE_DETAILS_PATH: &str = "/show-probe-details";
pub const DEBUG_PROBE_PATH: &str = "/debug-probe";

/// Location and expression a debugging session should evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugTarget {
	pub file_uri: String,
	pub language_id: String,
	pub line_index: u32,
	pub expression: String,
}

/// Parsed navigation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationRequest {
	ShowProbeDetails {
		file_uri: String,
		line_index: u32,
		example_name: String,
		observed_value_index: usize,
	},
	DebugProbe(DebugTarget),
}

impl NavigationRequest {
	/// Parses a path plus raw (still percent-encoded) query string.
	pub fn parse(path: &str, query: &str) -> Option<Self> {
		let params: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes()).into_owned().collect();
		let get = |key: &str| params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());

		let request = match path {
			SHOW_PROBE_DETAILS_PATH => Self::ShowProbeDetails {
				file_uri: get("fileUri")?.to_string(),
				line_index: get("lineIndex")?.parse().ok()?,
				example_name: get("exampleName")?.to_string(),
				observed_value_index: get("observedValueIndex")?.parse().ok()?,
			},
			DEBUG_PROBE_PATH => Self::DebugProbe(DebugTarget {
				file_uri: get("fileUri")?.to_string(),
				language_id: get("languageId").unwrap_or_default().to_string(),
				line_index: get("lineIndex")?.parse().ok()?,
				expression: get("expression").unwrap_or_default().to_string(),
			}),
			_ => return None,
		};
		Some(request)
	}

	/// Parses a full navigation URI.
	pub fn from_url(url: &Url) -> Option<Self> {
		let parsed = Self::parse(url.path(), url.query().unwrap_or_default());
		if parsed.is_none() {
			tracing::debug!(%url, "navigation.malformed");
		}
		parsed
	}

	pub fn path(&self) -> &'static str {
		match self {
			Self::ShowProbeDetails { .. } => SHOW_PROBE_DETAILS_PATH,
			Self::DebugProbe(_) => DEBUG_PROBE_PATH,
		}
	}

	/// Builds the URI for this action under `base` (scheme and authority).
	pub fn to_url(&self, base: &Url) -> Url {
		let mut url = base.clone();
		url.set_path(self.path());
		{
			let mut query = url.query_pairs_mut();
			query.clear();
			match self {
				Self::ShowProbeDetails {
					file_uri,
					line_index,
					example_name,
					observed_value_index,
				} => {
					query
						.append_pair("fileUri", file_uri)
						.append_pair("lineIndex", &line_index.to_string())
						.append_pair("exampleName", example_name)
						.append_pair("observedValueIndex", &observed_value_index.to_string());
				}
				Self::DebugProbe(target) => {
					query
						.append_pair("fileUri", &target.file_uri)
						.append_pair("languageId", &target.language_id)
						.append_pair("lineIndex", &target.line_index.to_string())
						.append_pair("expression", &target.expression);
				}
			}
		}
		url
	}
}

/// Host side effects of navigation actions.
pub trait NavigationTarget {
	/// Shows one observed value in a detail view.
	fn show_details(&mut self, value: &ObservedValue);

	/// Sets a breakpoint at the target line and starts a debugging session.
	fn start_debugging(&mut self, target: &DebugTarget);
}

/// Executes navigation actions against the last stored result.
#[derive(Debug, Clone)]
pub struct NavigationRouter {
	store: ResultStore,
}

impl NavigationRouter {
	pub fn new(store: ResultStore) -> Self {
		Self { store }
	}

	/// Handles a navigation URI. Returns true if an action ran.
	pub fn handle_url(&self, url: &Url, target: &mut impl NavigationTarget) -> bool {
		NavigationRequest::from_url(url).is_some_and(|request| self.handle(&request, target))
	}

	/// Runs one parsed action. Returns false when it resolved to nothing.
	pub fn handle(&self, request: &NavigationRequest, target: &mut impl NavigationTarget) -> bool {
		match request {
			NavigationRequest::ShowProbeDetails {
				file_uri,
				line_index,
				example_name,
				observed_value_index,
			} => {
				let Some(value) = self.store.observed_value(file_uri, *line_index, example_name, *observed_value_index) else {
					tracing::debug!(uri = %file_uri, line = line_index, example = %example_name, "navigation.value_not_found");
					return false;
				};
				target.show_details(&value);
				true
			}
			NavigationRequest::DebugProbe(debug_target) => {
				tracing::debug!(uri = %debug_target.file_uri, line = debug_target.line_index, language = %debug_target.language_id, "navigation.debug_probe");
				target.start_debugging(debug_target);
				true
			}
		}
	}
}
