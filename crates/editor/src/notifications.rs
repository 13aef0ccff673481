//! User-facing notifications emitted by the live session.
//!
//! The engine never renders anything itself. It hands [`Notification`]s to a
//! host-provided [`Notifier`], which decides where they show up.

use std::time::Duration;

/// Severity level for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
	/// Informational message (default).
	#[default]
	Info,
	/// Warning message.
	Warn,
	/// Error message.
	Error,
}

/// Controls automatic dismissal of notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoDismiss {
	/// Notification remains visible until manually dismissed.
	Never,
	/// Notification automatically dismisses after the specified duration.
	After(Duration),
}

impl AutoDismiss {
	/// Default auto-dismiss duration (3 seconds).
	pub const DEFAULT: Self = Self::After(Duration::from_secs(3));
}

impl Default for AutoDismiss {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// Follow-up actions the host can offer the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suggestion {
	/// The backend lacks the analysis command; offer to install the component providing it.
	InstallLiveComponent,
}

impl Suggestion {
	pub fn message(self) -> &'static str {
		match self {
			Self::InstallLiveComponent => "Babylonian Analysis requires the Live component. Would you like to install it with the GraalVM Updater (gu)?",
		}
	}

	/// Button labels, affirmative first.
	pub fn actions(self) -> &'static [&'static str] {
		match self {
			Self::InstallLiveComponent => &["Yes", "No"],
		}
	}
}

/// Runtime notification ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	pub level: Level,
	pub message: String,
	pub auto_dismiss: AutoDismiss,
	pub suggestion: Option<Suggestion>,
}

impl Notification {
	/// Transient status bar message.
	pub fn status(message: impl Into<String>, dismiss_after: Duration) -> Self {
		Self {
			level: Level::Info,
			message: message.into(),
			auto_dismiss: AutoDismiss::After(dismiss_after),
			suggestion: None,
		}
	}

	/// Transient failure message.
	pub fn failure(message: impl Into<String>, dismiss_after: Duration) -> Self {
		Self {
			level: Level::Error,
			..Self::status(message, dismiss_after)
		}
	}

	/// Sticky prompt offering a follow-up action.
	pub fn suggest(suggestion: Suggestion) -> Self {
		Self {
			level: Level::Warn,
			message: suggestion.message().to_string(),
			auto_dismiss: AutoDismiss::Never,
			suggestion: Some(suggestion),
		}
	}
}

/// Sink for notifications.
pub trait Notifier {
	fn notify(&mut self, notification: Notification);
}

impl Notifier for Vec<Notification> {
	fn notify(&mut self, notification: Notification) {
		self.push(notification);
	}
}
