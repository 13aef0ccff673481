/// Execution classes used for spawn classification and observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Work the user is waiting on (pointer-driven requests).
	Interactive,
	/// Debounced or otherwise deferrable work.
	Background,
}

impl TaskClass {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
		}
	}
}
