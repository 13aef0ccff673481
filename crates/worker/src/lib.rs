//! Worker primitives for live analysis scheduling.
//!
//! Everything that suspends in the analysis pipeline goes through this crate:
//! classified task spawning, monotonically increasing request generations, and
//! the single-slot [`Debouncer`] whose pending timer is always canceled before
//! it is replaced.

mod class;
mod debounce;
mod spawn;
mod token;

pub use class::TaskClass;
pub use debounce::{DelayedTask, Debouncer};
pub use spawn::spawn;
pub use token::{GenerationClock, GenerationToken};
