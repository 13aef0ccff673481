#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Live example-driven analysis engine.
//!
//! This crate turns editor events into analysis requests and analysis results
//! into decorations and an interactive example panel. It renders nothing
//! itself; hosts plug in through [`DecorationHost`], [`Notifier`] and
//! [`navigation::NavigationTarget`].
//!
//! # Main Types
//!
//! - [`LiveSession`] - Controller owning the scheduler, decorations, and the last result
//! - [`RequestScheduler`] - Debounced, generation-stamped analysis requests
//! - [`DecorationReconciler`] - Per-line decoration handles that survive identical results
//! - [`tree::build_blocks`] - Example blocks for the interactive panel
//!
//! # Data Flow
//!
//! ```text
//! edit / selection ──▶ RequestScheduler ──▶ AnalysisClient
//!                                                │
//!                       SchedulerEvent ◀─────────┘
//!                             │
//!                        LiveSession ──▶ DecorationReconciler ──▶ DecorationHost
//!                             │
//!                        ResultStore ──▶ NavigationRouter / PanelModel
//! ```

/// TOML configuration and decoration colors.
pub mod config;
pub mod decorations;
/// Evaluating a selected expression.
pub mod display;
/// Object explorer tree for one observed value.
pub mod explorer;
pub mod live;
/// Navigation URIs embedded in annotation hovers.
pub mod navigation;
pub mod notifications;
pub mod scheduler;
/// Example selection, colors, and glyphs.
pub mod selection;
pub mod store;
pub mod tree;
pub mod webview;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, DecorationColors, LiveConfig};
pub use decorations::{DecorationHost, DecorationReconciler};
pub use live::LiveSession;
pub use notifications::{Notification, Notifier};
pub use scheduler::{DocumentSnapshot, RequestScheduler, SchedulerEvent};
pub use store::ResultStore;
