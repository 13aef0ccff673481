//! Interactive result panel: wire protocol, scroll sync, and view model.

mod panel;
pub mod protocol;
pub mod scroll;

pub use panel::{BlockView, PanelModel, PanelUpdate, RowView};
pub use protocol::{EditorConfig, HostMessage, PanelMessage};
pub use scroll::ScrollSync;
