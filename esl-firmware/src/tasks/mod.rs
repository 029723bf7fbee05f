//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod net_rx;
pub mod net_tx;
pub mod panel;

pub use net_rx::net_rx_task;
pub use net_tx::net_tx_task;
pub use panel::panel_task;
