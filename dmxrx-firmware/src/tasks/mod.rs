//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod dimmer;
pub mod indicator;
pub mod receiver;
pub mod uart_rx;

pub use dimmer::dimmer_task;
pub use indicator::indicator_task;
pub use receiver::receiver_task;
pub use uart_rx::{rp_uart_config, uart_rx_task};
