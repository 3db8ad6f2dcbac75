//! Handlers 模块

pub mod devices;
pub mod health;
pub mod metrics;
pub mod packet_out;

pub use devices::*;
pub use health::*;
pub use metrics::*;
pub use packet_out::*;
