//! Handlers 模块

pub mod metrics;
pub mod system;
pub mod torque;

pub use metrics::*;
pub use system::*;
pub use torque::*;
