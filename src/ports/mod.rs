//! Ports (trait boundaries) between the harness and pluggable implementations.
//!
//! Agents, environments and experiment observers are owned by the harness as
//! trait objects; concrete implementations live in [`crate::agents`],
//! [`crate::environments`] and [`crate::pipeline::observers`], or in user code.

pub mod agent;
pub mod environment;
pub mod observer;

pub use agent::Agent;
pub use environment::Environment;
pub use observer::ExperimentObserver;
