//! Pluggable reinforcement-learning experimentation harness
//!
//! This crate provides:
//! - Typed, nested configuration with a permissive text format
//! - `Agent` and `Environment` contracts for plugging in policies and simulators
//! - Name-based registries for late-bound construction from configuration
//! - The episode loop and a multi-episode experiment runner with statistics
//! - Built-in random and rule-based agents and a cart-pole environment
//! - CSV episode logs and a small CLI

pub mod agents;
pub mod app;
pub mod cli;
pub mod config;
pub mod environments;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod ports;
pub mod registry;
pub mod types;

pub use config::{Config, ConfigValue};
pub use error::{Error, Result};
pub use pipeline::{EpisodeStats, ExperimentConfig, ExperimentRunner, ExperimentSummary};
pub use ports::{Agent, Environment, ExperimentObserver};
pub use registry::{AgentRegistry, EnvironmentRegistry, Registry};
pub use types::{Action, Experience, Reward, State, StepResult};
