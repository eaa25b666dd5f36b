//! Built-in environments

pub mod cartpole;

pub use cartpole::{CartPoleEnv, CartPoleSettings};

use crate::{Result, config::Config, ports::Environment, registry::EnvironmentRegistry};

/// Register every built-in environment under its canonical name.
///
/// Currently only `"cartpole"`.
pub fn register_builtin(registry: &mut EnvironmentRegistry) -> Result<()> {
    registry.register("cartpole", |config: &Config| {
        Ok(Box::new(CartPoleEnv::from_config(config)?) as Box<dyn Environment>)
    })
}
