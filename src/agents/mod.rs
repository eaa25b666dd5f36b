//! Built-in agents
//!
//! - [`RandomAgent`] (`"random"`): uniform baseline
//! - [`RuleBasedAgent`] (`"rule_based"`): bang-bang cart-pole controller

pub mod random;
pub mod rule_based;

pub use random::RandomAgent;
pub use rule_based::{RuleBasedAgent, RuleBasedModel};

use crate::{Result, config::Config, ports::Agent, registry::AgentRegistry};

/// Register every built-in agent under its canonical name.
///
/// # Errors
///
/// Fails with [`crate::Error::DuplicateRegistration`] if any of the names is
/// already taken in `registry`.
pub fn register_builtin(registry: &mut AgentRegistry) -> Result<()> {
    registry.register("random", |config: &Config| {
        Ok(Box::new(RandomAgent::from_config(config)?) as Box<dyn Agent>)
    })?;
    registry.register("rule_based", |config: &Config| {
        Ok(Box::new(RuleBasedAgent::from_config(config)) as Box<dyn Agent>)
    })?;
    Ok(())
}
