//! Agent port - abstraction over decision-making policies
//!
//! Any policy that maps an observation to a scalar action can be plugged into
//! the harness by implementing [`Agent`]. The harness never sees the concrete
//! type; it only holds `Box<dyn Agent>`.

use std::path::Path;

use crate::{
    Result,
    types::{Action, AgentStats, Experience},
};

/// Agent trait - unified interface for all policies
///
/// Only [`act`](Agent::act), [`learn`](Agent::learn), the training-mode pair
/// and the identity accessors are required; everything else has a default.
///
/// # Examples
///
/// ```
/// use rlharness::{Result, ports::Agent, types::Experience};
///
/// struct Zero {
///     training: bool,
/// }
///
/// impl Agent for Zero {
///     fn act(&mut self, _state: &[f64]) -> Result<f64> {
///         Ok(0.0)
///     }
///
///     fn learn(&mut self, _experience: Experience) -> Result<()> {
///         Ok(())
///     }
///
///     fn set_training_mode(&mut self, training: bool) {
///         self.training = training;
///     }
///
///     fn is_training(&self) -> bool {
///         self.training
///     }
///
///     fn name(&self) -> &str {
///         "zero"
///     }
///
///     fn description(&self) -> &str {
///         "always pushes with zero force"
///     }
/// }
/// ```
pub trait Agent: Send {
    /// Choose an action for the current observation.
    ///
    /// # Errors
    ///
    /// Implementations may fail, e.g. on an observation of the wrong length.
    /// The episode loop propagates the error and aborts the run.
    fn act(&mut self, state: &[f64]) -> Result<Action>;

    /// Single-transition learning entry point.
    ///
    /// Called once per step by the episode loop, whether or not the agent is
    /// in training mode; agents check [`is_training`](Agent::is_training)
    /// themselves.
    fn learn(&mut self, experience: Experience) -> Result<()>;

    /// Learn from a whole trajectory.
    ///
    /// # Default Implementation
    ///
    /// Feeds each transition to [`learn`](Agent::learn) in order. Batch or
    /// episodic learners override this.
    fn learn_trajectory(&mut self, trajectory: &[Experience]) -> Result<()> {
        for experience in trajectory {
            self.learn(experience.clone())?;
        }
        Ok(())
    }

    /// Toggle whether learning updates are applied.
    fn set_training_mode(&mut self, training: bool);

    fn is_training(&self) -> bool;

    /// Clear per-episode state. Called after every episode.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Diagnostic counters, snapshotted at the end of each episode.
    fn stats(&self) -> AgentStats {
        Vec::new()
    }

    /// Stable, non-empty identifier used in logs and reports.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Persist learned parameters. No-op unless overridden.
    fn save_model(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Restore learned parameters. No-op unless overridden.
    fn load_model(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Seed the agent's internal random number generator.
    ///
    /// The experiment runner calls this when a deterministic seed is set.
    /// Stateless agents can ignore it.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
