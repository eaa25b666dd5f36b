//! Environment port - abstraction over stateful simulators
//!
//! External engines (physics, rendering) are wrapped behind this trait. The
//! wrapper is responsible for clipping actions to its declared bounds before
//! forwarding them, which [`Environment::clip_action`] does for it.

use crate::{
    Result,
    types::{Action, State, StepResult},
};

/// Environment trait - Gym-style reset/step/render/close plus space metadata
pub trait Environment: Send {
    /// Start a new episode and return the initial observation.
    fn reset(&mut self) -> Result<State>;

    /// Advance one control step.
    ///
    /// The action must be clipped to
    /// `[action_space_low(), action_space_high()]` before use.
    fn step(&mut self, action: Action) -> Result<StepResult>;

    /// Best-effort visualization. A no-op when rendering is disabled.
    fn render(&mut self) -> Result<()>;

    /// Release resources.
    ///
    /// Must be idempotent and must not fail, including after a partially
    /// failed construction.
    fn close(&mut self);

    fn observation_space_size(&self) -> usize;

    fn action_space_size(&self) -> usize;

    fn observation_space_low(&self) -> Vec<f64>;

    fn observation_space_high(&self) -> Vec<f64>;

    fn action_space_low(&self) -> f64;

    fn action_space_high(&self) -> f64;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Current observation, without stepping.
    fn current_state(&self) -> State;

    /// Enable or disable rendering at runtime.
    fn set_render_mode(&mut self, _render: bool) {}

    /// Whether an outside party (e.g. a user closing a viewer) asked the run
    /// to stop. Checked by the experiment runner before every episode.
    fn stop_requested(&self) -> bool {
        false
    }

    /// Seed the environment's initial-state sampler.
    fn seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Clip an action into the declared action bounds.
    ///
    /// NaN actions map to the lower bound.
    fn clip_action(&self, action: Action) -> Action {
        let low = self.action_space_low();
        let high = self.action_space_high();
        if action.is_nan() {
            return low;
        }
        action.max(low).min(high)
    }
}
