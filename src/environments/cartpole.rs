//! Cart-pole balancing task with classic analytic dynamics
//!
//! A pole is hinged on a cart moving along a frictionless track. The agent
//! applies a horizontal force to the cart and earns `1.0` per step while the
//! pole stays within the angle limit and the cart stays on the track.
//!
//! The observation is `[x, x_dot, theta, theta_dot]`.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Error, Result,
    config::Config,
    ports::Environment,
    types::{Action, State, StepResult},
};

const GRAVITY: f64 = 9.8;
const CART_MASS: f64 = 1.0;
const POLE_MASS: f64 = 0.1;
const TOTAL_MASS: f64 = CART_MASS + POLE_MASS;
/// Half the pole's length
const POLE_HALF_LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = POLE_MASS * POLE_HALF_LENGTH;
/// Seconds between state updates
const TAU: f64 = 0.02;
/// Initial state components are drawn from `[-INIT_SPREAD, INIT_SPREAD]`
const INIT_SPREAD: f64 = 0.05;

pub const TIME_LIMIT: &str = "TimeLimit";
pub const TERMINATED: &str = "Terminated";

/// Tunable parameters of [`CartPoleEnv`].
#[derive(Debug, Clone, PartialEq)]
pub struct CartPoleSettings {
    pub max_force: f64,
    pub x_threshold: f64,
    pub theta_threshold_radians: f64,
    pub max_episode_steps: usize,
    pub render: bool,
}

impl Default for CartPoleSettings {
    fn default() -> Self {
        Self {
            max_force: 10.0,
            x_threshold: 2.4,
            theta_threshold_radians: 12.0 * PI / 180.0,
            max_episode_steps: 500,
            render: false,
        }
    }
}

impl CartPoleSettings {
    /// Read settings from `config`, keeping defaults for absent keys.
    ///
    /// Keys: `max_force`, `x_threshold`, `theta_threshold_degrees` (reals),
    /// `max_episode_steps` (int), `render` (bool).
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            max_force: config.get("max_force", defaults.max_force),
            x_threshold: config.get("x_threshold", defaults.x_threshold),
            theta_threshold_radians: config
                .get("theta_threshold_degrees", defaults.theta_threshold_radians.to_degrees())
                .to_radians(),
            max_episode_steps: config.get("max_episode_steps", defaults.max_episode_steps),
            render: config.get("render", defaults.render),
        }
    }

    fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.max_force)
            || !positive(self.x_threshold)
            || !positive(self.theta_threshold_radians)
        {
            return Err(Error::InvalidConfiguration {
                message: format!("cart-pole limits must be positive and finite: {self:?}"),
            });
        }
        if self.max_episode_steps == 0 {
            return Err(Error::InvalidConfiguration {
                message: "cart-pole max_episode_steps must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Self-contained cart-pole environment.
pub struct CartPoleEnv {
    settings: CartPoleSettings,
    state: [f64; 4],
    current_step: usize,
    rng: StdRng,
    closed: bool,
    renders: u64,
}

impl CartPoleEnv {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for non-positive limits.
    pub fn new(settings: CartPoleSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            state: [0.0; 4],
            current_step: 0,
            rng: StdRng::seed_from_u64(random()),
            closed: false,
            renders: 0,
        })
    }

    /// Build from configuration, honouring an optional `seed` key. A seed
    /// that is not a non-negative integer is ignored.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut env = Self::new(CartPoleSettings::from_config(config))?;
        if let Some(seed) = config.get_opt::<u64>("seed") {
            env.rng = StdRng::seed_from_u64(seed);
        }
        Ok(env)
    }

    pub fn settings(&self) -> &CartPoleSettings {
        &self.settings
    }

    /// Steps taken since the last reset.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Frames drawn since construction.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Overwrite the physical state, e.g. to set up a specific scenario.
    pub fn set_state(&mut self, state: [f64; 4]) {
        self.state = state;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::EnvironmentClosed {
                environment: self.name().to_string(),
            });
        }
        Ok(())
    }

    fn failed(&self) -> bool {
        let [x, _, theta, _] = self.state;
        x.abs() > self.settings.x_threshold || theta.abs() > self.settings.theta_threshold_radians
    }

    /// Explicit Euler update of the cart-pole equations of motion.
    fn integrate(&mut self, force: f64) {
        let [x, x_dot, theta, theta_dot] = self.state;
        let (sin, cos) = theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin - cos * temp)
            / (POLE_HALF_LENGTH * (4.0 / 3.0 - POLE_MASS * cos * cos / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos / TOTAL_MASS;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
    }
}

impl Environment for CartPoleEnv {
    fn reset(&mut self) -> Result<State> {
        self.ensure_open()?;
        for component in &mut self.state {
            *component = self.rng.random_range(-INIT_SPREAD..=INIT_SPREAD);
        }
        self.current_step = 0;
        Ok(self.state.to_vec())
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        self.ensure_open()?;
        let force = self.clip_action(action);
        self.integrate(force);
        self.current_step += 1;

        let next_state = self.state.to_vec();
        let time_limit = self.current_step >= self.settings.max_episode_steps;
        if time_limit {
            return Ok(StepResult::terminal(next_state, 1.0, TIME_LIMIT));
        }
        if self.failed() {
            return Ok(StepResult::terminal(next_state, 0.0, TERMINATED));
        }
        Ok(StepResult::running(next_state, 1.0))
    }

    fn render(&mut self) -> Result<()> {
        if !self.settings.render || self.closed {
            return Ok(());
        }
        self.renders += 1;
        let [x, _, theta, _] = self.state;
        tracing::info!(
            step = self.current_step,
            cart_position = %format!("{x:.3}"),
            pole_angle_deg = %format!("{:.1}", theta.to_degrees()),
            "cartpole"
        );
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            tracing::debug!(renders = self.renders, "closing cartpole environment");
            self.closed = true;
        }
    }

    fn observation_space_size(&self) -> usize {
        4
    }

    fn action_space_size(&self) -> usize {
        1
    }

    fn observation_space_low(&self) -> Vec<f64> {
        self.observation_space_high().into_iter().map(|v| -v).collect()
    }

    fn observation_space_high(&self) -> Vec<f64> {
        vec![
            self.settings.x_threshold * 2.0,
            f64::INFINITY,
            self.settings.theta_threshold_radians * 2.0,
            f64::INFINITY,
        ]
    }

    fn action_space_low(&self) -> f64 {
        -self.settings.max_force
    }

    fn action_space_high(&self) -> f64 {
        self.settings.max_force
    }

    fn name(&self) -> &str {
        "CartPole"
    }

    fn description(&self) -> &str {
        "Classic cart-pole balancing task with analytic dynamics"
    }

    fn current_state(&self) -> State {
        self.state.to_vec()
    }

    fn set_render_mode(&mut self, render: bool) {
        self.settings.render = render;
    }

    fn seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

impl Drop for CartPoleEnv {
    fn drop(&mut self) {
        self.close();
    }
}
