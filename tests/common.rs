//! Common test utilities for the rlharness test suite.
//!
//! This module provides scripted agents and environments that record every
//! call into a shared [`CallLog`], so tests can assert on the exact protocol
//! the harness follows.

#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use rlharness::{
    Agent, Environment, Error, Result,
    app::App,
    config::Config,
    types::{Action, AgentStats, Experience, State, StepResult},
};

/// Everything the stubs observed
#[derive(Debug, Default)]
pub struct CallLog {
    pub act_calls: usize,
    pub learned: Vec<Experience>,
    pub agent_resets: usize,
    pub training_modes: Vec<bool>,
    pub agent_seed: Option<u64>,
    pub saved_models: Vec<PathBuf>,

    pub env_resets: usize,
    pub env_steps: usize,
    pub steps_after_done: usize,
    pub renders: usize,
    pub closes: usize,
    pub env_seed: Option<u64>,
    pub render_mode: bool,
}

/// Shared handle to a [`CallLog`]
#[derive(Debug, Clone, Default)]
pub struct Probe(Arc<Mutex<CallLog>>);

impl Probe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> MutexGuard<'_, CallLog> {
        self.0.lock().unwrap()
    }
}

/// Agent that always returns the same action
pub struct ConstantAgent {
    probe: Probe,
    action: f64,
    training: bool,
}

impl ConstantAgent {
    pub fn new(probe: Probe, action: f64) -> Self {
        Self {
            probe,
            action,
            training: true,
        }
    }
}

impl Agent for ConstantAgent {
    fn act(&mut self, _state: &[f64]) -> Result<Action> {
        self.probe.log().act_calls += 1;
        Ok(self.action)
    }

    fn learn(&mut self, experience: Experience) -> Result<()> {
        self.probe.log().learned.push(experience);
        Ok(())
    }

    fn set_training_mode(&mut self, training: bool) {
        self.training = training;
        self.probe.log().training_modes.push(training);
    }

    fn is_training(&self) -> bool {
        self.training
    }

    fn reset(&mut self) -> Result<()> {
        self.probe.log().agent_resets += 1;
        Ok(())
    }

    fn stats(&self) -> AgentStats {
        vec![("act_calls".to_string(), self.probe.log().act_calls as f64)]
    }

    fn name(&self) -> &str {
        "ConstantAgent"
    }

    fn description(&self) -> &str {
        "always returns the same action"
    }

    fn save_model(&self, path: &Path) -> Result<()> {
        self.probe.log().saved_models.push(path.to_path_buf());
        Ok(())
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.probe.log().agent_seed = Some(seed);
        Ok(())
    }
}

/// Environment with a scripted episode length
pub struct ScriptedEnv {
    probe: Probe,
    /// Step (1-based within the episode) that reports `done`; `None` never ends
    pub done_at: Option<usize>,
    pub reward: f64,
    pub info: String,
    /// Global step count (1-based) whose `step` call fails
    pub fail_at_step: Option<usize>,
    /// Ask to stop once this many episodes have been reset
    pub stop_after_resets: Option<usize>,
    episode_step: usize,
    finished: bool,
    closed: bool,
}

impl ScriptedEnv {
    pub fn new(probe: Probe, done_at: Option<usize>, reward: f64) -> Self {
        Self {
            probe,
            done_at,
            reward,
            info: "Terminated".to_string(),
            fail_at_step: None,
            stop_after_resets: None,
            episode_step: 0,
            finished: false,
            closed: false,
        }
    }
}

impl Environment for ScriptedEnv {
    fn reset(&mut self) -> Result<State> {
        self.probe.log().env_resets += 1;
        self.episode_step = 0;
        self.finished = false;
        Ok(vec![0.0, 0.0])
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        let mut log = self.probe.log();
        log.env_steps += 1;
        if self.finished {
            log.steps_after_done += 1;
        }
        if self.fail_at_step == Some(log.env_steps) {
            return Err(Error::Environment {
                environment: "scripted".to_string(),
                message: "scripted failure".to_string(),
            });
        }
        drop(log);

        self.episode_step += 1;
        let next_state = vec![self.episode_step as f64, self.clip_action(action)];
        if self.done_at.is_some_and(|done_at| self.episode_step >= done_at) {
            self.finished = true;
            return Ok(StepResult::terminal(next_state, self.reward, self.info.clone()));
        }
        Ok(StepResult::running(next_state, self.reward))
    }

    fn render(&mut self) -> Result<()> {
        self.probe.log().renders += 1;
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.probe.log().closes += 1;
        }
    }

    fn observation_space_size(&self) -> usize {
        2
    }

    fn action_space_size(&self) -> usize {
        1
    }

    fn observation_space_low(&self) -> Vec<f64> {
        vec![0.0, -1.0]
    }

    fn observation_space_high(&self) -> Vec<f64> {
        vec![f64::INFINITY, 1.0]
    }

    fn action_space_low(&self) -> f64 {
        -1.0
    }

    fn action_space_high(&self) -> f64 {
        1.0
    }

    fn name(&self) -> &str {
        "ScriptedEnv"
    }

    fn description(&self) -> &str {
        "episode length and rewards fixed in advance"
    }

    fn current_state(&self) -> State {
        vec![self.episode_step as f64, 0.0]
    }

    fn set_render_mode(&mut self, render: bool) {
        self.probe.log().render_mode = render;
    }

    fn stop_requested(&self) -> bool {
        self.stop_after_resets
            .is_some_and(|limit| self.probe.log().env_resets >= limit)
    }

    fn seed(&mut self, seed: u64) -> Result<()> {
        self.probe.log().env_seed = Some(seed);
        Ok(())
    }
}

/// App with only the stubs registered: agent `"constant"` and environment
/// `"scripted"`. The environment reads `done_at` and `reward` from its config.
pub fn stub_app(probe: &Probe) -> App {
    let agent_probe = probe.clone();
    let env_probe = probe.clone();
    App::for_testing()
        .without_builtins()
        .with_agent("constant", move |config: &Config| {
            Ok(Box::new(ConstantAgent::new(
                agent_probe.clone(),
                config.get("action", 0.0),
            )) as Box<dyn Agent>)
        })
        .with_environment("scripted", move |config: &Config| {
            let done_at = config.get::<usize>("done_at", 0);
            Ok(Box::new(ScriptedEnv::new(
                env_probe.clone(),
                (done_at > 0).then_some(done_at),
                config.get("reward", 1.0),
            )) as Box<dyn Environment>)
        })
        .build()
        .unwrap()
}
