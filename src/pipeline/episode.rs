//! Single-episode interaction loop

use std::{thread, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Agent, Environment, ExperimentObserver},
    types::{AgentStats, Experience},
};

/// Per-episode statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// 1-based episode index
    pub episode: usize,
    /// Number of completed steps
    pub steps: usize,
    /// Sum of step rewards
    pub total_reward: f64,
    /// Whether the environment reported `done`
    pub terminated: bool,
    /// `info` of the terminal step, empty if the step cap was hit
    pub termination_reason: String,
    /// Agent metrics snapshot taken after the last step
    pub agent_stats: AgentStats,
}

/// Options for a single episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSettings {
    pub max_steps: usize,
    pub render: bool,
    /// Pause after each rendered frame
    pub frame_delay: Duration,
}

impl EpisodeSettings {
    pub fn new(max_steps: usize) -> Self {
        Self {
            max_steps,
            render: false,
            frame_delay: Duration::ZERO,
        }
    }

    pub fn with_render(mut self, render: bool, frame_delay: Duration) -> Self {
        self.render = render;
        self.frame_delay = frame_delay;
        self
    }
}

/// Run one episode from `reset` until `done` or `settings.max_steps`.
///
/// Each step renders (if enabled), asks the agent for an action, steps the
/// environment, notifies observers and hands the transition to
/// [`Agent::learn`]. No `step` call follows a step that reported `done`.
///
/// # Errors
///
/// Any agent, environment or observer error aborts the episode and is
/// returned as-is; no partial statistics are produced.
pub fn run_episode(
    episode: usize,
    agent: &mut dyn Agent,
    env: &mut dyn Environment,
    settings: &EpisodeSettings,
    observers: &mut [Box<dyn ExperimentObserver>],
) -> Result<EpisodeStats> {
    for observer in observers.iter_mut() {
        observer.on_episode_start(episode)?;
    }

    let mut stats = EpisodeStats {
        episode,
        ..EpisodeStats::default()
    };
    let mut state = env.reset()?;

    for step in 0..settings.max_steps {
        if settings.render {
            env.render()?;
            if !settings.frame_delay.is_zero() {
                thread::sleep(settings.frame_delay);
            }
        }

        let action = agent.act(&state)?;
        let result = env.step(action)?;

        let experience = Experience::new(
            state,
            action,
            result.reward,
            result.next_state.clone(),
            result.done,
        );
        for observer in observers.iter_mut() {
            observer.on_step(episode, step, &experience)?;
        }
        agent.learn(experience)?;

        stats.total_reward += result.reward;
        stats.steps = step + 1;
        state = result.next_state;

        if result.done {
            stats.terminated = true;
            stats.termination_reason = result.info;
            break;
        }
    }

    stats.agent_stats = agent.stats();
    tracing::trace!(
        episode,
        steps = stats.steps,
        reward = stats.total_reward,
        "episode finished"
    );
    Ok(stats)
}
