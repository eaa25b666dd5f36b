//! Core value types exchanged between agents, environments and the harness.

use serde::{Deserialize, Serialize};

/// Observation vector. Its length is fixed for a given environment instance.
pub type State = Vec<f64>;

/// Scalar control signal, bounded by the environment's declared action range.
pub type Action = f64;

/// Scalar reward. Sign and scale are environment-defined.
pub type Reward = f64;

/// One transition `(state, action, reward, next_state, done)`.
///
/// Built by the episode loop for every step and handed to
/// [`Agent::learn`](crate::ports::Agent::learn) by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub state: State,
    pub action: Action,
    pub reward: Reward,
    pub next_state: State,
    pub done: bool,
}

impl Experience {
    pub fn new(state: State, action: Action, reward: Reward, next_state: State, done: bool) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }
}

/// Result of advancing an environment by one control step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Observation after the step
    pub next_state: State,
    /// Reward earned by the step
    pub reward: Reward,
    /// Whether the episode has ended
    pub done: bool,
    /// Free-form termination detail, e.g. `"TimeLimit"` or `"Terminated"`
    pub info: String,
}

impl StepResult {
    /// A non-terminal step.
    pub fn running(next_state: State, reward: Reward) -> Self {
        Self {
            next_state,
            reward,
            done: false,
            info: String::new(),
        }
    }

    /// A terminal step carrying a termination reason.
    pub fn terminal(next_state: State, reward: Reward, info: impl Into<String>) -> Self {
        Self {
            next_state,
            reward,
            done: true,
            info: info.into(),
        }
    }
}

/// Ordered diagnostic counters reported by an agent.
pub type AgentStats = Vec<(String, f64)>;
