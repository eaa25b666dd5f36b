//! Bang-bang controller for cart-pole style tasks

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    config::Config,
    ports::Agent,
    types::{Action, AgentStats, Experience},
};

/// Persisted parameters of a [`RuleBasedAgent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleBasedModel {
    pub max_force: f64,
    pub angle_index: usize,
}

/// Pushes with `+max_force` when the pole leans right and `-max_force`
/// otherwise. The rules are fixed; `learn` ignores experience.
///
/// Config keys: `max_force` (real, default 10.0), `angle_index` (int,
/// default 2, the position of the pole angle in the observation).
pub struct RuleBasedAgent {
    model: RuleBasedModel,
    training: bool,
    total_actions: u64,
    last_action: f64,
    left_actions: u64,
    right_actions: u64,
}

impl RuleBasedAgent {
    pub fn new(max_force: f64) -> Self {
        Self {
            model: RuleBasedModel {
                max_force,
                angle_index: 2,
            },
            training: true,
            total_actions: 0,
            last_action: 0.0,
            left_actions: 0,
            right_actions: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut agent = Self::new(config.get("max_force", 10.0));
        agent.model.angle_index = config.get("angle_index", 2usize);
        agent
    }

    pub fn model(&self) -> RuleBasedModel {
        self.model
    }
}

impl Default for RuleBasedAgent {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl Agent for RuleBasedAgent {
    fn act(&mut self, state: &[f64]) -> Result<Action> {
        let Some(&theta) = state.get(self.model.angle_index) else {
            // Observation too short to carry an angle
            self.last_action = 0.0;
            return Ok(0.0);
        };

        self.last_action = if theta > 0.0 {
            self.right_actions += 1;
            self.model.max_force
        } else {
            self.left_actions += 1;
            -self.model.max_force
        };
        self.total_actions += 1;
        Ok(self.last_action)
    }

    fn learn(&mut self, _experience: Experience) -> Result<()> {
        Ok(())
    }

    fn set_training_mode(&mut self, training: bool) {
        self.training = training;
    }

    fn is_training(&self) -> bool {
        self.training
    }

    fn stats(&self) -> AgentStats {
        vec![
            ("total_actions".to_string(), self.total_actions as f64),
            ("last_action".to_string(), self.last_action),
            ("left_actions".to_string(), self.left_actions as f64),
            ("right_actions".to_string(), self.right_actions as f64),
            ("max_force".to_string(), self.model.max_force),
        ]
    }

    fn name(&self) -> &str {
        "RuleBasedAgent"
    }

    fn description(&self) -> &str {
        "Simple bang-bang controller for CartPole based on pole angle"
    }

    fn save_model(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create model file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        rmp_serde::encode::write(&mut writer, &self.model).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize rule-based model to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        tracing::info!(path = %path.display(), "saved rule-based model");
        Ok(())
    }

    fn load_model(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open model file {path:?}"),
            source,
        })?;
        self.model = rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize rule-based model from MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(())
    }
}
