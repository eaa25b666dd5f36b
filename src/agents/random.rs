//! Uniform random baseline

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Error, Result,
    config::Config,
    ports::Agent,
    types::{Action, AgentStats, Experience},
};

/// Baseline agent that ignores the state and samples actions uniformly from
/// `[action_low, action_high]`.
///
/// Config keys: `action_low` (real, default -1.0), `action_high` (real,
/// default 1.0), `seed` (int, optional).
pub struct RandomAgent {
    action_low: f64,
    action_high: f64,
    rng: StdRng,
    training: bool,
    total_actions: u64,
    last_action: f64,
}

impl RandomAgent {
    /// Create a random agent over `[action_low, action_high]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the range is empty or not
    /// finite.
    pub fn new(action_low: f64, action_high: f64) -> Result<Self> {
        if !(action_low.is_finite() && action_high.is_finite()) || action_low > action_high {
            return Err(Error::InvalidConfiguration {
                message: format!("random agent needs action_low <= action_high, got [{action_low}, {action_high}]"),
            });
        }
        // Uniform sampling needs a finite span
        if !(action_high - action_low).is_finite() {
            return Err(Error::InvalidConfiguration {
                message: format!("random agent action range [{action_low}, {action_high}] is too wide"),
            });
        }
        Ok(Self {
            action_low,
            action_high,
            rng: StdRng::seed_from_u64(random()),
            training: true,
            total_actions: 0,
            last_action: 0.0,
        })
    }

    /// Build from configuration, applying `seed` when it holds a
    /// non-negative integer.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut agent = Self::new(
            config.get("action_low", -1.0),
            config.get("action_high", 1.0),
        )?;
        if let Some(seed) = config.get_opt::<u64>("seed") {
            agent.rng = StdRng::seed_from_u64(seed);
        }
        Ok(agent)
    }

    /// Deterministic variant for tests and reproducible baselines.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, _state: &[f64]) -> Result<Action> {
        let action = self.rng.random_range(self.action_low..=self.action_high);
        self.last_action = action;
        self.total_actions += 1;
        Ok(action)
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
            ("action_range_low".to_string(), self.action_low),
            ("action_range_high".to_string(), self.action_high),
        ]
    }

    fn name(&self) -> &str {
        "RandomAgent"
    }

    fn description(&self) -> &str {
        "Baseline agent that chooses actions uniformly at random"
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_stay_in_range() {
        let mut agent = RandomAgent::new(-2.0, 3.0).unwrap().with_seed(7);
        for _ in 0..200 {
            let action = agent.act(&[]).unwrap();
            assert!((-2.0..=3.0).contains(&action));
        }
        assert_eq!(agent.stats()[0], ("total_actions".to_string(), 200.0));
    }

    #[test]
    fn same_seed_same_actions() {
        let config = Config::new().with("seed", 11);
        let mut a = RandomAgent::from_config(&config).unwrap();
        let mut b = RandomAgent::from_config(&config).unwrap();
        for _ in 0..10 {
            assert_eq!(a.act(&[0.0]).unwrap(), b.act(&[0.0]).unwrap());
        }
    }

    #[test]
    fn mistyped_bounds_fall_back_to_defaults() {
        let config = Config::new().with("action_low", -5).with("action_high", "wide");
        let agent = RandomAgent::from_config(&config).unwrap();
        let stats = agent.stats();
        assert_eq!(stats[2].1, -1.0);
        assert_eq!(stats[3].1, 1.0);
    }

    #[test]
    fn overflowing_range_is_rejected() {
        let config = Config::new()
            .with("action_low", -1e308)
            .with("action_high", 1e308);
        assert!(matches!(
            RandomAgent::from_config(&config),
            Err(Error::InvalidConfiguration { .. })
        ));
        let mut widest = RandomAgent::new(-5e307, 5e307).unwrap().with_seed(1);
        assert!(widest.act(&[]).unwrap().is_finite());
    }

    #[test]
    fn invalid_seed_values_leave_agent_unseeded() {
        let zero = RandomAgent::from_config(&Config::new().with("seed", 0))
            .unwrap()
            .act(&[])
            .unwrap();
        for bad in [Config::new().with("seed", "abc"), Config::new().with("seed", -3)] {
            let draws: Vec<f64> = (0..4)
                .map(|_| RandomAgent::from_config(&bad).unwrap().act(&[]).unwrap())
                .collect();
            // Pinned to seed 0 every draw would equal `zero`
            assert!(draws.iter().any(|draw| *draw != zero));
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            RandomAgent::new(1.0, -1.0),
            Err(Error::InvalidConfiguration { .. })
        ));
    }
}
