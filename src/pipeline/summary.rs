//! Aggregate statistics over episodes

use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use super::EpisodeStats;
use crate::Result;

/// Upper bound on the moving-average window
pub const MOVING_AVERAGE_WINDOW: usize = 100;

/// Mean total reward of the last `window` episodes.
///
/// A window larger than the history uses the whole history; an empty history
/// or a zero window yields `0.0`.
pub fn moving_average(episodes: &[EpisodeStats], window: usize) -> f64 {
    let start = episodes.len().saturating_sub(window);
    let tail = &episodes[start..];
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().map(|stats| stats.total_reward).sum::<f64>() / tail.len() as f64
}

/// Snapshot emitted at the logging cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// The episode that triggered the report
    pub latest: EpisodeStats,
    /// Mean total reward over the trailing window
    pub moving_average: f64,
    /// Number of episodes in the window
    pub window: usize,
}

impl ProgressReport {
    /// Report on the last episode in `history`, using a window of
    /// `min(100, history.len())`. Returns `None` for an empty history.
    pub fn from_history(history: &[EpisodeStats]) -> Option<Self> {
        let latest = history.last()?.clone();
        let window = history.len().min(MOVING_AVERAGE_WINDOW);
        Some(Self {
            latest,
            moving_average: moving_average(history, window),
            window,
        })
    }
}

/// End-of-run summary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub total_episodes: usize,
    pub mean_reward: f64,
    pub mean_steps: f64,
    /// Fraction of episodes whose `terminated` flag was set
    pub termination_rate: f64,
    /// Population standard deviation of total rewards
    pub reward_std_dev: f64,
    pub min_reward: f64,
    pub max_reward: f64,
}

impl ExperimentSummary {
    /// Summarize `episodes`. An empty slice yields an all-zero summary.
    pub fn from_episodes(episodes: &[EpisodeStats]) -> Self {
        if episodes.is_empty() {
            return Self::default();
        }

        let rewards: Vec<f64> = episodes.iter().map(|stats| stats.total_reward).collect();
        let steps: Vec<f64> = episodes.iter().map(|stats| stats.steps as f64).collect();
        let terminated = episodes.iter().filter(|stats| stats.terminated).count();

        Self {
            total_episodes: episodes.len(),
            mean_reward: rewards.iter().mean(),
            mean_steps: steps.iter().mean(),
            termination_rate: terminated as f64 / episodes.len() as f64,
            reward_std_dev: rewards.iter().population_std_dev(),
            min_reward: rewards.iter().copied().fold(f64::INFINITY, f64::min),
            max_reward: rewards.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Save summary to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load summary from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let summary = serde_json::from_reader(file)?;
        Ok(summary)
    }
}
