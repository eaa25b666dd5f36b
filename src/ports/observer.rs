//! Observer port - abstraction for experiment observation and reporting
//!
//! Observers receive experiment events without coupling the runner to a
//! particular output: progress bars, structured logs and JSON-lines exports
//! are all observers.

use crate::{
    Result,
    pipeline::{EpisodeStats, ExperimentSummary, ProgressReport},
    types::Experience,
};

/// Observer trait for monitoring experiments
///
/// # Event Sequence
///
/// 1. `on_experiment_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(episode, step, experience)` for each step
///    - `on_episode_end(stats)`
///    - `on_progress(report)` every `log_frequency` episodes
/// 3. `on_experiment_end(summary)` - once
///
/// Episode indices are 1-based, step indices 0-based. All methods default to
/// doing nothing.
pub trait ExperimentObserver: Send {
    fn on_experiment_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each environment step, before the agent learns from it.
    fn on_step(&mut self, _episode: usize, _step: usize, _experience: &Experience) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _stats: &EpisodeStats) -> Result<()> {
        Ok(())
    }

    /// Called at the logging cadence with the trailing moving average.
    fn on_progress(&mut self, _report: &ProgressReport) -> Result<()> {
        Ok(())
    }

    fn on_experiment_end(&mut self, _summary: &ExperimentSummary) -> Result<()> {
        Ok(())
    }
}
