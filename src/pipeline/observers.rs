//! Observer implementations for experiment runs
//!
//! Observers allow composable data collection during experiments without
//! coupling the runner to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::{EpisodeStats, ExperimentSummary, ProgressReport};
use crate::{Error, Result, ports::ExperimentObserver, types::Experience};

/// Observation of a single step during an episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepObservation {
    /// 0-based step index within the episode
    pub step: usize,
    pub state: Vec<f64>,
    pub action: f64,
    pub reward: f64,
    pub done: bool,
}

/// Complete observation of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeObservation {
    pub episode: usize,
    pub total_reward: f64,
    pub terminated: bool,
    pub termination_reason: String,
    pub agent_stats: Vec<(String, f64)>,
    /// Empty unless step recording is enabled
    pub steps: Vec<StepObservation>,
}

/// Progress bar observer - Shows experiment progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    moving_average: f64,
    terminated: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            moving_average: 0.0,
            terminated: 0,
        }
    }

    fn message(&self) -> String {
        format!("avg {:.2}, done {}", self.moving_average, self.terminated)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperimentObserver for ProgressObserver {
    fn on_experiment_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, stats: &EpisodeStats) -> Result<()> {
        if stats.terminated {
            self.terminated += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(stats.episode as u64);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_progress(&mut self, report: &ProgressReport) -> Result<()> {
        self.moving_average = report.moving_average;
        Ok(())
    }

    fn on_experiment_end(&mut self, _summary: &ExperimentSummary) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks running experiment metrics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    episodes: usize,
    total_steps: usize,
    terminated: usize,
    rewards: Vec<f64>,
    best: Option<(usize, f64)>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Fraction of observed episodes that ended with `done`
    pub fn termination_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.terminated as f64 / self.episodes as f64
        }
    }

    pub fn average_steps(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.episodes as f64
        }
    }

    /// Total reward of every observed episode, in order
    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    /// `(episode, total_reward)` of the highest-scoring episode
    pub fn best_episode(&self) -> Option<(usize, f64)> {
        self.best
    }
}

impl ExperimentObserver for MetricsObserver {
    fn on_episode_end(&mut self, stats: &EpisodeStats) -> Result<()> {
        self.episodes += 1;
        self.total_steps += stats.steps;
        if stats.terminated {
            self.terminated += 1;
        }
        self.rewards.push(stats.total_reward);
        if self.best.is_none_or(|(_, best)| stats.total_reward > best) {
            self.best = Some((stats.episode, stats.total_reward));
        }
        Ok(())
    }
}

/// JSONL observer - Exports one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    record_steps: bool,
    current_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing episode summaries to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            record_steps: false,
            current_steps: Vec::new(),
        })
    }

    /// Also record every transition of each episode
    pub fn with_steps(mut self) -> Self {
        self.record_steps = true;
        self
    }
}

impl ExperimentObserver for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, step: usize, experience: &Experience) -> Result<()> {
        if self.record_steps {
            self.current_steps.push(StepObservation {
                step,
                state: experience.state.clone(),
                action: experience.action,
                reward: experience.reward,
                done: experience.done,
            });
        }
        Ok(())
    }

    fn on_episode_end(&mut self, stats: &EpisodeStats) -> Result<()> {
        let observation = EpisodeObservation {
            episode: stats.episode,
            total_reward: stats.total_reward,
            terminated: stats.terminated,
            termination_reason: stats.termination_reason.clone(),
            agent_stats: stats.agent_stats.clone(),
            steps: std::mem::take(&mut self.current_steps),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, io::BufRead};

    use tempfile::TempDir;

    use super::*;

    fn stats(episode: usize, steps: usize, reward: f64, terminated: bool) -> EpisodeStats {
        EpisodeStats {
            episode,
            steps,
            total_reward: reward,
            terminated,
            ..EpisodeStats::default()
        }
    }

    #[test]
    fn test_metrics_observer() {
        let mut observer = MetricsObserver::new();
        assert_eq!(observer.termination_rate(), 0.0);
        assert_eq!(observer.best_episode(), None);

        observer.on_episode_end(&stats(1, 10, 10.0, true)).unwrap();
        observer.on_episode_end(&stats(2, 30, 30.0, false)).unwrap();
        observer.on_episode_end(&stats(3, 20, 20.0, true)).unwrap();

        assert_eq!(observer.episodes(), 3);
        assert_eq!(observer.total_steps(), 60);
        assert_eq!(observer.average_steps(), 20.0);
        assert!((observer.termination_rate() - 0.666).abs() < 0.01);
        assert_eq!(observer.best_episode(), Some((2, 30.0)));
        assert_eq!(observer.rewards(), &[10.0, 30.0, 20.0]);
    }

    #[test]
    fn jsonl_writes_one_line_per_episode() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("episodes.jsonl");

        let mut observer = JsonlObserver::new(&path).unwrap().with_steps();
        observer.on_episode_start(1).unwrap();
        let experience = Experience::new(vec![0.0], 1.0, 0.5, vec![0.1], true);
        observer.on_step(1, 0, &experience).unwrap();
        observer.on_episode_end(&stats(1, 1, 0.5, true)).unwrap();
        observer.on_episode_start(2).unwrap();
        observer.on_episode_end(&stats(2, 0, 0.0, false)).unwrap();

        let file = fs::File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|line| line.unwrap())
            .collect();
        assert_eq!(lines.len(), 2);

        let first: EpisodeObservation = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first.steps.len(), 1);
        assert_eq!(first.steps[0].action, 1.0);
        let second: EpisodeObservation = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second.episode, 2);
        assert!(second.steps.is_empty());
    }

    #[test]
    fn jsonl_skips_steps_unless_enabled() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("episodes.jsonl");

        let mut observer = JsonlObserver::new(&path).unwrap();
        observer.on_episode_start(1).unwrap();
        let experience = Experience::new(vec![0.0], 1.0, 0.5, vec![0.1], true);
        observer.on_step(1, 0, &experience).unwrap();
        observer.on_episode_end(&stats(1, 1, 0.5, true)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let observation: EpisodeObservation = serde_json::from_str(contents.trim()).unwrap();
        assert!(observation.steps.is_empty());
    }
}
