//! Multi-episode experiment controller

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use super::{
    episode::{EpisodeSettings, EpisodeStats, run_episode},
    summary::{ExperimentSummary, ProgressReport},
};
use crate::{
    Result,
    config::Config,
    export,
    ports::{Agent, Environment, ExperimentObserver},
};

/// Pause after each rendered frame unless configured otherwise (~60 FPS)
pub const DEFAULT_FRAME_DELAY_MS: u64 = 16;

/// Experiment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Number of episodes to run
    pub num_episodes: usize,

    /// Step cap per episode
    pub max_steps_per_episode: usize,

    /// Global rendering switch
    pub render: bool,

    /// Render every n-th episode (0-based index); 0 disables rendering
    pub render_frequency: usize,

    /// Report progress every n episodes; 0 disables progress reports
    pub log_frequency: usize,

    /// Where to write the CSV episode log, if anywhere
    pub log_file: Option<PathBuf>,

    /// Whether to call the agent's save hook after the run
    pub save_model: bool,

    /// Destination for the save hook
    pub model_save_path: PathBuf,

    /// Seed for the environment (`seed`) and agent (`seed + 1`)
    pub seed: Option<u64>,

    /// Training mode applied to the agent before the first episode
    pub training: bool,

    /// Pause after each rendered frame
    pub frame_delay: Duration,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            num_episodes: 1000,
            max_steps_per_episode: 1000,
            render: false,
            render_frequency: 10,
            log_frequency: 100,
            log_file: Some(PathBuf::from("experiment.log")),
            save_model: false,
            model_save_path: PathBuf::from("model.bin"),
            seed: None,
            training: true,
            frame_delay: Duration::from_millis(DEFAULT_FRAME_DELAY_MS),
        }
    }
}

impl ExperimentConfig {
    /// Read the experiment keys from `config`, falling back to defaults for
    /// absent or mistyped keys. An empty `log_file` disables the CSV log.
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        let log_file = config.get_str("log_file", "experiment.log");
        Self {
            num_episodes: config.get("num_episodes", defaults.num_episodes),
            max_steps_per_episode: config
                .get("max_steps_per_episode", defaults.max_steps_per_episode),
            render: config.get("render", defaults.render),
            render_frequency: config.get("render_frequency", defaults.render_frequency),
            log_frequency: config.get("log_frequency", defaults.log_frequency),
            log_file: (!log_file.is_empty()).then(|| PathBuf::from(log_file)),
            save_model: config.get("save_model", defaults.save_model),
            model_save_path: PathBuf::from(config.get_str("model_save_path", "model.bin")),
            seed: config.get_opt("seed"),
            training: config.get("training", defaults.training),
            frame_delay: Duration::from_millis(
                config.get("frame_delay_ms", DEFAULT_FRAME_DELAY_MS),
            ),
        }
    }

    /// Whether the episode with 0-based index `index` is rendered.
    pub fn should_render(&self, index: usize) -> bool {
        self.render && self.render_frequency > 0 && index % self.render_frequency == 0
    }

    /// Whether a progress report follows the episode with 0-based index
    /// `index`.
    pub fn should_log(&self, index: usize) -> bool {
        self.log_frequency > 0 && (index + 1) % self.log_frequency == 0
    }

    fn episode_settings(&self, index: usize) -> EpisodeSettings {
        EpisodeSettings::new(self.max_steps_per_episode)
            .with_render(self.should_render(index), self.frame_delay)
    }
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// Stats of every completed episode, in order
    pub episodes: Vec<EpisodeStats>,
    /// Progress reports emitted at the logging cadence
    pub progress: Vec<ProgressReport>,
    pub summary: ExperimentSummary,
    /// Whether the environment asked to stop before all episodes ran
    pub stopped_early: bool,
}

/// Runs episodes of one agent in one environment.
///
/// The runner owns both and closes the environment when it is dropped.
pub struct ExperimentRunner {
    env: Box<dyn Environment>,
    agent: Box<dyn Agent>,
    observers: Vec<Box<dyn ExperimentObserver>>,
}

impl ExperimentRunner {
    pub fn new(env: Box<dyn Environment>, agent: Box<dyn Agent>) -> Self {
        Self {
            env,
            agent,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the runner
    pub fn with_observer(mut self, observer: Box<dyn ExperimentObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn ExperimentObserver>) {
        self.observers.push(observer);
    }

    pub fn agent(&self) -> &dyn Agent {
        self.agent.as_ref()
    }

    pub fn agent_mut(&mut self) -> &mut dyn Agent {
        self.agent.as_mut()
    }

    pub fn environment(&self) -> &dyn Environment {
        self.env.as_ref()
    }

    pub fn environment_mut(&mut self) -> &mut dyn Environment {
        self.env.as_mut()
    }

    /// Run `config.num_episodes` episodes.
    ///
    /// # Errors
    ///
    /// The first agent, environment or observer error aborts the run. Writing
    /// the episode log and the model save hook are fallible as well.
    pub fn run(&mut self, config: &ExperimentConfig) -> Result<ExperimentReport> {
        self.seed(config.seed)?;
        self.agent.set_training_mode(config.training);
        if config.render {
            self.env.set_render_mode(true);
        }

        tracing::info!(
            episodes = config.num_episodes,
            environment = self.env.name(),
            agent = self.agent.name(),
            training = config.training,
            "starting experiment"
        );
        for observer in &mut self.observers {
            observer.on_experiment_start(config.num_episodes)?;
        }

        let mut episodes = Vec::with_capacity(config.num_episodes);
        let mut progress = Vec::new();
        let mut stopped_early = false;

        for index in 0..config.num_episodes {
            if self.env.stop_requested() {
                tracing::warn!(
                    completed = episodes.len(),
                    "environment requested stop, ending experiment early"
                );
                stopped_early = true;
                break;
            }

            let stats = run_episode(
                index + 1,
                self.agent.as_mut(),
                self.env.as_mut(),
                &config.episode_settings(index),
                &mut self.observers,
            )?;
            for observer in &mut self.observers {
                observer.on_episode_end(&stats)?;
            }
            episodes.push(stats);

            if config.should_log(index)
                && let Some(report) = ProgressReport::from_history(&episodes)
            {
                log_progress(&report);
                for observer in &mut self.observers {
                    observer.on_progress(&report)?;
                }
                progress.push(report);
            }

            self.agent.reset()?;
        }

        let summary = ExperimentSummary::from_episodes(&episodes);
        log_summary(&summary);
        for observer in &mut self.observers {
            observer.on_experiment_end(&summary)?;
        }

        if let Some(path) = &config.log_file {
            export::write_episode_log(path, &episodes)?;
            tracing::info!(path = %path.display(), "episode log written");
        }

        if config.save_model && !config.model_save_path.as_os_str().is_empty() {
            self.agent.save_model(&config.model_save_path)?;
            tracing::info!(path = %config.model_save_path.display(), "model saved");
        }

        Ok(ExperimentReport {
            episodes,
            progress,
            summary,
            stopped_early,
        })
    }

    /// Load an experiment configuration file and run it.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, or if the run fails.
    pub fn run_from_config_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ExperimentReport> {
        let config = Config::from_file(path)?;
        self.run(&ExperimentConfig::from_config(&config))
    }

    /// Run one ad-hoc episode, numbered 1, without touching training mode or
    /// seeds.
    pub fn run_single_episode(&mut self, max_steps: usize, render: bool) -> Result<EpisodeStats> {
        if render {
            self.env.set_render_mode(true);
        }
        let settings = EpisodeSettings::new(max_steps)
            .with_render(render, Duration::from_millis(DEFAULT_FRAME_DELAY_MS));
        let stats = run_episode(
            1,
            self.agent.as_mut(),
            self.env.as_mut(),
            &settings,
            &mut self.observers,
        )?;
        for observer in &mut self.observers {
            observer.on_episode_end(&stats)?;
        }
        Ok(stats)
    }

    /// Close the environment. Safe to call more than once.
    pub fn close(&mut self) {
        self.env.close();
    }

    fn seed(&mut self, seed: Option<u64>) -> Result<()> {
        if let Some(seed) = seed {
            self.env.seed(seed)?;
            self.agent.set_rng_seed(seed.wrapping_add(1))?;
        }
        Ok(())
    }
}

impl Drop for ExperimentRunner {
    fn drop(&mut self) {
        self.env.close();
    }
}

fn log_progress(report: &ProgressReport) {
    let stats = &report.latest;
    tracing::info!(
        episode = stats.episode,
        steps = stats.steps,
        reward = %format!("{:.2}", stats.total_reward),
        terminated = stats.terminated,
        reason = %stats.termination_reason,
        "episode complete"
    );
    tracing::info!(
        window = report.window,
        moving_average = %format!("{:.2}", report.moving_average),
        "moving average"
    );
}

fn log_summary(summary: &ExperimentSummary) {
    tracing::info!(
        total_episodes = summary.total_episodes,
        mean_reward = %format!("{:.2}", summary.mean_reward),
        mean_steps = %format!("{:.1}", summary.mean_steps),
        termination_rate = %format!("{:.1}%", summary.termination_rate * 100.0),
        "experiment summary"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_config() {
        assert_eq!(ExperimentConfig::from_config(&Config::new()), ExperimentConfig::default());
    }

    #[test]
    fn reads_every_key() {
        let config = Config::new()
            .with("num_episodes", 5)
            .with("max_steps_per_episode", 20)
            .with("render", true)
            .with("render_frequency", 2)
            .with("log_frequency", 1)
            .with("log_file", "")
            .with("save_model", true)
            .with("model_save_path", "out/model.msgpack")
            .with("seed", 9)
            .with("training", false)
            .with("frame_delay_ms", 0);

        let experiment = ExperimentConfig::from_config(&config);
        assert_eq!(experiment.num_episodes, 5);
        assert_eq!(experiment.max_steps_per_episode, 20);
        assert!(experiment.render);
        assert_eq!(experiment.render_frequency, 2);
        assert_eq!(experiment.log_frequency, 1);
        assert_eq!(experiment.log_file, None);
        assert!(experiment.save_model);
        assert_eq!(experiment.model_save_path, PathBuf::from("out/model.msgpack"));
        assert_eq!(experiment.seed, Some(9));
        assert!(!experiment.training);
        assert_eq!(experiment.frame_delay, Duration::ZERO);
    }

    #[test]
    fn negative_seed_is_ignored() {
        let experiment = ExperimentConfig::from_config(&Config::new().with("seed", -3));
        assert_eq!(experiment.seed, None);
    }

    #[test]
    fn render_cadence_uses_zero_based_index() {
        let config = ExperimentConfig {
            render: true,
            render_frequency: 3,
            ..ExperimentConfig::default()
        };
        let rendered: Vec<usize> = (0..7).filter(|&i| config.should_render(i)).collect();
        assert_eq!(rendered, vec![0, 3, 6]);

        let disabled = ExperimentConfig {
            render: true,
            render_frequency: 0,
            ..ExperimentConfig::default()
        };
        assert!(!disabled.should_render(0));
        assert!(!ExperimentConfig::default().should_render(0));
    }

    #[test]
    fn log_cadence_counts_completed_episodes() {
        let config = ExperimentConfig {
            log_frequency: 2,
            ..ExperimentConfig::default()
        };
        let logged: Vec<usize> = (0..6).filter(|&i| config.should_log(i)).collect();
        assert_eq!(logged, vec![1, 3, 5]);

        let disabled = ExperimentConfig {
            log_frequency: 0,
            ..ExperimentConfig::default()
        };
        assert!(!disabled.should_log(0));
    }
}
