//! Run command - Run an experiment of one agent in one environment

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::App,
    cli::output::{print_kv, print_section, print_summary},
    config::Config,
    pipeline::{ExperimentConfig, ExperimentSummary, JsonlObserver, ProgressObserver},
};

#[derive(Debug, Serialize)]
struct RunSummaryFile<'a> {
    agent: &'a str,
    environment: &'a str,
    seed: Option<u64>,
    training: bool,
    stopped_early: bool,
    summary: &'a ExperimentSummary,
    final_moving_average: Option<f64>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("experiment_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

fn load_config(path: Option<&PathBuf>, what: &str) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading {what} config from {}", path.display())),
        None => Ok(Config::new()),
    }
}

#[derive(Parser, Debug)]
#[command(about = "Run an experiment")]
pub struct RunArgs {
    /// Registered agent name
    #[arg(long, short = 'a', default_value = "rule_based")]
    pub agent: String,

    /// Registered environment name
    #[arg(long, short = 'e', default_value = "cartpole")]
    pub env: String,

    /// Experiment configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Configuration file passed to the agent constructor
    #[arg(long)]
    pub agent_config: Option<PathBuf>,

    /// Configuration file passed to the environment constructor
    #[arg(long)]
    pub env_config: Option<PathBuf>,

    /// Number of episodes (overrides the config file)
    #[arg(long, short = 'n')]
    pub episodes: Option<usize>,

    /// Step cap per episode (overrides the config file)
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render episodes at the configured frequency
    #[arg(long)]
    pub render: bool,

    /// CSV episode log path (overrides the config file)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Do not write a CSV episode log
    #[arg(long, conflicts_with = "log_file")]
    pub no_log: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Load agent parameters before the run
    #[arg(long)]
    pub load_model: Option<PathBuf>,

    /// Save agent parameters after the run
    #[arg(long)]
    pub save_model: Option<PathBuf>,

    /// Evaluation mode: disable learning updates
    #[arg(long)]
    pub eval: bool,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,
}

impl RunArgs {
    /// Experiment configuration from the config file with CLI overrides applied
    pub fn experiment_config(&self) -> Result<ExperimentConfig> {
        let file_config = load_config(self.config.as_ref(), "experiment")?;
        let mut config = ExperimentConfig::from_config(&file_config);

        if let Some(episodes) = self.episodes {
            config.num_episodes = episodes;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps_per_episode = max_steps;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.render {
            config.render = true;
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if self.no_log {
            config.log_file = None;
        }
        if let Some(path) = &self.save_model {
            config.save_model = true;
            config.model_save_path = path.clone();
        }
        if self.eval {
            config.training = false;
        }
        Ok(config)
    }
}

pub fn execute(args: RunArgs) -> Result<()> {
    let experiment = args.experiment_config()?;
    let agent_config = load_config(args.agent_config.as_ref(), "agent")?;
    let mut env_config = load_config(args.env_config.as_ref(), "environment")?;
    if experiment.render {
        env_config.set("render", true);
    }

    let summary_target = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let app = App::new()?;
    let mut runner = app.create_runner(&args.agent, &agent_config, &args.env, &env_config)?;

    if let Some(path) = &args.load_model {
        runner
            .agent_mut()
            .load_model(path)
            .with_context(|| format!("loading model from {}", path.display()))?;
        println!("Loaded model from: {}", path.display());
    }
    if args.progress {
        runner.add_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        runner.add_observer(Box::new(JsonlObserver::new(path)?));
    }

    print_section("EXPERIMENT");
    print_kv("Environment", runner.environment().name());
    print_kv("Agent", runner.agent().name());
    print_kv("Episodes", &experiment.num_episodes.to_string());
    print_kv("Max steps", &experiment.max_steps_per_episode.to_string());
    print_kv("Mode", if experiment.training { "training" } else { "evaluation" });
    if let Some(seed) = experiment.seed {
        print_kv("Seed", &seed.to_string());
    }

    let report = runner.run(&experiment)?;

    if report.stopped_early {
        println!(
            "\nStopped early after {} of {} episodes",
            report.episodes.len(),
            experiment.num_episodes
        );
    }
    print_summary(&report.summary);
    if let Some(path) = &experiment.log_file {
        println!("\nStatistics logged to: {}", path.display());
    }
    if experiment.save_model {
        println!("Model saved to: {}", experiment.model_save_path.display());
    }

    if let Some((summary_path, normalized)) = summary_target {
        if normalized {
            println!("\nNormalizing summary path to {}", summary_path.display());
        }

        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file_contents = RunSummaryFile {
            agent: runner.agent().name(),
            environment: runner.environment().name(),
            seed: experiment.seed,
            training: experiment.training,
            stopped_early: report.stopped_early,
            summary: &report.summary,
            final_moving_average: report.progress.last().map(|p| p.moving_average),
        };
        let file = fs::File::create(&summary_path)?;
        to_writer_pretty(file, &file_contents)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
