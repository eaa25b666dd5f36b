//! Summarize command - Summarize a CSV episode log

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{print_kv, print_summary},
    export::read_episode_log,
    pipeline::{ExperimentSummary, MOVING_AVERAGE_WINDOW, moving_average},
};

#[derive(Parser, Debug)]
#[command(about = "Summarize an episode log")]
pub struct SummarizeArgs {
    /// CSV episode log written by `run`
    pub log: PathBuf,

    /// Moving-average window for the final episodes
    #[arg(long, short = 'w', default_value_t = MOVING_AVERAGE_WINDOW)]
    pub window: usize,

    /// Print the summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: SummarizeArgs) -> Result<()> {
    let episodes = read_episode_log(&args.log)
        .with_context(|| format!("reading episode log {}", args.log.display()))?;
    let summary = ExperimentSummary::from_episodes(&episodes);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_summary(&summary);
    let window = args.window.min(episodes.len());
    print_kv(
        "Moving Average",
        &format!("{:.2} (last {window} episodes)", moving_average(&episodes, window)),
    );
    Ok(())
}
