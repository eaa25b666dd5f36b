//! Episode loop and experiment controller
//!
//! This module provides:
//! - The single-episode interaction loop ([`run_episode`])
//! - The multi-episode [`ExperimentRunner`] with its cadences and reporting
//! - Aggregate statistics ([`ExperimentSummary`], [`moving_average`])
//! - Observers recording runs as progress bars, metrics or JSON lines

pub mod episode;
pub mod experiment;
pub mod observers;
pub mod summary;

pub use episode::{EpisodeSettings, EpisodeStats, run_episode};
pub use experiment::{DEFAULT_FRAME_DELAY_MS, ExperimentConfig, ExperimentReport, ExperimentRunner};
pub use observers::{
    EpisodeObservation, JsonlObserver, MetricsObserver, ProgressObserver, StepObservation,
};
pub use summary::{ExperimentSummary, MOVING_AVERAGE_WINDOW, ProgressReport, moving_average};

pub use crate::ports::ExperimentObserver;
