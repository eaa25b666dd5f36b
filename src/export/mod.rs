//! Export of experiment results
//!
//! Currently the per-episode CSV log written by the experiment runner and read
//! back by `rlharness summarize`.

mod episode_csv;

pub use episode_csv::{
    EPISODE_LOG_HEADER, EpisodeRecord, read_episode_log, read_episodes, write_episode_log,
    write_episodes,
};
