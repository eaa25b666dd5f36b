//! CSV episode log
//!
//! One row per completed episode with the fixed column order
//! `episode,steps,total_reward,terminated,termination_reason`.

use std::{fs::File, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, pipeline::EpisodeStats};

/// Column names, in file order
pub const EPISODE_LOG_HEADER: [&str; 5] = [
    "episode",
    "steps",
    "total_reward",
    "terminated",
    "termination_reason",
];

/// A single row of the episode log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f64,
    pub terminated: bool,
    pub termination_reason: String,
}

impl From<&EpisodeStats> for EpisodeRecord {
    fn from(stats: &EpisodeStats) -> Self {
        Self {
            episode: stats.episode,
            steps: stats.steps,
            total_reward: stats.total_reward,
            terminated: stats.terminated,
            termination_reason: stats.termination_reason.clone(),
        }
    }
}

impl From<EpisodeRecord> for EpisodeStats {
    fn from(record: EpisodeRecord) -> Self {
        Self {
            episode: record.episode,
            steps: record.steps,
            total_reward: record.total_reward,
            terminated: record.terminated,
            termination_reason: record.termination_reason,
            agent_stats: Vec::new(),
        }
    }
}

/// Write the header and one row per episode to `writer`.
pub fn write_episodes<W: io::Write>(writer: W, episodes: &[EpisodeStats]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    // The header is written explicitly so an empty run still yields one line
    csv_writer.write_record(EPISODE_LOG_HEADER)?;
    for stats in episodes {
        let record = EpisodeRecord::from(stats);
        csv_writer.write_record(&[
            record.episode.to_string(),
            record.steps.to_string(),
            record.total_reward.to_string(),
            record.terminated.to_string(),
            record.termination_reason,
        ])?;
    }
    csv_writer.flush().map_err(|source| Error::Io {
        operation: "flush episode log".to_string(),
        source,
    })?;
    Ok(())
}

/// Write the episode log to `path`, replacing any existing file.
pub fn write_episode_log<P: AsRef<Path>>(path: P, episodes: &[EpisodeStats]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create episode log {path:?}"),
        source,
    })?;
    write_episodes(file, episodes)
}

/// Read episode rows back from any reader.
///
/// Agent metrics are not part of the log, so the returned stats carry an
/// empty `agent_stats`.
pub fn read_episodes<R: io::Read>(reader: R) -> Result<Vec<EpisodeStats>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut episodes = Vec::new();
    for record in csv_reader.deserialize::<EpisodeRecord>() {
        episodes.push(record?.into());
    }
    Ok(episodes)
}

/// Read an episode log written by [`write_episode_log`].
pub fn read_episode_log<P: AsRef<Path>>(path: P) -> Result<Vec<EpisodeStats>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open episode log {path:?}"),
        source,
    })?;
    read_episodes(file)
}
