//! Subcommands of the `rlharness` binary

pub mod list;
pub mod run;
pub mod summarize;
