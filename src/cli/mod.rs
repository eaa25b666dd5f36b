//! CLI infrastructure for the experimentation harness
//!
//! This module provides the command-line interface for running experiments,
//! listing registered implementations and summarizing episode logs.

pub mod commands;
pub mod output;
