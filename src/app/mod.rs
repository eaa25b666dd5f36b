//! Application layer with dependency injection container.
//!
//! The container owns the agent and environment registries, registers the
//! built-in implementations, and wires experiment runners from names plus
//! configurations. There is no process-wide registry: every [`App`] carries
//! its own.
//!
//! # Usage
//!
//! ## Production
//!
//! ```
//! use rlharness::{app::App, config::Config};
//!
//! let app = App::new()?;
//! let agent = app.create_agent("rule_based", &Config::new().with("max_force", 5.0))?;
//! assert_eq!(agent.name(), "RuleBasedAgent");
//! # Ok::<(), rlharness::Error>(())
//! ```
//!
//! ## Testing
//!
//! ```
//! use rlharness::app::App;
//!
//! let app = App::for_testing()
//!     .without_builtins()
//!     .with_default_seed(42)
//!     .build()?;
//! assert!(app.agents().is_empty());
//! # Ok::<(), rlharness::Error>(())
//! ```

pub mod container;

pub use container::{App, AppBuilder};
