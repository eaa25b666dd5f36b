//! Name-based registries for late-bound agent and environment construction.
//!
//! A registry maps a unique name to a constructor taking a [`Config`]. Callers
//! build a registry explicitly (usually through [`crate::app::App`]) and pass
//! it around, so there is no hidden process-wide state.
//!
//! ```
//! use rlharness::{config::Config, registry::AgentRegistry, agents::RandomAgent};
//!
//! let mut agents = AgentRegistry::new();
//! agents.register("random", |config: &Config| Ok(Box::new(RandomAgent::from_config(config)?)))?;
//!
//! let agent = agents.create("random", &Config::new())?;
//! assert_eq!(agent.name(), "RandomAgent");
//! # Ok::<(), rlharness::Error>(())
//! ```

use std::{collections::BTreeMap, fmt};

use crate::{
    Error, Result,
    config::Config,
    ports::{Agent, Environment},
};

/// Constructor stored in a registry.
pub type Constructor<T> = Box<dyn Fn(&Config) -> Result<Box<T>> + Send + Sync>;

/// Mapping from unique names to constructors of `Box<T>`.
///
/// Registration is add-only: binding a name twice fails with
/// [`Error::DuplicateRegistration`].
pub struct Registry<T: ?Sized> {
    kind: &'static str,
    constructors: BTreeMap<String, Constructor<T>>,
}

/// Registry of agent constructors.
pub type AgentRegistry = Registry<dyn Agent>;

/// Registry of environment constructors.
pub type EnvironmentRegistry = Registry<dyn Environment>;

impl<T: ?Sized> Registry<T> {
    /// Create an empty registry. `kind` names the product in error messages.
    pub fn with_kind(kind: &'static str) -> Self {
        Self {
            kind,
            constructors: BTreeMap::new(),
        }
    }

    /// Bind `name` to a constructor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRegistration`] if `name` is already bound and
    /// [`Error::InvalidConfiguration`] if it is empty.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn(&Config) -> Result<Box<T>> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: format!("{} name must not be empty", self.kind),
            });
        }
        if self.constructors.contains_key(&name) {
            return Err(Error::DuplicateRegistration {
                kind: self.kind,
                name,
            });
        }
        tracing::debug!(kind = self.kind, name = %name, "registered constructor");
        self.constructors.insert(name, Box::new(constructor));
        Ok(())
    }

    /// Construct a new instance by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownName`] if `name` is not bound, or whatever the
    /// constructor itself returns.
    pub fn create(&self, name: &str, config: &Config) -> Result<Box<T>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| Error::UnknownName {
                kind: self.kind,
                name: name.to_string(),
                available: self.list_registered().join(", "),
            })?;
        constructor(config)
    }

    /// Registered names, sorted.
    pub fn list_registered(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Remove every registration.
    ///
    /// Intended for test isolation. Instances created earlier stay valid since
    /// they do not borrow from the registry.
    pub fn clear(&mut self) {
        self.constructors.clear();
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl Registry<dyn Agent> {
    pub fn new() -> Self {
        Self::with_kind("agent")
    }
}

impl Default for Registry<dyn Agent> {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry<dyn Environment> {
    pub fn new() -> Self {
        Self::with_kind("environment")
    }
}

impl Default for Registry<dyn Environment> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("names", &self.list_registered())
            .finish()
    }
}
