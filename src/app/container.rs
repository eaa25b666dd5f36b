//! Dependency injection container for the harness.
//!
//! The container owns both registries and provides factory methods for agents,
//! environments and fully wired experiment runners.

use crate::{
    Result, agents,
    config::Config,
    environments,
    pipeline::ExperimentRunner,
    ports::{Agent, Environment},
    registry::{AgentRegistry, EnvironmentRegistry},
};

/// Application with dependency injection.
///
/// # Examples
///
/// ```
/// use rlharness::{app::App, config::Config};
///
/// let app = App::new()?;
/// let mut runner = app.create_runner("random", &Config::new(), "cartpole", &Config::new())?;
/// let stats = runner.run_single_episode(20, false)?;
/// assert!(stats.steps >= 1);
/// # Ok::<(), rlharness::Error>(())
/// ```
#[derive(Debug)]
pub struct App {
    agents: AgentRegistry,
    environments: EnvironmentRegistry,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with every built-in agent and environment registered.
    ///
    /// # Errors
    ///
    /// Fails only if a built-in name is registered twice.
    pub fn new() -> Result<Self> {
        AppBuilder::new().build()
    }

    /// Create a builder for constructing an app with custom registrations.
    ///
    /// Primarily used for testing with stub agents and environments.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut AgentRegistry {
        &mut self.agents
    }

    pub fn environments(&self) -> &EnvironmentRegistry {
        &self.environments
    }

    pub fn environments_mut(&mut self) -> &mut EnvironmentRegistry {
        &mut self.environments
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Create an agent by registered name.
    ///
    /// When the app has a default seed and `config` carries no usable `seed`
    /// (absent, negative or not an integer), the agent is seeded with it.
    pub fn create_agent(&self, name: &str, config: &Config) -> Result<Box<dyn Agent>> {
        let mut agent = self.agents.create(name, config)?;
        if let Some(seed) = self.default_seed
            && config.get_opt::<u64>("seed").is_none()
        {
            agent.set_rng_seed(seed)?;
        }
        tracing::debug!(name, agent = agent.name(), "created agent");
        Ok(agent)
    }

    /// Create an environment by registered name, applying the default seed
    /// the same way as [`App::create_agent`].
    pub fn create_environment(&self, name: &str, config: &Config) -> Result<Box<dyn Environment>> {
        let mut env = self.environments.create(name, config)?;
        if let Some(seed) = self.default_seed
            && config.get_opt::<u64>("seed").is_none()
        {
            if let Err(err) = env.seed(seed) {
                env.close();
                return Err(err);
            }
        }
        tracing::debug!(name, environment = env.name(), "created environment");
        Ok(env)
    }

    /// Create an agent and an environment and hand both to a new runner.
    ///
    /// The environment is closed again if the agent cannot be created.
    pub fn create_runner(
        &self,
        agent_name: &str,
        agent_config: &Config,
        env_name: &str,
        env_config: &Config,
    ) -> Result<ExperimentRunner> {
        let mut env = self.create_environment(env_name, env_config)?;
        let agent = match self.create_agent(agent_name, agent_config) {
            Ok(agent) => agent,
            Err(err) => {
                env.close();
                return Err(err);
            }
        };
        Ok(ExperimentRunner::new(env, agent))
    }
}

/// Builder for constructing an app with custom registrations.
///
/// # Examples
///
/// ```
/// use rlharness::{agents::RandomAgent, app::AppBuilder, config::Config, ports::Agent};
///
/// let app = AppBuilder::new()
///     .without_builtins()
///     .with_agent("uniform", |config: &Config| {
///         Ok(Box::new(RandomAgent::from_config(config)?) as Box<dyn Agent>)
///     })
///     .build()?;
/// assert_eq!(app.agents().list_registered(), vec!["uniform"]);
/// # Ok::<(), rlharness::Error>(())
/// ```
pub struct AppBuilder {
    builtins: bool,
    default_seed: Option<u64>,
    agents: AgentRegistry,
    environments: EnvironmentRegistry,
    pending: Vec<Registration>,
}

enum Registration {
    Agent(String, crate::registry::Constructor<dyn Agent>),
    Environment(String, crate::registry::Constructor<dyn Environment>),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            builtins: true,
            default_seed: None,
            agents: AgentRegistry::new(),
            environments: EnvironmentRegistry::new(),
            pending: Vec::new(),
        }
    }

    /// Skip registration of the built-in agents and environments.
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    /// Set a default random seed for all agents and environments created by
    /// this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Register an extra agent constructor when the app is built.
    pub fn with_agent<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&Config) -> Result<Box<dyn Agent>> + Send + Sync + 'static,
    {
        self.pending
            .push(Registration::Agent(name.into(), Box::new(constructor)));
        self
    }

    /// Register an extra environment constructor when the app is built.
    pub fn with_environment<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&Config) -> Result<Box<dyn Environment>> + Send + Sync + 'static,
    {
        self.pending
            .push(Registration::Environment(name.into(), Box::new(constructor)));
        self
    }

    /// Build the app.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DuplicateRegistration`] if an extra
    /// registration reuses a name, including a built-in one.
    pub fn build(mut self) -> Result<App> {
        if self.builtins {
            agents::register_builtin(&mut self.agents)?;
            environments::register_builtin(&mut self.environments)?;
        }
        for registration in self.pending {
            match registration {
                Registration::Agent(name, constructor) => {
                    self.agents.register(name, constructor)?;
                }
                Registration::Environment(name, constructor) => {
                    self.environments.register(name, constructor)?;
                }
            }
        }
        Ok(App {
            agents: self.agents,
            environments: self.environments,
            default_seed: self.default_seed,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
