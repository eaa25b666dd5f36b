//! Tests for name-based construction through registries

mod common;

use common::{ConstantAgent, Probe, ScriptedEnv};
use rlharness::{
    Agent, AgentRegistry, Environment, EnvironmentRegistry, Error, config::Config,
};

fn constant_registry(probe: &Probe) -> AgentRegistry {
    let mut registry = AgentRegistry::new();
    let probe = probe.clone();
    registry
        .register("constant", move |config: &Config| {
            Ok(Box::new(ConstantAgent::new(probe.clone(), config.get("action", 0.0))) as Box<dyn Agent>)
        })
        .unwrap();
    registry
}

#[test]
fn created_instances_are_independent() {
    let probe = Probe::new();
    let registry = constant_registry(&probe);

    let mut a = registry
        .create("constant", &Config::new().with("action", 0.25))
        .unwrap();
    let mut b = registry.create("constant", &Config::new()).unwrap();

    assert_eq!(a.act(&[]).unwrap(), 0.25);
    assert_eq!(b.act(&[]).unwrap(), 0.0);
    a.set_training_mode(false);
    assert!(!a.is_training());
    assert!(b.is_training());
}

#[test]
fn duplicate_names_are_rejected() {
    let probe = Probe::new();
    let mut registry = constant_registry(&probe);
    let result = registry.register("constant", |_: &Config| -> rlharness::Result<Box<dyn Agent>> {
        Err(Error::InvalidConfiguration {
            message: "never built".to_string(),
        })
    });

    assert!(matches!(
        result,
        Err(Error::DuplicateRegistration { kind: "agent", ref name }) if name == "constant"
    ));
    assert_eq!(registry.len(), 1);
}

#[test]
fn unknown_name_lists_alternatives() {
    let probe = Probe::new();
    let registry = constant_registry(&probe);

    match registry.create("dqn", &Config::new()) {
        Err(Error::UnknownName {
            kind, name, available,
        }) => {
            assert_eq!(kind, "agent");
            assert_eq!(name, "dqn");
            assert_eq!(available, "constant");
        }
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("unknown name constructed an agent"),
    }
}

#[test]
fn constructor_errors_pass_through() {
    let mut registry = EnvironmentRegistry::new();
    registry
        .register("picky", |config: &Config| -> rlharness::Result<Box<dyn Environment>> {
            Err(Error::InvalidConfiguration {
                message: format!("{} keys is not enough", config.len()),
            })
        })
        .unwrap();

    assert!(matches!(
        registry.create("picky", &Config::new()),
        Err(Error::InvalidConfiguration { .. })
    ));
}

#[test]
fn names_are_sorted_and_clear_empties_registry() {
    let probe = Probe::new();
    let mut registry = EnvironmentRegistry::new();
    for name in ["walker", "cartpole", "maze"] {
        let probe = probe.clone();
        registry
            .register(name, move |_: &Config| {
                Ok(Box::new(ScriptedEnv::new(probe.clone(), Some(1), 1.0)) as Box<dyn Environment>)
            })
            .unwrap();
    }

    assert_eq!(registry.list_registered(), vec!["cartpole", "maze", "walker"]);
    assert!(registry.is_registered("maze"));

    let env = registry.create("maze", &Config::new()).unwrap();
    registry.clear();
    assert!(registry.is_empty());
    // Instances outlive the registrations that built them
    assert_eq!(env.name(), "ScriptedEnv");
}

#[test]
fn empty_name_is_invalid() {
    let probe = Probe::new();
    let mut registry = AgentRegistry::new();
    let result = registry.register("", move |_: &Config| {
        Ok(Box::new(ConstantAgent::new(probe.clone(), 0.0)) as Box<dyn Agent>)
    });
    assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
}
