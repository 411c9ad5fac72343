//! Shared integration-test fixtures.

#![allow(dead_code)]

use confvar::{RegistrySettings, VarSpec, VariableRegistry};

/// Initializes tracing output for test debugging.
///
/// Uses `try_init()` so calling this from every test is safe.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// The standard fixture: four variables with defaults, aliases, and one
/// explicit command-line trigger.
pub fn sample_registry() -> VariableRegistry {
    sample_registry_with(RegistrySettings::default())
}

/// Same fixture, custom settings.
pub fn sample_registry_with(settings: RegistrySettings) -> VariableRegistry {
    let mut registry = VariableRegistry::with_settings(settings);
    registry
        .define(
            "one",
            VarSpec::new()
                .default("1")
                .argument_required(true)
                .alias("first"),
        )
        .unwrap();
    registry
        .define(
            "two",
            VarSpec::new()
                .default("2")
                .argument_required(true)
                .aliases(["second", "runnerup"]),
        )
        .unwrap();
    registry
        .define(
            "three",
            VarSpec::new()
                .default("3")
                .argument_required(true)
                .trigger("-3"),
        )
        .unwrap();
    registry
        .define("four", VarSpec::new().default("0").alias("village"))
        .unwrap();
    registry
}
