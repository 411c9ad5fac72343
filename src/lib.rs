//! `confvar` — application configuration variables.
//!
//! A program declares named variables (defaults, aliases, validation,
//! change hooks) in a [`VariableRegistry`], then populates them from
//! programmatic calls, a configuration file ([`ConfigFileReader`]), and
//! command-line arguments ([`CommandLineParser`]), all through one unified
//! namespace. Config-file values pass through an expansion engine that
//! rewrites home-directory, environment, and variable references.

pub mod error;
pub mod expand;
pub mod ingest;
pub mod registry;
pub mod report;

pub use error::{ConfVarError, IngestError, RegistryError, Result};
pub use expand::{expand, Environment, FixedEnvironment, SystemEnvironment};
pub use ingest::{CommandLineParser, ConfigFileReader};
pub use registry::{
    ArgListParseHook, ArgParseHook, ChangeHook, ErrorHook, FileParseHook, LineParseHook,
    PredicateFn, RegistrySettings, Validator, Value, VarSpec, Variable, VariableRegistry,
};
pub use report::{Issue, IssueKind, ParseReport};
