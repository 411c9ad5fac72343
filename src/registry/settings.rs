//! Registry construction options.
//!
//! One [`RegistrySettings`] per registry: case folding policy, the
//! end-of-arguments marker, the optional environment variable that supplies
//! default command-line tokens, the injected [`Environment`] collaborator,
//! and the override hooks for the ingestion pipelines.

use std::sync::Arc;

use crate::expand::{Environment, SystemEnvironment};
use crate::registry::store::VariableRegistry;
use crate::report::{Issue, ParseReport};

// ============================================================================
// Hook Types
// ============================================================================

/// Whole-file override: `(registry, source name, full text) -> report`.
///
/// When configured, the config-file reader delegates entirely to this hook.
pub type FileParseHook = Arc<dyn Fn(&mut VariableRegistry, &str, &str) -> ParseReport>;

/// Per-line override: `(registry, source name, line number, trimmed text)`.
///
/// A `true` result means the line was handled; `false` falls through to
/// default handling.
pub type LineParseHook = Arc<dyn Fn(&mut VariableRegistry, &str, usize, &str) -> bool>;

/// Whole-argument-list override: `(registry, argv) -> report`.
///
/// When configured, the command-line parser delegates entirely to this hook.
pub type ArgListParseHook = Arc<dyn Fn(&mut VariableRegistry, &mut Vec<String>) -> ParseReport>;

/// Per-argument override: `(registry, token, canonical name, remaining argv)`.
///
/// A `true` result means the argument was handled; `false` falls through to
/// default handling.
pub type ArgParseHook = Arc<dyn Fn(&mut VariableRegistry, &str, &str, &mut Vec<String>) -> bool>;

/// Error sink substitute. When configured, it receives every recoverable
/// issue instead of the default `tracing` warning.
pub type ErrorHook = Arc<dyn Fn(&Issue)>;

// ============================================================================
// RegistrySettings
// ============================================================================

/// Per-registry settings, built by chaining `with_*` calls:
///
/// ```
/// use confvar::RegistrySettings;
///
/// let settings = RegistrySettings::default()
///     .with_case_sensitive(true)
///     .with_cmd_env_var("MYAPP_ARGS");
/// ```
pub struct RegistrySettings {
    case_sensitive: bool,
    end_of_args: String,
    cmd_env_var: Option<String>,
    environment: Arc<dyn Environment>,
    file_hook: Option<FileParseHook>,
    line_hook: Option<LineParseHook>,
    args_hook: Option<ArgListParseHook>,
    arg_hook: Option<ArgParseHook>,
    error_hook: Option<ErrorHook>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            end_of_args: "--".to_string(),
            cmd_env_var: None,
            environment: Arc::new(SystemEnvironment),
            file_hook: None,
            line_hook: None,
            args_hook: None,
            arg_hook: None,
            error_hook: None,
        }
    }
}

impl RegistrySettings {
    /// Treat variable names case-sensitively (default: fold to lowercase).
    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// The token that ends command-line flag scanning (default `"--"`).
    #[must_use]
    pub fn with_end_of_args(mut self, marker: impl Into<String>) -> Self {
        self.end_of_args = marker.into();
        self
    }

    /// Name of an environment variable whose whitespace-split contents are
    /// prepended to `argv` before command-line parsing.
    #[must_use]
    pub fn with_cmd_env_var(mut self, name: impl Into<String>) -> Self {
        self.cmd_env_var = Some(name.into());
        self
    }

    /// Substitutes the process-environment collaborator used for value
    /// expansion and command-line preprocessing.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Environment + 'static) -> Self {
        self.environment = Arc::new(environment);
        self
    }

    /// Installs a whole-file parse override.
    #[must_use]
    pub fn with_file_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut VariableRegistry, &str, &str) -> ParseReport + 'static,
    {
        self.file_hook = Some(Arc::new(hook));
        self
    }

    /// Installs a per-line parse override.
    #[must_use]
    pub fn with_line_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut VariableRegistry, &str, usize, &str) -> bool + 'static,
    {
        self.line_hook = Some(Arc::new(hook));
        self
    }

    /// Installs a whole-argument-list parse override.
    #[must_use]
    pub fn with_args_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut VariableRegistry, &mut Vec<String>) -> ParseReport + 'static,
    {
        self.args_hook = Some(Arc::new(hook));
        self
    }

    /// Installs a per-argument parse override.
    #[must_use]
    pub fn with_arg_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut VariableRegistry, &str, &str, &mut Vec<String>) -> bool + 'static,
    {
        self.arg_hook = Some(Arc::new(hook));
        self
    }

    /// Substitutes the error sink.
    #[must_use]
    pub fn with_error_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Issue) + 'static,
    {
        self.error_hook = Some(Arc::new(hook));
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Whether names are folded to lowercase before lookup.
    #[must_use]
    pub const fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// The end-of-arguments marker.
    #[must_use]
    pub fn end_of_args(&self) -> &str {
        &self.end_of_args
    }

    /// The configured command-line environment variable, if any.
    #[must_use]
    pub fn cmd_env_var(&self) -> Option<&str> {
        self.cmd_env_var.as_deref()
    }

    /// The injected environment collaborator.
    #[must_use]
    pub fn environment(&self) -> &Arc<dyn Environment> {
        &self.environment
    }

    pub(crate) fn file_hook(&self) -> Option<FileParseHook> {
        self.file_hook.clone()
    }

    pub(crate) fn line_hook(&self) -> Option<LineParseHook> {
        self.line_hook.clone()
    }

    pub(crate) fn args_hook(&self) -> Option<ArgListParseHook> {
        self.args_hook.clone()
    }

    pub(crate) fn arg_hook(&self) -> Option<ArgParseHook> {
        self.arg_hook.clone()
    }

    pub(crate) fn error_hook(&self) -> Option<ErrorHook> {
        self.error_hook.clone()
    }
}

impl std::fmt::Debug for RegistrySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrySettings")
            .field("case_sensitive", &self.case_sensitive)
            .field("end_of_args", &self.end_of_args)
            .field("cmd_env_var", &self.cmd_env_var)
            .field("file_hook", &self.file_hook.as_ref().map(|_| "<fn>"))
            .field("line_hook", &self.line_hook.as_ref().map(|_| "<fn>"))
            .field("args_hook", &self.args_hook.as_ref().map(|_| "<fn>"))
            .field("arg_hook", &self.arg_hook.as_ref().map(|_| "<fn>"))
            .field("error_hook", &self.error_hook.as_ref().map(|_| "<fn>"))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
