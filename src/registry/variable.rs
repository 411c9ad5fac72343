//! Per-variable metadata: the [`Variable`] record, the [`VarSpec`]
//! definition options, and validator dispatch.

use std::sync::Arc;

use regex::Regex;

use crate::error::RegistryError;
use crate::registry::store::VariableRegistry;
use crate::registry::value::Value;

// ============================================================================
// Hook Types
// ============================================================================

/// Change hook invoked on every successful `set`.
///
/// Receives the registry, the canonical variable name, and the new value;
/// its boolean result becomes the `set` call's success signal.
pub type ChangeHook = Arc<dyn Fn(&mut VariableRegistry, &str, &Value) -> bool>;

/// Predicate validator: `(canonical name, candidate value) -> accepted`.
pub type PredicateFn = Arc<dyn Fn(&str, &str) -> bool>;

// ============================================================================
// Validator
// ============================================================================

/// A value validator attached to a variable.
pub enum Validator {
    /// Candidate must match this regular expression (unanchored).
    Pattern(Regex),
    /// Candidate is accepted when the predicate returns `true`.
    Predicate(PredicateFn),
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::Predicate(_) => f.debug_tuple("Predicate").field(&"<fn>").finish(),
        }
    }
}

// ============================================================================
// Variable
// ============================================================================

/// A defined configuration variable and its current state.
pub struct Variable {
    name: String,
    value: Value,
    default: Value,
    argument_required: bool,
    expand: bool,
    validator: Option<Validator>,
    on_change: Option<ChangeHook>,
}

impl Variable {
    pub(crate) fn new(name: String, spec: CompiledSpec) -> Self {
        Self {
            name,
            value: Value::Absent,
            default: spec.default,
            argument_required: spec.argument_required,
            expand: spec.expand,
            validator: spec.validator,
            on_change: spec.on_change,
        }
    }

    /// The canonical name this variable is registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// The default assigned at definition time.
    #[must_use]
    pub const fn default(&self) -> &Value {
        &self.default
    }

    /// Whether an entry for this variable must supply an explicit value.
    #[must_use]
    pub const fn argument_required(&self) -> bool {
        self.argument_required
    }

    /// Whether config-file values undergo expansion.
    #[must_use]
    pub const fn expand(&self) -> bool {
        self.expand
    }

    /// Runs the validator against a candidate value.
    ///
    /// A variable without a validator accepts everything.
    #[must_use]
    pub fn check(&self, candidate: &str) -> bool {
        match &self.validator {
            None => true,
            Some(Validator::Pattern(re)) => re.is_match(candidate),
            Some(Validator::Predicate(f)) => f(&self.name, candidate),
        }
    }

    pub(crate) fn assign(&mut self, value: Value) {
        self.value = value;
    }

    pub(crate) fn change_hook(&self) -> Option<ChangeHook> {
        self.on_change.clone()
    }
}

impl std::fmt::Debug for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("default", &self.default)
            .field("argument_required", &self.argument_required)
            .field("expand", &self.expand)
            .field("validator", &self.validator)
            .field("on_change", &self.on_change.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

// ============================================================================
// VarSpec
// ============================================================================

/// Definition options for [`VariableRegistry::define`].
///
/// Built by chaining; everything is optional:
///
/// ```
/// use confvar::VarSpec;
///
/// let spec = VarSpec::new()
///     .default("8080")
///     .argument_required(true)
///     .validate_pattern(r"\d+")
///     .alias("listen-port")
///     .trigger("-p");
/// ```
#[derive(Default)]
pub struct VarSpec {
    default: Option<Value>,
    argument_required: bool,
    expand: Option<bool>,
    pattern: Option<String>,
    predicate: Option<PredicateFn>,
    on_change: Option<ChangeHook>,
    aliases: Vec<String>,
    triggers: Vec<String>,
}

impl VarSpec {
    /// Creates an empty spec: no default, no validator, no hook, value
    /// expansion enabled, no explicit argument required.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Default value assigned (and passed through the change hook) at
    /// definition time.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Marks the variable as requiring an explicit value.
    #[must_use]
    pub const fn argument_required(mut self, required: bool) -> Self {
        self.argument_required = required;
        self
    }

    /// Enables or disables config-file value expansion (default: enabled).
    #[must_use]
    pub const fn expand(mut self, expand: bool) -> Self {
        self.expand = Some(expand);
        self
    }

    /// Installs a pattern validator. The pattern is compiled at definition
    /// time; a malformed pattern rejects the definition.
    #[must_use]
    pub fn validate_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Installs a predicate validator, called with the canonical name and
    /// the candidate value.
    #[must_use]
    pub fn validate_with<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, &str) -> bool + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Installs a change hook, invoked on every successful `set`.
    #[must_use]
    pub fn on_change<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut VariableRegistry, &str, &Value) -> bool + 'static,
    {
        self.on_change = Some(Arc::new(hook));
        self
    }

    /// Adds one alias for the variable.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several aliases at once.
    #[must_use]
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Adds one command-line trigger token.
    #[must_use]
    pub fn trigger(mut self, token: impl Into<String>) -> Self {
        self.triggers.push(token.into());
        self
    }

    /// Adds several command-line trigger tokens at once.
    #[must_use]
    pub fn triggers<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Compiles the spec, resolving the pattern validator.
    pub(crate) fn compile(self, name: &str) -> Result<(CompiledSpec, Vec<String>, Vec<String>), RegistryError> {
        let validator = match (self.pattern, self.predicate) {
            (Some(pattern), _) => {
                let re = Regex::new(&pattern).map_err(|e| RegistryError::InvalidOption {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
                Some(Validator::Pattern(re))
            }
            (None, Some(f)) => Some(Validator::Predicate(f)),
            (None, None) => None,
        };

        Ok((
            CompiledSpec {
                default: self.default.unwrap_or(Value::Absent),
                argument_required: self.argument_required,
                expand: self.expand.unwrap_or(true),
                validator,
                on_change: self.on_change,
            },
            self.aliases,
            self.triggers,
        ))
    }
}

/// A [`VarSpec`] after validator compilation.
pub(crate) struct CompiledSpec {
    pub(crate) default: Value,
    pub(crate) argument_required: bool,
    pub(crate) expand: bool,
    pub(crate) validator: Option<Validator>,
    pub(crate) on_change: Option<ChangeHook>,
}

// ============================================================================
// Tests
// ============================================================================
