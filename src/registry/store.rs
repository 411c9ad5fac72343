//! The variable registry.
//!
//! Owns all per-variable metadata and current values, resolves aliases and
//! case folding, and applies change hooks. Both ingestion pipelines
//! terminate in [`VariableRegistry::set`].

use indexmap::IndexMap;
use tracing::debug;

use crate::error::RegistryError;
use crate::registry::settings::RegistrySettings;
use crate::registry::value::Value;
use crate::registry::variable::{Variable, VarSpec};

/// Maximum edit distance for "did you mean" suggestions.
const SUGGESTION_DISTANCE: usize = 3;

// ============================================================================
// VariableRegistry
// ============================================================================

/// A single unified namespace of configuration variables.
///
/// Variables are kept in definition order. All name lookups are folded per
/// the case policy and follow at most one alias indirection: an alias whose
/// target is itself an alias is not chased further.
///
/// ```
/// use confvar::{VarSpec, VariableRegistry};
///
/// let mut registry = VariableRegistry::new();
/// registry
///     .define("colour", VarSpec::new().default("red").alias("color"))
///     .unwrap();
/// assert_eq!(registry.get("COLOR").unwrap().to_string(), "red");
/// ```
#[derive(Debug)]
pub struct VariableRegistry {
    settings: RegistrySettings,
    vars: IndexMap<String, Variable>,
    aliases: IndexMap<String, String>,
    triggers: IndexMap<String, String>,
}

impl Default for VariableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableRegistry {
    /// Creates a registry with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(RegistrySettings::default())
    }

    /// Creates a registry with the given settings.
    #[must_use]
    pub fn with_settings(settings: RegistrySettings) -> Self {
        Self {
            settings,
            vars: IndexMap::new(),
            aliases: IndexMap::new(),
            triggers: IndexMap::new(),
        }
    }

    /// The settings this registry was constructed with.
    #[must_use]
    pub const fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    // ------------------------------------------------------------------------
    // Definition
    // ------------------------------------------------------------------------

    /// Defines a variable under the folded form of `name`.
    ///
    /// Aliases and command-line triggers from the spec are installed, and
    /// the variable is initialized by calling [`Self::set`] with its
    /// default (or [`Value::Absent`]), so a change hook fires once at
    /// definition time. Redefining an existing name replaces it.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidOption`] if a pattern validator does not
    /// compile; nothing is registered in that case.
    pub fn define(&mut self, name: &str, spec: VarSpec) -> Result<(), RegistryError> {
        let canonical = self.fold(name);
        let (compiled, aliases, triggers) = spec.compile(&canonical)?;
        let default = compiled.default.clone();

        debug!(name = %canonical, "define variable");
        self.vars
            .insert(canonical.clone(), Variable::new(canonical.clone(), compiled));

        for alias in aliases {
            self.define_alias(&alias, &canonical);
        }
        for token in triggers {
            self.define_trigger(token, &canonical);
        }

        // Initialization fires the change hook exactly once.
        self.set(&canonical, default)?;
        Ok(())
    }

    /// Maps an alternate name onto a target name.
    ///
    /// The target need not be defined yet; lookups through the alias fail
    /// until it is.
    pub fn define_alias(&mut self, alias: &str, target: &str) {
        let alias = self.fold(alias);
        let target = self.fold(target);
        self.aliases.insert(alias, target);
    }

    /// Binds a literal command-line token to a target name.
    pub fn define_trigger(&mut self, token: impl Into<String>, target: &str) {
        let target = self.fold(target);
        self.triggers.insert(token.into(), target);
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// Canonicalizes a name: case-fold, then at most one alias hop.
    #[must_use]
    pub fn resolve(&self, name: &str) -> String {
        let folded = self.fold(name);
        match self.aliases.get(&folded) {
            Some(target) => target.clone(),
            None => folded,
        }
    }

    /// Whether `name` (through folding and aliasing) is defined.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.vars.contains_key(&self.resolve(name))
    }

    /// The variable record behind `name`, if defined.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.vars.get(&self.resolve(name))
    }

    /// Canonical variable names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// The canonical target of a literal command-line trigger token.
    #[must_use]
    pub fn trigger_target(&self, token: &str) -> Option<String> {
        self.triggers.get(token).cloned()
    }

    // ------------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------------

    /// Returns the current value of a defined variable.
    ///
    /// A defined variable that was never assigned yields
    /// [`Value::Absent`], which is distinct from an empty or `"0"` value.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NoSuchVariable`] if `name` is not defined.
    pub fn get(&self, name: &str) -> Result<&Value, RegistryError> {
        let canonical = self.resolve(name);
        self.vars
            .get(&canonical)
            .map(Variable::value)
            .ok_or(RegistryError::NoSuchVariable { name: canonical })
    }

    /// Assigns a value, then invokes the change hook if one is bound.
    ///
    /// The hook's boolean result is returned as the success signal;
    /// `true` when no hook is bound. Validation is the caller's
    /// responsibility — `set` never rejects a value.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NoSuchVariable`] if `name` is not defined.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<bool, RegistryError> {
        let canonical = self.resolve(name);
        let value = value.into();

        let Some(var) = self.vars.get_mut(&canonical) else {
            return Err(RegistryError::NoSuchVariable { name: canonical });
        };
        debug!(name = %canonical, value = %value, "set variable");
        var.assign(value.clone());
        let hook = var.change_hook();

        match hook {
            Some(hook) => Ok(hook(self, &canonical, &value)),
            None => Ok(true),
        }
    }

    /// Runs the variable's validator against a candidate value.
    ///
    /// Absent validator accepts everything; a pattern matches unanchored;
    /// a predicate is called with the canonical name and the candidate.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NoSuchVariable`] if `name` is not defined.
    pub fn validate(&self, name: &str, candidate: &str) -> Result<bool, RegistryError> {
        let canonical = self.resolve(name);
        self.vars
            .get(&canonical)
            .map(|var| var.check(candidate))
            .ok_or(RegistryError::NoSuchVariable { name: canonical })
    }

    // ------------------------------------------------------------------------
    // Suggestions
    // ------------------------------------------------------------------------

    /// Suggests a defined name or alias close to `input`, for typo
    /// correction in diagnostics.
    #[must_use]
    pub fn suggest_name(&self, input: &str) -> Option<String> {
        let folded = self.fold(input);
        self.vars
            .keys()
            .chain(self.aliases.keys())
            .map(|name| (name, strsim::damerau_levenshtein(&folded, name)))
            .filter(|(_, dist)| *dist <= SUGGESTION_DISTANCE)
            .min_by_key(|(_, dist)| *dist)
            .map(|(name, _)| name.clone())
    }

    fn fold(&self, name: &str) -> String {
        if self.settings.case_sensitive() {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn get_before_define_fails() {
        let registry = VariableRegistry::new();
        assert!(matches!(
            registry.get("missing"),
            Err(RegistryError::NoSuchVariable { name }) if name == "missing"
        ));
    }

    #[test]
    fn set_before_define_fails() {
        let mut registry = VariableRegistry::new();
        assert!(registry.set("missing", "x").is_err());
    }

    #[test]
    fn default_is_applied_at_define_time() {
        let mut registry = VariableRegistry::new();
        registry
            .define("level", VarSpec::new().default("info"))
            .unwrap();
        assert_eq!(registry.get("level").unwrap().to_string(), "info");
    }

    #[test]
    fn define_without_default_leaves_absent() {
        let mut registry = VariableRegistry::new();
        registry.define("level", VarSpec::new()).unwrap();
        assert_eq!(registry.get("level").unwrap(), &Value::Absent);
    }

    #[test]
    fn change_hook_fires_once_at_define() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);

        let mut registry = VariableRegistry::new();
        registry
            .define(
                "level",
                VarSpec::new().default("info").on_change(move |_, _, _| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    true
                }),
            )
            .unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        registry.set("level", "debug").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn change_hook_result_is_success_signal() {
        let mut registry = VariableRegistry::new();
        registry
            .define("strict", VarSpec::new().on_change(|_, _, value| value.is_truthy()))
            .unwrap();
        assert!(!registry.set("strict", "0").unwrap());
        assert!(registry.set("strict", "yes").unwrap());
    }

    #[test]
    fn change_hook_may_touch_the_registry() {
        let mut registry = VariableRegistry::new();
        registry.define("shadow", VarSpec::new()).unwrap();
        registry
            .define(
                "primary",
                VarSpec::new().on_change(|registry, _, value| {
                    registry.set("shadow", value.clone()).is_ok()
                }),
            )
            .unwrap();

        registry.set("primary", "mirrored").unwrap();
        assert_eq!(registry.get("shadow").unwrap().to_string(), "mirrored");
    }

    #[test]
    fn case_insensitive_by_default() {
        let mut registry = VariableRegistry::new();
        registry.define("Foo", VarSpec::new().default("x")).unwrap();
        assert_eq!(registry.get("FOO").unwrap().to_string(), "x");
        assert_eq!(registry.get("foo").unwrap().to_string(), "x");
        registry.set("fOo", "y").unwrap();
        assert_eq!(registry.get("Foo").unwrap().to_string(), "y");
    }

    #[test]
    fn case_sensitive_names_are_distinct() {
        let settings = RegistrySettings::default().with_case_sensitive(true);
        let mut registry = VariableRegistry::with_settings(settings);
        registry.define("Foo", VarSpec::new().default("x")).unwrap();
        assert!(registry.get("FOO").is_err());
        assert!(registry.get("Foo").is_ok());
    }

    #[test]
    fn alias_resolution_is_idempotent() {
        let mut registry = VariableRegistry::new();
        registry
            .define("two", VarSpec::new().aliases(["second", "runnerup"]))
            .unwrap();
        let once = registry.resolve("second");
        assert_eq!(once, "two");
        assert_eq!(registry.resolve(&once), once);
    }

    #[test]
    fn alias_is_single_hop() {
        let mut registry = VariableRegistry::new();
        registry.define("target", VarSpec::new()).unwrap();
        registry.define_alias("middle", "target");
        registry.define_alias("outer", "middle");
        // One hop only: "outer" resolves to "middle", which is not defined.
        assert_eq!(registry.resolve("outer"), "middle");
        assert!(!registry.is_defined("outer"));
        assert!(registry.is_defined("middle"));
    }

    #[test]
    fn alias_to_undefined_target_is_permitted() {
        let mut registry = VariableRegistry::new();
        registry.define_alias("nick", "later");
        assert!(!registry.is_defined("nick"));
        registry.define("later", VarSpec::new().default("now")).unwrap();
        assert_eq!(registry.get("nick").unwrap().to_string(), "now");
    }

    #[test]
    fn names_follow_definition_order() {
        let mut registry = VariableRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.define(name, VarSpec::new()).unwrap();
        }
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn validate_dispatch() {
        let mut registry = VariableRegistry::new();
        registry
            .define("port", VarSpec::new().validate_pattern(r"\d+"))
            .unwrap();
        registry.define("free", VarSpec::new()).unwrap();
        assert!(registry.validate("port", "8080").unwrap());
        assert!(!registry.validate("port", "abc").unwrap());
        assert!(registry.validate("free", "anything").unwrap());
        assert!(registry.validate("nope", "x").is_err());
    }

    #[test]
    fn suggest_close_names() {
        let mut registry = VariableRegistry::new();
        registry.define("colour", VarSpec::new().alias("color")).unwrap();
        assert_eq!(registry.suggest_name("colr").as_deref(), Some("color"));
        assert_eq!(registry.suggest_name("entirely-different"), None);
    }

    #[test]
    fn trigger_target_lookup() {
        let mut registry = VariableRegistry::new();
        registry
            .define("three", VarSpec::new().trigger("-3"))
            .unwrap();
        assert_eq!(registry.trigger_target("-3").as_deref(), Some("three"));
        assert_eq!(registry.trigger_target("-4"), None);
    }
}
