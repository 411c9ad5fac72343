//! Value expansion: home-directory, environment, and registry-variable
//! references.
//!
//! Four independent rewrites, each a single non-overlapping pass, applied
//! in a fixed order. Output of one pass is visible to the next, but no pass
//! re-scans its own substitutions — expansion applied once stays applied
//! once.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::expand::environ::Environment;
use crate::registry::VariableRegistry;

static ENV_BRACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+)\}").expect("valid regex"));

static REGISTRY_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\((\w+)\)").expect("valid regex"));

static BARE_VAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$(\w+)").expect("valid regex"));

// ============================================================================
// Public API
// ============================================================================

/// Expands home-directory, environment, and registry references in `raw`.
///
/// Rules, in order:
/// 1. a leading `~` or `~user` (up to the first `/` or end of string)
///    becomes the matching home directory; an unresolvable name is left
///    alone;
/// 2. `${NAME}` becomes the environment variable `NAME`, or empty;
/// 3. `$(NAME)` becomes the registry variable `NAME` (alias and case rules
///    apply), or empty when undefined or unset;
/// 4. bare `$NAME` tries the registry first, then the environment, and is
///    left as literal text when neither resolves.
#[must_use]
pub fn expand(raw: &str, registry: &VariableRegistry) -> String {
    let env = registry.settings().environment().clone();

    let tilded = expand_tilde(raw, env.as_ref());

    let pass2 = ENV_BRACE_RE.replace_all(&tilded, |caps: &Captures| {
        env.var(&caps[1]).unwrap_or_default()
    });

    let pass3 = REGISTRY_PAREN_RE.replace_all(&pass2, |caps: &Captures| {
        registry_text(registry, &caps[1]).unwrap_or_default()
    });

    let pass4 = BARE_VAR_RE.replace_all(&pass3, |caps: &Captures| {
        registry_text(registry, &caps[1])
            .or_else(|| env.var(&caps[1]))
            .unwrap_or_else(|| caps[0].to_string())
    });

    pass4.into_owned()
}

// ============================================================================
// Passes
// ============================================================================

/// Rewrites a leading `~` or `~user`. The user name runs to the first `/`
/// or the end of the string.
fn expand_tilde(raw: &str, env: &dyn Environment) -> String {
    let Some(rest) = raw.strip_prefix('~') else {
        return raw.to_string();
    };
    let end = rest.find('/').unwrap_or(rest.len());
    let user = &rest[..end];

    let home = if user.is_empty() {
        env.home_dir()
    } else {
        env.user_home(user)
    };

    match home {
        Some(home) => format!("{home}{}", &rest[end..]),
        None => raw.to_string(),
    }
}

/// Text of a registry variable that is defined and set; `None` otherwise.
fn registry_text(registry: &VariableRegistry, name: &str) -> Option<String> {
    registry
        .variable(name)
        .map(crate::registry::Variable::value)
        .filter(|value| value.is_set())
        .map(ToString::to_string)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::environ::FixedEnvironment;
    use crate::registry::{RegistrySettings, VarSpec};
    use proptest::prelude::*;

    fn registry() -> VariableRegistry {
        let env = FixedEnvironment::new()
            .with_var("SHELL", "/bin/sh")
            .with_var("EDITOR", "vi")
            .with_home("/home/abw")
            .with_user_home("kate", "/home/kate");
        let mut registry =
            VariableRegistry::with_settings(RegistrySettings::default().with_environment(env));
        registry
            .define("root", VarSpec::new().default("/opt/app"))
            .unwrap();
        registry.define("empty", VarSpec::new()).unwrap();
        registry
    }

    #[test]
    fn tilde_alone_expands_to_home() {
        let registry = registry();
        assert_eq!(expand("~", &registry), "/home/abw");
        assert_eq!(expand("~/bin", &registry), "/home/abw/bin");
    }

    #[test]
    fn tilde_user_expands_to_user_home() {
        let registry = registry();
        assert_eq!(expand("~kate/docs", &registry), "/home/kate/docs");
    }

    #[test]
    fn tilde_unknown_user_left_alone() {
        let registry = registry();
        assert_eq!(expand("~nobody/docs", &registry), "~nobody/docs");
    }

    #[test]
    fn tilde_only_at_start() {
        let registry = registry();
        assert_eq!(expand("path/~kate", &registry), "path/~kate");
    }

    #[test]
    fn braced_env_reference() {
        let registry = registry();
        assert_eq!(expand("${SHELL} -c", &registry), "/bin/sh -c");
    }

    #[test]
    fn braced_env_unset_becomes_empty() {
        let registry = registry();
        assert_eq!(expand("x${NOPE}y", &registry), "xy");
    }

    #[test]
    fn parenthesized_registry_reference() {
        let registry = registry();
        assert_eq!(expand("$(root)/etc", &registry), "/opt/app/etc");
    }

    #[test]
    fn parenthesized_undefined_or_unset_becomes_empty() {
        let registry = registry();
        assert_eq!(expand("x$(missing)y", &registry), "xy");
        assert_eq!(expand("x$(empty)y", &registry), "xy");
    }

    #[test]
    fn bare_reference_prefers_registry() {
        let registry = registry();
        assert_eq!(expand("$root/etc", &registry), "/opt/app/etc");
    }

    #[test]
    fn bare_reference_falls_back_to_env() {
        let registry = registry();
        assert_eq!(expand("$EDITOR +1", &registry), "vi +1");
    }

    #[test]
    fn bare_reference_unresolved_stays_literal() {
        let registry = registry();
        assert_eq!(expand("cost is $PRICE", &registry), "cost is $PRICE");
    }

    #[test]
    fn unset_registry_variable_falls_through_to_env() {
        let env = FixedEnvironment::new().with_var("EMPTY", "from-env");
        let mut registry =
            VariableRegistry::with_settings(RegistrySettings::default().with_environment(env));
        registry.define("empty", VarSpec::new()).unwrap();
        // Defined but absent: bare reference falls back to the environment.
        assert_eq!(expand("$EMPTY", &registry), "from-env");
    }

    #[test]
    fn all_rules_in_one_value() {
        let registry = registry();
        assert_eq!(
            expand("~kate/${SHELL}/$(root)/$EDITOR/$NOPE", &registry),
            "/home/kate//bin/sh//opt/app/vi/$NOPE"
        );
    }

    #[test]
    fn registry_lookup_respects_aliases() {
        let env = FixedEnvironment::new();
        let mut registry =
            VariableRegistry::with_settings(RegistrySettings::default().with_environment(env));
        registry
            .define("basedir", VarSpec::new().default("/srv").alias("base"))
            .unwrap();
        assert_eq!(expand("$(BASE)/data", &registry), "/srv/data");
    }

    proptest! {
        #[test]
        fn plain_text_is_unchanged(s in "[A-Za-z0-9 _./:-]*") {
            // No '$' and no leading '~' means nothing to rewrite.
            let registry = registry();
            prop_assume!(!s.starts_with('~'));
            prop_assert_eq!(expand(&s, &registry), s);
        }

        #[test]
        fn expansion_never_panics(s in "\\PC*") {
            let registry = registry();
            let _ = expand(&s, &registry);
        }
    }
}
