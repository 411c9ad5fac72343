//! Process-environment lookups behind an injectable collaborator.
//!
//! The expansion engine and the command-line preprocessor never touch
//! `std::env` directly; they go through the registry's [`Environment`], so
//! hosts and tests can substitute a fixed view.

use std::collections::HashMap;

// ============================================================================
// Environment
// ============================================================================

/// Read-only lookups the expansion engine needs from the outside world.
pub trait Environment {
    /// The value of an environment variable, if set.
    fn var(&self, name: &str) -> Option<String>;

    /// The invoking user's home directory.
    fn home_dir(&self) -> Option<String>;

    /// The named user's home directory.
    fn user_home(&self, user: &str) -> Option<String>;
}

// ============================================================================
// SystemEnvironment
// ============================================================================

/// The real process environment and user database.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn home_dir(&self) -> Option<String> {
        std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
    }

    #[cfg(unix)]
    fn user_home(&self, user: &str) -> Option<String> {
        passwd_home(user)
    }

    #[cfg(not(unix))]
    fn user_home(&self, _user: &str) -> Option<String> {
        None
    }
}

/// Looks up a home directory in `/etc/passwd` (`name:pw:uid:gid:gecos:home:shell`).
#[cfg(unix)]
fn passwd_home(user: &str) -> Option<String> {
    let passwd = std::fs::read_to_string("/etc/passwd").ok()?;
    passwd.lines().find_map(|line| {
        let mut fields = line.split(':');
        if fields.next()? != user {
            return None;
        }
        fields.nth(4).map(str::to_string)
    })
}

// ============================================================================
// FixedEnvironment
// ============================================================================

/// A fully synthetic environment, for tests and hermetic hosts.
///
/// ```
/// use confvar::{Environment, FixedEnvironment};
///
/// let env = FixedEnvironment::new()
///     .with_var("LANG", "en_US.UTF-8")
///     .with_home("/home/demo");
/// assert_eq!(env.var("LANG").as_deref(), Some("en_US.UTF-8"));
/// assert_eq!(env.var("OTHER"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedEnvironment {
    vars: HashMap<String, String>,
    homes: HashMap<String, String>,
    home: Option<String>,
}

impl FixedEnvironment {
    /// Creates an environment with no variables and no home directories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an environment variable.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Sets the invoking user's home directory.
    #[must_use]
    pub fn with_home(mut self, home: impl Into<String>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Adds a named user's home directory.
    #[must_use]
    pub fn with_user_home(mut self, user: impl Into<String>, home: impl Into<String>) -> Self {
        self.homes.insert(user.into(), home.into());
        self
    }
}

impl Environment for FixedEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn home_dir(&self) -> Option<String> {
        self.home.clone()
    }

    fn user_home(&self, user: &str) -> Option<String> {
        self.homes.get(user).cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_environment_lookups() {
        let env = FixedEnvironment::new()
            .with_var("A", "1")
            .with_home("/home/me")
            .with_user_home("guest", "/home/guest");

        assert_eq!(env.var("A").as_deref(), Some("1"));
        assert_eq!(env.var("B"), None);
        assert_eq!(env.home_dir().as_deref(), Some("/home/me"));
        assert_eq!(env.user_home("guest").as_deref(), Some("/home/guest"));
        assert_eq!(env.user_home("nobody-here"), None);
    }

    #[test]
    fn empty_fixed_environment_resolves_nothing() {
        let env = FixedEnvironment::new();
        assert_eq!(env.var("PATH"), None);
        assert_eq!(env.home_dir(), None);
    }

    #[test]
    fn system_environment_reads_process_vars() {
        // PATH is set in any reasonable test environment.
        let env = SystemEnvironment;
        assert!(env.var("PATH").is_some());
        assert_eq!(env.var("CONFVAR_TEST_UNSET_XYZ"), None);
    }

    #[cfg(unix)]
    #[test]
    fn passwd_lookup_finds_root() {
        let env = SystemEnvironment;
        // Every Unix passwd database has root.
        assert!(env.user_home("root").is_some());
        assert_eq!(env.user_home("confvar-no-such-user"), None);
    }
}
