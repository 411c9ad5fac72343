//! Command-line ingestion.
//!
//! Consumes a mutable token list: flags are matched against registered
//! triggers and the variable namespace, option arguments are extracted per
//! the argument-count policy, and values terminate in `set`. Consumed
//! tokens are removed; everything else stays in `argv`, in order, for the
//! caller. No value expansion happens here.

use crate::registry::{Value, Variable, VariableRegistry};
use crate::report::{Issue, IssueKind, ParseReport, Reporter};

/// Issue source label for command-line problems.
const ARGV_SOURCE: &str = "argv";

// ============================================================================
// CommandLineParser
// ============================================================================

/// Parses flag tokens out of an argument list into registry values.
#[derive(Debug, Clone, Copy)]
pub struct CommandLineParser;

impl CommandLineParser {
    /// Parses `argv` in place.
    ///
    /// If the registry is configured with a command environment variable
    /// and that variable is set, its whitespace-split tokens are prepended
    /// first (no quote handling). Scanning stops at the end-of-arguments
    /// marker (consumed) or the first non-`-` token (left in place). The
    /// call itself always succeeds; per-token problems are reported and
    /// collected in the returned report.
    pub fn parse(registry: &mut VariableRegistry, argv: &mut Vec<String>) -> ParseReport {
        prepend_env_tokens(registry, argv);

        if let Some(hook) = registry.settings().args_hook() {
            return hook(registry, argv);
        }

        let arg_hook = registry.settings().arg_hook();
        let mut reporter = Reporter::new(registry.settings().error_hook());

        while argv.first().is_some_and(|token| token.starts_with('-')) {
            let token = argv.remove(0);
            if token == registry.settings().end_of_args() {
                break;
            }

            let Some(canonical) = match_flag(registry, &token) else {
                let mut message = format!("unrecognized flag '{token}'");
                if let Some(suggestion) = registry.suggest_name(token.trim_start_matches('-')) {
                    message.push_str(&format!(" (did you mean '-{suggestion}'?)"));
                }
                reporter.issue(Issue {
                    kind: IssueKind::InvalidFlag,
                    source: ARGV_SOURCE.to_string(),
                    line: None,
                    message,
                });
                continue;
            };

            if let Some(hook) = &arg_hook {
                if hook(registry, &token, &canonical, argv) {
                    continue;
                }
            }

            let argument_required = registry
                .variable(&canonical)
                .is_some_and(Variable::argument_required);

            let candidate = if argument_required {
                match argv.first() {
                    Some(next) if !next.starts_with('-') => Value::Str(argv.remove(0)),
                    _ => {
                        reporter.issue(Issue {
                            kind: IssueKind::MissingArgument,
                            source: ARGV_SOURCE.to_string(),
                            line: None,
                            message: format!("flag '{token}' expects an argument"),
                        });
                        continue;
                    }
                }
            } else {
                Value::Flag(true)
            };

            let accepted = registry
                .variable(&canonical)
                .is_none_or(|var| var.check(&candidate.to_string()));
            if !accepted {
                reporter.issue(Issue {
                    kind: IssueKind::ValidationFailed,
                    source: ARGV_SOURCE.to_string(),
                    line: None,
                    message: format!("invalid value '{candidate}' for '{canonical}'"),
                });
                continue;
            }

            if registry.set(&canonical, candidate).is_ok() {
                reporter.applied();
            }
        }

        reporter.finish()
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Prepends whitespace-split tokens from the configured environment
/// variable, preserving their order.
fn prepend_env_tokens(registry: &VariableRegistry, argv: &mut Vec<String>) {
    let Some(name) = registry.settings().cmd_env_var() else {
        return;
    };
    let Some(text) = registry.settings().environment().var(name) else {
        return;
    };
    for (index, token) in text.split_whitespace().enumerate() {
        argv.insert(index, token.to_string());
    }
}

/// Matches a flag token: an exact trigger first, then the token with its
/// leading dashes stripped resolved through the variable namespace.
fn match_flag(registry: &VariableRegistry, token: &str) -> Option<String> {
    if let Some(target) = registry.trigger_target(token) {
        return Some(target);
    }
    let stripped = token.trim_start_matches('-');
    if stripped.is_empty() {
        return None;
    }
    let canonical = registry.resolve(stripped);
    registry.is_defined(&canonical).then_some(canonical)
}

// ============================================================================
// Tests
// ============================================================================
