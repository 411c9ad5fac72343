//! Configuration-file ingestion.
//!
//! Reads a line-oriented config stream, applies continuation, comment, and
//! whitespace rules, splits each entry into a variable/value pair, and
//! drives the registry, the expander, and the validators. Only a stream
//! that cannot be opened or read is fatal; every per-line problem is
//! reported and skipped.

use std::io::Read;
use std::path::Path;

use crate::error::IngestError;
use crate::expand::expand;
use crate::registry::{Value, VariableRegistry};
use crate::report::{Issue, IssueKind, ParseReport, Reporter};

// ============================================================================
// ConfigFileReader
// ============================================================================

/// Parses configuration files into registry values.
///
/// Format: `name value`, `name = value`, or bare `name` entries; `#` and
/// blank lines are skipped; a trailing `\` continues the entry onto the
/// next line.
#[derive(Debug, Clone, Copy)]
pub struct ConfigFileReader;

impl ConfigFileReader {
    /// Parses the file at `path`.
    ///
    /// # Errors
    ///
    /// [`IngestError::FileOpen`] when the file cannot be opened or read;
    /// this is the only fatal failure.
    pub fn parse_file(
        registry: &mut VariableRegistry,
        path: impl AsRef<Path>,
    ) -> Result<ParseReport, IngestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| IngestError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse_str(registry, &path.display().to_string(), &text))
    }

    /// Parses from an already-open stream. `source` names the stream in
    /// reported issues.
    ///
    /// # Errors
    ///
    /// [`IngestError::Read`] when the stream cannot be read to completion.
    pub fn parse_reader<R: Read>(
        registry: &mut VariableRegistry,
        source: &str,
        mut reader: R,
    ) -> Result<ParseReport, IngestError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::parse_str(registry, source, &text))
    }

    /// Parses configuration text that is already in memory.
    #[must_use]
    pub fn parse_str(registry: &mut VariableRegistry, source: &str, text: &str) -> ParseReport {
        if let Some(hook) = registry.settings().file_hook() {
            return hook(registry, source, text);
        }

        let line_hook = registry.settings().line_hook();
        let mut reporter = Reporter::new(registry.settings().error_hook());

        let lines: Vec<&str> = text.lines().collect();
        let mut index = 0;
        while index < lines.len() {
            let lineno = index + 1;
            let mut entry = lines[index].to_string();
            index += 1;

            while ends_in_continuation(&entry) && index < lines.len() {
                entry.pop();
                entry.push_str(lines[index]);
                index += 1;
            }

            let entry = entry.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }

            if let Some(hook) = &line_hook {
                if hook(registry, source, lineno, entry) {
                    continue;
                }
            }

            let Some((name, raw_value)) = split_entry(entry) else {
                reporter.issue(Issue {
                    kind: IssueKind::ParseError,
                    source: source.to_string(),
                    line: Some(lineno),
                    message: format!("unparseable entry '{entry}'"),
                });
                continue;
            };

            apply_entry(registry, &mut reporter, source, lineno, name, raw_value);
        }

        reporter.finish()
    }
}

// ============================================================================
// Line Handling
// ============================================================================

/// An odd number of trailing backslashes continues the entry; an even
/// number is literal content.
fn ends_in_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits a trimmed entry at the first whitespace run or `=` (whitespace
/// around `=` ignored). Returns `None` when no variable token is present.
fn split_entry(entry: &str) -> Option<(&str, Option<&str>)> {
    let name_end = entry
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(entry.len());
    let name = &entry[..name_end];
    if name.is_empty() {
        return None;
    }

    let rest = entry[name_end..].trim_start();
    let rest = rest.strip_prefix('=').map_or(rest, str::trim_start);
    let value = rest.trim_end();
    Some((name, (!value.is_empty()).then_some(value)))
}

/// Default handling for one split entry: resolve, default, expand,
/// validate, set.
fn apply_entry(
    registry: &mut VariableRegistry,
    reporter: &mut Reporter,
    source: &str,
    lineno: usize,
    name: &str,
    raw_value: Option<&str>,
) {
    let canonical = registry.resolve(name);
    let Some(var) = registry.variable(&canonical) else {
        let mut message = format!("no such variable '{name}'");
        if let Some(suggestion) = registry.suggest_name(name) {
            message.push_str(&format!(" (did you mean '{suggestion}'?)"));
        }
        reporter.issue(Issue {
            kind: IssueKind::UndefinedVariable,
            source: source.to_string(),
            line: Some(lineno),
            message,
        });
        return;
    };
    let argument_required = var.argument_required();
    let expand_policy = var.expand();

    let candidate = match raw_value {
        Some(raw) => {
            let text = if expand_policy {
                expand(raw, registry)
            } else {
                raw.to_string()
            };
            Value::Str(text)
        }
        // A bare entry turns the variable on, unless it expects an
        // explicit value, in which case it is left as defined.
        None if argument_required => return,
        None => Value::Flag(true),
    };

    let accepted = registry
        .variable(&canonical)
        .is_none_or(|var| var.check(&candidate.to_string()));
    if !accepted {
        reporter.issue(Issue {
            kind: IssueKind::ValidationFailed,
            source: source.to_string(),
            line: Some(lineno),
            message: format!("invalid value '{candidate}' for '{canonical}'"),
        });
        return;
    }

    if registry.set(&canonical, candidate).is_ok() {
        reporter.applied();
    }
}

// ============================================================================
// Tests
// ============================================================================
