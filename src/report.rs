//! Structured reporting for recoverable ingestion problems.
//!
//! Both ingestion paths collect every per-item failure into a
//! [`ParseReport`] so callers can see exactly which lines or arguments were
//! skipped. Each issue is also routed, at the moment it occurs, through a
//! single sink: the host-supplied error hook if one is configured,
//! otherwise a `tracing` warning.

use tracing::warn;

use crate::registry::ErrorHook;

// ============================================================================
// Issues
// ============================================================================

/// The kind of recoverable problem encountered while ingesting values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// A configuration-file line matched no splitting pattern.
    ParseError,
    /// A line or argument named a variable that is not defined.
    UndefinedVariable,
    /// A candidate value was rejected by the variable's validator.
    ValidationFailed,
    /// A flag that requires a value was not given one.
    MissingArgument,
    /// A `-`-prefixed token matched no trigger or variable.
    InvalidFlag,
}

impl IssueKind {
    /// Short label used in formatted messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ParseError => "parse error",
            Self::UndefinedVariable => "undefined variable",
            Self::ValidationFailed => "validation failed",
            Self::MissingArgument => "missing argument",
            Self::InvalidFlag => "invalid flag",
        }
    }
}

/// A single recoverable problem, with enough context to locate it.
#[derive(Debug, Clone)]
pub struct Issue {
    /// What went wrong.
    pub kind: IssueKind,
    /// Where the offending item came from (file path, `"argv"`, ...).
    pub source: String,
    /// Line number within the source, when the source is line-oriented.
    pub line: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.source, line, self.message),
            None => write!(f, "{}: {}", self.source, self.message),
        }
    }
}

// ============================================================================
// Parse Report
// ============================================================================

/// Result of one ingestion pass.
///
/// `parse` calls succeed as long as the stream was readable; this report
/// carries the per-item outcomes.
#[derive(Debug, Default)]
pub struct ParseReport {
    /// Number of values successfully applied via `set`.
    pub applied: usize,
    /// Problems that were reported and skipped.
    pub issues: Vec<Issue>,
}

impl ParseReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no issues were reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns the issues of a given kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Collects issues into a [`ParseReport`] while dispatching each one to the
/// configured sink.
pub(crate) struct Reporter {
    hook: Option<ErrorHook>,
    report: ParseReport,
}

impl Reporter {
    pub(crate) fn new(hook: Option<ErrorHook>) -> Self {
        Self {
            hook,
            report: ParseReport::new(),
        }
    }

    /// Reports one issue: sink first, then record.
    pub(crate) fn issue(&mut self, issue: Issue) {
        match &self.hook {
            Some(hook) => hook(&issue),
            None => warn!(kind = issue.kind.label(), "{issue}"),
        }
        self.report.issues.push(issue);
    }

    pub(crate) fn applied(&mut self) {
        self.report.applied += 1;
    }

    pub(crate) fn finish(self) -> ParseReport {
        self.report
    }
}

// ============================================================================
// Tests
// ============================================================================
