//! Run-wide timing and diagnostic services.

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;

use crate::{
    diagnostic::{Diagnostic, Severity},
    error::SessionError,
};

/// Elapsed time recorded for one labelled scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timing {
    pub label: String,
    pub elapsed: Duration,
}

/// The compilation session shared by every stage of a run.
///
/// Holds one shared timing scope driven by [`Session::start`] and
/// [`Session::stop`], which is not reentrant, plus the recorded timings and
/// the diagnostic sink. Concurrent workers should use [`Session::scope`]
/// instead of the shared scope; each call returns an independent handle.
#[derive(Debug, Default)]
pub struct Session {
    open_scope: Mutex<Option<Instant>>,
    timings: Mutex<Vec<Timing>>,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the shared timing scope.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ScopeAlreadyOpen`] if a scope is already open.
    pub fn start(&self) -> Result<(), SessionError> {
        let mut open = self.open_scope.lock();
        if open.is_some() {
            return Err(SessionError::ScopeAlreadyOpen);
        }
        *open = Some(Instant::now());
        Ok(())
    }

    /// Close the shared timing scope and record its duration under `label`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoOpenScope`] if [`Session::start`] was not
    /// called first.
    pub fn stop(&self, label: impl Into<String>) -> Result<Duration, SessionError> {
        let label = label.into();
        let Some(started) = self.open_scope.lock().take() else {
            return Err(SessionError::NoOpenScope { label });
        };
        let elapsed = started.elapsed();
        self.record(Timing { label, elapsed });
        Ok(elapsed)
    }

    /// Whether the shared timing scope is currently open.
    pub fn is_timing(&self) -> bool {
        self.open_scope.lock().is_some()
    }

    /// Start an independent timing scope.
    ///
    /// Unlike [`Session::start`], any number of these may be open at once.
    pub fn scope(&self) -> TimingScope<'_> {
        TimingScope {
            session: self,
            started: Instant::now(),
        }
    }

    pub fn record(&self, timing: Timing) {
        tracing::trace!(label = %timing.label, elapsed = ?timing.elapsed, "timing recorded");
        self.timings.lock().push(timing);
    }

    /// All recorded timings in the order they were recorded.
    pub fn timings(&self) -> Vec<Timing> {
        self.timings.lock().clone()
    }

    /// Total time per label category, in first-seen order.
    ///
    /// The category is the first word of the label, so `parsed a.st` and
    /// `parsed b.st` add up under `parsed`.
    pub fn summary(&self) -> IndexMap<String, Duration> {
        let mut summary: IndexMap<String, Duration> = IndexMap::new();
        for timing in self.timings.lock().iter() {
            let category = timing
                .label
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string();
            *summary.entry(category).or_default() += timing.elapsed;
        }
        summary
    }

    /// Add a diagnostic to the session sink.
    pub fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => tracing::debug!(phase = %diagnostic.phase, "{}", diagnostic),
            Severity::Warning | Severity::Info => {
                tracing::trace!(phase = %diagnostic.phase, "{}", diagnostic)
            }
        }
        self.diagnostics.lock().push(diagnostic);
    }

    /// Add an error diagnostic.
    pub fn add_error(&self, phase: &str, message: impl Into<String>) {
        self.report(Diagnostic::error(phase, message));
    }

    /// Add a warning diagnostic.
    pub fn add_warning(&self, phase: &str, message: impl Into<String>) {
        self.report(Diagnostic::warning(phase, message));
    }

    /// All diagnostics reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    /// Check if any error diagnostics have been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.lock().iter().any(|d| d.severity.is_error())
    }

    /// Count the number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Count the number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .lock()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// An independent timing scope obtained from [`Session::scope`].
///
/// Consumed by [`TimingScope::finish`], so it cannot be closed twice.
/// Dropping it without finishing records nothing.
#[must_use = "a timing scope records nothing until finished"]
#[derive(Debug)]
pub struct TimingScope<'s> {
    session: &'s Session,
    started: Instant,
}

impl TimingScope<'_> {
    /// Record the elapsed time under `label` and return it.
    pub fn finish(self, label: impl Into<String>) -> Duration {
        let elapsed = self.started.elapsed();
        self.session.record(Timing {
            label: label.into(),
            elapsed,
        });
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    #[test]
    fn test_start_stop_records_timing() {
        let session = Session::new();
        session.start().unwrap();
        assert!(session.is_timing());
        session.stop("parsed a.st").unwrap();

        assert!(!session.is_timing());
        let timings = session.timings();
        assert_eq!(timings.len(), 1);
        assert_eq!(timings[0].label, "parsed a.st");
    }

    #[test]
    fn test_start_is_not_reentrant() {
        let session = Session::new();
        session.start().unwrap();
        assert_eq!(session.start(), Err(SessionError::ScopeAlreadyOpen));
    }

    #[test]
    fn test_stop_without_start() {
        let session = Session::new();
        let err = session.stop("orphan").unwrap_err();
        assert_eq!(
            err,
            SessionError::NoOpenScope {
                label: "orphan".into()
            }
        );
        assert!(session.timings().is_empty());
    }

    #[test]
    fn test_scopes_are_independent_of_shared_scope() {
        let session = Session::new();
        session.start().unwrap();
        let first = session.scope();
        let second = session.scope();
        second.finish("b");
        first.finish("a");
        session.stop("shared").unwrap();

        let labels: Vec<_> = session.timings().into_iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["b", "a", "shared"]);
    }

    #[test]
    fn test_scopes_across_threads() {
        let session = Arc::new(Session::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let session = Arc::clone(&session);
                thread::spawn(move || {
                    session.scope().finish(format!("parsed unit{}", i));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(session.timings().len(), 4);
    }

    #[test]
    fn test_summary_groups_by_first_word() {
        let session = Session::new();
        session.record(Timing {
            label: "parsed a.st".into(),
            elapsed: Duration::from_millis(2),
        });
        session.record(Timing {
            label: "failed b.st".into(),
            elapsed: Duration::from_millis(1),
        });
        session.record(Timing {
            label: "parsed c.st".into(),
            elapsed: Duration::from_millis(3),
        });

        let summary = session.summary();
        let keys: Vec<_> = summary.keys().cloned().collect();
        assert_eq!(keys, vec!["parsed", "failed"]);
        assert_eq!(summary["parsed"], Duration::from_millis(5));
    }

    #[test]
    fn test_diagnostics() {
        let session = Session::new();
        session.add_error("parse", "bad token");
        session.add_warning("check", "suspicious");
        session.report(Diagnostic::info("check", "note"));

        assert!(session.has_errors());
        assert_eq!(session.error_count(), 1);
        assert_eq!(session.warning_count(), 1);
        assert_eq!(session.diagnostics().len(), 3);
    }
}
