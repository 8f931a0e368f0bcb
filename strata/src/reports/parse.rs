//! Parse command report data structures.

use std::time::Duration;

use strata_pipeline::{Diagnostic, Timing};

use super::output::{Output, Report};

/// Report data from parsing a batch of files.
#[derive(Debug)]
pub struct ParseReport {
    /// Every unit, in the order given.
    pub units: Vec<UnitTree>,
    /// Timings in the order they were recorded.
    pub timings: Vec<Timing>,
    /// Total time per timing group.
    pub summary: Vec<(String, Duration)>,
    /// Problems reported while parsing.
    pub diagnostics: Vec<Diagnostic>,
    /// Set when some units failed to parse.
    pub failure: Option<String>,
    pub show_trees: bool,
    pub show_timings: bool,
}

/// A unit's printed syntax tree, if it parsed.
#[derive(Debug)]
pub struct UnitTree {
    pub name: String,
    pub tree: Option<String>,
}

impl ParseReport {
    fn parsed_count(&self) -> usize {
        self.units.iter().filter(|u| u.tree.is_some()).count()
    }
}

impl Report for ParseReport {
    fn render(&self, out: &mut dyn Output) {
        for diag in &self.diagnostics {
            out.warning(&diag.to_string());
        }

        if self.show_trees {
            for unit in &self.units {
                if let Some(tree) = &unit.tree {
                    out.divider(&unit.name);
                    out.preformatted(tree.trim_end());
                }
            }
            out.newline();
        }

        if self.show_timings {
            out.section("Timings");
            for timing in &self.timings {
                out.key_value_indented(&timing.label, &format!("{:?}", timing.elapsed));
            }
            out.newline();
            out.section("Summary");
            for (group, total) in &self.summary {
                out.key_value_indented(group, &format!("{:?}", total));
            }
            out.newline();
        }

        match &self.failure {
            Some(failure) => out.warning(&format!("error: {}", failure)),
            None => out.preformatted(&format!(
                "✓ parsed {} unit{}",
                self.parsed_count(),
                if self.parsed_count() == 1 { "" } else { "s" }
            )),
        }
    }
}
