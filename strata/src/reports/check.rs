//! Check command report data structures.

use super::output::{Output, Report};

/// Report data from running the pipeline.
#[derive(Debug)]
pub struct CheckReport {
    /// Number of units checked.
    pub unit_count: usize,
    /// Stages that were run, in order.
    pub stages: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Info messages.
    pub infos: Vec<String>,
    /// Set when a stage failed after reporting diagnostics.
    pub failure: Option<String>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.failure.is_none()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.warning(&format!("error: {}", error));
        }

        for warning in &self.warnings {
            out.warning(&format!("warning: {}", warning));
        }

        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }

        if !self.warnings.is_empty() || !self.errors.is_empty() {
            out.newline();
        }

        if let Some(failure) = &self.failure {
            out.warning(&format!("✗ {}", failure));
        } else if self.is_valid() {
            out.preformatted(&format!(
                "✓ {} unit{} passed {}",
                self.unit_count,
                if self.unit_count == 1 { "" } else { "s" },
                self.stages.join(" → ")
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::RecordingOutput;

    #[test]
    fn test_render_valid() {
        let report = CheckReport {
            unit_count: 2,
            stages: vec!["parse".into(), "check".into()],
            errors: Vec::new(),
            warnings: Vec::new(),
            infos: Vec::new(),
            failure: None,
        };

        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert!(report.is_valid());
        assert_eq!(out.lines, vec!["✓ 2 units passed parse → check"]);
    }

    #[test]
    fn test_render_errors() {
        let report = CheckReport {
            unit_count: 1,
            stages: vec!["parse".into(), "check".into()],
            errors: vec!["division by zero in `(/ 1 0)`\n  --> a.st:1:5".into()],
            warnings: vec!["name 'b' is used before it is bound\n  --> a.st:2:1".into()],
            infos: Vec::new(),
            failure: Some("1 error(s) reported by stage 'check'".into()),
        };

        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert!(!report.is_valid());
        assert_eq!(
            out.lines,
            vec![
                "! error: division by zero in `(/ 1 0)`\n  --> a.st:1:5",
                "! warning: name 'b' is used before it is bound\n  --> a.st:2:1",
                "",
                "! ✗ 1 error(s) reported by stage 'check'",
            ]
        );
    }
}
