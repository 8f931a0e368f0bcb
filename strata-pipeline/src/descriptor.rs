//! Phase identity and ordering.

use std::fmt;

use serde::Serialize;

/// Immutable identity of a pipeline phase.
///
/// Created once when the pipeline is assembled and shared by the stage that
/// runs the phase. `id` gives the phase's position; ids increase along the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PhaseDescriptor {
    name: String,
    id: u32,
}

impl PhaseDescriptor {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for PhaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}
