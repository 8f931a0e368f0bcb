//! Compilation units and their syntax tree slot.

use serde::Serialize;
use strata_core::SourceFile;
use strata_syntax::SyntaxTree;

/// The syntax tree slot of a compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "tree", rename_all = "snake_case")]
pub enum Body {
    /// No parsing pass has stored a tree yet.
    #[default]
    Unparsed,
    /// The tree stored by the most recent parsing pass.
    Parsed(SyntaxTree),
}

impl Body {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Body::Parsed(_))
    }

    pub fn tree(&self) -> Option<&SyntaxTree> {
        match self {
            Body::Parsed(tree) => Some(tree),
            Body::Unparsed => None,
        }
    }
}

/// One source input tracked through every pipeline stage.
///
/// The source is fixed at creation. The body can only be written from inside
/// this crate, which is how the parsing stage stays its only writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    source: SourceFile,
    body: Body,
}

impl CompilationUnit {
    pub fn new(source: SourceFile) -> Self {
        Self {
            source,
            body: Body::Unparsed,
        }
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn is_parsed(&self) -> bool {
        self.body.is_parsed()
    }

    /// The parsed tree, if a parsing pass has stored one.
    pub fn tree(&self) -> Option<&SyntaxTree> {
        self.body.tree()
    }

    /// Store a freshly parsed tree, replacing any earlier one.
    pub(crate) fn set_tree(&mut self, tree: SyntaxTree) {
        self.body = Body::Parsed(tree);
    }
}

impl From<SourceFile> for CompilationUnit {
    fn from(source: SourceFile) -> Self {
        Self::new(source)
    }
}
