//! The parser seam used by [`ParserStage`](crate::ParserStage).
//!
//! The stage does not know how parsing works. It asks a [`ParserFactory`]
//! for a fresh [`Parse`] implementation per unit and calls it once.

use strata_core::{CancelToken, SourceFile};
use strata_syntax::{ParseOutput, Parser, ParserOptions, SyntaxError};

/// A parser bound to one unit's source.
pub trait Parse {
    /// Produce the unit's syntax tree.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed input unless the parser recovers, in
    /// which case the problems are returned in [`ParseOutput::errors`].
    fn parse(&mut self) -> Result<ParseOutput, SyntaxError>;
}

/// Builds a fresh parser for each unit.
///
/// The factory is shared between workers in parallel mode, so it must be
/// `Sync`; the parsers it builds are used by one worker only.
pub trait ParserFactory: Send + Sync {
    type Parser: Parse;

    /// Create a parser for `source` that stops when `cancel` fires.
    fn parser(&self, source: &SourceFile, cancel: &CancelToken) -> Self::Parser;
}

impl Parse for Parser {
    fn parse(&mut self) -> Result<ParseOutput, SyntaxError> {
        Parser::parse(self)
    }
}

/// Factory for the reference [`strata_syntax::Parser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxFactory {
    options: ParserOptions,
}

impl SyntaxFactory {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// A factory whose parsers skip malformed statements.
    pub fn recovering() -> Self {
        Self::new(ParserOptions::recovering())
    }
}

impl ParserFactory for SyntaxFactory {
    type Parser = Parser;

    fn parser(&self, source: &SourceFile, cancel: &CancelToken) -> Parser {
        Parser::new(source.clone(), self.options, cancel.clone())
    }
}
