use miette::{Diagnostic, NamedSource, SourceSpan};
use strata_core::{Interrupt, SourceFile, Span};
use thiserror::Error;

/// Source context for building syntax errors.
///
/// Every error carries the full source so miette can render it on its own.
#[derive(Debug, Clone)]
pub(crate) struct SourceContext {
    source: SourceFile,
}

impl SourceContext {
    pub fn new(source: SourceFile) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.source.name(), self.source.text().to_string())
    }

    pub fn unexpected_char(&self, ch: char, span: Span) -> SyntaxError {
        SyntaxError::UnexpectedChar {
            src: self.named_source(),
            span: span.into(),
            ch,
        }
    }

    pub fn unexpected_token(
        &self,
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> SyntaxError {
        SyntaxError::UnexpectedToken {
            src: self.named_source(),
            span: span.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn integer_overflow(&self, literal: impl Into<String>, span: Span) -> SyntaxError {
        SyntaxError::IntegerOverflow {
            src: self.named_source(),
            span: span.into(),
            literal: literal.into(),
        }
    }

    pub fn unclosed_paren(&self, span: Span) -> SyntaxError {
        SyntaxError::UnclosedParen {
            src: self.named_source(),
            span: span.into(),
        }
    }

    pub fn too_deep(&self, span: Span, limit: usize) -> SyntaxError {
        SyntaxError::TooDeep {
            src: self.named_source(),
            span: span.into(),
            limit,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum SyntaxError {
    #[error("unexpected character '{ch}'")]
    #[diagnostic(
        code(strata::unexpected_char),
        help("only digits, names, `let`, `+ - * /`, `=`, `;` and parentheses are allowed")
    )]
    UnexpectedChar {
        #[source_code]
        src: NamedSource<String>,
        #[label("not valid here")]
        span: SourceSpan,
        ch: char,
    },

    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(strata::unexpected_token))]
    UnexpectedToken {
        #[source_code]
        src: NamedSource<String>,
        #[label("unexpected {found}")]
        span: SourceSpan,
        expected: String,
        found: String,
    },

    #[error("integer literal '{literal}' does not fit in 64 bits")]
    #[diagnostic(code(strata::integer_overflow))]
    IntegerOverflow {
        #[source_code]
        src: NamedSource<String>,
        #[label("too large")]
        span: SourceSpan,
        literal: String,
    },

    #[error("unclosed parenthesis")]
    #[diagnostic(code(strata::unclosed_paren), help("add a matching ')'"))]
    UnclosedParen {
        #[source_code]
        src: NamedSource<String>,
        #[label("opened here")]
        span: SourceSpan,
    },

    #[error("expression nests deeper than {limit} levels")]
    #[diagnostic(
        code(strata::too_deep),
        help("split the expression using `let` bindings")
    )]
    TooDeep {
        #[source_code]
        src: NamedSource<String>,
        #[label("limit reached here")]
        span: SourceSpan,
        limit: usize,
    },

    #[error("{message}")]
    #[diagnostic(code(strata::invalid_syntax))]
    Invalid {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("parsing interrupted: {reason}")]
    #[diagnostic(code(strata::interrupted))]
    Interrupted { reason: Interrupt },
}

impl SyntaxError {
    /// Create a free-form syntax error at `span` in `source`.
    pub fn invalid(source: &SourceFile, message: impl Into<String>, span: Span) -> Self {
        SyntaxError::Invalid {
            src: NamedSource::new(source.name(), source.text().to_string()),
            span: span.into(),
            message: message.into(),
        }
    }

    /// Create an error for a parse that was stopped before it finished.
    pub fn interrupted(reason: Interrupt) -> Self {
        SyntaxError::Interrupted { reason }
    }

    /// Byte offset the error points at, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            SyntaxError::UnexpectedChar { span, .. }
            | SyntaxError::UnexpectedToken { span, .. }
            | SyntaxError::IntegerOverflow { span, .. }
            | SyntaxError::UnclosedParen { span, .. }
            | SyntaxError::TooDeep { span, .. }
            | SyntaxError::Invalid { span, .. } => Some(span.offset()),
            SyntaxError::Interrupted { .. } => None,
        }
    }

    /// The interrupt reason when the parse was cancelled or timed out.
    pub fn interrupt(&self) -> Option<Interrupt> {
        match self {
            SyntaxError::Interrupted { reason } => Some(*reason),
            _ => None,
        }
    }
}
