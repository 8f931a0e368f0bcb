//! Reference lexer and parser for Strata programs.
//!
//! The grammar is deliberately small: statements separated by newlines or
//! `;`, each either `let <name> = <expr>` or a bare expression over integers,
//! names, `+ - * /`, unary minus and parentheses.
//!
//! # Example
//!
//! ```
//! use strata_core::{CancelToken, SourceFile};
//! use strata_syntax::{Parser, ParserOptions};
//!
//! let source = SourceFile::new("main.st", "let x = 1 + 2\nx * 3");
//! let mut parser = Parser::new(source, ParserOptions::default(), CancelToken::new());
//! let output = parser.parse().unwrap();
//! assert_eq!(output.tree.statements.len(), 2);
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod lexer;
mod parser;
mod token;
mod tree;

pub use error::SyntaxError;
pub use parser::{DEFAULT_MAX_DEPTH, ParseOutput, Parser, ParserOptions};
pub use token::{Token, TokenKind};
pub use tree::{BinaryOp, Expr, Ident, Stmt, SyntaxTree, UnaryOp};

/// Parse a source in strict mode without cancellation.
pub fn parse(source: &strata_core::SourceFile) -> Result<SyntaxTree, SyntaxError> {
    let mut parser = Parser::new(
        source.clone(),
        ParserOptions::default(),
        strata_core::CancelToken::new(),
    );
    parser.parse().map(|output| output.tree)
}
