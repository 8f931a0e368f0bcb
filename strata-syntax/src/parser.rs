//! Recursive-descent parser.

use strata_core::{CancelToken, SourceFile, Span};

use crate::{
    error::{SourceContext, SyntaxError},
    lexer::tokenize,
    token::{Token, TokenKind},
    tree::{BinaryOp, Expr, Ident, Stmt, SyntaxTree, UnaryOp},
};

/// Default for [`ParserOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parser behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Skip malformed statements and keep going instead of failing on the
    /// first error.
    pub recover: bool,
    /// Deepest expression accepted. Parentheses, unary `-` and each chained
    /// binary operator add one level.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            recover: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserOptions {
    pub fn recovering() -> Self {
        Self {
            recover: true,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Result of a successful parse.
///
/// In recovering mode `errors` holds every problem that was skipped over and
/// `tree` only the statements that parsed cleanly. In strict mode `errors` is
/// always empty.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub tree: SyntaxTree,
    pub errors: Vec<SyntaxError>,
}

impl ParseOutput {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parser bound to a single source.
pub struct Parser {
    ctx: SourceContext,
    options: ParserOptions,
    cancel: CancelToken,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(source: SourceFile, options: ParserOptions, cancel: CancelToken) -> Self {
        Self {
            ctx: SourceContext::new(source),
            options,
            cancel,
            tokens: Vec::new(),
            pos: 0,
            depth: 0,
        }
    }

    pub fn source(&self) -> &SourceFile {
        self.ctx.source()
    }

    /// Parse the whole source.
    ///
    /// The cancel token is checked while tokenizing, before every statement
    /// and at every nesting step. An interrupt is never recovered from, even
    /// in recovering mode.
    pub fn parse(&mut self) -> Result<ParseOutput, SyntaxError> {
        let (tokens, mut errors) =
            tokenize(&self.ctx, &self.cancel).map_err(SyntaxError::interrupted)?;
        if !self.options.recover && !errors.is_empty() {
            return Err(errors.remove(0));
        }
        self.tokens = tokens;
        self.pos = 0;

        let mut statements = Vec::new();
        loop {
            self.skip_separators();
            if self.at(&TokenKind::Eof) {
                break;
            }
            self.cancel.check().map_err(SyntaxError::interrupted)?;

            // A failed statement can leave the counter raised.
            self.depth = 0;
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) if self.options.recover => {
                    errors.push(err);
                    self.synchronize();
                }
                Err(err) => return Err(err),
            }
        }

        errors.sort_by_key(|e| e.offset());
        Ok(ParseOutput {
            tree: SyntaxTree::new(statements),
            errors,
        })
    }

    fn statement(&mut self) -> Result<Stmt, SyntaxError> {
        let stmt = if self.at(&TokenKind::Let) {
            self.let_statement()?
        } else {
            Stmt::Expr {
                expr: self.expression()?,
            }
        };

        let next = self.peek();
        if next.kind.is_separator() || next.kind == TokenKind::Eof {
            Ok(stmt)
        } else {
            Err(self
                .ctx
                .unexpected_token("end of statement", next.kind.to_string(), next.span))
        }
    }

    fn let_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.advance().span;
        let name = self.ident()?;
        self.expect(&TokenKind::Eq, "`=`")?;
        let value = self.expression()?;
        let span = start.to(value.span());
        Ok(Stmt::Let { name, value, span })
    }

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        let outer = self.depth;
        let mut lhs = self.term()?;
        while let Some((op, op_span)) = self.binary_op(&[BinaryOp::Add, BinaryOp::Sub]) {
            self.descend(op_span)?;
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth = outer;
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, SyntaxError> {
        let outer = self.depth;
        let mut lhs = self.unary()?;
        while let Some((op, op_span)) = self.binary_op(&[BinaryOp::Mul, BinaryOp::Div]) {
            self.descend(op_span)?;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth = outer;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        if self.at(&TokenKind::Minus) {
            let start = self.advance().span;
            self.descend(start)?;
            let operand = self.unary()?;
            self.depth -= 1;
            let span = start.to(operand.span());
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
                span,
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Int(value) => {
                self.advance();
                Ok(Expr::Number {
                    value,
                    span: token.span,
                })
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Name {
                    ident: Ident {
                        name,
                        span: token.span,
                    },
                })
            }
            TokenKind::LParen => {
                self.advance();
                self.descend(token.span)?;
                let inner = self.expression()?;
                self.depth -= 1;
                let close = self.peek().clone();
                match close.kind {
                    TokenKind::RParen => {
                        self.advance();
                        Ok(Expr::Group {
                            inner: Box::new(inner),
                            span: token.span.to(close.span),
                        })
                    }
                    TokenKind::Eof => Err(self.ctx.unclosed_paren(token.span)),
                    other => Err(self
                        .ctx
                        .unexpected_token("`)`", other.to_string(), close.span)),
                }
            }
            other => Err(self
                .ctx
                .unexpected_token("an expression", other.to_string(), token.span)),
        }
    }

    fn ident(&mut self) -> Result<Ident, SyntaxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Ident {
                    name,
                    span: token.span,
                })
            }
            other => Err(self
                .ctx
                .unexpected_token("a name", other.to_string(), token.span)),
        }
    }

    /// Enter one more level of nesting at `span`.
    ///
    /// Also the point where long expressions poll the cancel token.
    fn descend(&mut self, span: Span) -> Result<(), SyntaxError> {
        self.cancel.check().map_err(SyntaxError::interrupted)?;
        if self.depth >= self.options.max_depth {
            return Err(self.ctx.too_deep(span, self.options.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn binary_op(&mut self, accepted: &[BinaryOp]) -> Option<(BinaryOp, Span)> {
        let token = self.peek();
        let span = token.span;
        let op = match token.kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            _ => return None,
        };
        if accepted.contains(&op) {
            self.advance();
            Some((op, span))
        } else {
            None
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Span, SyntaxError> {
        let token = self.peek();
        if &token.kind == kind {
            let span = token.span;
            self.advance();
            Ok(span)
        } else {
            Err(self
                .ctx
                .unexpected_token(expected, token.kind.to_string(), token.span))
        }
    }

    /// Skip to the start of the next statement.
    fn synchronize(&mut self) {
        while !self.at(&TokenKind::Eof) && !self.peek().kind.is_separator() {
            self.advance();
        }
    }

    fn skip_separators(&mut self) {
        while self.peek().kind.is_separator() {
            self.advance();
        }
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn peek(&self) -> &Token {
        // The token stream always ends in Eof, which is never consumed.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.tokens[index].kind != TokenKind::Eof {
            self.pos += 1;
        }
        &self.tokens[index]
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let span = lhs.span().to(rhs.span());
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        span,
    }
}

#[cfg(test)]
mod tests {
    use strata_core::Interrupt;

    use super::*;

    fn parse_strict(text: &str) -> Result<ParseOutput, SyntaxError> {
        Parser::new(
            SourceFile::new("test.st", text),
            ParserOptions::default(),
            CancelToken::new(),
        )
        .parse()
    }

    fn parse_recovering(text: &str) -> ParseOutput {
        Parser::new(
            SourceFile::new("test.st", text),
            ParserOptions::recovering(),
            CancelToken::new(),
        )
        .parse()
        .expect("recovering parse should not fail")
    }

    fn render(text: &str) -> String {
        parse_strict(text).expect("parse failed").tree.to_string()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(render("1 + 2 * 3"), "(+ 1 (* 2 3))\n");
        assert_eq!(render("(1 + 2) * 3"), "(* (+ 1 2) 3)\n");
        assert_eq!(render("8 - 4 - 2"), "(- (- 8 4) 2)\n");
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(render("-x * 2"), "(* (- x) 2)\n");
    }

    #[test]
    fn test_let_and_separators() {
        assert_eq!(render("let a = 1; a + 1\n\n"), "(let a 1)\n(+ a 1)\n");
    }

    #[test]
    fn test_empty_source() {
        let output = parse_strict("  \n # nothing\n").unwrap();
        assert!(output.tree.is_empty());
        assert!(output.is_clean());
    }

    #[test]
    fn test_spans_cover_statement() {
        let output = parse_strict("let value = 10 + 2").unwrap();
        assert_eq!(output.tree.statements[0].span(), Span::new(0, 18));
    }

    #[test]
    fn test_malformed_input_fails_in_strict_mode() {
        let err = parse_strict("???").unwrap_err();
        assert!(matches!(err, SyntaxError::UnexpectedChar { ch: '?', .. }));
    }

    #[test]
    fn test_missing_operand() {
        let err = parse_strict("1 +").unwrap_err();
        assert_eq!(err.to_string(), "expected an expression, found end of input");
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse_strict("1 2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected end of statement, found integer `2`"
        );
        assert_eq!(err.offset(), Some(2));
    }

    #[test]
    fn test_unclosed_paren() {
        let err = parse_strict("(1 + 2").unwrap_err();
        assert!(matches!(err, SyntaxError::UnclosedParen { .. }));
        assert_eq!(err.offset(), Some(0));
    }

    #[test]
    fn test_let_requires_name() {
        let err = parse_strict("let = 3").unwrap_err();
        assert_eq!(err.to_string(), "expected a name, found `=`");
    }

    #[test]
    fn test_recovery_skips_bad_statements() {
        let output = parse_recovering("1 + 1\nlet = 2\n3 * 3\n4 +");
        assert_eq!(output.tree.to_string(), "(+ 1 1)\n(* 3 3)\n");
        assert_eq!(output.errors.len(), 2);
        assert!(!output.is_clean());
    }

    #[test]
    fn test_recovery_reports_lexer_errors() {
        let output = parse_recovering("1 + ? 2");
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.tree.to_string(), "(+ 1 2)\n");
    }

    #[test]
    fn test_cancelled_parse() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = Parser::new(
            SourceFile::new("test.st", "1"),
            ParserOptions::recovering(),
            cancel,
        )
        .parse()
        .unwrap_err();
        assert_eq!(err.interrupt(), Some(Interrupt::Cancelled));
    }

    fn parse_with_depth(text: &str, max_depth: usize) -> Result<ParseOutput, SyntaxError> {
        Parser::new(
            SourceFile::new("test.st", text),
            ParserOptions::default().with_max_depth(max_depth),
            CancelToken::new(),
        )
        .parse()
    }

    fn nested(depth: usize) -> String {
        format!("{}1{}", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn test_nesting_up_to_the_limit() {
        let output = parse_with_depth(&nested(8), 8).unwrap();
        assert_eq!(output.tree.statements[0].expr().depth(), 9);
        assert!(parse_with_depth("- - - 1", 3).is_ok());
        assert!(parse_with_depth("1 + 2 + 3 + 4", 3).is_ok());
    }

    #[test]
    fn test_nesting_past_the_limit() {
        let err = parse_with_depth(&nested(9), 8).unwrap_err();
        assert!(matches!(err, SyntaxError::TooDeep { limit: 8, .. }));
        assert_eq!(err.offset(), Some(8));

        let err = parse_with_depth("- - - - 1", 3).unwrap_err();
        assert_eq!(err.offset(), Some(6));

        let err = parse_with_depth("1 + 2 + 3 + 4 + 5", 3).unwrap_err();
        assert_eq!(err.offset(), Some(14));
    }

    #[test]
    fn test_depth_is_released_after_a_group() {
        assert!(parse_with_depth("((1)) + ((2))", 3).is_ok());
    }

    #[test]
    fn test_default_limit_stops_pathological_nesting() {
        let err = parse_strict(&nested(50_000)).unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::TooDeep {
                limit: DEFAULT_MAX_DEPTH,
                ..
            }
        ));
        let chain = "-".repeat(50_000) + "1";
        assert!(matches!(
            parse_strict(&chain).unwrap_err(),
            SyntaxError::TooDeep { .. }
        ));
    }

    #[test]
    fn test_recovery_continues_after_too_deep() {
        let text = format!("{}\n2 * 3", nested(20));
        let output = Parser::new(
            SourceFile::new("test.st", text),
            ParserOptions::recovering().with_max_depth(4),
            CancelToken::new(),
        )
        .parse()
        .unwrap();
        assert_eq!(output.tree.to_string(), "(* 2 3)\n");
        assert!(matches!(output.errors[0], SyntaxError::TooDeep { .. }));
    }

    #[test]
    fn test_cancelled_inside_one_statement() {
        let mut parser = Parser::new(
            SourceFile::new("test.st", "1 + 2 + 3"),
            ParserOptions::default(),
            CancelToken::new(),
        );
        let (tokens, _) = tokenize(&parser.ctx, &CancelToken::new()).unwrap();
        parser.tokens = tokens;
        parser.cancel.cancel();
        let err = parser.expression().unwrap_err();
        assert_eq!(err.interrupt(), Some(Interrupt::Cancelled));
    }

    #[test]
    fn test_reparse_is_stable() {
        let mut parser = Parser::new(
            SourceFile::new("test.st", "1 + 1"),
            ParserOptions::default(),
            CancelToken::new(),
        );
        let first = parser.parse().unwrap().tree;
        let second = parser.parse().unwrap().tree;
        assert_eq!(first, second);
    }
}
