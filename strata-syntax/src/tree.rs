//! Syntax tree produced by the parser.

use std::fmt;

use serde::Serialize;
use strata_core::Span;

/// The parsed body of one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyntaxTree {
    pub statements: Vec<Stmt>,
}

impl SyntaxTree {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Visit every expression in source order, parents before children.
    pub fn walk_exprs<'a>(&'a self, mut visit: impl FnMut(&'a Expr)) {
        for stmt in &self.statements {
            stmt.expr().walk(&mut visit);
        }
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            writeln!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    Let { name: Ident, value: Expr, span: Span },
    Expr { expr: Expr },
}

impl Stmt {
    /// The expression this statement evaluates.
    pub fn expr(&self) -> &Expr {
        match self {
            Stmt::Let { value, .. } => value,
            Stmt::Expr { expr } => expr,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Stmt::Let { span, .. } => *span,
            Stmt::Expr { expr } => expr.span(),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let { name, value, .. } => write!(f, "(let {} {})", name.name, value),
            Stmt::Expr { expr } => write!(f, "{}", expr),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Number {
        value: i64,
        span: Span,
    },
    Name {
        ident: Ident,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    Group {
        inner: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Group { span, .. } => *span,
            Expr::Name { ident } => ident.span,
        }
    }

    /// Nesting depth; leaves have depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Number { .. } | Expr::Name { .. } => 1,
            Expr::Unary { operand, .. } => 1 + operand.depth(),
            Expr::Group { inner, .. } => 1 + inner.depth(),
            Expr::Binary { lhs, rhs, .. } => 1 + lhs.depth().max(rhs.depth()),
        }
    }

    /// Value of this expression when it is a literal, looking through
    /// parentheses and negation.
    pub fn constant(&self) -> Option<i64> {
        match self {
            Expr::Number { value, .. } => Some(*value),
            Expr::Group { inner, .. } => inner.constant(),
            Expr::Unary {
                op: UnaryOp::Neg,
                operand,
                ..
            } => operand.constant().and_then(i64::checked_neg),
            _ => None,
        }
    }

    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match self {
            Expr::Number { .. } | Expr::Name { .. } => {}
            Expr::Unary { operand, .. } => operand.walk(visit),
            Expr::Group { inner, .. } => inner.walk(visit),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.walk(visit);
                rhs.walk(visit);
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number { value, .. } => write!(f, "{}", value),
            Expr::Name { ident } => write!(f, "{}", ident.name),
            Expr::Unary { operand, .. } => write!(f, "(- {})", operand),
            Expr::Binary { op, lhs, rhs, .. } => write!(f, "({} {} {})", op.symbol(), lhs, rhs),
            Expr::Group { inner, .. } => write!(f, "{}", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: i64) -> Expr {
        Expr::Number {
            value,
            span: Span::default(),
        }
    }

    fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span: Span::default(),
        }
    }

    #[test]
    fn test_depth() {
        let expr = binary(BinaryOp::Add, num(1), binary(BinaryOp::Mul, num(2), num(3)));
        assert_eq!(expr.depth(), 3);
        assert_eq!(num(1).depth(), 1);
    }

    #[test]
    fn test_constant_looks_through_groups() {
        let expr = Expr::Group {
            inner: Box::new(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(num(4)),
                span: Span::default(),
            }),
            span: Span::default(),
        };
        assert_eq!(expr.constant(), Some(-4));
        assert_eq!(binary(BinaryOp::Add, num(1), num(2)).constant(), None);
    }

    #[test]
    fn test_walk_order() {
        let tree = SyntaxTree::new(vec![Stmt::Expr {
            expr: binary(BinaryOp::Sub, num(1), num(2)),
        }]);
        let mut seen = Vec::new();
        tree.walk_exprs(|expr| seen.push(expr.to_string()));
        assert_eq!(seen, vec!["(- 1 2)", "1", "2"]);
    }
}
