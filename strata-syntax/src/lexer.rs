//! Tokenizer for Strata source text.

use strata_core::{CancelToken, Interrupt, Span};

use crate::{
    error::{SourceContext, SyntaxError},
    token::{Token, TokenKind},
};

/// How many characters are scanned between cancel token checks.
const CANCEL_CHECK_INTERVAL: usize = 4096;

/// Split the source into tokens.
///
/// Invalid characters and oversized literals are reported and skipped, so the
/// returned token stream is always usable. Newlines inside parentheses are
/// not statement separators and are dropped. The stream always ends in
/// [`TokenKind::Eof`].
///
/// `cancel` is checked before the first character and then every
/// [`CANCEL_CHECK_INTERVAL`] characters.
pub(crate) fn tokenize(
    ctx: &SourceContext,
    cancel: &CancelToken,
) -> Result<(Vec<Token>, Vec<SyntaxError>), Interrupt> {
    let text = ctx.source().text();
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut depth = 0usize;
    let mut scanned = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if scanned % CANCEL_CHECK_INTERVAL == 0 {
            cancel.check()?;
        }
        scanned += 1;

        let single = |kind| Some((kind, start + ch.len_utf8()));

        let token = match ch {
            '\n' if depth > 0 => None,
            '\n' => single(TokenKind::Newline),
            c if c.is_whitespace() => None,
            '#' => {
                while chars.next_if(|&(_, c)| c != '\n').is_some() {}
                None
            }
            '+' => single(TokenKind::Plus),
            '-' => single(TokenKind::Minus),
            '*' => single(TokenKind::Star),
            '/' => single(TokenKind::Slash),
            '=' => single(TokenKind::Eq),
            ';' => single(TokenKind::Semi),
            '(' => {
                depth += 1;
                single(TokenKind::LParen)
            }
            ')' => {
                depth = depth.saturating_sub(1);
                single(TokenKind::RParen)
            }
            c if c.is_ascii_digit() => {
                let mut end = start + 1;
                while let Some((i, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
                    end = i + c.len_utf8();
                }
                let literal = &text[start..end];
                match literal.parse::<i64>() {
                    Ok(value) => Some((TokenKind::Int(value), end)),
                    Err(_) => {
                        errors.push(ctx.integer_overflow(literal, Span::new(start, end)));
                        None
                    }
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some((i, c)) = chars.next_if(|&(_, c)| c.is_alphanumeric() || c == '_')
                {
                    end = i + c.len_utf8();
                }
                let kind = match &text[start..end] {
                    "let" => TokenKind::Let,
                    name => TokenKind::Ident(name.to_string()),
                };
                Some((kind, end))
            }
            other => {
                let span = Span::new(start, start + other.len_utf8());
                errors.push(ctx.unexpected_char(other, span));
                None
            }
        };

        if let Some((kind, end)) = token {
            tokens.push(Token::new(kind, Span::new(start, end)));
        }
    }

    tokens.push(Token::new(TokenKind::Eof, Span::empty(text.len())));
    Ok((tokens, errors))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use strata_core::SourceFile;

    use super::*;

    fn lex(text: &str) -> (Vec<Token>, Vec<SyntaxError>) {
        let ctx = SourceContext::new(SourceFile::new("test.st", text));
        tokenize(&ctx, &CancelToken::new()).unwrap()
    }

    fn kinds(text: &str) -> Vec<TokenKind> {
        let (tokens, errors) = lex(text);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(
            kinds("1+22 * x"),
            vec![
                TokenKind::Int(1),
                TokenKind::Plus,
                TokenKind::Int(22),
                TokenKind::Star,
                TokenKind::Ident("x".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_let_keyword_and_separators() {
        assert_eq!(
            kinds("let y = 2; y\n"),
            vec![
                TokenKind::Let,
                TokenKind::Ident("y".into()),
                TokenKind::Eq,
                TokenKind::Int(2),
                TokenKind::Semi,
                TokenKind::Ident("y".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_newline_inside_parens_is_dropped() {
        assert_eq!(
            kinds("(1 +\n 2)"),
            vec![
                TokenKind::LParen,
                TokenKind::Int(1),
                TokenKind::Plus,
                TokenKind::Int(2),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("1 # one\n2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans() {
        let (tokens, _) = lex("let abc");
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].span, Span::new(4, 7));
        assert_eq!(tokens[2].span, Span::empty(7));
    }

    #[test]
    fn test_invalid_characters_are_reported_and_skipped() {
        let (tokens, errors) = lex("1 ? 2");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].offset(), Some(2));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_integer_overflow() {
        let (_, errors) = lex("99999999999999999999");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SyntaxError::IntegerOverflow { .. }));
    }

    #[test]
    fn test_cancelled_before_scanning() {
        let ctx = SourceContext::new(SourceFile::new("test.st", "1 + 1"));
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(tokenize(&ctx, &cancel).unwrap_err(), Interrupt::Cancelled);
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = SourceContext::new(SourceFile::new("test.st", "1 + 1"));
        let cancel = CancelToken::new().with_timeout(Duration::ZERO);
        assert_eq!(
            tokenize(&ctx, &cancel).unwrap_err(),
            Interrupt::DeadlineExceeded
        );
    }
}
