//! Tokenizer for the surface language, built on `logos`.
//!
//! Grounded on `ori_lexer/src/lib.rs`: a `logos::Logos`-derived `RawToken`
//! enum handles the lexical grammar, then a conversion pass turns raw
//! tokens into an interned, span-carrying `Token` stream. Simplified
//! relative to the teacher: no line-continuation handling, no
//! unicode-confusable detection, no incremental re-lex (this crate always
//! lexes a whole source string at once).

use logos::Logos;
use ml_ir::{Name, SharedInterner, Span};

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"--[^\n]*")]
enum RawToken {
    #[token("module")]
    Module,
    #[token("exposing")]
    Exposing,
    #[token("let")]
    Let,
    #[token("in")]
    In,
    #[token("case")]
    Case,
    #[token("of")]
    Of,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("as")]
    As,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token("_")]
    Underscore,
    #[token("->")]
    Arrow,
    #[token("\\")]
    Backslash,
    #[token("|")]
    Pipe,
    #[token("::")]
    ColonColon,
    #[token(".")]
    Dot,
    #[token("=")]
    Equals,

    #[token("==")]
    EqEq,
    #[token("/=")]
    NotEq,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("++")]
    PlusPlus,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexInt,
    #[regex(r"[0-9]+\.[0-9]+")]
    Float,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"'([^'\\]|\\.)'")]
    CharLit,
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLit,

    #[regex(r"[A-Z][A-Za-z0-9_]*")]
    UpperIdent,
    #[regex(r"[a-z_][A-Za-z0-9_]*")]
    LowerIdent,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Module,
    Exposing,
    Let,
    In,
    Case,
    Of,
    If,
    Then,
    Else,
    As,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Underscore,
    Arrow,
    Backslash,
    Pipe,
    ColonColon,
    Dot,
    Equals,
    Op(Name),
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
    UpperIdent(Name),
    LowerIdent(Name),
    Eof,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based column of `span.start` within its source line. Declarations,
    /// case arms, and `let` bindings all open a layout column that the
    /// parser uses to tell "a continuation of this line" apart from "the
    /// next declaration/arm/binding" when whitespace is the only separator.
    pub col: u32,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum LexError {
    #[error("unrecognized token at byte {0}")]
    UnrecognizedToken(u32),
    #[error("invalid escape sequence in literal at byte {0}")]
    InvalidEscape(u32),
}

fn cook_escapes(raw: &str, start: u32) -> Result<String, LexError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, 'n')) => out.push('\n'),
            Some((_, 't')) => out.push('\t'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, '\\')) => out.push('\\'),
            Some((_, '"')) => out.push('"'),
            Some((_, '\'')) => out.push('\''),
            _ => return Err(LexError::InvalidEscape(start + i as u32)),
        }
    }
    Ok(out)
}

/// Byte offsets of every `\n` in `source`, used to turn a byte offset into
/// a 1-based column without rescanning the source per token.
fn newline_offsets(source: &str) -> Vec<u32> {
    source
        .char_indices()
        .filter(|&(_, c)| c == '\n')
        .map(|(i, _)| i as u32)
        .collect()
}

fn column_at(offset: u32, newlines: &[u32]) -> u32 {
    let line_start = match newlines.partition_point(|&n| n < offset) {
        0 => 0,
        n => newlines[n - 1] + 1,
    };
    offset - line_start + 1
}

/// Lexes `source` into a flat token stream terminated by `TokenKind::Eof`.
pub fn lex(source: &str, interner: &SharedInterner) -> Result<Vec<Token>, LexError> {
    let newlines = newline_offsets(source);
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);
    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start as u32, lexer.span().end as u32);
        let raw = result.map_err(|()| LexError::UnrecognizedToken(span.start))?;
        let text = lexer.slice();
        let kind = match raw {
            RawToken::Module => TokenKind::Module,
            RawToken::Exposing => TokenKind::Exposing,
            RawToken::Let => TokenKind::Let,
            RawToken::In => TokenKind::In,
            RawToken::Case => TokenKind::Case,
            RawToken::Of => TokenKind::Of,
            RawToken::If => TokenKind::If,
            RawToken::Then => TokenKind::Then,
            RawToken::Else => TokenKind::Else,
            RawToken::As => TokenKind::As,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Underscore => TokenKind::Underscore,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::Backslash => TokenKind::Backslash,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::ColonColon => TokenKind::ColonColon,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Equals => TokenKind::Equals,
            RawToken::EqEq => TokenKind::Op(interner.intern("==")),
            RawToken::NotEq => TokenKind::Op(interner.intern("/=")),
            RawToken::Le => TokenKind::Op(interner.intern("<=")),
            RawToken::Ge => TokenKind::Op(interner.intern(">=")),
            RawToken::Lt => TokenKind::Op(interner.intern("<")),
            RawToken::Gt => TokenKind::Op(interner.intern(">")),
            RawToken::AndAnd => TokenKind::Op(interner.intern("&&")),
            RawToken::OrOr => TokenKind::Op(interner.intern("||")),
            RawToken::PlusPlus => TokenKind::Op(interner.intern("++")),
            RawToken::Plus => TokenKind::Op(interner.intern("+")),
            RawToken::Minus => TokenKind::Op(interner.intern("-")),
            RawToken::Star => TokenKind::Op(interner.intern("*")),
            RawToken::Slash => TokenKind::Op(interner.intern("/")),
            RawToken::HexInt => {
                let without_prefix = &text[2..];
                let value = i64::from_str_radix(without_prefix, 16)
                    .map_err(|_| LexError::UnrecognizedToken(span.start))?;
                TokenKind::Int(value)
            }
            RawToken::Int => {
                let value: i64 = text
                    .parse()
                    .map_err(|_| LexError::UnrecognizedToken(span.start))?;
                TokenKind::Int(value)
            }
            RawToken::Float => {
                let value: f64 = text
                    .parse()
                    .map_err(|_| LexError::UnrecognizedToken(span.start))?;
                TokenKind::Float(value)
            }
            RawToken::CharLit => {
                let inner = &text[1..text.len() - 1];
                let cooked = cook_escapes(inner, span.start + 1)?;
                let ch = cooked
                    .chars()
                    .next()
                    .ok_or(LexError::InvalidEscape(span.start))?;
                TokenKind::Char(ch)
            }
            RawToken::StringLit => {
                let inner = &text[1..text.len() - 1];
                TokenKind::String(cook_escapes(inner, span.start + 1)?)
            }
            RawToken::UpperIdent => TokenKind::UpperIdent(interner.intern(text)),
            RawToken::LowerIdent => TokenKind::LowerIdent(interner.intern(text)),
        };
        let col = column_at(span.start, &newlines);
        tokens.push(Token { kind, span, col });
    }
    let end = source.len() as u32;
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
        col: column_at(end, &newlines),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let interner = SharedInterner::new();
        lex(source, &interner)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_integer_literal() {
        assert_eq!(kinds("42"), vec![TokenKind::Int(42), TokenKind::Eof]);
    }

    #[test]
    fn lexes_hex_literal() {
        assert_eq!(kinds("0x2A"), vec![TokenKind::Int(42), TokenKind::Eof]);
    }

    #[test]
    fn lexes_string_with_escapes() {
        assert_eq!(
            kinds(r#""a\nb""#),
            vec![TokenKind::String("a\nb".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_arithmetic_expression() {
        let interner = SharedInterner::new();
        let tokens = lex("2 + 3", &interner).unwrap();
        assert_eq!(tokens.len(), 4); // Int, Op, Int, Eof
        assert_eq!(tokens[0].kind, TokenKind::Int(2));
        assert_eq!(tokens[2].kind, TokenKind::Int(3));
    }

    #[test]
    fn distinguishes_upper_and_lower_identifiers() {
        let interner = SharedInterner::new();
        let tokens = lex("Just x", &interner).unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::UpperIdent(_)));
        assert!(matches!(tokens[1].kind, TokenKind::LowerIdent(_)));
    }

    #[test]
    fn tracks_column_after_a_newline() {
        let interner = SharedInterner::new();
        let tokens = lex("fib1 n\n   fib2 n", &interner).unwrap();
        assert_eq!(tokens[0].col, 1); // fib1
        assert_eq!(tokens[2].col, 4); // fib2, after "   "
    }

    #[test]
    fn skips_line_comments() {
        assert_eq!(
            kinds("1 -- comment\n"),
            vec![TokenKind::Int(1), TokenKind::Eof]
        );
    }
}
