//! A compact recursive-descent / precedence-climbing parser from
//! `ml_lex` tokens to `ml_ir` AST.
//!
//! Grounded loosely on `ori_parse`'s cursor-driven parsing style (the
//! directory holds `cursor.rs`/`error.rs`/`recovery.rs`), but this parser
//! is deliberately much smaller: no incremental reparse, no Salsa
//! integration, and recovery stops at the first diagnostic.
//!
//! Declarations, `let` bindings, and `case` arms are separated only by
//! whitespace (spec.md has no statement/arm terminator token), so the
//! parser carries a small offside-rule layout stack (`Parser::layout`):
//! whichever construct opens a block (the module's declaration loop, a
//! `let`'s bindings, a `case`'s arms) pushes the column of its first
//! token, and any expression-continuation loop (`parse_application`'s
//! argument gathering, `parse_binary`'s operator gathering) refuses to
//! consume a token that starts a new line at or before that column — that
//! token belongs to the next declaration/binding/arm, not this expression.

use ml_ir::{
    ExprArena, ExprId, ExprKind, LetDecl, LetDeclKind, Literal, Module, Name, Pattern,
    PatternKind, QualifiedName, SharedArena, SharedInterner, Span,
};
use ml_lex::{Token, TokenKind};

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("unexpected token at byte {0}: {1}")]
    UnexpectedToken(u32, String),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("lex error: {0}")]
    Lex(#[from] ml_lex::LexError),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    interner: SharedInterner,
    arena: ExprArena,
    /// Offside-rule reference columns, innermost last. Empty outside any
    /// layout-sensitive block (e.g. `parse_expr`'s standalone entry point),
    /// in which case nothing is ever treated as a boundary.
    layout: Vec<u32>,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn col(&self) -> u32 {
        self.tokens[self.pos].col
    }

    /// True when the current token starts a new line at or before the
    /// innermost open layout column — i.e. it belongs to whatever comes
    /// after the current declaration/binding/arm, not to it.
    fn at_layout_boundary(&self) -> bool {
        match self.layout.last() {
            Some(&boundary) => self.col() <= boundary,
            None => false,
        }
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &TokenKind) -> Result<Token, ParseError> {
        if self.peek() == expected {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            TokenKind::Eof => ParseError::UnexpectedEof,
            other => ParseError::UnexpectedToken(self.span().start, format!("{other:?}")),
        }
    }

    fn join_names(&self, names: &[Name]) -> Name {
        let joined = names
            .iter()
            .map(|n| self.interner.lookup(*n))
            .collect::<Vec<_>>()
            .join(".");
        self.interner.intern(&joined)
    }

    // --- qualified names -------------------------------------------------

    fn parse_qualified(&mut self) -> Result<QualifiedName, ParseError> {
        match self.peek().clone() {
            TokenKind::LowerIdent(name) => {
                self.advance();
                Ok(QualifiedName { module: None, name })
            }
            TokenKind::UpperIdent(first) => {
                self.advance();
                let mut segments = vec![first];
                loop {
                    if *self.peek() != TokenKind::Dot {
                        break;
                    }
                    match self.peek_at(1).clone() {
                        TokenKind::UpperIdent(seg) => {
                            self.advance();
                            self.advance();
                            segments.push(seg);
                        }
                        TokenKind::LowerIdent(lower) => {
                            self.advance();
                            self.advance();
                            let module = self.join_names(&segments);
                            return Ok(QualifiedName {
                                module: Some(module),
                                name: lower,
                            });
                        }
                        _ => break,
                    }
                }
                let name = segments.pop().expect("at least one segment");
                let module = if segments.is_empty() {
                    None
                } else {
                    Some(self.join_names(&segments))
                };
                Ok(QualifiedName { module, name })
            }
            _ => Err(self.unexpected()),
        }
    }

    // --- patterns ----------------------------------------------------------

    fn starts_pattern(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Underscore
                | TokenKind::LowerIdent(_)
                | TokenKind::UpperIdent(_)
                | TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Char(_)
                | TokenKind::String(_)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
        )
    }

    fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        self.parse_cons_pattern()
    }

    fn parse_cons_pattern(&mut self) -> Result<Pattern, ParseError> {
        let start = self.span();
        let head = self.parse_as_pattern()?;
        if *self.peek() == TokenKind::ColonColon {
            self.advance();
            let tail = self.parse_cons_pattern()?;
            let span = start.to(tail.span);
            Ok(Pattern::new(
                PatternKind::Cons(Box::new(head), Box::new(tail)),
                span,
            ))
        } else {
            Ok(head)
        }
    }

    fn parse_as_pattern(&mut self) -> Result<Pattern, ParseError> {
        let start = self.span();
        let inner = self.parse_app_pattern()?;
        if *self.peek() == TokenKind::As {
            self.advance();
            let name = self.expect_lower_ident()?;
            let span = start.to(self.tokens[self.pos.saturating_sub(1)].span);
            Ok(Pattern::new(PatternKind::As(Box::new(inner), name), span))
        } else {
            Ok(inner)
        }
    }

    fn expect_lower_ident(&mut self) -> Result<Name, ParseError> {
        match self.peek().clone() {
            TokenKind::LowerIdent(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_app_pattern(&mut self) -> Result<Pattern, ParseError> {
        if let TokenKind::UpperIdent(_) = self.peek() {
            let start = self.span();
            let qualified = self.parse_qualified()?;
            let mut args = Vec::new();
            while self.starts_pattern() && !matches!(self.peek(), TokenKind::UpperIdent(_)) {
                args.push(self.parse_atomic_pattern()?);
            }
            let end = self.tokens[self.pos.saturating_sub(1)].span;
            let span = if args.is_empty() { start } else { start.to(end) };
            return Ok(Pattern::new(
                PatternKind::Ctor {
                    module: qualified.module,
                    name: qualified.name,
                    args,
                },
                span,
            ));
        }
        self.parse_atomic_pattern()
    }

    fn parse_atomic_pattern(&mut self) -> Result<Pattern, ParseError> {
        let start = self.span();
        match self.peek().clone() {
            TokenKind::Underscore => {
                self.advance();
                Ok(Pattern::new(PatternKind::Wildcard, start))
            }
            TokenKind::LowerIdent(name) => {
                self.advance();
                Ok(Pattern::new(PatternKind::Var(name), start))
            }
            TokenKind::UpperIdent(_) => {
                let qualified = self.parse_qualified()?;
                Ok(Pattern::new(
                    PatternKind::Ctor {
                        module: qualified.module,
                        name: qualified.name,
                        args: Vec::new(),
                    },
                    start,
                ))
            }
            TokenKind::Int(v) => {
                self.advance();
                Ok(Pattern::new(PatternKind::Literal(Literal::Int(v)), start))
            }
            TokenKind::Float(v) => {
                self.advance();
                Ok(Pattern::new(PatternKind::Literal(Literal::Float(v)), start))
            }
            TokenKind::Char(c) => {
                self.advance();
                Ok(Pattern::new(PatternKind::Literal(Literal::Char(c)), start))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Pattern::new(PatternKind::Literal(Literal::String(s)), start))
            }
            TokenKind::LParen => {
                self.advance();
                if *self.peek() == TokenKind::RParen {
                    self.advance();
                    return Ok(Pattern::new(PatternKind::Literal(Literal::Unit), start));
                }
                let mut items = vec![self.parse_pattern()?];
                while *self.peek() == TokenKind::Comma {
                    self.advance();
                    items.push(self.parse_pattern()?);
                }
                self.expect(&TokenKind::RParen)?;
                if items.len() == 1 {
                    Ok(items.into_iter().next().expect("one item"))
                } else {
                    Ok(Pattern::new(PatternKind::Tuple(items), start))
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                if *self.peek() != TokenKind::RBracket {
                    items.push(self.parse_pattern()?);
                    while *self.peek() == TokenKind::Comma {
                        self.advance();
                        items.push(self.parse_pattern()?);
                    }
                }
                self.expect(&TokenKind::RBracket)?;
                Ok(Pattern::new(PatternKind::List(items), start))
            }
            TokenKind::LBrace => {
                self.advance();
                let mut fields = Vec::new();
                if *self.peek() != TokenKind::RBrace {
                    fields.push(self.expect_lower_ident()?);
                    while *self.peek() == TokenKind::Comma {
                        self.advance();
                        fields.push(self.expect_lower_ident()?);
                    }
                }
                self.expect(&TokenKind::RBrace)?;
                Ok(Pattern::new(PatternKind::Record(fields), start))
            }
            _ => Err(self.unexpected()),
        }
    }

    // --- expressions ---------------------------------------------------

    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc(kind, span)
    }

    fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        match self.peek() {
            TokenKind::Let => self.parse_let(),
            TokenKind::Case => self.parse_case(),
            TokenKind::If => self.parse_if(),
            TokenKind::Backslash => self.parse_lambda(),
            _ => self.parse_binary(0),
        }
    }

    fn parse_let(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        self.expect(&TokenKind::Let)?;
        let decl_col = self.col();
        self.layout.push(decl_col);
        let mut decls = Vec::new();
        while *self.peek() != TokenKind::In {
            decls.push(self.parse_let_decl()?);
        }
        self.layout.pop();
        self.expect(&TokenKind::In)?;
        let body = self.parse_expr()?;
        let span = start.to(self.arena.get(body).span);
        Ok(self.alloc(ExprKind::Let { decls, body }, span))
    }

    fn parse_let_decl(&mut self) -> Result<LetDecl, ParseError> {
        let start = self.span();
        if let TokenKind::LowerIdent(name) = self.peek().clone() {
            // A bare lowercase LHS is always a `Function` declaration (with
            // zero parameters it's a CAF) so it lands in the module-level
            // function table and can resolve itself/its siblings by name
            // (spec §4.3.4, §4.4) — only a genuinely pattern-shaped LHS
            // (tuple, record, constructor) is `Destructuring`.
            self.advance();
            let mut params = Vec::new();
            while self.starts_pattern() && *self.peek() != TokenKind::Equals && !self.at_layout_boundary() {
                params.push(self.parse_atomic_pattern()?);
            }
            self.expect(&TokenKind::Equals)?;
            let body = self.parse_expr()?;
            let span = start.to(self.arena.get(body).span);
            return Ok(LetDecl {
                kind: LetDeclKind::Function { name, params, body },
                span,
            });
        }
        let pattern = self.parse_pattern()?;
        self.expect(&TokenKind::Equals)?;
        let expr = self.parse_expr()?;
        let span = start.to(self.arena.get(expr).span);
        Ok(LetDecl {
            kind: LetDeclKind::Destructuring { pattern, expr },
            span,
        })
    }

    fn parse_case(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        self.expect(&TokenKind::Case)?;
        let scrutinee = self.parse_expr()?;
        self.expect(&TokenKind::Of)?;
        let arm_col = self.col();
        self.layout.push(arm_col);
        let mut arms = Vec::new();
        while self.starts_pattern() && self.col() == arm_col {
            let pattern = self.parse_pattern()?;
            self.expect(&TokenKind::Arrow)?;
            let body = self.parse_expr()?;
            arms.push((pattern, body));
        }
        self.layout.pop();
        if arms.is_empty() {
            return Err(self.unexpected());
        }
        let end = self.arena.get(arms[arms.len() - 1].1).span;
        let span = start.to(end);
        Ok(self.alloc(ExprKind::Case { scrutinee, arms }, span))
    }

    fn parse_if(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        self.expect(&TokenKind::If)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Then)?;
        let then_branch = self.parse_expr()?;
        self.expect(&TokenKind::Else)?;
        let else_branch = self.parse_expr()?;
        let span = start.to(self.arena.get(else_branch).span);
        Ok(self.alloc(
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn parse_lambda(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        self.expect(&TokenKind::Backslash)?;
        let mut params = Vec::new();
        while self.starts_pattern() && *self.peek() != TokenKind::Arrow && !self.at_layout_boundary() {
            params.push(self.parse_atomic_pattern()?);
        }
        self.expect(&TokenKind::Arrow)?;
        let body = self.parse_expr()?;
        let span = start.to(self.arena.get(body).span);
        Ok(self.alloc(ExprKind::Lambda { params, body }, span))
    }

    /// Precedence-climbing over binary operators; application binds
    /// tighter than any operator, handled in `parse_application`.
    fn parse_binary(&mut self, min_prec: u8) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_application()?;
        loop {
            let Some((op_name, prec, right_assoc, is_and, is_or)) = self.peek_operator() else {
                break;
            };
            if prec < min_prec || self.at_layout_boundary() {
                break;
            }
            self.advance();
            let next_min = if right_assoc { prec } else { prec + 1 };
            let rhs = self.parse_binary(next_min)?;
            let span = self.arena.get(lhs).span.to(self.arena.get(rhs).span);
            lhs = if is_and {
                self.alloc(ExprKind::And(lhs, rhs), span)
            } else if is_or {
                self.alloc(ExprKind::Or(lhs, rhs), span)
            } else {
                self.alloc(
                    ExprKind::BinOp {
                        op: op_name,
                        lhs,
                        rhs,
                    },
                    span,
                )
            };
        }
        Ok(lhs)
    }

    /// Returns `(symbol-name, precedence, right-associative, is-&&, is-||)`.
    fn peek_operator(&self) -> Option<(Name, u8, bool, bool, bool)> {
        match self.peek() {
            TokenKind::Op(name) => {
                let text = self.interner.lookup(*name);
                let info = match &*text {
                    "||" => (1, false, false, true),
                    "&&" => (2, false, true, false),
                    "==" | "/=" | "<" | ">" | "<=" | ">=" => (3, false, false, false),
                    "++" => (4, false, false, false),
                    "+" | "-" => (5, false, false, false),
                    "*" | "/" => (6, false, false, false),
                    _ => return None,
                };
                Some((*name, info.0, info.1, info.2, info.3))
            }
            TokenKind::ColonColon => {
                let name = self.interner.intern("::");
                Some((name, 4, true, false, false))
            }
            _ => None,
        }
    }

    fn parse_application(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        let func = self.parse_unary()?;
        let mut args = Vec::new();
        while self.starts_argument() && !self.at_layout_boundary() {
            args.push(self.parse_unary()?);
        }
        if args.is_empty() {
            Ok(func)
        } else {
            let end = self.arena.get(args[args.len() - 1]).span;
            let span = start.to(end);
            Ok(self.alloc(ExprKind::Application { func, args }, span))
        }
    }

    fn starts_argument(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::LowerIdent(_)
                | TokenKind::UpperIdent(_)
                | TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Char(_)
                | TokenKind::String(_)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Dot
        )
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        if let TokenKind::Op(name) = self.peek().clone() {
            if &*self.interner.lookup(name) == "-" {
                self.advance();
                let operand = self.parse_unary()?;
                let span = start.to(self.arena.get(operand).span);
                return Ok(self.alloc(ExprKind::Negate(operand), span));
            }
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        let mut expr = self.parse_atom()?;
        loop {
            if *self.peek() == TokenKind::Dot {
                if let TokenKind::LowerIdent(field) = self.peek_at(1).clone() {
                    self.advance();
                    self.advance();
                    let span = start.to(self.tokens[self.pos.saturating_sub(1)].span);
                    expr = self.alloc(
                        ExprKind::RecordAccess {
                            record: expr,
                            field,
                        },
                        span,
                    );
                    continue;
                }
            }
            break;
        }
        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<ExprId, ParseError> {
        let start = self.span();
        match self.peek().clone() {
            TokenKind::Int(v) => {
                self.advance();
                Ok(self.alloc(ExprKind::Literal(Literal::Int(v)), start))
            }
            TokenKind::Float(v) => {
                self.advance();
                Ok(self.alloc(ExprKind::Literal(Literal::Float(v)), start))
            }
            TokenKind::Char(c) => {
                self.advance();
                Ok(self.alloc(ExprKind::Literal(Literal::Char(c)), start))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(self.alloc(ExprKind::Literal(Literal::String(s)), start))
            }
            TokenKind::Dot => {
                self.advance();
                let field = self.expect_lower_ident()?;
                let span = start.to(self.tokens[self.pos.saturating_sub(1)].span);
                Ok(self.alloc(ExprKind::RecordAccessorFunction(field), span))
            }
            TokenKind::LowerIdent(_) | TokenKind::UpperIdent(_) => {
                let qualified = self.parse_qualified()?;
                let span = start.to(self.tokens[self.pos.saturating_sub(1)].span);
                Ok(self.alloc(ExprKind::Var(qualified), span))
            }
            TokenKind::LParen => self.parse_paren(start),
            TokenKind::LBracket => self.parse_list(start),
            TokenKind::LBrace => self.parse_record(start),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_paren(&mut self, start: Span) -> Result<ExprId, ParseError> {
        self.advance();
        if *self.peek() == TokenKind::RParen {
            self.advance();
            return Ok(self.alloc(ExprKind::Literal(Literal::Unit), start));
        }
        let mut items = vec![self.parse_expr()?];
        while *self.peek() == TokenKind::Comma {
            self.advance();
            items.push(self.parse_expr()?);
        }
        let close = self.expect(&TokenKind::RParen)?;
        let span = start.to(close.span);
        if items.len() == 1 {
            // A parenthesized single expression is transparent — spec's
            // resolution of the singleton-tuple open question.
            Ok(items.into_iter().next().expect("one item"))
        } else {
            Ok(self.alloc(ExprKind::Tuple(items), span))
        }
    }

    fn parse_list(&mut self, start: Span) -> Result<ExprId, ParseError> {
        self.advance();
        let mut items = Vec::new();
        if *self.peek() != TokenKind::RBracket {
            items.push(self.parse_expr()?);
            while *self.peek() == TokenKind::Comma {
                self.advance();
                items.push(self.parse_expr()?);
            }
        }
        let close = self.expect(&TokenKind::RBracket)?;
        let span = start.to(close.span);
        Ok(self.alloc(ExprKind::List(items), span))
    }

    fn parse_record(&mut self, start: Span) -> Result<ExprId, ParseError> {
        self.advance();
        if *self.peek() == TokenKind::RBrace {
            self.advance();
            return Ok(self.alloc(ExprKind::Record(Vec::new()), start));
        }
        // Disambiguate `{ f = e, .. }` (literal) from `{ x | f = e, .. }`
        // (update) by one token of lookahead past the first identifier.
        if let TokenKind::LowerIdent(first) = self.peek().clone() {
            if *self.peek_at(1) == TokenKind::Pipe {
                self.advance();
                self.advance();
                let base = QualifiedName {
                    module: None,
                    name: first,
                };
                let fields = self.parse_update_fields()?;
                let close = self.expect(&TokenKind::RBrace)?;
                let span = start.to(close.span);
                return Ok(self.alloc(ExprKind::RecordUpdate { base, fields }, span));
            }
        }
        let fields = self.parse_update_fields()?;
        let close = self.expect(&TokenKind::RBrace)?;
        let span = start.to(close.span);
        Ok(self.alloc(ExprKind::Record(fields), span))
    }

    fn parse_update_fields(&mut self) -> Result<Vec<(Name, ExprId)>, ParseError> {
        let mut fields = Vec::new();
        loop {
            let field = self.expect_lower_ident()?;
            self.expect(&TokenKind::Equals)?;
            let value = self.parse_expr()?;
            fields.push((field, value));
            if *self.peek() == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        Ok(fields)
    }
}

/// Parses a full module from source text.
pub fn parse_module(source: &str, interner: &SharedInterner) -> Result<Module, ParseError> {
    let tokens = ml_lex::lex(source, interner)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        interner: interner.clone(),
        arena: ExprArena::new(),
        layout: Vec::new(),
    };

    parser.expect(&TokenKind::Module)?;
    let module_qualified = parser.parse_qualified()?;
    let module_name = match module_qualified.module {
        Some(prefix) => {
            let joined = parser.join_names(&[prefix, module_qualified.name]);
            joined
        }
        None => module_qualified.name,
    };
    parser.expect(&TokenKind::Exposing)?;
    parser.expect(&TokenKind::LParen)?;
    let mut exposing = Vec::new();
    if *parser.peek() != TokenKind::RParen {
        exposing.push(parser.expect_lower_ident()?);
        while *parser.peek() == TokenKind::Comma {
            parser.advance();
            exposing.push(parser.expect_lower_ident()?);
        }
    }
    parser.expect(&TokenKind::RParen)?;

    // Top-level declarations start at column 1 — the module's own layout
    // boundary, pushed once for every declaration body parsed below.
    parser.layout.push(1);
    let mut declarations = Vec::new();
    while *parser.peek() != TokenKind::Eof {
        declarations.push(parser.parse_let_decl()?);
    }
    parser.layout.pop();

    let arena = SharedArena::new(parser.arena);
    Ok(Module::new(module_name, exposing, declarations, arena))
}

/// Parses a bare expression (used by the evaluator's `eval`/`trace` entry
/// points, which wrap the expression in a synthetic `Main` module before
/// calling [`parse_module`]; exposed directly here for unit testing).
pub fn parse_expr(source: &str, interner: &SharedInterner) -> Result<(ExprArena, ExprId), ParseError> {
    let tokens = ml_lex::lex(source, interner)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        interner: interner.clone(),
        arena: ExprArena::new(),
        layout: Vec::new(),
    };
    let id = parser.parse_expr()?;
    parser.expect(&TokenKind::Eof)?;
    Ok((parser.arena, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_literal() {
        let interner = SharedInterner::new();
        let (arena, id) = parse_expr("42", &interner).unwrap();
        assert_eq!(arena.get(id).kind, ExprKind::Literal(Literal::Int(42)));
    }

    #[test]
    fn parses_arithmetic_as_binop() {
        let interner = SharedInterner::new();
        let (arena, id) = parse_expr("2 + 3", &interner).unwrap();
        match &arena.get(id).kind {
            ExprKind::BinOp { op, .. } => {
                assert_eq!(&*interner.lookup(*op), "+");
            }
            other => panic!("expected BinOp, got {other:?}"),
        }
    }

    #[test]
    fn respects_operator_precedence() {
        let interner = SharedInterner::new();
        let (arena, id) = parse_expr("2 + 3 * 4", &interner).unwrap();
        match &arena.get(id).kind {
            ExprKind::BinOp { op, rhs, .. } => {
                assert_eq!(&*interner.lookup(*op), "+");
                assert!(matches!(arena.get(*rhs).kind, ExprKind::BinOp { .. }));
            }
            other => panic!("expected BinOp, got {other:?}"),
        }
    }

    #[test]
    fn parses_if_then_else() {
        let interner = SharedInterner::new();
        let (arena, id) = parse_expr("if True then 1 else 2", &interner).unwrap();
        assert!(matches!(arena.get(id).kind, ExprKind::If { .. }));
    }

    #[test]
    fn parses_let_in() {
        let interner = SharedInterner::new();
        let (_, id) = parse_expr("let a = 3 in let closed x = a + x in closed 2", &interner)
            .unwrap();
        let _ = id;
    }

    #[test]
    fn parses_case_with_constructor_patterns() {
        let interner = SharedInterner::new();
        let src = "let foo = Just [] in case foo of\n   Nothing -> -1\n   Just [x] -> 1\n   Just [] -> 0";
        let (arena, id) = parse_expr(src, &interner).unwrap();
        match &arena.get(id).kind {
            ExprKind::Let { body, .. } => match &arena.get(*body).kind {
                ExprKind::Case { arms, .. } => assert_eq!(arms.len(), 3),
                other => panic!("expected Case, got {other:?}"),
            },
            other => panic!("expected Let, got {other:?}"),
        }
    }

    #[test]
    fn case_arms_separated_only_by_a_dedent_do_not_swallow_each_other() {
        let interner = SharedInterner::new();
        let src = "case n of\n   0 -> 1\n   1 -> 2\n   _ -> 3";
        let (arena, id) = parse_expr(src, &interner).unwrap();
        match &arena.get(id).kind {
            ExprKind::Case { arms, .. } => assert_eq!(arms.len(), 3),
            other => panic!("expected Case, got {other:?}"),
        }
    }

    #[test]
    fn parses_record_access() {
        let interner = SharedInterner::new();
        let (arena, id) = parse_expr("{ a = 13, b = 'c' }.b", &interner).unwrap();
        assert!(matches!(arena.get(id).kind, ExprKind::RecordAccess { .. }));
    }

    #[test]
    fn parses_lambda_application() {
        let interner = SharedInterner::new();
        let (arena, id) = parse_expr("(\\a -> Foo a) 0 1 2", &interner).unwrap();
        match &arena.get(id).kind {
            ExprKind::Application { args, .. } => assert_eq!(args.len(), 3),
            other => panic!("expected Application, got {other:?}"),
        }
    }

    #[test]
    fn parses_full_module() {
        let interner = SharedInterner::new();
        let module = parse_module(
            "module Main exposing (main)\n\nmain =\n   2 + 3",
            &interner,
        )
        .unwrap();
        assert_eq!(module.declarations.len(), 1);
    }

    #[test]
    fn application_in_a_declaration_body_does_not_swallow_the_next_declaration() {
        let interner = SharedInterner::new();
        let source = "module Main exposing (main)\n\n\
                       fib1 n =\n   if n == 0 then 0 else fib2 (n - 1) + 1\n\n\
                       fib2 n =\n   if n == 0 then 0 else fib1 (n - 1) + 1\n\n\
                       main =\n   fib1 7\n";
        let module = parse_module(source, &interner).unwrap();
        assert_eq!(module.declarations.len(), 3);
    }
}
