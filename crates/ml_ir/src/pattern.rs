//! Pattern AST — the eleven forms of spec §4.1.
//!
//! Grounded on the `MatchPattern`/`BindingPattern` split in
//! `ori_eval/src/exec/control.rs`, collapsed into a single enum: this
//! language has no destructuring-assignment target distinct from a match
//! arm pattern.

use crate::name::Name;
use crate::span::Span;

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Unit,
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// `_`
    Wildcard,
    /// a bare variable, binds the whole value
    Var(Name),
    /// `p as x`
    As(Box<Pattern>, Name),
    /// int / hex / float / char / string / unit literal
    Literal(Literal),
    /// `(p, q)` or `(p, q, r)` — arity 2 or 3; a parser never emits arity 1
    /// (per spec's singleton-tuple open question, resolved as "transparent")
    Tuple(Vec<Pattern>),
    /// `[p1, ..., pn]`
    List(Vec<Pattern>),
    /// `h :: t`
    Cons(Box<Pattern>, Box<Pattern>),
    /// `Ctor(p1, ...)`; the qualifier (if present) is ignored at match time
    /// (spec §4.1: "constructor name only, not module qualifier")
    Ctor {
        module: Option<Name>,
        name: Name,
        args: Vec<Pattern>,
    },
    /// `{ f1, ..., fn }` — binds each field name to the field's value
    Record(Vec<Name>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    #[must_use]
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Pattern { kind, span }
    }
}
