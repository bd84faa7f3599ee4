//! Source locations.
//!
//! Not present in the distilled spec's data model, but every teacher AST
//! node carries one (see e.g. `ori_ir`'s `Span` threaded through
//! `ExprArena`), and without it `ParsingError`/runtime `TypeError`s have no
//! way to point back at source text.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    #[must_use]
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }
}
