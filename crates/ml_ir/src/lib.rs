//! Interned names, the expression/pattern AST, and the `Module` container
//! the parser hands to the evaluator.
//!
//! Grounded on `ori_ir`: names and interning follow
//! `sigil_ir/src/interner.rs`; the arena-addressed expression tree follows
//! the arena discipline used throughout `ori_eval/src/interpreter/mod.rs`.

pub mod expr;
pub mod module;
pub mod name;
pub mod pattern;
pub mod span;

pub use expr::{ExprArena, ExprId, ExprKind, ExprNode, LetDecl, LetDeclKind, QualifiedName, SharedArena};
pub use module::Module;
pub use name::{Name, SharedInterner, StringInterner};
pub use pattern::{Literal, Pattern, PatternKind};
pub use span::Span;
