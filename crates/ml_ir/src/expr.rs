//! Expression AST, arena-addressed.
//!
//! Grounded on the arena-threading discipline visible throughout
//! `ori_eval/src/interpreter/mod.rs` (`self.arena`, `ExprId`,
//! `eval_expr_list`): expressions live in a flat `Vec`, addressed by a small
//! copyable `ExprId`, so a closure can carry `(SharedArena, ExprId)` instead
//! of cloning a subtree.

use std::rc::Rc;

use crate::name::Name;
use crate::pattern::{Literal, Pattern};
use crate::span::Span;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ExprId(u32);

impl ExprId {
    #[must_use]
    pub fn new(raw: u32) -> Self {
        ExprId(raw)
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A qualified reference, e.g. `List.map` or a bare `map`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualifiedName {
    pub module: Option<Name>,
    pub name: Name,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LetDecl {
    pub kind: LetDeclKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LetDeclKind {
    /// `f p1 ... pn = body` — eligible for mutual recursion when `params`
    /// is non-empty (spec §4.4/§9: "cycle-allowed").
    Function {
        name: Name,
        params: Vec<Pattern>,
        body: ExprId,
    },
    /// `pattern = expr`, including a bare nullary `x = expr`.
    Destructuring { pattern: Pattern, expr: ExprId },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Var(QualifiedName),
    Negate(ExprId),
    And(ExprId, ExprId),
    Or(ExprId, ExprId),
    /// any operator other than `&&`/`||`; rewritten at evaluation time into
    /// an application through the operator table (spec §4.7)
    BinOp {
        op: Name,
        lhs: ExprId,
        rhs: ExprId,
    },
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    /// arity 2 or 3 only; the parser never emits an arity-1 tuple node
    Tuple(Vec<ExprId>),
    List(Vec<ExprId>),
    Record(Vec<(Name, ExprId)>),
    RecordAccess {
        record: ExprId,
        field: Name,
    },
    /// `.f`
    RecordAccessorFunction(Name),
    /// `{ base | f1 = e1, ... }`
    RecordUpdate {
        base: QualifiedName,
        fields: Vec<(Name, ExprId)>,
    },
    Lambda {
        params: Vec<Pattern>,
        body: ExprId,
    },
    Let {
        decls: Vec<LetDecl>,
        body: ExprId,
    },
    Case {
        scrutinee: ExprId,
        arms: Vec<(Pattern, ExprId)>,
    },
    Application {
        func: ExprId,
        args: Vec<ExprId>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub span: Span,
}

/// A flat store of expression nodes, built once by the parser and never
/// mutated afterward.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExprArena {
    nodes: Vec<ExprNode>,
}

impl ExprArena {
    #[must_use]
    pub fn new() -> Self {
        ExprArena::default()
    }

    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(ExprNode { kind, span });
        id
    }

    #[must_use]
    pub fn get(&self, id: ExprId) -> &ExprNode {
        &self.nodes[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A cheaply cloned handle to a completed arena, shared between a module's
/// top-level declarations and every closure captured while evaluating it.
#[derive(Clone, Debug, Default)]
pub struct SharedArena(Rc<ExprArena>);

impl SharedArena {
    #[must_use]
    pub fn new(arena: ExprArena) -> Self {
        SharedArena(Rc::new(arena))
    }
}

impl std::ops::Deref for SharedArena {
    type Target = ExprArena;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for SharedArena {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
