//! The parser/module-loader interface surface: what a parsed module looks
//! like to the evaluator.

use crate::expr::{LetDecl, SharedArena};
use crate::name::Name;

#[derive(Clone, Debug)]
pub struct Module {
    pub name: Name,
    pub exposing: Vec<Name>,
    pub declarations: Vec<LetDecl>,
    pub arena: SharedArena,
}

impl Module {
    #[must_use]
    pub fn new(name: Name, exposing: Vec<Name>, declarations: Vec<LetDecl>, arena: SharedArena) -> Self {
        Module {
            name,
            exposing,
            declarations,
            arena,
        }
    }
}
