//! The kernel registry (spec §4.8): primitive implementations indexed by
//! `(module, name)` with declared arities.
//!
//! Grounded on `ori_eval/src/function_val.rs`'s numeric-conversion style
//! (no `as`-casts, explicit NaN/overflow messages) and the "registry of
//! named host procedures" shape visible in `ori_eval/src/lib.rs`'s
//! `methods`/`user_methods` module list.
//!
//! A kernel implementation receives the full argument vector, the current
//! call stack (for error attribution), and an `apply` callback so
//! higher-order list kernels (`map`, `foldl`, `foldr`, `filter`) can invoke
//! a passed-in closure without the kernel layer depending on the
//! expression evaluator directly.

pub mod aliases;
pub mod arithmetic;
pub mod boolean;
pub mod comparison;
pub mod list;
pub mod string_ops;
pub mod tuple_ops;

use rustc_hash::FxHashMap;

use ml_ir::{Name, SharedInterner};

use crate::errors::EvalResult;
use crate::value::Value;

pub type ApplyFn<'a> = dyn Fn(&Value, Vec<Value>) -> EvalResult + 'a;
pub type KernelFn = fn(&[Value], &[(Name, Name)], &SharedInterner, &ApplyFn<'_>) -> EvalResult;

#[derive(Clone, Copy)]
pub struct KernelEntry {
    pub arity: usize,
    pub func: KernelFn,
}

pub struct KernelRegistry {
    table: FxHashMap<(Name, Name), KernelEntry>,
}

impl KernelRegistry {
    #[must_use]
    pub fn build(interner: &SharedInterner) -> Self {
        let mut registry = KernelRegistry {
            table: FxHashMap::default(),
        };
        arithmetic::register(&mut registry, interner);
        comparison::register(&mut registry, interner);
        boolean::register(&mut registry, interner);
        list::register(&mut registry, interner);
        tuple_ops::register(&mut registry, interner);
        string_ops::register(&mut registry, interner);
        registry
    }

    pub fn insert(&mut self, interner: &SharedInterner, module: &str, name: &str, arity: usize, func: KernelFn) {
        let key = (interner.intern(module), interner.intern(name));
        self.table.insert(key, KernelEntry { arity, func });
    }

    #[must_use]
    pub fn lookup(&self, module: Name, name: Name) -> Option<&KernelEntry> {
        self.table.get(&(module, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_registered_kernel() {
        let interner = SharedInterner::new();
        let registry = KernelRegistry::build(&interner);
        let basics = interner.intern("Basics");
        let add = interner.intern("add");
        assert!(registry.lookup(basics, add).is_some());
    }

    #[test]
    fn registry_returns_none_for_unknown_kernel() {
        let interner = SharedInterner::new();
        let registry = KernelRegistry::build(&interner);
        let module = interner.intern("Nope");
        let name = interner.intern("nope");
        assert!(registry.lookup(module, name).is_none());
    }
}
