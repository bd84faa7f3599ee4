//! Name resolution (spec §4.3): the order in which a `Var` reference is
//! resolved to a value.
//!
//! Grounded on `ori_eval/src/exec/name_resolution.rs`'s layered-lookup
//! shape (local scope, then module table, then builtins), adapted to
//! this spec's specific layering: uppercase-first constructor shortcut,
//! `Elm.Kernel.*`/alias qualifier stripping, qualified module lookup,
//! then the unqualified values -> current-module functions -> `Basics`
//! fallback chain.

use std::rc::Rc;

use ml_ir::{Name, Pattern, PatternKind, QualifiedName, Span};

use super::EvalCtx;
use crate::environment::Env;
use crate::errors::{name_error, EvalResult};
use crate::value::{PartiallyApplied, Value};

const ELM_KERNEL_PREFIX: &str = "Elm.Kernel.";

/// The sentinel kernel "module" used to tag a record-accessor function
/// value (`.field`) so `exec::call` can special-case it without
/// consulting the kernel registry or a real AST body.
pub const RECORD_ACCESSOR_SENTINEL: &str = "$RecordAccessor";

pub fn resolve(env: &Env, q: QualifiedName, ctx: &EvalCtx<'_>) -> EvalResult {
    let text = ctx.interner.lookup(q.name);
    if text.chars().next().is_some_and(char::is_uppercase) {
        return Ok(constructor_value(&text, q, ctx));
    }

    if let Some(module) = q.module {
        let module = crate::kernel::aliases::resolve(ctx.interner, module).unwrap_or(module);
        let module_text = ctx.interner.lookup(module);
        if let Some(stripped) = module_text.strip_prefix(ELM_KERNEL_PREFIX) {
            let kernel_module = ctx.interner.intern(stripped);
            return kernel_lookup_or_name_error(kernel_module, q.name, env, ctx);
        }
        if let Some(f) = env.lookup_function(Some(module), q.name) {
            return Ok(function_value(env, module, q.name, f.params, f.body, ctx));
        }
        return kernel_lookup_or_name_error(module, q.name, env, ctx);
    }

    if let Some(v) = env.lookup_value(q.name) {
        return Ok(v);
    }
    if let Some(f) = env.lookup_function(None, q.name) {
        if f.is_caf() {
            return crate::trampoline::eval(env.with_tail_frame((env.current_module, q.name)), f.body, ctx);
        }
        return Ok(function_value(env, env.current_module, q.name, f.params, f.body, ctx));
    }
    let basics = ctx.interner.intern("Basics");
    kernel_lookup_or_name_error(basics, q.name, env, ctx)
}

fn kernel_lookup_or_name_error(module: Name, name: Name, env: &Env, ctx: &EvalCtx<'_>) -> EvalResult {
    match ctx.registry.lookup(module, name) {
        Some(entry) => Ok(kernel_value(module, name, entry.arity, env, ctx)),
        None => Err(name_error(name, env.call_stack())),
    }
}

fn constructor_value(text: &str, q: QualifiedName, ctx: &EvalCtx<'_>) -> Value {
    match text {
        "True" => Value::Bool(true),
        "False" => Value::Bool(false),
        _ => Value::custom(q.module, q.name, vec![]),
    }
}

/// Builds the closure value for a named user function with parameters.
fn function_value(env: &Env, module: Name, name: Name, params: Rc<[Pattern]>, body: ml_ir::ExprId, ctx: &EvalCtx<'_>) -> Value {
    Value::PartiallyApplied(PartiallyApplied {
        captured_env: env.clone(),
        accumulated_args: Rc::new(vec![]),
        params,
        qualified_name: Some((Some(module), name)),
        arena: ctx.arena.clone(),
        body,
    })
}

/// Builds a placeholder closure value for a kernel-backed reference
/// (`List.map`, a bare `Basics.add` fallback, an `Elm.Kernel.*`
/// reference). `body`/`arena` are never dereferenced for these: `exec::
/// call` checks the kernel registry by `qualified_name` before ever
/// touching the AST fields.
fn kernel_value(module: Name, name: Name, arity: usize, env: &Env, ctx: &EvalCtx<'_>) -> Value {
    let wildcard_params: Rc<[Pattern]> = (0..arity)
        .map(|_| Pattern::new(PatternKind::Wildcard, Span::default()))
        .collect();
    Value::PartiallyApplied(PartiallyApplied {
        captured_env: env.clone(),
        accumulated_args: Rc::new(vec![]),
        params: wildcard_params,
        qualified_name: Some((Some(module), name)),
        arena: ctx.arena.clone(),
        body: ml_ir::ExprId::new(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelRegistry;
    use ml_ir::{ExprArena, ExprKind, Literal, SharedArena, SharedInterner};

    fn ctx_parts() -> (SharedInterner, KernelRegistry, SharedArena) {
        let interner = SharedInterner::new();
        let registry = KernelRegistry::build(&interner);
        let arena = SharedArena::new(ExprArena::new());
        (interner, registry, arena)
    }

    #[test]
    fn uppercase_true_resolves_to_bool() {
        let (interner, registry, arena) = ctx_parts();
        let config = crate::config::EvalConfig::default();
        let ctx = EvalCtx { registry: &registry, interner: &interner, arena: &arena, config: &config };
        let main = interner.intern("Main");
        let env = Env::new(main);
        let q = QualifiedName { module: None, name: interner.intern("True") };
        assert_eq!(resolve(&env, q, &ctx).unwrap(), Value::Bool(true));
    }

    #[test]
    fn uppercase_other_resolves_to_nullary_custom() {
        let (interner, registry, arena) = ctx_parts();
        let config = crate::config::EvalConfig::default();
        let ctx = EvalCtx { registry: &registry, interner: &interner, arena: &arena, config: &config };
        let main = interner.intern("Main");
        let env = Env::new(main);
        let nothing = interner.intern("Nothing");
        let q = QualifiedName { module: None, name: nothing };
        assert_eq!(resolve(&env, q, &ctx).unwrap(), Value::custom(None, nothing, vec![]));
    }

    #[test]
    fn unqualified_basics_fallback_resolves_to_a_kernel_closure() {
        let (interner, registry, arena) = ctx_parts();
        let config = crate::config::EvalConfig::default();
        let ctx = EvalCtx { registry: &registry, interner: &interner, arena: &arena, config: &config };
        let main = interner.intern("Main");
        let env = Env::new(main);
        let add = interner.intern("add");
        let q = QualifiedName { module: None, name: add };
        let value = resolve(&env, q, &ctx).unwrap();
        assert!(matches!(value, Value::PartiallyApplied(_)));
    }

    #[test]
    fn unknown_name_is_a_name_error() {
        let (interner, registry, arena) = ctx_parts();
        let config = crate::config::EvalConfig::default();
        let ctx = EvalCtx { registry: &registry, interner: &interner, arena: &arena, config: &config };
        let main = interner.intern("Main");
        let env = Env::new(main);
        let q = QualifiedName { module: None, name: interner.intern("doesNotExist") };
        assert!(resolve(&env, q, &ctx).is_err());
    }

    #[test]
    fn caf_is_tail_reduced_to_its_body_value() {
        let (interner, registry, arena_handle) = ctx_parts();
        let mut arena = ExprArena::new();
        let lit = arena.alloc(ExprKind::Literal(Literal::Int(42)), Span::default());
        let arena = SharedArena::new(arena);
        let _ = arena_handle;
        let config = crate::config::EvalConfig::default();
        let ctx = EvalCtx { registry: &registry, interner: &interner, arena: &arena, config: &config };
        let main = interner.intern("Main");
        let answer = interner.intern("answer");
        let mut impls = rustc_hash::FxHashMap::default();
        impls.insert(answer, crate::environment::FunctionImpl::new(vec![], lit));
        let env = Env::new(main).extend_functions(impls);
        let q = QualifiedName { module: None, name: answer };
        assert_eq!(resolve(&env, q, &ctx).unwrap(), Value::Int(42));
    }
}
