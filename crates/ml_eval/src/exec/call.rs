//! Application and saturation (spec §4.6).
//!
//! `try_tail_step` is the single source of truth for what happens when
//! a callee value receives a batch of arguments: under-saturation grows
//! a `PartiallyApplied`, exact saturation either loops (the tail-call
//! case, handled by `crate::trampoline::eval`) or calls out to a kernel/
//! record-accessor/user-function body, and over-saturation re-applies
//! the leftover arguments to whatever the saturated call produced.
//! `apply_value` is the non-looping wrapper kernels and the driver use
//! when they need a `Value` back immediately (spec §4.8's higher-order
//! list kernels, and `Application` nodes outside tail position).

use std::rc::Rc;

use ml_ir::Name;

use super::name_resolution::RECORD_ACCESSOR_SENTINEL;
use super::EvalCtx;
use crate::call_tree::CallKind;
use crate::environment::Env;
use crate::errors::{type_error, EvalResult};
use crate::pattern_match::try_match;
use crate::value::{PartiallyApplied, Value};

pub enum TailOutcome {
    Loop(Env, ml_ir::ExprId),
    Done(Value),
}

/// Labels a callee for a `CallNode` before it's consumed by
/// `try_tail_step` — used only by `apply_value_traced`, since building
/// the label costs a registry lookup the untraced fast path shouldn't
/// pay for.
#[must_use]
pub fn classify(callee: &Value, ctx: &EvalCtx<'_>) -> (CallKind, (Option<Name>, Name)) {
    match callee {
        Value::Custom(c) => (CallKind::Application, (c.module, c.name)),
        Value::PartiallyApplied(pa) => match pa.qualified_name {
            None => (CallKind::Application, (None, ctx.interner.intern("<lambda>"))),
            Some((module_opt, name)) => {
                let sentinel = ctx.interner.intern(RECORD_ACCESSOR_SENTINEL);
                if module_opt == Some(sentinel) {
                    (CallKind::EvalFunction, (module_opt, name))
                } else if module_opt.is_some_and(|m| ctx.registry.lookup(m, name).is_some()) {
                    (CallKind::EvalKernelFunction, (module_opt, name))
                } else {
                    (CallKind::Call, (module_opt, name))
                }
            }
        },
        other => (CallKind::Application, (None, ctx.interner.intern(other.type_name()))),
    }
}

/// Evaluates `operator` (already resolved to a `(module, name)` kernel
/// pair, spec §4.7) directly against `args` — operators never resolve
/// to a user function, so this bypasses `try_tail_step` entirely.
pub fn apply_operator(module: Name, name: Name, args: Vec<Value>, env: &Env, ctx: &EvalCtx<'_>) -> EvalResult {
    let entry = ctx
        .registry
        .lookup(module, name)
        .ok_or_else(|| type_error("unresolvable operator", env.call_stack()))?;
    let apply_fn = |f: &Value, call_args: Vec<Value>| apply_value(f.clone(), call_args, env, ctx);
    (entry.func)(&args, env.call_stack(), ctx.interner, &apply_fn)
}

/// Applies `callee` to `args`, returning a value directly. Used by
/// kernel callbacks (spec §4.8's higher-order list kernels call user
/// functions back through here) and any application outside tail
/// position — and, when a tracer is active, by every `Application` node
/// the trampoline visits, tail position included (see `classify` above
/// for why that abandons tail-call flattening in exchange for a
/// faithful call tree).
pub fn apply_value(callee: Value, args: Vec<Value>, env: &Env, ctx: &EvalCtx<'_>) -> EvalResult {
    if env.trace().is_active() {
        return apply_value_traced(callee, args, env, ctx);
    }
    match try_tail_step(callee, args, env, ctx)? {
        TailOutcome::Done(v) => Ok(v),
        TailOutcome::Loop(new_env, body) => crate::trampoline::eval(new_env, body, ctx),
    }
}

fn apply_value_traced(callee: Value, args: Vec<Value>, env: &Env, ctx: &EvalCtx<'_>) -> EvalResult {
    let (kind, qualified_name) = classify(&callee, ctx);
    let traced_args = args.clone();
    env.trace().enter();
    let result = match try_tail_step(callee, args, env, ctx) {
        Ok(TailOutcome::Done(v)) => Ok(v),
        Ok(TailOutcome::Loop(new_env, body)) => crate::trampoline::eval(new_env, body, ctx),
        Err(e) => Err(e),
    };
    env.trace().exit(kind, qualified_name, traced_args, result.clone());
    result
}

pub fn try_tail_step(callee: Value, args: Vec<Value>, env: &Env, ctx: &EvalCtx<'_>) -> Result<TailOutcome, crate::errors::EvalError> {
    match callee {
        Value::Custom(c) => {
            let mut all_args = (*c.args).clone();
            all_args.extend(args);
            Ok(TailOutcome::Done(Value::custom(c.module, c.name, all_args)))
        }
        Value::PartiallyApplied(pa) => step_partially_applied(pa, args, env, ctx),
        other => Err(type_error(
            format!("{} is not a function and cannot be applied", other.type_name()),
            env.call_stack(),
        )),
    }
}

fn step_partially_applied(
    pa: PartiallyApplied,
    new_args: Vec<Value>,
    env: &Env,
    ctx: &EvalCtx<'_>,
) -> Result<TailOutcome, crate::errors::EvalError> {
    let mut accumulated = (*pa.accumulated_args).clone();
    accumulated.extend(new_args);

    if accumulated.len() < pa.params.len() {
        return Ok(TailOutcome::Done(Value::PartiallyApplied(PartiallyApplied {
            accumulated_args: Rc::new(accumulated),
            ..pa
        })));
    }

    let call_args: Vec<Value> = accumulated[..pa.params.len()].to_vec();
    let extra_args: Vec<Value> = accumulated[pa.params.len()..].to_vec();

    let sentinel = ctx.interner.intern(RECORD_ACCESSOR_SENTINEL);
    let Some((module_opt, name)) = pa.qualified_name else {
        return invoke_user_body(pa, call_args, extra_args, env, ctx, None);
    };

    if module_opt == Some(sentinel) {
        let record_value = call_args
            .first()
            .ok_or_else(|| type_error("record accessor requires one argument", env.call_stack()))?;
        let field_value = match record_value {
            Value::Record(fields) => fields
                .get(&name)
                .cloned()
                .ok_or_else(|| type_error("record has no such field", env.call_stack()))?,
            other => {
                return Err(type_error(
                    format!("record accessor expects a Record, found {}", other.type_name()),
                    env.call_stack(),
                ))
            }
        };
        return finish_with_extra(field_value, extra_args, env, ctx);
    }

    if let Some(module) = module_opt {
        if let Some(entry) = ctx.registry.lookup(module, name) {
            let apply_fn = |f: &Value, call_args: Vec<Value>| apply_value(f.clone(), call_args, env, ctx);
            let result = (entry.func)(&call_args, env.call_stack(), ctx.interner, &apply_fn)?;
            return finish_with_extra(result, extra_args, env, ctx);
        }
    }

    invoke_user_body(pa, call_args, extra_args, env, ctx, module_opt.map(|m| (m, name)))
}

fn finish_with_extra(result: Value, extra_args: Vec<Value>, env: &Env, ctx: &EvalCtx<'_>) -> Result<TailOutcome, crate::errors::EvalError> {
    if extra_args.is_empty() {
        Ok(TailOutcome::Done(result))
    } else {
        Ok(TailOutcome::Done(apply_value(result, extra_args, env, ctx)?))
    }
}

fn invoke_user_body(
    pa: PartiallyApplied,
    call_args: Vec<Value>,
    extra_args: Vec<Value>,
    env: &Env,
    ctx: &EvalCtx<'_>,
    frame: Option<(Name, Name)>,
) -> Result<TailOutcome, crate::errors::EvalError> {
    let bindings = bind_params(&pa.params, &call_args, env.call_stack())?;
    let base_env = pa.captured_env.extend(bindings);
    let new_env = match frame {
        Some(f) => base_env.with_tail_frame(f),
        None => base_env,
    };
    if extra_args.is_empty() {
        Ok(TailOutcome::Loop(new_env, pa.body))
    } else {
        let result = crate::trampoline::eval(new_env, pa.body, ctx)?;
        Ok(TailOutcome::Done(apply_value(result, extra_args, env, ctx)?))
    }
}

/// Builds a `Lambda`'s closure value: an anonymous function has no
/// `qualified_name`, so `step_partially_applied` always routes a
/// saturated call straight to `invoke_user_body`.
pub fn make_closure(env: &Env, params: Vec<ml_ir::Pattern>, body: ml_ir::ExprId, ctx: &EvalCtx<'_>) -> Value {
    Value::PartiallyApplied(PartiallyApplied {
        captured_env: env.clone(),
        accumulated_args: Rc::new(vec![]),
        params: params.into(),
        qualified_name: None,
        arena: ctx.arena.clone(),
        body,
    })
}

/// Builds a `.field` record-accessor value, tagged with the sentinel
/// module so `step_partially_applied` special-cases it before ever
/// consulting the kernel registry or reading `body`/`arena`.
pub fn record_accessor_value(field: Name, env: &Env, ctx: &EvalCtx<'_>) -> Value {
    let sentinel = ctx.interner.intern(RECORD_ACCESSOR_SENTINEL);
    Value::PartiallyApplied(PartiallyApplied {
        captured_env: env.clone(),
        accumulated_args: Rc::new(vec![]),
        params: vec![ml_ir::Pattern::new(ml_ir::PatternKind::Wildcard, ml_ir::Span::default())].into(),
        qualified_name: Some((Some(sentinel), field)),
        arena: ctx.arena.clone(),
        body: ml_ir::ExprId::new(0),
    })
}

fn bind_params(params: &[ml_ir::Pattern], args: &[Value], call_stack: &[(Name, Name)]) -> Result<crate::pattern_match::Bindings, crate::errors::EvalError> {
    let mut bindings = crate::pattern_match::Bindings::default();
    for (param, arg) in params.iter().zip(args.iter()) {
        match try_match(param, arg, call_stack)? {
            Some(sub) => bindings.extend(sub),
            None => return Err(type_error("argument does not match parameter pattern", call_stack)),
        }
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelRegistry;
    use ml_ir::{ExprArena, ExprKind, Literal, Pattern, PatternKind, Span, SharedArena, SharedInterner};

    #[test]
    fn custom_application_accumulates_args() {
        let interner = SharedInterner::new();
        let registry = KernelRegistry::build(&interner);
        let arena = SharedArena::new(ExprArena::new());
        let config = crate::config::EvalConfig::default();
        let ctx = EvalCtx { registry: &registry, interner: &interner, arena: &arena, config: &config };
        let main = interner.intern("Main");
        let env = Env::new(main);
        let just = interner.intern("Just");
        let callee = Value::custom(None, just, vec![]);
        let result = apply_value(callee, vec![Value::Int(5)], &env, &ctx).unwrap();
        assert_eq!(result, Value::custom(None, just, vec![Value::Int(5)]));
    }

    #[test]
    fn saturated_user_function_application_loops() {
        let interner = SharedInterner::new();
        let registry = KernelRegistry::build(&interner);
        let mut arena_inner = ExprArena::new();
        let body = arena_inner.alloc(ExprKind::Literal(Literal::Int(1)), Span::default());
        let arena = SharedArena::new(arena_inner);
        let config = crate::config::EvalConfig::default();
        let ctx = EvalCtx { registry: &registry, interner: &interner, arena: &arena, config: &config };
        let main = interner.intern("Main");
        let env = Env::new(main);
        let f = interner.intern("f");
        let x = interner.intern("x");
        let params: std::rc::Rc<[Pattern]> = vec![Pattern::new(PatternKind::Var(x), Span::default())].into();
        let closure = Value::PartiallyApplied(PartiallyApplied {
            captured_env: env.clone(),
            accumulated_args: Rc::new(vec![]),
            params,
            qualified_name: Some((Some(main), f)),
            arena: arena.clone(),
            body,
        });
        let outcome = try_tail_step(closure, vec![Value::Int(7)], &env, &ctx).unwrap();
        assert!(matches!(outcome, TailOutcome::Loop(_, _)));
    }

    #[test]
    fn under_saturated_call_stays_partially_applied() {
        let interner = SharedInterner::new();
        let registry = KernelRegistry::build(&interner);
        let arena = SharedArena::new(ExprArena::new());
        let config = crate::config::EvalConfig::default();
        let ctx = EvalCtx { registry: &registry, interner: &interner, arena: &arena, config: &config };
        let main = interner.intern("Main");
        let env = Env::new(main);
        let add = interner.intern("add");
        let basics = interner.intern("Basics");
        let params: std::rc::Rc<[Pattern]> = vec![
            Pattern::new(PatternKind::Wildcard, Span::default()),
            Pattern::new(PatternKind::Wildcard, Span::default()),
        ]
        .into();
        let closure = Value::PartiallyApplied(PartiallyApplied {
            captured_env: env.clone(),
            accumulated_args: Rc::new(vec![]),
            params,
            qualified_name: Some((Some(basics), add)),
            arena: arena.clone(),
            body: ml_ir::ExprId::new(0),
        });
        let result = apply_value(closure, vec![Value::Int(1)], &env, &ctx).unwrap();
        assert!(matches!(result, Value::PartiallyApplied(_)));
    }

    #[test]
    fn saturated_kernel_call_computes_the_result() {
        let interner = SharedInterner::new();
        let registry = KernelRegistry::build(&interner);
        let arena = SharedArena::new(ExprArena::new());
        let config = crate::config::EvalConfig::default();
        let ctx = EvalCtx { registry: &registry, interner: &interner, arena: &arena, config: &config };
        let main = interner.intern("Main");
        let env = Env::new(main);
        let add = interner.intern("add");
        let basics = interner.intern("Basics");
        let params: std::rc::Rc<[Pattern]> = vec![
            Pattern::new(PatternKind::Wildcard, Span::default()),
            Pattern::new(PatternKind::Wildcard, Span::default()),
        ]
        .into();
        let closure = Value::PartiallyApplied(PartiallyApplied {
            captured_env: env.clone(),
            accumulated_args: Rc::new(vec![]),
            params,
            qualified_name: Some((Some(basics), add)),
            arena: arena.clone(),
            body: ml_ir::ExprId::new(0),
        });
        let result = apply_value(closure, vec![Value::Int(1), Value::Int(2)], &env, &ctx).unwrap();
        assert_eq!(result, Value::Int(3));
    }

    #[test]
    fn tracing_records_a_kernel_call_node() {
        let interner = SharedInterner::new();
        let registry = KernelRegistry::build(&interner);
        let arena = SharedArena::new(ExprArena::new());
        let config = crate::config::EvalConfig::default().with_trace(true);
        let ctx = EvalCtx { registry: &registry, interner: &interner, arena: &arena, config: &config };
        let main = interner.intern("Main");
        let env = Env::new(main).with_tracing();
        let add = interner.intern("add");
        let basics = interner.intern("Basics");
        let params: std::rc::Rc<[Pattern]> = vec![
            Pattern::new(PatternKind::Wildcard, Span::default()),
            Pattern::new(PatternKind::Wildcard, Span::default()),
        ]
        .into();
        let closure = Value::PartiallyApplied(PartiallyApplied {
            captured_env: env.clone(),
            accumulated_args: Rc::new(vec![]),
            params,
            qualified_name: Some((Some(basics), add)),
            arena: arena.clone(),
            body: ml_ir::ExprId::new(0),
        });
        let result = apply_value(closure, vec![Value::Int(1), Value::Int(2)], &env, &ctx).unwrap();
        assert_eq!(result, Value::Int(3));

        let roots = env.trace().take_roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].kind, crate::call_tree::CallKind::EvalKernelFunction);
        assert_eq!(roots[0].qualified_name, (Some(basics), add));
        assert_eq!(roots[0].result, Ok(Value::Int(3)));
    }

    #[test]
    fn record_accessor_reads_the_field() {
        let interner = SharedInterner::new();
        let registry = KernelRegistry::build(&interner);
        let arena = SharedArena::new(ExprArena::new());
        let config = crate::config::EvalConfig::default();
        let ctx = EvalCtx { registry: &registry, interner: &interner, arena: &arena, config: &config };
        let main = interner.intern("Main");
        let env = Env::new(main);
        let sentinel = interner.intern(RECORD_ACCESSOR_SENTINEL);
        let field = interner.intern("x");
        let params: std::rc::Rc<[Pattern]> = vec![Pattern::new(PatternKind::Wildcard, Span::default())].into();
        let accessor = Value::PartiallyApplied(PartiallyApplied {
            captured_env: env.clone(),
            accumulated_args: Rc::new(vec![]),
            params,
            qualified_name: Some((Some(sentinel), field)),
            arena: arena.clone(),
            body: ml_ir::ExprId::new(0),
        });
        let mut fields = std::collections::BTreeMap::new();
        fields.insert(field, Value::Int(9));
        let record = Value::record(fields);
        let result = apply_value(accessor, vec![record], &env, &ctx).unwrap();
        assert_eq!(result, Value::Int(9));
    }
}
