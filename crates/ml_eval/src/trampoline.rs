//! The expression evaluator: a single-function trampoline loop (spec
//! §4/§8's tail-call guarantee).
//!
//! Grounded on `ori_eval/src/interpreter/mod.rs`'s `eval_expr` loop
//! (`'tail: loop { ... continue 'tail ... }`), adapted to this
//! language's tail positions: an `If` branch, a `Case` arm body, a
//! `Let` body, and a saturated `Application` all rebind `(env, expr)`
//! and loop instead of recursing. Every other subexpression recurses
//! genuinely into `eval`, guarded by `stack::ensure_sufficient_stack`
//! so deep non-tail nesting grows the host stack instead of
//! overflowing it.

use ml_ir::{ExprId, ExprKind, Literal};

use crate::errors::EvalResult;
use crate::exec::call::{apply_operator, make_closure, record_accessor_value, try_tail_step, TailOutcome};
use crate::exec::name_resolution::resolve;
use crate::exec::EvalCtx;
use crate::environment::Env;
use crate::let_block::{order_declarations, DeclGroup};
use crate::operators::lookup_operator;
use crate::pattern_match::try_match;
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

pub fn eval(mut env: Env, mut expr: ExprId, ctx: &EvalCtx<'_>) -> EvalResult {
    loop {
        let node = ctx.arena.get(expr);
        match &node.kind {
            ExprKind::Literal(lit) => return Ok(literal_value(lit)),

            ExprKind::Var(q) => return resolve(&env, *q, ctx),

            ExprKind::Negate(inner) => {
                let v = ensure_sufficient_stack(|| eval(env.clone(), *inner, ctx))?;
                return negate(v, &env);
            }

            ExprKind::And(lhs, rhs) => {
                let l = ensure_sufficient_stack(|| eval(env.clone(), *lhs, ctx))?;
                match l {
                    Value::Bool(false) => return Ok(Value::Bool(false)),
                    Value::Bool(true) => {
                        expr = *rhs;
                        continue;
                    }
                    other => {
                        return Err(crate::errors::type_error(
                            format!("&& expects Bool, found {}", other.type_name()),
                            env.call_stack(),
                        ))
                    }
                }
            }

            ExprKind::Or(lhs, rhs) => {
                let l = ensure_sufficient_stack(|| eval(env.clone(), *lhs, ctx))?;
                match l {
                    Value::Bool(true) => return Ok(Value::Bool(true)),
                    Value::Bool(false) => {
                        expr = *rhs;
                        continue;
                    }
                    other => {
                        return Err(crate::errors::type_error(
                            format!("|| expects Bool, found {}", other.type_name()),
                            env.call_stack(),
                        ))
                    }
                }
            }

            ExprKind::BinOp { op, lhs, rhs } => {
                let l = ensure_sufficient_stack(|| eval(env.clone(), *lhs, ctx))?;
                let r = ensure_sufficient_stack(|| eval(env.clone(), *rhs, ctx))?;
                let (module, name) = lookup_operator(ctx.interner, *op)
                    .ok_or_else(|| crate::errors::type_error("unknown operator", env.call_stack()))?;
                return apply_operator(module, name, vec![l, r], &env, ctx);
            }

            ExprKind::Tuple(items) => {
                let values = eval_all(&env, items, ctx)?;
                return Ok(match values.len() {
                    2 => Value::tuple(values[0].clone(), values[1].clone()),
                    3 => Value::triple(values[0].clone(), values[1].clone(), values[2].clone()),
                    _ => {
                        return Err(crate::errors::type_error(
                            "tuples with more than three elements are not supported",
                            env.call_stack(),
                        ))
                    }
                });
            }

            ExprKind::List(items) => {
                return Ok(Value::list(eval_all(&env, items, ctx)?));
            }

            ExprKind::Record(fields) => {
                let mut map = std::collections::BTreeMap::new();
                for (name, e) in fields {
                    let v = ensure_sufficient_stack(|| eval(env.clone(), *e, ctx))?;
                    map.insert(*name, v);
                }
                return Ok(Value::record(map));
            }

            ExprKind::RecordAccess { record, field } => {
                let v = ensure_sufficient_stack(|| eval(env.clone(), *record, ctx))?;
                return match v {
                    Value::Record(fields) => fields.get(field).cloned().ok_or_else(|| {
                        crate::errors::type_error("record has no such field", env.call_stack())
                    }),
                    other => Err(crate::errors::type_error(
                        format!("field access expects a Record, found {}", other.type_name()),
                        env.call_stack(),
                    )),
                };
            }

            ExprKind::RecordAccessorFunction(field) => {
                return Ok(record_accessor_value(*field, &env, ctx));
            }

            ExprKind::RecordUpdate { base, fields } => {
                let base_value = resolve(&env, *base, ctx)?;
                return match base_value {
                    Value::Record(existing) => {
                        let mut map = (*existing).clone();
                        for (name, e) in fields {
                            let v = ensure_sufficient_stack(|| eval(env.clone(), *e, ctx))?;
                            if !map.contains_key(name) {
                                return Err(crate::errors::type_error(
                                    "record update field absent from base record",
                                    env.call_stack(),
                                ));
                            }
                            map.insert(*name, v);
                        }
                        Ok(Value::record(map))
                    }
                    other => Err(crate::errors::type_error(
                        format!("record update expects a Record, found {}", other.type_name()),
                        env.call_stack(),
                    )),
                };
            }

            ExprKind::Lambda { params, body } => {
                return Ok(make_closure(&env, params.clone(), *body, ctx));
            }

            ExprKind::If { cond, then_branch, else_branch } => {
                let c = ensure_sufficient_stack(|| eval(env.clone(), *cond, ctx))?;
                expr = match c {
                    Value::Bool(true) => *then_branch,
                    Value::Bool(false) => *else_branch,
                    other => {
                        return Err(crate::errors::type_error(
                            format!("if condition expects Bool, found {}", other.type_name()),
                            env.call_stack(),
                        ))
                    }
                };
                continue;
            }

            ExprKind::Case { scrutinee, arms } => {
                let v = ensure_sufficient_stack(|| eval(env.clone(), *scrutinee, ctx))?;
                let mut matched = None;
                for (pattern, body) in arms {
                    if let Some(bindings) = try_match(pattern, &v, env.call_stack())? {
                        matched = Some((bindings, *body));
                        break;
                    }
                }
                let Some((bindings, body)) = matched else {
                    return Err(crate::errors::type_error("case expression has no matching arm", env.call_stack()));
                };
                env = env.extend(bindings);
                expr = body;
                continue;
            }

            ExprKind::Let { decls, body } => {
                let groups = order_declarations(decls, ctx.arena, env.call_stack())?;
                for group in &groups {
                    env = bind_group(env, group, ctx)?;
                }
                expr = *body;
                continue;
            }

            ExprKind::Application { func, args } => {
                let callee = ensure_sufficient_stack(|| eval(env.clone(), *func, ctx))?;
                let arg_values = eval_all(&env, args, ctx)?;
                if env.trace().is_active() {
                    return crate::exec::call::apply_value(callee, arg_values, &env, ctx);
                }
                match try_tail_step(callee, arg_values, &env, ctx)? {
                    TailOutcome::Done(v) => return Ok(v),
                    TailOutcome::Loop(new_env, new_expr) => {
                        env = new_env;
                        expr = new_expr;
                        continue;
                    }
                }
            }
        }
    }
}

fn eval_all(env: &Env, items: &[ExprId], ctx: &EvalCtx<'_>) -> EvalResult<Vec<Value>> {
    items
        .iter()
        .map(|e| ensure_sufficient_stack(|| eval(env.clone(), *e, ctx)))
        .collect()
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Unit => Value::Unit,
        Literal::Int(n) => Value::Int(*n),
        Literal::Float(n) => Value::Float(*n),
        Literal::Char(c) => Value::Char(*c),
        Literal::String(s) => Value::string(s.as_str()),
    }
}

fn negate(v: Value, env: &Env) -> EvalResult {
    match v {
        Value::Int(n) => Ok(Value::Int(-n)),
        Value::Float(n) => Ok(Value::Float(-n)),
        other => Err(crate::errors::type_error(
            format!("unary negation expects Int or Float, found {}", other.type_name()),
            env.call_stack(),
        )),
    }
}

/// Binds one `DeclGroup` into `env`: a lone `Destructuring` declaration
/// evaluates its right-hand side against the *previous* `env` and
/// pattern-matches it into `values`; one-or-more `Function` members are
/// built as closures over the group's own extended `env` in one
/// `extend_functions` call so mutual recursion resolves (spec §4.4).
fn bind_group(env: Env, group: &DeclGroup<'_>, ctx: &EvalCtx<'_>) -> EvalResult<Env> {
    if group.decls.len() == 1 {
        if let ml_ir::LetDeclKind::Destructuring { pattern, expr } = &group.decls[0].kind {
            let v = ensure_sufficient_stack(|| eval(env.clone(), *expr, ctx))?;
            let bindings = try_match(pattern, &v, env.call_stack())?.ok_or_else(|| {
                crate::errors::type_error("let-bound pattern does not match its value", env.call_stack())
            })?;
            return Ok(env.extend(bindings));
        }
    }

    let mut impls = rustc_hash::FxHashMap::default();
    for decl in &group.decls {
        let ml_ir::LetDeclKind::Function { name, params, body } = &decl.kind else {
            return Err(crate::errors::type_error(
                "illegal cycle in let block",
                env.call_stack(),
            ));
        };
        impls.insert(*name, crate::environment::FunctionImpl::new(params.clone(), *body));
    }
    Ok(env.extend_functions(impls))
}
