//! `Basics` comparison kernels: `eq`, `neq`, `lt`, `gt`, `le`, `ge`.
//!
//! `eq`/`neq` are structural equality over every `Value` shape except
//! `PartiallyApplied` (functions have no equality in the surface
//! language). `lt`/`gt`/`le`/`ge` are restricted to the "comparable"
//! subset Elm itself allows: `Int`, `Float`, `Char`, `String`, and
//! tuples/lists built from those — comparing anything else is an
//! `Unsupported` error rather than a silent `false`, mirroring how the
//! teacher's kernels reject operations outside their domain instead of
//! guessing.

use std::cmp::Ordering;

use ml_ir::Name;

use super::{ApplyFn, KernelFn, KernelRegistry};
use crate::errors::{type_error, unsupported, EvalResult};
use crate::value::Value;

pub(super) fn register(registry: &mut KernelRegistry, interner: &ml_ir::SharedInterner) {
    registry.insert(interner, "Basics", "eq", 2, eq as KernelFn);
    registry.insert(interner, "Basics", "neq", 2, neq as KernelFn);
    registry.insert(interner, "Basics", "lt", 2, lt as KernelFn);
    registry.insert(interner, "Basics", "gt", 2, gt as KernelFn);
    registry.insert(interner, "Basics", "le", 2, le as KernelFn);
    registry.insert(interner, "Basics", "ge", 2, ge as KernelFn);
}

fn eq(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    Ok(Value::Bool(structural_eq(&args[0], &args[1], call_stack)?))
}

fn neq(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    Ok(Value::Bool(!structural_eq(&args[0], &args[1], call_stack)?))
}

fn structural_eq(a: &Value, b: &Value, call_stack: &[(Name, Name)]) -> Result<bool, crate::errors::EvalError> {
    match (a, b) {
        (Value::PartiallyApplied(_), _) | (_, Value::PartiallyApplied(_)) => {
            Err(unsupported("functions cannot be compared for equality", call_stack))
        }
        (Value::List(xs), Value::List(ys)) => {
            if xs.len() != ys.len() {
                return Ok(false);
            }
            for (x, y) in xs.iter().zip(ys.iter()) {
                if !structural_eq(x, y, call_stack)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Tuple(p), Value::Tuple(q)) => {
            Ok(structural_eq(&p.0, &q.0, call_stack)? && structural_eq(&p.1, &q.1, call_stack)?)
        }
        (Value::Triple(p), Value::Triple(q)) => {
            Ok(structural_eq(&p.0, &q.0, call_stack)?
                && structural_eq(&p.1, &q.1, call_stack)?
                && structural_eq(&p.2, &q.2, call_stack)?)
        }
        (Value::Record(p), Value::Record(q)) => {
            if p.len() != q.len() {
                return Ok(false);
            }
            for (k, v) in p.iter() {
                match q.get(k) {
                    Some(other) if structural_eq(v, other, call_stack)? => {}
                    _ => return Ok(false),
                }
            }
            Ok(true)
        }
        (Value::Custom(p), Value::Custom(q)) => {
            if p.name != q.name || p.args.len() != q.args.len() {
                return Ok(false);
            }
            for (x, y) in p.args.iter().zip(q.args.iter()) {
                if !structural_eq(x, y, call_stack)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(a == b),
    }
}

fn comparable_ordering(
    a: &Value,
    b: &Value,
    call_stack: &[(Name, Name)],
) -> Result<Ordering, crate::errors::EvalError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => x
            .partial_cmp(y)
            .ok_or_else(|| type_error("cannot compare NaN", call_stack)),
        (Value::Int(x), Value::Float(y)) => (*x as f64)
            .partial_cmp(y)
            .ok_or_else(|| type_error("cannot compare NaN", call_stack)),
        (Value::Float(x), Value::Int(y)) => x
            .partial_cmp(&(*y as f64))
            .ok_or_else(|| type_error("cannot compare NaN", call_stack)),
        (Value::Char(x), Value::Char(y)) => Ok(x.cmp(y)),
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        (Value::Tuple(p), Value::Tuple(q)) => match comparable_ordering(&p.0, &q.0, call_stack)? {
            Ordering::Equal => comparable_ordering(&p.1, &q.1, call_stack),
            ord => Ok(ord),
        },
        (Value::List(xs), Value::List(ys)) => {
            for (x, y) in xs.iter().zip(ys.iter()) {
                match comparable_ordering(x, y, call_stack)? {
                    Ordering::Equal => continue,
                    ord => return Ok(ord),
                }
            }
            Ok(xs.len().cmp(&ys.len()))
        }
        (a, b) => Err(unsupported(
            format!("values of type {} are not comparable", if a.type_name() == b.type_name() { a.type_name() } else { "mixed" }),
            call_stack,
        )),
    }
}

fn lt(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    Ok(Value::Bool(comparable_ordering(&args[0], &args[1], call_stack)? == Ordering::Less))
}

fn gt(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    Ok(Value::Bool(comparable_ordering(&args[0], &args[1], call_stack)? == Ordering::Greater))
}

fn le(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    Ok(Value::Bool(comparable_ordering(&args[0], &args[1], call_stack)? != Ordering::Greater))
}

fn ge(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    Ok(Value::Bool(comparable_ordering(&args[0], &args[1], call_stack)? != Ordering::Less))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_interner() -> ml_ir::SharedInterner {
        ml_ir::SharedInterner::new()
    }

    fn noop_apply(_: &Value, _: Vec<Value>) -> EvalResult {
        unreachable!("comparison kernels never apply a function argument")
    }

    #[test]
    fn eq_compares_lists_structurally() {
        let a = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let result = eq(&[a, b], &[], &test_interner(), &noop_apply).unwrap();
        assert_eq!(result, Value::Bool(true));
    }

    #[test]
    fn lt_orders_ints() {
        let result = lt(&[Value::Int(1), Value::Int(2)], &[], &test_interner(), &noop_apply).unwrap();
        assert_eq!(result, Value::Bool(true));
    }

    #[test]
    fn comparing_functions_is_unsupported() {
        let interner = ml_ir::SharedInterner::new();
        let f = crate::value::PartiallyApplied {
            captured_env: crate::environment::Env::new(interner.intern("Main")),
            accumulated_args: std::rc::Rc::new(vec![]),
            params: std::rc::Rc::from(vec![]),
            qualified_name: None,
            arena: ml_ir::SharedArena::new(ml_ir::ExprArena::new()),
            body: ml_ir::ExprArena::new().alloc(ml_ir::ExprKind::Literal(ml_ir::Literal::Unit), ml_ir::Span::default()),
        };
        let result = eq(&[Value::PartiallyApplied(f.clone()), Value::PartiallyApplied(f)], &[], &test_interner(), &noop_apply);
        assert!(result.is_err());
    }
}
