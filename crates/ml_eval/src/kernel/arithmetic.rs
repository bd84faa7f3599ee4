//! `Basics` numeric kernels: `add`, `sub`, `mul`, `div`, `idiv`, `modBy`.
//!
//! Grounded on `ori_eval/src/function_val.rs`'s numeric-conversion
//! style (explicit match over operand kinds, no silent truncation).
//! Int/Int arithmetic stays in `Int`; either operand being `Float`
//! promotes the result to `Float`, matching how the concrete examples
//! in spec §8 mix literals freely. `/` (Basics.div) always produces a
//! `Float`, matching the surface language's actual `/` semantics;
//! `idiv` is kept alongside for a future `//` operator.

use ml_ir::Name;

use super::{ApplyFn, KernelFn, KernelRegistry};
use crate::errors::{type_error, EvalResult};
use crate::value::Value;

pub(super) fn register(registry: &mut KernelRegistry, interner: &ml_ir::SharedInterner) {
    registry.insert(interner, "Basics", "add", 2, add as KernelFn);
    registry.insert(interner, "Basics", "sub", 2, sub as KernelFn);
    registry.insert(interner, "Basics", "mul", 2, mul as KernelFn);
    registry.insert(interner, "Basics", "div", 2, div as KernelFn);
    registry.insert(interner, "Basics", "idiv", 2, idiv as KernelFn);
    registry.insert(interner, "Basics", "modBy", 2, mod_by as KernelFn);
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn add(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    numeric_binop(args, call_stack, "add", |a, b| a.checked_add(b), |a, b| a + b)
}

fn sub(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    numeric_binop(args, call_stack, "sub", |a, b| a.checked_sub(b), |a, b| a - b)
}

fn mul(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    numeric_binop(args, call_stack, "mul", |a, b| a.checked_mul(b), |a, b| a * b)
}

fn numeric_binop(
    args: &[Value],
    call_stack: &[(Name, Name)],
    name: &str,
    int_op: impl Fn(i64, i64) -> Option<i64>,
    float_op: impl Fn(f64, f64) -> f64,
) -> EvalResult {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
            .map(Value::Int)
            .ok_or_else(|| type_error(format!("integer overflow in {name}"), call_stack)),
        (a, b) => match (as_f64(a), as_f64(b)) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
            _ => Err(type_error(
                format!("{name} expects two numbers, found {} and {}", a.type_name(), b.type_name()),
                call_stack,
            )),
        },
    }
}

fn div(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match (as_f64(&args[0]), as_f64(&args[1])) {
        (Some(a), Some(b)) => Ok(Value::Float(a / b)),
        _ => Err(type_error(
            format!(
                "div expects two numbers, found {} and {}",
                args[0].type_name(),
                args[1].type_name()
            ),
            call_stack,
        )),
    }
}

fn idiv(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(0)) => {
            let _ = a;
            Err(type_error("division by zero", call_stack))
        }
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a / b)),
        (a, b) => Err(type_error(
            format!("idiv expects two integers, found {} and {}", a.type_name(), b.type_name()),
            call_stack,
        )),
    }
}

fn mod_by(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match (&args[0], &args[1]) {
        (Value::Int(modulus), Value::Int(0)) => {
            let _ = modulus;
            Err(type_error("modBy by zero", call_stack))
        }
        (Value::Int(modulus), Value::Int(value)) => {
            let m = ((value % modulus) + modulus) % modulus;
            Ok(Value::Int(m))
        }
        (a, b) => Err(type_error(
            format!("modBy expects two integers, found {} and {}", a.type_name(), b.type_name()),
            call_stack,
        )),
    }
}
