//! `Tuple.first`/`Tuple.second` projections.

use ml_ir::Name;

use super::{ApplyFn, KernelFn, KernelRegistry};
use crate::errors::{type_error, EvalResult};
use crate::value::Value;

pub(super) fn register(registry: &mut KernelRegistry, interner: &ml_ir::SharedInterner) {
    registry.insert(interner, "Tuple", "first", 1, first as KernelFn);
    registry.insert(interner, "Tuple", "second", 1, second as KernelFn);
}

fn first(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match &args[0] {
        Value::Tuple(pair) => Ok(pair.0.clone()),
        other => Err(type_error(format!("Tuple.first expects a tuple, found {}", other.type_name()), call_stack)),
    }
}

fn second(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match &args[0] {
        Value::Tuple(pair) => Ok(pair.1.clone()),
        other => Err(type_error(format!("Tuple.second expects a tuple, found {}", other.type_name()), call_stack)),
    }
}
