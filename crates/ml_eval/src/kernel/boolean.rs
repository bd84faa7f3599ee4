//! `Basics.not` — the only boolean kernel not handled as a dedicated
//! AST node (`&&`/`||` are short-circuit forms, spec §4.7).

use ml_ir::Name;

use super::{ApplyFn, KernelFn, KernelRegistry};
use crate::errors::{type_error, EvalResult};
use crate::value::Value;

pub(super) fn register(registry: &mut KernelRegistry, interner: &ml_ir::SharedInterner) {
    registry.insert(interner, "Basics", "not", 1, not as KernelFn);
}

fn not(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match &args[0] {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(type_error(format!("not expects a Bool, found {}", other.type_name()), call_stack)),
    }
}
