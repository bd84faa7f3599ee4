//! `String`/`Char` kernels: length, concatenation, case conversion,
//! and the `Char` <-> `Int`/`String` conversions the spec's
//! "string/char conversions" line item (§4.8) calls for.

use ml_ir::Name;

use super::{ApplyFn, KernelFn, KernelRegistry};
use crate::errors::{type_error, EvalResult};
use crate::value::Value;

pub(super) fn register(registry: &mut KernelRegistry, interner: &ml_ir::SharedInterner) {
    registry.insert(interner, "String", "length", 1, string_length as KernelFn);
    registry.insert(interner, "String", "append", 2, string_append as KernelFn);
    registry.insert(interner, "String", "fromChar", 1, from_char as KernelFn);
    registry.insert(interner, "String", "toUpper", 1, to_upper as KernelFn);
    registry.insert(interner, "String", "toLower", 1, to_lower as KernelFn);
    registry.insert(interner, "String", "toList", 1, to_list as KernelFn);
    registry.insert(interner, "Char", "toCode", 1, char_to_code as KernelFn);
    registry.insert(interner, "Char", "fromCode", 1, char_from_code as KernelFn);
}

fn string_length(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match &args[0] {
        Value::String(s) => Ok(Value::Int(s.chars().count() as i64)),
        other => Err(type_error(format!("String.length expects a String, found {}", other.type_name()), call_stack)),
    }
}

fn string_append(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match (&args[0], &args[1]) {
        (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}"))),
        (a, b) => Err(type_error(
            format!("String.append expects two Strings, found {} and {}", a.type_name(), b.type_name()),
            call_stack,
        )),
    }
}

fn from_char(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match &args[0] {
        Value::Char(c) => Ok(Value::string(c.to_string())),
        other => Err(type_error(format!("String.fromChar expects a Char, found {}", other.type_name()), call_stack)),
    }
}

fn to_upper(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match &args[0] {
        Value::String(s) => Ok(Value::string(s.to_uppercase())),
        other => Err(type_error(format!("String.toUpper expects a String, found {}", other.type_name()), call_stack)),
    }
}

fn to_lower(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match &args[0] {
        Value::String(s) => Ok(Value::string(s.to_lowercase())),
        other => Err(type_error(format!("String.toLower expects a String, found {}", other.type_name()), call_stack)),
    }
}

fn to_list(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match &args[0] {
        Value::String(s) => Ok(Value::list(s.chars().map(Value::Char).collect())),
        other => Err(type_error(format!("String.toList expects a String, found {}", other.type_name()), call_stack)),
    }
}

fn char_to_code(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match &args[0] {
        Value::Char(c) => Ok(Value::Int(u32::from(*c) as i64)),
        other => Err(type_error(format!("Char.toCode expects a Char, found {}", other.type_name()), call_stack)),
    }
}

fn char_from_code(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match &args[0] {
        Value::Int(code) => u32::try_from(*code)
            .ok()
            .and_then(char::from_u32)
            .map(Value::Char)
            .ok_or_else(|| type_error(format!("{code} is not a valid char code"), call_stack)),
        other => Err(type_error(format!("Char.fromCode expects an Int, found {}", other.type_name()), call_stack)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_interner() -> ml_ir::SharedInterner {
        ml_ir::SharedInterner::new()
    }

    fn noop_apply(_: &Value, _: Vec<Value>) -> EvalResult {
        unreachable!()
    }

    #[test]
    fn appends_strings() {
        let result = string_append(&[Value::string("foo"), Value::string("bar")], &[], &test_interner(), &noop_apply).unwrap();
        assert_eq!(result, Value::string("foobar"));
    }

    #[test]
    fn to_list_splits_into_chars() {
        let result = to_list(&[Value::string("ab")], &[], &test_interner(), &noop_apply).unwrap();
        assert_eq!(result, Value::list(vec![Value::Char('a'), Value::Char('b')]));
    }

    #[test]
    fn char_code_round_trips() {
        let code = char_to_code(&[Value::Char('A')], &[], &test_interner(), &noop_apply).unwrap();
        assert_eq!(code, Value::Int(65));
        let back = char_from_code(&[Value::Int(65)], &[], &test_interner(), &noop_apply).unwrap();
        assert_eq!(back, Value::Char('A'));
    }
}
