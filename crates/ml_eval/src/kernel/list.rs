//! `List` kernels (spec §4.8's non-exhaustive list: constructors,
//! destructors, and the higher-order traversals). `head`/`tail` return
//! `Maybe` the same way the surface standard library does — built from
//! the generic `Custom` representation (spec §3), not a dedicated
//! variant.
//!
//! `map`/`foldl`/`foldr`/`filter` drive the supplied `apply` callback in
//! a plain Rust loop, one call per element — host stack usage stays
//! O(1) per element regardless of list length, since each `apply` call
//! runs to completion (via its own trampoline) before the next begins.

use ml_ir::Name;

use super::{ApplyFn, KernelFn, KernelRegistry};
use crate::errors::{type_error, EvalResult};
use crate::value::Value;

pub(super) fn register(registry: &mut KernelRegistry, interner: &ml_ir::SharedInterner) {
    registry.insert(interner, "List", "cons", 2, cons as KernelFn);
    registry.insert(interner, "List", "isEmpty", 1, is_empty as KernelFn);
    registry.insert(interner, "List", "length", 1, length as KernelFn);
    registry.insert(interner, "List", "head", 1, head as KernelFn);
    registry.insert(interner, "List", "tail", 1, tail as KernelFn);
    registry.insert(interner, "List", "reverse", 1, reverse as KernelFn);
    registry.insert(interner, "Basics", "append", 2, append as KernelFn);
    registry.insert(interner, "List", "map", 2, map as KernelFn);
    registry.insert(interner, "List", "filter", 2, filter as KernelFn);
    registry.insert(interner, "List", "foldl", 3, foldl as KernelFn);
    registry.insert(interner, "List", "foldr", 3, foldr as KernelFn);
}

fn as_list<'a>(value: &'a Value, who: &str, call_stack: &[(Name, Name)]) -> Result<&'a [Value], crate::errors::EvalError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(type_error(format!("{who} expects a List, found {}", other.type_name()), call_stack)),
    }
}

fn cons(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    let tail = as_list(&args[1], "::", call_stack)?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(tail);
    Ok(Value::list(items))
}

fn is_empty(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    Ok(Value::Bool(as_list(&args[0], "List.isEmpty", call_stack)?.is_empty()))
}

fn length(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    Ok(Value::Int(as_list(&args[0], "List.length", call_stack)?.len() as i64))
}

fn maybe(interner: &ml_ir::SharedInterner, value: Option<Value>) -> Value {
    match value {
        Some(v) => Value::custom(None, interner.intern("Just"), vec![v]),
        None => Value::custom(None, interner.intern("Nothing"), vec![]),
    }
}

fn head(args: &[Value], call_stack: &[(Name, Name)], interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    let items = as_list(&args[0], "List.head", call_stack)?;
    Ok(maybe(interner, items.first().cloned()))
}

fn tail(args: &[Value], call_stack: &[(Name, Name)], interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    let items = as_list(&args[0], "List.tail", call_stack)?;
    if items.is_empty() {
        Ok(maybe(interner, None))
    } else {
        Ok(maybe(interner, Some(Value::list(items[1..].to_vec()))))
    }
}

fn reverse(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    let mut items = as_list(&args[0], "List.reverse", call_stack)?.to_vec();
    items.reverse();
    Ok(Value::list(items))
}

fn append(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, _apply: &ApplyFn<'_>) -> EvalResult {
    match (&args[0], &args[1]) {
        (Value::List(a), Value::List(b)) => {
            let mut items = Vec::with_capacity(a.len() + b.len());
            items.extend_from_slice(a);
            items.extend_from_slice(b);
            Ok(Value::list(items))
        }
        (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}"))),
        (a, b) => Err(type_error(
            format!("++ expects two Lists or two Strings, found {} and {}", a.type_name(), b.type_name()),
            call_stack,
        )),
    }
}

fn map(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, apply: &ApplyFn<'_>) -> EvalResult {
    let func = &args[0];
    let items = as_list(&args[1], "List.map", call_stack)?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(apply(func, vec![item.clone()])?);
    }
    Ok(Value::list(out))
}

fn filter(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, apply: &ApplyFn<'_>) -> EvalResult {
    let func = &args[0];
    let items = as_list(&args[1], "List.filter", call_stack)?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match apply(func, vec![item.clone()])? {
            Value::Bool(true) => out.push(item.clone()),
            Value::Bool(false) => {}
            other => {
                return Err(type_error(
                    format!("List.filter predicate must return Bool, found {}", other.type_name()),
                    call_stack,
                ))
            }
        }
    }
    Ok(Value::list(out))
}

fn foldl(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, apply: &ApplyFn<'_>) -> EvalResult {
    let func = &args[0];
    let mut acc = args[1].clone();
    let items = as_list(&args[2], "List.foldl", call_stack)?;
    for item in items {
        acc = apply(func, vec![item.clone(), acc])?;
    }
    Ok(acc)
}

fn foldr(args: &[Value], call_stack: &[(Name, Name)], _interner: &ml_ir::SharedInterner, apply: &ApplyFn<'_>) -> EvalResult {
    let func = &args[0];
    let mut acc = args[1].clone();
    let items = as_list(&args[2], "List.foldr", call_stack)?;
    for item in items.iter().rev() {
        acc = apply(func, vec![item.clone(), acc])?;
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_interner() -> ml_ir::SharedInterner {
        ml_ir::SharedInterner::new()
    }

    fn noop_apply(_: &Value, _: Vec<Value>) -> EvalResult {
        unreachable!("this test never exercises a higher-order kernel")
    }

    #[test]
    fn cons_prepends() {
        let result = cons(
            &[Value::Int(1), Value::list(vec![Value::Int(2)])],
            &[],
            &test_interner(),
            &noop_apply,
        )
        .unwrap();
        assert_eq!(result, Value::list(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn head_of_empty_list_is_nothing() {
        let interner = test_interner();
        let result = head(&[Value::list(vec![])], &[], &interner, &noop_apply).unwrap();
        assert_eq!(result, Value::custom(None, interner.intern("Nothing"), vec![]));
    }

    #[test]
    fn head_of_nonempty_list_is_just() {
        let interner = test_interner();
        let result = head(&[Value::list(vec![Value::Int(5)])], &[], &interner, &noop_apply).unwrap();
        assert_eq!(result, Value::custom(None, interner.intern("Just"), vec![Value::Int(5)]));
    }

    #[test]
    fn map_applies_function_to_every_element() {
        let interner = test_interner();
        let doubled = |_: &Value, args: Vec<Value>| -> EvalResult {
            match &args[0] {
                Value::Int(n) => Ok(Value::Int(n * 2)),
                _ => unreachable!(),
            }
        };
        let result = map(
            &[Value::Unit, Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)])],
            &[],
            &interner,
            &doubled,
        )
        .unwrap();
        assert_eq!(result, Value::list(vec![Value::Int(2), Value::Int(4), Value::Int(6)]));
    }

    #[test]
    fn foldl_accumulates_left_to_right() {
        let interner = test_interner();
        let sub = |_: &Value, args: Vec<Value>| -> EvalResult {
            match (&args[0], &args[1]) {
                (Value::Int(x), Value::Int(acc)) => Ok(Value::Int(acc - x)),
                _ => unreachable!(),
            }
        };
        // foldl (-) 0 [1, 2, 3] == ((0 - 1) - 2) - 3 == -6
        let result = foldl(
            &[Value::Unit, Value::Int(0), Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)])],
            &[],
            &interner,
            &sub,
        )
        .unwrap();
        assert_eq!(result, Value::Int(-6));
    }

    #[test]
    fn filter_keeps_only_matching_elements() {
        let interner = test_interner();
        let is_even = |_: &Value, args: Vec<Value>| -> EvalResult {
            match &args[0] {
                Value::Int(n) => Ok(Value::Bool(n % 2 == 0)),
                _ => unreachable!(),
            }
        };
        let result = filter(
            &[Value::Unit, Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)])],
            &[],
            &interner,
            &is_even,
        )
        .unwrap();
        assert_eq!(result, Value::list(vec![Value::Int(2), Value::Int(4)]));
    }
}
