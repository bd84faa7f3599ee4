//! The pattern matcher (spec §4.1).
//!
//! Grounded on `ori_eval/src/exec/control.rs`'s `try_match`/`bind_pattern`
//! shape (`Result<Option<Bindings>, EvalError>`, top-to-bottom arm trial),
//! adapted to this spec's generic `Custom(module, name, args)` constructor
//! representation (name-only match, module qualifier ignored) instead of
//! the teacher's dedicated `Some`/`None`/`Ok`/`Err` special-casing, and to
//! list-pattern length mismatch being `Ok(None)` rather than `Err` (open
//! question 2: `Just []` / `Just [x]` arms must fall through cleanly).

use rustc_hash::FxHashMap;

use ml_ir::{Literal, Name, Pattern, PatternKind};

use crate::errors::{type_error, EvalError};
use crate::value::Value;

pub type Bindings = FxHashMap<Name, Value>;

/// `match(pattern, value) -> Result<Option<BindingIncrement>, EvalError>`.
///
/// The environment is not threaded through: matching is purely structural
/// (spec §4.1's constructor-match shortcut explicitly ignores the module
/// qualifier, and no other pattern form consults the environment), so the
/// `env` parameter spec.md's signature lists is dropped here.
pub fn try_match(
    pattern: &Pattern,
    value: &Value,
    call_stack: &[(Name, Name)],
) -> Result<Option<Bindings>, EvalError> {
    match &pattern.kind {
        PatternKind::Wildcard => Ok(Some(Bindings::default())),
        PatternKind::Var(name) => {
            let mut bindings = Bindings::default();
            bindings.insert(*name, value.clone());
            Ok(Some(bindings))
        }
        PatternKind::As(inner, name) => match try_match(inner, value, call_stack)? {
            Some(mut bindings) => {
                bindings.insert(*name, value.clone());
                Ok(Some(bindings))
            }
            None => Ok(None),
        },
        PatternKind::Literal(lit) => Ok(literal_matches(lit, value).then(Bindings::default)),
        PatternKind::Tuple(patterns) => match (patterns.len(), value) {
            (2, Value::Tuple(pair)) => match_all(&[&patterns[0], &patterns[1]], &[&pair.0, &pair.1], call_stack),
            (3, Value::Triple(triple)) => match_all(
                &[&patterns[0], &patterns[1], &patterns[2]],
                &[&triple.0, &triple.1, &triple.2],
                call_stack,
            ),
            _ => Ok(None),
        },
        PatternKind::List(patterns) => match value {
            Value::List(items) if items.len() == patterns.len() => {
                let pats: Vec<&Pattern> = patterns.iter().collect();
                let vals: Vec<&Value> = items.iter().collect();
                match_all(&pats, &vals, call_stack)
            }
            Value::List(_) => Ok(None),
            _ => Ok(None),
        },
        PatternKind::Cons(head_pat, tail_pat) => match value {
            Value::List(items) if !items.is_empty() => {
                let head_bindings = try_match(head_pat, &items[0], call_stack)?;
                let Some(mut head_bindings) = head_bindings else {
                    return Ok(None);
                };
                let tail = Value::list(items[1..].to_vec());
                let tail_bindings = try_match(tail_pat, &tail, call_stack)?;
                let Some(tail_bindings) = tail_bindings else {
                    return Ok(None);
                };
                // Right-to-left union, head wins ties (spec §4.1) — the
                // surface language never actually produces such a
                // collision since a pattern cannot bind the same name
                // twice, but the precedence is spelled out anyway.
                head_bindings.extend(tail_bindings);
                Ok(Some(head_bindings))
            }
            Value::List(_) => Ok(None),
            _ => Ok(None),
        },
        PatternKind::Ctor { name, args, .. } => match value {
            Value::Custom(custom) if custom.name == *name => {
                if custom.args.len() != args.len() {
                    return Err(type_error(
                        format!(
                            "constructor arity mismatch: expected {} argument(s), found {}",
                            args.len(),
                            custom.args.len()
                        ),
                        call_stack,
                    ));
                }
                let pats: Vec<&Pattern> = args.iter().collect();
                let vals: Vec<&Value> = custom.args.iter().collect();
                match_all(&pats, &vals, call_stack)
            }
            Value::Custom(_) => Ok(None),
            _ => Ok(None),
        },
        PatternKind::Record(fields) => match value {
            Value::Record(map) => {
                let mut bindings = Bindings::default();
                for field in fields {
                    match map.get(field) {
                        Some(v) => {
                            bindings.insert(*field, v.clone());
                        }
                        None => {
                            return Err(type_error(
                                "record pattern field absent from value",
                                call_stack,
                            ));
                        }
                    }
                }
                Ok(Some(bindings))
            }
            _ => Ok(None),
        },
    }
}

fn literal_matches(lit: &Literal, value: &Value) -> bool {
    match (lit, value) {
        (Literal::Unit, Value::Unit) => true,
        (Literal::Int(a), Value::Int(b)) => a == b,
        (Literal::Float(a), Value::Float(b)) => a == b,
        (Literal::Char(a), Value::Char(b)) => a == b,
        (Literal::String(a), Value::String(b)) => a.as_str() == b.as_ref(),
        _ => false,
    }
}

fn match_all(
    patterns: &[&Pattern],
    values: &[&Value],
    call_stack: &[(Name, Name)],
) -> Result<Option<Bindings>, EvalError> {
    let mut bindings = Bindings::default();
    for (pattern, value) in patterns.iter().zip(values.iter()) {
        match try_match(pattern, value, call_stack)? {
            Some(sub) => bindings.extend(sub),
            None => return Ok(None),
        }
    }
    Ok(Some(bindings))
}
