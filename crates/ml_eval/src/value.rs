//! The runtime value universe — exactly the eleven cases of spec §3.
//!
//! Grounded on `ori_patterns`'s `Value` enum and its `Rc`-wrapped
//! persistent-collection (`Heap<T>`) pattern for cheap clones, narrowed
//! down from the teacher's richer enum (which has dedicated `Some`, `None`,
//! `Ok`, `Err`, `Struct`, `Range`, `Function`, `FunctionVal`,
//! `ModuleNamespace`, `Map` variants): here `Maybe`/`Result` and all
//! user-defined variants are represented uniformly as `Custom`.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use ml_ir::{ExprId, Name, Pattern, SharedArena, SharedInterner};

use crate::environment::Env;

/// A qualified constructor reference: `(module-name, name)`, where `module`
/// is `None` for a variant referenced unqualified in its defining module.
#[derive(Clone, Debug, PartialEq)]
pub struct Custom {
    pub module: Option<Name>,
    pub name: Name,
    pub args: Rc<Vec<Value>>,
}

/// Both closures and not-yet-saturated named function references.
#[derive(Clone, Debug)]
pub struct PartiallyApplied {
    pub captured_env: Env,
    pub accumulated_args: Rc<Vec<Value>>,
    pub params: Rc<[Pattern]>,
    pub qualified_name: Option<(Option<Name>, Name)>,
    pub arena: SharedArena,
    pub body: ExprId,
}

impl PartialEq for PartiallyApplied {
    fn eq(&self, other: &Self) -> bool {
        // Closures are compared by identity of their pending call, not by
        // deep-inspecting captured environments — this mirrors the
        // teacher's `FunctionValue` (compared by body/param identity) and
        // matches the surface language, which never exposes function
        // equality as an operation outside `==` returning `Unsupported`.
        self.body == other.body
            && self.qualified_name == other.qualified_name
            && self.accumulated_args == other.accumulated_args
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    String(Rc<str>),
    List(Rc<Vec<Value>>),
    Tuple(Rc<(Value, Value)>),
    Triple(Rc<(Value, Value, Value)>),
    /// Keyed by interned field name; `BTreeMap` gives deterministic
    /// iteration order for printing even though spec says insertion order
    /// is irrelevant.
    Record(Rc<BTreeMap<Name, Value>>),
    Custom(Custom),
    PartiallyApplied(PartiallyApplied),
}

impl Value {
    #[must_use]
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    #[must_use]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    #[must_use]
    pub fn tuple(a: Value, b: Value) -> Self {
        Value::Tuple(Rc::new((a, b)))
    }

    #[must_use]
    pub fn triple(a: Value, b: Value, c: Value) -> Self {
        Value::Triple(Rc::new((a, b, c)))
    }

    #[must_use]
    pub fn record(fields: BTreeMap<Name, Value>) -> Self {
        Value::Record(Rc::new(fields))
    }

    #[must_use]
    pub fn custom(module: Option<Name>, name: Name, args: Vec<Value>) -> Self {
        Value::Custom(Custom {
            module,
            name,
            args: Rc::new(args),
        })
    }

    /// A human-readable type tag, used in `TypeError` messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "Unit",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Char(_) => "Char",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::Triple(_) => "Triple",
            Value::Record(_) => "Record",
            Value::Custom(_) => "Custom",
            Value::PartiallyApplied(_) => "Function",
        }
    }

    /// Renders a value to text given an interner to resolve names, the way
    /// a REPL would. Not specified verbatim by spec.md (which only
    /// requires `Value` to be "pretty-printable"); format chosen to match
    /// the original system's own REPL rendering.
    #[must_use]
    pub fn display(&self, interner: &SharedInterner) -> String {
        let mut out = String::new();
        write_value(&mut out, self, interner);
        out
    }
}

fn write_value(out: &mut String, value: &Value, interner: &SharedInterner) {
    match value {
        Value::Unit => out.push_str("()"),
        Value::Bool(b) => out.push_str(if *b { "True" } else { "False" }),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(n) => out.push_str(&n.to_string()),
        Value::Char(c) => {
            out.push('\'');
            out.push(*c);
            out.push('\'');
        }
        Value::String(s) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, interner);
            }
            out.push(']');
        }
        Value::Tuple(pair) => {
            out.push('(');
            write_value(out, &pair.0, interner);
            out.push_str(", ");
            write_value(out, &pair.1, interner);
            out.push(')');
        }
        Value::Triple(triple) => {
            out.push('(');
            write_value(out, &triple.0, interner);
            out.push_str(", ");
            write_value(out, &triple.1, interner);
            out.push_str(", ");
            write_value(out, &triple.2, interner);
            out.push(')');
        }
        Value::Record(fields) => {
            out.push_str("{ ");
            for (i, (name, field_value)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&interner.lookup(*name));
                out.push_str(" = ");
                write_value(out, field_value, interner);
            }
            out.push_str(" }");
        }
        Value::Custom(custom) => {
            out.push_str(&interner.lookup(custom.name));
            for arg in custom.args.iter() {
                out.push(' ');
                write_value(out, arg, interner);
            }
        }
        Value::PartiallyApplied(_) => out.push_str("<function>"),
    }
}

impl fmt::Display for Value {
    /// Falls back to raw `Name` indices since `Display` has no interner to
    /// consult; callers that need readable output should use
    /// [`Value::display`] instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_list_of_ints() {
        let interner = SharedInterner::new();
        let v = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(v.display(&interner), "[1, 2, 3]");
    }

    #[test]
    fn displays_applied_constructor() {
        let interner = SharedInterner::new();
        let foo = interner.intern("Foo");
        let v = Value::custom(None, foo, vec![Value::Int(0), Value::Int(1), Value::Int(2)]);
        assert_eq!(v.display(&interner), "Foo 0 1 2");
    }

    #[test]
    fn displays_nullary_constructor_without_trailing_space() {
        let interner = SharedInterner::new();
        let nothing = interner.intern("Nothing");
        let v = Value::custom(None, nothing, vec![]);
        assert_eq!(v.display(&interner), "Nothing");
    }

    #[test]
    fn displays_record_sorted_by_field_name() {
        let interner = SharedInterner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let mut fields = BTreeMap::new();
        fields.insert(b, Value::Int(2));
        fields.insert(a, Value::Int(1));
        let v = Value::record(fields);
        assert_eq!(v.display(&interner), "{ a = 1, b = 2 }");
    }
}
