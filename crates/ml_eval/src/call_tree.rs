//! Optional call-tree tracing (spec §3, populated only when `trace`/
//! `traceModule` are used).
//!
//! No direct teacher tracing counterpart was found in the retrieval pack,
//! so the node shape follows spec.md directly; the `Display` renderer is a
//! supplement this spec requires only implicitly (`Value`/`Error` have a
//! textual form, but a caller of `trace` needs a way to show the tree too).

use std::fmt;

use ml_ir::{Name, SharedInterner};

use crate::errors::EvalError;
use crate::value::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallKind {
    Application,
    Call,
    EvalFunction,
    EvalKernelFunction,
}

impl CallKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Application => "application",
            CallKind::Call => "call",
            CallKind::EvalFunction => "evalFunction",
            CallKind::EvalKernelFunction => "evalKernelFunction",
        }
    }
}

#[derive(Clone, Debug)]
pub struct CallNode {
    pub kind: CallKind,
    pub qualified_name: (Option<Name>, Name),
    pub args: Vec<Value>,
    pub result: Result<Value, EvalError>,
    pub children: Vec<CallNode>,
}

impl CallNode {
    #[must_use]
    pub fn new(
        kind: CallKind,
        qualified_name: (Option<Name>, Name),
        args: Vec<Value>,
        result: Result<Value, EvalError>,
        children: Vec<CallNode>,
    ) -> Self {
        CallNode {
            kind,
            qualified_name,
            args,
            result,
            children,
        }
    }

    #[must_use]
    pub fn render(&self, interner: &SharedInterner) -> String {
        let mut out = String::new();
        write_node(&mut out, self, interner, 0);
        out
    }
}

fn write_node(out: &mut String, node: &CallNode, interner: &SharedInterner, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    let (module, name) = node.qualified_name;
    if let Some(m) = module {
        out.push_str(&interner.lookup(m));
        out.push('.');
    }
    out.push_str(&interner.lookup(name));
    out.push_str(" (");
    out.push_str(node.kind.as_str());
    out.push_str(") args=[");
    for (i, arg) in node.args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&arg.display(interner));
    }
    out.push_str("] -> ");
    match &node.result {
        Ok(v) => out.push_str(&v.display(interner)),
        Err(e) => out.push_str(&e.display(interner)),
    }
    out.push('\n');
    for child in &node.children {
        write_node(out, child, interner, depth + 1);
    }
}

impl fmt::Display for CallNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_leaf_node() {
        let interner = SharedInterner::new();
        let fib = interner.intern("fib");
        let node = CallNode::new(
            CallKind::Call,
            (None, fib),
            vec![Value::Int(1)],
            Ok(Value::Int(1)),
            vec![],
        );
        let rendered = node.render(&interner);
        assert!(rendered.contains("fib"));
        assert!(rendered.contains("(call)"));
    }
}
