//! The evaluator's binding environment.
//!
//! Grounded on `ori_eval/src/environment.rs`'s `Scope`/`LocalScope`
//! parent-chain lookup (`Scope::lookup` walks `self.bindings` then
//! `self.parent`), but reshaped into the structure spec §3 requires: a
//! single `current-module`, a `values` map, a module-qualified `functions`
//! table kept separate from `values` so mutually recursive functions can
//! resolve each other by name, and a `call-stack` for diagnostics. No
//! `Mutability`/`AssignError` — this language has no assignment, so every
//! binding is permanent once the scope holding it exists.
//!
//! `Env::extend`/`Env::define_function` never mutate an existing `Env`;
//! they return a new one sharing the old one's frames by `Rc`, matching
//! spec's "persistent map semantics... sharing by structural reference."

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use ml_ir::{ExprId, Name, Pattern};

use crate::call_tree::{CallKind, CallNode};
use crate::errors::EvalError;
use crate::value::Value;

/// `(parameter-patterns, body-ast)` — spec §3's `FunctionImpl`.
#[derive(Clone, Debug)]
pub struct FunctionImpl {
    pub params: Rc<[Pattern]>,
    pub body: ExprId,
}

impl FunctionImpl {
    #[must_use]
    pub fn new(params: Vec<Pattern>, body: ExprId) -> Self {
        FunctionImpl {
            params: params.into(),
            body,
        }
    }

    #[must_use]
    pub fn is_caf(&self) -> bool {
        self.params.is_empty()
    }
}

/// Collects `CallNode`s while `trace`/`traceModule` are running (spec's
/// "Call Tree" section). Inactive by default (`eval`/`evalModule` never
/// pay for it); `Env::with_tracing` turns it on for a single top-level
/// run. Shared by `Rc<RefCell<_>>` since every cloned `Env` along a call
/// chain must record into the same tree.
///
/// Recording a call genuinely nests only across a non-tail Rust
/// recursion (`enter`/`exit` bracket one `exec::call::apply_value_traced`
/// call): see that function for why tracing necessarily gives up the
/// trampoline's O(1)-stack tail-call flattening in exchange for a
/// faithful, fully-nested tree.
#[derive(Clone, Default)]
pub struct Tracer(Option<Rc<RefCell<Vec<Vec<CallNode>>>>>);

impl Tracer {
    #[must_use]
    pub fn enabled() -> Self {
        Tracer(Some(Rc::new(RefCell::new(vec![Vec::new()]))))
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }

    pub fn enter(&self) {
        if let Some(stack) = &self.0 {
            stack.borrow_mut().push(Vec::new());
        }
    }

    /// Pops the innermost frame, finalizes it as a `CallNode`, and
    /// records it as a child of the next frame out (or as a new root if
    /// the stack is back down to one frame).
    pub fn exit(&self, kind: CallKind, qualified_name: (Option<Name>, Name), args: Vec<Value>, result: Result<Value, EvalError>) {
        if let Some(stack) = &self.0 {
            let mut stack = stack.borrow_mut();
            let children = stack.pop().unwrap_or_default();
            let node = CallNode::new(kind, qualified_name, args, result, children);
            match stack.last_mut() {
                Some(parent) => parent.push(node),
                None => stack.push(vec![node]),
            }
        }
    }

    /// Drains the accumulated top-level call trees. Called once by the
    /// driver after a `trace`/`traceModule` run completes.
    #[must_use]
    pub fn take_roots(&self) -> Vec<CallNode> {
        match &self.0 {
            Some(stack) => stack.borrow_mut().pop().unwrap_or_default(),
            None => Vec::new(),
        }
    }
}

struct ValueScope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<Rc<ValueScope>>,
}

struct FuncScope {
    bindings: FxHashMap<Name, FunctionImpl>,
    parent: Option<Rc<FuncScope>>,
}

/// The evaluator's environment. Cheap to clone: every field is `Rc`-backed
/// or a scalar.
#[derive(Clone)]
pub struct Env {
    pub current_module: Name,
    values: Option<Rc<ValueScope>>,
    /// Function table for `current_module` only — this evaluator loads a
    /// single entry module plus the kernel-backed stdlib (the "module
    /// loader" assembling multi-module imports is out of scope, per
    /// spec §1's external-collaborators list), so qualified lookups into
    /// any other module fall straight through to the kernel registry or
    /// `NameError`.
    functions: Option<Rc<FuncScope>>,
    call_stack: Rc<Vec<(Name, Name)>>,
    trace: Tracer,
}

impl Env {
    #[must_use]
    pub fn new(current_module: Name) -> Self {
        Env {
            current_module,
            values: None,
            functions: None,
            call_stack: Rc::new(Vec::new()),
            trace: Tracer::default(),
        }
    }

    /// Returns a clone of `self` with an active tracer — used by the
    /// `trace`/`traceModule` entry points only. `eval`/`evalModule` never
    /// call this, so their `Env`s carry an inactive (no-op) `Tracer`.
    #[must_use]
    pub fn with_tracing(&self) -> Env {
        let mut env = self.clone();
        env.trace = Tracer::enabled();
        env
    }

    #[must_use]
    pub fn trace(&self) -> &Tracer {
        &self.trace
    }

    #[must_use]
    pub fn call_stack(&self) -> &[(Name, Name)] {
        &self.call_stack
    }

    /// Returns a new `Env` with `bindings` layered on top of the current
    /// value scope (shadowing permitted).
    #[must_use]
    pub fn extend(&self, bindings: FxHashMap<Name, Value>) -> Env {
        let mut env = self.clone();
        env.values = Some(Rc::new(ValueScope {
            bindings,
            parent: self.values.clone(),
        }));
        env
    }

    #[must_use]
    pub fn lookup_value(&self, name: Name) -> Option<Value> {
        let mut scope = self.values.as_ref();
        while let Some(s) = scope {
            if let Some(v) = s.bindings.get(&name) {
                return Some(v.clone());
            }
            scope = s.parent.as_ref();
        }
        None
    }

    /// Returns a new `Env` with `impls` layered into the current module's
    /// function table (spec §4.4: "add a `FunctionImpl` entry to the
    /// current-module function table in the current env").
    #[must_use]
    pub fn extend_functions(&self, impls: FxHashMap<Name, FunctionImpl>) -> Env {
        let mut env = self.clone();
        env.functions = Some(Rc::new(FuncScope {
            bindings: impls,
            parent: self.functions.clone(),
        }));
        env
    }

    #[must_use]
    pub fn lookup_function(&self, module: Option<Name>, name: Name) -> Option<FunctionImpl> {
        if let Some(m) = module {
            if m != self.current_module {
                return None;
            }
        }
        let mut scope = self.functions.as_ref();
        while let Some(s) = scope {
            if let Some(f) = s.bindings.get(&name) {
                return Some(f.clone());
            }
            scope = s.parent.as_ref();
        }
        None
    }

    /// Replaces the top call-stack frame with `frame` — used for a
    /// tail-position call, which reuses rather than grows the logical
    /// stack (the same mechanism that gives TCO its O(1)-per-step cost:
    /// the frame list never grows with recursion depth, only with
    /// non-tail AST nesting).
    #[must_use]
    pub fn with_tail_frame(&self, frame: (Name, Name)) -> Env {
        let mut frames = (*self.call_stack).clone();
        if frames.is_empty() {
            frames.push(frame);
        } else {
            *frames.last_mut().expect("checked non-empty") = frame;
        }
        let mut env = self.clone();
        env.call_stack = Rc::new(frames);
        env
    }

    /// Pushes a new call-stack frame — used when entering a genuinely
    /// nested (non-tail) call whose continuation still has work to do
    /// after it returns.
    #[must_use]
    pub fn with_pushed_frame(&self, frame: (Name, Name)) -> Env {
        let mut frames = (*self.call_stack).clone();
        frames.push(frame);
        let mut env = self.clone();
        env.call_stack = Rc::new(frames);
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ml_ir::SharedInterner;

    fn name(interner: &SharedInterner, s: &str) -> Name {
        interner.intern(s)
    }

    #[test]
    fn lookup_finds_value_in_innermost_scope() {
        let interner = SharedInterner::new();
        let main = name(&interner, "Main");
        let x = name(&interner, "x");
        let env = Env::new(main);
        let mut bindings = FxHashMap::default();
        bindings.insert(x, Value::Int(1));
        let env = env.extend(bindings);
        assert_eq!(env.lookup_value(x), Some(Value::Int(1)));
    }

    #[test]
    fn shadowing_prefers_inner_binding() {
        let interner = SharedInterner::new();
        let main = name(&interner, "Main");
        let x = name(&interner, "x");
        let env = Env::new(main);
        let mut outer = FxHashMap::default();
        outer.insert(x, Value::Int(1));
        let env = env.extend(outer);
        let mut inner = FxHashMap::default();
        inner.insert(x, Value::Int(2));
        let env = env.extend(inner);
        assert_eq!(env.lookup_value(x), Some(Value::Int(2)));
    }

    #[test]
    fn extend_does_not_mutate_the_original() {
        let interner = SharedInterner::new();
        let main = name(&interner, "Main");
        let x = name(&interner, "x");
        let base = Env::new(main);
        let mut bindings = FxHashMap::default();
        bindings.insert(x, Value::Int(1));
        let _extended = base.extend(bindings);
        assert_eq!(base.lookup_value(x), None);
    }

    #[test]
    fn function_lookup_walks_the_module_function_chain() {
        let interner = SharedInterner::new();
        let main = name(&interner, "Main");
        let f = name(&interner, "f");
        let env = Env::new(main);
        let mut impls = FxHashMap::default();
        impls.insert(f, FunctionImpl::new(vec![], ExprId::new(0)));
        let env = env.extend_functions(impls);
        assert!(env.lookup_function(None, f).is_some());
        assert!(env.lookup_function(Some(main), f).is_some());
    }

    #[test]
    fn qualified_lookup_to_a_different_module_fails() {
        let interner = SharedInterner::new();
        let main = name(&interner, "Main");
        let other = name(&interner, "Other");
        let f = name(&interner, "f");
        let env = Env::new(main);
        let mut impls = FxHashMap::default();
        impls.insert(f, FunctionImpl::new(vec![], ExprId::new(0)));
        let env = env.extend_functions(impls);
        assert_eq!(env.lookup_function(Some(other), f), None);
    }

    #[test]
    fn tail_frame_replaces_rather_than_grows() {
        let interner = SharedInterner::new();
        let main = name(&interner, "Main");
        let f = name(&interner, "f");
        let g = name(&interner, "g");
        let env = Env::new(main).with_tail_frame((main, f));
        let env = env.with_tail_frame((main, g));
        assert_eq!(env.call_stack().len(), 1);
        assert_eq!(env.call_stack()[0], (main, g));
    }

    #[test]
    fn pushed_frame_grows_the_stack() {
        let interner = SharedInterner::new();
        let main = name(&interner, "Main");
        let f = name(&interner, "f");
        let g = name(&interner, "g");
        let env = Env::new(main)
            .with_pushed_frame((main, f))
            .with_pushed_frame((main, g));
        assert_eq!(env.call_stack().len(), 2);
    }
}
