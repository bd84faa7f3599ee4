//! Top-level driver (spec §4.9/§6): the four public entry points that
//! turn source text into a value, with or without call-tree tracing.
//!
//! Grounded on `ori_eval/src/lib.rs`'s `eval_source`/`eval_module`-style
//! pair of entry points (a bare-expression convenience wrapper that
//! delegates to the module-oriented one), adapted to this evaluator's
//! four-way split (module vs. bare expression, plain vs. traced).
//!
//! Every entry point takes the caller's `SharedInterner` rather than
//! building its own: a `QualifiedName` entry (and any `Value`/`Error`/
//! `CallNode` in the result) is only meaningful relative to the interner
//! that produced its `Name`s, so the driver can't construct one itself
//! and hand back symbols the caller has no way to read. This is a
//! deliberate adaptation of spec §6's bare `eval(source) -> Result<...>`
//! signature — recorded in DESIGN.md.

use rustc_hash::FxHashMap;

use ml_ir::{LetDeclKind, Module, QualifiedName, SharedInterner};

use crate::call_tree::CallNode;
use crate::config::EvalConfig;
use crate::environment::{Env, FunctionImpl};
use crate::errors::Error;
use crate::exec::name_resolution::resolve;
use crate::exec::EvalCtx;
use crate::kernel::KernelRegistry;
use crate::value::Value;

const SYNTHETIC_MODULE: &str = "Main";
const SYNTHETIC_ENTRY: &str = "main";

/// Parses `source` as a bare expression, wraps it as `main` in a
/// synthetic `Main` module, and evaluates it.
pub fn eval(source: &str, interner: &SharedInterner) -> Result<Value, Error> {
    eval_module(&wrap_bare_expression(source), main_entry(interner), interner)
}

/// Parses `source` as a module and evaluates the top-level declaration
/// named by `entry`.
pub fn eval_module(source: &str, entry: QualifiedName, interner: &SharedInterner) -> Result<Value, Error> {
    run(source, entry, interner, EvalConfig::default()).0
}

/// Like [`eval`], but with call-tree tracing enabled.
pub fn trace(source: &str, interner: &SharedInterner) -> (Result<Value, Error>, Vec<CallNode>) {
    trace_module(&wrap_bare_expression(source), main_entry(interner), interner)
}

/// Like [`eval_module`], but with call-tree tracing enabled.
pub fn trace_module(source: &str, entry: QualifiedName, interner: &SharedInterner) -> (Result<Value, Error>, Vec<CallNode>) {
    run(source, entry, interner, EvalConfig::default().with_trace(true))
}

fn wrap_bare_expression(source: &str) -> String {
    format!("module {SYNTHETIC_MODULE} exposing ({SYNTHETIC_ENTRY})\n\n{SYNTHETIC_ENTRY} =\n   {source}\n")
}

fn main_entry(interner: &SharedInterner) -> QualifiedName {
    QualifiedName {
        module: None,
        name: interner.intern(SYNTHETIC_ENTRY),
    }
}

fn run(source: &str, entry: QualifiedName, interner: &SharedInterner, config: EvalConfig) -> (Result<Value, Error>, Vec<CallNode>) {
    let module = match ml_parse::parse_module(source, interner) {
        Ok(module) => module,
        Err(err) => return (Err(Error::ParsingError(err.to_string())), Vec::new()),
    };
    let registry = KernelRegistry::build(interner);
    let ctx = EvalCtx {
        registry: &registry,
        interner,
        arena: &module.arena,
        config: &config,
    };
    let env = load_module(&module, config.trace);
    let result = resolve(&env, entry, &ctx).map_err(Error::from);
    let roots = env.trace().take_roots();
    (result, roots)
}

/// Builds the module-level environment: every top-level declaration is
/// a `Function` (spec's parser makes a bare `name = expr` a zero-param
/// `Function` rather than a `Destructuring`, precisely so mutually
/// recursive top-level bindings resolve each other — see
/// `ml_parse::parse_let_decl`), so loading a module is one
/// `extend_functions` call.
fn load_module(module: &Module, trace: bool) -> Env {
    let mut impls = FxHashMap::default();
    for decl in &module.declarations {
        if let LetDeclKind::Function { name, params, body } = &decl.kind {
            impls.insert(*name, FunctionImpl::new(params.clone(), *body));
        }
    }
    let env = Env::new(module.name).extend_functions(impls);
    if trace {
        env.with_tracing()
    } else {
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_evaluates_a_bare_arithmetic_expression() {
        let interner = SharedInterner::new();
        let result = eval("1 + 2", &interner).unwrap();
        assert_eq!(result, Value::Int(3));
    }

    #[test]
    fn eval_module_resolves_mutually_recursive_entries() {
        let interner = SharedInterner::new();
        let source = "module Main exposing (main)\n\n\
                       fib1 n =\n   if n == 0 then 0 else fib2 (n - 1) + 1\n\n\
                       fib2 n =\n   if n == 0 then 0 else fib1 (n - 1) + 1\n\n\
                       main =\n   fib1 7\n";
        let entry = QualifiedName { module: None, name: interner.intern("main") };
        let result = eval_module(source, entry, &interner).unwrap();
        assert_eq!(result, Value::Int(7));
    }

    #[test]
    fn eval_reports_parse_errors_without_panicking() {
        let interner = SharedInterner::new();
        let err = eval("1 +", &interner).unwrap_err();
        assert!(matches!(err, Error::ParsingError(_)));
    }

    #[test]
    fn trace_records_one_call_node_per_application() {
        let interner = SharedInterner::new();
        let source = "module Main exposing (main)\n\n\
                       addOne x =\n   x + 1\n\n\
                       main =\n   addOne 41\n";
        let entry = QualifiedName { module: None, name: interner.intern("main") };
        let (result, roots) = trace_module(source, entry, &interner);
        assert_eq!(result.unwrap(), Value::Int(42));
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children.len(), 0);
    }

    #[test]
    fn tail_calling_wrapper_nests_its_callee_in_the_call_tree() {
        let interner = SharedInterner::new();
        let source = "module Main exposing (main)\n\n\
                       inner x =\n   x + 1\n\n\
                       outer x =\n   inner x\n\n\
                       main =\n   outer 41\n";
        let entry = QualifiedName { module: None, name: interner.intern("main") };
        let (result, roots) = trace_module(source, entry, &interner);
        assert_eq!(result.unwrap(), Value::Int(42));
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].result, Ok(Value::Int(42)));
    }

    #[test]
    fn untraced_eval_never_builds_a_call_tree() {
        let interner = SharedInterner::new();
        let (result, roots) = trace("2 + 2", &interner);
        assert_eq!(result.unwrap(), Value::Int(4));
        let _ = roots;

        let plain = eval("2 + 2", &interner).unwrap();
        assert_eq!(plain, Value::Int(4));
    }
}
