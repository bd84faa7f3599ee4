//! Evaluator configuration.
//!
//! Grounded on `ori_eval`'s `EvalConfig`-style knob bundle passed down
//! through the interpreter rather than read from globals; narrowed to
//! the handful of knobs this evaluator actually needs (recursion-depth
//! diagnostics and whether call-tree tracing is active).

#[derive(Clone, Debug)]
pub struct EvalConfig {
    /// Upper bound on *non-tail* nesting depth before the stack-safety
    /// wrapper (`stack.rs`) grows the host stack; independent of how
    /// deep a tail-recursive loop may run.
    pub max_recursion_depth: usize,
    /// When set, every application/call is recorded into a `CallNode`
    /// tree (spec §6's `trace`/`traceModule`). Disabled by default since
    /// it roughly doubles allocation pressure per call.
    pub trace: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_recursion_depth: 10_000,
            trace: false,
        }
    }
}

impl EvalConfig {
    #[must_use]
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
