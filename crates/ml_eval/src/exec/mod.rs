//! Expression dispatch, split across `name_resolution` (spec §4.3) and
//! `call` (spec §4.6's saturation/application rules), tied together by
//! the trampoline loop in `crate::trampoline`.

pub mod call;
pub mod name_resolution;

use ml_ir::{SharedArena, SharedInterner};

use crate::config::EvalConfig;
use crate::kernel::KernelRegistry;

/// Everything the evaluator needs that doesn't change across a single
/// `eval`/`evalModule` call: grounded on the "config bundle threaded
/// through every dispatch call" shape in `ori_eval/src/interpreter/mod.rs`.
pub struct EvalCtx<'a> {
    pub registry: &'a KernelRegistry,
    pub interner: &'a SharedInterner,
    pub arena: &'a SharedArena,
    pub config: &'a EvalConfig,
}
