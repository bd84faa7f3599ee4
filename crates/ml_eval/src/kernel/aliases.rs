//! Open question 3's resolution: a small, externalized table of bare
//! module qualifiers that rewrite to a two-segment `Elm.Kernel.*` path
//! before ordinary name resolution runs (spec §4.3's "special-case
//! alias" step). Kept as data rather than inlined into the resolver so
//! the set can grow without touching control flow.

pub const ALIASES: &[(&str, &str)] = &[("JsArray", "Elm.Kernel.JsArray")];

#[must_use]
pub fn resolve(interner: &ml_ir::SharedInterner, qualifier: ml_ir::Name) -> Option<ml_ir::Name> {
    let text = interner.lookup(qualifier);
    ALIASES
        .iter()
        .find(|(source, _)| *source == &*text)
        .map(|(_, target)| interner.intern(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_array_rewrites_to_elm_kernel_path() {
        let interner = ml_ir::SharedInterner::new();
        let q = interner.intern("JsArray");
        let rewritten = resolve(&interner, q).unwrap();
        assert_eq!(&*interner.lookup(rewritten), "Elm.Kernel.JsArray");
    }

    #[test]
    fn unrelated_qualifier_is_untouched() {
        let interner = ml_ir::SharedInterner::new();
        let q = interner.intern("List");
        assert_eq!(resolve(&interner, q), None);
    }
}
