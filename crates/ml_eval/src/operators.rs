//! The fixed operator-symbol table (spec §4.7).
//!
//! `&&`/`||` are excluded here — they're short-circuit forms handled
//! directly as `ExprKind::And`/`Or`, never routed through application.
//! Every other infix symbol resolves to a `(module, kernel-name)` pair in
//! the same registry that `Elm.Kernel.*`-qualified references use (spec
//! §4.3.2's `Elm.Kernel.` qualifier is stripped before the registry
//! lookup, so both paths share one `(module, name)` key space).

use ml_ir::{Name, SharedInterner};

const TABLE: &[(&str, &str, &str)] = &[
    ("+", "Basics", "add"),
    ("-", "Basics", "sub"),
    ("*", "Basics", "mul"),
    ("/", "Basics", "div"),
    ("==", "Basics", "eq"),
    ("/=", "Basics", "neq"),
    ("<", "Basics", "lt"),
    (">", "Basics", "gt"),
    ("<=", "Basics", "le"),
    (">=", "Basics", "ge"),
    ("::", "List", "cons"),
    ("++", "Basics", "append"),
];

/// Looks up the kernel `(module, name)` an operator symbol resolves to.
#[must_use]
pub fn lookup_operator(interner: &SharedInterner, symbol: Name) -> Option<(Name, Name)> {
    let text = interner.lookup(symbol);
    TABLE
        .iter()
        .find(|(sym, _, _)| *sym == &*text)
        .map(|(_, module, name)| (interner.intern(module), interner.intern(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_plus_to_basics_add() {
        let interner = SharedInterner::new();
        let plus = interner.intern("+");
        let (module, name) = lookup_operator(&interner, plus).unwrap();
        assert_eq!(&*interner.lookup(module), "Basics");
        assert_eq!(&*interner.lookup(name), "add");
    }

    #[test]
    fn resolves_cons_to_list_cons() {
        let interner = SharedInterner::new();
        let cons = interner.intern("::");
        let (module, name) = lookup_operator(&interner, cons).unwrap();
        assert_eq!(&*interner.lookup(module), "List");
        assert_eq!(&*interner.lookup(name), "cons");
    }

    #[test]
    fn unknown_symbol_resolves_to_none() {
        let interner = SharedInterner::new();
        let odd = interner.intern("<=>");
        assert_eq!(lookup_operator(&interner, odd), None);
    }
}
