//! Interned identifiers.
//!
//! Grounded on `sigil_ir/src/interner.rs`'s `StringInterner`/`SharedInterner`
//! split, simplified from the teacher's 16-shard `Arc<RwLock<_>>` design to a
//! single `RefCell`-guarded table: evaluation in this crate is single
//! threaded by design (see spec §5), so sharding and locking buy nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// An interned identifier: a module name, a variable, or a constructor tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(u32);

impl Name {
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

#[derive(Default)]
struct Table {
    map: FxHashMap<Rc<str>, Name>,
    strings: Vec<Rc<str>>,
}

/// A single-threaded string interner.
#[derive(Default)]
pub struct StringInterner {
    table: RefCell<Table>,
}

impl StringInterner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `text`, returning the stable `Name` for it. Re-interning the
    /// same text always returns the same `Name`.
    pub fn intern(&self, text: &str) -> Name {
        let mut table = self.table.borrow_mut();
        if let Some(&name) = table.map.get(text) {
            return name;
        }
        let rc: Rc<str> = Rc::from(text);
        let name = Name(table.strings.len() as u32);
        table.strings.push(rc.clone());
        table.map.insert(rc, name);
        name
    }

    /// Looks up the text for a previously interned `Name`.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    #[must_use]
    pub fn lookup(&self, name: Name) -> Rc<str> {
        self.table.borrow().strings[name.0 as usize].clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.borrow().strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A cheaply cloned handle to a shared interner.
#[derive(Clone, Default)]
pub struct SharedInterner(Rc<StringInterner>);

impl SharedInterner {
    #[must_use]
    pub fn new() -> Self {
        SharedInterner(Rc::new(StringInterner::new()))
    }

    #[must_use]
    pub fn intern(&self, text: &str) -> Name {
        self.0.intern(text)
    }

    #[must_use]
    pub fn lookup(&self, name: Name) -> Rc<str> {
        self.0.lookup(name)
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_text_returns_same_name() {
        let interner = StringInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        assert_eq!(a, b);
    }

    #[test]
    fn interning_different_text_returns_different_names() {
        let interner = StringInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn lookup_roundtrips() {
        let interner = StringInterner::new();
        let name = interner.intern("hello");
        assert_eq!(&*interner.lookup(name), "hello");
    }

    #[test]
    fn shared_interner_clones_are_identical() {
        let shared = SharedInterner::new();
        let other = shared.clone();
        let a = shared.intern("x");
        let b = other.intern("x");
        assert_eq!(a, b);
    }
}
