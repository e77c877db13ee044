//! Interning of entity names.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;

/// An interned entity name: an index into the [`Interner`] that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Name(u32);

impl Name {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// Append-only table of entity-name strings.
///
/// Names are never removed, so a [`Name`] stays valid for the lifetime of
/// its interner.
#[derive(Default)]
pub struct Interner {
    ids: FxHashMap<SmolStr, Name>,
    names: Vec<SmolStr>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle for `name`, allocating one on first sight.
    pub fn intern(&mut self, name: &str) -> Name {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }

        let id = Name(self.names.len() as u32);
        let name = SmolStr::new(name);
        self.names.push(name.clone());
        self.ids.insert(name, id);
        id
    }

    /// The handle for `name` if it was interned before.
    pub fn find(&self, name: &str) -> Option<Name> {
        self.ids.get(name).copied()
    }

    /// `None` for handles from another interner.
    pub fn lookup(&self, id: Name) -> Option<&SmolStr> {
        self.names.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.names).finish()
    }
}
