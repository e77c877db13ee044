//! Namespace prefix to base directory mapping.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::base::{normalize_base_directory, normalize_prefix};

/// Ordered base directories per namespace prefix.
///
/// Keys are normalized prefixes (`Foo\Bar\`), values are normalized base
/// directories (`src/foo-bar/`) in lookup order. Duplicates are kept and
/// nothing is ever removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixRegistry {
    prefixes: IndexMap<Arc<str>, Vec<Arc<str>>>,
}

impl PrefixRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a base directory for a namespace prefix.
    ///
    /// Both strings are normalized first, so `"Foo"` and `"Foo\\"` register
    /// under the same key. The directory is appended to the prefix's list,
    /// or put in front of it when `prepend` is set.
    pub fn add_namespace(&mut self, prefix: &str, base_directory: &str, prepend: bool) {
        let prefix: Arc<str> = normalize_prefix(prefix).into();
        let base_directory: Arc<str> = normalize_base_directory(base_directory).into();

        let directories = self.prefixes.entry(prefix).or_default();
        if prepend {
            directories.insert(0, base_directory);
        } else {
            directories.push(base_directory);
        }
    }

    /// Whether at least one base directory was declared for the prefix.
    ///
    /// The prefix is matched exactly, so it must already be normalized.
    pub fn has_base_directory(&self, prefix: &str) -> bool {
        self.prefixes.contains_key(prefix)
    }

    /// The base directories declared for a prefix, in lookup order.
    pub fn base_directories(&self, prefix: &str) -> &[Arc<str>] {
        self.prefixes
            .get(prefix)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The stored prefix key together with its base directories.
    pub fn get(&self, prefix: &str) -> Option<(&Arc<str>, &[Arc<str>])> {
        self.prefixes
            .get_key_value(prefix)
            .map(|(key, directories)| (key, directories.as_slice()))
    }

    /// Iterate over registered prefixes in first-registration order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> + '_ {
        self.prefixes.keys().map(|prefix| prefix.as_ref())
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::MAIN_SEPARATOR;

    fn dir(name: &str) -> String {
        format!("{name}{MAIN_SEPARATOR}")
    }

    fn dirs(registry: &PrefixRegistry, prefix: &str) -> Vec<String> {
        registry
            .base_directories(prefix)
            .iter()
            .map(|d| d.to_string())
            .collect()
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut registry = PrefixRegistry::new();
        registry.add_namespace("Foo\\Bar\\", "a", false);
        registry.add_namespace("Foo\\Bar\\", "b", false);

        assert_eq!(dirs(&registry, "Foo\\Bar\\"), vec![dir("a"), dir("b")]);
    }

    #[test]
    fn test_prepend_goes_first() {
        let mut registry = PrefixRegistry::new();
        registry.add_namespace("Foo\\Bar\\", "a", false);
        registry.add_namespace("Foo\\Bar\\", "b", true);
        registry.add_namespace("Foo\\Bar\\", "c", false);
        registry.add_namespace("Foo\\Bar\\", "d", true);

        assert_eq!(
            dirs(&registry, "Foo\\Bar\\"),
            vec![dir("d"), dir("b"), dir("a"), dir("c")]
        );
    }

    #[test]
    fn test_normalized_keys_are_shared() {
        let mut registry = PrefixRegistry::new();
        registry.add_namespace("Foo", "a", false);
        registry.add_namespace("Foo\\", "a", false);
        registry.add_namespace("\\Foo\\", &dir("b"), false);

        assert_eq!(registry.len(), 1);
        assert!(registry.has_base_directory("Foo\\"));
        assert!(!registry.has_base_directory("Foo"));
        // duplicates are kept
        assert_eq!(dirs(&registry, "Foo\\"), vec![dir("a"), dir("a"), dir("b")]);
    }

    #[test]
    fn test_unknown_prefix() {
        let registry = PrefixRegistry::new();

        assert!(registry.is_empty());
        assert!(!registry.has_base_directory("Baz\\Qux\\"));
        assert!(registry.base_directories("Baz\\Qux\\").is_empty());
    }

    #[test]
    fn test_prefixes_in_registration_order() {
        let mut registry = PrefixRegistry::new();
        registry.add_namespace("B", "b", false);
        registry.add_namespace("A", "a", false);
        registry.add_namespace("B", "c", true);

        let prefixes: Vec<_> = registry.prefixes().collect();
        assert_eq!(prefixes, vec!["B\\", "A\\"]);
    }
}
