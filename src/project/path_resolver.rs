//! Entity name to candidate file path mapping.
//!
//! For an entity `X\Y\Z` the resolver considers the prefixes `X\Y\` and
//! then `X\`, longest first. Each registered prefix contributes one
//! candidate per base directory, in registered order: the suffix after
//! the prefix becomes a relative path with the loader's extension.
//!
//! ```text
//! prefix  Foo\Bar\      -> /src/foo-bar/
//! entity  Foo\Bar\Baz\Qux
//! path    /src/foo-bar/Baz/Qux.src
//! ```

use std::path::{MAIN_SEPARATOR, PathBuf};
use std::sync::Arc;

use crate::base::NAMESPACE_SEPARATOR;

use super::prefix_registry::PrefixRegistry;

/// One candidate file for an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadAttempt {
    /// The registered prefix that matched (with trailing separator).
    pub prefix: Arc<str>,
    /// The base directory the path was built from.
    pub base_directory: Arc<str>,
    /// The candidate file.
    pub path: PathBuf,
}

/// Outcome of mapping an entity name onto the registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Candidates in the order they must be tried.
    pub attempts: Vec<LoadAttempt>,
    /// Whether any prefix of the entity had base directories registered.
    pub matched_prefix: bool,
}

/// Computes load attempts against a [`PrefixRegistry`]. Performs no I/O.
#[derive(Clone, Copy, Debug)]
pub struct PathResolver<'a> {
    registry: &'a PrefixRegistry,
    extension: &'a str,
}

impl<'a> PathResolver<'a> {
    pub fn new(registry: &'a PrefixRegistry, extension: &'a str) -> Self {
        Self {
            registry,
            extension,
        }
    }

    /// Resolve an entity name into its ordered load attempts.
    ///
    /// Only prefixes ending exactly at a separator are considered, so a
    /// name without separators never matches.
    pub fn resolve(&self, entity: &str) -> Resolution {
        let mut resolution = Resolution::default();

        for (pos, _) in entity.rmatch_indices(NAMESPACE_SEPARATOR) {
            let prefix = &entity[..=pos];
            let suffix = &entity[pos + 1..];

            let Some((key, directories)) = self.registry.get(prefix) else {
                continue;
            };
            resolution.matched_prefix = true;

            let relative = self.relative_path(suffix);
            for base_directory in directories {
                resolution.attempts.push(LoadAttempt {
                    prefix: key.clone(),
                    base_directory: base_directory.clone(),
                    path: PathBuf::from(format!("{base_directory}{relative}")),
                });
            }
        }

        resolution
    }

    fn relative_path(&self, suffix: &str) -> String {
        let mut relative: String = suffix
            .chars()
            .map(|c| if c == NAMESPACE_SEPARATOR { MAIN_SEPARATOR } else { c })
            .collect();
        relative.push('.');
        relative.push_str(self.extension);
        relative
    }
}
