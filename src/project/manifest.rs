//! JSON autoload manifests.
//!
//! ```json
//! {
//!     "extension": "src",
//!     "prefixes": {
//!         "Foo\\Bar\\": "lib/foo-bar",
//!         "Baz\\": ["lib/baz", "vendor/baz"]
//!     }
//! }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ManifestError;

use super::loader::{LoaderConfig, Psr4Loader};

/// Base directories for one prefix: a single path or a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Directories {
    One(String),
    Many(Vec<String>),
}

impl Directories {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Directories::One(dir) => std::slice::from_ref(dir),
            Directories::Many(dirs) => dirs,
        }
    }
}

/// Declarative prefix setup for a [`Psr4Loader`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutoloadManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Prefixes in document order.
    #[serde(default)]
    pub prefixes: IndexMap<String, Directories>,
}

impl AutoloadManifest {
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let json = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Loader settings described by this manifest.
    pub fn config(&self) -> LoaderConfig {
        match &self.extension {
            Some(extension) => LoaderConfig {
                extension: extension.trim_start_matches('.').to_owned(),
            },
            None => LoaderConfig::default(),
        }
    }

    /// Register every prefix with `loader`, appending directories in
    /// document order. Relative directories are taken relative to `root`.
    pub fn apply(&self, loader: &Psr4Loader, root: &Path) {
        for (prefix, directories) in &self.prefixes {
            for directory in directories.as_slice() {
                let base = root.join(directory);
                debug!(prefix = %prefix, base = %base.display(), "manifest namespace");
                loader.add_namespace(prefix, &base.to_string_lossy(), false);
            }
        }
    }
}
