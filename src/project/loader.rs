use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::base::{expanded_form, is_shortest_form};
use crate::error::LoadError;
use crate::runtime::{EntityResolver, Host, Runtime};

use super::path_resolver::{PathResolver, Resolution};
use super::prefix_registry::PrefixRegistry;
use super::source::{DeclarationEvaluator, FsSource, SourceLoader};

/// Extension used for every lookup unless configured otherwise.
pub const DEFAULT_EXTENSION: &str = "src";

/// Loader settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Source-file extension appended to every candidate path, without dot.
    pub extension: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }
}

/// Loads entities on demand from prefix-mapped directories.
///
/// Namespaces may be added before or after the loader is registered with a
/// [`Runtime`].
pub struct Psr4Loader {
    prefixes: RwLock<PrefixRegistry>,
    config: LoaderConfig,
    source: Box<dyn SourceLoader>,
}

impl Psr4Loader {
    pub fn new<S: SourceLoader + 'static>(source: S) -> Self {
        Self::with_config(LoaderConfig::default(), source)
    }

    pub fn with_config<S: SourceLoader + 'static>(config: LoaderConfig, source: S) -> Self {
        Self {
            prefixes: RwLock::new(PrefixRegistry::new()),
            config,
            source: Box::new(source),
        }
    }

    /// A loader reading declaration files from disk.
    pub fn filesystem() -> Self {
        Self::filesystem_with_config(LoaderConfig::default())
    }

    pub fn filesystem_with_config(config: LoaderConfig) -> Self {
        Self::with_config(config, FsSource::new(DeclarationEvaluator))
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Add a base directory for a namespace prefix.
    ///
    /// See [`PrefixRegistry::add_namespace`].
    pub fn add_namespace(&self, prefix: &str, base_directory: &str, prepend: bool) {
        self.prefixes
            .write()
            .add_namespace(prefix, base_directory, prepend);
    }

    pub fn has_base_directory(&self, prefix: &str) -> bool {
        self.prefixes.read().has_base_directory(prefix)
    }

    pub fn base_directories(&self, prefix: &str) -> Vec<Arc<str>> {
        self.prefixes.read().base_directories(prefix).to_vec()
    }

    /// A snapshot of the registered prefixes.
    pub fn prefixes(&self) -> PrefixRegistry {
        self.prefixes.read().clone()
    }

    /// Compute the load attempts for an entity without touching the disk.
    pub fn resolve_paths(&self, entity: &str) -> Resolution {
        let prefixes = self.prefixes.read();
        PathResolver::new(&prefixes, &self.config.extension).resolve(entity)
    }

    /// Try to load the file defining `entity`.
    ///
    /// Candidates are tried longest prefix first, then in base-directory
    /// order; the first existing file is required and its path returned.
    ///
    /// When nothing was found although some prefix matched, and `entity`
    /// is in shortest form (`X\Y`), the expanded name (`X\Y\Y`) is handed to
    /// the whole resolver chain and `None` is returned.
    pub fn load(&self, entity: &str, host: &mut Host<'_>) -> Result<Option<PathBuf>, LoadError> {
        // The registry lock is released here: required files may add namespaces.
        let resolution = self.resolve_paths(entity);

        for attempt in &resolution.attempts {
            trace!(entity, prefix = %attempt.prefix, path = %attempt.path.display(), "trying");
            if self.require_file(&attempt.path, host)? {
                debug!(entity, path = %attempt.path.display(), "loaded");
                return Ok(Some(attempt.path.clone()));
            }
        }

        if resolution.matched_prefix && is_shortest_form(entity) {
            if let Some(expanded) = expanded_form(entity) {
                debug!(entity, expanded = %expanded, "delegating expanded name to resolver chain");
                host.resolve(&expanded)?;
            }
        }

        Ok(None)
    }

    /// Require `path` if it exists. Returns whether it did.
    pub fn require_file(&self, path: &Path, host: &mut Host<'_>) -> Result<bool, LoadError> {
        if !self.source.exists(path) {
            return Ok(false);
        }
        self.source.require(path, host)?;
        Ok(true)
    }

    /// Add this loader to the runtime's resolver chain.
    pub fn register(self: &Arc<Self>, runtime: &mut Runtime, prepend: bool) -> bool {
        runtime.register_resolver(self.as_resolver(), prepend)
    }

    /// Remove this loader from the runtime's resolver chain.
    pub fn unregister(self: &Arc<Self>, runtime: &mut Runtime) -> bool {
        runtime.unregister_resolver(&self.as_resolver())
    }

    fn as_resolver(self: &Arc<Self>) -> Arc<dyn EntityResolver> {
        self.clone()
    }
}

impl EntityResolver for Psr4Loader {
    fn name(&self) -> &str {
        "psr4"
    }

    fn resolve(&self, entity: &str, host: &mut Host<'_>) -> Result<Option<PathBuf>, LoadError> {
        self.load(entity, host)
    }
}

impl fmt::Debug for Psr4Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Psr4Loader")
            .field("prefixes", &*self.prefixes.read())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
