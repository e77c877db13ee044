//! Namespace-prefix loading.
//!
//! - [`PrefixRegistry`] - Prefix to base-directory mapping
//! - [`PathResolver`] - Candidate file paths for an entity name
//! - [`Psr4Loader`] - The resolver that requires those files
//! - [`SourceLoader`] - Host primitive for checking and evaluating files

mod loader;
#[cfg(feature = "manifest")]
mod manifest;
mod path_resolver;
mod prefix_registry;
mod source;

pub use loader::{DEFAULT_EXTENSION, LoaderConfig, Psr4Loader};
#[cfg(feature = "manifest")]
pub use manifest::{AutoloadManifest, Directories};
pub use path_resolver::{LoadAttempt, PathResolver, Resolution};
pub use prefix_registry::PrefixRegistry;
pub use source::{DeclarationEvaluator, FsSource, Instance, SourceEvaluator, SourceLoader};
