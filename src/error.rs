//! Error types.
//!
//! "Not found" is never an error in this crate: resolution that exhausts
//! every candidate reports `Ok(None)` or `false`. The types below cover
//! failures of the host side effects (reading and evaluating a source file,
//! defining an entity, constructing an instance).

use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

/// Failure while loading a source file that was found on disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: {message}", path.display())]
    Evaluate {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error(transparent)]
    Define(#[from] DefineError),
}

/// Failure while binding a name in the symbol table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefineError {
    #[error("entity '{0}' is already defined")]
    AlreadyDefined(SmolStr),
}

/// Failure reported by an entity factory.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructError {
    #[error("expected {expected} argument(s), got {got}")]
    ArgumentCount { expected: usize, got: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Failure of [`Runtime::instantiate`](crate::runtime::Runtime::instantiate).
///
/// `Unresolved` means no resolver could define the entity; `Construction`
/// means the entity exists but its factory rejected the arguments.
#[derive(Error, Debug)]
pub enum InstantiateError {
    #[error("entity '{0}' could not be resolved")]
    Unresolved(String),
    #[error("entity '{0}' has no factory and cannot be instantiated")]
    NotConstructible(String),
    #[error("failed to construct '{entity}': {source}")]
    Construction {
        entity: String,
        #[source]
        source: ConstructError,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Failure while reading an autoload manifest.
#[cfg(feature = "manifest")]
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),
}
