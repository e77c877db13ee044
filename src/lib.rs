//! # entity-autoload
//!
//! On-demand loading of named entities from namespace-prefixed directories.
//!
//! An entity named `Foo\Bar\Baz\Qux`, with the prefix `Foo\Bar` mapped to
//! `lib/foo-bar/`, is loaded from `lib/foo-bar/Baz/Qux.src` the first time
//! something references it.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project  → Prefix registry, path resolution, the loader, manifests
//!   ↓
//! runtime  → Symbol table, resolver chain, instantiation
//!   ↓
//! error    → Error types
//!   ↓
//! base     → Primitives (EntityId, Name interning, name forms)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use autoload::{Psr4Loader, Runtime};
//!
//! let mut runtime = Runtime::new();
//! let loader = Arc::new(Psr4Loader::filesystem());
//! loader.add_namespace("Foo\\Bar", "lib/foo-bar", false);
//! loader.register(&mut runtime, false);
//!
//! if runtime.entity_exists("Foo\\Bar\\Baz\\Qux", true)? {
//!     let _qux = runtime.instantiate("Foo\\Bar\\Baz\\Qux", &[])?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Foundation types: EntityId, Name interning, entity-name forms
pub mod base;

/// Error types
pub mod error;

/// Prefix-mapped loading
pub mod project;

/// Symbol table and resolver chain
pub mod runtime;

pub use base::{EntityId, Interner, Name};
pub use error::{ConstructError, DefineError, InstantiateError, LoadError};
#[cfg(feature = "manifest")]
pub use error::ManifestError;
#[cfg(feature = "manifest")]
pub use project::AutoloadManifest;
pub use project::{LoaderConfig, PrefixRegistry, Psr4Loader};
pub use runtime::{EntityResolver, Factory, Runtime, SymbolTable, Value};
