//! The host runtime: defined entities, resolver chain and instantiation.
//!
//! - [`SymbolTable`] - Loaded entities, aliases and factories
//! - [`ResolverChain`] - Ordered resolvers consulted for undefined entities
//! - [`Runtime`] - Coordinator owning both, with dynamic instantiation

mod chain;
mod host;
mod symbols;

pub use chain::{EntityResolver, FnResolver, Host, ResolverChain, resolver_fn};
pub use host::Runtime;
pub use symbols::{EntityDef, Factory, Object, SymbolTable, Value};
