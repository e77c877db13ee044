//! The resolver chain.
//!
//! When an entity is referenced but not defined, every registered
//! [`EntityResolver`] is consulted in order until one of them defines it.
//! Resolvers receive a [`Host`], through which they can define entities and
//! re-enter the whole chain for other names.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::error::LoadError;

use super::symbols::SymbolTable;

/// Something that can try to define an entity on demand.
pub trait EntityResolver: Send + Sync {
    /// Name used when listing registered resolvers.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Try to define `entity`.
    ///
    /// Returns the file that was loaded, if any. Not finding anything is
    /// `Ok(None)`, not an error.
    fn resolve(&self, entity: &str, host: &mut Host<'_>) -> Result<Option<PathBuf>, LoadError>;
}

/// A resolver backed by a closure.
pub struct FnResolver<F> {
    name: SmolStr,
    resolve: F,
}

/// Wrap a closure as an [`EntityResolver`].
pub fn resolver_fn<F>(name: &str, resolve: F) -> FnResolver<F>
where
    F: Fn(&str, &mut Host<'_>) -> Result<Option<PathBuf>, LoadError> + Send + Sync,
{
    FnResolver {
        name: name.into(),
        resolve,
    }
}

impl<F> EntityResolver for FnResolver<F>
where
    F: Fn(&str, &mut Host<'_>) -> Result<Option<PathBuf>, LoadError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, entity: &str, host: &mut Host<'_>) -> Result<Option<PathBuf>, LoadError> {
        (self.resolve)(entity, host)
    }
}

/// Ordered list of registered resolvers.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn EntityResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolver at the end of the chain, or at its front when
    /// `prepend` is set.
    ///
    /// Returns `false` if this resolver object is already registered.
    pub fn register(&mut self, resolver: Arc<dyn EntityResolver>, prepend: bool) -> bool {
        if self.contains(&resolver) {
            return false;
        }

        debug!(resolver = resolver.name(), prepend, "registered resolver");
        if prepend {
            self.resolvers.insert(0, resolver);
        } else {
            self.resolvers.push(resolver);
        }
        true
    }

    /// Remove a resolver. Returns `false` if it was not registered.
    pub fn unregister(&mut self, resolver: &Arc<dyn EntityResolver>) -> bool {
        let Some(pos) = self.position(resolver) else {
            return false;
        };
        let removed = self.resolvers.remove(pos);
        debug!(resolver = removed.name(), "unregistered resolver");
        true
    }

    pub fn contains(&self, resolver: &Arc<dyn EntityResolver>) -> bool {
        self.position(resolver).is_some()
    }

    fn position(&self, resolver: &Arc<dyn EntityResolver>) -> Option<usize> {
        self.resolvers
            .iter()
            .position(|r| std::ptr::addr_eq(Arc::as_ptr(r), Arc::as_ptr(resolver)))
    }

    /// Names of the registered resolvers, in consultation order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.resolvers.iter().map(|r| r.name())
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Consult every resolver in order until `entity` is defined.
    ///
    /// Returns whether the entity is defined afterwards.
    pub fn run(&self, entity: &str, symbols: &mut SymbolTable) -> Result<bool, LoadError> {
        for resolver in &self.resolvers {
            if symbols.contains(entity) {
                return Ok(true);
            }
            trace!(resolver = resolver.name(), entity, "consulting resolver");
            let mut host = Host::new(self, symbols);
            resolver.resolve(entity, &mut host)?;
        }
        Ok(symbols.contains(entity))
    }
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// The runtime as seen by resolvers and source evaluators.
pub struct Host<'a> {
    chain: &'a ResolverChain,
    symbols: &'a mut SymbolTable,
}

impl<'a> Host<'a> {
    pub fn new(chain: &'a ResolverChain, symbols: &'a mut SymbolTable) -> Self {
        Self { chain, symbols }
    }

    pub fn chain(&self) -> &ResolverChain {
        self.chain
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut *self.symbols
    }

    pub fn is_defined(&self, entity: &str) -> bool {
        self.symbols.contains(entity)
    }

    /// Run the whole resolver chain for `entity`, not only the caller.
    pub fn resolve(&mut self, entity: &str) -> Result<bool, LoadError> {
        self.chain.run(entity, &mut *self.symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::symbols::EntityDef;
    use parking_lot::Mutex;

    fn defining(name: &'static str, target: &'static str) -> Arc<dyn EntityResolver> {
        Arc::new(resolver_fn(name, move |entity, host| {
            if entity == target {
                host.symbols_mut().define(entity, EntityDef::new())?;
            }
            Ok(None)
        }))
    }

    #[test]
    fn test_register_append_and_prepend() {
        let mut chain = ResolverChain::new();
        assert!(chain.register(defining("a", "A"), false));
        assert!(chain.register(defining("b", "B"), false));
        assert!(chain.register(defining("c", "C"), true));

        let names: Vec<_> = chain.names().collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_register_twice_is_rejected() {
        let mut chain = ResolverChain::new();
        let resolver = defining("a", "A");

        assert!(chain.register(resolver.clone(), false));
        assert!(!chain.register(resolver.clone(), true));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut chain = ResolverChain::new();
        let a = defining("a", "A");
        let b = defining("b", "B");
        chain.register(a.clone(), false);
        chain.register(b.clone(), false);

        assert!(chain.unregister(&a));
        assert!(!chain.unregister(&a));
        assert!(!chain.contains(&a));
        assert!(chain.contains(&b));
    }

    #[test]
    fn test_run_stops_once_defined() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut chain = ResolverChain::new();
        for name in ["first", "second", "third"] {
            let calls = calls.clone();
            chain.register(
                Arc::new(resolver_fn(name, move |entity, host| {
                    calls.lock().push(name);
                    if name == "second" {
                        host.symbols_mut().define(entity, EntityDef::new())?;
                    }
                    Ok(None)
                })),
                false,
            );
        }

        let mut symbols = SymbolTable::new();
        assert!(chain.run("Foo", &mut symbols).unwrap());
        assert_eq!(*calls.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_run_without_match() {
        let mut chain = ResolverChain::new();
        chain.register(defining("a", "A"), false);

        let mut symbols = SymbolTable::new();
        assert!(!chain.run("Nope", &mut symbols).unwrap());
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_host_resolve_reenters_chain() {
        let mut chain = ResolverChain::new();
        chain.register(defining("base", "Base"), false);
        chain.register(
            Arc::new(resolver_fn("derived", |entity, host| {
                if entity == "Derived" && host.resolve("Base")? {
                    host.symbols_mut().define(entity, EntityDef::new())?;
                }
                Ok(None)
            })),
            false,
        );

        let mut symbols = SymbolTable::new();
        assert!(chain.run("Derived", &mut symbols).unwrap());
        assert!(symbols.contains("Base"));
    }
}
