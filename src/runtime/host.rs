//! The runtime coordinator.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::base::trim_leading_separators;
use crate::error::{DefineError, InstantiateError, LoadError};

use super::chain::{EntityResolver, Host, ResolverChain};
use super::symbols::{EntityDef, Factory, Object, SymbolTable, Value};

type ShutdownHook = Box<dyn FnOnce() + Send>;

/// Owns the defined entities and the resolver chain that defines them on
/// demand.
///
/// ```
/// use autoload::runtime::{Factory, Runtime};
///
/// let mut runtime = Runtime::new();
/// runtime.define("App\\Clock", Factory::nullary(|| Box::new(0u64))).unwrap();
///
/// let clock = runtime.instantiate("\\App\\Clock", &[]).unwrap();
/// assert_eq!(clock.downcast_ref::<u64>(), Some(&0));
/// ```
#[derive(Default)]
pub struct Runtime {
    chain: ResolverChain,
    symbols: SymbolTable,
    shutdown_hooks: Vec<ShutdownHook>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn chain(&self) -> &ResolverChain {
        &self.chain
    }

    /// A [`Host`] view over this runtime.
    pub fn host(&mut self) -> Host<'_> {
        Host::new(&self.chain, &mut self.symbols)
    }

    pub fn register_resolver(&mut self, resolver: Arc<dyn EntityResolver>, prepend: bool) -> bool {
        self.chain.register(resolver, prepend)
    }

    pub fn unregister_resolver(&mut self, resolver: &Arc<dyn EntityResolver>) -> bool {
        self.chain.unregister(resolver)
    }

    /// Names of every registered resolver, in consultation order.
    pub fn registered_resolvers(&self) -> Vec<String> {
        self.chain.names().map(str::to_owned).collect()
    }

    /// Ask every registered resolver to define `entity`.
    pub fn run_resolver_chain(&mut self, entity: &str) -> Result<bool, LoadError> {
        self.chain.run(entity, &mut self.symbols)
    }

    /// Whether `entity` is defined, optionally running the resolver chain
    /// first when it is not.
    pub fn entity_exists(&mut self, entity: &str, autoload: bool) -> Result<bool, LoadError> {
        if self.symbols.contains(entity) {
            return Ok(true);
        }
        if !autoload {
            return Ok(false);
        }
        self.run_resolver_chain(entity)
    }

    /// Canonical names of every loaded entity.
    pub fn loaded_entities(&self) -> Vec<SmolStr> {
        self.symbols.entities().collect()
    }

    /// Define a natively provided entity.
    pub fn define(&mut self, entity: &str, factory: Factory) -> Result<(), DefineError> {
        self.symbols
            .define(entity, EntityDef::new().with_factory(factory))
            .map(|_| ())
    }

    /// See [`SymbolTable::flex_entity`].
    pub fn flex_entity(&mut self, entity: &str) -> bool {
        self.symbols.flex_entity(entity)
    }

    /// Load `name` if needed, then construct an instance of it.
    ///
    /// Arguments are forwarded positionally unless the entity declares no
    /// constructor parameters or none are supplied, in which case it is
    /// constructed with defaults.
    pub fn instantiate(&mut self, name: &str, arguments: &[Value]) -> Result<Object, InstantiateError> {
        let name = trim_leading_separators(name);

        if !self.symbols.contains(name) {
            trace!(entity = name, "instantiating undefined entity, resolving");
            self.run_resolver_chain(name)?;
        }

        let Some(id) = self.symbols.lookup(name) else {
            return Err(InstantiateError::Unresolved(name.to_owned()));
        };
        let factory = self
            .symbols
            .get(id)
            .and_then(|def| def.factory.as_ref())
            .ok_or_else(|| InstantiateError::NotConstructible(name.to_owned()))?;

        let arguments = if factory.arity() == 0 || arguments.is_empty() {
            &[][..]
        } else {
            arguments
        };

        factory
            .construct(arguments)
            .map_err(|source| InstantiateError::Construction {
                entity: name.to_owned(),
                source,
            })
    }

    /// Register a hook that runs when the runtime is dropped.
    ///
    /// Hooks run in registration order.
    pub fn register_shutdown_function<F>(&mut self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shutdown_hooks.push(Box::new(hook));
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("chain", &self.chain)
            .field("entities", &self.symbols.len())
            .field("shutdown_hooks", &self.shutdown_hooks.len())
            .finish()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if !self.shutdown_hooks.is_empty() {
            debug!(count = self.shutdown_hooks.len(), "running shutdown hooks");
        }
        for hook in self.shutdown_hooks.drain(..) {
            hook();
        }
    }
}
