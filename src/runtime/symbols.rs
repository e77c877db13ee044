//! Defined entities, aliases and factories.
//!
//! The [`SymbolTable`] is the runtime's record of what is loaded. Each
//! defined entity owns one slot; its canonical name and every alias bind to
//! that slot's [`EntityId`]. Instances are produced by the [`Factory`] an
//! entity was defined with, so no introspection of constructor signatures
//! is needed.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::base::{EntityId, Interner, Name, shortest_form};
use crate::error::{ConstructError, DefineError};

/// A constructed entity instance.
pub type Object = Box<dyn Any + Send>;

/// A constructor argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(SmolStr),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

type ConstructFn = dyn Fn(&[Value]) -> Result<Object, ConstructError> + Send + Sync;

/// Construction function of an entity.
///
/// `arity` is the number of declared constructor parameters. When it is
/// zero, or when no arguments are supplied, the factory is called with an
/// empty argument list.
#[derive(Clone)]
pub struct Factory {
    arity: usize,
    construct: Arc<ConstructFn>,
}

impl Factory {
    pub fn new<F>(arity: usize, construct: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Object, ConstructError> + Send + Sync + 'static,
    {
        Self {
            arity,
            construct: Arc::new(construct),
        }
    }

    /// A factory without declared parameters.
    pub fn nullary<F>(construct: F) -> Self
    where
        F: Fn() -> Object + Send + Sync + 'static,
    {
        Self::new(0, move |_| Ok(construct()))
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn construct(&self, arguments: &[Value]) -> Result<Object, ConstructError> {
        (self.construct)(arguments)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// What is known about a defined entity.
#[derive(Clone, Debug, Default)]
pub struct EntityDef {
    /// The file the entity was loaded from, if any.
    pub origin: Option<PathBuf>,
    /// How to construct it. Entities without a factory cannot be instantiated.
    pub factory: Option<Factory>,
}

impl EntityDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

#[derive(Debug)]
struct Slot {
    name: Name,
    def: EntityDef,
}

/// The set of defined entities and the names bound to them.
#[derive(Debug, Default)]
pub struct SymbolTable {
    names: Interner,
    bindings: FxHashMap<Name, EntityId>,
    slots: Vec<Slot>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new entity under its canonical name.
    pub fn define(&mut self, name: &str, def: EntityDef) -> Result<EntityId, DefineError> {
        let key = self.names.intern(name);
        if self.bindings.contains_key(&key) {
            return Err(DefineError::AlreadyDefined(name.into()));
        }

        let id = EntityId::new(self.slots.len() as u32);
        self.slots.push(Slot { name: key, def });
        self.bindings.insert(key, id);
        debug!(entity = name, %id, "defined entity");
        Ok(id)
    }

    /// The entity bound to a name (canonical or alias).
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        let key = self.names.find(name)?;
        self.bindings.get(&key).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityDef> {
        self.slots.get(id.index() as usize).map(|slot| &slot.def)
    }

    /// The canonical name of the entity a name is bound to.
    pub fn canonical_name(&self, name: &str) -> Option<SmolStr> {
        let id = self.lookup(name)?;
        let slot = self.slots.get(id.index() as usize)?;
        self.names.lookup(slot.name).cloned()
    }

    /// Bind `alias` to the entity `original` denotes.
    ///
    /// Returns `false` if `original` is not defined or `alias` already
    /// denotes a different entity. Re-binding an alias to the entity it
    /// already denotes succeeds.
    pub fn alias(&mut self, original: &str, alias: &str) -> bool {
        let Some(target) = self.lookup(original) else {
            debug!(original, alias, "cannot alias an undefined entity");
            return false;
        };

        match self.lookup(alias) {
            Some(existing) if existing == target => true,
            Some(existing) => {
                warn!(original, alias, %existing, "alias already denotes another entity");
                false
            }
            None => {
                let key = self.names.intern(alias);
                self.bindings.insert(key, target);
                debug!(original, alias, "registered alias");
                true
            }
        }
    }

    /// Make an entity reachable through its shortest form as well
    /// (`Foo\Bar\Bar` as `Foo\Bar`).
    ///
    /// A name that is already its own shortest form is left alone and
    /// reported as a success.
    pub fn flex_entity(&mut self, name: &str) -> bool {
        let shortest = shortest_form(name);
        if shortest == name {
            return true;
        }
        self.alias(name, shortest)
    }

    /// Canonical names of all defined entities, in definition order.
    pub fn entities(&self) -> impl Iterator<Item = SmolStr> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| self.names.lookup(slot.name).cloned())
    }

    /// Number of defined entities (aliases are not counted).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
