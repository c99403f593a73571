//! Actor directory: resolves replica descriptors to callable handles.
//!
//! The directory is the runtime's "phone book". Given a name or an id plus
//! an optional placement hint, it hands back a handle whose methods are
//! remote calls on that one actor instance. Resolving is local and cheap;
//! nothing is invoked until a method is called on the handle.
//!
//! # Design
//!
//! - `ActorDirectory` is a trait so the hosting runtime can plug in its own
//!   stub factory. The handle type is an associated type because every
//!   directory serves one method surface.
//! - Placement hints only matter on first activation; an instance that
//!   already exists stays where it is.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use crate::error::DirectoryError;
use crate::location::Region;

use super::types::{ActorId, ReplicaDescriptor, ReplicaIdentity};

/// Directory for resolving replica identities to handles.
pub trait ActorDirectory {
    /// Callable stub for one actor instance.
    type Handle: Clone + fmt::Debug + 'static;

    /// Resolve a named actor. The directory derives its id deterministically.
    fn resolve_by_name(
        &self,
        name: &str,
        placement: Option<Region>,
    ) -> Result<Self::Handle, DirectoryError>;

    /// Resolve an actor by an already-known id.
    fn resolve_by_id(
        &self,
        id: &ActorId,
        placement: Option<Region>,
    ) -> Result<Self::Handle, DirectoryError>;

    /// Resolve whatever the descriptor names.
    fn resolve(&self, descriptor: &ReplicaDescriptor) -> Result<Self::Handle, DirectoryError> {
        match descriptor.identity() {
            ReplicaIdentity::Name(name) => self.resolve_by_name(name, descriptor.placement()),
            ReplicaIdentity::Id(id) => self.resolve_by_id(id, descriptor.placement()),
        }
    }

    /// Resolve every descriptor, keeping order. Stops at the first failure.
    fn resolve_all(
        &self,
        descriptors: &[ReplicaDescriptor],
    ) -> Result<Vec<Self::Handle>, DirectoryError> {
        descriptors.iter().map(|d| self.resolve(d)).collect()
    }
}

type HandleFactory<H> = Box<dyn Fn(&ActorId, Option<Region>) -> H>;

/// In-memory directory for single-process use and tests.
///
/// Handles are produced by a factory the first time an id is resolved and
/// cached afterwards, so every resolution of the same id shares one
/// instance.
pub struct InMemoryDirectory<H> {
    factory: HandleFactory<H>,
    entries: RefCell<HashMap<ActorId, H>>,
}

impl<H: Clone> InMemoryDirectory<H> {
    /// Create a directory that activates instances with `factory`.
    ///
    /// The factory receives the id and the placement hint of the first
    /// resolution.
    pub fn new(factory: impl Fn(&ActorId, Option<Region>) -> H + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// The handle for `id`, if it has been activated.
    pub fn get(&self, id: &ActorId) -> Option<H> {
        self.entries.borrow().get(id).cloned()
    }

    /// Number of activated instances.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing has been activated yet.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<H> fmt::Debug for InMemoryDirectory<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryDirectory")
            .field("entries", &self.entries.borrow().len())
            .finish()
    }
}

impl<H: Clone + fmt::Debug + 'static> ActorDirectory for InMemoryDirectory<H> {
    type Handle = H;

    fn resolve_by_name(&self, name: &str, placement: Option<Region>) -> Result<H, DirectoryError> {
        self.resolve_by_id(&ActorId::from_name(name), placement)
    }

    fn resolve_by_id(&self, id: &ActorId, placement: Option<Region>) -> Result<H, DirectoryError> {
        let mut entries = self.entries.borrow_mut();
        let handle = entries
            .entry(id.clone())
            .or_insert_with(|| (self.factory)(id, placement));
        Ok(handle.clone())
    }
}
