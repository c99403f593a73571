//! Replica identity types.
//!
//! A replica is one addressable actor instance. Callers name it either by a
//! stable string (from which the directory derives a deterministic
//! [`ActorId`]) or by an id that was already resolved earlier.
//!
//! # Design
//!
//! - `ActorId` is an opaque hex string. Ids derived from names are the
//!   SHA-256 of the name, so the same name always lands on the same instance.
//! - `ReplicaIdentity` encodes "name XOR id" in the type.
//! - `ReplicaDescriptor` adds an optional placement hint and is immutable
//!   once built.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ConfigurationError;
use crate::location::Region;

/// Opaque identifier of a single actor instance.
///
/// # Examples
///
/// ```rust
/// use replicast::actors::ActorId;
///
/// let a = ActorId::from_name("global-weur");
/// let b = ActorId::from_name("global-weur");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 64);
/// ```
#[derive(Clone, Hash, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub struct ActorId(String);

impl ActorId {
    /// Derive the id for a named actor.
    pub fn from_name(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        Self(format!("{digest:x}"))
    }

    /// Wrap an id that was resolved earlier.
    pub fn from_string(id: impl Into<String>) -> Result<Self, ConfigurationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigurationError::EmptyActorId);
        }
        Ok(Self(id))
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a descriptor names its replica.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicaIdentity {
    /// Stable name; the directory derives the id.
    Name(String),
    /// Already-resolved id.
    Id(ActorId),
}

/// Identifies one target actor instance plus where it should live.
///
/// # Examples
///
/// ```rust
/// use replicast::actors::ReplicaDescriptor;
/// use replicast::location::Region;
///
/// let descriptor = ReplicaDescriptor::named("global-apac").placed_in(Region::Apac);
/// assert_eq!(descriptor.name(), Some("global-apac"));
/// assert_eq!(descriptor.placement(), Some(Region::Apac));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplicaDescriptor {
    identity: ReplicaIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placement: Option<Region>,
}

impl ReplicaDescriptor {
    /// Descriptor for a named replica with no placement preference.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            identity: ReplicaIdentity::Name(name.into()),
            placement: None,
        }
    }

    /// Descriptor for an already-resolved id.
    pub fn with_id(id: ActorId) -> Self {
        Self {
            identity: ReplicaIdentity::Id(id),
            placement: None,
        }
    }

    /// Build from loosely-typed parts, e.g. a deserialized request.
    ///
    /// Empty strings count as absent. When both are present the id wins,
    /// since it needs no derivation.
    pub fn from_parts(
        name: Option<String>,
        id: Option<String>,
        placement: Option<Region>,
    ) -> Result<Self, ConfigurationError> {
        let identity = match (
            name.filter(|n| !n.is_empty()),
            id.filter(|i| !i.is_empty()),
        ) {
            (_, Some(id)) => ReplicaIdentity::Id(ActorId::from_string(id)?),
            (Some(name), None) => ReplicaIdentity::Name(name),
            (None, None) => return Err(ConfigurationError::MissingIdentity),
        };
        Ok(Self {
            identity,
            placement,
        })
    }

    /// Ask the directory to place this replica in `region`.
    pub fn placed_in(mut self, region: Region) -> Self {
        self.placement = Some(region);
        self
    }

    /// How this descriptor names its replica.
    pub fn identity(&self) -> &ReplicaIdentity {
        &self.identity
    }

    /// The replica name, if addressed by name.
    pub fn name(&self) -> Option<&str> {
        match &self.identity {
            ReplicaIdentity::Name(name) => Some(name),
            ReplicaIdentity::Id(_) => None,
        }
    }

    /// The placement hint, if any.
    pub fn placement(&self) -> Option<Region> {
        self.placement
    }

    /// The id this descriptor resolves to.
    pub fn actor_id(&self) -> ActorId {
        match &self.identity {
            ReplicaIdentity::Name(name) => ActorId::from_name(name),
            ReplicaIdentity::Id(id) => id.clone(),
        }
    }
}

impl fmt::Display for ReplicaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identity {
            ReplicaIdentity::Name(name) => write!(f, "name:{name}")?,
            ReplicaIdentity::Id(id) => write!(f, "id:{id}")?,
        }
        if let Some(region) = self.placement {
            write!(f, "@{region}")?;
        }
        Ok(())
    }
}
