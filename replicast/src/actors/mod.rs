//! Replica identity and resolution.
//!
//! The actor runtime itself (placement, persistence, request routing) lives
//! outside this crate. This module only models what the broadcast layer
//! needs from it:
//!
//! ```text
//! ReplicaDescriptor ──► ActorDirectory::resolve ──► Handle
//!   name | id              (runtime-provided)         typed stub, or
//!   + placement hint                                  dyn Replica
//! ```

mod directory;
mod replica;
mod types;

pub use directory::{ActorDirectory, InMemoryDirectory};
pub use replica::{MethodCall, Replica};
pub use types::{ActorId, ReplicaDescriptor, ReplicaIdentity};
