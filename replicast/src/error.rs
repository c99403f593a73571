//! Error types for replicast.
//!
//! Configuration problems are reported before any remote call is made.
//! Failures from the primary replica keep the caller's own error type and
//! never pass through these enums.

use thiserror::Error;

/// Malformed input to a constructor.
///
/// Always synchronous and always surfaced before any replica is contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A broadcast was requested over zero replicas.
    #[error("replica set must contain at least one replica")]
    EmptyReplicaSet,

    /// A replica descriptor was built with neither a name nor an id.
    #[error("replica descriptor requires a name or an id")]
    MissingIdentity,

    /// An already-resolved actor id was empty.
    #[error("actor id cannot be empty")]
    EmptyActorId,
}

/// Errors from resolving a descriptor to a callable handle.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory cannot serve requests right now.
    #[error("directory unavailable")]
    Unavailable,

    /// The directory refused to produce a handle for the target.
    #[error("failed to resolve {target}: {reason}")]
    ResolutionFailed {
        /// Display form of the descriptor that failed to resolve.
        target: String,
        /// Directory-provided reason.
        reason: String,
    },
}

/// Errors raised while assembling replica handles for a request.
#[derive(Debug, Error)]
pub enum ReplicaError {
    /// Invalid replica set or descriptor.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A descriptor could not be resolved.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}

/// Errors from a message-level call on a [`Replica`](crate::actors::Replica).
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The replica does not expose the requested method.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Arguments or return value could not be (de)serialized.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The replica ran the method and it failed.
    #[error("invocation failed: {0}")]
    Failed(String),
}

/// A string that is not one of the nine macro-region codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown region code: {0:?}")]
pub struct UnknownRegion(pub String);
