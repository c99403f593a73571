//! Common imports for code that builds read/write accessors.

pub use crate::actors::{ActorDirectory, ActorId, MethodCall, Replica, ReplicaDescriptor};
pub use crate::broadcast::{BackgroundTasks, BroadcastDispatcher};
pub use crate::error::{ConfigurationError, ReplicaError};
pub use crate::location::{LocationResolver, OriginHint, ReadWriteAccessors, Region, RequestOrigin};
