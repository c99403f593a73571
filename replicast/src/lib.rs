//! # Replicast
//!
//! Read-from-nearest, write-to-everywhere access to virtual actor replicas.
//!
//! A [`BroadcastDispatcher`](broadcast::BroadcastDispatcher) looks like a
//! single replica to its caller. Each method call is answered by the
//! primary replica while the same call runs against every other replica on
//! a background task that the host drains after responding. The
//! [`location`] module picks the replica nearest to a request and builds the
//! one-replica-per-region set that writes fan out to.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  location                                                   │
//! │  • Region (9 macro-regions)  • POP code → Region table      │
//! │  • LocationResolver → ReadWriteAccessors { reader, writer } │
//! ├─────────────────────────────────────────────────────────────┤
//! │  broadcast                                                  │
//! │  • BroadcastDispatcher: primary sync, secondaries detached  │
//! │  • BackgroundTasks: spawn_local registry + drain barrier    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  actors                                                     │
//! │  • ActorId, ReplicaDescriptor                               │
//! │  • ActorDirectory (runtime-provided), Replica               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use replicast::prelude::*;
//!
//! let tasks = BackgroundTasks::new();
//! let origin = RequestOrigin::from_colo("FRA");
//! let accessors = replicast::location::read_write_accessors(&origin, &directory, &tasks)?;
//!
//! let current = accessors.reader.get_message().await?;
//! accessors
//!     .writer
//!     .invoke("set_message", |store| async move { store.set_message("hi").await })
//!     .await?;
//!
//! // once the response is on its way
//! tasks.drain().await;
//! ```
//!
//! Everything runs on a single thread: background work is spawned with
//! `tokio::task::spawn_local`, so callers need a `LocalSet`.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod actors;
pub mod broadcast;
pub mod error;
pub mod location;
pub mod prelude;
