//! Broadcast dispatch: answer from one replica, write to all of them.

mod dispatcher;
mod tasks;

pub use dispatcher::BroadcastDispatcher;
pub use tasks::{BackgroundTasks, BroadcastSummary, DrainReport};
