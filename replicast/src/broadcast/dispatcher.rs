//! Primary-first broadcast over an ordered replica set.
//!
//! ```text
//! caller ──invoke──► primary (index 0) ──► result returned verbatim
//!            │
//!            └─register─► background task ──join_all──► secondary 1
//!                                                   ├─► secondary 2
//!                                                   └─► ...
//! ```
//!
//! The caller only ever waits on the primary. Secondary calls run
//! concurrently on one background task; each failure is logged and counted
//! on its own and never reaches the caller or the sibling calls.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::future::join_all;
use futures::FutureExt;

use crate::actors::{MethodCall, Replica};
use crate::error::{ConfigurationError, InvocationError};

use super::tasks::{BackgroundTasks, BroadcastSummary};

/// Proxy that behaves like one replica but writes to all of them.
///
/// The first handle is the primary. Order is the caller's and is never
/// changed.
///
/// # Example
///
/// ```rust,ignore
/// let writer = BroadcastDispatcher::new(handles, tasks.clone())?;
///
/// // Returns once the primary has stored the message.
/// writer
///     .invoke("set_message", |store: MessageStore| async move {
///         store.set_message("hi").await
///     })
///     .await?;
///
/// // After the response is sent:
/// tasks.drain().await;
/// ```
pub struct BroadcastDispatcher<H> {
    primary: H,
    secondaries: Vec<H>,
    tasks: BackgroundTasks,
}

impl<H> BroadcastDispatcher<H>
where
    H: Clone + fmt::Debug + 'static,
{
    /// Wrap a resolved replica set. Fails on an empty set.
    pub fn new(handles: Vec<H>, tasks: BackgroundTasks) -> Result<Self, ConfigurationError> {
        let mut handles = handles.into_iter();
        let primary = handles.next().ok_or(ConfigurationError::EmptyReplicaSet)?;
        Ok(Self {
            primary,
            secondaries: handles.collect(),
            tasks,
        })
    }

    /// The primary handle. Reads that are not method calls go here.
    pub fn primary(&self) -> &H {
        &self.primary
    }

    /// The secondary handles, in caller order.
    pub fn secondaries(&self) -> &[H] {
        &self.secondaries
    }

    /// Primary plus secondaries.
    pub fn replica_count(&self) -> usize {
        1 + self.secondaries.len()
    }

    /// Invoke one method on every replica.
    ///
    /// `call` performs the method on the handle it is given; it captures
    /// the argument list, so every replica sees the same arguments. The
    /// secondary calls are registered before the primary outcome is awaited
    /// and run whether or not the primary succeeds.
    pub async fn invoke<F, Fut, T, E>(&self, method: &str, call: F) -> Result<T, E>
    where
        F: Fn(H) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
        T: 'static,
        E: fmt::Display + 'static,
    {
        let primary = call(self.primary.clone());
        self.fan_out(method, call);
        primary.await
    }

    fn fan_out<F, Fut, T, E>(&self, method: &str, call: F)
    where
        F: Fn(H) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
        T: 'static,
        E: fmt::Display + 'static,
    {
        if self.secondaries.is_empty() {
            return;
        }

        let method = method.to_string();
        let secondaries = self.secondaries.clone();
        tracing::debug!(
            method = %method,
            secondaries = secondaries.len(),
            "scheduling broadcast to secondaries"
        );

        let task_name = format!("broadcast:{method}");
        self.tasks.register_broadcast(&task_name, async move {
            let call = &call;
            let calls = secondaries.into_iter().enumerate().map(|(offset, handle)| {
                let replica = format!("{handle:?}");
                // `call` itself runs under the guard, not only its future.
                let pending = AssertUnwindSafe(async move { call(handle).await }).catch_unwind();
                async move { (offset + 1, replica, pending.await) }
            });

            let mut summary = BroadcastSummary::new(method.as_str());
            for (index, replica, outcome) in join_all(calls).await {
                match outcome {
                    Ok(Ok(_)) => summary.succeeded += 1,
                    Ok(Err(error)) => {
                        tracing::warn!(
                            method = %method,
                            index,
                            replica = %replica,
                            error = %error,
                            "secondary invocation failed"
                        );
                        summary.failed += 1;
                    }
                    Err(_) => {
                        tracing::warn!(
                            method = %method,
                            index,
                            replica = %replica,
                            "secondary invocation panicked"
                        );
                        summary.failed += 1;
                    }
                }
            }

            tracing::debug!(
                method = %method,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "broadcast settled"
            );
            summary
        });
    }
}

impl<H> BroadcastDispatcher<H>
where
    H: Replica + Clone + 'static,
{
    /// Broadcast a message-level call to replicas that implement [`Replica`].
    pub async fn invoke_message(
        &self,
        call: MethodCall,
    ) -> Result<serde_json::Value, InvocationError> {
        let method = call.method.clone();
        self.invoke(&method, move |handle: H| {
            let call = call.clone();
            async move { handle.call(&call).await }
        })
        .await
    }
}

impl<H: fmt::Debug> fmt::Debug for BroadcastDispatcher<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastDispatcher")
            .field("primary", &self.primary)
            .field("secondaries", &self.secondaries)
            .finish()
    }
}
