//! Background work that outlives the call that started it.
//!
//! A broadcast returns to its caller as soon as the primary replica
//! answers. Secondary calls keep running on tasks registered here, and the
//! host awaits [`BackgroundTasks::drain`] once its response is out and
//! before it tears anything down.
//!
//! Tasks are spawned with `tokio::task::spawn_local`, so registration must
//! happen inside a `LocalSet`.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use serde::Serialize;
use tokio::task::JoinHandle;

/// Outcome counts for the secondary leg of one broadcast call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BroadcastSummary {
    /// Method that was broadcast.
    pub method: String,
    /// Secondaries that returned `Ok`.
    pub succeeded: usize,
    /// Secondaries that returned `Err` or panicked.
    pub failed: usize,
}

impl BroadcastSummary {
    pub(crate) fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            succeeded: 0,
            failed: 0,
        }
    }
}

/// What a [`BackgroundTasks::drain`] call waited on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Tasks that ran to completion.
    pub completed: usize,
    /// Tasks that panicked or were aborted.
    pub panicked: usize,
    /// Per-broadcast secondary outcomes, in drain order.
    pub broadcasts: Vec<BroadcastSummary>,
}

impl DrainReport {
    /// Total failed secondary invocations across all broadcasts.
    pub fn secondary_failures(&self) -> usize {
        self.broadcasts.iter().map(|b| b.failed).sum()
    }
}

struct PendingTask {
    name: String,
    handle: JoinHandle<Option<BroadcastSummary>>,
}

/// Registry of detached tasks with an explicit drain barrier.
///
/// Cheap to clone; clones share one registry.
///
/// Handles are only released by [`drain`](Self::drain), finished or not. A
/// host that keeps one registry across requests must drain it after every
/// request, otherwise the registry grows with each broadcast.
#[derive(Clone, Default)]
pub struct BackgroundTasks {
    pending: Rc<RefCell<Vec<PendingTask>>>,
}

impl BackgroundTasks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `future` now and keep it alive until the next drain.
    ///
    /// # Panics
    ///
    /// Panics when called outside a `LocalSet`.
    pub fn register<F>(&self, name: &str, future: F)
    where
        F: Future<Output = ()> + 'static,
    {
        self.spawn(name, async move {
            future.await;
            None
        });
    }

    pub(crate) fn register_broadcast<F>(&self, name: &str, future: F)
    where
        F: Future<Output = BroadcastSummary> + 'static,
    {
        self.spawn(name, async move { Some(future.await) });
    }

    fn spawn<F>(&self, name: &str, future: F)
    where
        F: Future<Output = Option<BroadcastSummary>> + 'static,
    {
        let task_name = name.to_string();
        let task_name_clone = task_name.clone();
        let handle = tokio::task::spawn_local(async move {
            tracing::trace!("Task {} starting", task_name_clone);
            let output = future.await;
            tracing::trace!("Task {} completed", task_name_clone);
            output
        });
        self.pending.borrow_mut().push(PendingTask {
            name: task_name,
            handle,
        });
    }

    /// Number of tasks registered since the last drain.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Wait until every registered task has settled.
    ///
    /// Tasks registered while draining are awaited too. A panicking task is
    /// logged and counted, never propagated.
    pub async fn drain(&self) -> DrainReport {
        let mut report = DrainReport::default();
        loop {
            let batch = std::mem::take(&mut *self.pending.borrow_mut());
            if batch.is_empty() {
                break;
            }
            for task in batch {
                match task.handle.await {
                    Ok(summary) => {
                        report.completed += 1;
                        report.broadcasts.extend(summary);
                    }
                    Err(error) => {
                        tracing::warn!(task = %task.name, %error, "background task did not complete");
                        report.panicked += 1;
                    }
                }
            }
        }
        report
    }
}

impl std::fmt::Debug for BackgroundTasks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundTasks")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[tokio::test]
    async fn test_drain_waits_for_registered_tasks() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let tasks = BackgroundTasks::new();
                let ran = Rc::new(Cell::new(0));

                for _ in 0..3 {
                    let ran = ran.clone();
                    tasks.register("count", async move {
                        tokio::task::yield_now().await;
                        ran.set(ran.get() + 1);
                    });
                }
                assert_eq!(tasks.pending(), 3);

                let report = tasks.drain().await;

                assert_eq!(ran.get(), 3);
                assert_eq!(report.completed, 3);
                assert_eq!(report.panicked, 0);
                assert!(report.broadcasts.is_empty());
                assert_eq!(tasks.pending(), 0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_drain_picks_up_tasks_registered_while_draining() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let tasks = BackgroundTasks::new();
                let ran = Rc::new(Cell::new(false));

                let inner_tasks = tasks.clone();
                let inner_ran = ran.clone();
                tasks.register("outer", async move {
                    inner_tasks.register("inner", async move {
                        inner_ran.set(true);
                    });
                });

                let report = tasks.drain().await;

                assert!(ran.get());
                assert_eq!(report.completed, 2);
            })
            .await;
    }

    #[tokio::test]
    async fn test_drain_counts_panicked_tasks() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let tasks = BackgroundTasks::new();
                tasks.register("boom", async { panic!("boom") });
                tasks.register("fine", async {});

                let report = tasks.drain().await;

                assert_eq!(report.completed, 1);
                assert_eq!(report.panicked, 1);
            })
            .await;
    }

    #[tokio::test]
    async fn test_drain_collects_broadcast_summaries() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let tasks = BackgroundTasks::new();
                tasks.register_broadcast("broadcast:setMessage", async {
                    BroadcastSummary {
                        method: "setMessage".to_string(),
                        succeeded: 2,
                        failed: 1,
                    }
                });

                let report = tasks.drain().await;

                assert_eq!(report.broadcasts.len(), 1);
                assert_eq!(report.secondary_failures(), 1);
            })
            .await;
    }

    #[tokio::test]
    async fn test_finished_tasks_are_held_until_drain() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let tasks = BackgroundTasks::new();

                for request in 1..=3 {
                    tasks.register("request", async {});
                    tokio::task::yield_now().await;
                    // Already finished, still held.
                    assert_eq!(tasks.pending(), 1, "request {request}");

                    let report = tasks.drain().await;
                    assert_eq!(report.completed, 1);
                    assert_eq!(tasks.pending(), 0);
                }
            })
            .await;
    }

    #[tokio::test]
    async fn test_drain_on_empty_registry() {
        let tasks = BackgroundTasks::new();
        assert_eq!(tasks.drain().await, DrainReport::default());
    }
}
