//! Shared fixtures: a message-store actor with scriptable failure modes.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use replicast::actors::{ActorId, MethodCall, Replica};
use replicast::error::InvocationError;
use replicast::location::Region;
use tokio::sync::Notify;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// How a store reacts to every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Healthy,
    Failing,
    Panicking,
    /// Blocks until [`MessageStore::open_gate`] is called.
    Gated,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0} unreachable")]
    Unreachable(String),
}

struct StoreState {
    label: String,
    id: ActorId,
    placement: Option<Region>,
    behavior: Cell<Behavior>,
    message: RefCell<Option<String>>,
    calls: RefCell<Vec<String>>,
    completed: Cell<usize>,
    gate: Notify,
}

/// Single-writer actor holding one message.
#[derive(Clone)]
pub struct MessageStore {
    inner: Rc<StoreState>,
}

impl MessageStore {
    pub fn new(name: &str, behavior: Behavior) -> Self {
        Self::build(name.to_string(), ActorId::from_name(name), None, behavior)
    }

    /// Factory for [`replicast::actors::InMemoryDirectory`].
    pub fn activate(id: &ActorId, placement: Option<Region>) -> Self {
        let label = match placement {
            Some(region) => region.code().to_string(),
            None => id.to_string(),
        };
        Self::build(label, id.clone(), placement, Behavior::Healthy)
    }

    fn build(label: String, id: ActorId, placement: Option<Region>, behavior: Behavior) -> Self {
        Self {
            inner: Rc::new(StoreState {
                label,
                id,
                placement,
                behavior: Cell::new(behavior),
                message: RefCell::new(None),
                calls: RefCell::new(Vec::new()),
                completed: Cell::new(0),
                gate: Notify::new(),
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn id(&self) -> &ActorId {
        &self.inner.id
    }

    pub fn placement(&self) -> Option<Region> {
        self.inner.placement
    }

    /// Every call received, as `method(args)`.
    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.borrow().clone()
    }

    /// Calls that ran to a successful end.
    pub fn completed(&self) -> usize {
        self.inner.completed.get()
    }

    /// Current message without going through a call.
    pub fn message(&self) -> Option<String> {
        self.inner.message.borrow().clone()
    }

    pub fn open_gate(&self) {
        self.inner.gate.notify_one();
    }

    pub fn same_instance(&self, other: &MessageStore) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub async fn set_message(&self, message: String) -> Result<(), StoreError> {
        self.record(format!("setMessage({message})"));
        self.run().await?;
        *self.inner.message.borrow_mut() = Some(message);
        self.inner.completed.set(self.inner.completed.get() + 1);
        Ok(())
    }

    pub async fn get_message(&self) -> Result<Option<String>, StoreError> {
        self.record("getMessage()".to_string());
        self.run().await?;
        self.inner.completed.set(self.inner.completed.get() + 1);
        Ok(self.message())
    }

    fn record(&self, call: String) {
        self.inner.calls.borrow_mut().push(call);
    }

    async fn run(&self) -> Result<(), StoreError> {
        match self.inner.behavior.get() {
            Behavior::Healthy => Ok(()),
            Behavior::Failing => Err(StoreError::Unreachable(self.inner.label.clone())),
            Behavior::Panicking => panic!("{} crashed", self.inner.label),
            Behavior::Gated => {
                self.inner.gate.notified().await;
                Ok(())
            }
        }
    }
}

impl fmt::Debug for MessageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageStore({})", self.inner.label)
    }
}

#[async_trait::async_trait(?Send)]
impl Replica for MessageStore {
    async fn call(&self, call: &MethodCall) -> Result<serde_json::Value, InvocationError> {
        match call.method.as_str() {
            "setMessage" => {
                let (message,): (String,) = call.decode_args()?;
                self.set_message(message)
                    .await
                    .map_err(|e| InvocationError::Failed(e.to_string()))?;
                Ok(serde_json::Value::Null)
            }
            "getMessage" => {
                let message = self
                    .get_message()
                    .await
                    .map_err(|e| InvocationError::Failed(e.to_string()))?;
                Ok(serde_json::to_value(message)?)
            }
            other => Err(InvocationError::UnknownMethod(other.to_string())),
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Run `test` inside a `LocalSet` so background tasks can be spawned.
pub async fn run_local<F: Future>(test: F) -> F::Output {
    init_tracing();
    tokio::task::LocalSet::new().run_until(test).await
}

/// Yield until `condition` holds, giving spawned tasks a chance to run.
pub async fn settle(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..64 {
        if condition() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    condition()
}

/// One tracing event, fields rendered to strings.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Events seen by the thread-local subscriber from [`CapturedEvents::install`].
#[derive(Clone, Default)]
pub struct CapturedEvents {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedEvents {
    /// Route this thread's events here until the guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(CaptureLayer {
            events: self.clone(),
        });
        tracing::subscriber::set_default(subscriber)
    }

    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .expect("capture lock")
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }
}

struct CaptureLayer {
    events: CapturedEvents,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events
            .events
            .lock()
            .expect("capture lock")
            .push(CapturedEvent {
                level: *event.metadata().level(),
                message: visitor.message.unwrap_or_default(),
                fields: visitor.fields,
            });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: HashMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }
}
