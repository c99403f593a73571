//! Message-level replica calls.
//!
//! Typed handles are broadcast through closures (see
//! [`BroadcastDispatcher::invoke`](crate::broadcast::BroadcastDispatcher::invoke)).
//! Runtimes that address actors by method name with serialized arguments
//! implement [`Replica`] instead and broadcast a [`MethodCall`] as is.

use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::InvocationError;

/// A method name plus its JSON-encoded argument list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Method to invoke on the replica.
    pub method: String,
    /// Positional arguments.
    pub args: serde_json::Value,
}

impl MethodCall {
    /// Encode a call. `args` is usually a tuple or an array.
    pub fn new(method: impl Into<String>, args: impl Serialize) -> Result<Self, InvocationError> {
        Ok(Self {
            method: method.into(),
            args: serde_json::to_value(args)?,
        })
    }

    /// Decode the arguments into the callee's parameter type.
    pub fn decode_args<T: DeserializeOwned>(&self) -> Result<T, InvocationError> {
        Ok(T::deserialize(&self.args)?)
    }
}

/// A remote actor reachable by method name.
#[async_trait::async_trait(?Send)]
pub trait Replica: fmt::Debug {
    /// Run `call` on this replica and return its JSON result.
    async fn call(&self, call: &MethodCall) -> Result<serde_json::Value, InvocationError>;
}

#[async_trait::async_trait(?Send)]
impl<R: Replica + ?Sized> Replica for Rc<R> {
    async fn call(&self, call: &MethodCall) -> Result<serde_json::Value, InvocationError> {
        (**self).call(call).await
    }
}
