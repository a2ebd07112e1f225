//! Defines the `EndpointInvoker` trait, the authenticated transport seam.

use crate::error::Result;
use crate::model::params::Params;
use async_trait::async_trait;
use serde_json::Value;

/// Sends a request to a named endpoint and returns the decoded body.
///
/// Implementors own signing, transport and error mapping. Callers choose the
/// endpoint through the implementor's own typed identifier rather than a
/// method name.
#[async_trait]
pub trait EndpointInvoker: Send + Sync {
    /// The set of endpoints this client can reach.
    type Endpoint: Send + 'static;

    /// Invokes `endpoint` with `params` as its query or body.
    ///
    /// # Returns
    ///
    /// * `Value` - The response body, unmodified.
    async fn invoke(&self, endpoint: Self::Endpoint, params: Params) -> Result<Value>;
}
