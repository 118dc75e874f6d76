use async_trait::async_trait;
use std::time::Duration;

use crate::models::message::Message;
use crate::models::outcome::CallOutcome;

/// Base trait for anything that can answer on behalf of a council member
///
/// Implementations never fail past this boundary: every problem, including a missing
/// credential, comes back as `CallOutcome::Failure`.
#[async_trait]
pub trait ModelCaller: Send + Sync {
    /// Ask `model` to reply to `conversation`, bounding each network attempt by `timeout`
    async fn call(&self, model: &str, conversation: &[Message], timeout: Duration)
        -> CallOutcome;
}
