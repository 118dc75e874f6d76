use serde::{Deserialize, Serialize};

use super::message::{Message, MessageContent};
use super::role::Role;
use crate::errors::{CallError, CallResult};

/// The terminal result of asking one model: its normalized reply, or why there is none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CallOutcome {
    Success { role: Role, content: MessageContent },
    Failure { reason: CallError },
}

impl CallOutcome {
    pub fn success(message: Message) -> Self {
        CallOutcome::Success {
            role: message.role,
            content: message.content,
        }
    }

    pub fn failure(reason: CallError) -> Self {
        CallOutcome::Failure { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success { .. })
    }

    /// The reply as a message, if the call succeeded
    pub fn message(&self) -> Option<Message> {
        match self {
            CallOutcome::Success { role, content } => Some(Message::new(*role, content.clone())),
            CallOutcome::Failure { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&CallError> {
        match self {
            CallOutcome::Success { .. } => None,
            CallOutcome::Failure { reason } => Some(reason),
        }
    }

    pub fn text(&self) -> Option<String> {
        match self {
            CallOutcome::Success { content, .. } => Some(content.as_text()),
            CallOutcome::Failure { .. } => None,
        }
    }
}

impl From<CallResult<Message>> for CallOutcome {
    fn from(result: CallResult<Message>) -> Self {
        match result {
            Ok(message) => CallOutcome::success(message),
            Err(reason) => CallOutcome::failure(reason),
        }
    }
}
