use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::errors::CallError;
use crate::models::message::Message;
use crate::models::outcome::CallOutcome;
use crate::providers::base::ModelCaller;

/// What a mocked model does when called
#[derive(Clone)]
pub enum MockReply {
    Answer { text: String, delay: Duration },
    Fail { reason: CallError, delay: Duration },
    Panic,
}

impl MockReply {
    pub fn answer<S: Into<String>>(text: S) -> Self {
        MockReply::Answer {
            text: text.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn fail(reason: CallError) -> Self {
        MockReply::Fail {
            reason,
            delay: Duration::ZERO,
        }
    }

    pub fn after(self, wait: Duration) -> Self {
        match self {
            MockReply::Answer { text, .. } => MockReply::Answer { text, delay: wait },
            MockReply::Fail { reason, .. } => MockReply::Fail {
                reason,
                delay: wait,
            },
            MockReply::Panic => MockReply::Panic,
        }
    }
}

/// A mock caller that replies per model with pre-configured outcomes for testing
#[derive(Default)]
pub struct MockCaller {
    replies: HashMap<String, MockReply>,
    calls: AtomicUsize,
    conversations: Mutex<Vec<(String, Vec<Message>)>>,
}

impl MockCaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply<S: Into<String>>(mut self, model: S, reply: MockReply) -> Self {
        self.replies.insert(model.into(), reply);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every (model, conversation) pair received, in call order
    pub fn received(&self) -> Vec<(String, Vec<Message>)> {
        self.conversations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelCaller for MockCaller {
    async fn call(
        &self,
        model: &str,
        conversation: &[Message],
        _timeout: Duration,
    ) -> CallOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.conversations
            .lock()
            .unwrap()
            .push((model.to_string(), conversation.to_vec()));

        match self.replies.get(model).cloned() {
            Some(MockReply::Answer { text, delay }) => {
                tokio::time::sleep(delay).await;
                CallOutcome::success(Message::assistant(text))
            }
            Some(MockReply::Fail { reason, delay }) => {
                tokio::time::sleep(delay).await;
                CallOutcome::failure(reason)
            }
            Some(MockReply::Panic) => panic!("mock model {} panicked", model),
            None => CallOutcome::failure(CallError::Upstream {
                status: 404,
                detail: format!("no mock reply for {}", model),
            }),
        }
    }
}
