//! The council fans one conversation out to every member model at once, waits for all of them
//! to settle, and hands back each member's outcome in the order the members were named.
//!
//! A chairman model can then be asked to synthesize one answer from the collected replies.
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::errors::CallError;
use crate::models::message::Message;
use crate::models::outcome::CallOutcome;
use crate::providers::base::ModelCaller;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// One member's entry in a fan-out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberOutcome {
    pub model: String,
    pub outcome: CallOutcome,
}

/// Outcomes of a fan-out, one entry per requested model in request order
///
/// A model named twice gets two independent entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FanOutResult {
    entries: Vec<MemberOutcome>,
}

impl FanOutResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemberOutcome> {
        self.entries.iter()
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.model.as_str())
    }

    /// Outcome of the first entry for `model`
    pub fn get(&self, model: &str) -> Option<&CallOutcome> {
        self.entries
            .iter()
            .find(|entry| entry.model == model)
            .map(|entry| &entry.outcome)
    }

    pub fn get_all<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a CallOutcome> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.model == model)
            .map(|entry| &entry.outcome)
    }

    pub fn successes(&self) -> impl Iterator<Item = &MemberOutcome> {
        self.entries.iter().filter(|entry| entry.outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &CallError)> {
        self.entries.iter().filter_map(|entry| {
            entry
                .outcome
                .reason()
                .map(|reason| (entry.model.as_str(), reason))
        })
    }

    pub fn into_entries(self) -> Vec<MemberOutcome> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a FanOutResult {
    type Item = &'a MemberOutcome;
    type IntoIter = std::slice::Iter<'a, MemberOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A full round: every member's reply plus the chairman's synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliberation {
    pub question: String,
    pub responses: FanOutResult,
    pub synthesis: CallOutcome,
}

pub struct Council<C: ModelCaller + 'static> {
    caller: Arc<C>,
    timeout: Duration,
}

impl<C: ModelCaller + 'static> Council<C> {
    pub fn new(caller: Arc<C>) -> Self {
        Self {
            caller,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Per-attempt network timeout handed to every member call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn caller(&self) -> &C {
        &self.caller
    }

    /// Ask every model concurrently and wait for all of them to reach an outcome
    pub async fn dispatch(&self, models: &[String], conversation: &[Message]) -> FanOutResult {
        if models.is_empty() {
            return FanOutResult::default();
        }

        info!(members = models.len(), "dispatching conversation to council");

        let conversation: Arc<[Message]> = Arc::from(conversation);
        let mut join_set = JoinSet::new();

        for (index, model) in models.iter().enumerate() {
            let caller = Arc::clone(&self.caller);
            let conversation = Arc::clone(&conversation);
            let model = model.clone();
            let timeout = self.timeout;

            join_set.spawn(async move {
                let outcome = caller.call(&model, &conversation, timeout).await;
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<CallOutcome>> = vec![None; models.len()];

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => warn!("council member task did not complete: {}", e),
            }
        }

        let entries: Vec<MemberOutcome> = models
            .iter()
            .zip(slots)
            .map(|(model, slot)| MemberOutcome {
                model: model.clone(),
                outcome: slot.unwrap_or_else(|| {
                    CallOutcome::failure(CallError::TaskAborted {
                        detail: format!("call to {} ended without an outcome", model),
                    })
                }),
            })
            .collect();

        let succeeded = entries.iter().filter(|e| e.outcome.is_success()).count();
        info!(
            members = entries.len(),
            succeeded,
            failed = entries.len() - succeeded,
            "council responses collected"
        );

        FanOutResult { entries }
    }

    /// Ask the chairman to merge the successful member replies into one answer
    pub async fn synthesize(
        &self,
        chairman: &str,
        question: &str,
        results: &FanOutResult,
    ) -> CallOutcome {
        let Some(prompt) = chairman_prompt(question, results) else {
            warn!(chairman, "no council member answered, skipping synthesis");
            return CallOutcome::failure(CallError::invalid_request(
                "no council member produced an answer to synthesize",
            ));
        };

        info!(chairman, "requesting chairman synthesis");
        self.caller
            .call(chairman, &[Message::user(prompt)], self.timeout)
            .await
    }

    /// Dispatch a single question to the members, then synthesize with the chairman
    pub async fn deliberate(
        &self,
        members: &[String],
        chairman: &str,
        question: &str,
    ) -> Deliberation {
        let conversation = vec![Message::user(question)];
        let responses = self.dispatch(members, &conversation).await;
        let synthesis = self.synthesize(chairman, question, &responses).await;

        Deliberation {
            question: question.to_string(),
            responses,
            synthesis,
        }
    }
}

/// Build the chairman's prompt, or None when there is nothing to synthesize
pub fn chairman_prompt(question: &str, results: &FanOutResult) -> Option<String> {
    let answers: Vec<String> = results
        .successes()
        .filter_map(|entry| {
            entry
                .outcome
                .text()
                .map(|text| format!("Answer from {}:\n{}", entry.model, text.trim()))
        })
        .collect();

    if answers.is_empty() {
        return None;
    }

    Some(format!(
        "You are the chairman of a council of language models. \
         Each member answered the question below independently.\n\
         Combine their answers into a single response that is accurate and complete, \
         resolving any disagreements between them.\n\n\
         Question:\n{}\n\n{}\n\nFinal answer:",
        question.trim(),
        answers.join("\n\n")
    ))
}
