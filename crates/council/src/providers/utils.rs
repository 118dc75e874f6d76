use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{CallError, CallResult};
use crate::models::message::Message;

const MAX_DETAIL_CHARS: usize = 500;

/// Convert internal Message format to OpenAI's API message specification
///   content is passed through untouched, so structured parts keep their exact shape
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            json!({
                "role": message.role,
                "content": message.content,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Parse and validate a chat completion body, returning the message of the first choice
pub fn openai_response_to_message(body: &[u8]) -> CallResult<Message> {
    let response: Value = serde_json::from_slice(body).map_err(|e| {
        CallError::invalid_response(format!(
            "body is not json ({}): {}",
            e,
            truncate_detail(&String::from_utf8_lossy(body))
        ))
    })?;

    // Some gateways answer 200 with an error object instead of choices
    if let Some(error) = response.get("error") {
        if response.get("choices").is_none() {
            return Err(CallError::invalid_response(format!(
                "error payload in place of choices: {}",
                truncate_detail(&error.to_string())
            )));
        }
    }

    let completion: ChatCompletion = serde_json::from_value(response).map_err(|e| {
        CallError::invalid_response(format!("unexpected chat completion layout: {}", e))
    })?;

    completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| CallError::invalid_response("response contained no choices"))
}

/// Shorten response text for diagnostics, respecting char boundaries
pub fn truncate_detail(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
