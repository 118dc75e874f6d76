use super::retry::RetryPolicy;

pub const OPENROUTER_HOST: &str = "https://openrouter.ai";
pub const CHAT_COMPLETIONS_PATH: &str = "/api/v1/chat/completions";
pub const DEFAULT_REFERER: &str = "https://github.com/llm-council/council";
pub const DEFAULT_TITLE: &str = "LLM Council";

// Connection details for an openai-compatible chat completion endpoint
#[derive(Clone)]
pub struct OpenRouterProviderConfig {
    pub host: String,
    pub api_key: Option<String>,
    pub referer: String,
    pub title: String,
    pub retry: RetryPolicy,
}

impl OpenRouterProviderConfig {
    pub fn new(host: String, api_key: Option<String>) -> Self {
        Self {
            host,
            api_key,
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.host.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }

    /// The credential, treating an empty string the same as an absent one
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

impl std::fmt::Debug for OpenRouterProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterProviderConfig")
            .field("host", &self.host)
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("referer", &self.referer)
            .field("title", &self.title)
            .field("retry", &self.retry)
            .finish()
    }
}
