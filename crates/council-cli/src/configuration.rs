use crate::error::{to_env_var, ConfigError, ENV_PREFIX};
use config::{Config, Environment, File, FileFormat};
use council::providers::{
    configs::{OpenRouterProviderConfig, DEFAULT_REFERER, DEFAULT_TITLE, OPENROUTER_HOST},
    retry::RetryPolicy,
};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Conventional variable for the credential, read when no council-specific key is set
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

const DEFAULT_CONFIG_FILE: &str = "council";

#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    pub host: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub referer: String,
    pub title: String,
    pub max_attempts: u32,
    pub rate_limit_delay_ms: u64,
    pub transport_delay_ms: u64,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            rate_limit_base_delay: Duration::from_millis(self.rate_limit_delay_ms),
            transport_base_delay: Duration::from_millis(self.transport_delay_ms),
        }
    }

    // Convert to the council provider config
    pub fn to_config(&self) -> OpenRouterProviderConfig {
        let mut config = OpenRouterProviderConfig::new(self.host.clone(), self.api_key.clone())
            .with_retry(self.retry_policy());
        config.referer = self.referer.clone();
        config.title = self.title.clone();
        config
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub members: Vec<String>,
    pub chairman: String,
}

impl Settings {
    /// Layer defaults, a toml file and the environment, in that order
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::new(&path.to_string_lossy(), FileFormat::Toml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let config = Config::builder()
            // Provider defaults
            .set_default("provider.host", OPENROUTER_HOST)?
            .set_default("provider.timeout_secs", 120)?
            .set_default("provider.referer", DEFAULT_REFERER)?
            .set_default("provider.title", DEFAULT_TITLE)?
            .set_default("provider.max_attempts", 3)?
            .set_default("provider.rate_limit_delay_ms", 2000)?
            .set_default("provider.transport_delay_ms", 1000)?
            // Council defaults
            .set_default("members", default_members())?
            .set_default("chairman", default_chairman())?
            .add_source(file)
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("members")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Self = match config.try_deserialize() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                let error_str = err.to_string();
                if error_str.starts_with("missing field") {
                    // Extract field name from error message "missing field `host`"
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .trim_end_matches('`');
                    return Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    });
                }
                return Err(ConfigError::Other(err));
            }
        };

        let has_key = settings
            .provider
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if !has_key {
            settings.provider.api_key = env::var(API_KEY_ENV).ok();
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if self.members.iter().all(|member| member.trim().is_empty()) {
            return Err(invalid("members", "at least one council member is required"));
        }
        if self.members.iter().any(|member| member.trim().is_empty()) {
            return Err(invalid("members", "member identifiers must not be empty"));
        }
        if self.chairman.trim().is_empty() {
            return Err(invalid("chairman", "a chairman model is required"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(invalid("provider.timeout_secs", "must be greater than zero"));
        }
        if self.provider.max_attempts == 0 {
            return Err(invalid("provider.max_attempts", "must be at least 1"));
        }
        Ok(())
    }
}

fn default_members() -> Vec<String> {
    vec![
        "google/gemini-2.0-flash-exp:free".to_string(),
        "meta-llama/llama-3.2-11b-vision-instruct:free".to_string(),
        "microsoft/phi-3-medium-128k-instruct:free".to_string(),
        "google/gemini-flash-1.5".to_string(),
    ]
}

fn default_chairman() -> String {
    "google/gemini-2.0-flash-exp:free".to_string()
}
