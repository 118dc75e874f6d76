use thiserror::Error;

pub const ENV_PREFIX: &str = "COUNCIL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting, set the {env_var} environment variable")]
    MissingEnvVar { env_var: String },

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Map a dotted settings path to the environment variable that sets it
pub fn to_env_var(field: &str) -> String {
    format!(
        "{}_{}",
        ENV_PREFIX,
        field.replace('.', "__").to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_env_var() {
        assert_eq!(to_env_var("provider.api_key"), "COUNCIL_PROVIDER__API_KEY");
        assert_eq!(to_env_var("chairman"), "COUNCIL_CHAIRMAN");
    }
}
