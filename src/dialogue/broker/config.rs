//! Generation service configuration sourced from the environment.
use std::{env, fmt, str::FromStr, time::Duration};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.8;
const DEFAULT_MAX_OUTPUT_TOKENS: u16 = 160;
const DEFAULT_TIMEOUT_SECS: u64 = 12;

/// Chat-completions service settings, read once at startup.
#[derive(Debug, Clone)]
pub struct GenerationServiceConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u16,
    pub timeout: Duration,
}

impl GenerationServiceConfig {
    pub fn from_env() -> Result<Self, GenerationConfigError> {
        let api_key = env_trimmed("OPENAI_API_KEY").ok_or(GenerationConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            base_url: env_trimmed("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            model: env_trimmed("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            temperature: env_parsed("OPENAI_TEMPERATURE")
                .filter(|value: &f32| *value >= 0.0)
                .unwrap_or(DEFAULT_TEMPERATURE),
            max_output_tokens: env_parsed("OPENAI_MAX_OUTPUT_TOKENS")
                .filter(|value: &u16| *value > 0)
                .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            timeout: env_parsed("OPENAI_TIMEOUT_SECS")
                .filter(|value: &u64| *value > 0)
                .map(Duration::from_secs)
                .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        })
    }

    pub fn chat_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }
}

fn env_trimmed(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parsed<T: FromStr>(name: &str) -> Option<T> {
    env_trimmed(name).and_then(|value| value.parse::<T>().ok())
}

/// Reasons the live client cannot be constructed.
#[derive(Debug)]
pub enum GenerationConfigError {
    MissingApiKey,
    ClientBuild(String),
}

impl fmt::Display for GenerationConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "missing OPENAI_API_KEY"),
            Self::ClientBuild(message) => write!(f, "client build failure: {}", message),
        }
    }
}

impl std::error::Error for GenerationConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_base(base_url: &str) -> GenerationServiceConfig {
        GenerationServiceConfig {
            api_key: "test-key".into(),
            base_url: base_url.into(),
            model: DEFAULT_MODEL.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[test]
    fn chat_url_strips_trailing_slash() {
        let config = config_with_base("https://proxy.example/");
        assert_eq!(
            config.chat_url(),
            "https://proxy.example/v1/chat/completions"
        );
    }

    #[test]
    fn chat_url_keeps_bare_base() {
        let config = config_with_base("https://proxy.example");
        assert_eq!(
            config.chat_url(),
            "https://proxy.example/v1/chat/completions"
        );
    }
}
