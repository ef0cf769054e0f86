//! OpenAI-compatible chat-completions backend with an offline fallback mode.
use bevy::log::warn;
use reqwest::{
    blocking::Client,
    header::{HeaderMap, RETRY_AFTER},
    StatusCode,
};
use serde::{Deserialize, Serialize};

use super::{
    config::{GenerationConfigError, GenerationServiceConfig},
    DialogueBroker, DialogueProviderKind, GenerationContext, OfflineDialogueBroker,
};
use crate::dialogue::errors::DialogueError;

const DEFAULT_RATE_LIMIT_BACKOFF: f32 = 10.0;
const SYSTEM_PROMPT_TEMPLATE: &str = "You are {name}, {persona}, living in a remote wilderness \
settlement. Stay in character and answer in one or two short sentences. Reply with a single JSON \
object of the form {\"response\": \"<your line>\"} and nothing else.";

/// Primary generation broker: live HTTP client when configured, offline
/// fabrication otherwise.
pub struct OpenAiDialogueBroker {
    mode: BrokerMode,
}

enum BrokerMode {
    Live(LiveClient),
    Fallback(OfflineDialogueBroker),
}

impl OpenAiDialogueBroker {
    pub fn new() -> Self {
        match GenerationServiceConfig::from_env() {
            Ok(config) => match LiveClient::new(config) {
                Ok(client) => Self {
                    mode: BrokerMode::Live(client),
                },
                Err(err) => {
                    warn!("Generation client unavailable ({}); using offline replies.", err);
                    Self::offline()
                }
            },
            Err(GenerationConfigError::MissingApiKey) => {
                warn!("OPENAI_API_KEY not set; dialogue uses offline replies.");
                Self::offline()
            }
            Err(err) => {
                warn!("Generation config invalid ({}); using offline replies.", err);
                Self::offline()
            }
        }
    }

    fn offline() -> Self {
        Self {
            mode: BrokerMode::Fallback(OfflineDialogueBroker),
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_live(&self) -> bool {
        matches!(self.mode, BrokerMode::Live(_))
    }
}

impl Default for OpenAiDialogueBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogueBroker for OpenAiDialogueBroker {
    fn provider_kind(&self) -> DialogueProviderKind {
        match self.mode {
            BrokerMode::Live(_) => DialogueProviderKind::OpenAi,
            BrokerMode::Fallback(_) => DialogueProviderKind::Offline,
        }
    }

    fn generate(&self, context: &GenerationContext) -> Result<String, DialogueError> {
        if context.player_line.trim().is_empty() {
            return Err(DialogueError::provider_failure("player line cannot be empty"));
        }

        match &self.mode {
            BrokerMode::Live(client) => client.send(context),
            BrokerMode::Fallback(offline) => offline.generate(context),
        }
    }
}

struct LiveClient {
    http: Client,
    config: GenerationServiceConfig,
}

impl LiveClient {
    fn new(config: GenerationServiceConfig) -> Result<Self, GenerationConfigError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| GenerationConfigError::ClientBuild(err.to_string()))?;

        Ok(Self { http, config })
    }

    fn send(&self, context: &GenerationContext) -> Result<String, DialogueError> {
        let payload = CompletionRequest {
            model: self.config.model.as_str(),
            messages: build_messages(context),
            max_tokens: Some(self.config.max_output_tokens.into()),
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post(self.config.chat_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .map_err(|err| DialogueError::provider_failure(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after =
                parse_retry_after(response.headers()).unwrap_or(DEFAULT_RATE_LIMIT_BACKOFF);
            return Err(DialogueError::rate_limited(retry_after));
        }

        if !status.is_success() {
            let detail = response
                .json::<ServiceErrorBody>()
                .map(|body| body.error.message)
                .unwrap_or_else(|_| format!("HTTP {} from generation service", status));
            return Err(DialogueError::provider_failure(detail));
        }

        let completion: CompletionResponse = response
            .json()
            .map_err(|err| DialogueError::provider_failure(err.to_string()))?;

        completion
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(DialogueError::EmptyCompletion)
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<f32> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|text| text.parse::<f32>().ok())
}

fn build_messages(context: &GenerationContext) -> Vec<WireMessage> {
    let system = SYSTEM_PROMPT_TEMPLATE
        .replace("{name}", &context.speaker_name)
        .replace("{persona}", &context.persona);

    vec![
        WireMessage {
            role: "system",
            content: system,
        },
        WireMessage {
            role: "user",
            content: build_user_message(context),
        },
    ]
}

fn build_user_message(context: &GenerationContext) -> String {
    let mut lines = Vec::new();
    if let Some(previous) = &context.previous_line {
        if !previous.trim().is_empty() {
            lines.push(format!("You previously said: \"{}\"", previous.trim()));
        }
    }
    lines.push(format!(
        "The traveler says to you: \"{}\"",
        context.player_line.trim()
    ));
    lines.join("\n")
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(rename = "max_tokens")]
    max_tokens: Option<u32>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: ServiceErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorDetail {
    message: String,
}
