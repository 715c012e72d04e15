//! Client for the LLM completion service that turns a node sub-document into
//! component source code.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{BuildError, Result};

pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://router.huggingface.co/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

const PROMPT_PREFIX: &str =
    "Convert this Figma JSON to a React TS component with Tailwind v4 classes. Output only the code:";

/// One code-generation call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub figma_json: Value,
    pub component_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Anything that can turn a sub-document into code.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Settings for [`CompletionClient`].
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// OpenAI-compatible chat-completions endpoint
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Model used when a request does not name one
    pub model: String,
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(BuildError::Network)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    model: &'a str,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[async_trait]
impl CodeGenerator for CompletionClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let model = request
            .model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(&self.config.model);
        let payload = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(&request.figma_json)?,
            }],
            model,
            stream: false,
        };

        debug!(model, component = %request.component_name, "requesting completion");
        let mut builder = self.http.post(&self.config.endpoint).json(&payload);
        if let Some(key) = self.config.api_key.as_deref() {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(BuildError::Network)?;
        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return Err(BuildError::completion(
                Some(status),
                format!("HF API error: {reason}"),
            ));
        }

        let body: ChatResponse = response.json().await.map_err(BuildError::Network)?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BuildError::completion(None, "completion response had no content"))?;

        Ok(strip_code_fence(&content))
    }
}

/// Prompt sent for one sub-document.
pub fn build_prompt(figma_json: &Value) -> Result<String> {
    let pretty = serde_json::to_string_pretty(figma_json)?;
    Ok(format!("{PROMPT_PREFIX}\n{pretty}"))
}

/// Remove a surrounding Markdown code fence, if the reply has one.
///
/// The fence is only stripped when the first line opens it (```` ``` ```` with
/// an optional language tag) and the last line is exactly ```` ``` ````.
pub fn strip_code_fence(content: &str) -> String {
    let code = content.trim();
    let lines: Vec<&str> = code.lines().collect();
    match (lines.first(), lines.last()) {
        (Some(first), Some(last)) if lines.len() >= 2 && first.starts_with("```") && *last == "```" => {
            lines[1..lines.len() - 1].join("\n").trim().to_string()
        }
        _ => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fence_with_language_tag() {
        let reply = "```tsx\nexport const A = () => <div />;\n```";
        assert_eq!(strip_code_fence(reply), "export const A = () => <div />;");
    }

    #[test]
    fn strips_fence_after_trimming_whitespace() {
        let reply = "\n\n```\nconst x = 1;\n\nconst y = 2;\n```\n  ";
        assert_eq!(strip_code_fence(reply), "const x = 1;\n\nconst y = 2;");
    }

    #[test]
    fn leaves_unfenced_code_alone() {
        assert_eq!(strip_code_fence("  const x = 1;  "), "const x = 1;");
    }

    #[test]
    fn leaves_half_fenced_code_alone() {
        let reply = "```tsx\nconst x = 1;";
        assert_eq!(strip_code_fence(reply), reply);
        let reply = "const x = 1;\n```";
        assert_eq!(strip_code_fence(reply), reply);
    }

    #[test]
    fn lone_fence_line_is_not_stripped() {
        assert_eq!(strip_code_fence("```"), "```");
    }

    #[test]
    fn prompt_embeds_pretty_json() {
        let prompt = build_prompt(&serde_json::json!({"id": "1:2", "type": "FRAME"})).unwrap();
        assert!(prompt.starts_with(PROMPT_PREFIX));
        assert!(prompt.contains("\"id\": \"1:2\""));
    }

    #[test]
    fn generation_request_serializes_camel_case() {
        let req = GenerationRequest {
            figma_json: serde_json::json!({}),
            component_name: "Button".into(),
            model: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"figmaJson\""));
        assert!(json.contains("\"componentName\":\"Button\""));
        assert!(!json.contains("model"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let client = CompletionClient::new(CompletionConfig {
            endpoint: "http://127.0.0.1:1/v1/chat/completions".into(),
            timeout: Duration::from_secs(2),
            ..CompletionConfig::default()
        })
        .expect("client");
        let result = client
            .generate(&GenerationRequest {
                figma_json: serde_json::json!({}),
                component_name: "X".into(),
                model: None,
            })
            .await;
        assert!(matches!(result, Err(BuildError::Network(_))));
    }
}
