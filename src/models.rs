//! Listing the models the completion service can route to.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

pub const DEFAULT_MODELS_ENDPOINT: &str = "https://huggingface.co/api/models";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOption {
    pub id: String,
    pub name: String,
    pub providers: Vec<String>,
}

impl ModelOption {
    fn new(id: &str, name: &str, provider: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            providers: vec![provider.to_string()],
        }
    }
}

/// Used whenever the catalogue endpoint is unavailable or yields nothing usable.
pub fn fallback_models() -> Vec<ModelOption> {
    vec![
        ModelOption::new("openai/gpt-4o", "GPT-4o", "OpenAI"),
        ModelOption::new("openai/gpt-4o-mini", "GPT-4o Mini", "OpenAI"),
        ModelOption::new("anthropic/claude-sonnet-4", "Claude Sonnet 4", "Anthropic"),
        ModelOption::new("google/gemini-2.0-flash-001", "Gemini 2.0 Flash", "Google"),
        ModelOption::new(
            "meta-llama/Llama-3.3-70B-Instruct",
            "Llama 3.3 70B Instruct",
            "Meta",
        ),
        ModelOption::new(
            "mistralai/Mistral-Small-24B-Instruct-2501",
            "Mistral Small 24B",
            "Mistral",
        ),
        ModelOption::new("Qwen/Qwen2.5-72B-Instruct", "Qwen 2.5 72B Instruct", "Qwen"),
    ]
}

#[derive(Debug, Deserialize)]
pub struct HubModel {
    pub id: String,
    #[serde(default, rename = "modelId")]
    pub model_id: Option<String>,
    #[serde(default)]
    pub inference: Option<HubInference>,
    #[serde(default)]
    pub inference_provider_mapping: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
pub struct HubInference {
    #[serde(default)]
    pub providers: Vec<String>,
}

/// Fetch the model list. Never fails: errors fall back to [`fallback_models`].
pub async fn list_models(
    endpoint: &str,
    api_key: Option<&str>,
    timeout: Duration,
) -> Vec<ModelOption> {
    match fetch_hub_models(endpoint, api_key, timeout).await {
        Ok(raw) if !raw.is_empty() => {
            let models = select_models(raw);
            if models.is_empty() {
                warn!("no models matched filter, using fallback");
                fallback_models()
            } else {
                models
            }
        }
        Ok(_) => {
            warn!("model catalogue returned no data, using fallback");
            fallback_models()
        }
        Err(err) => {
            warn!(error = %err, "model catalogue unavailable, using fallback");
            fallback_models()
        }
    }
}

async fn fetch_hub_models(
    endpoint: &str,
    api_key: Option<&str>,
    timeout: Duration,
) -> crate::Result<Vec<HubModel>> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut()
        .append_pair("inference_provider", "all")
        .append_pair("pipeline_tag", "text-generation")
        .append_pair("sort", "downloads")
        .append_pair("direction", "-1")
        .append_pair("limit", "100");

    let http = Client::builder().timeout(timeout).build()?;
    let mut request = http.get(url);
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(crate::BuildError::completion(
            Some(status),
            format!("model catalogue returned {status}"),
        ));
    }
    Ok(response.json().await?)
}

/// Keep models with an inference provider, deduplicated by id and sorted by name.
pub fn select_models(raw: Vec<HubModel>) -> Vec<ModelOption> {
    let mut by_id: BTreeMap<String, ModelOption> = BTreeMap::new();

    for model in raw {
        let model_id = model.model_id.unwrap_or(model.id);

        let mut providers: Vec<String> = model
            .inference
            .map(|inference| inference.providers)
            .unwrap_or_default();
        if let Some(mapping) = model.inference_provider_mapping {
            providers.extend(mapping.into_keys());
        }
        if providers.is_empty() {
            continue;
        }

        let router_id = if model_id.contains('/') {
            model_id.clone()
        } else {
            format!("huggingface/{model_id}")
        };
        let labels: BTreeSet<String> = providers.iter().map(|p| provider_label(p)).collect();

        by_id.insert(
            router_id.clone(),
            ModelOption {
                id: router_id,
                name: format_model_name(&model_id),
                providers: labels.into_iter().collect(),
            },
        );
    }

    let mut models: Vec<ModelOption> = by_id.into_values().collect();
    models.sort_by(|a, b| a.name.cmp(&b.name));
    models
}

/// `meta-llama/llama-3-8b-instruct` becomes `Llama 3 8B Instruct`.
pub fn format_model_name(id: &str) -> String {
    let base = id.rsplit('/').next().unwrap_or(id);
    base.split('-')
        .filter(|word| !word.is_empty())
        .map(format_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower == "instruct" {
        return "Instruct".to_string();
    }
    if lower == "chat" {
        return "Chat".to_string();
    }
    // Parameter counts: 70b -> 70B
    if let Some(digits) = lower.strip_suffix('b') {
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return format!("{digits}B");
        }
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `fireworks-ai` becomes `Fireworks Ai`; `org/model` ids use the org part.
pub fn provider_label(id: &str) -> String {
    let provider = id.split_once('/').map_or(id, |(org, _)| org);
    if provider.trim().is_empty() {
        return "HuggingFace".to_string();
    }
    capitalize_words(provider)
}

fn capitalize_words(value: &str) -> String {
    value
        .split('-')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
