//! Thin asynchronous wrapper around the Azure OpenAI API.
//!
//! Pass-through only: each method maps to a single SDK request with no retry,
//! backoff, or circuit breaking. Failures are logged at error severity and
//! returned unchanged. An optional per-request timeout can be set through
//! `services.azure_openai.request_timeout_secs`; without it a call waits as
//! long as the SDK does.

use std::{future::Future, sync::Arc, time::Duration};

use async_openai::{
    Client,
    config::AzureConfig,
    error::OpenAIError,
    types::{
        CreateCompletionRequest, CreateEmbeddingRequest, EmbeddingInput, Prompt, Stop,
    },
};
use secrecy::ExposeSecret;
use tokio::time::timeout;
use tracing::{debug, error, info};

use super::registry::ServiceRegistration;
use super::types::{ServiceError, ServiceResult, SharedService};
use crate::config::{AzureOpenAiSettings, Settings};

/// Container key for the built-in instance.
pub const SERVICE_NAME: &str = "azure_openai";

/// API version used when the configuration does not pin one.
const DEFAULT_API_VERSION: &str = "2023-05-15";

/// Options for [`AzureOpenAiService::generate_text`].
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub n: u8,
    pub stop: Option<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_tokens: 100,
            temperature: 0.7,
            n: 1,
            stop: None,
        }
    }
}

/// Full option set for [`AzureOpenAiService::generate_text_custom`].
///
/// Unset fields are omitted from the request and resolved by the API.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub n: Option<u8>,
    pub stop: Option<String>,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub suffix: Option<String>,
    pub user: Option<String>,
}

/// Azure OpenAI client for text completion and embedding.
#[derive(Debug)]
pub struct AzureOpenAiService {
    client: Client<AzureConfig>,
    deployment: String,
    request_timeout: Option<Duration>,
}

impl AzureOpenAiService {
    /// Build a client from the `azure_openai` section of `settings`.
    pub fn new(settings: &Settings) -> ServiceResult<Self> {
        let section: AzureOpenAiSettings = settings.service(SERVICE_NAME)?;
        Self::from_settings(section)
    }

    /// Build a client from an explicit section.
    ///
    /// `endpoint`, `api_key` and `deployment_name` are required; a missing
    /// field fails construction. The key is not held after the client is
    /// configured.
    pub fn from_settings(section: AzureOpenAiSettings) -> ServiceResult<Self> {
        let (Some(endpoint), Some(api_key), Some(deployment)) =
            (section.endpoint, section.api_key, section.deployment_name)
        else {
            error!("Azure OpenAI configuration is missing");
            return Err(ServiceError::IncompleteConfig(
                "azure_openai requires endpoint, api_key and deployment_name".to_string(),
            ));
        };

        let api_version = section
            .api_version
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let config = AzureConfig::new()
            .with_api_base(&endpoint)
            .with_api_key(api_key.expose_secret())
            .with_deployment_id(&deployment)
            .with_api_version(&api_version);

        info!(endpoint = %endpoint, deployment = %deployment, "Azure OpenAI client initialized");

        Ok(Self {
            client: Client::with_config(config),
            deployment,
            request_timeout: section.request_timeout_secs.map(Duration::from_secs),
        })
    }

    /// Text completion for `prompt`, returning the first choice trimmed.
    pub async fn generate_text(
        &self,
        prompt: &str,
        opts: GenerateOptions,
    ) -> ServiceResult<String> {
        debug!(prompt, "generating text");
        let request = CreateCompletionRequest {
            model: self.deployment.clone(),
            prompt: Prompt::String(prompt.to_string()),
            max_tokens: Some(opts.max_tokens),
            temperature: Some(opts.temperature),
            n: Some(opts.n),
            stop: opts.stop.map(Stop::String),
            ..Default::default()
        };
        self.completion(request).await
    }

    /// Embedding vector for `text`.
    pub async fn embed(&self, text: &str) -> ServiceResult<Vec<f32>> {
        debug!(text, "generating embedding");
        let request = CreateEmbeddingRequest {
            model: self.deployment.clone(),
            input: EmbeddingInput::String(text.to_string()),
            ..Default::default()
        };

        let response = self
            .with_timeout(self.client.embeddings().create(request))
            .await?;
        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or_else(|| ServiceError::EmptyResponse("no embedding data".to_string()))?;

        debug!(dimensions = embedding.len(), "generated embedding");
        Ok(embedding)
    }

    /// Text completion with the full option set.
    pub async fn generate_text_custom(
        &self,
        prompt: &str,
        opts: CompletionOptions,
    ) -> ServiceResult<String> {
        debug!("generating text from custom prompt");
        let request = CreateCompletionRequest {
            model: self.deployment.clone(),
            prompt: Prompt::String(prompt.to_string()),
            max_tokens: opts.max_tokens,
            temperature: opts.temperature,
            top_p: opts.top_p,
            n: opts.n,
            stop: opts.stop.map(Stop::String),
            presence_penalty: opts.presence_penalty,
            frequency_penalty: opts.frequency_penalty,
            suffix: opts.suffix,
            user: opts.user,
            ..Default::default()
        };
        self.completion(request).await
    }

    async fn completion(&self, request: CreateCompletionRequest) -> ServiceResult<String> {
        let response = self
            .with_timeout(self.client.completions().create(request))
            .await?;
        let text = response
            .choices
            .first()
            .map(|choice| choice.text.trim().to_string())
            .ok_or_else(|| ServiceError::EmptyResponse("no completion choices".to_string()))?;

        debug!(generated = %text, "generated text");
        Ok(text)
    }

    /// Await `call` under the configured timeout, logging failures before
    /// returning them.
    async fn with_timeout<T, F>(&self, call: F) -> ServiceResult<T>
    where
        F: Future<Output = Result<T, OpenAIError>>,
    {
        let result = match self.request_timeout {
            Some(limit) => match timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    error!(timeout_secs = limit.as_secs(), "Azure OpenAI request timed out");
                    return Err(ServiceError::Timeout(limit));
                }
            },
            None => call.await,
        };
        result.map_err(|e| {
            error!(error = %e, "Azure OpenAI request failed");
            ServiceError::Api(e)
        })
    }
}

fn construct(settings: &Settings) -> ServiceResult<SharedService> {
    Ok(Arc::new(AzureOpenAiService::new(settings)?))
}

/// Registration hook, picked up by the service manifest.
pub fn register_service() -> ServiceRegistration {
    ServiceRegistration {
        name: SERVICE_NAME,
        constructor: construct,
    }
}
