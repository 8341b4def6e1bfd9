//! Text completion plugin, backed by the Azure OpenAI service.

use std::sync::Arc;

use axum::{Router, extract::State, response::Json, routing::post};
use uuid::Uuid;
use yagura_core::ServiceContainer;
use yagura_core::service::azure_openai::{
    self, AzureOpenAiService, CompletionOptions, GenerateOptions,
};

use super::{PluginResult, PluginRoutes};
use crate::error::AppError;
use crate::models::{CompletionRequest, CompletionResponse, CustomCompletionRequest};
use crate::server::AppState;

pub const PLUGIN_NAME: &str = "completions";

/// Create the completion routes.
///
/// Setup fails when the Azure OpenAI service is missing from the container,
/// so an incomplete deployment is caught at startup instead of on the first
/// request.
pub fn setup_routes(container: &ServiceContainer) -> PluginResult<PluginRoutes> {
    container.get::<AzureOpenAiService>(azure_openai::SERVICE_NAME)?;
    let router = Router::new()
        .route("/v1/completions", post(create_completion))
        .route("/v1/completions/custom", post(create_custom_completion));
    Ok(PluginRoutes {
        name: PLUGIN_NAME,
        router,
    })
}

fn azure(state: &AppState) -> Result<Arc<AzureOpenAiService>, AppError> {
    Ok(state
        .container
        .get::<AzureOpenAiService>(azure_openai::SERVICE_NAME)?)
}

/// Create a text completion
///
/// Fields left out of the request fall back to the service defaults.
#[utoipa::path(
    post,
    path = "/v1/completions",
    request_body = CompletionRequest,
    responses(
        (status = 200, description = "Completion generated", body = CompletionResponse),
        (status = 502, description = "Upstream API error"),
        (status = 504, description = "Upstream request timed out")
    )
)]
#[axum::debug_handler]
pub async fn create_completion(
    State(state): State<AppState>,
    Json(payload): Json<CompletionRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    let service = azure(&state)?;

    let mut opts = GenerateOptions::default();
    if let Some(max_tokens) = payload.max_tokens {
        opts.max_tokens = max_tokens;
    }
    if let Some(temperature) = payload.temperature {
        opts.temperature = temperature;
    }
    if let Some(n) = payload.n {
        opts.n = n;
    }
    opts.stop = payload.stop;

    let text = service.generate_text(&payload.prompt, opts).await?;
    Ok(Json(CompletionResponse {
        id: Uuid::new_v4().to_string(),
        text,
    }))
}

/// Create a text completion with the full upstream option set
///
/// Unset fields are omitted from the upstream request entirely.
#[utoipa::path(
    post,
    path = "/v1/completions/custom",
    request_body = CustomCompletionRequest,
    responses(
        (status = 200, description = "Completion generated", body = CompletionResponse),
        (status = 502, description = "Upstream API error"),
        (status = 504, description = "Upstream request timed out")
    )
)]
pub async fn create_custom_completion(
    State(state): State<AppState>,
    Json(payload): Json<CustomCompletionRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    let service = azure(&state)?;

    let opts = CompletionOptions {
        max_tokens: payload.max_tokens,
        temperature: payload.temperature,
        top_p: payload.top_p,
        n: payload.n,
        stop: payload.stop,
        presence_penalty: payload.presence_penalty,
        frequency_penalty: payload.frequency_penalty,
        suffix: payload.suffix,
        user: payload.user,
    };

    let text = service.generate_text_custom(&payload.prompt, opts).await?;
    Ok(Json(CompletionResponse {
        id: Uuid::new_v4().to_string(),
        text,
    }))
}
