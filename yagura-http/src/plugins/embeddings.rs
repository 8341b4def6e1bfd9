//! Embedding plugin, backed by the Azure OpenAI service.

use axum::{Router, extract::State, response::Json, routing::post};
use uuid::Uuid;
use yagura_core::ServiceContainer;
use yagura_core::service::azure_openai::{self, AzureOpenAiService};

use super::{PluginResult, PluginRoutes};
use crate::error::AppError;
use crate::models::{EmbeddingRequest, EmbeddingResponse};
use crate::server::AppState;

pub const PLUGIN_NAME: &str = "embeddings";

/// Create the embedding routes.
///
/// Fails at startup when the Azure OpenAI service is missing.
pub fn setup_routes(container: &ServiceContainer) -> PluginResult<PluginRoutes> {
    container.get::<AzureOpenAiService>(azure_openai::SERVICE_NAME)?;
    let router = Router::new().route("/v1/embeddings", post(create_embedding));
    Ok(PluginRoutes {
        name: PLUGIN_NAME,
        router,
    })
}

/// Create an embedding vector
#[utoipa::path(
    post,
    path = "/v1/embeddings",
    request_body = EmbeddingRequest,
    responses(
        (status = 200, description = "Embedding generated", body = EmbeddingResponse),
        (status = 502, description = "Upstream API error"),
        (status = 504, description = "Upstream request timed out")
    )
)]
pub async fn create_embedding(
    State(state): State<AppState>,
    Json(payload): Json<EmbeddingRequest>,
) -> Result<Json<EmbeddingResponse>, AppError> {
    let service = state
        .container
        .get::<AzureOpenAiService>(azure_openai::SERVICE_NAME)?;

    let embedding = service.embed(&payload.input).await?;
    let dimensions = embedding.len();
    Ok(Json(EmbeddingResponse {
        id: Uuid::new_v4().to_string(),
        embedding,
        dimensions,
    }))
}
