use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Embedding request
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct EmbeddingRequest {
    /// Text to embed
    pub input: String,
}

/// Embedding response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmbeddingResponse {
    /// Request ID
    pub id: String,

    /// Embedding vector
    pub embedding: Vec<f32>,

    /// Vector length
    pub dimensions: usize,
}
