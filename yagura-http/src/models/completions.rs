use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Text completion request
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct CompletionRequest {
    /// Prompt to complete
    pub prompt: String,

    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Number of choices requested upstream
    pub n: Option<u8>,

    /// Stop sequence
    pub stop: Option<String>,
}

/// Text completion request with the full upstream option set
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct CustomCompletionRequest {
    /// Prompt to complete
    pub prompt: String,

    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Nucleus sampling mass
    pub top_p: Option<f32>,

    /// Number of choices requested upstream
    pub n: Option<u8>,

    /// Stop sequence
    pub stop: Option<String>,

    /// Presence penalty
    pub presence_penalty: Option<f32>,

    /// Frequency penalty
    pub frequency_penalty: Option<f32>,

    /// Text appended after the completion
    pub suffix: Option<String>,

    /// End-user identifier forwarded upstream
    pub user: Option<String>,
}

/// Text completion response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompletionResponse {
    /// Request ID
    pub id: String,

    /// Generated text
    pub text: String,
}
