use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Application status response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// API version
    pub version: String,

    /// Response timestamp (RFC 3339)
    pub timestamp: String,

    /// Seconds since the application was assembled
    pub uptime_seconds: u64,

    /// Registered service names, sorted
    pub services: Vec<String>,

    /// Attached plugin names, in attach order
    pub plugins: Vec<String>,
}
