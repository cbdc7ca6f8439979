use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{JobPosting, ScoredJob};

/// Response for the recommend endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    pub query_id: Uuid,
    pub results: Vec<ScoredJob>,
    pub total_results: usize,
    pub next_offset: Option<usize>,
}

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query_id: Uuid,
    pub results: Vec<JobPosting>,
    pub total_results: usize,
    pub next_offset: Option<usize>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub catalog_revision: u64,
    pub job_count: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
