use serde::{Deserialize, Serialize};
use crate::core::{LeadQuality, LeadScoreBreakdown};
use crate::models::domain::{CompatibilityResult, LeadStatus};

/// Response for lead scoring endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadScoreResponse {
    pub lead_id: String,
    pub score: u8,
    pub quality: LeadQuality,
    pub breakdown: LeadScoreBreakdown,
    pub status: LeadStatus,
}

/// Response for recommendation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub customer_id: String,
    pub recommendations: Vec<CompatibilityResult>,
    pub total_candidates: usize,
    pub batch_id: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache_entries: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
