// Route exports
pub mod leads;
pub mod matches;

use actix_web::{http::StatusCode, web, HttpResponse};
use std::sync::Arc;

use crate::config::RecommendationSettings;
use crate::core::{LifecycleError, Recommender};
use crate::models::ErrorResponse;
use crate::services::{CacheManager, PostgresClient, SupabaseClient, SupabaseError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub supabase: Arc<SupabaseClient>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub recommender: Recommender,
    pub recommendation: RecommendationSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(leads::configure)
            .configure(matches::configure),
    );
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

pub(crate) fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, "Validation failed", errors)
}

/// Map a store failure, keeping 404 for missing rows and 409 for lost writes
pub(crate) fn store_failure(error: &str, e: SupabaseError) -> HttpResponse {
    match e {
        SupabaseError::NotFound(_) => error_response(StatusCode::NOT_FOUND, error, e),
        SupabaseError::Conflict(_) => error_response(StatusCode::CONFLICT, error, e),
        _ => error_response(StatusCode::INTERNAL_SERVER_ERROR, error, e),
    }
}

pub(crate) fn lifecycle_conflict(e: LifecycleError) -> HttpResponse {
    match e {
        LifecycleError::InvalidPrice(_) => error_response(StatusCode::BAD_REQUEST, "Invalid price", e),
        _ => error_response(StatusCode::CONFLICT, "Invalid state change", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(resp: HttpResponse) -> ErrorResponse {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_store_failure_status_codes() {
        let resp = store_failure("Failed to fetch lead", SupabaseError::NotFound("leads x".into()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_of(resp).await;
        assert_eq!(body.status_code, 404);
        assert_eq!(body.error, "Failed to fetch lead");

        let resp = store_failure("Failed to update lead", SupabaseError::Conflict("moved".into()));
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = store_failure("Failed to fetch lead", SupabaseError::Unauthorized);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_lifecycle_conflict_status_codes() {
        let closed = LifecycleError::LeadClosed {
            lead_id: "lead_1".into(),
            status: "converted",
            requested: "contacted",
        };
        let resp = lifecycle_conflict(closed);
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(body_of(resp).await.status_code, 409);

        let resp = lifecycle_conflict(LifecycleError::PropertySold("p1".into()));
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = lifecycle_conflict(LifecycleError::InvalidPrice(-5.0));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(resp).await.error, "Invalid price");
    }
}
