use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    CompatibilityRequest, HealthResponse, PropertyStatusRequest, RecommendRequest, RecommendationQuery,
    RecommendationsResponse,
};
use crate::routes::{error_response, lifecycle_conflict, store_failure, validation_failed, AppState};
use crate::services::CacheKey;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/compatibility", web::post().to(compatibility))
        .route("/matches/recommend", web::post().to(recommend_inline))
        .route("/customers/{customer_id}/recommendations", web::get().to(customer_recommendations))
        .route(
            "/customers/{customer_id}/recommendations/history",
            web::get().to(recommendation_history),
        )
        .route("/properties/{property_id}/status", web::post().to(update_property_status));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache_entries: state.cache.entry_count(),
        timestamp: chrono::Utc::now(),
    })
}

/// Compare one customer with one property
///
/// POST /api/v1/matches/compatibility
async fn compatibility(state: web::Data<AppState>, req: web::Json<CompatibilityRequest>) -> impl Responder {
    let result = state.recommender.compatibility(&req.customer, &req.property);
    HttpResponse::Ok().json(result)
}

/// Rank a candidate list supplied by the caller
///
/// POST /api/v1/matches/recommend
///
/// Request body:
/// ```json
/// {
///   "customer": { "id": "string", "budget_range": "high", "preferred_bedrooms": 3 },
///   "properties": [{ "id": "string", "price": 250000, "bedrooms": 3 }],
///   "limit": 10
/// }
/// ```
async fn recommend_inline(state: web::Data<AppState>, req: web::Json<RecommendRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let limit = state.recommendation.resolve_limit(req.limit);
    let result = state.recommender.recommend(&req.customer, &req.properties, limit);

    HttpResponse::Ok().json(RecommendationsResponse {
        customer_id: req.customer.id.clone(),
        recommendations: result.recommendations,
        total_candidates: result.total_candidates,
        batch_id: None,
    })
}

/// Recommend stored listings for a stored customer
///
/// GET /api/v1/customers/{customer_id}/recommendations?limit=10
///
/// Results are cached per (customer, limit) and every freshly computed
/// batch is logged to PostgreSQL.
async fn customer_recommendations(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RecommendationQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let customer_id = path.into_inner();
    let limit = state.recommendation.resolve_limit(query.limit);
    let cache_key = CacheKey::recommendations(&customer_id, limit);

    match state.cache.get::<RecommendationsResponse>(&cache_key).await {
        Ok(Some(cached)) => {
            tracing::debug!("Serving cached recommendations for {}", customer_id);
            return HttpResponse::Ok().json(cached);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Recommendation cache lookup failed for {}: {}", customer_id, e),
    }

    let customer = match state.supabase.get_customer(&customer_id).await {
        Ok(customer) => customer,
        Err(e) => {
            tracing::error!("Failed to fetch customer {}: {}", customer_id, e);
            return store_failure("Failed to fetch customer", e);
        }
    };

    let candidates = match state
        .supabase
        .list_available_properties(state.recommendation.candidate_pool)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to list properties for {}: {}", customer_id, e);
            return store_failure("Failed to list properties", e);
        }
    };

    let result = state.recommender.recommend(&customer, &candidates, limit);

    let batch_id = match state
        .postgres
        .record_recommendations(&customer_id, &result.recommendations)
        .await
    {
        Ok(id) => Some(id.to_string()),
        Err(e) => {
            tracing::warn!("Failed to log recommendations for {}: {}", customer_id, e);
            None
        }
    };

    let response = RecommendationsResponse {
        customer_id: customer_id.clone(),
        recommendations: result.recommendations,
        total_candidates: result.total_candidates,
        batch_id,
    };

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache recommendations for {}: {}", customer_id, e);
    }

    tracing::info!(
        "Returning {} recommendations for customer {} (from {} candidates)",
        response.recommendations.len(),
        customer_id,
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Previously served recommendations for a customer
///
/// GET /api/v1/customers/{customer_id}/recommendations/history?limit=50
async fn recommendation_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RecommendationQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let customer_id = path.into_inner();
    let limit = state.recommendation.resolve_limit(query.limit);

    match state.postgres.get_recent_recommendations(&customer_id, limit).await {
        Ok(history) => HttpResponse::Ok().json(serde_json::json!({
            "customerId": customer_id,
            "history": history,
            "count": history.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to fetch recommendation history for {}: {}", customer_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch history", e)
        }
    }
}

/// Staff change to a listing's status and price
///
/// POST /api/v1/properties/{property_id}/status
///
/// Sold listings are frozen. Any successful change drops every cached
/// recommendation since the candidate pool changed.
async fn update_property_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<PropertyStatusRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let property_id = path.into_inner();

    let mut property = match state.supabase.get_property(&property_id).await {
        Ok(property) => property,
        Err(e) => {
            tracing::error!("Failed to fetch property {}: {}", property_id, e);
            return store_failure("Failed to fetch property", e);
        }
    };

    if let Err(e) = property.apply_change(req.status, req.price) {
        tracing::info!("Rejected change to property {}: {}", property_id, e);
        return lifecycle_conflict(e);
    }

    if let Err(e) = state.supabase.update_property(&property).await {
        tracing::error!("Failed to persist property {}: {}", property_id, e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update property", e);
    }

    if let Err(e) = state.cache.invalidate_pattern(CacheKey::all_recommendations()).await {
        tracing::warn!("Failed to invalidate recommendation cache: {}", e);
    }

    tracing::info!("Property {} is now {}", property_id, property.status.as_str());

    HttpResponse::Ok().json(property)
}
