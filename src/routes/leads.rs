use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{score_breakdown, LeadQuality};
use crate::models::{Lead, LeadScoreResponse, LeadStatus, LeadStatusRequest, ScoreLeadRequest};
use crate::models::requests::check_budget;
use crate::routes::{lifecycle_conflict, store_failure, validation_failed, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/leads/score", web::post().to(score_inline_lead))
        .route("/leads/{lead_id}/rescore", web::post().to(rescore_lead))
        .route("/leads/{lead_id}/status", web::post().to(update_lead_status));
}

fn score_response(lead: &Lead) -> LeadScoreResponse {
    let breakdown = score_breakdown(lead);
    LeadScoreResponse {
        lead_id: lead.id.clone(),
        score: breakdown.total,
        quality: LeadQuality::from_score(breakdown.total),
        breakdown,
        status: lead.status,
    }
}

/// Score a lead supplied in the request body
///
/// POST /api/v1/leads/score
///
/// Nothing is persisted; the caller stores the returned score.
async fn score_inline_lead(req: web::Json<ScoreLeadRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for score request: {:?}", errors);
        return validation_failed(errors);
    }

    let response = score_response(&req.lead);
    tracing::debug!("Scored inline lead {:?}: {}", req.lead.id, response.score);

    HttpResponse::Ok().json(response)
}

/// Recompute and persist the score of a stored lead
///
/// POST /api/v1/leads/{lead_id}/rescore
async fn rescore_lead(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let lead_id = path.into_inner();

    let mut lead = match state.supabase.get_lead(&lead_id).await {
        Ok(lead) => lead,
        Err(e) => {
            tracing::error!("Failed to fetch lead {}: {}", lead_id, e);
            return store_failure("Failed to fetch lead", e);
        }
    };

    if let Err(e) = check_budget(lead.budget_min, lead.budget_max) {
        tracing::warn!("Lead {} has inconsistent budget bounds: {}", lead_id, e);
    }

    persist_scored(&state, &mut lead, None).await
}

/// Move a stored lead through the pipeline and rescore it
///
/// POST /api/v1/leads/{lead_id}/status
///
/// Request body:
/// ```json
/// { "status": "qualified", "note": "optional text" }
/// ```
async fn update_lead_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<LeadStatusRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let lead_id = path.into_inner();

    let mut lead = match state.supabase.get_lead(&lead_id).await {
        Ok(lead) => lead,
        Err(e) => {
            tracing::error!("Failed to fetch lead {}: {}", lead_id, e);
            return store_failure("Failed to fetch lead", e);
        }
    };

    let read_status = lead.status;
    let now = chrono::Utc::now();
    if let Err(e) = lead.transition_to(req.status, now) {
        tracing::info!("Rejected status change for lead {}: {}", lead_id, e);
        return lifecycle_conflict(e);
    }
    if let Some(note) = req.note.as_deref().filter(|n| !n.trim().is_empty()) {
        lead.add_note(note, now);
    }

    persist_scored(&state, &mut lead, Some(read_status)).await
}

/// Store the new score; with `read_status` set the status change and its
/// activity entries are written too, guarded on the status that was read
async fn persist_scored(state: &AppState, lead: &mut Lead, read_status: Option<LeadStatus>) -> HttpResponse {
    let response = score_response(lead);
    lead.score = Some(response.score);

    let saved = match read_status {
        Some(previous) => state.supabase.update_lead_transition(lead, previous).await,
        None => state.supabase.update_lead_score(lead).await,
    };
    if let Err(e) = saved {
        tracing::error!("Failed to persist lead {}: {}", lead.id, e);
        return store_failure("Failed to update lead", e);
    }

    // History is best-effort; the store row is the source of truth
    if let Err(e) = state
        .postgres
        .record_lead_score(&lead.id, response.score, lead.status.as_str())
        .await
    {
        tracing::warn!("Score for lead {} saved but history insert failed: {}", lead.id, e);
    }

    tracing::info!(
        "Lead {} scored {} ({:?}, status {})",
        lead.id,
        response.score,
        response.quality,
        lead.status.as_str()
    );

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{call_and_read_body_json, call_service, init_service, TestRequest};
    use actix_web::http::StatusCode;
    use actix_web::App;
    use crate::models::{BuyerType, Timeline};

    #[test]
    fn test_score_response() {
        let lead = Lead {
            id: "lead_3".to_string(),
            budget_max: Some(250_000.0),
            timeline: Some(Timeline::Immediate),
            buyer_type: Some(BuyerType::Investor),
            ..Default::default()
        };

        let response = score_response(&lead);
        assert_eq!(response.score, 100);
        assert_eq!(response.quality, LeadQuality::Hot);
        assert_eq!(response.breakdown.budget, 20);
    }

    #[actix_web::test]
    async fn test_score_endpoint() {
        let app = init_service(
            App::new().route("/leads/score", web::post().to(score_inline_lead)),
        )
        .await;

        let req = TestRequest::post()
            .uri("/leads/score")
            .set_json(serde_json::json!({
                "id": "lead_9",
                "budget_max": 150000,
                "timeline": "6-12_months",
                "buyer_type": "retail"
            }))
            .to_request();

        let body: LeadScoreResponse = call_and_read_body_json(&app, req).await;
        assert_eq!(body.lead_id, "lead_9");
        assert_eq!(body.score, 60);
        assert_eq!(body.quality, LeadQuality::Warm);
    }

    #[actix_web::test]
    async fn test_score_endpoint_rejects_inverted_budget() {
        let app = init_service(
            App::new().route("/leads/score", web::post().to(score_inline_lead)),
        )
        .await;

        let req = TestRequest::post()
            .uri("/leads/score")
            .set_json(serde_json::json!({ "budget_min": 9, "budget_max": 1 }))
            .to_request();

        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_score_endpoint_treats_blank_fields_as_absent() {
        let app = init_service(App::new().route("/leads/score", web::post().to(score_inline_lead))).await;

        let req = TestRequest::post()
            .uri("/leads/score")
            .set_json(serde_json::json!({
                "id": "lead_blank",
                "budget_max": 600000,
                "timeline": "",
                "buyer_type": ""
            }))
            .to_request();

        let body: LeadScoreResponse = call_and_read_body_json(&app, req).await;
        assert_eq!(body.score, 80);
        assert_eq!(body.breakdown.timeline, 0);
        assert_eq!(body.breakdown.buyer_type, 0);
    }
}
