use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::{Customer, Lead, LeadStatus, Property, PropertyStatus};

/// Request to score a lead that is not (yet) stored
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_budget_bounds"))]
pub struct ScoreLeadRequest {
    #[serde(flatten)]
    pub lead: Lead,
}

/// Reject leads whose budget bounds are negative or inverted
fn validate_budget_bounds(req: &ScoreLeadRequest) -> Result<(), ValidationError> {
    check_budget(req.lead.budget_min, req.lead.budget_max)
}

pub fn check_budget(min: Option<f64>, max: Option<f64>) -> Result<(), ValidationError> {
    if min.is_some_and(|m| m < 0.0) || max.is_some_and(|m| m < 0.0) {
        return Err(ValidationError::new("negative_budget"));
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ValidationError::new("budget_min_exceeds_budget_max"));
        }
    }
    Ok(())
}

/// Request to move a stored lead to another pipeline stage
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LeadStatusRequest {
    pub status: LeadStatus,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub note: Option<String>,
}

/// Request to compare a single customer with a single property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityRequest {
    pub customer: Customer,
    pub property: Property,
}

/// Request to rank an inline candidate set
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    pub customer: Customer,
    #[validate(length(min = 1, max = 1000))]
    pub properties: Vec<Property>,
    #[serde(default)]
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u16>,
}

/// Query string for store-backed recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationQuery {
    #[serde(default)]
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u16>,
}

/// Staff action on a listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PropertyStatusRequest {
    pub status: PropertyStatus,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_bounds() {
        assert!(check_budget(Some(100.0), Some(200.0)).is_ok());
        assert!(check_budget(None, Some(200.0)).is_ok());
        assert!(check_budget(Some(300.0), Some(200.0)).is_err());
        assert!(check_budget(Some(-1.0), None).is_err());
    }

    #[test]
    fn test_score_request_validation() {
        let body = serde_json::json!({
            "id": "lead_1",
            "budget_min": 500000,
            "budget_max": 100000,
            "timeline": "immediate"
        });
        let req: ScoreLeadRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_recommend_limit_range() {
        let req = RecommendRequest {
            customer: Customer::default(),
            properties: vec![Property::default()],
            limit: Some(500),
        };
        assert!(req.validate().is_err());
    }
}
