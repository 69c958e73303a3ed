// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ActivityKind, BuyerType, CompatibilityResult, CompatibilityWeights, CriteriaBreakdown, Customer,
    CustomerPreferences, Lead, LeadActivity, LeadStatus, Property, PropertyStatus, Timeline,
};
pub use requests::{
    CompatibilityRequest, LeadStatusRequest, PropertyStatusRequest, RecommendRequest, RecommendationQuery,
    ScoreLeadRequest,
};
pub use responses::{ErrorResponse, HealthResponse, LeadScoreResponse, RecommendationsResponse};
