// Core algorithm exports
pub mod compatibility;
pub mod lead_scorer;
pub mod lifecycle;
pub mod recommender;

pub use compatibility::{match_compatibility, match_with_weights, BudgetTier};
pub use lead_scorer::{score_breakdown, score_lead, LeadQuality, LeadScoreBreakdown};
pub use lifecycle::LifecycleError;
pub use recommender::{RecommendationResult, Recommender};
