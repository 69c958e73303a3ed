//! estate-match - lead scoring and property recommendation for the estate CRM
//!
//! The core is two pure functions: a lead quality scorer and a
//! customer/property compatibility matcher. Around them sit a ranking
//! pipeline, pipeline/listing lifecycle rules and an HTTP service that
//! reads CRM records from Supabase.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{match_compatibility, score_lead, Recommender};
pub use models::{CompatibilityResult, Customer, Lead, Property};
