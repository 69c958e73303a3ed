use serde::{Deserialize, Serialize};
use crate::models::{BuyerType, Lead, Timeline};

/// Every lead starts from this score before bonuses
pub const BASE_SCORE: i32 = 50;

/// Points contributed by each lead signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadScoreBreakdown {
    pub base: u8,
    pub budget: u8,
    pub timeline: u8,
    pub buyer_type: u8,
    pub total: u8,
}

/// Display bucket for a lead score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadQuality {
    Hot,
    Warm,
    Cold,
}

impl LeadQuality {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => LeadQuality::Hot,
            60..=79 => LeadQuality::Warm,
            _ => LeadQuality::Cold,
        }
    }
}

/// Calculate a lead quality score (0-100)
///
/// Scoring formula:
/// score = clamp(50 + budget_points + timeline_points + buyer_points, 0, 100)
///
/// Absent fields contribute no points.
pub fn score_lead(lead: &Lead) -> u8 {
    score_breakdown(lead).total
}

/// Same as [`score_lead`] but keeps the per-signal points
pub fn score_breakdown(lead: &Lead) -> LeadScoreBreakdown {
    let budget = budget_points(lead.budget_max);
    let timeline = timeline_points(lead.timeline);
    let buyer_type = buyer_type_points(lead.buyer_type);

    let raw = BASE_SCORE + budget as i32 + timeline as i32 + buyer_type as i32;

    LeadScoreBreakdown {
        base: BASE_SCORE as u8,
        budget,
        timeline,
        buyer_type,
        total: raw.clamp(0, 100) as u8,
    }
}

#[inline]
fn budget_points(budget_max: Option<f64>) -> u8 {
    match budget_max {
        Some(b) if b > 500_000.0 => 30,
        Some(b) if b >= 200_000.0 => 20,
        Some(b) if b >= 100_000.0 => 10,
        _ => 0,
    }
}

#[inline]
fn timeline_points(timeline: Option<Timeline>) -> u8 {
    match timeline {
        Some(Timeline::Immediate) => 25,
        Some(Timeline::OneToThreeMonths) => 15,
        Some(Timeline::ThreeToSixMonths) => 10,
        _ => 0,
    }
}

#[inline]
fn buyer_type_points(buyer_type: Option<BuyerType>) -> u8 {
    match buyer_type {
        Some(BuyerType::Hni) => 20,
        Some(BuyerType::Investor) => 15,
        _ => 0,
    }
}
