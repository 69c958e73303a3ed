use std::cmp::Ordering;

use crate::core::compatibility::match_with_weights;
use crate::models::{CompatibilityResult, CompatibilityWeights, Customer, Property};

/// Result of the recommendation process
#[derive(Debug)]
pub struct RecommendationResult {
    pub recommendations: Vec<CompatibilityResult>,
    pub total_candidates: usize,
}

/// Ranks candidate properties for a customer
///
/// # Pipeline Stages
/// 1. Availability filter (only `available` listings)
/// 2. Compatibility scoring
/// 3. Minimum score cut
/// 4. Ranking and truncation
#[derive(Debug, Clone)]
pub struct Recommender {
    weights: CompatibilityWeights,
    min_score: u8,
}

impl Recommender {
    pub fn new(weights: CompatibilityWeights, min_score: u8) -> Self {
        Self { weights, min_score }
    }

    pub fn with_default_weights() -> Self {
        Self::new(CompatibilityWeights::default(), 0)
    }

    pub fn weights(&self) -> &CompatibilityWeights {
        &self.weights
    }

    /// Score a single pair with this recommender's weights
    pub fn compatibility(&self, customer: &Customer, property: &Property) -> CompatibilityResult {
        match_with_weights(customer, property, &self.weights)
    }

    /// Recommend up to `limit` properties for a customer
    ///
    /// Ties on score are broken by cheaper price first (unknown price last),
    /// then by property id so the order is stable across calls.
    pub fn recommend(
        &self,
        customer: &Customer,
        candidates: &[Property],
        limit: usize,
    ) -> RecommendationResult {
        let total_candidates = candidates.len();

        let mut ranked: Vec<(Option<f64>, CompatibilityResult)> = candidates
            .iter()
            // Stage 1: availability
            .filter(|property| property.is_listable())
            // Stage 2 & 3: score and cut
            .filter_map(|property| {
                let result = self.compatibility(customer, property);
                if result.score >= self.min_score {
                    Some((property.price, result))
                } else {
                    None
                }
            })
            .collect();

        // Stage 4: rank
        ranked.sort_by(|(price_a, a), (price_b, b)| {
            b.score
                .cmp(&a.score)
                .then_with(|| compare_price(*price_a, *price_b))
                .then_with(|| a.property_id.cmp(&b.property_id))
        });

        ranked.truncate(limit);

        tracing::debug!(
            "Ranked {} of {} candidates for customer {}",
            ranked.len(),
            total_candidates,
            customer.id
        );

        RecommendationResult {
            recommendations: ranked.into_iter().map(|(_, result)| result).collect(),
            total_candidates,
        }
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[inline]
fn compare_price(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
