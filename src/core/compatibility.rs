use crate::models::{CompatibilityResult, CompatibilityWeights, CriteriaBreakdown, Customer, Property};

/// Price band of a property, or the budget tier a customer declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTier {
    High,
    Medium,
    Low,
}

impl BudgetTier {
    const KEYWORDS: [(&'static str, BudgetTier); 3] = [
        ("high", BudgetTier::High),
        ("medium", BudgetTier::Medium),
        ("low", BudgetTier::Low),
    ];

    /// Band a listing price falls into
    ///
    /// > 200,000 is high, 100,000..=200,000 is medium, anything lower is low.
    pub fn from_price(price: f64) -> Self {
        if price > 200_000.0 {
            BudgetTier::High
        } else if price >= 100_000.0 {
            BudgetTier::Medium
        } else {
            BudgetTier::Low
        }
    }

    /// Tiers named in a free-text budget range
    ///
    /// Plain case-sensitive substring search, so "high-medium" declares two
    /// tiers and "HIGH" declares none.
    pub fn declared_in(budget_range: &str) -> Vec<BudgetTier> {
        Self::KEYWORDS
            .iter()
            .filter(|(keyword, _)| budget_range.contains(keyword))
            .map(|(_, tier)| *tier)
            .collect()
    }
}

/// Score a (customer, property) pair with the default weights
pub fn match_compatibility(customer: &Customer, property: &Property) -> CompatibilityResult {
    match_with_weights(customer, property, &CompatibilityWeights::default())
}

/// Score a (customer, property) pair (0-100)
///
/// score = min(100, budget_fit + bedroom_fit + location_fit)
///
/// Missing fields on either side contribute 0.
pub fn match_with_weights(
    customer: &Customer,
    property: &Property,
    weights: &CompatibilityWeights,
) -> CompatibilityResult {
    let prefs = &customer.preferences;

    let budget = if budget_fits(prefs.budget_range.as_deref(), property.price) {
        weights.budget
    } else {
        0
    };

    let bedroom_fit = bedroom_fit(prefs.preferred_bedrooms, property.bedrooms);
    let bedrooms = match bedroom_fit {
        Some(BedroomFit::Exact) => weights.bedrooms_exact,
        Some(BedroomFit::OffByOne) => weights.bedrooms_near,
        None => 0,
    };

    let location = if location_fits(prefs.preferred_location.as_deref(), property) {
        weights.location
    } else {
        0
    };

    let breakdown = CriteriaBreakdown { budget, bedrooms, location };
    let total = budget as u16 + bedrooms as u16 + location as u16;

    CompatibilityResult {
        customer_id: customer.id.clone(),
        property_id: property.id.clone(),
        score: total.min(100) as u8,
        reason: describe(&breakdown, bedroom_fit),
        breakdown,
    }
}

#[inline]
fn budget_fits(budget_range: Option<&str>, price: Option<f64>) -> bool {
    match (budget_range, price) {
        (Some(range), Some(price)) => {
            let band = BudgetTier::from_price(price);
            BudgetTier::declared_in(range).contains(&band)
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BedroomFit {
    Exact,
    OffByOne,
}

#[inline]
fn bedroom_fit(preferred: Option<u8>, actual: Option<u8>) -> Option<BedroomFit> {
    match (preferred, actual) {
        (Some(p), Some(a)) if p == a => Some(BedroomFit::Exact),
        (Some(p), Some(a)) if p.abs_diff(a) == 1 => Some(BedroomFit::OffByOne),
        _ => None,
    }
}

#[inline]
fn location_fits(preferred: Option<&str>, property: &Property) -> bool {
    let needle = match preferred {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => return false,
    };

    [property.project_name.as_deref(), property.location.as_deref()]
        .into_iter()
        .flatten()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
}

fn describe(breakdown: &CriteriaBreakdown, bedroom_fit: Option<BedroomFit>) -> String {
    let mut parts = Vec::with_capacity(3);

    if breakdown.budget > 0 {
        parts.push("Budget match");
    }
    if breakdown.bedrooms > 0 {
        match bedroom_fit {
            Some(BedroomFit::Exact) => parts.push("Bedroom match"),
            Some(BedroomFit::OffByOne) => parts.push("Bedroom count close"),
            None => {}
        }
    }
    if breakdown.location > 0 {
        parts.push("Location match");
    }

    if parts.is_empty() {
        "No matching criteria".to_string()
    } else {
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomerPreferences;

    fn customer(budget_range: Option<&str>, bedrooms: Option<u8>, location: Option<&str>) -> Customer {
        Customer {
            id: "cust_1".to_string(),
            preferences: CustomerPreferences {
                budget_range: budget_range.map(str::to_string),
                preferred_bedrooms: bedrooms,
                preferred_location: location.map(str::to_string),
            },
            ..Default::default()
        }
    }

    fn property(price: Option<f64>, bedrooms: Option<u8>, project: Option<&str>) -> Property {
        Property {
            id: "prop_1".to_string(),
            price,
            bedrooms,
            project_name: project.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_price_bands() {
        assert_eq!(BudgetTier::from_price(250_000.0), BudgetTier::High);
        assert_eq!(BudgetTier::from_price(200_000.0), BudgetTier::Medium);
        assert_eq!(BudgetTier::from_price(100_000.0), BudgetTier::Medium);
        assert_eq!(BudgetTier::from_price(99_999.0), BudgetTier::Low);
    }

    #[test]
    fn test_declared_tiers_are_case_sensitive() {
        assert_eq!(BudgetTier::declared_in("high"), vec![BudgetTier::High]);
        assert_eq!(BudgetTier::declared_in("medium budget"), vec![BudgetTier::Medium]);
        assert!(BudgetTier::declared_in("HIGH").is_empty());
        assert_eq!(
            BudgetTier::declared_in("low to medium"),
            vec![BudgetTier::Medium, BudgetTier::Low]
        );
    }

    #[test]
    fn test_full_match() {
        let c = customer(Some("high"), Some(3), Some("palm"));
        let p = property(Some(350_000.0), Some(3), Some("Palm Residences"));

        let result = match_compatibility(&c, &p);
        assert_eq!(result.score, 100);
        assert_eq!(result.reason, "Budget match; Bedroom match; Location match");
    }

    #[test]
    fn test_no_match() {
        let c = customer(Some("low"), Some(1), Some("harbor"));
        let p = property(Some(350_000.0), Some(4), Some("Palm Residences"));

        let result = match_compatibility(&c, &p);
        assert_eq!(result.score, 0);
        assert_eq!(result.reason, "No matching criteria");
        assert_eq!(result.breakdown, CriteriaBreakdown::default());
    }

    #[test]
    fn test_bedroom_off_by_one() {
        let c = customer(None, Some(2), None);
        let p = property(None, Some(3), None);

        let result = match_compatibility(&c, &p);
        assert_eq!(result.score, 15);
        assert_eq!(result.reason, "Bedroom count close");
    }

    #[test]
    fn test_location_checks_both_tags() {
        let c = customer(None, None, Some("DOWNTOWN"));
        let mut p = property(None, None, Some("Sky Towers"));
        p.location = Some("Downtown Dubai".to_string());

        assert_eq!(match_compatibility(&c, &p).breakdown.location, 30);
    }

    #[test]
    fn test_empty_location_never_matches() {
        let c = customer(None, None, Some(""));
        let p = property(None, None, Some("Anything"));

        assert_eq!(match_compatibility(&c, &p).score, 0);
    }

    #[test]
    fn test_custom_weights_are_capped() {
        let weights = CompatibilityWeights {
            budget: 60,
            bedrooms_exact: 50,
            bedrooms_near: 10,
            location: 50,
        };
        let c = customer(Some("medium"), Some(2), Some("lake"));
        let p = property(Some(150_000.0), Some(2), Some("Lake View"));

        assert_eq!(match_with_weights(&c, &p, &weights).score, 100);
    }

    #[test]
    fn test_bedroom_reason_follows_counts_not_points() {
        let weights = CompatibilityWeights {
            budget: 40,
            bedrooms_exact: 10,
            bedrooms_near: 25,
            location: 30,
        };
        let c = customer(None, Some(2), None);

        let near = match_with_weights(&c, &property(None, Some(3), None), &weights);
        assert_eq!(near.breakdown.bedrooms, 25);
        assert_eq!(near.reason, "Bedroom count close");

        let exact = match_with_weights(&c, &property(None, Some(2), None), &weights);
        assert_eq!(exact.breakdown.bedrooms, 10);
        assert_eq!(exact.reason, "Bedroom match");
    }
}
