// Integration tests for estate-match

use chrono::Utc;
use estate_match::core::{score_lead, Recommender};
use estate_match::models::{
    BuyerType, CompatibilityWeights, Customer, Lead, LeadStatus, Property, PropertyStatus,
};

fn create_property(id: &str, price: f64, bedrooms: u8, project: &str, location: &str) -> Property {
    Property {
        id: id.to_string(),
        title: Some(format!("Listing {}", id)),
        price: Some(price),
        currency: Some("USD".to_string()),
        bedrooms: Some(bedrooms),
        project_name: Some(project.to_string()),
        location: Some(location.to_string()),
        status: PropertyStatus::Available,
    }
}

fn customer_from_row() -> Customer {
    // Shape of a customers row as returned by the store
    serde_json::from_value(serde_json::json!({
        "id": "cust_42",
        "name": "Jordan",
        "email": "jordan@example.com",
        "phone": null,
        "budget_range": "medium",
        "preferred_bedrooms": 2,
        "preferred_location": "Riverside"
    }))
    .unwrap()
}

#[test]
fn test_integration_end_to_end_recommendation() {
    let recommender = Recommender::with_default_weights();
    let customer = customer_from_row();

    let mut reserved = create_property("5", 150_000.0, 2, "Riverside Court", "Riverside");
    reserved.status = PropertyStatus::Reserved;

    let candidates = vec![
        create_property("1", 150_000.0, 2, "Riverside Court", "Riverside"), // 100
        create_property("2", 180_000.0, 3, "Riverside Court", "Riverside"), // 40 + 15 + 30
        create_property("3", 450_000.0, 2, "Hilltop", "North"),            // 30
        create_property("4", 120_000.0, 5, "Lakeside", "East"),            // 40
        reserved,
    ];

    let result = recommender.recommend(&customer, &candidates, 3);

    assert_eq!(result.total_candidates, 5);
    assert_eq!(result.recommendations.len(), 3);

    let ids: Vec<&str> = result.recommendations.iter().map(|r| r.property_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "4"]);

    let scores: Vec<u8> = result.recommendations.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![100, 85, 40]);

    assert_eq!(result.recommendations[1].reason, "Budget match; Bedroom count close; Location match");

    for r in &result.recommendations {
        assert_eq!(r.customer_id, "cust_42");
        assert_ne!(r.property_id, "5", "reserved listings must not be recommended");
    }
}

#[test]
fn test_configured_weights_change_ranking() {
    let weights = CompatibilityWeights {
        budget: 10,
        bedrooms_exact: 10,
        bedrooms_near: 5,
        location: 80,
    };
    let recommender = Recommender::new(weights, 0);
    let customer = customer_from_row();

    let candidates = vec![
        create_property("budget_fit", 150_000.0, 2, "Hilltop", "North"),
        create_property("location_fit", 900_000.0, 6, "Riverside Lofts", "Centre"),
    ];

    let result = recommender.recommend(&customer, &candidates, 10);
    assert_eq!(result.recommendations[0].property_id, "location_fit");
    assert_eq!(result.recommendations[0].score, 80);
    assert_eq!(result.recommendations[1].score, 20);
}

#[test]
fn test_lead_pipeline_flow() {
    let mut lead: Lead = serde_json::from_value(serde_json::json!({
        "id": "lead_100",
        "name": "Sam",
        "buyer_type": "investor",
        "budget_min": 150000,
        "budget_max": 250000,
        "currency": "USD",
        "timeline": "1-3_months",
        "status": "new",
        "notes": null,
        "activities": null
    }))
    .unwrap();

    assert_eq!(score_lead(&lead), 100);
    assert!(lead.notes.is_empty());

    let now = Utc::now();
    lead.transition_to(LeadStatus::Contacted, now).unwrap();
    lead.transition_to(LeadStatus::Viewing, now).unwrap();
    lead.add_note("Second viewing booked", now);
    lead.transition_to(LeadStatus::Converted, now).unwrap();

    assert!(lead.transition_to(LeadStatus::Negotiating, now).is_err());
    assert_eq!(lead.status, LeadStatus::Converted);
    assert_eq!(lead.activities.len(), 4);
    assert_eq!(lead.notes, vec!["Second viewing booked"]);

    // Status does not feed the score
    assert_eq!(score_lead(&lead), 100);
}

#[test]
fn test_blank_form_values_score_no_bonus() {
    let lead: Lead = serde_json::from_value(serde_json::json!({
        "budget_max": 600000,
        "timeline": "",
        "buyer_type": ""
    }))
    .unwrap();

    assert_eq!(lead.timeline, None);
    assert_eq!(lead.buyer_type, None);
    assert_eq!(score_lead(&lead), 80);
}

#[test]
fn test_lead_without_timeline_parses() {
    let lead: Lead = serde_json::from_value(serde_json::json!({
        "id": "lead_min",
        "buyer_type": "hni"
    }))
    .unwrap();

    assert_eq!(lead.timeline, None);
    assert_eq!(lead.buyer_type, Some(BuyerType::Hni));
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(score_lead(&lead), 70);
}
