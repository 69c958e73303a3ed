// Criterion benchmarks for estate-match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use estate_match::core::{match_compatibility, score_lead, Recommender};
use estate_match::models::{BuyerType, Customer, CustomerPreferences, Lead, Property, PropertyStatus, Timeline};

fn create_property(id: usize) -> Property {
    Property {
        id: id.to_string(),
        title: None,
        price: Some(50_000.0 + (id % 40) as f64 * 15_000.0),
        currency: Some("USD".to_string()),
        bedrooms: Some((id % 6) as u8),
        project_name: Some(if id % 3 == 0 { "Marina Walk" } else { "Garden Court" }.to_string()),
        location: None,
        status: if id % 10 == 0 { PropertyStatus::Sold } else { PropertyStatus::Available },
    }
}

fn create_customer() -> Customer {
    Customer {
        id: "cust_bench".to_string(),
        preferences: CustomerPreferences {
            budget_range: Some("high".to_string()),
            preferred_bedrooms: Some(3),
            preferred_location: Some("marina".to_string()),
        },
        ..Default::default()
    }
}

fn bench_score_lead(c: &mut Criterion) {
    let lead = Lead {
        id: "lead_bench".to_string(),
        budget_max: Some(350_000.0),
        timeline: Some(Timeline::OneToThreeMonths),
        buyer_type: Some(BuyerType::Investor),
        ..Default::default()
    };

    c.bench_function("score_lead", |b| b.iter(|| score_lead(black_box(&lead))));
}

fn bench_compatibility(c: &mut Criterion) {
    let customer = create_customer();
    let property = create_property(3);

    c.bench_function("match_compatibility", |b| {
        b.iter(|| match_compatibility(black_box(&customer), black_box(&property)))
    });
}

fn bench_recommend(c: &mut Criterion) {
    let recommender = Recommender::with_default_weights();
    let customer = create_customer();

    let mut group = c.benchmark_group("recommend");

    for candidate_count in [10, 100, 500, 1000].iter() {
        let candidates: Vec<Property> = (0..*candidate_count).map(create_property).collect();

        group.bench_with_input(
            BenchmarkId::new("recommend", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| recommender.recommend(black_box(&customer), black_box(&candidates), black_box(20)))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_score_lead, bench_compatibility, bench_recommend);

criterion_main!(benches);
