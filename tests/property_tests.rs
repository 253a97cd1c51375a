/// Property-based tests using proptest
/// Tests invariants that should hold for every record the scorer can see
use lead_scoring_api::models::{LeadFilters, LeadRecord};
use lead_scoring_api::scoring::{email_score, phone_score, revenue_score, score_lead};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Arbitrary JSON leaf values, including the awkward ones.
fn any_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::from),
        "\\PC*".prop_map(Value::from),
        prop::sample::select(vec!["saas", "US", "nan", "", "  ", "a@gmail.com", "1e8"])
            .prop_map(Value::from),
        prop::collection::vec(any::<i32>(), 0..3).prop_map(|v| json!(v)),
    ]
}

fn field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec![
            "company_name",
            "industry",
            "revenue_estimate",
            "contact_email",
            "contact_phone",
            "region",
            "score",
        ])
        .prop_map(str::to_string),
        "[a-z_]{1,12}",
    ]
}

fn any_record() -> impl Strategy<Value = LeadRecord> {
    prop::collection::btree_map(field_name(), any_value(), 0..8)
        .prop_map(|fields| fields.into_iter().collect())
}

// Property: scoring never panics and stays in range
proptest! {
    #[test]
    fn score_is_always_between_0_and_100(record in any_record()) {
        let score = score_lead(&record);
        prop_assert!(score <= 100);
    }

    #[test]
    fn score_is_deterministic(record in any_record()) {
        prop_assert_eq!(score_lead(&record), score_lead(&record));
    }

    #[test]
    fn score_never_below_category_defaults(record in any_record()) {
        // Industry and region always contribute at least their defaults
        prop_assert!(score_lead(&record) >= 4 + 3);
    }

    #[test]
    fn unknown_fields_do_not_change_the_score(
        record in any_record(),
        extra in "x_[a-z]{1,8}",
        value in any_value()
    ) {
        let mut extended = record.clone();
        extended.insert(extra, value);
        prop_assert_eq!(score_lead(&record), score_lead(&extended));
    }
}

// Property: sub-scores only take their documented values
proptest! {
    #[test]
    fn email_score_is_a_known_value(email in "\\PC*") {
        let score = email_score(Some(&Value::from(email)));
        prop_assert!([0, 8, 12, 15].contains(&score));
    }

    #[test]
    fn phone_score_is_0_or_5(phone in "\\PC*") {
        let score = phone_score(Some(&Value::from(phone)));
        prop_assert!(score == 0 || score == 5);
    }

    #[test]
    fn revenue_score_is_monotonic(a in any::<f64>(), b in any::<f64>()) {
        prop_assume!(!a.is_nan() && !b.is_nan());
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(revenue_score(low) <= revenue_score(high));
    }
}

// Property: filters never panic and min_score keeps only higher scores
proptest! {
    #[test]
    fn min_score_parsing_never_panics(raw in "\\PC*") {
        let filters = LeadFilters {
            min_score: Some(raw),
            ..Default::default()
        };
        let _ = filters.min_score();
    }

    #[test]
    fn min_score_filter_respects_threshold(score in 0u8..=100, threshold in -10i64..=110) {
        let filters = LeadFilters {
            min_score: Some(threshold.to_string()),
            ..Default::default()
        };
        let record: LeadRecord = json!({"score": score}).as_object().cloned().unwrap();
        prop_assert_eq!(filters.matches(&record), i64::from(score) >= threshold);
    }
}
