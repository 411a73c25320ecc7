//! Tests for configuration validation

use prep_lines::config::{
    IngredientConfig, KitchenConfig, DEFAULT_QUEUE_CAPACITY, MAX_INGREDIENTS, MAX_WORKERS,
};
use prep_lines::core::SchedulingPolicy;

#[test]
fn test_default_config_is_valid() {
    let cfg = KitchenConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.worker_count, 5);
    assert_eq!(cfg.queue_capacity, DEFAULT_QUEUE_CAPACITY);
    assert_eq!(cfg.policy, SchedulingPolicy::StrictFifo);
    let names: Vec<_> = cfg.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Bun", "Patty", "Lettuce", "Tomato", "Onion", "Cheese"]);
    assert_eq!(cfg.ingredients[0], IngredientConfig::new("Bun", 50));
}

#[test]
fn test_worker_count_bounds() {
    assert!(KitchenConfig::new().with_worker_count(0).validate().is_err());
    assert!(KitchenConfig::new().with_worker_count(MAX_WORKERS).validate().is_ok());
    assert!(KitchenConfig::new()
        .with_worker_count(MAX_WORKERS + 1)
        .validate()
        .is_err());
}

#[test]
fn test_queue_capacity_must_be_positive() {
    assert!(KitchenConfig::new().with_queue_capacity(0).validate().is_err());
}

#[test]
fn test_ingredient_bounds() {
    let none: [(&str, u32); 0] = [];
    assert!(KitchenConfig::new().with_ingredients(none).validate().is_err());

    let many = (0..=MAX_INGREDIENTS).map(|i| (format!("I{i}"), 1));
    assert!(KitchenConfig::new().with_ingredients(many).validate().is_err());

    assert!(KitchenConfig::new()
        .with_ingredients([("Bun", 1), ("  ", 1)])
        .validate()
        .is_err());
}

#[test]
fn test_timing_validation() {
    assert!(KitchenConfig::new().with_backoff_ms(0).validate().is_err());
    assert!(KitchenConfig::new().with_arrival_ms(500, 100).validate().is_err());
    assert!(KitchenConfig::new().with_arrival_ms(0, 0).validate().is_ok());
}

#[test]
fn test_from_json_fills_defaults() {
    let cfg = KitchenConfig::from_json_str(
        r#"{"worker_count": 3, "policy": "skip_ahead", "ingredients": [{"name": "Bun", "count": 2}]}"#,
    )
    .unwrap();
    assert_eq!(cfg.worker_count, 3);
    assert_eq!(cfg.policy, SchedulingPolicy::SkipAhead);
    assert_eq!(cfg.ingredients, vec![IngredientConfig::new("Bun", 2)]);
    assert_eq!(cfg.queue_capacity, DEFAULT_QUEUE_CAPACITY);
    assert_eq!(cfg.backoff_ms, 3000);
}

#[test]
fn test_from_json_rejects_invalid() {
    assert!(KitchenConfig::from_json_str("{not json").is_err());
    assert!(KitchenConfig::from_json_str(r#"{"worker_count": 0}"#).is_err());
}

#[test]
fn test_config_roundtrips_through_json() {
    let cfg = KitchenConfig::new()
        .with_worker_count(2)
        .with_policy(SchedulingPolicy::SkipAhead)
        .with_journal_capacity(0);
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(KitchenConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn test_from_json_file_missing() {
    let err = KitchenConfig::from_json_file("/nonexistent/prep-lines.json").unwrap_err();
    assert!(err.contains("cannot read"));
}
