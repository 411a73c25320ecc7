//! Tests for builders

use std::sync::Arc;
use std::time::Duration;

use prep_lines::builders::{build_executor, build_generator, build_system};
use prep_lines::config::KitchenConfig;
use prep_lines::core::{EventAction, InMemoryEventSink, KitchenError, SchedulingPolicy};

#[test]
fn test_build_system_from_config() {
    let cfg = KitchenConfig::new()
        .with_worker_count(3)
        .with_queue_capacity(7)
        .with_ingredients([("Bun", 4), ("Patty", 2)])
        .with_policy(SchedulingPolicy::SkipAhead)
        .with_backoff_ms(250);
    let system = build_system(&cfg, None).unwrap();

    assert_eq!(system.worker_count(), 3);
    assert_eq!(system.queue().capacity(), 7);
    assert_eq!(system.inventory().len(), 2);
    assert_eq!(system.inventory().count(0), Some(4));
    assert_eq!(system.inventory().get(1).unwrap().name(), "Patty");
    assert_eq!(system.policy(), SchedulingPolicy::SkipAhead);
    assert_eq!(system.backoff(), Duration::from_millis(250));
    assert!(system.is_running());
}

#[test]
fn test_build_system_rejects_invalid_config() {
    let cfg = KitchenConfig::new().with_worker_count(0);
    assert!(matches!(
        build_system(&cfg, None),
        Err(KitchenError::InvalidConfig(_))
    ));
}

#[test]
fn test_build_system_attaches_journal() {
    let sink = InMemoryEventSink::new(8);
    let system = build_system(&KitchenConfig::default(), Some(Box::new(sink.clone()))).unwrap();
    system.submit_order([(0, 2), (1, 1)]).unwrap();
    assert_eq!(sink.events_with(EventAction::Enqueued).len(), 1);
}

#[test]
fn test_build_executor_duration() {
    let cfg = KitchenConfig::new().with_prep_duration_ms(15);
    assert_eq!(build_executor(&cfg).duration(), Duration::from_millis(15));
}

#[test]
fn test_build_generator_respects_limit() {
    let cfg = KitchenConfig::new().with_arrival_ms(0, 0);
    let system = Arc::new(build_system(&cfg, None).unwrap());
    let produced = build_generator(&cfg, Arc::clone(&system))
        .with_seed(5)
        .with_limit(3)
        .run();
    assert_eq!(produced, 3);
    assert_eq!(system.queue().len(), 3);
}
