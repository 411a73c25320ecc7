//! Tests for the activity journal

use prep_lines::core::{EventAction, EventSink, InMemoryEventSink, KitchenEvent};

#[test]
fn test_event_builder_fields() {
    let event = KitchenEvent::new(EventAction::Blocked)
        .with_order(4)
        .with_worker(1);
    assert_eq!(event.action, EventAction::Blocked);
    assert_eq!(event.order_id, Some(4));
    assert_eq!(event.worker_id, Some(1));
    assert_eq!(event.ingredient_id, None);
    assert!(!event.event_id.is_empty());
    assert!(event.created_at_ms > 0);
}

#[test]
fn test_event_ids_are_unique() {
    let a = KitchenEvent::new(EventAction::Enqueued);
    let b = KitchenEvent::new(EventAction::Enqueued);
    assert_ne!(a.event_id, b.event_id);
}

#[test]
fn test_sink_evicts_oldest() {
    let mut sink = InMemoryEventSink::new(2);
    for order in 1..=3 {
        sink.record(KitchenEvent::new(EventAction::Enqueued).with_order(order));
    }
    let orders: Vec<_> = sink.events().iter().filter_map(|e| e.order_id).collect();
    assert_eq!(orders, vec![2, 3]);
}

#[test]
fn test_clones_share_buffer() {
    let reader = InMemoryEventSink::new(8);
    let mut writer = reader.clone();
    writer.record(KitchenEvent::new(EventAction::Replenished).with_ingredient(0));
    writer.record(KitchenEvent::new(EventAction::Shutdown));
    assert_eq!(reader.events().len(), 2);
    assert_eq!(reader.events_with(EventAction::Replenished)[0].ingredient_id, Some(0));
}

#[test]
fn test_zero_capacity_sink_keeps_nothing() {
    let mut sink = InMemoryEventSink::new(0);
    sink.record(KitchenEvent::new(EventAction::Paused).with_worker(0));
    assert!(sink.events().is_empty());
}

#[test]
fn test_event_serializes_action_in_snake_case() {
    let event = KitchenEvent::new(EventAction::Completed).with_order(9);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "completed");
    assert_eq!(json["order_id"], 9);
}
