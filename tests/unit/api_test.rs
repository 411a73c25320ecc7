//! Tests for operator commands

use std::sync::Arc;
use std::time::Duration;

use prep_lines::core::{
    Controller, InventoryStore, KitchenError, SchedulingPolicy, SystemState, WorkerState,
};
use prep_lines::runtime::OperatorCommand;

fn controller() -> Controller {
    Controller::new(Arc::new(SystemState::new(
        InventoryStore::new([("Bun", 3), ("Patty", 1)]),
        2,
        4,
        SchedulingPolicy::StrictFifo,
        Duration::from_millis(10),
    )))
}

#[test]
fn test_parse_commands() {
    assert_eq!(
        OperatorCommand::parse("p 1"),
        Ok(OperatorCommand::Pause { worker: 1 })
    );
    assert_eq!(
        OperatorCommand::parse("  R 0 "),
        Ok(OperatorCommand::Resume { worker: 0 })
    );
    assert_eq!(
        OperatorCommand::parse("a 0 10"),
        Ok(OperatorCommand::Adjust {
            ingredient: 0,
            delta: 10
        })
    );
    assert_eq!(
        "a 1 -2".parse::<OperatorCommand>(),
        Ok(OperatorCommand::Adjust {
            ingredient: 1,
            delta: -2
        })
    );
    assert_eq!(OperatorCommand::parse("s"), Ok(OperatorCommand::Status));
    assert_eq!(OperatorCommand::parse("quit"), Ok(OperatorCommand::Quit));
}

#[test]
fn test_parse_rejects_bad_input() {
    for line in ["", "x", "p", "p one", "a 0", "a 0 1 2", "q now", "p -1"] {
        assert!(
            matches!(OperatorCommand::parse(line), Err(KitchenError::InvalidCommand(_))),
            "accepted {line:?}"
        );
    }
}

#[test]
fn test_apply_pause_and_resume() {
    let ctl = controller();
    let resp = OperatorCommand::Pause { worker: 1 }.apply(&ctl);
    assert!(resp.ok);
    assert_eq!(ctl.system().workers()[1].state(), WorkerState::Paused);

    let resp = OperatorCommand::Resume { worker: 1 }.apply(&ctl);
    assert!(resp.ok);
    assert_eq!(ctl.system().workers()[1].state(), WorkerState::Idle);

    let resp = OperatorCommand::Pause { worker: 5 }.apply(&ctl);
    assert!(!resp.ok);
    assert!(resp.to_string().starts_with("error: invalid worker id 5"));
}

#[test]
fn test_apply_adjust() {
    let ctl = controller();
    let resp = OperatorCommand::Adjust {
        ingredient: 1,
        delta: 4,
    }
    .apply(&ctl);
    assert!(resp.ok);
    assert_eq!(resp.message, "ingredient 1 now 5");

    let resp = OperatorCommand::Adjust {
        ingredient: 1,
        delta: 0,
    }
    .apply(&ctl);
    assert!(!resp.ok);
    assert_eq!(ctl.system().inventory().count(1), Some(5));
}

#[test]
fn test_apply_status_and_quit() {
    let ctl = controller();
    let status = OperatorCommand::Status.apply(&ctl);
    assert!(status.ok);
    assert!(status.message.contains("Order queue: 0/4"));

    assert!(OperatorCommand::Quit.apply(&ctl).ok);
    assert!(!ctl.system().is_running());
    assert!(!OperatorCommand::Pause { worker: 0 }.apply(&ctl).ok);
}

#[test]
fn test_command_json_shape() {
    let json = serde_json::to_value(OperatorCommand::Adjust {
        ingredient: 2,
        delta: 5,
    })
    .unwrap();
    assert_eq!(json["command"], "adjust");
    assert_eq!(json["delta"], 5);
}
