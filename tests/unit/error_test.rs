//! Tests for error types

use prep_lines::core::{AppResult, KitchenError};

#[test]
fn test_invalid_worker_id_error() {
    let err = KitchenError::InvalidWorkerId { id: 7, workers: 5 };
    assert_eq!(
        format!("{}", err),
        "invalid worker id 7: kitchen has 5 preparation lines"
    );
}

#[test]
fn test_invalid_ingredient_id_error() {
    let err = KitchenError::InvalidIngredientId {
        id: 9,
        ingredients: 6,
    };
    assert_eq!(
        format!("{}", err),
        "invalid ingredient id 9: inventory has 6 ingredient types"
    );
}

#[test]
fn test_invalid_quantity_error() {
    let err = KitchenError::InvalidQuantity(-3);
    assert_eq!(format!("{}", err), "invalid quantity -3: must be positive");
}

#[test]
fn test_shutdown_error() {
    assert_eq!(
        format!("{}", KitchenError::ShutdownInProgress),
        "shutdown in progress"
    );
}

#[test]
fn test_errors_convert_to_app_result() {
    fn fails() -> AppResult<()> {
        Err::<(), _>(KitchenError::InvalidConfig("worker_count must be greater than 0".into()))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid configuration: worker_count must be greater than 0"
    );
    assert!(err.downcast_ref::<KitchenError>().is_some());
}
