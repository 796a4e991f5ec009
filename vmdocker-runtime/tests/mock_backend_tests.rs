// ABOUTME: Tests for the scripted mock backend.
// ABOUTME: Verifies expectation ordering, faults and the unmatched fallback.

use vmdocker_runtime::backends::mock::MockBackend;
use vmdocker_runtime::{ApplyResult, Meta, Params, RuntimeBackend};

fn meta(action: &str) -> Meta {
    Meta {
        action: action.to_string(),
        ..Meta::default()
    }
}

#[tokio::test]
async fn test_mock_returns_expected_result() {
    let mock = MockBackend::new().on_action("Eval").respond_with(ApplyResult {
        data: "42".to_string(),
        ..ApplyResult::default()
    });

    let res = mock.apply("c", &meta("Eval"), None).await.unwrap();
    assert_eq!(res.data, "42");
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_mock_expectations_consumed_in_order() {
    let mock = MockBackend::new()
        .on_action("Eval")
        .respond_data("first")
        .on_action("Eval")
        .respond_data("second");

    assert_eq!(mock.apply("c", &meta("Eval"), None).await.unwrap().data, "first");
    assert_eq!(mock.apply("c", &meta("Eval"), None).await.unwrap().data, "second");
}

#[tokio::test]
async fn test_mock_out_of_order_match() {
    let mock = MockBackend::new()
        .on_action("A")
        .respond_data("a")
        .on_action("B")
        .respond_data("b");

    assert_eq!(mock.apply("c", &meta("B"), None).await.unwrap().data, "b");
    assert_eq!(mock.apply("c", &meta("A"), None).await.unwrap().data, "a");
}

#[tokio::test]
async fn test_mock_action_from_params() {
    let mock = MockBackend::new().on_action("Eval").respond_data("from-bag");
    let params = Params::from([("Action".to_string(), "Eval".to_string())]);

    let res = mock.apply("c", &Meta::default(), Some(&params)).await.unwrap();
    assert_eq!(res.data, "from-bag");
}

#[tokio::test]
async fn test_mock_fault() {
    let mock = MockBackend::new().on_action("Crash").fail("segfault");
    let err = mock.apply("c", &meta("Crash"), None).await.unwrap_err();
    assert_eq!(err.to_string(), "segfault");
}

#[tokio::test]
async fn test_mock_unmatched_reports_business_error() {
    let mock = MockBackend::new();
    let res = mock.apply("c", &meta("Nope"), None).await.unwrap();
    assert_eq!(res.error.as_deref(), Some("mock: no expectation for 'Nope'"));
}
