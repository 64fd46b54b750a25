use std::time::Duration;

use serde_json::json;

use super::*;
use crate::sequence::{SequencePolicy, SequenceStatus};
use crate::testing::CountingCapability;

fn setup() -> (Router, Arc<CountingCapability>) {
    let registry = Arc::new(CapabilityRegistry::new());
    let cap = Arc::new(CountingCapability::new("pad"));
    registry.register("pad", cap.clone());
    (Router::new(registry), cap)
}

fn text_of(response: &InvocationResponse) -> &str {
    response.content[0].as_text().unwrap()
}

#[test]
fn test_list_capability_operations() {
    let (router, _cap) = setup();
    router
        .registry()
        .register("aux", Arc::new(CountingCapability::new("aux")));

    let listing = router.list_capability_operations();
    assert_eq!(listing.len(), 8);
    assert_eq!(listing[0].capability, "aux");
    assert_eq!(listing[4].capability, "pad");
    assert_eq!(listing[4].operation, "tap");
    assert_eq!(listing[4].operation_id(), "pad.tap");
    assert_eq!(listing[6].side_effect, deskhand_protocols::SideEffect::ReadOnly);
}

#[tokio::test]
async fn test_invoke_success() {
    let (router, cap) = setup();
    let response = router.invoke("pad", "tap", json!({})).await;
    assert!(response.success);
    assert_eq!(response.content.len(), 2);
    assert_eq!(cap.calls(), 1);
}

#[tokio::test]
async fn test_invoke_unknown_capability() {
    let (router, _cap) = setup();
    let response = router.invoke("gamepad", "press", json!({})).await;
    assert!(!response.success);
    assert_eq!(response.error_kind(), Some("not_found"));
    assert!(response.error.unwrap().message.contains("gamepad"));
}

#[tokio::test]
async fn test_invoke_unknown_operation() {
    let (router, _cap) = setup();
    let response = router.invoke("pad", "spin", json!({})).await;
    assert_eq!(response.error_kind(), Some("unknown_operation"));
}

#[tokio::test]
async fn test_invoke_failure_is_a_value() {
    let (router, _cap) = setup();
    let response = router.invoke("pad", "fail", Value::Null).await;
    assert!(!response.success);
    assert!(response.content.is_empty());
    assert_eq!(response.error_kind(), Some("execution_failed"));
}

#[tokio::test]
async fn test_dispatch_capability_operation() {
    let (router, cap) = setup();
    let response = router.dispatch("pad.echo", json!({"k": 1})).await;
    assert!(response.success);
    assert_eq!(text_of(&response), r#"{"k":1}"#);
    assert_eq!(cap.calls_of("echo"), 1);
}

#[tokio::test]
async fn test_dispatch_malformed_identifiers() {
    let (router, cap) = setup();
    for id in ["nothing", "pad.", ".tap", "autopress_reboot"] {
        let response = router.dispatch(id, json!({})).await;
        assert_eq!(response.error_kind(), Some("not_found"), "id {id}");
    }
    assert_eq!(cap.calls(), 0);
}

#[tokio::test]
async fn test_dispatch_execute_sequence() {
    let (router, cap) = setup();
    let response = router
        .dispatch(
            "execute_sequence",
            json!({
                "commands": [
                    {"capability": "pad", "operation": "tap"},
                    {"capability": "pad", "operation": "fail"},
                    {"capability": "pad", "operation": "tap"}
                ],
                "stop_on_error": false
            }),
        )
        .await;
    assert!(response.success);
    assert_eq!(cap.calls(), 3);
    let summary: Value =
        serde_json::from_str(response.content.last().unwrap().as_text().unwrap()).unwrap();
    assert_eq!(summary["status"], "partial");
}

#[tokio::test]
async fn test_dispatch_execute_sequence_bad_body() {
    let (router, _cap) = setup();
    let response = router.dispatch("execute_sequence", json!({})).await;
    assert_eq!(response.error_kind(), Some("invalid_parameter"));
    assert!(response.error.unwrap().message.contains("commands"));
}

#[tokio::test]
async fn test_invoke_sequence_rejects_empty() {
    let (router, _cap) = setup();
    let record = router.invoke_sequence(SequenceRequest::new(Vec::new())).await;
    assert_eq!(record.status, SequenceStatus::Error);
    assert_eq!(record.error.as_ref().unwrap().kind, "invalid_parameter");
}

#[tokio::test]
async fn test_invoke_sequence_rejects_long_delay() {
    let (router, cap) = setup();
    let router = router.with_limits(RouterLimits {
        max_sequence_delay_ms: 500,
        ..RouterLimits::default()
    });
    let request = SequenceRequest::new(vec![SequenceCommand::new("pad", "tap", json!({}))])
        .with_policy(SequencePolicy {
            delay_between_ms: 501,
            ..SequencePolicy::default()
        });
    let record = router.invoke_sequence(request).await;
    assert_eq!(record.status, SequenceStatus::Error);
    assert!(record.error.unwrap().message.contains("at most 500"));
    assert_eq!(cap.calls(), 0);
}

#[tokio::test]
async fn test_invoke_sequence_uses_shared_targets() {
    let (router, cap) = setup();
    router.targets().select(Some(2));
    let request = SequenceRequest::new(vec![SequenceCommand::new("pad", "echo", json!({}))])
        .with_target(7);
    let record = router.invoke_sequence(request).await;
    assert!(record.is_success());
    assert_eq!(cap.seen()[0].1["target"], 7);
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_autopress_lifecycle() {
    let (router, cap) = setup();
    let response = router
        .dispatch(
            "autopress_start",
            json!({
                "id": "spam",
                "commands": [{"capability": "pad", "operation": "tap"}],
                "interval_ms": 25
            }),
        )
        .await;
    assert!(response.success, "{:?}", response.error);

    let listed = router.dispatch("autopress_list", Value::Null).await;
    assert_eq!(text_of(&listed), r#"["spam"]"#);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(cap.calls(), 2);

    let status = router.dispatch("autopress_status", Value::Null).await;
    let status: Value = serde_json::from_str(text_of(&status)).unwrap();
    assert_eq!(status[0]["id"], "spam");
    assert_eq!(status[0]["ticks"], 2);

    let stopped = router.dispatch("autopress_stop", json!({"id": "spam"})).await;
    assert_eq!(text_of(&stopped), r#"{"stopped":1}"#);
    assert!(router.autopress_list().is_empty());

    let again = router.dispatch("autopress_stop", json!({"id": "spam"})).await;
    assert!(again.success);
    assert_eq!(text_of(&again), r#"{"stopped":0}"#);
}

#[tokio::test]
async fn test_dispatch_autopress_start_invalid() {
    let (router, _cap) = setup();
    let response = router
        .dispatch(
            "autopress_start",
            json!({"id": "x", "commands": [], "interval_ms": 100}),
        )
        .await;
    assert_eq!(response.error_kind(), Some("invalid_config"));

    let response = router
        .dispatch("autopress_start", json!({"id": "x", "commands": []}))
        .await;
    assert_eq!(response.error_kind(), Some("invalid_parameter"));
}

#[tokio::test]
async fn test_autopress_min_interval_from_limits() {
    let (router, _cap) = setup();
    let router = router.with_limits(RouterLimits {
        min_autopress_interval_ms: 200,
        ..RouterLimits::default()
    });
    let err = router
        .autopress_start_with("x", vec![SequenceCommand::new("pad", "tap", json!({}))], 100)
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_config");
}

#[tokio::test(start_paused = true)]
async fn test_stop_all_and_shutdown() {
    let (router, _cap) = setup();
    let commands = vec![SequenceCommand::new("pad", "tap", json!({}))];
    router.autopress_start_with("a", commands.clone(), 50).unwrap();
    router.autopress_start_with("b", commands.clone(), 50).unwrap();

    assert_eq!(router.autopress_stop(None), 2);
    assert!(router.autopress_list().is_empty());

    router.autopress_start_with("c", commands, 50).unwrap();
    assert_eq!(router.shutdown().await, 1);
    assert!(router.autopress_list().is_empty());
}
