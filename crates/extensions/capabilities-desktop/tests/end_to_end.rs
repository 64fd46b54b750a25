//! Router-level scenarios over the dry-run desktop.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use deskhand_capabilities_desktop::{
    DesktopBackends, DesktopCapabilities, DryRunBackend, DryRunCall, SnapshotPolicy,
};
use deskhand_core::{CapabilityRegistry, Router, SequenceCommand, SequencePolicy, SequenceRequest, SequenceStatus};
use deskhand_protocols::InvocationResponse;

fn setup() -> (Router, Arc<DryRunBackend>) {
    let backend = Arc::new(DryRunBackend::new());
    let registry = Arc::new(CapabilityRegistry::new());
    let capabilities = DesktopCapabilities::new(
        DesktopBackends::dry_run(backend.clone()),
        SnapshotPolicy::default(),
    );
    for capability in capabilities.into_capabilities() {
        registry.register_capability(capability);
    }
    (Router::new(registry), backend)
}

fn texts(response: &InvocationResponse) -> String {
    response
        .content
        .iter()
        .filter_map(|item| item.as_text())
        .collect::<Vec<_>>()
        .join("\n")
}

fn moves(backend: &DryRunBackend) -> usize {
    backend
        .calls()
        .iter()
        .filter(|c| matches!(c, DryRunCall::MovePointer { .. }))
        .count()
}

#[test]
fn test_discovery_lists_every_capability() {
    let (router, _backend) = setup();
    let listing = router.list_capability_operations();
    let mut capabilities: Vec<_> = listing.iter().map(|l| l.capability.as_str()).collect();
    capabilities.dedup();
    assert_eq!(
        capabilities,
        vec!["controller", "keys", "pointer", "screen", "window"]
    );
    assert!(listing.iter().any(|l| l.operation_id() == "pointer.move"));
}

#[tokio::test]
async fn test_pointer_move_end_to_end() {
    let (router, backend) = setup();
    let response = router
        .invoke("pointer", "move", json!({"coordinate": [100, 200]}))
        .await;

    assert!(response.success);
    assert!(texts(&response).contains("coordinate: [100,200]"));
    assert!(response.content.iter().any(|item| item.is_image()));
    assert_eq!(moves(&backend), 1);
}

#[tokio::test]
async fn test_pointer_move_missing_coordinate() {
    let (router, backend) = setup();
    let response = router.invoke("pointer", "move", json!({})).await;

    assert!(!response.success);
    assert_eq!(response.error_kind(), Some("invalid_parameter"));
    assert!(response.error.unwrap().message.contains("coordinate"));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_target_iff_out_of_range() {
    let (router, _backend) = setup();
    let count = 2;
    for t in [-1i64, 0, 1, 2, 3] {
        let response = router
            .invoke("pointer", "move", json!({"coordinate": [1, 1], "target": t}))
            .await;
        let invalid = t < 0 || t >= count;
        assert_eq!(
            response.error_kind() == Some("invalid_target"),
            invalid,
            "target {t}"
        );
        if invalid {
            let context = response.error.unwrap().context.unwrap();
            assert_eq!(context["valid_range"], json!([0, 1]));
        }
    }
}

#[tokio::test]
async fn test_selection_flows_into_later_calls() {
    let (router, backend) = setup();
    assert!(router.invoke("window", "select", json!({"target": 1})).await.success);
    assert_eq!(router.targets().current(), Some(1));

    let response = router
        .invoke("keys", "type", json!({"text": "ls"}))
        .await;
    assert!(texts(&response).contains("target: 1"));
    let terminal = backend.windows()[1].handle;
    assert!(backend.calls().contains(&DryRunCall::Focus(terminal)));
}

#[tokio::test]
async fn test_dispatch_by_identifier() {
    let (router, _backend) = setup();
    let response = router.dispatch("window.list", json!({})).await;
    assert!(response.success);
    assert!(texts(&response).contains("count: 2"));

    let response = router.dispatch("window.explode", json!({})).await;
    assert_eq!(response.error_kind(), Some("unknown_operation"));
}

#[tokio::test]
async fn test_sequence_shared_target_and_last_snapshot() {
    let (router, backend) = setup();
    let request = SequenceRequest::new(vec![
        SequenceCommand::new("pointer", "click", json!({"coordinate": [5, 5]})),
        SequenceCommand::new("keys", "type", json!({"text": "hi", "target": 0})),
    ])
    .with_target(1);

    let record = router.invoke_sequence(request).await;
    assert_eq!(record.status, SequenceStatus::Success);
    assert_eq!(record.executed, 2);
    assert_eq!(record.content.iter().filter(|c| c.is_image()).count(), 1);

    let windows = backend.windows();
    let focused: Vec<_> = backend
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            DryRunCall::Focus(handle) => Some(handle),
            _ => None,
        })
        .collect();
    assert_eq!(focused, vec![windows[1].handle, windows[0].handle]);
    assert!(backend
        .calls()
        .contains(&DryRunCall::MovePointer { x: 605, y: 205 }));
}

#[tokio::test]
async fn test_sequence_stops_at_bad_step() {
    let (router, backend) = setup();
    let request = SequenceRequest::new(vec![
        SequenceCommand::new("pointer", "move", json!({"coordinate": [1, 1]})),
        SequenceCommand::new("pointer", "move", json!({})),
        SequenceCommand::new("pointer", "move", json!({"coordinate": [2, 2]})),
    ]);

    let record = router.invoke_sequence(request).await;
    assert_eq!(record.status, SequenceStatus::Error);
    assert_eq!(record.executed, 2);
    assert_eq!(moves(&backend), 1);

    backend.clear();
    let request = SequenceRequest::new(vec![
        SequenceCommand::new("pointer", "move", json!({"coordinate": [1, 1]})),
        SequenceCommand::new("pointer", "move", json!({})),
        SequenceCommand::new("pointer", "move", json!({"coordinate": [2, 2]})),
    ])
    .with_policy(SequencePolicy {
        stop_on_error: false,
        ..SequencePolicy::default()
    });
    let record = router.invoke_sequence(request).await;
    assert_eq!(record.status, SequenceStatus::Partial);
    assert_eq!(record.failed, 1);
    assert_eq!(moves(&backend), 2);
}

#[tokio::test(start_paused = true)]
async fn test_autopress_drives_controller_until_stopped() {
    let (router, backend) = setup();
    router
        .autopress_start_with(
            "mash-a",
            vec![SequenceCommand::new(
                "controller",
                "button",
                json!({"button": "a", "duration_ms": 10}),
            )],
            50,
        )
        .unwrap();
    assert_eq!(router.autopress_list(), vec!["mash-a".to_string()]);

    tokio::time::sleep(Duration::from_millis(180)).await;
    assert_eq!(router.autopress_stop(Some("mash-a")), 1);
    let pressed = backend
        .calls()
        .iter()
        .filter(|c| matches!(c, DryRunCall::Controller(_)))
        .count();
    assert!(pressed >= 4, "expected at least two taps, saw {pressed} reports");

    tokio::time::sleep(Duration::from_millis(50)).await;
    backend.clear();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(backend.calls().is_empty());
    assert!(router.autopress_list().is_empty());
}
