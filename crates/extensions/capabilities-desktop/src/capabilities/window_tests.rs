use super::*;
use crate::backend::DryRunCall;
use crate::testing::Fixture;

fn window(fx: &Fixture) -> WindowCapability {
    WindowCapability::new(&fx.backends)
}

fn text(result: &ActionResult) -> String {
    result.texts().collect::<Vec<_>>().join("\n")
}

#[tokio::test]
async fn test_list_marks_selection() {
    let fx = Fixture::new();
    fx.targets.select(Some(1));

    let result = window(&fx).execute("list", json!({}), &fx.ctx()).await.unwrap();
    let text = text(&result);
    assert!(text.contains("count: 2"));
    assert!(text.contains("selected: 1"));
    assert!(text.contains("\"title\":\"Terminal\""));
    assert!(text.contains("\"selected\":true"));
    assert!(fx.backend.calls().is_empty());
}

#[tokio::test]
async fn test_select_and_clear() {
    let fx = Fixture::new();
    let cap = window(&fx);

    let result = cap
        .execute("select", json!({"target": 0}), &fx.ctx())
        .await
        .unwrap();
    assert_eq!(fx.targets.current(), Some(0));
    assert!(text(&result).contains("notes.txt - Editor"));

    cap.execute("select", json!({"target": null}), &fx.ctx())
        .await
        .unwrap();
    assert_eq!(fx.targets.current(), None);
}

#[tokio::test]
async fn test_select_validates_against_enumeration() {
    let fx = Fixture::new();
    fx.targets.select(Some(1));

    let err = window(&fx)
        .execute("select", json!({"target": 7}), &fx.ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::InvalidTarget { target: 7, count: 2 }));
    assert_eq!(fx.targets.current(), Some(1));
}

#[tokio::test]
async fn test_select_requires_target_key() {
    let fx = Fixture::new();
    let err = window(&fx)
        .execute("select", json!({}), &fx.ctx())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_parameter");

    let err = window(&fx)
        .execute("select", json!({"target": "editor"}), &fx.ctx())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("integer or null"));
}

#[tokio::test]
async fn test_current() {
    let fx = Fixture::new();
    let cap = window(&fx);

    let none = cap.execute("current", json!({}), &fx.ctx()).await.unwrap();
    assert!(text(&none).contains("selected: null"));

    fx.targets.select(Some(1));
    let some = cap.execute("current", json!({}), &fx.ctx()).await.unwrap();
    assert!(text(&some).contains("\"Terminal\""));

    fx.targets.select(Some(9));
    let stale = cap.execute("current", json!({}), &fx.ctx()).await.unwrap();
    assert!(text(&stale).contains("stale"));
}

#[tokio::test]
async fn test_focus_uses_selection() {
    let fx = Fixture::new();
    let terminal = fx.backend.windows()[1].handle;
    fx.targets.select(Some(1));

    window(&fx).execute("focus", json!({}), &fx.ctx()).await.unwrap();
    assert_eq!(fx.backend.calls(), vec![DryRunCall::Focus(terminal)]);
    assert!(fx.backend.windows()[1].is_focused);
}

#[tokio::test]
async fn test_focus_without_any_target() {
    let fx = Fixture::new();
    let err = window(&fx)
        .execute("focus", json!({}), &fx.ctx())
        .await
        .unwrap_err();
    match err {
        ActionError::InvalidParameter { field, .. } => assert_eq!(field, "target"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_move_resize_partial_geometry() {
    let fx = Fixture::new();
    let result = window(&fx)
        .execute("move_resize", json!({"target": 0, "width": 1024}), &fx.ctx())
        .await
        .unwrap();

    assert!(text(&result).contains("width: 1024"));
    let editor = &fx.backend.windows()[0];
    assert_eq!((editor.x, editor.y, editor.width, editor.height), (100, 50, 1024, 600));
}

#[tokio::test]
async fn test_move_resize_needs_geometry() {
    let fx = Fixture::new();
    let err = window(&fx)
        .execute("move_resize", json!({"target": 0}), &fx.ctx())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("at least one of"));

    let err = window(&fx)
        .execute("move_resize", json!({"target": 0, "height": 0}), &fx.ctx())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_parameter");
    assert!(fx.backend.calls().is_empty());
}
