//! Target resolution against the live window enumeration.

use std::sync::Arc;

use deskhand_protocols::{ActionError, TargetContext, TargetId};

use super::run_blocking;
use crate::backend::{Region, WindowBackend, WindowInfo};

/// A validated target id and the window it names.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub id: TargetId,
    pub window: WindowInfo,
}

impl ResolvedTarget {
    pub fn region(&self) -> Region {
        self.window.region()
    }
}

/// Pick window `id` out of `windows`.
pub(crate) fn pick(windows: Vec<WindowInfo>, id: TargetId) -> Result<ResolvedTarget, ActionError> {
    let count = windows.len();
    usize::try_from(id)
        .ok()
        .and_then(|idx| windows.into_iter().nth(idx))
        .map(|window| ResolvedTarget { id, window })
        .ok_or(ActionError::InvalidTarget { target: id, count })
}

/// Resolve the effective target: explicit id, else the stored selection,
/// else `None` (whatever has focus). Any id is checked against a fresh
/// enumeration.
pub(crate) async fn resolve(
    windows: &Arc<dyn WindowBackend>,
    explicit: Option<TargetId>,
    targets: &TargetContext,
) -> Result<Option<ResolvedTarget>, ActionError> {
    let Some(id) = targets.effective(explicit) else {
        return Ok(None);
    };
    let windows = windows.clone();
    let list = run_blocking(move || windows.list()).await?;
    pick(list, id).map(Some)
}

/// Window-relative point to absolute screen coordinates. `field` names the
/// parameter in the error when the offset point overflows.
pub(crate) fn to_screen(
    target: Option<&ResolvedTarget>,
    field: &str,
    point: [i32; 2],
) -> Result<(i32, i32), ActionError> {
    match target {
        Some(t) => t.window.to_screen(point[0], point[1]).ok_or_else(|| {
            ActionError::invalid_parameter(
                field,
                format!("{field} is out of range for target {}", t.id),
            )
        }),
        None => Ok((point[0], point[1])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DryRunBackend;

    fn backend() -> Arc<dyn WindowBackend> {
        Arc::new(DryRunBackend::new())
    }

    #[tokio::test]
    async fn test_no_target_means_focused() {
        let resolved = resolve(&backend(), None, &TargetContext::new()).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_explicit_target_in_range() {
        let resolved = resolve(&backend(), Some(1), &TargetContext::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, 1);
        assert_eq!(resolved.window.title, "Terminal");
    }

    #[tokio::test]
    async fn test_invalid_target_iff_out_of_range() {
        let windows = backend();
        let targets = TargetContext::new();
        for t in -3..5 {
            let outcome = resolve(&windows, Some(t), &targets).await;
            let invalid = t < 0 || t >= 2;
            match outcome {
                Err(ActionError::InvalidTarget { target, count }) => {
                    assert!(invalid, "target {t} should be valid");
                    assert_eq!(target, t);
                    assert_eq!(count, 2);
                }
                Ok(_) => assert!(!invalid, "target {t} should be rejected"),
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_stored_selection_is_used() {
        let targets = TargetContext::new();
        targets.select(Some(0));
        let resolved = resolve(&backend(), None, &targets).await.unwrap().unwrap();
        assert_eq!(resolved.id, 0);

        let resolved = resolve(&backend(), Some(1), &targets).await.unwrap().unwrap();
        assert_eq!(resolved.id, 1);
    }

    #[test]
    fn test_to_screen_offsets_by_window_origin() {
        let target = pick(DryRunBackend::new().windows(), 0).unwrap();
        assert_eq!(to_screen(Some(&target), "coordinate", [10, 20]).unwrap(), (110, 70));
        assert_eq!(to_screen(None, "coordinate", [10, 20]).unwrap(), (10, 20));
    }
}
