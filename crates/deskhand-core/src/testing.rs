//! Test doubles shared by the core unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use deskhand_protocols::{
    ActionError, ActionResult, ActionSummary, Capability, CapabilityCategory,
    CapabilityDescriptor, ContentItem, InvocationContext, OperationDescriptor,
};

/// Capability that counts calls and records the params it receives.
///
/// Operations:
/// - `tap` succeeds with a summary and a one-byte image
/// - `fail` always fails
/// - `echo` succeeds with the params rendered as text
/// - `panic` panics after counting the call
pub(crate) struct CountingCapability {
    descriptor: CapabilityDescriptor,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Value)>>,
}

impl CountingCapability {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(
                name,
                CapabilityCategory::Input,
                "Counts invocations",
            ),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn seen(&self) -> Vec<(String, Value)> {
        self.seen.lock().clone()
    }

    pub(crate) fn calls_of(&self, operation: &str) -> usize {
        self.seen.lock().iter().filter(|(op, _)| op == operation).count()
    }
}

#[async_trait]
impl Capability for CountingCapability {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new("tap", "Succeed and return an image"),
            OperationDescriptor::new("fail", "Always fail"),
            OperationDescriptor::new("echo", "Echo params").read_only(),
            OperationDescriptor::new("panic", "Panic mid-call"),
        ]
    }

    async fn execute(
        &self,
        operation: &str,
        params: Value,
        _ctx: &InvocationContext,
    ) -> Result<ActionResult, ActionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push((operation.to_string(), params.clone()));
        match operation {
            "tap" => Ok(ActionSummary::new(self.name(), "tap")
                .into_result()
                .with_item(ContentItem::image(&[0xAB], "image/jpeg"))),
            "fail" => Err(ActionError::ExecutionFailed("scripted failure".into())),
            "echo" => Ok(ActionResult::text(params.to_string())),
            "panic" => panic!("scripted panic"),
            other => Err(ActionError::unknown_operation(self.name(), other)),
        }
    }
}
