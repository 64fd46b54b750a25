//! Sequence engine - runs an ordered batch of operations under one policy.

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use deskhand_protocols::{
    ActionError, ActionResult, ContentItem, ErrorPayload, InvocationContext, InvocationSource,
    TargetContext, TargetId,
};

use super::types::{
    SequenceCommand, SequencePolicy, SequenceRecord, SequenceRequest, SequenceStatus, StepOutcome,
};
use crate::registry::CapabilityRegistry;

/// Executes sequences of capability operations against a registry.
#[derive(Clone)]
pub struct SequenceEngine {
    registry: Arc<CapabilityRegistry>,
}

impl SequenceEngine {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<CapabilityRegistry> {
        &self.registry
    }

    /// Execute a caller-specified sequence.
    pub async fn execute(&self, request: &SequenceRequest, targets: &TargetContext) -> SequenceRecord {
        info!(
            "Executing sequence of {} commands (stop_on_error={}, capture_intermediate={})",
            request.commands.len(),
            request.policy.stop_on_error,
            request.policy.capture_intermediate
        );
        self.run(
            request.target,
            &request.commands,
            request.policy,
            targets,
            |step| InvocationSource::Sequence { step },
        )
        .await
    }

    /// Run `commands` in order, tagging every invocation with `source(step)`.
    pub async fn run<F>(
        &self,
        shared_target: Option<TargetId>,
        commands: &[SequenceCommand],
        policy: SequencePolicy,
        targets: &TargetContext,
        source: F,
    ) -> SequenceRecord
    where
        F: Fn(usize) -> InvocationSource,
    {
        let mut record = SequenceRecord::new(commands.len());
        // Index of the last successful step and its result.
        let mut last_success: Option<(usize, ActionResult)> = None;

        for (index, command) in commands.iter().enumerate() {
            if index > 0 && policy.delay_between_ms > 0 {
                tokio::time::sleep(Duration::from_millis(policy.delay_between_ms)).await;
            }

            let ctx = InvocationContext::new(targets.clone()).with_source(source(index));
            let started = Instant::now();
            let result = match command.params_with_target(shared_target) {
                Ok(params) => self.execute_step(command, params, &ctx).await,
                Err(e) => Err(e),
            };
            let duration_ms = started.elapsed().as_millis() as u64;

            match result {
                Ok(result) => {
                    debug!(
                        "Step {} ({}.{}) succeeded in {}ms",
                        index, command.capability, command.operation, duration_ms
                    );
                    record.record(StepOutcome {
                        index,
                        capability: command.capability.clone(),
                        operation: command.operation.clone(),
                        success: true,
                        error: None,
                        duration_ms,
                    });
                    if policy.capture_intermediate || command.capture {
                        record.content.extend(result.content.iter().cloned());
                    }
                    last_success = Some((index, result));
                }
                Err(err) => {
                    warn!(
                        "Step {} ({}.{}) failed: {}",
                        index, command.capability, command.operation, err
                    );
                    record.record(StepOutcome {
                        index,
                        capability: command.capability.clone(),
                        operation: command.operation.clone(),
                        success: false,
                        error: Some(err.to_string()),
                        duration_ms,
                    });
                    if policy.stop_on_error {
                        record.status = SequenceStatus::Error;
                        record.error = Some(ErrorPayload::from(&err));
                        record.content.push(ContentItem::text(record.summary_text()));
                        return record;
                    }
                }
            }
        }

        if !policy.capture_intermediate {
            if let Some((index, result)) = last_success {
                // A captured step already contributed its images.
                if !commands[index].capture {
                    record.content.extend(result.images().cloned());
                }
            }
        }

        record.status = if record.failed == 0 {
            SequenceStatus::Success
        } else {
            SequenceStatus::Partial
        };
        record.content.push(ContentItem::text(record.summary_text()));
        record
    }

    /// Resolve and invoke a single step.
    pub async fn execute_step(
        &self,
        command: &SequenceCommand,
        params: serde_json::Value,
        ctx: &InvocationContext,
    ) -> Result<ActionResult, ActionError> {
        let capability = self.registry.resolve(&command.capability)?;
        capability.validate(&params)?;
        debug!(
            "Invoking {}.{} [{}] ({})",
            command.capability, command.operation, ctx.source, ctx.correlation_id
        );
        capability.execute(&command.operation, params, ctx).await
    }
}
