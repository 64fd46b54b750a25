//! Router implementation.

#[cfg(test)]
#[path = "routing_tests.rs"]
mod tests;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use deskhand_protocols::{
    ActionError, ActionResult, InvocationContext, InvocationResponse, TargetContext, from_params,
};

use super::types::{AutopressStartRequest, AutopressStopRequest, OperationListing, RouterLimits};
use crate::autopress::{AutopressEngine, AutopressStatus};
use crate::registry::CapabilityRegistry;
use crate::sequence::{SequenceCommand, SequenceEngine, SequenceRecord, SequenceRequest};

/// Entry point for every inbound call.
///
/// Owns the shared [`TargetContext`] and hands clones of it to the sequence
/// and autopress engines. Every public call returns a value; errors arising
/// from handlers are converted into failure responses.
pub struct Router {
    registry: Arc<CapabilityRegistry>,
    targets: TargetContext,
    limits: RouterLimits,
    sequence: SequenceEngine,
    autopress: AutopressEngine,
}

impl Router {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        let targets = TargetContext::new();
        let limits = RouterLimits::default();
        let sequence = SequenceEngine::new(registry.clone());
        let autopress = AutopressEngine::new(sequence.clone(), targets.clone())
            .with_min_interval(limits.min_autopress_interval_ms);
        Self {
            registry,
            targets,
            limits,
            sequence,
            autopress,
        }
    }

    /// Use an existing targeting cell, e.g. one shared with capability setup.
    pub fn with_targets(mut self, targets: TargetContext) -> Self {
        self.targets = targets;
        self.rebuild_autopress();
        self
    }

    pub fn with_limits(mut self, limits: RouterLimits) -> Self {
        self.limits = limits;
        self.rebuild_autopress();
        self
    }

    fn rebuild_autopress(&mut self) {
        self.autopress = AutopressEngine::new(self.sequence.clone(), self.targets.clone())
            .with_min_interval(self.limits.min_autopress_interval_ms);
    }

    pub fn registry(&self) -> &Arc<CapabilityRegistry> {
        &self.registry
    }

    pub fn targets(&self) -> &TargetContext {
        &self.targets
    }

    pub fn limits(&self) -> RouterLimits {
        self.limits
    }

    /// Every registered capability's operations, ordered by capability name
    /// and then declaration order.
    pub fn list_capability_operations(&self) -> Vec<OperationListing> {
        self.registry
            .all()
            .into_iter()
            .flat_map(|(name, capability)| {
                let category = capability.descriptor().category;
                capability
                    .operations()
                    .into_iter()
                    .map(move |op| OperationListing {
                        capability: name.clone(),
                        category,
                        operation: op.name,
                        description: op.description,
                        parameters_schema: op.parameters_schema,
                        side_effect: op.side_effect,
                    })
            })
            .collect()
    }

    /// Invoke one capability operation.
    pub async fn invoke(&self, capability: &str, operation: &str, params: Value) -> InvocationResponse {
        self.try_invoke(capability, operation, params).await.into()
    }

    async fn try_invoke(
        &self,
        capability: &str,
        operation: &str,
        params: Value,
    ) -> Result<ActionResult, ActionError> {
        let handler = self.registry.resolve(capability)?;
        handler.validate(&params)?;
        let ctx = InvocationContext::new(self.targets.clone());
        debug!(
            "Invoking {}.{} ({})",
            capability, operation, ctx.correlation_id
        );
        handler.execute(operation, params, &ctx).await
    }

    /// Route by identifier: `"<capability>.<operation>"` or one of the
    /// meta operations.
    pub async fn dispatch(&self, operation_id: &str, params: Value) -> InvocationResponse {
        match operation_id {
            "execute_sequence" => match from_params::<SequenceRequest>(params) {
                Ok(request) => self.invoke_sequence(request).await.into_response(),
                Err(e) => InvocationResponse::failure(&e),
            },
            "autopress_start" => self.dispatch_autopress_start(params).into(),
            "autopress_stop" => self.dispatch_autopress_stop(params).into(),
            "autopress_list" => json_result(&self.autopress_list()).into(),
            "autopress_status" => json_result(&self.autopress_status()).into(),
            id => match id.split_once('.') {
                Some((capability, operation)) if !capability.is_empty() && !operation.is_empty() => {
                    self.invoke(capability, operation, params).await
                }
                _ => InvocationResponse::failure(&ActionError::not_found("Operation", id)),
            },
        }
    }

    fn dispatch_autopress_start(&self, params: Value) -> Result<ActionResult, ActionError> {
        let request: AutopressStartRequest = from_params(params)?;
        let id = request.id.clone();
        self.autopress_start(request)?;
        json_result(&serde_json::json!({ "started": id }))
    }

    fn dispatch_autopress_stop(&self, params: Value) -> Result<ActionResult, ActionError> {
        let request: AutopressStopRequest = from_params(params)?;
        let stopped = self.autopress_stop(request.id.as_deref());
        json_result(&serde_json::json!({ "stopped": stopped }))
    }

    /// Run a sequence. Rejected requests come back as an error record.
    pub async fn invoke_sequence(&self, request: SequenceRequest) -> SequenceRecord {
        if let Err(e) = self.check_sequence(&request) {
            debug!("Sequence rejected: {}", e);
            return SequenceRecord::rejected(request.commands.len(), &e);
        }
        self.sequence.execute(&request, &self.targets).await
    }

    fn check_sequence(&self, request: &SequenceRequest) -> Result<(), ActionError> {
        if request.commands.is_empty() {
            return Err(ActionError::invalid_parameter(
                "commands",
                "commands must not be empty",
            ));
        }
        if request.policy.delay_between_ms > self.limits.max_sequence_delay_ms {
            return Err(ActionError::invalid_parameter(
                "delay_between_ms",
                format!(
                    "delay_between_ms must be at most {}",
                    self.limits.max_sequence_delay_ms
                ),
            ));
        }
        Ok(())
    }

    pub fn autopress_start(&self, request: AutopressStartRequest) -> Result<(), ActionError> {
        self.autopress
            .start(request.id, request.commands, request.interval_ms)
    }

    /// Start an entry from loose parts.
    pub fn autopress_start_with(
        &self,
        id: impl Into<String>,
        commands: Vec<SequenceCommand>,
        interval_ms: u64,
    ) -> Result<(), ActionError> {
        self.autopress.start(id, commands, interval_ms)
    }

    /// Stop `id`, or every entry when `id` is `None`. Returns how many
    /// entries were stopped, so an unknown id yields 0.
    pub fn autopress_stop(&self, id: Option<&str>) -> usize {
        match id {
            Some(id) => usize::from(self.autopress.stop(id)),
            None => self.autopress.stop_all(),
        }
    }

    pub fn autopress_list(&self) -> Vec<String> {
        self.autopress.list_active_ids()
    }

    pub fn autopress_status(&self) -> Vec<AutopressStatus> {
        self.autopress.status()
    }

    /// Stop all repeating work and wait for in-flight ticks.
    pub async fn shutdown(&self) -> usize {
        info!("Router shutting down");
        self.autopress.shutdown().await
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<ActionResult, ActionError> {
    serde_json::to_string(value)
        .map(ActionResult::text)
        .map_err(|e| ActionError::ExecutionFailed(format!("failed to encode result: {}", e)))
}
