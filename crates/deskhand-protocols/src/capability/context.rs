//! Invocation context and the shared targeting cell.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Identifier of a target window: its index in the live enumeration.
pub type TargetId = i64;

/// Process-wide "selected target" cell.
///
/// Cloning yields another handle onto the same cell. Writes happen only
/// through an explicit select operation; last write wins.
#[derive(Debug, Clone, Default)]
pub struct TargetContext {
    selected: Arc<RwLock<Option<TargetId>>>,
}

impl TargetContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or clear the selection.
    pub fn select(&self, target: Option<TargetId>) {
        *self.selected.write() = target;
    }

    /// The stored selection, if any.
    pub fn current(&self) -> Option<TargetId> {
        *self.selected.read()
    }

    /// Explicit target wins, else the stored selection, else none (focused window).
    pub fn effective(&self, explicit: Option<TargetId>) -> Option<TargetId> {
        explicit.or_else(|| self.current())
    }
}

/// Where an invocation came from. Used for log correlation only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationSource {
    Direct,
    Sequence { step: usize },
    Autopress { id: String },
}

impl fmt::Display for InvocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Sequence { step } => write!(f, "sequence[{}]", step),
            Self::Autopress { id } => write!(f, "autopress:{}", id),
        }
    }
}

/// Context for one operation call.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// Correlation ID for tracing.
    pub correlation_id: String,

    pub source: InvocationSource,

    /// Shared targeting cell.
    pub targets: TargetContext,
}

impl InvocationContext {
    pub fn new(targets: TargetContext) -> Self {
        Self {
            correlation_id: uuid::Uuid::new_v4().to_string(),
            source: InvocationSource::Direct,
            targets,
        }
    }

    pub fn with_source(mut self, source: InvocationSource) -> Self {
        self.source = source;
        self
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
