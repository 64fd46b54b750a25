//! One-shot environment and permission check.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::backend::{BackendError, DesktopBackends};
use crate::capabilities::run_blocking;

/// Availability of the backend behind one capability.
#[derive(Debug, Clone, Serialize)]
pub struct BackendCheck {
    pub capability: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentReport {
    pub checks: Vec<BackendCheck>,
}

impl EnvironmentReport {
    pub fn all_available(&self) -> bool {
        self.checks.iter().all(|c| c.available)
    }

    pub fn unavailable(&self) -> impl Iterator<Item = &BackendCheck> {
        self.checks.iter().filter(|c| !c.available)
    }
}

impl fmt::Display for EnvironmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            let status = if check.available { "ok" } else { "UNAVAILABLE" };
            writeln!(f, "{:<12} {}", check.capability, status)?;
            if let Some(message) = &check.message {
                writeln!(f, "{:<12}   {}", "", message)?;
            }
            if let Some(remediation) = &check.remediation {
                writeln!(f, "{:<12}   fix: {}", "", remediation)?;
            }
        }
        Ok(())
    }
}

fn to_check(capability: &str, outcome: Result<(), BackendError>) -> BackendCheck {
    let (message, remediation) = match outcome {
        Ok(()) => (None, None),
        Err(BackendError::Unavailable {
            message,
            remediation,
        }) => (Some(message), Some(remediation)),
        Err(other) => (Some(other.to_string()), None),
    };
    BackendCheck {
        capability: capability.to_string(),
        available: message.is_none(),
        message,
        remediation,
    }
}

pub(crate) async fn check(backends: &DesktopBackends) -> EnvironmentReport {
    let probes = backends.clone();
    let outcome = run_blocking(move || {
        // Pointer and keys share the input backend.
        let checks = vec![
            to_check("pointer", probes.input.probe()),
            to_check("keys", probes.input.probe()),
            to_check("controller", probes.controller.probe()),
            to_check("screen", probes.capture.probe()),
            to_check("window", probes.windows.probe()),
        ];
        Ok(checks)
    })
    .await;

    let checks = match outcome {
        Ok(checks) => checks,
        Err(e) => {
            warn!("Environment check aborted: {}", e);
            Vec::new()
        }
    };
    for check in &checks {
        match &check.message {
            None => info!("{} backend available", check.capability),
            Some(message) => warn!("{} backend unavailable: {}", check.capability, message),
        }
    }
    EnvironmentReport { checks }
}
