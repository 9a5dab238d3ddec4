//! # Diagnostics
//!
//! Developer-facing warnings raised while routing actions. They never change
//! behaviour: the offending action is dropped either way. Where the warning
//! goes is up to the caller; by default it is logged.

use std::fmt;
use std::sync::{Arc, Mutex};

use log::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterDiagnostic {
    /// A screen action arrived for a route that is no longer in the list,
    /// typically because the user dismissed it while the action was in flight.
    StaleRouteAction {
        route: String,
        route_count: usize,
        action: String,
    },
}

impl fmt::Display for RouterDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterDiagnostic::StaleRouteAction {
                route,
                route_count,
                action,
            } => write!(
                f,
                "received an action for route {route} but the routes only contain \
                 {route_count} element(s); the route may have been removed before the \
                 action was sent. Action: {action}"
            ),
        }
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: RouterDiagnostic);
}

impl<F: Fn(RouterDiagnostic) + Send + Sync> DiagnosticSink for F {
    fn report(&self, diagnostic: RouterDiagnostic) {
        self(diagnostic)
    }
}

/// Logs every diagnostic at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: RouterDiagnostic) {
        warn!("{diagnostic}");
    }
}

/// Keeps diagnostics in memory so they can be inspected later.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    reports: Arc<Mutex<Vec<RouterDiagnostic>>>,
}

impl CollectingSink {
    pub fn reports(&self) -> Vec<RouterDiagnostic> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: RouterDiagnostic) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(diagnostic);
        }
    }
}
