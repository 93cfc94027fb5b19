//! Per-operation isolation pipeline: resolve, gate, bind, run.

use std::future::Future;

use tracing::{debug, info_span, Instrument};

use crate::application::gate::SafetyGate;
use crate::application::operation::InboundOperation;
use crate::application::resolver::ModeResolver;
use crate::domain::ModeContext;
use crate::error::Result;

/// Paths that bypass mode resolution entirely.
pub const EXEMPT_PATHS: &[&str] = &[
    "/",
    "/health",
    "/healthz",
    "/ready",
    "/docs",
    "/redoc",
    "/openapi.json",
];

/// Whether `path` is a health or documentation endpoint.
///
/// Paths with dot segments are never exempt, encoded or not, so
/// `/docs/../orders` goes through resolution like `/orders`.
#[must_use]
pub fn is_exempt_path(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    if path.split('/').any(is_dot_segment) {
        return false;
    }
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    };
    EXEMPT_PATHS.contains(&trimmed) || trimmed.starts_with("/docs/")
}

fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Result of admitting an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Exempt path; no mode was resolved.
    Bypassed,
    /// Mode resolved and gate passed.
    Admitted(ModeContext),
}

impl Admission {
    /// The context the handler runs under. Bypassed operations run as demo.
    #[must_use]
    pub fn context(&self) -> ModeContext {
        match self {
            Self::Bypassed => ModeContext::default(),
            Self::Admitted(ctx) => ctx.clone(),
        }
    }
}

/// Wraps inbound handlers with mode resolution and the safety gate.
#[derive(Debug, Clone)]
pub struct ModeGuard {
    resolver: ModeResolver,
    gate: SafetyGate,
}

impl ModeGuard {
    pub fn new(resolver: ModeResolver, gate: SafetyGate) -> Self {
        Self { resolver, gate }
    }

    /// Resolve the operation's mode and run the safety gate on it.
    pub async fn admit(&self, op: &InboundOperation) -> Result<Admission> {
        if is_exempt_path(&op.path) {
            debug!(path = %op.path, "Exempt path, skipping mode resolution");
            return Ok(Admission::Bypassed);
        }

        let ctx = self.resolver.resolve(op).await.into_context();
        self.gate.check(&ctx, op).await?;
        Ok(Admission::Admitted(ctx))
    }

    /// Admit `op`, then run `handler` with its context bound to the task.
    ///
    /// A rejected operation never reaches the handler.
    pub async fn run<F, Fut, T>(&self, op: &InboundOperation, handler: F) -> Result<T>
    where
        F: FnOnce(ModeContext) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let ctx = self.admit(op).await?.context();
        let span = info_span!("operation", method = %op.method, path = %op.path, mode = %ctx.mode());
        ctx.clone().scope(handler(ctx)).instrument(span).await
    }
}
