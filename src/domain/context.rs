//! Per-operation mode binding.
//!
//! A [`ModeContext`] is an immutable value created at the start of one
//! operation. It is passed explicitly down the call path and can also be
//! bound to the current task with [`ModeContext::scope`], after which
//! [`ModeContext::current`] returns it anywhere inside that task.
//!
//! The binding is task-local. A task spawned with `tokio::spawn` starts
//! unbound and reads as demo; use [`ModeContext::spawn`] to carry the
//! binding into sub-work of the same operation.

use std::fmt;
use std::future::Future;

use tokio::task::JoinHandle;

use super::mode::Mode;

tokio::task_local! {
    static CURRENT: ModeContext;
}

/// The resolved mode of one operation plus an optional diagnostic tag
/// describing where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModeContext {
    mode: Mode,
    origin: Option<String>,
}

impl ModeContext {
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self { mode, origin: None }
    }

    pub fn with_origin(mode: Mode, origin: impl Into<String>) -> Self {
        Self {
            mode,
            origin: Some(origin.into()),
        }
    }

    /// Context for a background job. Jobs never inherit a caller's mode.
    pub fn for_job(mode: Mode, job: &str) -> Self {
        Self::with_origin(mode, format!("job:{job}"))
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// The context bound to the current task, or a demo context when
    /// nothing is bound.
    #[must_use]
    pub fn current() -> Self {
        CURRENT.try_with(Clone::clone).unwrap_or_default()
    }

    /// Shorthand for `ModeContext::current().mode()`.
    #[must_use]
    pub fn current_mode() -> Mode {
        CURRENT.try_with(|ctx| ctx.mode).unwrap_or_default()
    }

    /// Whether the current task has an explicit binding.
    #[must_use]
    pub fn is_bound() -> bool {
        CURRENT.try_with(|_| ()).is_ok()
    }

    /// Run `fut` with this context bound. Nested scopes shadow outer ones
    /// for their duration.
    pub fn scope<F>(self, fut: F) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        CURRENT.scope(self, fut)
    }

    /// Synchronous counterpart of [`scope`](Self::scope).
    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self, f)
    }

    /// Spawn `fut` on the runtime with this context bound.
    pub fn spawn<F>(self, fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::spawn(CURRENT.scope(self, fut))
    }
}

impl fmt::Display for ModeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Some(origin) => write!(f, "{} ({origin})", self.mode),
            None => write!(f, "{}", self.mode),
        }
    }
}
