//! Background jobs with an explicit mode.
//!
//! A job never inherits the mode of whatever scheduled it. The caller
//! states the mode up front and the body runs with it bound.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{info, info_span, Instrument};

use crate::domain::{Mode, ModeContext};

/// Run `body` with a job context for `mode` bound to the current task.
pub async fn run_job<F, Fut, T>(job: &str, mode: Mode, body: F) -> T
where
    F: FnOnce(ModeContext) -> Fut,
    Fut: Future<Output = T>,
{
    let ctx = ModeContext::for_job(mode, job);
    info!(job, mode = %mode, "Starting job");
    let span = info_span!("job", name = job, mode = %mode);
    ctx.clone().scope(body(ctx)).instrument(span).await
}

/// Spawn [`run_job`] on the runtime.
pub fn spawn_job<F, Fut, T>(job: impl Into<String>, mode: Mode, body: F) -> JoinHandle<T>
where
    F: FnOnce(ModeContext) -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let job = job.into();
    tokio::spawn(async move { run_job(&job, mode, body).await })
}
