//! # One run of the work on its own execution context.
//!
//! An [`Invocation`] spawns the work onto a dedicated Tokio task, apart from
//! the scheduler loop, and resolves to the run's result:
//!
//! ```text
//! Ok(value)              ─► Ok(value)
//! Err(TaskError)         ─► Err(TaskError)            (returned by the work)
//! panic                  ─► Err(TaskError::Panicked)  (caught by the join handle)
//! cancelled by runtime   ─► Err(TaskError::Canceled)  (runtime shutdown)
//! ```
//!
//! ## Forced termination
//! [`Invocation::terminate`] aborts the task: the work's future is dropped at
//! its current `.await` point without being asked first. This holds for work
//! that waits on something that will never happen. Work that blocks the
//! executor thread without yielding cannot be preempted this way.
//!
//! Values owned by the aborted future are dropped normally; an operation in
//! progress (a half-written file, a lock held on a remote service) is simply
//! abandoned.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::error::{TaskError, panic_message};
use crate::tasks::Work;

/// Handle to the single in-flight run.
///
/// Dropping the handle aborts the run.
pub(crate) struct Invocation<T> {
    handle: JoinHandle<Result<T, TaskError>>,
}

impl<T: Send + 'static> Invocation<T> {
    /// Spawns one run of `work` with `args`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<W>(work: Arc<W>, args: Arc<[W::Arg]>) -> Self
    where
        W: Work<Output = T>,
    {
        let handle = tokio::spawn(async move { work.execute(args).await });
        Self { handle }
    }
}

impl<T> Invocation<T> {
    /// Aborts the run and waits until its task has been torn down.
    pub async fn terminate(mut self) {
        self.handle.abort();
        let _ = (&mut self.handle).await;
    }
}

impl<T> Future for Invocation<T> {
    type Output = Result<T, TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            Ok(res) => res,
            Err(err) if err.is_panic() => Err(TaskError::Panicked {
                info: panic_message(err.into_panic().as_ref()),
            }),
            Err(_cancelled) => Err(TaskError::Canceled),
        })
    }
}

impl<T> Drop for Invocation<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
