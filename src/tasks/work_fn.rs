//! # Function-backed work (`WorkFn`)
//!
//! [`WorkFn`] wraps a closure `F: Fn(Arc<[A]>) -> Fut`, producing a fresh
//! future per run. No state is shared between runs unless the closure
//! captures it explicitly (e.g. an `Arc<AtomicU64>`).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use timervisor::{TaskError, WorkFn, Work};
//!
//! let w = WorkFn::arc("greet", |args: Arc<[String]>| async move {
//!     Ok::<_, TaskError>(format!("hello {}", args.join(" ")))
//! });
//!
//! assert_eq!(w.name(), "greet");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::work::Work;

/// Function-backed work implementation.
///
/// Wraps a closure that *creates* a new future per run.
pub struct WorkFn<F, A, T> {
    name: Cow<'static, str>,
    f: F,
    _marker: PhantomData<fn(Arc<[A]>) -> T>,
}

impl<F, Fut, A, T> WorkFn<F, A, T>
where
    F: Fn(Arc<[A]>) -> Fut,
    Fut: Future<Output = Result<T, TaskError>>,
{
    /// Creates a new function-backed unit of work.
    ///
    /// Prefer [`WorkFn::arc`] when handing it straight to a builder.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _marker: PhantomData,
        }
    }

    /// Creates the work and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, A, T> fmt::Debug for WorkFn<F, A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkFn").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F, Fut, A, T> Work for WorkFn<F, A, T>
where
    F: Fn(Arc<[A]>) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    A: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    type Arg = A;
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, args: Arc<[A]>) -> Result<T, TaskError> {
        (self.f)(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_arguments_through_in_order() {
        let w = WorkFn::arc("concat", |args: Arc<[&'static str]>| async move {
            Ok::<_, TaskError>(args.concat())
        });
        let args: Arc<[&'static str]> = Arc::from(vec!["a", "b", "c"]);

        assert_eq!(w.execute(args.clone()).await, Ok("abc".to_string()));
        assert_eq!(w.execute(args).await, Ok("abc".to_string()));
    }

    #[tokio::test]
    async fn errors_are_returned_untouched() {
        let w = WorkFn::arc("fails", |_args: Arc<[()]>| async move {
            Err::<u8, _>(TaskError::fail("boom"))
        });
        assert_eq!(w.execute(Arc::from(vec![])).await, Err(TaskError::fail("boom")));
    }
}
