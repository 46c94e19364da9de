//! # LogWriter — simple outcome printer
//!
//! A minimal observer that prints every outcome to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [ok] at=1712345678.123s value=42
//! [error] at=1712345679.125s err="timed out after 1s"
//! ```

use std::fmt::Debug;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::error::TaskError;
use crate::observers::Observe;

/// Outcome writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<T> Observe<T> for LogWriter
where
    T: Debug + Send + Sync + 'static,
{
    async fn notify(&self, at: SystemTime, value: Option<&T>, error: Option<&TaskError>) {
        let at = at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();

        match (value, error) {
            (Some(v), _) => println!("[ok] at={at:.3}s value={v:?}"),
            (None, Some(e)) => println!("[error] at={at:.3}s err={:?}", e.to_string()),
            (None, None) => println!("[empty] at={at:.3}s"),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
