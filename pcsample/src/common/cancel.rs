use crate::{Result, SampleError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A cooperative stop signal for long-running sampling calls. Clones share the same flag, so a
/// token handed to a worker can be tripped from another thread. An optional deadline trips the
/// token implicitly once it has passed.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Create a token which only stops when `cancel` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token which also stops once `deadline` has been reached.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    /// Create a token which stops once `timeout` has elapsed from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Returns `Err(SampleError::Cancelled)` if the token has been tripped, for use with `?` at
    /// the top of sampler loops.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(SampleError::Cancelled)
        } else {
            Ok(())
        }
    }
}
