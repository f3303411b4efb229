//! Retry a fallible operation with exponential backoff.
//!
//! ```no_run
//! use sdsstools_core::retrier::Retrier;
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let retrier = Retrier::new()
//!     .with_max_attempts(5)
//!     .with_delay(Duration::from_millis(100))
//!     .with_timeout(Duration::from_secs(2));
//!
//! let body = retrier
//!     .run_async(|| async { tokio::fs::read_to_string("/data/status").await })
//!     .await?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

use rand::Rng;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

type ErrorCallback = Arc<dyn Fn(&(dyn StdError + 'static)) + Send + Sync>;
type ErrorPredicate = Arc<dyn Fn(&(dyn StdError + 'static)) -> bool + Send + Sync>;

/// Upper bound of the random delay added to each backoff.
const MAX_JITTER: Duration = Duration::from_millis(100);

/// Failure of a single async attempt.
#[derive(Debug, Error)]
pub enum AttemptError<E: StdError + 'static> {
    /// The attempt did not finish within the configured timeout
    #[error("Attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The operation returned an error
    #[error(transparent)]
    Failed(#[from] E),
}

impl<E: StdError + 'static> AttemptError<E> {
    /// The operation's error, if the attempt did not time out.
    pub fn into_inner(self) -> Option<E> {
        match self {
            AttemptError::Failed(e) => Some(e),
            AttemptError::Timeout(_) => None,
        }
    }

    /// Whether the attempt timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AttemptError::Timeout(_))
    }
}

/// Retry policy.
///
/// Each failure increments the attempt count. The error is returned once the
/// count reaches `max_attempts` or `is_fatal` accepts it; otherwise
/// `on_retry` is called and the retrier sleeps for
/// [`calculate_delay`](Retrier::calculate_delay).
#[derive(Clone)]
pub struct Retrier {
    /// Attempts before giving up
    pub max_attempts: u32,
    /// Base delay between attempts
    pub delay: Duration,
    /// Grow the delay exponentially with each attempt
    pub use_exponential_backoff: bool,
    /// Growth factor for exponential backoff
    pub exponential_backoff_base: f64,
    /// Cap on the exponential delay
    pub max_delay: Duration,
    /// Per-attempt limit, async only
    pub timeout: Option<Duration>,
    on_retry: Option<ErrorCallback>,
    is_fatal: Option<ErrorPredicate>,
}

impl Default for Retrier {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            use_exponential_backoff: true,
            exponential_backoff_base: 2.0,
            max_delay: Duration::from_secs(32),
            timeout: None,
            on_retry: None,
            is_fatal: None,
        }
    }
}

impl fmt::Debug for Retrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retrier")
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .field("use_exponential_backoff", &self.use_exponential_backoff)
            .field("exponential_backoff_base", &self.exponential_backoff_base)
            .field("max_delay", &self.max_delay)
            .field("timeout", &self.timeout)
            .field("on_retry", &self.on_retry.is_some())
            .field("is_fatal", &self.is_fatal.is_some())
            .finish()
    }
}

impl Retrier {
    /// Three attempts, 1 s exponential backoff capped at 32 s.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the base delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Enable or disable exponential backoff.
    pub fn with_exponential_backoff(mut self, enabled: bool) -> Self {
        self.use_exponential_backoff = enabled;
        self
    }

    /// Set the exponential backoff base.
    pub fn with_backoff_base(mut self, base: f64) -> Self {
        self.exponential_backoff_base = base;
        self
    }

    /// Cap the exponential delay.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Bound each async attempt.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Called with each error that will be retried.
    pub fn with_on_retry<F>(mut self, on_retry: F) -> Self
    where
        F: Fn(&(dyn StdError + 'static)) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(on_retry));
        self
    }

    /// Errors accepted by `is_fatal` are returned without retrying.
    ///
    /// Match on concrete types with `downcast_ref`.
    pub fn with_is_fatal<F>(mut self, is_fatal: F) -> Self
    where
        F: Fn(&(dyn StdError + 'static)) -> bool + Send + Sync + 'static,
    {
        self.is_fatal = Some(Arc::new(is_fatal));
        self
    }

    /// Delay before the attempt following failed attempt number `attempt`.
    ///
    /// With exponential backoff this is
    /// `delay * base^(attempt - 1) + jitter`, capped at `max_delay`, where
    /// the jitter is between 0 and 100 ms.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        if !self.use_exponential_backoff {
            return self.delay;
        }

        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self.delay.as_secs_f64() * self.exponential_backoff_base.powi(exponent);
        let total = scaled + jitter().as_secs_f64();

        if !total.is_finite() || total >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(total.max(0.0))
        }
    }

    /// Whether to give up after failed attempt number `attempt`.
    fn should_stop(&self, attempt: u32, error: &(dyn StdError + 'static)) -> bool {
        if attempt >= self.max_attempts {
            return true;
        }
        if self.is_fatal.as_ref().map_or(false, |is_fatal| is_fatal(error)) {
            debug!(error = %error, "Not retrying fatal error");
            return true;
        }
        if let Some(on_retry) = &self.on_retry {
            on_retry(error);
        }
        false
    }

    /// Call `operation` until it succeeds, blocking between attempts.
    ///
    /// `timeout` cannot be applied to blocking calls and is ignored with a
    /// warning.
    pub fn run<T, E, F>(&self, mut operation: F) -> Result<T, E>
    where
        E: StdError + 'static,
        F: FnMut() -> Result<T, E>,
    {
        if self.timeout.is_some() {
            warn!("The operation is not async. The timeout will be ignored.");
        }

        let mut attempt = 0;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if self.should_stop(attempt, &e) {
                        return Err(e);
                    }
                    let delay = self.calculate_delay(attempt);
                    debug!(attempt, ?delay, error = %e, "Retrying");
                    std::thread::sleep(delay);
                }
            }
        }
    }

    /// Await `operation` until it succeeds, bounding each attempt by
    /// `timeout` if set. A timed out attempt counts as a failure.
    pub async fn run_async<T, E, F, Fut>(&self, mut operation: F) -> Result<T, AttemptError<E>>
    where
        E: StdError + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            let outcome = match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, operation()).await {
                    Ok(result) => result.map_err(AttemptError::Failed),
                    Err(_) => Err(AttemptError::Timeout(limit)),
                },
                None => operation().await.map_err(AttemptError::Failed),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if self.should_stop(attempt, &e) {
                        return Err(e);
                    }
                    let delay = self.calculate_delay(attempt);
                    debug!(attempt, ?delay, error = %e, "Retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Random delay below [`MAX_JITTER`].
fn jitter() -> Duration {
    rand::thread_rng().gen_range(Duration::ZERO..MAX_JITTER)
}
