use std::future::Future;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Fixed-delay polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}

/// Outcome of a single status check
#[derive(Debug, Clone, PartialEq)]
pub enum PollObservation<T> {
    /// The vendor answered with something we understood
    Observed(T),
    /// Nothing usable this time (network hiccup, 5xx, garbled body); keep polling
    Miss(String),
}

/// Terminal value plus the number of checks it took
#[derive(Debug, Clone, PartialEq)]
pub struct Polled<T> {
    pub value: T,
    pub attempts: u32,
}

#[derive(Debug, PartialEq)]
pub enum PollError<E> {
    /// Ceiling reached without a terminal value
    Timeout {
        attempts: u32,
        last_miss: Option<String>,
    },
    /// The check reported a persistent failure
    Aborted { error: E, attempts: u32 },
}

/// Sleep `policy.interval`, run `check`, and repeat until `is_terminal` accepts
/// an observed value or `policy.max_attempts` checks have been made.
///
/// Returns as soon as a terminal value is seen; no sleep follows it. The loop
/// lives entirely inside the returned future, so dropping that future (for
/// instance when the HTTP client disconnects) stops polling at the next await.
pub async fn poll_until_terminal<T, E, F, Fut, P>(
    policy: PollPolicy,
    mut check: F,
    is_terminal: P,
) -> Result<Polled<T>, PollError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PollObservation<T>, E>>,
    P: Fn(&T) -> bool,
{
    let mut last_miss = None;

    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;

        match check(attempt).await {
            Ok(PollObservation::Observed(value)) => {
                if is_terminal(&value) {
                    return Ok(Polled {
                        value,
                        attempts: attempt,
                    });
                }
                tracing::debug!(attempt, max_attempts = policy.max_attempts, "Not terminal yet");
            }
            Ok(PollObservation::Miss(reason)) => {
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    reason = %reason,
                    "Transient miss while polling"
                );
                last_miss = Some(reason);
            }
            Err(error) => {
                return Err(PollError::Aborted {
                    error,
                    attempts: attempt,
                })
            }
        }
    }

    Err(PollError::Timeout {
        attempts: policy.max_attempts,
        last_miss,
    })
}
