//! Retry loop: run an operation until it succeeds, fails fatally, or runs out of tries.

use rand::Rng;

use super::backoff::backoff_delay;
use super::classify::{AttemptOutcome, HasStatus};
use super::error::RequestError;
use super::policy::RetryPolicy;
use crate::timer::Timer;

/// What the loop does after reconciling one outcome.
#[derive(Debug)]
enum Step<R> {
    /// Non-retryable response.
    Succeeded(R),
    /// Non-retryable error, propagated as raised.
    Failed(RequestError),
    /// Out of tries. A retryable status returns its last response; a retryable
    /// error re-raises its last error. Callers may rely on both behaviours.
    Exhausted(Result<R, RequestError>),
    /// Wait and try again; `reason` is only used for logging.
    Retry { reason: String },
}

fn reconcile<R: HasStatus>(policy: &RetryPolicy, attempt: u32, outcome: AttemptOutcome<R>) -> Step<R> {
    let can_retry = attempt < policy.max_retries();
    match outcome {
        AttemptOutcome::Success(resp) => Step::Succeeded(resp),
        AttemptOutcome::Fatal(e) => Step::Failed(e),
        AttemptOutcome::RetryableStatus(resp) if can_retry => Step::Retry {
            reason: format!("status {}", resp.status()),
        },
        AttemptOutcome::RetryableStatus(resp) => Step::Exhausted(Ok(resp)),
        AttemptOutcome::RetryableError(e) if can_retry => Step::Retry {
            reason: e.to_string(),
        },
        AttemptOutcome::RetryableError(e) => Step::Exhausted(Err(e)),
    }
}

/// Runs `op` up to `policy.total_attempts()` times.
///
/// Between tries the calling thread blocks on `timer` for the backoff delay of
/// the current attempt index. There is no overall deadline; the loop is bounded
/// by the attempt count only.
pub fn run_with_retry<R, F, T, G>(
    policy: &RetryPolicy,
    timer: &T,
    rng: &mut G,
    mut op: F,
) -> Result<R, RequestError>
where
    R: HasStatus,
    F: FnMut() -> Result<R, RequestError>,
    T: Timer + ?Sized,
    G: Rng + ?Sized,
{
    let total = policy.total_attempts();
    let mut attempt = 0u32;
    loop {
        let outcome = AttemptOutcome::classify(policy, op());
        match reconcile(policy, attempt, outcome) {
            Step::Succeeded(resp) => {
                if attempt > 0 {
                    tracing::info!("request succeeded on attempt {}", attempt + 1);
                }
                return Ok(resp);
            }
            Step::Failed(e) => {
                tracing::debug!("request failed with non-retryable {}", e);
                return Err(e);
            }
            Step::Exhausted(result) => {
                let reason = match &result {
                    Ok(resp) => format!("status {}", resp.status()),
                    Err(e) => e.to_string(),
                };
                tracing::warn!(
                    "request failed with {}, max retries ({}) exceeded",
                    reason,
                    policy.max_retries()
                );
                return result;
            }
            Step::Retry { reason } => {
                let delay = backoff_delay(policy, attempt, rng);
                tracing::warn!(
                    "request failed with {}, retrying in {:.2} seconds (attempt {}/{})",
                    reason,
                    delay.as_secs_f64(),
                    attempt + 1,
                    total
                );
                timer.sleep(delay);
                attempt += 1;
            }
        }
    }
}
