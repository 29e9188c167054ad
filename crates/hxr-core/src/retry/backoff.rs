//! Exponential backoff with optional jitter.

use std::time::Duration;

use rand::Rng;

use super::policy::RetryPolicy;

/// Exponent ceiling; `2^1024` is already infinite in f64 and gets capped anyway.
const MAX_EXPONENT: u32 = 1024;

/// Delay before the next try, given the number of retries already performed.
///
/// `attempt` is zero-based: 0 is the wait preceding the first retry.
/// Without jitter the result is `min(backoff_max, backoff_factor * 2^attempt)`;
/// with jitter that bound is scaled by a factor drawn uniformly from `[0.5, 1.0]`.
/// Never exceeds `backoff_max`.
pub fn backoff_delay<R: Rng + ?Sized>(policy: &RetryPolicy, attempt: u32, rng: &mut R) -> Duration {
    let exp = 2f64.powi(attempt.min(MAX_EXPONENT) as i32);
    let bounded = (policy.backoff_factor() * exp).min(policy.backoff_max());
    let secs = if policy.jitter() {
        bounded * rng.gen_range(0.5..=1.0)
    } else {
        bounded
    };
    let secs = secs.clamp(0.0, policy.backoff_max());
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
