use std::time::Duration;

use tracing::{error, info};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(800);

/// Stands in for the network call behind a form submission.
///
/// Waits `delay`, then runs `work`. A failure is logged and reported as
/// `false`; it never reaches the caller as an error.
pub async fn simulate_submission<T, E>(
    label: &str,
    delay: Duration,
    work: impl FnOnce() -> Result<T, E>,
) -> Option<T>
where
    E: std::fmt::Display,
{
    tokio::time::sleep(delay).await;
    match work() {
        Ok(value) => {
            info!(label, "submission accepted");
            Some(value)
        }
        Err(err) => {
            error!(label, "submission failed: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn waits_for_the_fixed_delay() {
        let started = tokio::time::Instant::now();
        let result =
            simulate_submission("student", Duration::from_millis(800), || Ok::<_, String>(7)).await;
        assert_eq!(result, Some(7));
        assert!(started.elapsed() >= Duration::from_millis(800));
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let result = simulate_submission("student", Duration::ZERO, || {
            Err::<(), _>(anyhow::anyhow!("seat limit reached"))
        })
        .await;
        assert_eq!(result, None);
    }
}
