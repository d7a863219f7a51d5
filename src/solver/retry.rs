use anyhow::Result;
use std::time::Duration;

/// Bounded retry with a fixed delay between attempts.
///
/// An explicit policy object applied by callers around operations that
/// can fail transiently. The wrapped call is expected to re-enter from
/// its own idempotent cache lookups, so retrying after a partial
/// write-through is safe.
#[derive(Debug, Clone, Copy)]
pub struct Retry {
    attempts: usize,
    delay: Duration,
}

impl Default for Retry {
    fn default() -> Self {
        Self::new(
            crate::RETRY_ATTEMPTS,
            Duration::from_millis(crate::RETRY_DELAY_MS),
        )
    }
}

impl Retry {
    pub fn new(attempts: usize, delay: Duration) -> Self {
        assert!(attempts > 0);
        Self { attempts, delay }
    }

    pub fn run<T>(&self, mut f: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match f() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.attempts => {
                    log::warn!("attempt {} of {} failed: {}", attempt, self.attempts, e);
                    std::thread::sleep(self.delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn policy() -> Retry {
        Retry::new(3, Duration::from_millis(0))
    }

    #[test]
    fn first_success_short_circuits() {
        let mut calls = 0;
        let result = policy().run(|| {
            calls += 1;
            Ok::<_, anyhow::Error>(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn transient_failures_are_absorbed() {
        let mut calls = 0;
        let result = policy().run(|| {
            calls += 1;
            match calls < 3 {
                true => Err(anyhow!("transient")),
                false => Ok(calls),
            }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn persistent_failures_propagate() {
        let mut calls = 0;
        let result = policy().run(|| -> Result<()> {
            calls += 1;
            Err(anyhow!("persistent"))
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }
}
