use std::fmt;

use stitchflow_common::now_epoch_ms;
use tokio::time::Instant;

/// Source of presence timestamps, in milliseconds since the Unix epoch.
///
/// Every coordinator on a device stamps and judges staleness against the
/// same wall clock, so the source must be read fresh on every call.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// The system wall clock. Default for [`PresenceCoordinator::start`].
///
/// [`PresenceCoordinator::start`]: super::PresenceCoordinator::start
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        now_epoch_ms()
    }
}

/// Fixed wall time advanced by Tokio's clock.
///
/// Meant for paused-time tests: stamps move exactly with
/// `tokio::time::advance`. Two anchored clocks only agree if they were
/// anchored to the same instant, so production code uses [`SystemClock`].
#[derive(Clone)]
pub struct AnchoredClock {
    wall_ms: u64,
    anchor: Instant,
}

impl AnchoredClock {
    pub fn starting_at(wall_ms: u64) -> Self {
        Self {
            wall_ms,
            anchor: Instant::now(),
        }
    }
}

impl fmt::Debug for AnchoredClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchoredClock")
            .field("now_ms", &self.now_ms())
            .finish()
    }
}

impl Clock for AnchoredClock {
    fn now_ms(&self) -> u64 {
        self.wall_ms + self.anchor.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn anchored_clock_advances_with_tokio_time() {
        let clock = AnchoredClock::starting_at(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        tokio::time::advance(Duration::from_millis(2_500)).await;
        assert_eq!(clock.now_ms(), 3_500);
    }

    #[test]
    fn system_clock_reads_wall_time_on_every_call() {
        let clock = SystemClock;
        let first = clock.now_ms();
        std::thread::sleep(Duration::from_millis(20));
        let second = clock.now_ms();
        assert!(second >= first + 20);
        assert!(now_epoch_ms().abs_diff(second) < 1_000);
    }

    #[tokio::test(start_paused = true)]
    async fn system_clock_is_not_tied_to_tokio_time() {
        tokio::time::advance(Duration::from_secs(3_600)).await;
        assert!(now_epoch_ms().abs_diff(SystemClock.now_ms()) < 1_000);
    }
}
