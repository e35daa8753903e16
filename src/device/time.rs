use std::time::{Duration, Instant};

/// A measurement of the device clock, in milliseconds since device creation.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(u64);

impl Timestamp {
    #[inline]
    pub fn from_millis(millis: u64) -> Timestamp {
        Timestamp(millis)
    }

    #[inline]
    pub fn millis(self) -> u64 {
        self.0
    }
}

impl ::std::ops::Sub for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        Duration::from_millis(self.0 - rhs.0)
    }
}

/// The device timer.
///
/// The timer tracks two clocks. The *real* clock always advances and drives
/// time-based host interactions like cursor animations. The *virtual* clock
/// is the game-visible one: it can be stopped and restarted, and the time
/// spent stopped is never observed by callers. `Device::sleep` uses this to
/// keep a bounded idle wait from counting as elapsed game time.
pub struct Timer {
    origin: Instant,
    ticked: Timestamp,
    stop_offset: u64,
    stopped_since: Option<u64>,
}

impl Timer {
    pub fn new() -> Self {
        Timer {
            origin: Instant::now(),
            ticked: Timestamp(0),
            stop_offset: 0,
            stopped_since: None,
        }
    }

    /// The real clock, unaffected by `stop`.
    #[inline]
    pub fn real_time(&self) -> Timestamp {
        Timestamp(self.elapsed_millis())
    }

    /// Caches the current virtual time. Called once at the top of every
    /// run-loop iteration so all consumers of `time()` within one iteration
    /// observe the same value.
    #[inline]
    pub fn tick(&mut self) {
        let now = self.elapsed_millis();
        self.ticked = Timestamp(self.virtual_at(now));
    }

    /// The virtual time cached by the last `tick`.
    #[inline]
    pub fn time(&self) -> Timestamp {
        self.ticked
    }

    /// Stops the virtual clock. A stopped timer stays at the time it was
    /// stopped at until `start` is called.
    pub fn stop(&mut self) {
        if self.stopped_since.is_none() {
            self.stopped_since = Some(self.elapsed_millis());
        }
    }

    /// Restarts a stopped virtual clock.
    pub fn start(&mut self) {
        if let Some(since) = self.stopped_since.take() {
            self.stop_offset += self.elapsed_millis() - since;
        }
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped_since.is_some()
    }

    #[inline]
    fn elapsed_millis(&self) -> u64 {
        let elapsed = self.origin.elapsed();
        elapsed.as_secs() * 1000 + u64::from(elapsed.subsec_millis())
    }

    fn virtual_at(&self, real_millis: u64) -> u64 {
        match self.stopped_since {
            Some(since) => since - self.stop_offset,
            None => real_millis - self.stop_offset,
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_time_excludes_stopped_intervals() {
        let mut timer = Timer::new();
        assert_eq!(timer.virtual_at(100), 100);

        // Stopped at t=100; the virtual clock holds still.
        timer.stopped_since = Some(100);
        assert_eq!(timer.virtual_at(250), 100);

        // Restarted at t=250; 150ms of idle wait never happened.
        timer.stopped_since = None;
        timer.stop_offset = 150;
        assert_eq!(timer.virtual_at(400), 250);
    }

    #[test]
    fn stop_and_start_are_idempotent() {
        let mut timer = Timer::new();
        timer.stop();
        let since = timer.stopped_since;
        timer.stop();
        assert_eq!(timer.stopped_since, since);
        assert!(timer.is_stopped());

        timer.start();
        assert!(!timer.is_stopped());
        let offset = timer.stop_offset;
        timer.start();
        assert_eq!(timer.stop_offset, offset);
    }
}
