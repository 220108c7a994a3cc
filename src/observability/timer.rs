//! Wall-clock timer for operation reports

use std::time::Instant;

/// A simple duration timer
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed microseconds since creation
    pub fn elapsed_micros(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_advances() {
        let timer = Timer::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(timer.elapsed_micros() >= 2_000);
    }
}
