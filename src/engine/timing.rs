//! Operation timing
//!
//! Every user operation reports its wall-clock cost. The stopwatch starts
//! just before the first side effect and is read just after the last.

use std::time::Instant;

/// High-resolution wall-clock stopwatch.
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start timing now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Elapsed milliseconds since start, as a float.
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_is_nonnegative_and_monotonic() {
        let sw = Stopwatch::start();
        let first = sw.elapsed_ms();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = sw.elapsed_ms();

        assert!(first >= 0.0);
        assert!(second >= first);
        assert!(second >= 2.0);
    }
}
