// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::{Duration, Instant};

/// A simple monotonic stopwatch.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Creates a stopwatch and starts it immediately.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time elapsed since the stopwatch started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed time in seconds, `None` if the clock went backwards.
    pub fn elapsed_secs_f64(&self) -> Option<f64> {
        Instant::now()
            .checked_duration_since(self.start)
            .map(|d| d.as_secs_f64())
    }

    /// Elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Restarts the stopwatch and returns the time elapsed before the restart.
    pub fn restart(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.start);
        self.start = now;
        elapsed
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_stopwatch_measures_sleep() {
        let mut watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(5));
        assert!(watch.elapsed() >= Duration::from_millis(5));
        assert!(watch.elapsed_secs_f64().is_some_and(|s| s >= 0.005));

        let before = watch.restart();
        assert!(before >= Duration::from_millis(5));
        assert!(watch.elapsed() < before + Duration::from_secs(5));
    }
}
