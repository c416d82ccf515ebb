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

//! RAII timers feeding a [`PulseLogger`].

use crate::pulse::{PulseLogger, PulsePhase};
use lanterna_core::Stopwatch;

/// Times a scope and records it into a [`PulseLogger`] when dropped.
///
/// The measurement is recorded on every exit path, early returns and
/// unwinding included.
pub struct ScopedPhaseTimer<'a> {
    stopwatch: Stopwatch,
    logger: &'a PulseLogger,
    phase: PulsePhase,
}

impl<'a> ScopedPhaseTimer<'a> {
    /// Starts timing `phase`.
    pub fn new(logger: &'a PulseLogger, phase: PulsePhase) -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            logger,
            phase,
        }
    }
}

impl Drop for ScopedPhaseTimer<'_> {
    fn drop(&mut self) {
        self.logger.record(self.phase, self.stopwatch.elapsed());
    }
}
