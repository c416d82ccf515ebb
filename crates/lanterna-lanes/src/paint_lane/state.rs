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

use std::fmt;

/// The step a [`Painter`](super::Painter) is executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaintState {
    /// Waiting for the next pulse.
    #[default]
    Idle,
    /// Checking the snapshot and the device.
    Validating,
    /// Making sure a correctly sized surface is locked.
    SurfaceReady,
    /// Issuing draw passes.
    Painting,
    /// Handing the frame to the host.
    Displaying,
    /// A step failed; the run is being abandoned.
    Invalid,
}

impl PaintState {
    /// Returns `true` if the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: PaintState) -> bool {
        use PaintState::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, SurfaceReady)
                | (Validating, Idle)
                | (SurfaceReady, Painting)
                | (SurfaceReady, Displaying)
                | (SurfaceReady, Idle)
                | (Painting, Displaying)
                | (Displaying, Idle)
                | (Validating | SurfaceReady | Painting | Displaying, Invalid)
                | (Invalid, Idle)
        )
    }

    /// Moves to `next`.
    ///
    /// # Panics
    /// Panics on a transition the state machine does not allow. That only
    /// happens if the painter itself is broken.
    pub fn advance(&mut self, next: PaintState) {
        if !self.can_transition_to(next) {
            log::error!("PaintState: illegal transition {self} -> {next}");
            panic!("illegal paint state transition {self} -> {next}");
        }
        *self = next;
    }
}

impl fmt::Display for PaintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaintState::Idle => "Idle",
            PaintState::Validating => "Validating",
            PaintState::SurfaceReady => "SurfaceReady",
            PaintState::Painting => "Painting",
            PaintState::Displaying => "Displaying",
            PaintState::Invalid => "Invalid",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut state = PaintState::default();
        for next in [
            PaintState::Validating,
            PaintState::SurfaceReady,
            PaintState::Painting,
            PaintState::Displaying,
            PaintState::Idle,
        ] {
            state.advance(next);
        }
        assert_eq!(state, PaintState::Idle);
    }

    #[test]
    fn test_invalid_is_reachable_from_every_working_state() {
        for from in [
            PaintState::Validating,
            PaintState::SurfaceReady,
            PaintState::Painting,
            PaintState::Displaying,
        ] {
            assert!(from.can_transition_to(PaintState::Invalid));
        }
        assert!(!PaintState::Idle.can_transition_to(PaintState::Invalid));
        assert!(PaintState::Invalid.can_transition_to(PaintState::Idle));
    }

    #[test]
    #[should_panic(expected = "illegal paint state transition Idle -> Painting")]
    fn test_skipping_steps_panics() {
        PaintState::Idle.advance(PaintState::Painting);
    }
}
