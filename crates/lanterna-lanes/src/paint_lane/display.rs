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

use super::PaintFault;
use lanterna_core::{EmbeddedBuffer, PixelBuffer, PixelRect, PixelSink, Surface, SurfaceMode};
use std::fmt;
use std::sync::Arc;

/// How a frame reached its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Displayed {
    /// The swap chain was flipped.
    Presented,
    /// Pixels were read back and offered to the host's sink.
    Uploaded {
        /// Generation attached to the upload.
        generation: u64,
        /// `false` if the sink already held a newer frame and dropped this one.
        accepted: bool,
    },
    /// Pixels were written into the embedded buffer.
    Embedded {
        /// Frame id of the buffer after the write.
        frame_id: u64,
    },
}

/// The variant-specific Displaying step of a painter run.
///
/// The painter drives the shared steps and calls [`prepare_display`] then
/// [`finalize_display`] on a surface that is locked and fully drawn.
///
/// [`prepare_display`]: DisplayStrategy::prepare_display
/// [`finalize_display`]: DisplayStrategy::finalize_display
pub trait DisplayStrategy: Send + fmt::Debug {
    /// A short name used in logs.
    fn name(&self) -> &'static str;

    /// Kind of surface this strategy draws into.
    fn surface_mode(&self) -> SurfaceMode;

    /// Flushes pending drawing for the dirty area (`None` for the whole surface).
    ///
    /// ## Returns
    /// `false` if the surface went stale.
    fn prepare_display(&mut self, surface: &mut dyn Surface, dirty: Option<PixelRect>) -> bool {
        surface.prepare(dirty)
    }

    /// Hands the frame to the host.
    fn finalize_display(&mut self, surface: &mut dyn Surface) -> Result<Displayed, PaintFault>;
}

/// Presents onscreen surfaces by flipping the swap chain.
#[derive(Debug, Default)]
pub struct PresentingDisplay;

impl PresentingDisplay {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }
}

impl DisplayStrategy for PresentingDisplay {
    fn name(&self) -> &'static str {
        "Presenting"
    }

    fn surface_mode(&self) -> SurfaceMode {
        SurfaceMode::Onscreen
    }

    fn finalize_display(&mut self, surface: &mut dyn Surface) -> Result<Displayed, PaintFault> {
        if surface.present() {
            Ok(Displayed::Presented)
        } else {
            Err(PaintFault::DisplayFailed { step: "present" })
        }
    }
}

/// Reads offscreen pixels back and offers them to a host sink.
///
/// Generations come from the sink, so a painter replacing another one on the
/// same host keeps producing frames newer than the last accepted one.
pub struct UploadingDisplay {
    sink: Arc<dyn PixelSink>,
    generation: u64,
}

impl UploadingDisplay {
    /// Creates the strategy delivering to `sink`.
    pub fn new(sink: Arc<dyn PixelSink>) -> Self {
        Self {
            sink,
            generation: 0,
        }
    }

    /// Generation of the last delivered frame, `0` before the first.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for UploadingDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadingDisplay")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl DisplayStrategy for UploadingDisplay {
    fn name(&self) -> &'static str {
        "Uploading"
    }

    fn surface_mode(&self) -> SurfaceMode {
        SurfaceMode::Offscreen
    }

    fn finalize_display(&mut self, surface: &mut dyn Surface) -> Result<Displayed, PaintFault> {
        let mut buffer = PixelBuffer::new(surface.width(), surface.height());
        if !surface.read_pixels(&mut buffer) {
            return Err(PaintFault::DisplayFailed {
                step: "read_pixels",
            });
        }
        self.generation = self.sink.next_generation();
        let accepted = self.sink.upload_pixels(buffer, self.generation);
        if !accepted {
            log::debug!("UploadingDisplay: generation {} dropped by sink", self.generation);
        }
        Ok(Displayed::Uploaded {
            generation: self.generation,
            accepted,
        })
    }
}

/// Writes offscreen pixels into a buffer the host reads on its own schedule.
#[derive(Debug)]
pub struct EmbeddedDisplay {
    target: Arc<EmbeddedBuffer>,
}

impl EmbeddedDisplay {
    /// Creates the strategy writing into `target`.
    pub fn new(target: Arc<EmbeddedBuffer>) -> Self {
        Self { target }
    }

    /// The buffer frames are written into.
    pub fn target(&self) -> &Arc<EmbeddedBuffer> {
        &self.target
    }
}

impl DisplayStrategy for EmbeddedDisplay {
    fn name(&self) -> &'static str {
        "Embedded"
    }

    fn surface_mode(&self) -> SurfaceMode {
        SurfaceMode::Offscreen
    }

    fn finalize_display(&mut self, surface: &mut dyn Surface) -> Result<Displayed, PaintFault> {
        if self.target.update(|buffer| surface.read_pixels(buffer)) {
            Ok(Displayed::Embedded {
                frame_id: self.target.frame_id(),
            })
        } else {
            Err(PaintFault::DisplayFailed {
                step: "read_pixels",
            })
        }
    }
}
