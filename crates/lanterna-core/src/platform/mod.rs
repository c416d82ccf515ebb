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

//! Host-side contracts: the window or embedding view a scene draws for, and
//! the CPU pixel containers used by the uploading and embedded painters.

mod host;
mod pixels;
mod upload;

pub use self::host::HostView;
pub use self::pixels::{EmbeddedBuffer, PixelBuffer};
pub use self::upload::{PixelSink, Upload, UploadSlot};
