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

use lanterna_core::{
    Color, GraphicsDevice, PixelBuffer, PixelRect, RectBounds, SurfaceDescriptor, SurfaceMode,
};
use lanterna_infra::{DeviceEvent, SoftwareDevice};

fn descriptor(width: u32, height: u32, mode: SurfaceMode) -> SurfaceDescriptor {
    SurfaceDescriptor {
        width,
        height,
        mode,
        depth_buffer: false,
    }
}

#[test]
fn test_onscreen_frame_is_presented() {
    // --- 1. ARRANGE ---
    let device = SoftwareDevice::new("test");
    let mut surface = device
        .create_surface(&descriptor(4, 4, SurfaceMode::Onscreen))
        .expect("surface is created");

    // --- 2. ACT ---
    assert!(!surface.lock());
    {
        let g = surface.graphics().expect("locked surface has graphics");
        g.clear(Color::WHITE);
        g.set_clip_rect(Some(PixelRect::new(0, 0, 2, 2)));
        g.fill_rect(RectBounds::new(0.0, 0.0, 4.0, 4.0), Color::BLACK);
    }
    assert!(surface.prepare(None));
    assert!(surface.present());
    surface.unlock();
    surface.dispose();

    // --- 3. ASSERT ---
    let frame = device.last_presented().expect("a frame was presented");
    assert_eq!(frame.pixel(1, 1), Some(0xFF00_0000));
    assert_eq!(frame.pixel(3, 3), Some(0xFFFF_FFFF));
    assert_eq!(device.surfaces_created(), 1);
    assert_eq!(device.surfaces_disposed(), 1);
    assert_eq!(
        device.count_events(|e| matches!(e, DeviceEvent::Presented { .. })),
        1
    );
}

#[test]
fn test_injected_faults_fail_one_call_each() {
    // --- 1. ARRANGE ---
    let device = SoftwareDevice::default();
    device.faults().fail_next_surfaces(1);

    // --- 2. ACT ---
    let refused = device.create_surface(&descriptor(8, 8, SurfaceMode::Offscreen));
    let mut surface = device
        .create_surface(&descriptor(8, 8, SurfaceMode::Offscreen))
        .expect("second creation succeeds");
    device.faults().fail_next_readbacks(1);
    surface.lock();
    let mut buffer = PixelBuffer::new(1, 1);
    let first_read = surface.read_pixels(&mut buffer);

    // --- 3. ASSERT ---
    assert!(refused.is_none());
    assert!(!first_read);
    assert!(surface.is_lost());
    assert!(surface.graphics().is_none());
    // A lost surface stays lost until it is recreated.
    assert!(!surface.read_pixels(&mut buffer));
    surface.unlock();
    surface.dispose();
}

#[test]
fn test_lost_device_refuses_surfaces() {
    let device = SoftwareDevice::default();
    device.faults().set_device_lost(true);
    assert!(!device.is_device_ready());
    assert!(device
        .create_surface(&descriptor(8, 8, SurfaceMode::Onscreen))
        .is_none());

    device.faults().set_device_lost(false);
    device.set_max_surface_pixels(100);
    assert!(device
        .create_surface(&descriptor(11, 10, SurfaceMode::Onscreen))
        .is_none());
    assert!(device
        .create_surface(&descriptor(10, 10, SurfaceMode::Onscreen))
        .is_some());
    assert_eq!(
        device.count_events(|e| matches!(e, DeviceEvent::SurfaceCreationFailed { .. })),
        2
    );
}

#[test]
fn test_lock_loss_is_reported_by_lock() {
    let device = SoftwareDevice::default();
    let mut surface = device
        .create_surface(&descriptor(2, 2, SurfaceMode::Onscreen))
        .expect("surface is created");
    device.faults().lose_next_locks(1);

    assert!(surface.lock());
    assert!(surface.is_locked());
    surface.unlock();
    assert!(!surface.is_locked());
}

#[test]
#[should_panic(expected = "locked twice")]
fn test_double_lock_fails_fast() {
    let device = SoftwareDevice::default();
    let mut surface = device
        .create_surface(&descriptor(2, 2, SurfaceMode::Onscreen))
        .expect("surface is created");
    surface.lock();
    surface.lock();
}
