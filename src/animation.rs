//! Animation loop lifecycle
//!
//! Two-state machine over the render scheduler: Idle (unmounted, torn
//! down) and Running (rendering every refresh). The host loop drives the
//! actual pacing; this module decides whether a tick draws at all and
//! stamps each frame with the monotonic clock. Settings arrive as a fresh
//! snapshot on every tick, never captured at mount time, so a parameter
//! change between two frames is always visible to the next frame.
//!
//! Teardown is synchronous: after it returns no further tick can draw.

use crate::display::PixelBuffer;
use crate::render::render_frame;
use crate::settings::KaleidoscopeSettings;
use std::time::Instant;

/// Loop lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No surface mounted; ticks are no-ops
    Idle,
    /// Mounted and rendering once per refresh
    Running,
}

/// Monotonic frame clock, milliseconds since creation
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock started. f64 keeps sub-ms
    /// precision over multi-day uptimes.
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// The render loop gate. Owns the frame clock; renders only while Running.
pub struct AnimationLoop {
    state: LoopState,
    clock: FrameClock,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            clock: FrameClock::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Current frame time in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Transition Idle -> Running. Returns true on a fresh mount, telling
    /// the caller to run the one-off first render; false if already running.
    pub fn mount(&mut self) -> bool {
        if self.state == LoopState::Running {
            return false;
        }
        self.state = LoopState::Running;
        true
    }

    /// Transition Running -> Idle. Idempotent; a torn-down loop can be
    /// mounted again.
    pub fn teardown(&mut self) {
        self.state = LoopState::Idle;
    }

    /// Render one frame with the settings snapshot taken now. Returns
    /// whether anything was drawn: Idle ticks and zero-area (quiescent)
    /// buffers draw nothing. Re-rendering the same instant twice is
    /// harmless, so resize-driven out-of-band ticks need no special
    /// casing.
    pub fn tick(&mut self, buffer: &mut PixelBuffer, settings: &KaleidoscopeSettings) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        if buffer.width() == 0 || buffer.height() == 0 {
            return false;
        }
        render_frame(buffer, self.clock.now_ms(), settings);
        true
    }
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{SettingsProfile, SettingsStore};

    fn default_settings() -> KaleidoscopeSettings {
        SettingsStore::new(SettingsProfile::default()).get()
    }

    #[test]
    fn test_idle_tick_draws_nothing() {
        let mut animation = AnimationLoop::new();
        let settings = default_settings();
        let mut buf = PixelBuffer::with_size(32, 32);
        buf.clear(7, 7, 7);
        let before = buf.as_bytes().to_vec();

        assert_eq!(animation.state(), LoopState::Idle);
        assert!(!animation.tick(&mut buf, &settings));
        assert_eq!(buf.as_bytes(), &before[..]);
    }

    #[test]
    fn test_mount_enables_rendering() {
        let mut animation = AnimationLoop::new();
        let settings = default_settings();
        let mut buf = PixelBuffer::with_size(32, 32);
        buf.clear(7, 7, 7);
        let before = buf.as_bytes().to_vec();

        assert!(animation.mount());
        assert!(!animation.mount());
        assert_eq!(animation.state(), LoopState::Running);

        assert!(animation.tick(&mut buf, &settings));
        assert_ne!(buf.as_bytes(), &before[..]);
    }

    #[test]
    fn test_zero_area_buffer_tick_draws_nothing() {
        let mut animation = AnimationLoop::new();
        let settings = default_settings();
        let mut buf = PixelBuffer::with_size(0, 0);

        animation.mount();
        assert!(!animation.tick(&mut buf, &settings));
        assert!(buf.as_bytes().is_empty());
    }

    #[test]
    fn test_teardown_stops_and_remounts() {
        let mut animation = AnimationLoop::new();
        let settings = default_settings();
        let mut buf = PixelBuffer::with_size(32, 32);

        animation.mount();
        animation.teardown();
        animation.teardown();
        assert_eq!(animation.state(), LoopState::Idle);
        assert!(!animation.tick(&mut buf, &settings));

        assert!(animation.mount());
        assert!(animation.tick(&mut buf, &settings));
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = FrameClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
        assert!(a >= 0.0);
    }
}
