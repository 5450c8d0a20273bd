//! Pointer and keyboard controls
//!
//! Maps the unified pointer stream onto the kaleidoscope parameters and
//! tracks whether a pointer is engaged. Every parameter write goes through
//! the settings store, which clamps it; nothing here can push a value out
//! of range.

use crate::display::{InputEvent, PointerKind};
use crate::settings::{
    FormattedSettings, KaleidoscopeSettings, SettingsDelta, SettingsProfile, SettingsStore,
};
use crate::util::lerp;
use sdl2::keyboard::Keycode;

/// Pressure above this reads as a deliberate hard press
const PRESSURE_BOOST_THRESHOLD: f32 = 0.45;
/// Gain applied to the vertical-axis parameters during a boosted press
const BOOST_GAIN: f32 = 1.2;

/// Interaction phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No pointer held down; mouse hover still steers parameters
    Neutral,
    /// A pointer is held down
    Engaged,
}

/// Live parameter controller driven by pointer and keyboard events
pub struct KaleidoscopeControls {
    store: SettingsStore,
    phase: Phase,
    // Displayed surface size the pointer coordinates normalize against
    bounds: (f32, f32),
}

impl KaleidoscopeControls {
    pub fn new(profile: SettingsProfile, width: u32, height: u32) -> Self {
        Self {
            store: SettingsStore::new(profile),
            phase: Phase::Neutral,
            bounds: (width as f32, height as f32),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current parameter snapshot
    pub fn settings(&self) -> KaleidoscopeSettings {
        self.store.get()
    }

    /// Human-readable parameter readout
    pub fn formatted(&self) -> FormattedSettings {
        self.store.formatted()
    }

    /// Restore every parameter to the profile defaults. Phase is left
    /// alone; an engaged pointer re-applies its mapping on its next move.
    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Update the surface size pointer coordinates are relative to
    pub fn set_bounds(&mut self, width: u32, height: u32) {
        self.bounds = (width as f32, height as f32);
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                buttons,
                pressure,
                ..
            } => {
                self.phase = Phase::Engaged;
                self.apply_pointer(*x, *y, *buttons, *pressure);
            },
            InputEvent::PointerMove {
                x,
                y,
                buttons,
                pressure,
                kind,
            } => {
                // Touch movement without contact is a stray report; mouse
                // hover is a real steering input
                if *kind == PointerKind::Touch && *buttons == 0 {
                    return;
                }
                self.apply_pointer(*x, *y, *buttons, *pressure);
            },
            InputEvent::PointerUp { .. } => {
                self.phase = Phase::Neutral;
            },
            InputEvent::PointerLeave | InputEvent::PointerCancel | InputEvent::FocusLost => {
                self.phase = Phase::Neutral;
                self.store.reset_pointer_params();
            },
            InputEvent::Resized { width, height } => {
                self.set_bounds(*width, *height);
            },
            InputEvent::KeyDown(key) => self.on_key(*key),
            _ => {},
        }
    }

    fn on_key(&mut self, key: Keycode) {
        match key {
            Keycode::Up | Keycode::Right => self.nudge_slices(1),
            Keycode::Down | Keycode::Left => self.nudge_slices(-1),
            // Full reset of the parameters only; the animation clock is not
            // ours to touch, so the image keeps its rotational phase
            Keycode::R => self.reset(),
            _ => {},
        }
    }

    fn nudge_slices(&mut self, step: i32) {
        let next = self.store.get().slice_count.saturating_add_signed(step);
        self.store.set(SettingsDelta {
            slice_count: Some(next),
            ..Default::default()
        });
    }

    /// Project a pointer position onto the pointer-driven parameters.
    /// Horizontal position sets hue variance. Vertical position trades
    /// rotation speed (bottom) against pulse strength (top); a secondary
    /// button or hard press boosts that axis.
    fn apply_pointer(&mut self, x: f32, y: f32, buttons: u32, pressure: f32) {
        let (w, h) = self.bounds;
        if w <= 0.0 || h <= 0.0 {
            return;
        }

        let rel_x = (x / w).clamp(0.0, 1.0);
        let rel_y = (y / h).clamp(0.0, 1.0);
        let boost = if buttons > 1 || pressure > PRESSURE_BOOST_THRESHOLD {
            BOOST_GAIN
        } else {
            1.0
        };

        let hue = self.store.profile().hue_bounds;
        let rot = self.store.profile().rotation_bounds;
        let pulse = self.store.profile().pulse_bounds;

        // rel_y is squared so speed piles up toward the bottom edge
        self.store.set(SettingsDelta {
            hue_variance: Some(lerp(hue.min, hue.max, rel_x)),
            rotation_speed: Some(rot.min + rel_y * rel_y * (rot.max - rot.min) * boost),
            pulse_strength: Some(pulse.min + (1.0 - rel_y) * (pulse.max - pulse.min) * boost),
            ..Default::default()
        });
    }
}
