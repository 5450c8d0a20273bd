//! Kaleidoscope parameter model
//!
//! Holds the animation parameters, the closed ranges they are clamped
//! into, and the startup tuning profile. Mutations clamp, never reject:
//! any caller-supplied value lands inside its range.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Mirror-slice color anchor in degrees. Configurable nowhere; every
/// palette is a shift relative to this hue.
pub const BASE_HUE: f32 = 200.0;

const DEFAULT_SLICE_COUNT: u32 = 12;
const DEFAULT_HUE_VARIANCE: f32 = 120.0;
const DEFAULT_ROTATION_SPEED: f32 = 0.0004;
const DEFAULT_PULSE_STRENGTH: f32 = 0.12;

const SLICE_BOUNDS: (u32, u32) = (6, 24);
const HUE_BOUNDS: ParamRange = ParamRange::new(60.0, 260.0);
const ROTATION_BOUNDS: ParamRange = ParamRange::new(0.00018, 0.001);
const PULSE_BOUNDS: ParamRange = ParamRange::new(0.06, 0.4);

/// Inclusive range a parameter is clamped into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the range. NaN resolves to the lower bound;
    /// inverted ranges are treated as if swapped.
    pub fn clamp(&self, value: f32) -> f32 {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        if value.is_nan() {
            return lo;
        }
        value.max(lo).min(hi)
    }
}

/// Current animation parameters. Copy, so every observer takes a whole
/// consistent snapshot; partially-updated reads are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KaleidoscopeSettings {
    pub slice_count: u32,
    pub base_hue: f32,
    pub hue_variance: f32,
    pub rotation_speed: f32,
    pub pulse_strength: f32,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsDelta {
    pub slice_count: Option<u32>,
    pub hue_variance: Option<f32>,
    pub rotation_speed: Option<f32>,
    pub pulse_strength: Option<f32>,
}

/// Immutable tuning profile: default parameter values plus the ranges
/// every later mutation is clamped into. Loaded once at startup and
/// handed to the controls, which own their mutable working copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsProfile {
    pub slice_count: u32,
    pub hue_variance: f32,
    pub rotation_speed: f32,
    pub pulse_strength: f32,
    pub slice_bounds: (u32, u32),
    pub hue_bounds: ParamRange,
    pub rotation_bounds: ParamRange,
    pub pulse_bounds: ParamRange,
}

impl Default for SettingsProfile {
    fn default() -> Self {
        Self {
            slice_count: DEFAULT_SLICE_COUNT,
            hue_variance: DEFAULT_HUE_VARIANCE,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            pulse_strength: DEFAULT_PULSE_STRENGTH,
            slice_bounds: SLICE_BOUNDS,
            hue_bounds: HUE_BOUNDS,
            rotation_bounds: ROTATION_BOUNDS,
            pulse_bounds: PULSE_BOUNDS,
        }
    }
}

impl SettingsProfile {
    /// Load a profile from a JSON file. Missing fields fall back to the
    /// built-in defaults; out-of-range defaults are pulled into their
    /// own declared bounds.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let profile: Self = serde_json::from_str(&json).map_err(|e| e.to_string())?;
        Ok(profile.normalized())
    }

    fn normalized(mut self) -> Self {
        let (lo, hi) = self.slice_bounds;
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.slice_bounds = (lo.max(1), hi.max(1));
        self.slice_count = self.clamp_slices(self.slice_count);
        self.hue_variance = self.hue_bounds.clamp(self.hue_variance);
        self.rotation_speed = self.rotation_bounds.clamp(self.rotation_speed);
        self.pulse_strength = self.pulse_bounds.clamp(self.pulse_strength);
        self
    }

    fn clamp_slices(&self, count: u32) -> u32 {
        count.max(self.slice_bounds.0).min(self.slice_bounds.1)
    }

    /// Settings snapshot at this profile's defaults
    pub fn defaults(&self) -> KaleidoscopeSettings {
        KaleidoscopeSettings {
            slice_count: self.slice_count,
            base_hue: BASE_HUE,
            hue_variance: self.hue_variance,
            rotation_speed: self.rotation_speed,
            pulse_strength: self.pulse_strength,
        }
    }
}

/// Human-readable projection of the current parameters, for whatever
/// surface presents them (window title, panels, logs)
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedSettings {
    pub slice_count: u32,
    pub rotation: String,
    pub hue_variance: String,
    pub pulse: String,
}

/// The owned mutable parameter store. All writes clamp against the
/// profile; reads hand out whole snapshots.
pub struct SettingsStore {
    profile: SettingsProfile,
    current: KaleidoscopeSettings,
}

impl SettingsStore {
    pub fn new(profile: SettingsProfile) -> Self {
        let profile = profile.normalized();
        Self {
            current: profile.defaults(),
            profile,
        }
    }

    /// Current snapshot
    pub fn get(&self) -> KaleidoscopeSettings {
        self.current
    }

    pub fn profile(&self) -> &SettingsProfile {
        &self.profile
    }

    /// Apply a partial update, clamping each supplied field. base_hue is
    /// not part of the delta; it never changes at runtime.
    pub fn set(&mut self, delta: SettingsDelta) {
        if let Some(count) = delta.slice_count {
            self.current.slice_count = self.profile.clamp_slices(count);
        }
        if let Some(hue) = delta.hue_variance {
            self.current.hue_variance = self.profile.hue_bounds.clamp(hue);
        }
        if let Some(speed) = delta.rotation_speed {
            self.current.rotation_speed = self.profile.rotation_bounds.clamp(speed);
        }
        if let Some(pulse) = delta.pulse_strength {
            self.current.pulse_strength = self.profile.pulse_bounds.clamp(pulse);
        }
    }

    /// Restore every mutable field to the profile defaults
    pub fn reset(&mut self) {
        self.current = self.profile.defaults();
    }

    /// Restore only the pointer-driven parameters, leaving the slice count
    /// wherever the keyboard put it
    pub fn reset_pointer_params(&mut self) {
        self.current.hue_variance = self.profile.hue_variance;
        self.current.rotation_speed = self.profile.rotation_speed;
        self.current.pulse_strength = self.profile.pulse_strength;
    }

    /// Read-only formatted view: rotation in degrees/second, hue variance
    /// in degrees, pulse as a percentage
    pub fn formatted(&self) -> FormattedSettings {
        let deg_per_sec =
            self.current.rotation_speed * 1000.0 * (180.0 / std::f32::consts::PI);
        FormattedSettings {
            slice_count: self.current.slice_count,
            rotation: format!("{:.1}°/s", deg_per_sec),
            hue_variance: format!("{}°", self.current.hue_variance.round() as i32),
            pulse: format!("{}%", (self.current.pulse_strength * 100.0).round() as i32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clamps_every_field() {
        let mut store = SettingsStore::new(SettingsProfile::default());
        store.set(SettingsDelta {
            slice_count: Some(99),
            hue_variance: Some(1000.0),
            rotation_speed: Some(-1.0),
            pulse_strength: Some(f32::INFINITY),
        });
        let s = store.get();
        assert_eq!(s.slice_count, 24);
        assert_eq!(s.hue_variance, 260.0);
        assert_eq!(s.rotation_speed, 0.00018);
        assert_eq!(s.pulse_strength, 0.4);
    }

    #[test]
    fn test_nan_resolves_to_lower_bound() {
        let mut store = SettingsStore::new(SettingsProfile::default());
        store.set(SettingsDelta {
            hue_variance: Some(f32::NAN),
            rotation_speed: Some(f32::NAN),
            pulse_strength: Some(f32::NAN),
            ..Default::default()
        });
        let s = store.get();
        assert_eq!(s.hue_variance, 60.0);
        assert_eq!(s.rotation_speed, 0.00018);
        assert_eq!(s.pulse_strength, 0.06);
    }

    #[test]
    fn test_reset_is_idempotent_and_exact() {
        let mut store = SettingsStore::new(SettingsProfile::default());
        store.set(SettingsDelta {
            slice_count: Some(20),
            hue_variance: Some(200.0),
            rotation_speed: Some(0.0009),
            pulse_strength: Some(0.3),
        });
        store.reset();
        let once = store.get();
        store.reset();
        let twice = store.get();
        assert_eq!(once, twice);
        assert_eq!(once.slice_count, 12);
        assert_eq!(once.hue_variance, 120.0);
        assert_eq!(once.rotation_speed, 0.0004);
        assert_eq!(once.pulse_strength, 0.12);
        assert_eq!(once.base_hue, 200.0);
    }

    #[test]
    fn test_partial_delta_leaves_other_fields() {
        let mut store = SettingsStore::new(SettingsProfile::default());
        store.set(SettingsDelta {
            hue_variance: Some(90.0),
            ..Default::default()
        });
        let s = store.get();
        assert_eq!(s.hue_variance, 90.0);
        assert_eq!(s.slice_count, 12);
        assert_eq!(s.rotation_speed, 0.0004);
    }

    #[test]
    fn test_profile_json_partial_and_out_of_range() {
        // Missing fields default; supplied defaults are pulled in range
        let profile: SettingsProfile =
            serde_json::from_str(r#"{ "slice_count": 40, "pulse_strength": 0.5 }"#).unwrap();
        let profile = profile.normalized();
        assert_eq!(profile.slice_count, 24);
        assert_eq!(profile.pulse_strength, 0.4);
        assert_eq!(profile.hue_variance, 120.0);
    }

    #[test]
    fn test_inverted_profile_bounds_are_swapped() {
        let profile = SettingsProfile {
            slice_bounds: (24, 6),
            ..Default::default()
        }
        .normalized();
        assert_eq!(profile.slice_bounds, (6, 24));
        let mut store = SettingsStore::new(profile);
        store.set(SettingsDelta {
            slice_count: Some(1),
            ..Default::default()
        });
        assert_eq!(store.get().slice_count, 6);
    }

    #[test]
    fn test_formatted_readout() {
        let store = SettingsStore::new(SettingsProfile::default());
        let view = store.formatted();
        assert_eq!(view.slice_count, 12);
        assert_eq!(view.rotation, "22.9°/s");
        assert_eq!(view.hue_variance, "120°");
        assert_eq!(view.pulse, "12%");
    }
}
