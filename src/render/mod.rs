//! Frame renderer
//!
//! Pure function from (time, settings, buffer size) to pixels. One frame is
//! three passes over the buffer:
//!
//! - Mirrored wedges: `slice_count` triangular slices around the center,
//!   each filled with a three-stop gradient whose hues drift with time
//! - Additive white wash at fixed low opacity to soften slice seams
//! - Breathing pulse: a screen-blended radial disc whose radius and
//!   brightness ride a slow sine wave
//!
//! No hidden state: the same (time, settings, size) always produces the
//! same bytes, which is what the determinism tests pin down.

pub mod gradient;

use crate::display::{BlendMode, PixelBuffer};
use crate::settings::KaleidoscopeSettings;
use crate::util::hsl_to_rgb;
use gradient::{LinearGradient, RadialGradient};
use std::f32::consts::TAU;

/// Fraction of the short buffer dimension each wedge extends to
const WEDGE_RADIUS_RATIO: f32 = 0.82;
/// Half-angle of a wedge in radians (6 degrees each side of the bisector)
const WEDGE_HALF_ANGLE: f32 = 6.0 * std::f32::consts::PI / 180.0;
/// Opacity of the additive white wash between slices (constant, not a setting)
const WASH_ALPHA: f32 = 0.12;
/// Milliseconds per degree of global hue drift
const HUE_DRIFT_DIVISOR: f64 = 20.0;
/// Angular rate of the breathing wave, radians per millisecond
const WAVE_RATE: f64 = 0.002;

/// Render one kaleidoscope frame. A zero-area buffer is a quiescent
/// surface and the call is a no-op.
pub fn render_frame(buffer: &mut PixelBuffer, time_ms: f64, settings: &KaleidoscopeSettings) {
    let w = buffer.width();
    let h = buffer.height();
    if w == 0 || h == 0 {
        return;
    }

    buffer.clear(0, 0, 0);

    let cx = w as f32 / 2.0;
    let cy = h as f32 / 2.0;
    let radius = w.min(h) as f32 * WEDGE_RADIUS_RATIO;
    let slices = settings.slice_count.max(1);
    let spin = (time_ms * settings.rotation_speed as f64).rem_euclid(std::f64::consts::TAU) as f32;

    for i in 0..slices {
        let bisector = (i as f32 / slices as f32) * TAU + spin;
        let shift = hue_shift(i, slices, settings.hue_variance, time_ms);
        let paint = slice_gradient(cx, cy, radius, bisector, settings.base_hue, shift);
        buffer.fill_polygon_gradient(&wedge_vertices(cx, cy, radius, bisector), &paint);
    }

    buffer.fill_surface(255, 255, 255, WASH_ALPHA, BlendMode::Additive);

    draw_pulse_overlay(buffer, time_ms, settings.pulse_strength, cx, cy);
}

/// Hue offset in degrees for slice `i` of `n`: the slice's share of the
/// variance plus the global time drift, wrapped to [0, 360)
fn hue_shift(i: u32, n: u32, hue_variance: f32, time_ms: f64) -> f32 {
    let share = (i as f64 / n as f64) * hue_variance as f64;
    (share + time_ms / HUE_DRIFT_DIVISOR).rem_euclid(360.0) as f32
}

/// Triangle for one slice: apex at the center, far edge at `radius`
fn wedge_vertices(cx: f32, cy: f32, radius: f32, bisector: f32) -> [(f32, f32); 3] {
    let lo = bisector - WEDGE_HALF_ANGLE;
    let hi = bisector + WEDGE_HALF_ANGLE;
    [
        (cx, cy),
        (cx + radius * lo.cos(), cy + radius * lo.sin()),
        (cx + radius * hi.cos(), cy + radius * hi.sin()),
    ]
}

/// Three-stop gradient across the slice's bounding diagonal, rotated with
/// the slice. Hues step +30 then +60 degrees from the shifted base while
/// saturation and lightness fall off toward the rim.
fn slice_gradient(
    cx: f32,
    cy: f32,
    radius: f32,
    bisector: f32,
    base_hue: f32,
    shift: f32,
) -> LinearGradient {
    let (sin_b, cos_b) = bisector.sin_cos();
    // Diagonal corners (-radius,-radius) and (radius,radius) rotated into place
    let ax = radius * (sin_b - cos_b);
    let ay = -radius * (sin_b + cos_b);
    let mut paint = LinearGradient::new(cx + ax, cy + ay, cx - ax, cy - ay);

    let (r, g, b) = hsl_to_rgb(base_hue + shift, 0.90, 0.60);
    paint.add_stop(0.0, r, g, b);
    let (r, g, b) = hsl_to_rgb(base_hue + shift + 30.0, 0.80, 0.55);
    paint.add_stop(0.5, r, g, b);
    let (r, g, b) = hsl_to_rgb(base_hue + shift + 60.0, 0.75, 0.50);
    paint.add_stop(1.0, r, g, b);
    paint
}

/// Breathing wave in [0, 1], 0.5 at time zero
fn pulse_wave(time_ms: f64) -> f32 {
    (((time_ms * WAVE_RATE).sin() + 1.0) / 2.0) as f32
}

/// Screen-blended radial disc over the whole pattern. The wave drives both
/// the disc radius (65% to 100% of the surface half-diagonal) and part of
/// the overlay opacity; `pulse_strength` scales the rest.
fn draw_pulse_overlay(
    buffer: &mut PixelBuffer,
    time_ms: f64,
    pulse_strength: f32,
    cx: f32,
    cy: f32,
) {
    let wave = pulse_wave(time_ms);
    let max_radius = (buffer.width() as f32).hypot(buffer.height() as f32) / 2.0;
    let radius = max_radius * (0.65 + 0.35 * wave);

    let mut paint = RadialGradient::new(cx, cy, radius);
    paint.add_stop(0.0, 255, 255, 255, 0.12 * pulse_strength);
    paint.add_stop(0.6, 255, 255, 255, 0.02);
    paint.add_stop(1.0, 255, 255, 255, 0.0);

    let opacity = 0.55 * pulse_strength + wave * 0.15;
    buffer.fill_radial(&paint, opacity, BlendMode::Screen);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{SettingsProfile, SettingsStore};

    fn default_settings() -> KaleidoscopeSettings {
        SettingsStore::new(SettingsProfile::default()).get()
    }

    #[test]
    fn test_first_slice_starts_at_base_hue() {
        // Slice 0 at time 0 has no shift, so the inner stop is the base hue
        assert_eq!(hue_shift(0, 12, 120.0, 0.0), 0.0);

        let paint = slice_gradient(320.0, 240.0, 200.0, 0.0, 200.0, 0.0);
        let (r, g, b) = hsl_to_rgb(200.0, 0.90, 0.60);
        let inner = paint.stops()[0];
        assert_eq!((inner.r, inner.g, inner.b), (r, g, b));
    }

    #[test]
    fn test_hue_shift_spreads_and_wraps() {
        // Halfway around the fan picks up half the variance
        assert_eq!(hue_shift(6, 12, 120.0, 0.0), 60.0);
        // 20 ms of drift is one degree; a full lap of drift wraps to zero
        assert_eq!(hue_shift(0, 12, 120.0, 20.0), 1.0);
        assert_eq!(hue_shift(0, 12, 120.0, 7200.0), 0.0);
    }

    #[test]
    fn test_wedge_spans_twelve_degrees() {
        let [apex, a, b] = wedge_vertices(0.0, 0.0, 100.0, 1.0);
        assert_eq!(apex, (0.0, 0.0));

        let ra = (a.0 * a.0 + a.1 * a.1).sqrt();
        let rb = (b.0 * b.0 + b.1 * b.1).sqrt();
        assert!((ra - 100.0).abs() < 0.01);
        assert!((rb - 100.0).abs() < 0.01);

        let dot = (a.0 * b.0 + a.1 * b.1) / (ra * rb);
        let spread = dot.acos().to_degrees();
        assert!((spread - 12.0).abs() < 0.01);
    }

    #[test]
    fn test_pulse_wave_bounds() {
        assert!((pulse_wave(0.0) - 0.5).abs() < 1e-6);
        for t in 0..200 {
            let w = pulse_wave(t as f64 * 37.0);
            assert!((0.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let settings = default_settings();
        let mut a = PixelBuffer::with_size(96, 64);
        let mut b = PixelBuffer::with_size(96, 64);

        render_frame(&mut a, 1234.5, &settings);
        render_frame(&mut b, 1234.5, &settings);
        assert_eq!(a.as_bytes(), b.as_bytes());

        // And time actually moves the image
        render_frame(&mut b, 4321.0, &settings);
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_render_covers_center_region() {
        let settings = default_settings();
        let mut buf = PixelBuffer::with_size(96, 96);
        render_frame(&mut buf, 0.0, &settings);

        // The wedge fan plus washes leave no black hole mid-frame
        let (r, g, b) = buf.get_pixel(48, 30).unwrap();
        assert!(r > 0 || g > 0 || b > 0);
    }

    #[test]
    fn test_quiescent_buffer_is_noop() {
        let settings = default_settings();
        let mut buf = PixelBuffer::with_size(0, 0);
        render_frame(&mut buf, 1000.0, &settings);
        assert!(buf.as_bytes().is_empty());
    }
}
