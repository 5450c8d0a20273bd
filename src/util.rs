//! Shared utilities

/// Linear interpolation between two values
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// HSL to RGB color conversion
/// h: 0-360 (wrapped), s: 0-1, l: 0-1
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r1, g1, b1) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
    )
}

// ============================================================================
// FPS Counter
// ============================================================================

use std::collections::VecDeque;
use std::time::Instant;

/// FPS counter with rolling average over a fixed sample window
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count,
        }
    }

    /// Record one frame boundary
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }
    }

    /// Rolling-average frames per second (0.0 until the first tick)
    pub fn avg_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let avg_dt: f32 = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(60.0, 260.0, 0.0), 60.0);
        assert_eq!(lerp(60.0, 260.0, 1.0), 260.0);
        assert_eq!(lerp(60.0, 260.0, 0.5), 160.0);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
    }

    #[test]
    fn test_hsl_grayscale_ignores_hue() {
        // Zero saturation collapses to lightness alone
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.5), hsl_to_rgb(217.0, 0.0, 0.5));
        assert_eq!(hsl_to_rgb(90.0, 0.0, 1.0), (255, 255, 255));
        assert_eq!(hsl_to_rgb(90.0, 0.0, 0.0), (0, 0, 0));
    }

    #[test]
    fn test_hsl_wraps_hue() {
        assert_eq!(hsl_to_rgb(360.0, 0.9, 0.6), hsl_to_rgb(0.0, 0.9, 0.6));
        assert_eq!(hsl_to_rgb(560.0, 0.9, 0.6), hsl_to_rgb(200.0, 0.9, 0.6));
        assert_eq!(hsl_to_rgb(-160.0, 0.9, 0.6), hsl_to_rgb(200.0, 0.9, 0.6));
    }
}
