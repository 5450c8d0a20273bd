//! Gradient paints
//!
//! Linear and radial color ramps with ordered stops, the two fill styles
//! the kaleidoscope frame is painted with. Evaluation is pure f32 math so
//! repeated frames land on identical bytes.

/// One color stop on a gradient ramp. Offsets are in [0, 1] and must be
/// added in ascending order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

fn eval_stops(stops: &[ColorStop], t: f32) -> (f32, f32, f32, f32) {
    match stops {
        [] => (0.0, 0.0, 0.0, 0.0),
        [only] => (only.r as f32, only.g as f32, only.b as f32, only.alpha),
        [first, .., last] => {
            if t <= first.offset {
                return (first.r as f32, first.g as f32, first.b as f32, first.alpha);
            }
            if t >= last.offset {
                return (last.r as f32, last.g as f32, last.b as f32, last.alpha);
            }
            for pair in stops.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if t <= b.offset {
                    let span = b.offset - a.offset;
                    let f = if span > f32::EPSILON {
                        (t - a.offset) / span
                    } else {
                        0.0
                    };
                    return (
                        a.r as f32 + (b.r as f32 - a.r as f32) * f,
                        a.g as f32 + (b.g as f32 - a.g as f32) * f,
                        a.b as f32 + (b.b as f32 - a.b as f32) * f,
                        a.alpha + (b.alpha - a.alpha) * f,
                    );
                }
            }
            (last.r as f32, last.g as f32, last.b as f32, last.alpha)
        }
    }
}

// ============================================================================
// Linear Gradient
// ============================================================================

/// Linear ramp between two points. Colors vary along the axis and are
/// constant perpendicular to it, like a canvas linear gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            stops: Vec::with_capacity(3),
        }
    }

    /// Append an opaque stop. Offsets must arrive in ascending order.
    pub fn add_stop(&mut self, offset: f32, r: u8, g: u8, b: u8) {
        debug_assert!(
            self.stops.last().map_or(true, |s| s.offset <= offset),
            "gradient stops must be added in ascending offset order"
        );
        self.stops.push(ColorStop {
            offset,
            r,
            g,
            b,
            alpha: 1.0,
        });
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Position of a point along the gradient axis, clamped to [0, 1].
    /// A degenerate (zero-length) axis projects everything to 0.
    pub fn project(&self, x: f32, y: f32) -> f32 {
        self.project_raw(x, y).clamp(0.0, 1.0)
    }

    /// Unclamped axis position. Span fills subdivide on the raw value so
    /// stop crossings land on exact pixel columns.
    pub fn project_raw(&self, x: f32, y: f32) -> f32 {
        let ax = self.x1 - self.x0;
        let ay = self.y1 - self.y0;
        let len_sq = ax * ax + ay * ay;
        if len_sq <= f32::EPSILON {
            return 0.0;
        }
        ((x - self.x0) * ax + (y - self.y0) * ay) / len_sq
    }

    /// Color on the ramp at position t, as 0-255 f32 channels
    pub fn eval(&self, t: f32) -> (f32, f32, f32) {
        let (r, g, b, _) = eval_stops(&self.stops, t);
        (r, g, b)
    }

    /// Color at a point in buffer space
    pub fn color_at(&self, x: f32, y: f32) -> (f32, f32, f32) {
        self.eval(self.project(x, y))
    }
}

// ============================================================================
// Radial Gradient
// ============================================================================

/// Radial ramp from a center point out to `radius`. Offset 0 is the
/// center, offset 1 the rim; points beyond the rim take the last stop.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    cx: f32,
    cy: f32,
    radius: f32,
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(cx: f32, cy: f32, radius: f32) -> Self {
        Self {
            cx,
            cy,
            radius,
            stops: Vec::with_capacity(3),
        }
    }

    /// Append a translucent stop. Offsets must arrive in ascending order.
    pub fn add_stop(&mut self, offset: f32, r: u8, g: u8, b: u8, alpha: f32) {
        debug_assert!(
            self.stops.last().map_or(true, |s| s.offset <= offset),
            "gradient stops must be added in ascending offset order"
        );
        self.stops.push(ColorStop {
            offset,
            r,
            g,
            b,
            alpha,
        });
    }

    pub fn center(&self) -> (f32, f32) {
        (self.cx, self.cy)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Color and alpha at a point in buffer space. Zero radius collapses
    /// to the last stop everywhere (a degenerate, fully-outside disc).
    pub fn color_at(&self, x: f32, y: f32) -> (f32, f32, f32, f32) {
        let t = if self.radius > f32::EPSILON {
            let dx = x - self.cx;
            let dy = y - self.cy;
            ((dx * dx + dy * dy).sqrt() / self.radius).min(1.0)
        } else {
            1.0
        };
        eval_stops(&self.stops, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> LinearGradient {
        let mut g = LinearGradient::new(0.0, 0.0, 100.0, 0.0);
        g.add_stop(0.0, 0, 0, 0);
        g.add_stop(0.5, 100, 100, 100);
        g.add_stop(1.0, 200, 200, 200);
        g
    }

    #[test]
    fn test_eval_hits_stops_exactly() {
        let g = ramp();
        assert_eq!(g.eval(0.0), (0.0, 0.0, 0.0));
        assert_eq!(g.eval(0.5), (100.0, 100.0, 100.0));
        assert_eq!(g.eval(1.0), (200.0, 200.0, 200.0));
    }

    #[test]
    fn test_eval_interpolates_between_stops() {
        let g = ramp();
        let (r, _, _) = g.eval(0.25);
        assert!((r - 50.0).abs() < 0.001);
        let (r, _, _) = g.eval(0.75);
        assert!((r - 150.0).abs() < 0.001);
    }

    #[test]
    fn test_eval_clamps_outside_range() {
        let g = ramp();
        assert_eq!(g.eval(-1.0), g.eval(0.0));
        assert_eq!(g.eval(2.0), g.eval(1.0));
    }

    #[test]
    fn test_project_along_axis() {
        let g = ramp();
        assert_eq!(g.project(0.0, 17.0), 0.0);
        assert_eq!(g.project(50.0, -4.0), 0.5);
        assert_eq!(g.project(100.0, 0.0), 1.0);
        // Clamped beyond the axis ends
        assert_eq!(g.project(-50.0, 0.0), 0.0);
        assert_eq!(g.project(250.0, 0.0), 1.0);
    }

    #[test]
    fn test_degenerate_axis_projects_to_zero() {
        let mut g = LinearGradient::new(5.0, 5.0, 5.0, 5.0);
        g.add_stop(0.0, 10, 20, 30);
        g.add_stop(1.0, 200, 200, 200);
        assert_eq!(g.project(999.0, -999.0), 0.0);
        assert_eq!(g.color_at(999.0, -999.0), (10.0, 20.0, 30.0));
    }

    #[test]
    fn test_radial_center_to_rim() {
        let mut g = RadialGradient::new(50.0, 50.0, 10.0);
        g.add_stop(0.0, 255, 255, 255, 1.0);
        g.add_stop(1.0, 255, 255, 255, 0.0);
        let (_, _, _, a_center) = g.color_at(50.0, 50.0);
        let (_, _, _, a_mid) = g.color_at(55.0, 50.0);
        let (_, _, _, a_rim) = g.color_at(60.0, 50.0);
        let (_, _, _, a_out) = g.color_at(500.0, 50.0);
        assert_eq!(a_center, 1.0);
        assert!((a_mid - 0.5).abs() < 0.001);
        assert_eq!(a_rim, 0.0);
        assert_eq!(a_out, 0.0);
    }

    #[test]
    fn test_radial_zero_radius_is_fully_outside() {
        let mut g = RadialGradient::new(0.0, 0.0, 0.0);
        g.add_stop(0.0, 255, 255, 255, 1.0);
        g.add_stop(1.0, 255, 255, 255, 0.0);
        let (_, _, _, a) = g.color_at(0.0, 0.0);
        assert_eq!(a, 0.0);
    }
}
