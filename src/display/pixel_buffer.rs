use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::render::gradient::{LinearGradient, RadialGradient};

// ============================================================================
// Blend Mode
// ============================================================================

/// Compositing blend mode for surface washes and radial overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Standard source-over alpha blending
    Alpha,
    /// Additive: dst += src * alpha, saturating
    Additive,
    /// Screen: dst = lerp(dst, 255 - (255-dst)*(255-src)/255, alpha)
    Screen,
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Alpha blend a single color channel
/// Uses fast approximation: (x + 1 + (x >> 8)) >> 8 instead of x / 255
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

/// Screen-mode combine of a single channel (lightens, never darkens)
#[inline]
fn screen_channel(src: u8, dst: u8) -> u8 {
    255 - ((255 - src as u16) * (255 - dst as u16) / 255) as u8
}

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel(dest: &mut [u8], r: u8, g: u8, b: u8) {
    dest[0] = 255; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering
/// Every kaleidoscope frame is composed here, then uploaded as one texture
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with default resolution (640x480)
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a new pixel buffer with custom resolution
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within buffer bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    /// Clear to a solid color
    /// Optimized: uses u32 fill for maximum speed
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        // Create ABGR u32 pattern
        let pixel = u32::from_ne_bytes([255, b, g, r]);

        // Safety: pixels.len() is always divisible by 4 (width * height * 4).
        // We use write_unaligned to avoid assuming alignment of Vec<u8>.
        let ptr = self.pixels.as_mut_ptr() as *mut u32;
        let len = self.pixels.len() / 4;

        for i in 0..len {
            // Safety: i < len keeps the write in bounds
            unsafe {
                ptr.add(i).write_unaligned(pixel);
            }
        }
    }

    /// Set pixel with alpha blending
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            let alpha = a as u16;
            self.pixels[idx] = 255; // A - always opaque
            self.pixels[idx + 1] = blend_channel(b, self.pixels[idx + 1], alpha);
            self.pixels[idx + 2] = blend_channel(g, self.pixels[idx + 2], alpha);
            self.pixels[idx + 3] = blend_channel(r, self.pixels[idx + 3], alpha);
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
            ))
        } else {
            None
        }
    }

    /// Additive blend a pixel (colors saturate at 255)
    #[inline]
    pub fn blend_pixel_additive(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx + 1] = self.pixels[idx + 1].saturating_add(b);
            self.pixels[idx + 2] = self.pixels[idx + 2].saturating_add(g);
            self.pixels[idx + 3] = self.pixels[idx + 3].saturating_add(r);
        }
    }

    /// Screen blend a pixel: lightens toward the source, never darkens.
    /// Alpha controls how far toward the screened result the pixel moves.
    #[inline]
    pub fn blend_pixel_screen(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            let alpha = a as u16;
            self.pixels[idx] = 255;
            self.pixels[idx + 1] =
                blend_channel(screen_channel(b, self.pixels[idx + 1]), self.pixels[idx + 1], alpha);
            self.pixels[idx + 2] =
                blend_channel(screen_channel(g, self.pixels[idx + 2]), self.pixels[idx + 2], alpha);
            self.pixels[idx + 3] =
                blend_channel(screen_channel(r, self.pixels[idx + 3]), self.pixels[idx + 3], alpha);
        }
    }

    /// Draw a horizontal line
    /// Optimized: computes starting index once, then increments by 4
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let mut idx = self.pixel_index(start as u32, y as u32);
        let count = (end - start + 1) as usize;
        for _ in 0..count {
            write_pixel(&mut self.pixels[idx..idx + 4], r, g, b);
            idx += 4;
        }
    }

    // ========================================================================
    // Gradient Primitives
    // Composes: write_pixel → hline_gradient → fill_polygon_gradient
    // ========================================================================

    /// Horizontal line painted from a linear gradient.
    /// The span is subdivided wherever the ramp crosses a color stop, then
    /// each piece steps its color linearly per pixel, so multi-stop ramps
    /// come out exact without evaluating the gradient at every pixel.
    pub fn hline_gradient(&mut self, x1: i32, x2: i32, y: i32, paint: &LinearGradient) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        // Sample at pixel centers so the ramp lines up with the scanline fill
        let yf = y as f32 + 0.5;
        let t_start = paint.project_raw(start as f32 + 0.5, yf);

        if start == end {
            let (r, g, b) = paint.eval(t_start);
            self.hline(start, end, y, r as u8, g as u8, b as u8);
            return;
        }

        let t_end = paint.project_raw(end as f32 + 0.5, yf);
        let dt = (t_end - t_start) / (end - start) as f32;
        let (t_lo, t_hi) = if t_start <= t_end {
            (t_start, t_end)
        } else {
            (t_end, t_start)
        };

        // Piece boundaries: span ends plus every stop crossing in between
        let mut bounds: Vec<i32> = Vec::with_capacity(paint.stops().len() + 2);
        bounds.push(start);
        if dt.abs() > f32::EPSILON {
            for stop in paint.stops() {
                if stop.offset > t_lo && stop.offset < t_hi {
                    let x = start + ((stop.offset - t_start) / dt).round() as i32;
                    bounds.push(x.clamp(start, end));
                }
            }
        }
        bounds.push(end);
        bounds.sort_unstable();
        bounds.dedup();

        for pair in bounds.windows(2) {
            let (xa, xb) = (pair[0], pair[1]);
            let ta = t_start + dt * (xa - start) as f32;
            let tb = t_start + dt * (xb - start) as f32;
            let (ra, ga, ba) = paint.eval(ta);
            let (rb, gb, bb) = paint.eval(tb);

            let span = (xb - xa).max(1) as f32;
            let dr = (rb - ra) / span;
            let dg = (gb - ga) / span;
            let db = (bb - ba) / span;

            let (mut cr, mut cg, mut cb) = (ra, ga, ba);
            let mut idx = self.pixel_index(xa as u32, y as u32);
            for _ in xa..=xb {
                write_pixel(
                    &mut self.pixels[idx..idx + 4],
                    cr.clamp(0.0, 255.0) as u8,
                    cg.clamp(0.0, 255.0) as u8,
                    cb.clamp(0.0, 255.0) as u8,
                );
                cr += dr;
                cg += dg;
                cb += db;
                idx += 4;
            }
        }
    }

    /// Fill a polygon from a linear gradient using scanline rasterization
    /// Optimized: preallocates intersection buffer outside loop
    pub fn fill_polygon_gradient(&mut self, vertices: &[(f32, f32)], paint: &LinearGradient) {
        if vertices.len() < 3 {
            return;
        }

        // Find bounding box
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for (_, y) in vertices {
            min_y = min_y.min(*y);
            max_y = max_y.max(*y);
        }

        let min_y = (min_y as i32).max(0);
        let max_y = (max_y as i32).min(self.height as i32 - 1);

        // Preallocate intersection buffer (reused per scanline)
        let mut intersections = Vec::with_capacity(vertices.len());
        let n = vertices.len();

        for y in min_y..=max_y {
            intersections.clear(); // Reuse allocation
            let yf = y as f32 + 0.5;

            // Find all edge intersections with this scanline
            for i in 0..n {
                let (x1, y1) = vertices[i];
                let (x2, y2) = vertices[(i + 1) % n];

                if (y1 <= yf && y2 > yf) || (y2 <= yf && y1 > yf) {
                    let x = x1 + (yf - y1) / (y2 - y1) * (x2 - x1);
                    intersections.push(x as i32);
                }
            }

            // Sort intersections and fill between pairs
            intersections.sort_unstable();
            for pair in intersections.chunks_exact(2) {
                self.hline_gradient(pair[0], pair[1], y, paint);
            }
        }
    }

    // ========================================================================
    // Surface Operations
    // ========================================================================

    /// Wash the whole surface with one color at the given opacity.
    /// Additive mode at low alpha gives the frame its soft white bloom.
    pub fn fill_surface(&mut self, r: u8, g: u8, b: u8, alpha: f32, mode: BlendMode) {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u16;
        if a == 0 {
            return;
        }

        match mode {
            BlendMode::Alpha => {
                for chunk in self.pixels.chunks_exact_mut(4) {
                    chunk[0] = 255;
                    chunk[1] = blend_channel(b, chunk[1], a);
                    chunk[2] = blend_channel(g, chunk[2], a);
                    chunk[3] = blend_channel(r, chunk[3], a);
                }
            },
            BlendMode::Additive => {
                // dst += src * alpha, saturating
                let add_r = ((r as u16 * a + 127) / 255) as u8;
                let add_g = ((g as u16 * a + 127) / 255) as u8;
                let add_b = ((b as u16 * a + 127) / 255) as u8;
                for chunk in self.pixels.chunks_exact_mut(4) {
                    chunk[1] = chunk[1].saturating_add(add_b);
                    chunk[2] = chunk[2].saturating_add(add_g);
                    chunk[3] = chunk[3].saturating_add(add_r);
                }
            },
            BlendMode::Screen => {
                for chunk in self.pixels.chunks_exact_mut(4) {
                    chunk[0] = 255;
                    chunk[1] = blend_channel(screen_channel(b, chunk[1]), chunk[1], a);
                    chunk[2] = blend_channel(screen_channel(g, chunk[2]), chunk[2], a);
                    chunk[3] = blend_channel(screen_channel(r, chunk[3]), chunk[3], a);
                }
            },
        }
    }

    /// Composite a radial gradient disc onto the buffer.
    /// `opacity` scales every stop's alpha; pixels outside the rim take the
    /// last stop, so a transparent outer stop bounds the work to the disc.
    pub fn fill_radial(&mut self, paint: &RadialGradient, opacity: f32, mode: BlendMode) {
        let opacity = opacity.clamp(0.0, 1.0);
        let radius = paint.radius();
        if opacity <= 0.0 || radius <= 0.0 {
            return;
        }

        let (cx, cy) = paint.center();
        let x_start = ((cx - radius).floor() as i32).max(0);
        let x_end = ((cx + radius).ceil() as i32).min(self.width as i32 - 1);
        let y_start = ((cy - radius).floor() as i32).max(0);
        let y_end = ((cy + radius).ceil() as i32).min(self.height as i32 - 1);

        for y in y_start..=y_end {
            let yf = y as f32 + 0.5;
            for x in x_start..=x_end {
                let (r, g, b, a) = paint.color_at(x as f32 + 0.5, yf);
                let a8 = (a * opacity * 255.0) as u16;
                if a8 == 0 {
                    continue;
                }

                let r = r.clamp(0.0, 255.0) as u8;
                let g = g.clamp(0.0, 255.0) as u8;
                let b = b.clamp(0.0, 255.0) as u8;

                match mode {
                    BlendMode::Alpha => self.blend_pixel(x, y, r, g, b, a8 as u8),
                    BlendMode::Additive => self.blend_pixel_additive(
                        x,
                        y,
                        ((r as u16 * a8 + 127) / 255) as u8,
                        ((g as u16 * a8 + 127) / 255) as u8,
                        ((b as u16 * a8 + 127) / 255) as u8,
                    ),
                    BlendMode::Screen => self.blend_pixel_screen(x, y, r, g, b, a8 as u8),
                }
            }
        }
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_writes_every_pixel() {
        let mut buf = PixelBuffer::with_size(8, 8);
        buf.clear(10, 20, 30);
        assert_eq!(buf.get_pixel(0, 0), Some((10, 20, 30)));
        assert_eq!(buf.get_pixel(7, 7), Some((10, 20, 30)));
        assert_eq!(buf.get_pixel(8, 8), None);
    }

    #[test]
    fn test_screen_blend_lightens_never_darkens() {
        let mut buf = PixelBuffer::with_size(2, 1);
        buf.clear(100, 100, 100);

        // 255 - (255-100)*(255-80)/255 = 149
        buf.blend_pixel_screen(0, 0, 80, 80, 80, 255);
        assert_eq!(buf.get_pixel(0, 0), Some((149, 149, 149)));

        // Screening with black leaves the pixel unchanged
        buf.blend_pixel_screen(1, 0, 0, 0, 0, 255);
        assert_eq!(buf.get_pixel(1, 0), Some((100, 100, 100)));
    }

    #[test]
    fn test_additive_wash_saturates() {
        let mut buf = PixelBuffer::with_size(4, 4);
        buf.clear(200, 200, 200);
        buf.fill_surface(255, 255, 255, 1.0, BlendMode::Additive);
        assert_eq!(buf.get_pixel(2, 2), Some((255, 255, 255)));
    }

    #[test]
    fn test_gradient_fill_follows_ramp() {
        let mut buf = PixelBuffer::with_size(100, 4);
        let mut paint = LinearGradient::new(0.0, 0.0, 100.0, 0.0);
        paint.add_stop(0.0, 0, 0, 0);
        paint.add_stop(0.5, 100, 0, 0);
        paint.add_stop(1.0, 200, 0, 0);

        // Over-wide span exercises clipping on both sides
        buf.fill_polygon_gradient(
            &[(-50.0, -10.0), (500.0, -10.0), (500.0, 10.0), (-50.0, 10.0)],
            &paint,
        );

        let (r_left, _, _) = buf.get_pixel(0, 2).unwrap();
        let (r_mid, _, _) = buf.get_pixel(50, 2).unwrap();
        let (r_right, _, _) = buf.get_pixel(99, 2).unwrap();
        assert!(r_left <= 3);
        assert!((r_mid as i32 - 100).unsigned_abs() <= 3);
        assert!(r_right >= 196);

        // Ramp is monotonic left to right
        let mut prev = 0;
        for x in 0..100 {
            let (r, _, _) = buf.get_pixel(x, 2).unwrap();
            assert!(r + 1 >= prev, "ramp dipped at x={}", x);
            prev = r;
        }
    }

    #[test]
    fn test_radial_overlay_bounded_to_disc() {
        let mut buf = PixelBuffer::with_size(20, 20);
        buf.clear(0, 0, 0);

        let mut paint = RadialGradient::new(10.0, 10.0, 5.0);
        paint.add_stop(0.0, 255, 255, 255, 1.0);
        paint.add_stop(1.0, 255, 255, 255, 0.0);
        buf.fill_radial(&paint, 1.0, BlendMode::Screen);

        // Center brightly lit (alpha tapers off center by half a pixel),
        // outside the rim untouched
        let (r_center, _, _) = buf.get_pixel(10, 10).unwrap();
        assert!(r_center >= 200);
        assert_eq!(buf.get_pixel(1, 1), Some((0, 0, 0)));
        assert_eq!(buf.get_pixel(16, 10), Some((0, 0, 0)));
    }
}
