//! Surface geometry
//!
//! Tracks the displayed window size and output scale factor and derives the
//! pixel dimensions the frame buffer should have. Repeated size reports are
//! collapsed to edges: the adapter only speaks up when geometry changed.

/// Pixel-space geometry of the render surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceGeometry {
    pub width: u32,
    pub height: u32,
}

impl SurfaceGeometry {
    /// Derive buffer dimensions from a displayed size and scale factor.
    /// High-DPI outputs report scale > 1 and get a denser buffer.
    pub fn from_displayed(displayed_w: u32, displayed_h: u32, scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            width: (displayed_w as f32 * scale).round() as u32,
            height: (displayed_h as f32 * scale).round() as u32,
        }
    }

    /// A zero-area surface. Rendering and pointer mapping both stand down
    /// until real dimensions arrive.
    pub fn is_quiescent(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Change detector over surface geometry reports
pub struct ResizeAdapter {
    current: SurfaceGeometry,
}

impl ResizeAdapter {
    pub fn new(initial: SurfaceGeometry) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> SurfaceGeometry {
        self.current
    }

    /// Feed an observed displayed size and scale. Returns the new geometry
    /// only when it differs from the last observation, so callers rebuild
    /// buffers exactly once per actual change.
    pub fn observe(
        &mut self,
        displayed_w: u32,
        displayed_h: u32,
        scale: f32,
    ) -> Option<SurfaceGeometry> {
        let next = SurfaceGeometry::from_displayed(displayed_w, displayed_h, scale);
        if next == self.current {
            None
        } else {
            self.current = next;
            Some(next)
        }
    }
}
