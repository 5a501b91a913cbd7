//! Viewport fitting.
//!
//! Each node occupies a square footprint of side `size` around its position.
//! The viewport covers the union of those footprints, centred on it and
//! padded by a factor on each axis.

use rstar::{AABB, Envelope, RTreeObject};

use crate::render::Viewport;

/// Half-span used when every footprint collapses to one coordinate.
const DEGENERATE_HALF_SPAN: f32 = 0.5;

/// A node's footprint on screen.
#[derive(Debug, Clone, Copy)]
struct Footprint {
    x: f32,
    y: f32,
    size: f32,
}

impl RTreeObject for Footprint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let half = self.size / 2.0;
        AABB::from_corners([self.x - half, self.y - half], [self.x + half, self.y + half])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ViewportResizer {
    /// Multiplier on each half-span (default: 1.5).
    pub padding: f32,
}

impl Default for ViewportResizer {
    fn default() -> Self {
        Self { padding: 1.5 }
    }
}

impl ViewportResizer {
    pub fn new(padding: f32) -> Self {
        Self { padding }
    }

    /// Fit a viewport to `x`/`y` with optional per-node `sizes`.
    ///
    /// Missing sizes count as 0. Returns `None` when there are no points.
    pub fn fit(&self, x: &[f32], y: &[f32], sizes: Option<&[f32]>) -> Option<Viewport> {
        let extent = x
            .iter()
            .zip(y)
            .enumerate()
            .map(|(i, (&x, &y))| Footprint {
                x,
                y,
                size: sizes.and_then(|s| s.get(i)).copied().unwrap_or(0.0),
            })
            .map(|footprint| footprint.envelope())
            .reduce(|a, b| a.merged(&b))?;

        let (lower, upper) = (extent.lower(), extent.upper());
        Some(Viewport {
            x_range: self.padded(lower[0], upper[0]),
            y_range: self.padded(lower[1], upper[1]),
        })
    }

    fn padded(&self, min: f32, max: f32) -> (f32, f32) {
        let center = (min + max) / 2.0;
        let mut half = (max - min) / 2.0;
        if half == 0.0 {
            half = DEGENERATE_HALF_SPAN;
        }
        (center - half * self.padding, center + half * self.padding)
    }
}
