//! Map-position bounding box and relative-coordinate normalization.
//!
//! Course files store control positions in paper-map millimetres with `y`
//! growing upward (north). Images grow downward, so the normalized `y` is
//! inverted: `rel_y = 1 − (y − min_y) / (max_y − min_y)`.

use virtual_punch_core::{Real, clamp_unit};

/// Spans at or below this (in map units) count as zero.
const MIN_SPAN: Real = 1e-9;

/// Incrementally widened axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct MapBox {
    bounds: Option<[Real; 4]>,
}

impl MapBox {
    /// Widen the box to include a point; non-finite points are ignored.
    pub fn include(&mut self, x: Real, y: Real) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.bounds = Some(match self.bounds {
            None => [x, y, x, y],
            Some([min_x, min_y, max_x, max_y]) => {
                [min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)]
            }
        });
    }

    /// Relative image position of a map position, clamped to `[0, 1]`.
    ///
    /// `None` if the box is empty or degenerate along either axis.
    pub fn normalize(&self, x: Real, y: Real) -> Option<(Real, Real)> {
        let [min_x, min_y, max_x, max_y] = self.bounds?;
        let span_x = max_x - min_x;
        let span_y = max_y - min_y;
        if span_x <= MIN_SPAN || span_y <= MIN_SPAN {
            return None;
        }
        let rel_x = clamp_unit((x - min_x) / span_x);
        let rel_y = 1.0 - clamp_unit((y - min_y) / span_y);
        (rel_x.is_finite() && rel_y.is_finite()).then_some((rel_x, rel_y))
    }
}
