//! Affine calibration (image pixel → latitude/longitude).
//!
//! Resolution of a single control is total: every missing or invalid input
//! yields `None`, which downstream stages treat as "unresolved". Fitting a new
//! matrix from ground control points is fallible and reports why.

use log::debug;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;
use virtual_punch_core::{AffineMatrix, CalibrationOptions, Control, LatLng, Pt2, Real};

/// Resolve the absolute position of a control.
///
/// Finite absolute `lat`/`lng` on the control always wins. Otherwise the relative
/// position, a calibration matrix and a positive image size are all required;
/// the relative position is scaled to pixels and pushed through the affine
/// map. Non-finite results are rejected.
///
/// # Example
///
/// ```
/// use virtual_punch_core::{ControlKind, Control};
/// use virtual_punch_core::test_utils::reference_calibration;
/// use virtual_punch_geo::derive_lat_lng_from_control;
///
/// let c = Control::new("31", "31", ControlKind::Control).with_relative(0.5, 0.25);
/// let pos = derive_lat_lng_from_control(&c, &reference_calibration()).unwrap();
/// assert!((pos.lng - 18.005).abs() < 1e-9);
/// assert!((pos.lat - 59.498).abs() < 1e-9);
/// ```
pub fn derive_lat_lng_from_control(control: &Control, opts: &CalibrationOptions) -> Option<LatLng> {
    if let (Some(lat), Some(lng)) = (control.lat, control.lng) {
        let pos = LatLng { lat, lng };
        if pos.is_finite() {
            return Some(pos);
        }
        debug!("control {}: ignoring non-finite absolute position", control.id);
    }

    let (rel_x, rel_y) = control.relative()?;
    let matrix = opts.calibration?;
    let (width, height) = opts.image_size()?;

    let pos = matrix.apply(rel_x * width, rel_y * height);
    pos.is_finite().then_some(pos)
}

#[derive(Debug, Error, PartialEq)]
pub enum CalibrationError {
    #[error("need at least 3 ground control points, got {0}")]
    NotEnoughPoints(usize),
    #[error("pixel / geographic point counts must match: {pixels} vs {geo}")]
    MismatchedLengths { pixels: usize, geo: usize },
    #[error("ground control points are collinear or coincident")]
    Degenerate,
    #[error("least-squares solve failed: {0}")]
    SolveFailed(&'static str),
}

/// A fitted calibration together with its quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineFit {
    pub matrix: AffineMatrix,
    /// Root-mean-square residual over the input points, in degrees.
    pub rms_residual: Real,
    pub num_points: usize,
}

/// Least-squares affine estimation from ground control points.
///
/// Thin namespace mirroring the other solvers; see [`solve_affine`].
#[derive(Debug, Clone, Copy)]
pub struct AffineSolver;

/// Fit `lng = a·px + b·py + c`, `lat = d·px + e·py + f` to matched points.
///
/// Exactly determined for three points, least squares for more.
pub fn solve_affine(pixels: &[Pt2], geo: &[LatLng]) -> Result<AffineFit, CalibrationError> {
    AffineSolver::fit(pixels, geo)
}

impl AffineSolver {
    /// Fit an affine calibration via SVD on the design matrix `[px py 1]`.
    ///
    /// Pixel coordinates are centered and scaled before solving so the rank
    /// test is independent of image resolution; the result is de-normalized.
    pub fn fit(pixels: &[Pt2], geo: &[LatLng]) -> Result<AffineFit, CalibrationError> {
        let n = pixels.len();
        if n != geo.len() {
            return Err(CalibrationError::MismatchedLengths {
                pixels: n,
                geo: geo.len(),
            });
        }
        if n < 3 {
            return Err(CalibrationError::NotEnoughPoints(n));
        }

        let (mx, my, scale) = centering(pixels).ok_or(CalibrationError::Degenerate)?;

        let mut p = DMatrix::<f64>::zeros(n, 3);
        let mut lng = DVector::<f64>::zeros(n);
        let mut lat = DVector::<f64>::zeros(n);
        for (i, (px, g)) in pixels.iter().zip(geo.iter()).enumerate() {
            p[(i, 0)] = (px.x - mx) * scale;
            p[(i, 1)] = (px.y - my) * scale;
            p[(i, 2)] = 1.0;
            lng[i] = g.lng;
            lat[i] = g.lat;
        }

        let svd = p.svd(true, true);
        if svd.rank(1e-9) < 3 {
            return Err(CalibrationError::Degenerate);
        }
        let x_lng = svd
            .solve(&lng, 1e-12)
            .map_err(CalibrationError::SolveFailed)?;
        let x_lat = svd
            .solve(&lat, 1e-12)
            .map_err(CalibrationError::SolveFailed)?;

        // Undo the normalization: coefficient k' on (px - m)·s is k = k'·s.
        let a = x_lng[0] * scale;
        let b = x_lng[1] * scale;
        let d = x_lat[0] * scale;
        let e = x_lat[1] * scale;
        let matrix = AffineMatrix {
            a,
            b,
            c: x_lng[2] - a * mx - b * my,
            d,
            e,
            f: x_lat[2] - d * mx - e * my,
        };

        let sum_sq: f64 = pixels
            .iter()
            .zip(geo.iter())
            .map(|(px, g)| {
                let fit = matrix.apply(px.x, px.y);
                (fit.lng - g.lng).powi(2) + (fit.lat - g.lat).powi(2)
            })
            .sum();
        let rms_residual = (sum_sq / n as f64).sqrt();
        debug!("affine fit over {n} points, rms residual {rms_residual:.3e} deg");

        Ok(AffineFit {
            matrix,
            rms_residual,
            num_points: n,
        })
    }
}

/// Centroid and isotropic scale bringing the mean distance to 1.
fn centering(points: &[Pt2]) -> Option<(Real, Real, Real)> {
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let my = points.iter().map(|p| p.y).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| ((p.x - mx).powi(2) + (p.y - my).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    (mean_dist.is_finite() && mean_dist > f64::EPSILON).then(|| (mx, my, 1.0 / mean_dist))
}
