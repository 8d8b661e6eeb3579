//! World files (`.jgw`, `.pgw`, `.tfw`) for scanned, georeferenced maps.
//!
//! A world file is six ASCII numbers, one per line:
//!
//! ```text
//! A  pixel size in x (grid units per pixel)
//! D  rotation term (y)
//! B  rotation term (x)
//! E  pixel size in y (negative for north-up images)
//! C  x of the centre of the upper-left pixel
//! F  y of the centre of the upper-left pixel
//! ```
//!
//! so that `X = A·col + B·row + C` and `Y = D·col + E·row + F`, with `X` the
//! grid easting and `Y` the grid northing.

use crate::affine::{AffineSolver, CalibrationError};
use crate::grid::{GridPoint, GridProjection};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use virtual_punch_core::{AffineMatrix, LatLng, Pt2, Real};

#[derive(Debug, Error, PartialEq)]
pub enum WorldFileError {
    #[error("world file needs 6 values, found {0}")]
    TooFewValues(usize),
    #[error("line {line}: not a number: {text:?}")]
    InvalidNumber { line: usize, text: String },
    #[error("world file describes a degenerate (zero-area) pixel")]
    Degenerate,
}

/// Parsed world file parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldFile {
    pub pixel_size_x: Real,
    pub rotation_y: Real,
    pub rotation_x: Real,
    pub pixel_size_y: Real,
    pub origin_x: Real,
    pub origin_y: Real,
}

impl WorldFile {
    /// Parse the six-line text form. Blank lines are ignored; anything after
    /// the sixth value is ignored too.
    pub fn parse(text: &str) -> Result<Self, WorldFileError> {
        let mut values = Vec::with_capacity(6);
        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let v: Real = trimmed.parse().map_err(|_| WorldFileError::InvalidNumber {
                line: idx + 1,
                text: trimmed.to_string(),
            })?;
            values.push(v);
            if values.len() == 6 {
                break;
            }
        }
        if values.len() < 6 {
            return Err(WorldFileError::TooFewValues(values.len()));
        }

        let wf = Self {
            pixel_size_x: values[0],
            rotation_y: values[1],
            rotation_x: values[2],
            pixel_size_y: values[3],
            origin_x: values[4],
            origin_y: values[5],
        };
        let det = wf.pixel_size_x * wf.pixel_size_y - wf.rotation_x * wf.rotation_y;
        if !det.is_finite() || det.abs() < f64::EPSILON {
            return Err(WorldFileError::Degenerate);
        }
        Ok(wf)
    }

    /// Grid position of the centre of pixel (`col`, `row`).
    pub fn pixel_to_grid(&self, col: Real, row: Real) -> GridPoint {
        GridPoint {
            easting: self.pixel_size_x * col + self.rotation_x * row + self.origin_x,
            northing: self.rotation_y * col + self.pixel_size_y * row + self.origin_y,
        }
    }

    /// Grid position of an image-edge coordinate, where `(0, 0)` is the outer
    /// corner of the upper-left pixel and `(width, height)` the outer corner of
    /// the lower-right one.
    pub fn image_point_to_grid(&self, x: Real, y: Real) -> GridPoint {
        self.pixel_to_grid(x - 0.5, y - 0.5)
    }

    /// Geographic box spanned by the image's top-left and bottom-right corners.
    pub fn geo_bounds(&self, projection: &GridProjection, width: Real, height: Real) -> GeoBounds {
        let tl = self.image_point_to_grid(0.0, 0.0);
        let br = self.image_point_to_grid(width, height);
        let tl = projection.grid_to_geodetic(tl.northing, tl.easting);
        let br = projection.grid_to_geodetic(br.northing, br.easting);
        GeoBounds {
            north: tl.lat.max(br.lat),
            south: tl.lat.min(br.lat),
            east: tl.lng.max(br.lng),
            west: tl.lng.min(br.lng),
        }
    }
}

/// A latitude/longitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: Real,
    pub south: Real,
    pub east: Real,
    pub west: Real,
}

impl GeoBounds {
    /// North-up calibration stretching the image over this box.
    pub fn to_affine(&self, width: Real, height: Real) -> AffineMatrix {
        AffineMatrix {
            a: (self.east - self.west) / width,
            b: 0.0,
            c: self.west,
            d: 0.0,
            e: -(self.north - self.south) / height,
            f: self.north,
        }
    }

    pub fn contains(&self, pos: LatLng) -> bool {
        (self.south..=self.north).contains(&pos.lat) && (self.west..=self.east).contains(&pos.lng)
    }
}

/// Calibrate an image from its world file.
///
/// The four image corners are converted grid → geodetic and an affine matrix
/// is fitted through them, which also absorbs map rotation and the slight
/// meridian convergence across the sheet.
pub fn calibration_from_world_file(
    world: &WorldFile,
    projection: &GridProjection,
    width: Real,
    height: Real,
) -> Result<AffineMatrix, CalibrationError> {
    let corners = [
        Pt2::new(0.0, 0.0),
        Pt2::new(width, 0.0),
        Pt2::new(0.0, height),
        Pt2::new(width, height),
    ];
    let geo: Vec<LatLng> = corners
        .iter()
        .map(|p| {
            let g = world.image_point_to_grid(p.x, p.y);
            projection.grid_to_geodetic(g.northing, g.easting)
        })
        .collect();
    let fit = AffineSolver::fit(&corners, &geo)?;
    debug!(
        "world-file calibration for {width}x{height} image, corner residual {:.3e} deg",
        fit.rms_residual
    );
    Ok(fit.matrix)
}
