//! Common types shared across the virtual-punch workspace.
//!
//! This module provides canonical data structures for controls, courses,
//! calibration context and the derived outputs consumed by GPS clients.

mod calibration;
mod control;
mod course;
mod options;
mod output;

pub use calibration::*;
pub use control::*;
pub use course::*;
pub use options::*;
pub use output::*;
