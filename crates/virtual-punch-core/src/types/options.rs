//! Configuration options for geofencing.
//!
//! Radii are passed explicitly to every builder call so that the same
//! process can serve events with different tolerance tables.

use crate::{Real, Sensitivity};
use serde::{Deserialize, Serialize};

/// Geofence radius, in meters, for each named sensitivity.
///
/// The table must satisfy `exact < standard < relaxed`; [`Self::is_ordered`]
/// checks it. [`Sensitivity::Custom`] has no table entry and resolves to the
/// standard radius when a course does not carry a usable custom value.
///
/// # Example
///
/// ```
/// use virtual_punch_core::{Sensitivity, SensitivityRadii};
///
/// let radii = SensitivityRadii::default();
/// assert!(radii.radius_for(Sensitivity::Exact) < radii.radius_for(Sensitivity::Relaxed));
///
/// // Tighten only the exact policy
/// let radii = SensitivityRadii {
///     exact: 6.0,
///     ..Default::default()
/// };
/// assert!(radii.is_ordered());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityRadii {
    pub exact: Real,
    pub standard: Real,
    pub relaxed: Real,
}

impl Default for SensitivityRadii {
    fn default() -> Self {
        Self {
            exact: 10.0,
            standard: 20.0,
            relaxed: 35.0,
        }
    }
}

impl SensitivityRadii {
    /// Table radius for a sensitivity.
    pub fn radius_for(&self, sensitivity: Sensitivity) -> Real {
        match sensitivity {
            Sensitivity::Exact => self.exact,
            Sensitivity::Standard | Sensitivity::Custom => self.standard,
            Sensitivity::Relaxed => self.relaxed,
        }
    }

    /// Returns true if tolerance strictly increases from exact to relaxed.
    pub fn is_ordered(&self) -> bool {
        0.0 < self.exact && self.exact < self.standard && self.standard < self.relaxed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_ordered() {
        assert!(SensitivityRadii::default().is_ordered());
    }

    #[test]
    fn custom_uses_standard_entry() {
        let radii = SensitivityRadii::default();
        assert_eq!(radii.radius_for(Sensitivity::Custom), radii.standard);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let radii: SensitivityRadii = serde_json::from_str(r#"{"relaxed": 50.0}"#).unwrap();
        assert_eq!(radii.relaxed, 50.0);
        assert_eq!(radii.exact, SensitivityRadii::default().exact);
    }
}
