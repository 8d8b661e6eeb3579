//! Course records and their GPS / mobile display settings.

use crate::Real;
use serde::{Deserialize, Serialize};

/// Named geofence tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    Exact,
    #[default]
    Standard,
    Relaxed,
    /// Use the course's own `custom_radius`.
    Custom,
}

impl Sensitivity {
    /// Parse a sensitivity name, falling back to [`Sensitivity::Standard`]
    /// for anything unrecognized.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Self::Exact,
            "relaxed" => Self::Relaxed,
            "custom" => Self::Custom,
            _ => Self::Standard,
        }
    }
}

/// GPS punching configuration for a course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsMode {
    pub enabled: bool,
    pub sensitivity: Sensitivity,
    /// Radius in meters used when `sensitivity` is [`Sensitivity::Custom`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_radius: Option<Real>,
}

impl Default for GpsMode {
    fn default() -> Self {
        Self {
            enabled: true,
            sensitivity: Sensitivity::Standard,
            custom_radius: None,
        }
    }
}

/// What the runner's phone may show during the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileOptions {
    pub allow_mobile_map: bool,
    pub hide_runner_dot: bool,
}

impl Default for MobileOptions {
    fn default() -> Self {
        Self {
            allow_mobile_map: true,
            hide_runner_dot: true,
        }
    }
}

/// One runnable course (or one materialized fork variant of a course).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    /// Family name shared by all fork variants.
    pub base_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fork_label: Option<String>,
    /// Control ids in running order, start first and finish last.
    pub control_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_meters: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climb_meters: Option<Real>,
    #[serde(default)]
    pub gps_mode: GpsMode,
    #[serde(default)]
    pub mobile_options: MobileOptions,
}

impl Course {
    /// Create a course with default GPS and mobile settings.
    pub fn new(id: impl Into<String>, name: impl Into<String>, control_ids: Vec<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            base_name: name.clone(),
            name,
            fork_label: None,
            control_ids,
            length_meters: None,
            climb_meters: None,
            gps_mode: GpsMode::default(),
            mobile_options: MobileOptions::default(),
        }
    }

    /// Custom radius if the course uses the custom policy with a positive value.
    pub fn effective_custom_radius(&self) -> Option<Real> {
        if self.gps_mode.sensitivity != Sensitivity::Custom {
            return None;
        }
        self.gps_mode
            .custom_radius
            .filter(|r| r.is_finite() && *r > 0.0)
    }
}
