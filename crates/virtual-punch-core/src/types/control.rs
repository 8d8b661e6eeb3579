//! Control records.

use crate::Real;
use serde::{Deserialize, Serialize};

/// Role of a control within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Start,
    #[default]
    Control,
    Finish,
}

impl ControlKind {
    /// Map a free-form type string onto a kind.
    ///
    /// Matching is case-insensitive; anything other than `start` or `finish`
    /// is an ordinary control.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "finish" => Self::Finish,
            _ => Self::Control,
        }
    }
}

/// A control point as imported from a course file or edited by a planner.
///
/// Two coordinate sources exist: a relative image position (`rel_x`, `rel_y`
/// in `[0, 1]`, y growing downward) and an absolute `lat`/`lng`. A control with
/// neither resolvable is kept but cannot become a virtual control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub id: String,
    /// Code printed on the control description and the punch box.
    pub code: String,
    pub kind: ControlKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_x: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_y: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<Real>,
    /// Explicit geofence radius in meters; overrides every course policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_radius: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Control {
    /// Create a control without any coordinates.
    pub fn new(id: impl Into<String>, code: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            kind,
            rel_x: None,
            rel_y: None,
            lat: None,
            lng: None,
            gps_radius: None,
            description: None,
        }
    }

    /// Builder-style setter for the relative image position.
    pub fn with_relative(mut self, rel_x: Real, rel_y: Real) -> Self {
        self.rel_x = Some(rel_x);
        self.rel_y = Some(rel_y);
        self
    }

    /// Builder-style setter for the absolute position.
    pub fn with_lat_lng(mut self, lat: Real, lng: Real) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    /// Relative position if both components are present.
    pub fn relative(&self) -> Option<(Real, Real)> {
        Some((self.rel_x?, self.rel_y?))
    }

    /// Explicit radius if it is a usable positive value.
    pub fn positive_gps_radius(&self) -> Option<Real> {
        self.gps_radius.filter(|r| r.is_finite() && *r > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parsing_is_lenient() {
        assert_eq!(ControlKind::parse_lenient("Start"), ControlKind::Start);
        assert_eq!(ControlKind::parse_lenient(" FINISH "), ControlKind::Finish);
        assert_eq!(ControlKind::parse_lenient("CrossingPoint"), ControlKind::Control);
        assert_eq!(ControlKind::parse_lenient(""), ControlKind::Control);
    }

    #[test]
    fn non_positive_radius_is_ignored() {
        let mut c = Control::new("31", "31", ControlKind::Control);
        c.gps_radius = Some(0.0);
        assert_eq!(c.positive_gps_radius(), None);
        c.gps_radius = Some(-4.0);
        assert_eq!(c.positive_gps_radius(), None);
        c.gps_radius = Some(12.5);
        assert_eq!(c.positive_gps_radius(), Some(12.5));
    }

    #[test]
    fn json_uses_camel_case_and_skips_missing() {
        let c = Control::new("S1", "S1", ControlKind::Start).with_relative(0.25, 0.5);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["relX"], 0.25);
        assert_eq!(json["kind"], "start");
        assert!(json.get("lat").is_none());
    }
}
