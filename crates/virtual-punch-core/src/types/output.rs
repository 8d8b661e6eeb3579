//! Derived outputs: parsed course files and geofenced controls.

use crate::{Control, ControlKind, Course, Real};
use serde::{Deserialize, Serialize};

/// Course-file dialect a [`ParsedCourseData`] was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseFormat {
    /// IOF XML 3.0 `CourseData`.
    #[serde(rename = "iof-coursedata")]
    IofCourseData,
    /// Purple Pen event file.
    #[serde(rename = "purplepen")]
    PurplePen,
}

/// Result of parsing one course file.
///
/// Both dialects produce the same shape; the `format` tag is informational and
/// no later stage branches on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCourseData {
    pub format: CourseFormat,
    pub controls: Vec<Control>,
    pub courses: Vec<Course>,
}

impl ParsedCourseData {
    /// Look up a control by id.
    pub fn control(&self, id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.id == id)
    }

    /// Look up a course by id.
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }
}

/// A geofence standing in for a physical punch box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualControl {
    pub id: String,
    pub code: String,
    pub kind: ControlKind,
    /// Zero-based position in the output list.
    pub order: usize,
    pub lat: Real,
    pub lng: Real,
    /// Geofence radius in meters.
    pub radius: Real,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Output of the virtual control builder for one course.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualControlSet {
    /// Resolved controls in course order.
    pub controls: Vec<VirtualControl>,
    /// Codes of referenced controls whose position could not be resolved.
    pub missing_control_codes: Vec<String>,
}

impl VirtualControlSet {
    /// True when every referenced control resolved.
    pub fn is_complete(&self) -> bool {
        self.missing_control_codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_tag_serializes_with_dialect_names() {
        let data = ParsedCourseData {
            format: CourseFormat::IofCourseData,
            controls: vec![],
            courses: vec![],
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["format"], "iof-coursedata");
        assert_eq!(
            serde_json::to_value(CourseFormat::PurplePen).unwrap(),
            "purplepen"
        );
    }
}
