//! Course planning normalizer.
//!
//! Turns partial, loosely typed control/course drafts into complete
//! [`Control`] and [`Course`] records. This is the single normalization path
//! for imported files and hand-edited planning data alike, and it cannot
//! fail: every missing or unrecognized value falls back to a default.
//!
//! Defaults:
//! - unknown or missing control type → `control`
//! - GPS mode → `{ enabled: true, sensitivity: standard }`
//! - unrecognized sensitivity → `standard`
//! - mobile options → `{ allowMobileMap: true, hideRunnerDot: true }`
//! - missing ids → `control-{n}` / `course-{n}` (1-based)
//! - missing code → id; missing base name → name
//! - non-finite numbers → absent

use log::warn;
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use virtual_punch_core::{
    Control, ControlKind, Course, GpsMode, MobileOptions, Real, Sensitivity, finite,
};

/// A control as it may arrive from a planner or a file reader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlDraft {
    #[serde(deserialize_with = "loose_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub code: Option<String>,
    #[serde(alias = "type", deserialize_with = "loose_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "loose_number")]
    pub rel_x: Option<Real>,
    #[serde(deserialize_with = "loose_number")]
    pub rel_y: Option<Real>,
    #[serde(deserialize_with = "loose_number")]
    pub lat: Option<Real>,
    #[serde(deserialize_with = "loose_number")]
    pub lng: Option<Real>,
    #[serde(deserialize_with = "loose_number")]
    pub gps_radius: Option<Real>,
    #[serde(deserialize_with = "loose_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GpsModeDraft {
    #[serde(deserialize_with = "loose_bool")]
    pub enabled: Option<bool>,
    #[serde(deserialize_with = "loose_string")]
    pub sensitivity: Option<String>,
    #[serde(deserialize_with = "loose_number")]
    pub custom_radius: Option<Real>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MobileOptionsDraft {
    #[serde(deserialize_with = "loose_bool")]
    pub allow_mobile_map: Option<bool>,
    #[serde(deserialize_with = "loose_bool")]
    pub hide_runner_dot: Option<bool>,
}

/// A course as it may arrive from a planner or a file reader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseDraft {
    #[serde(deserialize_with = "loose_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub base_name: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub fork_label: Option<String>,
    #[serde(deserialize_with = "loose_string_list")]
    pub control_ids: Vec<String>,
    #[serde(deserialize_with = "loose_number")]
    pub length_meters: Option<Real>,
    #[serde(deserialize_with = "loose_number")]
    pub climb_meters: Option<Real>,
    #[serde(deserialize_with = "loose_object")]
    pub gps_mode: Option<GpsModeDraft>,
    #[serde(deserialize_with = "loose_object")]
    pub mobile_options: Option<MobileOptionsDraft>,
}

/// Controls and courses of one event before normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningDraft {
    pub controls: Vec<ControlDraft>,
    pub courses: Vec<CourseDraft>,
}

/// Normalized controls and courses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Planning {
    pub controls: Vec<Control>,
    pub courses: Vec<Course>,
}

/// Apply defaults to one control. `index` is its zero-based position.
pub fn normalize_control(draft: ControlDraft, index: usize) -> Control {
    let id = non_empty(draft.id).unwrap_or_else(|| format!("control-{}", index + 1));
    let code = non_empty(draft.code).unwrap_or_else(|| id.clone());
    Control {
        kind: draft
            .kind
            .as_deref()
            .map(ControlKind::parse_lenient)
            .unwrap_or_default(),
        rel_x: draft.rel_x.and_then(finite),
        rel_y: draft.rel_y.and_then(finite),
        lat: draft.lat.and_then(finite),
        lng: draft.lng.and_then(finite),
        gps_radius: draft.gps_radius.and_then(finite),
        description: non_empty(draft.description),
        id,
        code,
    }
}

/// Apply defaults to one course. `index` is its zero-based position.
///
/// Control references are kept as given; use [`normalize_planning`] to also
/// drop references to unknown controls.
pub fn normalize_course(draft: CourseDraft, index: usize) -> Course {
    let id = non_empty(draft.id).unwrap_or_else(|| format!("course-{}", index + 1));
    let name = non_empty(draft.name).unwrap_or_else(|| id.clone());
    let base_name = non_empty(draft.base_name).unwrap_or_else(|| name.clone());

    let gps = draft.gps_mode.unwrap_or_default();
    let gps_mode = GpsMode {
        enabled: gps.enabled.unwrap_or(true),
        sensitivity: gps
            .sensitivity
            .as_deref()
            .map(Sensitivity::parse_lenient)
            .unwrap_or_default(),
        custom_radius: gps.custom_radius.and_then(finite),
    };

    let mobile = draft.mobile_options.unwrap_or_default();
    let defaults = MobileOptions::default();
    let mobile_options = MobileOptions {
        allow_mobile_map: mobile.allow_mobile_map.unwrap_or(defaults.allow_mobile_map),
        hide_runner_dot: mobile.hide_runner_dot.unwrap_or(defaults.hide_runner_dot),
    };

    Course {
        id,
        name,
        base_name,
        fork_label: non_empty(draft.fork_label),
        control_ids: draft
            .control_ids
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        length_meters: draft.length_meters.and_then(finite),
        climb_meters: draft.climb_meters.and_then(finite),
        gps_mode,
        mobile_options,
    }
}

/// Normalize a whole event: every control and course, with dangling course
/// references to unknown control ids removed.
pub fn normalize_planning(draft: PlanningDraft) -> Planning {
    let controls: Vec<Control> = draft
        .controls
        .into_iter()
        .enumerate()
        .map(|(i, c)| normalize_control(c, i))
        .collect();
    let known: HashSet<&str> = controls.iter().map(|c| c.id.as_str()).collect();

    let courses = draft
        .courses
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let mut course = normalize_course(c, i);
            let before = course.control_ids.len();
            course.control_ids.retain(|id| known.contains(id.as_str()));
            let dropped = before - course.control_ids.len();
            if dropped > 0 {
                warn!(
                    "course {}: dropped {dropped} reference(s) to unknown controls",
                    course.id
                );
            }
            course
        })
        .collect();

    Planning { controls, courses }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Any JSON value; wrong types collapse to "absent" instead of failing.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn loose_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Loose::deserialize(d)? {
        Loose::Text(s) => Some(s),
        Loose::Number(n) => Some(n.to_string()),
        Loose::Bool(_) | Loose::Other(_) => None,
    })
}

/// Numbers become strings; other elements are dropped, as is a non-array.
fn loose_string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum List {
        Items(Vec<Loose>),
        Other(IgnoredAny),
    }

    Ok(match List::deserialize(d)? {
        List::Items(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Loose::Text(s) => Some(s),
                Loose::Number(n) => Some(n.to_string()),
                Loose::Bool(_) | Loose::Other(_) => None,
            })
            .collect(),
        List::Other(_) => Vec::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseObject<T> {
    Object(T),
    Other(IgnoredAny),
}

fn loose_object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match LooseObject::deserialize(d)? {
        LooseObject::Object(value) => Some(value),
        LooseObject::Other(_) => None,
    })
}

fn loose_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Real>, D::Error> {
    Ok(match Loose::deserialize(d)? {
        Loose::Number(n) => finite(n),
        Loose::Text(s) => crate::xml_tree::parse_f64(&s),
        Loose::Bool(_) | Loose::Other(_) => None,
    })
}

fn loose_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Loose::deserialize(d)? {
        Loose::Bool(b) => Some(b),
        Loose::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Loose::Number(_) | Loose::Other(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_drafts_get_defaults() {
        let control = normalize_control(ControlDraft::default(), 4);
        assert_eq!(control.id, "control-5");
        assert_eq!(control.code, "control-5");
        assert_eq!(control.kind, ControlKind::Control);

        let course = normalize_course(CourseDraft::default(), 0);
        assert_eq!(course.id, "course-1");
        assert_eq!(course.name, "course-1");
        assert_eq!(course.base_name, "course-1");
        assert_eq!(course.gps_mode, GpsMode::default());
        assert!(course.gps_mode.enabled);
        assert_eq!(course.gps_mode.sensitivity, Sensitivity::Standard);
        assert!(course.mobile_options.allow_mobile_map);
        assert!(course.mobile_options.hide_runner_dot);
    }

    #[test]
    fn unknown_type_and_sensitivity_fall_back() {
        let control = normalize_control(
            ControlDraft {
                id: Some("31".into()),
                kind: Some("crossing-point".into()),
                ..Default::default()
            },
            0,
        );
        assert_eq!(control.kind, ControlKind::Control);

        let course = normalize_course(
            CourseDraft {
                gps_mode: Some(GpsModeDraft {
                    enabled: Some(false),
                    sensitivity: Some("ultra".into()),
                    custom_radius: Some(f64::NAN),
                }),
                ..Default::default()
            },
            0,
        );
        assert!(!course.gps_mode.enabled);
        assert_eq!(course.gps_mode.sensitivity, Sensitivity::Standard);
        assert_eq!(course.gps_mode.custom_radius, None);
    }

    #[test]
    fn partial_mobile_options_keep_other_default() {
        let course = normalize_course(
            CourseDraft {
                mobile_options: Some(MobileOptionsDraft {
                    allow_mobile_map: Some(false),
                    hide_runner_dot: None,
                }),
                ..Default::default()
            },
            0,
        );
        assert!(!course.mobile_options.allow_mobile_map);
        assert!(course.mobile_options.hide_runner_dot);
    }

    #[test]
    fn loosely_typed_json_is_accepted() -> anyhow::Result<()> {
        let json = r#"{
            "controls": [
                {"id": 31, "type": "Start", "relX": "0.25", "relY": 0.5, "gpsRadius": null},
                {"id": "", "code": "32", "lat": "north"}
            ],
            "courses": [
                {"name": "Long", "controlIds": ["31", "32", "99"],
                 "gpsMode": {"enabled": "false", "sensitivity": "RELAXED"}}
            ]
        }"#;
        let draft: PlanningDraft = serde_json::from_str(json)?;
        let planning = normalize_planning(draft);

        let first = &planning.controls[0];
        assert_eq!(first.id, "31");
        assert_eq!(first.kind, ControlKind::Start);
        assert_eq!(first.rel_x, Some(0.25));
        assert_eq!(first.gps_radius, None);

        let second = &planning.controls[1];
        assert_eq!(second.id, "control-2");
        assert_eq!(second.code, "32");
        assert_eq!(second.lat, None);

        let course = &planning.courses[0];
        assert_eq!(course.id, "course-1");
        assert_eq!(course.base_name, "Long");
        assert!(!course.gps_mode.enabled);
        assert_eq!(course.gps_mode.sensitivity, Sensitivity::Relaxed);
        // "32" is a code, not an id; "99" does not exist.
        assert_eq!(course.control_ids, vec!["31".to_string()]);
        Ok(())
    }

    #[test]
    fn wrongly_typed_lists_and_sections_fall_back() -> anyhow::Result<()> {
        let json = r#"{
            "controls": [{"id": "31"}, {"id": 32}],
            "courses": [
                {"name": "A", "controlIds": [31, 32, true, null], "gpsMode": "relaxed"},
                {"name": "B", "controlIds": "31", "mobileOptions": 7}
            ]
        }"#;
        let planning = normalize_planning(serde_json::from_str(json)?);

        let a = &planning.courses[0];
        assert_eq!(a.control_ids, vec!["31".to_string(), "32".to_string()]);
        assert_eq!(a.gps_mode, GpsMode::default());

        let b = &planning.courses[1];
        assert!(b.control_ids.is_empty());
        assert_eq!(b.mobile_options, MobileOptions::default());
        Ok(())
    }

    #[test]
    fn normalization_is_idempotent_on_complete_input() {
        let draft = PlanningDraft {
            controls: vec![ControlDraft {
                id: Some("S1".into()),
                code: Some("S1".into()),
                kind: Some("start".into()),
                rel_x: Some(0.1),
                rel_y: Some(0.2),
                ..Default::default()
            }],
            courses: vec![CourseDraft {
                id: Some("1".into()),
                name: Some("Short".into()),
                control_ids: vec!["S1".into()],
                ..Default::default()
            }],
        };
        assert_eq!(normalize_planning(draft.clone()), normalize_planning(draft));
    }
}
