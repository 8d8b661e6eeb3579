//! IOF XML 3.0 `CourseData` reader (the grid-position dialect).
//!
//! Layout consumed:
//!
//! ```text
//! CourseData
//! └─ RaceCourseData*
//!    ├─ Map / MapPositionTopLeft@x,y, MapPositionBottomRight@x,y
//!    ├─ Control*  @type  Id  Name?  Position@lat,lng?  MapPosition@x,y?
//!    └─ Course*   Id?  Name  CourseFamily?  Length?  Climb?
//!                 CourseControl* / Control
//! ```

use crate::map_box::MapBox;
use crate::planning::{ControlDraft, CourseDraft, PlanningDraft};
use crate::xml_tree::Element;
use crate::CourseParseError;
use log::{debug, warn};
use std::collections::HashSet;

pub(crate) const ROOT: &str = "CourseData";

const MAP_CORNERS: [&str; 2] = ["MapPositionTopLeft", "MapPositionBottomRight"];

pub(crate) fn read(root: &Element) -> Result<PlanningDraft, CourseParseError> {
    if root.name != ROOT {
        return Err(CourseParseError::MissingElement("CourseData"));
    }
    let races: Vec<&Element> = root.children_named("RaceCourseData").collect();
    if races.is_empty() {
        return Err(CourseParseError::MissingElement("RaceCourseData"));
    }

    let mut draft = PlanningDraft::default();
    let mut seen_controls = HashSet::new();

    for race in races {
        let map_box = race_map_box(race);

        for control in race.children_named("Control") {
            let Some(id) = control.child_text("Id") else {
                warn!("skipping IOF control without <Id>");
                continue;
            };
            if !seen_controls.insert(id.to_string()) {
                continue;
            }
            let rel = map_position(control).and_then(|(x, y)| map_box.normalize(x, y));
            let position = control.child("Position");
            draft.controls.push(ControlDraft {
                id: Some(id.to_string()),
                code: Some(id.to_string()),
                kind: Some(control.attr("type").unwrap_or("Control").to_string()),
                rel_x: rel.map(|r| r.0),
                rel_y: rel.map(|r| r.1),
                lat: position.and_then(|p| p.attr_f64("lat")),
                lng: position.and_then(|p| p.attr_f64("lng")),
                gps_radius: None,
                description: control.child_text("Name").map(str::to_string),
            });
        }

        for course in race.children_named("Course") {
            let index = draft.courses.len();
            draft.courses.push(read_course(course, index));
        }
    }

    debug!(
        "IOF course data: {} controls, {} courses",
        draft.controls.len(),
        draft.courses.len()
    );
    Ok(draft)
}

/// Box from the declared map corners, widened by every control's position.
fn race_map_box(race: &Element) -> MapBox {
    let mut map_box = MapBox::default();
    if let Some(map) = race.child("Map") {
        for corner in MAP_CORNERS {
            if let Some(c) = map.child(corner) {
                if let (Some(x), Some(y)) = (c.attr_f64("x"), c.attr_f64("y")) {
                    map_box.include(x, y);
                }
            }
        }
    }
    for control in race.children_named("Control") {
        if let Some((x, y)) = map_position(control) {
            map_box.include(x, y);
        }
    }
    map_box
}

fn map_position(control: &Element) -> Option<(f64, f64)> {
    let pos = control.child("MapPosition")?;
    Some((pos.attr_f64("x")?, pos.attr_f64("y")?))
}

fn read_course(course: &Element, index: usize) -> CourseDraft {
    let name = course.child_text("Name").map(str::to_string);
    let family = course.child_text("CourseFamily").map(str::to_string);
    let id = course
        .child_text("Id")
        .map(str::to_string)
        .or_else(|| name.clone())
        .unwrap_or_else(|| format!("course-{}", index + 1));

    let control_ids = course
        .children_named("CourseControl")
        .filter_map(|cc| cc.child_text("Control"))
        .map(str::to_string)
        .collect();

    let fork_label = match (&name, &family) {
        (Some(n), Some(f)) => fork_label(n, f),
        _ => None,
    };

    CourseDraft {
        id: Some(id),
        base_name: family,
        fork_label,
        name,
        control_ids,
        length_meters: course.child_f64("Length"),
        climb_meters: course.child_f64("Climb"),
        ..Default::default()
    }
}

/// Fork label of a course variant: what remains of the course name after the
/// family prefix, if that remainder is a plain alphanumeric token.
///
/// `("Mellan AC", "Mellan")` → `Some("AC")`.
pub(crate) fn fork_label(name: &str, family: &str) -> Option<String> {
    let family = family.trim();
    if family.is_empty() {
        return None;
    }
    let rest = name.trim().strip_prefix(family)?;
    let rest = rest
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | ':' | '.'))
        .trim_end();
    (!rest.is_empty() && rest.chars().all(char::is_alphanumeric)).then(|| rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fork_label_from_family_suffix() {
        assert_eq!(fork_label("Mellan AC", "Mellan"), Some("AC".to_string()));
        assert_eq!(fork_label("Lång-2B", "Lång"), Some("2B".to_string()));
        assert_eq!(fork_label("Mellan", "Mellan"), None);
        assert_eq!(fork_label("Kort A", "Mellan"), None);
        assert_eq!(fork_label("Mellan A+B", "Mellan"), None);
        assert_eq!(fork_label("Mellan AC", ""), None);
    }
}
