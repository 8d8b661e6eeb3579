//! Purple Pen `course-scribe-event` reader (the branching dialect).
//!
//! Controls carry a map position like IOF controls do. Courses are not flat
//! lists: each course names its first course-control, and course-controls
//! link forward through `next` elements. Fork points (`variation="fork"`,
//! `variation="loop"` or `split-start="true"`) list several branch heads; the
//! resulting graph is expanded into one course per distinct control sequence.

use crate::fork::{ForkGraph, ForkNode};
use crate::map_box::MapBox;
use crate::planning::{ControlDraft, CourseDraft, PlanningDraft};
use crate::xml_tree::Element;
use crate::CourseParseError;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use virtual_punch_core::ControlKind;

pub(crate) const ROOT: &str = "course-scribe-event";

pub(crate) fn read(root: &Element) -> Result<PlanningDraft, CourseParseError> {
    if root.name != ROOT {
        return Err(CourseParseError::MissingElement("course-scribe-event"));
    }

    let course_controls: Vec<(&str, ControlKind, &Element)> = root
        .children_named("control")
        .filter_map(|c| {
            let kind = course_kind(c.attr("kind"))?;
            match c.attr("id") {
                Some(id) => Some((id, kind, c)),
                None => {
                    warn!("skipping Purple Pen control without id");
                    None
                }
            }
        })
        .collect();

    let mut map_box = print_area_box(root);
    for (_, _, c) in &course_controls {
        if let Some((x, y)) = location(c) {
            map_box.include(x, y);
        }
    }

    let mut draft = PlanningDraft::default();
    let mut known = HashSet::new();
    for (id, kind, c) in course_controls {
        if !known.insert(id) {
            continue;
        }
        let rel = location(c).and_then(|(x, y)| map_box.normalize(x, y));
        let code = c
            .child_text("code")
            .map(str::to_string)
            .unwrap_or_else(|| match kind {
                ControlKind::Start => format!("S{id}"),
                ControlKind::Finish => format!("F{id}"),
                ControlKind::Control => id.to_string(),
            });
        draft.controls.push(ControlDraft {
            id: Some(id.to_string()),
            code: Some(code),
            kind: Some(kind_name(kind).to_string()),
            rel_x: rel.map(|r| r.0),
            rel_y: rel.map(|r| r.1),
            description: c.child_text("description").map(str::to_string),
            ..Default::default()
        });
    }

    let graph = course_graph(root, &known);
    for (index, course) in root.children_named("course").enumerate() {
        draft.courses.extend(expand_course(course, index, &graph));
    }

    debug!(
        "Purple Pen event: {} controls, {} course variants",
        draft.controls.len(),
        draft.courses.len()
    );
    Ok(draft)
}

/// Purple Pen control kinds that take part in a course.
fn course_kind(kind: Option<&str>) -> Option<ControlKind> {
    match kind? {
        "start" => Some(ControlKind::Start),
        "normal" => Some(ControlKind::Control),
        "finish" => Some(ControlKind::Finish),
        _ => None,
    }
}

fn kind_name(kind: ControlKind) -> &'static str {
    match kind {
        ControlKind::Start => "start",
        ControlKind::Control => "control",
        ControlKind::Finish => "finish",
    }
}

fn location(control: &Element) -> Option<(f64, f64)> {
    let loc = control.child("location")?;
    Some((loc.attr_f64("x")?, loc.attr_f64("y")?))
}

fn print_area_box(root: &Element) -> MapBox {
    let mut map_box = MapBox::default();
    let area = root.child("event").and_then(|e| e.child("print-area"));
    if let Some(area) = area {
        let corners = (
            area.attr_f64("left"),
            area.attr_f64("top"),
            area.attr_f64("right"),
            area.attr_f64("bottom"),
        );
        if let (Some(left), Some(top), Some(right), Some(bottom)) = corners {
            map_box.include(left, top);
            map_box.include(right, bottom);
        }
    }
    map_box
}

/// Every `course-control` as a graph node. References to controls outside
/// `known` become pass-through nodes.
fn course_graph(root: &Element, known: &HashSet<&str>) -> ForkGraph {
    let mut by_id: HashMap<&str, &Element> = HashMap::new();
    for cc in root.children_named("course-control") {
        match cc.attr("id") {
            Some(id) => {
                by_id.entry(id).or_insert(cc);
            }
            None => warn!("skipping Purple Pen course-control without id"),
        }
    }

    let mut graph = ForkGraph::default();
    for (&id, &cc) in &by_id {
        let control = cc
            .attr("control")
            .filter(|c| known.contains(c))
            .map(str::to_string);
        graph.nodes.insert(
            id.to_string(),
            ForkNode {
                control,
                next: successors(cc, id, &by_id),
            },
        );
    }
    graph
}

fn first_next(cc: &Element) -> Option<&str> {
    cc.children_named("next").find_map(|n| n.attr("course-control"))
}

/// Successor node ids of one course-control.
///
/// A split list names the course-controls of a fork. An entry that is the
/// fork point itself, or a sibling copy of the same control, contributes its
/// own `next`; any other entry is a branch head.
fn successors(cc: &Element, own_id: &str, by_id: &HashMap<&str, &Element>) -> Vec<String> {
    let is_fork = matches!(cc.attr("variation"), Some("fork" | "loop"))
        || cc.attr("split-start") == Some("true");
    if !is_fork {
        return first_next(cc).map(str::to_string).into_iter().collect();
    }

    let split: Vec<&str> = cc
        .child_text("split-course-controls")
        .or_else(|| cc.attr("split-course-controls"))
        .map(|list| {
            list.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if split.is_empty() {
        return cc
            .children_named("next")
            .filter_map(|n| n.attr("course-control"))
            .map(str::to_string)
            .collect();
    }

    let own_control = cc.attr("control");
    let mut next: Vec<String> = Vec::new();
    for entry in split {
        let target = if entry == own_id {
            first_next(cc)
        } else {
            match by_id.get(entry) {
                Some(sibling)
                    if own_control.is_some_and(|c| sibling.attr("control") == Some(c)) =>
                {
                    first_next(sibling)
                }
                _ => Some(entry),
            }
        };
        match target {
            Some(target) if !next.iter().any(|n| n == target) => next.push(target.to_string()),
            Some(_) => {}
            None => debug!("fork branch {entry} at course-control {own_id} has no next"),
        }
    }
    next
}

/// Course-level number from an attribute, the `options` element, or a child.
fn course_number(course: &Element, name: &str) -> Option<f64> {
    course
        .attr_f64(name)
        .or_else(|| course.child("options").and_then(|o| o.attr_f64(name)))
        .or_else(|| course.child_f64(name))
}

fn expand_course(course: &Element, index: usize, graph: &ForkGraph) -> Vec<CourseDraft> {
    let base_id = course
        .attr("id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("course-{}", index + 1));
    let name = course.child_text("name").map(str::to_string);
    let base_name = name.clone().unwrap_or_else(|| base_id.clone());

    let template = CourseDraft {
        length_meters: course_number(course, "length"),
        climb_meters: course_number(course, "climb"),
        ..Default::default()
    };

    let first = course.child("first").and_then(|f| f.attr("course-control"));
    let Some(first) = first else {
        warn!("course {base_id} has no first course-control");
        return vec![CourseDraft {
            id: Some(base_id),
            name,
            ..template
        }];
    };

    let mut variants = graph.expand(first);
    if variants.len() <= 1 {
        return vec![CourseDraft {
            id: Some(base_id),
            name,
            control_ids: variants.pop().map(|v| v.control_ids).unwrap_or_default(),
            ..template
        }];
    }

    debug!("course {base_id}: {} fork variants", variants.len());
    variants
        .into_iter()
        .enumerate()
        .map(|(i, v)| CourseDraft {
            id: Some(format!("{base_id}-{}", i + 1)),
            name: Some(format!("{base_name} {}", v.label)),
            base_name: Some(base_name.clone()),
            fork_label: Some(v.label),
            control_ids: v.control_ids,
            ..template.clone()
        })
        .collect()
}
