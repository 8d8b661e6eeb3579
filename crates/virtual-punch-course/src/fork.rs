//! Fork expansion for branching courses.
//!
//! A branching course is a linked graph of course-control nodes. Nodes with
//! more than one successor are fork points; every combination of choices is
//! enumerated eagerly into a flat control sequence. Course control counts are
//! small, so the product stays manageable; [`MAX_VARIANTS`] bounds it anyway.

use log::warn;
use std::collections::{HashMap, HashSet};

/// Upper bound on enumerated paths per course.
pub const MAX_VARIANTS: usize = 4096;

/// One course-control node.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct ForkNode {
    /// Control id visited at this node, `None` if the node carries no course
    /// control (e.g. it references an unsupported control kind).
    pub control: Option<String>,
    /// Successor node ids. Two or more make this node a fork point.
    pub next: Vec<String>,
}

/// Graph of course-control nodes keyed by node id.
#[derive(Debug, Clone, Default)]
pub(crate) struct ForkGraph {
    pub nodes: HashMap<String, ForkNode>,
}

/// A fully materialized path through a branching course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Variant {
    pub control_ids: Vec<String>,
    /// One letter per fork point passed, `A` for the first branch.
    pub label: String,
}

impl ForkGraph {
    /// Enumerate every path from `first`, deduplicated by control sequence.
    ///
    /// First occurrence wins, so the label of a reconverging duplicate is the
    /// one of the lexicographically first choice path.
    pub fn expand(&self, first: &str) -> Vec<Variant> {
        let mut walk = Walk {
            graph: self,
            visited: HashSet::new(),
            controls: Vec::new(),
            label: String::new(),
            out: Vec::new(),
            truncated: false,
        };
        walk.visit(first);
        if walk.truncated {
            warn!("fork expansion from {first} stopped at {MAX_VARIANTS} variants");
        }

        let mut seen = HashSet::new();
        walk.out
            .into_iter()
            .filter(|v| seen.insert(v.control_ids.clone()))
            .collect()
    }
}

struct Walk<'a> {
    graph: &'a ForkGraph,
    visited: HashSet<String>,
    controls: Vec<String>,
    label: String,
    out: Vec<Variant>,
    truncated: bool,
}

impl Walk<'_> {
    fn visit(&mut self, node_id: &str) {
        if self.out.len() >= MAX_VARIANTS {
            self.truncated = true;
            return;
        }
        let graph = self.graph;
        let node = match graph.nodes.get(node_id) {
            Some(node) if !self.visited.contains(node_id) => node,
            // Unknown node or a revisit ends the path here.
            _ => return self.emit(),
        };

        self.visited.insert(node_id.to_string());
        if let Some(control) = &node.control {
            self.controls.push(control.clone());
        }

        match node.next.as_slice() {
            [] => self.emit(),
            [only] => self.visit(only),
            branches => {
                for (choice, branch) in branches.iter().enumerate() {
                    self.label.push(branch_letter(choice));
                    self.visit(branch);
                    self.label.pop();
                }
            }
        }

        if node.control.is_some() {
            self.controls.pop();
        }
        self.visited.remove(node_id);
    }

    fn emit(&mut self) {
        if self.out.len() >= MAX_VARIANTS {
            self.truncated = true;
            return;
        }
        self.out.push(Variant {
            control_ids: self.controls.clone(),
            label: self.label.clone(),
        });
    }
}

/// `A`, `B`, … `Z`, then lowercase and digits for very wide forks.
fn branch_letter(choice: usize) -> char {
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    LETTERS.get(choice).map_or('?', |&b| b as char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, Option<&str>, &[&str])]) -> ForkGraph {
        ForkGraph {
            nodes: edges
                .iter()
                .map(|(id, control, next)| {
                    (
                        id.to_string(),
                        ForkNode {
                            control: control.map(str::to_string),
                            next: next.iter().map(|s| s.to_string()).collect(),
                        },
                    )
                })
                .collect(),
        }
    }

    fn ids(v: &Variant) -> Vec<&str> {
        v.control_ids.iter().map(String::as_str).collect()
    }

    #[test]
    fn linear_course_is_one_variant() {
        let g = graph(&[
            ("1", Some("S1"), &["2"]),
            ("2", Some("31"), &["3"]),
            ("3", Some("F1"), &[]),
        ]);
        let variants = g.expand("1");
        assert_eq!(variants.len(), 1);
        assert_eq!(ids(&variants[0]), ["S1", "31", "F1"]);
        assert_eq!(variants[0].label, "");
    }

    #[test]
    fn two_independent_forks_multiply() {
        // S1 → {31 | 32} → 40 → {41 | 42 | 43} → F1
        let g = graph(&[
            ("s", Some("S1"), &["a", "b"]),
            ("a", Some("31"), &["m"]),
            ("b", Some("32"), &["m"]),
            ("m", Some("40"), &["x", "y", "z"]),
            ("x", Some("41"), &["f"]),
            ("y", Some("42"), &["f"]),
            ("z", Some("43"), &["f"]),
            ("f", Some("F1"), &[]),
        ]);
        let variants = g.expand("s");
        assert_eq!(variants.len(), 6);
        let labels: Vec<&str> = variants.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, ["AA", "AB", "AC", "BA", "BB", "BC"]);
        assert_eq!(ids(&variants[4]), ["S1", "32", "40", "42", "F1"]);

        let unique: HashSet<_> = variants.iter().map(|v| v.control_ids.clone()).collect();
        assert_eq!(unique.len(), variants.len());
    }

    #[test]
    fn reconverging_duplicates_are_removed() {
        // Both branches pass only through a node without a course control.
        let g = graph(&[
            ("s", Some("S1"), &["a", "b"]),
            ("a", None, &["f"]),
            ("b", None, &["f"]),
            ("f", Some("F1"), &[]),
        ]);
        let variants = g.expand("s");
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].label, "A");
    }

    #[test]
    fn cycle_terminates_the_path() {
        let g = graph(&[("1", Some("S1"), &["2"]), ("2", Some("31"), &["1"])]);
        let variants = g.expand("1");
        assert_eq!(variants.len(), 1);
        assert_eq!(ids(&variants[0]), ["S1", "31"]);
    }

    #[test]
    fn unknown_first_node_gives_empty_path() {
        let variants = ForkGraph::default().expand("nope");
        assert_eq!(variants.len(), 1);
        assert!(variants[0].control_ids.is_empty());
    }

    #[test]
    fn enumeration_is_bounded() {
        // 13 binary forks in a row: 8192 paths.
        let mut edges: Vec<(String, Vec<String>)> = Vec::new();
        for i in 0..13 {
            edges.push((format!("f{i}"), vec![format!("a{i}"), format!("b{i}")]));
            edges.push((format!("a{i}"), vec![format!("f{}", i + 1)]));
            edges.push((format!("b{i}"), vec![format!("f{}", i + 1)]));
        }
        let mut g = ForkGraph::default();
        for (id, next) in edges {
            g.nodes.insert(
                id.clone(),
                ForkNode {
                    control: Some(id),
                    next,
                },
            );
        }
        let variants = g.expand("f0");
        assert_eq!(variants.len(), MAX_VARIANTS);
    }
}
