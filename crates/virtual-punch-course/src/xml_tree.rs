//! Minimal owned XML element tree.
//!
//! Course files are small (a few hundred controls at most), so the parsers
//! work on a fully built tree instead of the raw event stream. Element and
//! attribute names are matched by local name; namespaces are dropped.

use crate::CourseParseError;
use xml::reader::{EventReader, XmlEvent};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated character data directly inside this element, trimmed.
    pub text: String,
}

impl Element {
    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute parsed as a finite number.
    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        parse_f64(self.attr(name)?)
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Non-empty text of the first child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
    }

    /// Text of the first child with the given name, parsed as a finite number.
    pub fn child_f64(&self, name: &str) -> Option<f64> {
        parse_f64(self.child_text(name)?)
    }
}

pub(crate) fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a whole document and return its root element.
pub fn parse_document(bytes: &[u8]) -> Result<Element, CourseParseError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    for event in EventReader::new(bytes) {
        match event? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                stack.push(Element {
                    name: name.local_name,
                    attributes: attributes
                        .into_iter()
                        .map(|a| (a.name.local_name, a.value))
                        .collect(),
                    ..Default::default()
                });
            }
            XmlEvent::EndElement { .. } => {
                let Some(mut done) = stack.pop() else {
                    continue;
                };
                done.text = done.text.trim().to_string();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(done),
                    None => root = Some(done),
                }
            }
            XmlEvent::Characters(s) | XmlEvent::CData(s) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&s);
                }
            }
            _ => {}
        }
    }

    root.ok_or(CourseParseError::MissingElement("document root"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tree_with_local_names() -> Result<(), CourseParseError> {
        let doc = br#"<?xml version="1.0" encoding="UTF-8"?>
            <CourseData xmlns="http://www.orienteering.org/datastandard/3.0" iofVersion="3.0">
              <Control type="Start"><Id> S1 </Id><MapPosition x="1.5" y="-2"/></Control>
              <Control><Id>31</Id></Control>
            </CourseData>"#;
        let root = parse_document(doc)?;
        assert_eq!(root.name, "CourseData");
        assert_eq!(root.attr("iofVersion"), Some("3.0"));
        assert_eq!(root.children_named("Control").count(), 2);

        let start = root.child("Control").unwrap();
        assert_eq!(start.attr("type"), Some("Start"));
        assert_eq!(start.child_text("Id"), Some("S1"));
        let pos = start.child("MapPosition").unwrap();
        assert_eq!(pos.attr_f64("x"), Some(1.5));
        assert_eq!(pos.attr_f64("y"), Some(-2.0));
        Ok(())
    }

    #[test]
    fn leading_bom_is_accepted() -> Result<(), CourseParseError> {
        let mut doc = UTF8_BOM.to_vec();
        doc.extend_from_slice(b"<root><a>1</a></root>");
        let root = parse_document(&doc)?;
        assert_eq!(root.child_f64("a"), Some(1.0));
        Ok(())
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let err = parse_document(b"<root><open></root>").unwrap_err();
        assert!(matches!(err, CourseParseError::Xml(_)), "{err}");
    }

    #[test]
    fn non_numeric_values_are_none() -> Result<(), CourseParseError> {
        let root = parse_document(br#"<r x="abc" y="NaN"><n>inf</n></r>"#)?;
        assert_eq!(root.attr_f64("x"), None);
        assert_eq!(root.attr_f64("y"), None);
        assert_eq!(root.child_f64("n"), None);
        Ok(())
    }
}
