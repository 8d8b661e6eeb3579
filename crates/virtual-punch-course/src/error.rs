use thiserror::Error;

/// Structural failure reading a course file.
///
/// Per-item problems (unknown control references, unresolvable positions)
/// are never reported here; they are filtered during normalization.
#[derive(Debug, Error)]
pub enum CourseParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] xml::reader::Error),
    #[error("missing required element: {0}")]
    MissingElement(&'static str),
    #[error("unrecognized course file (root element <{0}>)")]
    UnknownFormat(String),
}
