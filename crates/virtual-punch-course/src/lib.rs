//! Course-file parsing for `virtual-punch`.
//!
//! Two XML dialects are understood and both normalize into the same
//! [`ParsedCourseData`]:
//!
//! - IOF XML 3.0 `CourseData` ([`CourseFormat::IofCourseData`]): flat courses,
//!   fork variants already spelled out as separate courses of one family.
//! - Purple Pen `course-scribe-event` ([`CourseFormat::PurplePen`]): linked
//!   course-controls whose forks are expanded here into one course per
//!   distinct control sequence.
//!
//! Map positions are normalized into relative image coordinates with `y`
//! inverted, so that `(0, 0)` is the top-left corner of the map image.
//!
//! Parsing is a pure function of the input bytes. Structural problems
//! (malformed XML, a missing root or race block) are errors; per-item gaps
//! (unknown control references, controls without a position) are filtered or
//! left unresolved.
//!
//! # Example
//!
//! ```
//! use virtual_punch_course::{parse_course_file, CourseFormat};
//!
//! let xml = br#"<CourseData><RaceCourseData>
//!   <Control type="Start"><Id>S1</Id><MapPosition x="0" y="0"/></Control>
//!   <Control><Id>31</Id><MapPosition x="100" y="50"/></Control>
//!   <Course><Name>Short</Name>
//!     <CourseControl><Control>S1</Control></CourseControl>
//!     <CourseControl><Control>31</Control></CourseControl>
//!   </Course>
//! </RaceCourseData></CourseData>"#;
//!
//! let data = parse_course_file(xml).unwrap();
//! assert_eq!(data.format, CourseFormat::IofCourseData);
//! assert_eq!(data.courses[0].control_ids, ["S1", "31"]);
//! assert_eq!(data.control("31").unwrap().rel_y, Some(0.0));
//! ```

mod error;
mod fork;
mod iof;
mod map_box;
pub mod planning;
mod purplepen;
mod xml_tree;

pub use error::CourseParseError;
pub use fork::MAX_VARIANTS;
pub use planning::{
    ControlDraft, CourseDraft, GpsModeDraft, MobileOptionsDraft, Planning, PlanningDraft,
    normalize_control, normalize_course, normalize_planning,
};
pub use virtual_punch_core::{CourseFormat, ParsedCourseData};

use log::debug;
use xml_tree::{Element, parse_document};

/// Identify the dialect of a course file from its root element.
pub fn detect_format(bytes: &[u8]) -> Result<CourseFormat, CourseParseError> {
    let root = parse_document(bytes)?;
    format_of(&root)
}

/// Parse a course file of either dialect.
pub fn parse_course_file(bytes: &[u8]) -> Result<ParsedCourseData, CourseParseError> {
    let root = parse_document(bytes)?;
    match format_of(&root)? {
        CourseFormat::IofCourseData => assemble(CourseFormat::IofCourseData, iof::read(&root)?),
        CourseFormat::PurplePen => assemble(CourseFormat::PurplePen, purplepen::read(&root)?),
    }
}

/// Parse an IOF XML 3.0 `CourseData` document.
pub fn parse_iof_course_data(bytes: &[u8]) -> Result<ParsedCourseData, CourseParseError> {
    let root = parse_document(bytes)?;
    assemble(CourseFormat::IofCourseData, iof::read(&root)?)
}

/// Parse a Purple Pen `course-scribe-event` document, expanding forks.
pub fn parse_purple_pen(bytes: &[u8]) -> Result<ParsedCourseData, CourseParseError> {
    let root = parse_document(bytes)?;
    assemble(CourseFormat::PurplePen, purplepen::read(&root)?)
}

fn format_of(root: &Element) -> Result<CourseFormat, CourseParseError> {
    match root.name.as_str() {
        iof::ROOT => Ok(CourseFormat::IofCourseData),
        purplepen::ROOT => Ok(CourseFormat::PurplePen),
        other => Err(CourseParseError::UnknownFormat(other.to_string())),
    }
}

fn assemble(
    format: CourseFormat,
    draft: PlanningDraft,
) -> Result<ParsedCourseData, CourseParseError> {
    let Planning { controls, courses } = normalize_planning(draft);
    debug!(
        "parsed {format:?}: {} controls, {} courses",
        controls.len(),
        courses.len()
    );
    Ok(ParsedCourseData {
        format,
        controls,
        courses,
    })
}
