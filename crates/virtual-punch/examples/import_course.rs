//! Import a course file and print each course's virtual controls.
//!
//! Run with:
//! ```bash
//! cargo run -p virtual-punch --example import_course -- course.xml calibration.json
//! ```
//!
//! `calibration.json` holds `{"calibration": {"a": …, "f": …}, "imageWidth": …,
//! "imageHeight": …}`. Without it only controls with absolute positions resolve.

use anyhow::{Context, Result};
use virtual_punch::prelude::*;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let course_path = args
        .next()
        .context("usage: import_course <course-file> [calibration.json]")?;

    let bytes = std::fs::read(&course_path).with_context(|| format!("read {course_path}"))?;
    let data = parse_course_file(&bytes)?;

    let calibration: CalibrationOptions = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parse {path}"))?
        }
        None => CalibrationOptions::default(),
    };

    println!(
        "{:?}: {} controls, {} courses",
        data.format,
        data.controls.len(),
        data.courses.len()
    );

    let radii = SensitivityRadii::default();
    for course in &data.courses {
        let set = build_virtual_controls(course, &data.controls, &calibration, &radii);
        let length = estimate_course_length_meters(course, &data.controls, &calibration);
        println!(
            "\n{} ({}): {} resolved, length {}",
            course.name,
            course.id,
            set.controls.len(),
            length.map_or_else(|| "-".to_string(), |m| format!("{m} m"))
        );
        for vc in &set.controls {
            println!(
                "  {:>3} {:<6} {:>10.6} {:>11.6}  r={}",
                vc.order, vc.code, vc.lat, vc.lng, vc.radius
            );
        }
        if !set.is_complete() {
            println!("  unresolved: {}", set.missing_control_codes.join(", "));
        }
    }
    Ok(())
}
