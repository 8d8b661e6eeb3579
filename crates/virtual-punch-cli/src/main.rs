//! virtual-punch CLI: course-file import, virtual controls and map calibration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use virtual_punch::{
    CalibrationOptions, Control, CropRect, GeoBounds, GridProjection, LatLng, ParsedCourseData,
    SensitivityRadii, VirtualControl, WorldFile, build_virtual_controls,
    calibration_from_world_file, control_coverage_rect, core::Pt2, estimate_course_length_meters,
    parse_course_file, remap_controls_for_crop, solve_affine,
};

#[derive(Parser)]
#[command(name = "virtual-punch")]
#[command(about = "Orienteering course import and GPS virtual punching")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an IOF XML 3.0 or Purple Pen course file.
    Parse {
        /// Path to the course file.
        #[arg(long)]
        input: PathBuf,
    },

    /// Build geofenced virtual controls for the courses of a course file.
    Virtual(VirtualArgs),

    /// Calibrate a georeferenced map image from its world file.
    WorldBounds(WorldBoundsArgs),

    /// Fit an affine calibration to ground control points.
    SolveAffine {
        /// JSON file: {"gcps": [{"pixel": [x, y], "geo": [lat, lng]}, ...]}.
        #[arg(long)]
        gcps: PathBuf,
    },

    /// Re-express control positions in the rectangle covering all controls.
    Crop {
        /// Path to the course file.
        #[arg(long)]
        input: PathBuf,

        /// Margin around the controls, as a fraction of the image.
        #[arg(long, default_value = "0.05")]
        margin: f64,
    },
}

#[derive(Debug, Clone, Args)]
struct VirtualArgs {
    /// Path to the course file.
    #[arg(long)]
    input: PathBuf,

    /// JSON CalibrationOptions ({"calibration": {...}, "imageWidth", "imageHeight"}).
    #[arg(long)]
    calibration: PathBuf,

    /// Optional JSON SensitivityRadii. Defaults are used if omitted.
    #[arg(long)]
    radii: Option<PathBuf>,

    /// Only this course id.
    #[arg(long)]
    course: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct WorldBoundsArgs {
    /// Path to the world file (.jgw, .pgw, .tfw).
    #[arg(long)]
    world: PathBuf,

    /// Image width in pixels.
    #[arg(long)]
    width: f64,

    /// Image height in pixels.
    #[arg(long)]
    height: f64,

    /// Optional JSON GridProjection. SWEREF 99 TM if omitted.
    #[arg(long)]
    projection: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CourseReport {
    course_id: String,
    controls: Vec<VirtualControl>,
    missing_control_codes: Vec<String>,
    length_meters: Option<u64>,
}

#[derive(Debug, Serialize)]
struct WorldBoundsReport {
    bounds: GeoBounds,
    calibration: CalibrationOptions,
}

#[derive(Debug, Deserialize)]
struct GcpFile {
    gcps: Vec<Gcp>,
}

/// One ground control point: image pixel and its `[lat, lng]`.
#[derive(Debug, Deserialize)]
struct Gcp {
    pixel: [f64; 2],
    geo: [f64; 2],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AffineReport {
    matrix: virtual_punch::AffineMatrix,
    rms_residual: f64,
    num_points: usize,
}

#[derive(Debug, Serialize)]
struct CropReport {
    crop: CropRect,
    controls: Vec<Control>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let json = match cli.command {
        Commands::Parse { input } => run_parse(&input)?,
        Commands::Virtual(args) => run_virtual(&args)?,
        Commands::WorldBounds(args) => run_world_bounds(&args)?,
        Commands::SolveAffine { gcps } => run_solve_affine(&gcps)?,
        Commands::Crop { input, margin } => run_crop(&input, margin)?,
    };
    println!("{json}");
    Ok(())
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn load_course_file(path: &Path) -> Result<ParsedCourseData> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let data = parse_course_file(&bytes)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::info!(
        "Loaded {} ({:?}): {} controls, {} courses",
        path.display(),
        data.format,
        data.controls.len(),
        data.courses.len()
    );
    Ok(data)
}

// ── parse ─────────────────────────────────────────────────────────────

fn run_parse(input: &Path) -> Result<String> {
    let data = load_course_file(input)?;
    Ok(serde_json::to_string_pretty(&data)?)
}

// ── virtual ───────────────────────────────────────────────────────────

fn run_virtual(args: &VirtualArgs) -> Result<String> {
    let data = load_course_file(&args.input)?;
    let calibration: CalibrationOptions = load_json_file(&args.calibration)?;
    let radii = match &args.radii {
        Some(path) => load_json_file::<SensitivityRadii>(path)?,
        None => SensitivityRadii::default(),
    };
    if !radii.is_ordered() {
        tracing::warn!(
            "Sensitivity radii are not ordered exact < standard < relaxed: {:?}",
            radii
        );
    }

    let courses: Vec<_> = match &args.course {
        Some(id) => match data.course(id) {
            Some(course) => vec![course],
            None => bail!("no course with id {id:?}"),
        },
        None => data.courses.iter().collect(),
    };

    let reports: Vec<CourseReport> = courses
        .into_iter()
        .map(|course| {
            let set = build_virtual_controls(course, &data.controls, &calibration, &radii);
            if !set.is_complete() {
                tracing::warn!(
                    "Course {}: unresolved controls {}",
                    course.id,
                    set.missing_control_codes.join(", ")
                );
            }
            CourseReport {
                course_id: course.id.clone(),
                length_meters: estimate_course_length_meters(
                    course,
                    &data.controls,
                    &calibration,
                ),
                controls: set.controls,
                missing_control_codes: set.missing_control_codes,
            }
        })
        .collect();

    Ok(serde_json::to_string_pretty(&reports)?)
}

// ── world-bounds ──────────────────────────────────────────────────────

fn run_world_bounds(args: &WorldBoundsArgs) -> Result<String> {
    if !(args.width > 0.0 && args.height > 0.0) {
        bail!("image size must be positive, got {}x{}", args.width, args.height);
    }
    let text = fs::read_to_string(&args.world)
        .with_context(|| format!("failed to read {}", args.world.display()))?;
    let world = WorldFile::parse(&text)
        .with_context(|| format!("invalid world file {}", args.world.display()))?;
    let projection = match &args.projection {
        Some(path) => load_json_file::<GridProjection>(path)?,
        None => GridProjection::default(),
    };

    let bounds = world.geo_bounds(&projection, args.width, args.height);
    let matrix = calibration_from_world_file(&world, &projection, args.width, args.height)?;
    tracing::info!(
        "Map spans lat {:.6}..{:.6}, lng {:.6}..{:.6}",
        bounds.south,
        bounds.north,
        bounds.west,
        bounds.east
    );

    let report = WorldBoundsReport {
        bounds,
        calibration: CalibrationOptions::new(matrix, args.width, args.height),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ── solve-affine ──────────────────────────────────────────────────────

fn run_solve_affine(gcps_path: &Path) -> Result<String> {
    let file: GcpFile = load_json_file(gcps_path)?;
    let pixels: Vec<Pt2> = file
        .gcps
        .iter()
        .map(|g| Pt2::new(g.pixel[0], g.pixel[1]))
        .collect();
    let geo: Vec<LatLng> = file
        .gcps
        .iter()
        .map(|g| LatLng::new(g.geo[0], g.geo[1]))
        .collect();

    let fit = solve_affine(&pixels, &geo)?;
    tracing::info!(
        "Affine fit over {} points, RMS residual {:.3e} deg",
        fit.num_points,
        fit.rms_residual
    );

    let report = AffineReport {
        matrix: fit.matrix,
        rms_residual: fit.rms_residual,
        num_points: fit.num_points,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ── crop ──────────────────────────────────────────────────────────────

fn run_crop(input: &Path, margin: f64) -> Result<String> {
    let data = load_course_file(input)?;
    let Some(crop) = control_coverage_rect(&data.controls, margin) else {
        bail!("no control in {} has a map position", input.display());
    };
    tracing::info!(
        "Crop to [{:.3}, {:.3}] x [{:.3}, {:.3}]",
        crop.left,
        crop.right,
        crop.top,
        crop.bottom
    );
    let report = CropReport {
        crop,
        controls: remap_controls_for_crop(&data.controls, &crop),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
