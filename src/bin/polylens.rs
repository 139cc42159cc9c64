//! polylens - inspect polynomial lenses and bake lens maps.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use polylens::cameras::{coc_to_pixel_radius, trace_backward_polynomial, trace_backward_thin_lens, PolynomialTraceOptions};
use polylens::core::geometry::Point3f;
use polylens::core::spectrum::GREEN_WAVELENGTH;
use polylens::core::transform::Transform;
use polylens::core::types::Float;
use polylens::lenses::database::{LensDatabase, DOUBLE_GAUSS_50MM};
use polylens::lenses::maps::{generate_stmap, generate_vignetting_map};
use polylens::lenses::polynomial::OUTPUT_NAMES;
use polylens::lenses::{Lens, OpticalSample};
use std::path::PathBuf;

/// Environment variable naming the lens directory when `--lens-dir` is not given.
const LENS_DIR_ENV: &str = "POLYLENS_LENSES";

#[derive(Parser)]
#[command(name = "polylens")]
#[command(author, version, about = "Polynomial lens evaluation and depth of field tools")]
#[command(long_about = "
Evaluate fitted polynomial lenses, solve for aperture directions and trace scene points
back to the sensor.

Examples:
  polylens list
  polylens search gauss
  polylens --lens-dir ./lenses validate
  polylens --lens double_gauss_50mm info
  polylens evaluate --x 5 --y 0 --dx 0.1 --dy 0
  polylens solve --x 5 --y 0 --target-x 8 --target-y 0
  polylens coc --point 0 0 -4000 --focus 2000 --fstop 2.8
  polylens stmap -o stmap.png --width 1920 --height 1080
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of JSON lens files (defaults to $POLYLENS_LENSES)
    #[arg(long, global = true)]
    lens_dir: Option<PathBuf>,

    /// Lens identifier
    #[arg(short, long, global = true, default_value = DOUBLE_GAUSS_50MM)]
    lens: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the constants of the selected lens
    Info,

    /// List available lenses
    List,

    /// Find lenses whose id, name or metadata contains a query
    Search {
        query: String,
    },

    /// Check every lens file and report the invalid ones
    Validate,

    /// Trace a scene point to the sensor and report its circle of confusion
    Coc(CocArgs),

    /// Find the aperture direction reaching an outer pupil point
    Solve(SolveArgs),

    /// Evaluate the forward polynomial for one sample
    Evaluate(EvaluateArgs),

    /// Bake a distortion ST-map to a PNG
    Stmap(StmapArgs),

    /// Bake a vignetting map to a PNG
    Vignette(MapArgs),
}

#[derive(Args)]
struct CocArgs {
    /// Point in camera space, mm (the camera looks down -z)
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true, required = true)]
    point: Vec<Float>,

    /// Focus distance, mm
    #[arg(long, default_value = "2000")]
    focus: Float,

    /// f-stop (0 = wide open)
    #[arg(long, default_value = "0")]
    fstop: Float,

    /// Use the polynomial model for the sensor position
    #[arg(long)]
    polynomial: bool,

    /// Wavelength, micrometers
    #[arg(long, default_value_t = GREEN_WAVELENGTH)]
    lambda: Float,

    /// Sensor width in mm and image width in pixels, to report the CoC in pixels
    #[arg(long, num_args = 2, value_names = ["SENSOR_MM", "PIXELS"])]
    pixels: Option<Vec<Float>>,
}

#[derive(Args)]
struct SolveArgs {
    #[arg(long, allow_negative_numbers = true)]
    x: Float,
    #[arg(long, allow_negative_numbers = true)]
    y: Float,
    #[arg(long, allow_negative_numbers = true)]
    target_x: Float,
    #[arg(long, allow_negative_numbers = true)]
    target_y: Float,
    #[arg(long, default_value_t = GREEN_WAVELENGTH)]
    lambda: Float,
}

#[derive(Args)]
struct EvaluateArgs {
    #[arg(long, allow_negative_numbers = true)]
    x: Float,
    #[arg(long, allow_negative_numbers = true)]
    y: Float,
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    dx: Float,
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    dy: Float,
    #[arg(long, default_value_t = GREEN_WAVELENGTH)]
    lambda: Float,
}

#[derive(Args)]
struct MapArgs {
    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long, default_value = "1024")]
    width: u32,

    #[arg(long, default_value = "1024")]
    height: u32,
}

#[derive(Args)]
struct StmapArgs {
    #[command(flatten)]
    map: MapArgs,

    #[arg(long, default_value_t = GREEN_WAVELENGTH)]
    lambda: Float,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let database = open_database(cli.lens_dir.clone());
    match &cli.command {
        Commands::List => {
            for (id, name) in database.lens_list() {
                println!("{:<24} {}", id, name);
            }
            Ok(())
        }
        Commands::Search { query } => {
            let hits = database.search(query);
            if hits.is_empty() {
                println!("No lenses match '{}'", query);
            }
            for (id, name) in hits {
                println!("{:<24} {}", id, name);
            }
            Ok(())
        }
        Commands::Validate => validate(&database),
        Commands::Info => info(&load_lens(&database, &cli.lens)?),
        Commands::Coc(args) => coc(&load_lens(&database, &cli.lens)?, args),
        Commands::Solve(args) => solve(&load_lens(&database, &cli.lens)?, args),
        Commands::Evaluate(args) => evaluate(&load_lens(&database, &cli.lens)?, args),
        Commands::Stmap(args) => {
            let lens = load_lens(&database, &cli.lens)?;
            check_size(&args.map)?;
            let map = generate_stmap(&lens.constants, &lens.coefficients, args.map.width, args.map.height, args.lambda);
            map.save(&args.map.output)
                .with_context(|| format!("Failed to write {}", args.map.output.display()))?;
            log::info!("Wrote {}x{} ST-map to {}", map.width, map.height, args.map.output.display());
            Ok(())
        }
        Commands::Vignette(args) => {
            let lens = load_lens(&database, &cli.lens)?;
            check_size(args)?;
            let map = generate_vignetting_map(&lens.constants, args.width, args.height);
            map.save(&args.output)
                .with_context(|| format!("Failed to write {}", args.output.display()))?;
            log::info!("Wrote {}x{} vignetting map to {}", map.width, map.height, args.output.display());
            Ok(())
        }
    }
}

fn open_database(lens_dir: Option<PathBuf>) -> LensDatabase {
    match lens_dir.or_else(|| std::env::var_os(LENS_DIR_ENV).map(PathBuf::from)) {
        Some(dir) => LensDatabase::load(dir),
        None => LensDatabase::builtin_only()
    }
}

fn load_lens(database: &LensDatabase, id: &str) -> Result<Lens> {
    database.get(id).with_context(|| format!("Cannot use lens '{}'", id))
}

fn check_size(args: &MapArgs) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        bail!("Map size must be positive, got {}x{}", args.width, args.height);
    }
    Ok(())
}

fn validate(database: &LensDatabase) -> Result<()> {
    let report = database.validate();
    for id in &report.valid {
        println!("ok      {}", id);
    }
    for (id, err) in &report.invalid {
        println!("invalid {}: {}", id, err);
    }
    println!("{} valid, {} invalid", report.valid.len(), report.invalid.len());
    if !report.is_ok() {
        bail!("{} lens file(s) failed validation", report.invalid.len());
    }
    Ok(())
}

fn info(lens: &Lens) -> Result<()> {
    println!("{} ({})", lens.constants.name, lens.id);
    println!("{}", lens.constants);
    println!("max sensor radius: {:.3} mm", lens.constants.max_sensor_radius());
    println!("polynomial degree: {}", lens.coefficients.degree());
    for (i, name) in OUTPUT_NAMES.iter().enumerate() {
        println!("  {:<7} {} terms", name, lens.coefficients.channel(i).terms().len());
    }
    Ok(())
}

fn coc(lens: &Lens, args: &CocArgs) -> Result<()> {
    let point = Point3f::new(args.point[0], args.point[1], args.point[2]);
    let camera = Transform::default();
    let camera_pos = camera.origin();

    let traced = if args.polynomial {
        trace_backward_polynomial(&point, &camera_pos, &camera, args.focus, args.fstop, args.lambda,
            &lens.constants, &lens.coefficients, &PolynomialTraceOptions::default())
    } else {
        trace_backward_thin_lens(&point, &camera_pos, &camera, lens.constants.focal_length, args.focus,
            args.fstop, lens.constants.fstop_min)
    };
    let result = traced.with_context(|| format!("Cannot trace point {}", point))?;

    println!("sensor: ({:.4}, {:.4}) mm", result.sensor.x, result.sensor.y);
    println!("coc radius: {:.4} mm", result.coc_radius);
    if let Some(t) = result.transmittance {
        println!("transmittance: {:.4}", t);
    }
    if let Some(pixels) = &args.pixels {
        let radius = coc_to_pixel_radius(result.coc_radius, pixels[0], pixels[1] as u32);
        println!("coc radius: {:.2} px", radius);
    }
    Ok(())
}

fn solve(lens: &Lens, args: &SolveArgs) -> Result<()> {
    let direction = lens.solve(args.x, args.y, args.lambda, args.target_x, args.target_y)
        .with_context(|| format!("No aperture direction reaches ({}, {})", args.target_x, args.target_y))?;
    println!("dx: {:.6}", direction.dx);
    println!("dy: {:.6}", direction.dy);
    println!("iterations: {}", direction.iterations);
    Ok(())
}

fn evaluate(lens: &Lens, args: &EvaluateArgs) -> Result<()> {
    let out = lens.evaluate(&OpticalSample::new(args.x, args.y, args.dx, args.dy, args.lambda));
    println!("pupil position: ({:.6}, {:.6}) mm", out.x, out.y);
    println!("pupil direction: ({:.6}, {:.6})", out.dx, out.dy);
    println!("transmittance: {:.4}", out.transmittance);
    Ok(())
}
