//! Synthetic forest field generator
//!
//! Scatters a forest around a center, stamps it into a proximity field, and
//! writes the field as text rows (one row per line).
//!
//! Usage:
//!     generate_forest [OPTIONS] <OUTPUT>
//!
//! Options:
//!     --seed <SEED>           Scatter seed (default: 12345)
//!     --spacing <METERS>      Candidate site spacing (default: 8.0)
//!     --coverage <LEVEL>      Noise level a site must exceed, -1..1 (default: 0.0)
//!     --center <X,Y>          Capture center (default: 0,0)
//!     --reach <METERS>        Capture half-width (default: 50.0)
//!     --resolution <N>        Field size in texels (default: 256)
//!     --kernel <TEXELS>       Kernel radius (default: 25)
//!     --png <PATH>            Also write a grayscale PNG
//!     -h, --help              Show this help message

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use vegscan::core::{logging, Vec2};
use vegscan::field::{save_png, save_text};
use vegscan::generation::{ForestScatter, ScatterParams};
use vegscan::math::CaptureArea;
use vegscan::{DensityFieldBuilder, ScanConfig};

fn print_help() {
    eprintln!("generate_forest - Synthetic forest field generator");
    eprintln!();
    eprintln!("Usage: generate_forest [OPTIONS] <OUTPUT>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    --seed <SEED>           Scatter seed (default: 12345)");
    eprintln!("    --spacing <METERS>      Candidate site spacing (default: 8.0)");
    eprintln!("    --coverage <LEVEL>      Noise level a site must exceed, -1..1 (default: 0.0)");
    eprintln!("    --center <X,Y>          Capture center (default: 0,0)");
    eprintln!("    --reach <METERS>        Capture half-width (default: 50.0)");
    eprintln!("    --resolution <N>        Field size in texels (default: 256)");
    eprintln!("    --kernel <TEXELS>       Kernel radius (default: 25)");
    eprintln!("    --png <PATH>            Also write a grayscale PNG");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    generate_forest --seed 7 --kernel 10 --png forest.png forest.txt");
}

#[derive(Debug)]
struct Args {
    output: PathBuf,
    png: Option<PathBuf>,
    center: Vec2,
    scatter: ScatterParams,
    scan: ScanConfig,
}

fn parse_vec2(value: &str) -> Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("Expected X,Y but got: {}", value))?;
    let x: f32 = x.trim().parse().map_err(|_| format!("Invalid X: {}", x))?;
    let y: f32 = y.trim().parse().map_err(|_| format!("Invalid Y: {}", y))?;
    Ok(Vec2::new(x, y))
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        return Err("Missing output path".to_string());
    }

    let mut scatter = ScatterParams::default();
    let mut scan = ScanConfig::default();
    let mut center = Vec2::ZERO;
    let mut png: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || -> Result<&str, String> {
            i += 1;
            args.get(i)
                .map(String::as_str)
                .ok_or_else(|| format!("Missing value for {}", flag))
        };
        match flag {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--seed" => {
                let v = value()?;
                scatter.seed = v.parse().map_err(|_| format!("Invalid seed: {}", v))?;
            }
            "--spacing" => {
                let v = value()?;
                scatter.spacing = v.parse().map_err(|_| format!("Invalid spacing: {}", v))?;
            }
            "--coverage" => {
                let v = value()?;
                scatter.coverage = v.parse().map_err(|_| format!("Invalid coverage: {}", v))?;
            }
            "--center" => {
                center = parse_vec2(value()?)?;
            }
            "--reach" => {
                let v = value()?;
                scan.reach = v.parse().map_err(|_| format!("Invalid reach: {}", v))?;
            }
            "--resolution" => {
                let v = value()?;
                scan.resolution = v.parse().map_err(|_| format!("Invalid resolution: {}", v))?;
            }
            "--kernel" => {
                let v = value()?;
                scan.kernel_radius = v.parse().map_err(|_| format!("Invalid kernel: {}", v))?;
            }
            "--png" => {
                png = Some(PathBuf::from(value()?));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            path => {
                if output.is_some() {
                    return Err("Multiple output paths specified".to_string());
                }
                output = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    let output = output.ok_or("Missing output path")?;
    scan.validate().map_err(|e| e.to_string())?;

    Ok(Args { output, png, center, scatter, scan })
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let area = CaptureArea::new(args.center, args.scan.reach);
    let half = Vec2::splat(args.scan.reach);
    let plants = ForestScatter::new(args.scatter.clone()).scatter(args.center - half, args.center + half);

    let builder = DensityFieldBuilder::from_config(&args.scan);
    let field = builder.build(&area, &plants);

    if let Err(e) = save_text(&field, &args.output) {
        eprintln!("Error writing field: {}", e);
        std::process::exit(1);
    }
    if let Some(png) = &args.png {
        if let Err(e) = save_png(&field, png) {
            eprintln!("Error writing PNG: {}", e);
            std::process::exit(1);
        }
    }

    println!("Forest Field Generator");
    println!("======================");
    println!("Seed:       {}", args.scatter.seed);
    println!("Center:     ({}, {})", args.center.x, args.center.y);
    println!("Field:      {}x{} texels, reach {}m, kernel {}",
             field.width(), field.height(), args.scan.reach, args.scan.kernel_radius);
    println!("Plants:     {}", plants.len());
    for p in &plants {
        println!("  {:.3} {:.3}", p.x, p.y);
    }
    println!("Output:     {}", args.output.display());
    if let Some(png) = &args.png {
        println!("PNG:        {}", png.display());
    }
    println!("Completed in {:.2}s", start.elapsed().as_secs_f64());
}
