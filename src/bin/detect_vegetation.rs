//! Vegetation detection from a proximity field
//!
//! Reads a field (text rows or an image), extracts one peak per plant, and
//! prints texel and world positions.
//!
//! Usage:
//!     detect_vegetation [OPTIONS] <FIELD>
//!
//! Options:
//!     --config <PATH>         JSON scan config (reach, digits, threshold)
//!     --center <X,Y>          Capture center the field was built at (default: 0,0)
//!     --reach <METERS>        Capture half-width (default: 50.0)
//!     --threshold <VALUE>     Minimum quantized value to start a search (default: 0.0)
//!     --digits <N>            Quantization decimal digits (default: 1)
//!     --json                  Print results as JSON
//!     -h, --help              Show this help message
//!
//! FIELD is read as an image when it ends in .png, as text rows otherwise;
//! "-" reads text rows from stdin.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use vegscan::core::{logging, IVec2, Result, Vec2};
use vegscan::field::{load_png, load_text, read_rows};
use vegscan::math::CaptureArea;
use vegscan::{PeakExtractor, ScalarField, ScanConfig};

fn print_help() {
    eprintln!("detect_vegetation - Recover plant positions from a proximity field");
    eprintln!();
    eprintln!("Usage: detect_vegetation [OPTIONS] <FIELD>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    --config <PATH>         JSON scan config (reach, digits, threshold)");
    eprintln!("    --center <X,Y>          Capture center the field was built at (default: 0,0)");
    eprintln!("    --reach <METERS>        Capture half-width (default: 50.0)");
    eprintln!("    --threshold <VALUE>     Minimum quantized value to start a search (default: 0.0)");
    eprintln!("    --digits <N>            Quantization decimal digits (default: 1)");
    eprintln!("    --json                  Print results as JSON");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    detect_vegetation --center 100,40 --threshold 0.5 forest.txt");
}

#[derive(Debug)]
struct Args {
    field: PathBuf,
    center: Vec2,
    scan: ScanConfig,
    json: bool,
}

#[derive(Serialize)]
struct Detection {
    texel: IVec2,
    world: Vec2,
}

fn parse_vec2(value: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("Expected X,Y but got: {}", value))?;
    let x: f32 = x.trim().parse().map_err(|_| format!("Invalid X: {}", x))?;
    let y: f32 = y.trim().parse().map_err(|_| format!("Invalid Y: {}", y))?;
    Ok(Vec2::new(x, y))
}

fn parse_args() -> std::result::Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        return Err("Missing field path".to_string());
    }

    // A config file provides the base; explicit flags override it
    let mut scan = ScanConfig::default();
    if let Some(pos) = args.iter().position(|a| a == "--config") {
        let path = args.get(pos + 1).ok_or("Missing value for --config")?;
        scan = ScanConfig::load_sync(Path::new(path))
            .map_err(|e| format!("Failed to load config {}: {}", path, e))?;
    }

    let mut center = Vec2::ZERO;
    let mut json = false;
    let mut field: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || -> std::result::Result<&str, String> {
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
            "--config" => {
                value()?;
            }
            "--center" => {
                center = parse_vec2(value()?)?;
            }
            "--reach" => {
                let v = value()?;
                scan.reach = v.parse().map_err(|_| format!("Invalid reach: {}", v))?;
            }
            "--threshold" => {
                let v = value()?;
                scan.value_threshold = v.parse().map_err(|_| format!("Invalid threshold: {}", v))?;
            }
            "--digits" => {
                let v = value()?;
                scan.quantization_digits = v.parse().map_err(|_| format!("Invalid digits: {}", v))?;
            }
            "--json" => {
                json = true;
            }
            "-" => {
                field = Some(PathBuf::from("-"));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            path => {
                if field.is_some() {
                    return Err("Multiple field paths specified".to_string());
                }
                field = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    let field = field.ok_or("Missing field path")?;
    scan.validate().map_err(|e| e.to_string())?;

    Ok(Args { field, center, scan, json })
}

fn load_field(path: &Path) -> Result<ScalarField> {
    if path.as_os_str() == "-" {
        return read_rows(std::io::stdin().lock());
    }
    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png { load_png(path) } else { load_text(path) }
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

    let field = match load_field(&args.field) {
        Ok(field) => field,
        Err(e) => {
            eprintln!("Error reading field {}: {}", args.field.display(), e);
            std::process::exit(1);
        }
    };

    if field.width() != field.height() {
        log::warn!(
            "Field is {}x{}; world axes will have different texel sizes",
            field.width(), field.height()
        );
    }

    let start = Instant::now();
    let area = CaptureArea::new(args.center, args.scan.reach);
    let extractor = PeakExtractor::from_config(&args.scan);
    let detections: Vec<Detection> = extractor
        .extract(&field)
        .into_iter()
        .map(|texel| Detection {
            texel,
            world: area.texel_to_world(texel, field.width(), field.height()),
        })
        .collect();
    let elapsed = start.elapsed();

    if args.json {
        match serde_json::to_string_pretty(&detections) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing results: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Vegetation Detection");
    println!("====================");
    println!("Field:      {}x{} ({})", field.width(), field.height(), args.field.display());
    println!("Center:     ({}, {}), reach {}m", args.center.x, args.center.y, args.scan.reach);
    println!("Threshold:  {} ({} digits)", args.scan.value_threshold, args.scan.quantization_digits);
    println!("Detected:   {}", detections.len());
    for d in &detections {
        println!("  texel ({:>4}, {:>4})  world ({:.3}, {:.3})",
                 d.texel.x, d.texel.y, d.world.x, d.world.y);
    }
    println!("Completed in {:.2}ms", elapsed.as_secs_f64() * 1000.0);
}
