//! Detect square fiducial markers in an image and print their poses.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fidmark::detect::track_image;
use fidmark::{CameraIntrinsics, DetectorParams, MarkerTracker, TrackerConfig};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "fidmark", about = "Square fiducial marker detection and pose")]
struct Args {
    /// Input image (any format supported by the `image` crate).
    image: PathBuf,

    /// Binarization threshold for contour extraction.
    #[arg(long, default_value_t = 60)]
    threshold: u8,

    /// Physical marker side length in meters.
    #[arg(long, default_value_t = 0.045)]
    marker_side: f64,

    /// Focal length in pixels; defaults to the legacy unit-focal convention.
    #[arg(long)]
    focal: Option<f64>,

    /// Log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = fidmark::core::init_with_level(level);

    let reader = match image::ImageReader::open(&args.image) {
        Ok(reader) => reader,
        Err(err) => {
            eprintln!("failed to open {}: {err}", args.image.display());
            return ExitCode::FAILURE;
        }
    };
    let img = match reader.decode() {
        Ok(img) => img.to_luma8(),
        Err(err) => {
            eprintln!("failed to decode {}: {err}", args.image.display());
            return ExitCode::FAILURE;
        }
    };

    let (w, h) = (img.width() as usize, img.height() as usize);
    let intrinsics = match args.focal {
        Some(f) => CameraIntrinsics {
            fx: f,
            fy: f,
            cx: w as f64 * 0.5,
            cy: h as f64 * 0.5,
        },
        None => CameraIntrinsics::unit_focal(w, h),
    };

    let cfg = TrackerConfig {
        detector: DetectorParams {
            bin_threshold: args.threshold,
            ..DetectorParams::default()
        },
        intrinsics,
        marker_side: args.marker_side,
    };

    let tracker = match MarkerTracker::new(cfg) {
        Ok(tracker) => tracker,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let markers = track_image(&tracker, &img, 0);
    println!("{} marker(s) found", markers.len());

    for m in &markers {
        println!("\nmarker {:04x} (rotation {})", m.code(), m.detection.id.rotation);
        let mat = m.pose.to_matrix();
        for row in 0..4 {
            println!(
                "{:9.4} {:9.4} {:9.4} {:9.4}",
                mat[(row, 0)],
                mat[(row, 1)],
                mat[(row, 2)],
                mat[(row, 3)]
            );
        }
        println!("distance: {:.4}", m.pose.distance());
    }

    ExitCode::SUCCESS
}
