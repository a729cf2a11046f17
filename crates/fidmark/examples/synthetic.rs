//! Track a synthetically rendered marker without any camera input.
//!
//! Run with: `cargo run --example synthetic`

use fidmark::{MarkerTracker, TrackerConfig};
use fidmark_core::GrayImage;
use nalgebra::Point2;

const FRAME_W: usize = 320;
const FRAME_H: usize = 240;
const MARKER_PX: usize = 102;

/// Interior 4x4 code, row-major, dark = 1.
const CODE: u64 = 0b0110_0001_1010_0011;

fn render_marker(x0: usize, y0: usize) -> GrayImage {
    let mut data = vec![255u8; FRAME_W * FRAME_H];
    for y in 0..MARKER_PX {
        for x in 0..MARKER_PX {
            let cx = x * 6 / MARKER_PX;
            let cy = y * 6 / MARKER_PX;
            let dark = cx == 0 || cy == 0 || cx == 5 || cy == 5 || {
                let bit = (cy - 1) * 4 + (cx - 1);
                (CODE >> bit) & 1 == 1
            };
            if dark {
                data[(y0 + y) * FRAME_W + (x0 + x)] = 0;
            }
        }
    }
    GrayImage {
        width: FRAME_W,
        height: FRAME_H,
        data,
    }
}

fn main() {
    let _ = fidmark::core::init_with_level(log::LevelFilter::Debug);

    let (x0, y0) = (109, 69);
    let img = render_marker(x0, y0);

    // in a real pipeline this polygon comes from contour extraction
    let polygon = vec![
        Point2::new(x0 as f32, y0 as f32),
        Point2::new((x0 + MARKER_PX) as f32, y0 as f32),
        Point2::new((x0 + MARKER_PX) as f32, (y0 + MARKER_PX) as f32),
        Point2::new(x0 as f32, (y0 + MARKER_PX) as f32),
    ];

    let cfg = TrackerConfig::for_resolution(FRAME_W, FRAME_H);
    let tracker = MarkerTracker::new(cfg).expect("valid configuration");

    for m in tracker.process_frame(&img.as_view(), &[polygon], 0) {
        println!(
            "marker {:04x} rotation {} distance {:.4}",
            m.code(),
            m.detection.id.rotation,
            m.pose.distance()
        );
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
    }
}
