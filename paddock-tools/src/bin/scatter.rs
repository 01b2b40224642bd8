use anyhow::{Context, Result};
use clap::{App, Arg};
use log::info;
use paddock_core::containers::{
    BorrowedRecordBuffer, BorrowedRecordBufferExt, BorrowedRecordBufferMutExt, DynamicRecordBuffer,
    OwningRecordBuffer,
};
use paddock_core::layout::RecordType;
use paddock_derive::RecordType;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// A 2D sample point with double-precision coordinates
#[repr(C, packed)]
#[derive(
    RecordType, Default, Copy, Clone, PartialEq, Debug, bytemuck::AnyBitPattern, bytemuck::NoUninit,
)]
struct Point2 {
    #[paddock(BUILTIN_COORD_X)]
    pub x: f64,
    #[paddock(BUILTIN_COORD_Y)]
    pub y: f64,
}

struct Args {
    pub count: usize,
}

fn get_args() -> Result<Args> {
    let matches = App::new("scatter")
        .version("0.1")
        .about("Generates buffers of random 2D points, demonstrating allocation, zero-initialization, resizing and explicit release of record buffers")
        .arg(
            Arg::with_name("COUNT")
                .short("n")
                .long("count")
                .takes_value(true)
                .value_name("COUNT")
                .help("Number of points to generate")
                .required(true),
        )
        .get_matches();

    let count = matches
        .value_of("COUNT")
        .unwrap()
        .parse::<usize>()
        .context("COUNT must be a non-negative integer")?;

    Ok(Args { count })
}

fn format_point(point: &Point2) -> String {
    // Copy the coordinates out first, references into a packed struct are not allowed
    let (x, y) = (point.x, point.y);
    format!("({:.6},{:.6})", x, y)
}

/// Allocates a zeroed cloud of `count` points. The buffer owns its storage exclusively, and
/// ownership moves out to the caller with the return value
fn sample_cloud(count: usize) -> Result<DynamicRecordBuffer> {
    let buffer = DynamicRecordBuffer::allocate_zeroed(count, Point2::layout())?;
    Ok(buffer)
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = get_args()?;
    let n = args.count;
    let mut rng = SmallRng::from_entropy();

    info!(
        "allocating buffer for {} points with layout {}",
        n,
        Point2::layout()
    );

    let mut points = DynamicRecordBuffer::allocate(n, Point2::layout())?;
    for index in 0..n {
        let point = Point2 {
            x: rng.gen_range(0..16) as f64,
            y: rng.gen_range(0..16) as f64,
        };
        points.view_mut().set_at(index, point)?;
        println!("Point {}: {}", index + 1, format_point(&point));
    }
    println!("-------------------");

    // A zero-initialized buffer needs no per-slot setup before its records are read
    let mut more_points = DynamicRecordBuffer::allocate_zeroed(n, Point2::layout())?;
    for point in more_points.view::<Point2>().iter() {
        println!("{}", format_point(point));
    }

    // Growing keeps the zeroed records; the slots past the old length are unspecified
    more_points.resize(4 * n)?;
    info!(
        "resized zeroed buffer from {} to {} points",
        n,
        more_points.len()
    );

    let even_more_points = sample_cloud(n)?;
    info!(
        "received {} points from the factory function",
        even_more_points.len()
    );

    points.release();
    more_points.release();
    even_more_points.release();

    Ok(())
}
