use seamshrink::{
    calculate_energy, energy_to_image, CarveError, CarveOptions, CarveStep, SeamCarver,
    SeamStrategy, StageTimings,
};
use std::convert::TryFrom;
use std::process;

extern crate clap;
extern crate image;

use clap::{App, Arg, ArgMatches};
use image::Rgb;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

// Targets arrive as signed numbers so that negative sizes are reported
// as invalid targets rather than as parse failures.
fn parse_target(matches: &ArgMatches, name: &str) -> Result<i64, failure::Error> {
    let raw = matches.value_of(name).unwrap_or_default();
    raw.trim()
        .parse::<i64>()
        .map_err(|_| failure::format_err!("--{} expects an integer, got {:?}", name, raw))
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let input = matches.value_of("input").unwrap_or_default();
    let output = matches.value_of("output").unwrap_or_default();
    let width = parse_target(matches, "width")?;
    let height = parse_target(matches, "height")?;

    let image = image::open(input).map_err(CarveError::from)?.to_rgb8();
    let (current_width, current_height) = image.dimensions();
    println!("Original size: {}x{}", current_width, current_height);

    let invalid = || CarveError::InvalidTarget {
        width,
        height,
        current_width,
        current_height,
    };
    let target_width = u32::try_from(width).map_err(|_| invalid())?;
    let target_height = u32::try_from(height).map_err(|_| invalid())?;

    if let Some(path) = matches.value_of("energy") {
        energy_to_image(&calculate_energy(&image))
            .save(path)
            .map_err(CarveError::from)?;
        info!(path, "wrote energy map");
    }

    let mut options = CarveOptions::new();
    if matches.is_present("greedy") {
        options = options.set_strategy(SeamStrategy::Greedy);
    }
    if let Some(threads) = matches.value_of("threads") {
        let threads = threads
            .parse::<usize>()
            .map_err(|_| failure::format_err!("--threads expects a count, got {:?}", threads))?;
        options = options.set_threads(threads);
    }

    let mut carver = SeamCarver::new(image).with_options(options);
    let mut timings = StageTimings::new();
    let summary = carver.carve_with(
        target_width,
        target_height,
        &mut |step: &CarveStep<'_, Rgb<u8>, u8>| {
            debug!(
                orientation = %step.orientation(),
                width = step.after.0,
                height = step.after.1,
                "progress"
            );
        },
        &mut timings,
    )?;
    info!(%timings, "stage timings");

    carver.into_image().save(output).map_err(CarveError::from)?;
    println!("New size: {}x{}", summary.width, summary.height);
    println!("Saved to {}", output);
    Ok(())
}

fn main() {
    let matches = App::new("seamshrink")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware image shrinking by seam carving")
        .arg(
            Arg::with_name("input")
                .help("The image to shrink")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Where to write the result")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .allow_hyphen_values(true)
                .required(true)
                .help("Target width in pixels"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .allow_hyphen_values(true)
                .required(true)
                .help("Target height in pixels"),
        )
        .arg(
            Arg::with_name("greedy")
                .long("greedy")
                .help("Use the greedy seam search instead of dynamic programming"),
        )
        .arg(
            Arg::with_name("energy")
                .long("energy")
                .takes_value(true)
                .value_name("FILE")
                .help("Also write the initial energy map as a greyscale image"),
        )
        .arg(
            Arg::with_name("threads")
                .long("threads")
                .takes_value(true)
                .help("Worker threads for the energy pass (threaded builds only)"),
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .takes_value(true)
                .default_value("warn")
                .help("Log filter, overridden by RUST_LOG"),
        )
        .get_matches();

    init_logging(matches.value_of("log-level").unwrap_or("warn"));

    if let Err(err) = run(&matches) {
        eprintln!("seamshrink: {}", err);
        process::exit(1);
    }
}
