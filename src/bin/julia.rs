// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate juliaset;
#[macro_use]
extern crate log;

use clap::{App, AppSettings, Arg, ArgMatches};
use juliaset::config::{self, parse_in_range};
use juliaset::output::{write_image, DEFAULT_OUTPUT};
use juliaset::{JuliaError, Partition, RunConfig};
use std::path::Path;
use std::str::FromStr;

const A: &str = "a";
const B: &str = "b";
const SIZE: &str = "size";
const THREADS: &str = "threads";
const MODEL: &str = "model";
const OUTPUT: &str = "output";

fn validate_range<T>(s: &str, name: &'static str, low: T, high: T) -> Result<(), String>
where
    T: FromStr + PartialOrd + ToString,
{
    parse_in_range(s, name, low, high)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = config::max_threads();
    let models = format!(
        "Partition model, {} to {} or a name: {}",
        config::MIN_MODEL,
        config::MAX_MODEL,
        Partition::ALL
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    App::new("julia")
        .version("0.1.0")
        .about("Multi-threaded Julia set renderer")
        .setting(AppSettings::AllowNegativeNumbers)
        .arg(
            Arg::with_name(A)
                .required(true)
                .index(1)
                .validator(|s| validate_range(&s, A, config::MIN_A, config::MAX_A))
                .help("The Julia set's a constant"),
        )
        .arg(
            Arg::with_name(B)
                .required(true)
                .index(2)
                .validator(|s| validate_range(&s, B, config::MIN_B, config::MAX_B))
                .help("The Julia set's b constant"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(true)
                .index(3)
                .validator(|s| validate_range(&s, SIZE, config::MIN_SIZE, config::MAX_SIZE))
                .help("The height and width of the image"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(true)
                .index(4)
                .validator(move |s| validate_range(&s, THREADS, config::MIN_THREADS, max_threads))
                .help("Number of threads to draw with"),
        )
        .arg(
            Arg::with_name(MODEL)
                .required(true)
                .index(5)
                .validator(|s| {
                    Partition::from_str(&s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .help(&models),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value(DEFAULT_OUTPUT)
                .help("Output file; .ppm or .pnm writes a pixmap, anything else a PNG"),
        )
        .get_matches()
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    // Every argument read here is required or defaulted.
    matches.value_of(name).unwrap_or_default()
}

fn configure(matches: &ArgMatches) -> Result<RunConfig, JuliaError> {
    RunConfig::new(
        parse_in_range(value(matches, A), A, config::MIN_A, config::MAX_A)?,
        parse_in_range(value(matches, B), B, config::MIN_B, config::MAX_B)?,
        parse_in_range(value(matches, SIZE), SIZE, config::MIN_SIZE, config::MAX_SIZE)?,
        parse_in_range(
            value(matches, THREADS),
            THREADS,
            config::MIN_THREADS,
            config::max_threads(),
        )?,
        Partition::from_str(value(matches, MODEL))?,
    )
}

fn run(matches: &ArgMatches) -> Result<(), JuliaError> {
    let config = configure(matches)?;
    let render = juliaset::render(&config)?;
    let output = Path::new(value(matches, OUTPUT));
    write_image(output, &render)?;
    info!("Wrote {}", output.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
