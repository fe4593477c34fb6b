// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for pm2md.
//!
//! This binary provides the `pm2md` command for converting Postman
//! collection exports into Markdown documents, one per collection.

use lexopt::prelude::*;
use log::LevelFilter;
use pm2md::{convert, parser::Parser};
use snafu::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

struct Cli {
    dir: Option<PathBuf>,
    file: Option<PathBuf>,
    recursive: bool,
    output: PathBuf,
    log_level: LevelFilter,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(transparent)]
    Convert { source: convert::ConvertError },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert Postman collection exports to Markdown API documentation

Usage: {name} [OPTIONS]

Options:
  -d, --dir <DIR>       Convert every file in DIR (ignored when empty)
  -f, --file <FILE>     Convert a single export FILE (ignored when empty)
  -r, --recursive       Re-read DIR once more for each subdirectory in it
  -o, --output <DIR>    Where to write <collection name>.md files (default: .)

Other options:
  -v, --verbose         Show debug messages
  -q, --quiet           Only show warnings and errors
  -h, --help            Print help
  -V, --version         Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

/// Treats an empty path argument as absent.
fn non_empty(path: PathBuf) -> Option<PathBuf> {
    Some(path).filter(|p| !p.as_os_str().is_empty())
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args_os().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut dir = None;
    let mut file = None;
    let mut recursive = false;
    let mut output = PathBuf::from(".");
    let mut log_level = LevelFilter::Info;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('d') | Long("dir") => dir = non_empty(parser.value()?.parse()?),
            Short('f') | Long("file") => file = non_empty(parser.value()?.parse()?),
            Short('r') | Long("recursive") => recursive = true,
            Short('o') | Long("output") => output = parser.value()?.parse()?,
            Short('v') | Long("verbose") => log_level = LevelFilter::Debug,
            Short('q') | Long("quiet") => log_level = LevelFilter::Warn,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        dir,
        file,
        recursive,
        output,
        log_level,
    })
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let cli = parse_args();
    init_logging(cli.as_ref().map_or(LevelFilter::Info, |cli| cli.log_level));

    match cli.context(ParseArgsSnafu).and_then(|cli| run(&cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Converts the directory first, then the single file.
fn run(cli: &Cli) -> Result<(), Error> {
    let parser = Parser::default();

    if let Some(dir) = &cli.dir {
        let mode = if cli.recursive {
            "recursive"
        } else {
            "non-recursive"
        };
        log::info!("Processing directory [{mode}]: {}", dir.display());
        convert::convert_dir(dir, cli.recursive, &parser, &cli.output)?;
    }

    if let Some(file) = &cli.file {
        log::info!("Processing file: {}", file.display());
        convert::convert_file(file, &parser, &cli.output)?;
    }

    Ok(())
}
