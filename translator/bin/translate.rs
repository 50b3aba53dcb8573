extern crate smali2java;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{App, Arg, ArgMatches};
use log::{error, info, LevelFilter};

use smali2java::discover::translate_tree;
use smali2java::error::Error;
use smali2java::session::write_unit;
use smali2java::unit::OutputUnit;
use smali2java::{LeniencyLevel, Options};

const DEFAULT_ROOT: &str = "./";

fn main() {
    let matches = App::new("smali2java")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Renders every .smali file below a directory as Java-like source")
        .arg(Arg::with_name("path_to_smali")
            .long("path_to_smali")
            .alias("path")
            .value_name("DIR")
            .default_value(DEFAULT_ROOT)
            .help("Directory to search for .smali files"))
        .arg(Arg::with_name("out_dir")
            .long("out-dir")
            .value_name("DIR")
            .takes_value(true)
            .help("Write one .java file per input here instead of printing to stdout"))
        .arg(Arg::with_name("strict")
            .long("strict")
            .help("Reject descriptors and register lists that aren't exactly well formed"))
        .arg(Arg::with_name("static_reads")
            .long("static-reads")
            .help("Translate sget instructions into assignments"))
        .arg(Arg::with_name("verbose")
            .short("v")
            .long("verbose")
            .help("Log every file skipped and written"))
        .get_matches();

    init_logging(matches.is_present("verbose"));

    let root = PathBuf::from(matches.value_of("path_to_smali").unwrap_or(DEFAULT_ROOT));
    let options = options(&matches);

    let result = match matches.value_of("out_dir") {
        Some(out_dir) => {
            let out_dir = Path::new(out_dir);
            translate_tree(&root, &options, |path, unit| {
                write_unit(&root, out_dir, path, unit).map(|_| ())
            })
        }
        None => translate_tree(&root, &options, print_unit),
    };

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };

    for (path, err) in report.failed.iter() {
        match err.malformed() {
            Some(malformed) => {
                let origin = path.display().to_string();
                eprintln!("{}", malformed.render_snippet(Some(&origin), true));
            }
            None => eprintln!("{}", err),
        }
    }

    info!("{} translated, {} failed", report.translated.len(), report.failed.len());
    if !report.is_success() {
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_module("smali2java", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

fn options(matches: &ArgMatches) -> Options {
    let leniency = if matches.is_present("strict") {
        LeniencyLevel::Strict
    } else {
        LeniencyLevel::Lenient
    };
    Options {
        leniency,
        static_field_reads: matches.is_present("static_reads"),
    }
}

/// Each unit is written whole while holding the stdout lock.
fn print_unit(_path: &Path, unit: &OutputUnit) -> Result<(), Error> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write!(handle, "{}", unit).map_err(Error::Output)?;
    handle.flush().map_err(Error::Output)
}
