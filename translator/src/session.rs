//! Translating a single file, start to finish.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, MalformedInstruction};
use crate::lex::lex;
use crate::translate::Translator;
use crate::unit::OutputUnit;
use crate::util::output_path;
use crate::Options;

/// Translate an in-memory source. Stops at the first malformed instruction.
pub fn translate_source(source: &str, options: &Options) -> Result<OutputUnit, MalformedInstruction> {
    let mut translator = Translator::new(options);
    for instruction in lex(source) {
        translator.translate(&instruction)?;
    }
    Ok(translator.finish())
}

/// Translate line by line from `reader`. `path` is only used for error reporting.
pub fn translate_reader<R: BufRead>(reader: R, path: &Path, options: &Options) -> Result<OutputUnit, Error> {
    let mut translator = Translator::new(options);
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        translator.translate_line(&line, index + 1)
            .map_err(|source| Error::Malformed { path: path.to_path_buf(), source })?;
    }
    Ok(translator.finish())
}

pub fn translate_file(path: &Path, options: &Options) -> Result<OutputUnit, Error> {
    info!("Processing {}", path.display());
    let file = File::open(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    translate_reader(BufReader::new(file), path, options)
}

/// Write `unit` under `out_dir`, mirroring where `source` sits below `root`.
/// Returns the path written.
pub fn write_unit(root: &Path, out_dir: &Path, source: &Path, unit: &OutputUnit) -> Result<PathBuf, Error> {
    let destination = output_path(root, out_dir, source);
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::Io { path: parent.to_path_buf(), source })?;
    }
    fs::write(&destination, unit.to_string())
        .map_err(|source| Error::Io { path: destination.clone(), source })?;
    debug!("Wrote {}", destination.display());
    Ok(destination)
}
