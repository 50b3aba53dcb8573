//! Finding `.smali` files below a directory and translating all of them.
//!
//! Files are independent: each one gets its own [`Translator`](crate::translate::Translator)
//! and [`OutputUnit`], so they are translated in parallel and a failure in one
//! never affects another. Only a failure to walk the tree itself aborts the run.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::Error;
use crate::session::translate_file;
use crate::unit::OutputUnit;
use crate::Options;

pub const SMALI_EXTENSION: &str = "smali";

/// Every regular file below `root` with a `.smali` extension, in a stable order.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if path.extension().map_or(false, |extension| extension == SMALI_EXTENSION) {
            found.push(path.to_path_buf());
        } else {
            debug!("Skipping {}", path.display());
        }
    }
    Ok(found)
}

/// What happened to each file in a run.
#[derive(Debug, Default)]
pub struct Report {
    pub translated: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, Error)>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Translate every `.smali` file below `root`, handing each finished unit to `emit`.
///
/// `emit` runs on worker threads, once per successfully translated file. A
/// file that fails to translate, or whose unit `emit` rejects, is recorded in
/// [`Report::failed`] and the rest of the run carries on.
pub fn translate_tree<F>(root: &Path, options: &Options, emit: F) -> Result<Report, Error>
    where F: Fn(&Path, &OutputUnit) -> Result<(), Error> + Sync
{
    let files = discover(root)?;

    let outcomes = files.into_par_iter()
        .map(|path| {
            let outcome = translate_file(&path, options)
                .and_then(|unit| emit(&path, &unit));
            (path, outcome)
        })
        .collect::<Vec<_>>();

    let mut report = Report::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(()) => report.translated.push(path),
            Err(error) => {
                warn!("Failed to translate {}: {}", path.display(), error);
                report.failed.push((path, error));
            }
        }
    }
    Ok(report)
}
