use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::core::tags::{classify, derive_tags};
use crate::models::{BusinessProfile, RiderProfile};

/// Errors that can occur while loading the bootstrap catalog.
///
/// Only whole-file problems are errors; individual malformed records are
/// logged and skipped, so a partial catalog loads rather than failing.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to read bootstrap file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Load rider profiles from a JSON-lines file.
///
/// Each rider's initial tag set is derived from the signal readings in the
/// record. Records that fail to parse are skipped with a warning.
pub fn load_riders<P: AsRef<Path>>(path: P) -> Result<Vec<RiderProfile>, BootstrapError> {
    let path = path.as_ref();
    let mut riders = Vec::new();

    for (lineno, line) in read_lines(path)?.into_iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RiderProfile>(&line) {
            Ok(mut profile) => {
                profile.tags = derive_tags(&profile.signals);
                riders.push(profile);
            }
            Err(err) => {
                warn!(line = lineno + 1, %err, "skipping malformed rider record");
            }
        }
    }

    info!(path = %path.display(), count = riders.len(), "loaded rider profiles");
    Ok(riders)
}

/// Load business profiles from a JSON-lines file.
///
/// The affinity tag is classified from the category string and attached
/// here, once; it is never recomputed afterwards.
pub fn load_businesses<P: AsRef<Path>>(path: P) -> Result<Vec<BusinessProfile>, BootstrapError> {
    let path = path.as_ref();
    let mut businesses = Vec::new();

    for (lineno, line) in read_lines(path)?.into_iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<BusinessProfile>(&line) {
            Ok(mut profile) => {
                profile.tag = classify(&profile.categories);
                businesses.push(profile);
            }
            Err(err) => {
                warn!(line = lineno + 1, %err, "skipping malformed business record");
            }
        }
    }

    info!(path = %path.display(), count = businesses.len(), "loaded business profiles");
    Ok(businesses)
}

fn read_lines(path: &Path) -> Result<Vec<String>, BootstrapError> {
    let file = File::open(path).map_err(|source| BootstrapError::Io {
        path: path.display().to_string(),
        source,
    })?;

    BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| BootstrapError::Io {
            path: path.display().to_string(),
            source,
        })
}
