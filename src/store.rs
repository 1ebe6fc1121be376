//! Profile persistence
//!
//! Profiles are stored as pretty-printed JSON, one file per analyzed stream,
//! named after the stream, the block size in bits and the false-positive rate.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::frequency::FrequencyProfile;

/// File name of the profile of stream `stem`
///
/// ```
/// use blockfreq::store::profile_file_name;
///
/// assert_eq!(profile_file_name("disk", 64, 0.01), "disk_64_0.01.json");
/// ```
pub fn profile_file_name(stem: &str, blocksize_bits: u32, fpr: f64) -> String {
    format!("{}_{}_{}.json", stem, blocksize_bits, fpr)
}

/// Write any serializable value as pretty JSON to `path`
fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| Error::json(path, e))?;
    writer.write_all(b"\n").map_err(|e| Error::io(path, e))?;
    writer.flush().map_err(|e| Error::io(path, e))
}

/// Save `profile` to `path`
pub fn save_profile(profile: &FrequencyProfile, path: &Path) -> Result<()> {
    write_json(profile, path)
}

/// Save `profile` under `dir` with its conventional file name
///
/// `dir` is created if it does not exist. Returns the written path.
pub fn write_profile(profile: &FrequencyProfile, dir: &Path, stem: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let path = dir.join(profile_file_name(
        stem,
        profile.blocksize_bits(),
        profile.fpr(),
    ));
    save_profile(profile, &path)?;

    tracing::info!(path = %path.display(), "profile written");
    Ok(path)
}

/// Load and validate a profile
pub fn load_profile(path: &Path) -> Result<FrequencyProfile> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let profile: FrequencyProfile =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::json(path, e))?;

    profile.validate()?;

    tracing::debug!(
        path = %path.display(),
        num_blocks = profile.num_blocks(),
        repeated_blocks = profile.repeated_blocks(),
        "profile loaded"
    );
    Ok(profile)
}

/// Save a comparison report, creating its parent directory
pub fn save_report<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    write_json(report, path)
}
