//! End-to-end profiling and comparison of files
//!
//! These functions glue the block reader, the profiler and the store
//! together. They are what the `blockfreq` binary calls.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::block::{block_count, BlockReader};
use crate::config::{CompareConfig, ProfileConfig, PROGRESS_INTERVAL};
use crate::error::{Error, Result};
use crate::frequency::{FrequencyProfile, Profiler, ProgressObserver};
use crate::statistics::{compare_profiles, Comparison};
use crate::store;

/// Profile a byte stream of `total_blocks` blocks
///
/// `total_blocks` sizes the membership filter; the stream may end earlier or
/// later, in which case the actual count is what the profile records. Progress
/// is reported every [`PROGRESS_INTERVAL`] blocks and once at the end.
///
/// # Errors
///
/// [`Error::EmptyInput`] if `total_blocks` is zero or the stream yields no
/// block, [`Error::Stream`] on a read failure.
///
/// # Example
///
/// ```
/// use blockfreq::block::BlockId;
/// use blockfreq::config::ProfileConfig;
/// use blockfreq::frequency::NoProgress;
/// use blockfreq::pipeline::profile_reader;
///
/// let config = ProfileConfig::new(64, 0.01).unwrap();
/// let data = [0u8; 16];
///
/// let profile = profile_reader(&data[..], 2, config, &mut NoProgress).unwrap();
/// assert_eq!(profile.num_blocks(), 2);
/// assert_eq!(profile.count(&BlockId::zero()), Some(2));
/// ```
pub fn profile_reader<R, P>(
    reader: R,
    total_blocks: u64,
    config: ProfileConfig,
    progress: &mut P,
) -> Result<FrequencyProfile>
where
    R: Read,
    P: ProgressObserver + ?Sized,
{
    if total_blocks == 0 {
        return Err(Error::EmptyInput);
    }

    let capacity = usize::try_from(total_blocks).unwrap_or(usize::MAX);
    let mut profiler = Profiler::new(capacity, config)?;

    for block in BlockReader::new(reader, config.block_bytes()) {
        profiler.observe(&block?);

        let processed = profiler.num_blocks();
        if processed % PROGRESS_INTERVAL == 0 {
            progress.on_progress(processed, total_blocks);
        }
    }

    let processed = profiler.num_blocks();
    if processed == 0 {
        return Err(Error::EmptyInput);
    }
    // The loop already reported a count that lands on the interval
    if processed % PROGRESS_INTERVAL != 0 {
        progress.on_progress(processed, total_blocks);
    }

    Ok(profiler.finish())
}

/// Profile the file at `path`, sizing the filter from its length
pub fn profile_file<P>(
    path: &Path,
    config: ProfileConfig,
    progress: &mut P,
) -> Result<FrequencyProfile>
where
    P: ProgressObserver + ?Sized,
{
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let len = file.metadata().map_err(|e| Error::io(path, e))?.len();
    let total_blocks = block_count(len, config.block_bytes());

    tracing::info!(
        path = %path.display(),
        bytes = len,
        blocks = total_blocks,
        blocksize_bits = config.blocksize_bits(),
        fpr = config.fpr(),
        "profiling file"
    );

    let profile = profile_reader(BufReader::new(file), total_blocks, config, progress)
        .map_err(|e| match e {
            Error::Stream(source) => Error::io(path, source),
            other => other,
        })?;

    tracing::info!(
        path = %path.display(),
        num_blocks = profile.num_blocks(),
        repeated_blocks = profile.repeated_blocks(),
        "file profiled"
    );
    Ok(profile)
}

/// Profile `path` and store the profile under `out_dir`
///
/// The profile is named after the file stem. Returns the written path.
pub fn profile_to_dir<P>(
    path: &Path,
    config: ProfileConfig,
    out_dir: &Path,
    progress: &mut P,
) -> Result<PathBuf>
where
    P: ProgressObserver + ?Sized,
{
    let profile = profile_file(path, config, progress)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stream".to_string());

    store::write_profile(&profile, out_dir, &stem)
}

/// Expand `paths` into the list of files to profile
///
/// Directories contribute their regular files, sorted by path; subdirectories
/// are not descended into. Other paths are kept in the given order.
pub fn discover_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;

        if !meta.is_dir() {
            inputs.push(path.to_path_buf());
            continue;
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| Error::io(path, e))? {
            let entry = entry.map_err(|e| Error::io(path, e))?;
            let entry_path = entry.path();
            let is_file = fs::metadata(&entry_path)
                .map_err(|e| Error::io(&entry_path, e))?
                .is_file();
            if is_file {
                files.push(entry_path);
            }
        }
        files.sort();

        tracing::debug!(dir = %path.display(), files = files.len(), "expanded directory");
        inputs.extend(files);
    }

    Ok(inputs)
}

/// Load two stored profiles and compare them
pub fn compare_files(
    expected_path: &Path,
    observed_path: &Path,
    config: &CompareConfig,
) -> Result<Comparison> {
    let expected = store::load_profile(expected_path)?;
    let observed = store::load_profile(observed_path)?;

    tracing::info!(
        expected = %expected_path.display(),
        observed = %observed_path.display(),
        min_freq = config.min_freq,
        "comparing profiles"
    );
    compare_profiles(&expected, &observed, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockId;
    use crate::frequency::NoProgress;
    use std::io;

    fn config() -> ProfileConfig {
        ProfileConfig::new(64, 0.001).unwrap()
    }

    #[test]
    fn test_profile_reader_counts_repeats() {
        let mut data = Vec::new();
        for id in [1u64, 2, 1, 3, 1, 2] {
            data.extend_from_slice(&id.to_be_bytes());
        }

        let profile = profile_reader(&data[..], 6, config(), &mut NoProgress).unwrap();
        assert_eq!(profile.num_blocks(), 6);
        assert_eq!(profile.count(&BlockId::from(1u64)), Some(3));
        assert_eq!(profile.count(&BlockId::from(2u64)), Some(2));
        assert_eq!(profile.count(&BlockId::from(3u64)), None);
    }

    #[test]
    fn test_trailing_partial_block() {
        // A full block and a 3-byte tail, both the zero id
        let data = [0u8; 11];
        let profile = profile_reader(&data[..], 2, config(), &mut NoProgress).unwrap();

        assert_eq!(profile.num_blocks(), 2);
        assert_eq!(profile.count(&BlockId::zero()), Some(2));
    }

    #[test]
    fn test_empty_stream() {
        let err = profile_reader(io::empty(), 0, config(), &mut NoProgress).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));

        let err = profile_reader(io::empty(), 5, config(), &mut NoProgress).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn test_progress_reports_final_count() {
        let data = vec![0xabu8; 8 * 10];
        let mut reports = Vec::new();
        let mut observer = |processed: u64, total: u64| reports.push((processed, total));

        profile_reader(&data[..], 10, config(), &mut observer).unwrap();
        assert_eq!(reports, [(10, 10)]);
    }

    #[test]
    fn test_progress_interval() {
        let blocks = PROGRESS_INTERVAL * 2 + 1;
        let data = vec![0u8; blocks as usize];
        let config = ProfileConfig::new(8, 0.01).unwrap();
        let mut reports = Vec::new();
        let mut observer = |processed: u64, _total: u64| reports.push(processed);

        profile_reader(&data[..], blocks, config, &mut observer).unwrap();
        assert_eq!(
            reports,
            [PROGRESS_INTERVAL, PROGRESS_INTERVAL * 2, blocks]
        );
    }

    #[test]
    fn test_final_report_not_repeated_on_interval() {
        let blocks = PROGRESS_INTERVAL;
        let data = vec![0u8; blocks as usize];
        let config = ProfileConfig::new(8, 0.01).unwrap();
        let mut reports = Vec::new();
        let mut observer = |processed: u64, total: u64| reports.push((processed, total));

        profile_reader(&data[..], blocks, config, &mut observer).unwrap();
        assert_eq!(reports, [(blocks, blocks)]);
    }

    #[test]
    fn test_read_error_surfaces() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "device gone"))
            }
        }

        let err = profile_reader(Broken, 4, config(), &mut NoProgress).unwrap_err();
        assert!(matches!(err, Error::Stream(_)));
    }

    #[test]
    fn test_profile_file_and_store() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sample.bin");
        fs::write(&input, [7u8; 64]).unwrap();

        let out_dir = dir.path().join("json");
        let written = profile_to_dir(&input, config(), &out_dir, &mut NoProgress).unwrap();
        assert_eq!(written, out_dir.join("sample_64_0.001.json"));

        let profile = store::load_profile(&written).unwrap();
        assert_eq!(profile.num_blocks(), 8);
        assert_eq!(profile.recorded_occurrences(), 8);
    }

    #[test]
    fn test_profile_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = profile_file(&dir.path().join("absent"), config(), &mut NoProgress).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_discover_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let batch = dir.path().join("batch");
        fs::create_dir(&batch).unwrap();
        fs::create_dir(batch.join("nested")).unwrap();
        fs::write(batch.join("b.bin"), b"b").unwrap();
        fs::write(batch.join("a.bin"), b"a").unwrap();
        fs::write(batch.join("nested").join("c.bin"), b"c").unwrap();
        let single = dir.path().join("single.bin");
        fs::write(&single, b"s").unwrap();

        let inputs = discover_inputs(&[single.clone(), batch.clone()]).unwrap();
        assert_eq!(inputs, [single, batch.join("a.bin"), batch.join("b.bin")]);
    }

    #[test]
    fn test_discover_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_inputs(&[dir.path().join("missing")]).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_compare_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = Vec::new();
        for i in 0..200u64 {
            data.extend_from_slice(&(i % 150).to_be_bytes());
        }
        let input = dir.path().join("stream.bin");
        fs::write(&input, &data).unwrap();

        let path = profile_to_dir(&input, config(), dir.path(), &mut NoProgress).unwrap();
        let comparison = compare_files(&path, &path, &CompareConfig::default()).unwrap();

        assert_eq!(comparison.test.statistic, 0.0);
        assert_eq!(comparison.test.p_value, 1.0);
    }
}
