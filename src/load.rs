use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use statrs::statistics::{Data, Distribution, Max, Median, Min};

use crate::config::PrepConfig;
use crate::error::{PrepError, Result};
use crate::header::Header;
use crate::mat::read_mat_variable;

/// Name of the signal matrix inside Challenge `.mat` files.
pub const SIGNAL_VARIABLE: &str = "val";

/// Raw metadata of every record under a directory, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyData {
    pub sex: Vec<String>,
    pub age: Vec<String>,
    pub labels: Vec<String>,
    pub filenames: Vec<PathBuf>,
}

impl KeyData {
    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

/// Path of the header paired with a signal file.
pub fn header_path(signal_path: &Path, cfg: &PrepConfig) -> PathBuf {
    signal_path.with_extension(&cfg.header_extension)
}

fn read_paired_header(signal_path: &Path, cfg: &PrepConfig) -> Result<Header> {
    let path = header_path(signal_path, cfg);
    if !path.is_file() {
        return Err(PrepError::MissingHeader(signal_path.to_path_buf()));
    }
    Header::read(&path)
}

/// Load the signal matrix (channels × samples) and the parsed header.
pub fn load_challenge_data(path: &Path, cfg: &PrepConfig) -> Result<(Array2<f64>, Header)> {
    let data = read_mat_variable(path, SIGNAL_VARIABLE)?;
    let header = read_paired_header(path, cfg)?;
    Ok((data, header))
}

/// All signal files below `root`.
///
/// Directories are ordered by their full path string, so `ptb-xl/` comes
/// before `ptb/` (`'-' < '/'`). Files inside one directory are sorted.
pub fn find_signal_files(root: &Path, cfg: &PrepConfig) -> Result<Vec<PathBuf>> {
    let mut dirs = vec![root.to_path_buf()];
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let subdirs: Vec<PathBuf> = list_dir(&dir)?.into_iter().filter(|p| p.is_dir()).collect();
        dirs.extend(subdirs.iter().cloned());
        pending.extend(subdirs);
    }
    // byte order of the whole path, not Path's per-component order
    dirs.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    let mut found = Vec::new();
    for dir in dirs {
        let mut files: Vec<PathBuf> = list_dir(&dir)?
            .into_iter()
            .filter(|p| p.is_file())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(cfg.signal_extension.as_str()))
            .collect();
        files.sort();
        found.extend(files);
    }
    Ok(found)
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::read_dir(dir)
        .map_err(|e| PrepError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()
        .map_err(|e| PrepError::io(dir, e))
}

/// Collect raw sex, age and diagnosis strings for every record under `root`.
///
/// Only headers are read. A signal file without a header, or a malformed
/// header, aborts the whole import.
pub fn import_key_data(root: &Path, cfg: &PrepConfig) -> Result<KeyData> {
    let mut key = KeyData::default();
    for path in find_signal_files(root, cfg)? {
        let header = read_paired_header(&path, cfg)?;
        log::debug!("{}: age {} sex {} dx {}", path.display(), header.age, header.sex, header.dx);
        key.labels.push(header.dx);
        key.sex.push(header.sex);
        key.age.push(header.age);
        key.filenames.push(path);
    }
    log::info!("imported {} records from {}", key.len(), root.display());
    Ok(key)
}

/// Sample count of every record, from the header record line.
pub fn signal_lengths(root: &Path, cfg: &PrepConfig) -> Result<Vec<usize>> {
    find_signal_files(root, cfg)?
        .iter()
        .map(|path| read_paired_header(path, cfg).map(|h| h.n_samples))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalLengthSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// `(length, records)`, most frequent first, at most ten entries.
    pub most_common: Vec<(usize, usize)>,
}

impl SignalLengthSummary {
    pub fn from_lengths(lengths: &[usize]) -> Result<Self> {
        if lengths.is_empty() {
            return Err(PrepError::EmptyInput("signal lengths"));
        }

        let data = Data::new(lengths.iter().map(|&l| l as f64).collect::<Vec<_>>());
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for &l in lengths {
            *counts.entry(l).or_insert(0) += 1;
        }
        let mut most_common: Vec<(usize, usize)> = counts.into_iter().collect();
        // ties go to the shorter length
        most_common.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        most_common.truncate(10);

        Ok(Self {
            count: lengths.len(),
            min: data.min(),
            max: data.max(),
            mean: data.mean().unwrap_or(f64::NAN),
            median: data.median(),
            most_common,
        })
    }
}
