//! Fixed-shape signal batches.
//!
//! Every record is reloaded from disk, padded or truncated at the end of the
//! time axis to `signal_len`, and stacked as samples × time × channels.
use std::path::{Path, PathBuf};

use ndarray::{s, Array1, Array2, Array3, Axis};

use crate::config::PrepConfig;
use crate::error::{PrepError, Result};
use crate::load::SIGNAL_VARIABLE;
use crate::mat::read_mat_variable;

/// Signals plus one `[age, sex]` row per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoBatch {
    pub signals: Array3<f64>,
    pub demographics: Array2<f64>,
}

/// Post-pad with zeros or post-truncate every channel to `maxlen` samples.
pub fn pad_sequences(data: &Array2<f64>, maxlen: usize) -> Array2<f64> {
    let keep = data.ncols().min(maxlen);
    let mut out = Array2::zeros((data.nrows(), maxlen));
    out.slice_mut(s![.., ..keep]).assign(&data.slice(s![.., ..keep]));
    out
}

fn load_padded(path: &Path, cfg: &PrepConfig) -> Result<Array2<f64>> {
    let data = read_mat_variable(path, SIGNAL_VARIABLE)?;
    if data.nrows() != cfg.n_channels {
        return Err(PrepError::ChannelMismatch {
            path: path.to_path_buf(),
            expected: cfg.n_channels,
            found: data.nrows(),
        });
    }
    Ok(pad_sequences(&data, cfg.signal_len))
}

/// Load, pad and stack the given files as samples × time × channels.
///
/// The layout is a true transpose of each `[channels, time]` matrix, not a
/// reshape of its memory: `batch[[i, t, c]]` is lead `c` at sample `t`.
pub fn get_val_data(filenames: &[PathBuf], cfg: &PrepConfig) -> Result<Array3<f64>> {
    let mut batch = Array3::zeros((filenames.len(), cfg.signal_len, cfg.n_channels));
    for (k, path) in filenames.iter().enumerate() {
        let padded = load_padded(path, cfg)?;
        batch.index_axis_mut(Axis(0), k).assign(&padded.t());
    }
    log::debug!("materialized batch of shape {:?}", batch.dim());
    Ok(batch)
}

fn check_order(order: &[usize], len: usize) -> Result<()> {
    match order.iter().find(|&&i| i >= len) {
        Some(&index) => Err(PrepError::IndexOutOfRange { index, len }),
        None => Ok(()),
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(PrepError::LengthMismatch { what, expected, found });
    }
    Ok(())
}

/// Signals and label rows for the records picked by `order`.
pub fn generate_validation_data(
    filenames: &[PathBuf],
    y: &Array2<u8>,
    order: &[usize],
    cfg: &PrepConfig,
) -> Result<(Array3<f64>, Array2<u8>)> {
    check_len("label rows", filenames.len(), y.nrows())?;
    check_order(order, filenames.len())?;

    let picked: Vec<PathBuf> = order.iter().map(|&i| filenames[i].clone()).collect();
    let signals = get_val_data(&picked, cfg)?;
    Ok((signals, y.select(Axis(0), order)))
}

/// Like [`generate_validation_data`], with a side matrix of `[age, sex]`.
pub fn generate_validation_data_with_demo_data(
    filenames: &[PathBuf],
    y: &Array2<u8>,
    sex: &Array1<u8>,
    age: &Array1<i32>,
    order: &[usize],
    cfg: &PrepConfig,
) -> Result<(DemoBatch, Array2<u8>)> {
    check_len("sex values", filenames.len(), sex.len())?;
    check_len("age values", filenames.len(), age.len())?;
    let (signals, y_val) = generate_validation_data(filenames, y, order, cfg)?;

    let mut demographics = Array2::zeros((order.len(), 2));
    for (row, &i) in order.iter().enumerate() {
        demographics[[row, 0]] = age[i] as f64;
        demographics[[row, 1]] = sex[i] as f64;
    }

    Ok((DemoBatch { signals, demographics }, y_val))
}
