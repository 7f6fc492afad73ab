//! Synthetic Challenge records for tests and demos.
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{PrepError, Result};
use crate::header::Header;
use crate::mat::{write_mat_variable, MatPrecision};

pub const STANDARD_LEADS: [&str; 12] = [
    "I", "II", "III", "aVR", "aVL", "aVF", "V1", "V2", "V3", "V4", "V5", "V6",
];

/// Codes used by [`generate_fixture_set`]: sinus rhythm, 1st degree AV
/// block, sinus bradycardia.
pub const FIXTURE_CODES: [&str; 3] = ["164889003", "270492004", "426783006"];

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRecord {
    pub name: String,
    pub age: String,
    pub sex: String,
    pub dx: String,
    pub n_samples: usize,
    pub fs: f64,
}

/// Write `<name>.hea` and `<name>.mat` into `dir`. Returns the signal path.
pub fn write_record(dir: &Path, record: &SyntheticRecord, n_channels: usize, seed: u64) -> Result<PathBuf> {
    let leads = (0..n_channels)
        .map(|c| {
            STANDARD_LEADS
                .get(c)
                .map(|l| l.to_string())
                .unwrap_or_else(|| format!("X{c}"))
        })
        .collect();
    let header = Header {
        record_name: record.name.clone(),
        n_channels,
        sampling_frequency: record.fs,
        n_samples: record.n_samples,
        leads,
        age: record.age.clone(),
        sex: record.sex.clone(),
        dx: record.dx.clone(),
    };
    let header_path = dir.join(format!("{}.hea", record.name));
    std::fs::write(&header_path, header.render()).map_err(|e| PrepError::io(&header_path, e))?;

    let signal_path = dir.join(format!("{}.mat", record.name));
    let signal = synthetic_signal(n_channels, record.n_samples, record.fs, seed);
    write_mat_variable(&signal_path, "val", &signal, MatPrecision::I16)?;
    Ok(signal_path)
}

/// A 72 bpm sine per lead with a per-lead phase, plus uniform noise, in µV.
pub fn synthetic_signal(n_channels: usize, n_samples: usize, fs: f64, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((n_channels, n_samples), |(c, t)| {
        let phase = c as f64 * PI / 6.0;
        let beat = (2.0 * PI * 1.2 * t as f64 / fs + phase).sin();
        (800.0 * beat + rng.gen_range(-25.0..25.0)).round()
    })
}

/// Write `count` 12-lead records named `E00001`.. with ages spread over
/// 10..=90, alternating sex, and diagnoses drawn from [`FIXTURE_CODES`].
pub fn generate_fixture_set(dir: &Path, count: usize, seed: u64) -> Result<Vec<SyntheticRecord>> {
    let lengths = [4000, 5000, 7500];
    let span = count.saturating_sub(1).max(1);

    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        let mut dx = FIXTURE_CODES[i % 3].to_string();
        if i % 5 == 0 {
            dx.push(',');
            dx.push_str(FIXTURE_CODES[(i + 1) % 3]);
        }
        let record = SyntheticRecord {
            name: format!("E{:05}", i + 1),
            age: (10 + i * 80 / span).to_string(),
            sex: if i % 2 == 0 { "Male" } else { "Female" }.to_string(),
            dx,
            n_samples: lengths[i % lengths.len()],
            fs: 500.0,
        };
        write_record(dir, &record, STANDARD_LEADS.len(), seed.wrapping_add(i as u64))?;
        records.push(record);
    }
    log::info!("wrote {} synthetic records to {}", count, dir.display());
    Ok(records)
}
