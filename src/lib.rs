//! Data preparation for ECG diagnosis on the PhysioNet/CinC Challenge data.
//!
//! The steps run in a fixed order:
//!
//! 1. [`import_key_data`] walks a directory and collects raw sex, age and
//!    diagnosis strings from the WFDB headers.
//! 2. [`import_sex_and_age`] cleans the demographics.
//! 3. [`make_undefined_class`] and [`onehot_encode`] turn diagnoses into a
//!    multi-hot matrix.
//! 4. [`get_labels_for_all_combinations`] and [`split_data`] build stratified
//!    folds.
//! 5. [`generate_validation_data`] reloads the signals of one fold side.
//!
//! ```no_run
//! use ecg_prep::*;
//! use std::path::Path;
//!
//! # fn main() -> ecg_prep::Result<()> {
//! let cfg = PrepConfig::default();
//! let key = import_key_data(Path::new("training"), &cfg)?;
//! let (age, sex) = import_sex_and_age(&key.age, &key.sex)?;
//! let (y, classes) = onehot_encode(&key.labels)?;
//! let folds = split_data(key.len(), &get_labels_for_all_combinations(&y), &cfg)?;
//! let (x_val, y_val) = generate_validation_data(&key.filenames, &y, &folds[0].validation, &cfg)?;
//! # Ok(())
//! # }
//! ```
pub mod batch;
pub mod config;
pub mod demographics;
pub mod error;
pub mod folds;
pub mod header;
pub mod labels;
pub mod load;
pub mod mat;
pub mod synth;

pub use batch::{
    generate_validation_data, generate_validation_data_with_demo_data, get_val_data, pad_sequences,
    DemoBatch,
};
pub use config::PrepConfig;
pub use demographics::{clean_up_age_data, clean_up_sex_data, import_sex_and_age, Sex};
pub use error::{HeaderErrorKind, MatErrorKind, PrepError, Result};
pub use folds::{fold_distributions, split_data, Fold, FoldDistribution};
pub use header::Header;
pub use labels::{
    calculating_class_weights, class_counts, class_display_names, decode_onehot,
    get_labels_for_all_combinations, make_undefined_class, onehot_encode, read_dx_mapping,
    DxMapping, UNDEFINED_CLASS,
};
pub use load::{
    find_signal_files, import_key_data, load_challenge_data, signal_lengths, KeyData,
    SignalLengthSummary,
};
