use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

use ndarray::{s, Array1, Array2, Axis};
use serde::Deserialize;

use crate::error::{PrepError, Result};

/// Catch-all class that unscored codes are folded into. It sorts after every
/// numeric SNOMED code, so [`onehot_encode`] drops it.
pub const UNDEFINED_CLASS: &str = "undefined class";

/// One row of a Challenge `dx_mapping_*.csv` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DxMapping {
    #[serde(rename = "Dx")]
    pub name: String,
    #[serde(rename = "SNOMED CT Code")]
    pub code: String,
    #[serde(rename = "Abbreviation", default)]
    pub abbreviation: String,
}

/// Read a mapping table. Columns other than `Dx`, `SNOMED CT Code` and
/// `Abbreviation` are ignored.
pub fn read_dx_mapping(path: &Path) -> Result<Vec<DxMapping>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<DxMapping>, _>>()?;
    log::info!("{}: {} diagnosis codes", path.display(), rows.len());
    Ok(rows)
}

fn split_codes(label: &str) -> impl Iterator<Item = &str> {
    label.split(',').filter(|code| !code.is_empty())
}

/// Replace every code listed in `unscored` by [`UNDEFINED_CLASS`].
///
/// Matching is per comma separated code, so a code never matches inside a
/// longer one. Order and remaining codes are untouched.
pub fn make_undefined_class<S: AsRef<str>>(labels: &[S], unscored: &[DxMapping]) -> Vec<String> {
    let unscored: HashSet<&str> = unscored.iter().map(|m| m.code.as_str()).collect();
    labels
        .iter()
        .map(|label| {
            label
                .as_ref()
                .split(',')
                .map(|code| if unscored.contains(code) { UNDEFINED_CLASS } else { code })
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect()
}

/// Multi-hot encode comma separated label strings.
///
/// Columns follow the sorted vocabulary of every code seen. The last column
/// is always dropped, and the returned classes are aligned with the
/// remaining columns.
pub fn onehot_encode<S: AsRef<str>>(labels: &[S]) -> Result<(Array2<u8>, Vec<String>)> {
    let vocabulary: BTreeSet<&str> = labels.iter().flat_map(|l| split_codes(l.as_ref())).collect();
    if vocabulary.is_empty() {
        return Err(PrepError::EmptyInput("diagnosis codes"));
    }
    let column: HashMap<&str, usize> = vocabulary.iter().enumerate().map(|(i, &c)| (c, i)).collect();

    let mut y = Array2::<u8>::zeros((labels.len(), vocabulary.len()));
    for (row, label) in labels.iter().enumerate() {
        for code in split_codes(label.as_ref()) {
            y[[row, column[code]]] = 1;
        }
    }
    log::info!("The classes we will look at are encoded as SNOMED CT codes: {:?}", vocabulary);

    let kept = vocabulary.len() - 1;
    let y = y.slice(s![.., ..kept]).to_owned();
    let classes = vocabulary.into_iter().take(kept).map(str::to_string).collect();
    log::info!("classes: {}", kept);
    Ok((y, classes))
}

/// Codes set in each row of `y`.
pub fn decode_onehot(y: &Array2<u8>, classes: &[String]) -> Vec<Vec<String>> {
    y.rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .zip(classes)
                .filter(|(&v, _)| v != 0)
                .map(|(_, c)| c.clone())
                .collect()
        })
        .collect()
}

/// One integer per distinct label combination, assigned in sorted order of
/// the combination's digit string.
pub fn get_labels_for_all_combinations(y: &Array2<u8>) -> Vec<usize> {
    let keys: Vec<String> = y
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();
    let encoding: BTreeMap<&str, usize> = keys
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(i, k)| (k, i))
        .collect();
    keys.iter().map(|k| encoding[k.as_str()]).collect()
}

/// Balanced weights per class column: row `c` is `[w(0), w(1)]` with
/// `w(v) = n / (2 * count(v))`.
pub fn calculating_class_weights(y: &Array2<u8>) -> Result<Array2<f64>> {
    let n = y.nrows();
    let mut weights = Array2::<f64>::zeros((y.ncols(), 2));
    for (c, column) in y.axis_iter(Axis(1)).enumerate() {
        let positives = column.iter().filter(|&&v| v != 0).count();
        for (value, count) in [(0u8, n - positives), (1u8, positives)] {
            if count == 0 {
                return Err(PrepError::MissingClassValue { column: c, value });
            }
            weights[[c, value as usize]] = n as f64 / (2.0 * count as f64);
        }
    }
    Ok(weights)
}

/// Diagnosis names for display, falling back to the code itself.
pub fn class_display_names(classes: &[String], scored: &[DxMapping]) -> Vec<String> {
    classes
        .iter()
        .map(|code| {
            scored
                .iter()
                .find(|m| &m.code == code)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| code.clone())
        })
        .collect()
}

/// Number of records flagged per class.
pub fn class_counts(y: &Array2<u8>) -> Array1<usize> {
    y.map(|&v| v as usize).sum_axis(Axis(0))
}
