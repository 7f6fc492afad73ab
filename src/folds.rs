use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Axis};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::config::PrepConfig;
use crate::error::{PrepError, Result};
use crate::labels::class_counts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Stratified k-fold split over `n_samples` with one surrogate label each.
///
/// Indices are shuffled with a seeded rng, grouped by label, and dealt to the
/// folds round-robin, strata taken in ascending label order. One counter runs
/// across all strata, so fold sizes differ by at most one.
pub fn split_data(n_samples: usize, y_all_combo: &[usize], cfg: &PrepConfig) -> Result<Vec<Fold>> {
    let k = cfg.n_folds;
    if y_all_combo.len() != n_samples {
        return Err(PrepError::LengthMismatch {
            what: "surrogate labels",
            expected: n_samples,
            found: y_all_combo.len(),
        });
    }
    if k < 2 || k > n_samples {
        return Err(PrepError::InvalidFoldCount { n_folds: k, n_samples });
    }

    let mut order: Vec<usize> = (0..n_samples).collect();
    order.shuffle(&mut StdRng::seed_from_u64(cfg.seed));

    let mut strata: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in order {
        strata.entry(y_all_combo[i]).or_default().push(i);
    }
    if let Some(smallest) = strata.values().map(Vec::len).min() {
        if smallest < k {
            log::warn!(
                "the least populated label combination has {} members, fewer than {} folds",
                smallest,
                k
            );
        }
    }

    let mut assignment = vec![0usize; n_samples];
    let mut next = 0;
    for members in strata.values() {
        for &i in members {
            assignment[i] = next % k;
            next += 1;
        }
    }

    let folds: Vec<Fold> = (0..k)
        .map(|f| {
            let (validation, train): (Vec<usize>, Vec<usize>) =
                (0..n_samples).partition(|&i| assignment[i] == f);
            Fold { train, validation }
        })
        .collect();

    log::info!("Training split: {}", folds[0].train.len());
    log::info!("Validation split: {}", folds[0].validation.len());
    Ok(folds)
}

/// Class counts on either side of one fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldDistribution {
    pub train: Array1<usize>,
    pub validation: Array1<usize>,
}

pub fn fold_distributions(folds: &[Fold], y: &Array2<u8>) -> Result<Vec<FoldDistribution>> {
    let n = y.nrows();
    folds
        .iter()
        .map(|fold| {
            if let Some(&index) = fold.train.iter().chain(&fold.validation).find(|&&i| i >= n) {
                return Err(PrepError::IndexOutOfRange { index, len: n });
            }
            Ok(FoldDistribution {
                train: class_counts(&y.select(Axis(0), &fold.train)),
                validation: class_counts(&y.select(Axis(0), &fold.validation)),
            })
        })
        .collect()
}
