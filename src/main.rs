use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use ecg_prep::{
    calculating_class_weights, class_display_names, fold_distributions,
    generate_validation_data, generate_validation_data_with_demo_data,
    get_labels_for_all_combinations, import_key_data, import_sex_and_age, make_undefined_class,
    onehot_encode, read_dx_mapping, signal_lengths, split_data, PrepConfig, SignalLengthSummary,
};

/// Prepare Challenge ECG records: labels, folds and one validation batch.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory holding `.mat`/`.hea` pairs, searched recursively.
    #[arg(long)]
    data_dir: PathBuf,

    /// `dx_mapping_unscored.csv`; its codes become the undefined class.
    #[arg(long)]
    unscored: Option<PathBuf>,

    /// `dx_mapping_scored.csv`, used for readable class names.
    #[arg(long)]
    scored: Option<PathBuf>,

    #[arg(long, default_value_t = 10)]
    folds: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fold whose validation side gets materialized.
    #[arg(long, default_value_t = 0)]
    fold: usize,

    /// Also build the `[age, sex]` side matrix.
    #[arg(long)]
    with_demographics: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = PrepConfig {
        n_folds: args.folds,
        seed: args.seed,
        ..PrepConfig::default()
    };

    let lengths = signal_lengths(&args.data_dir, &cfg).context("reading signal lengths")?;
    let summary = SignalLengthSummary::from_lengths(&lengths)?;
    log::info!(
        "signal lengths: min {} max {} median {} mean {:.1}",
        summary.min,
        summary.max,
        summary.median,
        summary.mean
    );
    log::info!("most common lengths: {:?}", summary.most_common);

    let key = import_key_data(&args.data_dir, &cfg)
        .with_context(|| format!("importing {}", args.data_dir.display()))?;
    let (age, sex) = import_sex_and_age(&key.age, &key.sex)?;

    let labels = match &args.unscored {
        Some(path) => {
            let unscored = read_dx_mapping(path).with_context(|| format!("reading {}", path.display()))?;
            make_undefined_class(&key.labels, &unscored)
        }
        None => key.labels.clone(),
    };
    let (y, classes) = onehot_encode(&labels)?;

    let names = match &args.scored {
        Some(path) => {
            let scored = read_dx_mapping(path).with_context(|| format!("reading {}", path.display()))?;
            class_display_names(&classes, &scored)
        }
        None => classes.clone(),
    };
    match calculating_class_weights(&y) {
        Ok(weights) => {
            for (name, w) in names.iter().zip(weights.rows()) {
                log::info!("{name}: weight(0) {:.3} weight(1) {:.3}", w[0], w[1]);
            }
        }
        Err(e) => log::warn!("class weights unavailable: {e}"),
    }

    let y_all_combo = get_labels_for_all_combinations(&y);
    let folds = split_data(key.len(), &y_all_combo, &cfg)?;
    for (i, dist) in fold_distributions(&folds, &y)?.iter().enumerate() {
        log::info!(
            "fold {}: train {:?} validation {:?}",
            i + 1,
            dist.train.to_vec(),
            dist.validation.to_vec()
        );
    }

    let Some(fold) = folds.get(args.fold) else {
        bail!("fold {} does not exist, there are {}", args.fold, folds.len());
    };
    if args.with_demographics {
        let (batch, y_val) = generate_validation_data_with_demo_data(
            &key.filenames,
            &y,
            &sex,
            &age,
            &fold.validation,
            &cfg,
        )?;
        println!(
            "X_val {:?}, demographics {:?}, y_val {:?}",
            batch.signals.dim(),
            batch.demographics.dim(),
            y_val.dim()
        );
    } else {
        let (x_val, y_val) = generate_validation_data(&key.filenames, &y, &fold.validation, &cfg)?;
        println!("X_val {:?}, y_val {:?}", x_val.dim(), y_val.dim());
    }

    Ok(())
}
