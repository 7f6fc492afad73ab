use ecg_prep::synth::{generate_fixture_set, FIXTURE_CODES};
use ecg_prep::*;

#[test]
fn test_twenty_records_through_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = PrepConfig::default();
    generate_fixture_set(dir.path(), 20, 42).unwrap();

    let key = import_key_data(dir.path(), &cfg).unwrap();
    assert_eq!(key.len(), 20);
    assert_eq!(key.sex.len(), 20);
    assert_eq!(key.age.len(), 20);
    assert_eq!(key.labels.len(), 20);

    let (age, sex) = import_sex_and_age(&key.age, &key.sex).unwrap();
    assert!(age.iter().all(|&a| (10..=90).contains(&a)));
    assert!(sex.iter().all(|&s| s == 0 || s == 1));

    let (y, classes) = onehot_encode(&key.labels).unwrap();
    assert_eq!(y.dim(), (20, 2));
    let mut codes = FIXTURE_CODES.to_vec();
    codes.sort();
    assert_eq!(classes, codes[..2]);

    let folds = split_data(key.len(), &get_labels_for_all_combinations(&y), &cfg).unwrap();
    assert_eq!(folds.len(), 10);
    let mut validated: Vec<usize> = folds.iter().flat_map(|f| f.validation.iter().copied()).collect();
    validated.sort();
    assert_eq!(validated, (0..20).collect::<Vec<_>>());
    for fold in &folds {
        assert_eq!(fold.train.len() + fold.validation.len(), 20);
        assert!(fold.validation.iter().all(|i| !fold.train.contains(i)));
    }

    let (x_val, y_val) = generate_validation_data(&key.filenames, &y, &folds[0].validation, &cfg).unwrap();
    assert_eq!(x_val.dim(), (folds[0].validation.len(), 5000, 12));
    assert_eq!(y_val.nrows(), folds[0].validation.len());
}

#[test]
fn test_reruns_give_identical_folds() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = PrepConfig::default();
    generate_fixture_set(dir.path(), 20, 3).unwrap();

    let run = || {
        let key = import_key_data(dir.path(), &cfg).unwrap();
        let (y, _) = onehot_encode(&key.labels).unwrap();
        split_data(key.len(), &get_labels_for_all_combinations(&y), &cfg).unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_unscored_codes_fold_into_dropped_column() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = PrepConfig::default();
    generate_fixture_set(dir.path(), 20, 42).unwrap();
    let table = dir.path().join("dx_mapping_unscored.csv");
    std::fs::write(
        &table,
        format!("Dx,SNOMED CT Code,Abbreviation\nsinus rhythm,{},SNR\n", FIXTURE_CODES[0]),
    )
    .unwrap();

    let key = import_key_data(dir.path(), &cfg).unwrap();
    let unscored = read_dx_mapping(&table).unwrap();
    let labels = make_undefined_class(&key.labels, &unscored);
    let (y, classes) = onehot_encode(&labels).unwrap();

    assert_eq!(classes, [FIXTURE_CODES[1], FIXTURE_CODES[2]]);
    assert_eq!(y.ncols(), 2);
    assert!(!classes.iter().any(|c| c == UNDEFINED_CLASS));
}
