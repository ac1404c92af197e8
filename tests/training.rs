mod common;

use std::{fs, num::NonZeroUsize};

use perceptron::{
    classifier, persist, training::TrainingSet, Bounds, Features, PerceptronErr, TrainConfig,
    Trainer,
};
use tempfile::TempDir;

use common::{black_and_white_set, left_right_set, write_solid, BLACK, WHITE};

fn trainer(label0: &str, label1: &str, epochs: usize) -> Trainer {
    let config = TrainConfig::new(label0, label1)
        .unwrap()
        .with_epochs(NonZeroUsize::new(epochs).unwrap());
    Trainer::new(config)
}

#[test]
fn black_and_white_converge() {
    let dir = black_and_white_set(3, 3);
    let report = trainer("dark", "light", 1000).train(dir.path()).unwrap();

    assert!(report.converged());
    assert!(report.cycles() <= 3);
    assert_eq!(report.error_rate(), 0.0);

    let model = report.model();
    assert_eq!(model.threshold(), 20.0);
    assert_eq!(model.bounds(), Bounds::from_dimensions(3, 3).unwrap());
    assert_eq!(
        classifier::classify_path(dir.path().join("dark.png"), model).unwrap(),
        "dark"
    );
    assert_eq!(
        classifier::classify_path(dir.path().join("light.png"), model).unwrap(),
        "light"
    );
}

#[test]
fn learns_where_the_light_is() {
    let dir = left_right_set();
    let report = trainer("right", "left", 1000).train(dir.path()).unwrap();

    assert!(report.converged(), "history: {:?}", report.history());

    // the left half ends up excitatory and the right half inhibitory
    let weights = report.model().weights_view().unwrap();
    assert!(weights[(0, 0)] > 0.0);
    assert!(weights[(3, 3)] < 0.0);

    let unseen = TempDir::new().unwrap();
    let path = common::write_png(unseen.path(), "unseen.png", 4, 4, |x, _| {
        if x < 2 { WHITE } else { BLACK }
    });
    assert_eq!(classifier::classify_path(path, report.model()).unwrap(), "left");
}

#[test]
fn rectangular_images_train_without_out_of_range_access() {
    let wide = black_and_white_set(5, 2);
    let report = trainer("dark", "light", 10).train(wide.path()).unwrap();
    assert_eq!(report.model().weights().len(), 10);
    assert!(report.converged());

    let tall = black_and_white_set(2, 5);
    let report = trainer("dark", "light", 10).train(tall.path()).unwrap();
    assert_eq!(report.model().weights().len(), 10);
    assert_ne!(
        report.model().weights().len(),
        report.model().bounds().legacy_len()
    );
}

#[test]
fn reruns_are_bit_identical() {
    let dir = left_right_set();

    let a = trainer("right", "left", 3).train(dir.path()).unwrap();
    let b = trainer("right", "left", 3).train(dir.path()).unwrap();

    let bits = |w: &[f64]| w.iter().map(|w| w.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(a.model().weights()), bits(b.model().weights()));
    assert_eq!(a.history(), b.history());
}

#[test]
fn samples_are_visited_in_path_order() {
    let dir = left_right_set();
    let set = TrainingSet::load(dir.path(), "right", "left").unwrap();

    let names: Vec<_> = set
        .samples()
        .iter()
        .map(|s| s.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(names.len(), 6);
}

#[test]
fn subdirectories_are_skipped() {
    let dir = black_and_white_set(2, 2);
    fs::create_dir(dir.path().join("nested_dark")).unwrap();

    let set = TrainingSet::load(dir.path(), "dark", "light").unwrap();
    assert_eq!(set.len(), 2);
}

#[test]
fn empty_directory_is_an_empty_training_set() {
    let dir = TempDir::new().unwrap();
    let err = trainer("a", "b", 1).train(dir.path()).unwrap_err();
    assert!(matches!(err, PerceptronErr::EmptyTrainingSet { .. }));
}

#[test]
fn missing_directory_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = trainer("a", "b", 1)
        .train(dir.path().join("nope"))
        .unwrap_err();
    assert!(matches!(err, PerceptronErr::NotFound { .. }));
}

#[test]
fn mixed_sizes_are_a_dimension_mismatch() {
    let dir = black_and_white_set(3, 3);
    write_solid(dir.path(), "light_big.png", 4, 3, WHITE);

    let err = trainer("dark", "light", 10).train(dir.path()).unwrap_err();
    let PerceptronErr::DimensionMismatch { expected, got } = err else {
        panic!("expected a dimension mismatch, got {err:?}");
    };
    assert_eq!(expected, Bounds::from_dimensions(3, 3).unwrap());
    assert_eq!(got, Bounds::from_dimensions(4, 3).unwrap());
}

#[test]
fn unlabeled_and_ambiguous_files_fail() {
    let dir = black_and_white_set(2, 2);
    write_solid(dir.path(), "bird.png", 2, 2, BLACK);
    let err = trainer("dark", "light", 10).train(dir.path()).unwrap_err();
    assert!(matches!(err, PerceptronErr::ClassLabelMissing { .. }));

    let dir = black_and_white_set(2, 2);
    write_solid(dir.path(), "dark_or_light.png", 2, 2, BLACK);
    let err = trainer("dark", "light", 10).train(dir.path()).unwrap_err();
    assert!(matches!(err, PerceptronErr::ClassLabelAmbiguous { .. }));
}

#[test]
fn non_images_fail_to_decode() {
    let dir = black_and_white_set(2, 2);
    fs::write(dir.path().join("dark_notes.txt"), "not a picture").unwrap();

    let err = trainer("dark", "light", 10).train(dir.path()).unwrap_err();
    assert!(matches!(err, PerceptronErr::DecodeFailure { .. }));
}

#[test]
fn classifying_another_size_is_a_dimension_mismatch() {
    let dir = black_and_white_set(3, 3);
    let report = trainer("dark", "light", 10).train(dir.path()).unwrap();

    let other = TempDir::new().unwrap();
    let path = write_solid(other.path(), "unseen.png", 3, 4, WHITE);

    let err = classifier::classify_path(&path, report.model()).unwrap_err();
    assert!(matches!(err, PerceptronErr::DimensionMismatch { .. }));

    let features = Features::open(&path).unwrap();
    assert!(classifier::response(&features, report.model()).is_err());
}

#[test]
fn persisted_models_classify_the_same() {
    let dir = left_right_set();
    let report = trainer("right", "left", 1000).train(dir.path()).unwrap();

    let out = TempDir::new().unwrap();
    let path = out.path().join("lr.model");
    persist::save(report.model(), &path).unwrap();
    let loaded = persist::load(&path).unwrap();

    assert_eq!(&loaded, report.model());

    let mut images: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    images.sort();

    let before = classifier::classify_many(&images, report.model()).unwrap();
    let after = classifier::classify_many(&images, &loaded).unwrap();
    assert_eq!(before, after);
    assert_eq!(before, vec!["left", "left", "left", "right", "right", "right"]);
}

#[test]
fn saving_replaces_existing_files() {
    let out = TempDir::new().unwrap();
    let path = out.path().join("m.model");
    fs::write(&path, vec![0xff; 4096]).unwrap();

    let report = trainer("dark", "light", 5)
        .train(black_and_white_set(2, 2).path())
        .unwrap();
    persist::save(report.model(), &path).unwrap();

    assert_eq!(&persist::load(&path).unwrap(), report.model());
}

#[test]
fn loading_missing_or_corrupt_models_fails() {
    let out = TempDir::new().unwrap();

    let err = persist::load(out.path().join("absent.model")).unwrap_err();
    assert!(matches!(err, PerceptronErr::NotFound { .. }));

    let junk = out.path().join("junk.model");
    fs::write(&junk, b"definitely not a model").unwrap();
    let err = persist::load(&junk).unwrap_err();
    assert!(matches!(err, PerceptronErr::CorruptModel(_)));
}
