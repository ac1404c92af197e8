use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{
    bounds::Bounds,
    error::{PerceptronErr, Result},
    features::Features,
};

/// One of the two classes a perceptron tells apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// The perceptron doesn't fire.
    Zero,
    /// The perceptron fires.
    One,
}

impl Label {
    pub fn from_fires(fires: bool) -> Self {
        if fires {
            Self::One
        } else {
            Self::Zero
        }
    }

    /// Infers the label of a file from its name, which must contain exactly one of the two
    /// labels as a substring.
    ///
    /// # Errors
    /// `ClassLabelAmbiguous` if it contains both and `ClassLabelMissing` if it contains
    /// neither.
    pub fn infer(path: &Path, label0: &str, label1: &str) -> Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();

        match (name.contains(label0), name.contains(label1)) {
            (true, false) => Ok(Label::Zero),
            (false, true) => Ok(Label::One),
            (true, true) => Err(PerceptronErr::ClassLabelAmbiguous {
                path: path.to_path_buf(),
            }),
            (false, false) => Err(PerceptronErr::ClassLabelMissing {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A training image and the class its file name says it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    path: PathBuf,
    label: Label,
    features: Features,
}

impl Sample {
    pub fn new<P: Into<PathBuf>>(path: P, label: Label, features: Features) -> Self {
        Self {
            path: path.into(),
            label,
            features,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn features(&self) -> &Features {
        &self.features
    }
}

/// Every sample of a training run, in a fixed order and sharing the same bounds.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    bounds: Bounds,
    samples: Vec<Sample>,
}

impl TrainingSet {
    /// Creates a `TrainingSet`, the bounds of the first sample are the bounds of all.
    ///
    /// # Errors
    /// `EmptyTrainingSet` if there are no samples and `DimensionMismatch` if any sample's
    /// bounds differ from the first one's.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        let Some(first) = samples.first() else {
            return Err(PerceptronErr::EmptyTrainingSet { dir: PathBuf::new() });
        };

        let bounds = first.features.bounds();
        for sample in &samples[1..] {
            let got = sample.features.bounds();
            if got != bounds {
                return Err(PerceptronErr::DimensionMismatch {
                    expected: bounds,
                    got,
                });
            }
        }

        Ok(Self { bounds, samples })
    }

    /// Reads every file in `dir` as a training sample.
    ///
    /// Files are visited in lexicographic path order, so loading the same directory twice
    /// always yields the same set. Subdirectories are skipped. Every image is decoded once
    /// here and kept in memory for the whole training run.
    ///
    /// # Errors
    /// `NotFound` if `dir` doesn't exist, `EmptyTrainingSet` if it has no files, the label
    /// inference errors of [`Label::infer`] and any decoding error.
    pub fn load<P: AsRef<Path>>(dir: P, label0: &str, label1: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let paths = list_files(dir)?;
        if paths.is_empty() {
            return Err(PerceptronErr::EmptyTrainingSet {
                dir: dir.to_path_buf(),
            });
        }

        let labels = paths
            .iter()
            .map(|path| Label::infer(path, label0, label1))
            .collect::<Result<Vec<_>>>()?;

        let samples = paths
            .into_iter()
            .zip(labels)
            .map(|(path, label)| {
                let features = Features::open(&path)?;
                debug!("loaded {} as {label:?}", path.display());
                Ok(Sample::new(path, label, features))
            })
            .collect::<Result<Vec<_>>>()?;

        let set = Self::new(samples)?;
        info!(
            "loaded {} training samples of {} from {}",
            set.len(),
            set.bounds,
            dir.display()
        );

        Ok(set)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Lists the regular files directly inside `dir`, sorted by path.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| PerceptronErr::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PerceptronErr::io(dir, e))?.path();
        if path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;

    fn sample(name: &str, label: Label, width: u32, height: u32) -> Sample {
        let bounds = Bounds::from_dimensions(width, height).unwrap();
        let features = Features::from_luma(bounds, Array2::zeros(bounds.shape())).unwrap();
        Sample::new(name, label, features)
    }

    #[test]
    fn infers_labels_from_the_file_name_only() {
        let infer = |p: &str| Label::infer(Path::new(p), "cat", "dog");

        assert_eq!(infer("set/cat_01.png").unwrap(), Label::Zero);
        assert_eq!(infer("set/a-dog.jpg").unwrap(), Label::One);
        // the directory name doesn't count
        assert_eq!(infer("dogs/cat_02.png").unwrap(), Label::Zero);
    }

    #[test]
    fn names_with_both_labels_are_ambiguous() {
        let err = Label::infer(Path::new("catdog.png"), "cat", "dog").unwrap_err();
        assert!(matches!(err, PerceptronErr::ClassLabelAmbiguous { .. }));

        // a label contained in the other one makes every file of that class ambiguous
        let err = Label::infer(Path::new("cats_1.png"), "cat", "cats").unwrap_err();
        assert!(matches!(err, PerceptronErr::ClassLabelAmbiguous { .. }));
    }

    #[test]
    fn names_with_no_label_are_missing() {
        let err = Label::infer(Path::new("bird.png"), "cat", "dog").unwrap_err();
        assert!(matches!(err, PerceptronErr::ClassLabelMissing { .. }));
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = TrainingSet::new(vec![]).unwrap_err();
        assert!(matches!(err, PerceptronErr::EmptyTrainingSet { .. }));
    }

    #[test]
    fn samples_must_share_bounds() {
        let err = TrainingSet::new(vec![
            sample("a_cat", Label::Zero, 2, 2),
            sample("a_dog", Label::One, 2, 3),
        ])
        .unwrap_err();

        let PerceptronErr::DimensionMismatch { expected, got } = err else {
            panic!("expected a dimension mismatch, got {err:?}");
        };
        assert_eq!(expected, Bounds::from_dimensions(2, 2).unwrap());
        assert_eq!(got, Bounds::from_dimensions(2, 3).unwrap());
    }

    #[test]
    fn missing_directory_is_not_found() {
        let err = TrainingSet::load("/no/such/training/dir", "a", "b").unwrap_err();
        assert!(matches!(err, PerceptronErr::NotFound { .. }));
    }
}
