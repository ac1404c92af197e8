use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

use crate::bounds::Bounds;

/// The result type used across the whole crate.
pub type Result<T> = std::result::Result<T, PerceptronErr>;

/// The perceptron's error type.
///
/// Every failure aborts the current command, so none of these are recovered internally. They
/// are returned up to the caller, which decides how to report them.
#[derive(Debug)]
pub enum PerceptronErr {
    /// A file or directory does not exist.
    NotFound { path: PathBuf },
    /// Any other I/O failure while touching `path`.
    Io { path: PathBuf, source: io::Error },
    /// The training directory has no files in it.
    EmptyTrainingSet { dir: PathBuf },
    /// The image codec rejected the file.
    DecodeFailure {
        path: PathBuf,
        source: image::ImageError,
    },
    /// A decoded image has no pixels.
    EmptyImage { path: PathBuf },
    /// Image dimensions too large to be addressed by [`Bounds`].
    Oversized { width: u32, height: u32 },
    /// An image's bounds differ from the model's.
    DimensionMismatch { expected: Bounds, got: Bounds },
    /// The file name contains both class labels.
    ClassLabelAmbiguous { path: PathBuf },
    /// The file name contains neither class label.
    ClassLabelMissing { path: PathBuf },
    /// A persisted model could not be decoded.
    CorruptModel(String),
    /// Writing a model or an image failed on the encoding side.
    EncodeFailure(String),
    /// The given configuration can't be used.
    InvalidConfig(String),
}

impl PerceptronErr {
    /// Maps an `io::Error` raised while accessing `path`, keeping `NotFound` distinct.
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    pub(crate) fn corrupt<S: Into<String>>(msg: S) -> Self {
        Self::CorruptModel(msg.into())
    }
}

impl Display for PerceptronErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "{} does not exist", path.display()),
            Self::Io { path, source } => write!(f, "io error on {}: {source}", path.display()),
            Self::EmptyTrainingSet { dir } => {
                write!(f, "empty training(set) directory {}", dir.display())
            }
            Self::DecodeFailure { path, source } => {
                write!(f, "failed to decode image {}: {source}", path.display())
            }
            Self::EmptyImage { path } => write!(f, "image {} has no pixels", path.display()),
            Self::Oversized { width, height } => {
                write!(f, "a {width}x{height} image is too large to classify")
            }
            Self::DimensionMismatch { expected, got } => {
                write!(f, "image bounds mismatch: got {got}, expected {expected}")
            }
            Self::ClassLabelAmbiguous { path } => write!(
                f,
                "{} contains both class labels, can't tell which one it is",
                path.display()
            ),
            Self::ClassLabelMissing { path } => {
                write!(f, "{} contains none of the class labels", path.display())
            }
            Self::CorruptModel(msg) => write!(f, "corrupt model: {msg}"),
            Self::EncodeFailure(msg) => write!(f, "encode failure: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl Error for PerceptronErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::DecodeFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PerceptronErr {
    fn from(value: serde_json::Error) -> Self {
        Self::CorruptModel(value.to_string())
    }
}
