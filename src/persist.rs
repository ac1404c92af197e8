//! Binary model files.
//!
//! A model file is laid out as
//!
//! ```text
//! magic     4 bytes    b"PCPT"
//! version   u32 (BE)   FORMAT_VERSION
//! meta_len  u64 (BE)   size of the metadata block
//! meta      JSON       threshold, bounds, labels and the amount of weights
//! weights   f64 (LE)   one per pixel, row major
//! ```
//!
//! The weights are stored as raw IEEE-754 bits so they survive a round trip exactly.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    bounds::Bounds,
    error::{PerceptronErr, Result},
    model::Model,
};

const MAGIC: &[u8; 4] = b"PCPT";

/// The version written by [`encode`], files with a greater one are rejected.
pub const FORMAT_VERSION: u32 = 1;

type Header = u32;
const HEADER_SIZE: usize = size_of::<Header>();

type LenType = u64;
const LEN_TYPE_SIZE: usize = size_of::<LenType>();

const WEIGHT_SIZE: usize = size_of::<f64>();

#[derive(Debug, Serialize, Deserialize)]
struct Meta {
    threshold: f64,
    bounds: Bounds,
    label0: String,
    label1: String,
    weights_len: LenType,
}

/// Encodes every field of `model` into the model file format.
pub fn encode(model: &Model) -> Result<Vec<u8>> {
    let meta = Meta {
        threshold: model.threshold(),
        bounds: model.bounds(),
        label0: model.label0().to_string(),
        label1: model.label1().to_string(),
        weights_len: model.weights().len() as LenType,
    };
    let meta = serde_json::to_vec(&meta).map_err(|e| PerceptronErr::EncodeFailure(e.to_string()))?;

    let mut buf = Vec::with_capacity(
        MAGIC.len() + HEADER_SIZE + LEN_TYPE_SIZE + meta.len() + model.weights().len() * WEIGHT_SIZE,
    );
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
    buf.extend_from_slice(&(meta.len() as LenType).to_be_bytes());
    buf.extend_from_slice(&meta);
    for weight in model.weights() {
        buf.extend_from_slice(&weight.to_le_bytes());
    }

    Ok(buf)
}

/// Decodes a model from the model file format.
///
/// # Errors
/// `CorruptModel` if the buffer isn't a well formed model of a supported version.
pub fn decode(buf: &[u8]) -> Result<Model> {
    let (magic, rest) = split(buf, MAGIC.len(), "magic")?;
    if magic != MAGIC {
        return Err(PerceptronErr::corrupt("not a perceptron model file"));
    }

    let (version, rest) = split(rest, HEADER_SIZE, "version")?;
    let version = Header::from_be_bytes(to_array(version));
    if version == 0 || version > FORMAT_VERSION {
        return Err(PerceptronErr::corrupt(format!(
            "unsupported model format version {version}"
        )));
    }

    let (meta_len, rest) = split(rest, LEN_TYPE_SIZE, "metadata length")?;
    let meta_len = usize::try_from(LenType::from_be_bytes(to_array(meta_len)))
        .map_err(|_| PerceptronErr::corrupt("metadata length overflows"))?;

    let (meta, rest) = split(rest, meta_len, "metadata")?;
    let meta: Meta = serde_json::from_slice(meta)?;

    let expected = usize::try_from(meta.weights_len)
        .ok()
        .and_then(|len| len.checked_mul(WEIGHT_SIZE))
        .ok_or_else(|| PerceptronErr::corrupt("weights length overflows"))?;

    if rest.len() != expected {
        return Err(PerceptronErr::corrupt(format!(
            "expected {expected} bytes of weights, got {}",
            rest.len()
        )));
    }

    let weights = rest
        .chunks_exact(WEIGHT_SIZE)
        .map(|bytes| f64::from_le_bytes(to_array(bytes)))
        .collect();

    Model::from_parts(meta.threshold, weights, meta.bounds, meta.label0, meta.label1).map_err(
        |e| match e {
            PerceptronErr::InvalidConfig(msg) => PerceptronErr::CorruptModel(msg),
            e => e,
        },
    )
}

/// Writes `model` to `path`, replacing the file if it exists.
pub fn save<P: AsRef<Path>>(model: &Model, path: P) -> Result<()> {
    let path = path.as_ref();
    let buf = encode(model)?;

    let file = File::create(path).map_err(|e| PerceptronErr::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&buf)
        .and_then(|_| writer.flush())
        .map_err(|e| PerceptronErr::io(path, e))?;

    info!("saved model to {}", path.display());
    Ok(())
}

/// Reads the model stored at `path`.
///
/// # Errors
/// `NotFound` if there's no such file and `CorruptModel` if it can't be decoded.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Model> {
    let path = path.as_ref();
    let buf = fs::read(path).map_err(|e| PerceptronErr::io(path, e))?;
    let model = decode(&buf)?;

    info!("loaded model of {} from {}", model.bounds(), path.display());
    Ok(model)
}

fn split<'a>(buf: &'a [u8], at: usize, what: &str) -> Result<(&'a [u8], &'a [u8])> {
    if buf.len() < at {
        return Err(PerceptronErr::corrupt(format!(
            "truncated {what}, got {} of {at} bytes",
            buf.len()
        )));
    }

    Ok(buf.split_at(at))
}

/// Copies a slice already known to be `N` bytes long into an array.
fn to_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut array = [0; N];
    array.copy_from_slice(bytes);
    array
}
