#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};
use tempfile::TempDir;

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Writes a `width x height` PNG painted by `paint` into `dir`.
pub fn write_png<F>(dir: &Path, name: &str, width: u32, height: u32, paint: F) -> PathBuf
where
    F: Fn(u32, u32) -> Rgb<u8>,
{
    let path = dir.join(name);
    let image: RgbImage = ImageBuffer::from_fn(width, height, paint);
    image.save(&path).unwrap();
    path
}

pub fn write_solid(dir: &Path, name: &str, width: u32, height: u32, color: Rgb<u8>) -> PathBuf {
    write_png(dir, name, width, height, |_, _| color)
}

/// A directory with one black `dark` and one white `light` picture.
pub fn black_and_white_set(width: u32, height: u32) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_solid(dir.path(), "dark.png", width, height, BLACK);
    write_solid(dir.path(), "light.png", width, height, WHITE);
    dir
}

/// A directory of 4x4 pictures bright on the left (`left_*`) or on the right (`right_*`).
pub fn left_right_set() -> TempDir {
    let dir = TempDir::new().unwrap();

    for (i, level) in [255u8, 200, 160].into_iter().enumerate() {
        let bright = Rgb([level, level, level]);
        let dim = Rgb([20 * i as u8, 10, 0]);

        write_png(dir.path(), &format!("left_{i}.png"), 4, 4, |x, _| {
            if x < 2 { bright } else { dim }
        });
        write_png(dir.path(), &format!("right_{i}.png"), 4, 4, |x, _| {
            if x >= 2 { bright } else { dim }
        });
    }

    dir
}
