use image::Rgba;

/// Weights of the red, green and blue channels in the luma (`Y`) of a color.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// The luminosity of a pixel at full intensity on every channel.
pub const MAX_LUMINOSITY: f64 = u16::MAX as f64;

/// Returns the luminosity of a color given its 16 bit channel magnitudes.
///
/// Channels must always be given at 16 bit depth, no matter how the image was stored,
/// otherwise responses computed during training and classification won't share a scale.
pub fn luminosity(r: u16, g: u16, b: u16) -> f64 {
    let [wr, wg, wb] = LUMA_WEIGHTS;
    wr * r as f64 + wg * g as f64 + wb * b as f64
}

/// Returns the luminosity of an RGBA pixel, ignoring alpha.
pub fn pixel_luminosity(pixel: &Rgba<u16>) -> f64 {
    let [r, g, b, _] = pixel.0;
    luminosity(r, g, b)
}
