//! # Pixel Order Contract
//!
//! Encoder and decoder agree on exactly three things: pixels are visited
//! row-major (row 0 first, left to right), the bit lives in the red channel,
//! and it is the least significant bit.
//!
//! Pixels are held in a flat buffer where sample `c` of pixel `(x, y)` sits at
//! `(y * width + x) * channels + c`.

use image::{ColorType, DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

/// Offset of the carrying channel inside a pixel. For gray carriers the gray
/// sample takes the red channel's place.
pub const RED_CHANNEL: usize = 0;

/// Mask selecting the carrying bit.
pub const LSB_MASK: u8 = 0x01;

/// Byte offset of the first sample of pixel `(x, y)`.
#[inline]
pub fn pixel_offset(width: u32, channels: usize, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * channels
}

/// Replace the low bit of `sample` with `bit` (0 or 1), leaving the rest alone.
#[inline]
pub fn embed_bit(sample: u8, bit: u8) -> u8 {
    (sample & !LSB_MASK) | (bit & LSB_MASK)
}

#[inline]
pub fn extract_bit(sample: u8) -> u8 {
    sample & LSB_MASK
}

/// Layouts that [`CarrierPixels`] holds without dropping any sample bits.
pub fn is_eight_bit(color: ColorType) -> bool {
    matches!(
        color,
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8
    )
}

/// An 8-bit image in one of the four layouts the encoder preserves.
///
/// 16-bit and float images are reduced to the 8-bit layout with the same
/// color/alpha shape; callers that must keep every sample bit check
/// [`is_eight_bit`] first.
#[derive(Debug, Clone)]
pub enum CarrierPixels {
    Gray(GrayImage),
    GrayAlpha(GrayAlphaImage),
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl CarrierPixels {
    pub fn from_image(image: &DynamicImage) -> Self {
        let color = image.color();
        match (color.has_color(), color.has_alpha()) {
            (false, false) => Self::Gray(image.to_luma8()),
            (false, true) => Self::GrayAlpha(image.to_luma_alpha8()),
            (true, false) => Self::Rgb(image.to_rgb8()),
            (true, true) => Self::Rgba(image.to_rgba8()),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Gray(buf) => buf.dimensions(),
            Self::GrayAlpha(buf) => buf.dimensions(),
            Self::Rgb(buf) => buf.dimensions(),
            Self::Rgba(buf) => buf.dimensions(),
        }
    }

    /// Samples per pixel.
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray(_) => 1,
            Self::GrayAlpha(_) => 2,
            Self::Rgb(_) => 3,
            Self::Rgba(_) => 4,
        }
    }

    /// Samples of one full row: the offset at which row 1 starts.
    pub fn row_len(&self) -> usize {
        pixel_offset(self.dimensions().0, self.channels(), 0, 1)
    }

    pub fn samples(&self) -> &[u8] {
        match self {
            Self::Gray(buf) => &**buf,
            Self::GrayAlpha(buf) => &**buf,
            Self::Rgb(buf) => &**buf,
            Self::Rgba(buf) => &**buf,
        }
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        match self {
            Self::Gray(buf) => &mut **buf,
            Self::GrayAlpha(buf) => &mut **buf,
            Self::Rgb(buf) => &mut **buf,
            Self::Rgba(buf) => &mut **buf,
        }
    }

    /// Carrying sample of pixel `(x, y)`.
    #[cfg(test)]
    pub(crate) fn red(&self, x: u32, y: u32) -> u8 {
        let (width, _) = self.dimensions();
        self.samples()[pixel_offset(width, self.channels(), x, y) + RED_CHANNEL]
    }

    pub fn into_image(self) -> DynamicImage {
        match self {
            Self::Gray(buf) => DynamicImage::ImageLuma8(buf),
            Self::GrayAlpha(buf) => DynamicImage::ImageLumaA8(buf),
            Self::Rgb(buf) => DynamicImage::ImageRgb8(buf),
            Self::Rgba(buf) => DynamicImage::ImageRgba8(buf),
        }
    }
}
