//! # Decoder
//!
//! Reads the red-channel low bit of every pixel back out into a gray image:
//! 255 where the bit is set, 0 where it is clear. Any decodable image produces
//! a full-size output; there is no notion of "nothing hidden here".

use image::{DynamicImage, GrayImage};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::Path;

use super::metrics::RevealStats;
use super::pixels::{extract_bit, is_eight_bit, CarrierPixels, RED_CHANNEL};
use super::source::{load_image, save_png};
use crate::common::config::StegoConfig;
use crate::error::StegoError;

const WHITE: u8 = 255;
const BLACK: u8 = 0;

/// The extracted message.
#[derive(Debug, Clone)]
pub struct RecoveredImage {
    pub image: GrayImage,
    pub stats: RevealStats,
}

impl RecoveredImage {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        save_png(&DynamicImage::ImageLuma8(self.image.clone()), path.as_ref())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    parallel_rows: bool,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &StegoConfig) -> Self {
        Self {
            parallel_rows: config.scan.parallel_rows,
        }
    }

    pub fn with_parallel_rows(mut self, parallel_rows: bool) -> Self {
        self.parallel_rows = parallel_rows;
        self
    }

    /// Load `encoded_path` and extract its message.
    ///
    /// # Errors
    /// - [`StegoError::Format`] if the file is not a decodable image
    /// - [`StegoError::Io`] if the file cannot be read
    pub fn decode<P: AsRef<Path>>(&self, encoded_path: P) -> Result<RecoveredImage, StegoError> {
        let image = load_image(encoded_path.as_ref())?;
        Ok(self.extract(&image))
    }

    /// Images that are not 8 bits per sample are reduced to 8 bits first and
    /// the low bit of the reduced red sample is read.
    pub fn extract(&self, image: &DynamicImage) -> RecoveredImage {
        if !is_eight_bit(image.color()) {
            warn!(
                "{:?} input reduced to 8 bits per sample before reading",
                image.color()
            );
        }
        let pixels = CarrierPixels::from_image(image);
        let (width, height) = pixels.dimensions();
        let mut out = GrayImage::new(width, height);

        let white_pixels = if width == 0 || height == 0 {
            0
        } else {
            reveal_rows(&pixels, &mut out, self.parallel_rows)
        };
        debug!(
            "extracted {}x{} message, {} white pixels",
            width, height, white_pixels
        );

        RecoveredImage {
            image: out,
            stats: RevealStats {
                width,
                height,
                white_pixels,
            },
        }
    }

    /// Decode and write the extracted message to `output_path`.
    pub fn reveal<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        encoded_path: P,
        output_path: Q,
    ) -> Result<RevealStats, StegoError> {
        let recovered = self.decode(encoded_path)?;
        recovered.save(output_path.as_ref())?;
        info!("Message extracted to {}", output_path.as_ref().display());
        Ok(recovered.stats)
    }
}

/// Decode with the default settings.
pub fn decode<P: AsRef<Path>>(encoded_path: P) -> Result<RecoveredImage, StegoError> {
    Decoder::default().decode(encoded_path)
}

/// Decode with the default settings and write the result.
pub fn reveal<P: AsRef<Path>, Q: AsRef<Path>>(
    encoded_path: P,
    output_path: Q,
) -> Result<RevealStats, StegoError> {
    Decoder::default().reveal(encoded_path, output_path)
}

fn reveal_rows(pixels: &CarrierPixels, out: &mut GrayImage, parallel: bool) -> usize {
    let width = pixels.dimensions().0 as usize;
    let channels = pixels.channels();
    let row_len = pixels.row_len();
    let samples = pixels.samples();
    let plane: &mut [u8] = out;

    if parallel {
        plane
            .par_chunks_mut(width)
            .zip(samples.par_chunks(row_len))
            .map(|(out_row, row)| reveal_row(out_row, row, channels))
            .sum()
    } else {
        plane
            .chunks_mut(width)
            .zip(samples.chunks(row_len))
            .map(|(out_row, row)| reveal_row(out_row, row, channels))
            .sum()
    }
}

fn reveal_row(out_row: &mut [u8], row: &[u8], channels: usize) -> usize {
    let mut white = 0;
    for (value, pixel) in out_row.iter_mut().zip(row.chunks_exact(channels)) {
        *value = if extract_bit(pixel[RED_CHANNEL]) == 1 {
            white += 1;
            WHITE
        } else {
            BLACK
        };
    }
    white
}
