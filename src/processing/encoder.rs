//! # Encoder
//!
//! Hides a black/white message image in the red-channel low bits of a carrier.
//!
//! ## Algorithm
//!
//! 1. Reject the message if it has more pixels than the carrier, and reject
//!    carriers that are not 8 bits per sample
//! 2. Make sure both inputs come from lossless sources (JPEG is re-saved as PNG)
//! 3. Stretch the message to the carrier's exact width and height
//! 4. Classify every stretched pixel as black (0) or white (1)
//! 5. Walk the carrier row-major and set `r' = (r & !1) | bit`
//! 6. Write the result as PNG with the carrier's channel layout
//!
//! Green, blue and alpha samples, and the upper seven bits of red, are copied
//! untouched.

use image::imageops::{self, FilterType};
use image::DynamicImage;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use super::metrics::EmbedStats;
use super::pixels::{embed_bit, is_eight_bit, CarrierPixels, RED_CHANNEL};
use super::source::{load_image, save_png, LosslessImageSource, PassThrough, PngTranscoder};
use super::threshold::{bit_plane, LuminanceThreshold, Threshold};
use crate::common::config::StegoConfig;
use crate::error::StegoError;

/// Filter used to stretch the message onto the carrier.
///
/// Nearest keeps message pixels pure black/white; the smoothing filters
/// produce grays that the threshold then snaps back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    #[default]
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl FromStr for ResampleFilter {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "triangle" => Ok(Self::Triangle),
            "catmullrom" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "lanczos3" => Ok(Self::Lanczos3),
            other => Err(StegoError::Config(format!(
                "unknown resample filter '{}'",
                other
            ))),
        }
    }
}

/// A carrier with the message embedded, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub image: DynamicImage,
    pub stats: EmbedStats,
}

impl EncodedImage {
    /// Write as PNG. Not atomic: a failed write may leave a partial file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        save_png(&self.image, path.as_ref())
    }
}

pub struct Encoder {
    source: Box<dyn LosslessImageSource>,
    threshold: Box<dyn Threshold>,
    filter: ResampleFilter,
    parallel_rows: bool,
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            source: Box::new(PngTranscoder::default()),
            threshold: Box::new(LuminanceThreshold::default()),
            filter: ResampleFilter::default(),
            parallel_rows: false,
        }
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &StegoConfig) -> Self {
        let source: Box<dyn LosslessImageSource> = if config.encoder.transcode_lossy {
            Box::new(PngTranscoder::new(config.encoder.transcode_dir.clone()))
        } else {
            Box::new(PassThrough)
        };

        Self {
            source,
            threshold: Box::new(LuminanceThreshold::new(config.encoder.threshold)),
            filter: config.encoder.resample_filter,
            parallel_rows: config.scan.parallel_rows,
        }
    }

    pub fn with_source<S: LosslessImageSource + 'static>(mut self, source: S) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn with_threshold<T: Threshold + 'static>(mut self, threshold: T) -> Self {
        self.threshold = Box::new(threshold);
        self
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_parallel_rows(mut self, parallel_rows: bool) -> Self {
        self.parallel_rows = parallel_rows;
        self
    }

    /// Load both images and embed the message.
    ///
    /// Both inputs are decoded and checked before the lossless source is
    /// asked for anything, so a rejected encode leaves no transcoded files.
    ///
    /// # Errors
    /// - [`StegoError::Format`] if either file is not a decodable image, or the
    ///   carrier is not stored at 8 bits per sample
    /// - [`StegoError::Capacity`] if the message has more pixels than the carrier
    /// - [`StegoError::Io`] if either file cannot be read
    pub fn encode<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        carrier_path: P,
        message_path: Q,
    ) -> Result<EncodedImage, StegoError> {
        let carrier_path = carrier_path.as_ref();
        let message_path = message_path.as_ref();

        let carrier = load_image(carrier_path)?;
        let message = load_image(message_path)?;
        check_depth(&carrier, carrier_path)?;
        check_capacity(
            message.width(),
            message.height(),
            carrier.width(),
            carrier.height(),
        )?;

        let lossless_carrier = self.source.lossless_path(carrier_path)?;
        let lossless_message = self.source.lossless_path(message_path)?;
        let carrier = if lossless_carrier == carrier_path {
            carrier
        } else {
            load_image(&lossless_carrier)?
        };
        let message = if lossless_message == message_path {
            message
        } else {
            load_image(&lossless_message)?
        };
        self.embed_checked(&carrier, &message, &lossless_carrier)
    }

    /// Embed `message` into a copy of `carrier`.
    ///
    /// The carrier must be 8 bits per sample; 16-bit and float carriers are
    /// rejected with [`StegoError::Format`] rather than reduced.
    pub fn embed(
        &self,
        carrier: &DynamicImage,
        message: &DynamicImage,
    ) -> Result<EncodedImage, StegoError> {
        self.embed_checked(carrier, message, Path::new("<carrier>"))
    }

    fn embed_checked(
        &self,
        carrier: &DynamicImage,
        message: &DynamicImage,
        carrier_path: &Path,
    ) -> Result<EncodedImage, StegoError> {
        check_depth(carrier, carrier_path)?;
        let mut pixels = CarrierPixels::from_image(carrier);
        let (width, height) = pixels.dimensions();
        check_capacity(message.width(), message.height(), width, height)?;

        let mut plane = message.to_luma8();
        if plane.dimensions() != (width, height) {
            debug!(
                "stretching message {}x{} to {}x{} ({:?})",
                plane.width(),
                plane.height(),
                width,
                height,
                self.filter
            );
            plane = imageops::resize(&plane, width, height, self.filter.into());
        }

        let bits = bit_plane(&plane, self.threshold.as_ref());
        let changed_bits = embed_rows(&mut pixels, &bits, self.parallel_rows);
        let stats = EmbedStats {
            width,
            height,
            channels: pixels.channels(),
            white_bits: bits.iter().filter(|&&bit| bit == 1).count(),
            changed_bits,
        };
        debug!(
            "embedded {} bits, {} low bits flipped",
            stats.pixels(),
            stats.changed_bits
        );

        Ok(EncodedImage {
            image: pixels.into_image(),
            stats,
        })
    }

    /// Encode and write the result to `output_path`.
    pub fn hide<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(
        &self,
        carrier_path: P,
        message_path: Q,
        output_path: R,
    ) -> Result<EmbedStats, StegoError> {
        let encoded = self.encode(carrier_path, message_path)?;
        encoded.save(output_path.as_ref())?;
        info!("Secret image saved to {}", output_path.as_ref().display());
        Ok(encoded.stats)
    }
}

/// Encode with the default settings.
pub fn encode<P: AsRef<Path>, Q: AsRef<Path>>(
    carrier_path: P,
    message_path: Q,
) -> Result<EncodedImage, StegoError> {
    Encoder::default().encode(carrier_path, message_path)
}

/// Encode with the default settings and write the result.
pub fn hide<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(
    carrier_path: P,
    message_path: Q,
    output_path: R,
) -> Result<EmbedStats, StegoError> {
    Encoder::default().hide(carrier_path, message_path, output_path)
}

fn check_depth(carrier: &DynamicImage, path: &Path) -> Result<(), StegoError> {
    if is_eight_bit(carrier.color()) {
        return Ok(());
    }
    Err(StegoError::Format {
        path: path.to_path_buf(),
        reason: format!(
            "unsupported bit depth ({:?}); carriers must be 8-bit",
            carrier.color()
        ),
    })
}

/// Compared by area, before any stretching.
fn check_capacity(
    message_width: u32,
    message_height: u32,
    carrier_width: u32,
    carrier_height: u32,
) -> Result<(), StegoError> {
    let message_area = message_width as u64 * message_height as u64;
    let carrier_area = carrier_width as u64 * carrier_height as u64;
    if carrier_area == 0 || message_area > carrier_area {
        return Err(StegoError::Capacity {
            message_width,
            message_height,
            carrier_width,
            carrier_height,
        });
    }
    Ok(())
}

/// Write `bits` (row-major, one per pixel) into the carrier. Returns how many
/// low bits changed value.
fn embed_rows(pixels: &mut CarrierPixels, bits: &[u8], parallel: bool) -> usize {
    let width = pixels.dimensions().0 as usize;
    let channels = pixels.channels();
    let row_len = pixels.row_len();
    let samples = pixels.samples_mut();

    if parallel {
        samples
            .par_chunks_mut(row_len)
            .zip(bits.par_chunks(width))
            .map(|(row, row_bits)| embed_row(row, row_bits, channels))
            .sum()
    } else {
        samples
            .chunks_mut(row_len)
            .zip(bits.chunks(width))
            .map(|(row, row_bits)| embed_row(row, row_bits, channels))
            .sum()
    }
}

fn embed_row(row: &mut [u8], row_bits: &[u8], channels: usize) -> usize {
    let mut changed = 0;
    for (pixel, &bit) in row.chunks_exact_mut(channels).zip(row_bits) {
        let before = pixel[RED_CHANNEL];
        pixel[RED_CHANNEL] = embed_bit(before, bit);
        changed += usize::from(pixel[RED_CHANNEL] != before);
    }
    changed
}
