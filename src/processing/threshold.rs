//! # Message Binarization
//!
//! A message image is reduced to one bit per pixel before embedding. The rule
//! for deciding black versus white is a [`Threshold`] so callers and tests can
//! pin it down.

use image::{GrayImage, Luma};

/// Decides whether a luma value counts as white (bit 1) or black (bit 0).
pub trait Threshold: Send + Sync {
    fn is_white(&self, luma: u8) -> bool;

    /// Message bit for `luma`.
    fn bit(&self, luma: u8) -> u8 {
        u8::from(self.is_white(luma))
    }

    /// Snap `luma` to 0 or 255. Applying this twice gives the same result as once.
    fn binarize(&self, luma: u8) -> u8 {
        if self.is_white(luma) {
            255
        } else {
            0
        }
    }
}

/// White iff `luma >= cutoff`.
///
/// No dithering: every pixel is classified on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuminanceThreshold {
    pub cutoff: u8,
}

impl LuminanceThreshold {
    pub const DEFAULT_CUTOFF: u8 = 128;

    pub fn new(cutoff: u8) -> Self {
        Self { cutoff }
    }
}

impl Default for LuminanceThreshold {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CUTOFF)
    }
}

impl Threshold for LuminanceThreshold {
    fn is_white(&self, luma: u8) -> bool {
        luma >= self.cutoff
    }
}

/// Row-major bit plane (one byte per pixel, 0 or 1) of a gray image.
pub fn bit_plane<T: Threshold + ?Sized>(message: &GrayImage, threshold: &T) -> Vec<u8> {
    message
        .pixels()
        .map(|&Luma([luma])| threshold.bit(luma))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cutoff() {
        let t = LuminanceThreshold::default();
        assert!(!t.is_white(0));
        assert!(!t.is_white(127));
        assert!(t.is_white(128));
        assert!(t.is_white(255));
    }

    #[test]
    fn test_binarize_is_idempotent() {
        for cutoff in [0u8, 1, 64, 128, 200, 255] {
            let t = LuminanceThreshold::new(cutoff);
            for luma in 0..=255u8 {
                let once = t.binarize(luma);
                assert_eq!(t.binarize(once), once, "cutoff {} luma {}", cutoff, luma);
            }
        }
    }

    #[test]
    fn test_bit_plane_order() {
        let img = GrayImage::from_raw(2, 2, vec![0, 255, 200, 10]).unwrap();
        let bits = bit_plane(&img, &LuminanceThreshold::default());
        assert_eq!(bits, vec![0, 1, 1, 0]);
    }
}
