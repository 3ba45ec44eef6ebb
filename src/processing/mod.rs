//! # Image Processing and Steganography
//!
//! Hides a black/white message image in the red-channel least significant bit
//! of a carrier image, and reads it back.

pub mod decoder;
pub mod encoder;
pub mod metrics;
pub mod pixels;
pub mod source;
pub mod threshold;

// Re-export main functions for convenience
pub use decoder::{decode, reveal, Decoder, RecoveredImage};
pub use encoder::{encode, hide, EncodedImage, Encoder, ResampleFilter};
pub use metrics::{EmbedStats, RevealStats};
pub use source::{LosslessImageSource, PassThrough, PngTranscoder};
pub use threshold::{LuminanceThreshold, Threshold};
