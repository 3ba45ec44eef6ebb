//! # Configuration Utilities
//!
//! TOML configuration shared by the `hide` and `reveal` binaries. Every field
//! has a default, so an empty file (or no file at all) is a valid configuration.
//!
//! ```toml
//! [encoder]
//! threshold = 128
//! resample_filter = "nearest"
//! transcode_lossy = true
//!
//! [scan]
//! parallel_rows = false
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::processing::encoder::ResampleFilter;
use crate::processing::threshold::LuminanceThreshold;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: StegoConfig = load_config("config/default.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub encoder: EncoderConfig,
    pub scan: ScanConfig,
}

/// How message images are prepared before embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Luma at or above which a message pixel is white (bit 1)
    pub threshold: u8,
    /// Filter used to stretch the message onto the carrier's dimensions
    pub resample_filter: ResampleFilter,
    /// Re-save JPEG carriers and messages as PNG before encoding
    pub transcode_lossy: bool,
    /// Where transcoded files go; next to the source when unset
    pub transcode_dir: Option<PathBuf>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            threshold: LuminanceThreshold::DEFAULT_CUTOFF,
            resample_filter: ResampleFilter::default(),
            transcode_lossy: true,
            transcode_dir: None,
        }
    }
}

/// Pixel scan settings shared by encoder and decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Split the scan by rows across the rayon thread pool
    pub parallel_rows: bool,
}

impl StegoConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        load_config(path)
    }

    /// Configuration from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: StegoConfig = toml::from_str("").unwrap();
        assert_eq!(config, StegoConfig::default());
        assert_eq!(config.encoder.threshold, 128);
        assert_eq!(config.encoder.resample_filter, ResampleFilter::Nearest);
        assert!(config.encoder.transcode_lossy);
        assert!(!config.scan.parallel_rows);
    }

    #[test]
    fn test_partial_config() {
        let config: StegoConfig = toml::from_str(
            r#"
            [encoder]
            threshold = 200
            resample_filter = "catmullrom"

            [scan]
            parallel_rows = true
            "#,
        )
        .unwrap();
        assert_eq!(config.encoder.threshold, 200);
        assert_eq!(config.encoder.resample_filter, ResampleFilter::CatmullRom);
        assert!(config.encoder.transcode_lossy);
        assert!(config.scan.parallel_rows);
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let result: std::result::Result<StegoConfig, _> =
            toml::from_str("[encoder]\nthreshold = 300\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[encoder]\ntranscode_lossy = false").unwrap();

        let path = file.path().to_str().unwrap();
        let config = StegoConfig::load(Some(path)).unwrap();
        assert!(!config.encoder.transcode_lossy);
        assert_eq!(StegoConfig::load(None).unwrap(), StegoConfig::default());
        assert!(StegoConfig::from_file("/nonexistent/stego.toml").is_err());
    }
}
