//! # Operation Statistics
//!
//! Counters gathered during a scan, exported as pretty-printed JSON with
//! `--stats-output`.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// What an encode did to the carrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedStats {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    /// Message pixels classified as white.
    pub white_bits: usize,
    /// Carrier samples whose low bit actually flipped.
    pub changed_bits: usize,
}

impl EmbedStats {
    pub fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Percentage of carrier pixels that were modified.
    pub fn change_rate(&self) -> f64 {
        if self.pixels() == 0 {
            return 0.0;
        }
        self.changed_bits as f64 / self.pixels() as f64 * 100.0
    }

    pub fn export_to_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let output = serde_json::json!({
            "operation": "hide",
            "stats": self,
            "change_rate_percent": self.change_rate(),
        });
        write_json(path, &output)
    }
}

/// What a decode found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealStats {
    pub width: u32,
    pub height: u32,
    pub white_pixels: usize,
}

impl RevealStats {
    pub fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn export_to_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let output = serde_json::json!({
            "operation": "reveal",
            "stats": self,
            "black_pixels": self.pixels() - self.white_pixels,
        });
        write_json(path, &output)
    }
}

fn write_json<P: AsRef<Path>>(path: P, value: &serde_json::Value) -> std::io::Result<()> {
    let json_string = serde_json::to_string_pretty(value)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_rate() {
        let stats = EmbedStats {
            width: 4,
            height: 5,
            channels: 3,
            white_bits: 10,
            changed_bits: 5,
        };
        assert_eq!(stats.pixels(), 20);
        assert!((stats.change_rate() - 25.0).abs() < f64::EPSILON);
        assert_eq!(EmbedStats::default().change_rate(), 0.0);
    }

    #[test]
    fn test_export_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reveal.json");
        let stats = RevealStats {
            width: 2,
            height: 2,
            white_pixels: 3,
        };
        stats.export_to_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["operation"], "reveal");
        assert_eq!(value["stats"]["white_pixels"], 3);
        assert_eq!(value["black_pixels"], 1);
    }
}
