//! # Image Sources
//!
//! Loading and saving images, plus the [`LosslessImageSource`] capability the
//! encoder relies on: a carrier must come from a format that keeps its low bits.
//! JPEG inputs are re-saved as PNG by [`PngTranscoder`] before encoding.
//!
//! Format detection looks at file content, not the extension.

use image::io::Reader;
use image::{DynamicImage, ImageFormat};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::error::StegoError;

/// Provides a path whose content can be decoded without lossy compression artifacts.
pub trait LosslessImageSource {
    fn lossless_path(&self, path: &Path) -> Result<PathBuf, StegoError>;
}

/// Uses every path as given. For callers that already guarantee lossless input.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl LosslessImageSource for PassThrough {
    fn lossless_path(&self, path: &Path) -> Result<PathBuf, StegoError> {
        Ok(path.to_path_buf())
    }
}

/// Re-saves JPEG inputs as PNG, next to the original or into `out_dir`.
///
/// The target is `<stem>.png`, or `<stem>_lossless.png` / `<stem>_lossless_N.png`
/// when that name is already taken.
#[derive(Debug, Clone, Default)]
pub struct PngTranscoder {
    pub out_dir: Option<PathBuf>,
}

impl PngTranscoder {
    pub fn new(out_dir: Option<PathBuf>) -> Self {
        Self { out_dir }
    }

    fn target_for(&self, path: &Path) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "transcoded".to_string());
        let dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        // Never overwrite an existing file, the source included.
        let target = dir.join(format!("{}.png", stem));
        if target != path && !target.exists() {
            return target;
        }
        let mut target = dir.join(format!("{}_lossless.png", stem));
        let mut n = 1;
        while target == path || target.exists() {
            target = dir.join(format!("{}_lossless_{}.png", stem, n));
            n += 1;
        }
        target
    }
}

impl LosslessImageSource for PngTranscoder {
    fn lossless_path(&self, path: &Path) -> Result<PathBuf, StegoError> {
        if sniff_format(path)? != Some(ImageFormat::Jpeg) {
            return Ok(path.to_path_buf());
        }

        let image = load_image(path)?;
        let target = self.target_for(path);
        if let Some(dir) = &self.out_dir {
            std::fs::create_dir_all(dir).map_err(|e| StegoError::io(dir, e))?;
        }
        save_png(&image, &target)?;
        warn!(
            "{} is JPEG; transcoded to {} before embedding",
            path.display(),
            target.display()
        );
        Ok(target)
    }
}

/// Format detected from the file's signature, falling back to its extension.
pub fn sniff_format(path: &Path) -> Result<Option<ImageFormat>, StegoError> {
    let reader = open_reader(path)?;
    Ok(reader.format())
}

fn open_reader(path: &Path) -> Result<Reader<std::io::BufReader<std::fs::File>>, StegoError> {
    Reader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| StegoError::io(path, e))
}

/// Decode the image at `path`.
pub fn load_image(path: &Path) -> Result<DynamicImage, StegoError> {
    let reader = open_reader(path)?;
    let Some(format) = reader.format() else {
        return Err(StegoError::Format {
            path: path.to_path_buf(),
            reason: "unrecognized file signature".to_string(),
        });
    };

    let image = reader
        .decode()
        .map_err(|e| StegoError::from_decode(path, e))?;
    debug!(
        "loaded {} as {:?} {}x{} {:?}",
        path.display(),
        format,
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image)
}

/// Write `image` as PNG regardless of the extension on `path`.
pub fn save_png(image: &DynamicImage, path: &Path) -> Result<(), StegoError> {
    let lossless_name = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);
    if !lossless_name {
        warn!(
            "{} does not end in .png; writing PNG data anyway",
            path.display()
        );
    }

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| StegoError::from_encode(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn sample_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(4, 3, |x, y| {
            Rgb([(x * 40) as u8, (y * 60) as u8, 90])
        }))
    }

    #[test]
    fn test_pass_through_keeps_path() {
        let path = Path::new("some/carrier.jpg");
        assert_eq!(PassThrough.lossless_path(path).unwrap(), path);
    }

    #[test]
    fn test_transcoder_converts_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = dir.path().join("carrier.jpg");
        sample_image()
            .save_with_format(&jpeg, ImageFormat::Jpeg)
            .unwrap();

        let target = PngTranscoder::default().lossless_path(&jpeg).unwrap();
        assert_eq!(target, dir.path().join("carrier.png"));
        assert_eq!(sniff_format(&target).unwrap(), Some(ImageFormat::Png));
    }

    #[test]
    fn test_transcoder_skips_png() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("carrier.png");
        save_png(&sample_image(), &png).unwrap();

        let target = PngTranscoder::default().lossless_path(&png).unwrap();
        assert_eq!(target, png);
    }

    #[test]
    fn test_transcoder_does_not_overwrite_misnamed_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let misnamed = dir.path().join("carrier.png");
        sample_image()
            .save_with_format(&misnamed, ImageFormat::Jpeg)
            .unwrap();

        let out_dir = dir.path().join("converted");
        let target = PngTranscoder::new(None).lossless_path(&misnamed).unwrap();
        assert_eq!(target, dir.path().join("carrier_lossless.png"));

        let target = PngTranscoder::new(Some(out_dir.clone()))
            .lossless_path(&misnamed)
            .unwrap();
        assert_eq!(target, out_dir.join("carrier.png"));
    }

    #[test]
    fn test_transcoder_keeps_existing_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = dir.path().join("photo.jpg");
        sample_image()
            .save_with_format(&jpeg, ImageFormat::Jpeg)
            .unwrap();

        let sibling = dir.path().join("photo.png");
        let unrelated = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])));
        save_png(&unrelated, &sibling).unwrap();
        let sibling_bytes = std::fs::read(&sibling).unwrap();

        let transcoder = PngTranscoder::default();
        let first = transcoder.lossless_path(&jpeg).unwrap();
        assert_eq!(first, dir.path().join("photo_lossless.png"));
        let second = transcoder.lossless_path(&jpeg).unwrap();
        assert_eq!(second, dir.path().join("photo_lossless_1.png"));

        assert_eq!(std::fs::read(&sibling).unwrap(), sibling_bytes);
        let transcoded = load_image(&first).unwrap();
        assert_eq!((transcoded.width(), transcoded.height()), (4, 3));
    }

    #[test]
    fn test_load_rejects_text() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("notes.png");
        std::fs::write(&fake, "definitely not pixels").unwrap();
        assert!(load_image(&fake).unwrap_err().is_format());

        let plain = dir.path().join("notes.txt");
        std::fs::write(&plain, "definitely not pixels").unwrap();
        assert!(load_image(&plain).unwrap_err().is_format());
    }

    #[test]
    fn test_load_missing_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("absent.png")).unwrap_err();
        assert!(matches!(err, StegoError::Io { .. }));
    }
}
