//! Image Pipeline Module
//!
//! Decode, optional resize, JPEG encode/decode round trips, and the final
//! write of the chosen quality.

use crate::errors::{Result, SqueezeError};
use crate::types::{FileSize, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageFormat, ImageReader};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Requested output dimensions. Zero means "derive from the aspect ratio".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeTarget {
    pub width: u32,
    pub height: u32,
}

impl ResizeTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Final `(width, height)` for a `src_w × src_h` source, `None` if unchanged.
    pub fn dimensions_for(&self, src_w: u32, src_h: u32) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (0, 0) => None,
            (w, 0) => Some((w, proportional(src_h, w, src_w))),
            (0, h) => Some((proportional(src_w, h, src_h), h)),
            (w, h) => Some((w, h)),
        }
    }
}

fn proportional(other: u32, target: u32, source: u32) -> u32 {
    let scaled = f64::from(other) * f64::from(target) / f64::from(source.max(1));
    (scaled.round() as u32).max(1)
}

/// Open and decode an image, returning it with the size of the file on disk.
pub fn load_image(path: &Path) -> Result<(DynamicImage, FileSize)> {
    let file = File::open(path).map_err(|e| SqueezeError::io(path, e))?;
    let size = file.metadata().map_err(|e| SqueezeError::io(path, e))?.len();

    let img = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|e| SqueezeError::io(path, e))?
        .decode()?;

    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        bytes = size,
        "Decoded input image"
    );
    Ok((img, FileSize::new(size)))
}

/// Resize with Lanczos3, or return the image untouched for an identity target.
pub fn resize(img: DynamicImage, target: ResizeTarget) -> DynamicImage {
    match target.dimensions_for(img.width(), img.height()) {
        Some((w, h)) => {
            debug!(from_w = img.width(), from_h = img.height(), w, h, "Resizing");
            img.resize_exact(w, h, FilterType::Lanczos3)
        }
        None => img,
    }
}

fn encode_jpeg_to<W: Write>(writer: W, img: &DynamicImage, quality: Quality) -> Result<()> {
    // alpha is dropped, JPEG has no use for it
    let rgb = img.to_rgb8();
    let mut encoder = JpegEncoder::new_with_quality(writer, quality.value());
    encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)?;
    Ok(())
}

/// JPEG bytes at `quality`.
pub fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_jpeg_to(&mut buf, img, quality)?;
    Ok(buf)
}

/// Pass the image through the JPEG codec once at `quality`.
pub fn jpeg_round_trip(img: &DynamicImage, quality: Quality) -> Result<DynamicImage> {
    let bytes = encode_jpeg(img, quality)?;
    Ok(image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)?)
}

/// Write `img` as PNG into an already open file.
pub fn write_png(img: &DynamicImage, file: &mut File, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(file);
    img.write_to(&mut writer, ImageFormat::Png)?;
    writer.flush().map_err(|e| SqueezeError::io(path, e))
}

/// Write the final JPEG and report its size on disk.
pub fn write_jpeg(path: &Path, img: &DynamicImage, quality: Quality) -> Result<FileSize> {
    let file = File::create(path).map_err(|e| SqueezeError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    encode_jpeg_to(&mut writer, img, quality)?;
    let file = writer
        .into_inner()
        .map_err(|e| SqueezeError::io(path, e.into_error()))?;
    file.sync_all().map_err(|e| SqueezeError::io(path, e))?;
    drop(file);

    let size = fs::metadata(path).map_err(|e| SqueezeError::io(path, e))?.len();
    Ok(FileSize::new(size))
}
