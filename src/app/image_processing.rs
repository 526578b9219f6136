// image_processing.rs
use image::io::Reader as ImageReader;
use image::{ImageError, RgbaImage};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Quality used when the caller does not ask for anything else.
pub const DEFAULT_QUALITY: f32 = 100.0;

/// One source image to turn into one WebP file.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub quality: f32,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            quality: DEFAULT_QUALITY,
        }
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub width: u32,
    pub height: u32,
    pub bytes_written: usize,
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to load image.")]
    Decode(#[source] ImageError),

    #[error("Failed to encode WebP image.")]
    Encode(#[source] EncoderFailure),

    #[error("Failed to open output file for writing.")]
    WriteOpen(#[source] io::Error),

    #[error("Failed to write output file.")]
    WriteIo(#[source] io::Error),
}

/// Why the encoder could not produce a bitstream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EncoderFailure(pub String);

/// Turns a tightly packed RGBA8 buffer into a WebP bitstream.
#[cfg_attr(test, mockall::automock)]
pub trait WebpEncode {
    fn encode(&self, rgba: &[u8], width: u32, height: u32, quality: f32) -> Result<Vec<u8>, EncoderFailure>;
}

/// Lossy libwebp encoder fed through its RGBA entry point (stride `width * 4`).
///
/// libwebp rejects quality outside 0..=100 and sides longer than 16383 px.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibWebpEncoder;

impl WebpEncode for LibWebpEncoder {
    fn encode(&self, rgba: &[u8], width: u32, height: u32, quality: f32) -> Result<Vec<u8>, EncoderFailure> {
        let encoder = webp::Encoder::from_rgba(rgba, width, height);
        encoder
            .encode_simple(false, quality)
            .map(|webp| webp.to_vec())
            .map_err(|e| EncoderFailure(format!("{:?}", e)))
    }
}

pub fn convert(request: &ConversionRequest) -> Result<ConversionOutcome, ConversionError> {
    convert_with(request, &LibWebpEncoder)
}

/// Decode, encode, write. The output path is not touched unless the first two
/// steps succeed; a failed write may leave a truncated file behind.
pub fn convert_with<E: WebpEncode + ?Sized>(
    request: &ConversionRequest,
    encoder: &E,
) -> Result<ConversionOutcome, ConversionError> {
    let rgba = load_image(&request.input).map_err(ConversionError::Decode)?;
    let (width, height) = rgba.dimensions();

    let encoded = encoder.encode(rgba.as_raw(), width, height, request.quality);
    drop(rgba);

    let webp_data = encoded.map_err(ConversionError::Encode)?;
    if webp_data.is_empty() {
        return Err(ConversionError::Encode(EncoderFailure("encoder produced no output".into())));
    }

    save_webp(&webp_data, &request.output)?;

    Ok(ConversionOutcome {
        width,
        height,
        bytes_written: webp_data.len(),
    })
}

// Format is sniffed from the file header so a misnamed PNG still loads.
fn load_image(path: &Path) -> Result<RgbaImage, ImageError> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img.to_rgba8())
}

fn save_webp(webp_data: &[u8], output_path: &Path) -> Result<(), ConversionError> {
    let mut file = File::create(output_path).map_err(ConversionError::WriteOpen)?;
    file.write_all(webp_data).map_err(ConversionError::WriteIo)?;
    file.flush().map_err(ConversionError::WriteIo)?;
    Ok(())
}
