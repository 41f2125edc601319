//! Conversion of mip payloads into RGBA8 pixel buffers.

use derive_more::derive::Deref;
use tracing::{instrument, trace};

use crate::bc::{
    decode_bc1_block, decode_bc2_block, decode_bc3_block, decode_blocks, BC1_BLOCK_SIZE,
    BC2_BLOCK_SIZE, BC3_BLOCK_SIZE,
};
use crate::error::{Error, Result};
use crate::types::{TextureFormat, MAX_DIMENSION};

/// Row-major RGBA8 image without padding
///
/// Dereferences to the pixel bytes.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    #[deref]
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap `data` as a `width` x `height` image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if a dimension is outside
    /// `1..=MAX_DIMENSION` or `data` is not exactly `width * height * 4`
    /// bytes long.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;

        let expected = width as u64 * height as u64 * 4;
        if data.len() as u64 != expected {
            return Err(Error::InvalidFormat(format!(
                "{width}x{height} image needs {expected} bytes, got {}",
                data.len()
            )));
        }

        Ok(PixelBuffer {
            width,
            height,
            data,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The RGBA value at (`x`, `y`), or [`None`] outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(at..at + 4)?.try_into().ok()
    }

    /// Give up the pixel bytes
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    for (name, value) in [("width", width), ("height", height)] {
        if value == 0 || value > MAX_DIMENSION {
            return Err(Error::InvalidFormat(format!(
                "{name} {value} outside 1..={MAX_DIMENSION}"
            )));
        }
    }
    Ok(())
}

/// Minimum payload length of a `width` x `height` image in `format`
///
/// Returns [`None`] for formats without a decoder.
pub fn required_len(format: TextureFormat, width: u32, height: u32) -> Option<u64> {
    let (w, h) = (width as u64, height as u64);
    let blocks = w.div_ceil(4) * h.div_ceil(4);

    match format {
        TextureFormat::Rgba8888 => Some(w * h * 4),
        TextureFormat::Rg88 => Some(w * h * 2),
        TextureFormat::R8 => Some(w * h),
        TextureFormat::Dxt1 => Some(blocks * BC1_BLOCK_SIZE as u64),
        TextureFormat::Dxt3 => Some(blocks * BC2_BLOCK_SIZE as u64),
        TextureFormat::Dxt5 => Some(blocks * BC3_BLOCK_SIZE as u64),
        TextureFormat::Unknown(_) => None,
    }
}

/// Decode `data` holding a `width` x `height` image in `format`.
///
/// Trailing bytes past the required length are ignored.
///
/// # Errors
///
/// - [`Error::InvalidFormat`] if a dimension is outside `1..=MAX_DIMENSION`
/// - [`Error::UnsupportedFormat`] for [`TextureFormat::Unknown`]
/// - [`Error::InsufficientData`] if `data` is too short for the dimensions
#[instrument(skip(data), fields(len = data.len()), err)]
pub fn decode(format: TextureFormat, data: &[u8], width: u32, height: u32) -> Result<PixelBuffer> {
    check_dimensions(width, height)?;

    let needed = required_len(format, width, height).ok_or(Error::UnsupportedFormat(format))?;
    if (data.len() as u64) < needed {
        return Err(Error::InsufficientData {
            needed,
            actual: data.len(),
        });
    }
    let data = &data[..needed as usize];
    let (w, h) = (width as usize, height as usize);

    let pixels = match format {
        TextureFormat::Rgba8888 => data.to_vec(),
        TextureFormat::R8 => data.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        TextureFormat::Rg88 => data
            .chunks_exact(2)
            .flat_map(|rg| [rg[0], rg[1], 0, 255])
            .collect(),
        TextureFormat::Dxt1 => decode_blocks(data, w, h, BC1_BLOCK_SIZE, decode_bc1_block),
        TextureFormat::Dxt3 => decode_blocks(data, w, h, BC2_BLOCK_SIZE, decode_bc2_block),
        TextureFormat::Dxt5 => decode_blocks(data, w, h, BC3_BLOCK_SIZE, decode_bc3_block),
        TextureFormat::Unknown(_) => return Err(Error::UnsupportedFormat(format)),
    };

    trace!(%format, width, height, "pixels decoded");
    PixelBuffer::from_raw(width, height, pixels)
}
