//! Parsing of the TEX container down to its first mip.

use std::borrow::Cow;

use pkgtex_io::ByteCursor;
use tracing::{debug, instrument, trace};

use crate::error::{Error, Result};
use crate::lz4;
use crate::pixel::{self, PixelBuffer};
use crate::types::{
    ContainerVersion, ImageFormat, TextureFormat, TextureHeader, MAX_DIMENSION, MAX_IMAGE_COUNT,
    MAX_MIP_COUNT,
};

/// Magic opening every texture
pub const TEXTURE_MAGIC: &str = "TEXV0005";

/// Magic preceding the header
pub const INFO_MAGIC: &str = "TEXI0001";

/// Prefix of the container magic, followed by a four digit version
pub const CONTAINER_MAGIC_PREFIX: &str = "TEXB";

/// Longest magic string read
pub const MAX_MAGIC_LEN: usize = 16;

/// Read a magic stored either null terminated or behind an `i32` length.
///
/// A leading `i32` in `0..=MAX_MAGIC_LEN` is taken as a length; any ASCII
/// magic read as an `i32` is far larger.
fn read_magic<'a>(cursor: &mut ByteCursor<'a>) -> pkgtex_io::Result<&'a str> {
    match cursor.peek_i32() {
        Ok(len) if (0..=MAX_MAGIC_LEN as i32).contains(&len) => {
            cursor.read_length_prefixed_string(MAX_MAGIC_LEN)
        }
        _ => cursor.read_null_terminated_string(MAX_MAGIC_LEN),
    }
}

/// Version number of a `TEXBnnnn` magic, `0` when it does not parse
fn version_number(magic: &str) -> u32 {
    magic
        .strip_prefix(CONTAINER_MAGIC_PREFIX)
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

/// Read an `i32` count that must lie in `1..max`
fn read_count(cursor: &mut ByteCursor, what: &str, max: i32) -> Result<u32> {
    let count = cursor.read_i32()?;
    if count <= 0 || count >= max {
        return Err(Error::InvalidFormat(format!(
            "{what} count {count} outside 1..{max}"
        )));
    }
    Ok(count as u32)
}

fn mip_dimension(what: &str, value: i32) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| (1..=MAX_DIMENSION).contains(v))
        .ok_or_else(|| {
            Error::InvalidFormat(format!("mip {what} {value} outside 1..={MAX_DIMENSION}"))
        })
}

/// Read the fields a container version stores between the image and mip counts.
fn read_version_fields(cursor: &mut ByteCursor, number: u32) -> Result<ContainerVersion> {
    let version = match number {
        1 => ContainerVersion::V1,
        2 => ContainerVersion::V2,
        3 => ContainerVersion::V3 {
            image_format: ImageFormat::from(cursor.read_i32()?),
        },
        4 => {
            let image_format = ImageFormat::from(cursor.read_i32()?);
            let is_video = cursor.read_i32()? != 0;

            ContainerVersion::V4 {
                image_format: match image_format {
                    ImageFormat::Unknown if is_video => ImageFormat::Mp4,
                    other => other,
                },
                is_video,
            }
        }
        other => ContainerVersion::Unknown(other),
    };
    Ok(version)
}

/// Payload of a single mip level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipPayload<'a> {
    width: u32,
    height: u32,
    compressed: bool,
    data: Cow<'a, [u8]>,
}

impl<'a> MipPayload<'a> {
    /// Read a mip record laid out for `version`, decompressing it if needed.
    fn read(cursor: &mut ByteCursor<'a>, version: &ContainerVersion) -> Result<Self> {
        let width = cursor.read_i32()?;
        let height = cursor.read_i32()?;

        let compression = if version.has_compression_fields() {
            let is_compressed = cursor.read_i32()? == 1;
            let decompressed_size = cursor.read_i32()?;
            Some((is_compressed, decompressed_size))
        } else {
            None
        };

        let len = cursor.read_i32()?;
        let len = usize::try_from(len)
            .ok()
            .filter(|len| *len <= cursor.remaining())
            .ok_or_else(|| {
                Error::InvalidFormat(format!(
                    "mip length {len} outside 0..={}",
                    cursor.remaining()
                ))
            })?;
        let block = cursor.read_fixed_bytes(len)?;

        let width = mip_dimension("width", width)?;
        let height = mip_dimension("height", height)?;

        let (compressed, data) = match compression {
            Some((true, size)) => (true, Cow::Owned(lz4::decompress(block, size as i64)?)),
            _ => (false, Cow::Borrowed(block)),
        };

        trace!(width, height, compressed, len = data.len(), "mip read");
        Ok(MipPayload {
            width,
            height,
            compressed,
            data,
        })
    }

    /// Mip width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mip height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the payload was stored LZ4 compressed
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// The payload, decompressed
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// What the first mip of a texture holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureContent<'t> {
    /// An MP4 stream
    Video(&'t [u8]),
    /// A complete image in a standard format
    Embedded(ImageFormat, &'t [u8]),
    /// GPU pixel data to decode
    Pixels {
        /// Pixel encoding from the header
        format: TextureFormat,
        /// Mip width in pixels
        width: u32,
        /// Mip height in pixels
        height: u32,
        /// Decompressed mip bytes
        data: &'t [u8],
    },
}

/// A parsed TEX texture
///
/// Only the first mip of the first image is read; later images and mips are
/// never visited.
#[derive(Debug, Clone)]
pub struct Texture<'a> {
    header: TextureHeader,
    version: ContainerVersion,
    image_count: u32,
    mip_count: u32,
    mip: MipPayload<'a>,
}

impl<'a> Texture<'a> {
    /// Parse a texture from `bytes`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotATexture`] if the leading magics are missing
    /// - [`Error::InvalidFormat`] for out of range sizes, counts or dimensions
    /// - [`Error::DecompressionFailed`] if an LZ4 payload does not decode
    /// - [`Error::Cursor`] if the data ends early
    #[instrument(skip(bytes), fields(len = bytes.len()), err)]
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);

        for expected in [TEXTURE_MAGIC, INFO_MAGIC] {
            match read_magic(&mut cursor) {
                Ok(magic) if magic == expected => {}
                _ => return Err(Error::NotATexture),
            }
        }

        let header: TextureHeader = cursor.read_le()?;
        if header.texture_width <= 0 || header.texture_height <= 0 {
            return Err(Error::InvalidFormat(format!(
                "texture size {}x{}",
                header.texture_width, header.texture_height
            )));
        }

        let number = version_number(read_magic(&mut cursor)?);
        let image_count = read_count(&mut cursor, "image", MAX_IMAGE_COUNT)?;
        let version = read_version_fields(&mut cursor, number)?;
        debug!(?version, format = %header.format, image_count, "texture container");

        let mip_count = read_count(&mut cursor, "mip", MAX_MIP_COUNT)?;
        let mip = MipPayload::read(&mut cursor, &version)?;

        Ok(Texture {
            header,
            version,
            image_count,
            mip_count,
            mip,
        })
    }

    /// The fixed header following the magics
    pub fn header(&self) -> &TextureHeader {
        &self.header
    }

    /// The container layout and its version fields
    pub fn version(&self) -> ContainerVersion {
        self.version
    }

    /// Number of images the container declares
    pub fn image_count(&self) -> u32 {
        self.image_count
    }

    /// Number of mips the first image declares
    pub fn mip_count(&self) -> u32 {
        self.mip_count
    }

    /// The first mip of the first image
    pub fn mip(&self) -> &MipPayload<'a> {
        &self.mip
    }

    /// Classify the payload.
    ///
    /// Video wins over an embedded image: either the container says so or
    /// the payload carries an MP4 `ftyp` box.
    pub fn content(&self) -> TextureContent<'_> {
        let data = self.mip.data();

        if self.version.is_video() || data.get(4..8) == Some(b"ftyp".as_slice()) {
            TextureContent::Video(data)
        } else if let Some(format) = self.version.image_format() {
            TextureContent::Embedded(format, data)
        } else {
            TextureContent::Pixels {
                format: self.header.format,
                width: self.mip.width,
                height: self.mip.height,
                data,
            }
        }
    }

    /// Decode the first mip to RGBA8.
    ///
    /// # Errors
    ///
    /// [`Error::Video`] and [`Error::EmbeddedImage`] for payloads that are not
    /// GPU pixel data, otherwise anything [`pixel::decode`] returns.
    pub fn decode(&self) -> Result<PixelBuffer> {
        match self.content() {
            TextureContent::Video(_) => Err(Error::Video),
            TextureContent::Embedded(format, _) => Err(Error::EmbeddedImage(format)),
            TextureContent::Pixels {
                format,
                width,
                height,
                data,
            } => pixel::decode(format, data, width, height),
        }
    }
}

/// Outcome of decoding a texture end to end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedTexture {
    /// GPU pixel data decoded to RGBA8
    Image(PixelBuffer),
    /// A standard image to pass through as is
    Embedded {
        /// Declared image format, which picks the file extension
        format: ImageFormat,
        /// The image file bytes
        data: Vec<u8>,
    },
    /// An MP4 stream to pass through as is
    Video(Vec<u8>),
}

/// Parse `bytes` as a texture and decode whatever it holds.
///
/// Unlike [`Texture::decode`], embedded images and video are successful
/// outcomes here.
pub fn decode_texture(bytes: &[u8]) -> Result<DecodedTexture> {
    let texture = Texture::parse(bytes)?;

    let decoded = match texture.content() {
        TextureContent::Video(data) => DecodedTexture::Video(data.to_vec()),
        TextureContent::Embedded(format, data) => DecodedTexture::Embedded {
            format,
            data: data.to_vec(),
        },
        TextureContent::Pixels {
            format,
            width,
            height,
            data,
        } => DecodedTexture::Image(pixel::decode(format, data, width, height)?),
    };
    Ok(decoded)
}
