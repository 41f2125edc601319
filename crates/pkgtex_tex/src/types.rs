//! Base types for the structure of a TEX file.

use binrw::BinRead;
use derive_more::derive::Display;
use pkgtex_io::WireSize;

/// Largest accepted mip width or height
pub const MAX_DIMENSION: u32 = 16384;

/// Largest accepted decompressed payload (512 MiB)
pub const MAX_DECOMPRESSED_SIZE: i64 = 512 * 1024 * 1024;

/// Upper bound (exclusive) on the number of images in a container
pub const MAX_IMAGE_COUNT: i32 = 4096;

/// Upper bound (exclusive) on the number of mips in an image
pub const MAX_MIP_COUNT: i32 = 64;

/// GPU pixel encoding of the texture
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 4 bytes per pixel, R G B A
    #[display("RGBA8888")]
    Rgba8888,
    /// BC3, 16 bytes per 4x4 block
    #[display("DXT5")]
    Dxt5,
    /// BC2, 16 bytes per 4x4 block
    #[display("DXT3")]
    Dxt3,
    /// BC1, 8 bytes per 4x4 block
    #[display("DXT1")]
    Dxt1,
    /// 2 bytes per pixel, R G
    #[display("RG88")]
    Rg88,
    /// 1 byte per pixel
    #[display("R8")]
    R8,
    /// Any other code
    #[display("unknown ({_0})")]
    Unknown(i32),
}

impl From<i32> for TextureFormat {
    fn from(value: i32) -> Self {
        match value {
            0 => TextureFormat::Rgba8888,
            4 => TextureFormat::Dxt5,
            6 => TextureFormat::Dxt3,
            7 => TextureFormat::Dxt1,
            8 => TextureFormat::Rg88,
            9 => TextureFormat::R8,
            other => TextureFormat::Unknown(other),
        }
    }
}

impl From<TextureFormat> for i32 {
    fn from(value: TextureFormat) -> Self {
        match value {
            TextureFormat::Rgba8888 => 0,
            TextureFormat::Dxt5 => 4,
            TextureFormat::Dxt3 => 6,
            TextureFormat::Dxt1 => 7,
            TextureFormat::Rg88 => 8,
            TextureFormat::R8 => 9,
            TextureFormat::Unknown(code) => code,
        }
    }
}

/// Texture flag bits
#[derive(Debug, Display, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[display("{_0:#x}")]
pub struct TextureFlags(u32);

impl TextureFlags {
    /// Sample with nearest filtering
    pub const NO_INTERPOLATION: TextureFlags = TextureFlags(1);
    /// Clamp texture coordinates instead of wrapping
    pub const CLAMP_UVS: TextureFlags = TextureFlags(2);
    /// The texture is an animated sprite sheet converted from a GIF
    pub const IS_GIF: TextureFlags = TextureFlags(4);

    /// Wrap raw flag bits, unknown bits included
    pub const fn from_bits(bits: u32) -> Self {
        TextureFlags(bits)
    }

    /// The raw flag bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set
    pub const fn contains(self, other: TextureFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Standard image format of a payload embedded verbatim in the container
///
/// Codes follow the FreeImage numbering; `-1` means no embedded image.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// No embedded image, the payload is raw pixels
    #[display("unknown")]
    Unknown,
    /// Windows bitmap
    #[display("BMP")]
    Bmp,
    /// Windows icon
    #[display("ICO")]
    Ico,
    /// JPEG
    #[display("JPEG")]
    Jpeg,
    /// JPEG network graphics
    #[display("JNG")]
    Jng,
    /// PNG
    #[display("PNG")]
    Png,
    /// Truevision TGA
    #[display("TGA")]
    Targa,
    /// TIFF
    #[display("TIFF")]
    Tiff,
    /// DirectDraw surface
    #[display("DDS")]
    Dds,
    /// GIF
    #[display("GIF")]
    Gif,
    /// WebP
    #[display("WEBP")]
    Webp,
    /// MP4 video; never decoded
    #[display("MP4")]
    Mp4,
    /// Any other FreeImage code
    #[display("format {_0}")]
    Other(i32),
}

impl ImageFormat {
    /// File extension for writing the payload out as is
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Unknown => "tex",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Ico => "ico",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Jng => "jng",
            ImageFormat::Png => "png",
            ImageFormat::Targa => "tga",
            ImageFormat::Tiff => "tif",
            ImageFormat::Dds => "dds",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
            ImageFormat::Mp4 => "mp4",
            ImageFormat::Other(_) => "bin",
        }
    }
}

impl From<i32> for ImageFormat {
    fn from(value: i32) -> Self {
        match value {
            -1 => ImageFormat::Unknown,
            0 => ImageFormat::Bmp,
            1 => ImageFormat::Ico,
            2 => ImageFormat::Jpeg,
            3 => ImageFormat::Jng,
            13 => ImageFormat::Png,
            17 => ImageFormat::Targa,
            18 => ImageFormat::Tiff,
            24 => ImageFormat::Dds,
            25 => ImageFormat::Gif,
            34 => ImageFormat::Webp,
            35 => ImageFormat::Mp4,
            other => ImageFormat::Other(other),
        }
    }
}

/// TEX header
///
/// Follows the `TEXV0005` / `TEXI0001` magics. All data is stored in little
/// endian format.
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct TextureHeader {
    /// Pixel encoding of the mips
    #[br(map = |raw: i32| TextureFormat::from(raw))]
    pub format: TextureFormat,

    /// Flag bits
    #[br(map = |raw: i32| TextureFlags::from_bits(raw as u32))]
    pub flags: TextureFlags,

    /// Allocated texture width, usually rounded up to a power of two
    pub texture_width: i32,

    /// Allocated texture height, usually rounded up to a power of two
    pub texture_height: i32,

    /// Width of the meaningful image inside the texture
    pub image_width: i32,

    /// Height of the meaningful image inside the texture
    pub image_height: i32,

    /// Unidentified trailing field
    pub unknown: u32,
}

impl WireSize for TextureHeader {
    const WIRE_SIZE: usize = 7 * 4;
}

/// Image container layout, selected by the `TEXBnnnn` magic
///
/// Each variant carries exactly the fields its version stores between the
/// image count and the mip count.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContainerVersion {
    /// `TEXB0001`: uncompressed mips only
    V1,
    /// `TEXB0002`: mips may be LZ4 compressed
    V2,
    /// `TEXB0003`: adds the embedded image format
    V3 {
        /// Format of an embedded standard image
        image_format: ImageFormat,
    },
    /// `TEXB0004`: adds a video discriminator
    V4 {
        /// Format of an embedded standard image, [`ImageFormat::Mp4`] for video
        image_format: ImageFormat,
        /// Whether the producer flagged the payload as MP4 video
        is_video: bool,
    },
    /// Unrecognised version; read like [`ContainerVersion::V1`]
    Unknown(u32),
}

impl ContainerVersion {
    /// The numeric version, `0` when the magic could not be parsed
    pub fn number(&self) -> u32 {
        match self {
            ContainerVersion::V1 => 1,
            ContainerVersion::V2 => 2,
            ContainerVersion::V3 { .. } => 3,
            ContainerVersion::V4 { .. } => 4,
            ContainerVersion::Unknown(n) => *n,
        }
    }

    /// Whether mip records carry the LZ4 flag and decompressed size
    pub fn has_compression_fields(&self) -> bool {
        matches!(
            self,
            ContainerVersion::V2 | ContainerVersion::V3 { .. } | ContainerVersion::V4 { .. }
        )
    }

    /// The embedded standard image format, if the container declares one
    pub fn image_format(&self) -> Option<ImageFormat> {
        match self {
            ContainerVersion::V3 { image_format } | ContainerVersion::V4 { image_format, .. } => {
                Some(*image_format).filter(|f| *f != ImageFormat::Unknown)
            }
            _ => None,
        }
    }

    /// Whether the container declares an MP4 payload.
    ///
    /// The V4 video flag only promotes a payload to MP4 when no image format
    /// was declared; a declared image format wins.
    pub fn is_video(&self) -> bool {
        self.image_format() == Some(ImageFormat::Mp4)
    }
}
