//! This library decodes **TEX** textures, as found inside **PKG** packages,
//! into RGBA8 pixel buffers.
//!
//! # TEX Format Documentation
//!
//! A texture is a sequence of magic strings and little-endian fields. Magic
//! strings are usually null terminated; some producers write them behind an
//! `i32` length instead, and both are accepted.
//!
//! ## File Structure
//!
//! | Field            | Description                                                      |
//! |------------------|------------------------------------------------------------------|
//! | Magic            | `TEXV0005`                                                       |
//! | Magic            | `TEXI0001`                                                       |
//! | Header           | 28 bytes, see below                                              |
//! | Container magic  | `TEXBnnnn`, `nnnn` is the container version                      |
//! | Image count      | 4 bytes: `i32` in `1..4096`                                      |
//! | Version fields   | Depends on the container version, see below                      |
//! | Mip count        | 4 bytes: `i32` in `1..64`                                        |
//! | Mips             | Mip count records, largest first                                 |
//!
//! ### Header
//!
//! | Offset (bytes) | Field          | Description                                         |
//! |----------------|----------------|-----------------------------------------------------|
//! | 0x0000         | Format         | 4 bytes: pixel format, see below                    |
//! | 0x0004         | Flags          | 4 bytes: `1` no interpolation, `2` clamp UVs, `4` GIF |
//! | 0x0008         | Texture width  | 4 bytes: `i32 > 0`                                  |
//! | 0x000C         | Texture height | 4 bytes: `i32 > 0`                                  |
//! | 0x0010         | Image width    | 4 bytes: `i32`                                      |
//! | 0x0014         | Image height   | 4 bytes: `i32`                                      |
//! | 0x0018         | Unknown        | 4 bytes                                             |
//!
//! ### Version Fields
//!
//! | Version | Fields                                                                    |
//! |---------|---------------------------------------------------------------------------|
//! | 1       | none                                                                      |
//! | 2       | none                                                                      |
//! | 3       | `i32` image format (FreeImage code, `-1` for none)                        |
//! | 4       | `i32` image format, `i32` video flag; `-1` with the flag set means MP4    |
//!
//! ### Mip
//!
//! | Field             | Versions | Description                                      |
//! |-------------------|----------|--------------------------------------------------|
//! | Width             | all      | 4 bytes: `i32` in `1..=16384`                    |
//! | Height            | all      | 4 bytes: `i32` in `1..=16384`                    |
//! | Compressed        | 2, 3, 4  | 4 bytes: `1` if the data is LZ4 compressed       |
//! | Decompressed size | 2, 3, 4  | 4 bytes: `i32` in `1..=512 MiB` when compressed  |
//! | Length            | all      | 4 bytes: `i32` length of the data                |
//! | Data              | all      | Length bytes                                     |
//!
//! ### Pixel Formats
//!
//! | Code | Format   | Layout                                   |
//! |------|----------|------------------------------------------|
//! | 0    | RGBA8888 | 4 bytes per pixel                        |
//! | 4    | DXT5     | BC3, 16 bytes per 4x4 block              |
//! | 6    | DXT3     | BC2, 16 bytes per 4x4 block              |
//! | 7    | DXT1     | BC1, 8 bytes per 4x4 block               |
//! | 8    | RG88     | 2 bytes per pixel                        |
//! | 9    | R8       | 1 byte per pixel                         |
//!
//! When the container declares an image format the mip data is a complete
//! PNG, JPEG or similar file and the pixel format does not apply. A mip whose
//! data carries an MP4 `ftyp` box at offset 4 is treated as video whatever
//! the container says.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.tex`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod bc;
pub mod container;
pub mod error;
pub mod lz4;
pub mod pixel;
pub mod types;

pub use container::{decode_texture, DecodedTexture, MipPayload, Texture, TextureContent};
pub use error::{Error, ErrorClass, Result};
pub use pixel::PixelBuffer;
pub use types::{ContainerVersion, ImageFormat, TextureFlags, TextureFormat, TextureHeader};
