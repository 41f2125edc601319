//! BC1 / BC2 / BC3 (DXT1 / DXT3 / DXT5) block decompression.
//!
//! Every format splits the image into 4x4 pixel blocks stored left to right,
//! top to bottom. The color half is shared:
//!
//! ```text
//! [0x00] color0   (u16 LE, 5:6:5)
//! [0x02] color1   (u16 LE, 5:6:5)
//! [0x04] indices  (u32 LE, 2 bits per pixel, pixel 0 in the low bits)
//! ```
//!
//! BC2 and BC3 prefix it with an 8-byte alpha half: sixteen explicit 4-bit
//! values for BC2, two 8-bit endpoints and sixteen 3-bit indices for BC3.

use byteorder::{ByteOrder, LittleEndian};

/// Bytes of a BC1 block
pub const BC1_BLOCK_SIZE: usize = 8;

/// Bytes of a BC2 block
pub const BC2_BLOCK_SIZE: usize = 16;

/// Bytes of a BC3 block
pub const BC3_BLOCK_SIZE: usize = 16;

/// Expand a 5:6:5 color to 8 bits per channel with `value * 255 / max`.
pub fn expand_565(color: u16) -> [u8; 3] {
    let r = (color >> 11) & 0x1F;
    let g = (color >> 5) & 0x3F;
    let b = color & 0x1F;

    [
        (r as u32 * 255 / 31) as u8,
        (g as u32 * 255 / 63) as u8,
        (b as u32 * 255 / 31) as u8,
    ]
}

/// Four-entry color palette of a block.
///
/// Entries 2 and 3 sit one and two thirds of the way from `color0` to
/// `color1`. The three-color punch-through mode is not used.
pub fn color_palette(color0: u16, color1: u16) -> [[u8; 3]; 4] {
    let c0 = expand_565(color0);
    let c1 = expand_565(color1);

    let mix = |a: u8, b: u8| ((2 * a as u32 + b as u32) / 3).min(255) as u8;

    [
        c0,
        c1,
        [mix(c0[0], c1[0]), mix(c0[1], c1[1]), mix(c0[2], c1[2])],
        [mix(c1[0], c0[0]), mix(c1[1], c0[1]), mix(c1[2], c0[2])],
    ]
}

/// Eight-entry alpha palette of a BC3 block.
pub fn alpha_palette(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let (a0, a1) = (alpha0 as u32, alpha1 as u32);
    let lerp = |num: u32, den: u32| ((a0 * (den - num) + a1 * num) / den) as u8;

    if alpha0 > alpha1 {
        [
            alpha0,
            alpha1,
            lerp(1, 7),
            lerp(2, 7),
            lerp(3, 7),
            lerp(4, 7),
            lerp(5, 7),
            lerp(6, 7),
        ]
    } else {
        [
            alpha0,
            alpha1,
            lerp(1, 5),
            lerp(2, 5),
            lerp(3, 5),
            lerp(4, 5),
            0,
            255,
        ]
    }
}

/// Decode the color half of a block into sixteen RGBA texels with alpha 255.
fn decode_color(block: &[u8]) -> [[u8; 4]; 16] {
    let palette = color_palette(
        LittleEndian::read_u16(&block[0..2]),
        LittleEndian::read_u16(&block[2..4]),
    );
    let indices = LittleEndian::read_u32(&block[4..8]);

    std::array::from_fn(|i| {
        let [r, g, b] = palette[((indices >> (2 * i)) & 0b11) as usize];
        [r, g, b, 255]
    })
}

/// Decode one 8-byte BC1 block.
pub fn decode_bc1_block(block: &[u8]) -> [[u8; 4]; 16] {
    decode_color(&block[..BC1_BLOCK_SIZE])
}

/// Decode one 16-byte BC2 block.
///
/// Each 4-bit alpha is widened with `value * 17`, which maps `0xF` to `255`.
pub fn decode_bc2_block(block: &[u8]) -> [[u8; 4]; 16] {
    let mut texels = decode_color(&block[8..BC2_BLOCK_SIZE]);
    let alpha = LittleEndian::read_u64(&block[0..8]);

    for (i, texel) in texels.iter_mut().enumerate() {
        texel[3] = ((alpha >> (4 * i)) & 0xF) as u8 * 17;
    }
    texels
}

/// Decode one 16-byte BC3 block.
pub fn decode_bc3_block(block: &[u8]) -> [[u8; 4]; 16] {
    let mut texels = decode_color(&block[8..BC3_BLOCK_SIZE]);
    let palette = alpha_palette(block[0], block[1]);
    let indices = LittleEndian::read_u48(&block[2..8]);

    for (i, texel) in texels.iter_mut().enumerate() {
        texel[3] = palette[((indices >> (3 * i)) & 0b111) as usize];
    }
    texels
}

/// Decode a whole image of blocks into a tightly packed RGBA8 buffer.
///
/// `data` must hold at least `ceil(width / 4) * ceil(height / 4)` blocks.
/// Texels of edge blocks that fall outside the image are dropped.
pub(crate) fn decode_blocks(
    data: &[u8],
    width: usize,
    height: usize,
    block_size: usize,
    decode_block: fn(&[u8]) -> [[u8; 4]; 16],
) -> Vec<u8> {
    let blocks_wide = width.div_ceil(4);
    let mut out = vec![0u8; width * height * 4];

    for (index, block) in data
        .chunks_exact(block_size)
        .take(blocks_wide * height.div_ceil(4))
        .enumerate()
    {
        let block_x = (index % blocks_wide) * 4;
        let block_y = (index / blocks_wide) * 4;
        let texels = decode_block(block);

        for (i, texel) in texels.iter().enumerate() {
            let x = block_x + i % 4;
            let y = block_y + i / 4;
            if x < width && y < height {
                let at = (y * width + x) * 4;
                out[at..at + 4].copy_from_slice(texel);
            }
        }
    }

    out
}
