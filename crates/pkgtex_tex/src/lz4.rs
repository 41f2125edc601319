//! LZ4 decompression of mip payloads.
//!
//! Texture producers disagree on how a compressed mip is wrapped: some write a
//! bare LZ4 block, some an LZ4 frame, and either may carry a leading `u32`
//! size prefix. Nothing in the container says which, so [`decompress`] tries
//! each framing in turn and keeps the first result whose length matches the
//! size the container declared.

use std::io::Read;

use lz4_flex::frame::FrameDecoder;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::types::MAX_DECOMPRESSED_SIZE;

/// How the compressed bytes are wrapped
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Framing {
    /// A bare LZ4 block
    Block,
    /// An LZ4 frame (magic `0x184D2204`)
    Frame,
}

/// One framing hypothesis: a wrapper and a number of leading bytes to skip
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Strategy {
    /// Wrapper to decode
    pub framing: Framing,
    /// Leading bytes to drop first
    pub skip: usize,
}

/// Hypotheses in the order they are tried; bare blocks are the common case.
pub const STRATEGIES: [Strategy; 4] = [
    Strategy {
        framing: Framing::Block,
        skip: 0,
    },
    Strategy {
        framing: Framing::Frame,
        skip: 0,
    },
    Strategy {
        framing: Framing::Block,
        skip: 4,
    },
    Strategy {
        framing: Framing::Frame,
        skip: 4,
    },
];

impl Strategy {
    /// Decode `data` under this hypothesis.
    ///
    /// Returns [`None`] if decoding fails or the output length differs from
    /// `expected`.
    pub fn apply(&self, data: &[u8], expected: usize) -> Option<Vec<u8>> {
        let input = data.get(self.skip..)?;

        let output = match self.framing {
            Framing::Block => lz4_flex::block::decompress(input, expected).ok()?,
            Framing::Frame => {
                let mut output = Vec::with_capacity(expected);
                // One byte of slack tells an overlong stream from an exact one.
                FrameDecoder::new(input)
                    .take(expected as u64 + 1)
                    .read_to_end(&mut output)
                    .ok()?;
                output
            }
        };

        trace!(strategy = ?self, produced = output.len(), expected, "lz4 attempt");
        (output.len() == expected).then_some(output)
    }
}

/// Decompress `data` to exactly `expected_size` bytes.
///
/// `expected_size` must lie in `1..=512 MiB`, otherwise
/// [`Error::InvalidFormat`] is returned before anything is decoded. When no
/// framing yields exactly `expected_size` bytes the result is
/// [`Error::DecompressionFailed`]; a shorter or longer buffer is never
/// returned.
pub fn decompress(data: &[u8], expected_size: i64) -> Result<Vec<u8>> {
    if expected_size <= 0 || expected_size > MAX_DECOMPRESSED_SIZE {
        return Err(Error::InvalidFormat(format!(
            "decompressed size {expected_size} outside 1..={MAX_DECOMPRESSED_SIZE}"
        )));
    }
    let expected = expected_size as usize;

    STRATEGIES
        .iter()
        .find_map(|strategy| {
            let output = strategy.apply(data, expected)?;
            debug!(?strategy, expected, "lz4 payload decoded");
            Some(output)
        })
        .ok_or(Error::DecompressionFailed { expected })
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use lz4_flex::frame::FrameEncoder;
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::lz4::{decompress, Framing, Strategy, STRATEGIES};

    fn sample() -> Vec<u8> {
        (0..4096u32).map(|i| (i % 251) as u8 ^ (i / 64) as u8).collect()
    }

    fn frame(data: &[u8]) -> Vec<u8> {
        let mut encoder = FrameEncoder::new(Vec::new());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn raw_block() -> Result<()> {
        let data = sample();
        let compressed = lz4_flex::block::compress(&data);

        assert_eq!(decompress(&compressed, data.len() as i64)?, data);

        Ok(())
    }

    #[test]
    fn size_prefixed_block() -> Result<()> {
        let data = sample();
        let compressed = lz4_flex::block::compress_prepend_size(&data);

        assert_eq!(decompress(&compressed, data.len() as i64)?, data);

        Ok(())
    }

    #[test]
    fn framed() -> Result<()> {
        let data = sample();
        let compressed = frame(&data);

        assert_eq!(decompress(&compressed, data.len() as i64)?, data);

        Ok(())
    }

    #[test]
    fn size_prefixed_frame() -> Result<()> {
        let data = sample();
        let mut compressed = (data.len() as u32).to_le_bytes().to_vec();
        compressed.extend(frame(&data));

        assert_eq!(decompress(&compressed, data.len() as i64)?, data);

        Ok(())
    }

    #[test]
    fn size_mismatch_fails() {
        let data = sample();
        let compressed = lz4_flex::block::compress(&data);

        for expected in [data.len() as i64 - 1, data.len() as i64 + 1, 16] {
            assert!(matches!(
                decompress(&compressed, expected),
                Err(Error::DecompressionFailed { .. })
            ));
        }
    }

    #[test]
    fn out_of_range_size_rejected_up_front() {
        for expected in [-1, 0, 512 * 1024 * 1024 + 1, i64::MAX] {
            assert!(matches!(
                decompress(&[0x00], expected),
                Err(Error::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn garbage_fails() {
        let garbage = [0xFFu8; 64];
        assert!(decompress(&garbage, 1024).is_err());
        assert!(decompress(&[], 1).is_err());
    }

    #[test]
    fn strategy_order() {
        assert_eq!(
            STRATEGIES.map(|s| (s.framing, s.skip)),
            [
                (Framing::Block, 0),
                (Framing::Frame, 0),
                (Framing::Block, 4),
                (Framing::Frame, 4),
            ]
        );
    }

    #[test]
    fn skip_past_end() {
        let strategy = Strategy {
            framing: Framing::Block,
            skip: 4,
        };
        assert_eq!(strategy.apply(&[0x10, 0x00], 1), None);
    }
}
