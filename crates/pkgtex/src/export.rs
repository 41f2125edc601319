//! Turning package entries and texture files into files on disk.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder};
use miette::{Context, IntoDiagnostic, Result};
use pkgtex_tex::{decode_texture, DecodedTexture, PixelBuffer};
use tracing::{debug, warn};

/// What gets written for one input
#[derive(Debug)]
pub enum Export<'a> {
    /// Decoded pixels, written as PNG
    Png(PixelBuffer),
    /// An embedded image or video, written under its own extension
    Passthrough {
        /// File extension for the format, without the dot
        extension: &'static str,
        /// The bytes to write
        data: Vec<u8>,
    },
    /// The input bytes unchanged
    Raw(&'a [u8]),
}

/// Whether `name` looks like a texture
pub fn is_texture(name: &Path) -> bool {
    name.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tex"))
}

/// Convert texture bytes, falling back to the raw bytes on any failure.
pub fn convert<'a>(name: &Path, data: &'a [u8]) -> Export<'a> {
    match decode_texture(data) {
        Ok(DecodedTexture::Image(image)) => Export::Png(image),
        Ok(DecodedTexture::Embedded { format, data }) => Export::Passthrough {
            extension: format.extension(),
            data,
        },
        Ok(DecodedTexture::Video(data)) => Export::Passthrough {
            extension: "mp4",
            data,
        },
        Err(e) if e.is_unsupported() => {
            debug!(name = %name.display(), error = %e, "keeping raw bytes");
            Export::Raw(data)
        }
        Err(e) => {
            warn!(name = %name.display(), error = %e, "texture failed to decode, keeping raw bytes");
            Export::Raw(data)
        }
    }
}

/// Create `path` and its parent directories.
pub fn create_file(path: &Path, overwrite: bool) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .into_diagnostic()
            .context(format!("creating {}", parent.display()))?;
    }

    if !overwrite {
        File::create_new(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    } else {
        File::create(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    }
}

impl Export<'_> {
    /// The path this export is written to, given the input's target path
    pub fn target(&self, path: &Path) -> PathBuf {
        match self {
            Export::Png(_) => path.with_extension("png"),
            Export::Passthrough { extension, .. } => path.with_extension(extension),
            Export::Raw(_) => path.to_path_buf(),
        }
    }

    /// Write the export next to `path`, returning the file written.
    pub fn write(&self, path: &Path, overwrite: bool) -> Result<PathBuf> {
        let target = self.target(path);
        let mut out = BufWriter::new(create_file(&target, overwrite)?);

        let written = match self {
            Export::Png(image) => PngEncoder::new(&mut out)
                .write_image(image, image.width(), image.height(), ExtendedColorType::Rgba8)
                .into_diagnostic(),
            Export::Passthrough { data, .. } => out.write_all(data).into_diagnostic(),
            Export::Raw(data) => out.write_all(data).into_diagnostic(),
        };
        written
            .and_then(|()| out.flush().into_diagnostic())
            .context(format!("writing {}", target.display()))?;

        Ok(target)
    }
}
