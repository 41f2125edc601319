use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use pkgtex_tex::{Texture, TextureContent, TextureFlags};
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// An input TEX file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let texture = Texture::parse(&data)?;
        let header = texture.header();

        let flags = [
            (TextureFlags::NO_INTERPOLATION, "no-interpolation"),
            (TextureFlags::CLAMP_UVS, "clamp-uvs"),
            (TextureFlags::IS_GIF, "gif"),
        ]
        .into_iter()
        .filter(|(flag, _)| header.flags.contains(*flag))
        .map(|(_, name)| name)
        .collect::<Vec<_>>();

        println!("{}", self.file.display().bold());
        println!("  format:    {}", header.format);
        println!("  flags:     {} [{}]", header.flags, flags.join(", "));
        println!(
            "  texture:   {}x{}",
            header.texture_width, header.texture_height
        );
        println!("  image:     {}x{}", header.image_width, header.image_height);
        println!("  container: TEXB{:04}", texture.version().number());
        println!(
            "  counts:    {} image(s), {} mip(s)",
            texture.image_count(),
            texture.mip_count()
        );

        let mip = texture.mip();
        println!(
            "  mip 0:     {}x{}, {} bytes{}",
            mip.width(),
            mip.height(),
            mip.data().len(),
            if mip.is_compressed() { " (lz4)" } else { "" }
        );

        let content = match texture.content() {
            TextureContent::Video(_) => "mp4 video".to_string(),
            TextureContent::Embedded(format, _) => format!("embedded {format} image"),
            TextureContent::Pixels { format, .. } => format!("{format} pixels"),
        };
        println!("  content:   {}", content.green());

        Ok(())
    }
}
