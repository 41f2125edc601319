use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use pkgtex_pkg::PkgArchive;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::export::{self, Export};

#[derive(Args)]
pub struct ExtractArgs {
    /// An input PKG file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Write textures as stored instead of converting them
    #[arg(long, default_value_t = false)]
    raw: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let pkg = PkgArchive::new(&data)?;

        let failed = (0..pkg.len())
            .into_par_iter()
            .map(|i| self.extract_entry(&pkg, i))
            .filter_map(|result| result.err())
            .inspect(|e| warn!("{e:?}"))
            .count();

        if failed > 0 {
            return Err(miette!("{failed} of {} entries failed", pkg.len()));
        }
        info!("extracted {} entries", pkg.len());
        Ok(())
    }

    fn extract_entry(&self, pkg: &PkgArchive, index: usize) -> Result<()> {
        let file = pkg.by_index(index)?;
        let name = file
            .enclosed_name()
            .ok_or(miette!("unsafe entry name {}", file.name()))?;

        let export = if !self.raw && export::is_texture(&name) {
            export::convert(&name, file.data())
        } else {
            Export::Raw(file.data())
        };

        let target = self.directory.join(&name);
        let written = export.write(&target, self.overwrite)?;
        info!("writing {}", relative(&written, &self.directory).display());
        Ok(())
    }
}

fn relative<'p>(path: &'p Path, base: &Path) -> &'p Path {
    path.strip_prefix(base).unwrap_or(path)
}
