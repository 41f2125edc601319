use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::export::{self, Export};

#[derive(Args)]
pub struct ConvertArgs {
    /// A TEX file or a directory to search for TEX files
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ConvertArgs {
    pub fn handle(&self) -> Result<()> {
        let (root, files) = if self.input.is_dir() {
            let files = WalkDir::new(&self.input)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| !e.file_type().is_dir() && export::is_texture(e.path()))
                .map(|e| e.into_path())
                .collect::<Vec<_>>();
            (self.input.as_path(), files)
        } else {
            let root = self.input.parent().unwrap_or(Path::new(""));
            (root, vec![self.input.clone()])
        };

        if files.is_empty() {
            return Err(miette!("no .tex files found in {}", self.input.display()));
        }

        let failed = files
            .par_iter()
            .map(|file| self.convert_file(root, file))
            .filter_map(|result| result.err())
            .inspect(|e| warn!("{e:?}"))
            .count();

        if failed > 0 {
            return Err(miette!("{failed} of {} textures failed", files.len()));
        }
        Ok(())
    }

    fn convert_file(&self, root: &Path, file: &Path) -> Result<()> {
        let data = std::fs::read(file)
            .into_diagnostic()
            .context(format!("path: {}", file.display()))?;
        let name = file.strip_prefix(root).into_diagnostic()?;

        let export = export::convert(name, &data);
        if let Export::Raw(_) = export {
            return Err(miette!("{} could not be converted", file.display()));
        }

        let written = export.write(&self.output.join(name), self.overwrite)?;
        info!("writing {}", written.display());
        Ok(())
    }
}
