use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use pkgtex_pkg::PkgArchive;
use std::path::PathBuf;

#[derive(Args)]
pub struct ListArgs {
    /// An input PKG file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Print the entries as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let pkg = PkgArchive::new(&data)?;

        if self.json {
            let out = serde_json::to_string_pretty(pkg.entries()).into_diagnostic()?;
            println!("{out}");
            return Ok(());
        }

        println!("{} ({} entries)", pkg.magic().bold(), pkg.len());
        for entry in pkg.entries() {
            println!(
                "{:>10} {:>10}  {}",
                entry.offset.dimmed(),
                entry.size,
                entry.name
            );
        }
        Ok(())
    }
}
