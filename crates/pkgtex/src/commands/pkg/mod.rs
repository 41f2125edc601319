pub mod extract;
pub mod list;

#[derive(clap::Subcommand)]
pub enum PkgCommands {
    /// List the entries of a PKG file
    List(list::ListArgs),
    /// Extract a PKG file into a directory
    Extract(extract::ExtractArgs),
}

impl PkgCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            PkgCommands::List(list) => list.handle(),
            PkgCommands::Extract(extract) => extract.handle(),
        }
    }
}
