pub mod pkg;
pub mod tex;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle PKG packages
    Pkg {
        #[command(subcommand)]
        command: pkg::PkgCommands,
    },
    /// Handle TEX textures
    Tex {
        #[command(subcommand)]
        command: tex::TexCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Pkg { command } => command.handle(),
            Commands::Tex { command } => command.handle(),
        }
    }
}
