pub mod convert;
pub mod info;

#[derive(clap::Subcommand)]
pub enum TexCommands {
    /// Convert TEX files to PNG
    Convert(convert::ConvertArgs),
    /// Describe a TEX file
    Info(info::InfoArgs),
}

impl TexCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            TexCommands::Convert(convert) => convert.handle(),
            TexCommands::Info(info) => info.handle(),
        }
    }
}
