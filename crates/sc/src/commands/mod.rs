pub mod decompress;
pub mod info;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Unwrap a compressed file, or every file in a directory
    Decompress(decompress::DecompressArgs),
    /// Show the layers of a compressed file without writing anything
    Info(info::InfoArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Decompress(decompress) => decompress.handle(),
            Commands::Info(info) => info.handle(),
        }
    }
}
