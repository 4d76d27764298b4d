use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::{OwoColorize, Stream::Stdout};
use sc_compression::{decompress::UNKNOWN_VERSION, Decompressor};
use std::{fmt::Write, path::PathBuf};

#[derive(Args)]
pub struct InfoArgs {
    /// An input file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("reading {}", self.file.display()))?;

        let unwrapped = Decompressor::default()
            .unpack(&data)
            .context(format!("decompressing {}", self.file.display()))?;
        let context = &unwrapped.context;

        let layers = context
            .layers()
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(" -> ");

        print_field("layers", &layers);

        if context.file_version() != UNKNOWN_VERSION {
            print_field("version", &format!("{:#010x}", context.file_version()));
        }

        if let Some(hash) = context.hash() {
            let mut hex = String::with_capacity(hash.len() * 2);
            for byte in hash {
                write!(hex, "{byte:02x}").into_diagnostic()?;
            }
            print_field("hash", &hex);
        }

        print_field("compressed", &format!("{} bytes", data.len()));
        print_field("decompressed", &format!("{} bytes", unwrapped.payload.len()));

        Ok(())
    }
}

fn print_field(name: &str, value: &str) {
    println!(
        "{:>12}: {}",
        name.if_supports_color(Stdout, |t| t.bold()),
        value
    );
}
