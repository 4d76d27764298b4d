use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use sc_compression::Decompressor;
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Args)]
pub struct DecompressArgs {
    /// An input file or directory
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// A target file, or a target directory when the input is a directory
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DecompressArgs {
    pub fn handle(&self) -> Result<()> {
        let decompressor = Decompressor::default();

        if !self.file.is_dir() {
            return self.decompress_file(&decompressor, &self.file, &self.output);
        }

        let files = WalkDir::new(&self.file)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("directory is empty"));
        }

        for file in files {
            let name = file.path().strip_prefix(&self.file).into_diagnostic()?;
            self.decompress_file(&decompressor, file.path(), &self.output.join(name))?;
        }

        Ok(())
    }

    fn decompress_file(
        &self,
        decompressor: &Decompressor,
        input: &Path,
        output: &Path,
    ) -> Result<()> {
        info!("decompressing {}", input.display());

        let data = std::fs::read(input)
            .into_diagnostic()
            .context(format!("reading {}", input.display()))?;

        let unwrapped = decompressor
            .unpack(&data)
            .context(format!("decompressing {}", input.display()))?;
        debug!(layers = ?unwrapped.context.layers(), "unwrapped {}", input.display());

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)
                .into_diagnostic()
                .context(format!("creating {}", parent.display()))?;
        }

        let mut out = if !self.overwrite {
            File::create_new(output)
                .into_diagnostic()
                .context(format!("creating {}", output.display()))?
        } else {
            File::create(output)
                .into_diagnostic()
                .context(format!("creating {}", output.display()))?
        };

        info!("writing {}", output.display());
        out.write_all(&unwrapped.payload)
            .into_diagnostic()
            .context(format!("writing {}", output.display()))?;

        Ok(())
    }
}
