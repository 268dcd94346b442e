use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::Result;
use clap::Args;
use oidn_fetch_lib::archive::extract_archive;
use std::path::PathBuf;

#[derive(Args)]
pub struct ExtractCommand {
    /// Archive to extract (.tar, .tar.gz or .tgz)
    pub file: PathBuf,
}

impl ExtractCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        // The destination is only created once the archive type is accepted.
        let config = global_args.load_config()?;

        let folders = extract_archive(&self.file, &config.work_dir)?;
        if folders.is_empty() {
            ui::warning("No folders were extracted.");
        } else {
            for folder in &folders {
                ui::success(&config.work_dir.join(folder).display().to_string());
            }
        }

        Ok(())
    }
}
