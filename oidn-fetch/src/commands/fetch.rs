use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::{Context, Result};
use clap::Args;
use oidn_fetch_lib::fetcher::{FetchStatus, fetch_latest};
use oidn_fetch_lib::github::GitHubClient;

#[derive(Args, Default)]
pub struct FetchCommand {
    /// Fail instead of extracting when the download is shorter than advertised
    #[arg(long)]
    pub strict: bool,
}

impl FetchCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = global_args.config(self.strict.then_some(true))?;
        let github_client = GitHubClient::new(&config)?;

        let outcome = fetch_latest(&config, &github_client)
            .await
            .context(format!(
                "Failed to fetch the latest {}/{} release",
                config.owner, config.repo
            ))?;

        let folder_path = config.work_dir.join(&outcome.folder_name);
        match outcome.status {
            FetchStatus::AlreadyPresent => {
                ui::success(&format!("Already available: {}", folder_path.display()));
                ui::tip("Delete that folder to download the release again.");
            }
            FetchStatus::Downloaded => {
                ui::success(&format!("Unpacked to: {}", folder_path.display()));
                if !outcome.extracted_dirs.contains(&outcome.folder_name) {
                    ui::warning(&format!(
                        "The archive did not contain a '{}' folder.",
                        outcome.folder_name
                    ));
                }
            }
        }

        Ok(())
    }
}
