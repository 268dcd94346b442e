use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use oidn_fetch_lib::download_client::ReleaseClient;
use oidn_fetch_lib::fetcher::select_asset;
use oidn_fetch_lib::github::{GitHubClient, GitHubRelease, ReleaseAsset};

#[derive(Args)]
pub struct AssetsCommand {}

impl AssetsCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = global_args.load_config()?;
        let github_client = GitHubClient::new(&config)?;
        let release = github_client
            .latest_release(&config.owner, &config.repo)
            .await?;

        ui::info(&release_heading(&release));

        let selected = match select_asset(&release, &config.os) {
            Ok(asset) => Some(asset),
            Err(e) => {
                ui::warning(&e.to_string());
                None
            }
        };
        for asset in &release.assets {
            let is_selected = selected.is_some_and(|s| s.name == asset.name);
            ui::info(&asset_line(asset, is_selected));
        }

        tracing::info!("");
        ui::tip("Run `oidn-fetch` to download and unpack the marked asset.");
        Ok(())
    }
}

fn release_heading(release: &GitHubRelease) -> String {
    let mut heading = format!("{}", release.display_name().cyan().bold());
    if release.display_name() != release.tag_name {
        heading.push_str(&format!(" ({})", release.tag_name));
    }
    if let Some(published) = release.published_at {
        let local = published.with_timezone(&chrono::Local);
        heading.push_str(&format!(
            " {} {}",
            "published".dimmed(),
            local.format("%Y-%m-%d")
        ));
    }
    heading
}

fn asset_line(asset: &ReleaseAsset, selected: bool) -> String {
    let size = format!("({})", ui::format_size(asset.size));
    if selected {
        format!("{} {} {}", "→".green(), asset.name.green().bold(), size.dimmed())
    } else {
        format!("  {} {}", asset.name, size.dimmed())
    }
}
