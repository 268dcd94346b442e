use anyhow::Result;
use clap::{Parser, Subcommand};
use oidn_fetch_lib::config::{Config, ConfigOverrides};
use std::path::PathBuf;

use crate::commands::{assets::AssetsCommand, extract::ExtractCommand, fetch::FetchCommand};

#[derive(Parser)]
#[command(name = "oidn-fetch")]
#[command(about = "Download and unpack the latest Open Image Denoise release for this platform")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Owner of the GitHub repository (defaults to OpenImageDenoise)
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Name of the GitHub repository (defaults to oidn)
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Directory to download into and extract to (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Config for commands that download; creates the working directory.
    pub fn config(&self, strict: Option<bool>) -> Result<Config> {
        Config::setup(self.dir.as_deref(), self.overrides(strict))
    }

    /// Config that leaves the filesystem untouched.
    pub fn load_config(&self) -> Result<Config> {
        Config::load(self.dir.as_deref(), self.overrides(None))
    }

    fn overrides(&self, strict: Option<bool>) -> ConfigOverrides {
        ConfigOverrides {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            strict,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and extract the latest release for this platform (default)
    Fetch(FetchCommand),

    /// List the assets of the latest release
    #[command(alias = "ls")]
    Assets(AssetsCommand),

    /// Extract a local .tar, .tar.gz or .tgz archive
    Extract(ExtractCommand),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let command = self
            .command
            .unwrap_or_else(|| Commands::Fetch(FetchCommand::default()));
        match command {
            Commands::Fetch(cmd) => cmd.run(self.global_args).await,
            Commands::Assets(cmd) => cmd.run(self.global_args).await,
            Commands::Extract(cmd) => cmd.run(self.global_args).await,
        }
    }
}
