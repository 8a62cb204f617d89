mod run;
mod status;

pub use run::RunCommand;
pub use status::StatusCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

use jobscope_core::config::JobscopeConfig;

/// jobscope - status dashboard for the job processing service
#[derive(Parser)]
#[command(name = "jobscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the dashboard server.
    Run(RunCommand),

    /// Print the projects table once and exit.
    Status(StatusCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(cmd) => cmd.execute().await,
            Commands::Status(cmd) => cmd.execute().await,
        }
    }
}

/// Load `path`, or defaults when it does not exist, then point the
/// upstream at `upstream` if given.
fn load_config(path: &str, upstream: Option<&str>) -> Result<JobscopeConfig> {
    let mut config = JobscopeConfig::load_or_default(path)?;
    if let Some(url) = upstream {
        config.upstream.base_url = url.to_string();
        config.validate()?;
    }
    Ok(config)
}
