use anyhow::Result;
use clap::Parser;
use console::style;
use tracing::info;

use jobscope_core::config::JobscopeConfig;
use jobscope_runtime::{init_logging, DashboardServer};

use super::load_config;

/// Run the dashboard server.
#[derive(Parser)]
pub struct RunCommand {
    /// Configuration file path. Defaults apply when it does not exist.
    #[arg(short, long, default_value = "jobscope.toml")]
    pub config: String,

    /// Port to listen on (overrides config).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    pub host: Option<String>,

    /// Job service base URL (overrides config).
    #[arg(long)]
    pub upstream: Option<String>,

    /// Enable development mode (verbose logging).
    #[arg(long)]
    pub dev: bool,
}

impl RunCommand {
    /// The configuration with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<JobscopeConfig> {
        let mut config = load_config(&self.config, self.upstream.as_deref())?;
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        Ok(config)
    }

    /// Execute the run command.
    pub async fn execute(self) -> Result<()> {
        let config = self.resolve_config()?;
        init_logging(&config.observability, self.dev)?;

        println!();
        println!(
            "  {} v{}",
            style("jobscope").bold().cyan(),
            env!("CARGO_PKG_VERSION")
        );
        println!();
        println!(
            "  Dashboard at {}",
            style(format!(
                "http://{}:{}",
                config.server.host, config.server.port
            ))
            .cyan()
        );
        println!(
            "  Job service  {}",
            style(config.upstream.api_root()).cyan()
        );
        if self.dev {
            println!("  Development mode enabled");
        }
        println!();

        info!(config = %self.config, "Starting dashboard");

        let server = DashboardServer::new(config)?;
        server.run().await?;

        println!("\n  Goodbye!");

        Ok(())
    }
}
