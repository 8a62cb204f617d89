//! Logging setup.

use tracing_subscriber::EnvFilter;

use jobscope_core::config::ObservabilityConfig;
use jobscope_core::error::{JobscopeError, Result};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Development mode
/// turns on debug output for jobscope's own crates and always logs as text.
pub fn init_logging(config: &ObservabilityConfig, dev: bool) -> Result<()> {
    let directives = default_directives(config, dev);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directives))
        .map_err(|e| {
            JobscopeError::Config(format!("Invalid log level {:?}: {}", directives, e))
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(dev);

    let result = if config.json_logs && !dev {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| JobscopeError::Internal(format!("Failed to initialise logging: {}", e)))
}

fn default_directives(config: &ObservabilityConfig, dev: bool) -> String {
    if dev {
        format!(
            "{},jobscope=debug,jobscope_core=debug,jobscope_runtime=debug",
            config.log_level
        )
    } else {
        config.log_level.clone()
    }
}
