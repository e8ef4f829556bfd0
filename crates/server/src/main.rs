use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

use config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "toolhub")]
#[command(about = "Demonstration server for resources and tools", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "TOOLHUB_CONFIG", default_value = "toolhub.toml")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "TOOLHUB_PORT", default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "TOOLHUB_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Log output format
    #[arg(long, env = "TOOLHUB_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("toolhub=info,tower_http=debug"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_line_number(true))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    tracing::info!(
        "Starting Toolhub {} (config: {})",
        env!("CARGO_PKG_VERSION"),
        args.config.display()
    );

    let config = ServerConfig::load(&args.config)?;

    let addr = format!("{}:{}", args.host, args.port);
    api::serve(&addr, config).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["toolhub"]).unwrap();
        assert_eq!(args.port, 8080);
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.log_format, LogFormat::Text);
    }

    #[test]
    fn test_json_log_format() {
        let args = Args::try_parse_from(["toolhub", "--log-format", "json", "-p", "9000"]).unwrap();
        assert_eq!(args.log_format, LogFormat::Json);
        assert_eq!(args.port, 9000);
    }
}
