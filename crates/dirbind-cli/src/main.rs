//! Dirbind - directory bind check
//!
//! Performs one simple bind against the configured directory and reports
//! whether the credentials were accepted.

use anyhow::Context;
use clap::{Parser, Subcommand};
use dirbind_auth::{ConnectionConfig, LdapSearchFactory};
use dirbind_core::{config::LoggingConfig, DirbindConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dirbind")]
#[command(author = "Dirbind Team")]
#[command(version = dirbind_core::VERSION)]
#[command(about = "Directory bind check", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory URL (ldap://, ldaps:// or ldapi://)
    #[arg(long, env = "DIRBIND_LDAP_URL", global = true)]
    url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DIRBIND_LOG_LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind to the directory as the given principal
    Bind {
        /// Principal to bind as, e.g. uid=alice,ou=people,dc=example,dc=com
        #[arg(short, long)]
        principal: String,

        /// Bind secret
        #[arg(long, env = "DIRBIND_BIND_SECRET", hide_env_values = true)]
        secret: String,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Version => {
            println!("dirbind {}", dirbind_core::VERSION);
        }
        Commands::Bind { principal, secret } => {
            let config = resolve_config(&cli)?;
            init_logging(&config.logging);
            run_bind(&config, principal, secret).await?;
        }
    }

    Ok(())
}

/// File or environment config, with command-line flags on top
fn resolve_config(cli: &Cli) -> anyhow::Result<DirbindConfig> {
    let mut config = match &cli.config {
        Some(path) => DirbindConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path))?,
        None => DirbindConfig::from_env(),
    };

    if let Some(url) = &cli.url {
        config.ldap.url = url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

async fn run_bind(config: &DirbindConfig, principal: &str, secret: &str) -> anyhow::Result<()> {
    let connection = ConnectionConfig::from(&config.ldap);
    let factory = LdapSearchFactory::new();

    match factory.create(&connection, principal, secret).await {
        Ok(handle) => {
            info!("Bind succeeded for {}", handle.principal());
            println!("OK: bound to {} as {}", connection.url(), handle.principal());
            handle
                .close()
                .await
                .context("releasing directory connection")?;
            Ok(())
        }
        // Cause is already in the log; keep the uniform message here
        Err(err) => anyhow::bail!("{}", err),
    }
}
