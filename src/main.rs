//! modinfo-service: account activation, JWT sessions and the module catalogue
//!
//! ```sh
//! # Run with default config (~/.config/modinfo-service/config.toml)
//! modinfo-service
//!
//! # Custom config path
//! modinfo-service --config /etc/modinfo-service/config.toml
//!
//! # Validate config without starting
//! modinfo-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use modinfo::config::{default_config_path, AppConfig};
use modinfo::server::{init_tracing, BoxError, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "modinfo-service",
    version,
    about = "User activation, role-gated REST API and module catalogue",
    long_about = "REST API with email-activated accounts, JWT sessions, \
                  USER/ADMIN roles and ModuleInfo CRUD.\n\n\
                  Default config: ~/.config/modinfo-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "MODINFO_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) if cli.check => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
        Some(e) => error!("Failed to load config: {}. Using defaults.", e),
    }

    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file     : {}", config_path.display());
        println!("   Listen address  : {}", config.server.address());
        println!("   Public base URL : {}", config.server.public_base_url);
        println!("   Database        : {}", config.database.url);
        println!("   Mail provider   : {:?}", config.mail.provider);
        println!("   Log level       : {}", config.logging.level);
        return Ok(());
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    handle.wait().await;
    Ok(())
}
