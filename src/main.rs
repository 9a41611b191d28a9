//! vmsetup - Ubuntu VM provisioning

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vmsetup::commands::certs::CertMode;
use vmsetup::commands::runner::Session;
use vmsetup::commands::{self, NewAccount};
use vmsetup::config::AppConfig;
use vmsetup::paths;
use vmsetup::system::environment::Environment;
use vmsetup::system::release;

/// Ubuntu VM provisioning
#[derive(Parser)]
#[command(name = "vmsetup")]
#[command(version = "1.0.0")]
#[command(about = "Ubuntu VM provisioning - checklist workflows for desktop and server setup")]
struct Cli {
    /// Print each command, copy and directory instead of performing it
    #[arg(long, global = true, alias = "debug")]
    dry_run: bool,

    /// Configuration file (default: ~/.config/vmsetup/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install tools, programs and settings on a desktop VM
    Desktop,
    /// Create the working account on a new server instance
    ServerInit {
        /// Username for the new account
        #[arg(short, long)]
        user: String,
        /// Password for the new account
        #[arg(short, long)]
        passwd: String,
    },
    /// Set up vim and zsh on a server instance
    ServerConfigure,
    /// Create the working account on a new Multipass instance
    MultipassInit {
        /// Username for the new account
        #[arg(short, long)]
        user: String,
        /// Password for the new account
        #[arg(short, long)]
        passwd: String,
    },
    /// Install vim settings and colour schemes
    Vim,
    /// Install Docker and build the compose plugin
    Docker,
    /// Build and install the Docker compose plugin
    DockerCompose,
    /// Install pyenv and its build dependencies
    Pyenv,
    /// Update system packages and snaps
    Tuneup {
        /// Also pull the repository, upgrade installed pip tools and sync notebooks
        #[arg(short, long)]
        all: bool,
    },
    /// Install campus network certificates
    Certs {
        /// Where to apply the certificates
        #[arg(value_enum)]
        mode: CertMode,
    },
    /// Delete caches and junk files under ~/shares
    Cacheburn,
    /// Install the GitHub Desktop client
    GithubDesktop,
    /// Install jupyter, jupyter lab and pytest
    Pytools,
    /// Print an example configuration file
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = AppConfig::load(cli.config.as_deref());

    // Set up logging to file
    let log_dir = paths::data_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, paths::LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let level = loaded
        .as_ref()
        .map(|config| config.logging.level.as_str())
        .unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    // Load failures are logged only now that the subscriber exists
    let config = AppConfig::or_default(loaded);

    tracing::info!("vmsetup starting (dry run: {})", cli.dry_run);

    if let Commands::Config = cli.command {
        println!("# {}", paths::config_file_path().display());
        print!("{}", AppConfig::example_toml());
        return Ok(());
    }

    let env = Environment::from_config(&config, cli.dry_run)?;
    release::ensure_supported(env.min_release)?;
    let mut session = Session::new(&env)?;

    match cli.command {
        Commands::Desktop => commands::desktop::run(&mut session).await,
        Commands::ServerInit { user, passwd } => {
            commands::server::initialize(&mut session, &NewAccount { user, passwd }).await
        }
        Commands::ServerConfigure => commands::server::configure(&mut session).await,
        Commands::MultipassInit { user, passwd } => {
            commands::multipass::initialize(&mut session, &NewAccount { user, passwd }).await
        }
        Commands::Vim => commands::vim::run(&mut session).await,
        Commands::Docker => commands::docker::run(&mut session).await,
        Commands::DockerCompose => commands::docker::run_compose(&mut session).await,
        Commands::Pyenv => commands::pyenv::run(&mut session).await,
        Commands::Tuneup { all } => commands::tuneup::run(&mut session, all).await,
        Commands::Certs { mode } => commands::certs::run(&mut session, mode).await,
        Commands::Cacheburn => commands::cacheburn::run(&mut session).await,
        Commands::GithubDesktop => commands::github_desktop::run(&mut session).await,
        Commands::Pytools => commands::pytools::run(&mut session).await,
        Commands::Config => Ok(()),
    }
}
