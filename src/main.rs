//! CLI entry point for gsoc-dash

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gsoc_dash::editor::EditSession;
use gsoc_dash::github::{ContentClient, DEFAULT_API_URL};

#[derive(Parser)]
#[command(name = "gsoc-dash")]
#[command(version)]
#[command(about = "A GSoC progress dashboard with GitHub stats and in-place editing", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new dashboard site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Load data from a deployed dashboard instead of the local files
        #[arg(long)]
        from: Option<String>,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Render edit forms and save changes to GitHub
        #[arg(short, long)]
        editable: bool,

        /// GitHub API endpoint
        #[arg(long, default_value = DEFAULT_API_URL)]
        api_url: String,
    },

    /// Fetch GitHub stats into data/github-contributions.json
    Fetch {
        /// GitHub API endpoint
        #[arg(long, default_value = DEFAULT_API_URL)]
        api_url: String,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "gsoc_dash=debug,info"
    } else {
        "gsoc_dash=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    // Tokens may live in the site's .env
    if let Err(e) = dotenvy::from_path(base_dir.join(".env")) {
        tracing::debug!("No .env loaded: {}", e);
    }

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing dashboard in {:?}", target_dir);
            gsoc_dash::commands::init::init_site(&target_dir)?;
            println!("Initialized dashboard in {:?}", target_dir);
        }

        Commands::Generate { from } => {
            let dashboard = gsoc_dash::Dashboard::new(&base_dir)?;
            tracing::info!("Generating static files...");
            gsoc_dash::commands::generate::run(&dashboard, from.as_deref()).await?;
            println!("Generated successfully!");
        }

        Commands::Server {
            port,
            ip,
            editable,
            api_url,
        } => {
            let dashboard = gsoc_dash::Dashboard::new(&base_dir)?;

            let session = if editable || dashboard.config.editor.editable {
                let token = editor_token()?;
                let data = dashboard.loader().load_all().await;
                let client = ContentClient::new(api_url, dashboard.config.editor.clone(), token);
                Some(EditSession::new(client, &data))
            } else {
                None
            };

            tracing::info!("Starting server at http://{}:{}", ip, port);
            gsoc_dash::server::start(&dashboard, &ip, port, session).await?;
        }

        Commands::Fetch { api_url } => {
            let dashboard = gsoc_dash::Dashboard::new(&base_dir)?;
            tracing::info!("Fetching GitHub data...");
            gsoc_dash::commands::fetch::run(&dashboard, &api_url).await?;
        }

        Commands::Clean => {
            let dashboard = gsoc_dash::Dashboard::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            dashboard.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("gsoc-dash version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Token for committing edits, from the environment or an interactive prompt
fn editor_token() -> Result<Option<String>> {
    if let Ok(token) = std::env::var("GSOC_DASH_TOKEN") {
        return Ok(Some(token));
    }

    let token = dialoguer::Password::new()
        .with_prompt("GitHub token for saving edits (leave empty to skip)")
        .allow_empty_password(true)
        .interact()?;

    Ok(Some(token).filter(|t| !t.trim().is_empty()))
}
