use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fictions_application::FictionsUseCase;
use fictions_core::session::SessionStore;
use fictions_infrastructure::{ConfigService, FictionsPaths, JsonFileStore};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

#[derive(Parser)]
#[command(name = "fictions")]
#[command(about = "Fictions CLI - share short stories with a Fictions backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config.toml and FICTIONS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding config.toml and session.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in with it
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// List all fictions
    List,
    /// Show one fiction in full
    Show { id: String },
    /// Create a new fiction
    Create(CreateArgs),
    /// Edit one of your fictions; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Delete one of your fictions
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub author: String,
    /// One of: fantasy, sci-fi, mystery, romance, thriller, horror, adventure, drama, comedy, other
    #[arg(long, default_value = "fantasy")]
    pub genre: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub content: String,
}

#[derive(Args, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let app = match bootstrap(&cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match cli.command {
        Commands::Login { email, password } => commands::auth::login(&app, &email, &password).await,
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(&app, &username, &email, &password).await,
        Commands::Logout => commands::auth::logout(&app).await,
        Commands::Whoami => commands::auth::whoami(&app),
        Commands::List => commands::fictions::list(&app).await,
        Commands::Show { id } => commands::fictions::show(&app, &id).await,
        Commands::Create(args) => commands::fictions::create(&app, args).await,
        Commands::Edit { id, fields } => commands::fictions::edit(&app, &id, fields).await,
        Commands::Delete { id, yes } => commands::fictions::delete(&app, &id, yes).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Command failures have already been rendered.
            if e.downcast_ref::<commands::Reported>().is_none() {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

/// Loads configuration, installs logging and wires the use case.
fn bootstrap(cli: &Cli) -> Result<FictionsUseCase> {
    let paths = FictionsPaths::new(cli.config_dir.as_deref());
    let config_service = ConfigService::new(&paths)?;
    let mut config = config_service
        .load()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_base_url(api_url);
        config.validate()?;
    }

    init_tracing(&config.log_level);
    tracing::debug!(base_url = %config.base_url, "Configuration loaded");

    let session_file = paths.session_file()?;
    let storage = Arc::new(JsonFileStore::new(session_file));
    let session_store = Arc::new(SessionStore::new(storage));
    Ok(FictionsUseCase::new(&config, session_store)?)
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
