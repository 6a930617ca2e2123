//! finlog command-line entry point
//!
//! ```bash
//! finlog serve --config finlog.toml
//! finlog init-db
//! finlog hash-password 'new password'
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use finlog::auth::{Argon2Hasher, PasswordHasher};
use finlog::cms::{AppState, build_app};
use finlog::conf::{CONFIG_PATH_ENV, ENV_PREFIX, LogFormat, Settings, SettingsBuilder};
use finlog::db::Database;
use finlog::http::{HttpServer, shutdown_signal};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "finlog.toml";

#[derive(Parser)]
#[command(name = "finlog")]
#[command(about = "Personal finance blog backend", long_about = None)]
#[command(version)]
struct Cli {
	/// TOML settings file (defaults to $FINLOG_CONFIG, then ./finlog.toml)
	#[arg(short, long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Run the HTTP server until Ctrl-C or SIGTERM
	Serve,

	/// Create the schema and the default admin, then exit
	InitDb,

	/// Print the Argon2 hash of a password
	HashPassword {
		#[arg(value_name = "PASSWORD")]
		password: String,
	},
}

fn load_settings(path: Option<PathBuf>) -> anyhow::Result<Settings> {
	let path = path
		.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
		.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
	SettingsBuilder::new()
		.toml_file(&path)
		.env_prefix(ENV_PREFIX)
		.build()
		.with_context(|| format!("failed to load settings (file: {})", path.display()))
}

fn init_tracing(settings: &Settings) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
	match settings.log_format {
		LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
		LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
	}
}

async fn open_state(settings: Settings) -> anyhow::Result<AppState> {
	let db = Database::connect(&settings.database_url)
		.await
		.with_context(|| format!("failed to open {}", settings.database_url))?;
	let state = AppState::new(settings, db)?;
	state.bootstrap().await.context("schema bootstrap failed")?;
	Ok(state)
}

async fn run_serve(settings: Settings) -> anyhow::Result<()> {
	settings.validate_for_serve()?;
	let addr: SocketAddr = settings
		.bind_address
		.parse()
		.with_context(|| format!("invalid bind_address: {}", settings.bind_address))?;

	let state = open_state(settings).await?;
	let app = build_app(&state)?;
	tracing::info!(%addr, content_dir = %state.settings.content_dir.display(), "starting finlog");

	HttpServer::new(app)
		.listen_with_shutdown(addr, shutdown_signal())
		.await
		.context("server error")?;
	state.db.close().await;
	tracing::info!("server stopped");
	Ok(())
}

async fn run_init_db(settings: Settings) -> anyhow::Result<()> {
	let state = open_state(settings).await?;
	let admins = state.users.count().await?;
	tracing::info!(database = %state.settings.database_url, admins, "database ready");
	state.db.close().await;
	Ok(())
}

fn run_hash_password(password: &str) -> anyhow::Result<()> {
	let hash = Argon2Hasher::new().hash(password)?;
	println!("{hash}");
	Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	if let Commands::HashPassword { password } = &cli.command {
		return run_hash_password(password);
	}

	let settings = load_settings(cli.config)?;
	init_tracing(&settings);
	match cli.command {
		Commands::Serve => run_serve(settings).await,
		Commands::InitDb => run_init_db(settings).await,
		Commands::HashPassword { .. } => Ok(()),
	}
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	if let Err(e) = run(cli).await {
		eprintln!("Error: {e:#}");
		process::exit(1);
	}
}
