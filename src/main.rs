use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use newsdeck::app::{App, AppEvent, PREF_DARK_MODE};
use newsdeck::config::Config;
use newsdeck::news::NewsClient;
use newsdeck::storage::{Database, DatabaseError, PreferenceStore, SavedStore};
use newsdeck::swipe::{SwipeGeometry, SwipeSession};
use newsdeck::{server, ui};

/// Get the config directory path (~/.config/newsdeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsdeck"))
}

#[derive(Parser, Debug)]
#[command(name = "newsdeck", about = "Swipe through short news cards in your terminal")]
struct Args {
    /// Run the news API server instead of the terminal UI
    #[arg(long)]
    serve: bool,

    /// Clear saved articles and preferences before starting
    #[arg(long)]
    reset: bool,

    /// Set the feed language (e.g. en, te, hi) and remember it
    #[arg(long, value_name = "CODE")]
    language: Option<String>,

    /// News API base URL (overrides api_base_url in the config file)
    #[arg(long, value_name = "URL")]
    api: Option<String>,

    /// Config file (default: ~/.config/newsdeck/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "newsdeck=trace" (RUST_LOG wins if set)
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_level: String,
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to a file: the terminal UI owns stdout and stderr.
fn init_file_logging(path: &Path, level: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
    }

    // User-only access: the database holds the reading history
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    ensure_config_dir(&config_dir)?;

    if args.serve {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter(&args.log_level))
            .init();
    } else {
        init_file_logging(&config_dir.join("newsdeck.log"), &args.log_level)?;
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;
    if let Some(api) = args.api {
        config.api_base_url = api;
    }

    if args.serve {
        return server::launch(&config.server).await;
    }

    let db_path = config_dir.join("newsdeck.db");
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of newsdeck appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let saved = SavedStore::new(db.clone());
    let prefs = PreferenceStore::new(db.clone());

    if args.reset {
        if let Some(e) = prefs.clear_all().await.fault() {
            anyhow::bail!("Failed to reset stored data: {}", e);
        }
        println!("Saved articles and preferences cleared.");
    }

    if let Some(code) = &args.language {
        if let Some(e) = prefs.set_language(code).await.fault() {
            tracing::warn!(language = %code, error = %e, "Could not remember language");
        }
    }

    let language = match prefs.stored_language().await.into_value() {
        Some(code) => code,
        None => config.default_language.clone(),
    };
    let dark_mode = prefs.get_bool(PREF_DARK_MODE, true).await.into_value();

    let news = NewsClient::new(&config.api_base_url, config.request_timeout())
        .with_context(|| format!("Invalid api_base_url '{}'", config.api_base_url))?;
    tracing::info!(api = %news.base_url(), language = %language, "Starting newsdeck");

    // Real geometry arrives with the first frame
    let session = SwipeSession::new(Arc::new(news.clone()), language, SwipeGeometry::new(80.0, 24.0));
    let mut app = App::new(saved, prefs, news, session, dark_mode);
    app.load_saved().await;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    db.close().await;
    println!("Goodbye!");
    Ok(())
}
