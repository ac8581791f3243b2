use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use reqwest::Url;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use textline::domain::ports::{MessagePort, SessionPort};
use textline::infrastructure::{
    ApiClient, AppConfig, CliArgs, KeyringTokenStorage, StorageManager,
};
use textline::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn create_app() -> Result<App> {
    let args = CliArgs::parse();

    let storage_manager = StorageManager::new()?;
    let mut config = storage_manager.load_config(args.config.as_deref())?;
    config.merge_with_args(args);

    init_logging(&config)?;

    info!(version = textline::VERSION, "Starting Textline");

    let api_url = Url::parse(&config.api_url)
        .map_err(|e| eyre!("invalid API URL {:?}: {e}", config.api_url))?;

    let token_storage = Arc::new(KeyringTokenStorage::new());
    let api_client = Arc::new(ApiClient::new(api_url, token_storage.clone())?);
    let session_port: Arc<dyn SessionPort> = api_client.clone();
    let message_port: Arc<dyn MessagePort> = api_client;

    let app = App::new(
        session_port,
        message_port,
        token_storage,
        &config.recipient,
        Duration::from_millis(config.poll_interval_ms),
    )?;

    Ok(app)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let app = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
