use coffee_house_bot::{
    bot::{BotData, framework},
    config::{
        DatabaseGuard,
        database::{create_tables, get_database_url},
        settings::{config_path, load_config},
    },
    errors::{Error, Result},
    integrations::http_client,
};
use dotenvy::dotenv;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the bot configuration
    let path = config_path();
    let config = load_config(&path)
        .inspect(|_| info!("Loaded configuration from {}", path.display()))
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;

    // 4. Connect to the database and make sure every table exists
    let database = DatabaseGuard::connect(get_database_url())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    info!("Connected to database at {}", database.masked_url());
    create_tables(&database.connection().await?)
        .await
        .inspect(|_| info!("Database tables ready"))
        .inspect_err(|e| error!("Failed to create database tables: {e}"))?;

    // 5. Secrets are read directly before use and never logged
    let token = env::var("DISCORD_TOKEN")
        .inspect_err(|_| error!("DISCORD_TOKEN is not set"))
        .map_err(Error::EnvVar)?;
    let wom_verification_code = env::var("WOM_VERIFICATION_CODE").ok();
    if config.wom_group_id.is_some() && wom_verification_code.is_none() {
        warn!("wom_group_id is configured but WOM_VERIFICATION_CODE is not set");
    }

    // 6. Run the bot
    let data = BotData::new(
        database,
        config,
        path,
        http_client()?,
        wom_verification_code,
    );
    framework::run(&token, data).await
}
