/// Database configuration and connection management
pub mod database;

/// Bot configuration loading from config.toml
pub mod settings;

pub use database::DatabaseGuard;
pub use settings::BotConfig;
