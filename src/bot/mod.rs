//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the clan bot: the shared
//! context every command receives, the static command registry, and the
//! command and event handlers.

/// Permission checks used by commands
pub mod checks;
/// Discord command implementations grouped by module
pub mod commands;
/// Framework options, middleware hooks, and startup
pub mod framework;
/// Discord event and interaction handlers (autocomplete, applications)
pub mod handlers;

use crate::{
    config::{BotConfig, DatabaseGuard},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

/// Shared data available to all bot commands.
///
/// Holds the guarded database connection, the live configuration, and the
/// clients for outbound integrations. Passed to every handler through the
/// poise context; nothing is global.
pub struct BotData {
    /// Database connection behind a liveness check
    pub database: DatabaseGuard,
    config: RwLock<Arc<BotConfig>>,
    /// Where `config` was loaded from, re-read by `/reload`
    pub config_path: PathBuf,
    /// HTTP client for Google Sheets and Wise Old Man
    pub http: reqwest::Client,
    /// Group verification code for creating Wise Old Man competitions
    pub wom_verification_code: Option<String>,
    /// Process start time, for `/get_bot_info`
    pub started_at: DateTime<Utc>,
    processed_applications: Mutex<HashSet<u64>>,
}

impl BotData {
    /// Creates the shared context.
    #[must_use]
    pub fn new(
        database: DatabaseGuard,
        config: BotConfig,
        config_path: PathBuf,
        http: reqwest::Client,
        wom_verification_code: Option<String>,
    ) -> Self {
        Self {
            database,
            config: RwLock::new(Arc::new(config)),
            config_path,
            http,
            wom_verification_code,
            started_at: Utc::now(),
            processed_applications: Mutex::new(HashSet::new()),
        }
    }

    /// Snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> Arc<BotConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swaps in a freshly loaded configuration.
    pub fn replace_config(&self, config: BotConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
    }

    /// A live database connection, reconnecting once if needed.
    pub async fn db(&self) -> Result<DatabaseConnection> {
        self.database.connection().await
    }

    /// Marks an application message as handled. Returns `false` if it already was.
    pub fn mark_application_processed(&self, message_id: u64) -> bool {
        self.processed_applications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(message_id)
    }
}

/// Converts a Discord snowflake to the signed id stored in the database.
// Snowflakes stay below 2^63 until the year 2084.
#[allow(clippy::cast_possible_wrap)]
#[must_use]
pub const fn db_id(id: u64) -> i64 {
    id as i64
}

/// Sends each page as its own message, optionally inside a code block.
pub async fn send_pages(
    ctx: poise::Context<'_, BotData, Error>,
    pages: Vec<String>,
    code_block: bool,
) -> Result<()> {
    for page in pages {
        let content = if code_block {
            format!("```\n{page}\n```")
        } else {
            page
        };
        ctx.say(content).await?;
    }
    Ok(())
}

/// Display name for a user in replies.
#[must_use]
pub fn user_label(user: &serenity::User) -> &str {
    user.global_name.as_deref().unwrap_or(&user.name)
}
