//! Command audit log.

use crate::{
    core::member::get_member_by_discord_id,
    entities::command_usage,
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{Set, prelude::*};

/// One finished command invocation.
#[derive(Debug, Clone, Copy)]
pub struct UsageRecord<'a> {
    /// Qualified command name
    pub command_name: &'a str,
    /// Discord snowflake of the caller
    pub discord_user_id: i64,
    pub channel_id: i64,
    pub guild_id: Option<i64>,
    /// Error text when the invocation failed
    pub error: Option<&'a str>,
}

/// Appends a row to the audit log, linking the caller's member record when
/// they are registered.
pub async fn record_command_usage(
    db: &DatabaseConnection,
    record: UsageRecord<'_>,
    timestamp: DateTime<Utc>,
) -> Result<command_usage::Model> {
    let member_id = get_member_by_discord_id(db, record.discord_user_id)
        .await?
        .map(|m| m.id);

    let row = command_usage::ActiveModel {
        command_name: Set(record.command_name.to_string()),
        member_id: Set(member_id),
        channel_id: Set(record.channel_id),
        guild_id: Set(record.guild_id),
        success: Set(record.error.is_none()),
        error_message: Set(record.error.map(ToString::to_string)),
        timestamp: Set(timestamp),
        ..Default::default()
    };
    row.insert(db).await.map_err(Into::into)
}
