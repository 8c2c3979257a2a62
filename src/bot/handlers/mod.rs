//! Discord interaction and event handlers
//!
//! Autocomplete for command parameters, plus the gateway event handler that
//! feeds the applications listener.

/// Autocomplete handlers for RSNs and member field keys
pub mod autocomplete;
/// Listener that turns application posts into trial members
pub mod applications;

use crate::{bot::BotData, errors::{Error, Result}};
use poise::serenity_prelude as serenity;
use tracing::info;

/// Routes gateway events the framework does not handle itself.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(
                "{} is connected to {} guilds",
                data_about_bot.user.name,
                data_about_bot.guilds.len()
            );
        }
        serenity::FullEvent::Message { new_message } => {
            applications::on_message(ctx, new_message, data).await?;
        }
        _ => {}
    }
    Ok(())
}
