//! Framework setup: the static command registry, middleware hooks, and the
//! client start-up.
//!
//! Every invocation passes through the same hooks. `pre_command` logs it,
//! `command_check` drops commands whose module is disabled, and the outcome
//! is written to the audit log by `post_command` on success or by `on_error`
//! on failure.

use crate::{
    bot::{BotData, checks, commands, db_id, handlers},
    config::BotConfig,
    core::usage::{self, UsageRecord},
    errors::{Error, Result},
};
use chrono::Utc;
use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

/// Every command the bot knows, in registration order.
#[must_use]
pub fn commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        // admin
        commands::add_member(),
        commands::add_existing_member(),
        commands::view_member(),
        commands::update_member(),
        commands::add_key_all_members(),
        commands::set_active(),
        commands::set_onleave(),
        // lookup
        commands::list_members(),
        commands::list_inactive(),
        commands::list_onleave(),
        commands::yellowpages(),
        commands::promotion_when(),
        // competition
        commands::skill_comp_points(),
        commands::skill_comp_leaderboard(),
        commands::skill_comp_wins(),
        commands::skill_comp_history(),
        commands::skill_comp_add(),
        commands::skill_comp_update(),
        commands::boss_comp_points(),
        commands::boss_comp_leaderboard(),
        commands::boss_comp_wins(),
        commands::boss_comp_history(),
        commands::boss_comp_add(),
        commands::boss_comp_update(),
        commands::comp_status(),
        // lottery
        commands::create_lottery(),
        commands::select_winner(),
        commands::lottery_status(),
        commands::add_lottery_entry(),
        // profile
        commands::update_profile(),
        commands::temp_leave(),
        // dev
        commands::db_status(),
        commands::ping(),
        commands::get_bot_info(),
        commands::reload(),
        commands::sync(),
        commands::shutdown(),
        commands::load_member_data(),
        // general
        commands::help(),
    ]
}

/// Slash-command definitions for the enabled modules only.
#[must_use]
pub fn application_commands(
    commands: &[poise::Command<BotData, Error>],
    config: &BotConfig,
) -> Vec<serenity::CreateCommand> {
    commands
        .iter()
        .filter(|c| checks::command_enabled(c.category.as_deref(), &config.modules))
        .filter_map(poise::Command::create_as_slash_command)
        .collect()
}

/// Registers the enabled commands, in the test guild when one is configured.
/// Returns how many were registered.
pub async fn register_commands(
    ctx: &serenity::Context,
    commands: &[poise::Command<BotData, Error>],
    config: &BotConfig,
) -> Result<usize> {
    let create = application_commands(commands, config);
    let count = create.len();

    match config.test_guild_id.filter(|&id| id != 0) {
        Some(guild_id) => {
            serenity::GuildId::new(guild_id)
                .set_commands(ctx, create)
                .await?;
            info!("Registered {count} commands in guild {guild_id}");
        }
        None => {
            serenity::Command::set_global_commands(ctx, create).await?;
            info!("Registered {count} commands globally");
        }
    }
    Ok(count)
}

/// Writes one audit row. Failures are logged, never surfaced. Nothing is
/// written once the database has been shut down.
async fn record_usage(ctx: poise::Context<'_, BotData, Error>, error: Option<&str>) {
    if ctx.data().database.is_closed() {
        return;
    }
    let record = UsageRecord {
        command_name: &ctx.command().qualified_name,
        discord_user_id: db_id(ctx.author().id.get()),
        channel_id: db_id(ctx.channel_id().get()),
        guild_id: ctx.guild_id().map(|g| db_id(g.get())),
        error,
    };

    let result = match ctx.data().db().await {
        Ok(db) => usage::record_command_usage(&db, record, Utc::now())
            .await
            .map(|_| ()),
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        warn!(
            "Failed to record usage of `{}`: {e}",
            ctx.command().qualified_name
        );
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let message = error.to_string();
            record_usage(ctx, Some(&message)).await;

            let reply = if error.is_user_error() {
                info!("Command `{}` rejected: {message}", ctx.command().qualified_name);
                poise::CreateReply::default().content(message).ephemeral(true)
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().qualified_name);
                poise::CreateReply::default().content(format!("An error occurred: {message}"))
            };
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to send error message: {e}");
            }
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            let reason = error
                .as_ref()
                .map_or_else(|| "check failed".to_string(), ToString::to_string);
            warn!(
                "Check failed for `{}` by {}: {reason}",
                ctx.command().qualified_name,
                ctx.author().name
            );
            record_usage(ctx, Some(&reason)).await;
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the framework and runs the client until shutdown.
pub async fn run(token: &str, data: BotData) -> Result<()> {
    let prefix = data.config().prefix.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "{} invoked `{}`",
                        ctx.author().name,
                        ctx.command().qualified_name
                    );
                })
            },
            post_command: |ctx| Box::pin(record_usage(ctx, None)),
            command_check: Some(|ctx| Box::pin(checks::module_enabled(ctx))),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                register_commands(ctx, &framework.options().commands, &data.config()).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}
