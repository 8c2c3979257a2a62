//! Operator commands: health checks, runtime reconfiguration, shutdown, and
//! the spreadsheet roster import.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, framework},
        config::{database::server_version, settings::load_config},
        core::{
            format::format_time_remaining,
            import::{self, ImportSummary},
        },
        errors::{Error, Result},
        integrations::sheets,
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use std::time::Duration;
    use tracing::{error, info, warn};

    const CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);
    const PREVIEW_ROWS: usize = 10;
    const PREVIEW_CHARS: usize = 1500;

    /// Checks the database connection and shows the server version.
    #[poise::command(slash_command, category = "dev", check = "crate::bot::checks::is_admin")]
    pub async fn db_status(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let status = match ctx.data().db().await {
            Ok(db) => server_version(&db).await,
            Err(e) => Err(e),
        };

        let reply = match status {
            Ok(version) => {
                let embed = serenity::CreateEmbed::default()
                    .title("✅ Database Connection Status")
                    .description("The database connection is active and working properly.")
                    .color(0x0000_FF00)
                    .fields(vec![
                        ("Database Version", version, false),
                        ("Connection String", ctx.data().database.masked_url(), false),
                    ]);
                poise::CreateReply::default().embed(embed)
            }
            Err(e) => {
                error!("Database status check failed: {e}");
                poise::CreateReply::default().content(
                    "❌ Database connection is not active. Check the logs for more information.",
                )
            }
        };
        ctx.send(reply.ephemeral(true)).await?;
        Ok(())
    }

    /// Shows the gateway latency.
    #[poise::command(slash_command, category = "dev", check = "crate::bot::checks::is_admin")]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let latency = ctx.ping().await;
        let embed = serenity::CreateEmbed::default()
            .title("🏓 Pong!")
            .description(format!("Gateway latency: {} ms", latency.as_millis()))
            .color(0x0034_98DB);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows the bot's identity, version, and uptime.
    #[poise::command(slash_command, category = "dev", check = "crate::bot::checks::is_admin")]
    pub async fn get_bot_info(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let (name, id) = {
            let me = ctx.cache().current_user();
            (me.name.clone(), me.id)
        };
        let guilds = ctx.cache().guilds().len();
        let uptime = format_time_remaining(Utc::now() - ctx.data().started_at);

        let embed = serenity::CreateEmbed::default()
            .title("🤖 Bot Information")
            .color(0x0034_98DB)
            .fields(vec![
                ("Name", name, true),
                ("ID", id.to_string(), true),
                ("Version", env!("CARGO_PKG_VERSION").to_string(), true),
                ("Uptime", uptime, true),
                ("Guilds", guilds.to_string(), true),
            ]);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Re-reads the configuration file.
    #[poise::command(slash_command, category = "dev", check = "crate::bot::checks::is_admin")]
    pub async fn reload(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let path = &ctx.data().config_path;
        let config = load_config(path)?;
        let modules = config.modules.join(", ");
        ctx.data().replace_config(config);
        info!("Reloaded configuration from {}", path.display());

        ctx.send(
            poise::CreateReply::default()
                .content(format!("Configuration reloaded. Enabled modules: {modules}"))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Re-registers the slash commands of the enabled modules.
    #[poise::command(slash_command, category = "dev", check = "crate::bot::checks::is_admin")]
    pub async fn sync(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.defer_ephemeral().await?;
        let config = ctx.data().config();
        let count = framework::register_commands(
            ctx.serenity_context(),
            &ctx.framework().options().commands,
            &config,
        )
        .await?;
        ctx.say(format!("Synced {count} commands.")).await?;
        Ok(())
    }

    /// Closes the database and stops the bot.
    #[poise::command(slash_command, category = "dev", check = "crate::bot::checks::is_admin")]
    pub async fn shutdown(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("**Shutting Down...**").await?;
        warn!("Shutdown requested by {}", ctx.author().name);

        if let Err(e) = ctx.data().database.close().await {
            error!("Failed to close database connection: {e}");
        }
        ctx.framework().shard_manager().shutdown_all().await;
        Ok(())
    }

    fn truncate_chars(text: &str, max: usize) -> &str {
        text.char_indices()
            .nth(max)
            .map_or(text, |(index, _)| &text[..index])
    }

    fn summary_embed(summary: ImportSummary) -> serenity::CreateEmbed {
        serenity::CreateEmbed::default()
            .title("✅ Database Update Complete")
            .color(0x0000_FF00)
            .fields(vec![
                ("Inserted", summary.inserted.to_string(), true),
                ("Updated", summary.updated.to_string(), true),
                ("Skipped", summary.skipped.to_string(), true),
                ("Errors", summary.errors.to_string(), true),
            ])
    }

    /// Imports the member roster from a Google Sheet after confirmation.
    #[poise::command(slash_command, category = "dev", check = "crate::bot::checks::is_admin")]
    pub async fn load_member_data(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Spreadsheet ID from the sheet URL"] sheet_id: String,
        #[description = "Sheet tab name"] sheet_name: Option<String>,
        #[description = "Cell range, e.g. B5:P141"] range: Option<String>,
    ) -> Result<()> {
        let sheet_name = sheet_name.unwrap_or_else(|| "Member Data - Active".to_string());
        let range = range.unwrap_or_else(|| "B5:P141".to_string());
        ctx.defer().await?;

        let config = ctx.data().config();
        let http = &ctx.data().http;
        let token = sheets::access_token(&config.sheets, http, Utc::now()).await?;
        let rows = sheets::fetch_values(http, &token, &sheet_id, &sheet_name, &range).await?;

        let (_, data_rows) = import::split_header(&rows);
        if data_rows.is_empty() {
            ctx.say(format!("No data found in {sheet_name}!{range}."))
                .await?;
            return Ok(());
        }

        let preview = import::preview_rows(&rows, PREVIEW_ROWS)?;
        let ctx_id = ctx.id();
        let confirm_id = format!("{ctx_id}confirm");
        let cancel_id = format!("{ctx_id}cancel");
        let buttons = serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(&confirm_id)
                .label("Confirm")
                .style(serenity::ButtonStyle::Success),
            serenity::CreateButton::new(&cancel_id)
                .label("Cancel")
                .style(serenity::ButtonStyle::Danger),
        ]);

        let handle = ctx
            .send(
                poise::CreateReply::default()
                    .content(format!(
                        "Found **{}** rows. Preview:\n```\n{}\n```\nInsert this data into the database?",
                        data_rows.len(),
                        truncate_chars(&preview, PREVIEW_CHARS)
                    ))
                    .components(vec![buttons]),
            )
            .await?;

        let prefix = ctx_id.to_string();
        let press = serenity::ComponentInteractionCollector::new(ctx)
            .author_id(ctx.author().id)
            .channel_id(ctx.channel_id())
            .filter(move |press| press.data.custom_id.starts_with(&prefix))
            .timeout(CONFIRM_TIMEOUT)
            .await;

        let Some(press) = press else {
            handle
                .edit(
                    ctx,
                    poise::CreateReply::default()
                        .content("⏱️ Confirmation timed out. Data insertion cancelled.")
                        .components(vec![]),
                )
                .await?;
            return Ok(());
        };

        let confirmed = press.data.custom_id == confirm_id;
        let status = if confirmed {
            "Importing members..."
        } else {
            "Data insertion cancelled."
        };
        press
            .create_response(
                ctx.serenity_context(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .content(status)
                        .components(vec![]),
                ),
            )
            .await?;
        if !confirmed {
            return Ok(());
        }

        let db = ctx.data().db().await?;
        let summary = import::import_rows(&db, &rows, &config.mem_level_names).await;
        info!(
            "Roster import: {} inserted, {} updated, {} skipped, {} errors",
            summary.inserted, summary.updated, summary.skipped, summary.errors
        );
        ctx.send(poise::CreateReply::default().embed(summary_embed(summary)))
            .await?;
        Ok(())
    }

}

// Re-export all commands
pub use inner::*;
