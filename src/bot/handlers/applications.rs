//! Applications channel listener.
//!
//! Reads each application post once, denies it or registers the applicant
//! as a trial member, and answers in the channel.

use crate::{
    bot::{BotData, db_id},
    core::{
        application::{self, Assessment},
        member::{self, NewMember},
    },
    errors::Result,
};
use chrono::Utc;
use poise::serenity_prelude::{self as serenity, Mentionable};
use tracing::{info, warn};

const MODULE: &str = "applications";

/// Handles a message posted anywhere the bot can see.
pub async fn on_message(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &BotData,
) -> Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let config = data.config();
    if !config.module_enabled(MODULE)
        || config.application_channel_id != Some(msg.channel_id.get())
        || !application::is_application(&msg.content)
    {
        return Ok(());
    }
    if !data.mark_application_processed(msg.id.get()) {
        return Ok(());
    }
    info!("Reviewing application from {}", msg.author.name);

    match application::assess(&msg.content, &config) {
        Assessment::Denied(reason) => {
            info!("Denied application from {}: {reason:?}", msg.author.name);
            let embed = serenity::CreateEmbed::default()
                .title("Application Denied")
                .description(format!("{} {}", msg.author.mention(), reason.explanation()))
                .color(0x00E7_4C3C);
            msg.channel_id
                .send_message(ctx, serenity::CreateMessage::new().embed(embed))
                .await?;
        }
        Assessment::MissingRsn => {
            msg.channel_id
                .say(
                    ctx,
                    format!(
                        "{} I couldn't find your RSN in your application. Please make sure it's clearly stated.",
                        msg.author.mention()
                    ),
                )
                .await?;
        }
        Assessment::Accepted {
            rsn,
            location_timezone,
        } => accept(ctx, msg, data, rsn, location_timezone).await?,
    }
    Ok(())
}

async fn accept(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &BotData,
    rsn: String,
    location_timezone: Option<String>,
) -> Result<()> {
    let config = data.config();
    let today = Utc::now().date_naive();
    let db = data.db().await?;

    let added = member::add_member(
        &db,
        NewMember {
            rsn,
            discord_id: Some(msg.author.name.clone()),
            discord_id_num: Some(db_id(msg.author.id.get())),
            membership_level: 0,
            join_date: Some(today),
            notes: location_timezone
                .as_ref()
                .map(|l| format!("Location/Timezone: {l}")),
            ..Default::default()
        },
    )
    .await;

    let created = match added {
        Ok(created) => created,
        Err(e) if e.is_user_error() => {
            msg.channel_id
                .say(ctx, format!("{} {e}", msg.author.mention()))
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    info!("Accepted application for {}", created.rsn);

    if let (Some(guild_id), Some(role_id)) = (msg.guild_id, config.trial_member_role_id) {
        let granted = ctx
            .http
            .add_member_role(
                guild_id,
                msg.author.id,
                serenity::RoleId::new(role_id),
                Some("Application accepted"),
            )
            .await;
        if let Err(e) = granted {
            warn!("Failed to grant trial role to {}: {e}", msg.author.name);
        }
    }

    let level = config
        .level_name(created.membership_level)
        .unwrap_or("Unknown")
        .to_string();
    let embed = serenity::CreateEmbed::default()
        .title("Application Accepted!")
        .description(format!("Welcome to the clan, {}!", msg.author.mention()))
        .color(0x0000_FF00)
        .fields(vec![
            ("RSN", created.rsn.clone(), true),
            (
                "Location/Timezone",
                location_timezone.unwrap_or_else(|| "Not provided".to_string()),
                true,
            ),
            ("Join Date", today.format("%Y-%m-%d").to_string(), true),
            ("Membership Level", level, true),
        ]);
    msg.channel_id
        .send_message(ctx, serenity::CreateMessage::new().embed(embed))
        .await?;
    Ok(())
}
