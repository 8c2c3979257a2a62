//! Lottery commands: creation, status, entry purchases, and the draw.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, db_id},
        core::{
            competition::{DATETIME_INPUT_FMT, parse_input_datetime},
            format::{format_money, format_time_remaining},
            lottery::{self, NewLottery, TOP_ENTRIES},
            member,
        },
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use rand::{SeedableRng, rngs::StdRng};
    use std::fmt::Write;
    use tracing::info;

    const GP: &str = "gp";

    /// Creates a new lottery.
    #[poise::command(slash_command, category = "lottery")]
    pub async fn create_lottery(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Start, e.g. '2024-03-20 18:00' (UTC)"] start_date: String,
        #[description = "How many days the lottery runs"] duration_days: i64,
        #[description = "Price of one entry in gp"] entry_fee: i64,
        #[description = "Most entries one member may buy"] max_entries: i32,
    ) -> Result<()> {
        let start_date = parse_input_datetime(&start_date)?;
        let db = ctx.data().db().await?;
        let created = lottery::create_lottery(
            &db,
            NewLottery {
                start_date,
                duration_days,
                entry_fee,
                max_entries,
            },
            Utc::now().naive_utc(),
        )
        .await?;
        info!("Created lottery {}", created.id);

        let embed = serenity::CreateEmbed::default()
            .title("🎟️ New Lottery Created!")
            .color(0x0000_FF00)
            .fields(vec![
                (
                    "Start Date",
                    created.start_date.format(DATETIME_INPUT_FMT).to_string(),
                    true,
                ),
                (
                    "End Date",
                    created.end_date.format(DATETIME_INPUT_FMT).to_string(),
                    true,
                ),
                ("Entry Fee", format_money(created.entry_fee, GP), true),
                ("Max Entries", created.max_entries.to_string(), true),
                ("Lottery ID", created.id.to_string(), true),
            ]);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Draws the winner of an ended lottery, weighted by entries.
    #[poise::command(slash_command, category = "lottery", check = "crate::bot::checks::is_admin")]
    pub async fn select_winner(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Lottery ID"] lottery_id: i64,
    ) -> Result<()> {
        let db = ctx.data().db().await?;
        let mut rng = StdRng::from_os_rng();
        let drawn =
            lottery::select_winner(&db, lottery_id, Utc::now().naive_utc(), &mut rng).await?;
        info!(
            "Lottery {} drawn from {} entries",
            drawn.lottery_id, drawn.total_entries
        );

        let embed = serenity::CreateEmbed::default()
            .title("🎉 Lottery Winner Selected!")
            .color(0x00F1_C40F)
            .fields(vec![
                ("Lottery ID", drawn.lottery_id.to_string(), true),
                ("Winner", drawn.winner.rsn.clone(), true),
                ("Total Entries", drawn.total_entries.to_string(), true),
            ]);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows the lottery that is currently open.
    #[poise::command(slash_command, category = "lottery")]
    pub async fn lottery_status(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = ctx.data().db().await?;
        let now = Utc::now().naive_utc();

        let Some(active) = lottery::active_lottery(&db, now).await? else {
            ctx.say("There is currently no active lottery.").await?;
            return Ok(());
        };

        let standings = lottery::entry_standings(&db, active.id).await?;
        let total: i64 = standings.iter().map(|(_, n)| i64::from(*n)).sum();

        let top = if standings.is_empty() {
            "No entries yet".to_string()
        } else {
            let mut top = String::new();
            for (i, (rsn, entries)) in standings.iter().take(TOP_ENTRIES).enumerate() {
                writeln!(top, "{}. {rsn}: {entries} entries", i + 1)?;
            }
            top
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!("🎟️ Active Lottery #{}", active.id))
            .color(0x0034_98DB)
            .fields(vec![
                (
                    "Status",
                    format!(
                        "🎟️ Active\nTime Remaining: {}",
                        format_time_remaining(active.end_date - now)
                    ),
                    false,
                ),
                ("Entry Fee", format_money(active.entry_fee, GP), true),
                ("Max Entries", active.max_entries.to_string(), true),
                ("Total Entries", total.to_string(), true),
                ("Top Entries", top, false),
            ]);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Records entries a member bought for an open lottery.
    #[poise::command(slash_command, category = "lottery", check = "crate::bot::checks::is_admin")]
    pub async fn add_lottery_entry(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Lottery ID"] lottery_id: i64,
        #[description = "Member who bought the entries"] user: serenity::User,
        #[description = "Number of entries bought"] entries: i32,
    ) -> Result<()> {
        let db = ctx.data().db().await?;

        let Some(buyer) = member::get_member_by_discord_id(&db, db_id(user.id.get())).await?
        else {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("{} is not registered in our database.", user.name))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        };

        let total = lottery::add_entries(
            &db,
            lottery_id,
            buyer.id,
            entries,
            Utc::now().naive_utc(),
        )
        .await?;

        ctx.say(format!(
            "Added {entries} entries for **{}** in lottery {lottery_id}. They now have **{total}** entries.",
            buyer.rsn
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
