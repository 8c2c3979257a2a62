//! Skill and boss competition commands.
//!
//! The two competition kinds share one implementation; each public command
//! is a thin wrapper naming its kind so both appear as separate slash
//! commands (`skill-comp-points`, `boss-comp-points`, ...).

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, db_id, handlers::autocomplete, send_pages, user_label},
        core::{
            competition::{self, CompetitionStage, NewCompetition},
            format::{self, MESSAGE_BUDGET, PageLayout},
            member,
        },
        entities::CompetitionType,
        errors::{Error, Result},
        integrations::wom::{NewWomCompetition, WomClient},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::warn;

    /// Competition kind picked from a slash-command choice.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum CompetitionKind {
        #[name = "skill"]
        Skill,
        #[name = "boss"]
        Boss,
    }

    impl From<CompetitionKind> for CompetitionType {
        fn from(kind: CompetitionKind) -> Self {
            match kind {
                CompetitionKind::Skill => Self::Skill,
                CompetitionKind::Boss => Self::Boss,
            }
        }
    }

    const STATUS_LIMIT: u64 = 3;
    const TOP_GAINS: usize = 3;

    async fn comp_points(ctx: poise::Context<'_, BotData, Error>, kind: CompetitionType) -> Result<()> {
        let db = ctx.data().db().await?;
        let user = user_label(ctx.author()).to_string();

        match member::get_member_by_discord_id(&db, db_id(ctx.author().id.get())).await? {
            Some(found) => {
                ctx.say(format!(
                    "**{user}** you currently have **{}** points from {} competitions.",
                    kind.points_of(&found),
                    kind.display_name()
                ))
                .await?;
            }
            None => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("**{user}** you are not registered in our database."))
                        .ephemeral(true),
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn comp_leaderboard(
        ctx: poise::Context<'_, BotData, Error>,
        kind: CompetitionType,
    ) -> Result<()> {
        ctx.defer().await?;
        let db = ctx.data().db().await?;
        let standings = competition::leaderboard(&db, kind).await?;

        let rows: Vec<String> = standings
            .iter()
            .enumerate()
            .map(|(i, (rsn, points))| format::leaderboard_row(i + 1, rsn, *points))
            .collect();
        let layout = PageLayout::leaderboard(format!(
            "No members have any {} competition points yet.",
            kind.display_name()
        ));
        let pages = format::paginate(&rows, &layout, MESSAGE_BUDGET);
        send_pages(ctx, pages, !rows.is_empty()).await
    }

    async fn comp_wins(ctx: poise::Context<'_, BotData, Error>, kind: CompetitionType) -> Result<()> {
        let db = ctx.data().db().await?;
        let user = user_label(ctx.author()).to_string();

        let Some(found) = member::get_member_by_discord_id(&db, db_id(ctx.author().id.get())).await?
        else {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("**{user}** you are not registered in our database."))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        };

        let won = competition::wins(&db, found.id, kind).await?;
        if won.is_empty() {
            ctx.say(format!(
                "**{user}** you have not won any {} competitions yet.",
                kind.display_name()
            ))
            .await?;
            return Ok(());
        }

        let mut reply = format!(
            "**{user}** you have won **{}** {} competitions:",
            won.len(),
            kind.display_name()
        );
        for name in &won {
            write!(reply, "\n - {name}")?;
        }
        ctx.say(reply).await?;
        Ok(())
    }

    async fn comp_history(ctx: poise::Context<'_, BotData, Error>, kind: CompetitionType) -> Result<()> {
        let db = ctx.data().db().await?;
        let recent = competition::history(&db, kind).await?;
        ctx.say(competition::history_message(kind, &recent)?).await?;
        Ok(())
    }

    fn title(kind: CompetitionType) -> String {
        format::title_case(&kind.display_name().replace(' ', "_"))
    }

    async fn comp_add(
        ctx: poise::Context<'_, BotData, Error>,
        kind: CompetitionType,
        name: String,
        metric: String,
        start_date: String,
        end_date: String,
    ) -> Result<()> {
        let start_date = competition::parse_input_datetime(&start_date)?;
        let end_date = competition::parse_input_datetime(&end_date)?;
        ctx.defer().await?;

        let db = ctx.data().db().await?;
        let created = competition::add_competition(
            &db,
            NewCompetition {
                name,
                competition_type: kind,
                metric,
                start_date,
                end_date,
            },
        )
        .await?;

        let embed = serenity::CreateEmbed::default()
            .title(format!("✅ Added new {} competition", kind.display_name()))
            .description(format!(
                "**Name:** {}\n**Metric:** {}\n**Start:** {}\n**End:** {}",
                created.name,
                created.metric,
                created.start_date.format(competition::DATETIME_INPUT_FMT),
                created.end_date.format(competition::DATETIME_INPUT_FMT)
            ))
            .color(0x0000_FF00)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Competition ID {}",
                created.id
            )));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;

        let config = ctx.data().config();
        let Some(group_id) = config.wom_group_id else {
            return Ok(());
        };
        let Some(code) = ctx.data().wom_verification_code.as_deref() else {
            warn!("wom_group_id is set but WOM_VERIFICATION_CODE is not; skipping mirror");
            return Ok(());
        };

        let wom = WomClient::new(ctx.data().http.clone());
        let mirrored = wom
            .create_competition(&NewWomCompetition {
                title: &created.name,
                metric: &created.metric,
                starts_at: created.start_date.and_utc(),
                ends_at: created.end_date.and_utc(),
                group_id,
                group_verification_code: code,
            })
            .await;

        match mirrored {
            Ok(wom_id) => competition::set_wom_id(&db, created.id, wom_id).await?,
            Err(e) => {
                warn!("Failed to mirror competition {}: {e}", created.id);
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("❌ Error creating WOM competition: {e}"))
                        .ephemeral(true),
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn comp_update(
        ctx: poise::Context<'_, BotData, Error>,
        kind: CompetitionType,
        comp_id: i64,
        placements: [&str; 3],
    ) -> Result<()> {
        let db = ctx.data().db().await?;
        let (concluded, awarded) = competition::record_results(&db, comp_id, kind, placements).await?;

        let fields = ["1st", "2nd", "3rd"]
            .into_iter()
            .zip(awarded)
            .map(|(place, p)| (place, format!("{} (+{})", p.rsn, p.points), true));
        let embed = serenity::CreateEmbed::default()
            .title(format!("🏆 {} results recorded", concluded.name))
            .color(0x00F1_C40F)
            .fields(fields);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows your skill week points.
    #[poise::command(slash_command, rename = "skill-comp-points", category = "competition")]
    pub async fn skill_comp_points(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        comp_points(ctx, CompetitionType::Skill).await
    }

    /// Shows the skill week points leaderboard.
    #[poise::command(slash_command, rename = "skill-comp-leaderboard", category = "competition")]
    pub async fn skill_comp_leaderboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        comp_leaderboard(ctx, CompetitionType::Skill).await
    }

    /// Lists the skill weeks you have won.
    #[poise::command(slash_command, rename = "skill-comp-wins", category = "competition")]
    pub async fn skill_comp_wins(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        comp_wins(ctx, CompetitionType::Skill).await
    }

    /// Shows recent skill week winners.
    #[poise::command(slash_command, rename = "skill-comp-history", category = "competition")]
    pub async fn skill_comp_history(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        comp_history(ctx, CompetitionType::Skill).await
    }

    /// Creates a skill week.
    #[poise::command(
        slash_command,
        rename = "skill-comp-add",
        category = "competition",
        check = "crate::bot::checks::is_admin"
    )]
    pub async fn skill_comp_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Competition name"] name: String,
        #[description = "Skill tracked, e.g. woodcutting"] metric: String,
        #[description = "Start, e.g. '2024-03-20 18:00' (UTC)"] start_date: String,
        #[description = "End, e.g. '2024-03-27 18:00' (UTC)"] end_date: String,
    ) -> Result<()> {
        comp_add(ctx, CompetitionType::Skill, name, metric, start_date, end_date).await
    }

    /// Records the top three of a skill week and awards their points.
    #[poise::command(
        slash_command,
        rename = "skill-comp-update",
        category = "competition",
        check = "crate::bot::checks::is_admin"
    )]
    pub async fn skill_comp_update(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Competition ID"] comp_id: i64,
        #[description = "Winner's RSN"]
        #[autocomplete = "autocomplete::autocomplete_rsn"]
        winner: String,
        #[description = "Second place RSN"]
        #[autocomplete = "autocomplete::autocomplete_rsn"]
        second_place: String,
        #[description = "Third place RSN"]
        #[autocomplete = "autocomplete::autocomplete_rsn"]
        third_place: String,
    ) -> Result<()> {
        comp_update(
            ctx,
            CompetitionType::Skill,
            comp_id,
            [winner.as_str(), second_place.as_str(), third_place.as_str()],
        )
        .await
    }

    /// Shows your boss week points.
    #[poise::command(slash_command, rename = "boss-comp-points", category = "competition")]
    pub async fn boss_comp_points(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        comp_points(ctx, CompetitionType::Boss).await
    }

    /// Shows the boss week points leaderboard.
    #[poise::command(slash_command, rename = "boss-comp-leaderboard", category = "competition")]
    pub async fn boss_comp_leaderboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        comp_leaderboard(ctx, CompetitionType::Boss).await
    }

    /// Lists the boss weeks you have won.
    #[poise::command(slash_command, rename = "boss-comp-wins", category = "competition")]
    pub async fn boss_comp_wins(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        comp_wins(ctx, CompetitionType::Boss).await
    }

    /// Shows recent boss week winners.
    #[poise::command(slash_command, rename = "boss-comp-history", category = "competition")]
    pub async fn boss_comp_history(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        comp_history(ctx, CompetitionType::Boss).await
    }

    /// Creates a boss week.
    #[poise::command(
        slash_command,
        rename = "boss-comp-add",
        category = "competition",
        check = "crate::bot::checks::is_admin"
    )]
    pub async fn boss_comp_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Competition name"] name: String,
        #[description = "Boss tracked, e.g. vorkath"] metric: String,
        #[description = "Start, e.g. '2024-03-20 18:00' (UTC)"] start_date: String,
        #[description = "End, e.g. '2024-03-27 18:00' (UTC)"] end_date: String,
    ) -> Result<()> {
        comp_add(ctx, CompetitionType::Boss, name, metric, start_date, end_date).await
    }

    /// Records the top three of a boss week and awards their points.
    #[poise::command(
        slash_command,
        rename = "boss-comp-update",
        category = "competition",
        check = "crate::bot::checks::is_admin"
    )]
    pub async fn boss_comp_update(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Competition ID"] comp_id: i64,
        #[description = "Winner's RSN"]
        #[autocomplete = "autocomplete::autocomplete_rsn"]
        winner: String,
        #[description = "Second place RSN"]
        #[autocomplete = "autocomplete::autocomplete_rsn"]
        second_place: String,
        #[description = "Third place RSN"]
        #[autocomplete = "autocomplete::autocomplete_rsn"]
        third_place: String,
    ) -> Result<()> {
        comp_update(
            ctx,
            CompetitionType::Boss,
            comp_id,
            [winner.as_str(), second_place.as_str(), third_place.as_str()],
        )
        .await
    }

    /// Shows where the latest competitions of a kind stand.
    #[poise::command(slash_command, rename = "comp-status", category = "competition")]
    pub async fn comp_status(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Competition kind"] competition_type: CompetitionKind,
    ) -> Result<()> {
        let kind = CompetitionType::from(competition_type);
        ctx.defer().await?;
        let db = ctx.data().db().await?;
        let latest = competition::recent(&db, kind, STATUS_LIMIT).await?;

        if latest.is_empty() {
            ctx.say(format!(
                "No {} competitions have been recorded yet.",
                kind.display_name()
            ))
            .await?;
            return Ok(());
        }

        let now = Utc::now().naive_utc();
        let wom = WomClient::new(ctx.data().http.clone());
        let mut fields = Vec::with_capacity(latest.len());

        for comp in &latest {
            let stage = CompetitionStage::of(comp, now);
            let mut value = format!(
                "**Status:** {}\n**Metric:** {}\n**Runs:** {} to {} UTC",
                stage.label(),
                comp.metric,
                comp.start_date.format(competition::DATETIME_INPUT_FMT),
                comp.end_date.format(competition::DATETIME_INPUT_FMT)
            );

            if let (CompetitionStage::Active, Some(wom_id)) = (stage, comp.wom_id) {
                match wom.top_gains(wom_id, TOP_GAINS).await {
                    Ok(top) if !top.is_empty() => {
                        value.push_str("\n**Top gains:**");
                        for (i, (player, gained)) in top.iter().enumerate() {
                            write!(value, "\n{}. {player} (+{gained})", i + 1)?;
                        }
                    }
                    Ok(_) => value.push_str("\n**Top gains:** none yet"),
                    Err(e) => {
                        warn!("Failed to fetch standings for WOM competition {wom_id}: {e}");
                        value.push_str("\n**Top gains:** unavailable");
                    }
                }
            }
            fields.push((format!("#{} {}", comp.id, comp.name), value, false));
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!("📈 {} Status", title(kind)))
            .color(0x0034_98DB)
            .fields(fields);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
