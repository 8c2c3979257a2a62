//! Roster lookup commands - member lists, the yellowpages directory, and
//! promotion dates. Nothing here writes to the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, db_id, send_pages, user_label},
        core::{
            format::{self, MESSAGE_BUDGET, PageLayout},
            member::{self, MemberFilter},
            membership::{self, PromotionOutlook},
        },
        entities::member as member_entity,
        errors::{Error, Result},
    };
    use chrono::Utc;

    fn member_cards(members: &[member_entity::Model]) -> Vec<String> {
        members
            .iter()
            .map(|m| {
                format::member_card(
                    &m.rsn,
                    m.discord_id.as_deref(),
                    m.alt_rsn.joined().as_deref(),
                    m.previous_rsn.joined().as_deref(),
                )
            })
            .collect()
    }

    async fn send_member_list(
        ctx: poise::Context<'_, BotData, Error>,
        filter: MemberFilter,
        empty: &'static str,
    ) -> Result<()> {
        ctx.defer().await?;
        let db = ctx.data().db().await?;
        let members = member::list_members(&db, filter).await?;

        let layout = PageLayout::member_list(empty);
        let pages = format::paginate(&member_cards(&members), &layout, MESSAGE_BUDGET);
        send_pages(ctx, pages, false).await
    }

    /// Lists every member.
    #[poise::command(slash_command, rename = "list-members", category = "lookup")]
    pub async fn list_members(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        send_member_list(ctx, MemberFilter::All, "No members found in the database.").await
    }

    /// Lists members flagged inactive.
    #[poise::command(slash_command, rename = "list-inactive", category = "lookup")]
    pub async fn list_inactive(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        send_member_list(
            ctx,
            MemberFilter::Inactive,
            "No inactive members found in the database.",
        )
        .await
    }

    /// Lists members currently on leave.
    #[poise::command(slash_command, rename = "list-onleave", category = "lookup")]
    pub async fn list_onleave(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        send_member_list(
            ctx,
            MemberFilter::OnLeave,
            "No members on leave found in the database.",
        )
        .await
    }

    /// Shows the RSN to Discord directory.
    #[poise::command(slash_command, category = "lookup")]
    pub async fn yellowpages(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.defer().await?;
        let db = ctx.data().db().await?;
        let members = member::list_members_by_rsn(&db).await?;

        let rows: Vec<String> = members
            .iter()
            .map(|m| format::yellowpages_row(&m.rsn, m.discord_id.as_deref()))
            .collect();
        let layout = PageLayout::yellowpages("No members found in the database.");
        let pages = format::paginate(&rows, &layout, MESSAGE_BUDGET);
        send_pages(ctx, pages, !rows.is_empty()).await
    }

    /// Tells you when you can next be promoted.
    #[poise::command(slash_command, rename = "promotion-when", category = "lookup")]
    pub async fn promotion_when(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = ctx.data().db().await?;
        let user = user_label(ctx.author()).to_string();

        let Some(found) = member::get_member_by_discord_id(&db, db_id(ctx.author().id.get())).await?
        else {
            ctx.say("I didn't find you in the member database. If you wish to apply see #applications")
                .await?;
            return Ok(());
        };

        let config = ctx.data().config();
        let outlook = membership::promotion_outlook(
            found.membership_level,
            found.join_date,
            &config.mem_level_names,
            Utc::now().date_naive(),
        );

        let reply = match outlook {
            PromotionOutlook::AlreadyEligible { rank } => {
                format!("**{user}** you are already eligible for promotion to **{rank}**.")
            }
            PromotionOutlook::EligibleOn { rank, date } => format!(
                "**{user}** you are eligible for promotion to **{rank}** on **{}**.",
                date.format("%Y-%m-%d")
            ),
            PromotionOutlook::AllRanks => {
                format!("{user}, you are already eligible for all ranks.")
            }
            PromotionOutlook::NoJoinDate => format!(
                "**{user}** you don't have a join date on record. Please ask an admin to add one."
            ),
        };
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
