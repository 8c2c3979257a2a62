//! Roster administration commands - registering members and editing their
//! records. All of them require the administrator permission.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, db_id, handlers::autocomplete},
        core::{
            member::{self, NewMember},
            membership,
        },
        errors::{Error, Result},
    };
    use chrono::{NaiveDate, Utc};
    use poise::serenity_prelude as serenity;

    fn or_none(value: Option<String>) -> String {
        value.filter(|v| !v.is_empty()).unwrap_or_else(|| "None".to_string())
    }

    /// Registers a newly accepted member at the first rank, joining today.
    #[poise::command(
        slash_command,
        rename = "add-member",
        category = "admin",
        check = "crate::bot::checks::is_admin"
    )]
    pub async fn add_member(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "RuneScape name"] rsn: String,
        #[description = "Discord account of the member"] discord_user: Option<serenity::User>,
        #[description = "Two-letter country code"] loc: Option<String>,
        #[description = "Timezone, e.g. EST"] timezone: Option<String>,
        #[description = "Notes about the member"] notes: Option<String>,
    ) -> Result<()> {
        let db = ctx.data().db().await?;

        let added = member::add_member(
            &db,
            NewMember {
                rsn,
                discord_id: discord_user.as_ref().map(|u| u.name.clone()),
                discord_id_num: discord_user.as_ref().map(|u| db_id(u.id.get())),
                membership_level: 0,
                join_date: Some(Utc::now().date_naive()),
                loc,
                timezone,
                notes,
            },
        )
        .await?;

        ctx.say(format!("New member {} accepted!", added.rsn)).await?;
        Ok(())
    }

    /// Registers a member who joined before the bot tracked the roster.
    #[poise::command(
        slash_command,
        rename = "add-existing-member",
        category = "admin",
        check = "crate::bot::checks::is_admin"
    )]
    pub async fn add_existing_member(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "RuneScape name"] rsn: String,
        #[description = "Date they joined the clan"] join_date: String,
        #[description = "Current membership level (default 0)"]
        #[min = 0]
        membership_level: Option<i32>,
        #[description = "Discord account of the member"] discord_user: Option<serenity::User>,
        #[description = "Notes about the member"] notes: Option<String>,
    ) -> Result<()> {
        let config = ctx.data().config();
        let join_date = NaiveDate::parse_from_str(join_date.trim(), &config.datetime_fmt)
            .map_err(|_| {
                Error::validation(format!(
                    "join_date must match the format {}",
                    config.datetime_fmt
                ))
            })?;

        let db = ctx.data().db().await?;
        let added = member::add_member(
            &db,
            NewMember {
                rsn,
                discord_id: discord_user.as_ref().map(|u| u.name.clone()),
                discord_id_num: discord_user.as_ref().map(|u| db_id(u.id.get())),
                membership_level: membership_level.unwrap_or(0),
                join_date: Some(join_date),
                notes,
                ..Default::default()
            },
        )
        .await?;

        ctx.say(format!("Added member {}!", added.rsn)).await?;
        Ok(())
    }

    /// Shows everything recorded about a member.
    #[poise::command(
        slash_command,
        rename = "view-member",
        category = "admin",
        check = "crate::bot::checks::is_admin"
    )]
    pub async fn view_member(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "RuneScape name"]
        #[autocomplete = "autocomplete::autocomplete_rsn"]
        rsn: String,
    ) -> Result<()> {
        let db = ctx.data().db().await?;
        let Some(found) = member::get_member_by_rsn(&db, &rsn).await? else {
            ctx.say(Error::MemberNotFound { rsn }.to_string()).await?;
            return Ok(());
        };

        let config = ctx.data().config();
        let today = Utc::now().date_naive();
        let level = config
            .level_name(found.membership_level)
            .map_or_else(|| found.membership_level.to_string(), ToString::to_string);
        let next_promotion = membership::next_mem_lvl_date(
            found.membership_level,
            found.join_date,
            today,
        )
        .map(|d| d.format("%Y-%m-%d").to_string());

        let embed = serenity::CreateEmbed::default()
            .title(format!("Member Information: {}", found.rsn))
            .color(0x0034_98DB)
            .fields(vec![
                ("RSN", found.rsn.clone(), true),
                ("Discord ID", or_none(found.discord_id.clone()), true),
                ("Membership Level", level, true),
                ("Next Promotion Date", or_none(next_promotion), true),
                ("Skill Comp Points", found.skill_comp_pts.to_string(), true),
                ("Boss Comp Points", found.boss_comp_pts.to_string(), true),
                ("On Leave", found.on_leave.to_string(), true),
                ("Active", found.active.to_string(), true),
                ("Alt RSNs", or_none(found.alt_rsn.joined()), false),
                ("Previous RSNs", or_none(found.previous_rsn.joined()), false),
                ("Other Notes", or_none(found.notes.clone()), false),
            ]);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Sets one field on a member's record.
    #[poise::command(
        slash_command,
        rename = "update-member",
        category = "admin",
        check = "crate::bot::checks::is_admin"
    )]
    pub async fn update_member(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "RuneScape name"]
        #[autocomplete = "autocomplete::autocomplete_rsn"]
        rsn: String,
        #[description = "Field to change"]
        #[autocomplete = "autocomplete::autocomplete_member_key"]
        key: String,
        #[description = "New value"] value: String,
    ) -> Result<()> {
        let config = ctx.data().config();
        let db = ctx.data().db().await?;
        member::update_member(&db, &config, &rsn, &key, &value).await?;

        ctx.say(format!("Updated user {rsn}. Key {key} set to value {value}."))
            .await?;
        Ok(())
    }

    /// Sets one field on every member's record.
    #[poise::command(
        slash_command,
        rename = "add-key-all-members",
        category = "admin",
        check = "crate::bot::checks::is_admin"
    )]
    pub async fn add_key_all_members(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Field to set"]
        #[autocomplete = "autocomplete::autocomplete_member_key"]
        key: String,
        #[description = "Value for every member"] value: String,
    ) -> Result<()> {
        let config = ctx.data().config();
        let db = ctx.data().db().await?;
        let updated = member::update_all_members(&db, &config, &key, &value).await?;
        tracing::info!("Set {key} on {updated} members");

        ctx.say(format!("Added key {key} for all users with value {value}."))
            .await?;
        Ok(())
    }

    /// Marks a member active or inactive.
    #[poise::command(
        slash_command,
        rename = "set-active",
        category = "admin",
        check = "crate::bot::checks::is_admin"
    )]
    pub async fn set_active(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "RuneScape name"]
        #[autocomplete = "autocomplete::autocomplete_rsn"]
        rsn: String,
        #[description = "Whether the member is active"] is_active: bool,
    ) -> Result<()> {
        let db = ctx.data().db().await?;
        member::set_active(&db, &rsn, is_active).await?;

        ctx.say(format!("{rsn} inactive flag set to {}", !is_active))
            .await?;
        Ok(())
    }

    /// Marks a member on leave or back from leave.
    #[poise::command(
        slash_command,
        rename = "set-onleave",
        category = "admin",
        check = "crate::bot::checks::is_admin"
    )]
    pub async fn set_onleave(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "RuneScape name"]
        #[autocomplete = "autocomplete::autocomplete_rsn"]
        rsn: String,
        #[description = "Whether the member is on leave"] is_onleave: bool,
    ) -> Result<()> {
        let db = ctx.data().db().await?;
        member::set_on_leave(&db, &rsn, is_onleave).await?;

        ctx.say(format!("{rsn} on_leave flag set to {is_onleave}"))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
