//! Self-service profile commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, db_id, user_label},
        core::{
            format::title_case,
            member::{self, ProfileField},
        },
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;

    const NOT_REGISTERED: &str = "You are not registered in our database.";

    /// Profile field picked from a slash-command choice.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum ProfileChoice {
        #[name = "previous_rsn"]
        PreviousRsn,
        #[name = "alt_rsn"]
        AltRsn,
        #[name = "loc"]
        Loc,
        #[name = "timezone"]
        Timezone,
    }

    impl From<ProfileChoice> for ProfileField {
        fn from(choice: ProfileChoice) -> Self {
            match choice {
                ProfileChoice::PreviousRsn => Self::PreviousRsn,
                ProfileChoice::AltRsn => Self::AltRsn,
                ProfileChoice::Loc => Self::Loc,
                ProfileChoice::Timezone => Self::Timezone,
            }
        }
    }

    /// Updates a field of your own member profile.
    #[poise::command(slash_command, category = "profile")]
    pub async fn update_profile(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Field to update"] field: ProfileChoice,
        #[description = "New value"] value: String,
    ) -> Result<()> {
        let field = ProfileField::from(field);
        let db = ctx.data().db().await?;

        let reply = match member::update_profile(&db, db_id(ctx.author().id.get()), field, &value)
            .await?
        {
            Some(display) => {
                let embed = serenity::CreateEmbed::default()
                    .title("Profile Updated")
                    .color(0x0000_FF00)
                    .field(title_case(field.key()), display, false);
                poise::CreateReply::default().embed(embed)
            }
            None => poise::CreateReply::default().content(NOT_REGISTERED),
        };
        ctx.send(reply.ephemeral(true)).await?;
        Ok(())
    }

    /// Marks yourself as on leave, or back from leave.
    #[poise::command(slash_command, rename = "temp-leave", category = "profile")]
    pub async fn temp_leave(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "True to go on leave, false when you are back"] on_leave: bool,
        #[description = "Optional reason, kept in your notes"] reason: Option<String>,
    ) -> Result<()> {
        let db = ctx.data().db().await?;
        let user = user_label(ctx.author()).to_string();
        let today = Utc::now().date_naive();

        let updated = member::set_own_leave(
            &db,
            db_id(ctx.author().id.get()),
            on_leave,
            reason.as_deref(),
            today,
        )
        .await?;

        match updated {
            Some(_) if on_leave => {
                ctx.say(format!("**{user}** you are now marked as on leave."))
                    .await?;
            }
            Some(_) => {
                ctx.say(format!(
                    "**{user}** welcome back! You are no longer marked as on leave."
                ))
                .await?;
            }
            None => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(NOT_REGISTERED)
                        .ephemeral(true),
                )
                .await?;
            }
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
