//! General commands available to everyone.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Displays a summary of the bot's commands.
    #[poise::command(slash_command, prefix_command, category = "general")]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**CoffeeHouse Bot Help**\n\
        Here is a summary of the commands members can use.\n\n\
        **Membership**\n\
        • `/promotion-when` - Shows when you are eligible for your next rank.\n\
        • `/update_profile <field> <value>` - Updates your location, timezone, or alternate names.\n\
        • `/temp-leave <on_leave> [reason]` - Marks you as on leave or back.\n\
        • `/list-members`, `/yellowpages` - Browse the clan roster.\n\n\
        **Competitions**\n\
        • `/skill-comp-points`, `/boss-comp-points` - Your competition points.\n\
        • `/skill-comp-leaderboard`, `/boss-comp-leaderboard` - Points standings.\n\
        • `/skill-comp-wins`, `/boss-comp-wins` - Competitions you have won.\n\
        • `/skill-comp-history`, `/boss-comp-history` - Recent winners.\n\
        • `/comp-status <type>` - Where the latest competitions stand.\n\n\
        **Lottery**\n\
        • `/lottery_status` - The open lottery and its top entries.\n\n\
        Admin commands are listed in Discord's command picker for administrators.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
