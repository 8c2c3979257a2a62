//! Command checks.
//!
//! A check that returns `Ok(false)` stops the command before its body runs;
//! poise then reports `CommandCheckFailed`, which the error hook records in
//! the audit log.

use crate::{
    bot::BotData,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;

/// Reply sent to callers without the administrator permission.
pub const PERMISSION_DENIED: &str = "You don't have permission to use this command.";

/// Reply sent when a command's module is switched off in the configuration.
pub const MODULE_DISABLED: &str = "This command is currently disabled.";

/// True when the permission set includes administrator.
#[must_use]
pub fn has_admin(permissions: Option<serenity::Permissions>) -> bool {
    permissions.is_some_and(|p| p.administrator())
}

/// Lets the command run only for guild administrators.
pub async fn is_admin(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    let permissions = ctx.author_member().await.and_then(|m| m.permissions);
    if has_admin(permissions) {
        return Ok(true);
    }

    ctx.send(
        poise::CreateReply::default()
            .content(PERMISSION_DENIED)
            .ephemeral(true),
    )
    .await?;
    Ok(false)
}

/// True when the command's module is enabled in `modules`.
#[must_use]
pub fn command_enabled(category: Option<&str>, modules: &[String]) -> bool {
    category.is_none_or(|c| modules.iter().any(|m| m == c))
}

/// Global check: rejects commands from modules that are not enabled.
pub async fn module_enabled(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    let config = ctx.data().config();
    if command_enabled(ctx.command().category.as_deref(), &config.modules) {
        return Ok(true);
    }

    ctx.send(
        poise::CreateReply::default()
            .content(MODULE_DISABLED)
            .ephemeral(true),
    )
    .await?;
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_admin() {
        assert!(has_admin(Some(serenity::Permissions::ADMINISTRATOR)));
        assert!(has_admin(Some(
            serenity::Permissions::ADMINISTRATOR | serenity::Permissions::SEND_MESSAGES
        )));
        assert!(!has_admin(Some(serenity::Permissions::MANAGE_GUILD)));
        assert!(!has_admin(None));
    }

    #[test]
    fn test_command_enabled() {
        let modules = vec!["lookup".to_string(), "profile".to_string()];
        assert!(command_enabled(Some("lookup"), &modules));
        assert!(!command_enabled(Some("dev"), &modules));
        assert!(command_enabled(None, &modules));
    }
}
