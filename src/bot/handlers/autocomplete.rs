//! Autocomplete handlers for Discord slash command parameters.

use crate::{
    bot::BotData,
    core::member,
    errors::Error,
};

/// Discord shows at most 25 suggestions.
const MAX_SUGGESTIONS: usize = 25;

/// Suggests member RSNs containing the partial input.
///
/// Lookup failures yield no suggestions rather than an error; autocomplete
/// has no way to report one.
pub async fn autocomplete_rsn(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(db) = ctx.data().db().await else {
        return Vec::new();
    };
    let Ok(members) = member::list_members_by_rsn(&db).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    members
        .into_iter()
        .map(|m| m.rsn)
        .filter(|rsn| rsn.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Suggests keys from the update allowlist.
pub async fn autocomplete_member_key(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let config = ctx.data().config();
    let partial_lower = partial.to_lowercase();
    config
        .updateable_keys
        .iter()
        .filter(|k| k.contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}
