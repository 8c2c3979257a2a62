//! Member business logic - Roster registration, lookup, and updates.
//!
//! RSN lookups are case-insensitive. Every write is a single parameterised
//! statement built through `SeaORM`; user input never becomes SQL text.

use crate::{
    config::BotConfig,
    entities::{Member, RsnList, member},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    QueryOrder, Set, Value,
    prelude::*,
    sea_query::{Expr, Func, SimpleExpr},
};

/// Longest name the game allows.
pub const MAX_RSN_LEN: usize = 12;

fn rsn_matches(rsn: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((Member, member::Column::Rsn))))
        .eq(rsn.trim().to_lowercase())
}

/// Finds a member by RSN, ignoring case.
pub async fn get_member_by_rsn<C>(db: &C, rsn: &str) -> Result<Option<member::Model>>
where
    C: ConnectionTrait,
{
    Member::find()
        .filter(rsn_matches(rsn))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the member linked to a Discord account.
pub async fn get_member_by_discord_id<C>(
    db: &C,
    discord_id_num: i64,
) -> Result<Option<member::Model>>
where
    C: ConnectionTrait,
{
    Member::find()
        .filter(member::Column::DiscordIdNum.eq(discord_id_num))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Which slice of the roster to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberFilter {
    /// Everyone
    All,
    /// Members flagged inactive
    Inactive,
    /// Members flagged on leave
    OnLeave,
}

/// Lists members matching `filter` in registration order.
pub async fn list_members(db: &DatabaseConnection, filter: MemberFilter) -> Result<Vec<member::Model>> {
    let query = match filter {
        MemberFilter::All => Member::find(),
        MemberFilter::Inactive => Member::find().filter(member::Column::Active.eq(false)),
        MemberFilter::OnLeave => Member::find().filter(member::Column::OnLeave.eq(true)),
    };
    query
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every member alphabetically by RSN.
pub async fn list_members_by_rsn(db: &DatabaseConnection) -> Result<Vec<member::Model>> {
    Member::find()
        .order_by_asc(member::Column::Rsn)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Input for registering a member.
#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub rsn: String,
    pub discord_id: Option<String>,
    pub discord_id_num: Option<i64>,
    pub membership_level: i32,
    pub join_date: Option<NaiveDate>,
    pub loc: Option<String>,
    pub timezone: Option<String>,
    pub notes: Option<String>,
}

/// Registers a new member.
///
/// Rejects an empty RSN and any RSN or Discord account already on the roster;
/// nothing is inserted in either case.
pub async fn add_member<C>(db: &C, new_member: NewMember) -> Result<member::Model>
where
    C: ConnectionTrait,
{
    let rsn = new_member.rsn.trim().to_string();
    if rsn.is_empty() {
        return Err(Error::validation("RSN cannot be empty."));
    }
    if rsn.chars().count() > MAX_RSN_LEN {
        return Err(Error::validation(format!(
            "RSN cannot be longer than {MAX_RSN_LEN} characters"
        )));
    }
    if new_member.membership_level < 0 {
        return Err(Error::validation("Membership level cannot be negative."));
    }

    if let Some(existing) = get_member_by_rsn(db, &rsn).await? {
        return Err(Error::DuplicateMember { rsn: existing.rsn });
    }
    if let Some(discord_id_num) = new_member.discord_id_num
        && let Some(existing) = get_member_by_discord_id(db, discord_id_num).await?
    {
        return Err(Error::DuplicateMember { rsn: existing.rsn });
    }

    let model = member::ActiveModel {
        rsn: Set(rsn),
        discord_id: Set(new_member.discord_id),
        discord_id_num: Set(new_member.discord_id_num),
        membership_level: Set(new_member.membership_level),
        join_date: Set(new_member.join_date),
        active: Set(true),
        on_leave: Set(false),
        alt_rsn: Set(RsnList::default()),
        previous_rsn: Set(RsnList::default()),
        notes: Set(new_member.notes),
        special_status: Set(None),
        loc: Set(new_member.loc),
        timezone: Set(new_member.timezone),
        skill_comp_pts: Set(0),
        skill_comp_pts_life: Set(0),
        boss_comp_pts: Set(0),
        boss_comp_pts_life: Set(0),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Member columns that admins may set by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberField {
    Rsn,
    DiscordId,
    DiscordIdNum,
    MembershipLevel,
    JoinDate,
    SpecialStatus,
    PreviousRsn,
    AltRsn,
    OnLeave,
    Active,
    Notes,
    Loc,
    Timezone,
    SkillCompPts,
    BossCompPts,
}

fn optional_text(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") || trimmed.eq_ignore_ascii_case("null") {
        Value::String(None)
    } else {
        Value::from(trimmed.to_string())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::validation(format!("{key} must be a whole number.")))
}

impl MemberField {
    /// Maps a column name to a field.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let field = match key {
            "rsn" => Self::Rsn,
            "discord_id" => Self::DiscordId,
            "discord_id_num" => Self::DiscordIdNum,
            "membership_level" => Self::MembershipLevel,
            "join_date" => Self::JoinDate,
            "special_status" => Self::SpecialStatus,
            "previous_rsn" => Self::PreviousRsn,
            "alt_rsn" => Self::AltRsn,
            "on_leave" => Self::OnLeave,
            "active" => Self::Active,
            "notes" => Self::Notes,
            "loc" => Self::Loc,
            "timezone" => Self::Timezone,
            "skill_comp_pts" => Self::SkillCompPts,
            "boss_comp_pts" => Self::BossCompPts,
            _ => return None,
        };
        Some(field)
    }

    /// Resolves `key` against the allowlist in `config`.
    pub fn allowed(key: &str, config: &BotConfig) -> Result<Self> {
        let key = key.trim();
        if !config.is_updateable(key) {
            return Err(Error::UnknownField {
                key: key.to_string(),
            });
        }
        Self::from_key(key).ok_or_else(|| Error::UnknownField {
            key: key.to_string(),
        })
    }

    /// The backing column.
    #[must_use]
    pub const fn column(self) -> member::Column {
        match self {
            Self::Rsn => member::Column::Rsn,
            Self::DiscordId => member::Column::DiscordId,
            Self::DiscordIdNum => member::Column::DiscordIdNum,
            Self::MembershipLevel => member::Column::MembershipLevel,
            Self::JoinDate => member::Column::JoinDate,
            Self::SpecialStatus => member::Column::SpecialStatus,
            Self::PreviousRsn => member::Column::PreviousRsn,
            Self::AltRsn => member::Column::AltRsn,
            Self::OnLeave => member::Column::OnLeave,
            Self::Active => member::Column::Active,
            Self::Notes => member::Column::Notes,
            Self::Loc => member::Column::Loc,
            Self::Timezone => member::Column::Timezone,
            Self::SkillCompPts => member::Column::SkillCompPts,
            Self::BossCompPts => member::Column::BossCompPts,
        }
    }

    /// Parses the raw text an admin typed into a value for this column.
    pub fn parse_value(self, raw: &str, config: &BotConfig) -> Result<Value> {
        let value = match self {
            Self::Rsn => {
                let rsn = raw.trim();
                if rsn.is_empty() || rsn.chars().count() > MAX_RSN_LEN {
                    return Err(Error::validation(format!(
                        "RSN must be 1-{MAX_RSN_LEN} characters"
                    )));
                }
                Value::from(rsn.to_string())
            }
            Self::DiscordId
            | Self::SpecialStatus
            | Self::Notes
            | Self::Loc
            | Self::Timezone => optional_text(raw),
            Self::DiscordIdNum => Value::from(parse_number::<i64>("discord_id_num", raw)?),
            Self::MembershipLevel => {
                let level = parse_number::<i32>("membership_level", raw)?;
                if level < 0 {
                    return Err(Error::validation("Membership level cannot be negative."));
                }
                Value::from(level)
            }
            Self::SkillCompPts => Value::from(parse_number::<i32>("skill_comp_pts", raw)?),
            Self::BossCompPts => Value::from(parse_number::<i32>("boss_comp_pts", raw)?),
            Self::JoinDate => {
                let date = NaiveDate::parse_from_str(raw.trim(), &config.datetime_fmt)
                    .map_err(|_| {
                        Error::validation(format!(
                            "join_date must match the format {}",
                            config.datetime_fmt
                        ))
                    })?;
                Value::from(date)
            }
            Self::PreviousRsn | Self::AltRsn => Value::from(RsnList::from_csv(raw)),
            Self::OnLeave | Self::Active => Value::from(config.is_truthy(raw)),
        };
        Ok(value)
    }
}

async fn set_field_where<C>(db: &C, column: member::Column, value: Value, rsn: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Member::update_many()
        .col_expr(column, Expr::value(value))
        .filter(rsn_matches(rsn))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::MemberNotFound {
            rsn: rsn.to_string(),
        });
    }
    Ok(())
}

/// Sets one allowlisted field on the member with the given RSN.
///
/// A new RSN may not match another member's RSN in any letter case. Changing
/// only the case of a member's own RSN is allowed.
pub async fn update_member(
    db: &DatabaseConnection,
    config: &BotConfig,
    rsn: &str,
    key: &str,
    raw_value: &str,
) -> Result<()> {
    let field = MemberField::allowed(key, config)?;
    let value = field.parse_value(raw_value, config)?;
    if field == MemberField::Rsn
        && let Some(existing) = get_member_by_rsn(db, raw_value.trim()).await?
    {
        let target = get_member_by_rsn(db, rsn)
            .await?
            .ok_or_else(|| Error::MemberNotFound {
                rsn: rsn.to_string(),
            })?;
        if existing.id != target.id {
            return Err(Error::DuplicateMember { rsn: existing.rsn });
        }
    }
    set_field_where(db, field.column(), value, rsn).await
}

/// Sets one allowlisted field on every member. Returns the number of rows.
pub async fn update_all_members(
    db: &DatabaseConnection,
    config: &BotConfig,
    key: &str,
    raw_value: &str,
) -> Result<u64> {
    let field = MemberField::allowed(key, config)?;
    let value = field.parse_value(raw_value, config)?;
    let result = Member::update_many()
        .col_expr(field.column(), Expr::value(value))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Marks a member active or inactive.
pub async fn set_active(db: &DatabaseConnection, rsn: &str, active: bool) -> Result<()> {
    set_field_where(db, member::Column::Active, Value::from(active), rsn).await
}

/// Marks a member on leave or returned.
pub async fn set_on_leave(db: &DatabaseConnection, rsn: &str, on_leave: bool) -> Result<()> {
    set_field_where(db, member::Column::OnLeave, Value::from(on_leave), rsn).await
}

/// Profile fields members may edit themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    PreviousRsn,
    AltRsn,
    Loc,
    Timezone,
}

impl ProfileField {
    /// Column name, also used for the reply title.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PreviousRsn => "previous_rsn",
            Self::AltRsn => "alt_rsn",
            Self::Loc => "loc",
            Self::Timezone => "timezone",
        }
    }

    const fn column(self) -> member::Column {
        match self {
            Self::PreviousRsn => member::Column::PreviousRsn,
            Self::AltRsn => member::Column::AltRsn,
            Self::Loc => member::Column::Loc,
            Self::Timezone => member::Column::Timezone,
        }
    }

    /// Validates and normalises `raw`, returning the stored value and its
    /// display form.
    pub fn normalize(self, raw: &str) -> Result<(Value, String)> {
        let raw = raw.trim();
        match self {
            Self::Loc => {
                if raw.chars().count() != 2 {
                    return Err(Error::validation(
                        "Location must be a 2-letter country code (e.g. US, UK, CA)",
                    ));
                }
                let loc = raw.to_uppercase();
                Ok((Value::from(loc.clone()), loc))
            }
            Self::AltRsn => {
                let names = RsnList::from_csv(raw);
                if names.0.iter().any(|n| n.chars().count() > MAX_RSN_LEN) {
                    return Err(Error::validation(
                        "Alternate RSNs cannot be longer than 12 characters",
                    ));
                }
                let display = names.joined().unwrap_or_default();
                Ok((Value::from(names), display))
            }
            Self::PreviousRsn => {
                if raw.chars().count() > MAX_RSN_LEN {
                    return Err(Error::validation(
                        "Previous RSN cannot be longer than 12 characters",
                    ));
                }
                let names = RsnList::from_csv(raw);
                Ok((Value::from(names), raw.to_string()))
            }
            Self::Timezone => {
                let timezone = raw.to_uppercase();
                Ok((Value::from(timezone.clone()), timezone))
            }
        }
    }
}

/// Updates the caller's own profile.
///
/// Returns the display value, or `None` if the caller is not registered.
pub async fn update_profile(
    db: &DatabaseConnection,
    discord_id_num: i64,
    field: ProfileField,
    raw_value: &str,
) -> Result<Option<String>> {
    let (value, display) = field.normalize(raw_value)?;

    let result = Member::update_many()
        .col_expr(field.column(), Expr::value(value))
        .filter(member::Column::DiscordIdNum.eq(discord_id_num))
        .exec(db)
        .await?;

    Ok((result.rows_affected > 0).then_some(display))
}

/// Toggles the caller's own leave flag, appending `reason` to their notes.
///
/// Returns `None` if the caller is not registered.
pub async fn set_own_leave(
    db: &DatabaseConnection,
    discord_id_num: i64,
    on_leave: bool,
    reason: Option<&str>,
    today: NaiveDate,
) -> Result<Option<member::Model>> {
    let Some(existing) = get_member_by_discord_id(db, discord_id_num).await? else {
        return Ok(None);
    };

    let mut notes = existing.notes.clone();
    if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
        let label = if on_leave { "Leave" } else { "Returned" };
        let entry = format!("{label} {}: {reason}", today.format("%Y-%m-%d"));
        notes = Some(match notes {
            Some(previous) if !previous.is_empty() => format!("{previous}\n{entry}"),
            _ => entry,
        });
    }

    let mut active: member::ActiveModel = existing.into();
    active.on_leave = Set(on_leave);
    active.notes = Set(notes);
    Ok(Some(active.update(db).await?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_add_member_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = add_member(
            &db,
            NewMember {
                rsn: "   ".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = add_member(
            &db,
            NewMember {
                rsn: "ThisNameIsWayTooLong".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_member_defaults() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Zezima", Some(1001)).await?;

        assert_eq!(member.rsn, "Zezima");
        assert_eq!(member.membership_level, 0);
        assert!(member.active);
        assert!(!member.on_leave);
        assert_eq!(member.skill_comp_pts, 0);
        assert!(member.alt_rsn.0.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_rsn_rejected_without_insert() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_member(&db, "Zezima", Some(1001)).await?;

        let result = add_member(
            &db,
            NewMember {
                rsn: "zEZIMA".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::DuplicateMember { rsn }) if rsn == "Zezima"));

        let all = list_members(&db, MemberFilter::All).await?;
        assert_eq!(all.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_discord_id_rejected_without_insert() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_member(&db, "Zezima", Some(1001)).await?;

        let result = add_member(
            &db,
            NewMember {
                rsn: "Lynx Titan".to_string(),
                discord_id_num: Some(1001),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::DuplicateMember { .. })));
        assert!(get_member_by_rsn(&db, "Lynx Titan").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_member(&db, "Lynx Titan", None).await?;

        assert!(get_member_by_rsn(&db, "lynx titan").await?.is_some());
        assert!(get_member_by_rsn(&db, " LYNX TITAN ").await?.is_some());
        assert!(get_member_by_rsn(&db, "lynx").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_member_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let config = BotConfig::default();
        create_test_member(&db, "Zezima", Some(1001)).await?;

        update_member(&db, &config, "zezima", "membership_level", "2").await?;
        update_member(&db, &config, "Zezima", "join_date", "2024-01-31").await?;
        update_member(&db, &config, "Zezima", "alt_rsn", "Zez Alt, Zez Iron").await?;
        update_member(&db, &config, "Zezima", "on_leave", "yup").await?;
        update_member(&db, &config, "Zezima", "notes", "Founding member").await?;

        let member = get_member_by_rsn(&db, "Zezima").await?.unwrap();
        assert_eq!(member.membership_level, 2);
        assert_eq!(member.join_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(member.alt_rsn.0, vec!["Zez Alt", "Zez Iron"]);
        assert!(member.on_leave);
        assert_eq!(member.notes.as_deref(), Some("Founding member"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_member_rejections() -> Result<()> {
        let db = setup_test_db().await?;
        let config = BotConfig::default();
        create_test_member(&db, "Zezima", None).await?;

        let result = update_member(&db, &config, "Zezima", "id", "5").await;
        assert!(matches!(result, Err(Error::UnknownField { .. })));

        let result = update_member(&db, &config, "Zezima", "membership_level", "two").await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = update_member(&db, &config, "Zezima", "join_date", "31/01/2024").await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = update_member(&db, &config, "Nobody", "notes", "hi").await;
        assert!(matches!(result, Err(Error::MemberNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_rename_cannot_take_another_members_rsn() -> Result<()> {
        let db = setup_test_db().await?;
        let config = BotConfig::default();
        create_test_member(&db, "Zezima", None).await?;
        create_test_member(&db, "Woox", None).await?;

        let result = update_member(&db, &config, "Woox", "rsn", "zezima").await;
        assert!(matches!(result, Err(Error::DuplicateMember { rsn }) if rsn == "Zezima"));
        assert!(get_member_by_rsn(&db, "Woox").await?.is_some());

        update_member(&db, &config, "Zezima", "rsn", "ZEZIMA").await?;
        let renamed = get_member_by_rsn(&db, "zezima").await?.unwrap();
        assert_eq!(renamed.rsn, "ZEZIMA");

        update_member(&db, &config, "Woox", "rsn", "Woox Alt").await?;
        assert!(get_member_by_rsn(&db, "Woox Alt").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_allowlist_comes_from_config() -> Result<()> {
        let db = setup_test_db().await?;
        let config = BotConfig {
            updateable_keys: vec!["notes".to_string()],
            ..BotConfig::default()
        };
        create_test_member(&db, "Zezima", None).await?;

        let result = update_member(&db, &config, "Zezima", "rsn", "Zezima2").await;
        assert!(matches!(result, Err(Error::UnknownField { .. })));
        update_member(&db, &config, "Zezima", "notes", "ok").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_update_all_members() -> Result<()> {
        let db = setup_test_db().await?;
        let config = BotConfig::default();
        create_test_member(&db, "Zezima", None).await?;
        create_test_member(&db, "Lynx Titan", None).await?;

        let updated = update_all_members(&db, &config, "timezone", "UTC").await?;
        assert_eq!(updated, 2);
        for member in list_members(&db, MemberFilter::All).await? {
            assert_eq!(member.timezone.as_deref(), Some("UTC"));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_flags_and_filters() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_member(&db, "Zezima", None).await?;
        create_test_member(&db, "Lynx Titan", None).await?;
        create_test_member(&db, "Woox", None).await?;

        set_active(&db, "Zezima", false).await?;
        set_on_leave(&db, "woox", true).await?;

        let inactive = list_members(&db, MemberFilter::Inactive).await?;
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].rsn, "Zezima");

        let on_leave = list_members(&db, MemberFilter::OnLeave).await?;
        assert_eq!(on_leave.len(), 1);
        assert_eq!(on_leave[0].rsn, "Woox");

        let sorted: Vec<String> = list_members_by_rsn(&db)
            .await?
            .into_iter()
            .map(|m| m.rsn)
            .collect();
        assert_eq!(sorted, vec!["Lynx Titan", "Woox", "Zezima"]);

        assert!(matches!(
            set_active(&db, "Nobody", true).await,
            Err(Error::MemberNotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_profile_normalization() {
        let (_, display) = ProfileField::Loc.normalize("us").unwrap();
        assert_eq!(display, "US");
        assert!(matches!(
            ProfileField::Loc.normalize("USA"),
            Err(Error::Validation { message }) if message == "Location must be a 2-letter country code (e.g. US, UK, CA)"
        ));

        let (_, display) = ProfileField::AltRsn.normalize("Alt One , AltTwo").unwrap();
        assert_eq!(display, "Alt One, AltTwo");
        assert!(ProfileField::AltRsn.normalize("Fine, ThisIsTooLongName").is_err());

        assert!(ProfileField::PreviousRsn.normalize("ThisIsTooLongName").is_err());
        let (_, display) = ProfileField::Timezone.normalize("est").unwrap();
        assert_eq!(display, "EST");
    }

    #[tokio::test]
    async fn test_update_profile() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_member(&db, "Zezima", Some(1001)).await?;

        let shown = update_profile(&db, 1001, ProfileField::Loc, "ca").await?;
        assert_eq!(shown.as_deref(), Some("CA"));
        let shown = update_profile(&db, 1001, ProfileField::AltRsn, "Zez Alt,Zez Iron").await?;
        assert_eq!(shown.as_deref(), Some("Zez Alt, Zez Iron"));

        let member = get_member_by_discord_id(&db, 1001).await?.unwrap();
        assert_eq!(member.loc.as_deref(), Some("CA"));
        assert_eq!(member.alt_rsn.0.len(), 2);

        assert_eq!(update_profile(&db, 9999, ProfileField::Loc, "ca").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_own_leave_appends_reason() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_member(&db, "Zezima", Some(1001)).await?;
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let member = set_own_leave(&db, 1001, true, Some("Holiday"), today)
            .await?
            .unwrap();
        assert!(member.on_leave);
        assert_eq!(member.notes.as_deref(), Some("Leave 2025-03-01: Holiday"));

        let member = set_own_leave(&db, 1001, false, Some("Back"), today)
            .await?
            .unwrap();
        assert!(!member.on_leave);
        assert_eq!(
            member.notes.as_deref(),
            Some("Leave 2025-03-01: Holiday\nReturned 2025-03-01: Back")
        );

        assert!(set_own_leave(&db, 42, true, None, today).await?.is_none());
        Ok(())
    }
}
