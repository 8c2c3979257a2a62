//! Member entity - The clan roster.
//!
//! One row per clan member, keyed by the in-game name (RSN). Discord identity,
//! membership rank, leave/activity flags, and the competition point counters
//! all live on this row.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ordered list of RSNs stored as a JSON array column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct RsnList(pub Vec<String>);

impl RsnList {
    /// Builds a list from comma-separated input, dropping blank entries.
    #[must_use]
    pub fn from_csv(input: &str) -> Self {
        Self(
            input
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(ToString::to_string)
                .collect(),
        )
    }

    /// Joins the names with `", "`, or `None` when the list is empty.
    #[must_use]
    pub fn joined(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.join(", "))
        }
    }
}

/// Member database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    /// Stable numeric id, the target of every foreign key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// In-game name, unique across the roster
    #[sea_orm(unique)]
    pub rsn: String,
    /// Discord username
    pub discord_id: Option<String>,
    /// Discord user snowflake
    #[sea_orm(unique)]
    pub discord_id_num: Option<i64>,
    /// Index into the configured rank names
    pub membership_level: i32,
    /// Date the member joined the clan
    pub join_date: Option<Date>,
    pub active: bool,
    pub on_leave: bool,
    /// Alternate accounts
    #[sea_orm(column_type = "Json")]
    pub alt_rsn: RsnList,
    /// Names the member played under before
    #[sea_orm(column_type = "Json")]
    pub previous_rsn: RsnList,
    pub notes: Option<String>,
    pub special_status: Option<String>,
    /// Two-letter country code
    pub loc: Option<String>,
    pub timezone: Option<String>,
    pub skill_comp_pts: i32,
    pub skill_comp_pts_life: i32,
    pub boss_comp_pts: i32,
    pub boss_comp_pts_life: i32,
}

/// Defines relationships between Member and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One member has many lottery entries
    #[sea_orm(has_many = "super::lottery_entry::Entity")]
    LotteryEntries,
    /// One member has many audit rows
    #[sea_orm(has_many = "super::command_usage::Entity")]
    CommandUsage,
}

impl Related<super::lottery_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LotteryEntries.def()
    }
}

impl Related<super::command_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommandUsage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsn_list_from_csv() {
        let list = RsnList::from_csv(" Alt One, ,AltTwo ,");
        assert_eq!(list.0, vec!["Alt One".to_string(), "AltTwo".to_string()]);
        assert_eq!(list.joined().as_deref(), Some("Alt One, AltTwo"));
        assert_eq!(RsnList::from_csv("  ").joined(), None);
    }
}
