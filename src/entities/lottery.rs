//! Lottery entity - A timed draw with a per-member entry cap.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lottery database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lottery")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Opening time (UTC)
    pub start_date: DateTime,
    /// Closing time (UTC); a winner may be drawn once this has passed
    pub end_date: DateTime,
    /// Cost of one entry in gp
    pub entry_fee: i64,
    /// Maximum entries a single member may hold
    pub max_entries: i32,
    pub winner_member_id: Option<i64>,
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Lottery and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One lottery has many entries
    #[sea_orm(has_many = "super::lottery_entry::Entity")]
    Entries,
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::WinnerMemberId",
        to = "super::member::Column::Id"
    )]
    Winner,
}

impl Related<super::lottery_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
