//! Command usage entity - Append-only audit log of slash command invocations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Command usage database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "command_usage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub command_name: String,
    /// Invoking member, if they are on the roster
    pub member_id: Option<i64>,
    pub channel_id: i64,
    pub guild_id: Option<i64>,
    pub success: bool,
    pub error_message: Option<String>,
    pub timestamp: DateTimeUtc,
}

/// Audit rows optionally point at a member
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
