//! Lottery entry entity - Entries a member bought in one lottery.
//!
//! There is at most one row per (lottery, member); further purchases increase
//! `entries_purchased`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lottery entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lottery_entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub lottery_id: i64,
    pub member_id: i64,
    pub entries_purchased: i32,
}

/// Each entry belongs to one lottery and one member
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lottery::Entity",
        from = "Column::LotteryId",
        to = "super::lottery::Column::Id"
    )]
    Lottery,
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
}

impl Related<super::lottery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lottery.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
