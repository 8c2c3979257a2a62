//! Competition entity - Skill and boss weeks.
//!
//! A competition is created by an admin, optionally mirrored to Wise Old Man,
//! and concluded once its placements are recorded.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The two parallel competition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CompetitionType {
    /// Skill week
    #[sea_orm(string_value = "skill")]
    Skill,
    /// Boss week
    #[sea_orm(string_value = "boss")]
    Boss,
}

/// Competition database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "competition")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub competition_type: CompetitionType,
    /// Tracked skill or boss, e.g. `woodcutting` or `vorkath`
    pub metric: String,
    /// Start time (UTC)
    pub start_date: DateTime,
    /// End time (UTC)
    pub end_date: DateTime,
    /// Id of the mirrored Wise Old Man competition
    pub wom_id: Option<i64>,
    /// Member id of the winner
    pub winner: Option<i64>,
    pub second_place: Option<i64>,
    pub third_place: Option<i64>,
}

/// Placements reference the member table
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::Winner",
        to = "super::member::Column::Id"
    )]
    Winner,
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::SecondPlace",
        to = "super::member::Column::Id"
    )]
    SecondPlace,
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::ThirdPlace",
        to = "super::member::Column::Id"
    )]
    ThirdPlace,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Winner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
