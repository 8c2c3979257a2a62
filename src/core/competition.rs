//! Competition business logic - Skill and boss weeks.
//!
//! A competition moves through Scheduled, Active, and Awaiting results on the
//! clock alone; it is Concluded the moment an admin records its placements.
//! Placements award 3/2/1 points to both the current and lifetime counters of
//! the competition's type.

use crate::{
    core::member::get_member_by_rsn,
    entities::{Competition, CompetitionType, Member, competition, member},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use std::fmt::Write;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr};

/// Input format for competition and lottery times.
pub const DATETIME_INPUT_FMT: &str = "%Y-%m-%d %H:%M";

/// Points for first, second, and third place.
pub const PLACEMENT_POINTS: [i32; 3] = [3, 2, 1];

/// How many concluded competitions `history` shows.
pub const HISTORY_LIMIT: u64 = 10;

/// Parses a `YYYY-MM-DD HH:MM` time typed by a user.
pub fn parse_input_datetime(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), DATETIME_INPUT_FMT).map_err(|_| {
        Error::validation(
            "Invalid date format. Please use YYYY-MM-DD HH:MM format (e.g. '2024-03-20 18:00')",
        )
    })
}

impl CompetitionType {
    /// Name used in replies, e.g. `skill week`.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Skill => "skill week",
            Self::Boss => "boss week",
        }
    }

    /// Short tag used in command names.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Boss => "boss",
        }
    }

    const fn points_column(self) -> member::Column {
        match self {
            Self::Skill => member::Column::SkillCompPts,
            Self::Boss => member::Column::BossCompPts,
        }
    }

    const fn lifetime_column(self) -> member::Column {
        match self {
            Self::Skill => member::Column::SkillCompPtsLife,
            Self::Boss => member::Column::BossCompPtsLife,
        }
    }

    /// Current points a member holds for this type.
    #[must_use]
    pub const fn points_of(self, member: &member::Model) -> i32 {
        match self {
            Self::Skill => member.skill_comp_pts,
            Self::Boss => member.boss_comp_pts,
        }
    }
}

/// Where a competition is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitionStage {
    Scheduled,
    Active,
    AwaitingResults,
    Concluded,
}

impl CompetitionStage {
    /// Computes the stage of `competition` at `now`.
    #[must_use]
    pub fn of(competition: &competition::Model, now: NaiveDateTime) -> Self {
        if competition.winner.is_some() {
            Self::Concluded
        } else if now < competition.start_date {
            Self::Scheduled
        } else if now < competition.end_date {
            Self::Active
        } else {
            Self::AwaitingResults
        }
    }

    /// Label shown in `comp-status`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Active => "Active",
            Self::AwaitingResults => "Awaiting results",
            Self::Concluded => "Concluded",
        }
    }
}

/// Input for creating a competition.
#[derive(Debug, Clone)]
pub struct NewCompetition {
    pub name: String,
    pub competition_type: CompetitionType,
    pub metric: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

/// Creates a competition with no placements.
pub async fn add_competition(
    db: &DatabaseConnection,
    new_competition: NewCompetition,
) -> Result<competition::Model> {
    let name = new_competition.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Competition name cannot be empty."));
    }
    let metric = new_competition.metric.trim().to_lowercase();
    if metric.is_empty() {
        return Err(Error::validation("Metric cannot be empty."));
    }
    if new_competition.end_date <= new_competition.start_date {
        return Err(Error::validation("End date must be after start date."));
    }

    let model = competition::ActiveModel {
        name: Set(name),
        competition_type: Set(new_competition.competition_type),
        metric: Set(metric),
        start_date: Set(new_competition.start_date),
        end_date: Set(new_competition.end_date),
        wom_id: Set(None),
        winner: Set(None),
        second_place: Set(None),
        third_place: Set(None),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Stores the id of the mirrored Wise Old Man competition.
pub async fn set_wom_id(db: &DatabaseConnection, id: i64, wom_id: i64) -> Result<()> {
    Competition::update_many()
        .col_expr(competition::Column::WomId, Expr::value(wom_id))
        .filter(competition::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Gets a competition by id.
pub async fn get_competition(db: &DatabaseConnection, id: i64) -> Result<Option<competition::Model>> {
    Competition::find_by_id(id).one(db).await.map_err(Into::into)
}

/// One awarded placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub rsn: String,
    pub points: i32,
}

/// Records the top three of a competition and awards their points.
///
/// Runs in one transaction: the placements and all three point awards are
/// written together or not at all. A competition that already has results
/// is rejected.
pub async fn record_results(
    db: &DatabaseConnection,
    id: i64,
    competition_type: CompetitionType,
    placements: [&str; 3],
) -> Result<(competition::Model, Vec<Placement>)> {
    let txn = db.begin().await?;

    let existing = Competition::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::CompetitionNotFound { id })?;

    if existing.competition_type != competition_type {
        return Err(Error::validation(format!(
            "Competition {id} is not a {} competition.",
            competition_type.display_name()
        )));
    }
    if existing.winner.is_some() {
        return Err(Error::validation(format!(
            "Competition {id} already has results recorded."
        )));
    }

    let mut members = Vec::with_capacity(placements.len());
    for rsn in placements {
        let found = get_member_by_rsn(&txn, rsn)
            .await?
            .ok_or_else(|| Error::MemberNotFound {
                rsn: rsn.trim().to_string(),
            })?;
        if members.iter().any(|m: &member::Model| m.id == found.id) {
            return Err(Error::validation(format!(
                "{} cannot take more than one place.",
                found.rsn
            )));
        }
        members.push(found);
    }

    let mut active: competition::ActiveModel = existing.into();
    active.winner = Set(Some(members[0].id));
    active.second_place = Set(Some(members[1].id));
    active.third_place = Set(Some(members[2].id));
    let concluded = active.update(&txn).await?;

    let points_column = competition_type.points_column();
    let lifetime_column = competition_type.lifetime_column();
    let mut awarded = Vec::with_capacity(members.len());
    for (member, points) in members.into_iter().zip(PLACEMENT_POINTS) {
        Member::update_many()
            .col_expr(points_column, Expr::col(points_column).add(points))
            .col_expr(lifetime_column, Expr::col(lifetime_column).add(points))
            .filter(member::Column::Id.eq(member.id))
            .exec(&txn)
            .await?;
        awarded.push(Placement {
            rsn: member.rsn,
            points,
        });
    }

    txn.commit().await?;
    Ok((concluded, awarded))
}

/// Members with points of this type, highest first.
pub async fn leaderboard(
    db: &DatabaseConnection,
    competition_type: CompetitionType,
) -> Result<Vec<(String, i32)>> {
    let column = competition_type.points_column();
    let members = Member::find()
        .filter(column.gt(0))
        .order_by_desc(column)
        .order_by_asc(member::Column::Rsn)
        .all(db)
        .await?;
    Ok(members
        .into_iter()
        .map(|m| {
            let points = competition_type.points_of(&m);
            (m.rsn, points)
        })
        .collect())
}

/// Names of competitions of this type the member has won, oldest first.
pub async fn wins(
    db: &DatabaseConnection,
    member_id: i64,
    competition_type: CompetitionType,
) -> Result<Vec<String>> {
    let won = Competition::find()
        .filter(competition::Column::Winner.eq(member_id))
        .filter(competition::Column::CompetitionType.eq(competition_type))
        .order_by_asc(competition::Column::EndDate)
        .all(db)
        .await?;
    Ok(won.into_iter().map(|c| c.name).collect())
}

/// The most recent concluded competitions of this type with their winner.
pub async fn history(
    db: &DatabaseConnection,
    competition_type: CompetitionType,
) -> Result<Vec<(String, String)>> {
    let rows = Competition::find()
        .filter(competition::Column::CompetitionType.eq(competition_type))
        .filter(competition::Column::Winner.is_not_null())
        .order_by_desc(competition::Column::EndDate)
        .order_by_desc(competition::Column::Id)
        .limit(HISTORY_LIMIT)
        .find_also_related(Member)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(comp, winner)| winner.map(|w| (comp.name, w.rsn)))
        .collect())
}

/// Reply for `*-comp-history`: the recent winners, or a note that none exist.
pub fn history_message(
    competition_type: CompetitionType,
    recent: &[(String, String)],
) -> Result<String> {
    let name = competition_type.display_name();
    if recent.is_empty() {
        return Ok(format!("No {name} competitions have been recorded yet."));
    }

    let mut message = format!("**Recent {name} Competitions**\n\n");
    for (competition, winner) in recent {
        writeln!(message, "**{competition}** - Won by **{winner}**")?;
    }
    Ok(message)
}

/// The latest competitions of this type by start time.
pub async fn recent(
    db: &DatabaseConnection,
    competition_type: CompetitionType,
    limit: u64,
) -> Result<Vec<competition::Model>> {
    Competition::find()
        .filter(competition::Column::CompetitionType.eq(competition_type))
        .order_by_desc(competition::Column::StartDate)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}
