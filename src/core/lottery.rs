//! Lottery business logic
//!
//! A lottery is open while `start_date <= now < end_date`, ended once
//! `end_date` passes, and closed for good when a winner is drawn. Each entry
//! bought is one ticket in the draw, so a member's chance is proportional to
//! their entries.

use crate::{
    entities::{Lottery, LotteryEntry, Member, lottery, lottery_entry, member},
    errors::{Error, Result},
};
use chrono::{NaiveDateTime, TimeDelta};
use rand::{Rng, seq::IndexedRandom};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};

/// Entries shown under "Top Entries".
pub const TOP_ENTRIES: usize = 5;

/// Where a lottery is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotteryStage {
    /// Not started yet
    Scheduled,
    /// Accepting entries
    Open,
    /// Past its end date, no winner yet
    Ended,
    /// Winner selected
    Drawn,
}

impl LotteryStage {
    /// Computes the stage of `lottery` at `now`.
    #[must_use]
    pub fn of(lottery: &lottery::Model, now: NaiveDateTime) -> Self {
        if lottery.winner_member_id.is_some() {
            Self::Drawn
        } else if now < lottery.start_date {
            Self::Scheduled
        } else if now < lottery.end_date {
            Self::Open
        } else {
            Self::Ended
        }
    }
}

/// Input for creating a lottery.
#[derive(Debug, Clone, Copy)]
pub struct NewLottery {
    pub start_date: NaiveDateTime,
    pub duration_days: i64,
    pub entry_fee: i64,
    pub max_entries: i32,
}

/// Creates a lottery after validating its terms against `now`.
pub async fn create_lottery(
    db: &DatabaseConnection,
    new_lottery: NewLottery,
    now: NaiveDateTime,
) -> Result<lottery::Model> {
    if new_lottery.entry_fee < 0 {
        return Err(Error::validation("Entry fee cannot be negative."));
    }
    if new_lottery.max_entries <= 0 {
        return Err(Error::validation("Maximum entries must be greater than 0."));
    }
    if new_lottery.duration_days < 1 {
        return Err(Error::validation("Duration must be at least 1 day."));
    }
    if new_lottery.start_date < now {
        return Err(Error::validation("Start date cannot be in the past."));
    }
    let end_date = TimeDelta::try_days(new_lottery.duration_days)
        .and_then(|d| new_lottery.start_date.checked_add_signed(d))
        .ok_or_else(|| Error::validation("Duration is too long."))?;

    let model = lottery::ActiveModel {
        start_date: Set(new_lottery.start_date),
        end_date: Set(end_date),
        entry_fee: Set(new_lottery.entry_fee),
        max_entries: Set(new_lottery.max_entries),
        winner_member_id: Set(None),
        created_at: Set(now.and_utc()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Gets a lottery by id.
pub async fn get_lottery(db: &DatabaseConnection, id: i64) -> Result<Option<lottery::Model>> {
    Lottery::find_by_id(id).one(db).await.map_err(Into::into)
}

/// The open lottery that started most recently, if any.
pub async fn active_lottery(
    db: &DatabaseConnection,
    now: NaiveDateTime,
) -> Result<Option<lottery::Model>> {
    Lottery::find()
        .filter(lottery::Column::StartDate.lte(now))
        .filter(lottery::Column::EndDate.gt(now))
        .filter(lottery::Column::WinnerMemberId.is_null())
        .order_by_desc(lottery::Column::StartDate)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Every entry of a lottery with the member's RSN, most entries first.
pub async fn entry_standings(
    db: &DatabaseConnection,
    lottery_id: i64,
) -> Result<Vec<(String, i32)>> {
    let rows = LotteryEntry::find()
        .filter(lottery_entry::Column::LotteryId.eq(lottery_id))
        .order_by_desc(lottery_entry::Column::EntriesPurchased)
        .order_by_asc(lottery_entry::Column::Id)
        .find_also_related(Member)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(entry, member)| member.map(|m| (m.rsn, entry.entries_purchased)))
        .collect())
}

/// Draws one member id, weighted by entries.
///
/// Builds a pool holding each member id once per entry and picks uniformly
/// from it. Returns the winner and the pool size, or `None` for an empty pool.
pub fn draw_weighted<R>(entries: &[(i64, i32)], rng: &mut R) -> Option<(i64, usize)>
where
    R: Rng + ?Sized,
{
    let pool: Vec<i64> = entries
        .iter()
        .flat_map(|&(member_id, count)| {
            std::iter::repeat_n(member_id, usize::try_from(count).unwrap_or(0))
        })
        .collect();
    pool.choose(rng).map(|&winner| (winner, pool.len()))
}

/// Outcome of a draw.
#[derive(Debug, Clone)]
pub struct DrawResult {
    pub lottery_id: i64,
    pub winner: member::Model,
    pub total_entries: usize,
}

/// Draws and stores the winner of an ended lottery.
pub async fn select_winner<R>(
    db: &DatabaseConnection,
    id: i64,
    now: NaiveDateTime,
    rng: &mut R,
) -> Result<DrawResult>
where
    R: Rng + ?Sized,
{
    let lottery = get_lottery(db, id)
        .await?
        .ok_or(Error::LotteryNotFound { id })?;

    match LotteryStage::of(&lottery, now) {
        LotteryStage::Drawn => {
            return Err(Error::Lottery {
                message: "A winner has already been selected for this lottery.".to_string(),
            });
        }
        LotteryStage::Scheduled | LotteryStage::Open => {
            return Err(Error::Lottery {
                message: "This lottery is still ongoing. Cannot select a winner yet.".to_string(),
            });
        }
        LotteryStage::Ended => {}
    }

    let entries: Vec<(i64, i32)> = LotteryEntry::find()
        .filter(lottery_entry::Column::LotteryId.eq(id))
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.member_id, e.entries_purchased))
        .collect();

    let (winner_id, total_entries) =
        draw_weighted(&entries, rng).ok_or_else(|| Error::Lottery {
            message: "No entries found for this lottery.".to_string(),
        })?;

    // Guarded on a null winner so two concurrent draws cannot both land.
    let result = Lottery::update_many()
        .col_expr(lottery::Column::WinnerMemberId, Expr::value(winner_id))
        .filter(lottery::Column::Id.eq(id))
        .filter(lottery::Column::WinnerMemberId.is_null())
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::Lottery {
            message: "A winner has already been selected for this lottery.".to_string(),
        });
    }

    let winner = Member::find_by_id(winner_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::Lottery {
            message: format!("Winning member {winner_id} no longer exists."),
        })?;

    Ok(DrawResult {
        lottery_id: id,
        winner,
        total_entries,
    })
}

/// Buys `entries` more entries for a member. Returns their new total.
///
/// The cap is checked and the row written inside one transaction; a purchase
/// that would exceed `max_entries` changes nothing.
pub async fn add_entries(
    db: &DatabaseConnection,
    lottery_id: i64,
    member_id: i64,
    entries: i32,
    now: NaiveDateTime,
) -> Result<i32> {
    if entries <= 0 {
        return Err(Error::validation("Entries must be greater than 0."));
    }

    let txn = db.begin().await?;

    let lottery = Lottery::find_by_id(lottery_id)
        .one(&txn)
        .await?
        .ok_or(Error::LotteryNotFound { id: lottery_id })?;
    if LotteryStage::of(&lottery, now) != LotteryStage::Open {
        return Err(Error::Lottery {
            message: format!("Lottery {lottery_id} is not open for entries."),
        });
    }

    let existing = LotteryEntry::find()
        .filter(lottery_entry::Column::LotteryId.eq(lottery_id))
        .filter(lottery_entry::Column::MemberId.eq(member_id))
        .one(&txn)
        .await?;
    let current = existing.as_ref().map_or(0, |e| e.entries_purchased);

    let total = current
        .checked_add(entries)
        .filter(|&t| t <= lottery.max_entries)
        .ok_or(Error::EntryCapExceeded {
            current,
            requested: entries,
            max: lottery.max_entries,
        })?;

    match existing {
        Some(entry) => {
            let mut active: lottery_entry::ActiveModel = entry.into();
            active.entries_purchased = Set(total);
            active.update(&txn).await?;
        }
        None => {
            lottery_entry::ActiveModel {
                lottery_id: Set(lottery_id),
                member_id: Set(member_id),
                entries_purchased: Set(total),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::NaiveDate;
    use rand::{SeedableRng, rngs::StdRng};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn terms(start: NaiveDateTime) -> NewLottery {
        NewLottery {
            start_date: start,
            duration_days: 7,
            entry_fee: 1_000_000,
            max_entries: 5,
        }
    }

    #[tokio::test]
    async fn test_create_lottery_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let cases = [
            (NewLottery { entry_fee: -1, ..terms(now()) }, "Entry fee cannot be negative."),
            (NewLottery { max_entries: 0, ..terms(now()) }, "Maximum entries must be greater than 0."),
            (NewLottery { duration_days: 0, ..terms(now()) }, "Duration must be at least 1 day."),
            (terms(now() - TimeDelta::minutes(1)), "Start date cannot be in the past."),
        ];
        for (input, expected) in cases {
            let result = create_lottery(&db, input, now()).await;
            assert!(matches!(result, Err(Error::Validation { message }) if message == expected));
        }

        let created = create_lottery(&db, terms(now()), now()).await?;
        assert_eq!(created.end_date, now() + TimeDelta::days(7));
        assert_eq!(LotteryStage::of(&created, now()), LotteryStage::Open);
        Ok(())
    }

    #[test]
    fn test_draw_weighted_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(draw_weighted(&[], &mut rng), None);
        assert_eq!(draw_weighted(&[(1, 0)], &mut rng), None);
        assert_eq!(draw_weighted(&[(9, 4)], &mut rng), Some((9, 4)));
    }

    #[test]
    fn test_draw_weighted_distribution() {
        let mut rng = StdRng::seed_from_u64(42);
        let entries = [(1, 3), (2, 1)];
        let trials = 20_000;
        let a_wins = (0..trials)
            .filter(|_| draw_weighted(&entries, &mut rng).unwrap().0 == 1)
            .count();

        #[allow(clippy::cast_precision_loss)]
        let share = a_wins as f64 / f64::from(trials);
        assert!((0.72..0.78).contains(&share), "share was {share}");
    }

    #[tokio::test]
    async fn test_entry_cap_is_all_or_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Zezima", Some(1001)).await?;
        let lottery = create_test_lottery(&db, now()).await?;
        let during = now() + TimeDelta::hours(1);

        assert_eq!(add_entries(&db, lottery.id, member.id, 3, during).await?, 3);

        let result = add_entries(&db, lottery.id, member.id, 3, during).await;
        assert!(matches!(
            result,
            Err(Error::EntryCapExceeded { current: 3, requested: 3, max: 5 })
        ));
        assert_eq!(
            entry_standings(&db, lottery.id).await?,
            vec![("Zezima".to_string(), 3)]
        );

        assert_eq!(add_entries(&db, lottery.id, member.id, 2, during).await?, 5);

        let result = add_entries(&db, lottery.id, member.id, 0, during).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_entries_rejected_outside_open_window() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Zezima", None).await?;
        let lottery = create_lottery(&db, terms(now() + TimeDelta::days(1)), now()).await?;

        let result = add_entries(&db, lottery.id, member.id, 1, now()).await;
        assert!(matches!(result, Err(Error::Lottery { .. })));

        let after = now() + TimeDelta::days(30);
        let result = add_entries(&db, lottery.id, member.id, 1, after).await;
        assert!(matches!(result, Err(Error::Lottery { .. })));

        let result = add_entries(&db, 404, member.id, 1, now()).await;
        assert!(matches!(result, Err(Error::LotteryNotFound { id: 404 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_select_winner_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;
        let alpha = create_test_member(&db, "Alpha", Some(1)).await?;
        let bravo = create_test_member(&db, "Bravo", Some(2)).await?;
        let lottery = create_lottery(&db, terms(now()), now()).await?;
        let during = now() + TimeDelta::hours(1);
        let after = now() + TimeDelta::days(8);
        let mut rng = StdRng::seed_from_u64(1);

        let result = select_winner(&db, lottery.id, during, &mut rng).await;
        assert!(matches!(result, Err(Error::Lottery { message }) if message.contains("still ongoing")));

        let result = select_winner(&db, lottery.id, after, &mut rng).await;
        assert!(matches!(result, Err(Error::Lottery { message }) if message == "No entries found for this lottery."));

        add_entries(&db, lottery.id, alpha.id, 3, during).await?;
        add_entries(&db, lottery.id, bravo.id, 1, during).await?;
        assert_eq!(
            active_lottery(&db, during).await?.map(|l| l.id),
            Some(lottery.id)
        );

        let drawn = select_winner(&db, lottery.id, after, &mut rng).await?;
        assert_eq!(drawn.total_entries, 4);
        assert!(drawn.winner.id == alpha.id || drawn.winner.id == bravo.id);

        let stored = get_lottery(&db, lottery.id).await?.unwrap();
        assert_eq!(stored.winner_member_id, Some(drawn.winner.id));

        let result = select_winner(&db, lottery.id, after, &mut rng).await;
        assert!(matches!(result, Err(Error::Lottery { message }) if message.contains("already been selected")));

        let result = select_winner(&db, 77, after, &mut rng).await;
        assert!(matches!(result, Err(Error::LotteryNotFound { id: 77 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_no_active_lottery() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(active_lottery(&db, now()).await?.is_none());
        create_lottery(&db, terms(now() + TimeDelta::days(2)), now()).await?;
        assert!(active_lottery(&db, now()).await?.is_none());
        Ok(())
    }
}
