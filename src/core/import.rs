//! Bulk member import from the roster spreadsheet.
//!
//! The first row of the fetched range is the sheet's column header and is
//! never imported. Sheet columns, zero-based: 0 RSN, 3 membership level, 4 previous RSN,
//! 5 alternate RSNs, 6 Discord username, 7 join date (`%d/%m/%Y`). Cells
//! reading `N/A` count as empty. Rows are upserted by RSN.

use crate::{
    core::member::{MAX_RSN_LEN, get_member_by_rsn},
    entities::{RsnList, member},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Set, prelude::*};
use std::fmt::Write;
use tracing::warn;

/// Date format used by the sheet.
pub const SHEET_DATE_FMT: &str = "%d/%m/%Y";

const COL_RSN: usize = 0;
const COL_LEVEL: usize = 3;
const COL_PREVIOUS_RSN: usize = 4;
const COL_ALT_RSN: usize = 5;
const COL_DISCORD: usize = 6;
const COL_JOIN_DATE: usize = 7;

/// One roster row ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetMember {
    pub rsn: String,
    pub membership_level: Option<i32>,
    pub previous_rsn: RsnList,
    pub alt_rsn: RsnList,
    pub discord_id: Option<String>,
    pub join_date: Option<NaiveDate>,
}

fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index)
        .map(|c| c.trim())
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("N/A"))
}

/// Reads a membership level given as a number or a rank name.
fn parse_level(raw: &str, level_names: &[String]) -> Result<i32> {
    if let Ok(level) = raw.parse::<i32>() {
        return Ok(level);
    }
    let wanted = raw.to_lowercase();
    level_names
        .iter()
        .position(|name| name.to_lowercase() == wanted)
        .and_then(|i| i32::try_from(i).ok())
        .ok_or_else(|| Error::validation(format!("Unknown membership level '{raw}'")))
}

/// Parses one sheet row. `Ok(None)` means the row has no RSN and is skipped.
pub fn parse_row(row: &[String], level_names: &[String]) -> Result<Option<SheetMember>> {
    let Some(rsn) = cell(row, COL_RSN) else {
        return Ok(None);
    };
    if rsn.chars().count() > MAX_RSN_LEN {
        return Err(Error::validation(format!("RSN '{rsn}' is too long")));
    }

    let membership_level = cell(row, COL_LEVEL)
        .map(|raw| parse_level(raw, level_names))
        .transpose()?;

    // Unparseable dates are dropped rather than failing the row.
    let join_date = cell(row, COL_JOIN_DATE).and_then(|raw| {
        NaiveDate::parse_from_str(raw, SHEET_DATE_FMT)
            .map_err(|e| warn!("Ignoring join date '{raw}' for {rsn}: {e}"))
            .ok()
    });

    Ok(Some(SheetMember {
        rsn: rsn.to_string(),
        membership_level,
        previous_rsn: cell(row, COL_PREVIOUS_RSN).map(RsnList::from_csv).unwrap_or_default(),
        alt_rsn: cell(row, COL_ALT_RSN).map(RsnList::from_csv).unwrap_or_default(),
        discord_id: cell(row, COL_DISCORD).map(ToString::to_string),
        join_date,
    }))
}

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Whether a row created or refreshed a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Upsert {
    Inserted,
    Updated,
}

async fn upsert(db: &DatabaseConnection, row: SheetMember) -> Result<Upsert> {
    if let Some(existing) = get_member_by_rsn(db, &row.rsn).await? {
        let mut active: member::ActiveModel = existing.into();
        if let Some(level) = row.membership_level {
            active.membership_level = Set(level);
        }
        active.previous_rsn = Set(row.previous_rsn);
        active.alt_rsn = Set(row.alt_rsn);
        active.discord_id = Set(row.discord_id);
        active.join_date = Set(row.join_date);
        active.update(db).await?;
        return Ok(Upsert::Updated);
    }

    member::ActiveModel {
        rsn: Set(row.rsn),
        discord_id: Set(row.discord_id),
        discord_id_num: Set(None),
        membership_level: Set(row.membership_level.unwrap_or(0)),
        join_date: Set(row.join_date),
        active: Set(true),
        on_leave: Set(false),
        alt_rsn: Set(row.alt_rsn),
        previous_rsn: Set(row.previous_rsn),
        notes: Set(None),
        special_status: Set(None),
        loc: Set(None),
        timezone: Set(None),
        skill_comp_pts: Set(0),
        skill_comp_pts_life: Set(0),
        boss_comp_pts: Set(0),
        boss_comp_pts_life: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(Upsert::Inserted)
}

/// Splits a fetched range into its header row and the data rows below it.
#[must_use]
pub fn split_header(values: &[Vec<String>]) -> (&[String], &[Vec<String>]) {
    values
        .split_first()
        .map_or((&[], &[]), |(header, rows)| (header.as_slice(), rows))
}

/// Upserts every data row of a fetched range, skipping its header row. A
/// failing row is counted and logged; it does not stop the rest of the import.
pub async fn import_rows(
    db: &DatabaseConnection,
    values: &[Vec<String>],
    level_names: &[String],
) -> ImportSummary {
    let mut summary = ImportSummary::default();
    let (_, rows) = split_header(values);

    for (index, row) in rows.iter().enumerate() {
        let parsed = match parse_row(row, level_names) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => {
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                warn!("Skipping data row {}: {e}", index + 1);
                summary.errors += 1;
                continue;
            }
        };

        match upsert(db, parsed).await {
            Ok(Upsert::Inserted) => summary.inserted += 1,
            Ok(Upsert::Updated) => summary.updated += 1,
            Err(e) => {
                warn!("Failed to import data row {}: {e}", index + 1);
                summary.errors += 1;
            }
        }
    }

    summary
}

/// The header and the first `limit` data rows as a pipe-separated preview.
pub fn preview_rows(values: &[Vec<String>], limit: usize) -> Result<String> {
    let (header, rows) = split_header(values);
    let mut preview = String::new();
    if !header.is_empty() {
        writeln!(preview, "{}", header.join(" | "))?;
    }
    for row in rows.iter().take(limit) {
        writeln!(preview, "{}", row.join(" | "))?;
    }
    if rows.len() > limit {
        writeln!(preview, "... and {} more rows", rows.len() - limit)?;
    }
    Ok(preview)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{config::BotConfig, test_utils::*};

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(ToString::to_string).collect()
    }

    fn header() -> Vec<String> {
        row(&["RSN", "Rank", "Points", "Level", "Previous RSN", "Alt RSN", "Discord", "Join Date"])
    }

    #[test]
    fn test_parse_row() {
        let names = BotConfig::default().mem_level_names;

        let parsed = parse_row(
            &row(&["Zezima", "", "", "2", "Zez Old", "Zez Alt, Zez Iron", "zezima#1", "31/01/2024"]),
            &names,
        )
        .unwrap()
        .unwrap();
        assert_eq!(parsed.membership_level, Some(2));
        assert_eq!(parsed.previous_rsn.0, vec!["Zez Old"]);
        assert_eq!(parsed.alt_rsn.0, vec!["Zez Alt", "Zez Iron"]);
        assert_eq!(parsed.discord_id.as_deref(), Some("zezima#1"));
        assert_eq!(parsed.join_date, NaiveDate::from_ymd_opt(2024, 1, 31));

        let parsed = parse_row(&row(&["Woox", "", "", "senior", "N/A", "n/a", "N/A", "N/A"]), &names)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.membership_level, Some(3));
        assert!(parsed.previous_rsn.0.is_empty());
        assert_eq!(parsed.discord_id, None);
        assert_eq!(parsed.join_date, None);

        let parsed = parse_row(&row(&["Short"]), &names).unwrap().unwrap();
        assert_eq!(parsed.membership_level, None);

        assert_eq!(parse_row(&row(&["", "x"]), &names).unwrap(), None);
        assert_eq!(parse_row(&row(&["N/A"]), &names).unwrap(), None);
        assert!(parse_row(&row(&["Zezima", "", "", "Emperor"]), &names).is_err());
    }

    #[tokio::test]
    async fn test_import_rows_upserts_by_rsn() -> Result<()> {
        let db = setup_test_db().await?;
        let names = BotConfig::default().mem_level_names;
        create_test_member(&db, "Zezima", Some(1001)).await?;

        let rows = vec![
            header(),
            row(&["zezima", "", "", "3", "", "", "", "01/02/2020"]),
            row(&["Lynx Titan", "", "", "1"]),
            row(&[""]),
            row(&["Woox", "", "", "Emperor"]),
        ];
        let summary = import_rows(&db, &rows, &names).await;
        assert_eq!(
            summary,
            ImportSummary {
                inserted: 1,
                updated: 1,
                skipped: 1,
                errors: 1
            }
        );

        let zezima = get_member_by_rsn(&db, "Zezima").await?.unwrap();
        assert_eq!(zezima.membership_level, 3);
        assert_eq!(zezima.discord_id_num, Some(1001));
        assert_eq!(zezima.join_date, NaiveDate::from_ymd_opt(2020, 2, 1));

        let lynx = get_member_by_rsn(&db, "Lynx Titan").await?.unwrap();
        assert_eq!(lynx.membership_level, 1);
        assert!(lynx.active);
        Ok(())
    }

    #[tokio::test]
    async fn test_header_row_is_never_imported() -> Result<()> {
        let db = setup_test_db().await?;
        let names = BotConfig::default().mem_level_names;

        let rows = vec![header(), row(&["Zezima", "", "", "1"])];
        let summary = import_rows(&db, &rows, &names).await;
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.errors, 0);
        assert!(get_member_by_rsn(&db, "RSN").await?.is_none());
        assert!(get_member_by_rsn(&db, "Zezima").await?.is_some());

        let summary = import_rows(&db, &[row(&["Name"])], &names).await;
        assert_eq!(summary, ImportSummary::default());
        assert!(get_member_by_rsn(&db, "Name").await?.is_none());
        assert_eq!(import_rows(&db, &[], &names).await, ImportSummary::default());
        Ok(())
    }

    #[test]
    fn test_split_header() {
        let rows = vec![row(&["RSN"]), row(&["Zezima"]), row(&["Woox"])];
        let (head, data) = split_header(&rows);
        assert_eq!(head, &["RSN".to_string()][..]);
        assert_eq!(data.len(), 2);
        let (head, data) = split_header(&[]);
        assert!(head.is_empty() && data.is_empty());
    }

    #[test]
    fn test_preview_rows() {
        let rows = vec![row(&["h1", "h2"]), row(&["a", "b"]), row(&["c"]), row(&["d"])];
        let preview = preview_rows(&rows, 2).unwrap();
        assert_eq!(preview, "h1 | h2\na | b\nc\n... and 1 more rows\n");
    }
}
