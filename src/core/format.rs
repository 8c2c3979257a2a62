//! Text formatting shared by the lookup, competition, and lottery commands.
//!
//! Discord rejects messages over 2000 characters, so every list is split by
//! [`paginate`] into pages of at most [`MESSAGE_BUDGET`] characters. A page
//! always holds whole rows; a row is never split across two messages.

use chrono::TimeDelta;

/// Character budget for one page, leaving room for code fences.
pub const MESSAGE_BUDGET: usize = 1900;

/// Points above which a leaderboard row earns a star.
pub const BOND_POINTS: i32 = 12;

const YELLOWPAGES_RSN_WIDTH: usize = 25;
const YELLOWPAGES_DISCORD_WIDTH: usize = 30;
const LEADERBOARD_RANK_WIDTH: usize = 4;
const LEADERBOARD_RSN_WIDTH: usize = 25;
const LEADERBOARD_POINTS_WIDTH: usize = 10;

/// Formats a gp amount with K/M/T suffixes, truncating to one decimal.
///
/// `999` stays `999 gp`, `999_500` becomes `999.5K gp`, `755_200_080`
/// becomes `755.2M gp`, and `4_000_000_000` becomes `4T gp`.
#[must_use]
pub fn format_money(amount: i64, unit: &str) -> String {
    if amount < 1_000 {
        return format!("{amount} {unit}");
    }

    let (divisor, suffix) = if amount < 1_000_000 {
        (1_000, "K")
    } else if amount < 1_000_000_000 {
        (1_000_000, "M")
    } else {
        (1_000_000_000, "T")
    };
    let tenth = divisor / 10;
    let whole = amount / divisor;
    let tenths = (amount % divisor) / tenth;

    if tenths == 0 {
        format!("{whole}{suffix} {unit}")
    } else {
        format!("{whole}.{tenths}{suffix} {unit}")
    }
}

/// Formats a remaining duration as `Xd Yh Zm`, clamping negatives to zero.
#[must_use]
pub fn format_time_remaining(remaining: TimeDelta) -> String {
    if remaining <= TimeDelta::zero() {
        return "0d 0h 0m".to_string();
    }
    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;
    format!("{days}d {hours}h {minutes}m")
}

/// Turns a snake-case field name into a title, e.g. `alt_rsn` into `Alt Rsn`.
#[must_use]
pub fn title_case(field: &str) -> String {
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One member card for the list commands.
#[must_use]
pub fn member_card(
    rsn: &str,
    discord_id: Option<&str>,
    alt_rsn: Option<&str>,
    previous_rsn: Option<&str>,
) -> String {
    let mut card = format!(
        "** {rsn} **\n   Discord: {}\n",
        discord_id.unwrap_or("Not linked")
    );
    if let Some(alts) = alt_rsn {
        card.push_str(&format!("   Alt RSNs: {alts}\n"));
    }
    if let Some(previous) = previous_rsn {
        card.push_str(&format!("   Previous RSNs: {previous}\n"));
    }
    card.push('\n');
    card
}

/// One row of the yellowpages table.
#[must_use]
pub fn yellowpages_row(rsn: &str, discord_id: Option<&str>) -> String {
    format!(
        "║{rsn:^rw$}║{:^dw$}║\n",
        discord_id.unwrap_or("Not linked"),
        rw = YELLOWPAGES_RSN_WIDTH,
        dw = YELLOWPAGES_DISCORD_WIDTH
    )
}

/// One row of a competition leaderboard, starred above [`BOND_POINTS`].
#[must_use]
pub fn leaderboard_row(rank: usize, rsn: &str, points: i32) -> String {
    let star = if points > BOND_POINTS { " ★" } else { "" };
    format!(
        "║{rank:^kw$}║{rsn:^rw$}║{points:^pw$}║{star}\n",
        kw = LEADERBOARD_RANK_WIDTH,
        rw = LEADERBOARD_RSN_WIDTH,
        pw = LEADERBOARD_POINTS_WIDTH
    )
}

/// Position of a page within the full list (1-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    /// First row number on the page
    pub first: usize,
    /// Last row number on the page
    pub last: usize,
    /// Rows across all pages
    pub total: usize,
}

impl PageSpan {
    /// True when the page holds the whole list.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.first == 1 && self.last == self.total
    }
}

/// Fixed text around the rows of each page.
pub struct PageLayout {
    /// Text before the rows of the first page
    pub heading: String,
    /// Text before the rows of later pages
    pub continued_heading: String,
    /// Text after the rows of every page
    pub closing: String,
    /// Summary line(s) ending each page
    pub footer: fn(&PageSpan) -> String,
    /// Whole message when there are no rows
    pub empty: String,
}

fn box_border(left: char, mid: char, right: char, widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "═".repeat(*w)).collect();
    format!("{left}{}{right}\n", segments.join(&mid.to_string()))
}

fn box_header(columns: &[(&str, usize)]) -> String {
    let widths: Vec<usize> = columns.iter().map(|&(_, w)| w).collect();
    let titles: String = columns
        .iter()
        .map(|&(title, width)| format!("║{title:^width$}"))
        .collect();
    format!(
        "{}{titles}║\n{}",
        box_border('╔', '╦', '╗', &widths),
        box_border('╠', '╬', '╣', &widths)
    )
}

impl PageLayout {
    /// Card list used by `list-members`, `list-inactive`, and `list-onleave`.
    /// `empty` is the whole reply when no member matches.
    #[must_use]
    pub fn member_list(empty: impl Into<String>) -> Self {
        Self {
            heading: "**Member List**\n\n".to_string(),
            continued_heading: "**Member List (Continued)**\n\n".to_string(),
            closing: String::new(),
            footer: |span| {
                if span.is_complete() {
                    format!("**Total: {} members**", span.total)
                } else {
                    format!(
                        "**Showing {}-{} of {} members**",
                        span.first, span.last, span.total
                    )
                }
            },
            empty: empty.into(),
        }
    }

    /// RSN/Discord directory table.
    #[must_use]
    pub fn yellowpages(empty: impl Into<String>) -> Self {
        let header = box_header(&[
            ("RSN", YELLOWPAGES_RSN_WIDTH),
            ("Discord ID", YELLOWPAGES_DISCORD_WIDTH),
        ]);
        Self {
            heading: header.clone(),
            continued_heading: header,
            closing: box_border(
                '╚',
                '╩',
                '╝',
                &[YELLOWPAGES_RSN_WIDTH, YELLOWPAGES_DISCORD_WIDTH],
            ),
            footer: |span| {
                if span.is_complete() {
                    format!("Total: {} members", span.total)
                } else {
                    format!(
                        "Showing {}-{} of {} members",
                        span.first, span.last, span.total
                    )
                }
            },
            empty: empty.into(),
        }
    }

    /// Competition points leaderboard table.
    #[must_use]
    pub fn leaderboard(empty: impl Into<String>) -> Self {
        let header = box_header(&[
            ("#", LEADERBOARD_RANK_WIDTH),
            ("RSN", LEADERBOARD_RSN_WIDTH),
            ("Points", LEADERBOARD_POINTS_WIDTH),
        ]);
        Self {
            heading: header.clone(),
            continued_heading: header,
            closing: box_border(
                '╚',
                '╩',
                '╝',
                &[
                    LEADERBOARD_RANK_WIDTH,
                    LEADERBOARD_RSN_WIDTH,
                    LEADERBOARD_POINTS_WIDTH,
                ],
            ),
            footer: |span| {
                let legend = "★ = 12 points redeemable for a bond\n";
                if span.is_complete() {
                    format!("{legend}Total players: {}", span.total)
                } else {
                    format!(
                        "{legend}Showing players {}-{} of {}",
                        span.first, span.last, span.total
                    )
                }
            },
            empty: empty.into(),
        }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Groups rows into pages, returning each page as a half-open row range.
///
/// A page is closed when the next row would push heading, rows, closing, and
/// the longest possible footer past `budget`. A row that cannot fit even on an
/// empty page is placed alone.
fn page_ranges(rows: &[String], layout: &PageLayout, budget: usize) -> Vec<std::ops::Range<usize>> {
    let total = rows.len();
    let footer_reserve = char_len(&(layout.footer)(&PageSpan {
        first: total,
        last: total,
        total,
    }))
    .max(char_len(&(layout.footer)(&PageSpan {
        first: 1,
        last: total,
        total,
    })));
    let closing_len = char_len(&layout.closing);

    let mut ranges = Vec::new();
    let mut start = 0;
    let mut used = char_len(&layout.heading);

    for (i, row) in rows.iter().enumerate() {
        let row_len = char_len(row);
        if i > start && used + row_len + closing_len + footer_reserve > budget {
            ranges.push(start..i);
            start = i;
            used = char_len(&layout.continued_heading);
        }
        used += row_len;
    }
    ranges.push(start..total);
    ranges
}

/// Splits `rows` into messages of at most `budget` characters.
///
/// Always returns at least one message; an empty list yields
/// [`PageLayout::empty`].
#[must_use]
pub fn paginate(rows: &[String], layout: &PageLayout, budget: usize) -> Vec<String> {
    if rows.is_empty() {
        return vec![layout.empty.clone()];
    }

    let total = rows.len();
    page_ranges(rows, layout, budget)
        .into_iter()
        .map(|range| {
            let span = PageSpan {
                first: range.start + 1,
                last: range.end,
                total,
            };
            let heading = if range.start == 0 {
                &layout.heading
            } else {
                &layout.continued_heading
            };
            let mut page = heading.clone();
            for row in &rows[range] {
                page.push_str(row);
            }
            page.push_str(&layout.closing);
            page.push_str(&(layout.footer)(&span));
            page
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0, "gp"), "0 gp");
        assert_eq!(format_money(999, "gp"), "999 gp");
        assert_eq!(format_money(1_000, "gp"), "1K gp");
        assert_eq!(format_money(10_009, "gp"), "10K gp");
        assert_eq!(format_money(999_500, "gp"), "999.5K gp");
        assert_eq!(format_money(999_999, "gp"), "999.9K gp");
        assert_eq!(format_money(1_000_000, "gp"), "1M gp");
        assert_eq!(format_money(2_000_400, "gp"), "2M gp");
        assert_eq!(format_money(755_200_080, "gp"), "755.2M gp");
        assert_eq!(format_money(1_000_000_000, "gp"), "1T gp");
        assert_eq!(format_money(4_000_000_000, "gp"), "4T gp");
        assert_eq!(format_money(1_250, "coins"), "1.2K coins");
    }

    #[test]
    fn test_format_time_remaining() {
        let remaining = TimeDelta::days(2) + TimeDelta::hours(5) + TimeDelta::minutes(7);
        assert_eq!(format_time_remaining(remaining), "2d 5h 7m");
        assert_eq!(format_time_remaining(TimeDelta::seconds(59)), "0d 0h 0m");
        assert_eq!(format_time_remaining(-TimeDelta::hours(3)), "0d 0h 0m");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("alt_rsn"), "Alt Rsn");
        assert_eq!(title_case("loc"), "Loc");
        assert_eq!(title_case("previous_rsn"), "Previous Rsn");
    }

    #[test]
    fn test_member_card() {
        assert_eq!(
            member_card("Zezima", None, None, None),
            "** Zezima **\n   Discord: Not linked\n\n"
        );
        assert_eq!(
            member_card("Zezima", Some("zez"), Some("Zez Alt"), Some("OldZez")),
            "** Zezima **\n   Discord: zez\n   Alt RSNs: Zez Alt\n   Previous RSNs: OldZez\n\n"
        );
    }

    #[test]
    fn test_leaderboard_star() {
        assert!(leaderboard_row(1, "Zezima", 13).ends_with("║ ★\n"));
        assert!(leaderboard_row(2, "Lynx", 12).ends_with("║\n"));
    }

    #[test]
    fn test_paginate_empty() {
        assert_eq!(
            paginate(&[], &PageLayout::member_list("Nobody here."), MESSAGE_BUDGET),
            vec!["Nobody here.".to_string()]
        );
    }

    #[test]
    fn test_every_layout_replies_with_its_own_empty_text() {
        let layouts = [
            PageLayout::member_list("No inactive members found in the database."),
            PageLayout::yellowpages("No members found in the database."),
            PageLayout::leaderboard("No members have any boss week competition points yet."),
        ];
        for layout in &layouts {
            assert_eq!(paginate(&[], layout, MESSAGE_BUDGET), vec![layout.empty.clone()]);
        }
        assert_eq!(layouts[1].empty, "No members found in the database.");
    }

    #[test]
    fn test_paginate_single_page() {
        let rows = vec![
            yellowpages_row("Zezima", Some("zez")),
            yellowpages_row("Lynx Titan", None),
        ];
        let pages = paginate(&rows, &PageLayout::yellowpages("No members found."), MESSAGE_BUDGET);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].starts_with('╔'));
        assert!(pages[0].contains("Not linked"));
        assert!(pages[0].ends_with("╝\nTotal: 2 members"));
    }

    #[test]
    fn test_paginate_leaderboard_legend() {
        let rows = vec![leaderboard_row(1, "Zezima", 15), leaderboard_row(2, "Lynx", 4)];
        let pages = paginate(&rows, &PageLayout::leaderboard("No points yet."), MESSAGE_BUDGET);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("★ = 12 points redeemable for a bond\nTotal players: 2"));
    }

    #[test]
    fn test_paginate_preserves_rows_within_budget() {
        let rows: Vec<String> = (0..120)
            .map(|i| {
                member_card(
                    &format!("Member{i}"),
                    Some(&format!("discord_user_{i}")),
                    (i % 3 == 0).then_some("AltOne, AltTwo"),
                    None,
                )
            })
            .collect();
        let layout = PageLayout::member_list("No members found.");

        let ranges = page_ranges(&rows, &layout, MESSAGE_BUDGET);
        assert!(ranges.len() > 1);
        let mut expected_start = 0;
        for range in &ranges {
            assert_eq!(range.start, expected_start);
            assert!(range.end > range.start);
            expected_start = range.end;
        }
        assert_eq!(expected_start, rows.len());

        let pages = paginate(&rows, &layout, MESSAGE_BUDGET);
        assert_eq!(pages.len(), ranges.len());
        for (page, range) in pages.iter().zip(&ranges) {
            assert!(page.chars().count() <= MESSAGE_BUDGET);
            let body: String = rows[range.clone()].concat();
            assert!(page.contains(&body));
            assert!(page.ends_with(&format!(
                "**Showing {}-{} of 120 members**",
                range.start + 1,
                range.end
            )));
        }
        assert!(pages[0].starts_with("**Member List**\n\n"));
        assert!(pages[1].starts_with("**Member List (Continued)**\n\n"));
    }

    #[test]
    fn test_paginate_table_pages_respect_budget() {
        let rows: Vec<String> = (0..200)
            .map(|i| yellowpages_row(&format!("Player {i}"), Some("someone")))
            .collect();
        let pages = paginate(&rows, &PageLayout::yellowpages("No members found."), MESSAGE_BUDGET);
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(page.chars().count() <= MESSAGE_BUDGET);
            assert!(page.starts_with('╔'));
        }
        assert!(pages.last().is_some_and(|p| p.ends_with("of 200 members")));
    }

    #[test]
    fn test_paginate_oversized_row_stands_alone() {
        let rows = vec!["x".repeat(50), "y".repeat(500), "z".repeat(50)];
        let pages = paginate(&rows, &PageLayout::member_list("No members found."), 300);
        assert_eq!(pages.len(), 3);
        assert!(pages[1].contains(&"y".repeat(500)));
    }
}
