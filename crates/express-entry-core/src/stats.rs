//! Descriptive statistics over a snapshot.
//!
//! Averages and the even-count median are rounded half-up to the nearest
//! integer using integer arithmetic, so results are exact for any
//! collection size.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{DrawError, Result};
use crate::models::{DrawCollection, DrawRecord};
use crate::query::{compare_date_desc, records_for_year};

/// Group label for records without a round type or category.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Year label for records without a draw date.
pub const UNKNOWN_YEAR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_draws: usize,
    pub total_invitations: u64,
    pub crs: CrsStats,
    pub invitations: InvitationStats,
    pub by_round_type: BTreeMap<String, GroupStats>,
    pub by_category: BTreeMap<String, GroupStats>,
    pub by_year: BTreeMap<String, YearStats>,
    pub date_range: DateRange,
    pub filter: Option<StatsFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrsStats {
    pub average: u64,
    pub minimum: u32,
    pub maximum: u32,
    pub median: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationStats {
    pub average: u64,
    pub minimum: u32,
    pub maximum: u32,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub count: usize,
    pub total_invitations: u64,
    #[serde(rename = "avgCRS")]
    pub avg_crs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearStats {
    pub count: usize,
    pub total_invitations: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsFilter {
    pub year: String,
}

/// Summarize the draws whose date starts with `year` (all draws if `None`).
pub fn statistics(collection: &DrawCollection, year: Option<&str>) -> Result<StatsSummary> {
    let year = year.filter(|y| !y.is_empty());
    let records = records_for_year(collection, year);
    if records.is_empty() {
        return Err(DrawError::no_data(match year {
            Some(y) => format!("no draws found for {}", y),
            None => "no draws found".to_string(),
        }));
    }

    let crs: Vec<u32> = records.iter().map(|d| d.crs_score).collect();
    let invitations: Vec<u32> = records.iter().map(|d| d.invitations_issued).collect();
    let total_invitations = sum(&invitations);

    Ok(StatsSummary {
        total_draws: records.len(),
        total_invitations,
        crs: CrsStats {
            average: rounded_mean(sum(&crs), crs.len()),
            minimum: min(&crs),
            maximum: max(&crs),
            median: median(&crs),
        },
        invitations: InvitationStats {
            average: rounded_mean(total_invitations, invitations.len()),
            minimum: min(&invitations),
            maximum: max(&invitations),
            total: total_invitations,
        },
        by_round_type: group_by(&records, |d| Some(d.round_type.label())),
        by_category: group_by(&records, |d| d.program_category.map(|c| c.label())),
        by_year: group_by_year(&records),
        date_range: date_range(&records),
        filter: year.map(|y| StatsFilter { year: y.to_string() }),
    })
}

/// Median of `values`; the rounded mean of the middle pair for even counts.
/// Zero for an empty slice.
pub fn median(values: &[u32]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        rounded_mean(u64::from(sorted[mid - 1]) + u64::from(sorted[mid]), 2)
    } else {
        u64::from(sorted[mid])
    }
}

/// `total / count` rounded half-up.
pub fn rounded_mean(total: u64, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }
    let count = count as u64;
    (2 * total + count) / (2 * count)
}

fn sum(values: &[u32]) -> u64 {
    values.iter().map(|&v| u64::from(v)).sum()
}

fn min(values: &[u32]) -> u32 {
    values.iter().copied().min().unwrap_or(0)
}

fn max(values: &[u32]) -> u32 {
    values.iter().copied().max().unwrap_or(0)
}

fn group_by<'a, F>(records: &[&'a DrawRecord], key: F) -> BTreeMap<String, GroupStats>
where
    F: Fn(&'a DrawRecord) -> Option<&'static str>,
{
    // (count, invitations, crs sum)
    let mut acc: BTreeMap<String, (usize, u64, u64)> = BTreeMap::new();
    for record in records {
        let label = key(*record).unwrap_or(NOT_SPECIFIED);
        let entry = acc.entry(label.to_string()).or_default();
        entry.0 += 1;
        entry.1 += u64::from(record.invitations_issued);
        entry.2 += u64::from(record.crs_score);
    }

    acc.into_iter()
        .map(|(label, (count, total_invitations, crs_sum))| {
            (
                label,
                GroupStats {
                    count,
                    total_invitations,
                    avg_crs: rounded_mean(crs_sum, count),
                },
            )
        })
        .collect()
}

fn group_by_year(records: &[&DrawRecord]) -> BTreeMap<String, YearStats> {
    let mut years: BTreeMap<String, YearStats> = BTreeMap::new();
    for record in records {
        let year = record.year().unwrap_or(UNKNOWN_YEAR);
        let entry = years.entry(year.to_string()).or_insert(YearStats {
            count: 0,
            total_invitations: 0,
        });
        entry.count += 1;
        entry.total_invitations += u64::from(record.invitations_issued);
    }
    years
}

fn date_range(records: &[&DrawRecord]) -> DateRange {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare_date_desc(a, b));
    DateRange {
        earliest: sorted.last().and_then(|d| d.date()).map(str::to_string),
        latest: sorted.first().and_then(|d| d.date()).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProgramCategory, RoundType, DATA_SOURCE_IRCC};
    use crate::query::{filter, DrawQuery};
    use chrono::Utc;

    fn draw(
        n: u32,
        date: &str,
        crs: u32,
        invitations: u32,
        round_type: RoundType,
        category: Option<ProgramCategory>,
    ) -> DrawRecord {
        DrawRecord {
            round_number: n,
            draw_date: Some(date.to_string()).filter(|d| !d.is_empty()),
            round_type,
            invitations_issued: invitations,
            crs_score: crs,
            program_category: category,
            notes: None,
            data_source: DATA_SOURCE_IRCC.to_string(),
        }
    }

    fn collection() -> DrawCollection {
        DrawCollection::new(
            vec![
                draw(10, "2024-12-10", 300, 1000, RoundType::General, None),
                draw(11, "2025-01-07", 400, 2000, RoundType::ProgramSpecific, Some(ProgramCategory::Pnp)),
                draw(12, "2025-02-19", 350, 3001, RoundType::CategoryBased, Some(ProgramCategory::Healthcare)),
                draw(13, "2025-03-06", 351, 500, RoundType::CategoryBased, Some(ProgramCategory::Healthcare)),
            ],
            "src",
            Utc::now(),
        )
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[300, 350, 400]), 350);
        assert_eq!(median(&[300, 400]), 350);
        assert_eq!(median(&[400, 300, 351, 350]), 351);
        assert_eq!(median(&[1, 2]), 2);
    }

    #[test]
    fn test_rounded_mean_half_up() {
        assert_eq!(rounded_mean(5, 2), 3);
        assert_eq!(rounded_mean(4, 3), 1);
        assert_eq!(rounded_mean(5, 3), 2);
    }

    #[test]
    fn test_full_summary() {
        let s = statistics(&collection(), None).unwrap();
        assert_eq!(s.total_draws, 4);
        assert_eq!(s.total_invitations, 6501);
        assert_eq!(s.crs.minimum, 300);
        assert_eq!(s.crs.maximum, 400);
        assert_eq!(s.crs.average, 350); // 1401 / 4 = 350.25
        assert_eq!(s.crs.median, 351); // (350 + 351) / 2 = 350.5
        assert_eq!(s.invitations.average, 1625); // 6501 / 4 = 1625.25
        assert_eq!(s.invitations.minimum, 500);
        assert_eq!(s.invitations.maximum, 3001);
        assert_eq!(s.invitations.total, 6501);
        assert_eq!(s.filter, None);
        assert_eq!(s.date_range.earliest.as_deref(), Some("2024-12-10"));
        assert_eq!(s.date_range.latest.as_deref(), Some("2025-03-06"));
    }

    #[test]
    fn test_group_by_round_type_and_category() {
        let s = statistics(&collection(), None).unwrap();
        let cat = &s.by_round_type["Category-based"];
        assert_eq!(cat.count, 2);
        assert_eq!(cat.total_invitations, 3501);
        assert_eq!(cat.avg_crs, 351); // 350.5 rounds up
        assert_eq!(s.by_round_type["General"].count, 1);

        assert_eq!(s.by_category["Healthcare"].count, 2);
        assert_eq!(s.by_category["PNP"].avg_crs, 400);
        assert_eq!(s.by_category[NOT_SPECIFIED].count, 1);
    }

    #[test]
    fn test_group_by_year() {
        let mut c = collection();
        c.draws.push(draw(14, "", 420, 10, RoundType::General, None));
        let s = statistics(&c, None).unwrap();
        assert_eq!(s.by_year["2025"].count, 3);
        assert_eq!(s.by_year["2025"].total_invitations, 5501);
        assert_eq!(s.by_year["2024"].count, 1);
        assert_eq!(s.by_year[UNKNOWN_YEAR].count, 1);
        // undated record sorts last, so it becomes the earliest end
        assert_eq!(s.date_range.earliest, None);
        assert_eq!(s.date_range.latest.as_deref(), Some("2025-03-06"));
    }

    #[test]
    fn test_year_filter_echo() {
        let s = statistics(&collection(), Some("2025")).unwrap();
        assert_eq!(s.total_draws, 3);
        assert_eq!(s.filter, Some(StatsFilter { year: "2025".to_string() }));
        assert_eq!(s.date_range.earliest.as_deref(), Some("2025-01-07"));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["filter"]["year"], "2025");
        assert!(json["byRoundType"].is_object());
        assert!(json["byCategory"]["Healthcare"]["avgCRS"].is_number());
    }

    #[test]
    fn test_no_data() {
        let err = statistics(&collection(), Some("1999")).unwrap_err();
        assert!(matches!(err, DrawError::NoData(_)));
        let empty = DrawCollection::new(Vec::new(), "src", Utc::now());
        assert!(matches!(statistics(&empty, None), Err(DrawError::NoData(_))));
    }

    #[test]
    fn test_total_matches_unfiltered_listing() {
        let c = collection();
        let s = statistics(&c, None).unwrap();
        assert_eq!(s.total_draws, filter(&c, &DrawQuery::default()).len());
    }
}
