//! Filtering, ordering, and single-record lookups over a loaded snapshot.
//!
//! All functions here are pure and operate on a borrowed
//! [`DrawCollection`]; they never mutate it.
//!
//! # Ordering
//!
//! Results are sorted by `drawDate` descending. ISO dates compare
//! lexicographically in chronological order, so plain string comparison is
//! used. Records without a date sort after every dated record.
//!
//! # Limit policy
//!
//! A `limit` must be a positive integer. Zero, negative, and non-numeric
//! values are rejected with [`DrawError::InvalidQueryInput`] rather than
//! being silently reinterpreted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::error::{DrawError, Result};
use crate::models::{DrawCollection, DrawRecord, DrawView};
use crate::normalize::parse_int_prefix;

/// Filters accepted by [`filter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrawQuery {
    /// Prefix of the ISO draw date, usually a 4-digit year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Case-insensitive substring of the category label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Maximum number of results after sorting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl DrawQuery {
    /// Build a query from raw request parameters. Empty strings count as
    /// absent.
    pub fn from_params(
        year: Option<&str>,
        category: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            year: non_empty(year),
            category: non_empty(category),
            limit: match limit {
                Some(raw) => parse_limit(raw)?,
                None => None,
            },
        })
    }

    pub fn year(year: impl Into<String>) -> Self {
        Self {
            year: Some(year.into()),
            ..Self::default()
        }
    }
}

/// Response body for a filtered listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawList {
    pub draws: Vec<DrawView>,
    pub count: usize,
    pub filters: DrawQuery,
    pub last_updated: DateTime<Utc>,
}

/// Parse a result-count limit. Blank means no limit.
pub fn parse_limit(raw: &str) -> Result<Option<usize>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| DrawError::invalid_input(format!("limit must be an integer, got '{}'", raw)))?;
    if value <= 0 {
        return Err(DrawError::invalid_input(format!(
            "limit must be a positive integer, got {}",
            value
        )));
    }
    Ok(Some(value as usize))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Whether the record's draw date starts with `year`.
pub fn matches_year(record: &DrawRecord, year: &str) -> bool {
    record.date().is_some_and(|d| d.starts_with(year))
}

/// Whether the record's category label contains `category`, ignoring case.
pub fn matches_category(record: &DrawRecord, category: &str) -> bool {
    let needle = category.to_lowercase();
    record
        .program_category
        .is_some_and(|c| c.label().to_lowercase().contains(&needle))
}

/// Most recent first; undated records last.
pub fn compare_date_desc(a: &DrawRecord, b: &DrawRecord) -> Ordering {
    match (a.date(), b.date()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => y.cmp(x),
    }
}

/// Records of `collection` passing the year prefix filter, in collection order.
pub fn records_for_year<'a>(collection: &'a DrawCollection, year: Option<&str>) -> Vec<&'a DrawRecord> {
    collection
        .draws
        .iter()
        .filter(|d| year.map_or(true, |y| matches_year(d, y)))
        .collect()
}

/// Filter, sort and truncate, returning the matching records.
pub fn filter_records<'a>(collection: &'a DrawCollection, query: &DrawQuery) -> Vec<&'a DrawRecord> {
    let mut records: Vec<&DrawRecord> = records_for_year(collection, query.year.as_deref())
        .into_iter()
        .filter(|d| {
            query
                .category
                .as_deref()
                .map_or(true, |c| matches_category(d, c))
        })
        .collect();

    records.sort_by(|a, b| compare_date_desc(a, b));

    if let Some(limit) = query.limit {
        records.truncate(limit);
    }
    records
}

/// Contract for `GET /api/draws`: filtered records as response projections.
pub fn filter(collection: &DrawCollection, query: &DrawQuery) -> Vec<DrawView> {
    filter_records(collection, query)
        .into_iter()
        .map(DrawRecord::to_view)
        .collect()
}

/// [`filter`] wrapped with the count, filter echo and snapshot timestamp.
pub fn list(collection: &DrawCollection, query: &DrawQuery) -> DrawList {
    let draws = filter(collection, query);
    DrawList {
        count: draws.len(),
        draws,
        filters: query.clone(),
        last_updated: collection.last_updated,
    }
}

/// Find a draw by round number. The first match wins if the upstream feed
/// reissued a number.
pub fn lookup<'a>(collection: &'a DrawCollection, id: &str) -> Result<&'a DrawRecord> {
    let round = parse_int_prefix(id)
        .ok_or_else(|| DrawError::invalid_input(format!("invalid draw number: '{}'", id)))?;

    collection
        .draws
        .iter()
        .find(|d| i64::from(d.round_number) == round)
        .ok_or_else(|| DrawError::not_found(format!("draw {} not found", round)))
}

/// The most recent draw.
pub fn latest(collection: &DrawCollection) -> Result<&DrawRecord> {
    collection
        .draws
        .iter()
        .min_by(|a, b| compare_date_desc(a, b))
        .ok_or_else(|| DrawError::not_found("no draws found"))
}
