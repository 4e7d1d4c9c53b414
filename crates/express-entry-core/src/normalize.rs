//! Upstream record normalization.
//!
//! Converts the loosely-typed `rounds` array of the IRCC feed into canonical
//! [`DrawRecord`]s. Entries that fail to parse are dropped and counted; they
//! never abort the run. Only a payload without a `rounds` array is fatal.
//!
//! # Classification
//!
//! Categories are inferred from the free-text `drawName` by walking
//! [`CATEGORY_RULES`] in order and taking the first keyword contained in the
//! name. Round type follows from the name and the inferred category:
//!
//! | Condition | Round type |
//! |-----------|------------|
//! | name contains `Provincial Nominee` | `Program-specific` |
//! | category inferred and not `PNP` | `Category-based` |
//! | otherwise | `General` |
//!
//! A name that mentions both a Provincial Nominee stream and another
//! category is `Program-specific`: the first row wins.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::error::{DrawError, Result};
use crate::models::{
    DrawCollection, DrawRecord, ProgramCategory, RawDrawEntry, RoundType, DATA_SOURCE_IRCC,
};

/// Ordered `(keyword, category)` rules. Earlier rules take precedence.
pub const CATEGORY_RULES: &[(&str, ProgramCategory)] = &[
    ("Provincial Nominee Program", ProgramCategory::Pnp),
    ("Canadian Experience Class", ProgramCategory::Cec),
    ("Federal Skilled Worker", ProgramCategory::Fsw),
    ("French", ProgramCategory::FrenchLanguage),
    ("Healthcare", ProgramCategory::Healthcare),
    ("STEM", ProgramCategory::Stem),
    ("Trade", ProgramCategory::Trade),
    ("Transport", ProgramCategory::Transport),
    ("Agriculture", ProgramCategory::Agriculture),
];

const PROGRAM_SPECIFIC_MARKER: &str = "Provincial Nominee";

/// Result of normalizing one upstream payload.
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub collection: DrawCollection,
    /// Entries present in the upstream payload.
    pub received: usize,
    /// Entries excluded because a required field was missing or invalid.
    pub dropped: usize,
}

/// Extract the raw entries from an upstream JSON payload.
///
/// Elements of `rounds` that are not JSON objects are kept as empty entries
/// so that they are counted as dropped by [`normalize`].
pub fn parse_payload(payload: &Value) -> Result<Vec<RawDrawEntry>> {
    let rounds = payload
        .get("rounds")
        .ok_or_else(|| DrawError::invalid_upstream("payload has no `rounds` field"))?
        .as_array()
        .ok_or_else(|| DrawError::invalid_upstream("`rounds` is not an array"))?;

    Ok(rounds
        .iter()
        .map(|v| serde_json::from_value::<RawDrawEntry>(v.clone()).unwrap_or_default())
        .collect())
}

/// Normalize a full upstream payload in one step.
pub fn normalize_payload(
    payload: &Value,
    source: &str,
    now: DateTime<Utc>,
) -> Result<NormalizeOutcome> {
    let raw = parse_payload(payload)?;
    Ok(normalize(&raw, source, now))
}

/// Normalize raw entries into a fresh collection, preserving upstream order.
pub fn normalize(raw: &[RawDrawEntry], source: &str, now: DateTime<Utc>) -> NormalizeOutcome {
    let draws: Vec<DrawRecord> = raw.iter().filter_map(normalize_entry).collect();
    let dropped = raw.len() - draws.len();

    NormalizeOutcome {
        collection: DrawCollection::new(draws, source, now),
        received: raw.len(),
        dropped,
    }
}

/// Normalize a single entry, or `None` if it is invalid.
pub fn normalize_entry(raw: &RawDrawEntry) -> Option<DrawRecord> {
    let round_number = raw.draw_number.as_ref().and_then(parse_int_value);
    let invitations = parse_invitations(raw.draw_size.as_ref());
    let crs_score = raw.draw_crs.as_ref().and_then(parse_int_value);

    let name = raw.draw_name.as_ref().and_then(value_text);
    let name_str = name.as_deref().unwrap_or("");
    let category = classify_category(name_str);
    let round_type = classify_round_type(name_str, category);

    let draw_date = raw
        .draw_date
        .as_ref()
        .and_then(Value::as_str)
        .filter(|d| is_iso_date(d))?
        .to_string();

    Some(DrawRecord {
        round_number: to_non_negative(round_number?)?,
        draw_date: Some(draw_date),
        round_type,
        invitations_issued: to_non_negative(invitations?)?,
        crs_score: to_non_negative(crs_score?)?,
        program_category: category,
        notes: name,
        data_source: DATA_SOURCE_IRCC.to_string(),
    })
}

/// First category whose keyword occurs in `name`.
pub fn classify_category(name: &str) -> Option<ProgramCategory> {
    CATEGORY_RULES
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, category)| *category)
}

pub fn classify_round_type(name: &str, category: Option<ProgramCategory>) -> RoundType {
    if name.contains(PROGRAM_SPECIFIC_MARKER) {
        RoundType::ProgramSpecific
    } else if matches!(category, Some(c) if c != ProgramCategory::Pnp) {
        RoundType::CategoryBased
    } else {
        RoundType::General
    }
}

/// Parse a leading integer the way the upstream publisher's tooling does:
/// surrounding whitespace and an optional sign are accepted, and parsing
/// stops at the first non-digit. At least one digit is required.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// `drawSize` is thousands-separated text; absent or empty means zero.
fn parse_invitations(value: Option<&Value>) -> Option<i64> {
    match value {
        None | Some(Value::Null) => Some(0),
        Some(Value::String(s)) if s.is_empty() => Some(0),
        Some(v) => {
            let text = value_text(v)?;
            parse_int_prefix(&text.replace(',', ""))
        }
    }
}

fn parse_int_value(value: &Value) -> Option<i64> {
    value_text(value).and_then(|s| parse_int_prefix(&s))
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn to_non_negative(value: i64) -> Option<u32> {
    u32::try_from(value).ok()
}

/// `YYYY-MM-DD` and a real calendar date.
fn is_iso_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
