//! Core data models shared by the normalizer and the query engine.
//!
//! [`RawDrawEntry`] mirrors the upstream IRCC feed; [`DrawRecord`] is the
//! canonical shape persisted in a [`DrawCollection`] snapshot; [`DrawView`]
//! is the flat projection returned to API and CLI consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance tag written on every normalized record.
pub const DATA_SOURCE_IRCC: &str = "ircc_api";

/// One entry of the upstream `rounds` array, before normalization.
///
/// Every field is kept as a loose JSON value: the feed has published
/// round numbers and scores both as strings and as numbers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDrawEntry {
    #[serde(default)]
    pub draw_number: Option<serde_json::Value>,
    #[serde(default)]
    pub draw_date: Option<serde_json::Value>,
    #[serde(default)]
    pub draw_size: Option<serde_json::Value>,
    #[serde(default, rename = "drawCRS")]
    pub draw_crs: Option<serde_json::Value>,
    #[serde(default)]
    pub draw_name: Option<serde_json::Value>,
}

/// How a round selected its candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundType {
    #[serde(rename = "General")]
    General,
    #[serde(rename = "Program-specific")]
    ProgramSpecific,
    #[serde(rename = "Category-based")]
    CategoryBased,
}

impl RoundType {
    pub fn label(&self) -> &'static str {
        match self {
            RoundType::General => "General",
            RoundType::ProgramSpecific => "Program-specific",
            RoundType::CategoryBased => "Category-based",
        }
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Program or occupation category targeted by a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgramCategory {
    #[serde(rename = "PNP")]
    Pnp,
    #[serde(rename = "CEC")]
    Cec,
    #[serde(rename = "FSW")]
    Fsw,
    #[serde(rename = "French-language")]
    FrenchLanguage,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "STEM")]
    Stem,
    #[serde(rename = "Trade")]
    Trade,
    #[serde(rename = "Transport")]
    Transport,
    #[serde(rename = "Agriculture")]
    Agriculture,
}

impl ProgramCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ProgramCategory::Pnp => "PNP",
            ProgramCategory::Cec => "CEC",
            ProgramCategory::Fsw => "FSW",
            ProgramCategory::FrenchLanguage => "French-language",
            ProgramCategory::Healthcare => "Healthcare",
            ProgramCategory::Stem => "STEM",
            ProgramCategory::Trade => "Trade",
            ProgramCategory::Transport => "Transport",
            ProgramCategory::Agriculture => "Agriculture",
        }
    }
}

impl fmt::Display for ProgramCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A canonical, validated Express Entry round.
///
/// Stored with snake_case keys so snapshots written by earlier deployments
/// keep loading; camelCase keys are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    #[serde(alias = "roundNumber")]
    pub round_number: u32,
    /// ISO `YYYY-MM-DD`. Always present on normalized records; a snapshot
    /// written elsewhere may omit it.
    #[serde(default, alias = "drawDate")]
    pub draw_date: Option<String>,
    #[serde(alias = "roundType")]
    pub round_type: RoundType,
    #[serde(alias = "invitationsIssued")]
    pub invitations_issued: u32,
    #[serde(alias = "crsScore")]
    pub crs_score: u32,
    #[serde(default, alias = "programCategory")]
    pub program_category: Option<ProgramCategory>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_data_source", alias = "dataSource")]
    pub data_source: String,
}

fn default_data_source() -> String {
    DATA_SOURCE_IRCC.to_string()
}

impl DrawRecord {
    /// The draw date, treating an empty string the same as a missing one.
    pub fn date(&self) -> Option<&str> {
        self.draw_date.as_deref().filter(|d| !d.is_empty())
    }

    /// Year segment of the draw date (text before the first `-`).
    pub fn year(&self) -> Option<&str> {
        self.date().and_then(|d| d.split('-').next())
    }

    /// Flat response projection.
    pub fn to_view(&self) -> DrawView {
        DrawView {
            draw_number: self.round_number,
            date: self.date().map(str::to_string),
            invitations_issued: self.invitations_issued,
            minimum_crs: self.crs_score,
            category: self.program_category,
            round_type: self.round_type,
            year: self.year().map(str::to_string),
            notes: self.notes.clone(),
        }
    }
}

/// A full snapshot of normalized draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawCollection {
    pub last_updated: DateTime<Utc>,
    pub source: String,
    pub total_draws: usize,
    #[serde(default)]
    pub draws: Vec<DrawRecord>,
}

impl DrawCollection {
    pub fn new(draws: Vec<DrawRecord>, source: impl Into<String>, last_updated: DateTime<Utc>) -> Self {
        Self {
            last_updated,
            source: source.into(),
            total_draws: draws.len(),
            draws,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

/// Response projection of a single draw, as served by list/latest/lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawView {
    pub draw_number: u32,
    pub date: Option<String>,
    pub invitations_issued: u32,
    #[serde(rename = "minimumCRS")]
    pub minimum_crs: u32,
    pub category: Option<ProgramCategory>,
    pub round_type: RoundType,
    pub year: Option<String>,
    pub notes: Option<String>,
}
