//! report.rs — serde shapes for scan output: per-group stats and the
//! headline report the API returns and the cache file persists.

use serde::{Deserialize, Serialize};

/// Qualitative label for a narrative's growth magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "Crowded Trade")]
    CrowdedTrade,
    #[serde(rename = "Strong Alpha")]
    StrongAlpha,
    #[serde(rename = "Early Alpha")]
    EarlyAlpha,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::CrowdedTrade => "Crowded Trade",
            Stage::StrongAlpha => "Strong Alpha",
            Stage::EarlyAlpha => "Early Alpha",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One scanned keyword group: raw counts plus the computed growth percentage.
/// Created fresh per scan, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub narrative: String,
    pub mentions_24h: u64,
    pub mentions_2h: u64,
    pub growth: f64,
}

impl GroupStats {
    pub fn new(narrative: impl Into<String>, mentions_24h: u64, mentions_2h: u64, growth: f64) -> Self {
        Self {
            narrative: narrative.into(),
            mentions_24h,
            mentions_2h,
            growth,
        }
    }
}

/// Headline result for the top-growing narrative. This is the shape
/// `/api/narrative` returns and the cache file holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeReport {
    pub narrative: String,
    /// Human-readable growth, e.g. `"+201.5%"`.
    pub growth: String,
    /// Raw growth percentage (unbounded above when the baseline was zero).
    pub growth_percent: f64,
    pub mentions_24h: u64,
    pub mentions_2h: u64,
    pub stage: Stage,
    pub summary: String,
    /// Static alignment score looked up by narrative name.
    pub alignment: u32,
    /// RFC 3339 UTC, e.g. "2025-08-16T10:00:00Z".
    pub timestamp: String,
}

/// `+X%` for positive growth, plain `X%` otherwise.
pub fn format_growth(growth: f64) -> String {
    if growth > 0.0 {
        format!("+{growth}%")
    } else {
        format!("{growth}%")
    }
}
