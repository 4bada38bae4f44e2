//! Keyword-group registry, the static alignment table, and the demo fixture.
//!
//! Groups are defined at startup and immutable afterwards. The fixture is the
//! substitute data set used whenever the live source is disabled or fails.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::report::GroupStats;

/// A named cluster of related search terms tracked as one narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Built-in keyword groups, used when no narratives config file is present.
pub fn default_groups() -> Vec<KeywordGroup> {
    vec![
        KeywordGroup::new("Restaking", &["EigenLayer", "EIGEN", "restaking"]),
        KeywordGroup::new("Bitcoin L2", &["Ordinals", "Runes", "Bitcoin L2"]),
        KeywordGroup::new(
            "AI Agents",
            &[
                "AI agent",
                "autonomous agent",
                "$OLAS",
                "Capx",
                "CapxAI",
                "$CAPX",
                "AI app",
            ],
        ),
    ]
}

/// Score when a narrative has no entry in the alignment table.
pub const DEFAULT_ALIGNMENT: u32 = 30;

static ALIGNMENT_SCORES: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("AI Agents", 100),  // perfect match - AI apps/agents
        ("Restaking", 70),   // DeFi/trading adjacent
        ("Bitcoin L2", 50),  // blockchain infrastructure
    ])
});

pub fn alignment_for(narrative: &str) -> u32 {
    ALIGNMENT_SCORES
        .get(narrative)
        .copied()
        .unwrap_or(DEFAULT_ALIGNMENT)
}

/// Static fixture rows returned in demo mode and on live-scan fallback.
/// Growth values are stored verbatim rather than recomputed, so the headline
/// over this set is always AI Agents at 201.5.
pub fn fixture_stats() -> Vec<GroupStats> {
    vec![
        GroupStats::new("Restaking", 89, 34, 158.4),
        GroupStats::new("AI Agents", 67, 28, 201.5),
        GroupStats::new("Bitcoin L2", 112, 15, 60.7),
    ]
}
