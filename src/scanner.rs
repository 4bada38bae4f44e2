//! # Narrative Scanner
//! Walks the keyword groups, fetches both time windows for each, computes
//! growth, and selects the headline narrative. Any fetch failure abandons the
//! live scan wholesale and substitutes the demo fixture — never partial
//! results.

use anyhow::{anyhow, Result};
use chrono::{SecondsFormat, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;

use crate::fetch::MentionProvider;
use crate::growth::{calculate_growth, classify_stage, LONG_WINDOW_HOURS, SHORT_WINDOW_HOURS};
use crate::narratives::{alignment_for, fixture_stats, KeywordGroup};
use crate::report::{format_growth, GroupStats, NarrativeReport};

/// Growth below this reads as "moderate activity" in the headline summary.
const SUMMARY_RAPID_MIN: f64 = 50.0;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scan_runs_total", "Narrative scans started.");
        describe_counter!(
            "scan_fallback_total",
            "Live scans abandoned in favor of the fixture."
        );
        describe_counter!("fetch_errors_total", "Search API fetch errors.");
        describe_gauge!("scan_last_run_ts", "Unix ts when a scan last completed.");
    });
}

/// Fetch stats for every keyword group.
///
/// Demo mode returns the fixture untouched. Live mode requires a provider;
/// a fetch error on any group replaces the entire result set with the
/// fixture, so callers never see a half-scanned mix of live and stale rows.
pub async fn scan_all(
    demo_mode: bool,
    provider: Option<&dyn MentionProvider>,
    groups: &[KeywordGroup],
) -> Result<Vec<GroupStats>> {
    ensure_metrics_described();
    counter!("scan_runs_total").increment(1);

    if demo_mode {
        tracing::info!("demo mode enabled, serving fixture data");
        return Ok(fixture_stats());
    }

    let provider =
        provider.ok_or_else(|| anyhow!("TWITTER_BEARER_TOKEN environment variable not set"))?;

    let mut results = Vec::with_capacity(groups.len());
    for group in groups {
        let mentions_24h = match provider.count_mentions(&group.keywords, LONG_WINDOW_HOURS).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = ?e, narrative = %group.name, "fetch failed, switching to fixture data");
                counter!("scan_fallback_total").increment(1);
                return Ok(fixture_stats());
            }
        };

        let mentions_2h = match provider.count_mentions(&group.keywords, SHORT_WINDOW_HOURS).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = ?e, narrative = %group.name, "fetch failed, switching to fixture data");
                counter!("scan_fallback_total").increment(1);
                return Ok(fixture_stats());
            }
        };

        let growth = calculate_growth(mentions_24h, mentions_2h);
        tracing::debug!(
            narrative = %group.name,
            mentions_24h,
            mentions_2h,
            growth,
            "group scanned"
        );

        results.push(GroupStats {
            narrative: group.name.clone(),
            mentions_24h,
            mentions_2h,
            growth,
        });
    }

    gauge!("scan_last_run_ts").set(Utc::now().timestamp().max(0) as f64);
    Ok(results)
}

/// Run a full scan and build the headline report for the top-growing group.
/// Ties go to the earlier group in iteration order.
pub async fn detect_narrative(
    demo_mode: bool,
    provider: Option<&dyn MentionProvider>,
    groups: &[KeywordGroup],
) -> Result<NarrativeReport> {
    let results = scan_all(demo_mode, provider, groups).await?;

    let top = top_gainer(&results).ok_or_else(|| anyhow!("no narratives scanned"))?;

    let stage = classify_stage(top.growth);
    let summary = if top.growth < SUMMARY_RAPID_MIN {
        format!("{} showing moderate activity", top.narrative)
    } else {
        format!("{}-related discussions accelerating rapidly", top.narrative)
    };

    Ok(NarrativeReport {
        narrative: top.narrative.clone(),
        growth: format_growth(top.growth),
        growth_percent: top.growth,
        mentions_24h: top.mentions_24h,
        mentions_2h: top.mentions_2h,
        stage,
        summary,
        alignment: alignment_for(&top.narrative),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

/// Stable max by growth: strictly-greater comparison keeps the first
/// occurrence on ties.
fn top_gainer(results: &[GroupStats]) -> Option<&GroupStats> {
    let mut best: Option<&GroupStats> = None;
    for r in results {
        match best {
            Some(b) if r.growth <= b.growth => {}
            _ => best = Some(r),
        }
    }
    best
}
