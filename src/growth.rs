//! # Growth Calculator & Stage Classifier
//! Pure, testable logic that maps two mention counts to a growth percentage
//! and a growth percentage to a narrative stage. No I/O.

use crate::report::Stage;

/// Baseline window length in hours (the "established" signal).
pub const LONG_WINDOW_HOURS: u64 = 24;
/// Recent window length in hours (the "spike" signal).
pub const SHORT_WINDOW_HOURS: u64 = 2;

/// Linear extrapolation factor from the short window to the long one.
pub const EXTRAPOLATION_FACTOR: u64 = LONG_WINDOW_HOURS / SHORT_WINDOW_HOURS;

const STAGE_CROWDED_MIN: f64 = 70.0;
const STAGE_STRONG_MIN: f64 = 30.0;

/// Percentage growth of the recent window against the baseline window.
///
/// The recent count is extrapolated linearly to the baseline window's length
/// before comparing, so `growth == 0` means "activity holding steady".
/// A zero baseline makes the ratio undefined: any recent activity is treated
/// as infinite growth, no activity at all as zero.
pub fn calculate_growth(mentions_24h: u64, mentions_2h: u64) -> f64 {
    let extrapolated = (mentions_2h * EXTRAPOLATION_FACTOR) as f64;
    let baseline = mentions_24h as f64;

    if mentions_24h == 0 {
        if extrapolated > 0.0 {
            return f64::INFINITY;
        }
        return 0.0;
    }

    let growth = (extrapolated - baseline) / baseline * 100.0;
    round1(growth)
}

/// Threshold classification of a growth percentage into a narrative stage.
pub fn classify_stage(growth_pct: f64) -> Stage {
    if growth_pct > STAGE_CROWDED_MIN {
        Stage::CrowdedTrade
    } else if growth_pct >= STAGE_STRONG_MIN {
        Stage::StrongAlpha
    } else {
        Stage::EarlyAlpha
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
