use std::collections::HashMap;

use serde::Serialize;

use crate::model::{GameRecord, Outcome};
use crate::profile::resolve_user_role;

pub const UNKNOWN_REASON: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReasonCategory {
    Flatline,
    AgendaPoints,
    Decked,
    Concede,
    Timeout,
    Other,
}

/// Keyword buckets over the client's free-form reason strings.
pub fn categorize_reason(reason: &str) -> ReasonCategory {
    let r = reason.to_ascii_lowercase();
    if r.contains("flatline") {
        ReasonCategory::Flatline
    } else if r.contains("agenda") {
        ReasonCategory::AgendaPoints
    } else if r.contains("deck") {
        ReasonCategory::Decked
    } else if r.contains("concede") {
        ReasonCategory::Concede
    } else if r.contains("time") {
        ReasonCategory::Timeout
    } else {
        ReasonCategory::Other
    }
}

fn normalize_reason(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNKNOWN_REASON.to_string()
    } else {
        trimmed.to_string()
    }
}

/// The most frequent termination reason of one outcome bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasonSummary {
    pub reason: String,
    pub category: ReasonCategory,
    pub count: usize,
    pub total: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WinLossReasons {
    pub win: Option<ReasonSummary>,
    pub loss: Option<ReasonSummary>,
}

/// Most common termination reason for the player's wins and losses.
/// Undecided games have no bucket and are skipped even when they carry
/// a reason.
pub fn summarize_reasons(games: &[GameRecord], username: &str) -> WinLossReasons {
    let mut wins: Vec<String> = Vec::new();
    let mut losses: Vec<String> = Vec::new();
    for game in games {
        let Some(side) = resolve_user_role(game, username) else {
            continue;
        };
        let Some(reason) = game.reason.as_deref() else {
            continue;
        };
        match game.outcome_for(side) {
            Outcome::Win => wins.push(normalize_reason(reason)),
            Outcome::Loss => losses.push(normalize_reason(reason)),
            Outcome::Undecided => {}
        }
    }
    WinLossReasons {
        win: summarize_bucket(&wins),
        loss: summarize_bucket(&losses),
    }
}

fn summarize_bucket(reasons: &[String]) -> Option<ReasonSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for reason in reasons {
        let reason = reason.as_str();
        if !counts.contains_key(reason) {
            order.push(reason);
        }
        *counts.entry(reason).or_insert(0) += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for reason in order {
        let count = counts[reason];
        if best.is_none_or(|(_, b)| count > b) {
            best = Some((reason, count));
        }
    }
    let (reason, count) = best?;
    let total = reasons.len();
    Some(ReasonSummary {
        reason: reason.to_string(),
        category: categorize_reason(reason),
        count,
        total,
        percent: count as f64 / total as f64 * 100.0,
    })
}
