use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::aggregate::{AggregateStats, compute_aggregates};
use crate::model::GameRecord;
use crate::normalize::normalize_game;
use crate::profile::{UserProfile, detect_profile};

/// The only two ways a dump can be rejected. Everything past the
/// top-level shape check degrades field-by-field instead of failing.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload is not well-formed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected a top-level list of games, found {found}")]
    Schema { found: &'static str },
}

/// Optional inclusive window on `completed_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryOptions {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl SummaryOptions {
    fn has_window(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadSummary {
    pub games: Vec<GameRecord>,
    pub profile: Option<UserProfile>,
    pub aggregates: AggregateStats,
}

/// Parse and normalize a raw history dump, optionally window it, then
/// detect the tracked player and compute their aggregates. The window
/// filter runs before profile detection, so narrowing the window can
/// change whose history this is. Finders and highlights are separate
/// passes over `games` + the detected username, invoked by the caller.
pub fn summarize_upload(raw: &str, options: &SummaryOptions) -> Result<UploadSummary, UploadError> {
    let value: Value = serde_json::from_str(raw.trim())?;
    let Some(entries) = value.as_array() else {
        return Err(UploadError::Schema {
            found: json_kind(&value),
        });
    };

    let mut games: Vec<GameRecord> = entries.iter().map(normalize_game).collect();
    debug!("normalized {} raw entries", games.len());

    if options.has_window() {
        let before = games.len();
        games.retain(|game| in_window(game, options));
        debug!("date window kept {} of {before} games", games.len());
    }

    let profile = detect_profile(&games);
    let aggregates = profile
        .as_ref()
        .map(|p| compute_aggregates(&games, &p.username))
        .unwrap_or_default();

    Ok(UploadSummary {
        games,
        profile,
        aggregates,
    })
}

/// Windowed runs drop games that can't be placed: no completion
/// timestamp or an unoccupied seat.
fn in_window(game: &GameRecord, options: &SummaryOptions) -> bool {
    let Some(done) = game.completed_at else {
        return false;
    };
    if game.corp.username.is_none() || game.runner.username.is_none() {
        return false;
    }
    if options.start.is_some_and(|start| done < start) {
        return false;
    }
    if options.end.is_some_and(|end| done > end) {
        return false;
    }
    true
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
