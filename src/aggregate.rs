use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::GameRecord;
use crate::profile::resolve_user_role;

/// Whole-history scalar summary over the player's resolved games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AggregateStats {
    pub total_minutes: f64,
    pub total_days: usize,
    pub average_games_per_day: f64,
    pub average_minutes_per_game: f64,
    pub average_minutes_per_day: f64,
}

pub fn compute_aggregates(games: &[GameRecord], username: &str) -> AggregateStats {
    let mut total_minutes = 0.0;
    let mut played = 0usize;
    let mut days: HashSet<NaiveDate> = HashSet::new();
    for game in games {
        if resolve_user_role(game, username).is_none() {
            continue;
        }
        played += 1;
        if let Some(minutes) = game.elapsed_minutes
            && minutes > 0.0
        {
            total_minutes += minutes;
        }
        if let Some(done) = game.completed_at {
            days.insert(done.date_naive());
        }
    }

    let total_days = days.len();
    let ratio = |num: f64, den: f64| if den > 0.0 { num / den } else { 0.0 };
    AggregateStats {
        total_minutes,
        total_days,
        average_games_per_day: ratio(played as f64, total_days as f64),
        average_minutes_per_game: ratio(total_minutes, played as f64),
        average_minutes_per_day: ratio(total_minutes, total_days as f64),
    }
}
