use std::collections::HashMap;
use std::hash::Hash;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::model::GameRecord;
use crate::profile::resolve_user_role;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub games: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekActivity {
    /// The Sunday the week starts on.
    pub week_start: NaiveDate,
    pub games: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthActivity {
    pub year: i32,
    pub month: u32,
    pub games: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LongestStreak {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Inclusive day count: end - start + 1.
    pub days: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LongestDrought {
    /// First day with no game, the day after a played day.
    pub start: NaiveDate,
    /// Last day with no game, the day before the next played day.
    pub end: NaiveDate,
    pub days: usize,
}

/// Calendar days of the player's resolved games, in input order,
/// duplicates included.
fn played_dates(games: &[GameRecord], username: &str) -> Vec<NaiveDate> {
    games
        .iter()
        .filter(|game| resolve_user_role(game, username).is_some())
        .filter_map(|game| game.completed_at.map(|done| done.date_naive()))
        .collect()
}

fn distinct_sorted_days(games: &[GameRecord], username: &str) -> Vec<NaiveDate> {
    let mut days = played_dates(games, username);
    days.sort_unstable();
    days.dedup();
    days
}

/// Bucket tally keeping the first-encountered key on count ties.
fn busiest_bucket<K: Eq + Hash + Copy>(keys: impl Iterator<Item = K>) -> Option<(K, usize)> {
    let mut order: Vec<K> = Vec::new();
    let mut counts: HashMap<K, usize> = HashMap::new();
    for key in keys {
        if !counts.contains_key(&key) {
            order.push(key);
        }
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut best: Option<(K, usize)> = None;
    for key in order {
        let count = counts[&key];
        if best.is_none_or(|(_, b)| count > b) {
            best = Some((key, count));
        }
    }
    best
}

pub fn busiest_day(games: &[GameRecord], username: &str) -> Option<DayActivity> {
    busiest_bucket(played_dates(games, username).into_iter())
        .map(|(date, games)| DayActivity { date, games })
}

fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

pub fn busiest_week(games: &[GameRecord], username: &str) -> Option<WeekActivity> {
    busiest_bucket(played_dates(games, username).into_iter().map(week_start))
        .map(|(week_start, games)| WeekActivity { week_start, games })
}

pub fn busiest_month(games: &[GameRecord], username: &str) -> Option<MonthActivity> {
    busiest_bucket(
        played_dates(games, username)
            .into_iter()
            .map(|date| (date.year(), date.month())),
    )
    .map(|((year, month), games)| MonthActivity { year, month, games })
}

/// Longest run of consecutive calendar days with at least one resolved
/// game. A single active day is a streak of one.
pub fn longest_streak(games: &[GameRecord], username: &str) -> Option<LongestStreak> {
    let days = distinct_sorted_days(games, username);
    let first = *days.first()?;
    let mut best = (first, first, 1usize);
    let mut run_start = first;
    let mut run_len = 1usize;
    let mut prev = first;
    for &day in &days[1..] {
        if (day - prev).num_days() == 1 {
            run_len += 1;
        } else {
            run_start = day;
            run_len = 1;
        }
        prev = day;
        if run_len > best.2 {
            best = (run_start, day, run_len);
        }
    }
    Some(LongestStreak {
        start: best.0,
        end: best.1,
        days: best.2,
    })
}

/// Longest gap of unplayed days strictly between two played days,
/// reported as the unplayed range itself. Needs at least two distinct
/// active days.
pub fn longest_drought(games: &[GameRecord], username: &str) -> Option<LongestDrought> {
    let days = distinct_sorted_days(games, username);
    let mut best: Option<LongestDrought> = None;
    for pair in days.windows(2) {
        let gap = (pair[1] - pair[0]).num_days() - 1;
        if gap <= 0 {
            continue;
        }
        let (Some(start), Some(end)) = (pair[0].succ_opt(), pair[1].pred_opt()) else {
            continue;
        };
        let gap = gap as usize;
        if best.is_none_or(|b| gap > b.days) {
            best = Some(LongestDrought {
                start,
                end,
                days: gap,
            });
        }
    }
    best
}
