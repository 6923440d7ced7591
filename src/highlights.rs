use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{GameRecord, Outcome, Side};
use crate::profile::resolve_user_role;

/// The record behind one superlative: the game that took the extreme
/// value of some per-game metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameHighlight {
    pub side: Side,
    pub value: f64,
    pub identity: Option<String>,
    pub opponent: Option<String>,
    pub opponent_identity: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub turn_count: Option<u32>,
    pub outcome: Outcome,
    pub reason: Option<String>,
}

/// Single scan for the extreme game under `selector`. The selector
/// returns the candidate metric for the user's resolved seat (`None` =
/// not applicable, which is excluded, not treated as zero); `better`
/// decides whether a candidate replaces the running best. Ties keep the
/// first-encountered game. All eligibility rules live in the selectors;
/// the scan itself carries none.
pub fn find_game_highlight<S, B>(
    games: &[GameRecord],
    username: &str,
    selector: S,
    better: B,
) -> Option<GameHighlight>
where
    S: Fn(&GameRecord, Side) -> Option<f64>,
    B: Fn(f64, f64) -> bool,
{
    let mut best: Option<(f64, &GameRecord, Side)> = None;
    for game in games {
        let Some(side) = resolve_user_role(game, username) else {
            continue;
        };
        let Some(value) = selector(game, side).filter(|v| v.is_finite()) else {
            continue;
        };
        if best.is_none_or(|(b, _, _)| better(value, b)) {
            best = Some((value, game, side));
        }
    }
    best.map(|(value, game, side)| GameHighlight {
        side,
        value,
        identity: game.snapshot(side).identity.clone(),
        opponent: game.opponent_snapshot(side).username.clone(),
        opponent_identity: game.opponent_snapshot(side).identity.clone(),
        completed_at: game.completed_at,
        turn_count: game.turn_count,
        outcome: game.outcome_for(side),
        reason: game.reason.clone(),
    })
}

fn more(candidate: f64, best: f64) -> bool {
    candidate > best
}

fn less(candidate: f64, best: f64) -> bool {
    candidate < best
}

fn won(game: &GameRecord, side: Side) -> bool {
    game.winner == Some(side)
}

fn reason_contains(game: &GameRecord, needle: &str) -> bool {
    game.reason
        .as_deref()
        .is_some_and(|r| r.to_ascii_lowercase().contains(needle))
}

fn conceded(game: &GameRecord) -> bool {
    reason_contains(game, "concede")
}

/// A win that was earned on the board, not handed over.
fn earned_win(game: &GameRecord, side: Side) -> bool {
    won(game, side) && !conceded(game)
}

fn corp_only(side: Side, value: Option<f64>) -> Option<f64> {
    if side == Side::Corp { value } else { None }
}

fn runner_only(side: Side, value: Option<f64>) -> Option<f64> {
    if side == Side::Runner { value } else { None }
}

/// Metric over turns; needs both the metric and a positive turn count.
fn per_turn(value: Option<f64>, game: &GameRecord) -> Option<f64> {
    let turns = game.turn_count.filter(|t| *t > 0)?;
    Some(value? / f64::from(turns))
}

fn turns_in(game: &GameRecord) -> Option<f64> {
    game.turn_count.filter(|t| *t > 0).map(f64::from)
}

/// The fixed-name bag of per-game superlatives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Highlights {
    pub most_clicks_gained: Option<GameHighlight>,
    pub most_credits_gained: Option<GameHighlight>,
    pub most_credits_spent: Option<GameHighlight>,
    pub most_credits_from_clicks: Option<GameHighlight>,
    pub most_cards_drawn: Option<GameHighlight>,
    pub most_cards_drawn_from_clicks: Option<GameHighlight>,
    pub most_shuffles: Option<GameHighlight>,
    pub most_cards_played: Option<GameHighlight>,
    pub most_cards_accessed: Option<GameHighlight>,
    pub most_cards_rezzed: Option<GameHighlight>,
    pub fewest_cards_rezzed_win: Option<GameHighlight>,
    pub most_runs_started: Option<GameHighlight>,
    pub fewest_runs_win: Option<GameHighlight>,
    pub most_unique_accesses: Option<GameHighlight>,
    pub most_damage_done: Option<GameHighlight>,
    pub most_damage_taken_win: Option<GameHighlight>,
    pub most_tags_gained: Option<GameHighlight>,
    pub most_tags_win: Option<GameHighlight>,
    pub most_clicks_per_turn: Option<GameHighlight>,
    pub least_clicks_per_turn: Option<GameHighlight>,
    pub most_credits_per_turn: Option<GameHighlight>,
    pub least_credits_per_turn: Option<GameHighlight>,
    pub fake_credits: Option<GameHighlight>,
    pub biggest_credit_surplus: Option<GameHighlight>,
    pub least_credits_spent_win: Option<GameHighlight>,
    pub fewest_cards_played_win: Option<GameHighlight>,
    pub fastest_win: Option<GameHighlight>,
    pub fastest_flatline_win: Option<GameHighlight>,
    pub fastest_agenda_win: Option<GameHighlight>,
    pub longest_win: Option<GameHighlight>,
}

pub fn compute_highlights(games: &[GameRecord], username: &str) -> Highlights {
    let most =
        |sel: fn(&GameRecord, Side) -> Option<f64>| find_game_highlight(games, username, sel, more);
    let least =
        |sel: fn(&GameRecord, Side) -> Option<f64>| find_game_highlight(games, username, sel, less);

    Highlights {
        most_clicks_gained: most(|g, s| g.clicks_gained(s)),
        most_credits_gained: most(|g, s| g.credits_gained(s)),
        most_credits_spent: most(|g, s| g.credits_spent(s)),
        most_credits_from_clicks: most(|g, s| g.credits_from_clicks(s)),
        most_cards_drawn: most(|g, s| g.cards_drawn(s)),
        most_cards_drawn_from_clicks: most(|g, s| g.cards_drawn_from_clicks(s)),
        most_shuffles: most(|g, s| g.shuffle_count(s).filter(|v| *v > 0.0)),
        most_cards_played: most(|g, s| g.cards_played(s)),
        most_cards_accessed: most(|g, s| g.cards_accessed(s)),
        most_cards_rezzed: most(|g, s| corp_only(s, g.corp_stats.cards_rezzed)),
        fewest_cards_rezzed_win: least(|g, s| {
            if earned_win(g, s) {
                corp_only(s, g.corp_stats.cards_rezzed)
            } else {
                None
            }
        }),
        most_runs_started: most(|g, s| runner_only(s, g.runner_stats.runs_started)),
        fewest_runs_win: least(|g, s| {
            if earned_win(g, s) {
                runner_only(s, g.runner_stats.runs_started)
            } else {
                None
            }
        }),
        most_unique_accesses: most(|g, s| {
            runner_only(s, g.runner_unique_accesses.map(f64::from))
        }),
        most_damage_done: most(|g, s| corp_only(s, g.corp_stats.damage_done)),
        most_damage_taken_win: most(|g, s| {
            if won(g, s) {
                g.damage_done(s.opponent()).filter(|v| *v > 0.0)
            } else {
                None
            }
        }),
        most_tags_gained: most(|g, s| runner_only(s, g.runner_stats.tags_gained)),
        most_tags_win: most(|g, s| {
            if won(g, s) {
                runner_only(s, g.runner_stats.tags_gained).filter(|v| *v > 0.0)
            } else {
                None
            }
        }),
        most_clicks_per_turn: most(|g, s| per_turn(g.clicks_gained(s), g)),
        least_clicks_per_turn: least(|g, s| per_turn(g.clicks_gained(s), g)),
        most_credits_per_turn: most(|g, s| per_turn(g.credits_gained(s), g)),
        least_credits_per_turn: least(|g, s| per_turn(g.credits_gained(s), g)),
        // Spent more than ever came in: credit that existed on paper only.
        fake_credits: most(|g, s| {
            let delta = g.credits_spent(s)? - g.credits_gained(s)?;
            (delta > 0.0).then_some(delta)
        }),
        biggest_credit_surplus: most(|g, s| {
            let delta = g.credits_gained(s)? - g.credits_spent(s)?;
            (delta > 0.0).then_some(delta)
        }),
        least_credits_spent_win: least(|g, s| {
            if earned_win(g, s) {
                g.credits_spent(s)
            } else {
                None
            }
        }),
        fewest_cards_played_win: least(|g, s| {
            if earned_win(g, s) {
                g.cards_played(s)
            } else {
                None
            }
        }),
        fastest_win: least(|g, s| if won(g, s) { turns_in(g) } else { None }),
        fastest_flatline_win: least(|g, s| {
            if s == Side::Corp && won(g, s) && reason_contains(g, "flatline") {
                turns_in(g)
            } else {
                None
            }
        }),
        fastest_agenda_win: least(|g, s| {
            if won(g, s) && reason_contains(g, "agenda") {
                turns_in(g)
            } else {
                None
            }
        }),
        longest_win: most(|g, s| {
            if won(g, s) {
                g.turn_count.map(f64::from)
            } else {
                None
            }
        }),
    }
}
