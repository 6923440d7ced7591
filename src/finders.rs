use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{GameRecord, Outcome, Side};
use crate::profile::resolve_user_role;

/// Win/loss record for one seat, over decided games only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoleRecord {
    pub side: Side,
    pub wins: usize,
    pub losses: usize,
    pub total: usize,
}

pub fn role_record(games: &[GameRecord], username: &str, side: Side) -> Option<RoleRecord> {
    let mut wins = 0usize;
    let mut total = 0usize;
    for game in games {
        if game.winner.is_none() {
            continue;
        }
        if resolve_user_role(game, username) != Some(side) {
            continue;
        }
        total += 1;
        if game.winner == Some(side) {
            wins += 1;
        }
    }
    (total > 0).then_some(RoleRecord {
        side,
        wins,
        losses: total - wins,
        total,
    })
}

/// Most-played identity for one seat; ties go to the identity with more
/// wins, then to the one seen first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityFavorite {
    pub identity: String,
    pub side: Side,
    pub games: usize,
    pub wins: usize,
}

pub fn favorite_identity(
    games: &[GameRecord],
    username: &str,
    side: Side,
) -> Option<IdentityFavorite> {
    let mut order: Vec<&str> = Vec::new();
    let mut tallies: HashMap<&str, (usize, usize)> = HashMap::new();
    for game in games {
        if game.winner.is_none() {
            continue;
        }
        if resolve_user_role(game, username) != Some(side) {
            continue;
        }
        let Some(identity) = game.snapshot(side).identity.as_deref() else {
            continue;
        };
        if !tallies.contains_key(identity) {
            order.push(identity);
        }
        let entry = tallies.entry(identity).or_insert((0, 0));
        entry.0 += 1;
        if game.winner == Some(side) {
            entry.1 += 1;
        }
    }

    let mut best: Option<(&str, (usize, usize))> = None;
    for identity in order {
        let tally = tallies[identity];
        let replace = match best {
            None => true,
            Some((_, b)) => tally.0 > b.0 || (tally.0 == b.0 && tally.1 > b.1),
        };
        if replace {
            best = Some((identity, tally));
        }
    }
    best.map(|(identity, (games, wins))| IdentityFavorite {
        identity: identity.to_string(),
        side,
        games,
        wins,
    })
}

/// One opponent's head-to-head record. Wins/losses count decided games;
/// `games` counts every resolved game against them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentRecord {
    pub username: String,
    pub email_hash: Option<String>,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
}

fn opponent_records(games: &[GameRecord], username: &str) -> Vec<OpponentRecord> {
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, OpponentRecord> = HashMap::new();
    for game in games {
        let Some(side) = resolve_user_role(game, username) else {
            continue;
        };
        let opponent = game.opponent_snapshot(side);
        let Some(name) = opponent.username.as_deref() else {
            continue;
        };
        let entry = by_name.entry(name.to_string()).or_insert_with(|| {
            order.push(name.to_string());
            OpponentRecord {
                username: name.to_string(),
                email_hash: None,
                games: 0,
                wins: 0,
                losses: 0,
            }
        });
        entry.games += 1;
        if entry.email_hash.is_none() {
            entry.email_hash = opponent.email_hash.clone();
        }
        match game.outcome_for(side) {
            Outcome::Win => entry.wins += 1,
            Outcome::Loss => entry.losses += 1,
            Outcome::Undecided => {}
        }
    }
    order
        .into_iter()
        .filter_map(|name| by_name.remove(&name))
        .collect()
}

/// The single most-faced opponent; ties by most wins against them, then
/// first encounter.
pub fn most_frequent_opponent(games: &[GameRecord], username: &str) -> Option<OpponentRecord> {
    let mut best: Option<OpponentRecord> = None;
    for record in opponent_records(games, username) {
        let replace = match &best {
            None => true,
            Some(b) => record.games > b.games || (record.games == b.games && record.wins > b.wins),
        };
        if replace {
            best = Some(record);
        }
    }
    best
}

/// Top `limit` opponents by game count, first-encounter order on ties.
pub fn top_opponents(games: &[GameRecord], username: &str, limit: usize) -> Vec<OpponentRecord> {
    let mut records = opponent_records(games, username);
    records.sort_by(|a, b| b.games.cmp(&a.games));
    records.truncate(limit);
    records
}

/// The extreme game found by a turn- or duration-based search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongestGame {
    pub turn_count: u32,
    pub side: Side,
    pub identity: Option<String>,
    pub opponent: Option<String>,
    pub opponent_identity: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub outcome: Outcome,
}

pub fn longest_game(games: &[GameRecord], username: &str) -> Option<LongestGame> {
    let mut best: Option<(u32, &GameRecord, Side)> = None;
    for game in games {
        let Some(side) = resolve_user_role(game, username) else {
            continue;
        };
        let Some(turns) = game.turn_count else {
            continue;
        };
        if best.is_none_or(|(b, _, _)| turns > b) {
            best = Some((turns, game, side));
        }
    }
    best.map(|(turns, game, side)| LongestGame {
        turn_count: turns,
        side,
        identity: game.snapshot(side).identity.clone(),
        opponent: game.opponent_snapshot(side).username.clone(),
        opponent_identity: game.opponent_snapshot(side).identity.clone(),
        completed_at: game.completed_at,
        outcome: game.outcome_for(side),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongestDurationGame {
    pub elapsed_minutes: f64,
    pub side: Side,
    pub identity: Option<String>,
    pub opponent: Option<String>,
    pub opponent_identity: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub outcome: Outcome,
}

pub fn longest_duration_game(games: &[GameRecord], username: &str) -> Option<LongestDurationGame> {
    let mut best: Option<(f64, &GameRecord, Side)> = None;
    for game in games {
        let Some(side) = resolve_user_role(game, username) else {
            continue;
        };
        let Some(minutes) = game.elapsed_minutes.filter(|m| *m > 0.0) else {
            continue;
        };
        if best.is_none_or(|(b, _, _)| minutes > b) {
            best = Some((minutes, game, side));
        }
    }
    best.map(|(minutes, game, side)| LongestDurationGame {
        elapsed_minutes: minutes,
        side,
        identity: game.snapshot(side).identity.clone(),
        opponent: game.opponent_snapshot(side).username.clone(),
        opponent_identity: game.opponent_snapshot(side).identity.clone(),
        completed_at: game.completed_at,
        outcome: game.outcome_for(side),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoleSnapshot;

    fn seat(name: &str, identity: Option<&str>) -> RoleSnapshot {
        RoleSnapshot {
            username: Some(name.to_string()),
            identity: identity.map(str::to_string),
            email_hash: None,
        }
    }

    fn decided(
        me_side: Side,
        identity: &str,
        opponent: &str,
        won: bool,
    ) -> GameRecord {
        let winner = if won { me_side } else { me_side.opponent() };
        let (corp, runner) = match me_side {
            Side::Corp => (seat("me", Some(identity)), seat(opponent, None)),
            Side::Runner => (seat(opponent, None), seat("me", Some(identity))),
        };
        GameRecord {
            winner: Some(winner),
            corp,
            runner,
            ..GameRecord::default()
        }
    }

    #[test]
    fn role_record_counts_decided_games_only() {
        let mut undecided = decided(Side::Corp, "ETF", "bob", true);
        undecided.winner = None;
        let games = vec![
            decided(Side::Corp, "ETF", "bob", true),
            decided(Side::Corp, "ETF", "carol", false),
            decided(Side::Runner, "Kate", "bob", true),
            undecided,
        ];
        let corp = role_record(&games, "me", Side::Corp).unwrap();
        assert_eq!((corp.wins, corp.losses, corp.total), (1, 1, 2));
        assert_eq!(corp.wins + corp.losses, corp.total);
        let runner = role_record(&games, "me", Side::Runner).unwrap();
        assert_eq!((runner.wins, runner.losses, runner.total), (1, 0, 1));
    }

    #[test]
    fn role_record_is_none_without_qualifying_games() {
        assert!(role_record(&[], "me", Side::Corp).is_none());
        let only_runner = vec![decided(Side::Runner, "Kate", "bob", true)];
        assert!(role_record(&only_runner, "me", Side::Corp).is_none());
    }

    #[test]
    fn favorite_identity_breaks_game_ties_by_wins() {
        let games = vec![
            decided(Side::Corp, "ETF", "bob", false),
            decided(Side::Corp, "ETF", "bob", false),
            decided(Side::Corp, "PE", "bob", true),
            decided(Side::Corp, "PE", "bob", false),
        ];
        let favorite = favorite_identity(&games, "me", Side::Corp).unwrap();
        assert_eq!(favorite.identity, "PE");
        assert_eq!(favorite.games, 2);
        assert_eq!(favorite.wins, 1);
    }

    #[test]
    fn opponents_are_ranked_by_games_with_first_seen_hash() {
        let mut first = decided(Side::Corp, "ETF", "bob", true);
        first.runner.email_hash = Some("bob-hash".to_string());
        let games = vec![
            first,
            decided(Side::Runner, "Kate", "bob", false),
            decided(Side::Corp, "ETF", "carol", true),
        ];
        let frequent = most_frequent_opponent(&games, "me").unwrap();
        assert_eq!(frequent.username, "bob");
        assert_eq!(frequent.games, 2);
        assert_eq!(frequent.wins, 1);
        assert_eq!(frequent.losses, 1);
        assert_eq!(frequent.email_hash.as_deref(), Some("bob-hash"));

        let top = top_opponents(&games, "me", 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].username, "bob");
        assert_eq!(top[1].username, "carol");
        assert!(top_opponents(&games, "me", 1).len() == 1);
    }

    #[test]
    fn longest_game_needs_turns_and_duration_needs_minutes() {
        // Turn count present, no duration: eligible for the turn-based
        // search only.
        let mut marathon = decided(Side::Runner, "Kate", "bob", true);
        marathon.turn_count = Some(40);
        let mut quick = decided(Side::Corp, "ETF", "carol", true);
        quick.turn_count = Some(8);
        quick.elapsed_minutes = Some(22.0);
        let games = vec![marathon, quick];

        let by_turns = longest_game(&games, "me").unwrap();
        assert_eq!(by_turns.turn_count, 40);
        assert_eq!(by_turns.side, Side::Runner);
        assert_eq!(by_turns.outcome, Outcome::Win);

        let by_minutes = longest_duration_game(&games, "me").unwrap();
        assert_eq!(by_minutes.elapsed_minutes, 22.0);
        assert_eq!(by_minutes.side, Side::Corp);
    }

    #[test]
    fn zero_duration_is_not_a_longest_duration_candidate() {
        let mut game = decided(Side::Corp, "ETF", "bob", true);
        game.elapsed_minutes = Some(0.0);
        assert!(longest_duration_game(&[game], "me").is_none());
    }
}
