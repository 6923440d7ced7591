use std::collections::HashMap;

use serde::Serialize;

use crate::model::{GameRecord, Side};

/// The tracked player, inferred from the dump itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub email_hash: Option<String>,
    pub total_games: usize,
    pub corp_games: usize,
    pub runner_games: usize,
    pub matched_games: usize,
    pub unmatched_games: usize,
    /// matched_games / total_games.
    pub coverage: f64,
}

/// A user played a seat only if their name is on it AND the opposing
/// seat is occupied; bye/placeholder games resolve to `None`.
pub fn resolve_user_role(game: &GameRecord, username: &str) -> Option<Side> {
    match (game.corp.username.as_deref(), game.runner.username.as_deref()) {
        (Some(corp), Some(_)) if corp == username => Some(Side::Corp),
        (Some(_), Some(runner)) if runner == username => Some(Side::Runner),
        _ => None,
    }
}

/// Pick the username with the most seat appearances across the whole
/// dump (one count per seat per game), ties broken by first encounter.
pub fn detect_profile(games: &[GameRecord]) -> Option<UserProfile> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for game in games {
        for side in [Side::Corp, Side::Runner] {
            let Some(name) = game.snapshot(side).username.as_deref() else {
                continue;
            };
            if !counts.contains_key(name) {
                order.push(name);
            }
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for &name in &order {
        let count = counts[name];
        if best.is_none_or(|(_, b)| count > b) {
            best = Some((name, count));
        }
    }
    let (username, _) = best?;

    let mut email_hash: Option<String> = None;
    let mut corp_games = 0usize;
    let mut runner_games = 0usize;
    let mut matched_games = 0usize;
    for game in games {
        let on_corp = game.corp.username.as_deref() == Some(username);
        let on_runner = game.runner.username.as_deref() == Some(username);
        if on_corp || on_runner {
            matched_games += 1;
        }
        if email_hash.is_none() && on_corp {
            email_hash = game.corp.email_hash.clone();
        }
        if email_hash.is_none() && on_runner {
            email_hash = game.runner.email_hash.clone();
        }
        match resolve_user_role(game, username) {
            Some(Side::Corp) => corp_games += 1,
            Some(Side::Runner) => runner_games += 1,
            None => {}
        }
    }

    let total_games = games.len();
    Some(UserProfile {
        username: username.to_string(),
        email_hash,
        total_games,
        corp_games,
        runner_games,
        matched_games,
        unmatched_games: total_games - matched_games,
        coverage: matched_games as f64 / total_games as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoleSnapshot;

    fn seat(name: Option<&str>) -> RoleSnapshot {
        RoleSnapshot {
            username: name.map(str::to_string),
            ..RoleSnapshot::default()
        }
    }

    fn game(corp: Option<&str>, runner: Option<&str>) -> GameRecord {
        GameRecord {
            corp: seat(corp),
            runner: seat(runner),
            ..GameRecord::default()
        }
    }

    #[test]
    fn resolve_requires_both_seats_occupied() {
        let bye = game(Some("alice"), None);
        assert_eq!(resolve_user_role(&bye, "alice"), None);
        let bye = game(None, Some("alice"));
        assert_eq!(resolve_user_role(&bye, "alice"), None);

        let full = game(Some("alice"), Some("bob"));
        assert_eq!(resolve_user_role(&full, "alice"), Some(Side::Corp));
        assert_eq!(resolve_user_role(&full, "bob"), Some(Side::Runner));
        assert_eq!(resolve_user_role(&full, "carol"), None);
    }

    #[test]
    fn detect_picks_most_frequent_username() {
        let games = vec![
            game(Some("alice"), Some("bob")),
            game(Some("carol"), Some("alice")),
            game(Some("alice"), Some("dave")),
        ];
        let profile = detect_profile(&games).unwrap();
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.total_games, 3);
        assert_eq!(profile.matched_games, 3);
        assert_eq!(profile.corp_games, 2);
        assert_eq!(profile.runner_games, 1);
        assert!((profile.coverage - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn detect_breaks_ties_by_first_encounter() {
        let games = vec![
            game(Some("bob"), Some("alice")),
            game(Some("alice"), Some("bob")),
        ];
        let profile = detect_profile(&games).unwrap();
        assert_eq!(profile.username, "bob");
    }

    #[test]
    fn detect_counts_both_seats_of_a_mirror_game() {
        let games = vec![
            game(Some("alice"), Some("alice")),
            game(Some("bob"), Some("carol")),
            game(Some("bob"), Some("carol")),
        ];
        // alice: 2 seat appearances in one game; bob: 2 across two games.
        // alice is encountered first, so the tie goes to her.
        let profile = detect_profile(&games).unwrap();
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.matched_games, 1);
        assert_eq!(profile.unmatched_games, 2);
    }

    #[test]
    fn detect_returns_none_for_empty_history() {
        assert!(detect_profile(&[]).is_none());
    }

    #[test]
    fn detect_keeps_first_email_hash() {
        let mut g1 = game(Some("alice"), Some("bob"));
        g1.corp.email_hash = None;
        let mut g2 = game(Some("alice"), Some("bob"));
        g2.corp.email_hash = Some("hash-2".to_string());
        let mut g3 = game(Some("alice"), Some("bob"));
        g3.corp.email_hash = Some("hash-3".to_string());
        let profile = detect_profile(&[g1, g2, g3]).unwrap();
        assert_eq!(profile.email_hash.as_deref(), Some("hash-2"));
    }
}
