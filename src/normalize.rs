use serde_json::Value;

use crate::coerce::{opt_count, opt_datetime, opt_f64, opt_str, path};
use crate::model::{CorpStats, GameRecord, RoleSnapshot, RunnerStats, Side};

/// Map one raw export entry onto the canonical record. Every field access
/// is defensive: a missing or mistyped path becomes absent, never an
/// error. The raw key layout is the client's observed export convention;
/// it lives only in this file.
pub fn normalize_game(raw: &Value) -> GameRecord {
    // Prefer the explicit end timestamp, then fall back through the
    // start and creation timestamps.
    let completed_at = opt_datetime(raw.get("end-date"))
        .or_else(|| opt_datetime(raw.get("start-date")))
        .or_else(|| opt_datetime(raw.get("creation-date")));

    GameRecord {
        winner: parse_winner(raw.get("winner")),
        corp: parse_snapshot(raw.get("corp")),
        runner: parse_snapshot(raw.get("runner")),
        started_at: opt_datetime(raw.get("start-date")),
        completed_at,
        elapsed_minutes: opt_f64(path(raw, &["stats", "time", "elapsed"])).map(|m| m.max(0.0)),
        format: opt_str(raw.get("format")).map(|s| s.to_lowercase()),
        turn_count: opt_count(raw.get("turn")),
        corp_stats: parse_corp_stats(path(raw, &["stats", "corp"])),
        runner_stats: parse_runner_stats(path(raw, &["stats", "runner"])),
        runner_unique_accesses: parse_unique_accesses(path(
            raw,
            &["stats", "runner", "access", "unique-cards"],
        )),
        reason: opt_str(raw.get("reason")),
    }
}

fn parse_winner(v: Option<&Value>) -> Option<Side> {
    let s = opt_str(v)?;
    if s.eq_ignore_ascii_case("corp") {
        Some(Side::Corp)
    } else if s.eq_ignore_ascii_case("runner") {
        Some(Side::Runner)
    } else {
        None
    }
}

fn parse_snapshot(v: Option<&Value>) -> RoleSnapshot {
    let Some(v) = v else {
        return RoleSnapshot::default();
    };
    RoleSnapshot {
        username: opt_str(path(v, &["player", "username"])),
        // Older exports keep the identity on the player object.
        identity: opt_str(v.get("identity"))
            .or_else(|| opt_str(path(v, &["player", "identity"]))),
        email_hash: opt_str(path(v, &["player", "emailhash"])),
    }
}

fn parse_corp_stats(v: Option<&Value>) -> CorpStats {
    CorpStats {
        clicks_gained: stat(v, &["gain", "click"]),
        credits_gained: stat(v, &["gain", "credit"]),
        credits_spent: stat(v, &["spent", "credit"]),
        credits_from_clicks: stat(v, &["click", "credit"]),
        cards_drawn: stat(v, &["gain", "card"]),
        cards_drawn_from_clicks: stat(v, &["click", "draw"]),
        shuffle_count: stat(v, &["shuffle-count"]),
        cards_played: stat(v, &["cards-played"]),
        cards_rezzed: stat(v, &["cards-rezzed"]),
        cards_accessed: stat(v, &["access", "cards"]),
        damage_done: stat(v, &["damage", "all"]),
    }
}

fn parse_runner_stats(v: Option<&Value>) -> RunnerStats {
    RunnerStats {
        clicks_gained: stat(v, &["gain", "click"]),
        credits_gained: stat(v, &["gain", "credit"]),
        credits_spent: stat(v, &["spent", "credit"]),
        credits_from_clicks: stat(v, &["click", "credit"]),
        cards_drawn: stat(v, &["gain", "card"]),
        cards_drawn_from_clicks: stat(v, &["click", "draw"]),
        shuffle_count: stat(v, &["shuffle-count"]),
        cards_played: stat(v, &["cards-played"]),
        runs_started: stat(v, &["runs", "started"]),
        cards_accessed: stat(v, &["access", "cards"]),
        damage_done: stat(v, &["damage", "all"]),
        tags_gained: stat(v, &["tag", "gained"]),
    }
}

fn stat(v: Option<&Value>, keys: &[&str]) -> Option<f64> {
    opt_f64(v.and_then(|v| path(v, keys)))
}

/// Unique accesses arrive either as a literal count or as the list of
/// accessed cards.
fn parse_unique_accesses(v: Option<&Value>) -> Option<u32> {
    let v = v?;
    if let Some(list) = v.as_array() {
        return u32::try_from(list.len()).ok();
    }
    opt_count(Some(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_raw() -> Value {
        json!({
            "winner": "runner",
            "reason": "Agenda",
            "end-date": "2024-06-02T20:15:00Z",
            "start-date": "2024-06-02T19:45:00Z",
            "format": "Standard",
            "turn": "14",
            "corp": {
                "player": {"username": "weyland_exec", "emailhash": "abc123"},
                "identity": "Weyland: Built to Last"
            },
            "runner": {
                "player": {"username": "wildcat", "emailhash": "def456"},
                "identity": "Kit"
            },
            "stats": {
                "time": {"elapsed": 30},
                "corp": {
                    "gain": {"click": 42, "credit": 31, "card": 12},
                    "spent": {"credit": 28},
                    "click": {"credit": 6, "draw": 4},
                    "shuffle-count": 2,
                    "cards-played": 11,
                    "cards-rezzed": 7,
                    "access": {"cards": 0},
                    "damage": {"all": 3},
                    "runs": {"started": 99},
                    "tag": {"gained": 99}
                },
                "runner": {
                    "gain": {"click": 55, "credit": 40, "card": 18},
                    "spent": {"credit": 37},
                    "click": {"credit": 9, "draw": 6},
                    "shuffle-count": 3,
                    "cards-played": 15,
                    "cards-rezzed": 99,
                    "runs": {"started": 21},
                    "access": {"cards": 13, "unique-cards": ["a", "b", "c"]},
                    "damage": {"all": 0},
                    "tag": {"gained": 2}
                }
            }
        })
    }

    #[test]
    fn normalizes_a_full_record() {
        let game = normalize_game(&sample_raw());
        assert_eq!(game.winner, Some(Side::Runner));
        assert_eq!(game.corp.username.as_deref(), Some("weyland_exec"));
        assert_eq!(game.runner.identity.as_deref(), Some("Kit"));
        assert_eq!(game.format.as_deref(), Some("standard"));
        assert_eq!(game.turn_count, Some(14));
        assert_eq!(game.elapsed_minutes, Some(30.0));
        assert_eq!(game.corp_stats.cards_rezzed, Some(7.0));
        assert_eq!(game.runner_stats.runs_started, Some(21.0));
        assert_eq!(game.runner_stats.tags_gained, Some(2.0));
        assert_eq!(game.runner_unique_accesses, Some(3));
    }

    #[test]
    fn side_specific_fields_never_leak_across_seats() {
        // The raw corp subtree above carries bogus runs/tags and the
        // runner subtree a bogus rez count; neither struct has a field
        // for them, so they cannot surface.
        let game = normalize_game(&sample_raw());
        assert_eq!(game.corp_stats.cards_accessed, Some(0.0));
        assert_eq!(game.runner_stats.runs_started, Some(21.0));
        assert_eq!(game.corp_stats.clicks_gained, Some(42.0));
        assert_eq!(game.runner_stats.clicks_gained, Some(55.0));
    }

    #[test]
    fn empty_object_normalizes_to_all_absent() {
        let game = normalize_game(&json!({}));
        assert_eq!(game, GameRecord::default());
    }

    #[test]
    fn wrong_types_degrade_to_absent() {
        let game = normalize_game(&json!({
            "winner": "draw",
            "turn": -3,
            "end-date": "yesterday-ish",
            "corp": {"player": "not an object"},
            "stats": {"time": {"elapsed": "soon"}, "corp": [1, 2, 3]}
        }));
        assert_eq!(game.winner, None);
        assert_eq!(game.turn_count, None);
        assert_eq!(game.completed_at, None);
        assert_eq!(game.corp.username, None);
        assert_eq!(game.elapsed_minutes, None);
        assert_eq!(game.corp_stats, CorpStats::default());
    }

    #[test]
    fn negative_elapsed_clamps_to_zero() {
        let game = normalize_game(&json!({"stats": {"time": {"elapsed": -12}}}));
        assert_eq!(game.elapsed_minutes, Some(0.0));
    }

    #[test]
    fn completed_at_falls_back_through_start_and_creation() {
        let only_start = normalize_game(&json!({"start-date": "2024-01-05T10:00:00Z"}));
        assert!(only_start.completed_at.is_some());
        assert_eq!(only_start.completed_at, only_start.started_at);

        let only_creation = normalize_game(&json!({"creation-date": "2024-01-05T09:00:00Z"}));
        assert!(only_creation.completed_at.is_some());
        assert_eq!(only_creation.started_at, None);
    }

    #[test]
    fn unique_accesses_accepts_count_or_list() {
        let from_count = normalize_game(&json!({
            "stats": {"runner": {"access": {"unique-cards": 9}}}
        }));
        assert_eq!(from_count.runner_unique_accesses, Some(9));

        let from_list = normalize_game(&json!({
            "stats": {"runner": {"access": {"unique-cards": ["x", "y"]}}}
        }));
        assert_eq!(from_list.runner_unique_accesses, Some(2));
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = sample_raw();
        assert_eq!(normalize_game(&raw), normalize_game(&raw));
    }
}
