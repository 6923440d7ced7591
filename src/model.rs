use chrono::{DateTime, Utc};
use serde::Serialize;

/// The two asymmetric seats of a game. The defending side rezzes cards
/// and deals damage; the attacking side starts runs and takes tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Corp,
    Runner,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Corp => Side::Runner,
            Side::Runner => Side::Corp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Undecided,
}

/// One seat's participant info for one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoleSnapshot {
    pub username: Option<String>,
    pub identity: Option<String>,
    pub email_hash: Option<String>,
}

/// Per-game counters for the corp seat. Every field is independently
/// optional: absence means "not recorded", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CorpStats {
    pub clicks_gained: Option<f64>,
    pub credits_gained: Option<f64>,
    pub credits_spent: Option<f64>,
    pub credits_from_clicks: Option<f64>,
    pub cards_drawn: Option<f64>,
    pub cards_drawn_from_clicks: Option<f64>,
    pub shuffle_count: Option<f64>,
    pub cards_played: Option<f64>,
    pub cards_rezzed: Option<f64>,
    pub cards_accessed: Option<f64>,
    pub damage_done: Option<f64>,
}

/// Per-game counters for the runner seat. Shares the economy fields with
/// `CorpStats` but carries runs and tags instead of rezzes, so a metric
/// that is meaningless for a seat simply does not exist on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunnerStats {
    pub clicks_gained: Option<f64>,
    pub credits_gained: Option<f64>,
    pub credits_spent: Option<f64>,
    pub credits_from_clicks: Option<f64>,
    pub cards_drawn: Option<f64>,
    pub cards_drawn_from_clicks: Option<f64>,
    pub shuffle_count: Option<f64>,
    pub cards_played: Option<f64>,
    pub runs_started: Option<f64>,
    pub cards_accessed: Option<f64>,
    pub damage_done: Option<f64>,
    pub tags_gained: Option<f64>,
}

/// The canonical unit: one completed match, normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameRecord {
    pub winner: Option<Side>,
    pub corp: RoleSnapshot,
    pub runner: RoleSnapshot,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Clamped to >= 0 when present.
    pub elapsed_minutes: Option<f64>,
    pub format: Option<String>,
    pub turn_count: Option<u32>,
    pub corp_stats: CorpStats,
    pub runner_stats: RunnerStats,
    pub runner_unique_accesses: Option<u32>,
    pub reason: Option<String>,
}

impl GameRecord {
    pub fn snapshot(&self, side: Side) -> &RoleSnapshot {
        match side {
            Side::Corp => &self.corp,
            Side::Runner => &self.runner,
        }
    }

    pub fn opponent_snapshot(&self, side: Side) -> &RoleSnapshot {
        self.snapshot(side.opponent())
    }

    pub fn outcome_for(&self, side: Side) -> Outcome {
        match self.winner {
            Some(winner) if winner == side => Outcome::Win,
            Some(_) => Outcome::Loss,
            None => Outcome::Undecided,
        }
    }

    // Shared-economy accessors so side-generic analyses don't have to
    // match on the seat themselves.

    pub fn clicks_gained(&self, side: Side) -> Option<f64> {
        match side {
            Side::Corp => self.corp_stats.clicks_gained,
            Side::Runner => self.runner_stats.clicks_gained,
        }
    }

    pub fn credits_gained(&self, side: Side) -> Option<f64> {
        match side {
            Side::Corp => self.corp_stats.credits_gained,
            Side::Runner => self.runner_stats.credits_gained,
        }
    }

    pub fn credits_spent(&self, side: Side) -> Option<f64> {
        match side {
            Side::Corp => self.corp_stats.credits_spent,
            Side::Runner => self.runner_stats.credits_spent,
        }
    }

    pub fn credits_from_clicks(&self, side: Side) -> Option<f64> {
        match side {
            Side::Corp => self.corp_stats.credits_from_clicks,
            Side::Runner => self.runner_stats.credits_from_clicks,
        }
    }

    pub fn cards_drawn(&self, side: Side) -> Option<f64> {
        match side {
            Side::Corp => self.corp_stats.cards_drawn,
            Side::Runner => self.runner_stats.cards_drawn,
        }
    }

    pub fn cards_drawn_from_clicks(&self, side: Side) -> Option<f64> {
        match side {
            Side::Corp => self.corp_stats.cards_drawn_from_clicks,
            Side::Runner => self.runner_stats.cards_drawn_from_clicks,
        }
    }

    pub fn shuffle_count(&self, side: Side) -> Option<f64> {
        match side {
            Side::Corp => self.corp_stats.shuffle_count,
            Side::Runner => self.runner_stats.shuffle_count,
        }
    }

    pub fn cards_played(&self, side: Side) -> Option<f64> {
        match side {
            Side::Corp => self.corp_stats.cards_played,
            Side::Runner => self.runner_stats.cards_played,
        }
    }

    pub fn cards_accessed(&self, side: Side) -> Option<f64> {
        match side {
            Side::Corp => self.corp_stats.cards_accessed,
            Side::Runner => self.runner_stats.cards_accessed,
        }
    }

    pub fn damage_done(&self, side: Side) -> Option<f64> {
        match side {
            Side::Corp => self.corp_stats.damage_done,
            Side::Runner => self.runner_stats.damage_done,
        }
    }
}
