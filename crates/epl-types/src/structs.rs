//! Persisted entity structs: teams, matches, predictions, and statistics.
//!
//! These mirror the four tables created by `epl-db`. Identity is the
//! synthetic database id, so equality compares ids only: two reads of the
//! same row compare equal even if a mutation happened in between.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use crate::enums::{MatchOutcome, MatchStatus};
use crate::ids::{MatchId, PredictionId, StatisticId, TeamId};

/// Implements id-based equality for an entity struct.
macro_rules! eq_by_id {
    ($name:ident) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $name {}
    };
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// A Premier League club.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Team {
    /// Database identity.
    pub id: TeamId,
    /// Full club name, e.g. `Arsenal`. Unique.
    pub name: String,
    /// Short display name. Unique.
    pub short_name: String,
    /// Three-letter code, e.g. `ARS`. Unique.
    pub code: String,
    /// Year the club was founded.
    pub founded_year: Option<i32>,
    /// Home ground.
    pub stadium: Option<String>,
    /// Current manager.
    pub manager: Option<String>,
    /// Crest image URL.
    pub logo_url: Option<String>,
    /// Row creation time. Never changes after insert.
    pub created_at: DateTime<Utc>,
    /// Time of the last mutation.
    pub updated_at: DateTime<Utc>,
}

eq_by_id!(Team);

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A fixture between two teams.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Match {
    /// Database identity.
    pub id: MatchId,
    /// Home side.
    pub home_team_id: TeamId,
    /// Away side.
    pub away_team_id: TeamId,
    /// Scheduled kick-off.
    pub kickoff_time: DateTime<Utc>,
    /// Starting year of the season (2024 for 2024-25).
    pub season: i32,
    /// Gameweek within the season.
    pub gameweek: i32,
    /// Lifecycle state.
    pub status: MatchStatus,
    /// Home goals, present once completed.
    pub home_score: Option<i32>,
    /// Away goals, present once completed.
    pub away_score: Option<i32>,
    /// Full-time result, present once completed.
    pub result: Option<MatchOutcome>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Row creation time. Never changes after insert.
    pub created_at: DateTime<Utc>,
    /// Time of the last mutation.
    pub updated_at: DateTime<Utc>,
}

eq_by_id!(Match);

impl Match {
    /// The final score as `(home, away)` if both sides are recorded.
    pub const fn score(&self) -> Option<(i32, i32)> {
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }

    /// Whether `team` plays in this match on either side.
    pub fn involves(&self, team: TeamId) -> bool {
        self.home_team_id == team || self.away_team_id == team
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// A stored prediction for a match outcome.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Prediction {
    /// Database identity.
    pub id: PredictionId,
    /// The match being predicted.
    pub match_id: MatchId,
    /// Predicted full-time outcome.
    pub predicted_outcome: MatchOutcome,
    /// Confidence in the outcome, 0.0 to 1.0.
    pub confidence: f64,
    /// Predicted home goals.
    pub predicted_home_score: Option<i32>,
    /// Predicted away goals.
    pub predicted_away_score: Option<i32>,
    /// Label of whatever produced the prediction, e.g. `v2.1`.
    pub model_version: Option<String>,
    /// Whether the outcome matched the result. Unset until the result is known.
    pub is_correct: Option<bool>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Row creation time. Never changes after insert.
    pub created_at: DateTime<Utc>,
    /// Time of the last mutation.
    pub updated_at: DateTime<Utc>,
}

eq_by_id!(Prediction);

// ---------------------------------------------------------------------------
// MatchStatistic
// ---------------------------------------------------------------------------

/// One side's numbers for a match. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct StatLine {
    /// Ball possession percentage.
    #[validate(range(min = 0.0, max = 100.0))]
    pub possession: Option<f64>,
    /// Total shots.
    #[validate(range(min = 0))]
    pub shots: Option<i32>,
    /// Shots on target.
    #[validate(range(min = 0))]
    pub shots_on_target: Option<i32>,
    /// Corner kicks.
    #[validate(range(min = 0))]
    pub corners: Option<i32>,
    /// Fouls committed.
    #[validate(range(min = 0))]
    pub fouls: Option<i32>,
    /// Yellow cards.
    #[validate(range(min = 0))]
    pub yellow_cards: Option<i32>,
    /// Red cards.
    #[validate(range(min = 0))]
    pub red_cards: Option<i32>,
    /// Completed and attempted passes.
    #[validate(range(min = 0))]
    pub passes: Option<i32>,
    /// Pass completion percentage.
    #[validate(range(min = 0.0, max = 100.0))]
    pub pass_accuracy: Option<f64>,
    /// Tackles.
    #[validate(range(min = 0))]
    pub tackles: Option<i32>,
    /// Interceptions.
    #[validate(range(min = 0))]
    pub interceptions: Option<i32>,
}

/// Detailed statistics recorded for a match.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MatchStatistic {
    /// Database identity.
    pub id: StatisticId,
    /// The match these numbers belong to.
    pub match_id: MatchId,
    /// Home side.
    pub home: StatLine,
    /// Away side.
    pub away: StatLine,
    /// Shots by both sides.
    pub total_shots: Option<i32>,
    /// Shots on target by both sides.
    pub total_shots_on_target: Option<i32>,
    /// Home expected goals (xG).
    pub expected_goals_home: Option<f64>,
    /// Away expected goals (xG).
    pub expected_goals_away: Option<f64>,
    /// Row creation time. Never changes after insert.
    pub created_at: DateTime<Utc>,
    /// Time of the last mutation.
    pub updated_at: DateTime<Utc>,
}

eq_by_id!(MatchStatistic);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match(home: Option<i32>, away: Option<i32>) -> Match {
        let now = Utc::now();
        Match {
            id: MatchId(1),
            home_team_id: TeamId(10),
            away_team_id: TeamId(20),
            kickoff_time: now,
            season: 2024,
            gameweek: 1,
            status: MatchStatus::Scheduled,
            home_score: home,
            away_score: away,
            result: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn score_requires_both_sides() {
        assert_eq!(sample_match(Some(2), Some(0)).score(), Some((2, 0)));
        assert_eq!(sample_match(Some(2), None).score(), None);
        assert_eq!(sample_match(None, None).score(), None);
    }

    #[test]
    fn involves_checks_both_sides() {
        let m = sample_match(None, None);
        assert!(m.involves(TeamId(10)));
        assert!(m.involves(TeamId(20)));
        assert!(!m.involves(TeamId(30)));
    }

    #[test]
    fn equality_is_by_id() {
        let a = sample_match(None, None);
        let mut b = a.clone();
        b.notes = Some(String::from("rescheduled"));
        b.gameweek = 5;
        assert_eq!(a, b);

        b.id = MatchId(2);
        assert_ne!(a, b);
    }

    #[test]
    fn stat_line_rejects_out_of_range_percentages() {
        let ok = StatLine {
            possession: Some(55.5),
            pass_accuracy: Some(88.0),
            ..StatLine::default()
        };
        assert!(ok.validate().is_ok());

        let bad = StatLine {
            possession: Some(120.0),
            ..StatLine::default()
        };
        assert!(bad.validate().is_err());

        let negative = StatLine {
            shots: Some(-1),
            ..StatLine::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn stat_line_deserializes_partial_objects() {
        let line: Result<StatLine, _> = serde_json::from_str(r#"{"shots": 12}"#);
        let line = line.ok();
        assert_eq!(line.as_ref().and_then(|l| l.shots), Some(12));
        assert_eq!(line.and_then(|l| l.possession), None);
    }
}
