//! Create and update payloads.
//!
//! Each payload derives [`Validate`] with the column limits of the schema
//! plus the documented value ranges (confidence 0.0 to 1.0, percentages 0 to
//! 100). The stores in `epl-db` run validation before issuing any query, so
//! the database only sees well-formed rows.
//!
//! Update payloads use `None` for "leave unchanged". Nullable columns are
//! `Option<Option<T>>`: an absent field leaves the column alone, an explicit
//! `null` clears it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::enums::{MatchOutcome, MatchStatus};
use crate::ids::TeamId;
use crate::structs::StatLine;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// Payload for creating a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewTeam {
    /// Full club name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Short display name.
    #[validate(length(min = 1, max = 10))]
    pub short_name: String,
    /// Three-letter code.
    #[validate(length(equal = 3))]
    pub code: String,
    /// Year the club was founded.
    #[serde(default)]
    pub founded_year: Option<i32>,
    /// Home ground.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub stadium: Option<String>,
    /// Current manager.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub manager: Option<String>,
    /// Crest image location, absolute URL or server path.
    #[serde(default)]
    #[validate(length(max = 255))]
    pub logo_url: Option<String>,
}

impl NewTeam {
    /// Minimal payload with only the unique identifying columns set.
    pub fn new(name: &str, short_name: &str, code: &str) -> Self {
        Self {
            name: name.to_owned(),
            short_name: short_name.to_owned(),
            code: code.to_owned(),
            founded_year: None,
            stadium: None,
            manager: None,
            logo_url: None,
        }
    }
}

/// Partial update of a team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct TeamUpdate {
    /// New full name.
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// New short name.
    #[validate(length(min = 1, max = 10))]
    pub short_name: Option<String>,
    /// New three-letter code.
    #[validate(length(equal = 3))]
    pub code: Option<String>,
    /// New founding year, `Some(None)` to clear.
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<Option<i32>>,
    /// New stadium, `Some(None)` to clear.
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub stadium: Option<Option<String>>,
    /// New manager, `Some(None)` to clear.
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub manager: Option<Option<String>>,
    /// New crest location, `Some(None)` to clear.
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255))]
    pub logo_url: Option<Option<String>>,
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// Payload for creating a match.
///
/// A match cannot be created as `completed`: the final score goes through
/// the result-recording path so `result` and the scores stay consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewMatch {
    /// Home side.
    pub home_team_id: TeamId,
    /// Away side.
    pub away_team_id: TeamId,
    /// Scheduled kick-off.
    pub kickoff_time: DateTime<Utc>,
    /// Starting year of the season.
    pub season: i32,
    /// Gameweek within the season.
    pub gameweek: i32,
    /// Initial status, `scheduled` unless given.
    #[serde(default)]
    #[validate(custom(function = "validate_initial_status"))]
    pub status: MatchStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of a match's fixture details.
///
/// Status and score changes have dedicated operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct MatchUpdate {
    /// New kick-off time.
    pub kickoff_time: Option<DateTime<Utc>>,
    /// New season.
    pub season: Option<i32>,
    /// New gameweek.
    pub gameweek: Option<i32>,
    /// New notes, `Some(None)` to clear.
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

/// Present fields become `Some`, so an explicit `null` is `Some(None)`.
/// Absent fields fall back to the struct's `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A final score submitted for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FinalScore {
    /// Home goals.
    #[validate(range(min = 0))]
    pub home_score: i32,
    /// Away goals.
    #[validate(range(min = 0))]
    pub away_score: i32,
}

impl FinalScore {
    /// The outcome this score produces.
    pub const fn outcome(self) -> MatchOutcome {
        MatchOutcome::from_score(self.home_score, self.away_score)
    }
}

fn validate_initial_status(status: &MatchStatus) -> Result<(), ValidationError> {
    if status.is_terminal() {
        let mut err = ValidationError::new("initial_status");
        err.message = Some("a match cannot be created as completed".into());
        return Err(err);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Predictions
// ---------------------------------------------------------------------------

/// Payload for creating a prediction. The match comes from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewPrediction {
    /// Predicted outcome.
    pub predicted_outcome: MatchOutcome,
    /// Confidence, 0.0 to 1.0.
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
    /// Predicted home goals.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub predicted_home_score: Option<i32>,
    /// Predicted away goals.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub predicted_away_score: Option<i32>,
    /// Label of the producer, e.g. `v1.0`.
    #[serde(default)]
    #[validate(length(max = 50))]
    pub model_version: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Payload for recording match statistics. The match comes from the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct NewMatchStatistic {
    /// Home side.
    #[validate(nested)]
    pub home: StatLine,
    /// Away side.
    #[validate(nested)]
    pub away: StatLine,
    /// Shots by both sides.
    #[validate(range(min = 0))]
    pub total_shots: Option<i32>,
    /// Shots on target by both sides.
    #[validate(range(min = 0))]
    pub total_shots_on_target: Option<i32>,
    /// Home expected goals.
    #[validate(range(min = 0.0))]
    pub expected_goals_home: Option<f64>,
    /// Away expected goals.
    #[validate(range(min = 0.0))]
    pub expected_goals_away: Option<f64>,
}

impl NewMatchStatistic {
    /// Fill in the combined shot totals from the per-side numbers.
    ///
    /// Totals already present are kept as given. A total is only derived
    /// when both sides report the underlying number.
    #[must_use]
    pub fn with_derived_totals(mut self) -> Self {
        if self.total_shots.is_none() {
            self.total_shots = sum_sides(self.home.shots, self.away.shots);
        }
        if self.total_shots_on_target.is_none() {
            self.total_shots_on_target =
                sum_sides(self.home.shots_on_target, self.away.shots_on_target);
        }
        self
    }
}

fn sum_sides(home: Option<i32>, away: Option<i32>) -> Option<i32> {
    home.zip(away).and_then(|(h, a)| h.checked_add(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_code_must_be_three_chars() {
        assert!(NewTeam::new("Arsenal", "ARS", "ARS").validate().is_ok());

        let long = NewTeam::new("Arsenal", "ARS", "ARSE");
        let errors = long.validate().err();
        assert!(errors.is_some_and(|e| e.field_errors().contains_key("code")));

        assert!(NewTeam::new("Arsenal", "ARS", "AR").validate().is_err());
    }

    #[test]
    fn team_name_cannot_be_empty() {
        assert!(NewTeam::new("", "ARS", "ARS").validate().is_err());
    }

    #[test]
    fn team_logo_accepts_paths_up_to_column_length() {
        let mut team = NewTeam::new("Chelsea", "CHE", "CHE");
        team.logo_url = Some(String::from("/static/logos/che.png"));
        assert!(team.validate().is_ok());

        team.logo_url = Some(String::from("https://example.com/che.png"));
        assert!(team.validate().is_ok());

        team.logo_url = Some("x".repeat(256));
        assert!(team.validate().is_err());
    }

    #[test]
    fn team_update_validates_only_present_fields() {
        assert!(TeamUpdate::default().validate().is_ok());

        let update = TeamUpdate {
            code: Some(String::from("TOOLONG")),
            ..TeamUpdate::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn update_tells_null_from_absent() {
        let parsed: Result<TeamUpdate, _> =
            serde_json::from_str(r#"{"stadium": null, "manager": "Arteta"}"#);
        let update = parsed.ok();
        assert_eq!(update.as_ref().and_then(|u| u.stadium.clone()), Some(None));
        assert_eq!(
            update.as_ref().and_then(|u| u.manager.clone()),
            Some(Some(String::from("Arteta")))
        );
        assert_eq!(update.as_ref().map(|u| u.logo_url.is_none()), Some(true));

        let parsed: Result<MatchUpdate, _> = serde_json::from_str(r#"{"notes": null}"#);
        assert_eq!(parsed.ok().map(|u| u.notes), Some(Some(None)));

        let parsed: Result<MatchUpdate, _> = serde_json::from_str("{}");
        assert_eq!(parsed.ok().map(|u| u.notes), Some(None));
    }

    #[test]
    fn cleared_fields_pass_validation() {
        let update = TeamUpdate {
            stadium: Some(None),
            logo_url: Some(Some("x".repeat(256))),
            ..TeamUpdate::default()
        };
        let errors = update.validate().err();
        assert!(errors.is_some_and(|e| {
            e.field_errors().contains_key("logo_url") && !e.field_errors().contains_key("stadium")
        }));
    }

    #[test]
    fn new_match_defaults_to_scheduled() {
        let json = r#"{
            "home_team_id": 1,
            "away_team_id": 2,
            "kickoff_time": "2024-08-17T14:00:00Z",
            "season": 2024,
            "gameweek": 1
        }"#;
        let parsed: Result<NewMatch, _> = serde_json::from_str(json);
        let parsed = parsed.ok();
        assert_eq!(parsed.as_ref().map(|m| m.status), Some(MatchStatus::Scheduled));
        assert!(parsed.is_some_and(|m| m.validate().is_ok()));
    }

    #[test]
    fn new_match_cannot_start_completed() {
        let new = NewMatch {
            home_team_id: TeamId(1),
            away_team_id: TeamId(2),
            kickoff_time: Utc::now(),
            season: 2024,
            gameweek: 1,
            status: MatchStatus::Completed,
            notes: None,
        };
        let errors = new.validate().err();
        assert!(errors.is_some_and(|e| e.field_errors().contains_key("status")));
    }

    #[test]
    fn new_match_takes_any_season_and_gameweek() {
        let mut new = NewMatch {
            home_team_id: TeamId(1),
            away_team_id: TeamId(2),
            kickoff_time: Utc::now(),
            season: 2024,
            gameweek: 39,
            status: MatchStatus::Scheduled,
            notes: None,
        };
        assert!(new.validate().is_ok());
        new.season = 1871;
        new.gameweek = 0;
        assert!(new.validate().is_ok());
    }

    #[test]
    fn prediction_confidence_bounds() {
        let mut prediction = NewPrediction {
            predicted_outcome: MatchOutcome::HomeWin,
            confidence: 0.65,
            predicted_home_score: Some(2),
            predicted_away_score: Some(1),
            model_version: Some(String::from("v1.0")),
            notes: None,
        };
        assert!(prediction.validate().is_ok());

        prediction.confidence = 1.5;
        assert!(prediction.validate().is_err());

        prediction.confidence = -0.1;
        assert!(prediction.validate().is_err());
    }

    #[test]
    fn final_score_outcome() {
        let score = FinalScore {
            home_score: 1,
            away_score: 1,
        };
        assert_eq!(score.outcome(), MatchOutcome::Draw);
        assert!(
            FinalScore {
                home_score: -1,
                away_score: 0
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn derived_totals_fill_only_missing_values() {
        let stats = NewMatchStatistic {
            home: StatLine {
                shots: Some(14),
                shots_on_target: Some(6),
                ..StatLine::default()
            },
            away: StatLine {
                shots: Some(9),
                ..StatLine::default()
            },
            total_shots_on_target: None,
            ..NewMatchStatistic::default()
        }
        .with_derived_totals();

        assert_eq!(stats.total_shots, Some(23));
        // Away shots on target unknown, so no total.
        assert_eq!(stats.total_shots_on_target, None);

        let given = NewMatchStatistic {
            total_shots: Some(30),
            home: StatLine {
                shots: Some(1),
                ..StatLine::default()
            },
            away: StatLine {
                shots: Some(1),
                ..StatLine::default()
            },
            ..NewMatchStatistic::default()
        }
        .with_derived_totals();
        assert_eq!(given.total_shots, Some(30));
    }

    #[test]
    fn nested_stat_lines_are_validated() {
        let stats = NewMatchStatistic {
            away: StatLine {
                pass_accuracy: Some(101.0),
                ..StatLine::default()
            },
            ..NewMatchStatistic::default()
        };
        assert!(stats.validate().is_err());
    }
}
