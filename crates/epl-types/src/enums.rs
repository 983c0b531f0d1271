//! Enumeration types for match state and outcomes.
//!
//! Both enums are stored as short text labels in `PostgreSQL`. The wire and
//! column representation is the label returned by `as_str`, which is also
//! what [`core::str::FromStr`] accepts.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Error returned when a stored or submitted label is not a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} label: {value:?}")]
pub struct ParseEnumError {
    /// Which enumeration failed to parse.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

// ---------------------------------------------------------------------------
// MatchOutcome
// ---------------------------------------------------------------------------

/// Full-time outcome of a match, from the home side's perspective.
///
/// Used both for the recorded `matches.result` and for
/// `predictions.predicted_outcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum MatchOutcome {
    /// Home win.
    #[serde(rename = "H")]
    HomeWin,
    /// Draw.
    #[serde(rename = "D")]
    Draw,
    /// Away win.
    #[serde(rename = "A")]
    AwayWin,
}

impl MatchOutcome {
    /// Derive the outcome from a final score.
    pub const fn from_score(home_score: i32, away_score: i32) -> Self {
        if home_score > away_score {
            Self::HomeWin
        } else if home_score < away_score {
            Self::AwayWin
        } else {
            Self::Draw
        }
    }

    /// The single-letter label stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HomeWin => "H",
            Self::Draw => "D",
            Self::AwayWin => "A",
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchOutcome {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "H" => Ok(Self::HomeWin),
            "D" => Ok(Self::Draw),
            "A" => Ok(Self::AwayWin),
            other => Err(ParseEnumError {
                kind: "match outcome",
                value: other.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// MatchStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a match.
///
/// Legal transitions:
///
/// ```text
/// scheduled --> ongoing --> completed
///     |                        ^
///     +------------------------+
/// ```
///
/// `completed` is terminal. Moving into `completed` happens only when a
/// final score is recorded, so the result columns are never left empty on a
/// completed match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum MatchStatus {
    /// Fixture announced, not yet kicked off.
    #[default]
    Scheduled,
    /// In play.
    Ongoing,
    /// Full time, score and result recorded.
    Completed,
}

impl MatchStatus {
    /// The label stored in the database.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }

    /// Whether a match in this state may move to `next`.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::Ongoing | Self::Completed) | (Self::Ongoing, Self::Completed)
        )
    }

    /// Whether no further transitions are possible.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            other => Err(ParseEnumError {
                kind: "match status",
                value: other.to_owned(),
            }),
        }
    }
}
