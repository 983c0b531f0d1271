//! Shared type definitions for the EPL predictions backend.
//!
//! This crate is the single source of truth for the entities persisted by
//! `epl-db` and served by `epl-api`. Types flow downstream to `TypeScript`
//! via `ts-rs` for frontend clients.
//!
//! # Modules
//!
//! - [`ids`] -- Typed wrappers for database identity columns
//! - [`enums`] -- Match status and outcome labels
//! - [`structs`] -- Persisted entities (teams, matches, predictions, statistics)
//! - [`inputs`] -- Validated create and update payloads

pub mod enums;
pub mod ids;
pub mod inputs;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{MatchOutcome, MatchStatus, ParseEnumError};
pub use ids::{MatchId, PredictionId, StatisticId, TeamId};
pub use inputs::{
    FinalScore, MatchUpdate, NewMatch, NewMatchStatistic, NewPrediction, NewTeam, TeamUpdate,
};
pub use structs::{Match, MatchStatistic, Prediction, StatLine, Team};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are exported. The files are written to the
        // `bindings/` directory relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::TeamId::export_all();
        let _ = crate::ids::MatchId::export_all();
        let _ = crate::ids::PredictionId::export_all();
        let _ = crate::ids::StatisticId::export_all();

        // Enums
        let _ = crate::enums::MatchOutcome::export_all();
        let _ = crate::enums::MatchStatus::export_all();

        // Entities
        let _ = crate::structs::Team::export_all();
        let _ = crate::structs::Match::export_all();
        let _ = crate::structs::Prediction::export_all();
        let _ = crate::structs::StatLine::export_all();
        let _ = crate::structs::MatchStatistic::export_all();

        // Payloads
        let _ = crate::inputs::NewTeam::export_all();
        let _ = crate::inputs::TeamUpdate::export_all();
        let _ = crate::inputs::NewMatch::export_all();
        let _ = crate::inputs::MatchUpdate::export_all();
        let _ = crate::inputs::FinalScore::export_all();
        let _ = crate::inputs::NewPrediction::export_all();
        let _ = crate::inputs::NewMatchStatistic::export_all();
    }
}
