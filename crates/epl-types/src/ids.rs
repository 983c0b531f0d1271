//! Type-safe identifier wrappers around database identity columns.
//!
//! Every table uses a `BIGINT GENERATED ALWAYS AS IDENTITY` primary key, so
//! identifiers are assigned by `PostgreSQL` on insert and never minted
//! app-side. The newtypes prevent passing a [`TeamId`] where a [`MatchId`]
//! is expected.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around an `i64` identity with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(#[ts(type = "number")] pub i64);

        impl $name {
            /// Return the inner identity value.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a row in the `teams` table.
    TeamId
}

define_id! {
    /// Identifier of a row in the `matches` table.
    MatchId
}

define_id! {
    /// Identifier of a row in the `predictions` table.
    PredictionId
}

define_id! {
    /// Identifier of a row in the `match_statistics` table.
    StatisticId
}
