//! Axum router construction.
//!
//! Assembles the health check and the versioned REST API into a single
//! [`Router`], with request tracing and a CORS policy taken from
//! [`Settings`].

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, put};
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{health, matches, predictions, statistics, teams};
use crate::settings::Settings;
use crate::state::AppState;

/// Prefix every resource route is mounted under.
pub const API_PREFIX: &str = "/api/v1";

/// Build the complete router for the API server.
///
/// The router includes:
/// - `GET /health` -- liveness with service name and version
/// - `/api/v1/teams`, `/api/v1/matches`, `/api/v1/predictions`,
///   `/api/v1/statistics` -- resource routes, see [`crate::handlers`]
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.settings);

    Router::new()
        .route("/health", get(health::health))
        .nest(API_PREFIX, api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Teams
        .route("/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/teams/{id}",
            get(teams::get_team)
                .patch(teams::update_team)
                .delete(teams::delete_team),
        )
        .route("/teams/{id}/matches", get(teams::list_team_matches))
        // Matches
        .route(
            "/matches",
            get(matches::list_matches).post(matches::create_match),
        )
        .route(
            "/matches/{id}",
            get(matches::get_match)
                .patch(matches::update_match)
                .delete(matches::delete_match),
        )
        .route("/matches/{id}/status", put(matches::set_match_status))
        .route("/matches/{id}/result", put(matches::record_result))
        // Predictions
        .route(
            "/matches/{id}/predictions",
            get(predictions::list_match_predictions).post(predictions::create_prediction),
        )
        .route(
            "/predictions/{id}",
            get(predictions::get_prediction).delete(predictions::delete_prediction),
        )
        // Statistics
        .route(
            "/matches/{id}/statistics",
            get(statistics::list_match_statistics).post(statistics::create_statistic),
        )
        .route(
            "/statistics/{id}",
            get(statistics::get_statistic).delete(statistics::delete_statistic),
        )
}

/// Build the CORS policy from settings.
///
/// A `*` entry allows anything. Browsers refuse a literal `*` on a
/// credentialed response, so with credentials enabled a wildcard mirrors
/// the request's origin, method, or headers instead. Entries that are not
/// valid header values are skipped with a warning.
pub fn cors_layer(settings: &Settings) -> CorsLayer {
    let credentials = settings.cors_allow_credentials;

    let origins = if is_wildcard(&settings.cors_origins) {
        if credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    } else {
        AllowOrigin::list(parse_all(&settings.cors_origins, "origin", |o| {
            HeaderValue::from_str(o).ok()
        }))
    };

    let methods = if is_wildcard(&settings.cors_allow_methods) {
        if credentials {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::any()
        }
    } else {
        AllowMethods::list(parse_all(&settings.cors_allow_methods, "method", |m| {
            Method::from_bytes(m.to_ascii_uppercase().as_bytes()).ok()
        }))
    };

    let headers = if is_wildcard(&settings.cors_allow_headers) {
        if credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::any()
        }
    } else {
        AllowHeaders::list(parse_all(&settings.cors_allow_headers, "header", |h| {
            HeaderName::from_bytes(h.as_bytes()).ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials)
}

fn is_wildcard(entries: &[String]) -> bool {
    entries.iter().any(|e| e.trim() == "*")
}

fn parse_all<T>(entries: &[String], kind: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    entries
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .filter_map(|e| {
            let parsed = parse(e);
            if parsed.is_none() {
                tracing::warn!(kind, value = e, "Ignoring invalid CORS entry");
            }
            parsed
        })
        .collect()
}
