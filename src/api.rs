use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::catalog::{CatalogHandle, MoodCatalog};
use crate::engine;
use crate::game::{Game, RecommendationContext};
use crate::history::{History, HistoryEntry};
use crate::recommendation::{Recommendation, RecommendationSet};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogHandle,
    pub history: Arc<History>,
}

impl AppState {
    pub fn new(catalog: MoodCatalog) -> Self {
        Self {
            catalog: CatalogHandle::new(catalog),
            history: Arc::new(History::with_capacity(2000)),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/moods", get(list_moods))
        .route("/recommend", post(recommend))
        .route("/score", post(score_one))
        .route("/debug/history", get(debug_history))
        .route("/debug/mood", get(debug_mood))
        .route("/admin/reload-catalog", get(admin_reload_catalog))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct RecommendReq {
    games: Vec<Game>,
    context: RecommendationContext,
}

#[derive(serde::Deserialize)]
struct ScoreReq {
    game: Game,
    context: RecommendationContext,
}

type ApiError = (StatusCode, String);

fn bad_request(e: anyhow::Error) -> ApiError {
    (StatusCode::BAD_REQUEST, e.to_string())
}

async fn recommend(
    State(state): State<AppState>,
    Json(body): Json<RecommendReq>,
) -> Result<Json<RecommendationSet>, ApiError> {
    let set = state
        .catalog
        .with(|cat| engine::recommend(cat, &body.games, &body.context))
        .map_err(bad_request)?;
    state.history.push(&body.context, body.games.len(), &set);
    Ok(Json(set))
}

async fn score_one(
    State(state): State<AppState>,
    Json(body): Json<ScoreReq>,
) -> Result<Json<Recommendation>, ApiError> {
    let rec = state
        .catalog
        .with(|cat| engine::score_game(cat, &body.game, &body.context))
        .map_err(bad_request)?;
    Ok(Json(rec))
}

#[derive(serde::Serialize)]
struct MoodOut {
    id: String,
    name: String,
    energy_level: u8,
    social_requirement: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    preferred_session_mins: Option<u32>,
}

async fn list_moods(State(state): State<AppState>) -> Json<Vec<MoodOut>> {
    let mut moods = state.catalog.with(|cat| {
        cat.moods()
            .map(|m| MoodOut {
                id: m.id.clone(),
                name: m.name.clone(),
                energy_level: m.energy_level,
                social_requirement: m.social_requirement,
                preferred_session_mins: m.preferred_session_mins,
            })
            .collect::<Vec<_>>()
    });
    moods.sort_by(|a, b| a.id.cmp(&b.id));
    Json(moods)
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.snapshot_last_n(10))
}

async fn debug_mood(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> String {
    let id = q.get("id").cloned().unwrap_or_default();
    state.catalog.with(|cat| match cat.mood(&id) {
        Some(m) => format!(
            "mood='{}' energy={} social={} genres={} tags={}",
            m.id,
            m.energy_level,
            m.social_requirement,
            m.genre_weights.len(),
            m.tag_weights.len()
        ),
        None => format!("mood='{}' not found", id),
    })
}

async fn admin_reload_catalog(State(state): State<AppState>) -> Result<String, ApiError> {
    match MoodCatalog::from_toml() {
        Ok(fresh) => {
            let moods = fresh.len();
            state.catalog.replace(fresh);
            Ok(format!("reloaded ({moods} moods)"))
        }
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}
