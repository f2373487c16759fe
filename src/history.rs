// src/history.rs
//! Bounded in-memory log of recent recommendation passes, exposed through the
//! debug endpoint for quick diagnostics. Summaries only, never full catalogs.

use serde::Serialize;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::game::RecommendationContext;
use crate::recommendation::RecommendationSet;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub ts_unix: u64,
    pub primary_mood: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_mood: Option<String>,
    pub candidates: usize,
    pub recommended: usize,
    // quick explainability fingerprints for diagnostics:
    pub top_games: Vec<String>,
    pub top_scores: Vec<f32>,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, ctx: &RecommendationContext, candidates: usize, set: &RecommendationSet) {
        let (top_games, top_scores) = {
            let mut ids = Vec::new();
            let mut scores = Vec::new();
            for game in set.games.iter().take(3) {
                ids.push(game.id.clone());
                scores.push(set.scores.get(&game.id).copied().unwrap_or_default());
            }
            (ids, scores)
        };

        let entry = HistoryEntry {
            ts_unix: now_unix(),
            primary_mood: ctx.primary_mood.clone(),
            secondary_mood: ctx.secondary_mood.clone(),
            candidates,
            recommended: set.len(),
            top_games,
            top_scores,
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
