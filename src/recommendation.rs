// src/recommendation.rs
//! Output shapes for the recommendation engine: per-game influence breakdown,
//! ranked recommendations, and the id-keyed maps the UI layer consumes.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::game::Game;

/// How much each factor contributed to a game's composite score.
///
/// `primary`/`secondary` are the clamped single-mood scores; `genre`, `tags`
/// and `platform` are the primary mood's subscores; `hybrid` is the raw pair
/// bonus (negative for conflicting moods).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodInfluence {
    pub primary: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<f32>,
    pub genre: f32,
    pub tags: f32,
    pub platform: f32,
    pub hybrid: f32,
}

impl Default for MoodInfluence {
    fn default() -> Self {
        Self {
            primary: 50.0,
            secondary: None,
            genre: 50.0,
            tags: 50.0,
            platform: 50.0,
            hybrid: 0.0,
        }
    }
}

/// One ranked game with its score, reasons and breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub game: Game,
    pub score: f32,
    pub reasons: Vec<String>,
    pub influence: MoodInfluence,
}

/// The full result of one recommendation pass, keyed by game id the way the
/// frontend consumes it. `games` is already filtered and sorted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecommendationSet {
    pub games: Vec<Game>,
    pub scores: BTreeMap<String, f32>,
    pub reasoning: BTreeMap<String, String>,
    pub influence: BTreeMap<String, MoodInfluence>,
}

impl RecommendationSet {
    /// Build the keyed maps from an already ranked list.
    pub fn from_ranked(ranked: Vec<Recommendation>) -> Self {
        let mut set = Self::default();
        for rec in ranked {
            let id = rec.game.id.clone();
            set.scores.insert(id.clone(), rec.score);
            set.reasoning.insert(id.clone(), rec.reasons.join(". "));
            set.influence.insert(id, rec.influence);
            set.games.push(rec.game);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
