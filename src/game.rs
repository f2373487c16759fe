// src/game.rs
//! Input shapes: games as the external catalog hands them over, plus the
//! per-request recommendation context.
//!
//! Upstream game catalogs are loose about shape — a genre may arrive as a
//! plain string or as `{ "name": "Action" }`. Normalization happens here at
//! the serde boundary so the scorer only ever sees one canonical form:
//! trimmed, lowercase names.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NamedOrBare {
    Bare(String),
    Named { name: String },
}

impl NamedOrBare {
    fn into_name(self) -> String {
        match self {
            NamedOrBare::Bare(s) => s,
            NamedOrBare::Named { name } => name,
        }
    }
}

fn normalized_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<NamedOrBare>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|v| v.into_name().trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect())
}

/// A game as seen by the scorer. Read-only input owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "normalized_names")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "normalized_names")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "normalized_names")]
    pub platforms: Vec<String>,
}

impl Game {
    /// Bare game for tests and fixtures; sparse data is valid input.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            genres: Vec::new(),
            tags: Vec::new(),
            platforms: Vec::new(),
        }
    }

    pub fn with_genres(mut self, genres: &[&str]) -> Self {
        self.genres = genres.iter().map(|g| g.to_ascii_lowercase()).collect();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_ascii_lowercase()).collect();
        self
    }

    pub fn with_platforms(mut self, platforms: &[&str]) -> Self {
        self.platforms = platforms.iter().map(|p| p.to_ascii_lowercase()).collect();
        self
    }
}

/// Whether the player wants to play alone or with others right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialContext {
    Solo,
    Group,
}

/// Request-scoped hints for a single recommendation pass. Everything except
/// the primary mood is optional; absent fields degrade to neutral scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationContext {
    pub primary_mood: String,
    #[serde(default)]
    pub secondary_mood: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub social: Option<SocialContext>,
    #[serde(default)]
    pub time_available_mins: Option<u32>,
    /// Per-genre affinity in 0..1, learned from the user's play history.
    #[serde(default)]
    pub genre_affinity: Option<HashMap<String, f32>>,
}

impl RecommendationContext {
    pub fn for_mood(primary: impl Into<String>) -> Self {
        Self {
            primary_mood: primary.into(),
            secondary_mood: None,
            platform: None,
            social: None,
            time_available_mins: None,
            genre_affinity: None,
        }
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary_mood = Some(secondary.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_social(mut self, social: SocialContext) -> Self {
        self.social = Some(social);
        self
    }

    pub fn with_time_available(mut self, mins: u32) -> Self {
        self.time_available_mins = Some(mins);
        self
    }
}
