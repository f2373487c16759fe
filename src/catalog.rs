// src/catalog.rs
//! Mood catalog: static mood definitions, pair combinations, and the TOML
//! config they are loaded from.
//!
//! The catalog is read-only after construction. Callers hold it behind a
//! [`CatalogHandle`] so the engine never reaches for global state; fixture
//! catalogs for tests are built from inline TOML strings.

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

// --- env defaults & names ---
pub const DEFAULT_MOODS_CONFIG_PATH: &str = "config/moods.toml";
pub const DEFAULT_MIN_SCORE: f32 = 30.0;
pub const DEFAULT_NEUTRAL_PAIR_BONUS: f32 = 5.0;

pub const ENV_MOODS_CONFIG_PATH: &str = "MOODS_CONFIG_PATH";
pub const ENV_MIN_SCORE: &str = "RECOMMENDER_MIN_SCORE";

/// Catalog shipped inside the binary; used when no config file is present.
static EMBEDDED: Lazy<MoodCatalog> = Lazy::new(|| {
    MoodCatalog::from_toml_str(include_str!("../config/moods.toml"))
        .expect("valid embedded mood catalog")
});

// parse optional float env and clamp to <0.0..=100.0>
pub(crate) fn parse_min_score_env(raw: Option<String>) -> Option<f32> {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .map(|v| v.clamp(0.0, 100.0))
}

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRoot {
    #[serde(default)]
    pub recommendation: RecommendationSection,
    #[serde(default)]
    pub moods: Vec<MoodCfg>,
    #[serde(default)]
    pub combinations: Vec<CombinationCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSection {
    #[serde(default = "default_min_score")]
    pub min_score: f32,
    #[serde(default = "default_neutral_pair_bonus")]
    pub neutral_pair_bonus: f32,
}

fn default_min_score() -> f32 {
    DEFAULT_MIN_SCORE
}

fn default_neutral_pair_bonus() -> f32 {
    DEFAULT_NEUTRAL_PAIR_BONUS
}

impl Default for RecommendationSection {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            neutral_pair_bonus: DEFAULT_NEUTRAL_PAIR_BONUS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoodCfg {
    pub id: String,
    pub name: String,
    pub energy_level: u8,
    pub social_requirement: u8,
    #[serde(default)]
    pub genre_weights: HashMap<String, f32>,
    #[serde(default)]
    pub tag_weights: HashMap<String, f32>,
    #[serde(default)]
    pub platform_bias: HashMap<String, f32>,
    #[serde(default)]
    pub compatible: Vec<String>,
    #[serde(default)]
    pub conflicting: Vec<String>,
    #[serde(default)]
    pub preferred_session_mins: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CombinationCfg {
    pub moods: [String; 2],
    pub intensity: f32,
}

/* ----------------------------
Compiled catalog structures
---------------------------- */

/// A named gaming mood with its weight tables and scalar requirements.
#[derive(Debug, Clone)]
pub struct Mood {
    pub id: String,
    pub name: String,
    /// 0..10 intensity expectation, compared against an estimate per game.
    pub energy_level: u8,
    /// 0..10 social-interaction expectation.
    pub social_requirement: u8,
    pub genre_weights: HashMap<String, f32>,
    pub tag_weights: HashMap<String, f32>,
    pub platform_bias: HashMap<String, f32>,
    pub compatible: HashSet<String>,
    pub conflicting: HashSet<String>,
    pub preferred_session_mins: Option<u32>,
}

/// Immutable lookup table of moods and pair combinations plus the engine
/// tunables that live alongside them in the config file.
#[derive(Debug, Clone)]
pub struct MoodCatalog {
    moods: HashMap<String, Mood>,
    /// Keyed by the lexicographically sorted id pair.
    combinations: HashMap<(String, String), f32>,
    pub min_score: f32,
    pub neutral_pair_bonus: f32,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn check_weight_table(mood_id: &str, table_name: &str, table: &HashMap<String, f32>) -> anyhow::Result<()> {
    for (key, w) in table {
        if !w.is_finite() || !(0.0..=1.0).contains(w) {
            anyhow::bail!(
                "mood `{}`: {} weight for `{}` must be in 0..=1, got {}",
                mood_id,
                table_name,
                key,
                w
            );
        }
    }
    Ok(())
}

/// Lowercase all table keys so lookups match the normalized game shapes.
fn lowered(table: HashMap<String, f32>) -> HashMap<String, f32> {
    table
        .into_iter()
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v))
        .collect()
}

impl MoodCatalog {
    /// Load from a TOML file. Uses MOODS_CONFIG_PATH or defaults to
    /// "config/moods.toml"; falls back to the embedded catalog when the file
    /// is missing. A file that exists but fails to parse or validate is an
    /// error rather than a silent fallback.
    pub fn from_toml() -> anyhow::Result<Self> {
        let path = Self::config_path();

        let mut catalog = match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content)
                .with_context(|| format!("invalid mood catalog at {}", path.display()))?,
            Err(_) => {
                info!(path = %path.display(), "mood catalog file not found, using embedded catalog");
                Self::embedded()
            }
        };

        // optional: override threshold from env
        if let Some(t) = parse_min_score_env(std::env::var(ENV_MIN_SCORE).ok()) {
            catalog.min_score = t;
        } else if !catalog.min_score.is_finite() {
            catalog.min_score = DEFAULT_MIN_SCORE;
        }

        Ok(catalog)
    }

    /// Resolve the configured catalog path (env override or default).
    pub fn config_path() -> PathBuf {
        std::env::var(ENV_MOODS_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MOODS_CONFIG_PATH))
    }

    /// The catalog compiled into the binary.
    pub fn embedded() -> Self {
        EMBEDDED.clone()
    }

    /// Build and validate a catalog from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: CatalogRoot = toml::from_str(toml_str)?;

        if !cfg.recommendation.min_score.is_finite()
            || !(0.0..=100.0).contains(&cfg.recommendation.min_score)
        {
            anyhow::bail!(
                "recommendation.min_score must be in 0..=100, got {}",
                cfg.recommendation.min_score
            );
        }

        let mut moods: HashMap<String, Mood> = HashMap::with_capacity(cfg.moods.len());
        for m in cfg.moods {
            if m.energy_level > 10 {
                anyhow::bail!("mood `{}`: energy_level must be 0..=10, got {}", m.id, m.energy_level);
            }
            if m.social_requirement > 10 {
                anyhow::bail!(
                    "mood `{}`: social_requirement must be 0..=10, got {}",
                    m.id,
                    m.social_requirement
                );
            }
            check_weight_table(&m.id, "genre", &m.genre_weights)?;
            check_weight_table(&m.id, "tag", &m.tag_weights)?;
            check_weight_table(&m.id, "platform", &m.platform_bias)?;

            let mood = Mood {
                id: m.id.clone(),
                name: m.name,
                energy_level: m.energy_level,
                social_requirement: m.social_requirement,
                genre_weights: lowered(m.genre_weights),
                tag_weights: lowered(m.tag_weights),
                platform_bias: lowered(m.platform_bias),
                compatible: m.compatible.into_iter().collect(),
                conflicting: m.conflicting.into_iter().collect(),
                preferred_session_mins: m.preferred_session_mins,
            };
            if moods.insert(m.id.clone(), mood).is_some() {
                anyhow::bail!("duplicate mood id `{}`", m.id);
            }
        }

        // Relation targets must exist, so a typo in the config surfaces at
        // load time instead of silently never matching.
        for mood in moods.values() {
            for rel in mood.compatible.iter().chain(mood.conflicting.iter()) {
                if rel == &mood.id {
                    anyhow::bail!("mood `{}` lists itself as a relation", mood.id);
                }
                if !moods.contains_key(rel) {
                    anyhow::bail!("mood `{}` references unknown mood `{}`", mood.id, rel);
                }
            }
        }

        let mut combinations = HashMap::with_capacity(cfg.combinations.len());
        for c in &cfg.combinations {
            let [a, b] = &c.moods;
            if a == b {
                anyhow::bail!("combination pairs mood `{}` with itself", a);
            }
            for id in [a, b] {
                if !moods.contains_key(id) {
                    anyhow::bail!("combination references unknown mood `{}`", id);
                }
            }
            if !c.intensity.is_finite() || !(0.0..=1.0).contains(&c.intensity) {
                anyhow::bail!(
                    "combination `{}`+`{}`: intensity must be in 0..=1, got {}",
                    a,
                    b,
                    c.intensity
                );
            }
            if combinations.insert(pair_key(a, b), c.intensity).is_some() {
                anyhow::bail!("duplicate combination for `{}` and `{}`", a, b);
            }
        }

        Ok(Self {
            moods,
            combinations,
            min_score: cfg.recommendation.min_score,
            neutral_pair_bonus: cfg.recommendation.neutral_pair_bonus,
        })
    }

    pub fn mood(&self, id: &str) -> Option<&Mood> {
        self.moods.get(id)
    }

    /// Precomputed pair intensity, looked up by unordered pair.
    pub fn combination(&self, a: &str, b: &str) -> Option<f32> {
        self.combinations.get(&pair_key(a, b)).copied()
    }

    pub fn moods(&self) -> impl Iterator<Item = &Mood> {
        self.moods.values()
    }

    pub fn len(&self) -> usize {
        self.moods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
    }
}

/* ----------------------------
Thread-safe handle + hot reload
---------------------------- */

/// A threadsafe handle that can hot-reload the underlying catalog in dev/local.
/// - Enable by setting RECOMMENDER_HOT_RELOAD=1
/// - Dev-gated: active only if cfg!(debug_assertions) OR APP_ENV is "local"/"development".
#[derive(Clone)]
pub struct CatalogHandle {
    inner: Arc<RwLock<MoodCatalog>>,
}

impl CatalogHandle {
    pub fn new(catalog: MoodCatalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Run `f` against the current catalog under the read lock.
    pub fn with<R>(&self, f: impl FnOnce(&MoodCatalog) -> R) -> R {
        let guard = self.inner.read().expect("catalog rwlock poisoned");
        f(&guard)
    }

    /// Swap in a freshly loaded catalog.
    pub fn replace(&self, catalog: MoodCatalog) {
        let mut guard = self.inner.write().expect("catalog rwlock poisoned");
        *guard = catalog;
    }
}

/// Returns true if we should enable hot reload (dev/local only).
fn hot_reload_enabled() -> bool {
    let want = std::env::var("RECOMMENDER_HOT_RELOAD")
        .ok()
        .map(|v| v == "1")
        .unwrap_or(false);
    if !want {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("APP_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Start a simple polling watcher on `path` to hot-reload into `handle`.
/// Polls mtime every 2s. Uses only std, no external deps.
pub fn start_hot_reload_thread(handle: CatalogHandle, path: PathBuf) {
    if !hot_reload_enabled() {
        return;
    }

    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last_mtime: Option<SystemTime> = None;

        loop {
            match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(mtime) => {
                    let changed = match last_mtime {
                        None => {
                            last_mtime = Some(mtime);
                            false
                        }
                        Some(prev) => mtime > prev,
                    };
                    if changed {
                        match fs::read_to_string(&path)
                            .map_err(anyhow::Error::from)
                            .and_then(|content| MoodCatalog::from_toml_str(&content))
                        {
                            Ok(fresh) => {
                                info!(path = %path.display(), moods = fresh.len(), "mood catalog reloaded");
                                handle.replace(fresh);
                            }
                            Err(e) => {
                                warn!(path = %path.display(), error = %e, "mood catalog reload failed, keeping previous");
                            }
                        }
                        last_mtime = Some(mtime);
                    }
                }
                Err(_) => {
                    // File missing or unreadable; keep trying.
                }
            }
            thread::sleep(poll);
        }
    });
}

/* ----------------------------
Tests
---------------------------- */
