// src/engine.rs
//! # Recommendation Engine
//! Pure, testable logic that maps `(catalog, games, context)` → ranked
//! recommendations. No I/O, suitable for unit tests and offline evaluation.
//!
//! Policy: the composite blends the primary-mood score with an optional
//! secondary-mood score and pair bonus, a genre-affinity bonus from play
//! history, and a session-length match. Games below the catalog's minimum
//! score are dropped; the rest are sorted by score, ties broken by game id.

use anyhow::{bail, Result};
use metrics::counter;
use std::cmp::Ordering;
use tracing::debug;

use crate::catalog::{Mood, MoodCatalog};
use crate::game::{Game, RecommendationContext};
use crate::reasoning::{reasons_for, ReasonNames};
use crate::recommendation::{MoodInfluence, Recommendation, RecommendationSet};
use crate::scoring::{clamp_score, score_single_mood, NEUTRAL};
use crate::synergy::hybrid_bonus;

pub const W_PRIMARY: f32 = 0.4;
pub const W_SECONDARY: f32 = 0.25;
pub const W_HYBRID: f32 = 0.15;
pub const W_AFFINITY: f32 = 0.1;
const W_TIME_MATCH: f32 = 0.5;

/// Average play-history affinity over the game's genres, scaled to 0..100.
/// Genres the user has no recorded affinity for count as the neutral 0.5.
fn genre_affinity_bonus(game: &Game, affinity: &std::collections::HashMap<String, f32>) -> f32 {
    if game.genres.is_empty() {
        return 0.0;
    }
    let sum: f32 = game
        .genres
        .iter()
        .map(|g| affinity.get(g).copied().unwrap_or(0.5).clamp(0.0, 1.0))
        .sum();
    (sum / game.genres.len() as f32) * 100.0
}

/// Composite 0..100 score for one game, with its influence breakdown.
pub fn composite_score(
    catalog: &MoodCatalog,
    game: &Game,
    primary: &Mood,
    secondary: Option<&Mood>,
    ctx: &RecommendationContext,
) -> (f32, MoodInfluence) {
    let p = score_single_mood(game, primary, ctx);
    let mut score = NEUTRAL + (p.total - NEUTRAL) * W_PRIMARY;

    let mut influence = MoodInfluence {
        primary: clamp_score(p.total),
        secondary: None,
        genre: p.genre,
        tags: p.tags,
        platform: p.platform,
        hybrid: 0.0,
    };

    if let Some(sec) = secondary {
        let s = score_single_mood(game, sec, ctx);
        score += (s.total - NEUTRAL) * W_SECONDARY;

        let hybrid = hybrid_bonus(catalog, primary, sec);
        score += hybrid * W_HYBRID;

        influence.secondary = Some(clamp_score(s.total));
        influence.hybrid = hybrid;
    }

    if let Some(affinity) = &ctx.genre_affinity {
        score += genre_affinity_bonus(game, affinity) * W_AFFINITY;
    }

    if let (Some(available), Some(preferred)) =
        (ctx.time_available_mins, primary.preferred_session_mins)
    {
        let time_match = (100.0 - (available as f32 - preferred as f32).abs() / 2.0).max(0.0);
        score += (time_match - NEUTRAL) * W_TIME_MATCH;
    }

    (clamp_score(score), influence)
}

/// Score one game without the inclusion filter. Used by the debug endpoint.
pub fn score_game(
    catalog: &MoodCatalog,
    game: &Game,
    ctx: &RecommendationContext,
) -> Result<Recommendation> {
    let (primary, secondary) = resolve_moods(catalog, ctx)?;
    Ok(build_recommendation(catalog, game, primary, secondary, ctx))
}

fn resolve_moods<'a>(
    catalog: &'a MoodCatalog,
    ctx: &RecommendationContext,
) -> Result<(&'a Mood, Option<&'a Mood>)> {
    let Some(primary) = catalog.mood(&ctx.primary_mood) else {
        bail!("unknown primary mood `{}`", ctx.primary_mood);
    };
    let secondary = match &ctx.secondary_mood {
        Some(id) => match catalog.mood(id) {
            Some(mood) => Some(mood),
            None => bail!("unknown secondary mood `{}`", id),
        },
        None => None,
    };
    Ok((primary, secondary))
}

fn build_recommendation(
    catalog: &MoodCatalog,
    game: &Game,
    primary: &Mood,
    secondary: Option<&Mood>,
    ctx: &RecommendationContext,
) -> Recommendation {
    let (score, influence) = composite_score(catalog, game, primary, secondary, ctx);
    let names = ReasonNames {
        primary: &primary.name,
        secondary: secondary.map(|m| m.name.as_str()),
        preferred_platform: ctx.platform.as_deref(),
    };
    Recommendation {
        game: game.clone(),
        score,
        reasons: reasons_for(&influence, &names),
        influence,
    }
}

/// Rank a game catalog against a recommendation context.
///
/// Fails fast on an unresolvable mood id (a caller programming error, not a
/// recoverable runtime condition); every other missing field degrades to
/// neutral scoring. The inputs are never mutated and no state is kept, so
/// concurrent calls need no coordination.
pub fn recommend(
    catalog: &MoodCatalog,
    games: &[Game],
    ctx: &RecommendationContext,
) -> Result<RecommendationSet> {
    let (primary, secondary) = resolve_moods(catalog, ctx)?;

    let mut ranked: Vec<Recommendation> = games
        .iter()
        .map(|game| build_recommendation(catalog, game, primary, secondary, ctx))
        .filter(|rec| rec.score >= catalog.min_score)
        .collect();

    // Descending by score; equal scores fall back to ascending game id so the
    // ordering is deterministic across runs.
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.game.id.cmp(&b.game.id))
    });

    counter!("recommend_requests_total").increment(1);
    counter!("recommend_games_filtered_total").increment((games.len() - ranked.len()) as u64);
    debug!(
        primary = %ctx.primary_mood,
        secondary = ctx.secondary_mood.as_deref().unwrap_or("-"),
        candidates = games.len(),
        recommended = ranked.len(),
        "recommendation pass"
    );

    Ok(RecommendationSet::from_ranked(ranked))
}
