// src/scoring.rs
//! Single-mood scorer: how well does one game fit one mood?
//!
//! Starts from a neutral base of 50 and applies five weighted deltas (genre,
//! tag, platform, energy distance, social distance). Each subscore lies in
//! [0, 100]; missing data resolves to the neutral 50 so sparse games are not
//! penalized. The caller clamps the blended result.

use crate::catalog::Mood;
use crate::game::{Game, RecommendationContext, SocialContext};
use std::collections::HashMap;

pub const W_GENRE: f32 = 0.30;
pub const W_TAG: f32 = 0.25;
pub const W_PLATFORM: f32 = 0.15;
pub const W_ENERGY: f32 = 0.15;
pub const W_SOCIAL: f32 = 0.15;

pub const NEUTRAL: f32 = 50.0;

// Energy estimation: what a game's genres/tags say about its intensity.
const HIGH_ENERGY_GENRES: &[&str] = &["action", "racing", "sports"];
const LOW_ENERGY_GENRES: &[&str] = &["puzzle", "casual", "simulation"];
const HIGH_ENERGY_TAGS: &[&str] = &["intense", "fast-paced", "competitive"];
const LOW_ENERGY_TAGS: &[&str] = &["relaxing", "meditative", "cozy"];

// Social estimation: tags that mark group play vs. solo play.
const GROUP_TAGS: &[&str] = &["multiplayer", "cooperative", "team-based"];
const SOLO_TAGS: &[&str] = &["single-player", "solo"];

/// Clamp a score into [0, 100]; non-finite values collapse to 0.
pub fn clamp_score(x: f32) -> f32 {
    if !x.is_finite() {
        return 0.0;
    }
    x.clamp(0.0, 100.0)
}

/// Subscores plus the blended total for one (game, mood) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleMoodScore {
    pub total: f32,
    pub genre: f32,
    pub tags: f32,
    pub platform: f32,
    pub energy: f32,
    pub social: f32,
}

/// Average `table[name] * 100` over `names`, defaulting to the neutral 50 for
/// names absent from the table. Empty input scores neutral.
fn weight_table_score(names: &[String], table: &HashMap<String, f32>) -> f32 {
    if names.is_empty() {
        return NEUTRAL;
    }
    let sum: f32 = names
        .iter()
        .map(|n| table.get(n).map(|w| w * 100.0).unwrap_or(NEUTRAL))
        .sum();
    sum / names.len() as f32
}

fn platform_score(game: &Game, mood: &Mood, ctx: &RecommendationContext) -> f32 {
    // A forced platform preference overrides mood bias entirely.
    if let Some(pref) = &ctx.platform {
        let pref = pref.trim().to_ascii_lowercase();
        return if game.platforms.iter().any(|p| *p == pref) {
            80.0
        } else {
            30.0
        };
    }
    weight_table_score(&game.platforms, &mood.platform_bias)
}

fn count_in(haystack: &[String], needles: &[&str]) -> i32 {
    haystack
        .iter()
        .filter(|h| needles.contains(&h.as_str()))
        .count() as i32
}

/// Estimated energy level of a game on the mood scale. Starts at 5; may
/// exceed 10 for stacked high-energy signals, which the distance formula
/// tolerates.
pub fn estimate_game_energy(game: &Game) -> i32 {
    5 + 2 * count_in(&game.genres, HIGH_ENERGY_GENRES) - count_in(&game.genres, LOW_ENERGY_GENRES)
        + 2 * count_in(&game.tags, HIGH_ENERGY_TAGS)
        - count_in(&game.tags, LOW_ENERGY_TAGS)
}

/// Estimated social requirement of a game on the mood scale.
pub fn estimate_game_social(game: &Game) -> i32 {
    5 + 3 * count_in(&game.tags, GROUP_TAGS) - 2 * count_in(&game.tags, SOLO_TAGS)
}

fn energy_score(game: &Game, mood: &Mood) -> f32 {
    let estimate = estimate_game_energy(game);
    let distance = (estimate - i32::from(mood.energy_level)).abs() as f32;
    (100.0 - distance * 10.0).max(0.0)
}

fn social_score(game: &Game, mood: &Mood, ctx: &RecommendationContext) -> f32 {
    let estimate = estimate_game_social(game);
    match ctx.social {
        // An explicit social context overrides the mood's declared requirement.
        Some(SocialContext::Solo) => {
            if estimate <= 5 {
                80.0
            } else {
                30.0
            }
        }
        Some(SocialContext::Group) => {
            if estimate >= 7 {
                80.0
            } else {
                40.0
            }
        }
        None => {
            let distance = (estimate - i32::from(mood.social_requirement)).abs() as f32;
            (100.0 - distance * 8.0).max(0.0)
        }
    }
}

/// Compatibility of one game with one mood, with the per-factor breakdown.
pub fn score_single_mood(game: &Game, mood: &Mood, ctx: &RecommendationContext) -> SingleMoodScore {
    let genre = weight_table_score(&game.genres, &mood.genre_weights);
    let tags = weight_table_score(&game.tags, &mood.tag_weights);
    let platform = platform_score(game, mood, ctx);
    let energy = energy_score(game, mood);
    let social = social_score(game, mood, ctx);

    let total = NEUTRAL
        + (genre - NEUTRAL) * W_GENRE
        + (tags - NEUTRAL) * W_TAG
        + (platform - NEUTRAL) * W_PLATFORM
        + (energy - NEUTRAL) * W_ENERGY
        + (social - NEUTRAL) * W_SOCIAL;

    SingleMoodScore {
        total,
        genre,
        tags,
        platform,
        energy,
        social,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MoodCatalog;

    const TEST_TOML: &str = r#"
[[moods]]
id = "energetic"
name = "Energetic"
energy_level = 9
social_requirement = 5

[moods.genre_weights]
action = 0.9
puzzle = 0.2

[moods.tag_weights]
intense = 0.9

[moods.platform_bias]
pc = 0.8

[[moods]]
id = "chill"
name = "Chill"
energy_level = 2
social_requirement = 3

[moods.tag_weights]
relaxing = 0.95
"#;

    fn catalog() -> MoodCatalog {
        MoodCatalog::from_toml_str(TEST_TOML).expect("load test catalog")
    }

    fn ctx() -> RecommendationContext {
        RecommendationContext::for_mood("energetic")
    }

    #[test]
    fn genre_subscore_averages_with_neutral_default() {
        let cat = catalog();
        let mood = cat.mood("energetic").unwrap();
        // action = 90, unknown "rpg" defaults to 50 -> mean 70.
        let game = Game::new("g", "G").with_genres(&["action", "rpg"]);
        let s = score_single_mood(&game, mood, &ctx());
        assert!((s.genre - 70.0).abs() < 1e-4, "genre = {}", s.genre);
    }

    #[test]
    fn bare_game_scores_neutral_on_weight_tables() {
        let cat = catalog();
        let mood = cat.mood("energetic").unwrap();
        let game = Game::new("bare", "Bare");
        let s = score_single_mood(&game, mood, &ctx());
        assert_eq!(s.genre, NEUTRAL);
        assert_eq!(s.tags, NEUTRAL);
        assert_eq!(s.platform, NEUTRAL);
        // Energy/social still compare the default estimates (5/5).
        assert_eq!(s.energy, 100.0 - 4.0 * 10.0);
        assert_eq!(s.social, 100.0);
    }

    #[test]
    fn energy_estimate_matches_intense_action_example() {
        // action (+2), intense (+2), competitive (+2) on top of the base 5.
        let game = Game::new("g", "G")
            .with_genres(&["action"])
            .with_tags(&["intense", "competitive"]);
        assert_eq!(estimate_game_energy(&game), 11);

        let cat = catalog();
        let mood = cat.mood("energetic").unwrap();
        let s = score_single_mood(&game, mood, &ctx());
        // 100 - |11 - 9| * 10 = 80.
        assert!((s.energy - 80.0).abs() < 1e-4, "energy = {}", s.energy);
    }

    #[test]
    fn low_energy_signals_pull_the_estimate_down() {
        let game = Game::new("g", "G")
            .with_genres(&["puzzle", "casual"])
            .with_tags(&["relaxing", "cozy"]);
        // 5 - 1 - 1 - 1 - 1 = 1
        assert_eq!(estimate_game_energy(&game), 1);
    }

    #[test]
    fn solo_context_overrides_mood_social_requirement() {
        let cat = catalog();
        let mood = cat.mood("energetic").unwrap();
        let game = Game::new("g", "G").with_tags(&["single-player"]);
        // estimate = 5 - 2 = 3 <= 5 -> 80 regardless of the mood's requirement.
        let solo = RecommendationContext::for_mood("energetic").with_social(SocialContext::Solo);
        let s = score_single_mood(&game, mood, &solo);
        assert_eq!(s.social, 80.0);

        let busy = Game::new("g2", "G2").with_tags(&["multiplayer", "cooperative"]);
        // estimate = 5 + 6 = 11 > 5 -> 30 in solo context.
        let s = score_single_mood(&busy, mood, &solo);
        assert_eq!(s.social, 30.0);
    }

    #[test]
    fn group_context_rewards_multiplayer_tags() {
        let cat = catalog();
        let mood = cat.mood("energetic").unwrap();
        let group = RecommendationContext::for_mood("energetic").with_social(SocialContext::Group);

        let coop = Game::new("g", "G").with_tags(&["multiplayer"]);
        // estimate = 8 >= 7 -> 80.
        assert_eq!(score_single_mood(&coop, mood, &group).social, 80.0);

        let lonely = Game::new("g2", "G2").with_tags(&["single-player"]);
        // estimate = 3 < 7 -> 40.
        assert_eq!(score_single_mood(&lonely, mood, &group).social, 40.0);
    }

    #[test]
    fn platform_preference_overrides_bias() {
        let cat = catalog();
        let mood = cat.mood("energetic").unwrap();
        let game = Game::new("g", "G").with_platforms(&["switch"]);

        let prefer_switch = RecommendationContext::for_mood("energetic").with_platform("Switch");
        assert_eq!(score_single_mood(&game, mood, &prefer_switch).platform, 80.0);

        let prefer_pc = RecommendationContext::for_mood("energetic").with_platform("pc");
        assert_eq!(score_single_mood(&game, mood, &prefer_pc).platform, 30.0);

        // Without a preference the mood bias applies: pc = 0.8 -> 80.
        let on_pc = Game::new("g2", "G2").with_platforms(&["pc"]);
        assert_eq!(score_single_mood(&on_pc, mood, &ctx()).platform, 80.0);
    }

    #[test]
    fn subscores_stay_in_bounds_for_extreme_games() {
        let cat = catalog();
        let extreme = Game::new("x", "X")
            .with_genres(&["action", "racing", "sports", "action"])
            .with_tags(&["intense", "fast-paced", "competitive", "multiplayer", "team-based"]);
        let bare = Game::new("b", "B");
        let calm = Game::new("c", "C")
            .with_genres(&["puzzle", "casual", "simulation"])
            .with_tags(&["relaxing", "meditative", "cozy", "single-player", "solo"]);

        for mood in cat.moods() {
            for game in [&extreme, &bare, &calm] {
                for ctx in [
                    RecommendationContext::for_mood(&mood.id),
                    RecommendationContext::for_mood(&mood.id).with_social(SocialContext::Solo),
                    RecommendationContext::for_mood(&mood.id).with_social(SocialContext::Group),
                    RecommendationContext::for_mood(&mood.id).with_platform("pc"),
                ] {
                    let s = score_single_mood(game, mood, &ctx);
                    for (label, v) in [
                        ("genre", s.genre),
                        ("tags", s.tags),
                        ("platform", s.platform),
                        ("energy", s.energy),
                        ("social", s.social),
                    ] {
                        assert!(
                            (0.0..=100.0).contains(&v),
                            "{label} subscore out of bounds for {}: {v}",
                            game.id
                        );
                    }
                    assert!(
                        (0.0..=100.0).contains(&s.total),
                        "total out of bounds for {}: {}",
                        game.id,
                        s.total
                    );
                }
            }
        }
    }
}
