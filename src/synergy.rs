// src/synergy.rs
//! Hybrid mood-pair bonus.
//!
//! When a request carries two active moods, the pair itself contributes: a
//! precomputed combination intensity when one is declared, otherwise a flat
//! bonus/penalty from the moods' declared relations. Relations are checked in
//! both directions so the bonus is symmetric even for one-sided catalogs.

use crate::catalog::{Mood, MoodCatalog};

/// A declared combination's intensity (0..1) scales to at most this bonus.
pub const COMBINATION_SCALE: f32 = 25.0;
pub const COMPATIBLE_BONUS: f32 = 20.0;
pub const CONFLICT_PENALTY: f32 = -10.0;

/// Bonus for playing `a` and `b` together. Symmetric in its mood arguments.
pub fn hybrid_bonus(catalog: &MoodCatalog, a: &Mood, b: &Mood) -> f32 {
    if let Some(intensity) = catalog.combination(&a.id, &b.id) {
        return intensity * COMBINATION_SCALE;
    }
    if a.compatible.contains(&b.id) || b.compatible.contains(&a.id) {
        return COMPATIBLE_BONUS;
    }
    if a.conflicting.contains(&b.id) || b.conflicting.contains(&a.id) {
        return CONFLICT_PENALTY;
    }
    // Unmodeled pairs are treated as mildly synergistic rather than punished.
    catalog.neutral_pair_bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MoodCatalog;

    const TEST_TOML: &str = r#"
[recommendation]
neutral_pair_bonus = 5.0

[[moods]]
id = "energetic"
name = "Energetic"
energy_level = 9
social_requirement = 5
compatible = ["adventurous"]
conflicting = ["chill"]

[[moods]]
id = "chill"
name = "Chill"
energy_level = 2
social_requirement = 3

[[moods]]
id = "competitive"
name = "Competitive"
energy_level = 8
social_requirement = 7

[[moods]]
id = "adventurous"
name = "Adventurous"
energy_level = 7
social_requirement = 4

[[combinations]]
moods = ["energetic", "competitive"]
intensity = 0.8
"#;

    fn cat() -> MoodCatalog {
        MoodCatalog::from_toml_str(TEST_TOML).expect("load test catalog")
    }

    #[test]
    fn declared_combination_scales_intensity() {
        let c = cat();
        let a = c.mood("energetic").unwrap();
        let b = c.mood("competitive").unwrap();
        assert!((hybrid_bonus(&c, a, b) - 20.0).abs() < 1e-6);
    }

    #[test]
    fn compatible_relation_wins_over_neutral() {
        let c = cat();
        let a = c.mood("energetic").unwrap();
        let b = c.mood("adventurous").unwrap();
        assert_eq!(hybrid_bonus(&c, a, b), COMPATIBLE_BONUS);
        // Relation declared only on `energetic`; still symmetric.
        assert_eq!(hybrid_bonus(&c, b, a), COMPATIBLE_BONUS);
    }

    #[test]
    fn conflicting_relation_penalizes_both_directions() {
        let c = cat();
        let a = c.mood("energetic").unwrap();
        let b = c.mood("chill").unwrap();
        assert_eq!(hybrid_bonus(&c, a, b), CONFLICT_PENALTY);
        assert_eq!(hybrid_bonus(&c, b, a), CONFLICT_PENALTY);
    }

    #[test]
    fn unmodeled_pair_gets_neutral_bonus() {
        let c = cat();
        let a = c.mood("chill").unwrap();
        let b = c.mood("competitive").unwrap();
        assert_eq!(hybrid_bonus(&c, a, b), 5.0);
    }

    #[test]
    fn bonus_is_symmetric_for_every_pair() {
        let c = cat();
        let moods: Vec<_> = c.moods().collect();
        for a in &moods {
            for b in &moods {
                if a.id == b.id {
                    continue;
                }
                assert_eq!(
                    hybrid_bonus(&c, a, b),
                    hybrid_bonus(&c, b, a),
                    "asymmetric bonus for {} / {}",
                    a.id,
                    b.id
                );
            }
        }
    }
}
