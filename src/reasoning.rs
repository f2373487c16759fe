// src/reasoning.rs
//! Human-readable justifications for a recommendation.
//!
//! A declarative list of (predicate, renderer) rules is evaluated in order
//! against the influence breakdown; each rule that fires contributes one
//! sentence. If nothing fires, a generic fallback names the primary mood.
//! Pure functions throughout so each rule is unit-testable on its own.

use crate::recommendation::MoodInfluence;

/// Influence thresholds the templates are gated on.
pub const STRONG_MATCH: f32 = 70.0;
pub const GOOD_MATCH: f32 = 55.0;
pub const STRONG_HYBRID: f32 = 15.0;

/// Names rendered into the templates.
#[derive(Debug, Clone, Copy)]
pub struct ReasonNames<'a> {
    pub primary: &'a str,
    pub secondary: Option<&'a str>,
    pub preferred_platform: Option<&'a str>,
}

struct ReasonRule {
    applies: fn(&MoodInfluence) -> bool,
    render: fn(&MoodInfluence, &ReasonNames<'_>) -> String,
}

fn secondary_name<'a>(names: &ReasonNames<'a>) -> &'a str {
    names.secondary.unwrap_or("your secondary")
}

const RULES: &[ReasonRule] = &[
    ReasonRule {
        applies: |i| i.genre > STRONG_MATCH,
        render: |_, n| format!("Perfect match for your {} mood", n.primary),
    },
    ReasonRule {
        applies: |i| i.genre > GOOD_MATCH && i.genre <= STRONG_MATCH,
        render: |_, n| format!("A good fit for your {} mood", n.primary),
    },
    ReasonRule {
        applies: |i| i.tags > STRONG_MATCH,
        render: |_, _| "The gameplay style suits how you're feeling".to_string(),
    },
    ReasonRule {
        applies: |i| i.platform > STRONG_MATCH,
        render: |_, n| match n.preferred_platform {
            Some(p) => format!("Available on {}", p),
            None => "Available on a platform that fits this mood".to_string(),
        },
    },
    ReasonRule {
        applies: |i| i.secondary.is_some_and(|s| s > STRONG_MATCH),
        render: |_, n| format!("Also matches your {} mood", secondary_name(n)),
    },
    ReasonRule {
        applies: |i| i.hybrid > STRONG_HYBRID,
        render: |_, n| {
            format!(
                "Excellent combination of {} and {} moods",
                n.primary,
                secondary_name(n)
            )
        },
    },
    ReasonRule {
        applies: |i| i.hybrid < 0.0,
        render: |_, n| {
            format!(
                "Your {} and {} moods pull in different directions",
                n.primary,
                secondary_name(n)
            )
        },
    },
];

/// Ordered reasons for one game. Never empty.
pub fn reasons_for(influence: &MoodInfluence, names: &ReasonNames<'_>) -> Vec<String> {
    let fired: Vec<String> = RULES
        .iter()
        .filter(|rule| (rule.applies)(influence))
        .map(|rule| (rule.render)(influence, names))
        .collect();

    if fired.is_empty() {
        vec![format!("Compatible with your {} mood", names.primary)]
    } else {
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> ReasonNames<'static> {
        ReasonNames {
            primary: "Energetic",
            secondary: Some("Competitive"),
            preferred_platform: None,
        }
    }

    fn neutral() -> MoodInfluence {
        MoodInfluence::default()
    }

    #[test]
    fn strong_genre_match_fires_perfect_match() {
        let influence = MoodInfluence {
            genre: 85.0,
            ..neutral()
        };
        let reasons = reasons_for(&influence, &names());
        assert_eq!(reasons[0], "Perfect match for your Energetic mood");
    }

    #[test]
    fn good_genre_match_fires_without_perfect_match() {
        let influence = MoodInfluence {
            genre: 60.0,
            ..neutral()
        };
        let reasons = reasons_for(&influence, &names());
        assert_eq!(reasons, vec!["A good fit for your Energetic mood".to_string()]);
    }

    #[test]
    fn tag_and_platform_rules_fire_independently() {
        let influence = MoodInfluence {
            tags: 75.0,
            platform: 80.0,
            ..neutral()
        };
        let n = ReasonNames {
            preferred_platform: Some("pc"),
            ..names()
        };
        let reasons = reasons_for(&influence, &n);
        assert_eq!(
            reasons,
            vec![
                "The gameplay style suits how you're feeling".to_string(),
                "Available on pc".to_string(),
            ]
        );
    }

    #[test]
    fn strong_hybrid_fires_combination_sentence() {
        let influence = MoodInfluence {
            hybrid: 20.0,
            secondary: Some(50.0),
            ..neutral()
        };
        let reasons = reasons_for(&influence, &names());
        assert!(reasons
            .iter()
            .any(|r| r == "Excellent combination of Energetic and Competitive moods"));
    }

    #[test]
    fn negative_hybrid_fires_conflict_caveat() {
        let influence = MoodInfluence {
            hybrid: -10.0,
            secondary: Some(50.0),
            ..neutral()
        };
        let reasons = reasons_for(&influence, &names());
        assert!(reasons
            .iter()
            .any(|r| r.contains("pull in different directions")));
    }

    #[test]
    fn strong_secondary_names_the_secondary_mood() {
        let influence = MoodInfluence {
            secondary: Some(78.0),
            ..neutral()
        };
        let reasons = reasons_for(&influence, &names());
        assert!(reasons.iter().any(|r| r == "Also matches your Competitive mood"));
    }

    #[test]
    fn neutral_influence_falls_back_to_generic_sentence() {
        let reasons = reasons_for(&neutral(), &names());
        assert_eq!(reasons, vec!["Compatible with your Energetic mood".to_string()]);
    }

    #[test]
    fn rules_preserve_declaration_order() {
        let influence = MoodInfluence {
            genre: 90.0,
            tags: 90.0,
            platform: 90.0,
            secondary: Some(90.0),
            hybrid: 22.0,
            primary: 90.0,
        };
        let reasons = reasons_for(&influence, &names());
        assert_eq!(reasons.len(), 5);
        assert!(reasons[0].starts_with("Perfect match"));
        assert!(reasons[4].starts_with("Excellent combination"));
    }
}
