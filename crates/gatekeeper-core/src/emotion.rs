use crate::types::EmotionScore;

/// Placeholder shown when no emotion distribution is available for a face.
pub const NO_EMOTION: &str = "emotionless";

/// Label with the highest probability. Ties go to the earliest entry.
pub fn dominant_emotion(scores: &[EmotionScore]) -> Option<&str> {
    let mut best: Option<&EmotionScore> = None;
    for score in scores {
        match best {
            Some(b) if score.probability <= b.probability => {}
            _ => best = Some(score),
        }
    }
    best.map(|s| s.label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f32)]) -> Vec<EmotionScore> {
        pairs
            .iter()
            .map(|(label, probability)| EmotionScore {
                label: label.to_string(),
                probability: *probability,
            })
            .collect()
    }

    #[test]
    fn test_picks_highest_probability() {
        let s = scores(&[("angry", 0.1), ("happy", 0.7), ("sad", 0.2)]);
        assert_eq!(dominant_emotion(&s), Some("happy"));
    }

    #[test]
    fn test_tie_goes_to_first() {
        let s = scores(&[("neutral", 0.4), ("surprise", 0.4), ("fear", 0.2)]);
        assert_eq!(dominant_emotion(&s), Some("neutral"));
    }

    #[test]
    fn test_empty_distribution() {
        assert_eq!(dominant_emotion(&[]), None);
    }
}
