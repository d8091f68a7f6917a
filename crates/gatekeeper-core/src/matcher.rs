//! Nearest-neighbour matching of a probe embedding against an ordered list.

use crate::types::Embedding;

/// Default Euclidean distance threshold for the 128-d face embeddings.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.6;

/// Best candidate for a probe that matched at least one entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Position of the candidate in the list it was matched against.
    pub index: usize,
    pub distance: f32,
}

/// Strategy for comparing a probe embedding against an ordered candidate list.
pub trait Matcher {
    /// Returns `None` when no candidate lies strictly below `threshold`.
    fn compare<T: AsRef<Embedding>>(
        &self,
        probe: &Embedding,
        candidates: &[T],
        threshold: f32,
    ) -> Option<Match>;
}

/// Euclidean distance matcher.
///
/// Computes the full distance vector, checks whether any entry is under
/// the threshold, then returns the global argmin. The argmin of the whole
/// list is always itself a match whenever some entry matches, so this is
/// equivalent to taking the argmin over matches only. Ties go to the
/// lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanMatcher;

impl Matcher for EuclideanMatcher {
    fn compare<T: AsRef<Embedding>>(
        &self,
        probe: &Embedding,
        candidates: &[T],
        threshold: f32,
    ) -> Option<Match> {
        if candidates.is_empty() {
            return None;
        }

        let distances: Vec<f32> = candidates
            .iter()
            .map(|c| probe.euclidean_distance(c.as_ref()))
            .collect();

        if !distances.iter().any(|&d| d < threshold) {
            return None;
        }

        let mut best = 0;
        for (i, &d) in distances.iter().enumerate().skip(1) {
            if d < distances[best] {
                best = i;
            }
        }

        debug_assert!(distances[best] < threshold);
        Some(Match {
            index: best,
            distance: distances[best],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IdentityRecord;

    fn emb(values: &[f32]) -> Embedding {
        Embedding::new(values.to_vec())
    }

    #[test]
    fn test_empty_candidates_never_match() {
        let probe = emb(&[0.0, 0.0]);
        let candidates: Vec<Embedding> = Vec::new();
        assert_eq!(EuclideanMatcher.compare(&probe, &candidates, 0.6), None);
    }

    #[test]
    fn test_self_match_always_succeeds() {
        let probe = emb(&[0.3, -0.2, 0.9]);
        let candidates = vec![emb(&[5.0, 5.0, 5.0]), probe.clone(), emb(&[-4.0, 0.0, 1.0])];
        let m = EuclideanMatcher.compare(&probe, &candidates, DEFAULT_MATCH_THRESHOLD).unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.distance, 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let probe = emb(&[0.0]);
        let candidates = vec![emb(&[0.5])];
        assert_eq!(EuclideanMatcher.compare(&probe, &candidates, 0.5), None);
        assert!(EuclideanMatcher.compare(&probe, &candidates, 0.50001).is_some());
    }

    #[test]
    fn test_returns_global_argmin_among_several_matches() {
        let probe = emb(&[0.0, 0.0]);
        let candidates = vec![emb(&[0.4, 0.0]), emb(&[0.1, 0.0]), emb(&[0.0, 0.3])];
        let m = EuclideanMatcher.compare(&probe, &candidates, 0.6).unwrap();
        assert_eq!(m.index, 1);
        assert!((m.distance - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_argmin_is_a_match_whenever_any_matches() {
        let probe = emb(&[0.0, 0.0]);
        let candidates = vec![
            emb(&[2.0, 0.0]),
            emb(&[0.0, 0.55]),
            emb(&[1.0, 1.0]),
            emb(&[0.2, 0.2]),
        ];
        let m = EuclideanMatcher.compare(&probe, &candidates, 0.6).unwrap();
        assert_eq!(m.index, 3);
        assert!(m.distance < 0.6);
    }

    #[test]
    fn test_ties_resolve_to_lowest_index() {
        let probe = emb(&[0.0, 0.0]);
        let candidates = vec![emb(&[0.9, 0.9]), emb(&[0.0, 0.2]), emb(&[0.2, 0.0])];
        let m = EuclideanMatcher.compare(&probe, &candidates, 0.6).unwrap();
        assert_eq!(m.index, 1);
    }

    #[test]
    fn test_no_match_when_all_far() {
        let probe = emb(&[0.0, 0.0]);
        let candidates = vec![emb(&[1.0, 0.0]), emb(&[0.0, -1.0])];
        assert_eq!(EuclideanMatcher.compare(&probe, &candidates, 0.6), None);
    }

    #[test]
    fn test_mismatched_dimension_candidate_is_skipped() {
        let probe = emb(&[0.0, 0.0]);
        let candidates = vec![emb(&[0.0, 0.0, 0.0]), emb(&[0.1, 0.0])];
        let m = EuclideanMatcher.compare(&probe, &candidates, 0.6).unwrap();
        assert_eq!(m.index, 1);
    }

    #[test]
    fn test_deterministic_over_records() {
        let probe = emb(&[0.1, 0.1]);
        let records = vec![
            IdentityRecord::new("a", emb(&[0.0, 0.0])),
            IdentityRecord::new("b", emb(&[0.1, 0.2])),
        ];
        let first = EuclideanMatcher.compare(&probe, &records, 0.6);
        for _ in 0..10 {
            assert_eq!(EuclideanMatcher.compare(&probe, &records, 0.6), first);
        }
        assert_eq!(first.unwrap().index, 1);
    }
}
