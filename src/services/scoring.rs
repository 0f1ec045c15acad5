use crate::models::{Candidate, CategoryBatch, ScoredCandidate};

/// Weight of the proximity term
pub const WEIGHT_DISTANCE: f64 = 0.3;
/// Weight of the rating term
pub const WEIGHT_RATING: f64 = 0.6;
/// Share of review volume. Not added on its own: review count enters the
/// rating term through a tenth-root damping instead.
pub const WEIGHT_REVIEW_COUNT: f64 = 0.1;

/// Exponent applied to the raw review count
const REVIEW_DAMPING: f64 = 1.0 / 10.0;

/// Per-candidate attributes divided by their batch mean
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedAttributes {
    pub distance: f64,
    pub rating: f64,
    pub review_count: f64,
}

/// Scores one category batch.
///
/// Permanently closed candidates are dropped first. Distance, rating and
/// review count are each divided by their mean over the survivors, then
///
/// ```text
/// score = (1 / distance) * 0.3 + rating * 0.6 * raw_review_count^(1/10)
/// ```
///
/// Output keeps the input order. An empty result means the category has no
/// usable candidates.
pub fn score(batch: &CategoryBatch) -> Vec<ScoredCandidate> {
    let open: Vec<&Candidate> = batch.candidates.iter().filter(|c| !c.is_closed).collect();
    if open.is_empty() {
        return Vec::new();
    }

    let normalized = normalize(&open);

    let scored: Vec<ScoredCandidate> = open
        .into_iter()
        .zip(normalized)
        .map(|(candidate, attrs)| ScoredCandidate {
            score: composite_score(&attrs, candidate.review_count),
            candidate: candidate.clone(),
        })
        .collect();

    tracing::debug!(
        category = %batch.category,
        fetched = batch.len(),
        scored = scored.len(),
        "Category batch scored"
    );

    scored
}

/// Divides each attribute column by its own mean
pub fn normalize(candidates: &[&Candidate]) -> Vec<NormalizedAttributes> {
    let distance = normalize_column(candidates.iter().map(|c| c.distance));
    let rating = normalize_column(candidates.iter().map(|c| c.rating));
    let review_count = normalize_column(candidates.iter().map(|c| f64::from(c.review_count)));

    distance
        .into_iter()
        .zip(rating)
        .zip(review_count)
        .map(|((distance, rating), review_count)| NormalizedAttributes {
            distance,
            rating,
            review_count,
        })
        .collect()
}

/// A column whose mean is zero stays all-zero instead of becoming NaN
fn normalize_column(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return values;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean == 0.0 {
        return vec![0.0; values.len()];
    }

    values.into_iter().map(|v| v / mean).collect()
}

fn composite_score(attrs: &NormalizedAttributes, raw_review_count: u32) -> f64 {
    // A venue at the origin gets an infinite proximity term
    let proximity = if attrs.distance == 0.0 {
        f64::INFINITY
    } else {
        1.0 / attrs.distance
    };

    proximity * WEIGHT_DISTANCE
        + attrs.rating * WEIGHT_RATING * f64::from(raw_review_count).powf(REVIEW_DAMPING)
}

/// Index of the first maximal score.
///
/// Exact ties go to the earliest candidate, i.e. the closest one in the
/// provider's distance order.
pub fn best_index(scored: &[ScoredCandidate]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, s) in scored.iter().enumerate() {
        match best {
            Some((_, top)) if s.score <= top => {}
            _ => best = Some((i, s.score)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn candidate(id: &str, distance: f64, rating: f64, review_count: u32) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: format!("Venue {}", id),
            distance,
            rating,
            review_count,
            is_closed: false,
        }
    }

    fn closed(mut c: Candidate) -> Candidate {
        c.is_closed = true;
        c
    }

    #[test]
    fn test_empty_batch_scores_nothing() {
        let batch = CategoryBatch::new("food", vec![]);
        assert!(score(&batch).is_empty());
    }

    #[test]
    fn test_all_closed_scores_nothing() {
        let batch = CategoryBatch::new(
            "food",
            vec![closed(candidate("1", 10.0, 4.0, 5)), closed(candidate("2", 20.0, 3.0, 1))],
        );
        assert!(score(&batch).is_empty());
    }

    #[test]
    fn test_closed_candidates_excluded() {
        let batch = CategoryBatch::new(
            "food",
            vec![
                candidate("1", 100.0, 4.0, 50),
                closed(candidate("2", 10.0, 5.0, 5000)),
                candidate("3", 300.0, 3.5, 20),
            ],
        );

        let scored = score(&batch);
        let ids: Vec<&str> = scored.iter().map(|s| s.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_normalized_columns_have_unit_mean() {
        let candidates = [
            candidate("1", 120.0, 4.5, 300),
            candidate("2", 480.0, 3.0, 12),
            candidate("3", 950.0, 4.0, 75),
            candidate("4", 1500.0, 2.5, 1),
        ];
        let refs: Vec<&Candidate> = candidates.iter().collect();

        let normalized = normalize(&refs);
        let n = normalized.len() as f64;

        let mean_distance = normalized.iter().map(|a| a.distance).sum::<f64>() / n;
        let mean_rating = normalized.iter().map(|a| a.rating).sum::<f64>() / n;
        let mean_reviews = normalized.iter().map(|a| a.review_count).sum::<f64>() / n;

        assert!((mean_distance - 1.0).abs() < EPSILON);
        assert!((mean_rating - 1.0).abs() < EPSILON);
        assert!((mean_reviews - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_score_formula() {
        // Mean distance 1.5, mean rating 3.5
        let batch = CategoryBatch::new(
            "food",
            vec![candidate("1", 2.0, 4.0, 50), candidate("2", 1.0, 3.0, 10)],
        );

        let scored = score(&batch);

        let expected_1 = (1.0 / (2.0 / 1.5)) * 0.3 + (4.0 / 3.5) * 0.6 * 50f64.powf(0.1);
        let expected_2 = (1.0 / (1.0 / 1.5)) * 0.3 + (3.0 / 3.5) * 0.6 * 10f64.powf(0.1);

        assert!((scored[0].score - expected_1).abs() < EPSILON);
        assert!((scored[1].score - expected_2).abs() < EPSILON);
        assert!(scored[0].score > scored[1].score);
    }

    #[test]
    fn test_single_candidate_normalizes_to_one() {
        let batch = CategoryBatch::new("food", vec![candidate("1", 640.0, 4.0, 1)]);

        let scored = score(&batch);

        // All normalized values are 1, review_count^(1/10) is 1
        assert!((scored[0].score - (WEIGHT_DISTANCE + WEIGHT_RATING)).abs() < EPSILON);
    }

    #[test]
    fn test_closer_candidate_wins_when_otherwise_equal() {
        let batch = CategoryBatch::new(
            "food",
            vec![candidate("far", 900.0, 4.0, 40), candidate("near", 100.0, 4.0, 40)],
        );

        let scored = score(&batch);
        assert_eq!(scored[best_index(&scored).unwrap()].candidate.id, "near");
    }

    #[test]
    fn test_zero_columns_do_not_produce_nan() {
        let batch = CategoryBatch::new(
            "food",
            vec![candidate("1", 100.0, 0.0, 0), candidate("2", 200.0, 0.0, 0)],
        );

        let scored = score(&batch);
        assert!(scored.iter().all(|s| !s.score.is_nan()));
        assert_eq!(scored[best_index(&scored).unwrap()].candidate.id, "1");
    }

    #[test]
    fn test_zero_distance_scores_highest() {
        let batch = CategoryBatch::new(
            "food",
            vec![candidate("1", 100.0, 5.0, 900), candidate("origin", 0.0, 1.0, 1)],
        );

        let scored = score(&batch);
        assert_eq!(scored[best_index(&scored).unwrap()].candidate.id, "origin");
    }

    #[test]
    fn test_best_index_first_of_ties() {
        let scored: Vec<ScoredCandidate> = ["a", "b", "c"]
            .iter()
            .zip([1.0, 2.0, 2.0])
            .map(|(id, score)| ScoredCandidate {
                candidate: candidate(id, 1.0, 1.0, 1),
                score,
            })
            .collect();

        assert_eq!(best_index(&scored), Some(1));
        assert_eq!(best_index(&[]), None);
    }
}
