//! Similarity metrics over co-rated value pairs.
//!
//! The engines intersect two rating collections on a shared key (movie id
//! for user-user, user id for item-item) and hand the aligned value pairs
//! here. Ratings without a counterpart are skipped upstream, never an
//! error.

/// Substituted when a similarity is mathematically undefined (no overlap
/// or zero variance). Keeps downstream weighted-average denominators
/// non-zero without a branch at every call site.
pub const SIMILARITY_FLOOR: f64 = 0.05;

/// Mean-centered cosine similarity.
///
/// Both collections are centered by a single mean each (the rater's own
/// average in user-user mode). Degenerate input collapses to the floor
/// instead of NaN.
pub fn centered_cosine(pairs: &[(f64, f64)], mean_a: f64, mean_b: f64) -> f64 {
    let mut dot = 0.0;
    let mut sum_sq_a = 0.0;
    let mut sum_sq_b = 0.0;

    for &(a, b) in pairs {
        let dev_a = a - mean_a;
        let dev_b = b - mean_b;
        dot += dev_a * dev_b;
        sum_sq_a += dev_a * dev_a;
        sum_sq_b += dev_b * dev_b;
    }

    if sum_sq_a * sum_sq_b == 0.0 {
        return SIMILARITY_FLOOR;
    }
    dot / (sum_sq_a.sqrt() * sum_sq_b.sqrt())
}

/// Item-item variant of the mean-centered cosine: each co-rating pair is
/// centered by its own rater's mean, supplied per triple as
/// `(value_a, value_b, rater_mean)`.
///
/// Historical inconsistency, kept on purpose: this path centers by the
/// rater's mean while the user-user path centers each side by the entity's
/// own mean. Harmonizing the two would change pinned outputs.
pub fn centered_cosine_by_rater(triples: &[(f64, f64, f64)]) -> f64 {
    let mut dot = 0.0;
    let mut sum_sq_a = 0.0;
    let mut sum_sq_b = 0.0;

    for &(a, b, rater_mean) in triples {
        let dev_a = a - rater_mean;
        let dev_b = b - rater_mean;
        dot += dev_a * dev_b;
        sum_sq_a += dev_a * dev_a;
        sum_sq_b += dev_b * dev_b;
    }

    if sum_sq_a * sum_sq_b == 0.0 {
        return SIMILARITY_FLOOR;
    }
    dot / (sum_sq_a.sqrt() * sum_sq_b.sqrt())
}

/// Pearson correlation over raw co-rated values.
///
/// Normalizes rater leniency natively, so no centering is applied first.
/// Zero denominator (including empty overlap) collapses to the floor.
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len() as f64;
    let mut sum_xy = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_x_sq = 0.0;
    let mut sum_y_sq = 0.0;

    for &(x, y) in pairs {
        sum_xy += x * y;
        sum_x += x;
        sum_y += y;
        sum_x_sq += x * x;
        sum_y_sq += y * y;
    }

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = (n * sum_x_sq - sum_x * sum_x) * (n * sum_y_sq - sum_y * sum_y);

    if denominator == 0.0 {
        return SIMILARITY_FLOOR;
    }
    numerator / denominator.sqrt()
}

/// Euclidean-distance-derived similarity, bounded to (0, 1].
///
/// Legacy metric; not on the primary prediction path.
pub fn euclidean(pairs: &[(f64, f64)]) -> f64 {
    let sum_sq: f64 = pairs.iter().map(|&(a, b)| (a - b) * (a - b)).sum();
    1.0 / (1.0 + sum_sq.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_cosine_symmetry() {
        let ab = vec![(2.0, 2.5), (3.0, 3.0), (4.5, 4.0)];
        let ba: Vec<(f64, f64)> = ab.iter().map(|&(a, b)| (b, a)).collect();

        let forward = centered_cosine(&ab, 3.1666666666666665, 3.1666666666666665);
        let backward = centered_cosine(&ba, 3.1666666666666665, 3.1666666666666665);
        assert!((forward - backward).abs() < 1e-12);
    }

    #[test]
    fn test_centered_cosine_bounded() {
        let pairs = vec![(2.0, 2.5), (3.0, 3.0)];
        let sim = centered_cosine(&pairs, 2.5, 2.75);
        assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn test_centered_cosine_no_overlap_hits_floor() {
        assert_eq!(centered_cosine(&[], 2.5, 3.0), SIMILARITY_FLOOR);
    }

    #[test]
    fn test_centered_cosine_zero_variance_hits_floor() {
        // Both raters sit exactly at their mean: zero deviations.
        let pairs = vec![(3.0, 4.0)];
        assert_eq!(centered_cosine(&pairs, 3.0, 4.0), SIMILARITY_FLOOR);
    }

    #[test]
    fn test_centered_cosine_by_rater_degenerate() {
        // One shared rater whose co-ratings equal their own mean, so both
        // deviation sums vanish and the floor is substituted.
        let triples = vec![(2.0, 2.0, 2.0)];
        assert_eq!(centered_cosine_by_rater(&triples), SIMILARITY_FLOOR);
    }

    #[test]
    fn test_centered_cosine_by_rater_opposite_tastes() {
        // Two raters deviating in opposite directions on the two movies.
        let triples = vec![(2.0, 4.0, 3.0), (5.0, 3.0, 4.0)];
        let sim = centered_cosine_by_rater(&triples);
        assert!(sim < 0.0);
        assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let pairs = vec![(2.0, 2.5), (3.0, 3.0)];
        let r = pearson(&pairs);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_symmetry() {
        let ab = vec![(2.0, 4.5), (3.5, 1.0), (5.0, 2.5)];
        let ba: Vec<(f64, f64)> = ab.iter().map(|&(a, b)| (b, a)).collect();
        assert!((pearson(&ab) - pearson(&ba)).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_bounded() {
        let pairs = vec![(0.5, 5.0), (4.0, 1.5), (3.0, 3.0), (2.5, 4.5)];
        let r = pearson(&pairs);
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn test_pearson_zero_denominator_hits_floor() {
        // Constant on one side: zero variance.
        let pairs = vec![(3.0, 2.0), (3.0, 4.0)];
        assert_eq!(pearson(&pairs), SIMILARITY_FLOOR);
        assert_eq!(pearson(&[]), SIMILARITY_FLOOR);
    }

    #[test]
    fn test_floor_is_never_zero_or_nan() {
        for sim in [
            centered_cosine(&[], 0.0, 0.0),
            centered_cosine_by_rater(&[]),
            pearson(&[]),
        ] {
            assert!(sim.is_finite());
            assert!(sim > 0.0);
            assert_eq!(sim, SIMILARITY_FLOOR);
        }
    }

    #[test]
    fn test_euclidean() {
        let pairs = vec![(2.0, 2.5), (3.0, 3.0)];
        // 1 / (1 + sqrt(0.25)) = 2/3
        assert!((euclidean(&pairs) - 2.0 / 3.0).abs() < 1e-12);

        // Identical vectors are maximally similar.
        assert_eq!(euclidean(&[(4.0, 4.0)]), 1.0);
    }
}
