//! Dense vector arithmetic over `f64` slices.
//!
//! Feature rows and centroids are plain slices; these helpers are the only
//! place the engine measures angles and distances between them.

/// Dot product of two equal-length slices
#[inline]
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean norm
#[inline]
pub fn norm(a: &[f64]) -> f64 {
    dot_product(a, a).sqrt()
}

/// Compute cosine similarity between two vectors
///
/// Returns 0.0 when the dimensions differ or either operand has zero norm,
/// so callers never see `NaN`.
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let norm_a = norm(a);
    let norm_b = norm(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product(a, b) / (norm_a * norm_b)
}

/// Squared L2 distance, the quantity k-means minimizes
#[inline]
pub fn squared_l2_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let v1 = [1.0, 0.0];
        let v2 = [1.0, 0.0];
        assert!((cosine_similarity(&v1, &v2) - 1.0).abs() < 1e-12);

        let v3 = [1.0, 0.0];
        let v4 = [0.0, 1.0];
        assert!(cosine_similarity(&v3, &v4).abs() < 1e-12);

        let v5 = [-2.0, 0.0];
        assert!((cosine_similarity(&v1, &v5) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_squared_l2_distance() {
        let v1 = [0.0, 0.0];
        let v2 = [3.0, 4.0];
        assert!((squared_l2_distance(&v1, &v2) - 25.0).abs() < 1e-12);
        assert_eq!(squared_l2_distance(&v1, &[1.0]), f64::INFINITY);
    }
}
