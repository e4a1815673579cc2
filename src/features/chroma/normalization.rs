//! Pitch-class vector arithmetic

/// Guard against division by zero for silent or empty vectors
pub const EPSILON: f32 = 1e-8;

/// Scale a non-negative vector so its components sum to one
///
/// An all-zero vector stays all-zero.
pub fn normalize_unit_sum(values: &[f32; 12]) -> [f32; 12] {
    let sum: f32 = values.iter().sum();
    let mut out = [0.0f32; 12];
    for (o, &v) in out.iter_mut().zip(values.iter()) {
        *o = v / (sum + EPSILON);
    }
    out
}

/// Euclidean norm
pub fn l2_norm(values: &[f32]) -> f32 {
    values.iter().map(|&x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity `a·b / (|a||b| + ε)`
///
/// For non-negative inputs the result lies in [0, 1]; zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (l2_norm(a) * l2_norm(b) + EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_sum() {
        let mut v = [0.0f32; 12];
        v[0] = 1.0;
        v[4] = 1.0;
        v[7] = 2.0;
        let n = normalize_unit_sum(&v);
        assert!((n.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!((n[7] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unit_sum_of_zero() {
        assert_eq!(normalize_unit_sum(&[0.0; 12]), [0.0; 12]);
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        let a = [1.0, 0.0, 1.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&a, &[0.0, 1.0, 0.0]).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0; 3], &[1.0, 1.0, 1.0]), 0.0);
    }
}
