//! Vector math for the similarity core.

/// Inner product of two equal-length vectors.
///
/// For unit-length inputs this is their cosine similarity.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vector dimensions must match");

    let mut sum = 0.0f32;

    // Process in chunks of 4
    let chunks = a.len() / 4;
    let remainder = a.len() % 4;

    for i in 0..chunks {
        let idx = i * 4;
        sum += a[idx] * b[idx]
            + a[idx + 1] * b[idx + 1]
            + a[idx + 2] * b[idx + 2]
            + a[idx + 3] * b[idx + 3];
    }

    for i in 0..remainder {
        let idx = chunks * 4 + i;
        sum += a[idx] * b[idx];
    }

    sum
}

/// L2 norm of a vector.
#[inline]
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scale a vector to unit length in place.
///
/// Zero vectors are left untouched; they score 0 against everything under
/// the inner product, which is the ordering we want for degenerate rows.
pub fn normalize(vector: &mut [f32]) {
    let norm = l2_norm(vector);
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
