//! Cosine similarity over sparse feature vectors.

use encoder::FeatureVector;

/// `(a · b) / (‖a‖ ‖b‖)`.
///
/// Returns 0 when either vector is zero: a movie with no usable metadata is
/// similar to nothing rather than producing NaN.
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f32 {
    let denominator = a.norm() * b.norm();
    if denominator == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denominator).clamp(-1.0, 1.0)
}
