//! Cosine similarity between embedding vectors.

/// Cosine similarity: `dot(a, b) / (‖a‖ · ‖b‖)`.
///
/// Returns 0.0 when either vector has zero norm, is empty, or the
/// dimensions disagree — "no similarity", not an error. The natural range
/// of cosine is otherwise passed through unclamped; for the embedding
/// families used here values land in [0, 1] in practice.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
