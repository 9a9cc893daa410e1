//! Pure scoring functions for ranking candidates
//!
//! The ranking score blends semantic similarity with normalized business
//! signals through a fixed weighted linear combination, then applies a
//! capped multiplicative seller boost. All functions here are total over
//! their domains; there are no error paths.

/// Weight applied to semantic similarity
pub const W_SIM: f32 = 0.6;
/// Weight applied to category match
pub const W_CAT: f32 = 0.15;
/// Weight applied to popularity
pub const W_POP: f32 = 0.1;
/// Weight applied to stock level
pub const W_STOCK: f32 = 0.05;
/// Weight applied to recency
pub const W_RECENCY: f32 = 0.05;
/// Weight applied to personalization
pub const W_PERSONAL: f32 = 0.05;

/// Upper bound on the seller boost multiplier input
pub const MAX_SELLER_BOOST: f32 = 0.25;

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Returns 0.0 for mismatched lengths or zero-magnitude inputs so that
/// degenerate embeddings never poison a ranking pass.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
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
    let norms = norm_a.sqrt() * norm_b.sqrt();
    if norms == 0.0 {
        return 0.0;
    }
    dot / norms
}

/// Linear clamp of `x` from `[min, max]` onto `[0, 1]`.
pub fn normalize_range(x: f32, min: f32, max: f32) -> f32 {
    ((x - min) / (max - min)).clamp(0.0, 1.0)
}

/// Linear clamp of `x` onto `[0, 1]` with the default unit range.
///
/// Used both for business signals and for raw cosine similarity before
/// weighting, so negative similarity contributes nothing.
pub fn normalize(x: f32) -> f32 {
    normalize_range(x, 0.0, 1.0)
}

/// Weighted ranking score.
///
/// `base = 0.6*sim + 0.15*cat + 0.1*pop + 0.05*stock + 0.05*recency +
/// 0.05*personal`, then `base * (1 + clamp(seller_boost, 0, 0.25))`. The
/// boost is strictly multiplicative and capped so a single seller cannot
/// dominate the ranking.
#[allow(clippy::too_many_arguments)]
pub fn compute_score(
    sim: f32,
    cat: f32,
    pop: f32,
    stock: f32,
    recency: f32,
    personal: f32,
    seller_boost: f32,
) -> f32 {
    let base = W_SIM * sim
        + W_CAT * cat
        + W_POP * pop
        + W_STOCK * stock
        + W_RECENCY * recency
        + W_PERSONAL * personal;
    base * (1.0 + seller_boost.clamp(0.0, MAX_SELLER_BOOST))
}

/// Round to two decimal places for external exposure.
pub fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}
