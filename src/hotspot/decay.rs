//! Recency decay weighting
//!
//! A logistic curve centred on the newest end of the window: a commit at
//! normalised recency `t = 1` weighs 0.5 and the weight collapses towards zero
//! within the most recent slice of the window.

/// Steepness of the logistic curve
pub const DECAY_STEEPNESS: f64 = 12.0;

/// Normalised recency: 1.0 at `now`, 0.0 at `oldest`
pub fn normalized_recency(commit_time: i64, now: i64, oldest: i64) -> f64 {
    let span = (now - oldest) as f64;
    let age = (now - commit_time) as f64;
    1.0 - age / span
}

/// Logistic weight for a normalised recency `t`
pub fn weight_at(t: f64) -> f64 {
    1.0 / (1.0 + (-DECAY_STEEPNESS * t + DECAY_STEEPNESS).exp())
}

/// Decay weight of a commit made at `commit_time`
///
/// Requires `now > oldest`; the window selector guarantees a non-zero span.
pub fn weight(commit_time: i64, now: i64, oldest: i64) -> f64 {
    debug_assert!(now > oldest, "decay span must be positive");
    weight_at(normalized_recency(commit_time, now, oldest))
}
