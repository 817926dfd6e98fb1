//! Input Sanitization
//!
//! Clamping helpers for loosely-typed host input.
//!
//! Functions:
//! - Count sanitization (negative counts become zero)
//! - Score and mastery clamping
//! - Success counter sanitization
//! - Half-up rounding matching the host's display rounding

use crate::types::{MAX_MASTERY_SCORE, MIN_MASTERY_SCORE};

/// Converts a raw host count into a usable count; negatives become 0
pub fn non_negative_count(raw: i64) -> usize {
    if raw < 0 {
        tracing::warn!(value = raw, "negative count clamped to zero");
        return 0;
    }
    usize::try_from(raw).unwrap_or(usize::MAX)
}

/// Clamps an integer score into 0..=100
pub fn clamp_score(score: i64) -> i64 {
    score.clamp(MIN_MASTERY_SCORE, MAX_MASTERY_SCORE)
}

/// Clamps a concept mastery value into 0..=100, invalid values become 0
pub fn sanitize_mastery(value: f64) -> f64 {
    if value.is_nan() || value.is_infinite() {
        return 0.0;
    }
    value.clamp(MIN_MASTERY_SCORE as f64, MAX_MASTERY_SCORE as f64)
}

/// Consecutive success never goes below zero
pub fn sanitize_success(value: f64) -> f64 {
    if value.is_nan() || value.is_infinite() || value < 0.0 {
        return 0.0;
    }
    value
}

/// Rounds half toward positive infinity (2.5 -> 3, -2.5 -> -2)
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Rounds to two decimals with half-up semantics
pub fn round_to_cents(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== counts and scores ====================

    #[test]
    fn test_non_negative_count() {
        assert_eq!(non_negative_count(-4), 0);
        assert_eq!(non_negative_count(0), 0);
        assert_eq!(non_negative_count(780), 780);
    }

    #[test]
    fn test_clamp_score_bounds() {
        assert_eq!(clamp_score(-10), 0);
        assert_eq!(clamp_score(55), 55);
        assert_eq!(clamp_score(140), 100);
    }

    #[test]
    fn test_sanitize_mastery() {
        assert_eq!(sanitize_mastery(f64::NAN), 0.0);
        assert_eq!(sanitize_mastery(f64::INFINITY), 0.0);
        assert_eq!(sanitize_mastery(-3.0), 0.0);
        assert_eq!(sanitize_mastery(120.0), 100.0);
        assert_eq!(sanitize_mastery(84.5), 84.5);
    }

    #[test]
    fn test_sanitize_success() {
        assert_eq!(sanitize_success(-0.5), 0.0);
        assert_eq!(sanitize_success(f64::NAN), 0.0);
        assert_eq!(sanitize_success(2.5), 2.5);
    }

    // ==================== rounding ====================

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.4), 2.0);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(32.0), 32.0);
        assert_eq!(round_to_cents(0.5), 0.5);
        assert_eq!(round_to_cents(5.714), 5.71);
    }
}
