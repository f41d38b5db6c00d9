//! Fixed-point conversion for oracle scores.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alloy_primitives::U256;

use crate::config::SCORE_DECIMALS;
use crate::error::ScoreError;

/// Scales a score into the oracle's 18-decimal unsigned fixed point.
///
/// Works from the shortest decimal text that round-trips the float, so
/// `0.1` becomes exactly `10^17` rather than the nearest binary value.
/// Digits beyond the 18th fractional place are truncated.
pub fn scale_score(score: f64) -> Result<U256, ScoreError> {
    if !score.is_finite() {
        return Err(ScoreError::NonFinite);
    }
    if score < 0.0 {
        return Err(ScoreError::Negative);
    }
    if score == 0.0 {
        return Ok(U256::ZERO);
    }

    // f64's Display never uses exponent notation.
    let text = score.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f),
        None => (text.as_str(), ""),
    };

    let places = SCORE_DECIMALS as usize;
    let mut digits = String::with_capacity(int_part.len() + places);
    digits.push_str(int_part);
    digits.extend(frac_part.chars().take(places));
    for _ in frac_part.len().min(places)..places {
        digits.push('0');
    }

    U256::from_str_radix(&digits, 10).map_err(|_| ScoreError::Overflow)
}
