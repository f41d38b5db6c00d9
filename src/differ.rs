// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Score differential check.

/// Whether an identity's score moved enough to post it again.
///
/// A newly scored identity (`old` is `None`) always acts. Otherwise the
/// absolute change must be strictly greater than `threshold`; a change equal
/// to the threshold is ignored. The threshold may be negative, in which case
/// unchanged scores act too. A NaN on either side never acts.
pub fn should_act(old: Option<f64>, new: f64, threshold: f64) -> bool {
    match old {
        None => true,
        Some(old) => (new - old).abs() > threshold,
    }
}
