/// Upper bound on a final risk score.
pub const MAX_SCORE: u32 = 100;

/// Combine the rule-based base score with the optional plugin
/// contribution into a final bounded score.
///
/// Monotonic non-decreasing in both inputs and saturating at 100.
/// Both inputs are structurally non-negative, so no lower clamp is
/// needed; a plugin that could produce negative contributions would
/// require one.
#[inline]
pub fn aggregate(base_score: u32, ml_contribution: u32) -> u8 {
    base_score
        .saturating_add(ml_contribution)
        .min(MAX_SCORE) as u8
}
