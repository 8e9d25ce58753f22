use crate::scoring_config::ScoringConfig;
use crate::squad::Player;

pub const ABILITY_FACTOR: f64 = 0.7;
pub const ATTRIBUTE_FACTOR: f64 = 3.0;

/// Weighted mean of the slot's relevant attributes the player actually has.
/// Missing attributes are skipped; with none present the mean is 0.
pub fn weighted_attribute_average(player: &Player, slot: &str, config: &ScoringConfig) -> f64 {
    let mut total = 0.0;
    let mut weight_sum = 0.0;
    for code in config.slot_attributes(slot) {
        let Some(value) = player.attribute(code) else {
            continue;
        };
        let w = config.weight(code);
        total += value * w;
        weight_sum += w;
    }
    if weight_sum > 0.0 {
        total / weight_sum
    } else {
        0.0
    }
}

/// `0.7 * CA + 3 * weighted attribute average`. Missing CA counts as 0.
pub fn slot_fitness(player: &Player, slot: &str, config: &ScoringConfig) -> f64 {
    let ability = player.ca.unwrap_or(0.0);
    ABILITY_FACTOR * ability + ATTRIBUTE_FACTOR * weighted_attribute_average(player, slot, config)
}
