use crate::battle::state::TurnRng;
use crate::pokemon::Pokemon;
use schema::StatusCondition;

/// Probability of a capture succeeding, in 0.0..=1.0:
/// min(1.0, (catch_rate * ball_modifier * hp_factor * status_bonus) / 255)
/// where hp_factor = (3*max_hp - 2*current_hp) / (3*max_hp).
///
/// An undamaged target bottoms out at hp_factor 1/3; a target at 0 HP
/// maxes it out at 1.0.
pub fn catch_probability(target: &Pokemon, ball_modifier: f64) -> f64 {
    let max_hp = target.max_hp() as f64;
    let current_hp = target.current_hp() as f64;
    let hp_factor = (3.0 * max_hp - 2.0 * current_hp) / (3.0 * max_hp);
    let bonus = status_bonus(target.status);

    let probability = (target.catch_rate as f64 * ball_modifier * hp_factor * bonus) / 255.0;
    probability.min(1.0)
}

fn status_bonus(status: Option<StatusCondition>) -> f64 {
    match status {
        Some(StatusCondition::Sleep) | Some(StatusCondition::Freeze) => 2.0,
        Some(StatusCondition::Paralysis)
        | Some(StatusCondition::Burn)
        | Some(StatusCondition::Poison) => 1.5,
        None => 1.0,
    }
}

/// Roll a single capture attempt. The capture device is consumed by the
/// caller regardless of the outcome.
pub fn attempt_catch(target: &Pokemon, ball_modifier: f64, rng: &mut TurnRng) -> bool {
    let probability = catch_probability(target, ball_modifier);
    let roll = rng.next_outcome("catch roll");
    roll as f64 <= probability * 100.0
}
