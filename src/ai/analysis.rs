//! Board analysis for the AI side.
//!
//! A pure summary of both fields and the AI hand. The planner branches only
//! on the aggression flag and the threatened, critical and weak lists.

use serde::{Deserialize, Serialize};

use super::scoring::attack_power;
use crate::core::{CreatureId, Difficulty};
use crate::creatures::{Creature, Rarity};

/// Health ratio below which an own creature is threatened.
pub const THREATENED_RATIO: f64 = 0.3;
/// Health ratio below which an own creature is critical.
pub const CRITICAL_RATIO: f64 = 0.15;
/// Legendary creatures turn critical earlier.
pub const LEGENDARY_CRITICAL_RATIO: f64 = 0.25;
/// Health ratio below which an opposing creature is an easy kill.
pub const WEAK_RATIO: f64 = 0.4;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardAnalysis {
    /// Sum of creature power over the own field.
    pub own_power: f64,
    pub opponent_power: f64,
    pub own_avg_health: f64,
    pub opponent_avg_health: f64,
    /// Own creatures below 30% health, in field order.
    pub threatened: Vec<CreatureId>,
    /// Own creatures below 15% health (25% for Legendary).
    pub critical: Vec<CreatureId>,
    /// Opposing creatures below 40% health.
    pub weak_opponents: Vec<CreatureId>,
    /// Mean attack power per energy cost across the hand.
    pub hand_quality: f64,
    /// `|own - opponent| / max(own, opponent, 1)`.
    pub tension: f64,
    /// Own field size over opposing field size (at least 1).
    pub field_control: f64,
    pub aggressive: bool,
}

fn summarize(field: &[Creature]) -> (f64, f64) {
    if field.is_empty() {
        return (0.0, 0.0);
    }
    let power = field.iter().map(Creature::power).sum();
    let health = field.iter().map(Creature::health_ratio).sum::<f64>() / field.len() as f64;
    (power, health)
}

/// Analyse the board from the AI side's point of view.
#[must_use]
pub fn analyze_board(
    own_field: &[Creature],
    opponent_field: &[Creature],
    hand: &[Creature],
    difficulty: Difficulty,
) -> BoardAnalysis {
    let (own_power, own_avg_health) = summarize(own_field);
    let (opponent_power, opponent_avg_health) = summarize(opponent_field);

    let threatened = own_field
        .iter()
        .filter(|c| c.health_ratio() < THREATENED_RATIO)
        .map(|c| c.id)
        .collect();
    let critical = own_field
        .iter()
        .filter(|c| {
            let ratio = c.health_ratio();
            ratio < CRITICAL_RATIO
                || (c.rarity() == Rarity::Legendary && ratio < LEGENDARY_CRITICAL_RATIO)
        })
        .map(|c| c.id)
        .collect();
    let weak_opponents: Vec<CreatureId> = opponent_field
        .iter()
        .filter(|c| c.health_ratio() < WEAK_RATIO)
        .map(|c| c.id)
        .collect();

    let hand_quality = if hand.is_empty() {
        0.0
    } else {
        hand.iter()
            .map(|c| f64::from(attack_power(c)) / f64::from(c.deployment_cost()))
            .sum::<f64>()
            / hand.len() as f64
    };

    let tension = (own_power - opponent_power).abs() / own_power.max(opponent_power).max(1.0);
    let field_control = own_field.len() as f64 / opponent_field.len().max(1) as f64;

    let aggressive = own_power > opponent_power * 1.2
        || own_avg_health > opponent_avg_health * 1.3
        || field_control >= 1.5
        || weak_opponents.len() >= 2
        || difficulty.is_hard_or_above()
        || (tension > 0.6 && own_power >= opponent_power);

    BoardAnalysis {
        own_power,
        opponent_power,
        own_avg_health,
        opponent_avg_health,
        threatened,
        critical,
        weak_opponents,
        hand_quality,
        tension,
        field_control,
        aggressive,
    }
}
