//! Difficulty-specific single-action heuristics.
//!
//! Tried only when the whole ladder planned nothing. Each difficulty walks
//! its own short list and plans at most one action.

use super::analysis::BoardAnalysis;
use super::planner::{pick_best, PlanBuilder, PlanError, Tier};
use super::scoring::{attack_power, creature_value, deployment_score, estimate_attack_damage};
use crate::core::{BattleRng, CreatureId, Difficulty};
use crate::energy::{ATTACK_COST, DEFEND_COST};

/// Share of a target's health an attack must threaten to count as a trade.
const TRADE_DAMAGE_SHARE: f64 = 0.5;
/// Minimum value ratio for a trade.
const TRADE_RATIO: f64 = 0.8;

/// Plan one fallback action for the builder's difficulty, if any applies.
pub fn plan_fallback(
    plan: &mut PlanBuilder<'_>,
    analysis: &BoardAnalysis,
    rng: &mut BattleRng,
) -> Result<(), PlanError> {
    match plan.config().difficulty {
        Difficulty::Easy => easy(plan, rng),
        Difficulty::Medium => medium(plan),
        Difficulty::Hard | Difficulty::Expert => hard(plan, analysis),
    }
}

fn can_attack(plan: &PlanBuilder<'_>) -> bool {
    plan.can_afford(ATTACK_COST) && !plan.opponents().is_empty()
}

/// Random attacker against the weakest target, else the cheapest deploy.
fn easy(plan: &mut PlanBuilder<'_>, rng: &mut BattleRng) -> Result<(), PlanError> {
    if can_attack(plan) {
        let attackers: Vec<CreatureId> = plan.ready_attackers().map(|c| c.id).collect();
        let target = pick_best(plan.opponents().iter(), |c| -f64::from(c.current_health)).map(|c| c.id);
        if let (Some(&attacker), Some(target)) = (rng.choose(&attackers), target) {
            return plan.attack(attacker, target, Tier::Fallback);
        }
    }
    let cheapest = pick_best(affordable_hand(plan), |&(_, cost)| -f64::from(cost)).map(|(id, _)| id);
    match cheapest {
        Some(id) => plan.deploy(id, Tier::Fallback),
        None => Ok(()),
    }
}

/// Best damage per energy, else the best-scoring deploy.
fn medium(plan: &mut PlanBuilder<'_>) -> Result<(), PlanError> {
    if can_attack(plan) {
        let pairs = plan
            .ready_attackers()
            .flat_map(|a| plan.opponents().iter().map(move |t| (a, t)));
        let best = pick_best(pairs, |(a, t)| estimate_attack_damage(a, t) / f64::from(ATTACK_COST))
            .map(|(a, t)| (a.id, t.id));
        if let Some((attacker, target)) = best {
            return plan.attack(attacker, target, Tier::Fallback);
        }
    }
    let difficulty = plan.config().difficulty;
    let best = pick_best(
        plan.hand()
            .iter()
            .filter(|c| plan.can_afford(c.deployment_cost())),
        |c| deployment_score(c, plan.field(), plan.opponents(), difficulty),
    )
    .map(|c| c.id);
    match best {
        Some(id) if plan.field_space() > 0 => plan.deploy(id, Tier::Fallback),
        _ => Ok(()),
    }
}

/// Secure a kill, else trade up, else protect, else deploy the strongest.
fn hard(plan: &mut PlanBuilder<'_>, analysis: &BoardAnalysis) -> Result<(), PlanError> {
    if can_attack(plan) {
        if let Some((attacker, target)) = kill_shot(plan).or_else(|| value_trade(plan)) {
            return plan.attack(attacker, target, Tier::Fallback);
        }
    }

    if plan.can_afford(DEFEND_COST) {
        let guard = analysis.threatened.iter().copied().find(|&id| {
            plan.field_creature(id)
                .is_some_and(|c| !c.is_defending && !plan.is_used(id))
        });
        if let Some(id) = guard {
            return plan.defend(id, Tier::Fallback);
        }
    }

    let strongest = pick_best(
        plan.hand()
            .iter()
            .filter(|c| plan.can_afford(c.deployment_cost())),
        |c| f64::from(attack_power(c)),
    )
    .map(|c| c.id);
    match strongest {
        Some(id) if plan.field_space() > 0 => plan.deploy(id, Tier::Fallback),
        _ => Ok(()),
    }
}

fn affordable_hand<'p>(plan: &'p PlanBuilder<'_>) -> impl Iterator<Item = (CreatureId, u32)> + 'p {
    let has_space = plan.field_space() > 0;
    plan.hand()
        .iter()
        .map(|c| (c.id, c.deployment_cost()))
        .filter(move |&(_, cost)| has_space && plan.can_afford(cost))
}

/// An attack expected to finish its target, preferring the most valuable.
fn kill_shot(plan: &PlanBuilder<'_>) -> Option<(CreatureId, CreatureId)> {
    let kills = plan.ready_attackers().flat_map(|a| {
        plan.opponents()
            .iter()
            .filter(move |t| estimate_attack_damage(a, t) >= f64::from(t.current_health))
            .map(move |t| (a, t))
    });
    pick_best(kills, |(_, t)| creature_value(t)).map(|(a, t)| (a.id, t.id))
}

/// The attack that threatens the most value relative to the attacker's own.
fn value_trade(plan: &PlanBuilder<'_>) -> Option<(CreatureId, CreatureId)> {
    let trades = plan.ready_attackers().flat_map(|a| {
        plan.opponents()
            .iter()
            .filter(move |t| {
                estimate_attack_damage(a, t) >= f64::from(t.current_health) * TRADE_DAMAGE_SHARE
            })
            .map(move |t| (a, t, creature_value(t) / creature_value(a).max(1.0)))
            .filter(|&(_, _, ratio)| ratio > TRADE_RATIO)
    });
    pick_best(trades, |&(_, _, ratio)| ratio).map(|(a, t, _)| (a.id, t.id))
}
