//! Scoring heuristics shared by the planner tiers and the fallback.
//!
//! All functions are pure and cheap. Estimates deliberately ignore variance,
//! crits and dodges; they rank options, they do not predict outcomes.

use crate::core::Difficulty;
use crate::creatures::{Attribute, Creature, Rarity};
use crate::effects::{Item, ItemEffect};

/// The larger of a creature's two attack stats.
#[must_use]
pub fn attack_power(creature: &Creature) -> u32 {
    creature.battle_stats.power()
}

/// Expected attack damage with defense halved in, ignoring rolls.
#[must_use]
pub fn estimate_attack_damage(attacker: &Creature, defender: &Creature) -> f64 {
    let stats = &attacker.battle_stats;
    let target = &defender.battle_stats;
    let physical = (f64::from(stats.physical_attack) - f64::from(target.physical_defense) * 0.5).max(1.0);
    let magical = (f64::from(stats.magical_attack) - f64::from(target.magical_defense) * 0.5).max(1.0);
    physical.max(magical)
}

const fn spell_rarity_factor(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Legendary => 1.5,
        Rarity::Epic => 1.3,
        Rarity::Rare => 1.1,
        Rarity::Common => 1.0,
    }
}

/// Rough spell damage against `target`.
#[must_use]
pub fn estimate_spell_damage(spell: &Item, caster: &Creature, target: &Creature) -> u32 {
    let magic = f64::from(caster.attribute(Attribute::Magic));
    let mut damage = 20.0 * (1.0 + magic * 0.15);
    if spell.effect == ItemEffect::Surge {
        damage *= 1.5;
    }
    damage *= spell_rarity_factor(spell.rarity);
    (damage - f64::from(target.battle_stats.magical_defense)).max(1.0).floor() as u32
}

/// Spells the lethal search counts on for raw damage.
#[must_use]
pub fn is_damage_spell(spell: &Item) -> bool {
    spell.is_spell()
        && (spell.effect == ItemEffect::Surge
            || matches!(spell.item_type, Attribute::Strength | Attribute::Magic))
}

/// Shield effect or stamina type: items that patch a creature up.
#[must_use]
pub fn is_shield_item(item: &Item) -> bool {
    item.effect == ItemEffect::Shield || item.item_type == Attribute::Stamina
}

const fn rarity_value_bonus(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Legendary => 50.0,
        Rarity::Epic => 30.0,
        Rarity::Rare => 15.0,
        Rarity::Common => 5.0,
    }
}

/// Worth of a creature when trading or protecting.
#[must_use]
pub fn creature_value(creature: &Creature) -> f64 {
    f64::from(creature.template.attributes.total())
        + f64::from(attack_power(creature)) * 2.0
        + rarity_value_bonus(creature.rarity())
        + f64::from(creature.form()) * 10.0
}

const ADVANTAGES: [(Attribute, Attribute); 5] = [
    (Attribute::Strength, Attribute::Stamina),
    (Attribute::Stamina, Attribute::Speed),
    (Attribute::Speed, Attribute::Magic),
    (Attribute::Magic, Attribute::Energy),
    (Attribute::Energy, Attribute::Strength),
];

/// Does the attacker lead in an attribute the defender is built around?
#[must_use]
pub fn has_type_advantage(attacker: &Creature, defender: &Creature) -> bool {
    ADVANTAGES.iter().any(|&(strong, weak)| {
        attacker.attribute(strong) > 7 && defender.attribute(weak) > 6
    })
}

const SYNERGIES: [(Attribute, Attribute, f64); 5] = [
    (Attribute::Strength, Attribute::Stamina, 1.5),
    (Attribute::Magic, Attribute::Energy, 1.5),
    (Attribute::Speed, Attribute::Strength, 1.0),
    (Attribute::Stamina, Attribute::Magic, 1.0),
    (Attribute::Energy, Attribute::Speed, 1.0),
];

/// How well `newcomer` fits alongside an existing field.
#[must_use]
pub fn field_synergy<'a>(newcomer: &Creature, field: impl IntoIterator<Item = &'a Creature>) -> f64 {
    let mut score = 0.0;
    for other in field {
        if newcomer.template.species == other.template.species {
            score += 2.0;
        }
        for &(mine, theirs, bonus) in &SYNERGIES {
            if newcomer.attribute(mine) > 7 && other.attribute(theirs) > 7 {
                score += bonus;
            }
        }
        let shared = newcomer
            .template
            .specialties
            .iter()
            .filter(|s| other.template.specialties.contains(s))
            .count();
        score += shared as f64 * 0.5;
    }
    score
}

const fn deploy_rarity_factor(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Legendary => 2.0,
        Rarity::Epic => 1.6,
        Rarity::Rare => 1.3,
        Rarity::Common => 1.0,
    }
}

/// Priority of deploying `creature` now, per energy spent.
#[must_use]
pub fn deployment_score(
    creature: &Creature,
    own_field: &[Creature],
    opponent_field: &[Creature],
    difficulty: Difficulty,
) -> f64 {
    let mut score = f64::from(creature.template.attributes.total()) * 2.0
        + f64::from(attack_power(creature)) * 3.0
        + f64::from(creature.battle_stats.max_health);
    score *= deploy_rarity_factor(creature.rarity());
    score *= 1.0 + f64::from(creature.form()) * 0.3;

    let advantages = opponent_field
        .iter()
        .filter(|opponent| has_type_advantage(creature, opponent))
        .count();
    score += advantages as f64 * 25.0;
    score += field_synergy(creature, own_field) * 10.0;

    let cost = creature.deployment_cost();
    score /= f64::from(cost);
    if difficulty.is_hard_or_above() && cost >= 5 {
        score *= 1.2;
    }
    score
}

const fn item_rarity_score(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Legendary => 40.0,
        Rarity::Epic => 30.0,
        Rarity::Rare => 20.0,
        Rarity::Common => 10.0,
    }
}

/// Fit of a defensive tool for a creature in trouble.
#[must_use]
pub fn defensive_tool_score(tool: &Item, creature: &Creature) -> f64 {
    let mut score = 0.0;
    if tool.effect == ItemEffect::Shield {
        score += (1.0 - creature.health_ratio()) * 100.0;
    }
    if tool.item_type == Attribute::Stamina && creature.attribute(Attribute::Stamina) > 7 {
        score += 50.0;
    }
    score + item_rarity_score(tool.rarity)
}

/// Casting aptitude: magic, plus a bonus when a specialty matches the spell.
#[must_use]
pub fn caster_score(caster: &Creature, spell: &Item) -> f64 {
    let mut score = f64::from(caster.attribute(Attribute::Magic));
    if caster.template.has_specialty(spell.item_type) {
        score += 5.0;
    }
    score
}

/// Value of casting `spell` from `caster` at `target`.
#[must_use]
pub fn spell_option_score(spell: &Item, caster: &Creature, target: &Creature, opponents: usize) -> f64 {
    let damage = estimate_spell_damage(spell, caster, target);
    let mut score = f64::from(damage) * 2.0;
    if damage >= target.current_health {
        score += 100.0;
    }
    score += f64::from(attack_power(target));
    if caster.template.has_specialty(Attribute::Magic) {
        score += 20.0;
    }
    if spell.effect == ItemEffect::Echo || spell.item_type == Attribute::Energy {
        score += opponents as f64 * 10.0;
    }
    score
}

/// How badly an opposing creature needs to go.
#[must_use]
pub fn target_priority(target: &Creature, weak: &[crate::core::CreatureId]) -> f64 {
    let ratio = target.health_ratio();
    let mut score = if ratio < 0.3 {
        100.0
    } else if ratio < 0.5 {
        50.0
    } else {
        0.0
    };
    score += f64::from(attack_power(target)) * 2.0;
    score += match target.rarity() {
        Rarity::Legendary => 40.0,
        Rarity::Epic => 25.0,
        Rarity::Common | Rarity::Rare => 0.0,
    };
    if weak.contains(&target.id) {
        score += 30.0;
    }
    score
}
