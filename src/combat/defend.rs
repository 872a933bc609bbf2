//! Defend resolution.

use serde::{Deserialize, Serialize};

use super::CombatContext;
use crate::creatures::{Creature, Rarity, StatKind};
use crate::effects::{ActiveEffect, EffectKind, StatModifiers};

pub const DEFENSIVE_STANCE: &str = "Defensive Stance";

/// Flat defense bonus on top of the percentage boost.
#[must_use]
pub const fn rarity_defend_bonus(rarity: Rarity) -> u32 {
    match rarity {
        Rarity::Common => 0,
        Rarity::Rare => 1,
        Rarity::Epic => 2,
        Rarity::Legendary => 3,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefendOutcome {
    pub physical_boost: u32,
    pub magical_boost: u32,
    pub log: String,
    pub diagnostic: Option<String>,
}

#[derive(Clone, Debug)]
pub struct DefendResolution {
    pub creature: Creature,
    pub outcome: DefendOutcome,
}

/// Put a creature in a defensive stance until its side's next effect tick.
///
/// The boost lives in a one-turn "Defensive Stance" effect, so the tick that
/// clears `is_defending` also removes exactly the delta granted here.
pub fn resolve_defend(creature: &Creature, ctx: &mut CombatContext<'_>) -> DefendResolution {
    if let Err(err) = creature.validate() {
        let reason = err.to_string();
        tracing::warn!(%reason, "defend skipped on malformed creature");
        return DefendResolution {
            creature: creature.clone(),
            outcome: DefendOutcome {
                physical_boost: 0,
                magical_boost: 0,
                log: format!("Invalid defend: {reason}"),
                diagnostic: Some(reason),
            },
        };
    }

    let mut creature = creature.clone();
    let pct = ctx.difficulty.defend_boost;
    let bonus = rarity_defend_bonus(creature.rarity());
    let boost = |defense: u32| (f64::from(defense) * pct).round() as u32 + bonus;
    let physical_boost = boost(creature.battle_stats.physical_defense);
    let magical_boost = boost(creature.battle_stats.magical_defense);

    let mut mods = StatModifiers::new();
    mods.add(StatKind::PhysicalDefense, physical_boost as i32);
    mods.add(StatKind::MagicalDefense, magical_boost as i32);
    creature.attach_effect(
        ActiveEffect::new(DEFENSIVE_STANCE, EffectKind::Defense, 1, ctx.turn)
            .with_modifiers(mods)
            .with_description("Braced for the next attack"),
    );
    creature.is_defending = true;

    let log = format!(
        "{} takes a defensive stance (+{} physical defense, +{} magical defense).",
        creature.name(),
        physical_boost,
        magical_boost
    );
    tracing::debug!(creature = %creature.id, physical_boost, magical_boost, "defend resolved");

    DefendResolution {
        creature,
        outcome: DefendOutcome {
            physical_boost,
            magical_boost,
            log,
            diagnostic: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BattleRng, CreatureId, Difficulty, DifficultyConfig};
    use crate::creatures::{Attributes, CreatureTemplate};
    use crate::effects::tick_creature;

    fn defend(rarity: Rarity, difficulty: Difficulty) -> (Creature, DefendResolution) {
        let creature = Creature::new(
            CreatureId(1),
            CreatureTemplate::new("Shellback", rarity, 0, Attributes::uniform(5)),
        );
        let config = DifficultyConfig::for_difficulty(difficulty);
        let mut rng = BattleRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, 2, &config);
        let result = resolve_defend(&creature, &mut ctx);
        (creature, result)
    }

    #[test]
    fn test_boost_scales_with_difficulty() {
        let (before, easy) = defend(Rarity::Common, Difficulty::Easy);
        let def = before.battle_stats.physical_defense;
        assert_eq!(easy.outcome.physical_boost, (f64::from(def) * 0.25).round() as u32);

        let (_, expert) = defend(Rarity::Common, Difficulty::Expert);
        assert!(expert.outcome.physical_boost > easy.outcome.physical_boost);
    }

    #[test]
    fn test_rarity_bonus_added() {
        let (before, result) = defend(Rarity::Legendary, Difficulty::Medium);
        let def = before.battle_stats.magical_defense;
        assert_eq!(result.outcome.magical_boost, (f64::from(def) * 0.3).round() as u32 + 3);
    }

    #[test]
    fn test_stance_removed_on_next_tick() {
        let (before, result) = defend(Rarity::Rare, Difficulty::Hard);
        let mut creature = result.creature;
        assert!(creature.is_defending);
        assert_eq!(
            creature.battle_stats.physical_defense,
            before.battle_stats.physical_defense + result.outcome.physical_boost
        );

        tick_creature(&mut creature, 3, 1.0);
        assert!(!creature.is_defending);
        assert!(creature.active_effects.is_empty());
        assert_eq!(creature.battle_stats, before.battle_stats);
    }
}
