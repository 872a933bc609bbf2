//! Creature templates and battle instances.
//!
//! A `CreatureTemplate` is the static identity of a creature: species,
//! rarity, form, attributes and specialties. A `Creature` is one template
//! brought into a battle, with derived stats, health, defend flag and the
//! live effect list.

use serde::{Deserialize, Serialize};

use super::attributes::{Attribute, Attributes, Rarity, SpecialtyTags};
use super::stats::{creature_power, derive_stats, effective_stats, BattleStats};
use crate::core::CreatureId;
use crate::effects::{ActiveEffect, EffectId, StatModifiers};

/// Highest evolution form.
pub const MAX_FORM: u8 = 3;

/// Reasons a creature record fails boundary validation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum CreatureError {
    #[error("{name}: form {form} is above the maximum of {MAX_FORM}")]
    InvalidForm { name: String, form: u8 },

    #[error("{name}: {count} specialty tags, at most 2 allowed")]
    TooManySpecialties { name: String, count: usize },

    #[error("{name}: battle stats are missing (max health is 0)")]
    MissingStats { name: String },

    #[error("{name}: health {health} exceeds max health {max}")]
    HealthOutOfRange { name: String, health: u32, max: u32 },
}

/// Static creature definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub species: String,
    pub rarity: Rarity,
    /// Evolution form, 0-3.
    pub form: u8,
    pub attributes: Attributes,
    #[serde(default)]
    pub specialties: SpecialtyTags,
    /// Combination level (0 when never combined).
    #[serde(default)]
    pub combination_level: u8,
}

impl CreatureTemplate {
    #[must_use]
    pub fn new(species: impl Into<String>, rarity: Rarity, form: u8, attributes: Attributes) -> Self {
        Self {
            species: species.into(),
            rarity,
            form,
            attributes,
            specialties: SpecialtyTags::new(),
            combination_level: 0,
        }
    }

    #[must_use]
    pub fn with_specialties(mut self, specialties: SpecialtyTags) -> Self {
        self.specialties = specialties;
        self
    }

    #[must_use]
    pub fn with_combination_level(mut self, level: u8) -> Self {
        self.combination_level = level;
        self
    }

    #[must_use]
    pub fn has_specialty(&self, attribute: Attribute) -> bool {
        self.specialties.contains(&attribute)
    }

    /// Check the record can safely enter a battle.
    pub fn validate(&self) -> Result<(), CreatureError> {
        if self.form > MAX_FORM {
            return Err(CreatureError::InvalidForm {
                name: self.species.clone(),
                form: self.form,
            });
        }
        if self.specialties.len() > 2 {
            return Err(CreatureError::TooManySpecialties {
                name: self.species.clone(),
                count: self.specialties.len(),
            });
        }
        Ok(())
    }
}

/// A creature taking part in a battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub template: CreatureTemplate,
    /// Stats derived from the template alone.
    pub base_stats: BattleStats,
    /// Base stats plus live effect deltas.
    pub battle_stats: BattleStats,
    pub current_health: u32,
    pub is_defending: bool,
    pub active_effects: Vec<ActiveEffect>,
    /// One-shot bonus added to the next attack (from completed charges).
    pub next_attack_bonus: Option<u32>,
    next_effect_seq: u32,
}

impl Creature {
    /// Bring a template into battle at full health.
    #[must_use]
    pub fn new(id: CreatureId, template: CreatureTemplate) -> Self {
        let base_stats = derive_stats(&template);
        Self {
            id,
            template,
            base_stats,
            battle_stats: base_stats,
            current_health: base_stats.max_health,
            is_defending: false,
            active_effects: Vec::new(),
            next_attack_bonus: None,
            next_effect_seq: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.template.species
    }

    #[must_use]
    pub fn form(&self) -> u8 {
        self.template.form
    }

    #[must_use]
    pub fn rarity(&self) -> Rarity {
        self.template.rarity
    }

    #[must_use]
    pub fn attribute(&self, attribute: Attribute) -> u32 {
        self.template.attributes.get(attribute)
    }

    /// Deployment cost. Always `5 + form`.
    #[must_use]
    pub fn deployment_cost(&self) -> u32 {
        super::stats::deployment_cost(self.template.form)
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.current_health == 0
    }

    /// Current health over max health, in `[0, 1]`.
    #[must_use]
    pub fn health_ratio(&self) -> f64 {
        if self.battle_stats.max_health == 0 {
            return 0.0;
        }
        f64::from(self.current_health) / f64::from(self.battle_stats.max_health)
    }

    /// Overall strength of the creature as it currently stands.
    #[must_use]
    pub fn power(&self) -> f64 {
        creature_power(&self.template, &self.battle_stats)
    }

    /// Live stats as shown to players, large values tapered.
    #[must_use]
    pub fn effective_stats(&self) -> BattleStats {
        effective_stats(&self.battle_stats)
    }

    /// Sum of the deltas currently in force from all live effects.
    #[must_use]
    pub fn effect_modifiers(&self) -> StatModifiers {
        let mut total = StatModifiers::new();
        for effect in &self.active_effects {
            total.merge(&effect.in_force);
        }
        total
    }

    /// Rebuild battle stats from base stats and the live effect list, then
    /// clamp health to the new maximum.
    pub fn recompute_stats(&mut self) {
        self.battle_stats = self.base_stats.with_modifiers(&self.effect_modifiers());
        self.current_health = self.current_health.min(self.battle_stats.max_health);
    }

    /// Attach an effect, assigning it a creature-local id, and recompute.
    pub fn attach_effect(&mut self, mut effect: ActiveEffect) -> EffectId {
        let id = EffectId::new(self.id, self.next_effect_seq);
        self.next_effect_seq += 1;
        effect.id = id;
        self.active_effects.push(effect);
        self.recompute_stats();
        id
    }

    /// Lower health by `amount`, saturating at 0. Returns the damage taken.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.current_health);
        self.current_health -= taken;
        taken
    }

    /// Raise health by `amount`, capped at max. Returns the health restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_health;
        self.current_health = (self.current_health + amount).min(self.battle_stats.max_health);
        self.current_health - before
    }

    /// Apply a signed health change, clamped to `[0, max_health]`.
    pub fn apply_health_delta(&mut self, delta: i64) {
        let next = (i64::from(self.current_health) + delta)
            .clamp(0, i64::from(self.battle_stats.max_health));
        self.current_health = next as u32;
    }

    /// Take the pending charge bonus, leaving none.
    pub fn consume_attack_bonus(&mut self) -> u32 {
        self.next_attack_bonus.take().unwrap_or(0)
    }

    /// Add to the pending charge bonus.
    pub fn grant_attack_bonus(&mut self, amount: u32) {
        self.next_attack_bonus = Some(self.next_attack_bonus.unwrap_or(0) + amount);
    }

    /// Boundary validation for resolver inputs.
    pub fn validate(&self) -> Result<(), CreatureError> {
        self.template.validate()?;
        if self.battle_stats.max_health == 0 {
            return Err(CreatureError::MissingStats {
                name: self.template.species.clone(),
            });
        }
        if self.current_health > self.battle_stats.max_health {
            return Err(CreatureError::HealthOutOfRange {
                name: self.template.species.clone(),
                health: self.current_health,
                max: self.battle_stats.max_health,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creatures::StatKind;
    use crate::effects::EffectKind;

    fn creature() -> Creature {
        Creature::new(
            CreatureId(1),
            CreatureTemplate::new("Pyrefox", Rarity::Common, 0, Attributes::uniform(5)),
        )
    }

    #[test]
    fn test_new_at_full_health() {
        let c = creature();
        assert_eq!(c.current_health, c.battle_stats.max_health);
        assert_eq!(c.deployment_cost(), 5);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut c = creature();
        let max = c.battle_stats.max_health;

        assert_eq!(c.take_damage(max + 50), max);
        assert!(c.is_defeated());
        assert_eq!(c.heal(max * 2), max);
        c.apply_health_delta(-5);
        assert_eq!(c.current_health, max - 5);
        c.apply_health_delta(1000);
        assert_eq!(c.current_health, max);
    }

    #[test]
    fn test_effect_contribution_is_removable() {
        let mut c = creature();
        let base = c.battle_stats;

        let mut mods = StatModifiers::new();
        mods.add(StatKind::PhysicalDefense, 6);
        c.attach_effect(ActiveEffect::new("Guard", EffectKind::Buff, 2, 1).with_modifiers(mods));
        assert_eq!(c.battle_stats.physical_defense, base.physical_defense + 6);

        c.active_effects.clear();
        c.recompute_stats();
        assert_eq!(c.battle_stats, base);
    }

    #[test]
    fn test_effect_ids_are_unique() {
        let mut c = creature();
        let a = c.attach_effect(ActiveEffect::new("A", EffectKind::Buff, 1, 1));
        let b = c.attach_effect(ActiveEffect::new("B", EffectKind::Buff, 1, 1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_max_health_drop_clamps_health() {
        let mut c = creature();
        let mut mods = StatModifiers::new();
        mods.add(StatKind::MaxHealth, -30);
        c.attach_effect(ActiveEffect::new("Wither", EffectKind::Debuff, 2, 1).with_modifiers(mods));
        assert_eq!(c.current_health, c.battle_stats.max_health);
    }

    #[test]
    fn test_attack_bonus_consumed_once() {
        let mut c = creature();
        c.grant_attack_bonus(10);
        c.grant_attack_bonus(5);
        assert_eq!(c.consume_attack_bonus(), 15);
        assert_eq!(c.consume_attack_bonus(), 0);
    }

    #[test]
    fn test_validation() {
        let mut c = creature();
        c.template.form = 7;
        assert!(matches!(c.validate(), Err(CreatureError::InvalidForm { .. })));

        let mut c = creature();
        c.battle_stats.max_health = 0;
        c.current_health = 0;
        assert!(matches!(c.validate(), Err(CreatureError::MissingStats { .. })));
    }
}
