//! Per-side energy pool.
//!
//! ## Costs
//!
//! | Action | Cost |
//! |--------|------|
//! | deploy | 5 + form |
//! | attack | 2 |
//! | defend | 1 |
//! | spell  | 4 |
//! | tool   | 0 |
//!
//! ## Turn cycle
//!
//! Every spend adds `floor(cost / 5)` to momentum. At the side's turn start
//! `regenerate` adds the base regen, the field's energy contribution and
//! `floor(momentum / 10)`, then resets momentum. At turn end `decay` trims
//! any hoard above the threshold by 10%.
//!
//! Energy stays within `[0, max_energy(field size)]` after every call.

use serde::{Deserialize, Serialize};

use crate::core::{ActionError, DifficultyConfig, IntentKind};
use crate::creatures::{Attribute, Creature};

pub const ATTACK_COST: u32 = 2;
pub const DEFEND_COST: u32 = 1;
pub const SPELL_COST: u32 = 4;
pub const TOOL_COST: u32 = 0;

/// Energy per point of momentum bonus.
const MOMENTUM_PER_BONUS: u32 = 10;
/// Spend per point of momentum.
const SPEND_PER_MOMENTUM: u32 = 5;
/// Regen granted per energy-specialist creature on the field.
const SPECIALIST_BONUS: f64 = 0.5;

/// Flat cost of an action kind. Deployment depends on the creature's form;
/// use `Creature::deployment_cost` for it.
#[must_use]
pub const fn action_cost(kind: IntentKind) -> u32 {
    match kind {
        IntentKind::Attack => ATTACK_COST,
        IntentKind::Defend => DEFEND_COST,
        IntentKind::UseSpell => SPELL_COST,
        IntentKind::UseTool | IntentKind::EndTurn => TOOL_COST,
        IntentKind::Deploy => crate::creatures::deployment_cost(0),
    }
}

/// Energy cap for a field of `field_size` creatures.
#[must_use]
pub fn max_energy(config: &DifficultyConfig, field_size: usize) -> u32 {
    config.base_max_energy + (field_size as f64 * 0.25).floor() as u32
}

/// Regeneration from the base rate and the field, before momentum.
#[must_use]
pub fn field_regen<'a, I>(config: &DifficultyConfig, field: I) -> u32
where
    I: IntoIterator<Item = &'a Creature>,
{
    let mut total = f64::from(config.energy_regen);
    for creature in field {
        let energy = f64::from(creature.attribute(Attribute::Energy));
        let form = 1.0 + 0.05 * f64::from(creature.form());
        total += energy * 0.1 * creature.rarity().stat_multiplier() * form;
        if creature.template.has_specialty(Attribute::Energy) {
            total += SPECIALIST_BONUS;
        }
    }
    total.round() as u32
}

/// What one regeneration did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenReport {
    /// Energy actually added after clamping.
    pub gained: u32,
    pub momentum_bonus: u32,
    pub max_energy: u32,
}

/// Energy and momentum for one side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnergyLedger {
    energy: u32,
    momentum: u32,
}

impl EnergyLedger {
    /// ```
    /// use creature_battle::energy::EnergyLedger;
    ///
    /// let mut ledger = EnergyLedger::new(10);
    /// ledger.spend(6).unwrap();
    /// assert_eq!(ledger.energy(), 4);
    /// assert_eq!(ledger.momentum(), 1);
    /// ```
    #[must_use]
    pub const fn new(energy: u32) -> Self {
        Self { energy, momentum: 0 }
    }

    #[must_use]
    pub const fn energy(&self) -> u32 {
        self.energy
    }

    #[must_use]
    pub const fn momentum(&self) -> u32 {
        self.momentum
    }

    #[must_use]
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.energy >= cost
    }

    /// Deduct `cost`, or reject without change when short.
    pub fn spend(&mut self, cost: u32) -> Result<u32, ActionError> {
        if !self.can_afford(cost) {
            return Err(ActionError::InsufficientEnergy {
                needed: cost,
                available: self.energy,
            });
        }
        self.energy -= cost;
        self.momentum += cost / SPEND_PER_MOMENTUM;
        Ok(self.energy)
    }

    /// Turn-start regeneration. Resets momentum.
    pub fn regenerate<'a, I>(&mut self, config: &DifficultyConfig, field: I) -> RegenReport
    where
        I: IntoIterator<Item = &'a Creature>,
    {
        let field: Vec<&Creature> = field.into_iter().collect();
        let cap = max_energy(config, field.len());
        let momentum_bonus = self.momentum / MOMENTUM_PER_BONUS;
        let amount = field_regen(config, field.iter().copied()) + momentum_bonus;

        let before = self.energy;
        self.energy = (self.energy + amount).min(cap);
        self.momentum = 0;

        tracing::debug!(amount, momentum_bonus, energy = self.energy, cap, "energy regenerated");
        RegenReport {
            gained: self.energy.saturating_sub(before),
            momentum_bonus,
            max_energy: cap,
        }
    }

    /// Turn-end decay: above `threshold`, lose 10% rounded down.
    pub fn decay(&mut self, threshold: u32) -> u32 {
        if self.energy <= threshold {
            return 0;
        }
        let lost = (f64::from(self.energy) * 0.1).floor() as u32;
        self.energy -= lost;
        lost
    }

    /// Clamp to the cap for the current field.
    pub fn clamp_to(&mut self, cap: u32) {
        self.energy = self.energy.min(cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CreatureId, Difficulty};
    use crate::creatures::{Attributes, CreatureTemplate, Rarity, SpecialtyTags};

    fn creature(energy: u32, rarity: Rarity, form: u8, specialist: bool) -> Creature {
        let mut template = CreatureTemplate::new(
            "Voltspire",
            rarity,
            form,
            Attributes::uniform(5).with(Attribute::Energy, energy),
        );
        if specialist {
            let mut tags = SpecialtyTags::new();
            tags.push(Attribute::Energy);
            template = template.with_specialties(tags);
        }
        Creature::new(CreatureId(1), template)
    }

    #[test]
    fn test_costs() {
        assert_eq!(action_cost(IntentKind::Attack), 2);
        assert_eq!(action_cost(IntentKind::Defend), 1);
        assert_eq!(action_cost(IntentKind::UseSpell), 4);
        assert_eq!(action_cost(IntentKind::UseTool), 0);
        assert_eq!(creature(5, Rarity::Epic, 3, false).deployment_cost(), 8);
    }

    #[test]
    fn test_spend_rejects_without_change() {
        let mut ledger = EnergyLedger::new(3);
        let err = ledger.spend(4).unwrap_err();
        assert_eq!(err, ActionError::InsufficientEnergy { needed: 4, available: 3 });
        assert_eq!(ledger, EnergyLedger::new(3));
    }

    #[test]
    fn test_momentum_accumulates() {
        let mut ledger = EnergyLedger::new(30);
        ledger.spend(2).unwrap();
        ledger.spend(4).unwrap();
        assert_eq!(ledger.momentum(), 0);
        ledger.spend(8).unwrap();
        ledger.spend(10).unwrap();
        assert_eq!(ledger.momentum(), 3);
    }

    #[test]
    fn test_decay_scenario() {
        let mut ledger = EnergyLedger::new(12);
        assert_eq!(ledger.decay(10), 1);
        assert_eq!(ledger.energy(), 11);

        let mut low = EnergyLedger::new(10);
        assert_eq!(low.decay(10), 0);
        assert_eq!(low.energy(), 10);
    }

    #[test]
    fn test_max_energy_scales_with_field() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        assert_eq!(max_energy(&config, 0), 15);
        assert_eq!(max_energy(&config, 3), 15);
        assert_eq!(max_energy(&config, 4), 16);
    }

    #[test]
    fn test_field_regen() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Easy);
        let empty: [&Creature; 0] = [];
        assert_eq!(field_regen(&config, empty), 2);

        // 2 + 10·0.1·1.0·1.0 + 0.5 = 3.5 -> 4
        let specialist = creature(10, Rarity::Common, 0, true);
        assert_eq!(field_regen(&config, [&specialist]), 4);

        // 2 + 10·0.1·1.3·1.15 = 3.495 -> 3
        let legend = creature(10, Rarity::Legendary, 3, false);
        assert_eq!(field_regen(&config, [&legend]), 3);
    }

    #[test]
    fn test_regenerate_adds_momentum_and_resets() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let mut ledger = EnergyLedger::new(40);
        for _ in 0..10 {
            ledger.spend(3).unwrap();
        }
        ledger.spend(5).unwrap();
        assert_eq!(ledger.momentum(), 1);

        let mut ledger = EnergyLedger { energy: 0, momentum: 12 };
        let empty: [&Creature; 0] = [];
        let report = ledger.regenerate(&config, empty);
        assert_eq!(report.momentum_bonus, 1);
        assert_eq!(report.gained, 4);
        assert_eq!(ledger.momentum(), 0);
    }

    #[test]
    fn test_regenerate_respects_cap() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Easy);
        let mut ledger = EnergyLedger::new(11);
        let empty: [&Creature; 0] = [];
        let report = ledger.regenerate(&config, empty);
        assert_eq!(ledger.energy(), 12);
        assert_eq!(report.gained, 1);
        assert_eq!(report.max_energy, 12);
    }
}
