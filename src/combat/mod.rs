//! Combat resolution: attacks, items, defend and defeat consequences.
//!
//! Resolvers are pure with respect to the battle: they take the creatures
//! involved by reference and return updated copies plus a typed outcome.
//! The caller writes the copies back and removes defeated creatures.
//!
//! Every resolver validates its inputs first. A malformed creature yields an
//! identity result carrying a diagnostic instead of an error, so one bad
//! record never stops a battle.
//!
//! ## Randomness
//!
//! All rolls go through `CombatContext`. `CombatRolls` can pin any roll to
//! a fixed value for deterministic scenarios and tests.

pub mod attack;
pub mod item;
pub mod defend;
pub mod defeat;

pub use attack::{
    effectiveness, resolve_attack, AttackOutcome, AttackResolution, DamageClass, Effectiveness,
};
pub use item::{
    item_power, resolve_spell, resolve_tool, PowerLevel, SpellOutcome, SpellResolution,
    ToolOutcome, ToolResolution,
};
pub use defend::{resolve_defend, DefendOutcome, DefendResolution};
pub use defeat::{defeat_effects, DefeatEffects};

use crate::core::{BattleRng, DifficultyConfig};

/// Optional fixed values for the random rolls of one resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CombatRolls {
    /// Damage variance multiplier (normally uniform in `[0.85, 1.15)`).
    pub variance: Option<f64>,
    pub critical: Option<bool>,
    pub dodge: Option<bool>,
    /// Secondary debuff rolls.
    pub secondary: Option<bool>,
}

impl CombatRolls {
    /// Every roll drawn from the RNG.
    #[must_use]
    pub const fn random() -> Self {
        Self {
            variance: None,
            critical: None,
            dodge: None,
            secondary: None,
        }
    }

    /// No crit, no dodge, no secondary effects, fixed variance.
    #[must_use]
    pub const fn fixed(variance: f64) -> Self {
        Self {
            variance: Some(variance),
            critical: Some(false),
            dodge: Some(false),
            secondary: Some(false),
        }
    }

    #[must_use]
    pub const fn with_critical(mut self, critical: bool) -> Self {
        self.critical = Some(critical);
        self
    }

    #[must_use]
    pub const fn with_dodge(mut self, dodge: bool) -> Self {
        self.dodge = Some(dodge);
        self
    }

    #[must_use]
    pub const fn with_secondary(mut self, secondary: bool) -> Self {
        self.secondary = Some(secondary);
        self
    }
}

/// Everything a resolver needs besides the creatures themselves.
#[derive(Debug)]
pub struct CombatContext<'a> {
    pub rng: &'a mut BattleRng,
    pub turn: u32,
    pub difficulty: &'a DifficultyConfig,
    pub rolls: CombatRolls,
}

impl<'a> CombatContext<'a> {
    #[must_use]
    pub fn new(rng: &'a mut BattleRng, turn: u32, difficulty: &'a DifficultyConfig) -> Self {
        Self {
            rng,
            turn,
            difficulty,
            rolls: CombatRolls::random(),
        }
    }

    #[must_use]
    pub fn with_rolls(mut self, rolls: CombatRolls) -> Self {
        self.rolls = rolls;
        self
    }

    /// Damage variance in `[0.85, 1.15)`.
    pub fn variance(&mut self) -> f64 {
        match self.rolls.variance {
            Some(v) => v,
            None => self.rng.gen_between(0.85, 1.15),
        }
    }

    /// Roll against a percentage chance (`roll·100 ≤ chance`).
    fn percent_roll(&mut self, fixed: Option<bool>, chance_percent: u32) -> bool {
        match fixed {
            Some(result) => result,
            None => self.rng.gen_unit() * 100.0 <= f64::from(chance_percent),
        }
    }

    pub fn roll_critical(&mut self, chance_percent: u32) -> bool {
        self.percent_roll(self.rolls.critical, chance_percent)
    }

    pub fn roll_dodge(&mut self, chance_percent: u32) -> bool {
        self.percent_roll(self.rolls.dodge, chance_percent)
    }

    /// Roll for a secondary debuff with the given probability.
    pub fn roll_secondary(&mut self, probability: f64) -> bool {
        match self.rolls.secondary {
            Some(result) => result,
            None => self.rng.gen_bool(probability),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Difficulty;

    #[test]
    fn test_fixed_rolls_bypass_rng() {
        let mut rng = BattleRng::new(1);
        let config = DifficultyConfig::for_difficulty(Difficulty::Easy);
        let mut ctx = CombatContext::new(&mut rng, 1, &config)
            .with_rolls(CombatRolls::fixed(1.0).with_critical(true));

        assert_eq!(ctx.variance(), 1.0);
        assert!(ctx.roll_critical(0));
        assert!(!ctx.roll_dodge(100));
        assert!(!ctx.roll_secondary(1.0));
    }

    #[test]
    fn test_random_rolls_respect_chance() {
        let mut rng = BattleRng::new(2);
        let config = DifficultyConfig::for_difficulty(Difficulty::Easy);
        let mut ctx = CombatContext::new(&mut rng, 1, &config);

        for _ in 0..100 {
            assert!(ctx.roll_critical(100));
            let v = ctx.variance();
            assert!((0.85..1.15).contains(&v));
        }
    }
}
