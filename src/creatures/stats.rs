//! Stat derivation: base attributes to combat stats.
//!
//! ## Derivation
//!
//! Each raw stat is a base value plus weighted attribute contributions,
//! scaled by evolution form (`1 + 0.25·form`), rarity and combination level.
//! Specialty tags amplify their attribute's contribution. A square-root
//! soft cap then compresses values above a per-stat threshold up to a hard
//! ceiling.
//!
//! Deployment cost is not derived from attributes. It is always `5 + form`.
//!
//! ## Modifiers
//!
//! Battle stats are never edited in place. `BattleStats::with_modifiers`
//! rebuilds them from the derived baseline plus the live effect deltas, so
//! removing an effect removes exactly its contribution.

use serde::{Deserialize, Serialize};

use super::attributes::{specialty_multiplier, Attribute};
use super::creature::CreatureTemplate;
use crate::effects::StatModifiers;

/// A modifiable combat stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatKind {
    PhysicalAttack,
    MagicalAttack,
    PhysicalDefense,
    MagicalDefense,
    MaxHealth,
    Initiative,
    CriticalChance,
    DodgeChance,
}

impl StatKind {
    pub const ALL: [StatKind; 8] = [
        StatKind::PhysicalAttack,
        StatKind::MagicalAttack,
        StatKind::PhysicalDefense,
        StatKind::MagicalDefense,
        StatKind::MaxHealth,
        StatKind::Initiative,
        StatKind::CriticalChance,
        StatKind::DodgeChance,
    ];

    /// Lowest value a modified stat may reach.
    #[must_use]
    pub const fn floor(self) -> u32 {
        match self {
            StatKind::PhysicalAttack
            | StatKind::MagicalAttack
            | StatKind::PhysicalDefense
            | StatKind::MagicalDefense => 1,
            StatKind::MaxHealth => 10,
            StatKind::Initiative | StatKind::CriticalChance | StatKind::DodgeChance => 0,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            StatKind::PhysicalAttack => "physical attack",
            StatKind::MagicalAttack => "magical attack",
            StatKind::PhysicalDefense => "physical defense",
            StatKind::MagicalDefense => "magical defense",
            StatKind::MaxHealth => "max health",
            StatKind::Initiative => "initiative",
            StatKind::CriticalChance => "critical chance",
            StatKind::DodgeChance => "dodge chance",
        }
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived combat stats of a creature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleStats {
    pub physical_attack: u32,
    pub magical_attack: u32,
    pub physical_defense: u32,
    pub magical_defense: u32,
    pub max_health: u32,
    pub initiative: u32,
    pub critical_chance: u32,
    pub dodge_chance: u32,
    /// Deployment cost. Always `5 + form`.
    pub energy_cost: u32,
}

impl BattleStats {
    #[must_use]
    pub const fn get(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::PhysicalAttack => self.physical_attack,
            StatKind::MagicalAttack => self.magical_attack,
            StatKind::PhysicalDefense => self.physical_defense,
            StatKind::MagicalDefense => self.magical_defense,
            StatKind::MaxHealth => self.max_health,
            StatKind::Initiative => self.initiative,
            StatKind::CriticalChance => self.critical_chance,
            StatKind::DodgeChance => self.dodge_chance,
        }
    }

    pub fn get_mut(&mut self, stat: StatKind) -> &mut u32 {
        match stat {
            StatKind::PhysicalAttack => &mut self.physical_attack,
            StatKind::MagicalAttack => &mut self.magical_attack,
            StatKind::PhysicalDefense => &mut self.physical_defense,
            StatKind::MagicalDefense => &mut self.magical_defense,
            StatKind::MaxHealth => &mut self.max_health,
            StatKind::Initiative => &mut self.initiative,
            StatKind::CriticalChance => &mut self.critical_chance,
            StatKind::DodgeChance => &mut self.dodge_chance,
        }
    }

    /// Higher of the two attack stats.
    #[must_use]
    pub fn power(&self) -> u32 {
        self.physical_attack.max(self.magical_attack)
    }

    /// Baseline plus effect deltas, clamped to each stat's floor.
    #[must_use]
    pub fn with_modifiers(&self, modifiers: &StatModifiers) -> Self {
        let mut stats = *self;
        for (stat, delta) in modifiers.iter() {
            let value = i64::from(stats.get(stat)) + i64::from(delta);
            *stats.get_mut(stat) = value.max(i64::from(stat.floor())) as u32;
        }
        stats
    }
}

// =============================================================================
// Derivation
// =============================================================================

/// Square-root soft cap: linear up to `soft`, then `soft + √excess·5`,
/// never above `hard`.
#[must_use]
pub fn soft_cap(value: f64, soft: f64, hard: f64) -> f64 {
    if value <= soft {
        value
    } else {
        (soft + (value - soft).sqrt() * 5.0).min(hard)
    }
}

/// Deployment cost of a creature of the given form.
#[must_use]
pub const fn deployment_cost(form: u8) -> u32 {
    5 + form as u32
}

fn round_stat(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Derive combat stats from a creature template.
#[must_use]
pub fn derive_stats(template: &CreatureTemplate) -> BattleStats {
    let attrs = &template.attributes;
    let spec = |attribute: Attribute| specialty_multiplier(&template.specialties, attribute);
    let a = |attribute: Attribute| f64::from(attrs.get(attribute));

    let form_mult = 1.0 + 0.25 * f64::from(template.form);
    let combo_mult = 1.0 + 0.1 * f64::from(template.combination_level);
    let rarity_mult = template.rarity.stat_multiplier();
    let scale = form_mult * combo_mult * rarity_mult;

    let physical_attack = (10.0
        + a(Attribute::Strength) * 2.5 * spec(Attribute::Strength)
        + a(Attribute::Speed) * 0.5)
        * scale;
    let magical_attack = (10.0
        + a(Attribute::Magic) * 2.5 * spec(Attribute::Magic)
        + a(Attribute::Energy) * 0.5)
        * scale;
    let physical_defense = (5.0
        + a(Attribute::Stamina) * 2.0 * spec(Attribute::Stamina)
        + a(Attribute::Strength) * 0.5)
        * scale;
    let magical_defense = (5.0
        + a(Attribute::Energy) * 2.0 * spec(Attribute::Energy)
        + a(Attribute::Magic) * 0.5)
        * scale;
    let max_health = (50.0
        + a(Attribute::Stamina) * 4.0 * spec(Attribute::Stamina)
        + a(Attribute::Energy) * 1.5)
        * scale;
    // Initiative ignores rarity.
    let initiative = (10.0
        + a(Attribute::Speed) * 2.5 * spec(Attribute::Speed)
        + a(Attribute::Energy) * 0.3)
        * form_mult
        * combo_mult;

    let critical_chance = (5.0
        + a(Attribute::Speed) * 0.6 * spec(Attribute::Speed)
        + a(Attribute::Magic) * 0.2)
        .min(30.0);
    let dodge_chance = (3.0
        + a(Attribute::Speed) * 0.4 * spec(Attribute::Speed)
        + a(Attribute::Stamina) * 0.1)
        .min(20.0);

    BattleStats {
        physical_attack: round_stat(soft_cap(physical_attack, 60.0, 120.0)),
        magical_attack: round_stat(soft_cap(magical_attack, 60.0, 120.0)),
        physical_defense: round_stat(soft_cap(physical_defense, 40.0, 80.0)),
        magical_defense: round_stat(soft_cap(magical_defense, 40.0, 80.0)),
        max_health: round_stat(soft_cap(max_health, 200.0, 400.0)),
        initiative: round_stat(soft_cap(initiative, 40.0, 60.0)),
        critical_chance: round_stat(critical_chance),
        dodge_chance: round_stat(dodge_chance),
        energy_cost: deployment_cost(template.form),
    }
}

// =============================================================================
// Ratings
// =============================================================================

/// Exponential soft cap used for effect-modified display stats.
#[must_use]
pub fn taper(value: f64, soft: f64, hard: f64) -> u32 {
    if value <= soft {
        return round_stat(value);
    }
    let span = hard - soft;
    round_stat(soft + span * (1.0 - (-(value - soft) / span).exp()))
}

/// Effect-modified stats as shown to players, with large values tapered.
#[must_use]
pub fn effective_stats(stats: &BattleStats) -> BattleStats {
    let mut shown = *stats;
    shown.physical_attack = taper(f64::from(stats.physical_attack), 80.0, 150.0);
    shown.magical_attack = taper(f64::from(stats.magical_attack), 80.0, 150.0);
    shown.physical_defense = taper(f64::from(stats.physical_defense), 60.0, 100.0);
    shown.magical_defense = taper(f64::from(stats.magical_defense), 60.0, 100.0);
    shown.max_health = taper(f64::from(stats.max_health), 250.0, 500.0);
    shown
}

/// Overall strength estimate used by board analysis and buff targeting.
#[must_use]
pub fn creature_power(template: &CreatureTemplate, stats: &BattleStats) -> f64 {
    f64::from(stats.power()) * 2.0
        + f64::from(stats.physical_defense.max(stats.magical_defense))
        + f64::from(stats.max_health) * 0.1
        + f64::from(stats.initiative + stats.critical_chance + stats.dodge_chance) * 0.5
        + f64::from(template.form) * 5.0
        + f64::from(template.rarity.value()) * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creatures::{Attributes, Rarity};
    use smallvec::smallvec;

    fn template(attrs: Attributes) -> CreatureTemplate {
        CreatureTemplate::new("Testling", Rarity::Common, 0, attrs)
    }

    #[test]
    fn test_baseline_common() {
        let stats = derive_stats(&template(Attributes::uniform(5)));

        assert_eq!(stats.physical_attack, 25);
        assert_eq!(stats.magical_attack, 25);
        assert_eq!(stats.physical_defense, 18);
        assert_eq!(stats.magical_defense, 18);
        assert_eq!(stats.max_health, 78);
        assert_eq!(stats.initiative, 24);
        assert_eq!(stats.critical_chance, 9);
        assert_eq!(stats.dodge_chance, 6);
        assert_eq!(stats.energy_cost, 5);
    }

    #[test]
    fn test_specialty_amplifies() {
        let plain = derive_stats(&template(Attributes::uniform(5)));
        let tagged = derive_stats(
            &template(Attributes::uniform(5)).with_specialties(smallvec![Attribute::Strength]),
        );

        // 10 + 5·2.5·1.8 + 2.5 = 35
        assert_eq!(tagged.physical_attack, 35);
        assert!(tagged.physical_attack > plain.physical_attack);
        assert_eq!(tagged.magical_attack, plain.magical_attack);
    }

    #[test]
    fn test_soft_cap() {
        assert_eq!(soft_cap(50.0, 60.0, 120.0), 50.0);
        let capped = soft_cap(100.0, 60.0, 120.0);
        assert!((capped - (60.0 + 40f64.sqrt() * 5.0)).abs() < 1e-9);
        assert_eq!(soft_cap(10_000.0, 60.0, 120.0), 120.0);
    }

    #[test]
    fn test_hard_caps_hold_for_extreme_input() {
        let mut t = CreatureTemplate::new("Titan", Rarity::Legendary, 3, Attributes::uniform(40))
            .with_specialties(smallvec![Attribute::Strength]);
        t.combination_level = 2;
        let stats = derive_stats(&t);

        assert!(stats.physical_attack <= 120);
        assert!(stats.physical_defense <= 80);
        assert!(stats.max_health <= 400);
        assert!(stats.initiative <= 60);
        assert!(stats.critical_chance <= 30);
        assert!(stats.dodge_chance <= 20);
    }

    #[test]
    fn test_cost_ignores_attributes() {
        for form in 0..=3u8 {
            let weak = CreatureTemplate::new("a", Rarity::Common, form, Attributes::uniform(1));
            let strong = CreatureTemplate::new("b", Rarity::Legendary, form, Attributes::uniform(15));
            assert_eq!(derive_stats(&weak).energy_cost, 5 + u32::from(form));
            assert_eq!(derive_stats(&strong).energy_cost, 5 + u32::from(form));
        }
    }

    #[test]
    fn test_form_scales_stats() {
        let f0 = derive_stats(&CreatureTemplate::new("a", Rarity::Common, 0, Attributes::uniform(5)));
        let f2 = derive_stats(&CreatureTemplate::new("a", Rarity::Common, 2, Attributes::uniform(5)));
        assert!(f2.physical_attack > f0.physical_attack);
        assert!(f2.max_health > f0.max_health);
    }

    #[test]
    fn test_with_modifiers_floors() {
        let stats = derive_stats(&template(Attributes::uniform(5)));
        let mut mods = StatModifiers::new();
        mods.add(StatKind::PhysicalAttack, -1000);
        mods.add(StatKind::MaxHealth, -1000);
        mods.add(StatKind::DodgeChance, -1000);
        mods.add(StatKind::MagicalAttack, 7);

        let modified = stats.with_modifiers(&mods);
        assert_eq!(modified.physical_attack, 1);
        assert_eq!(modified.max_health, 10);
        assert_eq!(modified.dodge_chance, 0);
        assert_eq!(modified.magical_attack, stats.magical_attack + 7);
        assert_eq!(modified.energy_cost, stats.energy_cost);
    }

    #[test]
    fn test_taper() {
        assert_eq!(taper(70.0, 80.0, 150.0), 70);
        let high = taper(500.0, 80.0, 150.0);
        assert!(high > 80 && high <= 150);
    }

    #[test]
    fn test_power_grows_with_rarity() {
        let common = template(Attributes::uniform(6));
        let mut legendary = common.clone();
        legendary.rarity = Rarity::Legendary;

        let (cs, ls) = (derive_stats(&common), derive_stats(&legendary));
        assert!(creature_power(&legendary, &ls) > creature_power(&common, &cs));
        assert!(creature_power(&legendary, &ls) - creature_power(&common, &cs) > 30.0);
    }
}
