//! Consumable tools and spells.
//!
//! Every item has a type attribute, an effect kind and a rarity. The kind
//! decides the shape of its effect; the type decides which stats it targets.
//! `tool_profile` and `spell_profile` return the declared, unscaled effect;
//! `combat::item` scales and applies it.
//!
//! | Kind   | Tool                                  | Spell                                     |
//! |--------|---------------------------------------|-------------------------------------------|
//! | Surge  | +6 primary stats, 2 turns             | 25 + 2·magic damage                        |
//! | Shield | +5 defenses, heal 10, 3 turns         | +6 defenses, heal 20 on self, 3 turns     |
//! | Echo   | +3 primary, +4 HoT, 4 turns (fading)  | 10 + magic damage, −5 HoT, 3 turns        |
//! | Drain  | +4 attacks, −2 defenses, 3 turns      | 15 + magic damage, half self-heal, drain 3 |
//! | Charge | charge 3 turns, +4, burst 15          | charge 2 turns, +3, burst 20 + magic      |

use serde::{Deserialize, Serialize};

use super::effect::{ChargeSpec, EffectKind};
use super::modifiers::StatModifiers;
use crate::core::ItemId;
use crate::creatures::{Attribute, Rarity, StatKind};

/// Tool or spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Free to use, targets an own creature.
    Tool,
    /// Costs energy, cast by an own creature on any creature.
    Spell,
}

/// What an item does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemEffect {
    Surge,
    Shield,
    Echo,
    Drain,
    Charge,
}

impl ItemEffect {
    pub const ALL: [ItemEffect; 5] = [
        ItemEffect::Surge,
        ItemEffect::Shield,
        ItemEffect::Echo,
        ItemEffect::Drain,
        ItemEffect::Charge,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ItemEffect::Surge => "Surge",
            ItemEffect::Shield => "Shield",
            ItemEffect::Echo => "Echo",
            ItemEffect::Drain => "Drain",
            ItemEffect::Charge => "Charge",
        }
    }
}

impl std::fmt::Display for ItemEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A consumable item in a side's inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    pub item_type: Attribute,
    pub effect: ItemEffect,
    pub rarity: Rarity,
}

impl Item {
    #[must_use]
    pub fn new(
        id: ItemId,
        category: ItemCategory,
        item_type: Attribute,
        effect: ItemEffect,
        rarity: Rarity,
    ) -> Self {
        let kind = match category {
            ItemCategory::Tool => "Tool",
            ItemCategory::Spell => "Spell",
        };
        let mut type_name = item_type.name().to_string();
        if let Some(first) = type_name.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Self {
            id,
            name: format!("{type_name} {effect} {kind}"),
            category,
            item_type,
            effect,
            rarity,
        }
    }

    #[must_use]
    pub fn tool(id: ItemId, item_type: Attribute, effect: ItemEffect, rarity: Rarity) -> Self {
        Self::new(id, ItemCategory::Tool, item_type, effect, rarity)
    }

    #[must_use]
    pub fn spell(id: ItemId, item_type: Attribute, effect: ItemEffect, rarity: Rarity) -> Self {
        Self::new(id, ItemCategory::Spell, item_type, effect, rarity)
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        self.category == ItemCategory::Spell
    }

    /// Spells that hurt their target: Surge, Echo and Drain.
    #[must_use]
    pub fn is_offensive_spell(&self) -> bool {
        self.is_spell()
            && matches!(self.effect, ItemEffect::Surge | ItemEffect::Echo | ItemEffect::Drain)
    }

    /// Tools that keep a creature alive: Shield, stamina tools and energy Echo.
    #[must_use]
    pub fn is_defensive_tool(&self) -> bool {
        !self.is_spell()
            && (self.effect == ItemEffect::Shield
                || self.item_type == Attribute::Stamina
                || (self.item_type == Attribute::Energy && self.effect == ItemEffect::Echo))
    }

    /// Tools that raise attack: Surge, or strength/magic typed.
    #[must_use]
    pub fn is_attack_tool(&self) -> bool {
        !self.is_spell()
            && (self.effect == ItemEffect::Surge
                || matches!(self.item_type, Attribute::Strength | Attribute::Magic))
    }
}

/// Stats an item of the given type targets.
#[must_use]
pub const fn primary_stats(item_type: Attribute) -> &'static [StatKind] {
    match item_type {
        Attribute::Strength => &[StatKind::PhysicalAttack],
        Attribute::Magic => &[StatKind::MagicalAttack],
        Attribute::Stamina => &[StatKind::PhysicalDefense, StatKind::MagicalDefense],
        Attribute::Speed => &[StatKind::Initiative, StatKind::DodgeChance],
        Attribute::Energy => &[StatKind::MagicalAttack, StatKind::MagicalDefense],
    }
}

const DEFENSES: &[StatKind] = &[StatKind::PhysicalDefense, StatKind::MagicalDefense];
const ATTACKS: &[StatKind] = &[StatKind::PhysicalAttack, StatKind::MagicalAttack];

/// Declared, unscaled effect of an item.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemProfile {
    /// Stat deltas on the target.
    pub stat_changes: StatModifiers,
    /// Direct healing on the target.
    pub healing: u32,
    /// Direct damage on the target (spells only).
    pub damage: u32,
    /// Fraction of dealt damage returned to the caster as health.
    pub self_heal_ratio: f64,
    pub health_over_time: Option<i32>,
    /// Stat moved from target to caster, and the amount.
    pub drain: Option<(StatKind, i32)>,
    pub charge: Option<ChargeSpec>,
    pub duration: u32,
    /// Kind of the effect attached to the target.
    pub effect_kind: Option<EffectKind>,
    /// Healing only applies when the caster targets itself.
    pub heal_self_only: bool,
}

impl ItemProfile {
    /// True if the profile leaves a timed effect behind.
    #[must_use]
    pub fn has_lasting_effect(&self) -> bool {
        self.effect_kind.is_some()
            && (!self.stat_changes.is_empty() || self.health_over_time.is_some() || self.charge.is_some())
    }
}

/// Declared effect of a tool.
#[must_use]
pub fn tool_profile(item: &Item) -> ItemProfile {
    let primary = primary_stats(item.item_type);
    match item.effect {
        ItemEffect::Surge => ItemProfile {
            stat_changes: StatModifiers::uniform(primary, 6),
            duration: 2,
            effect_kind: Some(EffectKind::Buff),
            ..ItemProfile::default()
        },
        ItemEffect::Shield => ItemProfile {
            stat_changes: StatModifiers::uniform(DEFENSES, 5),
            healing: if item.item_type == Attribute::Stamina { 15 } else { 10 },
            duration: 3,
            effect_kind: Some(EffectKind::Buff),
            ..ItemProfile::default()
        },
        ItemEffect::Echo => ItemProfile {
            stat_changes: StatModifiers::uniform(primary, 3),
            health_over_time: Some(4),
            duration: 4,
            effect_kind: Some(EffectKind::Echo),
            ..ItemProfile::default()
        },
        ItemEffect::Drain => {
            let mut stat_changes = StatModifiers::uniform(ATTACKS, 4);
            for &stat in DEFENSES {
                stat_changes.add(stat, -2);
            }
            ItemProfile {
                stat_changes,
                duration: 3,
                effect_kind: Some(EffectKind::Buff),
                ..ItemProfile::default()
            }
        }
        ItemEffect::Charge => {
            let spec = ChargeSpec {
                target_stat: primary[0],
                max_turns: 3,
                per_turn_bonus: 4,
                final_burst: 15,
            };
            ItemProfile {
                charge: Some(spec),
                duration: 4,
                effect_kind: Some(EffectKind::Charge(spec)),
                ..ItemProfile::default()
            }
        }
    }
}

/// Declared effect of a spell cast by a creature with `caster_magic`.
#[must_use]
pub fn spell_profile(item: &Item, caster_magic: u32) -> ItemProfile {
    let primary = primary_stats(item.item_type);
    match item.effect {
        ItemEffect::Surge => ItemProfile {
            damage: 25 + 2 * caster_magic,
            ..ItemProfile::default()
        },
        ItemEffect::Shield => ItemProfile {
            stat_changes: StatModifiers::uniform(DEFENSES, 6),
            healing: 20,
            heal_self_only: true,
            duration: 3,
            effect_kind: Some(EffectKind::Buff),
            ..ItemProfile::default()
        },
        ItemEffect::Echo => ItemProfile {
            damage: 10 + caster_magic,
            health_over_time: Some(-5),
            duration: 3,
            effect_kind: Some(EffectKind::Debuff),
            ..ItemProfile::default()
        },
        ItemEffect::Drain => ItemProfile {
            damage: 15 + caster_magic,
            self_heal_ratio: 0.5,
            drain: Some((primary[0], 3)),
            duration: 3,
            ..ItemProfile::default()
        },
        ItemEffect::Charge => {
            let spec = ChargeSpec {
                target_stat: primary[0],
                max_turns: 2,
                per_turn_bonus: 3,
                final_burst: 20 + caster_magic,
            };
            ItemProfile {
                charge: Some(spec),
                duration: 3,
                effect_kind: Some(EffectKind::Charge(spec)),
                ..ItemProfile::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_name() {
        let item = Item::tool(ItemId(1), Attribute::Strength, ItemEffect::Surge, Rarity::Rare);
        assert_eq!(item.name, "Strength Surge Tool");

        let spell = Item::spell(ItemId(2), Attribute::Magic, ItemEffect::Drain, Rarity::Epic);
        assert_eq!(spell.name, "Magic Drain Spell");
    }

    #[test]
    fn test_classification() {
        let shield = Item::tool(ItemId(1), Attribute::Speed, ItemEffect::Shield, Rarity::Common);
        let stamina_surge = Item::tool(ItemId(2), Attribute::Stamina, ItemEffect::Surge, Rarity::Common);
        let energy_echo = Item::tool(ItemId(3), Attribute::Energy, ItemEffect::Echo, Rarity::Common);
        let magic_charge = Item::tool(ItemId(4), Attribute::Magic, ItemEffect::Charge, Rarity::Common);
        let surge_spell = Item::spell(ItemId(5), Attribute::Speed, ItemEffect::Surge, Rarity::Common);

        assert!(shield.is_defensive_tool());
        assert!(stamina_surge.is_defensive_tool());
        assert!(stamina_surge.is_attack_tool());
        assert!(energy_echo.is_defensive_tool());
        assert!(magic_charge.is_attack_tool());
        assert!(!magic_charge.is_defensive_tool());
        assert!(surge_spell.is_offensive_spell());
        assert!(!surge_spell.is_attack_tool());
    }

    #[test]
    fn test_tool_profiles() {
        let surge = tool_profile(&Item::tool(ItemId(1), Attribute::Stamina, ItemEffect::Surge, Rarity::Common));
        assert_eq!(surge.stat_changes.get(StatKind::PhysicalDefense), 6);
        assert_eq!(surge.stat_changes.get(StatKind::MagicalDefense), 6);
        assert_eq!(surge.duration, 2);

        let shield = tool_profile(&Item::tool(ItemId(2), Attribute::Stamina, ItemEffect::Shield, Rarity::Common));
        assert_eq!(shield.healing, 15);

        let charge = tool_profile(&Item::tool(ItemId(3), Attribute::Strength, ItemEffect::Charge, Rarity::Common));
        assert_eq!(charge.charge.map(|c| c.target_stat), Some(StatKind::PhysicalAttack));
        assert!(charge.has_lasting_effect());
    }

    #[test]
    fn test_spell_profiles_scale_with_magic() {
        let surge = Item::spell(ItemId(1), Attribute::Magic, ItemEffect::Surge, Rarity::Common);
        assert_eq!(spell_profile(&surge, 0).damage, 25);
        assert_eq!(spell_profile(&surge, 10).damage, 45);
        assert!(!spell_profile(&surge, 10).has_lasting_effect());

        let drain = Item::spell(ItemId(2), Attribute::Speed, ItemEffect::Drain, Rarity::Common);
        let profile = spell_profile(&drain, 4);
        assert_eq!(profile.damage, 19);
        assert_eq!(profile.drain, Some((StatKind::Initiative, 3)));
        assert_eq!(profile.self_heal_ratio, 0.5);
    }
}
