//! Consequences of a creature falling.
//!
//! A Legendary or Epic creature leaves a parting buff for its allies and a
//! debuff for the side that felled it. Lower rarities leave nothing.

use crate::creatures::{Creature, Rarity, StatKind};
use crate::effects::{ActiveEffect, EffectKind, StatModifiers};

/// Effects to attach after a creature is removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefeatEffects {
    /// Attached to every surviving creature on the fallen creature's field.
    pub allies: Option<ActiveEffect>,
    /// Attached to every creature on the opposing field.
    pub opponents: Option<ActiveEffect>,
    pub log: Vec<String>,
}

impl DefeatEffects {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allies.is_none() && self.opponents.is_none()
    }
}

fn guilty_conscience(turn: u32) -> ActiveEffect {
    let mut mods = StatModifiers::new();
    mods.add(StatKind::Initiative, -2);
    mods.add(StatKind::DodgeChance, -1);
    ActiveEffect::new("Guilty Conscience", EffectKind::Debuff, 2, turn)
        .with_modifiers(mods)
        .with_description("Haunted by a fallen foe")
}

/// Effects triggered by `fallen` leaving the field on `turn`.
#[must_use]
pub fn defeat_effects(fallen: &Creature, turn: u32) -> DefeatEffects {
    let attacks = [StatKind::PhysicalAttack, StatKind::MagicalAttack];
    let (name, delta, duration) = match fallen.rarity() {
        Rarity::Legendary => ("Final Gift", 2, 5),
        Rarity::Epic => ("Epic Essence", 1, 3),
        Rarity::Common | Rarity::Rare => {
            return DefeatEffects {
                log: vec![format!("{} has been defeated.", fallen.name())],
                ..DefeatEffects::default()
            }
        }
    };

    let gift = ActiveEffect::new(name, EffectKind::Buff, duration, turn)
        .with_modifiers(StatModifiers::uniform(&attacks, delta))
        .with_description(format!("Power left behind by {}", fallen.name()));

    DefeatEffects {
        allies: Some(gift),
        opponents: Some(guilty_conscience(turn)),
        log: vec![
            format!("{} has been defeated.", fallen.name()),
            format!(
                "{}'s allies receive {name}; its foes suffer Guilty Conscience.",
                fallen.name()
            ),
        ],
    }
}
