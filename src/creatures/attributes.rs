//! Creature attributes, rarity and specialty tags.
//!
//! ## Attribute cycle
//!
//! The five attributes form a rock-paper-scissors cycle where each one
//! beats the next:
//!
//! ```text
//! strength -> stamina -> speed -> magic -> energy -> strength
//! ```
//!
//! ```
//! use creature_battle::creatures::Attribute;
//!
//! assert_eq!(Attribute::Strength.prey(), Attribute::Stamina);
//! assert_eq!(Attribute::Strength.predator(), Attribute::Energy);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One of the five base attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    Energy,
    Strength,
    Magic,
    Stamina,
    Speed,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Energy,
        Attribute::Strength,
        Attribute::Magic,
        Attribute::Stamina,
        Attribute::Speed,
    ];

    /// The attribute this one beats.
    #[must_use]
    pub const fn prey(self) -> Self {
        match self {
            Attribute::Strength => Attribute::Stamina,
            Attribute::Stamina => Attribute::Speed,
            Attribute::Speed => Attribute::Magic,
            Attribute::Magic => Attribute::Energy,
            Attribute::Energy => Attribute::Strength,
        }
    }

    /// The attribute that beats this one.
    #[must_use]
    pub const fn predator(self) -> Self {
        match self {
            Attribute::Stamina => Attribute::Strength,
            Attribute::Speed => Attribute::Stamina,
            Attribute::Magic => Attribute::Speed,
            Attribute::Energy => Attribute::Magic,
            Attribute::Strength => Attribute::Energy,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Energy => "energy",
            Attribute::Strength => "strength",
            Attribute::Magic => "magic",
            Attribute::Stamina => "stamina",
            Attribute::Speed => "speed",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Base attribute set of a creature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    pub energy: u32,
    pub strength: u32,
    pub magic: u32,
    pub stamina: u32,
    pub speed: u32,
}

impl Attributes {
    /// Same value for every attribute.
    #[must_use]
    pub const fn uniform(value: u32) -> Self {
        Self {
            energy: value,
            strength: value,
            magic: value,
            stamina: value,
            speed: value,
        }
    }

    #[must_use]
    pub const fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Energy => self.energy,
            Attribute::Strength => self.strength,
            Attribute::Magic => self.magic,
            Attribute::Stamina => self.stamina,
            Attribute::Speed => self.speed,
        }
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> &mut u32 {
        match attribute {
            Attribute::Energy => &mut self.energy,
            Attribute::Strength => &mut self.strength,
            Attribute::Magic => &mut self.magic,
            Attribute::Stamina => &mut self.stamina,
            Attribute::Speed => &mut self.speed,
        }
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, attribute: Attribute, value: u32) -> Self {
        *self.get_mut(attribute) = value;
        self
    }

    /// Sum of all five attributes.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.energy + self.strength + self.magic + self.stamina + self.speed
    }

    /// Highest attribute, first in `Attribute::ALL` order on ties.
    #[must_use]
    pub fn dominant(&self) -> Attribute {
        let mut best = Attribute::ALL[0];
        for attribute in Attribute::ALL {
            if self.get(attribute) > self.get(best) {
                best = attribute;
            }
        }
        best
    }
}

/// Creature and item rarity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary];

    /// Multiplier applied to derived stats.
    #[must_use]
    pub const fn stat_multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.1,
            Rarity::Epic => 1.2,
            Rarity::Legendary => 1.3,
        }
    }

    /// Ordinal value 1-4, used by power and rating formulas.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Rarity::Common => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }

    /// Base attribute value for generated creatures of this rarity.
    #[must_use]
    pub const fn base_attribute(self) -> u32 {
        match self {
            Rarity::Common => 5,
            Rarity::Rare => 6,
            Rarity::Epic => 7,
            Rarity::Legendary => 8,
        }
    }

    /// Base power of an item of this rarity.
    #[must_use]
    pub const fn item_power(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.2,
            Rarity::Epic => 1.4,
            Rarity::Legendary => 1.6,
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        };
        f.write_str(name)
    }
}

/// Attributes a creature is exceptional in (at most two).
pub type SpecialtyTags = SmallVec<[Attribute; 2]>;

/// Multiplier a creature's specialties apply to one attribute's contribution.
///
/// A single tag amplifies ×1.8; with two tags each is amplified ×1.4.
#[must_use]
pub fn specialty_multiplier(specialties: &[Attribute], attribute: Attribute) -> f64 {
    if !specialties.contains(&attribute) {
        return 1.0;
    }
    if specialties.len() == 1 {
        1.8
    } else {
        1.4
    }
}
