//! Creatures: attributes, templates, battle instances, stat derivation and
//! enemy generation.
//!
//! ## Key Types
//!
//! - `Attribute` / `Attributes`: the five base attributes and their cycle
//! - `Rarity`, `SpecialtyTags`
//! - `CreatureTemplate`: static identity (species, rarity, form, attributes)
//! - `Creature`: a template in battle, with stats, health and effects
//! - `BattleStats` / `StatKind`: derived combat stats

pub mod attributes;
pub mod creature;
pub mod stats;
pub mod generation;

pub use attributes::{specialty_multiplier, Attribute, Attributes, Rarity, SpecialtyTags};
pub use creature::{Creature, CreatureError, CreatureTemplate, MAX_FORM};
pub use stats::{
    creature_power, deployment_cost, derive_stats, effective_stats, soft_cap,
    BattleStats, StatKind,
};
pub use generation::{generate_enemy, generate_enemy_deck, generate_enemy_items};
