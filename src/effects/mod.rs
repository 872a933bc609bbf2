//! Timed effects and the consumables that create them.
//!
//! - `StatModifiers`: additive per-stat deltas
//! - `ActiveEffect`: a timed modifier on a creature (buff, debuff, defense,
//!   echo, charge)
//! - `EffectTimeline`: once-per-turn processing with a turn stamp guard
//! - `Item`: tools and spells, with their declared profiles
//!
//! ## Design Philosophy
//!
//! Effects never mutate a creature's derived stats directly. The creature
//! rebuilds its stats from its base stats and the live effect list, so the
//! effect list is the single source of truth for every temporary change.

mod modifiers;
mod effect;
mod timeline;
mod items;

pub use modifiers::StatModifiers;
pub use effect::{ActiveEffect, ChargeSpec, EffectId, EffectKind};
pub use timeline::{rarity_health_scale, tick_creature, EffectTimeline, TickReport, TimelineError};
pub use items::{
    primary_stats, spell_profile, tool_profile, Item, ItemCategory, ItemEffect, ItemProfile,
};
