//! Active effects attached to creatures.
//!
//! An effect is a timed modifier. It carries:
//! - declared stat deltas (`stat_modifications`), re-applied on every
//!   recompute and never baked into the creature
//! - an optional health-over-time delta applied once per tick
//! - a kind discriminator with type-specific data (charge parameters)
//! - `start_turn`, from which elapsed progress is computed
//!
//! `in_force` holds the time-adjusted deltas the creature's stats currently
//! include. The timeline refreshes it every tick.

use serde::{Deserialize, Serialize};

use super::modifiers::StatModifiers;
use crate::core::CreatureId;
use crate::creatures::StatKind;

/// Identifier of an effect, unique per creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u64);

impl EffectId {
    /// Placeholder carried by effects not yet attached to a creature.
    pub const UNASSIGNED: EffectId = EffectId(u64::MAX);

    #[must_use]
    pub const fn new(owner: CreatureId, seq: u32) -> Self {
        Self(((owner.0 as u64) << 32) | seq as u64)
    }
}

/// Charge parameters: a stat bonus that grows each turn and converts into a
/// one-shot attack bonus when complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeSpec {
    pub target_stat: StatKind,
    /// Turns until the charge completes.
    pub max_turns: u32,
    /// Stat bonus at full progress; scaled by progress until then.
    pub per_turn_bonus: u32,
    /// Added to `next_attack_bonus` on completion.
    pub final_burst: u32,
}

/// Effect discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Buff,
    Debuff,
    /// Defensive stance from a defend action.
    Defense,
    /// Fading sustain: magnitude shrinks 10% per elapsed turn, down to half.
    Echo,
    Charge(ChargeSpec),
}

impl EffectKind {
    #[must_use]
    pub const fn is_charge(&self) -> bool {
        matches!(self, EffectKind::Charge(_))
    }
}

/// A timed modifier on a creature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub id: EffectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: EffectKind,
    /// Remaining ticks. Dropped once it reaches 0 after its final tick.
    pub duration: u32,
    pub stat_modifications: StatModifiers,
    #[serde(default)]
    pub health_over_time: Option<i32>,
    pub start_turn: u32,
    /// Time-adjusted deltas currently applied to the owner's stats.
    #[serde(default)]
    pub in_force: StatModifiers,
}

impl ActiveEffect {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: EffectKind, duration: u32, start_turn: u32) -> Self {
        Self {
            id: EffectId::UNASSIGNED,
            name: name.into(),
            description: String::new(),
            kind,
            duration,
            stat_modifications: StatModifiers::new(),
            health_over_time: None,
            start_turn,
            in_force: StatModifiers::new(),
        }
    }

    /// Set declared deltas. Non-charge effects apply them immediately.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: StatModifiers) -> Self {
        self.in_force = if self.kind.is_charge() {
            StatModifiers::new()
        } else {
            modifiers.clone()
        };
        self.stat_modifications = modifiers;
        self
    }

    #[must_use]
    pub fn with_health_over_time(mut self, delta: i32) -> Self {
        self.health_over_time = (delta != 0).then_some(delta);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn elapsed(&self, turn: u32) -> u32 {
        turn.saturating_sub(self.start_turn)
    }

    /// Magnitude factor at `turn` (echo fade; 1.0 for everything else).
    #[must_use]
    pub fn magnitude_factor(&self, turn: u32) -> f64 {
        match self.kind {
            EffectKind::Echo => (1.0 - 0.1 * f64::from(self.elapsed(turn))).max(0.5),
            _ => 1.0,
        }
    }

    /// Charge progress in `[0, 1]`, `None` for other kinds.
    #[must_use]
    pub fn charge_progress(&self, turn: u32) -> Option<f64> {
        match self.kind {
            EffectKind::Charge(spec) if spec.max_turns == 0 => Some(1.0),
            EffectKind::Charge(spec) => {
                Some((f64::from(self.elapsed(turn)) / f64::from(spec.max_turns)).min(1.0))
            }
            _ => None,
        }
    }

    /// Stat deltas this effect contributes at `turn`.
    #[must_use]
    pub fn time_adjusted(&self, turn: u32) -> StatModifiers {
        let mut mods = self.stat_modifications.scaled(self.magnitude_factor(turn));
        if let (EffectKind::Charge(spec), Some(progress)) = (self.kind, self.charge_progress(turn)) {
            let bonus = (f64::from(spec.per_turn_bonus) * progress).floor() as i32;
            mods.add(spec.target_stat, bonus);
        }
        mods
    }

    /// Health-over-time at `turn` before difficulty and rarity scaling.
    #[must_use]
    pub fn time_adjusted_health(&self, turn: u32) -> Option<f64> {
        self.health_over_time
            .map(|hot| f64::from(hot) * self.magnitude_factor(turn))
    }
}
