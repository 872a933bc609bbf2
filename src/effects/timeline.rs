//! Turn-boundary effect processing.
//!
//! ## Tick order
//!
//! For each effect on a creature, in list order:
//! 1. compute the time-adjusted magnitude
//! 2. accumulate its stat deltas
//! 3. apply health-over-time to current health (clamped)
//! 4. complete charges: grant `next_attack_bonus`, drop the effect
//! 5. decrement duration, drop at 0
//!
//! Stats are then rebuilt from the surviving list and the defend flag clears.
//!
//! ## Single invocation
//!
//! `EffectTimeline` holds the last turn it processed for its side. A second
//! `process` call for the same turn fails with `TimelineError::AlreadyProcessed`
//! and touches nothing, so damage and healing can never be applied twice.

use serde::{Deserialize, Serialize};

use super::effect::EffectKind;
use super::modifiers::StatModifiers;
use crate::core::CreatureId;
use crate::creatures::{Creature, Rarity};

/// Timeline processing errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    #[error("effects already processed for turn {turn}")]
    AlreadyProcessed { turn: u32 },
}

/// Health-over-time multiplier by creature rarity.
#[must_use]
pub const fn rarity_health_scale(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Legendary => 1.2,
        Rarity::Epic => 1.15,
        Rarity::Rare => 1.1,
        Rarity::Common => 1.0,
    }
}

/// What one creature's tick did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub creature: CreatureId,
    pub name: String,
    /// Time-adjusted deltas applied this tick, including expiring effects.
    pub stat_deltas: StatModifiers,
    /// Net change to current health.
    pub health_delta: i64,
    /// Names of effects that ran out.
    pub expired: Vec<String>,
    /// Completed charges and the attack bonus each granted.
    pub charge_bursts: Vec<(String, u32)>,
}

impl TickReport {
    /// Log lines for this tick. Empty if nothing visible happened.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.health_delta < 0 {
            lines.push(format!(
                "{} takes {} damage from ongoing effects",
                self.name, -self.health_delta
            ));
        } else if self.health_delta > 0 {
            lines.push(format!(
                "{} recovers {} health from ongoing effects",
                self.name, self.health_delta
            ));
        }
        for (effect, burst) in &self.charge_bursts {
            lines.push(format!(
                "{}'s {} is fully charged: next attack +{}",
                self.name, effect, burst
            ));
        }
        for effect in &self.expired {
            lines.push(format!("{} wore off on {}", effect, self.name));
        }
        lines
    }
}

/// Advance every effect on one creature by one tick.
///
/// `health_scale` is the difficulty scaling on health-over-time.
pub fn tick_creature(creature: &mut Creature, turn: u32, health_scale: f64) -> TickReport {
    let mut report = TickReport {
        creature: creature.id,
        name: creature.name().to_string(),
        ..TickReport::default()
    };
    let rarity_scale = rarity_health_scale(creature.rarity());
    let effects = std::mem::take(&mut creature.active_effects);
    let mut surviving = Vec::with_capacity(effects.len());

    for mut effect in effects {
        let adjusted = effect.time_adjusted(turn);
        report.stat_deltas.merge(&adjusted);
        effect.in_force = adjusted;

        if let Some(hot) = effect.time_adjusted_health(turn) {
            let delta = (hot * health_scale * rarity_scale).round() as i64;
            let before = i64::from(creature.current_health);
            creature.apply_health_delta(delta);
            report.health_delta += i64::from(creature.current_health) - before;
        }

        if let EffectKind::Charge(spec) = effect.kind {
            if effect.charge_progress(turn).unwrap_or(0.0) >= 1.0 {
                creature.grant_attack_bonus(spec.final_burst);
                report.charge_bursts.push((effect.name.clone(), spec.final_burst));
                continue;
            }
        }

        effect.duration = effect.duration.saturating_sub(1);
        if effect.duration > 0 {
            surviving.push(effect);
        } else {
            report.expired.push(effect.name.clone());
        }
    }

    creature.active_effects = surviving;
    creature.recompute_stats();
    creature.is_defending = false;

    tracing::trace!(
        creature = %creature.id,
        turn,
        health_delta = report.health_delta,
        remaining = creature.active_effects.len(),
        "effects ticked"
    );
    report
}

/// Per-side turn stamp guarding effect processing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTimeline {
    last_processed: Option<u32>,
}

impl EffectTimeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A timeline that treats `turn` as already processed.
    #[must_use]
    pub const fn stamped(turn: u32) -> Self {
        Self {
            last_processed: Some(turn),
        }
    }

    #[must_use]
    pub const fn last_processed(&self) -> Option<u32> {
        self.last_processed
    }

    #[must_use]
    pub fn is_processed(&self, turn: u32) -> bool {
        self.last_processed == Some(turn)
    }

    /// Tick every creature once for `turn`.
    pub fn process<'a>(
        &mut self,
        turn: u32,
        creatures: impl IntoIterator<Item = &'a mut Creature>,
        health_scale: f64,
    ) -> Result<Vec<TickReport>, TimelineError> {
        if self.is_processed(turn) {
            tracing::warn!(turn, "rejected second effect tick in one turn");
            return Err(TimelineError::AlreadyProcessed { turn });
        }
        self.last_processed = Some(turn);

        Ok(creatures
            .into_iter()
            .map(|creature| tick_creature(creature, turn, health_scale))
            .collect())
    }
}
