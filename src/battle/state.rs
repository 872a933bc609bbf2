//! Battle state.
//!
//! ## SideState
//!
//! Everything one side owns: deck (drawn from the front), hand, field,
//! tool and spell inventories, the energy ledger, the effect timeline stamp
//! and per-turn bookkeeping (acted set, consecutive-action counter).
//!
//! ## BattleState
//!
//! Both sides plus the shared turn counter, phase, log, RNG and outcome.
//! Collections use `im` persistent structures, so the engine clones the
//! whole state per transition in O(1) and mutates the copy.
//!
//! ## Invariants
//!
//! - a creature id is in at most one of deck, hand and field
//! - field size never exceeds the side's cap
//! - energy stays within `[0, max_energy]`
//! - the outcome is set at most once and never changes afterwards

use im::{HashSet as ImHashSet, Vector};
use serde::{Deserialize, Serialize};

use crate::core::{BattleConfig, BattleLog, BattleRng, CreatureId, IdAllocator, ItemId, Side, SideMap};
use crate::creatures::Creature;
use crate::effects::{EffectTimeline, Item};
use crate::energy::{max_energy, EnergyLedger};

/// Turn phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for `begin_turn` to tick effects, draw and regenerate.
    EffectTick,
    /// The active side may submit intents.
    Actions,
    /// The battle has an outcome. Nothing further is accepted.
    Finished,
}

/// Everything one side owns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    pub deck: Vector<Creature>,
    pub hand: Vector<Creature>,
    pub field: Vector<Creature>,
    pub tools: Vector<Item>,
    pub spells: Vector<Item>,
    pub ledger: EnergyLedger,
    pub timeline: EffectTimeline,
    pub max_field: usize,
    pub max_hand: usize,

    // === Per-turn bookkeeping ===
    /// Creatures that attacked, defended or cast this turn.
    pub acted: ImHashSet<CreatureId>,
    /// Actions taken this turn, for the combo bonus.
    pub consecutive_actions: u32,
    /// Whether the combo bonus was already granted this turn.
    pub combo_granted: bool,
}

impl SideState {
    #[must_use]
    pub fn new(max_field: usize, max_hand: usize, starting_energy: u32) -> Self {
        Self {
            deck: Vector::new(),
            hand: Vector::new(),
            field: Vector::new(),
            tools: Vector::new(),
            spells: Vector::new(),
            ledger: EnergyLedger::new(starting_energy),
            timeline: EffectTimeline::new(),
            max_field,
            max_hand,
            acted: ImHashSet::new(),
            consecutive_actions: 0,
            combo_granted: false,
        }
    }

    #[must_use]
    pub fn energy(&self) -> u32 {
        self.ledger.energy()
    }

    /// Field, hand and deck are all empty.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.field.is_empty() && self.hand.is_empty() && self.deck.is_empty()
    }

    #[must_use]
    pub fn has_field_space(&self) -> bool {
        self.field.len() < self.max_field
    }

    #[must_use]
    pub fn field_index(&self, id: CreatureId) -> Option<usize> {
        self.field.iter().position(|c| c.id == id)
    }

    #[must_use]
    pub fn hand_index(&self, id: CreatureId) -> Option<usize> {
        self.hand.iter().position(|c| c.id == id)
    }

    #[must_use]
    pub fn field_creature(&self, id: CreatureId) -> Option<&Creature> {
        self.field.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn hand_creature(&self, id: CreatureId) -> Option<&Creature> {
        self.hand.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn tool(&self, id: ItemId) -> Option<&Item> {
        self.tools.iter().find(|i| i.id == id)
    }

    #[must_use]
    pub fn spell(&self, id: ItemId) -> Option<&Item> {
        self.spells.iter().find(|i| i.id == id)
    }

    /// Write an updated creature back to its field slot.
    ///
    /// Returns false if the creature is no longer on the field.
    pub fn replace_on_field(&mut self, creature: Creature) -> bool {
        match self.field_index(creature.id) {
            Some(index) => {
                self.field.set(index, creature);
                true
            }
            None => false,
        }
    }

    /// Remove and return every creature at 0 health, keeping field order.
    pub fn remove_defeated(&mut self) -> Vec<Creature> {
        if self.field.iter().all(|c| !c.is_defeated()) {
            return Vec::new();
        }
        let (fallen, alive): (Vec<Creature>, Vec<Creature>) =
            self.field.iter().cloned().partition(Creature::is_defeated);
        self.field = alive.into_iter().collect();
        fallen
    }

    /// Draw one creature from the front of the deck if the hand has room.
    pub fn draw(&mut self) -> Option<CreatureId> {
        if self.hand.len() >= self.max_hand {
            return None;
        }
        let creature = self.deck.pop_front()?;
        let id = creature.id;
        self.hand.push_back(creature);
        Some(id)
    }

    /// Energy cap for the current field.
    #[must_use]
    pub fn max_energy(&self, config: &crate::core::DifficultyConfig) -> u32 {
        max_energy(config, self.field.len())
    }

    /// Every creature id this side holds, across deck, hand and field.
    pub fn all_ids(&self) -> impl Iterator<Item = CreatureId> + '_ {
        self.deck
            .iter()
            .chain(self.hand.iter())
            .chain(self.field.iter())
            .map(|c| c.id)
    }

    pub(crate) fn reset_turn_counters(&mut self) {
        self.acted = ImHashSet::new();
        self.consecutive_actions = 0;
        self.combo_granted = false;
    }
}

/// Complete battle state.
#[derive(Clone, Debug)]
pub struct BattleState {
    pub config: BattleConfig,
    /// Turn number, starting at 1. Increments after the enemy's turn ends.
    pub turn: u32,
    /// Side whose turn it is.
    pub active: Side,
    pub phase: Phase,
    pub sides: SideMap<SideState>,
    pub log: BattleLog,
    pub rng: BattleRng,
    pub ids: IdAllocator,
    winner: Option<Side>,
}

impl BattleState {
    #[must_use]
    pub fn new(config: BattleConfig, rng: BattleRng) -> Self {
        let player = SideState::new(
            config.player_max_field,
            config.player_max_hand,
            config.starting_energy,
        );
        let enemy = SideState::new(
            config.difficulty.max_field_size,
            config.enemy_max_hand(),
            config.starting_energy,
        );
        Self {
            config,
            turn: 1,
            active: Side::Player,
            phase: Phase::Actions,
            sides: SideMap::from_pair(player, enemy),
            log: BattleLog::new(),
            rng,
            ids: IdAllocator::starting_at(1),
            winner: None,
        }
    }

    #[must_use]
    pub fn side(&self, side: Side) -> &SideState {
        &self.sides[side]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        &mut self.sides[side]
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Record the winner. Only the first call has any effect.
    pub(crate) fn set_winner(&mut self, winner: Side) -> bool {
        if self.winner.is_some() {
            return false;
        }
        self.winner = Some(winner);
        self.phase = Phase::Finished;
        true
    }

    /// Find a field creature on either side.
    #[must_use]
    pub fn find_on_field(&self, id: CreatureId) -> Option<(Side, &Creature)> {
        Side::ALL
            .into_iter()
            .find_map(|side| self.sides[side].field_creature(id).map(|c| (side, c)))
    }

    /// Append a log line for `side` on the current turn.
    pub fn log_line(&mut self, side: Option<Side>, message: impl Into<String>) {
        self.log
            .push(crate::core::LogEntry::new(self.turn, side, message));
    }
}
