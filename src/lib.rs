//! # creature-battle
//!
//! A turn-based creature battle engine with a heuristic AI opponent.
//!
//! ## Design Principles
//!
//! 1. **Pure transitions**: every engine entry point takes `&BattleState`
//!    and returns a `Transition`. The input state is never modified.
//!
//! 2. **Determinism**: all randomness flows from one seeded `BattleRng`.
//!    The same seed and intents replay the same battle.
//!
//! 3. **Degrade, don't crash**: malformed creatures or items produce a
//!    diagnostic and a no-op, never a panic.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so each
//!   transition works on its own copy.
//!
//! - **Planner Purity**: the AI plans against a projected board and draws
//!   from a forked RNG. Its decisions are replayed through the engine,
//!   which re-validates each step.
//!
//! ## Modules
//!
//! - `core`: ids, sides, RNG, configuration, intents, errors, battle log
//! - `creatures`: attributes, stat derivation, creature records, enemy generation
//! - `effects`: stat modifiers, active effects, the per-turn timeline, items
//! - `combat`: attack, item, defend and defeat resolution
//! - `energy`: costs, regeneration, decay
//! - `ai`: board analysis, scoring and the action planner
//! - `battle`: battle state and the engine

pub mod core;
pub mod creatures;
pub mod effects;
pub mod combat;
pub mod energy;
pub mod ai;
pub mod battle;

// Re-export commonly used types
pub use crate::core::{
    ActionError, AttackType, BattleConfig, BattleLog, BattleRng, CreatureId, Difficulty,
    DifficultyConfig, Intent, ItemId, LogEntry, Side, SideMap,
};

pub use crate::creatures::{
    derive_stats, Attribute, Attributes, BattleStats, Creature, CreatureTemplate, Rarity,
    SpecialtyTags, StatKind,
};

pub use crate::effects::{ActiveEffect, EffectKind, EffectTimeline, Item, ItemEffect, StatModifiers};

pub use crate::combat::{resolve_attack, resolve_defend, resolve_spell, resolve_tool, CombatContext, CombatRolls};

pub use crate::energy::EnergyLedger;

pub use crate::ai::{plan_ai_action, ActionPlanner, AiDecision, PlannedAction, Tier};

pub use crate::battle::{
    apply_action, apply_player_action, begin_turn, execute_ai_decision, run_ai_turn,
    settle_outcome, start_battle, ActionStatus, BattleSetup, BattleState, Phase, SideState,
    Transition,
};
