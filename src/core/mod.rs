//! Core battle types: ids, sides, RNG, configuration, intents, errors, log.
//!
//! Everything here is domain-neutral plumbing shared by the combat,
//! effect, energy, AI and battle modules.

pub mod ids;
pub mod side;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;
pub mod log;

pub use ids::{CreatureId, IdAllocator, ItemId};
pub use side::{Side, SideMap};
pub use rng::{BattleRng, BattleRngState};
pub use config::{BattleConfig, Difficulty, DifficultyConfig, RarityWeights};
pub use action::{AttackType, Intent, IntentKind};
pub use error::{ActionError, ErrorSeverity};
pub use log::{BattleLog, LogEntry};
