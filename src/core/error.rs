//! Action rejection errors.
//!
//! Gameplay failures never propagate to the caller as `Err`. They surface
//! as `ActionStatus::Rejected(ActionError)` on an otherwise unchanged state,
//! so the orchestration layer can show a message and carry on.

use serde::{Deserialize, Serialize};

use super::ids::{CreatureId, ItemId};
use super::side::Side;

/// Severity of a rejection, used by callers to pick a recovery strategy.
///
/// - **Recoverable**: turn or resource constraints; a different action or a
///   later turn may succeed
/// - **Validation**: the intent referenced something that does not exist
///   or is not allowed; resubmitting it unchanged will fail again
/// - **Internal**: state inconsistency that indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
}

impl ErrorSeverity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Reasons an intent is rejected before any mutation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ActionError {
    #[error("battle is already over")]
    BattleOver,

    #[error("it is not {0}'s turn")]
    NotYourTurn(Side),

    #[error("wrong phase: turn effects must be processed before acting")]
    WrongPhase,

    #[error("turn effects already processed for turn {turn}")]
    EffectsAlreadyProcessed { turn: u32 },

    #[error("not enough energy: need {needed}, have {available}")]
    InsufficientEnergy { needed: u32, available: u32 },

    #[error("{0} is not in hand")]
    NotInHand(CreatureId),

    #[error("{0} is not on the field")]
    NotOnField(CreatureId),

    #[error("field is full ({capacity} creatures)")]
    FieldFull { capacity: usize },

    #[error("{0} is not in the inventory")]
    UnknownItem(ItemId),

    #[error("{0} has already acted this turn")]
    AlreadyActed(CreatureId),

    #[error("{0} is already deployed")]
    AlreadyDeployed(CreatureId),

    #[error("target {0} is not on either field")]
    TargetNotFound(CreatureId),
}

impl ActionError {
    #[must_use]
    pub const fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            BattleOver | NotYourTurn(_) | WrongPhase => ErrorSeverity::Recoverable,
            InsufficientEnergy { .. } | FieldFull { .. } => ErrorSeverity::Recoverable,
            AlreadyActed(_) | AlreadyDeployed(_) => ErrorSeverity::Recoverable,
            NotInHand(_) | NotOnField(_) | UnknownItem(_) | TargetNotFound(_) => {
                ErrorSeverity::Validation
            },
            EffectsAlreadyProcessed { .. } => ErrorSeverity::Internal,
        }
    }

    /// Duplicate actions are skipped with a log note rather than reported.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, ActionError::AlreadyActed(_) | ActionError::AlreadyDeployed(_))
    }

    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            BattleOver => "BATTLE_OVER",
            NotYourTurn(_) => "NOT_YOUR_TURN",
            WrongPhase => "WRONG_PHASE",
            EffectsAlreadyProcessed { .. } => "EFFECTS_ALREADY_PROCESSED",
            InsufficientEnergy { .. } => "INSUFFICIENT_ENERGY",
            NotInHand(_) => "NOT_IN_HAND",
            NotOnField(_) => "NOT_ON_FIELD",
            FieldFull { .. } => "FIELD_FULL",
            UnknownItem(_) => "UNKNOWN_ITEM",
            AlreadyActed(_) => "ALREADY_ACTED",
            AlreadyDeployed(_) => "ALREADY_DEPLOYED",
            TargetNotFound(_) => "TARGET_NOT_FOUND",
        }
    }
}
