//! Battle state and the engine that advances it.
//!
//! `state` holds the data; `engine` holds every transition. All engine
//! entry points take `&BattleState` and return a `Transition`, so callers
//! keep the previous state for replays and diffs.

mod state;
mod engine;

pub use state::{BattleState, Phase, SideState};
pub use engine::{
    apply_action, apply_player_action, begin_turn, execute_ai_decision, run_ai_turn,
    run_turn_with, settle_outcome, start_battle, ActionStatus, BattleSetup, Transition,
    COMBO_BONUS, COMBO_THRESHOLD, MAX_AI_STEPS,
};
