//! AI opponent: board analysis, scoring heuristics and the action planner.
//!
//! ## Flow
//!
//! 1. `analyze_board` summarises both fields and the AI hand
//! 2. `ActionPlanner` runs its ladder of `Tactic`s against a `PlanBuilder`
//! 3. if nothing was planned, the difficulty fallback gets one try
//! 4. the plan is shaped into an `AiDecision`
//!
//! The planner never mutates the battle. Its decisions are replayed through
//! `battle::execute_ai_decision`, which re-validates every step.

pub mod analysis;
pub mod scoring;
pub mod tactics;
pub mod planner;
pub mod fallback;

pub use analysis::{analyze_board, BoardAnalysis};
pub use planner::{
    plan_ai_action, ActionPlanner, AiDecision, PlanBuilder, PlanError, PlannedAction, Tier,
};
pub use tactics::{
    deployment_urgency, AttackBuff, CoordinatedAssault, DeploymentUrgency, DeploymentWave,
    EmergencyMitigation, LethalStrike, OffensiveSpell, RescueCritical, Tactic, Urgency,
    UtilityActions,
};
pub use fallback::plan_fallback;
