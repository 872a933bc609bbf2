//! Action planner.
//!
//! ## Overview
//!
//! The planner walks a fixed ladder of `Tactic`s. Every tactic reads the
//! same `BoardAnalysis` and appends actions to a shared `PlanBuilder`,
//! which owns the remaining energy budget, the set of creatures that have
//! already been given an action, and a projected copy of the board.
//!
//! ## Output
//!
//! A plan of one action is returned as `AiDecision::Single`. With a
//! difficulty-scaled probability, and at least 4 energy, a longer plan is
//! returned as a `Sequence` capped at the difficulty's sequence length.
//! Each step's cost is charged to the builder when planned, so a sequence's
//! cumulative cost never exceeds the energy the side had at planning time.
//!
//! ## Failure
//!
//! `ActionPlanner::plan` returns `PlanError` on internal inconsistencies;
//! `plan_ai_action` maps any error to `AiDecision::EndTurn`.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::analysis::{analyze_board, BoardAnalysis};
use super::fallback::plan_fallback;
use super::tactics::{
    AttackBuff, CoordinatedAssault, DeploymentWave, EmergencyMitigation, LethalStrike,
    OffensiveSpell, RescueCritical, Tactic, UtilityActions,
};
use crate::battle::{BattleState, Phase};
use crate::core::{AttackType, CreatureId, DifficultyConfig, Intent, ItemId, Side};
use crate::creatures::Creature;
use crate::effects::Item;
use crate::energy::{ATTACK_COST, DEFEND_COST, SPELL_COST, TOOL_COST};

/// Minimum energy before the planner considers emitting a sequence.
pub const SEQUENCE_MIN_ENERGY: u32 = 4;

/// Longest sequence any difficulty emits.
pub const MAX_SEQUENCE: usize = 5;

// =============================================================================
// Plan Types
// =============================================================================

/// Ladder rung that produced an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Rescue,
    Lethal,
    Emergency,
    Deployment,
    Spell,
    Buff,
    Assault,
    Utility,
    /// Difficulty heuristic used when the ladder produced nothing.
    Fallback,
}

impl Tier {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Tier::Rescue => "rescue",
            Tier::Lethal => "lethal",
            Tier::Emergency => "emergency",
            Tier::Deployment => "deployment",
            Tier::Spell => "spell",
            Tier::Buff => "buff",
            Tier::Assault => "assault",
            Tier::Utility => "utility",
            Tier::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One planned intent with its declared cost.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub intent: Intent,
    pub cost: u32,
    pub tier: Tier,
}

/// What the AI side does next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AiDecision {
    EndTurn,
    Single(PlannedAction),
    /// Executed in order, re-validating before each step.
    Sequence(SmallVec<[PlannedAction; MAX_SEQUENCE]>),
}

impl AiDecision {
    /// The planned actions, empty for `EndTurn`.
    #[must_use]
    pub fn actions(&self) -> &[PlannedAction] {
        match self {
            AiDecision::EndTurn => &[],
            AiDecision::Single(action) => std::slice::from_ref(action),
            AiDecision::Sequence(actions) => actions,
        }
    }

    /// Cumulative declared cost.
    #[must_use]
    pub fn total_cost(&self) -> u32 {
        self.actions().iter().map(|a| a.cost).sum()
    }

    #[must_use]
    pub fn is_end_turn(&self) -> bool {
        matches!(self, AiDecision::EndTurn)
    }

    /// The decision as plain intents.
    #[must_use]
    pub fn intents(&self) -> Vec<Intent> {
        match self {
            AiDecision::EndTurn => vec![Intent::EndTurn],
            _ => self.actions().iter().map(|a| a.intent.clone()).collect(),
        }
    }
}

/// Internal planner inconsistency.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("creature {0} is not available to the plan")]
    UnknownCreature(CreatureId),

    #[error("item {0} is not available to the plan")]
    UnknownItem(ItemId),

    #[error("plan exceeds budget: needs {needed}, has {available}")]
    OverBudget { needed: u32, available: u32 },

    #[error("no field space left for {0}")]
    FieldFull(CreatureId),
}

// =============================================================================
// Plan Builder
// =============================================================================

/// Budget, bookkeeping and projected board for one planning pass.
#[derive(Clone, Debug)]
pub struct PlanBuilder<'a> {
    config: &'a DifficultyConfig,
    energy: u32,
    used: FxHashSet<CreatureId>,
    field: Vec<Creature>,
    hand: Vec<Creature>,
    opponents: Vec<Creature>,
    tools: Vec<Item>,
    spells: Vec<Item>,
    max_field: usize,
    actions: Vec<PlannedAction>,
}

impl<'a> PlanBuilder<'a> {
    /// Builder for `side`'s current board.
    #[must_use]
    pub fn for_side(state: &'a BattleState, side: Side) -> Self {
        let own = state.side(side);
        let opponent = state.side(side.opponent());
        Self {
            config: &state.config.difficulty,
            energy: own.energy(),
            used: own.acted.iter().copied().collect(),
            field: own.field.iter().cloned().collect(),
            hand: own.hand.iter().cloned().collect(),
            opponents: opponent.field.iter().cloned().collect(),
            tools: own.tools.iter().cloned().collect(),
            spells: own.spells.iter().cloned().collect(),
            max_field: own.max_field,
            actions: Vec::new(),
        }
    }

    /// Builder over explicit boards, for tests and tools.
    #[must_use]
    pub fn new(config: &'a DifficultyConfig, energy: u32, max_field: usize) -> Self {
        Self {
            config,
            energy,
            used: FxHashSet::default(),
            field: Vec::new(),
            hand: Vec::new(),
            opponents: Vec::new(),
            tools: Vec::new(),
            spells: Vec::new(),
            max_field,
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: Vec<Creature>) -> Self {
        self.field = field;
        self
    }

    #[must_use]
    pub fn with_hand(mut self, hand: Vec<Creature>) -> Self {
        self.hand = hand;
        self
    }

    #[must_use]
    pub fn with_opponents(mut self, opponents: Vec<Creature>) -> Self {
        self.opponents = opponents;
        self
    }

    #[must_use]
    pub fn with_items(mut self, tools: Vec<Item>, spells: Vec<Item>) -> Self {
        self.tools = tools;
        self.spells = spells;
        self
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &DifficultyConfig {
        self.config
    }

    /// Energy left after everything planned so far.
    #[must_use]
    pub fn energy(&self) -> u32 {
        self.energy
    }

    #[must_use]
    pub fn can_afford(&self, cost: u32) -> bool {
        self.energy >= cost
    }

    /// Projected own field, including creatures deployed by this plan.
    #[must_use]
    pub fn field(&self) -> &[Creature] {
        &self.field
    }

    #[must_use]
    pub fn hand(&self) -> &[Creature] {
        &self.hand
    }

    #[must_use]
    pub fn opponents(&self) -> &[Creature] {
        &self.opponents
    }

    #[must_use]
    pub fn tools(&self) -> &[Item] {
        &self.tools
    }

    #[must_use]
    pub fn spells(&self) -> &[Item] {
        &self.spells
    }

    #[must_use]
    pub fn field_creature(&self, id: CreatureId) -> Option<&Creature> {
        self.field.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn opponent(&self, id: CreatureId) -> Option<&Creature> {
        self.opponents.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn field_space(&self) -> usize {
        self.max_field.saturating_sub(self.field.len())
    }

    #[must_use]
    pub fn max_field(&self) -> usize {
        self.max_field
    }

    #[must_use]
    pub fn is_used(&self, id: CreatureId) -> bool {
        self.used.contains(&id)
    }

    /// Field creatures that can still be given an attack.
    pub fn ready_attackers(&self) -> impl Iterator<Item = &Creature> + '_ {
        self.field
            .iter()
            .filter(|c| !c.is_defending && !self.used.contains(&c.id))
    }

    #[must_use]
    pub fn actions(&self) -> &[PlannedAction] {
        &self.actions
    }

    #[must_use]
    pub fn into_actions(self) -> Vec<PlannedAction> {
        self.actions
    }

    // === Planning ===

    /// Give `id` its action for the turn without planning one.
    pub fn mark_used(&mut self, id: CreatureId) {
        self.used.insert(id);
    }

    fn charge(&mut self, intent: Intent, cost: u32, tier: Tier) -> Result<(), PlanError> {
        if cost > self.energy {
            return Err(PlanError::OverBudget {
                needed: cost,
                available: self.energy,
            });
        }
        self.energy -= cost;
        tracing::debug!(tier = tier.label(), %intent, cost, remaining = self.energy, "planned action");
        self.actions.push(PlannedAction { intent, cost, tier });
        Ok(())
    }

    fn require_field(&self, id: CreatureId) -> Result<(), PlanError> {
        match self.field_creature(id) {
            Some(_) => Ok(()),
            None => Err(PlanError::UnknownCreature(id)),
        }
    }

    /// Move a hand creature onto the projected field.
    pub fn deploy(&mut self, id: CreatureId, tier: Tier) -> Result<(), PlanError> {
        let index = self
            .hand
            .iter()
            .position(|c| c.id == id)
            .ok_or(PlanError::UnknownCreature(id))?;
        if self.field_space() == 0 {
            return Err(PlanError::FieldFull(id));
        }
        let cost = self.hand[index].deployment_cost();
        self.charge(Intent::Deploy { creature: id }, cost, tier)?;
        let creature = self.hand.remove(index);
        self.field.push(creature);
        Ok(())
    }

    pub fn attack(&mut self, attacker: CreatureId, target: CreatureId, tier: Tier) -> Result<(), PlanError> {
        self.require_field(attacker)?;
        if self.opponent(target).is_none() {
            return Err(PlanError::UnknownCreature(target));
        }
        let intent = Intent::Attack {
            attacker,
            target,
            attack_type: AttackType::Auto,
        };
        self.charge(intent, ATTACK_COST, tier)?;
        self.used.insert(attacker);
        Ok(())
    }

    pub fn defend(&mut self, creature: CreatureId, tier: Tier) -> Result<(), PlanError> {
        self.require_field(creature)?;
        self.charge(Intent::Defend { creature }, DEFEND_COST, tier)?;
        self.used.insert(creature);
        Ok(())
    }

    /// Consume a tool on an own field creature. Tools do not use up the
    /// target's action.
    pub fn use_tool(&mut self, tool: ItemId, target: CreatureId, tier: Tier) -> Result<(), PlanError> {
        self.require_field(target)?;
        let index = self
            .tools
            .iter()
            .position(|t| t.id == tool)
            .ok_or(PlanError::UnknownItem(tool))?;
        self.charge(Intent::UseTool { tool, target }, TOOL_COST, tier)?;
        self.tools.remove(index);
        Ok(())
    }

    pub fn cast(
        &mut self,
        spell: ItemId,
        caster: CreatureId,
        target: CreatureId,
        tier: Tier,
    ) -> Result<(), PlanError> {
        self.require_field(caster)?;
        if self.field_creature(target).is_none() && self.opponent(target).is_none() {
            return Err(PlanError::UnknownCreature(target));
        }
        let index = self
            .spells
            .iter()
            .position(|s| s.id == spell)
            .ok_or(PlanError::UnknownItem(spell))?;
        self.charge(Intent::UseSpell { spell, caster, target }, SPELL_COST, tier)?;
        self.spells.remove(index);
        self.used.insert(caster);
        Ok(())
    }
}

/// The highest-scoring item; the first one wins ties.
pub(crate) fn pick_best<T, I, F>(items: I, mut score: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> f64,
{
    let mut best: Option<(T, f64)> = None;
    for item in items {
        let value = score(&item);
        match &best {
            Some((_, top)) if value <= *top => {}
            _ => best = Some((item, value)),
        }
    }
    best.map(|(item, _)| item)
}

// =============================================================================
// Action Planner
// =============================================================================

/// Ordered ladder of tactics.
pub struct ActionPlanner {
    tactics: Vec<Box<dyn Tactic>>,
}

impl std::fmt::Debug for ActionPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tactics.iter().map(|t| t.tier()))
            .finish()
    }
}

impl Default for ActionPlanner {
    fn default() -> Self {
        Self::standard()
    }
}

impl ActionPlanner {
    /// The full eight-tier ladder.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_tactics(vec![
            Box::new(RescueCritical),
            Box::new(LethalStrike),
            Box::new(EmergencyMitigation),
            Box::new(DeploymentWave),
            Box::new(OffensiveSpell),
            Box::new(AttackBuff),
            Box::new(CoordinatedAssault),
            Box::new(UtilityActions),
        ])
    }

    /// A custom ladder, run in the given order.
    #[must_use]
    pub fn with_tactics(tactics: Vec<Box<dyn Tactic>>) -> Self {
        Self { tactics }
    }

    #[must_use]
    pub fn tiers(&self) -> Vec<Tier> {
        self.tactics.iter().map(|t| t.tier()).collect()
    }

    /// Plan `side`'s next move.
    ///
    /// Pure: reads the state and draws randomness from a stream derived
    /// from the turn and log position, never from the state's own stream.
    pub fn plan(&self, state: &BattleState, side: Side) -> Result<AiDecision, PlanError> {
        if state.is_over() || state.active != side || state.phase != Phase::Actions {
            return Ok(AiDecision::EndTurn);
        }
        let own = state.side(side);
        if (own.field.is_empty() && own.hand.is_empty()) || own.energy() == 0 {
            tracing::debug!(%side, energy = own.energy(), "nothing to plan with");
            return Ok(AiDecision::EndTurn);
        }

        let mut builder = PlanBuilder::for_side(state, side);
        let analysis = analyze_board(
            builder.field(),
            builder.opponents(),
            builder.hand(),
            state.config.tier(),
        );
        let mut rng = state.rng.for_context(&format!(
            "planner:{}:{}:{}",
            side.index(),
            state.turn,
            state.log.len()
        ));

        self.run_ladder(&mut builder, &analysis)?;
        if builder.actions().is_empty() {
            plan_fallback(&mut builder, &analysis, &mut rng)?;
        }

        let config = &state.config.difficulty;
        let multi_roll = rng.gen_bool(config.multi_action_chance);
        Ok(shape_decision(builder.into_actions(), own.energy(), config, multi_roll))
    }

    /// Run every tactic in order against one builder.
    pub fn run_ladder(&self, builder: &mut PlanBuilder<'_>, analysis: &BoardAnalysis) -> Result<(), PlanError> {
        for tactic in &self.tactics {
            let before = builder.actions().len();
            tactic.plan(builder, analysis)?;
            let added = builder.actions().len() - before;
            if added > 0 {
                tracing::debug!(tier = tactic.tier().label(), added, energy = builder.energy(), "tier planned");
            }
        }
        Ok(())
    }

    /// Like `plan`, but any error becomes `EndTurn`.
    #[must_use]
    pub fn plan_or_end_turn(&self, state: &BattleState, side: Side) -> AiDecision {
        match self.plan(state, side) {
            Ok(decision) => decision,
            Err(error) => {
                tracing::warn!(%side, %error, "planner failed, ending turn");
                AiDecision::EndTurn
            }
        }
    }
}

fn shape_decision(
    mut actions: Vec<PlannedAction>,
    energy: u32,
    config: &DifficultyConfig,
    multi_roll: bool,
) -> AiDecision {
    if actions.is_empty() {
        return AiDecision::EndTurn;
    }
    if multi_roll && energy >= SEQUENCE_MIN_ENERGY && actions.len() > 1 {
        let len = config.max_sequence_len.clamp(1, MAX_SEQUENCE);
        actions.truncate(len);
        return AiDecision::Sequence(actions.into_iter().collect());
    }
    AiDecision::Single(actions.swap_remove(0))
}

/// Plan the enemy's next move with the standard ladder.
#[must_use]
pub fn plan_ai_action(state: &BattleState) -> AiDecision {
    ActionPlanner::standard().plan_or_end_turn(state, Side::Enemy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Difficulty;
    use crate::creatures::{Attributes, CreatureTemplate, Rarity};

    fn creature(id: u32) -> Creature {
        Creature::new(
            CreatureId(id),
            CreatureTemplate::new("Test", Rarity::Common, 0, Attributes::uniform(5)),
        )
    }

    fn action(cost: u32) -> PlannedAction {
        PlannedAction {
            intent: Intent::EndTurn,
            cost,
            tier: Tier::Utility,
        }
    }

    #[test]
    fn test_builder_rejects_over_budget() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let mut builder = PlanBuilder::new(&config, 1, 4)
            .with_field(vec![creature(1)])
            .with_opponents(vec![creature(2)]);

        let err = builder.attack(CreatureId(1), CreatureId(2), Tier::Assault).unwrap_err();
        assert_eq!(err, PlanError::OverBudget { needed: 2, available: 1 });
        assert!(builder.actions().is_empty());
        assert!(!builder.is_used(CreatureId(1)));
    }

    #[test]
    fn test_builder_deploy_projects_field() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let mut builder = PlanBuilder::new(&config, 10, 4).with_hand(vec![creature(1)]);

        builder.deploy(CreatureId(1), Tier::Deployment).unwrap();
        assert_eq!(builder.energy(), 5);
        assert!(builder.hand().is_empty());
        assert_eq!(builder.field().len(), 1);
        assert_eq!(builder.actions()[0].cost, 5);
    }

    #[test]
    fn test_builder_attack_marks_used() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let mut builder = PlanBuilder::new(&config, 10, 4)
            .with_field(vec![creature(1)])
            .with_opponents(vec![creature(2)]);

        builder.attack(CreatureId(1), CreatureId(2), Tier::Assault).unwrap();
        assert!(builder.is_used(CreatureId(1)));
        assert_eq!(builder.ready_attackers().count(), 0);
    }

    #[test]
    fn test_pick_best_keeps_first_on_ties() {
        let best = pick_best([(1, 5.0), (2, 7.0), (3, 7.0)], |&(_, s)| s);
        assert_eq!(best, Some((2, 7.0)));
        assert_eq!(pick_best(Vec::<(u32, f64)>::new(), |&(_, s)| s), None);
    }

    #[test]
    fn test_shape_single_without_roll() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Expert);
        let decision = shape_decision(vec![action(2), action(2)], 10, &config, false);
        assert_eq!(decision, AiDecision::Single(action(2)));
    }

    #[test]
    fn test_shape_sequence_truncates() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Easy);
        let decision = shape_decision(vec![action(1), action(1), action(1)], 10, &config, true);
        assert_eq!(decision.actions().len(), 2);
        assert_eq!(decision.total_cost(), 2);
    }

    #[test]
    fn test_shape_sequence_needs_energy() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Expert);
        let decision = shape_decision(vec![action(1), action(1)], 3, &config, true);
        assert!(matches!(decision, AiDecision::Single(_)));
    }

    #[test]
    fn test_empty_plan_ends_turn() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Hard);
        assert!(shape_decision(Vec::new(), 10, &config, true).is_end_turn());
        assert_eq!(AiDecision::EndTurn.intents(), vec![Intent::EndTurn]);
    }
}
