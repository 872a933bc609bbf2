//! Battle engine: the reducer over `BattleState`.
//!
//! ## Transitions
//!
//! Every public entry point takes a state by reference and returns a
//! `Transition` carrying the next state, the log lines it appended and an
//! `ActionStatus`. The input state is never modified. Rejected intents
//! return an unchanged copy; the one exception is a duplicate action,
//! which is skipped with a log note.
//!
//! ## Turn flow
//!
//! ```text
//!   start_battle ──► Actions (player, turn 1)
//!                      │ EndTurn
//!                      ▼
//!   EffectTick ──begin_turn──► Actions ──EndTurn──► EffectTick (other side)
//! ```
//!
//! The outcome is settled after every transition and only ever once.

use crate::ai::{ActionPlanner, AiDecision, PlannedAction};
use crate::combat::{
    defeat_effects, resolve_attack, resolve_defend, resolve_spell, resolve_tool, CombatContext,
};
use crate::core::{
    ActionError, AttackType, BattleConfig, BattleRng, CreatureId, Intent, ItemId, LogEntry, Side,
};
use crate::creatures::{generate_enemy_deck, generate_enemy_items, Creature, CreatureTemplate, StatKind};
use crate::effects::{ActiveEffect, EffectKind, EffectTimeline, Item, StatModifiers, TimelineError};
use crate::energy::{ATTACK_COST, DEFEND_COST, SPELL_COST, TOOL_COST};

use super::state::{BattleState, Phase, SideState};

/// Consecutive actions that trigger the combo bonus.
pub const COMBO_THRESHOLD: u32 = 3;

/// Attack bonus granted by the combo.
pub const COMBO_BONUS: i32 = 2;

/// Upper bound on planner round-trips within one AI turn.
pub const MAX_AI_STEPS: usize = 32;

// =============================================================================
// Transition
// =============================================================================

/// How an intent was handled.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionStatus {
    Applied,
    /// Rejected before any mutation; the state is unchanged.
    Rejected(ActionError),
    /// A duplicate action, skipped with a log note.
    Skipped(ActionError),
    /// A resolver met a malformed record and did nothing.
    Degraded(String),
}

impl ActionStatus {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionStatus::Applied)
    }

    #[must_use]
    pub fn error(&self) -> Option<&ActionError> {
        match self {
            ActionStatus::Rejected(err) | ActionStatus::Skipped(err) => Some(err),
            ActionStatus::Applied | ActionStatus::Degraded(_) => None,
        }
    }
}

/// Result of one engine step.
#[derive(Clone, Debug)]
pub struct Transition {
    pub state: BattleState,
    /// Entries appended by this step.
    pub log: Vec<LogEntry>,
    pub status: ActionStatus,
}

impl Transition {
    fn new(state: BattleState, log_start: usize, status: ActionStatus) -> Self {
        let log = state.log.since(log_start).cloned().collect();
        Self { state, log, status }
    }

    fn rejected(state: &BattleState, error: ActionError) -> Self {
        tracing::debug!(%error, code = error.error_code(), "intent rejected");
        Self {
            state: state.clone(),
            log: Vec::new(),
            status: ActionStatus::Rejected(error),
        }
    }
}

// =============================================================================
// Battle Setup
// =============================================================================

/// Everything needed to start a battle.
#[derive(Clone, Debug)]
pub struct BattleSetup {
    pub config: BattleConfig,
    pub seed: u64,
    /// Player creatures in deck order. The first few form the opening hand.
    pub creatures: Vec<CreatureTemplate>,
    pub tools: Vec<Item>,
    pub spells: Vec<Item>,
}

impl BattleSetup {
    #[must_use]
    pub fn new(config: BattleConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            creatures: Vec::new(),
            tools: Vec::new(),
            spells: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_creatures(mut self, creatures: Vec<CreatureTemplate>) -> Self {
        self.creatures = creatures;
        self
    }

    /// Player items. Their ids are reassigned by the battle.
    #[must_use]
    pub fn with_items(mut self, tools: Vec<Item>, spells: Vec<Item>) -> Self {
        self.tools = tools;
        self.spells = spells;
        self
    }
}

/// Build the opening state: player deck and hand from the setup, enemy deck,
/// hand and items from the difficulty table.
///
/// Templates that fail validation are left out with a log line.
#[must_use]
pub fn start_battle(setup: BattleSetup) -> BattleState {
    let BattleSetup {
        config,
        seed,
        creatures,
        tools,
        spells,
    } = setup;
    let mut state = BattleState::new(config, BattleRng::new(seed));
    let tier = state.config.tier();
    state.log_line(None, format!("Battle started on {tier} difficulty"));

    for template in creatures {
        if let Err(err) = template.validate() {
            tracing::warn!(species = %template.species, %err, "template rejected at battle start");
            state.log_line(Some(Side::Player), format!("{} cannot join the battle: {err}", template.species));
            continue;
        }
        let id = state.ids.creature();
        state.sides[Side::Player].deck.push_back(Creature::new(id, template));
    }
    for tool in tools {
        let id = state.ids.item();
        state.sides[Side::Player].tools.push_back(Item { id, ..tool });
    }
    for spell in spells {
        let id = state.ids.item();
        state.sides[Side::Player].spells.push_back(Item { id, ..spell });
    }

    let mut generation = state.rng.fork();
    for template in generate_enemy_deck(&state.config.difficulty, &mut generation) {
        let id = state.ids.creature();
        state.sides[Side::Enemy].deck.push_back(Creature::new(id, template));
    }
    let (enemy_tools, enemy_spells) =
        generate_enemy_items(&state.config.difficulty, &mut state.ids, &mut generation);
    state.sides[Side::Enemy].tools = enemy_tools.into_iter().collect();
    state.sides[Side::Enemy].spells = enemy_spells.into_iter().collect();

    let opening = [
        (Side::Player, state.config.player_initial_hand),
        (Side::Enemy, state.config.difficulty.initial_hand_size),
    ];
    for (side, count) in opening {
        for _ in 0..count {
            if state.sides[side].draw().is_none() {
                break;
            }
        }
    }

    // The player's first turn starts directly in the action phase.
    state.sides[Side::Player].timeline = EffectTimeline::stamped(1);

    tracing::debug!(
        seed,
        %tier,
        player_deck = state.sides[Side::Player].all_ids().count(),
        enemy_deck = state.sides[Side::Enemy].all_ids().count(),
        "battle started"
    );
    settle_outcome(&mut state);
    state
}

// =============================================================================
// Intents
// =============================================================================

enum Resolved {
    Done,
    Degraded(String),
}

fn check_turn(state: &BattleState, side: Side) -> Result<(), ActionError> {
    if state.is_over() {
        return Err(ActionError::BattleOver);
    }
    if state.active != side {
        return Err(ActionError::NotYourTurn(side));
    }
    if state.phase != Phase::Actions {
        return Err(ActionError::WrongPhase);
    }
    Ok(())
}

fn ensure_affordable(side: &SideState, cost: u32) -> Result<(), ActionError> {
    if side.ledger.can_afford(cost) {
        Ok(())
    } else {
        Err(ActionError::InsufficientEnergy {
            needed: cost,
            available: side.energy(),
        })
    }
}

fn ensure_fresh(side: &SideState, id: CreatureId) -> Result<(), ActionError> {
    if side.acted.contains(&id) {
        Err(ActionError::AlreadyActed(id))
    } else {
        Ok(())
    }
}

/// Apply `side`'s intent.
#[must_use]
pub fn apply_action(state: &BattleState, side: Side, intent: &Intent) -> Transition {
    if let Err(err) = check_turn(state, side) {
        return Transition::rejected(state, err);
    }

    let mut next = state.clone();
    let log_start = next.log.len();
    let result = match *intent {
        Intent::Deploy { creature } => deploy(&mut next, side, creature),
        Intent::Attack {
            attacker,
            target,
            attack_type,
        } => attack(&mut next, side, attacker, target, attack_type),
        Intent::UseTool { tool, target } => use_tool(&mut next, side, tool, target),
        Intent::UseSpell {
            spell,
            caster,
            target,
        } => use_spell(&mut next, side, spell, caster, target),
        Intent::Defend { creature } => defend(&mut next, side, creature),
        Intent::EndTurn => end_turn(&mut next, side),
    };

    match result {
        Ok(Resolved::Done) => {
            if !intent.is_end_turn() {
                register_action(&mut next, side);
            }
            clear_fallen(&mut next);
            settle_outcome(&mut next);
            tracing::debug!(%side, %intent, turn = next.turn, "intent applied");
            Transition::new(next, log_start, ActionStatus::Applied)
        }
        Ok(Resolved::Degraded(reason)) => {
            tracing::warn!(%side, %intent, %reason, "intent degraded");
            Transition::new(next, log_start, ActionStatus::Degraded(reason))
        }
        Err(err) if err.is_duplicate() => {
            let mut noted = state.clone();
            noted.log_line(Some(side), format!("Skipped {intent}: {err}"));
            Transition::new(noted, log_start, ActionStatus::Skipped(err))
        }
        Err(err) => Transition::rejected(state, err),
    }
}

/// Apply a player intent.
#[must_use]
pub fn apply_player_action(state: &BattleState, intent: &Intent) -> Transition {
    apply_action(state, Side::Player, intent)
}

fn deploy(state: &mut BattleState, side: Side, id: CreatureId) -> Result<Resolved, ActionError> {
    let own = &mut state.sides[side];
    if own.field_index(id).is_some() {
        return Err(ActionError::AlreadyDeployed(id));
    }
    let index = own.hand_index(id).ok_or(ActionError::NotInHand(id))?;
    if !own.has_field_space() {
        return Err(ActionError::FieldFull {
            capacity: own.max_field,
        });
    }
    let cost = own.hand[index].deployment_cost();
    own.ledger.spend(cost)?;
    let creature = own.hand.remove(index);
    let message = format!("{} deployed for {cost} energy", creature.name());
    own.field.push_back(creature);
    state.log_line(Some(side), message);
    Ok(Resolved::Done)
}

fn attack(
    state: &mut BattleState,
    side: Side,
    attacker_id: CreatureId,
    target_id: CreatureId,
    attack_type: AttackType,
) -> Result<Resolved, ActionError> {
    let own = &state.sides[side];
    let attacker = own
        .field_creature(attacker_id)
        .ok_or(ActionError::NotOnField(attacker_id))?
        .clone();
    ensure_fresh(own, attacker_id)?;
    let defender = state.sides[side.opponent()]
        .field_creature(target_id)
        .ok_or(ActionError::TargetNotFound(target_id))?
        .clone();
    ensure_affordable(own, ATTACK_COST)?;

    let mut ctx = CombatContext::new(&mut state.rng, state.turn, &state.config.difficulty);
    let resolution = resolve_attack(&attacker, &defender, attack_type, &mut ctx);
    if let Some(reason) = resolution.outcome.diagnostic {
        state.log_line(Some(side), resolution.outcome.log);
        return Ok(Resolved::Degraded(reason));
    }

    let own = &mut state.sides[side];
    own.ledger.spend(ATTACK_COST)?;
    own.replace_on_field(resolution.attacker);
    own.acted.insert(attacker_id);
    state.sides[side.opponent()].replace_on_field(resolution.defender);
    state.log_line(Some(side), resolution.outcome.log);
    Ok(Resolved::Done)
}

fn use_tool(
    state: &mut BattleState,
    side: Side,
    tool_id: ItemId,
    target_id: CreatureId,
) -> Result<Resolved, ActionError> {
    let own = &state.sides[side];
    let tool = own.tool(tool_id).ok_or(ActionError::UnknownItem(tool_id))?.clone();
    let target = own
        .field_creature(target_id)
        .ok_or(ActionError::NotOnField(target_id))?
        .clone();

    let mut ctx = CombatContext::new(&mut state.rng, state.turn, &state.config.difficulty);
    let resolution = resolve_tool(&target, &tool, &mut ctx);
    if let Some(reason) = resolution.outcome.diagnostic {
        state.log_line(Some(side), resolution.outcome.log);
        return Ok(Resolved::Degraded(reason));
    }

    let own = &mut state.sides[side];
    own.ledger.spend(TOOL_COST)?;
    own.tools.retain(|t| t.id != tool_id);
    own.replace_on_field(resolution.target);
    state.log_line(Some(side), resolution.outcome.log);
    Ok(Resolved::Done)
}

fn use_spell(
    state: &mut BattleState,
    side: Side,
    spell_id: ItemId,
    caster_id: CreatureId,
    target_id: CreatureId,
) -> Result<Resolved, ActionError> {
    let own = &state.sides[side];
    let spell = own.spell(spell_id).ok_or(ActionError::UnknownItem(spell_id))?.clone();
    let caster = own
        .field_creature(caster_id)
        .ok_or(ActionError::NotOnField(caster_id))?
        .clone();
    ensure_fresh(own, caster_id)?;
    let (target_side, target) = state
        .find_on_field(target_id)
        .map(|(s, c)| (s, c.clone()))
        .ok_or(ActionError::TargetNotFound(target_id))?;
    ensure_affordable(own, SPELL_COST)?;

    let mut ctx = CombatContext::new(&mut state.rng, state.turn, &state.config.difficulty);
    let resolution = resolve_spell(&caster, &target, &spell, &mut ctx);
    if let Some(reason) = resolution.outcome.diagnostic {
        state.log_line(Some(side), resolution.outcome.log);
        return Ok(Resolved::Degraded(reason));
    }

    let own = &mut state.sides[side];
    own.ledger.spend(SPELL_COST)?;
    own.spells.retain(|s| s.id != spell_id);
    own.acted.insert(caster_id);
    if caster_id == target_id {
        own.replace_on_field(resolution.target);
    } else {
        own.replace_on_field(resolution.caster);
        state.sides[target_side].replace_on_field(resolution.target);
    }
    state.log_line(Some(side), resolution.outcome.log);
    Ok(Resolved::Done)
}

fn defend(state: &mut BattleState, side: Side, id: CreatureId) -> Result<Resolved, ActionError> {
    let own = &state.sides[side];
    let creature = own.field_creature(id).ok_or(ActionError::NotOnField(id))?.clone();
    ensure_fresh(own, id)?;
    ensure_affordable(own, DEFEND_COST)?;

    let mut ctx = CombatContext::new(&mut state.rng, state.turn, &state.config.difficulty);
    let resolution = resolve_defend(&creature, &mut ctx);
    if let Some(reason) = resolution.outcome.diagnostic {
        state.log_line(Some(side), resolution.outcome.log);
        return Ok(Resolved::Degraded(reason));
    }

    let own = &mut state.sides[side];
    own.ledger.spend(DEFEND_COST)?;
    own.replace_on_field(resolution.creature);
    own.acted.insert(id);
    state.log_line(Some(side), resolution.outcome.log);
    Ok(Resolved::Done)
}

fn end_turn(state: &mut BattleState, side: Side) -> Result<Resolved, ActionError> {
    let threshold = state.config.decay_threshold;
    let lost = state.sides[side].ledger.decay(threshold);
    if lost > 0 {
        state.log_line(Some(side), format!("{lost} unspent energy decays"));
    }
    let turn = state.turn;
    state.log_line(Some(side), format!("{side} ends turn {turn}"));

    if side == Side::Enemy {
        state.turn += 1;
    }
    state.active = side.opponent();
    state.phase = Phase::EffectTick;
    Ok(Resolved::Done)
}

// =============================================================================
// Bookkeeping
// =============================================================================

fn combo_surge(turn: u32) -> ActiveEffect {
    ActiveEffect::new("Combo Surge", EffectKind::Buff, 1, turn)
        .with_modifiers(StatModifiers::uniform(
            &[StatKind::PhysicalAttack, StatKind::MagicalAttack],
            COMBO_BONUS,
        ))
        .with_description("Momentum from a chain of actions")
}

/// Count an action toward the combo and grant it once per turn.
fn register_action(state: &mut BattleState, side: Side) {
    let turn = state.turn;
    let own = &mut state.sides[side];
    own.consecutive_actions += 1;
    if own.consecutive_actions < COMBO_THRESHOLD || own.combo_granted {
        return;
    }
    own.combo_granted = true;
    if own.field.is_empty() {
        return;
    }
    let surge = combo_surge(turn);
    for creature in own.field.iter_mut() {
        creature.attach_effect(surge.clone());
    }
    let count = own.consecutive_actions;
    tracing::debug!(%side, turn, count, "combo granted");
    state.log_line(
        Some(side),
        format!("Combo x{count}! Every creature gains +{COMBO_BONUS} attack this turn"),
    );
}

/// Remove defeated creatures from both fields and apply their parting effects.
pub(crate) fn clear_fallen(state: &mut BattleState) {
    let turn = state.turn;
    for side in Side::ALL {
        let fallen_creatures = state.sides[side].remove_defeated();
        for fallen in fallen_creatures {
            let effects = defeat_effects(&fallen, turn);
            tracing::debug!(%side, creature = %fallen.id, turn, "creature removed");
            for line in effects.log {
                state.log_line(Some(side), line);
            }
            if let Some(gift) = effects.allies {
                for ally in state.sides[side].field.iter_mut() {
                    ally.attach_effect(gift.clone());
                }
            }
            if let Some(guilt) = effects.opponents {
                for foe in state.sides[side.opponent()].field.iter_mut() {
                    foe.attach_effect(guilt.clone());
                }
            }
        }
    }
    for side in Side::ALL {
        let cap = state.sides[side].max_energy(&state.config.difficulty);
        state.sides[side].ledger.clamp_to(cap);
    }
}

/// Record the outcome if a side has nothing left. Fires at most once.
///
/// When both sides run out together, the side that was acting wins.
pub fn settle_outcome(state: &mut BattleState) -> Option<Side> {
    if let Some(winner) = state.winner() {
        return Some(winner);
    }
    let player_out = state.sides[Side::Player].is_exhausted();
    let enemy_out = state.sides[Side::Enemy].is_exhausted();
    let winner = match (player_out, enemy_out) {
        (true, true) => state.active,
        (true, false) => Side::Enemy,
        (false, true) => Side::Player,
        (false, false) => return None,
    };
    if state.set_winner(winner) {
        tracing::debug!(%winner, turn = state.turn, "battle settled");
        state.log_line(None, format!("{winner} wins the battle"));
    }
    Some(winner)
}

// =============================================================================
// Turn Start
// =============================================================================

/// Process the active side's turn start: effects tick, fallen creatures
/// leave, one card is drawn and energy regenerates.
#[must_use]
pub fn begin_turn(state: &BattleState) -> Transition {
    if state.is_over() {
        return Transition::rejected(state, ActionError::BattleOver);
    }
    if state.phase != Phase::EffectTick {
        return Transition::rejected(state, ActionError::EffectsAlreadyProcessed { turn: state.turn });
    }

    let side = state.active;
    let turn = state.turn;
    let mut next = state.clone();
    let log_start = next.log.len();
    let scale = next.config.difficulty.health_over_time_scale;

    let own = &mut next.sides[side];
    let reports = match own.timeline.process(turn, own.field.iter_mut(), scale) {
        Ok(reports) => reports,
        Err(TimelineError::AlreadyProcessed { turn }) => {
            return Transition::rejected(state, ActionError::EffectsAlreadyProcessed { turn });
        }
    };
    for line in reports.iter().flat_map(|r| r.describe()) {
        next.log_line(Some(side), line);
    }
    clear_fallen(&mut next);

    if next.sides[side].draw().is_some() {
        if let Some(drawn) = next.sides[side].hand.back() {
            let message = format!("draws {}", drawn.name());
            next.log_line(Some(side), message);
        }
    }

    let own = &mut next.sides[side];
    let report = own.ledger.regenerate(&next.config.difficulty, own.field.iter());
    let energy = own.energy();
    own.reset_turn_counters();
    next.log_line(
        Some(side),
        format!(
            "gains {} energy ({energy}/{})",
            report.gained, report.max_energy
        ),
    );

    next.phase = Phase::Actions;
    settle_outcome(&mut next);
    tracing::debug!(%side, turn, energy, "turn started");
    Transition::new(next, log_start, ActionStatus::Applied)
}

// =============================================================================
// AI Execution
// =============================================================================

/// Check a planned step still makes sense before replaying it.
fn revalidate(state: &BattleState, side: Side, step: &PlannedAction) -> Result<(), ActionError> {
    let own = state.side(side);
    ensure_affordable(own, step.cost)?;
    let on_field = |id: CreatureId| {
        own.field_creature(id)
            .map(|_| ())
            .ok_or(ActionError::NotOnField(id))
    };
    match step.intent {
        Intent::Deploy { creature } => own
            .hand_creature(creature)
            .map(|_| ())
            .ok_or(ActionError::NotInHand(creature)),
        Intent::Attack { attacker, target, .. } => {
            on_field(attacker)?;
            state.side(side.opponent())
                .field_creature(target)
                .map(|_| ())
                .ok_or(ActionError::TargetNotFound(target))
        }
        Intent::UseTool { target, .. } => on_field(target),
        Intent::UseSpell { caster, target, .. } => {
            on_field(caster)?;
            state
                .find_on_field(target)
                .map(|_| ())
                .ok_or(ActionError::TargetNotFound(target))
        }
        Intent::Defend { creature } => on_field(creature),
        Intent::EndTurn => Ok(()),
    }
}

/// Replay an AI decision for the enemy, one step at a time.
///
/// Steps that no longer validate (energy spent, creature gone) are skipped
/// with a log note and the rest of the sequence still runs.
#[must_use]
pub fn execute_ai_decision(state: &BattleState, decision: &AiDecision) -> Transition {
    let side = Side::Enemy;
    if decision.is_end_turn() {
        return apply_action(state, side, &Intent::EndTurn);
    }

    let log_start = state.log.len();
    let mut current = state.clone();
    let mut applied = 0;
    for step in decision.actions() {
        if current.is_over() {
            break;
        }
        if let Err(err) = revalidate(&current, side, step) {
            tracing::warn!(intent = %step.intent, %err, tier = step.tier.label(), "planned step skipped");
            current.log_line(Some(side), format!("Skipped {}: {err}", step.intent));
            continue;
        }
        let transition = apply_action(&current, side, &step.intent);
        match &transition.status {
            ActionStatus::Applied => applied += 1,
            ActionStatus::Rejected(err) => {
                tracing::warn!(intent = %step.intent, %err, "planned step rejected");
                current.log_line(Some(side), format!("Skipped {}: {err}", step.intent));
                continue;
            }
            ActionStatus::Skipped(_) | ActionStatus::Degraded(_) => {}
        }
        current = transition.state;
    }

    let status = if applied > 0 {
        ActionStatus::Applied
    } else {
        ActionStatus::Degraded("no planned step could be executed".to_string())
    };
    Transition::new(current, log_start, status)
}

/// Play the enemy's whole turn: turn start, planned actions, end turn.
#[must_use]
pub fn run_ai_turn(state: &BattleState) -> Transition {
    run_turn_with(&ActionPlanner::standard(), state)
}

/// `run_ai_turn` with a custom planner.
#[must_use]
pub fn run_turn_with(planner: &ActionPlanner, state: &BattleState) -> Transition {
    let side = Side::Enemy;
    if state.is_over() {
        return Transition::rejected(state, ActionError::BattleOver);
    }
    if state.active != side {
        return Transition::rejected(state, ActionError::NotYourTurn(side));
    }

    let log_start = state.log.len();
    let mut current = state.clone();
    if current.phase == Phase::EffectTick {
        let start = begin_turn(&current);
        if !start.status.is_applied() {
            return start;
        }
        current = start.state;
    }

    for _ in 0..MAX_AI_STEPS {
        if current.is_over() {
            break;
        }
        let decision = planner.plan_or_end_turn(&current, side);
        if decision.is_end_turn() {
            break;
        }
        let step = execute_ai_decision(&current, &decision);
        let progressed = step.status.is_applied();
        current = step.state;
        if !progressed {
            break;
        }
    }

    if !current.is_over() {
        current = apply_action(&current, side, &Intent::EndTurn).state;
    }
    Transition::new(current, log_start, ActionStatus::Applied)
}
