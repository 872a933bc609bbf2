//! Planner tactics, one per ladder tier.
//!
//! Tactics are stateless and trait-based so a custom ladder can reorder,
//! drop or replace tiers:
//! - `RescueCritical`: defensive tool on the first critical creature
//! - `LethalStrike`: spells then attacks when they project a wipe
//! - `EmergencyMitigation`: shield or defend threatened creatures
//! - `DeploymentWave`: urgency-sized deployment from the hand
//! - `OffensiveSpell`: best spell, caster and target combination
//! - `AttackBuff`: attack tool on the strongest ready attacker
//! - `CoordinatedAssault`: prioritised target assignment
//! - `UtilityActions`: echo sustain and precautionary defends

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use super::analysis::BoardAnalysis;
use super::planner::{pick_best, PlanBuilder, PlanError, Tier};
use super::scoring::{
    attack_power, caster_score, creature_value, defensive_tool_score, deployment_score,
    estimate_attack_damage, estimate_spell_damage, is_damage_spell, is_shield_item,
    spell_option_score, target_priority,
};
use crate::core::{CreatureId, ItemId};
use crate::creatures::Attribute;
use crate::effects::ItemEffect;
use crate::energy::{ATTACK_COST, DEFEND_COST, SPELL_COST};

/// Share of opposing health a lethal plan must project.
pub const LETHAL_THRESHOLD: f64 = 0.9;

/// Utility actions per turn.
pub const MAX_UTILITY_ACTIONS: usize = 2;

/// One rung of the planning ladder.
pub trait Tactic: Send + Sync {
    /// Which rung this is, for logging and attribution.
    fn tier(&self) -> Tier;

    /// Append this tier's actions to the plan.
    ///
    /// Tactics only add actions that fit the remaining budget. An error
    /// means the builder and the tactic disagree about the board.
    fn plan(&self, plan: &mut PlanBuilder<'_>, analysis: &BoardAnalysis) -> Result<(), PlanError>;
}

// =============================================================================
// Tier 0: Rescue
// =============================================================================

/// Defensive tool on the first critical creature.
#[derive(Clone, Debug, Default)]
pub struct RescueCritical;

impl Tactic for RescueCritical {
    fn tier(&self) -> Tier {
        Tier::Rescue
    }

    fn plan(&self, plan: &mut PlanBuilder<'_>, analysis: &BoardAnalysis) -> Result<(), PlanError> {
        let Some(&target) = analysis.critical.first() else {
            return Ok(());
        };
        let Some(creature) = plan.field_creature(target) else {
            return Ok(());
        };
        let tool = pick_best(
            plan.tools().iter().filter(|t| t.is_defensive_tool()),
            |t| defensive_tool_score(t, creature),
        )
        .map(|t| t.id);

        if let Some(tool) = tool {
            plan.use_tool(tool, target, self.tier())?;
        }
        Ok(())
    }
}

// =============================================================================
// Tier 1: Lethal
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LethalStep {
    Cast {
        spell: ItemId,
        caster: CreatureId,
        target: CreatureId,
    },
    Strike {
        attacker: CreatureId,
        target: CreatureId,
    },
}

/// Commit spells and attacks when together they project a wipe.
///
/// Damage on each target is capped at its remaining health, so overkill
/// never counts toward the threshold.
#[derive(Clone, Debug, Default)]
pub struct LethalStrike;

impl LethalStrike {
    fn search(plan: &PlanBuilder<'_>) -> Option<Vec<LethalStep>> {
        let opponents = plan.opponents();
        let total: u32 = opponents.iter().map(|c| c.current_health).sum();
        if total == 0 {
            return None;
        }

        let mut remaining: FxHashMap<CreatureId, u32> =
            opponents.iter().map(|c| (c.id, c.current_health)).collect();
        let mut acted: Vec<CreatureId> = Vec::new();
        let mut energy = plan.energy();
        let mut dealt = 0u32;
        let mut steps = Vec::new();

        for spell in plan.spells().iter().filter(|s| is_damage_spell(s)) {
            if energy < SPELL_COST {
                break;
            }
            let Some(caster) = pick_best(
                plan.field()
                    .iter()
                    .filter(|c| !plan.is_used(c.id) && !acted.contains(&c.id)),
                |c| caster_score(c, spell),
            ) else {
                break;
            };
            let alive = opponents.iter().filter(|c| remaining[&c.id] > 0);
            let focus_weakest =
                spell.effect == ItemEffect::Surge || spell.item_type == Attribute::Strength;
            let target = if focus_weakest {
                pick_best(alive, |c| -f64::from(remaining[&c.id]))
            } else {
                pick_best(alive, |c| f64::from(attack_power(c)))
            };
            let Some(target) = target else {
                break;
            };

            let left = remaining[&target.id];
            let damage = estimate_spell_damage(spell, caster, target).min(left);
            remaining.insert(target.id, left - damage);
            dealt += damage;
            energy -= SPELL_COST;
            acted.push(caster.id);
            steps.push(LethalStep::Cast {
                spell: spell.id,
                caster: caster.id,
                target: target.id,
            });
        }

        let attackers: Vec<_> = plan
            .ready_attackers()
            .filter(|c| !acted.contains(&c.id))
            .take((energy / ATTACK_COST) as usize)
            .collect();
        for attacker in attackers {
            let Some(target) = pick_best(
                opponents.iter().filter(|c| remaining[&c.id] > 0),
                |c| -f64::from(remaining[&c.id]),
            ) else {
                break;
            };
            let left = remaining[&target.id];
            let damage = (estimate_attack_damage(attacker, target) as u32).min(left);
            remaining.insert(target.id, left - damage);
            dealt += damage;
            steps.push(LethalStep::Strike {
                attacker: attacker.id,
                target: target.id,
            });
        }

        let lethal = f64::from(dealt) >= f64::from(total) * LETHAL_THRESHOLD;
        tracing::trace!(dealt, total, lethal, "lethal search");
        lethal.then_some(steps)
    }
}

impl Tactic for LethalStrike {
    fn tier(&self) -> Tier {
        Tier::Lethal
    }

    fn plan(&self, plan: &mut PlanBuilder<'_>, _analysis: &BoardAnalysis) -> Result<(), PlanError> {
        if plan.opponents().is_empty() {
            return Ok(());
        }
        let Some(steps) = Self::search(plan) else {
            return Ok(());
        };
        for step in steps {
            match step {
                LethalStep::Cast { spell, caster, target } => {
                    plan.cast(spell, caster, target, self.tier())?;
                }
                LethalStep::Strike { attacker, target } => {
                    plan.attack(attacker, target, self.tier())?;
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tier 2: Emergency
// =============================================================================

/// Shield each threatened creature, or have it defend.
#[derive(Clone, Debug, Default)]
pub struct EmergencyMitigation;

impl Tactic for EmergencyMitigation {
    fn tier(&self) -> Tier {
        Tier::Emergency
    }

    fn plan(&self, plan: &mut PlanBuilder<'_>, analysis: &BoardAnalysis) -> Result<(), PlanError> {
        for &id in &analysis.threatened {
            let Some(creature) = plan.field_creature(id) else {
                continue;
            };
            if creature.is_defending || plan.is_used(id) {
                continue;
            }
            let shield = plan.tools().iter().find(|t| is_shield_item(t)).map(|t| t.id);
            if let Some(tool) = shield {
                plan.use_tool(tool, id, self.tier())?;
                plan.mark_used(id);
            } else if plan.can_afford(DEFEND_COST) {
                plan.defend(id, self.tier())?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tier 3: Deployment
// =============================================================================

/// How pressing it is to put creatures on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Normal,
    Medium,
    High,
    Critical,
}

impl Urgency {
    /// Creatures to deploy this turn for the given space and energy.
    #[must_use]
    pub fn wave_size(self, space: usize, energy: u32) -> usize {
        let energy = energy as usize;
        match self {
            Urgency::Critical => space.min(3).min(energy / 3),
            Urgency::High => space.min(2).min(energy / 4),
            Urgency::Medium => space.min(2).min(energy / 5),
            Urgency::Normal => 1,
        }
    }
}

/// Weighted deployment pressure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeploymentUrgency {
    pub score: u32,
    pub level: Urgency,
    pub should_deploy: bool,
}

/// Score deployment pressure from field sizes, energy and the analysis.
#[must_use]
pub fn deployment_urgency(
    field_len: usize,
    max_field: usize,
    opponent_len: usize,
    energy: u32,
    analysis: &BoardAnalysis,
) -> DeploymentUrgency {
    let space = max_field.saturating_sub(field_len);
    let utilisation = field_len as f64 / max_field.max(1) as f64;

    let mut score = 0;
    if space > 0 && utilisation < 0.8 {
        score += 2;
    }
    if energy >= 3 {
        score += 1;
    }
    if field_len < opponent_len {
        score += 3;
    }
    if analysis.own_power < analysis.opponent_power * 0.8 {
        score += 3;
    }
    if field_len < 3 {
        score += 2;
    }
    if analysis.hand_quality > 5.0 {
        score += 1;
    }
    if analysis.aggressive {
        score += 1;
    }

    let level = if field_len == 0 {
        Urgency::Critical
    } else if score >= 8 {
        Urgency::High
    } else if score >= 5 {
        Urgency::Medium
    } else {
        Urgency::Normal
    };

    DeploymentUrgency {
        score,
        level,
        should_deploy: score >= 3 && space > 0 && energy >= 3,
    }
}

/// Deploy the best-scoring hand creatures, sized by urgency.
#[derive(Clone, Debug, Default)]
pub struct DeploymentWave;

impl Tactic for DeploymentWave {
    fn tier(&self) -> Tier {
        Tier::Deployment
    }

    fn plan(&self, plan: &mut PlanBuilder<'_>, analysis: &BoardAnalysis) -> Result<(), PlanError> {
        if plan.hand().is_empty() {
            return Ok(());
        }
        let urgency = deployment_urgency(
            plan.field().len(),
            plan.max_field(),
            plan.opponents().len(),
            plan.energy(),
            analysis,
        );
        if !urgency.should_deploy {
            return Ok(());
        }
        let wave = urgency.level.wave_size(plan.field_space(), plan.energy());

        let difficulty = plan.config().difficulty;
        let mut ranked: Vec<(CreatureId, u32, f64)> = plan
            .hand()
            .iter()
            .map(|c| {
                let score = deployment_score(c, plan.field(), plan.opponents(), difficulty);
                (c.id, c.deployment_cost(), score)
            })
            .collect();
        ranked.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));

        let mut deployed = 0;
        for (id, cost, _) in ranked {
            if deployed >= wave || plan.field_space() == 0 {
                break;
            }
            if !plan.can_afford(cost) {
                continue;
            }
            plan.deploy(id, self.tier())?;
            deployed += 1;
        }
        Ok(())
    }
}

// =============================================================================
// Tier 4: Offensive Spell
// =============================================================================

/// Cast the best offensive spell from an unused caster.
#[derive(Clone, Debug, Default)]
pub struct OffensiveSpell;

impl Tactic for OffensiveSpell {
    fn tier(&self) -> Tier {
        Tier::Spell
    }

    fn plan(&self, plan: &mut PlanBuilder<'_>, _analysis: &BoardAnalysis) -> Result<(), PlanError> {
        if !plan.can_afford(SPELL_COST) || plan.opponents().is_empty() {
            return Ok(());
        }
        let view: &PlanBuilder<'_> = plan;
        let opponents = view.opponents().len();
        let options = view
            .spells()
            .iter()
            .filter(|s| s.is_offensive_spell())
            .flat_map(move |spell| {
                view.field()
                    .iter()
                    .filter(move |c| !view.is_used(c.id))
                    .flat_map(move |caster| view.opponents().iter().map(move |target| (spell, caster, target)))
            });
        let best = pick_best(options, |(spell, caster, target)| {
            spell_option_score(spell, caster, target, opponents)
        })
        .map(|(spell, caster, target)| (spell.id, caster.id, target.id));

        if let Some((spell, caster, target)) = best {
            plan.cast(spell, caster, target, self.tier())?;
        }
        Ok(())
    }
}

// =============================================================================
// Tier 5: Attack Buff
// =============================================================================

/// Attack tool on the strongest creature that can still attack.
///
/// The buffed creature keeps its action for the assault tier.
#[derive(Clone, Debug, Default)]
pub struct AttackBuff;

impl Tactic for AttackBuff {
    fn tier(&self) -> Tier {
        Tier::Buff
    }

    fn plan(&self, plan: &mut PlanBuilder<'_>, _analysis: &BoardAnalysis) -> Result<(), PlanError> {
        if !plan.can_afford(ATTACK_COST) || plan.opponents().is_empty() {
            return Ok(());
        }
        let Some(tool) = plan.tools().iter().find(|t| t.is_attack_tool()).map(|t| t.id) else {
            return Ok(());
        };
        let attacker = pick_best(plan.ready_attackers(), |c| c.power()).map(|c| c.id);
        if let Some(attacker) = attacker {
            plan.use_tool(tool, attacker, self.tier())?;
        }
        Ok(())
    }
}

// =============================================================================
// Tier 6: Coordinated Assault
// =============================================================================

/// Rank targets and assign attackers to maximise eliminations.
#[derive(Clone, Debug, Default)]
pub struct CoordinatedAssault;

impl CoordinatedAssault {
    /// Attacker/target pairs, in planning order.
    fn assign(plan: &PlanBuilder<'_>, analysis: &BoardAnalysis) -> Vec<(CreatureId, CreatureId)> {
        let mut free: Vec<_> = plan.ready_attackers().collect();
        if free.is_empty() || plan.opponents().is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<_> = plan
            .opponents()
            .iter()
            .map(|t| (t, target_priority(t, &analysis.weak_opponents)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let max_attacks = (plan.energy() / ATTACK_COST) as usize;
        let focus = ((max_attacks as f64) * plan.config().aggression).ceil() as usize;
        ranked.truncate(focus.max(1));

        let mut dealt: FxHashMap<CreatureId, f64> = FxHashMap::default();
        let mut pairs = Vec::new();

        for (target, _) in &ranked {
            if pairs.len() >= max_attacks || free.is_empty() {
                break;
            }
            let left = f64::from(target.current_health) - dealt.get(&target.id).copied().unwrap_or(0.0);
            if left <= 0.0 {
                continue;
            }
            let pick = pick_best(0..free.len(), |&i| {
                let damage = estimate_attack_damage(free[i], target);
                if damage >= left {
                    damage + 100.0
                } else {
                    damage
                }
            });
            if let Some(i) = pick {
                let attacker = free.remove(i);
                *dealt.entry(target.id).or_default() += estimate_attack_damage(attacker, target);
                pairs.push((attacker.id, target.id));
            }
        }

        // Leftover attackers pile onto the top target still standing.
        let standing = ranked.iter().map(|(t, _)| *t).find(|t| {
            f64::from(t.current_health) > dealt.get(&t.id).copied().unwrap_or(0.0)
        });
        if let Some(target) = standing {
            for attacker in free {
                if pairs.len() >= max_attacks {
                    break;
                }
                pairs.push((attacker.id, target.id));
            }
        }
        pairs
    }
}

impl Tactic for CoordinatedAssault {
    fn tier(&self) -> Tier {
        Tier::Assault
    }

    fn plan(&self, plan: &mut PlanBuilder<'_>, analysis: &BoardAnalysis) -> Result<(), PlanError> {
        if !analysis.aggressive || !plan.can_afford(ATTACK_COST) {
            return Ok(());
        }
        for (attacker, target) in Self::assign(plan, analysis) {
            if !plan.can_afford(ATTACK_COST) {
                break;
            }
            plan.attack(attacker, target, self.tier())?;
        }
        Ok(())
    }
}

// =============================================================================
// Tier 7: Utility
// =============================================================================

/// Echo sustain on the most valuable creature, then a precautionary defend.
#[derive(Clone, Debug, Default)]
pub struct UtilityActions;

impl Tactic for UtilityActions {
    fn tier(&self) -> Tier {
        Tier::Utility
    }

    fn plan(&self, plan: &mut PlanBuilder<'_>, _analysis: &BoardAnalysis) -> Result<(), PlanError> {
        let mut planned = 0;

        let echo = plan.tools().iter().find(|t| t.effect == ItemEffect::Echo).map(|t| t.id);
        if let Some(tool) = echo {
            let target = pick_best(
                plan.field().iter().filter(|c| !plan.is_used(c.id)),
                |c| creature_value(c),
            )
            .map(|c| c.id);
            if let Some(target) = target {
                plan.use_tool(tool, target, self.tier())?;
                planned += 1;
            }
        }

        if planned < MAX_UTILITY_ACTIONS && plan.can_afford(DEFEND_COST) {
            let wary = plan
                .field()
                .iter()
                .find(|c| {
                    let ratio = c.health_ratio();
                    !c.is_defending && !plan.is_used(c.id) && (0.3..=0.7).contains(&ratio)
                })
                .map(|c| c.id);
            if let Some(id) = wary {
                plan.defend(id, self.tier())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::analysis::analyze_board;
    use crate::core::{Difficulty, DifficultyConfig, Intent};
    use crate::creatures::{Attributes, Creature, CreatureTemplate, Rarity};
    use crate::effects::Item;

    fn creature(id: u32, attributes: Attributes) -> Creature {
        Creature::new(
            CreatureId(id),
            CreatureTemplate::new("Test", Rarity::Common, 0, attributes),
        )
    }

    fn hurt(id: u32, ratio: f64) -> Creature {
        let mut c = creature(id, Attributes::uniform(5));
        c.current_health = (f64::from(c.battle_stats.max_health) * ratio) as u32;
        c
    }

    fn analysis_of(plan: &PlanBuilder<'_>) -> BoardAnalysis {
        analyze_board(plan.field(), plan.opponents(), plan.hand(), plan.config().difficulty)
    }

    #[test]
    fn test_rescue_uses_best_defensive_tool() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let shield = Item::tool(ItemId(1), Attribute::Speed, ItemEffect::Shield, Rarity::Rare);
        let surge = Item::tool(ItemId(2), Attribute::Strength, ItemEffect::Surge, Rarity::Legendary);
        let mut plan = PlanBuilder::new(&config, 0, 4)
            .with_field(vec![hurt(1, 0.1)])
            .with_items(vec![surge, shield], Vec::new());
        let analysis = analysis_of(&plan);

        RescueCritical.plan(&mut plan, &analysis).unwrap();
        assert_eq!(
            plan.actions()[0].intent,
            Intent::UseTool {
                tool: ItemId(1),
                target: CreatureId(1)
            }
        );
    }

    #[test]
    fn test_lethal_commits_when_opponent_is_low() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let mut plan = PlanBuilder::new(&config, 4, 4)
            .with_field(vec![
                creature(1, Attributes::uniform(8)),
                creature(2, Attributes::uniform(8)),
            ])
            .with_opponents(vec![hurt(10, 0.05)]);
        let analysis = analysis_of(&plan);

        LethalStrike.plan(&mut plan, &analysis).unwrap();
        assert!(!plan.actions().is_empty());
        assert!(plan.actions().iter().all(|a| a.tier == Tier::Lethal));
        assert!(plan.energy() <= 4);
    }

    #[test]
    fn test_lethal_skips_healthy_opponents() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let mut plan = PlanBuilder::new(&config, 4, 4)
            .with_field(vec![creature(1, Attributes::uniform(5))])
            .with_opponents(vec![creature(10, Attributes::uniform(9))]);
        let analysis = analysis_of(&plan);

        LethalStrike.plan(&mut plan, &analysis).unwrap();
        assert!(plan.actions().is_empty());
        assert_eq!(plan.energy(), 4);
    }

    #[test]
    fn test_emergency_defends_without_tools() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let mut plan = PlanBuilder::new(&config, 3, 4).with_field(vec![hurt(1, 0.2), hurt(2, 0.9)]);
        let analysis = analysis_of(&plan);

        EmergencyMitigation.plan(&mut plan, &analysis).unwrap();
        assert_eq!(plan.actions().len(), 1);
        assert_eq!(plan.actions()[0].intent, Intent::Defend { creature: CreatureId(1) });
        assert!(plan.is_used(CreatureId(1)));
    }

    #[test]
    fn test_urgency_levels() {
        let analysis = BoardAnalysis::default();
        let empty = deployment_urgency(0, 4, 2, 10, &analysis);
        assert_eq!(empty.level, Urgency::Critical);
        assert!(empty.should_deploy);
        assert_eq!(empty.level.wave_size(4, 10), 3);

        let full = deployment_urgency(4, 4, 0, 10, &analysis);
        assert!(!full.should_deploy);

        let broke = deployment_urgency(1, 4, 2, 2, &analysis);
        assert!(!broke.should_deploy);
    }

    #[test]
    fn test_deployment_wave_respects_energy() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let hand = (1..=3).map(|i| creature(i, Attributes::uniform(5))).collect();
        let mut plan = PlanBuilder::new(&config, 12, 5).with_hand(hand);
        let analysis = analysis_of(&plan);

        DeploymentWave.plan(&mut plan, &analysis).unwrap();
        // critical wave of min(5, 3, 4) = 3, but only two fit in 12 energy
        assert_eq!(plan.actions().len(), 2);
        assert_eq!(plan.energy(), 2);
        assert_eq!(plan.field().len(), 2);
    }

    #[test]
    fn test_offensive_spell_picks_a_target() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Hard);
        let spell = Item::spell(ItemId(5), Attribute::Magic, ItemEffect::Surge, Rarity::Common);
        let mut plan = PlanBuilder::new(&config, 6, 4)
            .with_field(vec![creature(1, Attributes::uniform(5))])
            .with_opponents(vec![hurt(10, 1.0), hurt(11, 0.2)])
            .with_items(Vec::new(), vec![spell]);
        let analysis = analysis_of(&plan);

        OffensiveSpell.plan(&mut plan, &analysis).unwrap();
        assert_eq!(
            plan.actions()[0].intent,
            Intent::UseSpell {
                spell: ItemId(5),
                caster: CreatureId(1),
                target: CreatureId(11)
            }
        );
        assert_eq!(plan.energy(), 2);
    }

    #[test]
    fn test_buff_keeps_attacker_ready() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let tool = Item::tool(ItemId(3), Attribute::Strength, ItemEffect::Charge, Rarity::Common);
        let mut plan = PlanBuilder::new(&config, 4, 4)
            .with_field(vec![
                creature(1, Attributes::uniform(5)),
                creature(2, Attributes::uniform(8)),
            ])
            .with_opponents(vec![creature(10, Attributes::uniform(5))])
            .with_items(vec![tool], Vec::new());
        let analysis = analysis_of(&plan);

        AttackBuff.plan(&mut plan, &analysis).unwrap();
        assert_eq!(
            plan.actions()[0].intent,
            Intent::UseTool {
                tool: ItemId(3),
                target: CreatureId(2)
            }
        );
        assert!(!plan.is_used(CreatureId(2)));
    }

    #[test]
    fn test_buff_prefers_overall_power_over_raw_attack() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let tool = Item::tool(ItemId(3), Attribute::Strength, ItemEffect::Surge, Rarity::Common);
        let glass_cannon = creature(1, Attributes::uniform(0).with(Attribute::Strength, 10));
        let all_rounder = creature(2, Attributes::uniform(6));
        assert!(attack_power(&glass_cannon) > attack_power(&all_rounder));
        assert!(all_rounder.power() > glass_cannon.power());

        let mut plan = PlanBuilder::new(&config, 4, 4)
            .with_field(vec![glass_cannon, all_rounder])
            .with_opponents(vec![creature(10, Attributes::uniform(5))])
            .with_items(vec![tool], Vec::new());
        let analysis = analysis_of(&plan);

        AttackBuff.plan(&mut plan, &analysis).unwrap();
        assert_eq!(
            plan.actions()[0].intent,
            Intent::UseTool {
                tool: ItemId(3),
                target: CreatureId(2)
            }
        );
    }

    #[test]
    fn test_assault_spreads_within_budget() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Hard);
        let field = (1..=3).map(|i| creature(i, Attributes::uniform(6))).collect();
        let mut plan = PlanBuilder::new(&config, 5, 4)
            .with_field(field)
            .with_opponents(vec![hurt(10, 0.2), creature(11, Attributes::uniform(5))]);
        let analysis = analysis_of(&plan);
        assert!(analysis.aggressive);

        CoordinatedAssault.plan(&mut plan, &analysis).unwrap();
        assert_eq!(plan.actions().len(), 2);
        assert_eq!(plan.energy(), 1);
        let first_target = match plan.actions()[0].intent {
            Intent::Attack { target, .. } => target,
            _ => unreachable!(),
        };
        assert_eq!(first_target, CreatureId(10));
    }

    #[test]
    fn test_assault_needs_aggression() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Easy);
        let mut plan = PlanBuilder::new(&config, 10, 4)
            .with_field(vec![creature(1, Attributes::uniform(5))])
            .with_opponents(vec![creature(10, Attributes::uniform(5))]);
        let analysis = analysis_of(&plan);
        assert!(!analysis.aggressive);

        CoordinatedAssault.plan(&mut plan, &analysis).unwrap();
        assert!(plan.actions().is_empty());
    }

    #[test]
    fn test_utility_caps_actions() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Medium);
        let echo = Item::tool(ItemId(4), Attribute::Energy, ItemEffect::Echo, Rarity::Common);
        let mut plan = PlanBuilder::new(&config, 5, 4)
            .with_field(vec![hurt(1, 0.5), hurt(2, 0.6)])
            .with_items(vec![echo], Vec::new());
        let analysis = analysis_of(&plan);

        UtilityActions.plan(&mut plan, &analysis).unwrap();
        assert_eq!(plan.actions().len(), 2);
        assert!(matches!(plan.actions()[1].intent, Intent::Defend { .. }));
    }
}
