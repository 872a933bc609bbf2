//! Tool and spell resolution.
//!
//! Both item categories go through the same three steps:
//!
//! 1. **Power**: rarity × difficulty × the acting creature's attribute for
//!    the item type, clamped to `[0.5, 2.5]`. The acting creature is the
//!    target for tools and the caster for spells.
//! 2. **Scaling**: the declared profile is scaled by power, each component
//!    capped independently.
//! 3. **Application**: immediate health changes are applied, timed
//!    components become one `ActiveEffect` on the target. Stat deltas only
//!    ever live inside effects.
//!
//! Spells add direct damage with an independent crit roll, armor pierce at
//! high power, drain-to-self healing and stat drain pairs.

use serde::{Deserialize, Serialize};

use super::CombatContext;
use crate::core::DifficultyConfig;
use crate::creatures::{Attribute, Creature, StatKind};
use crate::effects::{
    spell_profile, tool_profile, ActiveEffect, ChargeSpec, EffectKind, Item, ItemCategory,
    ItemEffect, ItemProfile, StatModifiers,
};

pub const MIN_ITEM_POWER: f64 = 0.5;
pub const MAX_ITEM_POWER: f64 = 2.5;

/// Power above which stat and duration scaling stop growing.
const SCALE_LIMIT: f64 = 1.5;
const TOOL_STAT_CAP: f64 = 10.0;
const TOOL_HEAL_CAP: u32 = 50;
const SPELL_STAT_CAP: f64 = 12.0;
const SPELL_HEAL_CAP: u32 = 80;
const SPELL_SELF_HEAL_CAP: u32 = 40;
const SPELL_DAMAGE_CAP: u32 = 100;
const SPELL_CRIT_CAP: u32 = 15;
const ARMOR_PIERCE_POWER: f64 = 1.3;
const ARMOR_PIERCE_MULTIPLIER: f64 = 1.2;

/// Power multiplier for `item` used by `actor`.
#[must_use]
pub fn item_power(item: &Item, actor: &Creature, difficulty: &DifficultyConfig) -> f64 {
    let attribute = f64::from(actor.attribute(item.item_type));
    (item.rarity.item_power() * difficulty.item_power * (1.0 + 0.03 * attribute))
        .clamp(MIN_ITEM_POWER, MAX_ITEM_POWER)
}

/// Coarse power band shown in log lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerLevel {
    Weak,
    Normal,
    Strong,
}

impl PowerLevel {
    #[must_use]
    pub fn from_power(power: f64) -> Self {
        if power >= 1.3 {
            PowerLevel::Strong
        } else if power >= 1.1 {
            PowerLevel::Normal
        } else {
            PowerLevel::Weak
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PowerLevel::Weak => "weak",
            PowerLevel::Normal => "normal",
            PowerLevel::Strong => "strong",
        }
    }
}

/// Result of using a tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub item: String,
    pub power: f64,
    pub power_level: PowerLevel,
    /// Stat deltas carried by the attached effect.
    pub stat_changes: StatModifiers,
    pub healed: u32,
    /// Name of the attached effect, if any.
    pub effect: Option<String>,
    pub log: String,
    pub diagnostic: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ToolResolution {
    pub target: Creature,
    pub outcome: ToolOutcome,
}

/// Result of casting a spell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpellOutcome {
    pub item: String,
    pub power: f64,
    pub power_level: PowerLevel,
    pub damage: u32,
    pub critical: bool,
    pub armor_pierce: bool,
    pub stat_changes: StatModifiers,
    /// Healing on the target.
    pub healed: u32,
    /// Healing returned to the caster from damage dealt.
    pub self_healed: u32,
    /// Stat and amount moved from target to caster.
    pub drained: Option<(StatKind, i32)>,
    /// Names of effects attached, target first.
    pub effects: Vec<String>,
    pub defeated: bool,
    pub log: String,
    pub diagnostic: Option<String>,
}

/// Updated caster and target. On a self-cast both hold the same creature.
#[derive(Clone, Debug)]
pub struct SpellResolution {
    pub caster: Creature,
    pub target: Creature,
    pub outcome: SpellOutcome,
}

fn stat_cap(base: f64, power: f64) -> i32 {
    (base * power.min(SCALE_LIMIT)).round() as i32
}

fn scaled_duration(duration: u32, power: f64) -> u32 {
    ((f64::from(duration) * power.min(SCALE_LIMIT)).round() as u32).max(1)
}

fn scaled_charge(spec: ChargeSpec, power: f64) -> ChargeSpec {
    ChargeSpec {
        per_turn_bonus: (f64::from(spec.per_turn_bonus) * power).round() as u32,
        final_burst: (f64::from(spec.final_burst) * power).round() as u32,
        ..spec
    }
}

/// Build the timed effect for a scaled profile, if it leaves one.
fn lasting_effect(
    name: &str,
    profile: &ItemProfile,
    stat_changes: &StatModifiers,
    power: f64,
    turn: u32,
) -> Option<ActiveEffect> {
    if !profile.has_lasting_effect() {
        return None;
    }
    let mut kind = profile.effect_kind?;
    let mut duration = scaled_duration(profile.duration, power);
    if let EffectKind::Charge(spec) = kind {
        let spec = scaled_charge(spec, power);
        duration = duration.max(spec.max_turns + 1);
        kind = EffectKind::Charge(spec);
    }
    let hot = profile
        .health_over_time
        .map_or(0, |hot| (f64::from(hot) * power).round() as i32);

    Some(
        ActiveEffect::new(name, kind, duration, turn)
            .with_modifiers(stat_changes.clone())
            .with_health_over_time(hot),
    )
}

fn category_mismatch(item: &Item, expected: ItemCategory) -> Option<String> {
    (item.category != expected).then(|| format!("{} is not a {:?}", item.name, expected))
}

/// Stat deltas with the resulting displayed value, e.g. `+6 physical attack (now 16)`.
fn describe_shown(changes: &StatModifiers, target: &Creature) -> String {
    let shown = target.effective_stats();
    changes
        .iter()
        .filter(|(_, delta)| *delta != 0)
        .map(|(stat, delta)| format!("{delta:+} {stat} (now {})", shown.get(stat)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Apply a tool to an own creature.
pub fn resolve_tool(target: &Creature, tool: &Item, ctx: &mut CombatContext<'_>) -> ToolResolution {
    let invalid = target
        .validate()
        .err()
        .map(|e| e.to_string())
        .or_else(|| category_mismatch(tool, ItemCategory::Tool));
    if let Some(reason) = invalid {
        tracing::warn!(%reason, item = %tool.name, "tool skipped on malformed input");
        return ToolResolution {
            target: target.clone(),
            outcome: ToolOutcome {
                item: tool.name.clone(),
                power: 1.0,
                power_level: PowerLevel::Weak,
                stat_changes: StatModifiers::new(),
                healed: 0,
                effect: None,
                log: format!("Invalid tool use: {reason}"),
                diagnostic: Some(reason),
            },
        };
    }

    let mut target = target.clone();
    let power = item_power(tool, &target, ctx.difficulty);
    let level = PowerLevel::from_power(power);
    let profile = tool_profile(tool);

    let stat_changes = profile
        .stat_changes
        .scaled(power)
        .capped(stat_cap(TOOL_STAT_CAP, power));
    let heal_amount = ((f64::from(profile.healing) * power).round() as u32).min(TOOL_HEAL_CAP);
    let healed = target.heal(heal_amount);

    let effect = lasting_effect(&tool.name, &profile, &stat_changes, power, ctx.turn);
    let effect_name = effect.as_ref().map(|e| e.name.clone());
    if let Some(effect) = effect {
        target.attach_effect(effect.with_description(format!("{} tool", tool.effect)));
    }

    let mut log = format!(
        "{} used on {} ({} power)",
        tool.name,
        target.name(),
        level.label()
    );
    if !stat_changes.is_empty() {
        log.push_str(&format!(": {}", describe_shown(&stat_changes, &target)));
    }
    if healed > 0 {
        log.push_str(&format!(", healed {healed}"));
    }
    if tool.effect == ItemEffect::Charge {
        log.push_str(", charging");
    }
    log.push('.');

    tracing::debug!(
        target = %target.id,
        item = %tool.name,
        power,
        healed,
        "tool resolved"
    );

    ToolResolution {
        target,
        outcome: ToolOutcome {
            item: tool.name.clone(),
            power,
            power_level: level,
            stat_changes,
            healed,
            effect: effect_name,
            log,
            diagnostic: None,
        },
    }
}

/// Crit chance of a spell cast by a creature with `magic`.
#[must_use]
pub fn spell_crit_chance(magic: u32) -> u32 {
    (3 + (f64::from(magic) * 0.3).floor() as u32).min(SPELL_CRIT_CAP)
}

/// The creature receiving caster-side changes: the target itself on a
/// self-cast.
fn caster_side<'c>(self_cast: bool, caster: &'c mut Creature, target: &'c mut Creature) -> &'c mut Creature {
    if self_cast {
        target
    } else {
        caster
    }
}

/// Cast a spell from `caster` on `target`, which may be the caster itself.
pub fn resolve_spell(
    caster: &Creature,
    target: &Creature,
    spell: &Item,
    ctx: &mut CombatContext<'_>,
) -> SpellResolution {
    let invalid = caster
        .validate()
        .and_then(|()| target.validate())
        .err()
        .map(|e| e.to_string())
        .or_else(|| category_mismatch(spell, ItemCategory::Spell));
    if let Some(reason) = invalid {
        tracing::warn!(%reason, item = %spell.name, "spell skipped on malformed input");
        return SpellResolution {
            caster: caster.clone(),
            target: target.clone(),
            outcome: SpellOutcome {
                item: spell.name.clone(),
                power: 1.0,
                power_level: PowerLevel::Weak,
                damage: 0,
                critical: false,
                armor_pierce: false,
                stat_changes: StatModifiers::new(),
                healed: 0,
                self_healed: 0,
                drained: None,
                effects: Vec::new(),
                defeated: false,
                log: format!("Invalid spell: {reason}"),
                diagnostic: Some(reason),
            },
        };
    }

    let self_cast = caster.id == target.id;
    let mut caster = caster.clone();
    let mut target = target.clone();

    let power = item_power(spell, &caster, ctx.difficulty);
    let level = PowerLevel::from_power(power);
    let magic = caster.attribute(Attribute::Magic);
    let profile = spell_profile(spell, magic);

    // Direct damage
    let mut damage = 0;
    let mut critical = false;
    let mut armor_pierce = false;
    if profile.damage > 0 {
        let mut raw = f64::from(profile.damage) * power;
        if ctx.roll_critical(spell_crit_chance(magic)) {
            critical = true;
            raw *= super::attack::CRITICAL_MULTIPLIER;
        }
        if power >= ARMOR_PIERCE_POWER {
            armor_pierce = true;
            raw *= ARMOR_PIERCE_MULTIPLIER;
        }
        damage = target.take_damage((raw.round() as u32).min(SPELL_DAMAGE_CAP));
    }
    let defeated = target.is_defeated();

    // Healing
    let mut healed = 0;
    if profile.healing > 0 && (!profile.heal_self_only || self_cast) {
        let amount = ((f64::from(profile.healing) * power).round() as u32).min(SPELL_HEAL_CAP);
        healed = target.heal(amount);
    }
    let mut self_healed = 0;
    if profile.self_heal_ratio > 0.0 && damage > 0 {
        let amount =
            ((f64::from(damage) * profile.self_heal_ratio).round() as u32).min(SPELL_SELF_HEAL_CAP);
        self_healed = caster_side(self_cast, &mut caster, &mut target).heal(amount);
    }

    let stat_changes = profile
        .stat_changes
        .scaled(power)
        .capped(stat_cap(SPELL_STAT_CAP, power));

    let mut effects = Vec::new();
    if !defeated {
        if let Some(effect) = lasting_effect(&spell.name, &profile, &stat_changes, power, ctx.turn) {
            effects.push(effect.name.clone());
            target.attach_effect(effect.with_description(format!("{} spell", spell.effect)));
        }
    }

    // Stat drain: a debuff on the target and a matching buff on the caster
    let mut drained = None;
    if let Some((stat, amount)) = profile.drain {
        let cap = stat_cap(SPELL_STAT_CAP, power);
        let amount = ((f64::from(amount) * power).round() as i32).min(cap);
        let duration = scaled_duration(profile.duration, power);
        if amount > 0 {
            if !defeated {
                let debuff = ActiveEffect::new("Drained", EffectKind::Debuff, duration, ctx.turn)
                    .with_modifiers(StatModifiers::single(stat, -amount))
                    .with_description(format!("{} drained by {}", stat, caster.name()));
                target.attach_effect(debuff);
                effects.push("Drained".to_string());
            }
            let buff = ActiveEffect::new("Empowered", EffectKind::Buff, duration, ctx.turn)
                .with_modifiers(StatModifiers::single(stat, amount))
                .with_description(format!("{stat} drained from {}", target.name()));
            caster_side(self_cast, &mut caster, &mut target).attach_effect(buff);
            effects.push("Empowered".to_string());
            drained = Some((stat, amount));
        }
    }

    if self_cast {
        caster = target.clone();
    }

    let mut log = if self_cast {
        format!("{} casts {} on itself ({} power)", caster.name(), spell.name, level.label())
    } else {
        format!(
            "{} casts {} on {} ({} power)",
            caster.name(),
            spell.name,
            target.name(),
            level.label()
        )
    };
    if damage > 0 {
        log.push_str(&format!(" dealing {damage} damage"));
        if critical {
            log.push_str(" - Critical!");
        }
        if armor_pierce {
            log.push_str(" (armor pierce)");
        }
    }
    if healed > 0 {
        log.push_str(&format!(", healed {healed}"));
    }
    if self_healed > 0 {
        log.push_str(&format!(", {} recovers {self_healed}", caster.name()));
    }
    if let Some((stat, amount)) = drained {
        log.push_str(&format!(", drains {amount} {stat}"));
    }
    if !stat_changes.is_empty() && !defeated {
        log.push_str(&format!(": {}", stat_changes.describe()));
    }
    if defeated {
        log.push_str(&format!(". {} is defeated", target.name()));
    }
    log.push('.');

    tracing::debug!(
        caster = %caster.id,
        target = %target.id,
        item = %spell.name,
        damage,
        critical,
        "spell resolved"
    );

    SpellResolution {
        caster,
        target,
        outcome: SpellOutcome {
            item: spell.name.clone(),
            power,
            power_level: level,
            damage,
            critical,
            armor_pierce,
            stat_changes,
            healed,
            self_healed,
            drained,
            effects,
            defeated,
            log,
            diagnostic: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::CombatRolls;
    use crate::core::{BattleRng, CreatureId, Difficulty, ItemId};
    use crate::creatures::{Attributes, CreatureTemplate, Rarity};

    fn creature(id: u32, attrs: Attributes) -> Creature {
        Creature::new(CreatureId(id), CreatureTemplate::new("Test", Rarity::Common, 0, attrs))
    }

    fn medium() -> DifficultyConfig {
        DifficultyConfig::for_difficulty(Difficulty::Medium)
    }

    #[test]
    fn test_item_power_formula() {
        let actor = creature(1, Attributes::uniform(10));
        let tool = Item::tool(ItemId(1), Attribute::Strength, ItemEffect::Surge, Rarity::Rare);
        // 1.2 · 1.0 · 1.3
        assert!((item_power(&tool, &actor, &medium()) - 1.56).abs() < 1e-9);

        let huge = creature(2, Attributes::uniform(200));
        let legendary = Item::tool(ItemId(2), Attribute::Strength, ItemEffect::Surge, Rarity::Legendary);
        let expert = DifficultyConfig::for_difficulty(Difficulty::Expert);
        assert_eq!(item_power(&legendary, &huge, &expert), MAX_ITEM_POWER);
    }

    #[test]
    fn test_power_levels() {
        assert_eq!(PowerLevel::from_power(1.3), PowerLevel::Strong);
        assert_eq!(PowerLevel::from_power(1.1), PowerLevel::Normal);
        assert_eq!(PowerLevel::from_power(1.09), PowerLevel::Weak);
    }

    #[test]
    fn test_tool_attaches_effect() {
        let target = creature(1, Attributes::uniform(0));
        let tool = Item::tool(ItemId(1), Attribute::Strength, ItemEffect::Surge, Rarity::Common);
        let config = medium();
        let mut rng = BattleRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, 3, &config);

        // power 1.0: +6 physical attack for 2 turns
        let result = resolve_tool(&target, &tool, &mut ctx);
        assert_eq!(result.outcome.stat_changes.get(StatKind::PhysicalAttack), 6);
        assert_eq!(
            result.target.battle_stats.physical_attack,
            target.battle_stats.physical_attack + 6
        );
        let effect = &result.target.active_effects[0];
        assert_eq!(effect.duration, 2);
        assert_eq!(effect.start_turn, 3);
        assert_eq!(result.outcome.effect.as_deref(), Some("Strength Surge Tool"));
    }

    #[test]
    fn test_tool_log_shows_tapered_stats() {
        let mut target = creature(1, Attributes::uniform(5));
        target.battle_stats.physical_attack = 140;
        target.base_stats.physical_attack = 140;
        let tool = Item::tool(ItemId(1), Attribute::Strength, ItemEffect::Surge, Rarity::Common);
        let config = medium();
        let mut rng = BattleRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, 3, &config);

        let result = resolve_tool(&target, &tool, &mut ctx);
        let raw = result.target.battle_stats.physical_attack;
        let shown = result.target.effective_stats().physical_attack;
        assert!(raw > 140);
        assert!(shown < raw && shown > 80);
        assert!(result.outcome.log.contains(&format!("physical attack (now {shown})")));
    }

    #[test]
    fn test_tool_heal_capped() {
        let mut target = creature(1, Attributes::uniform(15));
        target.current_health = 1;
        let tool = Item::tool(ItemId(1), Attribute::Stamina, ItemEffect::Shield, Rarity::Legendary);
        let config = DifficultyConfig::for_difficulty(Difficulty::Expert);
        let mut rng = BattleRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, 1, &config);

        let result = resolve_tool(&target, &tool, &mut ctx);
        assert!(result.outcome.healed <= TOOL_HEAL_CAP);
        for (_, delta) in result.outcome.stat_changes.iter() {
            assert!(delta.abs() <= 15);
        }
    }

    #[test]
    fn test_charge_tool_duration_covers_charge() {
        let target = creature(1, Attributes::uniform(0));
        let tool = Item::tool(ItemId(1), Attribute::Strength, ItemEffect::Charge, Rarity::Common);
        let config = DifficultyConfig::for_difficulty(Difficulty::Easy);
        let mut rng = BattleRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, 1, &config);

        let result = resolve_tool(&target, &tool, &mut ctx);
        let effect = &result.target.active_effects[0];
        match effect.kind {
            EffectKind::Charge(spec) => assert!(effect.duration >= spec.max_turns + 1),
            other => panic!("expected a charge, got {other:?}"),
        }
        assert_eq!(result.target.battle_stats, target.battle_stats);
    }

    #[test]
    fn test_tool_rejects_spell() {
        let target = creature(1, Attributes::uniform(5));
        let spell = Item::spell(ItemId(1), Attribute::Magic, ItemEffect::Surge, Rarity::Common);
        let config = medium();
        let mut rng = BattleRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, 1, &config);

        let result = resolve_tool(&target, &spell, &mut ctx);
        assert!(result.outcome.diagnostic.is_some());
        assert_eq!(result.target, target);
    }

    #[test]
    fn test_surge_spell_damage() {
        let caster = creature(1, Attributes::uniform(0));
        let target = creature(2, Attributes::uniform(5));
        let spell = Item::spell(ItemId(1), Attribute::Magic, ItemEffect::Surge, Rarity::Common);
        let config = medium();
        let mut rng = BattleRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, 1, &config).with_rolls(CombatRolls::fixed(1.0));

        let result = resolve_spell(&caster, &target, &spell, &mut ctx);
        assert_eq!(result.outcome.damage, 25);
        assert!(!result.outcome.armor_pierce);
        assert_eq!(result.target.current_health, target.current_health - 25);
        assert_eq!(result.caster, caster);
    }

    #[test]
    fn test_spell_damage_capped() {
        let caster = creature(1, Attributes::uniform(15));
        let target = creature(2, Attributes::uniform(15));
        let spell = Item::spell(ItemId(1), Attribute::Magic, ItemEffect::Surge, Rarity::Legendary);
        let config = DifficultyConfig::for_difficulty(Difficulty::Expert);
        let mut rng = BattleRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, 1, &config)
            .with_rolls(CombatRolls::fixed(1.0).with_critical(true));

        let result = resolve_spell(&caster, &target, &spell, &mut ctx);
        assert_eq!(result.outcome.damage, SPELL_DAMAGE_CAP);
        assert!(result.outcome.critical);
        assert!(result.outcome.armor_pierce);
    }

    #[test]
    fn test_drain_splits_into_two_effects() {
        let mut caster = creature(1, Attributes::uniform(0));
        caster.current_health -= 20;
        let target = creature(2, Attributes::uniform(5));
        let spell = Item::spell(ItemId(1), Attribute::Strength, ItemEffect::Drain, Rarity::Common);
        let config = medium();
        let mut rng = BattleRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, 1, &config).with_rolls(CombatRolls::fixed(1.0));

        let result = resolve_spell(&caster, &target, &spell, &mut ctx);
        // 15 damage, half returned
        assert_eq!(result.outcome.damage, 15);
        assert_eq!(result.outcome.self_healed, 8);
        assert_eq!(result.outcome.drained, Some((StatKind::PhysicalAttack, 3)));
        assert_eq!(
            result.target.battle_stats.physical_attack,
            target.battle_stats.physical_attack - 3
        );
        assert_eq!(
            result.caster.battle_stats.physical_attack,
            caster.battle_stats.physical_attack + 3
        );
        assert_eq!(result.caster.base_stats, caster.base_stats);
        assert_eq!(result.outcome.effects, vec!["Drained".to_string(), "Empowered".to_string()]);
    }

    #[test]
    fn test_shield_spell_heals_only_self() {
        let mut caster = creature(1, Attributes::uniform(0));
        caster.current_health -= 30;
        let mut ally = creature(2, Attributes::uniform(0));
        ally.current_health -= 30;
        let spell = Item::spell(ItemId(1), Attribute::Stamina, ItemEffect::Shield, Rarity::Common);
        let config = medium();
        let mut rng = BattleRng::new(1);

        let mut ctx = CombatContext::new(&mut rng, 1, &config);
        let on_ally = resolve_spell(&caster, &ally, &spell, &mut ctx);
        assert_eq!(on_ally.outcome.healed, 0);
        assert_eq!(on_ally.target.active_effects.len(), 1);

        let mut ctx = CombatContext::new(&mut rng, 1, &config);
        let on_self = resolve_spell(&caster, &caster, &spell, &mut ctx);
        assert_eq!(on_self.outcome.healed, 20);
        assert_eq!(on_self.caster, on_self.target);
        assert!(on_self.outcome.log.contains("on itself"));
    }

    #[test]
    fn test_echo_spell_leaves_damage_over_time() {
        let caster = creature(1, Attributes::uniform(0));
        let target = creature(2, Attributes::uniform(5));
        let spell = Item::spell(ItemId(1), Attribute::Speed, ItemEffect::Echo, Rarity::Common);
        let config = medium();
        let mut rng = BattleRng::new(1);
        let mut ctx = CombatContext::new(&mut rng, 1, &config).with_rolls(CombatRolls::fixed(1.0));

        let result = resolve_spell(&caster, &target, &spell, &mut ctx);
        assert_eq!(result.outcome.damage, 10);
        let effect = &result.target.active_effects[0];
        assert_eq!(effect.kind, EffectKind::Debuff);
        assert_eq!(effect.health_over_time, Some(-5));
    }

    #[test]
    fn test_spell_crit_chance_capped() {
        assert_eq!(spell_crit_chance(0), 3);
        assert_eq!(spell_crit_chance(10), 6);
        assert_eq!(spell_crit_chance(100), SPELL_CRIT_CAP);
    }
}
