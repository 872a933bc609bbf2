//! Attack resolution.
//!
//! ## Pipeline
//!
//! 1. pick the attack/defense pair (auto: physical when physical ≥ magical)
//! 2. add and consume any pending charge bonus
//! 3. effectiveness from the attribute cycle, clamped to `[0.5, 1.8]`
//! 4. variance, crit (×1.5) and dodge rolls; a dodge ends resolution
//! 5. defense reduction `def / (def + 100) · 0.7`
//! 6. form-gap policy, then the `2·form + 1` damage floor
//! 7. secondary debuffs on crits and effective hits

use serde::{Deserialize, Serialize};

use super::CombatContext;
use crate::core::AttackType;
use crate::creatures::{Attribute, Attributes, BattleStats, Creature, StatKind};
use crate::effects::{ActiveEffect, EffectKind, StatModifiers};

pub const MIN_EFFECTIVENESS: f64 = 0.5;
pub const MAX_EFFECTIVENESS: f64 = 1.8;
pub const CRITICAL_MULTIPLIER: f64 = 1.5;
/// Largest fraction of damage defense can absorb.
pub const MAX_DEFENSE_REDUCTION: f64 = 0.7;

/// Chance a critical hit also inflicts "Critical Strike Trauma".
const TRAUMA_CHANCE: f64 = 0.2;
/// Chance an effective hit also inflicts "Elemental Weakness".
const WEAKNESS_CHANCE: f64 = 0.25;

/// Effectiveness band of an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effectiveness {
    VeryEffective,
    Effective,
    SlightlyEffective,
    Normal,
    Resisted,
    NotVeryEffective,
}

impl Effectiveness {
    #[must_use]
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier >= 1.6 {
            Effectiveness::VeryEffective
        } else if multiplier >= 1.3 {
            Effectiveness::Effective
        } else if multiplier >= 1.1 {
            Effectiveness::SlightlyEffective
        } else if multiplier <= 0.6 {
            Effectiveness::NotVeryEffective
        } else if multiplier <= 0.8 {
            Effectiveness::Resisted
        } else {
            Effectiveness::Normal
        }
    }

    /// Effective or very effective.
    #[must_use]
    pub const fn is_effective(self) -> bool {
        matches!(self, Effectiveness::VeryEffective | Effectiveness::Effective)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Effectiveness::VeryEffective => "very effective",
            Effectiveness::Effective => "effective",
            Effectiveness::SlightlyEffective => "slightly effective",
            Effectiveness::Normal => "normal",
            Effectiveness::Resisted => "resisted",
            Effectiveness::NotVeryEffective => "not very effective",
        }
    }
}

/// Damage class after the form-gap policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageClass {
    Normal,
    /// Attacker two or more forms above and the hit was cut to 50% max health.
    Devastating,
    /// Attacker one form above and the hit was cut to 35% max health.
    Powerful,
    /// Defender two or more forms above: halved.
    Glancing,
    /// Defender one form above: reduced by 25%.
    Reduced,
    Dodged,
}

impl DamageClass {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DamageClass::Normal => "normal",
            DamageClass::Devastating => "devastating",
            DamageClass::Powerful => "powerful",
            DamageClass::Glancing => "glancing",
            DamageClass::Reduced => "reduced",
            DamageClass::Dodged => "dodged",
        }
    }
}

/// Typed result of an attack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// Damage dealt to the defender.
    pub damage: u32,
    /// The pair actually used (never `Auto`).
    pub attack_type: AttackType,
    pub critical: bool,
    pub dodged: bool,
    pub effectiveness_multiplier: f64,
    pub effectiveness: Effectiveness,
    pub damage_class: DamageClass,
    /// Attacker form minus defender form.
    pub form_difference: i16,
    pub defeated: bool,
    /// Names of debuffs attached to the defender.
    pub debuffs: Vec<String>,
    pub log: String,
    /// Set when inputs failed validation and nothing happened.
    pub diagnostic: Option<String>,
}

/// Updated combatants plus the outcome.
#[derive(Clone, Debug)]
pub struct AttackResolution {
    pub attacker: Creature,
    pub defender: Creature,
    pub outcome: AttackOutcome,
}

/// Resolve `Auto` to a concrete attack type.
#[must_use]
pub fn concrete_type(requested: AttackType, stats: &BattleStats) -> AttackType {
    match requested {
        AttackType::Auto if stats.physical_attack >= stats.magical_attack => AttackType::Physical,
        AttackType::Auto => AttackType::Magical,
        other => other,
    }
}

fn stat_pair(attack_type: AttackType) -> (StatKind, StatKind) {
    match attack_type {
        AttackType::Magical => (StatKind::MagicalAttack, StatKind::MagicalDefense),
        AttackType::Physical | AttackType::Auto => (StatKind::PhysicalAttack, StatKind::PhysicalDefense),
    }
}

/// Effectiveness multiplier from the attribute cycle.
///
/// Physical attacks lead with strength, magical with magic. The lead beats
/// its prey and is beaten by its predator; a secondary edge (speed for
/// physical, energy against magic for magical) adds ×1.1.
#[must_use]
pub fn effectiveness(attacker: &Attributes, defender: &Attributes, attack_type: AttackType) -> f64 {
    let (lead, edge) = match attack_type {
        AttackType::Magical => (Attribute::Magic, (Attribute::Energy, Attribute::Magic)),
        AttackType::Physical | AttackType::Auto => (Attribute::Strength, (Attribute::Speed, Attribute::Speed)),
    };
    let prey = defender.get(lead.prey());
    let predator = defender.get(lead.predator());

    let mut multiplier: f64 = if attacker.get(lead) > 7 && prey > predator {
        1.4
    } else if predator > 7 && predator > prey {
        0.75
    } else if attacker.get(lead) > prey + 2 {
        1.2
    } else {
        1.0
    };

    if attacker.get(edge.0) > defender.get(edge.1) + 3 {
        multiplier *= 1.1;
    }
    multiplier.clamp(MIN_EFFECTIVENESS, MAX_EFFECTIVENESS)
}

/// Apply the form-gap policy to a damage value.
#[must_use]
pub fn apply_form_gap(damage: u32, form_difference: i16, defender_max_health: u32) -> (u32, DamageClass) {
    let cap = |fraction: f64| (f64::from(defender_max_health) * fraction).round() as u32;
    let scale = |factor: f64| (f64::from(damage) * factor).round() as u32;
    // Devastating and Powerful only apply when the cap actually binds.
    let capped = |limit: u32, class: DamageClass| {
        if damage > limit {
            (limit, class)
        } else {
            (damage, DamageClass::Normal)
        }
    };
    match form_difference {
        d if d >= 2 => capped(cap(0.5), DamageClass::Devastating),
        1 => capped(cap(0.35), DamageClass::Powerful),
        d if d <= -2 => (scale(0.5), DamageClass::Glancing),
        -1 => (scale(0.75), DamageClass::Reduced),
        _ => (damage, DamageClass::Normal),
    }
}

/// Minimum damage an attacker of `form` deals when not dodged.
#[must_use]
pub const fn damage_floor(form: u8) -> u32 {
    2 * form as u32 + 1
}

fn wound_note(defender: &Creature) -> Option<&'static str> {
    if defender.is_defeated() {
        Some("defeated")
    } else if defender.health_ratio() < 0.2 {
        Some("critically wounded")
    } else if defender.health_ratio() < 0.5 {
        Some("wounded")
    } else {
        None
    }
}

fn degraded(attacker: &Creature, defender: &Creature, reason: String) -> AttackResolution {
    tracing::warn!(%reason, "attack skipped on malformed creature");
    AttackResolution {
        attacker: attacker.clone(),
        defender: defender.clone(),
        outcome: AttackOutcome {
            damage: 0,
            attack_type: AttackType::Physical,
            critical: false,
            dodged: false,
            effectiveness_multiplier: 1.0,
            effectiveness: Effectiveness::Normal,
            damage_class: DamageClass::Normal,
            form_difference: 0,
            defeated: false,
            debuffs: Vec::new(),
            log: format!("Invalid attack: {reason}"),
            diagnostic: Some(reason),
        },
    }
}

/// Resolve one attack.
pub fn resolve_attack(
    attacker: &Creature,
    defender: &Creature,
    requested: AttackType,
    ctx: &mut CombatContext<'_>,
) -> AttackResolution {
    if let Err(err) = attacker.validate().and_then(|()| defender.validate()) {
        return degraded(attacker, defender, err.to_string());
    }

    let mut attacker = attacker.clone();
    let mut defender = defender.clone();

    let attack_type = concrete_type(requested, &attacker.battle_stats);
    let (attack_stat, defense_stat) = stat_pair(attack_type);
    let defense_value = defender.battle_stats.get(defense_stat);

    let multiplier = effectiveness(
        &attacker.template.attributes,
        &defender.template.attributes,
        attack_type,
    );
    let band = Effectiveness::from_multiplier(multiplier);
    let form_difference = i16::from(attacker.form()) - i16::from(defender.form());

    let variance = ctx.variance();
    let critical = ctx.roll_critical(attacker.battle_stats.critical_chance);
    let dodged = ctx.roll_dodge(defender.battle_stats.dodge_chance);

    if dodged {
        let log = format!(
            "{} dodged {}'s {} attack!",
            defender.name(),
            attacker.name(),
            attack_type
        );
        tracing::debug!(attacker = %attacker.id, defender = %defender.id, "attack dodged");
        return AttackResolution {
            outcome: AttackOutcome {
                damage: 0,
                attack_type,
                critical: false,
                dodged: true,
                effectiveness_multiplier: multiplier,
                effectiveness: band,
                damage_class: DamageClass::Dodged,
                form_difference,
                defeated: false,
                debuffs: Vec::new(),
                log,
                diagnostic: None,
            },
            attacker,
            defender,
        };
    }

    // A dodged attack keeps the charge bonus for the next swing.
    let attack_value = attacker.battle_stats.get(attack_stat) + attacker.consume_attack_bonus();
    let crit_multiplier = if critical { CRITICAL_MULTIPLIER } else { 1.0 };
    let raw = f64::from(attack_value) * multiplier * variance * crit_multiplier;
    let def = f64::from(defense_value);
    let reduction = def / (def + 100.0) * MAX_DEFENSE_REDUCTION;
    let reduced = ((raw * (1.0 - reduction)).round() as u32).max(1);

    let (gapped, damage_class) =
        apply_form_gap(reduced, form_difference, defender.battle_stats.max_health);
    let damage = gapped.max(damage_floor(attacker.form()));

    let dealt = defender.take_damage(damage);
    let defeated = defender.is_defeated();

    let mut debuffs = Vec::new();
    if !defeated {
        if critical && ctx.roll_secondary(TRAUMA_CHANCE) {
            let effect = ActiveEffect::new("Critical Strike Trauma", EffectKind::Debuff, 1, ctx.turn)
                .with_modifiers(StatModifiers::uniform(
                    &[StatKind::PhysicalDefense, StatKind::MagicalDefense],
                    -2,
                ))
                .with_description("Shaken by a critical strike");
            defender.attach_effect(effect);
            debuffs.push("Critical Strike Trauma".to_string());
        }
        if band.is_effective() && ctx.roll_secondary(WEAKNESS_CHANCE) {
            let effect = ActiveEffect::new("Elemental Weakness", EffectKind::Debuff, 2, ctx.turn)
                .with_modifiers(StatModifiers::uniform(
                    &[StatKind::PhysicalDefense, StatKind::MagicalDefense],
                    -1,
                ))
                .with_description("Exposed by an effective hit");
            defender.attach_effect(effect);
            debuffs.push("Elemental Weakness".to_string());
        }
    }

    let mut log = format!(
        "{} attacks {} with a {} attack",
        attacker.name(),
        defender.name(),
        attack_type
    );
    if critical {
        log.push_str(" - Critical Hit!");
    }
    if band != Effectiveness::Normal {
        log.push_str(&format!(" - It's {}!", band.label()));
    }
    if damage_class != DamageClass::Normal {
        log.push_str(&format!(" [{}]", damage_class.label()));
    }
    log.push_str(&format!(" dealing {dealt} damage"));
    if let Some(note) = wound_note(&defender) {
        log.push_str(&format!(". {} is {}", defender.name(), note));
    }
    if !debuffs.is_empty() {
        log.push_str(&format!(" and suffers {}", debuffs.join(", ")));
    }
    log.push('.');

    tracing::debug!(
        attacker = %attacker.id,
        defender = %defender.id,
        damage = dealt,
        critical,
        class = damage_class.label(),
        "attack resolved"
    );

    AttackResolution {
        outcome: AttackOutcome {
            damage: dealt,
            attack_type,
            critical,
            dodged: false,
            effectiveness_multiplier: multiplier,
            effectiveness: band,
            damage_class,
            form_difference,
            defeated,
            debuffs,
            log,
            diagnostic: None,
        },
        attacker,
        defender,
    }
}
