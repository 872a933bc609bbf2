//! Intents: the actions a side can submit during its turn.
//!
//! Human and AI actions share one representation. The planner emits the
//! same `Intent` values the presentation layer builds from player input, and
//! both are replayed through `battle::apply_action`.

use serde::{Deserialize, Serialize};

use super::ids::{CreatureId, ItemId};

/// Which attack/defense pair an attack uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackType {
    Physical,
    Magical,
    /// Use whichever attack stat is higher (physical on ties).
    #[default]
    Auto,
}

impl std::fmt::Display for AttackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttackType::Physical => f.write_str("physical"),
            AttackType::Magical => f.write_str("magical"),
            AttackType::Auto => f.write_str("auto"),
        }
    }
}

/// A single action submitted by a side.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Move a creature from hand to field.
    Deploy { creature: CreatureId },
    /// Attack an opposing creature.
    Attack {
        attacker: CreatureId,
        target: CreatureId,
        attack_type: AttackType,
    },
    /// Use a tool on one of the side's own field creatures.
    UseTool { tool: ItemId, target: CreatureId },
    /// Cast a spell from a field creature onto any field creature.
    UseSpell {
        spell: ItemId,
        caster: CreatureId,
        target: CreatureId,
    },
    /// Put a field creature into a defensive stance.
    Defend { creature: CreatureId },
    /// Finish the side's turn.
    EndTurn,
}

/// Intent discriminant, used for cost lookup and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    Deploy,
    Attack,
    UseTool,
    UseSpell,
    Defend,
    EndTurn,
}

impl Intent {
    /// The intent's discriminant.
    #[must_use]
    pub const fn kind(&self) -> IntentKind {
        match self {
            Intent::Deploy { .. } => IntentKind::Deploy,
            Intent::Attack { .. } => IntentKind::Attack,
            Intent::UseTool { .. } => IntentKind::UseTool,
            Intent::UseSpell { .. } => IntentKind::UseSpell,
            Intent::Defend { .. } => IntentKind::Defend,
            Intent::EndTurn => IntentKind::EndTurn,
        }
    }

    /// The creature that "acts" for once-per-turn bookkeeping, if any.
    ///
    /// Tools do not consume the target's action.
    #[must_use]
    pub const fn actor(&self) -> Option<CreatureId> {
        match self {
            Intent::Attack { attacker, .. } => Some(*attacker),
            Intent::UseSpell { caster, .. } => Some(*caster),
            Intent::Defend { creature } => Some(*creature),
            Intent::Deploy { .. } | Intent::UseTool { .. } | Intent::EndTurn => None,
        }
    }

    /// Is this the end-turn intent?
    #[must_use]
    pub const fn is_end_turn(&self) -> bool {
        matches!(self, Intent::EndTurn)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Deploy { creature } => write!(f, "deploy {creature}"),
            Intent::Attack {
                attacker,
                target,
                attack_type,
            } => write!(f, "{attacker} {attack_type} attack on {target}"),
            Intent::UseTool { tool, target } => write!(f, "use {tool} on {target}"),
            Intent::UseSpell {
                spell,
                caster,
                target,
            } => write!(f, "{caster} casts {spell} on {target}"),
            Intent::Defend { creature } => write!(f, "{creature} defends"),
            Intent::EndTurn => write!(f, "end turn"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(Intent::EndTurn.kind(), IntentKind::EndTurn);
        let attack = Intent::Attack {
            attacker: CreatureId(1),
            target: CreatureId(2),
            attack_type: AttackType::Auto,
        };
        assert_eq!(attack.kind(), IntentKind::Attack);
    }

    #[test]
    fn test_actor() {
        let tool = Intent::UseTool {
            tool: ItemId(9),
            target: CreatureId(1),
        };
        assert_eq!(tool.actor(), None);

        let spell = Intent::UseSpell {
            spell: ItemId(9),
            caster: CreatureId(4),
            target: CreatureId(5),
        };
        assert_eq!(spell.actor(), Some(CreatureId(4)));
    }

    #[test]
    fn test_display() {
        let defend = Intent::Defend {
            creature: CreatureId(3),
        };
        assert_eq!(defend.to_string(), "Creature(3) defends");
        assert!(Intent::EndTurn.is_end_turn());
    }

    #[test]
    fn test_intent_serde() {
        let intent = Intent::UseSpell {
            spell: ItemId(1),
            caster: CreatureId(2),
            target: CreatureId(3),
        };
        let json = serde_json::to_string(&intent).unwrap();
        let restored: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(intent, restored);
    }
}
