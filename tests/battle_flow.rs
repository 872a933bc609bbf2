//! End-to-end battle flow: setup, player turns, AI turns, outcome.

use creature_battle::battle::{
    apply_player_action, begin_turn, run_ai_turn, start_battle, ActionStatus, BattleSetup,
    BattleState, Phase,
};
use creature_battle::core::{
    ActionError, AttackType, BattleConfig, Difficulty, DifficultyConfig, Intent, Side,
};
use creature_battle::creatures::{Attribute, Attributes, CreatureTemplate, Rarity};
use creature_battle::effects::{Item, ItemEffect};
use creature_battle::ItemId;

fn roster() -> Vec<CreatureTemplate> {
    vec![
        CreatureTemplate::new("Emberling", Rarity::Rare, 1, Attributes::uniform(6).with(Attribute::Strength, 9)),
        CreatureTemplate::new("Tidecaller", Rarity::Common, 0, Attributes::uniform(5).with(Attribute::Magic, 8)),
        CreatureTemplate::new("Stonehide", Rarity::Epic, 1, Attributes::uniform(6).with(Attribute::Stamina, 9)),
        CreatureTemplate::new("Galewing", Rarity::Common, 0, Attributes::uniform(5).with(Attribute::Speed, 8)),
        CreatureTemplate::new("Voltmoth", Rarity::Rare, 0, Attributes::uniform(5).with(Attribute::Energy, 8)),
    ]
}

fn setup(difficulty: Difficulty, seed: u64) -> BattleSetup {
    BattleSetup::new(BattleConfig::new(difficulty), seed)
        .with_creatures(roster())
        .with_items(
            vec![Item::tool(ItemId(0), Attribute::Stamina, ItemEffect::Shield, Rarity::Common)],
            vec![Item::spell(ItemId(0), Attribute::Magic, ItemEffect::Surge, Rarity::Rare)],
        )
}

/// A simple scripted player: deploy what it can afford, attack the first
/// enemy with everything, then end the turn.
fn player_turn(mut state: BattleState) -> BattleState {
    if state.phase == Phase::EffectTick {
        state = begin_turn(&state).state;
    }
    let hand: Vec<_> = state.side(Side::Player).hand.iter().map(|c| c.id).collect();
    for id in hand {
        if state.is_over() {
            return state;
        }
        state = apply_player_action(&state, &Intent::Deploy { creature: id }).state;
    }
    let attackers: Vec<_> = state.side(Side::Player).field.iter().map(|c| c.id).collect();
    for attacker in attackers {
        if state.is_over() {
            return state;
        }
        let Some(target) = state.side(Side::Enemy).field.front().map(|c| c.id) else {
            break;
        };
        let intent = Intent::Attack {
            attacker,
            target,
            attack_type: AttackType::Auto,
        };
        state = apply_player_action(&state, &intent).state;
    }
    if state.is_over() {
        return state;
    }
    apply_player_action(&state, &Intent::EndTurn).state
}

fn play(difficulty: Difficulty, seed: u64, rounds: usize) -> BattleState {
    let mut state = start_battle(setup(difficulty, seed));
    for _ in 0..rounds {
        if state.is_over() {
            break;
        }
        state = player_turn(state);
        if state.is_over() {
            break;
        }
        state = run_ai_turn(&state).state;
    }
    state
}

fn assert_consistent(state: &BattleState) {
    for side in Side::ALL {
        let own = state.side(side);
        let mut ids: Vec<_> = own.all_ids().collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total, "{side} holds a creature twice");
        assert!(own.field.len() <= own.max_field);
        assert!(own.energy() <= own.max_energy(&state.config.difficulty));
        for creature in own.field.iter() {
            assert!(creature.current_health > 0);
            assert!(creature.current_health <= creature.battle_stats.max_health);
        }
    }
}

// =============================================================================
// Setup
// =============================================================================

#[test]
fn test_setup_reassigns_item_ids() {
    let state = start_battle(setup(Difficulty::Medium, 9));
    let player = state.side(Side::Player);
    assert_eq!(player.tools.len(), 1);
    assert_eq!(player.spells.len(), 1);
    assert_ne!(player.tools[0].id, player.spells[0].id);

    let enemy = state.side(Side::Enemy);
    for item in enemy.tools.iter().chain(enemy.spells.iter()) {
        assert_ne!(item.id, player.tools[0].id);
        assert_ne!(item.id, player.spells[0].id);
    }
}

#[test]
fn test_setup_creature_ids_are_unique_across_sides() {
    let state = start_battle(setup(Difficulty::Expert, 5));
    let mut ids: Vec<_> = Side::ALL
        .into_iter()
        .flat_map(|side| state.side(side).all_ids().collect::<Vec<_>>())
        .collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn test_empty_roster_loses_immediately() {
    let state = start_battle(BattleSetup::new(BattleConfig::new(Difficulty::Easy), 1));
    assert_eq!(state.winner(), Some(Side::Enemy));
    assert_eq!(state.phase, Phase::Finished);

    let t = apply_player_action(&state, &Intent::EndTurn);
    assert!(matches!(t.status, ActionStatus::Rejected(_)));
}

#[test]
fn test_custom_field_caps_are_enforced() {
    let config = BattleConfig::new(Difficulty::Medium)
        .with_player_max_field(1)
        .with_difficulty_config(
            DifficultyConfig::for_difficulty(Difficulty::Hard).with_max_field_size(2),
        );
    let state = start_battle(BattleSetup::new(config, 4).with_creatures(roster()));
    assert_eq!(state.config.tier(), Difficulty::Hard);
    assert_eq!(state.side(Side::Player).max_field, 1);
    assert_eq!(state.side(Side::Enemy).max_field, 2);

    let hand: Vec<_> = state.side(Side::Player).hand.iter().map(|c| c.id).collect();
    assert!(hand.len() >= 2);
    let first = apply_player_action(&state, &Intent::Deploy { creature: hand[0] });
    assert!(first.status.is_applied());

    let second = apply_player_action(&first.state, &Intent::Deploy { creature: hand[1] });
    assert_eq!(
        second.status,
        ActionStatus::Rejected(ActionError::FieldFull { capacity: 1 })
    );
    assert_eq!(second.state.side(Side::Player).field.len(), 1);

    let ended = apply_player_action(&first.state, &Intent::EndTurn).state;
    let after_ai = run_ai_turn(&ended).state;
    assert!(after_ai.side(Side::Enemy).field.len() <= 2);
}

// =============================================================================
// Full Battles
// =============================================================================

#[test]
fn test_battle_stays_consistent() {
    for difficulty in Difficulty::ALL {
        let mut state = start_battle(setup(difficulty, 77));
        for _ in 0..12 {
            if state.is_over() {
                break;
            }
            state = player_turn(state);
            assert_consistent(&state);
            if state.is_over() {
                break;
            }
            state = run_ai_turn(&state).state;
            assert_consistent(&state);
        }
    }
}

#[test]
fn test_battle_replays_identically() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let a = play(Difficulty::Hard, 2024, 8);
    let b = play(Difficulty::Hard, 2024, 8);
    assert_eq!(a.log, b.log);
    assert_eq!(a.winner(), b.winner());
    assert_eq!(a.turn, b.turn);
}

#[test]
fn test_turns_alternate() {
    let state = start_battle(setup(Difficulty::Medium, 3));
    let after_player = player_turn(state);
    if after_player.is_over() {
        return;
    }
    assert_eq!(after_player.active, Side::Enemy);
    assert_eq!(after_player.turn, 1);

    let after_ai = run_ai_turn(&after_player).state;
    if after_ai.is_over() {
        return;
    }
    assert_eq!(after_ai.active, Side::Player);
    assert_eq!(after_ai.phase, Phase::EffectTick);
    assert_eq!(after_ai.turn, 2);
}

#[test]
fn test_outcome_is_final() {
    let state = play(Difficulty::Easy, 11, 40);
    if let Some(winner) = state.winner() {
        assert_eq!(state.phase, Phase::Finished);
        let announcements = state
            .log
            .iter()
            .filter(|entry| entry.message.ends_with("wins the battle"))
            .count();
        assert_eq!(announcements, 1);
        assert_eq!(run_ai_turn(&state).state.winner(), Some(winner));
    }
}

#[test]
fn test_log_survives_serialization() {
    let state = play(Difficulty::Medium, 8, 3);
    let json = serde_json::to_string(&state.log).unwrap();
    let restored: creature_battle::core::BattleLog = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state.log);
    assert!(restored.iter().all(|entry| entry.turn >= 1));
}
