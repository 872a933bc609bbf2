//! Battle configuration.
//!
//! Each battle is configured at startup by:
//! - `Difficulty`: one of four fixed tiers
//! - `DifficultyConfig`: the per-tier table (enemy generation, energy,
//!   AI behaviour, item power)
//! - `BattleConfig`: the difficulty table plus side-independent limits
//!
//! The tables are plain data. Callers may override any entry through the
//! `with_*` builders before starting a battle.

use serde::{Deserialize, Serialize};

use crate::creatures::Rarity;

/// Difficulty tier of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// All tiers, easiest first.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Hard and expert switch the AI to its aggressive posture unconditionally.
    #[must_use]
    pub const fn is_hard_or_above(self) -> bool {
        matches!(self, Difficulty::Hard | Difficulty::Expert)
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        };
        f.write_str(name)
    }
}

/// Relative weights for drawing a rarity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RarityWeights {
    pub common: f64,
    pub rare: f64,
    pub epic: f64,
    pub legendary: f64,
}

impl RarityWeights {
    #[must_use]
    pub const fn new(common: f64, rare: f64, epic: f64, legendary: f64) -> Self {
        Self {
            common,
            rare,
            epic,
            legendary,
        }
    }

    /// Weights in `Rarity::ALL` order.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 4] {
        [self.common, self.rare, self.epic, self.legendary]
    }

    /// Weight for one rarity.
    #[must_use]
    pub const fn weight(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
        }
    }
}

/// Fixed per-difficulty table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub difficulty: Difficulty,

    // === Enemy generation ===
    /// Multiplier on generated enemy base attributes.
    pub stats_multiplier: f64,
    /// Lowest evolution form an enemy creature may have.
    pub min_form: u8,
    /// Highest evolution form an enemy creature may have.
    pub max_form: u8,
    pub creature_rarity: RarityWeights,
    /// Number of creatures in the enemy deck.
    pub enemy_deck_size: usize,
    /// Creatures dealt to the enemy hand at battle start.
    pub initial_hand_size: usize,
    /// Extra random attribute points per enemy on top of `3 * form`.
    pub upgrade_bonus: u32,
    /// Chance an enemy creature carries two specialty tags.
    pub dual_specialty_chance: f64,
    /// Chance an enemy creature has a combination level (1-2).
    pub combination_chance: f64,

    // === Field and energy ===
    /// Maximum enemy field size.
    pub max_field_size: usize,
    /// Base regeneration per turn.
    pub energy_regen: u32,
    /// Energy cap before field-size scaling.
    pub base_max_energy: u32,

    // === AI behaviour ===
    pub multi_action_chance: f64,
    pub aggression: f64,
    /// Longest action sequence the planner emits.
    pub max_sequence_len: usize,

    // === Items ===
    pub tool_count: usize,
    pub spell_count: usize,
    pub tool_rarity: RarityWeights,
    pub spell_rarity: RarityWeights,
    /// Difficulty factor on item power.
    pub item_power: f64,

    // === Combat scaling ===
    /// Fraction of each defense granted by a defend action.
    pub defend_boost: f64,
    /// Scaling on health-over-time ticks.
    pub health_over_time_scale: f64,
}

impl DifficultyConfig {
    /// The fixed table for a difficulty tier.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                stats_multiplier: 0.9,
                min_form: 0,
                max_form: 1,
                creature_rarity: RarityWeights::new(0.7, 0.25, 0.05, 0.0),
                enemy_deck_size: 4,
                initial_hand_size: 2,
                upgrade_bonus: 0,
                dual_specialty_chance: 0.3,
                combination_chance: 0.0,
                max_field_size: 4,
                energy_regen: 2,
                base_max_energy: 12,
                multi_action_chance: 0.2,
                aggression: 0.3,
                max_sequence_len: 2,
                tool_count: 1,
                spell_count: 0,
                tool_rarity: RarityWeights::new(0.8, 0.2, 0.0, 0.0),
                spell_rarity: RarityWeights::new(0.7, 0.25, 0.05, 0.0),
                item_power: 0.9,
                defend_boost: 0.25,
                health_over_time_scale: 1.0,
            },
            Difficulty::Medium => Self {
                difficulty,
                stats_multiplier: 1.0,
                min_form: 0,
                max_form: 2,
                creature_rarity: RarityWeights::new(0.5, 0.35, 0.15, 0.0),
                enemy_deck_size: 5,
                initial_hand_size: 3,
                upgrade_bonus: 2,
                dual_specialty_chance: 0.3,
                combination_chance: 0.0,
                max_field_size: 5,
                energy_regen: 3,
                base_max_energy: 15,
                multi_action_chance: 0.4,
                aggression: 0.5,
                max_sequence_len: 3,
                tool_count: 2,
                spell_count: 1,
                tool_rarity: RarityWeights::new(0.6, 0.3, 0.1, 0.0),
                spell_rarity: RarityWeights::new(0.5, 0.35, 0.13, 0.02),
                item_power: 1.0,
                defend_boost: 0.3,
                health_over_time_scale: 1.0,
            },
            Difficulty::Hard => Self {
                difficulty,
                stats_multiplier: 1.2,
                min_form: 1,
                max_form: 3,
                creature_rarity: RarityWeights::new(0.2, 0.4, 0.3, 0.1),
                enemy_deck_size: 6,
                initial_hand_size: 3,
                upgrade_bonus: 4,
                dual_specialty_chance: 0.6,
                combination_chance: 0.3,
                max_field_size: 5,
                energy_regen: 4,
                base_max_energy: 18,
                multi_action_chance: 0.6,
                aggression: 0.7,
                max_sequence_len: 4,
                tool_count: 2,
                spell_count: 2,
                tool_rarity: RarityWeights::new(0.4, 0.4, 0.15, 0.05),
                spell_rarity: RarityWeights::new(0.3, 0.4, 0.25, 0.05),
                item_power: 1.1,
                defend_boost: 0.4,
                health_over_time_scale: 1.15,
            },
            Difficulty::Expert => Self {
                difficulty,
                stats_multiplier: 1.5,
                min_form: 2,
                max_form: 3,
                creature_rarity: RarityWeights::new(0.0, 0.3, 0.5, 0.2),
                enemy_deck_size: 7,
                initial_hand_size: 4,
                upgrade_bonus: 6,
                dual_specialty_chance: 0.6,
                combination_chance: 0.3,
                max_field_size: 6,
                energy_regen: 5,
                base_max_energy: 20,
                multi_action_chance: 0.8,
                aggression: 0.85,
                max_sequence_len: 5,
                tool_count: 3,
                spell_count: 3,
                tool_rarity: RarityWeights::new(0.2, 0.4, 0.3, 0.1),
                spell_rarity: RarityWeights::new(0.1, 0.3, 0.45, 0.15),
                item_power: 1.2,
                defend_boost: 0.5,
                health_over_time_scale: 1.25,
            },
        }
    }

    /// Override the enemy deck size.
    #[must_use]
    pub fn with_enemy_deck_size(mut self, size: usize) -> Self {
        self.enemy_deck_size = size;
        self
    }

    /// Override the enemy field cap.
    #[must_use]
    pub fn with_max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Override the multi-action chance.
    #[must_use]
    pub fn with_multi_action_chance(mut self, chance: f64) -> Self {
        self.multi_action_chance = chance;
        self
    }

    /// Override the enemy item counts.
    #[must_use]
    pub fn with_item_counts(mut self, tools: usize, spells: usize) -> Self {
        self.tool_count = tools;
        self.spell_count = spells;
        self
    }
}

impl From<Difficulty> for DifficultyConfig {
    fn from(difficulty: Difficulty) -> Self {
        Self::for_difficulty(difficulty)
    }
}

/// Complete battle configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    pub difficulty: DifficultyConfig,
    /// Maximum player field size.
    pub player_max_field: usize,
    /// Player hand cap for turn-start draws.
    pub player_max_hand: usize,
    /// Creatures dealt to the player hand at battle start.
    pub player_initial_hand: usize,
    /// Energy both sides start with.
    pub starting_energy: u32,
    /// Energy above this decays at turn end.
    pub decay_threshold: u32,
}

impl BattleConfig {
    /// Default configuration for a difficulty tier.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty: DifficultyConfig::for_difficulty(difficulty),
            player_max_field: 4,
            player_max_hand: 5,
            player_initial_hand: 3,
            starting_energy: 10,
            decay_threshold: 10,
        }
    }

    /// Replace the difficulty table.
    #[must_use]
    pub fn with_difficulty_config(mut self, config: DifficultyConfig) -> Self {
        self.difficulty = config;
        self
    }

    /// Override the starting energy.
    #[must_use]
    pub fn with_starting_energy(mut self, energy: u32) -> Self {
        self.starting_energy = energy;
        self
    }

    /// Override the player field cap.
    #[must_use]
    pub fn with_player_max_field(mut self, size: usize) -> Self {
        self.player_max_field = size;
        self
    }

    /// Difficulty tier of this battle.
    #[must_use]
    pub fn tier(&self) -> Difficulty {
        self.difficulty.difficulty
    }

    /// Enemy hand cap: one over its opening hand.
    #[must_use]
    pub fn enemy_max_hand(&self) -> usize {
        self.difficulty.initial_hand_size + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_order() {
        assert!(Difficulty::Easy < Difficulty::Expert);
        assert!(Difficulty::Hard.is_hard_or_above());
        assert!(!Difficulty::Medium.is_hard_or_above());
    }

    #[test]
    fn test_tables_scale_with_tier() {
        let tables: Vec<_> = Difficulty::ALL
            .iter()
            .map(|d| DifficultyConfig::for_difficulty(*d))
            .collect();

        for pair in tables.windows(2) {
            assert!(pair[0].energy_regen < pair[1].energy_regen);
            assert!(pair[0].base_max_energy < pair[1].base_max_energy);
            assert!(pair[0].multi_action_chance < pair[1].multi_action_chance);
            assert!(pair[0].max_sequence_len < pair[1].max_sequence_len);
            assert!(pair[0].defend_boost < pair[1].defend_boost);
        }
    }

    #[test]
    fn test_rarity_weights_sum_to_one() {
        for d in Difficulty::ALL {
            let config = DifficultyConfig::for_difficulty(d);
            for weights in [config.creature_rarity, config.tool_rarity, config.spell_rarity] {
                let total: f64 = weights.as_array().iter().sum();
                assert!((total - 1.0).abs() < 1e-9, "{d}: {total}");
            }
        }
    }

    #[test]
    fn test_builders() {
        let config = DifficultyConfig::for_difficulty(Difficulty::Easy)
            .with_enemy_deck_size(9)
            .with_max_field_size(2)
            .with_multi_action_chance(1.0)
            .with_item_counts(0, 4);

        assert_eq!(config.enemy_deck_size, 9);
        assert_eq!(config.max_field_size, 2);
        assert_eq!(config.multi_action_chance, 1.0);
        assert_eq!((config.tool_count, config.spell_count), (0, 4));
    }

    #[test]
    fn test_battle_config_defaults() {
        let config = BattleConfig::new(Difficulty::Hard);
        assert_eq!(config.tier(), Difficulty::Hard);
        assert_eq!(config.starting_energy, 10);
        assert_eq!(config.player_max_field, 4);
        assert_eq!(config.enemy_max_hand(), 4);
    }

    #[test]
    fn test_config_serde() {
        let config = BattleConfig::new(Difficulty::Expert).with_starting_energy(12);
        let json = serde_json::to_string(&config).unwrap();
        let restored: BattleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
