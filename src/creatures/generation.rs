//! Difficulty-scaled enemy generation.
//!
//! The AI side's deck and inventory are rolled from the `DifficultyConfig`
//! table at battle start: rarity from weighted tables, form from the
//! tier's range, attributes from rarity base × stats multiplier with ±10%
//! variance, then evolution boosts and random upgrades that lean toward the
//! creature's specialties.

use super::attributes::{Attribute, Attributes, Rarity, SpecialtyTags};
use super::creature::CreatureTemplate;
use crate::core::{BattleRng, Difficulty, DifficultyConfig, IdAllocator, RarityWeights};
use crate::effects::{Item, ItemCategory, ItemEffect};

/// Species names enemy creatures are drawn from.
pub const SPECIES: &[&str] = &[
    "Emberfang",
    "Tidecaller",
    "Stonehide",
    "Galewing",
    "Voltspire",
    "Mossback",
    "Shadeclaw",
    "Frostmaw",
    "Sunspark",
    "Thornveil",
];

/// Lowest and highest generated base attribute.
const ATTRIBUTE_RANGE: (u32, u32) = (1, 15);

/// Draw a rarity from weights.
pub fn roll_rarity(weights: &RarityWeights, rng: &mut BattleRng) -> Rarity {
    rng.choose_weighted(&weights.as_array())
        .map_or(Rarity::Common, |i| Rarity::ALL[i])
}

/// Pick an evolution form within the tier's range.
///
/// Expert favours the top form, easy and medium favour the bottom one,
/// hard is uniform.
pub fn roll_form(config: &DifficultyConfig, rng: &mut BattleRng) -> u8 {
    let (min, max) = (config.min_form, config.max_form.max(config.min_form));
    let uniform = |rng: &mut BattleRng| {
        rng.gen_range_inclusive(u32::from(min)..=u32::from(max)) as u8
    };
    match config.difficulty {
        Difficulty::Expert => {
            if rng.gen_bool(0.6) {
                max
            } else {
                uniform(rng)
            }
        }
        Difficulty::Hard => uniform(rng),
        Difficulty::Easy | Difficulty::Medium => {
            if rng.gen_bool(0.7) {
                min
            } else {
                uniform(rng)
            }
        }
    }
}

fn roll_specialties(config: &DifficultyConfig, rng: &mut BattleRng) -> SpecialtyTags {
    let count = if rng.gen_bool(config.dual_specialty_chance) { 2 } else { 1 };
    let mut pool: Vec<Attribute> = Attribute::ALL.to_vec();
    let mut tags = SpecialtyTags::new();
    for _ in 0..count {
        let index = rng.gen_range_usize(0..pool.len());
        tags.push(pool.swap_remove(index));
    }
    tags
}

fn apply_evolution(attributes: &mut Attributes, form: u8, specialties: &[Attribute]) {
    let bump_all = |attributes: &mut Attributes, amount: u32| {
        for attribute in Attribute::ALL {
            *attributes.get_mut(attribute) += amount;
        }
    };
    if form >= 1 {
        bump_all(attributes, 1);
    }
    if form >= 2 {
        bump_all(attributes, 1);
        for &attribute in specialties {
            *attributes.get_mut(attribute) += 1;
        }
    }
    if form >= 3 {
        bump_all(attributes, 2);
    }
}

/// Roll one enemy creature.
pub fn generate_enemy(config: &DifficultyConfig, rng: &mut BattleRng) -> CreatureTemplate {
    let rarity = roll_rarity(&config.creature_rarity, rng);
    let form = roll_form(config, rng);

    let base = f64::from(rarity.base_attribute()) * config.stats_multiplier;
    let mut attributes = Attributes::default();
    for attribute in Attribute::ALL {
        let value = (base * rng.gen_between(0.9, 1.1)).round() as u32;
        *attributes.get_mut(attribute) = value.clamp(ATTRIBUTE_RANGE.0, ATTRIBUTE_RANGE.1);
    }

    let specialties = roll_specialties(config, rng);
    apply_evolution(&mut attributes, form, &specialties);

    let upgrades = u32::from(form) * 3 + config.upgrade_bonus;
    for _ in 0..upgrades {
        let attribute = if rng.gen_bool(0.5) {
            specialties[rng.gen_range_usize(0..specialties.len())]
        } else {
            Attribute::ALL[rng.gen_range_usize(0..Attribute::ALL.len())]
        };
        *attributes.get_mut(attribute) += 1;
    }

    let combination_level = if rng.gen_bool(config.combination_chance) {
        rng.gen_range_inclusive(1..=2) as u8
    } else {
        0
    };

    let species = rng.choose(SPECIES).copied().unwrap_or("Wildling");
    CreatureTemplate::new(species, rarity, form, attributes)
        .with_specialties(specialties)
        .with_combination_level(combination_level)
}

/// Roll the full enemy deck.
pub fn generate_enemy_deck(config: &DifficultyConfig, rng: &mut BattleRng) -> Vec<CreatureTemplate> {
    (0..config.enemy_deck_size)
        .map(|_| generate_enemy(config, rng))
        .collect()
}

fn roll_item(
    category: ItemCategory,
    weights: &RarityWeights,
    ids: &mut IdAllocator,
    rng: &mut BattleRng,
) -> Item {
    let item_type = Attribute::ALL[rng.gen_range_usize(0..Attribute::ALL.len())];
    let effect = ItemEffect::ALL[rng.gen_range_usize(0..ItemEffect::ALL.len())];
    let rarity = roll_rarity(weights, rng);
    Item::new(ids.item(), category, item_type, effect, rarity)
}

/// Roll the enemy's tools and spells.
pub fn generate_enemy_items(
    config: &DifficultyConfig,
    ids: &mut IdAllocator,
    rng: &mut BattleRng,
) -> (Vec<Item>, Vec<Item>) {
    let tools = (0..config.tool_count)
        .map(|_| roll_item(ItemCategory::Tool, &config.tool_rarity, ids, rng))
        .collect();
    let spells = (0..config.spell_count)
        .map(|_| roll_item(ItemCategory::Spell, &config.spell_rarity, ids, rng))
        .collect();
    (tools, spells)
}
