//! Extraction skill lookup
//!
//! An item is independently obtainable when an extraction recipe or an enemy
//! yields it. Extraction recipes take precedence over enemies, and within each
//! table the first row yielding the item wins.

use std::collections::HashMap;

use crate::ids::ItemKind;
use crate::tables::{EnemyDesc, ExtractionRecipeDesc};
use crate::SkillId;

/// Skill used when an item can't be extracted on its own
pub const NO_SKILL: SkillId = -1;

/// First-match skill index over extraction recipes and enemies
#[derive(Debug, Clone, Default)]
pub struct ExtractionSkills {
    from_recipes: HashMap<(u64, ItemKind), SkillId>,
    from_enemies: HashMap<(u64, ItemKind), SkillId>,
}

impl ExtractionSkills {
    pub fn new(recipes: &[ExtractionRecipeDesc], enemies: &[EnemyDesc]) -> Self {
        let mut from_recipes = HashMap::new();
        for recipe in recipes {
            let Some(requirement) = recipe.level_requirements.first() else {
                continue;
            };
            for stack in recipe.extracted_item_stacks.iter().filter_map(|s| s.stack) {
                from_recipes
                    .entry((stack.raw_id, stack.kind))
                    .or_insert(requirement.skill_id);
            }
        }

        let mut from_enemies = HashMap::new();
        for enemy in enemies {
            let Some(experience) = enemy.experience_per_damage_dealt.first() else {
                continue;
            };
            for stack in enemy.extracted_item_stacks.iter().filter_map(|s| s.stack) {
                from_enemies
                    .entry((stack.raw_id, stack.kind))
                    .or_insert(experience.skill_id);
            }
        }

        Self {
            from_recipes,
            from_enemies,
        }
    }

    /// Skill needed to extract the item, or [`NO_SKILL`]
    pub fn find_extraction_skill(&self, raw_id: u64, kind: ItemKind) -> SkillId {
        let key = (raw_id, kind);
        self.from_recipes
            .get(&key)
            .or_else(|| self.from_enemies.get(&key))
            .copied()
            .unwrap_or(NO_SKILL)
    }
}
