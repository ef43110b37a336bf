//! Crafting recipes in the unified id space
//!
//! [`RecipeExtractor`] finds every crafting recipe producing a given item and
//! translates its consumed stacks into [`UnifiedId`]s.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

use crate::diagnostics::Diagnostic;
use crate::ids::{unify, ItemKind, UnifiedId};
use crate::tables::CraftingRecipeDesc;
use crate::Result;

pub use crate::tables::LevelRequirement;

/// Consumed stack of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsumedItem {
    pub id: UnifiedId,
    pub quantity: u32,
}

/// Output quantity → cumulative chance, ordered by quantity
pub type Possibilities = BTreeMap<u32, f64>;

/// A way of obtaining an item
///
/// Deterministic crafting recipes have empty `possibilities`. Recipes synthesized
/// from item lists carry the probability mass of each output quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub level_requirements: LevelRequirement,
    pub consumed_items: Vec<ConsumedItem>,
    pub output_quantity: u32,
    #[serde(default)]
    pub possibilities: Possibilities,
}

impl Recipe {
    /// Whether any consumed stack is the given item
    pub fn consumes(&self, id: UnifiedId) -> bool {
        self.consumed_items.iter().any(|item| item.id == id)
    }
}

// Chances compare by bit pattern so that Eq and Hash agree.
impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.level_requirements == other.level_requirements
            && self.consumed_items == other.consumed_items
            && self.output_quantity == other.output_quantity
            && self.possibilities.len() == other.possibilities.len()
            && self
                .possibilities
                .iter()
                .zip(&other.possibilities)
                .all(|((qa, ca), (qb, cb))| qa == qb && ca.to_bits() == cb.to_bits())
    }
}

impl Eq for Recipe {}

impl Hash for Recipe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.level_requirements.hash(state);
        self.consumed_items.hash(state);
        self.output_quantity.hash(state);
        self.possibilities.len().hash(state);
        for (quantity, chance) in &self.possibilities {
            quantity.hash(state);
            chance.to_bits().hash(state);
        }
    }
}

/// Recipes found for one item, plus the candidates that were rejected
#[derive(Debug, Clone, Default)]
pub struct RecipeMatches {
    pub recipes: Vec<Recipe>,
    pub rejected: Vec<Diagnostic>,
}

/// Index over the crafting recipe table
pub struct RecipeExtractor<'a> {
    recipes: &'a [CraftingRecipeDesc],
    /// (raw id, kind) → (recipe index, crafted stack index), in table order
    by_output: HashMap<(u64, ItemKind), Vec<(usize, usize)>>,
}

impl<'a> RecipeExtractor<'a> {
    pub fn new(recipes: &'a [CraftingRecipeDesc]) -> Self {
        let mut by_output: HashMap<(u64, ItemKind), Vec<(usize, usize)>> = HashMap::new();
        for (recipe_index, recipe) in recipes.iter().enumerate() {
            for (stack_index, stack) in recipe.crafted_item_stacks.iter().enumerate() {
                by_output
                    .entry((stack.raw_id, stack.kind))
                    .or_default()
                    .push((recipe_index, stack_index));
            }
        }
        Self { recipes, by_output }
    }

    /// Find every recipe producing `raw_id` of the given kind.
    ///
    /// Recipes consuming a stack with the target's raw id are rejected. Nothing is
    /// deduplicated here.
    pub fn find_recipes(&self, raw_id: u64, kind: ItemKind) -> Result<RecipeMatches> {
        let target = unify(raw_id, kind)?;
        let mut matches = RecipeMatches::default();

        let Some(hits) = self.by_output.get(&(raw_id, kind)) else {
            return Ok(matches);
        };

        for &(recipe_index, stack_index) in hits {
            let desc = &self.recipes[recipe_index];
            let output = &desc.crafted_item_stacks[stack_index];

            if desc.consumed_item_stacks.iter().any(|s| s.raw_id == raw_id) {
                matches.rejected.push(Diagnostic::SelfConsumingRecipe {
                    recipe: desc.id,
                    target,
                });
                continue;
            }

            let Some(&level_requirements) = desc.level_requirements.first() else {
                matches.rejected.push(Diagnostic::MalformedRecipe {
                    recipe: desc.id,
                    reason: "no level requirement",
                });
                continue;
            };

            if desc.consumed_item_stacks.is_empty() {
                matches.rejected.push(Diagnostic::MalformedRecipe {
                    recipe: desc.id,
                    reason: "no consumed items",
                });
                continue;
            }

            if output.quantity == 0 {
                matches.rejected.push(Diagnostic::MalformedRecipe {
                    recipe: desc.id,
                    reason: "zero output quantity",
                });
                continue;
            }

            let consumed_items = desc
                .consumed_item_stacks
                .iter()
                .map(|stack| {
                    Ok(ConsumedItem {
                        id: stack.unified_id()?,
                        quantity: stack.quantity,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            matches.recipes.push(Recipe {
                level_requirements,
                consumed_items,
                output_quantity: output.quantity,
                possibilities: Possibilities::new(),
            });
        }

        Ok(matches)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ids::CARGO_OFFSET;
    use crate::tables::ItemStack;
    use std::collections::HashSet;

    pub(crate) fn stack(raw_id: u64, quantity: u32, kind: ItemKind) -> ItemStack {
        ItemStack {
            raw_id,
            quantity,
            kind,
        }
    }

    pub(crate) fn crafting(
        id: u64,
        crafted: Vec<ItemStack>,
        consumed: Vec<ItemStack>,
    ) -> CraftingRecipeDesc {
        CraftingRecipeDesc {
            id,
            crafted_item_stacks: crafted,
            consumed_item_stacks: consumed,
            level_requirements: vec![LevelRequirement {
                skill_id: 3,
                level: 1,
            }],
        }
    }

    #[test]
    fn test_find_recipes_unifies_consumed() {
        let table = vec![crafting(
            1,
            vec![stack(100, 3, ItemKind::Item)],
            vec![stack(50, 2, ItemKind::Item), stack(7, 1, ItemKind::Cargo)],
        )];
        let extractor = RecipeExtractor::new(&table);
        let matches = extractor.find_recipes(100, ItemKind::Item).unwrap();

        assert_eq!(matches.recipes.len(), 1);
        let recipe = &matches.recipes[0];
        assert_eq!(recipe.output_quantity, 3);
        assert_eq!(
            recipe.consumed_items,
            vec![
                ConsumedItem {
                    id: UnifiedId::new(50),
                    quantity: 2
                },
                ConsumedItem {
                    id: UnifiedId::new(7 + CARGO_OFFSET),
                    quantity: 1
                },
            ]
        );
        assert!(recipe.possibilities.is_empty());
    }

    #[test]
    fn test_find_recipes_matches_kind() {
        let table = vec![crafting(
            1,
            vec![stack(100, 1, ItemKind::Cargo)],
            vec![stack(50, 2, ItemKind::Item)],
        )];
        let extractor = RecipeExtractor::new(&table);
        assert!(extractor
            .find_recipes(100, ItemKind::Item)
            .unwrap()
            .recipes
            .is_empty());
        assert_eq!(
            extractor
                .find_recipes(100, ItemKind::Cargo)
                .unwrap()
                .recipes
                .len(),
            1
        );
    }

    #[test]
    fn test_self_consuming_recipe_rejected() {
        let table = vec![
            crafting(
                1,
                vec![stack(100, 2, ItemKind::Item)],
                vec![stack(100, 1, ItemKind::Item), stack(5, 1, ItemKind::Item)],
            ),
            crafting(
                2,
                vec![stack(100, 1, ItemKind::Item)],
                vec![stack(5, 4, ItemKind::Item)],
            ),
        ];
        let extractor = RecipeExtractor::new(&table);
        let matches = extractor.find_recipes(100, ItemKind::Item).unwrap();

        assert_eq!(matches.recipes.len(), 1);
        assert_eq!(matches.recipes[0].consumed_items[0].quantity, 4);
        assert_eq!(
            matches.rejected,
            vec![Diagnostic::SelfConsumingRecipe {
                recipe: 1,
                target: UnifiedId::new(100)
            }]
        );
        for recipe in &matches.recipes {
            assert!(!recipe.consumes(UnifiedId::new(100)));
        }
    }

    #[test]
    fn test_keeps_duplicates_in_table_order() {
        let table = vec![
            crafting(
                1,
                vec![stack(100, 1, ItemKind::Item)],
                vec![stack(5, 1, ItemKind::Item)],
            ),
            crafting(
                2,
                vec![stack(100, 1, ItemKind::Item)],
                vec![stack(5, 1, ItemKind::Item)],
            ),
            crafting(
                3,
                vec![stack(100, 1, ItemKind::Item)],
                vec![stack(6, 1, ItemKind::Item)],
            ),
        ];
        let extractor = RecipeExtractor::new(&table);
        let recipes = extractor.find_recipes(100, ItemKind::Item).unwrap().recipes;
        assert_eq!(recipes.len(), 3);
        assert_eq!(recipes[0], recipes[1]);
        assert_eq!(recipes[2].consumed_items[0].id, UnifiedId::new(6));
    }

    #[test]
    fn test_missing_level_requirement_is_malformed() {
        let mut desc = crafting(
            9,
            vec![stack(100, 1, ItemKind::Item)],
            vec![stack(5, 1, ItemKind::Item)],
        );
        desc.level_requirements.clear();
        let table = vec![desc];
        let matches = RecipeExtractor::new(&table)
            .find_recipes(100, ItemKind::Item)
            .unwrap();
        assert!(matches.recipes.is_empty());
        assert!(matches!(
            matches.rejected[..],
            [Diagnostic::MalformedRecipe { recipe: 9, .. }]
        ));
    }

    #[test]
    fn test_zero_output_quantity_is_malformed() {
        let table = vec![
            crafting(
                1,
                vec![stack(100, 0, ItemKind::Item)],
                vec![stack(50, 1, ItemKind::Item)],
            ),
            crafting(
                2,
                vec![stack(100, 1, ItemKind::Item)],
                vec![stack(51, 1, ItemKind::Item)],
            ),
        ];
        let matches = RecipeExtractor::new(&table)
            .find_recipes(100, ItemKind::Item)
            .unwrap();

        assert_eq!(matches.recipes.len(), 1);
        assert_eq!(matches.recipes[0].output_quantity, 1);
        assert_eq!(matches.recipes[0].consumed_items[0].id, UnifiedId::new(51));
        assert_eq!(
            matches.rejected,
            vec![Diagnostic::MalformedRecipe {
                recipe: 1,
                reason: "zero output quantity"
            }]
        );
    }

    #[test]
    fn test_consumed_out_of_range_is_fatal() {
        let table = vec![crafting(
            1,
            vec![stack(100, 1, ItemKind::Item)],
            vec![stack(CARGO_OFFSET, 1, ItemKind::Item)],
        )];
        let result = RecipeExtractor::new(&table).find_recipes(100, ItemKind::Item);
        assert!(result.is_err());
    }

    #[test]
    fn test_recipe_hash_includes_possibilities() {
        let base = Recipe {
            level_requirements: LevelRequirement {
                skill_id: 1,
                level: 1,
            },
            consumed_items: vec![ConsumedItem {
                id: UnifiedId::new(5),
                quantity: 1,
            }],
            output_quantity: 1,
            possibilities: Possibilities::new(),
        };
        let mut loot = base.clone();
        loot.possibilities.insert(1, 0.5);
        let mut loot_again = base.clone();
        loot_again.possibilities.insert(1, 0.5);

        let set: HashSet<Recipe> = [base.clone(), loot, loot_again, base].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
