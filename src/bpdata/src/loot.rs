//! Item list expansion
//!
//! Some items are "variants": a placeholder whose crafting result is drawn from a
//! weighted item list (e.g. an unrefined ore yielding one of several refined
//! ores). Variants are removed from the graph and their own crafting recipes are
//! copied onto every concrete list target, tagged with the probability mass of
//! each output quantity.

use std::collections::HashMap;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::extraction::ExtractionSkills;
use crate::graph::CraftingGraphBuilder;
use crate::ids::{unify, ItemKind, UnifiedId};
use crate::recipes::{Possibilities, RecipeExtractor};
use crate::tables::{ItemDesc, ItemListDesc};
use crate::Result;

/// Whether an item row describes a list variant
pub fn is_variant(item: &ItemDesc) -> bool {
    item.item_list_id != 0 && item.tier >= 0
}

/// Per-target probability mass of a list, in first-seen target order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOutcomes {
    pub targets: Vec<(UnifiedId, Possibilities)>,
}

impl ListOutcomes {
    fn add(&mut self, target: UnifiedId, quantity: u32, chance: f64) {
        let index = match self.targets.iter().position(|(id, _)| *id == target) {
            Some(index) => index,
            None => {
                self.targets.push((target, Possibilities::new()));
                self.targets.len() - 1
            }
        };
        *self.targets[index].1.entry(quantity).or_insert(0.0) += chance;
    }

    pub fn get(&self, target: UnifiedId) -> Option<&Possibilities> {
        self.targets
            .iter()
            .find(|(id, _)| *id == target)
            .map(|(_, possibilities)| possibilities)
    }
}

/// Sum the chances of a list per target and output quantity.
///
/// Targets missing from the graph are skipped. Targets without an extraction
/// skill inherit the one of the variant they're drawn from.
pub fn accumulate_outcomes(
    source_raw_id: u64,
    list: &ItemListDesc,
    skills: &ExtractionSkills,
    graph: &mut CraftingGraphBuilder,
    diagnostics: &mut Diagnostics,
) -> Result<ListOutcomes> {
    let mut outcomes = ListOutcomes::default();

    for possibility in &list.possibilities {
        for stack in &possibility.stacks {
            let target = stack.unified_id()?;
            let Some(item) = graph.get_mut(target) else {
                diagnostics.push(Diagnostic::UnknownLootTarget {
                    list: list.id,
                    target,
                });
                continue;
            };
            if item.extraction_skill < 0 {
                item.extraction_skill = skills.find_extraction_skill(source_raw_id, ItemKind::Item);
            }
            outcomes.add(target, stack.quantity, possibility.chance);
        }
    }

    Ok(outcomes)
}

/// Remove every variant from the graph and redistribute its recipes.
pub fn expand_item_lists(
    items: &[ItemDesc],
    lists: &[ItemListDesc],
    extractor: &RecipeExtractor<'_>,
    skills: &ExtractionSkills,
    graph: &mut CraftingGraphBuilder,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let mut lists_by_id: HashMap<u64, &ItemListDesc> = HashMap::new();
    for list in lists {
        lists_by_id.entry(list.id).or_insert(list);
    }

    for item in items.iter().filter(|item| is_variant(item)) {
        let source = unify(item.id, ItemKind::Item)?;
        // Filtered items were never added and have nothing to redistribute
        if graph.remove(source).is_none() {
            continue;
        }
        let Some(list) = lists_by_id.get(&item.item_list_id) else {
            continue;
        };

        let outcomes = accumulate_outcomes(item.id, list, skills, graph, diagnostics)?;
        let recipes = extractor.find_recipes(item.id, ItemKind::Item)?.recipes;

        for (target, possibilities) in outcomes.targets {
            let Some(target_item) = graph.get_mut(target) else {
                continue;
            };
            let copies = recipes
                .iter()
                .filter(|recipe| !recipe.consumes(target))
                .cloned()
                .map(|mut recipe| {
                    recipe.possibilities = possibilities.clone();
                    recipe
                });
            target_item.recipes.extend(copies);
        }

        tracing::debug!(
            "Variant {} ({}) redistributed through list {}",
            item.name,
            item.id,
            list.id
        );
    }

    Ok(())
}
