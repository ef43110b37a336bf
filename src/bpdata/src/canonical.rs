//! Recipe deduplication and ordering
//!
//! Recipes gathered for an item come from crafting recipes and from several item
//! lists, so duplicates are common. After deduplication the list is stably sorted
//! by [`Priority`], lowest first:
//!
//! 1. Manual overrides: index of the first consumed item found in the target's
//!    preferred list.
//! 2. Tag overrides: index of the first consumed item tag found in the preferred
//!    tags for the target's tag.
//! 3. General score: a "simplest looking recipe first" heuristic over the first
//!    consumed item (quantity, cargo penalty, rarity, output quantity) with the
//!    digit sum of its id as a tie-breaker. Tool recipes consuming scrap are
//!    pushed to the back.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::ids::UnifiedId;
use crate::recipes::Recipe;

/// Added to the score of cargo consumed as the first item
pub const CARGO_PENALTY: f64 = 1000.0;

/// Added to the score of tool recipes that consume scrap
pub const SCRAP_TOOL_PENALTY: f64 = 10000.0;

const TOOL_TAG: &str = "Tool";
const SCRAP_TAG: &str = "Scrap";

/// Configured ordering preferences
pub trait RecipeOrderOverrides {
    /// Preferred consumed items for a target, most preferred first
    fn override_for(&self, target: UnifiedId) -> Option<&[UnifiedId]>;

    /// Preferred consumed-item tags for a target tag, most preferred first
    fn tag_override_for(&self, tag: &str) -> Option<&[String]>;
}

/// Item attributes the ranking depends on
pub trait ItemAttributes {
    fn contains(&self, id: UnifiedId) -> bool;
    fn rarity(&self, id: UnifiedId) -> Option<i32>;
    fn tag(&self, id: UnifiedId) -> Option<&str>;
}

/// In-memory override tables
#[derive(Debug, Clone, Default)]
pub struct OrderOverrides {
    by_target: HashMap<UnifiedId, Vec<UnifiedId>>,
    by_tag: BTreeMap<String, Vec<String>>,
}

impl OrderOverrides {
    pub fn new(
        by_target: impl IntoIterator<Item = (UnifiedId, Vec<UnifiedId>)>,
        by_tag: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            by_target: by_target.into_iter().collect(),
            by_tag,
        }
    }
}

impl RecipeOrderOverrides for OrderOverrides {
    fn override_for(&self, target: UnifiedId) -> Option<&[UnifiedId]> {
        self.by_target.get(&target).map(Vec::as_slice)
    }

    fn tag_override_for(&self, tag: &str) -> Option<&[String]> {
        self.by_tag.get(tag).map(Vec::as_slice)
    }
}

/// Which rule ranked a recipe. Earlier rules always sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriorityClass {
    Manual,
    Tag,
    General,
}

/// Sort key of a recipe, ascending
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Priority {
    pub class: PriorityClass,
    pub value: f64,
}

impl Priority {
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.class
            .cmp(&other.class)
            .then_with(|| self.value.total_cmp(&other.value))
    }
}

/// Rank a recipe for a target item
pub fn recipe_priority<I, O>(
    target: UnifiedId,
    recipe: &Recipe,
    items: &I,
    overrides: &O,
) -> Priority
where
    I: ItemAttributes + ?Sized,
    O: RecipeOrderOverrides + ?Sized,
{
    if let Some(preferred) = overrides.override_for(target) {
        for consumed in &recipe.consumed_items {
            if let Some(index) = preferred.iter().position(|id| *id == consumed.id) {
                return Priority {
                    class: PriorityClass::Manual,
                    value: index as f64,
                };
            }
        }
    }

    let target_tag = items.tag(target).unwrap_or_default();
    if let Some(preferred) = overrides.tag_override_for(target_tag) {
        for consumed in &recipe.consumed_items {
            let Some(tag) = items.tag(consumed.id) else {
                continue;
            };
            if let Some(index) = preferred.iter().position(|t| t == tag) {
                return Priority {
                    class: PriorityClass::Tag,
                    value: index as f64,
                };
            }
        }
    }

    let mut bonus = 0.0;
    if target_tag.contains(TOOL_TAG)
        && recipe
            .consumed_items
            .iter()
            .any(|c| items.tag(c.id) == Some(SCRAP_TAG))
    {
        bonus += SCRAP_TOOL_PENALTY;
    }

    let Some(first) = recipe.consumed_items.first() else {
        return Priority {
            class: PriorityClass::General,
            value: f64::INFINITY,
        };
    };
    let mut quantity = f64::from(first.quantity);
    if first.id.is_cargo() {
        quantity += CARGO_PENALTY;
    }
    let rarity = f64::from(items.rarity(first.id).unwrap_or_default());

    Priority {
        class: PriorityClass::General,
        value: quantity * rarity * 100.0 / f64::from(recipe.output_quantity)
            + first.id.digit_sum() as f64
            + bonus,
    }
}

/// Drop unresolvable recipes, deduplicate, and sort by priority.
///
/// The first occurrence of a duplicate is kept and the sort is stable, so running
/// this on its own output changes nothing.
pub fn canonicalize_recipes<I, O>(
    target: UnifiedId,
    recipes: Vec<Recipe>,
    items: &I,
    overrides: &O,
    diagnostics: &mut Diagnostics,
) -> Vec<Recipe>
where
    I: ItemAttributes + ?Sized,
    O: RecipeOrderOverrides + ?Sized,
{
    let mut seen = HashSet::with_capacity(recipes.len());
    let mut ranked: Vec<(Priority, Recipe)> = Vec::with_capacity(recipes.len());

    for recipe in recipes {
        if let Some(unknown) = recipe.consumed_items.iter().find(|c| !items.contains(c.id)) {
            diagnostics.push(Diagnostic::UnknownConsumedItem {
                target,
                consumed: unknown.id,
            });
            continue;
        }
        if !seen.insert(recipe.clone()) {
            continue;
        }
        let priority = recipe_priority(target, &recipe, items, overrides);
        ranked.push((priority, recipe));
    }

    ranked.sort_by(|(a, _), (b, _)| a.cmp_key(b));
    ranked.into_iter().map(|(_, recipe)| recipe).collect()
}
