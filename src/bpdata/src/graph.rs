//! Crafting graph construction
//!
//! Builds the `crafting_data.json` document: every item and cargo keyed by
//! [`UnifiedId`], each with its extraction skill and an ordered recipe list.
//!
//! Phases, in order:
//! 1. Collect items (minus ignored tags) and cargo with their crafting recipes
//! 2. Normalize icons and report missing assets
//! 3. Expand item lists: drop variants and redistribute their recipes
//! 4. Deduplicate and sort every recipe list

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::canonical::{canonicalize_recipes, ItemAttributes, RecipeOrderOverrides};
use crate::config::BuildConfig;
use crate::diagnostics::Diagnostics;
use crate::extraction::ExtractionSkills;
use crate::icons::{AssetIndex, IconResolver};
use crate::ids::{unify, ItemKind, UnifiedId};
use crate::loot::expand_item_lists;
use crate::recipes::{Recipe, RecipeExtractor};
use crate::tables::GameTables;
use crate::{Result, SkillId};

/// An item or cargo entry of the crafting document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftingItem {
    pub name: String,
    pub tier: i32,
    pub rarity: i32,
    pub icon: String,
    pub recipes: Vec<Recipe>,
    /// Skill needed to extract the item, `-1` if it can only be crafted
    pub extraction_skill: SkillId,
    #[serde(default)]
    pub tag: String,
}

/// Mutable graph used while the build is in progress
#[derive(Debug, Clone, Default)]
pub struct CraftingGraphBuilder {
    items: BTreeMap<UnifiedId, CraftingItem>,
}

impl CraftingGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, id: UnifiedId, item: CraftingItem) -> Option<CraftingItem> {
        self.items.insert(id, item)
    }

    pub fn remove(&mut self, id: UnifiedId) -> Option<CraftingItem> {
        self.items.remove(&id)
    }

    pub fn get(&self, id: UnifiedId) -> Option<&CraftingItem> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: UnifiedId) -> Option<&mut CraftingItem> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: UnifiedId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnifiedId, &CraftingItem)> {
        self.items.iter().map(|(id, item)| (*id, item))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (UnifiedId, &mut CraftingItem)> {
        self.items.iter_mut().map(|(id, item)| (*id, item))
    }

    pub fn ids(&self) -> Vec<UnifiedId> {
        self.items.keys().copied().collect()
    }

    /// Deduplicate and sort the recipes of every entry
    pub fn canonicalize<O>(&mut self, overrides: &O, diagnostics: &mut Diagnostics)
    where
        O: RecipeOrderOverrides + ?Sized,
    {
        for id in self.ids() {
            let recipes = match self.items.get_mut(&id) {
                Some(item) => std::mem::take(&mut item.recipes),
                None => continue,
            };
            let sorted = canonicalize_recipes(id, recipes, &*self, overrides, diagnostics);
            if let Some(item) = self.items.get_mut(&id) {
                item.recipes = sorted;
            }
        }
    }

    pub fn finalize(self) -> CraftingGraph {
        CraftingGraph { items: self.items }
    }
}

impl ItemAttributes for CraftingGraphBuilder {
    fn contains(&self, id: UnifiedId) -> bool {
        self.items.contains_key(&id)
    }

    fn rarity(&self, id: UnifiedId) -> Option<i32> {
        self.items.get(&id).map(|item| item.rarity)
    }

    fn tag(&self, id: UnifiedId) -> Option<&str> {
        self.items.get(&id).map(|item| item.tag.as_str())
    }
}

/// Finished crafting document, serialized as `{"<id>": CraftingItem, ...}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CraftingGraph {
    items: BTreeMap<UnifiedId, CraftingItem>,
}

impl CraftingGraph {
    pub fn get(&self, id: UnifiedId) -> Option<&CraftingItem> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: UnifiedId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnifiedId, &CraftingItem)> {
        self.items.iter().map(|(id, item)| (*id, item))
    }

    /// Total number of recipes across all entries
    pub fn recipe_count(&self) -> usize {
        self.items.values().map(|item| item.recipes.len()).sum()
    }
}

/// Result of [`build_crafting_graph`]
#[derive(Debug, Clone)]
pub struct CraftingBuild {
    pub graph: CraftingGraph,
    pub diagnostics: Diagnostics,
}

/// Build the crafting graph from the loaded tables.
///
/// Fails only on identifier range violations; everything else is reported
/// through the returned diagnostics.
pub fn build_crafting_graph(
    tables: &GameTables,
    config: &BuildConfig,
    assets: Option<&AssetIndex>,
) -> Result<CraftingBuild> {
    let extractor = RecipeExtractor::new(&tables.crafting_recipes);
    let skills = ExtractionSkills::new(&tables.extraction_recipes, &tables.enemies);
    let mut graph = CraftingGraphBuilder::new();
    let mut diagnostics = Diagnostics::new();

    tracing::info!("Collecting items...");
    for item in &tables.items {
        let id = unify(item.id, ItemKind::Item)?;
        if config.is_ignored(&item.tag) {
            continue;
        }
        let recipes = collect_recipes(&extractor, item.id, ItemKind::Item, &mut diagnostics)?;
        graph.insert(
            id,
            CraftingItem {
                name: item.name.clone(),
                tier: item.tier,
                rarity: item.rarity,
                icon: item.icon_asset_name.clone(),
                recipes,
                extraction_skill: skills.find_extraction_skill(item.id, ItemKind::Item),
                tag: item.tag.clone(),
            },
        );
    }

    tracing::info!("Collecting cargo...");
    for cargo in &tables.cargo {
        let id = unify(cargo.id, ItemKind::Cargo)?;
        let recipes = collect_recipes(&extractor, cargo.id, ItemKind::Cargo, &mut diagnostics)?;
        graph.insert(
            id,
            CraftingItem {
                name: cargo.name.clone(),
                tier: cargo.tier,
                rarity: cargo.rarity,
                icon: cargo.icon_asset_name.clone(),
                recipes,
                extraction_skill: skills.find_extraction_skill(cargo.id, ItemKind::Cargo),
                tag: cargo.tag.clone(),
            },
        );
    }

    tracing::info!("Checking icons...");
    IconResolver::new(assets).resolve(&mut graph, &mut diagnostics);

    tracing::info!("Reorganizing recipes...");
    expand_item_lists(
        &tables.items,
        &tables.item_lists,
        &extractor,
        &skills,
        &mut graph,
        &mut diagnostics,
    )?;

    tracing::info!("Cleanup and sort recipes...");
    graph.canonicalize(&config.order_overrides(), &mut diagnostics);

    let graph = graph.finalize();
    tracing::info!(
        items = graph.len(),
        recipes = graph.recipe_count(),
        diagnostics = diagnostics.len(),
        "Crafting graph built"
    );

    Ok(CraftingBuild { graph, diagnostics })
}

fn collect_recipes(
    extractor: &RecipeExtractor<'_>,
    raw_id: u64,
    kind: ItemKind,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Recipe>> {
    let matches = extractor.find_recipes(raw_id, kind)?;
    for rejected in matches.rejected {
        diagnostics.push(rejected);
    }
    Ok(matches.recipes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecipeOrderEntry;
    use crate::diagnostics::Diagnostic;
    use crate::ids::CARGO_OFFSET;
    use crate::recipes::tests::{crafting, stack};
    use crate::tables::{CargoDesc, ItemDesc, ItemListDesc, ListPossibility};
    use crate::Error;

    fn item(id: u64, name: &str, tag: &str) -> ItemDesc {
        ItemDesc {
            id,
            name: name.to_string(),
            tier: 1,
            rarity: 1,
            icon_asset_name: format!("GeneratedIcons/Items/{}", name.replace(' ', "")),
            tag: tag.to_string(),
            item_list_id: 0,
        }
    }

    fn cargo(id: u64, name: &str) -> CargoDesc {
        CargoDesc {
            id,
            name: name.to_string(),
            tier: 1,
            rarity: 2,
            icon_asset_name: format!("GeneratedIcons/Cargo/{}", name.replace(' ', "")),
            tag: "Cargo".to_string(),
        }
    }

    fn plank_tables() -> GameTables {
        GameTables {
            items: vec![
                item(100, "Rough Plank", "Plank"),
                item(50, "Rough Stripped Wood", "Stripped Wood"),
            ],
            cargo: vec![cargo(7, "Rough Log Bundle")],
            crafting_recipes: vec![crafting(
                1,
                vec![stack(100, 3, ItemKind::Item)],
                vec![stack(50, 2, ItemKind::Item), stack(7, 1, ItemKind::Cargo)],
            )],
            ..GameTables::default()
        }
    }

    #[test]
    fn test_recipe_lands_under_output_key() {
        let build = build_crafting_graph(&plank_tables(), &BuildConfig::default(), None).unwrap();
        let plank = build.graph.get(UnifiedId::new(100)).unwrap();

        assert_eq!(plank.recipes.len(), 1);
        let consumed: Vec<(u64, u32)> = plank.recipes[0]
            .consumed_items
            .iter()
            .map(|c| (c.id.get(), c.quantity))
            .collect();
        assert_eq!(consumed, vec![(50, 2), (7 + CARGO_OFFSET, 1)]);
        assert_eq!(plank.recipes[0].output_quantity, 3);
        assert!(build.graph.contains(UnifiedId::new(7 + CARGO_OFFSET)));

        let json = serde_json::to_value(&build.graph).unwrap();
        assert_eq!(json["100"]["recipes"][0]["consumed_items"][1]["id"], 7 + CARGO_OFFSET);
        assert_eq!(json["100"]["recipes"][0]["possibilities"], serde_json::json!({}));
        assert_eq!(json["100"]["icon"], "Items/RoughPlank");
    }

    #[test]
    fn test_variant_replaced_by_list_targets() {
        let mut variant = item(5, "Unrefined Ore", "Ore");
        variant.item_list_id = 42;
        let tables = GameTables {
            items: vec![variant, item(9, "Refined Ore", "Ore"), item(3, "Ore Chunk", "Ore Chunk")],
            crafting_recipes: vec![crafting(
                1,
                vec![stack(5, 1, ItemKind::Item)],
                vec![stack(3, 2, ItemKind::Item)],
            )],
            item_lists: vec![ItemListDesc {
                id: 42,
                possibilities: vec![ListPossibility {
                    chance: 1.0,
                    stacks: vec![stack(9, 1, ItemKind::Item)],
                }],
            }],
            ..GameTables::default()
        };

        let build = build_crafting_graph(&tables, &BuildConfig::default(), None).unwrap();
        assert!(!build.graph.contains(UnifiedId::new(5)));

        let json = serde_json::to_value(&build.graph).unwrap();
        assert!(json.get("5").is_none());
        assert_eq!(json["9"]["recipes"][0]["possibilities"], serde_json::json!({"1": 1.0}));
        assert_eq!(json["9"]["recipes"][0]["consumed_items"][0]["id"], 3);
    }

    #[test]
    fn test_ignored_tags_filtered() {
        let mut tables = plank_tables();
        tables.items.push(item(60, "Hidden Letter", "Letter"));
        let build = build_crafting_graph(&tables, &BuildConfig::default(), None).unwrap();
        assert!(!build.graph.contains(UnifiedId::new(60)));
        assert_eq!(build.graph.len(), 3);
    }

    #[test]
    fn test_out_of_range_item_is_fatal() {
        let mut tables = plank_tables();
        tables.items.push(item(CARGO_OFFSET, "Broken", "Plank"));
        let result = build_crafting_graph(&tables, &BuildConfig::default(), None);
        assert!(matches!(result, Err(Error::IdOutOfRange { .. })));
    }

    #[test]
    fn test_duplicate_recipes_collapse_and_sort() {
        let mut tables = plank_tables();
        tables.items.push(item(51, "Simple Stripped Wood", "Stripped Wood"));
        tables.crafting_recipes.push(tables.crafting_recipes[0].clone());
        tables.crafting_recipes.push(crafting(
            2,
            vec![stack(100, 3, ItemKind::Item)],
            vec![stack(51, 1, ItemKind::Item)],
        ));

        let build = build_crafting_graph(&tables, &BuildConfig::default(), None).unwrap();
        let recipes = &build.graph.get(UnifiedId::new(100)).unwrap().recipes;
        assert_eq!(recipes.len(), 2);
        // 1 * 1 * 100 / 3 + 6 sorts before 2 * 1 * 100 / 3 + 5
        assert_eq!(recipes[0].consumed_items[0].id, UnifiedId::new(51));
    }

    #[test]
    fn test_zero_output_recipe_never_ranked() {
        let mut items: Vec<ItemDesc> = [(100, "Rough Plank"), (50, "Wood"), (51, "Bark")]
            .into_iter()
            .map(|(id, name)| item(id, name, "Plank"))
            .collect();
        for item in &mut items {
            item.rarity = 0;
        }
        let tables = GameTables {
            items,
            crafting_recipes: vec![
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
            ],
            ..GameTables::default()
        };

        let build = build_crafting_graph(&tables, &BuildConfig::default(), None).unwrap();
        let recipes = &build.graph.get(UnifiedId::new(100)).unwrap().recipes;
        let shape: Vec<(u32, u64)> = recipes
            .iter()
            .map(|r| (r.output_quantity, r.consumed_items[0].id.get()))
            .collect();
        assert_eq!(shape, vec![(1, 51)]);
        assert!(build.diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::MalformedRecipe { recipe: 1, .. }
        )));
    }

    #[test]
    fn test_manual_order_from_config() {
        let mut tables = plank_tables();
        tables.items.push(item(51, "Simple Stripped Wood", "Stripped Wood"));
        tables.crafting_recipes.push(crafting(
            2,
            vec![stack(100, 3, ItemKind::Item)],
            vec![stack(51, 1, ItemKind::Item)],
        ));
        let config = BuildConfig {
            recipe_order: vec![RecipeOrderEntry {
                target: UnifiedId::new(100),
                preferred: vec![UnifiedId::new(7 + CARGO_OFFSET)],
            }],
            ..BuildConfig::default()
        };

        let build = build_crafting_graph(&tables, &config, None).unwrap();
        let recipes = &build.graph.get(UnifiedId::new(100)).unwrap().recipes;
        assert_eq!(recipes[0].consumed_items[0].id, UnifiedId::new(50));
    }

    #[test]
    fn test_missing_icons_reported() {
        let assets = AssetIndex::from_paths(["Items/RoughPlank", "Cargo/RoughLogBundle"]);
        let build =
            build_crafting_graph(&plank_tables(), &BuildConfig::default(), Some(&assets)).unwrap();
        let missing: Vec<_> = build
            .diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::MissingIcon(icon) => Some(icon.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(missing, vec!["Items/RoughStrippedWood"]);
    }

    #[test]
    fn test_graph_roundtrips_through_json() {
        let build = build_crafting_graph(&plank_tables(), &BuildConfig::default(), None).unwrap();
        let json = serde_json::to_string_pretty(&build.graph).unwrap();
        let parsed: CraftingGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, build.graph);
    }
}
