//! Build configuration: ignored tags and recipe order overrides

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::canonical::OrderOverrides;
use crate::ids::UnifiedId;

/// Tags of items that never make it into the crafting graph
pub const DEFAULT_IGNORED_TAGS: &[&str] = &[
    "DEVELOPER ITEM",
    "Crushed Ore",
    "Precious",
    "Cosmetic Clothes",
    "Letter",
    "Journal Page",
    "Ancient Research",
];

/// Preferred consumed items for one target, most preferred first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeOrderEntry {
    pub target: UnifiedId,
    pub preferred: Vec<UnifiedId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Items whose tag contains any of these are skipped
    pub ignored_tags: Vec<String>,
    /// Manual recipe order per target item
    pub recipe_order: Vec<RecipeOrderEntry>,
    /// Target tag → preferred consumed-item tags
    pub tag_order: BTreeMap<String, Vec<String>>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        // Study Journal: from carvings, then from diagrams
        let recipe_order = (1..=6u64)
            .map(|tier| {
                let base = tier * 1_000_000 + 210_000;
                RecipeOrderEntry {
                    target: UnifiedId::new(base + 4),
                    preferred: vec![UnifiedId::new(base + 37), UnifiedId::new(base + 38)],
                }
            })
            .collect();

        let mut tag_order = BTreeMap::new();
        tag_order.insert(
            "Fertilizer".to_string(),
            to_strings(&[
                "Berry",
                "Flower",
                "Lake Fish Filet",
                "Oceanfish Filet",
                "Raw Meat",
                "Food Waste",
            ]),
        );
        tag_order.insert(
            "Catalyst".to_string(),
            to_strings(&["Grain Seeds", "Filament Seeds", "Vegetable Seeds"]),
        );

        Self {
            ignored_tags: to_strings(DEFAULT_IGNORED_TAGS),
            recipe_order,
            tag_order,
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl BuildConfig {
    /// Whether an item with this tag should be left out of the graph
    pub fn is_ignored(&self, tag: &str) -> bool {
        self.ignored_tags.iter().any(|ignored| tag.contains(ignored.as_str()))
    }

    /// Lookup tables for the recipe canonicalizer
    pub fn order_overrides(&self) -> OrderOverrides {
        OrderOverrides::new(
            self.recipe_order
                .iter()
                .map(|entry| (entry.target, entry.preferred.clone())),
            self.tag_order.clone(),
        )
    }
}
