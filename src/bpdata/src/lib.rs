//! # bpdata
//!
//! BitPlanner game data generator - crafting graph and traveler task resolution.
//!
//! This library turns the game's exported description tables into the two lookup
//! documents BitPlanner ships with:
//! - `crafting_data.json`: every craftable item with a deduplicated, ordered recipe list
//! - `travelers_data.json`: traveler NPCs with their tasks, grouped by skill
//!
//! ## Example
//!
//! ```no_run
//! use bpdata::{aggregate_travelers, build_crafting_graph, BuildConfig, GameTables};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (tables, _) = GameTables::load_dir("BitCraft_GameData/server/region")?;
//! let config = BuildConfig::default();
//!
//! let crafting = build_crafting_graph(&tables, &config, None)?;
//! let travelers = aggregate_travelers(&tables.npcs, &tables.traveler_tasks, &crafting.graph)?;
//!
//! println!("{} items, {} travelers", crafting.graph.len(), travelers.travelers.len());
//! # Ok(())
//! # }
//! ```

pub mod canonical;
pub mod config;
pub mod diagnostics;
pub mod extraction;
pub mod graph;
pub mod icons;
pub mod ids;
pub mod loot;
pub mod recipes;
pub mod tables;
pub mod travelers;

// Re-export commonly used items
#[doc(inline)]
pub use canonical::{canonicalize_recipes, OrderOverrides, RecipeOrderOverrides};
#[doc(inline)]
pub use config::{BuildConfig, RecipeOrderEntry};
#[doc(inline)]
pub use diagnostics::{Diagnostic, Diagnostics};
#[doc(inline)]
pub use extraction::ExtractionSkills;
#[doc(inline)]
pub use graph::{
    build_crafting_graph, CraftingBuild, CraftingGraph, CraftingGraphBuilder, CraftingItem,
};
#[doc(inline)]
pub use icons::{normalize_icon, AssetIndex, IconResolver};
#[doc(inline)]
pub use ids::{unify, ItemKind, UnifiedId, CARGO_OFFSET};
#[doc(inline)]
pub use recipes::{ConsumedItem, LevelRequirement, Recipe, RecipeExtractor};
#[doc(inline)]
pub use tables::GameTables;
#[doc(inline)]
pub use travelers::{aggregate_travelers, Task, Traveler, TravelerBuild};

/// Skill identifier as used by the game tables (`-1` when unknown)
pub type SkillId = i32;

/// Errors that abort a run
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{kind} id {raw} exceeds the reserved identifier range")]
    IdOutOfRange { raw: u64, kind: ids::ItemKind },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read table {table}: {source}")]
    Table {
        table: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Table {table} is not valid JSON: {source}")]
    Json {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
