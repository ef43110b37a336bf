//! Game description tables
//!
//! Loads the server region exports (`*_desc.json`) into typed rows. Each file is a
//! JSON array; rows that don't match the expected shape are skipped with a diagnostic.

mod types;

pub use types::{
    CargoDesc, CraftingRecipeDesc, EnemyDesc, ExperienceReward, ExtractedStack,
    ExtractionRecipeDesc, ItemDesc, ItemListDesc, ItemStack, LevelRequirement, ListPossibility,
    NpcDesc, RewardStack, ShapeError, SkillExperience, TaskLevelRequirement, TravelerTaskDesc,
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::{Error, Result};

pub const ITEMS_TABLE: &str = "item_desc.json";
pub const CARGO_TABLE: &str = "cargo_desc.json";
pub const CRAFTING_RECIPES_TABLE: &str = "crafting_recipe_desc.json";
pub const EXTRACTION_RECIPES_TABLE: &str = "extraction_recipe_desc.json";
pub const ENEMIES_TABLE: &str = "enemy_desc.json";
pub const ITEM_LISTS_TABLE: &str = "item_list_desc.json";
pub const NPCS_TABLE: &str = "npc_desc.json";
pub const TRAVELER_TASKS_TABLE: &str = "traveler_task_desc.json";

/// All source tables, fully loaded
#[derive(Debug, Clone, Default)]
pub struct GameTables {
    pub items: Vec<ItemDesc>,
    pub cargo: Vec<CargoDesc>,
    pub crafting_recipes: Vec<CraftingRecipeDesc>,
    pub extraction_recipes: Vec<ExtractionRecipeDesc>,
    pub enemies: Vec<EnemyDesc>,
    pub item_lists: Vec<ItemListDesc>,
    pub npcs: Vec<NpcDesc>,
    pub traveler_tasks: Vec<TravelerTaskDesc>,
}

impl GameTables {
    /// Load every table from a region export directory
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<(Self, Diagnostics)> {
        let dir = dir.as_ref();
        let mut diagnostics = Diagnostics::new();

        let tables = GameTables {
            items: load_table(dir, ITEMS_TABLE, &mut diagnostics)?,
            cargo: load_table(dir, CARGO_TABLE, &mut diagnostics)?,
            crafting_recipes: load_table(dir, CRAFTING_RECIPES_TABLE, &mut diagnostics)?,
            extraction_recipes: load_table(dir, EXTRACTION_RECIPES_TABLE, &mut diagnostics)?,
            enemies: load_table(dir, ENEMIES_TABLE, &mut diagnostics)?,
            item_lists: load_table(dir, ITEM_LISTS_TABLE, &mut diagnostics)?,
            npcs: load_table(dir, NPCS_TABLE, &mut diagnostics)?,
            traveler_tasks: load_table(dir, TRAVELER_TASKS_TABLE, &mut diagnostics)?,
        };

        tracing::info!(
            items = tables.items.len(),
            cargo = tables.cargo.len(),
            crafting_recipes = tables.crafting_recipes.len(),
            item_lists = tables.item_lists.len(),
            "Loaded game tables from {}",
            dir.display()
        );

        Ok((tables, diagnostics))
    }

    /// Load only the NPC and traveler task tables, leaving the rest empty
    pub fn load_traveler_tables<P: AsRef<Path>>(dir: P) -> Result<(Self, Diagnostics)> {
        let dir = dir.as_ref();
        let mut diagnostics = Diagnostics::new();

        let tables = GameTables {
            npcs: load_table(dir, NPCS_TABLE, &mut diagnostics)?,
            traveler_tasks: load_table(dir, TRAVELER_TASKS_TABLE, &mut diagnostics)?,
            ..GameTables::default()
        };

        tracing::info!(
            npcs = tables.npcs.len(),
            traveler_tasks = tables.traveler_tasks.len(),
            "Loaded traveler tables from {}",
            dir.display()
        );

        Ok((tables, diagnostics))
    }
}

fn load_table<T: DeserializeOwned>(
    dir: &Path,
    table: &'static str,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<T>> {
    let path = dir.join(table);
    let content = fs::read_to_string(&path).map_err(|source| Error::Table { table, source })?;
    let value: Value =
        serde_json::from_str(&content).map_err(|source| Error::Json { table, source })?;
    parse_table(table, value, diagnostics)
}

/// Convert a JSON array into typed rows, skipping rows that fail to parse
pub fn parse_table<T: DeserializeOwned>(
    table: &'static str,
    value: Value,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<T>> {
    let rows = match value {
        Value::Array(rows) => rows,
        _ => {
            return Err(Error::Json {
                table,
                source: serde::de::Error::custom("expected a top-level array"),
            })
        }
    };

    let mut parsed = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value(row) {
            Ok(row) => parsed.push(row),
            Err(e) => diagnostics.push(Diagnostic::MalformedRow {
                table,
                index,
                reason: e.to_string(),
            }),
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_table_skips_malformed_rows() {
        let mut diagnostics = Diagnostics::new();
        let rows: Vec<NpcDesc> = parse_table(
            NPCS_TABLE,
            json!([
                {"name": "Alesi", "task_skill_check": [2]},
                {"task_skill_check": [3]},
                {"name": "Heimlich", "task_skill_check": []}
            ]),
            &mut diagnostics,
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "Heimlich");
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::MalformedRow { index: 1, .. })
        ));
    }

    #[test]
    fn test_malformed_extracted_stack_skips_row() {
        let mut diagnostics = Diagnostics::new();
        let rows: Vec<ExtractionRecipeDesc> = parse_table(
            EXTRACTION_RECIPES_TABLE,
            json!([
                {"id": 1, "extracted_item_stacks": [[[0, [9, 1, [0, {}]]], 1.0]], "level_requirements": [[4, 1]]},
                {"id": 2, "extracted_item_stacks": [[[0, [9, 1, [7, {}]]], 1.0]], "level_requirements": [[4, 1]]},
                {"id": 3, "extracted_item_stacks": [[[1, []], 1.0]], "level_requirements": [[4, 1]]}
            ]),
            &mut diagnostics,
        )
        .unwrap();

        let ids: Vec<u64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(rows[1].extracted_item_stacks[0].stack.is_none());
        assert!(matches!(
            diagnostics.into_vec()[..],
            [Diagnostic::MalformedRow { index: 1, .. }]
        ));
    }

    #[test]
    fn test_parse_table_requires_array() {
        let mut diagnostics = Diagnostics::new();
        let result = parse_table::<NpcDesc>(NPCS_TABLE, json!({"name": "x"}), &mut diagnostics);
        assert!(matches!(result, Err(Error::Json { table: NPCS_TABLE, .. })));
    }

    #[test]
    fn test_load_dir() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let empty = "[]";
        for table in [
            CARGO_TABLE,
            CRAFTING_RECIPES_TABLE,
            EXTRACTION_RECIPES_TABLE,
            ENEMIES_TABLE,
            ITEM_LISTS_TABLE,
            NPCS_TABLE,
            TRAVELER_TASKS_TABLE,
        ] {
            fs::write(dir.path().join(table), empty)?;
        }
        fs::write(
            dir.path().join(ITEMS_TABLE),
            json!([{
                "id": 1,
                "name": "Rough Wood Log",
                "tier": 1,
                "rarity": [1, {}],
                "icon_asset_name": "GeneratedIcons/Items/WoodLog",
                "tag": "Wood Log",
                "item_list_id": 0
            }])
            .to_string(),
        )?;

        let (tables, diagnostics) = GameTables::load_dir(dir.path())?;
        assert_eq!(tables.items.len(), 1);
        assert_eq!(tables.items[0].name, "Rough Wood Log");
        assert!(tables.cargo.is_empty());
        assert!(diagnostics.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_dir_missing_table() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let result = GameTables::load_dir(dir.path());
        assert!(matches!(result, Err(Error::Table { table: ITEMS_TABLE, .. })));
        Ok(())
    }

    #[test]
    fn test_load_traveler_tables_only() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(NPCS_TABLE),
            json!([{"name": "Rumbagh", "task_skill_check": [2]}]).to_string(),
        )?;
        fs::write(dir.path().join(TRAVELER_TASKS_TABLE), "[]")?;

        let (tables, _) = GameTables::load_traveler_tables(dir.path())?;
        assert_eq!(tables.npcs.len(), 1);
        assert!(tables.items.is_empty());
        Ok(())
    }
}
