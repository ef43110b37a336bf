//! Traveler document command handler

use anyhow::{Context, Result};
use bpdata::{aggregate_travelers, CraftingGraph, GameTables};
use std::path::Path;

use super::build::{Summary, TRAVELERS_FILE};
use crate::file_io::{read_json, write_json};

/// Handle the travelers command
pub fn handle(game_data: &Path, crafting_data: &Path, output: &Path) -> Result<()> {
    let summary = run(game_data, crafting_data, output)?;
    println!("{}", summary);
    Ok(())
}

pub fn run(game_data: &Path, crafting_data: &Path, output: &Path) -> Result<Summary> {
    let graph: CraftingGraph =
        read_json(crafting_data).context("Failed to load crafting document")?;

    let (tables, mut diagnostics) = GameTables::load_traveler_tables(game_data)
        .with_context(|| format!("Failed to load game data from {}", game_data.display()))?;

    let travelers = aggregate_travelers(&tables.npcs, &tables.traveler_tasks, &graph)
        .context("Failed to collect traveler tasks")?;

    write_json(&output.join(TRAVELERS_FILE), &travelers.travelers)?;

    let mut summary = Summary {
        items: graph.len(),
        recipes: graph.recipe_count(),
        travelers: travelers.travelers.len(),
        tasks: travelers.task_count(),
        ..Summary::default()
    };
    diagnostics.extend(travelers.diagnostics);
    summary.diagnostics = diagnostics.len();

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build::tests::write_region;
    use crate::commands::build::CRAFTING_FILE;
    use std::fs;

    #[test]
    fn test_from_existing_crafting_document() {
        let region = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_region(region.path());
        let crafting = out.path().join(CRAFTING_FILE);
        fs::write(
            &crafting,
            r#"{"60": {"name": "Old Letter", "tier": 1, "rarity": 1, "icon": "Items/Letter",
                "recipes": [], "extraction_skill": -1, "tag": "Letter"}}"#,
        )
        .unwrap();

        let summary = run(region.path(), &crafting, out.path()).unwrap();
        assert_eq!(summary.items, 1);
        assert_eq!(summary.tasks, 1);
        // task 1 needs item 100, which this document doesn't have
        assert_eq!(summary.diagnostics, 1);

        let written = fs::read_to_string(out.path().join(TRAVELERS_FILE)).unwrap();
        assert!(written.contains("\"60\": 1"));
    }

    #[test]
    fn test_missing_crafting_document() {
        let region = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_region(region.path());

        let result = run(region.path(), &out.path().join(CRAFTING_FILE), out.path());
        assert!(result.is_err());
        assert!(!out.path().join(TRAVELERS_FILE).exists());
    }
}
