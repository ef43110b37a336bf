//! Crafting and full build command handlers

use anyhow::{Context, Result};
use bpdata::{aggregate_travelers, build_crafting_graph, AssetIndex, GameTables};
use std::fmt;

use crate::cli::BuildArgs;
use crate::config::Config;
use crate::file_io::write_json;

pub const CRAFTING_FILE: &str = "crafting_data.json";
pub const TRAVELERS_FILE: &str = "travelers_data.json";

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub items: usize,
    pub recipes: usize,
    pub travelers: usize,
    pub tasks: usize,
    pub diagnostics: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items, {} recipes, {} travelers, {} tasks, {} diagnostics",
            self.items, self.recipes, self.travelers, self.tasks, self.diagnostics
        )
    }
}

/// Handle the build and crafting commands
///
/// # Arguments
/// * `args` - Input and output locations
/// * `with_travelers` - Also generate the traveler document
pub fn handle(args: &BuildArgs, with_travelers: bool) -> Result<()> {
    let summary = run(args, with_travelers)?;
    println!("{}", summary);
    Ok(())
}

pub fn run(args: &BuildArgs, with_travelers: bool) -> Result<Summary> {
    let config = Config::load(args.config.as_deref())?;

    let (tables, load_diagnostics) = GameTables::load_dir(&args.game_data)
        .with_context(|| format!("Failed to load game data from {}", args.game_data.display()))?;

    let assets = args
        .assets
        .as_deref()
        .map(AssetIndex::scan)
        .transpose()
        .context("Failed to index icon assets")?;

    let crafting = build_crafting_graph(&tables, &config.build, assets.as_ref())
        .context("Failed to build crafting graph")?;

    let travelers = if with_travelers {
        Some(
            aggregate_travelers(&tables.npcs, &tables.traveler_tasks, &crafting.graph)
                .context("Failed to collect traveler tasks")?,
        )
    } else {
        None
    };

    // Nothing is written until every stage succeeded
    write_json(&args.output.join(CRAFTING_FILE), &crafting.graph)?;
    if let Some(travelers) = &travelers {
        write_json(&args.output.join(TRAVELERS_FILE), &travelers.travelers)?;
    }

    let mut summary = Summary {
        items: crafting.graph.len(),
        recipes: crafting.graph.recipe_count(),
        ..Summary::default()
    };
    let mut diagnostics = load_diagnostics;
    diagnostics.extend(crafting.diagnostics);
    if let Some(travelers) = travelers {
        summary.travelers = travelers.travelers.len();
        summary.tasks = travelers.task_count();
        diagnostics.extend(travelers.diagnostics);
    }
    summary.diagnostics = diagnostics.len();

    Ok(summary)
}
