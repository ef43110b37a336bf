//! Traveler task aggregation
//!
//! Builds the `travelers_data.json` document from the NPC and task tables,
//! keeping only tasks whose required items all exist in the crafting graph.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::graph::CraftingGraph;
use crate::ids::UnifiedId;
use crate::tables::{NpcDesc, TravelerTaskDesc};
use crate::{Result, SkillId};

/// The only reward kind a task may hand out
pub const REWARD_KIND: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Minimum and maximum skill level
    pub levels: [i32; 2],
    /// Required items in table order, serialized as an object
    #[serde(serialize_with = "serialize_required_items")]
    pub required_items: Vec<(UnifiedId, u32)>,
    pub reward: u32,
    pub experience: u32,
}

impl Task {
    fn sort_key(&self) -> (i32, i32, Option<UnifiedId>) {
        (
            self.levels[0],
            self.levels[1],
            self.required_items.first().map(|(id, _)| *id),
        )
    }
}

fn serialize_required_items<S>(
    items: &[(UnifiedId, u32)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(items.len()))?;
    for (id, quantity) in items {
        map.serialize_entry(id, quantity)?;
    }
    map.end()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Traveler {
    pub name: String,
    pub skill: SkillId,
    pub tasks: Vec<Task>,
}

/// Result of [`aggregate_travelers`]
#[derive(Debug, Clone)]
pub struct TravelerBuild {
    pub travelers: Vec<Traveler>,
    pub diagnostics: Diagnostics,
}

impl TravelerBuild {
    pub fn task_count(&self) -> usize {
        self.travelers.iter().map(|t| t.tasks.len()).sum()
    }
}

/// Group the valid tasks under their travelers.
///
/// Travelers keep NPC table order; tasks are sorted by level range, then by
/// first required item.
pub fn aggregate_travelers(
    npcs: &[NpcDesc],
    tasks: &[TravelerTaskDesc],
    graph: &CraftingGraph,
) -> Result<TravelerBuild> {
    let mut diagnostics = Diagnostics::new();

    tracing::info!("Getting NPCs info...");
    let mut travelers: Vec<Traveler> = npcs
        .iter()
        .filter_map(|npc| {
            let skill = *npc.task_skill_check.first()?;
            Some(Traveler {
                name: npc.name.clone(),
                skill,
                tasks: Vec::new(),
            })
        })
        .collect();

    tracing::info!("Collecting tasks...");
    for desc in tasks {
        let Some((index, task)) = resolve_task(desc, &travelers, graph, &mut diagnostics)? else {
            continue;
        };
        travelers[index].tasks.push(task);
    }

    for traveler in &mut travelers {
        traveler.tasks.sort_by_key(Task::sort_key);
        tracing::debug!("{} has {} tasks", traveler.name, traveler.tasks.len());
    }

    let build = TravelerBuild { travelers, diagnostics };
    tracing::info!(
        travelers = build.travelers.len(),
        tasks = build.task_count(),
        "Travelers collected"
    );
    Ok(build)
}

/// Validate a task row. Returns the owning traveler's index and the task, or
/// `None` when the task is discarded.
fn resolve_task(
    desc: &TravelerTaskDesc,
    travelers: &[Traveler],
    graph: &CraftingGraph,
    diagnostics: &mut Diagnostics,
) -> Result<Option<(usize, Task)>> {
    let skill = desc.level_requirement.skill_id;
    if skill != desc.rewarded_experience.skill_id {
        diagnostics.push(Diagnostic::TaskSkillMismatch { task: desc.id });
        return Ok(None);
    }

    let Some(index) = travelers.iter().position(|t| t.skill == skill) else {
        diagnostics.push(Diagnostic::UnknownTravelerSkill { task: desc.id, skill });
        return Ok(None);
    };

    let mut required_items: Vec<(UnifiedId, u32)> = Vec::with_capacity(desc.required_items.len());
    for stack in &desc.required_items {
        let id = stack.unified_id()?;
        if !graph.contains(id) {
            diagnostics.push(Diagnostic::UnknownTaskItem { task: desc.id, item: id });
            return Ok(None);
        }
        match required_items.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = stack.quantity,
            None => required_items.push((id, stack.quantity)),
        }
    }
    if required_items.is_empty() {
        diagnostics.push(Diagnostic::EmptyTask { task: desc.id });
        return Ok(None);
    }

    let reward = match desc.rewarded_items.as_slice() {
        [only] if only.kind == REWARD_KIND => only.quantity,
        _ => {
            diagnostics.push(Diagnostic::UnexpectedReward { task: desc.id });
            return Ok(None);
        }
    };

    let task = Task {
        levels: [desc.level_requirement.min_level, desc.level_requirement.max_level],
        required_items,
        reward,
        experience: desc.rewarded_experience.quantity,
    };
    Ok(Some((index, task)))
}
