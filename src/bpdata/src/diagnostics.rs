//! Recoverable anomalies raised while building the documents
//!
//! A diagnostic never aborts a run: the offending record is skipped and the
//! diagnostic is logged and kept for the final report.

use crate::ids::UnifiedId;
use crate::SkillId;

/// A skipped record and the reason it was skipped
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Diagnostic {
    #[error("Malformed row {index} in {table}: {reason}")]
    MalformedRow {
        table: &'static str,
        index: usize,
        reason: String,
    },

    #[error("Crafting recipe {recipe} for {target} consumes its own output, skipping the recipe")]
    SelfConsumingRecipe { recipe: u64, target: UnifiedId },

    #[error("Crafting recipe {recipe} is malformed: {reason}")]
    MalformedRecipe { recipe: u64, reason: &'static str },

    #[error("Item list {list} references unknown item {target}")]
    UnknownLootTarget { list: u64, target: UnifiedId },

    #[error("Recipe for {target} consumes unknown item {consumed}, dropping the recipe")]
    UnknownConsumedItem {
        target: UnifiedId,
        consumed: UnifiedId,
    },

    #[error("Missing icon {0}")]
    MissingIcon(String),

    #[error("Task {task} gives experience to a skill other than the one that is required, skipping the task")]
    TaskSkillMismatch { task: u64 },

    #[error("Task {task} requires skill with unknown id {skill}, skipping the task")]
    UnknownTravelerSkill { task: u64, skill: SkillId },

    #[error("Task {task} requires unavailable item {item}, skipping the task")]
    UnknownTaskItem { task: u64, item: UnifiedId },

    #[error("Task {task} requires no items, skipping the task")]
    EmptyTask { task: u64 },

    #[error("Unexpected reward in task {task}, skipping the task")]
    UnexpectedReward { task: u64 },
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Append all diagnostics from another collection without logging them again
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
