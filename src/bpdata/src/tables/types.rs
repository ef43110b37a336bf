//! Typed rows for the game description tables
//!
//! Tuple-shaped values (item stacks, level requirements, list possibilities) are
//! parsed from JSON arrays leniently: trailing elements are ignored.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ids::{unify, ItemKind, UnifiedId};
use crate::{Result, SkillId};

/// Shape errors for tuple-encoded values
#[derive(Debug, Clone, thiserror::Error)]
pub enum ShapeError {
    #[error("missing element {index} ({what})")]
    Missing { index: usize, what: &'static str },

    #[error("element {index} ({what}) has the wrong type")]
    WrongType { index: usize, what: &'static str },

    #[error("unknown item type discriminant {0}")]
    UnknownKind(u64),
}

type ShapeResult<T> = std::result::Result<T, ShapeError>;

fn element<'a>(values: &'a [Value], index: usize, what: &'static str) -> ShapeResult<&'a Value> {
    values.get(index).ok_or(ShapeError::Missing { index, what })
}

fn element_u64(values: &[Value], index: usize, what: &'static str) -> ShapeResult<u64> {
    element(values, index, what)?
        .as_u64()
        .ok_or(ShapeError::WrongType { index, what })
}

fn element_i32(values: &[Value], index: usize, what: &'static str) -> ShapeResult<i32> {
    element(values, index, what)?
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or(ShapeError::WrongType { index, what })
}

fn element_u32(values: &[Value], index: usize, what: &'static str) -> ShapeResult<u32> {
    u32::try_from(element_u64(values, index, what)?)
        .map_err(|_| ShapeError::WrongType { index, what })
}

fn element_array<'a>(
    values: &'a [Value],
    index: usize,
    what: &'static str,
) -> ShapeResult<&'a [Value]> {
    element(values, index, what)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ShapeError::WrongType { index, what })
}

/// First element of an enum-encoded value such as `rarity: [3, {}]`
fn leading_i32<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    element_i32(&values, 0, "rank").map_err(serde::de::Error::custom)
}

/// A stack of items: `[raw_id, quantity, [type_discriminant, ...], ...]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct ItemStack {
    pub raw_id: u64,
    pub quantity: u32,
    pub kind: ItemKind,
}

impl ItemStack {
    pub fn unified_id(&self) -> Result<UnifiedId> {
        unify(self.raw_id, self.kind)
    }
}

impl TryFrom<Vec<Value>> for ItemStack {
    type Error = ShapeError;

    fn try_from(values: Vec<Value>) -> std::result::Result<Self, Self::Error> {
        let raw_id = element_u64(&values, 0, "id")?;
        let quantity = element_u32(&values, 1, "quantity")?;
        let discriminant = element_u64(element_array(&values, 2, "type")?, 0, "type discriminant")?;
        let kind = ItemKind::from_discriminant(discriminant)
            .ok_or(ShapeError::UnknownKind(discriminant))?;
        Ok(ItemStack {
            raw_id,
            quantity,
            kind,
        })
    }
}

/// Skill and level pair, serialized as `[skill_id, level]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "(SkillId, i32)")]
pub struct LevelRequirement {
    pub skill_id: SkillId,
    pub level: i32,
}

impl TryFrom<Vec<Value>> for LevelRequirement {
    type Error = ShapeError;

    fn try_from(values: Vec<Value>) -> std::result::Result<Self, Self::Error> {
        Ok(LevelRequirement {
            skill_id: element_i32(&values, 0, "skill")?,
            level: element_i32(&values, 1, "level")?,
        })
    }
}

impl From<LevelRequirement> for (SkillId, i32) {
    fn from(req: LevelRequirement) -> Self {
        (req.skill_id, req.level)
    }
}

/// Extracted stack: `[[variant, stack], ...]` where the inner pair is an optional stack.
/// An empty payload means no stack; a payload that isn't a valid stack is an error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct ExtractedStack {
    /// `None` when the option holds no stack
    pub stack: Option<ItemStack>,
}

impl TryFrom<Vec<Value>> for ExtractedStack {
    type Error = ShapeError;

    fn try_from(values: Vec<Value>) -> std::result::Result<Self, Self::Error> {
        let option = element_array(&values, 0, "item stack")?;
        let stack = match option.get(1) {
            None | Some(Value::Null) => None,
            Some(Value::Array(inner)) if inner.is_empty() => None,
            Some(Value::Array(inner)) => Some(ItemStack::try_from(inner.clone())?),
            Some(_) => {
                return Err(ShapeError::WrongType {
                    index: 1,
                    what: "item stack",
                })
            }
        };
        Ok(ExtractedStack { stack })
    }
}

/// Experience grant keyed by skill: `[skill_id, ...]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct SkillExperience {
    pub skill_id: SkillId,
}

impl TryFrom<Vec<Value>> for SkillExperience {
    type Error = ShapeError;

    fn try_from(values: Vec<Value>) -> std::result::Result<Self, Self::Error> {
        Ok(SkillExperience {
            skill_id: element_i32(&values, 0, "skill")?,
        })
    }
}

/// Weighted outcome of an item list: `[chance, [stack, ...]]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct ListPossibility {
    pub chance: f64,
    pub stacks: Vec<ItemStack>,
}

impl TryFrom<Vec<Value>> for ListPossibility {
    type Error = ShapeError;

    fn try_from(values: Vec<Value>) -> std::result::Result<Self, Self::Error> {
        let chance = element(&values, 0, "chance")?
            .as_f64()
            .ok_or(ShapeError::WrongType { index: 0, what: "chance" })?;
        let stacks = element_array(&values, 1, "stacks")?
            .iter()
            .map(|v| match v {
                Value::Array(inner) => ItemStack::try_from(inner.clone()),
                _ => Err(ShapeError::WrongType { index: 1, what: "stacks" }),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ListPossibility { chance, stacks })
    }
}

/// Rewarded stack of a traveler task: `[reward_kind, quantity, ...]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct RewardStack {
    pub kind: u64,
    pub quantity: u32,
}

impl TryFrom<Vec<Value>> for RewardStack {
    type Error = ShapeError;

    fn try_from(values: Vec<Value>) -> std::result::Result<Self, Self::Error> {
        Ok(RewardStack {
            kind: element_u64(&values, 0, "reward kind")?,
            quantity: element_u32(&values, 1, "quantity")?,
        })
    }
}

/// Row of `item_desc.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemDesc {
    pub id: u64,
    pub name: String,
    pub tier: i32,
    #[serde(deserialize_with = "leading_i32")]
    pub rarity: i32,
    #[serde(default)]
    pub icon_asset_name: String,
    #[serde(default)]
    pub tag: String,
    /// Non-zero when the item is a variant drawn from an item list
    #[serde(default)]
    pub item_list_id: u64,
}

/// Row of `cargo_desc.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CargoDesc {
    pub id: u64,
    pub name: String,
    pub tier: i32,
    #[serde(deserialize_with = "leading_i32")]
    pub rarity: i32,
    #[serde(default)]
    pub icon_asset_name: String,
    #[serde(default)]
    pub tag: String,
}

/// Row of `crafting_recipe_desc.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CraftingRecipeDesc {
    #[serde(default)]
    pub id: u64,
    pub crafted_item_stacks: Vec<ItemStack>,
    pub consumed_item_stacks: Vec<ItemStack>,
    #[serde(default)]
    pub level_requirements: Vec<LevelRequirement>,
}

/// Row of `extraction_recipe_desc.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractionRecipeDesc {
    #[serde(default)]
    pub id: u64,
    pub extracted_item_stacks: Vec<ExtractedStack>,
    #[serde(default)]
    pub level_requirements: Vec<LevelRequirement>,
}

/// Row of `enemy_desc.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnemyDesc {
    #[serde(default)]
    pub name: String,
    pub extracted_item_stacks: Vec<ExtractedStack>,
    #[serde(default)]
    pub experience_per_damage_dealt: Vec<SkillExperience>,
}

/// Row of `item_list_desc.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemListDesc {
    pub id: u64,
    pub possibilities: Vec<ListPossibility>,
}

/// Row of `npc_desc.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NpcDesc {
    pub name: String,
    #[serde(default)]
    pub task_skill_check: Vec<SkillId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TaskLevelRequirement {
    pub skill_id: SkillId,
    pub min_level: i32,
    pub max_level: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExperienceReward {
    pub skill_id: SkillId,
    pub quantity: u32,
}

/// Row of `traveler_task_desc.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TravelerTaskDesc {
    pub id: u64,
    pub level_requirement: TaskLevelRequirement,
    pub rewarded_experience: ExperienceReward,
    pub required_items: Vec<ItemStack>,
    #[serde(default)]
    pub rewarded_items: Vec<RewardStack>,
}
