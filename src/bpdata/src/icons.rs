//! Icon asset paths
//!
//! The exported icon names point into the game's asset tree. BitPlanner ships a
//! flattened copy of those assets, so names are normalized to match it and
//! checked against the asset directory when one is available.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::graph::CraftingGraphBuilder;
use crate::Result;

const ICON_EXTENSION: &str = "png";

/// Asset paths relative to the asset root, without extension, `/`-separated
#[derive(Debug, Clone, Default)]
pub struct AssetIndex {
    paths: HashSet<String>,
}

impl AssetIndex {
    /// Index every `.png` file under `root`
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let mut paths = HashSet::new();

        for entry in walkdir::WalkDir::new(root) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_icon = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ICON_EXTENSION));
            if !is_icon {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let relative = relative.with_extension("");
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            paths.insert(key);
        }

        tracing::debug!("Indexed {} icon assets under {}", paths.len(), root.display());
        Ok(Self { paths })
    }

    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, icon: &str) -> bool {
        self.paths.contains(icon)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Map an exported icon name onto the shipped asset layout.
///
/// `GeneratedIcons/` is dropped, `Other/Other/` collapses to `Other/`, building
/// icons live under `Other/`, and the `Other/` segment is dropped again when the
/// asset exists without it.
pub fn normalize_icon(raw: &str, assets: Option<&AssetIndex>) -> String {
    let mut icon = raw
        .replace("GeneratedIcons/", "")
        .replace("Other/Other/", "Other/");
    if icon.starts_with("Buildings/") {
        icon = format!("Other/{icon}");
    }
    if let Some(assets) = assets {
        let flattened = icon.replace("Other/", "");
        if assets.contains(&flattened) {
            icon = flattened;
        }
    }
    icon
}

/// Icons referenced but not present in the asset index, sorted and unique
pub fn missing_icons<'a>(
    icons: impl IntoIterator<Item = &'a str>,
    assets: &AssetIndex,
) -> Vec<String> {
    icons
        .into_iter()
        .filter(|icon| !assets.contains(icon))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Rewrites the icons of a graph under construction
#[derive(Debug, Clone, Copy, Default)]
pub struct IconResolver<'a> {
    assets: Option<&'a AssetIndex>,
}

impl<'a> IconResolver<'a> {
    pub fn new(assets: Option<&'a AssetIndex>) -> Self {
        Self { assets }
    }

    /// Normalize every icon, then report each missing one once, in sorted order.
    /// Without an asset index nothing is reported.
    pub fn resolve(&self, graph: &mut CraftingGraphBuilder, diagnostics: &mut Diagnostics) {
        for (_, item) in graph.iter_mut() {
            item.icon = normalize_icon(&item.icon, self.assets);
        }

        let Some(assets) = self.assets else {
            return;
        };
        let missing = missing_icons(graph.iter().map(|(_, item)| item.icon.as_str()), assets);
        for icon in missing {
            diagnostics.push(Diagnostic::MissingIcon(icon));
        }
    }
}
