//! In-memory content store backed by per-category YAML files.
//!
//! Loaded once at startup and mutated only through the admin surface.
//! Every category loads independently — a missing or malformed file
//! leaves that category empty and the rest of the registry intact,
//! because content is authored by hand and draft features routinely
//! ship with incomplete YAML.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::error::StorageError;
use crate::storage::{self, load_catalog};

use super::model::{
    CalendlyLink, CompletionStep, Feature, McpToolDef, NavigationItem, OnboardingItem,
};

/// File names under the data directory.
mod files {
    pub const FEATURES_DIR: &str = "features";
    pub const ITEMS: &str = "onboarding_items.yaml";
    pub const COMPLETION_STEPS: &str = "completion_steps.yaml";
    pub const NAVIGATION: &str = "navigation.yaml";
    pub const CALENDLY: &str = "calendly_links.yaml";
    pub const TOOLS: &str = "mcp_tools.yaml";
}

/// Single in-memory source of truth for static onboarding content.
///
/// Catalogs are `Vec`s so iteration order matches authoring order; the
/// catalog's order is the de facto priority for next-steps derivation.
pub struct ContentStore {
    data_dir: PathBuf,
    features: Vec<Feature>,
    items: Vec<OnboardingItem>,
    completion_steps: Vec<CompletionStep>,
    navigation: Vec<NavigationItem>,
    calendly: Vec<CalendlyLink>,
    tools: Vec<McpToolDef>,
}

impl ContentStore {
    /// Load all content categories from `data_dir`.
    pub fn load(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let features = load_features(&data_dir.join(files::FEATURES_DIR));
        let items = load_catalog(&data_dir.join(files::ITEMS), "onboarding items");
        let completion_steps =
            load_catalog(&data_dir.join(files::COMPLETION_STEPS), "completion steps");
        let navigation = load_catalog(&data_dir.join(files::NAVIGATION), "navigation items");
        let calendly = load_catalog(&data_dir.join(files::CALENDLY), "calendly links");
        let tools = load_catalog(&data_dir.join(files::TOOLS), "mcp tools");

        tracing::info!(
            features = features.len(),
            items = items.len(),
            tools = tools.len(),
            "Content store loaded"
        );

        Self {
            data_dir,
            features,
            items,
            completion_steps,
            navigation,
            calendly,
            tools,
        }
    }

    /// Discard all in-memory state and reload from the backing files.
    pub fn reload(&mut self) {
        *self = Self::load(self.data_dir.clone());
    }

    // ── Features ────────────────────────────────────────────────────

    pub fn all_features(&self) -> &[Feature] {
        &self.features
    }

    pub fn find_feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// All feature ids in catalog order, used for account backfill.
    pub fn feature_ids(&self) -> Vec<String> {
        self.features.iter().map(|f| f.id.clone()).collect()
    }

    /// Upsert a feature by id and persist its backing file.
    pub fn set_feature(&mut self, feature: Feature) -> Result<(), StorageError> {
        let path = self.feature_path(&feature.id);
        storage::save_yaml(&path, &feature)?;
        match self.features.iter_mut().find(|f| f.id == feature.id) {
            Some(existing) => *existing = feature,
            None => self.features.push(feature),
        }
        Ok(())
    }

    /// Delete a feature and its backing file. Returns whether it existed.
    pub fn delete_feature(&mut self, id: &str) -> Result<bool, StorageError> {
        let before = self.features.len();
        self.features.retain(|f| f.id != id);
        if self.features.len() == before {
            return Ok(false);
        }
        storage::remove_file(&self.feature_path(id))?;
        Ok(true)
    }

    fn feature_path(&self, id: &str) -> PathBuf {
        self.data_dir
            .join(files::FEATURES_DIR)
            .join(format!("{id}.yaml"))
    }

    // ── Onboarding items ────────────────────────────────────────────

    pub fn all_items(&self) -> &[OnboardingItem] {
        &self.items
    }

    pub fn find_item(&self, id: &str) -> Option<&OnboardingItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn set_item(&mut self, item: OnboardingItem) -> Result<(), StorageError> {
        upsert_by_key(&mut self.items, item, |i| i.id.clone());
        self.persist_catalog(files::ITEMS, &self.items)
    }

    pub fn delete_item(&mut self, id: &str) -> Result<bool, StorageError> {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.persist_catalog(files::ITEMS, &self.items)?;
        Ok(true)
    }

    // ── Completion steps ────────────────────────────────────────────

    pub fn all_completion_steps(&self) -> &[CompletionStep] {
        &self.completion_steps
    }

    pub fn find_completion_step(&self, id: &str) -> Option<&CompletionStep> {
        self.completion_steps.iter().find(|s| s.id == id)
    }

    pub fn set_completion_step(&mut self, step: CompletionStep) -> Result<(), StorageError> {
        upsert_by_key(&mut self.completion_steps, step, |s| s.id.clone());
        self.persist_catalog(files::COMPLETION_STEPS, &self.completion_steps)
    }

    pub fn delete_completion_step(&mut self, id: &str) -> Result<bool, StorageError> {
        let before = self.completion_steps.len();
        self.completion_steps.retain(|s| s.id != id);
        if self.completion_steps.len() == before {
            return Ok(false);
        }
        self.persist_catalog(files::COMPLETION_STEPS, &self.completion_steps)?;
        Ok(true)
    }

    // ── Navigation ──────────────────────────────────────────────────

    pub fn all_navigation(&self) -> &[NavigationItem] {
        &self.navigation
    }

    pub fn find_navigation(&self, key: &str) -> Option<&NavigationItem> {
        self.navigation.iter().find(|n| n.key() == key)
    }

    pub fn set_navigation(&mut self, nav: NavigationItem) -> Result<(), StorageError> {
        upsert_by_key(&mut self.navigation, nav, |n| n.key());
        self.persist_catalog(files::NAVIGATION, &self.navigation)
    }

    pub fn delete_navigation(&mut self, key: &str) -> Result<bool, StorageError> {
        let before = self.navigation.len();
        self.navigation.retain(|n| n.key() != key);
        if self.navigation.len() == before {
            return Ok(false);
        }
        self.persist_catalog(files::NAVIGATION, &self.navigation)?;
        Ok(true)
    }

    // ── Calendly links ──────────────────────────────────────────────

    pub fn all_calendly(&self) -> &[CalendlyLink] {
        &self.calendly
    }

    pub fn find_calendly(&self, key: &str) -> Option<&CalendlyLink> {
        self.calendly.iter().find(|c| c.key() == key)
    }

    pub fn set_calendly(&mut self, link: CalendlyLink) -> Result<(), StorageError> {
        upsert_by_key(&mut self.calendly, link, |c| c.key());
        self.persist_catalog(files::CALENDLY, &self.calendly)
    }

    pub fn delete_calendly(&mut self, key: &str) -> Result<bool, StorageError> {
        let before = self.calendly.len();
        self.calendly.retain(|c| c.key() != key);
        if self.calendly.len() == before {
            return Ok(false);
        }
        self.persist_catalog(files::CALENDLY, &self.calendly)?;
        Ok(true)
    }

    // ── Agent tools ─────────────────────────────────────────────────

    pub fn all_tools(&self) -> &[McpToolDef] {
        &self.tools
    }

    pub fn find_tool(&self, name: &str) -> Option<&McpToolDef> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn set_tool(&mut self, tool: McpToolDef) -> Result<(), StorageError> {
        upsert_by_key(&mut self.tools, tool, |t| t.name.clone());
        self.persist_catalog(files::TOOLS, &self.tools)
    }

    pub fn delete_tool(&mut self, name: &str) -> Result<bool, StorageError> {
        let before = self.tools.len();
        self.tools.retain(|t| t.name != name);
        if self.tools.len() == before {
            return Ok(false);
        }
        self.persist_catalog(files::TOOLS, &self.tools)?;
        Ok(true)
    }

    fn persist_catalog<T: Serialize>(&self, file: &str, catalog: &[T]) -> Result<(), StorageError> {
        storage::save_yaml(&self.data_dir.join(file), &catalog)
    }
}

/// Replace the first element with the same key, or append.
fn upsert_by_key<T>(catalog: &mut Vec<T>, entry: T, key: impl Fn(&T) -> String) {
    let entry_key = key(&entry);
    match catalog.iter_mut().find(|e| key(e) == entry_key) {
        Some(existing) => *existing = entry,
        None => catalog.push(entry),
    }
}

/// Load every feature file under `dir`, skipping unparseable ones.
fn load_features(dir: &Path) -> Vec<Feature> {
    let paths = match storage::yaml_files_in(dir) {
        Ok(paths) => paths,
        Err(e) => {
            warn!(error = %e, "Features directory unavailable, starting empty");
            return Vec::new();
        }
    };

    let mut features = Vec::with_capacity(paths.len());
    for path in paths {
        match storage::load_yaml::<Feature>(&path) {
            Ok(feature) => features.push(feature),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping malformed feature file");
            }
        }
    }
    features
}
