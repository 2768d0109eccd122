//! Static onboarding content: features, stage contexts, items, and the
//! supporting catalogs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Adoption stage of one feature for one pro.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NotAttached,
    Attached,
    Activated,
    Engaged,
}

impl Default for Stage {
    fn default() -> Self {
        Self::NotAttached
    }
}

impl Stage {
    /// The key under which a feature stores this stage's context.
    ///
    /// Content files encode stage keys in camelCase, so `not_attached`
    /// looks up `notAttached`; every other stage maps to itself. This is
    /// an exact enumerated mapping, not a general case conversion.
    pub fn context_key(&self) -> &'static str {
        match self {
            Self::NotAttached => "notAttached",
            Self::Attached => "attached",
            Self::Activated => "activated",
            Self::Engaged => "engaged",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAttached => write!(f, "not_attached"),
            Self::Attached => write!(f, "attached"),
            Self::Activated => write!(f, "activated"),
            Self::Engaged => write!(f, "engaged"),
        }
    }
}

/// Release status of a feature definition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    Draft,
    Published,
}

impl Default for ReleaseStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// A product capability whose adoption is tracked through stages.
///
/// One YAML file per feature under `<data>/features/<id>.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub status: ReleaseStatus,
    /// Stage contexts keyed by [`Stage::context_key`]. A feature may
    /// define any subset of stages; absent keys resolve to no context.
    #[serde(default)]
    pub stages: HashMap<String, StageContext>,
}

/// Declarative access-condition tree attached to a stage context.
///
/// Stored and served verbatim. Nothing in this crate evaluates these;
/// the stage is read from the pro's `FeatureStatus` (see
/// [`crate::resolve::StageSource`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessCondition {
    All(Vec<AccessCondition>),
    Any(Vec<AccessCondition>),
    #[serde(untagged)]
    Check {
        variable: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        equals: Option<serde_json::Value>,
    },
}

/// Reference from a stage context to an onboarding item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingItemAssignment {
    pub item_id: String,
    #[serde(default)]
    pub required: bool,
    /// Stage-specific note shown alongside the item at this stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Free-text grounding snippet for the AI agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// The content associated with one feature at one stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StageContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_conditions: Option<AccessCondition>,
    #[serde(default)]
    pub onboarding_items: Vec<OnboardingItemAssignment>,
    #[serde(default)]
    pub context_snippets: Vec<ContextSnippet>,
    #[serde(default)]
    pub navigation: Vec<NavigationItem>,
    #[serde(default)]
    pub calendly_links: Vec<CalendlyLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Names of agent tools available at this stage.
    #[serde(default)]
    pub tools: Vec<String>,
}

/// Kind of onboarding item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Completed by the pro inside the product; an external event marks it done.
    InProduct,
    /// Completed by a human rep following written instructions.
    RepFacing,
}

/// Documentation of the external event that marks an in-product item done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionTrigger {
    pub event: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub description: String,
}

/// A discrete onboarding task, shared across features.
///
/// Completion is tracked per pro (in `completed_items`), so one item can
/// satisfy prerequisites for several features at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_trigger: Option<CompletionTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub estimated_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

/// One entry of a completion checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionStep {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
}

/// A navigation entry surfaced in stage context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
}

/// A scheduling link surfaced in stage context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendlyLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// An agent tool definition in the MCP catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolDef {
    pub name: String,
    pub description: String,
    #[serde(default = "default_schema")]
    pub input_schema: serde_json::Value,
}

fn default_schema() -> serde_json::Value {
    serde_json::json!({"type": "object", "properties": {}})
}

/// Slug used to key navigation/calendly entries that carry no id field.
pub fn slug_of(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

impl NavigationItem {
    /// The key this entry is stored under: its id, or a slug of its label.
    pub fn key(&self) -> String {
        self.id.clone().unwrap_or_else(|| slug_of(&self.label))
    }
}

impl CalendlyLink {
    pub fn key(&self) -> String {
        self.id.clone().unwrap_or_else(|| slug_of(&self.label))
    }
}
