//! Static onboarding content: data model and the file-backed store.

pub mod model;
pub mod store;

pub use model::{
    AccessCondition, CalendlyLink, CompletionStep, CompletionTrigger, ContextSnippet, Feature,
    ItemType, McpToolDef, NavigationItem, OnboardingItem, OnboardingItemAssignment, ReleaseStatus,
    Stage, StageContext,
};
pub use store::ContentStore;
