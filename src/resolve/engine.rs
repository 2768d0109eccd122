//! Stage resolution: pure computation of a pro's per-feature context.
//!
//! No I/O and no mutation. Given a pro, a feature, and a stage source,
//! produce the stage context with onboarding items split into pending
//! and completed. The three API surfaces all serialize the same
//! resolved shape rather than re-deriving any of this.

use serde::Serialize;

use crate::accounts::ProAccount;
use crate::content::{
    AccessCondition, CalendlyLink, ContextSnippet, Feature, NavigationItem,
    OnboardingItemAssignment, Stage,
};

/// Where a pro's stage for a feature comes from.
///
/// The default reads `FeatureStatus.stage` directly. Stage contexts also
/// carry declarative `access_conditions`; a future evaluator of those
/// conditions plugs in here without the engine changing.
pub trait StageSource: Send + Sync {
    fn stage_for(&self, pro: &ProAccount, feature_id: &str) -> Stage;
}

/// Default strategy: the stage recorded on the pro's feature status.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusFieldSource;

impl StageSource for StatusFieldSource {
    fn stage_for(&self, pro: &ProAccount, feature_id: &str) -> Stage {
        pro.status_for(feature_id).stage
    }
}

/// The content of one stage with its items partitioned for this pro.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedContext {
    /// Assignments whose item the pro has not finished in this feature's
    /// flow, in the stage's authoring order.
    pub pending: Vec<OnboardingItemAssignment>,
    /// Assignments already finished, same ordering rule.
    pub completed: Vec<OnboardingItemAssignment>,
    pub context_snippets: Vec<ContextSnippet>,
    pub navigation: Vec<NavigationItem>,
    pub calendly_links: Vec<CalendlyLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub tools: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_conditions: Option<AccessCondition>,
}

/// One feature resolved for one pro.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedFeature {
    pub feature_id: String,
    pub feature_name: String,
    pub stage: Stage,
    /// `None` when the feature defines no context for the pro's stage —
    /// a feature is permitted to skip defining any stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ResolvedContext>,
}

/// Resolve one feature for one pro.
pub fn resolve_feature(
    pro: &ProAccount,
    feature: &Feature,
    source: &dyn StageSource,
) -> ResolvedFeature {
    let stage = source.stage_for(pro, &feature.id);
    let status = pro.status_for(&feature.id);

    let context = feature.stages.get(stage.context_key()).map(|ctx| {
        // An item counts as done if it was finished inside this feature's
        // flow or anywhere at the pro level; completion is tracked per
        // pro, so one item can satisfy several features at once.
        let is_done = |item_id: &str| {
            status.completed_tasks.iter().any(|t| t == item_id) || pro.has_completed(item_id)
        };
        let (completed, pending): (Vec<_>, Vec<_>) = ctx
            .onboarding_items
            .iter()
            .cloned()
            .partition(|a| is_done(&a.item_id));

        ResolvedContext {
            pending,
            completed,
            context_snippets: ctx.context_snippets.clone(),
            navigation: ctx.navigation.clone(),
            calendly_links: ctx.calendly_links.clone(),
            prompt: ctx.prompt.clone(),
            tools: ctx.tools.clone(),
            access_conditions: ctx.access_conditions.clone(),
        }
    });

    ResolvedFeature {
        feature_id: feature.id.clone(),
        feature_name: feature.name.clone(),
        stage,
        context,
    }
}

/// Resolve every feature, in content-store order, keeping only those
/// whose stage context exists. A defined-but-itemless context is kept;
/// emptiness is about the context being absent, not about zero pending
/// items.
pub fn resolve_all(
    pro: &ProAccount,
    features: &[Feature],
    source: &dyn StageSource,
) -> Vec<ResolvedFeature> {
    features
        .iter()
        .map(|feature| resolve_feature(pro, feature, source))
        .filter(|resolved| resolved.context.is_some())
        .collect()
}
