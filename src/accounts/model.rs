//! Pro account data model.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::Stage;

/// Per-feature adoption status for one pro.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeatureStatus {
    #[serde(default)]
    pub stage: Stage,
    /// Items completed specifically inside this feature's onboarding
    /// flow. Narrower than the pro-level `completed_items` list.
    #[serde(default)]
    pub completed_tasks: Vec<String>,
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engaged_at: Option<DateTime<Utc>>,
}

/// One slot of a weekly plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanEntry {
    pub item_id: String,
    #[serde(default)]
    pub order: u32,
}

impl PlanEntry {
    fn new(item_id: &str, order: u32) -> Self {
        Self {
            item_id: item_id.to_string(),
            order,
        }
    }
}

/// A four-week curated sequence of onboarding items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyPlan {
    #[serde(default)]
    pub week1: Vec<PlanEntry>,
    #[serde(default)]
    pub week2: Vec<PlanEntry>,
    #[serde(default)]
    pub week3: Vec<PlanEntry>,
    #[serde(default)]
    pub week4: Vec<PlanEntry>,
}

impl Default for WeeklyPlan {
    /// The standard template applied to accounts that carry no plan of
    /// their own.
    fn default() -> Self {
        Self {
            week1: vec![
                PlanEntry::new("create-first-customer", 1),
                PlanEntry::new("create-first-job", 2),
            ],
            week2: vec![
                PlanEntry::new("complete-first-job", 1),
                PlanEntry::new("send-first-invoice", 2),
            ],
            week3: vec![PlanEntry::new("collect-first-payment", 1)],
            week4: vec![PlanEntry::new("review-weekly-report", 1)],
        }
    }
}

impl WeeklyPlan {
    /// Item ids planned for the given week (1–4). Out-of-range weeks are
    /// clamped into the plan.
    pub fn week(&self, week: u8) -> &[PlanEntry] {
        match week {
            0 | 1 => &self.week1,
            2 => &self.week2,
            3 => &self.week3,
            _ => &self.week4,
        }
    }
}

fn default_week() -> u8 {
    1
}

/// A customer account being onboarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProAccount {
    pub id: String,
    pub company_name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<u32>,
    /// Pointer (1–4) into the weekly plan.
    #[serde(default = "default_week")]
    pub current_week: u8,
    #[serde(default)]
    pub weekly_plan: WeeklyPlan,
    /// One entry per feature known to the content store; missing entries
    /// are backfilled at load time, never left undefined.
    #[serde(default)]
    pub feature_status: HashMap<String, FeatureStatus>,
    /// Item ids the pro has completed, insertion order kept, set semantics.
    #[serde(default)]
    pub completed_items: Vec<String>,
}

impl ProAccount {
    /// Ensure `feature_status` has an entry for every known feature id.
    pub fn backfill_feature_status(&mut self, feature_ids: &[String]) {
        for id in feature_ids {
            self.feature_status
                .entry(id.clone())
                .or_insert_with(FeatureStatus::default);
        }
    }

    /// Status for one feature, or the `not_attached` default if somehow
    /// absent. Callers must not crash on a missing entry.
    pub fn status_for(&self, feature_id: &str) -> FeatureStatus {
        self.feature_status
            .get(feature_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_completed(&self, item_id: &str) -> bool {
        self.completed_items.iter().any(|id| id == item_id)
    }
}

/// Field-wise patch applied by `AccountStore::update`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProAccountPatch {
    pub company_name: Option<String>,
    pub owner_name: Option<String>,
    pub email: Option<String>,
    pub trade: Option<String>,
    pub team_size: Option<u32>,
    pub current_week: Option<u8>,
    pub weekly_plan: Option<WeeklyPlan>,
    pub feature_status: Option<HashMap<String, FeatureStatus>>,
    pub completed_items: Option<Vec<String>>,
}

impl ProAccountPatch {
    /// Shallow-merge the supplied fields onto `pro`.
    pub fn apply_to(self, pro: &mut ProAccount) {
        if let Some(v) = self.company_name {
            pro.company_name = v;
        }
        if let Some(v) = self.owner_name {
            pro.owner_name = v;
        }
        if let Some(v) = self.email {
            pro.email = v;
        }
        if let Some(v) = self.trade {
            pro.trade = Some(v);
        }
        if let Some(v) = self.team_size {
            pro.team_size = Some(v);
        }
        if let Some(v) = self.current_week {
            pro.current_week = v;
        }
        if let Some(v) = self.weekly_plan {
            pro.weekly_plan = v;
        }
        if let Some(v) = self.feature_status {
            pro.feature_status = v;
        }
        if let Some(v) = self.completed_items {
            pro.completed_items = v;
        }
    }
}
