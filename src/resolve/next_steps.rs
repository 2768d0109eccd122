//! Next-step derivation and progress summaries.
//!
//! Next steps are catalog-order truncation, not priority scoring: the
//! item catalog's authoring order is the de facto priority. The agent
//! variant additionally floats the pro's current-week plan items to the
//! front.

use serde::Serialize;

use crate::accounts::ProAccount;
use crate::content::OnboardingItem;

/// The next incomplete items in catalog order, at most `limit`.
pub fn next_steps(pro: &ProAccount, items: &[OnboardingItem], limit: usize) -> Vec<OnboardingItem> {
    items
        .iter()
        .filter(|item| !pro.has_completed(&item.id))
        .take(limit)
        .cloned()
        .collect()
}

/// Weekly-plan-aware next steps: incomplete items from the pro's current
/// week come first, then the remaining incomplete items, both in stable
/// catalog order, truncated to `limit`.
pub fn weekly_next_steps(
    pro: &ProAccount,
    items: &[OnboardingItem],
    limit: usize,
) -> Vec<OnboardingItem> {
    let week = pro.weekly_plan.week(pro.current_week);
    let in_week = |id: &str| week.iter().any(|entry| entry.item_id == id);

    let incomplete: Vec<&OnboardingItem> = items
        .iter()
        .filter(|item| !pro.has_completed(&item.id))
        .collect();

    let (weekly, rest): (Vec<&OnboardingItem>, Vec<&OnboardingItem>) =
        incomplete.into_iter().partition(|item| in_week(&item.id));

    weekly
        .into_iter()
        .chain(rest)
        .take(limit)
        .cloned()
        .collect()
}

/// Overall onboarding progress for one pro.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub completed_count: usize,
    pub total_items: usize,
    /// Whole-number percentage; 0 for an empty catalog rather than a
    /// non-finite division result.
    pub percent_complete: u32,
}

/// Completed-vs-catalog summary. Only completed ids that still exist in
/// the catalog count, so stale ids cannot push the percentage past 100.
pub fn progress_summary(pro: &ProAccount, items: &[OnboardingItem]) -> ProgressSummary {
    let total_items = items.len();
    let completed_count = items
        .iter()
        .filter(|item| pro.has_completed(&item.id))
        .count();
    let percent_complete = if total_items == 0 {
        0
    } else {
        ((completed_count as f64 / total_items as f64) * 100.0).round() as u32
    };

    ProgressSummary {
        completed_count,
        total_items,
        percent_complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{PlanEntry, WeeklyPlan};
    use crate::content::ItemType;
    use std::collections::HashMap;

    fn item(id: &str) -> OnboardingItem {
        OnboardingItem {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            item_type: ItemType::InProduct,
            completion_trigger: None,
            instructions: None,
            estimated_minutes: 5,
            action_url: None,
        }
    }

    fn pro(completed: &[&str], week1: &[&str]) -> ProAccount {
        ProAccount {
            id: "pro-001".to_string(),
            company_name: "Acme".to_string(),
            owner_name: String::new(),
            email: String::new(),
            trade: None,
            team_size: None,
            current_week: 1,
            weekly_plan: WeeklyPlan {
                week1: week1
                    .iter()
                    .enumerate()
                    .map(|(i, id)| PlanEntry {
                        item_id: id.to_string(),
                        order: i as u32 + 1,
                    })
                    .collect(),
                week2: Vec::new(),
                week3: Vec::new(),
                week4: Vec::new(),
            },
            feature_status: HashMap::new(),
            completed_items: completed.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn catalog(ids: &[&str]) -> Vec<OnboardingItem> {
        ids.iter().map(|id| item(id)).collect()
    }

    #[test]
    fn next_steps_filters_completed_and_bounds_length() {
        let items = catalog(&["a", "b", "c", "d", "e"]);
        let account = pro(&["a", "c"], &[]);

        let steps = next_steps(&account, &items, 2);
        let ids: Vec<_> = steps.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);
        for step in &steps {
            assert!(!account.has_completed(&step.id));
        }
    }

    #[test]
    fn next_steps_length_is_min_of_limit_and_incomplete() {
        let items = catalog(&["a", "b"]);
        let account = pro(&["a"], &[]);
        assert_eq!(next_steps(&account, &items, 5).len(), 1);
    }

    #[test]
    fn weekly_steps_float_current_week_items_first() {
        // 1 weekly-matching incomplete item, 4 other incomplete items
        let items = catalog(&["other-1", "other-2", "weekly-match", "other-3", "other-4"]);
        let account = pro(&[], &["weekly-match"]);

        let steps = weekly_next_steps(&account, &items, 2);
        let ids: Vec<_> = steps.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["weekly-match", "other-1"]);
    }

    #[test]
    fn weekly_steps_keep_catalog_order_within_partitions() {
        let items = catalog(&["a", "b", "c", "d"]);
        let account = pro(&[], &["c", "a"]);

        let steps = weekly_next_steps(&account, &items, 4);
        let ids: Vec<_> = steps.iter().map(|i| i.id.as_str()).collect();
        // Weekly partition in catalog order (a before c), then the rest
        assert_eq!(ids, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn weekly_steps_skip_completed_plan_items() {
        let items = catalog(&["a", "b", "c"]);
        let account = pro(&["a"], &["a", "b"]);

        let steps = weekly_next_steps(&account, &items, 3);
        let ids: Vec<_> = steps.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn progress_zero_guard_for_empty_catalog() {
        let account = pro(&["anything"], &[]);
        let summary = progress_summary(&account, &[]);
        assert_eq!(summary.percent_complete, 0);
        assert_eq!(summary.total_items, 0);
    }

    #[test]
    fn progress_counts_only_catalog_items() {
        let items = catalog(&["a", "b", "c", "d"]);
        let account = pro(&["a", "b", "stale-id"], &[]);

        let summary = progress_summary(&account, &items);
        assert_eq!(summary.completed_count, 2);
        assert_eq!(summary.percent_complete, 50);
    }
}
