//! Pro accounts: data model and the file-backed store.

pub mod model;
pub mod store;

pub use model::{FeatureStatus, PlanEntry, ProAccount, ProAccountPatch, WeeklyPlan};
pub use store::AccountStore;
