//! The stage resolution engine: pure functions over pros and content.

pub mod engine;
pub mod next_steps;

pub use engine::{
    ResolvedContext, ResolvedFeature, StageSource, StatusFieldSource, resolve_all, resolve_feature,
};
pub use next_steps::{ProgressSummary, next_steps, progress_summary, weekly_next_steps};
