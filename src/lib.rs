//! Pro Onboard — onboarding-context registry core.

pub mod accounts;
pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod resolve;
pub mod storage;
