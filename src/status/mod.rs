//! githubstatus.com summary: response models and the conditional polling client.

pub mod client;
pub mod models;

pub use client::{PollOutcome, StatusClient};
pub use models::{ComponentStatus, Incident, SystemStatus};
