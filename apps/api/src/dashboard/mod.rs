// Student dashboard: one read-only snapshot assembled from parallel reads.

pub mod aggregate;
pub mod handlers;
pub mod metrics;
pub mod models;
