//! Ambient service plumbing shared by all Learnhub services.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
