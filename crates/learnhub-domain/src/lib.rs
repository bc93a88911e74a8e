//! Domain types shared across all Learnhub services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod money;
pub mod pagination;
pub mod role;
