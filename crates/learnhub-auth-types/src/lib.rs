//! Identity types injected by the API gateway.

pub mod identity;
