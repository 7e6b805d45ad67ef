// SiteLog - core/mod.rs
//
// Core business logic layer. Pure formatting and naming, no sink or
// filesystem access.

pub mod caller;
pub mod chunk;
pub mod format;
pub mod model;
pub mod rotation;
