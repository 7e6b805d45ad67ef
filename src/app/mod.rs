// SiteLog - app/mod.rs
//
// Application layer: the logger facade and the process-wide handle.
// Dependencies: core and platform layers.

pub mod global;
pub mod logger;
