// SiteLog - platform/mod.rs
//
// Platform layer: sinks, clock, log file I/O, configuration.
// Dependencies: core layer, standard library, directories crate.
// Must NOT depend on: app.

pub mod clock;
pub mod config;
pub mod file_log;
pub mod sink;
