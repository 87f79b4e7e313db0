//! Run configuration for a constraint-programming design-space-exploration
//! tool
//!
//! This library turns raw command-line option values into a validated,
//! strongly-typed [`Settings`] object, and wraps it in a [`RunConfig`] that
//! answers the control-flow questions the optimization pipeline asks and
//! accumulates the output of the presolving phase.

pub mod config;

pub use config::{ConfigError, PresolverResults, RunConfig, Settings, SettingsBuilder};
