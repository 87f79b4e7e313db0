//! Run configuration for the design-space-exploration pipeline

pub mod domains;
pub mod error;
pub mod presolver;
pub mod run_config;
pub mod settings;

pub use domains::{
    CpModel, LogLevel, MultiStepHeuristic, OptCriterion, OutputFileType, OutputPrintFrequency,
    PresolverModel, SearchType, ThroughputPropagator,
};
pub use error::ConfigError;
pub use presolver::{MappingDirective, OneProcMapping, PresolverResults, SolutionValues};
pub use run_config::RunConfig;
pub use settings::{Settings, SettingsBuilder};
