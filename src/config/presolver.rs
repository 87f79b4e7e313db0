//! Results accumulated by the presolving phase
//!
//! Presolving narrows the search space before the main solver runs, e.g. by
//! discovering one-processor mapping candidates. Its output is attached to
//! the run's [`RunConfig`](super::RunConfig) once and read by the solver
//! afterwards.

use super::error::ConfigError;
use std::time::Duration;

/// A timestamped solution record: elapsed time plus the objective and
/// decision values found at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionValues {
    pub time: Duration,
    pub values: Vec<i64>,
}

/// A complete one-processor mapping candidate: every (task, resource)
/// assignment bound to a single processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneProcMapping {
    pub processor: u32,
    pub assignments: Vec<(u32, u32)>,
}

/// How the solver must use the recorded one-processor mappings.
///
/// `Enforce(i)` pins the i-th recorded mapping; `ForbidAll` excludes every
/// recorded mapping from the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingDirective {
    Enforce(usize),
    ForbidAll,
}

/// Everything the presolving phase produced for later phases to consult.
#[derive(Debug, Clone, Default)]
pub struct PresolverResults {
    directive: Option<MappingDirective>,
    pub one_proc_mappings: Vec<OneProcMapping>,
    /// Results kept for optimization bookkeeping
    pub opt_results: Vec<SolutionValues>,
    /// Results selected for reporting to the user; may overlap with
    /// `opt_results` but is an independent view
    pub print_results: Vec<SolutionValues>,
    /// Wall-clock time consumed by presolving
    pub presolver_delay: Duration,
}

impl PresolverResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_mapping(&mut self, mapping: OneProcMapping) {
        self.one_proc_mappings.push(mapping);
    }

    pub fn record_opt_result(&mut self, result: SolutionValues) {
        self.opt_results.push(result);
    }

    pub fn record_print_result(&mut self, result: SolutionValues) {
        self.print_results.push(result);
    }

    /// Pin a recorded mapping for the solver. The index is checked here so
    /// an out-of-range "enforce" can never masquerade as "forbid all".
    pub fn enforce(&mut self, index: usize) -> Result<(), ConfigError> {
        if index >= self.one_proc_mappings.len() {
            return Err(ConfigError::state(format!(
                "cannot enforce mapping {index}: only {} mappings recorded",
                self.one_proc_mappings.len()
            )));
        }
        self.directive = Some(MappingDirective::Enforce(index));
        Ok(())
    }

    /// Exclude every recorded mapping from the search.
    pub fn forbid_all(&mut self) {
        self.directive = Some(MappingDirective::ForbidAll);
    }

    pub fn directive(&self) -> Option<MappingDirective> {
        self.directive
    }

    /// The mapping pinned by an `Enforce` directive, if any.
    pub fn enforced_mapping(&self) -> Option<&OneProcMapping> {
        match self.directive? {
            MappingDirective::Enforce(i) => self.one_proc_mappings.get(i),
            MappingDirective::ForbidAll => None,
        }
    }
}
