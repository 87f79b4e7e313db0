//! The run configuration handle consumed by the exploration pipeline
//!
//! `RunConfig` owns the finished [`Settings`], the multi-step optimization
//! counter, and the presolver output once it exists. Every control-flow
//! question downstream phases ask (which criterion is active, whether
//! presolving runs, whether multi-step search is on) is answered here so the
//! enum logic is not re-derived at each call site.
//!
//! Single-threaded by contract: step advancement and result attachment
//! happen on the orchestration thread between solver phases.

use super::domains::OptCriterion;
use super::error::ConfigError;
use super::presolver::{MappingDirective, PresolverResults};
use super::settings::Settings;

#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    settings: Settings,
    optimization_step: usize,
    presolver_results: Option<PresolverResults>,
}

impl RunConfig {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            optimization_step: 0,
            presolver_results: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Zero-based index into the criteria schedule.
    pub fn optimization_step(&self) -> usize {
        self.optimization_step
    }

    /// The criterion scheduled at `step`, if the schedule reaches that far.
    /// All `do_optimize*` queries delegate here.
    pub fn criterion_at(&self, step: usize) -> Option<OptCriterion> {
        self.settings.criteria.get(step).copied()
    }

    /// Whether the current step optimizes anything at all.
    pub fn do_optimize(&self) -> bool {
        matches!(
            self.criterion_at(self.optimization_step),
            Some(c) if c != OptCriterion::None
        )
    }

    pub fn do_optimize_throughput(&self) -> bool {
        self.do_optimize_throughput_at(self.optimization_step)
    }

    pub fn do_optimize_power(&self) -> bool {
        self.do_optimize_power_at(self.optimization_step)
    }

    /// Look-ahead variant: answers for an arbitrary step without advancing.
    pub fn do_optimize_throughput_at(&self, step: usize) -> bool {
        self.criterion_at(step) == Some(OptCriterion::Throughput)
    }

    pub fn do_optimize_power_at(&self, step: usize) -> bool {
        self.criterion_at(step) == Some(OptCriterion::Power)
    }

    /// More than one scheduled criterion implies multi-step optimization,
    /// whether or not an explicit flag was given.
    pub fn do_multi_step(&self) -> bool {
        self.settings.criteria.len() > 1
    }

    /// A non-empty presolver model set implies presolving is enabled.
    pub fn do_presolve(&self) -> bool {
        !self.settings.pre_models.is_empty()
    }

    /// Whether presolver output has been attached. Existence check only.
    pub fn is_presolved(&self) -> bool {
        self.presolver_results.is_some()
    }

    /// Advance to the next criterion. Advancing past the last scheduled
    /// criterion is a state error, surfacing scheduling bugs instead of
    /// clamping them away.
    pub fn inc_optimization_step(&mut self) -> Result<(), ConfigError> {
        if self.optimization_step + 1 >= self.settings.criteria.len() {
            return Err(ConfigError::state(format!(
                "cannot advance past optimization step {} of {} scheduled criteria",
                self.optimization_step,
                self.settings.criteria.len()
            )));
        }
        self.optimization_step += 1;
        Ok(())
    }

    /// Attach presolver output. Attach-once: a second attachment is a state
    /// error rather than a silent replacement. An out-of-range `Enforce`
    /// directive is rejected here as well.
    pub fn set_presolver_results(&mut self, results: PresolverResults) -> Result<(), ConfigError> {
        if self.presolver_results.is_some() {
            return Err(ConfigError::state(
                "presolver results have already been attached",
            ));
        }
        if let Some(MappingDirective::Enforce(i)) = results.directive() {
            if i >= results.one_proc_mappings.len() {
                return Err(ConfigError::state(format!(
                    "enforce directive points at mapping {i} but only {} were recorded",
                    results.one_proc_mappings.len()
                )));
            }
        }
        self.presolver_results = Some(results);
        Ok(())
    }

    /// Presolver output, absent until [`set_presolver_results`] has run.
    ///
    /// [`set_presolver_results`]: Self::set_presolver_results
    pub fn presolver_results(&self) -> Option<&PresolverResults> {
        self.presolver_results.as_ref()
    }

    /// Token name of the selected output print frequency, for logs.
    pub fn out_freq_name(&self) -> &'static str {
        self.settings.out_print_freq.token()
    }

    /// Token name of the selected main search type, for logs.
    pub fn search_type_name(&self) -> &'static str {
        self.settings.search.token()
    }

    /// Deterministic full dump of every settings field, one `name = value`
    /// line per field, for run provenance.
    pub fn print_settings(&self) -> String {
        self.settings.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::domains::{CpModel, SearchType};
    use crate::config::presolver::{OneProcMapping, SolutionValues};
    use std::path::PathBuf;
    use std::time::Duration;

    fn test_settings(criteria: Vec<OptCriterion>) -> Settings {
        Settings {
            inputs_paths: vec![PathBuf::from("a.xml"), PathBuf::from("b.xml")],
            model: CpModel::Sdf,
            search: SearchType::OptimizeIt,
            criteria,
            timeout_first: 1000,
            timeout_all: 5000,
            ..Settings::default()
        }
    }

    #[test]
    fn test_do_optimize_truth_table() {
        let config = RunConfig::new(test_settings(vec![]));
        assert!(!config.do_optimize());

        let config = RunConfig::new(test_settings(vec![OptCriterion::None]));
        assert!(!config.do_optimize());

        let config = RunConfig::new(test_settings(vec![OptCriterion::Power]));
        assert!(config.do_optimize());
    }

    #[test]
    fn test_do_multi_step_by_criteria_length() {
        let config = RunConfig::new(test_settings(vec![]));
        assert!(!config.do_multi_step());

        let config = RunConfig::new(test_settings(vec![OptCriterion::Power]));
        assert!(!config.do_multi_step());

        let config = RunConfig::new(test_settings(vec![
            OptCriterion::Power,
            OptCriterion::Latency,
        ]));
        assert!(config.do_multi_step());
    }

    #[test]
    fn test_do_presolve_tracks_pre_models() {
        let mut settings = test_settings(vec![]);
        let config = RunConfig::new(settings.clone());
        assert!(!config.do_presolve());

        settings.pre_models = vec![crate::config::PresolverModel::OneProcMappings];
        let config = RunConfig::new(settings);
        assert!(config.do_presolve());
    }

    #[test]
    fn test_step_advance_visits_every_index_then_fails() {
        let criteria = vec![
            OptCriterion::Throughput,
            OptCriterion::Power,
            OptCriterion::Latency,
        ];
        let mut config = RunConfig::new(test_settings(criteria.clone()));

        let mut visited = Vec::new();
        loop {
            visited.push(config.criterion_at(config.optimization_step()).unwrap());
            if config.inc_optimization_step().is_err() {
                break;
            }
        }
        assert_eq!(visited, criteria);
        assert_eq!(config.optimization_step(), criteria.len() - 1);
    }

    #[test]
    fn test_step_advance_on_single_criterion_is_state_error() {
        let mut config = RunConfig::new(test_settings(vec![OptCriterion::Power]));
        let err = config.inc_optimization_step().unwrap_err();
        assert!(matches!(err, ConfigError::State(_)));
        assert_eq!(config.optimization_step(), 0);
    }

    #[test]
    fn test_presolver_results_attach_once() {
        let mut config = RunConfig::new(test_settings(vec![OptCriterion::Power]));
        assert!(!config.is_presolved());
        assert!(config.presolver_results().is_none());

        let mut results = PresolverResults::new();
        results.push_mapping(OneProcMapping {
            processor: 0,
            assignments: vec![(0, 2)],
        });
        results.record_opt_result(SolutionValues {
            time: Duration::from_millis(5),
            values: vec![42],
        });
        config.set_presolver_results(results).unwrap();

        assert!(config.is_presolved());
        assert_eq!(config.presolver_results().unwrap().opt_results.len(), 1);

        let err = config
            .set_presolver_results(PresolverResults::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::State(_)));
    }

    #[test]
    fn test_name_renderers() {
        let config = RunConfig::new(test_settings(vec![]));
        assert_eq!(config.search_type_name(), "optimize_it");
        assert_eq!(config.out_freq_name(), "all_sol");
    }

    #[test]
    fn test_print_settings_is_deterministic() {
        let config = RunConfig::new(test_settings(vec![OptCriterion::Throughput]));
        assert_eq!(config.print_settings(), config.print_settings());
        assert!(config.print_settings().contains("search = optimize_it"));
    }

    #[test]
    fn test_multi_step_throughput_then_power_run() {
        let settings = test_settings(vec![OptCriterion::Throughput, OptCriterion::Power]);
        let mut config = RunConfig::new(settings);

        assert!(config.do_optimize());
        assert!(config.do_multi_step());
        assert!(config.do_optimize_throughput());
        assert!(!config.do_optimize_power());

        // look-ahead does not advance the step
        assert!(config.do_optimize_power_at(1));
        assert_eq!(config.optimization_step(), 0);

        config.inc_optimization_step().unwrap();
        assert!(config.do_optimize_power());
        assert!(!config.do_optimize_throughput());
    }
}
