//! The `Settings` data model and the builder that validates raw option input
//!
//! `Settings` is built exactly once at startup from already-tokenized option
//! values and is immutable afterwards; every cross-field rule (timeout
//! pairing, set-once options, token vocabulary) lives in [`SettingsBuilder`]
//! so nothing invalid reaches the solver.

use super::domains::{
    CpModel, LogLevel, MultiStepHeuristic, OptCriterion, OutputFileType, OutputPrintFrequency,
    PresolverModel, SearchType, ThroughputPropagator,
};
use super::error::ConfigError;
use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The single source of truth for a run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub inputs_paths: Vec<PathBuf>,
    pub output_path: PathBuf,
    pub log_path: Option<PathBuf>,
    /// Severity thresholds per sink, console first, then file
    pub log_levels: Vec<LogLevel>,

    pub model: CpModel,
    pub pre_models: Vec<PresolverModel>,
    pub pre_heuristics: Vec<MultiStepHeuristic>,
    pub search: SearchType,
    pub pre_search: SearchType,
    pub pre_multi_step_search: SearchType,
    /// Lexicographic multi-step schedule; step i optimizes criteria[i]
    pub criteria: Vec<OptCriterion>,

    /// Time budgets in milliseconds, 0 meaning unbounded
    pub timeout_first: u64,
    pub timeout_all: u64,
    pub pre_timeout_first: u64,
    pub pre_timeout_all: u64,

    pub luby_scale: u64,
    pub threads: u32,
    pub no_good_depth: u64,
    pub th_prop: ThroughputPropagator,

    pub out_file_type: OutputFileType,
    pub out_print_freq: OutputPrintFrequency,
    pub print_metrics: Vec<OptCriterion>,

    pub tdn_config: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inputs_paths: Vec::new(),
            output_path: PathBuf::from("output"),
            log_path: None,
            log_levels: vec![LogLevel::Info],
            model: CpModel::None,
            pre_models: Vec::new(),
            pre_heuristics: Vec::new(),
            search: SearchType::None,
            pre_search: SearchType::None,
            pre_multi_step_search: SearchType::None,
            criteria: Vec::new(),
            timeout_first: 0,
            timeout_all: 0,
            pre_timeout_first: 0,
            pre_timeout_all: 0,
            luby_scale: 0,
            threads: 1,
            no_good_depth: 0,
            th_prop: ThroughputPropagator::Sse,
            out_file_type: OutputFileType::AllOut,
            out_print_freq: OutputPrintFrequency::AllSol,
            print_metrics: Vec::new(),
            tdn_config: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Whether a TDN configuration was supplied
    pub fn config_tdn(&self) -> bool {
        self.tdn_config.is_some()
    }
}

/// Deterministic full dump, one `name = value` line per field, sequences as
/// comma-separated token lists. Two equal settings render byte-identically.
impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "inputs_paths = {}",
            self.inputs_paths.iter().map(|p| p.display()).join(",")
        )?;
        writeln!(f, "output_path = {}", self.output_path.display())?;
        writeln!(
            f,
            "log_path = {}",
            self.log_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )?;
        writeln!(f, "log_levels = {}", self.log_levels.iter().join(","))?;
        writeln!(f, "model = {}", self.model)?;
        writeln!(f, "pre_models = {}", self.pre_models.iter().join(","))?;
        writeln!(f, "pre_heuristics = {}", self.pre_heuristics.iter().join(","))?;
        writeln!(f, "search = {}", self.search)?;
        writeln!(f, "pre_search = {}", self.pre_search)?;
        writeln!(f, "pre_multi_step_search = {}", self.pre_multi_step_search)?;
        writeln!(f, "criteria = {}", self.criteria.iter().join(","))?;
        writeln!(f, "timeout_first = {}", self.timeout_first)?;
        writeln!(f, "timeout_all = {}", self.timeout_all)?;
        writeln!(f, "pre_timeout_first = {}", self.pre_timeout_first)?;
        writeln!(f, "pre_timeout_all = {}", self.pre_timeout_all)?;
        writeln!(f, "luby_scale = {}", self.luby_scale)?;
        writeln!(f, "threads = {}", self.threads)?;
        writeln!(f, "no_good_depth = {}", self.no_good_depth)?;
        writeln!(f, "th_prop = {}", self.th_prop)?;
        writeln!(f, "out_file_type = {}", self.out_file_type)?;
        writeln!(f, "out_print_freq = {}", self.out_print_freq)?;
        writeln!(f, "print_metrics = {}", self.print_metrics.iter().join(","))?;
        writeln!(f, "config_tdn = {}", self.config_tdn())?;
        write!(
            f,
            "tdn_config = {}",
            self.tdn_config
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )
    }
}

/// Builds a validated [`Settings`] from raw option values.
///
/// Each setter validates its input completely before touching the settings,
/// so a failed call leaves previously-set fields unchanged. Timeouts and log
/// levels are set-once per builder.
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    settings: Settings,
    inputs_set: bool,
    timeout_set: bool,
    pre_timeout_set: bool,
    log_levels_set: bool,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from already-loaded settings (e.g. a config file),
    /// so later setters act as overrides.
    pub fn from_settings(settings: Settings) -> Self {
        let inputs_set = !settings.inputs_paths.is_empty();
        Self {
            settings,
            inputs_set,
            ..Self::default()
        }
    }

    pub fn set_input_paths(&mut self, paths: &[String]) -> Result<(), ConfigError> {
        if paths.is_empty() {
            return Err(ConfigError::resource(
                "inputs",
                "",
                "at least one input path is required",
            ));
        }
        for p in paths {
            let path = Path::new(p);
            if !path.exists() {
                return Err(ConfigError::resource("inputs", path, "path does not exist"));
            }
        }
        self.settings.inputs_paths = paths.iter().map(PathBuf::from).collect();
        self.inputs_set = true;
        Ok(())
    }

    pub fn set_output_path(&mut self, path: &str) -> Result<(), ConfigError> {
        check_parent_dir("output", Path::new(path))?;
        self.settings.output_path = PathBuf::from(path);
        Ok(())
    }

    pub fn set_log_path(&mut self, path: &str) -> Result<(), ConfigError> {
        check_parent_dir("log", Path::new(path))?;
        self.settings.log_path = Some(PathBuf::from(path));
        Ok(())
    }

    pub fn set_tdn_config(&mut self, path: &str) -> Result<(), ConfigError> {
        let p = Path::new(path);
        if !p.exists() {
            return Err(ConfigError::resource(
                "tdn_config",
                p,
                "path does not exist",
            ));
        }
        self.settings.tdn_config = Some(PathBuf::from(path));
        Ok(())
    }

    /// One or two severity tokens: console sink, then file sink.
    pub fn set_log_level(&mut self, tokens: &[String]) -> Result<(), ConfigError> {
        if self.log_levels_set {
            return Err(ConfigError::state("log levels have already been set"));
        }
        if tokens.is_empty() || tokens.len() > 2 {
            return Err(ConfigError::argument(format!(
                "log_level takes one or two severity tokens, got {}",
                tokens.len()
            )));
        }
        let levels = parse_sequence("log_level", tokens, LogLevel::from_token)?;
        self.settings.log_levels = levels;
        self.log_levels_set = true;
        Ok(())
    }

    pub fn set_model(&mut self, token: &str) -> Result<(), ConfigError> {
        self.settings.model = parse_one("model", token, CpModel::from_token)?;
        Ok(())
    }

    pub fn set_search(&mut self, token: &str) -> Result<(), ConfigError> {
        self.settings.search = parse_one("search", token, SearchType::from_token)?;
        Ok(())
    }

    pub fn set_presolver_search(&mut self, token: &str) -> Result<(), ConfigError> {
        self.settings.pre_search = parse_one("presolver_search", token, SearchType::from_token)?;
        Ok(())
    }

    pub fn set_multi_step_search(&mut self, token: &str) -> Result<(), ConfigError> {
        self.settings.pre_multi_step_search =
            parse_one("multi_step_search", token, SearchType::from_token)?;
        Ok(())
    }

    pub fn set_th_propagator(&mut self, token: &str) -> Result<(), ConfigError> {
        self.settings.th_prop = parse_one("th_prop", token, ThroughputPropagator::from_token)?;
        Ok(())
    }

    pub fn set_output_file_type(&mut self, token: &str) -> Result<(), ConfigError> {
        self.settings.out_file_type =
            parse_one("out_file_type", token, OutputFileType::from_token)?;
        Ok(())
    }

    pub fn set_output_print_frequency(&mut self, token: &str) -> Result<(), ConfigError> {
        self.settings.out_print_freq =
            parse_one("out_print_freq", token, OutputPrintFrequency::from_token)?;
        Ok(())
    }

    /// Order is significant: it defines the multi-step optimization schedule.
    pub fn set_criteria(&mut self, tokens: &[String]) -> Result<(), ConfigError> {
        self.settings.criteria = parse_sequence("criteria", tokens, OptCriterion::from_token)?;
        Ok(())
    }

    pub fn set_print_metrics(&mut self, tokens: &[String]) -> Result<(), ConfigError> {
        self.settings.print_metrics =
            parse_sequence("print_metrics", tokens, OptCriterion::from_token)?;
        Ok(())
    }

    pub fn set_presolver_models(&mut self, tokens: &[String]) -> Result<(), ConfigError> {
        self.settings.pre_models =
            parse_sequence("presolver_model", tokens, PresolverModel::from_token)?;
        Ok(())
    }

    pub fn set_heuristics(&mut self, tokens: &[String]) -> Result<(), ConfigError> {
        self.settings.pre_heuristics =
            parse_sequence("heuristic", tokens, MultiStepHeuristic::from_token)?;
        Ok(())
    }

    /// Main-phase timeout pair: (first-solution budget, exhaustive budget).
    pub fn set_timeout(&mut self, values: &[u64]) -> Result<(), ConfigError> {
        let (first, all) = check_timeout_pair("timeout", values, self.timeout_set)?;
        self.settings.timeout_first = first;
        self.settings.timeout_all = all;
        self.timeout_set = true;
        Ok(())
    }

    /// Presolving-phase timeout pair, independent of the main pair.
    pub fn set_presolver_timeout(&mut self, values: &[u64]) -> Result<(), ConfigError> {
        let (first, all) = check_timeout_pair("presolver_timeout", values, self.pre_timeout_set)?;
        self.settings.pre_timeout_first = first;
        self.settings.pre_timeout_all = all;
        self.pre_timeout_set = true;
        Ok(())
    }

    pub fn set_threads(&mut self, threads: u32) {
        self.settings.threads = threads;
    }

    pub fn set_no_good_depth(&mut self, depth: u64) {
        self.settings.no_good_depth = depth;
    }

    pub fn set_luby_scale(&mut self, scale: u64) {
        self.settings.luby_scale = scale;
    }

    /// Finish the build, yielding the immutable settings.
    pub fn build(self) -> Result<Settings, ConfigError> {
        if !self.inputs_set || self.settings.inputs_paths.is_empty() {
            return Err(ConfigError::argument("no input paths were given"));
        }
        Ok(self.settings)
    }
}

fn parse_one<T>(
    field: &'static str,
    token: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    parse(token).ok_or_else(|| ConfigError::format(field, token, 0))
}

fn parse_sequence<T>(
    field: &'static str,
    tokens: &[String],
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, ConfigError> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| parse(t).ok_or_else(|| ConfigError::format(field, t, i)))
        .collect()
}

fn check_parent_dir(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(ConfigError::resource(
                field,
                path,
                format!("parent directory '{}' does not exist", parent.display()),
            ));
        }
    }
    Ok(())
}

fn check_timeout_pair(
    field: &'static str,
    values: &[u64],
    already_set: bool,
) -> Result<(u64, u64), ConfigError> {
    if already_set {
        return Err(ConfigError::state(format!(
            "{field} has already been set for this configuration"
        )));
    }
    if values.len() != 2 {
        return Err(ConfigError::argument(format!(
            "{field} takes exactly two values (first, all), got {}",
            values.len()
        )));
    }
    let (first, all) = (values[0], values[1]);
    // all == 0 means the exhaustive search is unbounded
    if all != 0 && all < first {
        return Err(ConfigError::state(format!(
            "{field}: exhaustive budget {all} is smaller than first-solution budget {first}"
        )));
    }
    Ok((first, all))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn builder_with_inputs() -> (SettingsBuilder, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let input = dir.path().join("app.xml");
        std::fs::write(&input, "<xml/>").unwrap();
        let mut builder = SettingsBuilder::new();
        builder
            .set_input_paths(&[input.to_string_lossy().to_string()])
            .unwrap();
        (builder, dir)
    }

    #[test]
    fn test_enum_setter_round_trip() {
        let (mut builder, _dir) = builder_with_inputs();
        builder.set_model("sdf").unwrap();
        builder.set_search("optimize_it").unwrap();
        builder.set_th_propagator("mcr").unwrap();
        builder.set_output_file_type("csv").unwrap();
        builder.set_output_print_frequency("last").unwrap();

        let settings = builder.build().unwrap();
        assert_eq!(settings.model, CpModel::Sdf);
        assert_eq!(settings.search, SearchType::OptimizeIt);
        assert_eq!(settings.th_prop, ThroughputPropagator::Mcr);
        assert_eq!(settings.out_file_type, OutputFileType::Csv);
        assert_eq!(settings.out_print_freq, OutputPrintFrequency::Last);
    }

    #[test]
    fn test_invalid_token_is_format_error_without_partial_mutation() {
        let (mut builder, _dir) = builder_with_inputs();
        builder.set_model("sdf").unwrap();

        let err = builder.set_model("SDF").unwrap_err();
        assert!(matches!(err, ConfigError::Format { field: "model", .. }));

        // previously-set value survives the failed call
        let settings = builder.build().unwrap();
        assert_eq!(settings.model, CpModel::Sdf);
    }

    #[test]
    fn test_criteria_order_preserved_and_position_reported() {
        let (mut builder, _dir) = builder_with_inputs();
        builder
            .set_criteria(&strings(&["throughput", "power", "latency"]))
            .unwrap();

        let err = builder
            .set_criteria(&strings(&["throughput", "bogus"]))
            .unwrap_err();
        match err {
            ConfigError::Format {
                field, position, ..
            } => {
                assert_eq!(field, "criteria");
                assert_eq!(position, 1);
            }
            other => panic!("expected Format error, got {other:?}"),
        }

        // the failed call left the earlier schedule intact
        let settings = builder.build().unwrap();
        assert_eq!(
            settings.criteria,
            vec![
                OptCriterion::Throughput,
                OptCriterion::Power,
                OptCriterion::Latency
            ]
        );
    }

    #[test]
    fn test_empty_inputs_is_resource_error() {
        let mut builder = SettingsBuilder::new();
        let err = builder.set_input_paths(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Resource { .. }));
    }

    #[test]
    fn test_missing_input_path_is_resource_error() {
        let mut builder = SettingsBuilder::new();
        let err = builder
            .set_input_paths(&strings(&["/no/such/file.xml"]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Resource { field: "inputs", .. }));
    }

    #[test]
    fn test_output_path_with_missing_parent_is_resource_error() {
        let (mut builder, _dir) = builder_with_inputs();
        let err = builder
            .set_output_path("/no/such/dir/results.txt")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Resource { field: "output", .. }));
    }

    #[test]
    fn test_timeout_pair_ordering() {
        let (mut builder, _dir) = builder_with_inputs();
        let err = builder.set_timeout(&[100, 50]).unwrap_err();
        assert!(matches!(err, ConfigError::State(_)));

        builder.set_timeout(&[50, 100]).unwrap();
        let settings = builder.build().unwrap();
        assert_eq!(settings.timeout_first, 50);
        assert_eq!(settings.timeout_all, 100);
    }

    #[test]
    fn test_timeout_set_twice_is_state_error() {
        let (mut builder, _dir) = builder_with_inputs();
        builder.set_timeout(&[50, 100]).unwrap();
        let err = builder.set_timeout(&[10, 20]).unwrap_err();
        assert!(matches!(err, ConfigError::State(_)));

        // the presolver pair is independent storage
        builder.set_presolver_timeout(&[5, 10]).unwrap();
        let settings = builder.build().unwrap();
        assert_eq!(settings.timeout_first, 50);
        assert_eq!(settings.pre_timeout_first, 5);
    }

    #[test]
    fn test_zero_exhaustive_budget_means_unbounded() {
        let (mut builder, _dir) = builder_with_inputs();
        builder.set_timeout(&[1000, 0]).unwrap();
        let settings = builder.build().unwrap();
        assert_eq!(settings.timeout_all, 0);
    }

    #[test]
    fn test_log_level_set_once() {
        let (mut builder, _dir) = builder_with_inputs();
        let err = builder.set_log_level(&strings(&["loud"])).unwrap_err();
        assert!(matches!(err, ConfigError::Format { .. }));

        builder.set_log_level(&strings(&["info", "debug"])).unwrap();
        let err = builder.set_log_level(&strings(&["error"])).unwrap_err();
        assert!(matches!(err, ConfigError::State(_)));

        let settings = builder.build().unwrap();
        assert_eq!(settings.log_levels, vec![LogLevel::Info, LogLevel::Debug]);
    }

    #[test]
    fn test_build_without_inputs_is_argument_error() {
        let builder = SettingsBuilder::new();
        let err = builder.build().unwrap_err();
        assert!(matches!(err, ConfigError::Argument(_)));
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.yaml");

        let mut settings = Settings::default();
        settings.model = CpModel::Sdf;
        settings.criteria = vec![OptCriterion::Throughput, OptCriterion::Power];
        settings.timeout_first = 1000;
        settings.timeout_all = 5000;

        settings.to_file(&path).unwrap();
        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_dump_is_deterministic_and_complete() {
        let mut settings = Settings::default();
        settings.criteria = vec![OptCriterion::Throughput, OptCriterion::Power];

        let first = settings.to_string();
        let second = settings.to_string();
        assert_eq!(first, second);
        assert!(first.contains("criteria = throughput,power"));

        let mut changed = settings.clone();
        changed.threads = 8;
        let changed_dump = changed.to_string();
        let diff: Vec<(&str, &str)> = first
            .lines()
            .zip(changed_dump.lines())
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(diff, vec![("threads = 1", "threads = 8")]);
    }
}
