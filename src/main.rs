//! CLI driver for the design-space-exploration run configuration
//!
//! Parses the command line, optionally seeds settings from a YAML config
//! file, applies every given flag through [`SettingsBuilder`], and reports
//! every configuration error from the batch in one pass before aborting.
//! Nothing downstream runs on an invalid configuration.

use anyhow::{bail, Context, Result};
use clap::Parser;
use dse_config::config::ConfigError;
use dse_config::{RunConfig, Settings, SettingsBuilder};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dse-config")]
#[command(about = "Run configuration for constraint-based design-space exploration")]
#[command(version = "0.1.0")]
struct Cli {
    /// Input specification files (at least one)
    #[arg(short, long, num_args = 1..)]
    input: Vec<String>,

    /// Output destination
    #[arg(short, long)]
    output: Option<String>,

    /// YAML settings file to seed from; flags given here override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective settings to a YAML file and continue
    #[arg(long)]
    dump_config: Option<PathBuf>,

    /// Log file destination
    #[arg(long)]
    log_path: Option<String>,

    /// Log severity per sink: console, then file
    #[arg(long, num_args = 1..=2)]
    log_level: Option<Vec<String>>,

    /// Constraint model: none | sdf | sdf_pr_online
    #[arg(short, long)]
    model: Option<String>,

    /// Main search: none | first | all | optimize | optimize_it |
    /// exhaustive_all | exhaustive_opt
    #[arg(short, long)]
    search: Option<String>,

    /// Presolver search type (same vocabulary as --search)
    #[arg(long)]
    presolver_search: Option<String>,

    /// Multi-step sub-search type used during presolving
    #[arg(long)]
    multi_step_search: Option<String>,

    /// Optimization criteria in schedule order:
    /// none | power | throughput | latency
    #[arg(long, num_args = 1..)]
    criteria: Option<Vec<String>>,

    /// Metrics to report (same vocabulary as --criteria)
    #[arg(long, num_args = 1..)]
    print_metrics: Option<Vec<String>>,

    /// Presolving strategies: none | one_proc_mappings
    #[arg(long, num_args = 1..)]
    presolver_model: Option<Vec<String>>,

    /// Multi-step presolving heuristics: none | todaes
    #[arg(long, num_args = 1..)]
    heuristic: Option<Vec<String>>,

    /// Throughput propagator: sse | mcr
    #[arg(long)]
    th_prop: Option<String>,

    /// Main timeout pair in ms: first-solution budget, exhaustive budget
    #[arg(long, num_args = 2, value_names = ["FIRST", "ALL"])]
    timeout: Option<Vec<u64>>,

    /// Presolver timeout pair in ms
    #[arg(long, num_args = 2, value_names = ["FIRST", "ALL"])]
    presolver_timeout: Option<Vec<u64>>,

    /// Number of solver threads
    #[arg(long)]
    threads: Option<u32>,

    /// No-good recording depth
    #[arg(long)]
    no_good_depth: Option<u64>,

    /// Luby restart scale
    #[arg(long)]
    luby_scale: Option<u64>,

    /// Output file format: all_out | txt | csv | csv_most | xml
    #[arg(long)]
    out_file_type: Option<String>,

    /// Solution print frequency: all_sol | last | every_n | first_and_last
    #[arg(long)]
    out_print_freq: Option<String>,

    /// TDN configuration file
    #[arg(long)]
    tdn_config: Option<String>,

    /// Print the full settings dump after building
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Settings::default(),
    };

    let mut builder = SettingsBuilder::from_settings(base);
    let errors = apply_cli(&cli, &mut builder);
    if !errors.is_empty() {
        for err in &errors {
            eprintln!("error: {err}");
        }
        bail!("{} configuration error(s), aborting before any solver work", errors.len());
    }

    let settings = match builder.build() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err}");
            bail!("configuration is incomplete");
        }
    };

    if let Some(path) = &cli.dump_config {
        settings.to_file(path)
            .with_context(|| format!("Failed to dump config to {}", path.display()))?;
        println!("Effective settings written to {}", path.display());
    }

    let run = RunConfig::new(settings);
    if cli.verbose {
        println!("{}", run.print_settings());
    }

    println!(
        "Configuration ready: search={}, optimize={}, multi_step={}, presolve={}",
        run.search_type_name(),
        run.do_optimize(),
        run.do_multi_step(),
        run.do_presolve(),
    );

    Ok(())
}

/// Apply every flag the user actually gave, collecting all failures so a
/// batch of bad flags is reported in a single pass.
fn apply_cli(cli: &Cli, builder: &mut SettingsBuilder) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let mut run = |result: Result<(), ConfigError>| {
        if let Err(err) = result {
            errors.push(err);
        }
    };

    if !cli.input.is_empty() {
        run(builder.set_input_paths(&cli.input));
    }
    if let Some(output) = &cli.output {
        run(builder.set_output_path(output));
    }
    if let Some(log_path) = &cli.log_path {
        run(builder.set_log_path(log_path));
    }
    if let Some(levels) = &cli.log_level {
        run(builder.set_log_level(levels));
    }
    if let Some(model) = &cli.model {
        run(builder.set_model(model));
    }
    if let Some(search) = &cli.search {
        run(builder.set_search(search));
    }
    if let Some(search) = &cli.presolver_search {
        run(builder.set_presolver_search(search));
    }
    if let Some(search) = &cli.multi_step_search {
        run(builder.set_multi_step_search(search));
    }
    if let Some(criteria) = &cli.criteria {
        run(builder.set_criteria(criteria));
    }
    if let Some(metrics) = &cli.print_metrics {
        run(builder.set_print_metrics(metrics));
    }
    if let Some(models) = &cli.presolver_model {
        run(builder.set_presolver_models(models));
    }
    if let Some(heuristics) = &cli.heuristic {
        run(builder.set_heuristics(heuristics));
    }
    if let Some(th_prop) = &cli.th_prop {
        run(builder.set_th_propagator(th_prop));
    }
    if let Some(timeout) = &cli.timeout {
        run(builder.set_timeout(timeout));
    }
    if let Some(timeout) = &cli.presolver_timeout {
        run(builder.set_presolver_timeout(timeout));
    }
    if let Some(threads) = cli.threads {
        builder.set_threads(threads);
    }
    if let Some(depth) = cli.no_good_depth {
        builder.set_no_good_depth(depth);
    }
    if let Some(scale) = cli.luby_scale {
        builder.set_luby_scale(scale);
    }
    if let Some(file_type) = &cli.out_file_type {
        run(builder.set_output_file_type(file_type));
    }
    if let Some(freq) = &cli.out_print_freq {
        run(builder.set_output_print_frequency(freq));
    }
    if let Some(tdn) = &cli.tdn_config {
        run(builder.set_tdn_config(tdn));
    }

    errors
}
