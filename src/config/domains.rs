//! Enumerated option domains and their command-line token vocabulary
//!
//! Every domain type parses with `from_token` (exact, case-sensitive match)
//! and renders back with `token`. The serde names equal the CLI tokens, so a
//! settings file written with [`to_file`](super::Settings::to_file) uses the
//! same vocabulary the command line does.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Constraint-programming model selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpModel {
    None,
    Sdf,
    SdfPrOnline,
}

/// Presolving strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresolverModel {
    None,
    OneProcMappings,
}

/// Heuristic applied during multi-step presolving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiStepHeuristic {
    None,
    Todaes,
}

/// Search engine mode, configured independently for the main phase, the
/// presolving phase, and the presolver's multi-step sub-search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    None,
    First,
    All,
    Optimize,
    OptimizeIt,
    ExhaustiveAll,
    #[serde(rename = "exhaustive_opt")]
    ExhaustiveOptimize,
}

/// Optimization objective; an ordered sequence of these defines the
/// lexicographic multi-step schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptCriterion {
    None,
    Power,
    Throughput,
    Latency,
}

/// Throughput propagation algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThroughputPropagator {
    Sse,
    Mcr,
}

/// Output file format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFileType {
    AllOut,
    Txt,
    Csv,
    CsvMost,
    Xml,
}

/// How often found solutions are written to the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPrintFrequency {
    AllSol,
    Last,
    EveryN,
    FirstAndLast,
}

/// Log severity threshold for a sink (console or file)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl CpModel {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "sdf" => Some(Self::Sdf),
            "sdf_pr_online" => Some(Self::SdfPrOnline),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sdf => "sdf",
            Self::SdfPrOnline => "sdf_pr_online",
        }
    }
}

impl PresolverModel {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "one_proc_mappings" => Some(Self::OneProcMappings),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OneProcMappings => "one_proc_mappings",
        }
    }
}

impl MultiStepHeuristic {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "todaes" => Some(Self::Todaes),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Todaes => "todaes",
        }
    }
}

impl SearchType {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "first" => Some(Self::First),
            "all" => Some(Self::All),
            "optimize" => Some(Self::Optimize),
            "optimize_it" => Some(Self::OptimizeIt),
            "exhaustive_all" => Some(Self::ExhaustiveAll),
            "exhaustive_opt" => Some(Self::ExhaustiveOptimize),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::First => "first",
            Self::All => "all",
            Self::Optimize => "optimize",
            Self::OptimizeIt => "optimize_it",
            Self::ExhaustiveAll => "exhaustive_all",
            Self::ExhaustiveOptimize => "exhaustive_opt",
        }
    }
}

impl OptCriterion {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "power" => Some(Self::Power),
            "throughput" => Some(Self::Throughput),
            "latency" => Some(Self::Latency),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Power => "power",
            Self::Throughput => "throughput",
            Self::Latency => "latency",
        }
    }
}

impl ThroughputPropagator {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "sse" => Some(Self::Sse),
            "mcr" => Some(Self::Mcr),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Sse => "sse",
            Self::Mcr => "mcr",
        }
    }
}

impl OutputFileType {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "all_out" => Some(Self::AllOut),
            "txt" => Some(Self::Txt),
            "csv" => Some(Self::Csv),
            "csv_most" => Some(Self::CsvMost),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::AllOut => "all_out",
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::CsvMost => "csv_most",
            Self::Xml => "xml",
        }
    }
}

impl OutputPrintFrequency {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "all_sol" => Some(Self::AllSol),
            "last" => Some(Self::Last),
            "every_n" => Some(Self::EveryN),
            "first_and_last" => Some(Self::FirstAndLast),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::AllSol => "all_sol",
            Self::Last => "last",
            Self::EveryN => "every_n",
            Self::FirstAndLast => "first_and_last",
        }
    }
}

impl LogLevel {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

macro_rules! display_as_token {
    ($($ty:ty),* $(,)?) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        })*
    };
}

display_as_token!(
    CpModel,
    PresolverModel,
    MultiStepHeuristic,
    SearchType,
    OptCriterion,
    ThroughputPropagator,
    OutputFileType,
    OutputPrintFrequency,
    LogLevel,
);
