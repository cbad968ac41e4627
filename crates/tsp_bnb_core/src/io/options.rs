use std::{env, path::Path};

use log::LevelFilter;
use tsp_bnb_derive::{CliOptions, CliValue, KvDisplay};

use crate::{Error, Result, Strategy, algo::Pruning, io::input::InputFormat, runner::BenchmarkPlan};

const DEFAULT_WORKERS: [usize; 5] = [1, 2, 4, 8, 16];

/// Runtime options for the benchmark driver.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// Strategy to run, or `all` to compare every strategy.
    #[cli(long = "strategy", parse_with = "StrategyChoice::parse")]
    pub strategy: StrategyChoice,
    /// Worker counts to sweep for the parallel strategies, comma separated.
    #[cli(long = "workers", parse_with = "parse_worker_counts")]
    #[kv(fmt = "debug")]
    pub workers: Vec<usize>,
    /// Solves per (strategy, workers) combination.
    #[cli(long = "repeat")]
    pub repeat: usize,
    /// Input layout: `edges` or `matrix`.
    #[cli(long = "format", parse_with = "InputFormat::parse")]
    pub format: InputFormat,
    /// Randomly relabel cities after reading.
    pub shuffle: bool,
    /// Seed for `shuffle`.
    #[cli(long = "seed")]
    pub seed: u64,
    /// Cut partial tours that cannot beat the best known length.
    pub pruning: bool,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    #[cli(long = "log-output")]
    pub log_output: String,
    /// Optional input file path. Empty means stdin.
    #[cli(long = "input")]
    pub input: String,
    /// Optional output file path for the report. Empty means stdout.
    #[cli(long = "output")]
    pub output: String,
}

/// One strategy, or `all` to compare every strategy on the same input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StrategyChoice {
    All,
    Only(Strategy),
}

impl StrategyChoice {
    /// `all`, or any spelling `Strategy::parse` accepts.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Strategy::parse(raw).map(Self::Only).map_err(|_| {
            Error::invalid_input(format!(
                "Invalid value for --strategy: {raw} (expected all|{})",
                Strategy::VALUES.join("|")
            ))
        })
    }

    pub fn strategies(self) -> Vec<Strategy> {
        match self {
            Self::All => Strategy::ALL.to_vec(),
            Self::Only(strategy) => vec![strategy],
        }
    }
}

impl std::fmt::Display for StrategyChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(strategy) => write!(f, "{strategy}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyChoice::All,
            workers: DEFAULT_WORKERS.to_vec(),
            repeat: 1,
            format: InputFormat::Edges,
            shuffle: false,
            seed: 0,
            pruning: true,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    pub(crate) fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };
            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if options.apply_cli_option(&name, value.clone())? {
                continue;
            }

            match name.as_str() {
                "shuffle" => options.shuffle = parse_flag(&name, value)?,
                "no-shuffle" => options.shuffle = !parse_negated_flag(&name, value)?,
                "pruning" => options.pruning = parse_flag(&name, value)?,
                "no-pruning" => options.pruning = !parse_negated_flag(&name, value)?,
                "log-timestamp" => options.log_timestamp = parse_flag(&name, value)?,
                "no-log-timestamp" => options.log_timestamp = !parse_negated_flag(&name, value)?,
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-bnb [options] [--input graph.txt]\n",
            "  tsp-bnb [options] < graph.txt\n\n",
            "Options:\n",
            "  --strategy <all|sequential|parallel-recursive|parallel-iterative>\n",
            "  --workers <usize[,usize...]>\n",
            "  --repeat <usize>\n",
            "  --format <edges|matrix>\n",
            "  --shuffle[=<bool>]\n",
            "  --no-shuffle\n",
            "  --seed <u64>\n",
            "  --pruning[=<bool>]\n",
            "  --no-pruning\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --help\n",
            "\n",
            "Input formats:\n",
            "  edges   n m, then m lines 'u v w' (missing edges are unreachable)\n",
            "  matrix  n, then n*n weights row by row ('inf' allowed)\n",
            "\n",
            "Examples:\n",
            "  tsp-bnb --input graph.txt\n",
            "  tsp-bnb --strategy=parallel-iterative --workers=1,2,4,8 --repeat=100 < graph.txt\n",
            "  tsp-bnb --format=matrix --shuffle --seed=42 --log-level=info < matrix.txt\n",
        )
    }

    pub fn benchmark_plan(&self) -> Result<BenchmarkPlan> {
        if self.repeat == 0 {
            return Err(Error::invalid_input("--repeat must be at least 1"));
        }
        if self.workers.is_empty() {
            return Err(Error::invalid_input("--workers needs at least one count"));
        }
        Ok(BenchmarkPlan {
            strategies: self.strategy.strategies(),
            workers: self.workers.clone(),
            repeat: self.repeat,
            pruning: if self.pruning {
                Pruning::Enabled
            } else {
                Pruning::Disabled
            },
        })
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.log_output)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_stdio_path(&self.input)
    }
}

/// Empty and `-` select the standard stream.
fn non_stdio_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

fn parse_worker_counts(raw: &str) -> Result<Vec<usize>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<usize>() {
            Ok(0) => Err(Error::invalid_input("Invalid value for --workers: 0 (must be >= 1)")),
            Ok(count) => Ok(count),
            Err(e) => Err(Error::invalid_input(format!(
                "Invalid value for --workers: {part} ({e})"
            ))),
        })
        .collect::<Result<Vec<_>>>()
        .and_then(|counts| {
            if counts.is_empty() {
                Err(Error::invalid_input("Missing value for --workers"))
            } else {
                Ok(counts)
            }
        })
}

/// `--flag` alone means true; `--flag=<bool>` is explicit.
fn parse_flag(name: &str, value: Option<String>) -> Result<bool> {
    match value {
        Some(v) => parse_bool(name, &v),
        None => Ok(true),
    }
}

/// `--no-flag` takes no value.
fn parse_negated_flag(name: &str, value: Option<String>) -> Result<bool> {
    if value.is_some() {
        return Err(Error::invalid_input(format!(
            "Flag --{name} does not take a value"
        )));
    }
    Ok(true)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}
