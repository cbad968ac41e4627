use std::{fs::File, io::Write, thread};

use env_logger::{Builder, Target, WriteStyle, fmt::Formatter};
use log::{Level, Record};

use crate::{
    Error, Result,
    options::{LogFormat, SolverOptions},
};

pub fn init_logger(options: &SolverOptions) -> Result<()> {
    let log_format = options.log_format;
    let log_timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf: &mut Formatter, record: &Record<'_>| {
            if log_timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            match log_format {
                LogFormat::Compact => {
                    writeln!(buf, "{} {}", level_tag(record.level()), record.args())
                }
                // Pool threads are named `bnb-fork-N` / `bnb-pool-N`.
                LogFormat::Pretty => writeln!(
                    buf,
                    "{} [{}] ({}) {}",
                    level_tag(record.level()),
                    record.target(),
                    thread::current().name().unwrap_or("-"),
                    record.args()
                ),
            }
        });

    builder.target(log_target(options)?);
    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

/// Log file when `--log-output` names one, stderr otherwise.
fn log_target(options: &SolverOptions) -> Result<Target> {
    let Some(log_path) = options.log_output_path() else {
        return Ok(Target::Stderr);
    };
    let log_file = File::create(log_path).map_err(|e| {
        Error::other(format!(
            "failed to create log output file {}: {e}",
            log_path.display()
        ))
    })?;
    Ok(Target::Pipe(Box::new(log_file)))
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
