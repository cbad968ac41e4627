use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{Result, runner::RunReport};

const REPORT_HEADER: &str = "strategy workers best mean_ms runs";

/// Writes one line per report, to `path` or stdout.
pub fn write_reports(path: Option<&Path>, reports: &[RunReport]) -> Result<()> {
    match path {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            render(&mut out, reports)?;
            out.flush()?;
        }
        None => {
            let mut out = io::stdout().lock();
            render(&mut out, reports)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn render(out: &mut impl Write, reports: &[RunReport]) -> io::Result<()> {
    writeln!(out, "{REPORT_HEADER}")?;
    for report in reports {
        writeln!(out, "{report}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::render;
    use crate::{Strategy, runner::RunReport};

    #[test]
    fn render_prints_header_then_reports() {
        let reports = vec![
            RunReport {
                strategy: Strategy::Sequential,
                workers: 1,
                best: 80.0,
                runs: 1,
                total: Duration::from_millis(2),
            },
            RunReport {
                strategy: Strategy::ParallelRecursive,
                workers: 8,
                best: 80.0,
                runs: 1,
                total: Duration::from_millis(1),
            },
        ];
        let mut buf = Vec::new();
        render(&mut buf, &reports).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "strategy workers best mean_ms runs");
        assert_eq!(lines[1], "sequential 1 80.0 2.000 1");
        assert_eq!(lines[2], "parallel-recursive 8 80.0 1.000 1");
    }
}
