//! elfprom - exports a binary memory report as Prometheus metrics.
//!
//! Reads a section report (`.label size address` lines) and writes gauges
//! to a textfile in one pass.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

use elfprom::settings::{DEFAULT_METRICS_OUTFILE, DEFAULT_REPORT_INFILE};
use elfprom::{RunError, Settings, run};

/// Binary memory report exporter.
#[derive(Parser)]
#[command(
    name = "elfprom",
    about = "Export binary section sizes and addresses as Prometheus metrics",
    version
)]
struct Args {
    /// The filename of the input memory report file.
    #[arg(long = "report.infile", value_name = "PATH", default_value = DEFAULT_REPORT_INFILE)]
    report_infile: PathBuf,

    /// The filename of the output OpenMetrics file.
    #[arg(long = "metrics.outfile", value_name = "PATH", default_value = DEFAULT_METRICS_OUTFILE)]
    metrics_outfile: PathBuf,

    /// Include section address samples.
    #[arg(long = "metrics.sections.addrs", value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", default_value_t = false, action = clap::ArgAction::Set)]
    section_addrs: bool,

    /// Include section size samples. Disable with --metrics.sections.sizes=false.
    #[arg(long = "metrics.sections.sizes", value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", default_value_t = true, action = clap::ArgAction::Set)]
    section_sizes: bool,

    /// Include the derived RAM usage ratio.
    #[arg(long = "metrics.derived.ram", value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", default_value_t = false, action = clap::ArgAction::Set)]
    derived_ram: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Settings {
            report_infile: args.report_infile,
            metrics_outfile: args.metrics_outfile,
            section_addrs: args.section_addrs,
            section_sizes: args.section_sizes,
            derived_ram: args.derived_ram,
        }
    }
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter =
        EnvFilter::from_default_env().add_directive(format!("elfprom={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let settings = Settings::from(args);
    match serde_json::to_string(&settings) {
        Ok(json) => debug!("reconciled configuration: {}", json),
        Err(e) => debug!("reconciled configuration: {:?} ({})", settings, e),
    }

    match run(&settings) {
        Ok(summary) => {
            info!(
                "Done: {} of {} lines matched",
                summary.matched, summary.lines
            );
            ExitCode::SUCCESS
        }
        Err(e @ RunError::Report(_)) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
        Err(e @ RunError::Export(_)) => {
            error!(
                "{} (output {} may be missing or stale)",
                e,
                settings.metrics_outfile.display()
            );
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Settings {
        let mut argv = vec!["elfprom"];
        argv.extend_from_slice(args);
        Settings::from(Args::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse(&[]), Settings::default());
    }

    #[test]
    fn test_explicit_false_disables_sizes() {
        let s = parse(&["--metrics.sections.sizes=false"]);
        assert!(!s.section_sizes);
        assert!(!s.section_addrs);
    }

    #[test]
    fn test_explicit_values_with_space() {
        let s = parse(&["--metrics.sections.addrs", "true", "--metrics.sections.sizes", "false"]);
        assert!(s.section_addrs);
        assert!(!s.section_sizes);
    }

    #[test]
    fn test_bare_flags_mean_true() {
        let s = parse(&["--metrics.derived.ram", "--metrics.sections.addrs"]);
        assert!(s.derived_ram);
        assert!(s.section_addrs);
        assert!(s.section_sizes);
    }

    #[test]
    fn test_paths() {
        let s = parse(&["--report.infile", "build/fw.stats", "--metrics.outfile=/tmp/fw.prom"]);
        assert_eq!(s.report_infile, PathBuf::from("build/fw.stats"));
        assert_eq!(s.metrics_outfile, PathBuf::from("/tmp/fw.prom"));
    }

    #[test]
    fn test_invalid_bool_rejected() {
        assert!(Args::try_parse_from(["elfprom", "--metrics.derived.ram=yes"]).is_err());
    }
}
