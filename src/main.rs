//! CLI entry point for heft

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use heft::{
    EntryFormatter, Measurement, OutputConfig, ScanConfig, Scanner, SkipReporter, format_size,
    parse_size, print_json,
};
use tracing::Level;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
///
/// `is_terminal` describes the stream the output is written to.
fn should_use_color(mode: ColorMode, is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            is_terminal
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "heft")]
#[command(about = "Reports files and directories at or above a given size")]
#[command(version, arg_required_else_help = true)]
struct Args {
    /// Directory to scan. All subdirectories and files are measured.
    path: PathBuf,

    /// Minimum size to report, like '50K', '0x20M' or '1G'.
    /// Decimal or hexadecimal, optionally followed by K, M or G
    /// (powers of 1000). Without a suffix the size is in bytes.
    #[arg(value_parser = parse_threshold)]
    threshold: u64,

    /// Output in JSON format
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Log scan progress to stderr (-v for skipped paths, -vv for every directory)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_threshold(s: &str) -> Result<u64, String> {
    parse_size(s).map_err(|e| e.to_string())
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let scanner = Scanner::new(ScanConfig::with_threshold(args.threshold));
    let measurement = match scanner.measure(&args.path, true) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("heft: {}", e);
            process::exit(1);
        }
    };

    let code = report(&args, &measurement).unwrap_or_else(|e| {
        eprintln!("heft: error writing output: {}", e);
        1
    });
    process::exit(code);
}

/// Print the outcome of a scan and return the exit code.
fn report(args: &Args, measurement: &Measurement) -> std::io::Result<i32> {
    let found = measurement
        .total_size()
        .is_some_and(|total| total >= args.threshold);

    if args.json {
        print_json(measurement, args.threshold)?;
        return Ok(if found { 0 } else { 1 });
    }

    let config = OutputConfig {
        use_color: should_use_color(args.color, std::io::stdout().is_terminal()),
    };
    let reporter = SkipReporter::new(OutputConfig {
        use_color: should_use_color(args.color, std::io::stderr().is_terminal()),
    });

    match &measurement.root {
        None => {
            match measurement.skipped.first() {
                Some(root) => eprintln!(
                    "heft: cannot access '{}': {}",
                    args.path.display(),
                    root.message()
                ),
                None => eprintln!("heft: cannot access '{}'", args.path.display()),
            }
            reporter.print(&measurement.skipped)?;
            Ok(1)
        }
        Some(_) if !found => {
            eprintln!(
                "heft: no files or directories found at or above {}",
                format_size(args.threshold)
            );
            reporter.print(&measurement.skipped)?;
            Ok(1)
        }
        Some(root) => {
            EntryFormatter::new(config).print(root)?;
            reporter.print(&measurement.skipped)?;
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_color_modes_ignore_the_stream() {
        assert!(should_use_color(ColorMode::Always, false));
        assert!(!should_use_color(ColorMode::Never, true));
    }

    #[test]
    fn test_auto_color_follows_the_target_stream() {
        if std::env::var_os("FORCE_COLOR").is_some() {
            return;
        }
        assert!(!should_use_color(ColorMode::Auto, false));
    }
}
