//! marginalia - pandoc filter for draft annotations.
//!
//! Run as `pandoc --filter marginalia`: pandoc passes the target writer name as
//! the first argument and the document as JSON on stdin. The rewritten document
//! is written to stdout; logs and errors go to stderr.

mod captions;
mod error;
mod filter;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use filter::FilterArgs;
use output::Output;

/// marginalia - comments, highlights and TikZ figures for pandoc.
#[derive(Parser)]
#[command(name = "marginalia", version, about)]
struct Cli {
    #[command(flatten)]
    args: FilterArgs,
}

/// Log level filter: INFO with `--verbose`, otherwise `RUST_LOG` or WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.args.verbose))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.args.execute() {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_log_filter_levels() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
        assert_eq!(log_filter(false).to_string(), "warn");
        assert_eq!(log_filter(true).to_string(), "info");

        unsafe {
            std::env::set_var("RUST_LOG", "debug");
        }
        assert_eq!(log_filter(false).to_string(), "debug");
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
    }
}
