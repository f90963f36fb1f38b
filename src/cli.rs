//! CLI layer: argument parsing, logging setup, and the scan command.

use std::fs;
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use tracing::info;

use crate::error::ScanError;
use crate::scanner;

// ─── CLI ─────────────────────────────────────────────────────────────

/// Extract hook call sites from decompiled plugin source
#[derive(Parser, Debug)]
#[command(name = "hookscan", version, about, after_help = "\
Scans every matching module under the directory, finds hook dispatch calls\n\
(CallHook, CallStaticHook, FireEvent, Call) with a literal hook name, and\n\
writes the deduplicated catalog as JSON to stdout or --out.")]
pub(crate) struct Cli {
    /// Directory containing plugin modules to scan
    #[arg(short, long, default_value = ".")]
    pub dir: String,

    /// File extension filter (comma-separated)
    #[arg(short, long, default_value = "cs")]
    pub ext: String,

    /// Number of parallel threads (0 = auto)
    #[arg(short, long, default_value = "0")]
    pub threads: usize,

    /// Write the catalog to this file instead of stdout
    #[arg(short, long)]
    pub out: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

// ─── Main entry point ───────────────────────────────────────────────

pub fn run() {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "error" => tracing::Level::ERROR,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cmd_scan(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_scan(args: Cli) -> Result<(), ScanError> {
    let extensions: Vec<String> = args
        .ext
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if extensions.is_empty() {
        return Err(ScanError::InvalidArgs(
            "no file extensions given (use e.g. --ext cs)".to_string(),
        ));
    }

    let start = Instant::now();
    let catalog = scanner::scan_directory(Path::new(&args.dir), &extensions, args.threads)?;

    info!(
        hooks = catalog.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scan complete"
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&catalog)?
    } else {
        serde_json::to_string(&catalog)?
    };

    match args.out {
        Some(path) => {
            fs::write(&path, json)?;
            eprintln!("Wrote {} hook(s) to {}", catalog.len(), path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::parse_from(["hookscan"]);
        assert_eq!(cli.dir, ".");
        assert_eq!(cli.ext, "cs");
        assert_eq!(cli.threads, 0);
        assert!(cli.out.is_none());
        assert!(!cli.pretty);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_cli_parses_all_flags() {
        let cli = Cli::parse_from([
            "hookscan", "-d", "/plugins", "-e", "cs,csx", "-t", "8", "-o", "hooks.json",
            "--pretty", "--log-level", "debug",
        ]);
        assert_eq!(cli.dir, "/plugins");
        assert_eq!(cli.ext, "cs,csx");
        assert_eq!(cli.threads, 8);
        assert_eq!(cli.out.as_deref(), Some("hooks.json"));
        assert!(cli.pretty);
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
