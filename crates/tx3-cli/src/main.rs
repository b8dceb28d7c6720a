use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tx3_core::{Diagnostic, LineIndex, Severity};

/// Tx3 - syntax tools for the Tx3 transaction language
///
/// Check, tokenize, and inspect the syntax tree of Tx3 files.
#[derive(Parser)]
#[command(name = "tx3-cli", version, about, long_about = None)]
struct Cli {
    /// Print nothing on success
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Debug logging on stderr (overrides TX3_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and report syntax errors
    Check {
        /// Path to .tx3 file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the token stream of a file
    Tokens {
        /// Path to .tx3 file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Include whitespace and comments
        #[arg(long)]
        trivia: bool,
    },

    /// Print the concrete syntax tree of a file
    Tree {
        /// Path to .tx3 file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Check { file, json } => cmd_check(&file, json, cli.quiet),
        Commands::Tokens { file, json, trivia } => cmd_tokens(&file, json, trivia),
        Commands::Tree { file, json } => cmd_tree(&file, json),
        Commands::Version => {
            println!(
                "tx3-cli {} (tx3-core {})",
                env!("CARGO_PKG_VERSION"),
                tx3_core::VERSION
            );
            0
        }
    };

    process::exit(exit_code);
}

/// Log to stderr, filtered by `TX3_LOG` (default `warn`)
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TX3_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Read a source file; unreadable files exit with code 2
fn read_source(path: &Path) -> Result<String, i32> {
    std::fs::read_to_string(path).map_err(|e| {
        eprintln!(
            "{} cannot read {}: {}",
            "error:".red().bold(),
            path.display(),
            e
        );
        2
    })
}

fn print_diagnostic(path: &Path, index: &LineIndex, diagnostic: &Diagnostic) {
    let (line, column) = index.line_col(diagnostic.span.start);
    let severity = match diagnostic.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
    };
    eprintln!(
        "{}:{}:{}: {}: {}",
        path.display(),
        line,
        column,
        severity,
        diagnostic.message
    );
}

fn print_json(value: &impl serde::Serialize) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            2
        }
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_check(path: &Path, json: bool, quiet: bool) -> i32 {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let parse = tx3_core::parse(&source);
    let errors = parse.errors().count();
    debug!(file = %path.display(), errors, "checked");

    if json {
        let report = serde_json::json!({
            "file": path.display().to_string(),
            "valid": parse.is_ok(),
            "errors": errors,
            "diagnostics": parse.diagnostics,
        });
        let code = print_json(&report);
        if code != 0 {
            return code;
        }
    } else {
        let index = LineIndex::new(&source);
        for diagnostic in &parse.diagnostics {
            print_diagnostic(path, &index, diagnostic);
        }
        if parse.is_ok() {
            if !quiet {
                println!("{} {} is valid", "✓".green().bold(), path.display());
            }
        } else {
            eprintln!(
                "{} {} syntax error(s) in {}",
                "✗".red().bold(),
                errors,
                path.display()
            );
        }
    }

    if parse.is_ok() {
        0
    } else {
        1
    }
}

fn cmd_tokens(path: &Path, json: bool, trivia: bool) -> i32 {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let tokens: Vec<_> = tx3_core::tokenize(&source)
        .into_iter()
        .filter(|t| trivia || !t.is_trivia())
        .collect();

    if json {
        return print_json(&tokens);
    }
    for token in &tokens {
        println!(
            "{} '{}' {}",
            token.kind,
            token.text.escape_debug(),
            token.span
        );
    }
    0
}

fn cmd_tree(path: &Path, json: bool) -> i32 {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let parse = tx3_core::parse(&source);

    if json {
        return match parse.to_json() {
            Ok(text) => {
                println!("{}", text);
                0
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                2
            }
        };
    }

    print!("{}", parse.dump());
    let index = LineIndex::new(&source);
    for diagnostic in &parse.diagnostics {
        print_diagnostic(path, &index, diagnostic);
    }
    0
}
