//! `jsondoc` CLI: query, patch and compare JSON documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Select values with a path expression (stdin → stdout, one value per line)
//! echo '{"items":[{"age":17},{"age":21}]}' | jsondoc query '$.items[?(@.age>=18)]'
//!
//! # Only the first match, pretty-printed
//! jsondoc query '$..price' -i store.json --first --pretty
//!
//! # Apply an RFC 6902 patch document
//! jsondoc patch -p changes.json -i doc.json -o patched.json
//!
//! # Structural comparison (exit status 0 when equal, 1 otherwise)
//! jsondoc equals a.json b.json --ordered-arrays
//!
//! # Verbose logging (JSONDOC_LOG overrides --log-level)
//! JSONDOC_LOG=jsondoc_core=debug jsondoc query '$.a' -i doc.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jsondoc_core::{PathCache, Value};
use std::io::{self, Read};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides `--log-level`.
const LOG_ENV: &str = "JSONDOC_LOG";

#[derive(Parser)]
#[command(
    name = "jsondoc",
    version,
    about = "Query, patch and compare JSON documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter written to stderr, e.g. "debug" or "jsondoc_core=trace"
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every value a path expression selects, one per line
    Query {
        /// Path expression, e.g. '$.store.book[?(@.price < 10)].title'
        expression: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Stop after the first match
        #[arg(long)]
        first: bool,
        /// Pretty-print each value
        #[arg(long)]
        pretty: bool,
    },
    /// Apply a JSON Patch document
    Patch {
        /// Patch document file (a JSON array of operations)
        #[arg(short, long)]
        patch: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the patched document
        #[arg(long)]
        pretty: bool,
    },
    /// Compare two JSON files structurally, ignoring object key order
    Equals {
        /// First JSON file
        left: String,
        /// Second JSON file
        right: String,
        /// Treat arrays as ordered sequences rather than multisets
        #[arg(long)]
        ordered_arrays: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Query {
            expression,
            input,
            first,
            pretty,
        } => {
            let doc = parse_document(&read_input(input.as_deref())?, "input")?;
            let cache = PathCache::new();
            let results = jsondoc_core::query(&doc, &expression, &cache)
                .with_context(|| format!("Failed to compile path expression: {}", expression))?;

            let limit = if first { 1 } else { usize::MAX };
            let mut out = String::new();
            for value in results.take(limit) {
                out.push_str(&render(value, pretty));
                out.push('\n');
            }
            debug!(expression = %expression, "query finished");
            write_output(None, &out)?;
        }
        Commands::Patch {
            patch,
            input,
            output,
            pretty,
        } => {
            let ops_text = read_input(Some(&patch))?;
            let ops = jsondoc_core::parse_patch_str(&ops_text)
                .with_context(|| format!("Invalid patch document: {}", patch))?;
            let doc = parse_document(&read_input(input.as_deref())?, "input")?;

            let patched = jsondoc_core::apply_patch(&doc, &ops).context("Failed to apply patch")?;
            debug!(operations = ops.len(), "patch applied");

            let mut text = render(&patched, pretty);
            text.push('\n');
            write_output(output.as_deref(), &text)?;
        }
        Commands::Equals {
            left,
            right,
            ordered_arrays,
        } => {
            let a = parse_document(&read_input(Some(&left))?, &left)?;
            let b = parse_document(&read_input(Some(&right))?, &right)?;
            let equal = jsondoc_core::semantic_equals(&a, &b, ordered_arrays);
            println!("{}", equal);
            if !equal {
                process::exit(1);
            }
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `JSONDOC_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn parse_document(text: &str, source: &str) -> Result<Value> {
    text.parse::<Value>()
        .with_context(|| format!("Failed to parse JSON from {}", source))
}

fn render(value: &Value, pretty: bool) -> String {
    if pretty {
        value.to_pretty_string()
    } else {
        value.to_json_string()
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
