//! Wiki Templates CLI
//!
//! Usage:
//!   wiki-templates [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>              Parser configuration (TOML format)
//!       --max-depth <N>              Override the nesting limit
//!       --duplicate-keys <POLICY>    last-wins, first-wins or reject
//!   -f, --format <FORMAT>            json, debug or wikitext
//!       --tree                       Print the raw template tree
//!       --lines                      Parse each non-blank line separately
//!   -v, --verbose                    Debug logging
//!   -h, --help                       Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{info, warn};

use wiki_templates::{
    parse_with_config, DuplicateKeys, ParseError, ParserConfig, TemplateReference,
};

#[derive(Parser)]
#[command(name = "wiki-templates")]
#[command(about = "Extract structured data from wiki template markup")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Parser configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum template nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Policy for repeated keyword arguments (last-wins, first-wins, reject)
    #[arg(long)]
    duplicate_keys: Option<DuplicateKeys>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Print the template tree instead of the flattened reference
    #[arg(long)]
    tree: bool,

    /// Treat each non-blank line as its own template
    #[arg(long)]
    lines: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Debug,
    Wikitext,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &cli.config {
        Some(path) => match ParserConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ParserConfig::default(),
    };
    if let Some(depth) = cli.max_depth {
        config = config.with_max_depth(depth);
    }
    if let Some(policy) = cli.duplicate_keys {
        config = config.with_duplicate_keys(policy);
    }

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    if cli.lines {
        let mut failed = 0usize;
        let mut parsed = 0usize;
        for (lineno, line) in source.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match process(line, &cli, &config) {
                Ok(out) => {
                    parsed += 1;
                    println!("{}", out);
                }
                Err(e) => {
                    failed += 1;
                    warn!("skipping line {}: {}", lineno + 1, e);
                    let name = format!("{}:{}", filename, lineno + 1);
                    eprint!("{}", e.format(line, &name));
                }
            }
        }
        info!("{} templates parsed, {} skipped", parsed, failed);
        if failed > 0 {
            std::process::exit(1);
        }
        return;
    }

    match process(&source, &cli, &config) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}

/// Parse one template and render it in the requested format
fn process(text: &str, cli: &Cli, config: &ParserConfig) -> Result<String, ParseError> {
    let node = parse_with_config(text, config)?.ok_or(ParseError::NoTemplateFound)?;

    if cli.tree {
        return Ok(match cli.format {
            Format::Json => to_json(&node),
            Format::Debug => format!("{:#?}", node),
            Format::Wikitext => node.to_string(),
        });
    }

    let reference = TemplateReference::from_node(node, config.duplicate_keys)?;
    Ok(match cli.format {
        Format::Json => to_json(&reference),
        Format::Debug => format!("{:#?}", reference),
        Format::Wikitext => reference.to_string(),
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            std::process::exit(1);
        }
    }
}
