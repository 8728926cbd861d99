//! Command-line interface for treescan.
//!
//! The CLI is the caller layer: it reads files, maps extensions to
//! languages (`.h` defaults to C++, `--language` overrides), and picks
//! one analysis operation per invocation. The analysis engine itself
//! never touches the filesystem.

use std::path::PathBuf;

use clap::Parser;

use crate::analysis::{self, build_ast, LanguageId, SyntaxProvider};
use crate::error::Error;
use crate::report::{self, Format};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Structural code analysis over tree-sitter.
///
/// Extracts a normalized AST, declared symbols, per-function call
/// graphs, targeted search results, and dependency lists from Python,
/// C, and C++ sources, or runs raw tree-sitter pattern queries.
/// Without an operation flag the whole file is analyzed.
#[derive(Parser)]
#[command(name = "treescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File to analyze
    pub file: Option<PathBuf>,

    /// Language override: python, c, or cpp (default: from extension)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Print the normalized AST
    #[arg(long)]
    pub ast: bool,

    /// Maximum AST depth with --ast; -1 for unlimited
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub max_depth: i32,

    /// Generate the call graph
    #[arg(long)]
    pub call_graph: bool,

    /// Find function definitions by name
    #[arg(long, value_name = "NAME")]
    pub find_function: Option<String>,

    /// Find variable declarations (and uses, per language) by name
    #[arg(long, value_name = "NAME")]
    pub find_variable: Option<String>,

    /// Find all usages of a symbol by name
    #[arg(long, value_name = "NAME")]
    pub find_usage: Option<String>,

    /// Run a tree-sitter S-expression query
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,

    /// List dependencies (imports/includes)
    #[arg(long)]
    pub dependencies: bool,

    /// List supported languages and exit
    #[arg(long)]
    pub languages: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the CLI.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let format = match Format::from_name(&cli.format) {
        Some(f) => f,
        None => {
            eprintln!(
                "Error: invalid format {:?}, must be 'pretty' or 'json'",
                cli.format
            );
            return Ok(EXIT_ERROR);
        }
    };

    if cli.languages {
        for language in analysis::supported_languages() {
            println!("{}", language);
        }
        return Ok(EXIT_SUCCESS);
    }

    let file = match &cli.file {
        Some(f) => f.clone(),
        None => {
            eprintln!("Error: no file given (see --help)");
            return Ok(EXIT_ERROR);
        }
    };

    match run_operation(cli, &file) {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            Ok(EXIT_SUCCESS)
        }
        Err(err) => {
            match format {
                // Degraded machine-readable response on stdout.
                Format::Json => println!("{}", report::render_error_json(&err)),
                Format::Pretty => {}
            }
            eprintln!("Error: {}", err);
            Ok(EXIT_ERROR)
        }
    }
}

/// Resolve the analyzer, parse, and dispatch exactly one operation.
fn run_operation(cli: &Cli, file: &std::path::Path) -> Result<String, Error> {
    let format = Format::from_name(&cli.format).unwrap_or(Format::Pretty);

    let analyzer = match &cli.language {
        Some(name) => analysis::analyzer_for(LanguageId::from_name(name)?),
        None => analysis::analyzer_for_path(file)?,
    };

    let code = std::fs::read_to_string(file)?;
    let provider = SyntaxProvider::new();
    let parsed = analyzer.parse(&provider, file, &code)?;

    let rendered = if cli.call_graph {
        report::render_call_graph(&analyzer.call_graph(&parsed), format)
    } else if let Some(name) = &cli.find_function {
        report::render_search(&analyzer.find_function(&parsed, name), format)
    } else if let Some(name) = &cli.find_variable {
        report::render_search(&analyzer.find_variable(&parsed, name), format)
    } else if let Some(name) = &cli.find_usage {
        report::render_search(&analyzer.find_usage(&parsed, name), format)
    } else if cli.ast {
        let ast = build_ast(parsed.root(), &parsed.source, cli.max_depth);
        report::render_ast(&ast, format)
    } else if let Some(query) = &cli.query {
        let matches =
            provider.run_query(analyzer.language(), query, parsed.root(), &parsed.source)?;
        report::render_query_matches(&matches, format)
    } else if cli.dependencies {
        report::render_dependencies(&analyzer.dependencies(&parsed), format)
    } else {
        let result = analyzer.analyze(&provider, file, &code)?;
        report::render_analysis(&result, format)
    };

    // Rendering only fails on serialization, which our result types
    // cannot trigger; keep the error readable if it ever does.
    rendered.map_err(|e| Error::Parse(e.to_string()))
}
