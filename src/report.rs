//! Output rendering for analysis results.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//!
//! Every renderer returns a `String` so formats stay testable; the CLI
//! decides where it goes.

use colored::*;

use crate::analysis::model::{
    AnalysisResult, AstNode, CallGraph, QueryMatch, SearchResult,
};
use crate::error::Error;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
}

impl Format {
    /// Parse a format name; `None` for anything unknown.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pretty" => Some(Format::Pretty),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Render a full analysis result.
pub fn render_analysis(result: &AnalysisResult, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(result)?),
        Format::Pretty => {
            let mut out = String::new();
            out.push_str(&format!(
                "{} ({})\n",
                result.file_path.bold(),
                result.language
            ));
            out.push_str(&format!("{} symbols\n", result.symbols.len()));
            for symbol in &result.symbols {
                out.push_str(&format!(
                    "  {:<10} {} {}\n",
                    symbol.kind.cyan(),
                    symbol.name,
                    format!("@ {}", symbol.location).dimmed()
                ));
            }
            if !result.errors.is_empty() {
                out.push_str(&format!("{}\n", "parse errors:".red().bold()));
                for error in &result.errors {
                    out.push_str(&format!("  {}\n", error.red()));
                }
            }
            Ok(out)
        }
    }
}

/// Render a normalized AST.
pub fn render_ast(ast: &AstNode, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(ast)?),
        Format::Pretty => {
            let mut out = String::new();
            render_ast_node(ast, 0, &mut out);
            Ok(out)
        }
    }
}

fn render_ast_node(node: &AstNode, indent: usize, out: &mut String) {
    let position = format!("[{} - {}]", node.start_point, node.end_point);
    match &node.text {
        Some(text) => {
            let mut shown = text.replace('\n', "\\n");
            if shown.len() > 40 {
                shown.truncate(40);
                shown.push_str("...");
            }
            out.push_str(&format!(
                "{}{} {} {:?}\n",
                "  ".repeat(indent),
                node.kind.cyan(),
                position.dimmed(),
                shown
            ));
        }
        None => {
            out.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                node.kind.cyan(),
                position.dimmed()
            ));
        }
    }
    for child in &node.children {
        render_ast_node(child, indent + 1, out);
    }
}

/// Render a call graph.
pub fn render_call_graph(graph: &CallGraph, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(graph)?),
        Format::Pretty => {
            let mut out = String::new();
            out.push_str(&format!("{} functions\n", graph.nodes.len()));
            for node in &graph.nodes {
                out.push_str(&format!(
                    "{} {}\n",
                    node.name.bold(),
                    format!("@ {}", node.location).dimmed()
                ));
                for call in &node.calls {
                    out.push_str(&format!("  -> {}\n", call));
                }
            }
            Ok(out)
        }
    }
}

/// Render a search result.
pub fn render_search(result: &SearchResult, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(result)?),
        Format::Pretty => {
            let mut out = String::new();
            out.push_str(&format!(
                "{} match(es) for {:?}\n",
                result.matches.len(),
                result.query
            ));
            for symbol in &result.matches {
                out.push_str(&format!(
                    "  {:<10} {} {}\n",
                    symbol.kind.cyan(),
                    symbol.name,
                    format!("@ {}", symbol.location).dimmed()
                ));
            }
            Ok(out)
        }
    }
}

/// Render a dependency list.
pub fn render_dependencies(deps: &[String], format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(deps)?),
        Format::Pretty => {
            let mut out = String::new();
            out.push_str(&format!("{} dependencies\n", deps.len()));
            for dep in deps {
                out.push_str(&format!("  {}\n", dep));
            }
            Ok(out)
        }
    }
}

/// Render pattern-query matches.
pub fn render_query_matches(matches: &[QueryMatch], format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(matches)?),
        Format::Pretty => {
            let mut out = String::new();
            out.push_str(&format!("{} capture(s)\n", matches.len()));
            for m in matches {
                let mut shown = m.text.replace('\n', "\\n");
                if shown.len() > 60 {
                    shown.truncate(60);
                    shown.push_str("...");
                }
                out.push_str(&format!(
                    "  @{} {} {} {:?}\n",
                    m.capture_name.bold(),
                    m.kind.cyan(),
                    format!("[{} - {}]", m.start, m.end).dimmed(),
                    shown
                ));
            }
            Ok(out)
        }
    }
}

/// Minimum degraded JSON response at the outermost boundary.
pub fn render_error_json(error: &Error) -> String {
    serde_json::json!({ "error": error.to_string() }).to_string()
}
