//! Language-independent result model.
//!
//! Every analyzer produces these types regardless of source language.
//! All of them are plain value objects created fresh per analysis call;
//! nothing here has identity beyond the call that produced it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single point in source text, zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl From<tree_sitter::Point> for Point {
    fn from(p: tree_sitter::Point) -> Self {
        Self {
            row: p.row,
            column: p.column,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// Start/end positions of a syntax construct; end is exclusive,
/// matching the tree-sitter convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub start: Point,
    pub end: Point,
}

impl Location {
    /// Build a location from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        Self {
            start: node.start_position().into(),
            end: node.end_position().into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

/// A normalized syntax tree node.
///
/// Invariant: a node with children never carries text; a node whose
/// children array is empty carries the exact source slice of its span.
/// `id` is the provider's node identity, meaningful only within the
/// parse that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstNode {
    /// Grammar production name, e.g. "function_definition".
    #[serde(rename = "type")]
    pub kind: String,
    pub start_point: Point,
    pub end_point: Point,
    pub children: Vec<AstNode>,
    pub text: Option<String>,
    pub id: Option<usize>,
}

impl AstNode {
    /// Total node count of this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(AstNode::node_count).sum::<usize>()
    }

    /// Maximum depth of this subtree (root alone = 0).
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// A named, kinded declaration (or reference) site.
///
/// `kind` is an open vocabulary defined per language: "function",
/// "class", "struct", "enum", "union", "typedef", "namespace",
/// "variable", "reference", ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: String,
    pub location: Location,
    pub file_path: String,
}

impl Symbol {
    /// Build a symbol located at a tree-sitter node.
    pub fn from_node(name: &str, kind: &str, node: tree_sitter::Node, file_path: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            location: Location::from_node(node),
            file_path: file_path.to_string(),
        }
    }
}

/// One function-like definition and the callee names invoked in its body.
///
/// Callees are plain names in first-appearance order; recursion and
/// mutual recursion stay unresolved name references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraphNode {
    pub name: String,
    pub location: Location,
    pub calls: Vec<String>,
}

/// Per-file call graph: one node per function-like definition, in
/// top-down source order. No cross-file edges.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallGraph {
    pub nodes: Vec<CallGraphNode>,
}

/// Result of a targeted search. An empty match list is a valid,
/// non-error outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub matches: Vec<Symbol>,
}

impl SearchResult {
    pub fn new(query: &str, matches: Vec<Symbol>) -> Self {
        Self {
            query: query.to_string(),
            matches,
        }
    }
}

/// One (capture, matched node) pair from a pattern query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub capture_name: String,
    pub text: String,
    pub start: Point,
    pub end: Point,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Aggregate artifact of a full analysis pass over one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub file_path: String,
    pub language: String,
    pub ast: AstNode,
    pub symbols: Vec<Symbol>,
    /// Human-readable syntax-error notes; empty on a clean parse.
    pub errors: Vec<String>,
}
