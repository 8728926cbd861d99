//! Core trait for language analysis.

use std::path::Path;

use crate::analysis::ast::{build_ast, syntax_errors, UNLIMITED_DEPTH};
use crate::analysis::model::{AnalysisResult, CallGraph, SearchResult, Symbol};
use crate::analysis::provider::{LanguageId, SyntaxProvider};
use crate::error::Result;

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// Kept separate from analysis results so one parse can feed multiple
/// extraction passes without re-parsing.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source (kept for node text extraction).
    pub source: Vec<u8>,
    /// File path, for locations in results.
    pub path: String,
    /// The language the file was parsed as.
    pub language: LanguageId,
}

impl ParsedFile {
    /// Root node of the parse tree.
    pub fn root(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Language-specific analyzer.
///
/// Each language implements the extraction hooks; parsing, full
/// analysis, function search, and usage search are shared algorithms
/// layered on top. Analyzers hold no per-call state and are safe to
/// share across threads; the parser pool they borrow synchronizes its
/// own access.
pub trait LanguageAnalyzer: Send + Sync {
    /// The language this analyzer handles.
    fn language(&self) -> LanguageId;

    /// File extensions (without dot) this analyzer handles.
    fn extensions(&self) -> &'static [&'static str];

    /// Node kinds that carry identifier text, used by usage search.
    fn identifier_kinds(&self) -> &'static [&'static str] {
        &["identifier"]
    }

    /// Parse source through the provider's parser pool.
    fn parse(&self, provider: &SyntaxProvider, path: &Path, code: &str) -> Result<ParsedFile> {
        let tree = provider.parse(self.language(), code.as_bytes())?;
        Ok(ParsedFile {
            tree,
            source: code.as_bytes().to_vec(),
            path: path.to_string_lossy().to_string(),
            language: self.language(),
        })
    }

    /// Full analysis: normalized AST plus symbols plus error notes.
    fn analyze(
        &self,
        provider: &SyntaxProvider,
        path: &Path,
        code: &str,
    ) -> Result<AnalysisResult> {
        tracing::debug!(language = %self.language(), path = %path.display(), "analyzing file");
        let parsed = self.parse(provider, path, code)?;
        let ast = build_ast(parsed.root(), &parsed.source, UNLIMITED_DEPTH);
        let symbols = self.extract_symbols(&parsed);
        let errors = syntax_errors(parsed.root());

        Ok(AnalysisResult {
            file_path: parsed.path.clone(),
            language: self.language().as_str().to_string(),
            ast,
            symbols,
            errors,
        })
    }

    /// Extract declared symbols in first-encountered (pre-order) order.
    fn extract_symbols(&self, parsed: &ParsedFile) -> Vec<Symbol>;

    /// Build the per-function call graph.
    fn call_graph(&self, parsed: &ParsedFile) -> CallGraph;

    /// Find function definitions by exact, case-sensitive name.
    fn find_function(&self, parsed: &ParsedFile, name: &str) -> SearchResult {
        let matches = self
            .extract_symbols(parsed)
            .into_iter()
            .filter(|s| s.kind == "function" && s.name == name)
            .collect();
        SearchResult::new(name, matches)
    }

    /// Find variable declarations (and, per language policy, uses) by
    /// exact name. Each analyzer documents its own policy.
    fn find_variable(&self, parsed: &ParsedFile, name: &str) -> SearchResult;

    /// Find every identifier occurrence of `name`, declaration or
    /// reference, as a flat tree-wide scan with no scope model.
    fn find_usage(&self, parsed: &ParsedFile, name: &str) -> SearchResult {
        let mut matches = Vec::new();
        collect_usages(
            parsed.root(),
            parsed,
            self.identifier_kinds(),
            name,
            &mut matches,
        );
        SearchResult::new(name, matches)
    }

    /// Extract dependency identifiers in source order, duplicates
    /// preserved.
    fn dependencies(&self, parsed: &ParsedFile) -> Vec<String>;
}

fn collect_usages(
    node: tree_sitter::Node,
    parsed: &ParsedFile,
    identifier_kinds: &[&str],
    name: &str,
    out: &mut Vec<Symbol>,
) {
    if identifier_kinds.contains(&node.kind()) && parsed.node_text(node) == name {
        out.push(Symbol::from_node(name, "reference", node, &parsed.path));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_usages(child, parsed, identifier_kinds, name, out);
    }
}
