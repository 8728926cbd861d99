//! Treescan - structural code analysis over tree-sitter.
//!
//! Treescan turns source text into machine-readable structural facts
//! without per-language parsers on the caller's side: a normalized
//! syntax tree, declared symbols, an intraprocedural call graph,
//! targeted name searches, module dependencies, and raw tree-sitter
//! pattern queries. Python, C, and C++ are supported.
//!
//! # Architecture
//!
//! - `analysis`: the engine - result model, syntax tree provider,
//!   AST normalization, the `LanguageAnalyzer` contract, and the
//!   per-language analyzers
//! - `error`: typed error taxonomy
//! - `report`: output formatting (pretty, JSON)
//! - `cli`: command-line caller layer
//!
//! Analysis is synchronous and per-call: nothing is cached across
//! calls except the provider's parser pool, which never affects
//! results.
//!
//! # Adding a new language
//!
//! See `src/analysis/languages/`. Implement the `LanguageAnalyzer`
//! extraction hooks and register the analyzer in `languages/mod.rs`.

pub mod analysis;
pub mod cli;
pub mod error;
pub mod report;

pub use analysis::{
    analyzer_for, analyzer_for_path, build_ast, supported_languages, AnalysisResult, AstNode,
    CAnalyzer, CallGraph, CallGraphNode, CppAnalyzer, LanguageAnalyzer, LanguageId, Location,
    ParsedFile, Point, PythonAnalyzer, QueryMatch, SearchResult, Symbol, SyntaxProvider,
};
pub use error::{Error, Result};
