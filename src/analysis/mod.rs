//! Structural analysis engine.
//!
//! A caller supplies source text plus a language (or a path whose
//! extension resolves to one); the engine parses through the syntax
//! tree provider, hands the tree to the matching language analyzer,
//! and returns language-independent results:
//!
//! ```text
//! ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//! │ Source text  │────▶│ SyntaxProvider │────▶│ LanguageAnalyzer │
//! └──────────────┘     │ (parser pool)  │     │ (python, c, cpp) │
//!                      └────────────────┘     └──────────────────┘
//!                                                      │
//!                                                      ▼
//!                      AnalysisResult / CallGraph / SearchResult /
//!                      dependency list / QueryMatch list
//! ```
//!
//! Every result is created fresh per call; the only cross-call state
//! is the provider's parser pool, which never affects output.
//!
//! # Adding a new language
//!
//! 1. Create a module in `src/analysis/languages/` (e.g. `go.rs`)
//! 2. Implement the `LanguageAnalyzer` extraction hooks
//! 3. Add the language to `LanguageId` and register the analyzer in
//!    `languages/mod.rs`

pub mod ast;
pub mod languages;
pub mod model;
pub mod provider;
mod traits;

pub use ast::{build_ast, syntax_errors, UNLIMITED_DEPTH};
pub use languages::{
    analyzer_for, analyzer_for_path, supported_languages, CAnalyzer, CppAnalyzer, PythonAnalyzer,
};
pub use model::{
    AnalysisResult, AstNode, CallGraph, CallGraphNode, Location, Point, QueryMatch, SearchResult,
    Symbol,
};
pub use provider::{LanguageId, SyntaxProvider};
pub use traits::{LanguageAnalyzer, ParsedFile};
