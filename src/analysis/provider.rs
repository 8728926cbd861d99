//! Syntax tree provider: language registry and parser pool.
//!
//! This is the boundary to tree-sitter. The provider owns one parser
//! instance per language, reused across calls; reuse never changes
//! output for identical input. Callers create one provider and pass it
//! explicitly to analyzers rather than going through a global.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Parser, Query, QueryCursor, Tree};

use crate::analysis::model::QueryMatch;
use crate::error::{Error, Result};

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    Python,
    C,
    Cpp,
}

impl LanguageId {
    /// All supported languages.
    pub const ALL: &'static [LanguageId] = &[LanguageId::Python, LanguageId::C, LanguageId::Cpp];

    /// Canonical language identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageId::Python => "python",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
        }
    }

    /// Resolve a language identifier. Fails with `UnsupportedLanguage`
    /// for anything unknown.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "python" => Ok(LanguageId::Python),
            "c" => Ok(LanguageId::C),
            "cpp" | "c++" => Ok(LanguageId::Cpp),
            other => Err(Error::UnsupportedLanguage(other.to_string())),
        }
    }

    /// Map a file extension (without dot) to a language.
    ///
    /// `.h` is ambiguous between C and C++ headers; the default here is
    /// C++, overridable by an explicit language identifier upstream.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(LanguageId::Python),
            "c" => Some(LanguageId::C),
            "cpp" | "cc" | "cxx" | "h" | "hpp" => Some(LanguageId::Cpp),
            _ => None,
        }
    }

    /// Map a file path to a language via its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// The tree-sitter grammar for this language.
    pub fn ts_language(&self) -> Language {
        match self {
            LanguageId::Python => tree_sitter_python::LANGUAGE.into(),
            LanguageId::C => tree_sitter_c::LANGUAGE.into(),
            LanguageId::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LanguageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// Parser pool, one instance per language.
///
/// tree_sitter::Parser needs `&mut` to parse and is not `Sync`, so
/// acquisition is synchronized: a pooled parser is never invoked by two
/// calls at once. Parsing itself is stateless per call.
pub struct SyntaxProvider {
    parsers: Mutex<HashMap<LanguageId, Parser>>,
}

impl SyntaxProvider {
    pub fn new() -> Self {
        Self {
            parsers: Mutex::new(HashMap::new()),
        }
    }

    /// Parse source into a concrete syntax tree.
    ///
    /// Never fails on malformed input; syntactically invalid source
    /// yields a tree containing ERROR nodes. `Error::Parse` only occurs
    /// if tree-sitter produces no tree at all.
    pub fn parse(&self, language: LanguageId, source: &[u8]) -> Result<Tree> {
        tracing::debug!(language = %language, bytes = source.len(), "parsing source");

        let mut pool = self.parsers.lock().unwrap();
        let parser = match pool.entry(language) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => {
                let mut parser = Parser::new();
                parser
                    .set_language(&language.ts_language())
                    .map_err(|e| Error::Parse(e.to_string()))?;
                e.insert(parser)
            }
        };

        parser
            .parse(source, None)
            .ok_or_else(|| Error::Parse(format!("parser returned no tree for {}", language)))
    }

    /// Compile and run a tree-sitter S-expression query against a node.
    ///
    /// Returns one record per (capture, matched node) pair, in match
    /// order then capture order. A query that does not compile against
    /// the grammar fails with `InvalidQuery` carrying the compiler
    /// diagnostic.
    pub fn run_query(
        &self,
        language: LanguageId,
        query_text: &str,
        node: tree_sitter::Node,
        source: &[u8],
    ) -> Result<Vec<QueryMatch>> {
        let query = Query::new(&language.ts_language(), query_text)
            .map_err(|e| Error::InvalidQuery(e.to_string()))?;

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, node, source);

        let mut results = Vec::new();
        while let Some(m) = matches.next() {
            for capture in m.captures {
                let capture_name = query.capture_names()[capture.index as usize];
                results.push(QueryMatch {
                    capture_name: capture_name.to_string(),
                    text: capture.node.utf8_text(source).unwrap_or("").to_string(),
                    start: capture.node.start_position().into(),
                    end: capture.node.end_position().into(),
                    kind: capture.node.kind().to_string(),
                });
            }
        }

        tracing::debug!(language = %language, matches = results.len(), "query executed");
        Ok(results)
    }
}

impl Default for SyntaxProvider {
    fn default() -> Self {
        Self::new()
    }
}
