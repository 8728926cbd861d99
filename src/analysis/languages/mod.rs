//! Language-specific analyzer implementations.

mod c;
mod cpp;
mod python;

pub use c::CAnalyzer;
pub use cpp::CppAnalyzer;
pub use python::PythonAnalyzer;

use std::path::Path;

use once_cell::sync::OnceCell;

use super::provider::LanguageId;
use super::LanguageAnalyzer;
use crate::error::{Error, Result};

/// Static storage for the C analyzer.
static C_ANALYZER: OnceCell<CAnalyzer> = OnceCell::new();

/// Static storage for the C++ analyzer.
static CPP_ANALYZER: OnceCell<CppAnalyzer> = OnceCell::new();

/// Static storage for the Python analyzer.
static PYTHON_ANALYZER: OnceCell<PythonAnalyzer> = OnceCell::new();

/// Get the analyzer for a language.
pub fn analyzer_for(language: LanguageId) -> &'static dyn LanguageAnalyzer {
    match language {
        LanguageId::C => C_ANALYZER.get_or_init(CAnalyzer::new),
        LanguageId::Cpp => CPP_ANALYZER.get_or_init(CppAnalyzer::new),
        LanguageId::Python => PYTHON_ANALYZER.get_or_init(PythonAnalyzer::new),
    }
}

/// Resolve an analyzer from a file path's extension.
///
/// Fails with `UnsupportedExtension` when the extension is unknown.
pub fn analyzer_for_path(path: &Path) -> Result<&'static dyn LanguageAnalyzer> {
    let language = LanguageId::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        Error::UnsupportedExtension(if ext.is_empty() {
            path.display().to_string()
        } else {
            ext
        })
    })?;
    Ok(analyzer_for(language))
}

/// All supported language identifiers.
pub fn supported_languages() -> Vec<&'static str> {
    LanguageId::ALL.iter().map(|l| l.as_str()).collect()
}
