//! Integration tests for the analysis engine.
//!
//! These exercise the cross-language contracts: idempotence, AST
//! completeness and depth policy, symbol ordering, call attribution,
//! search semantics, query failure, and dependency ordering.

use std::path::Path;

use treescan::{
    analyzer_for, analyzer_for_path, build_ast, AstNode, Error, LanguageId, SyntaxProvider,
};

fn provider() -> SyntaxProvider {
    SyntaxProvider::new()
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_analyze_is_idempotent() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::Python);
    let code = "import os\n\ndef f(x):\n    return os.path.join(x, 'a')\n\nTOP = 1\n";
    let path = Path::new("sample.py");

    let first = analyzer.analyze(&provider, path, code).unwrap();
    let second = analyzer.analyze(&provider, path, code).unwrap();

    assert_eq!(first, second);
    assert!(first.errors.is_empty());
}

#[test]
fn test_analyze_idempotent_across_languages() {
    let provider = provider();
    for (language, path, code) in [
        (LanguageId::C, "a.c", "int main(void) { return 0; }\n"),
        (LanguageId::Cpp, "a.cpp", "class A {}; int x;\n"),
        (LanguageId::Python, "a.py", "x = 1\n"),
    ] {
        let analyzer = analyzer_for(language);
        let first = analyzer.analyze(&provider, Path::new(path), code).unwrap();
        let second = analyzer.analyze(&provider, Path::new(path), code).unwrap();
        assert_eq!(first, second, "{} analysis must be idempotent", language);
    }
}

// =============================================================================
// AST completeness and depth policy
// =============================================================================

fn every_leaf_has_text(node: &AstNode) -> bool {
    if node.children.is_empty() {
        node.text.is_some()
    } else {
        node.text.is_none() && node.children.iter().all(every_leaf_has_text)
    }
}

#[test]
fn test_full_ast_reproduces_tree_shape() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::C);
    let code = "int add(int a, int b) {\n    return a + b;\n}\n";
    let parsed = analyzer.parse(&provider, Path::new("add.c"), code).unwrap();

    let ast = build_ast(parsed.root(), &parsed.source, -1);

    assert_eq!(ast.kind, "translation_unit");
    assert!(ast.node_count() > 10, "full tree must be materialized");
    assert!(every_leaf_has_text(&ast));

    // Normalizing the same parse twice is structurally equal.
    let again = build_ast(parsed.root(), &parsed.source, -1);
    assert_eq!(ast, again);
}

#[test]
fn test_depth_limited_ast_truncates_with_text() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::Python);
    let code = "def f():\n    if True:\n        g()\n";
    let parsed = analyzer.parse(&provider, Path::new("f.py"), code).unwrap();

    for depth in [0, 1, 2] {
        let ast = build_ast(parsed.root(), &parsed.source, depth);
        assert!(
            ast.depth() <= depth as usize,
            "depth {} exceeded: {}",
            depth,
            ast.depth()
        );
        assert!(every_leaf_has_text(&ast), "truncated leaves must carry text");
    }
}

// =============================================================================
// Symbol ordering
// =============================================================================

#[test]
fn test_symbol_order_matches_source_order() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::Python);
    let code = "def a():\n    pass\n\ndef b():\n    pass\n\ndef c():\n    pass\n";
    let parsed = analyzer.parse(&provider, Path::new("abc.py"), code).unwrap();

    let names: Vec<String> = analyzer
        .extract_symbols(&parsed)
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_c_symbol_order_matches_source_order() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::C);
    let code = "void a(void) {}\nvoid b(void) {}\nvoid c(void) {}\n";
    let parsed = analyzer.parse(&provider, Path::new("abc.c"), code).unwrap();

    let names: Vec<String> = analyzer
        .extract_symbols(&parsed)
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

// =============================================================================
// Call attribution
// =============================================================================

#[test]
fn test_nested_call_attributed_to_innermost_function() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::Python);
    let code = "def f():\n    def g():\n        h()\n    return g\n";
    let parsed = analyzer.parse(&provider, Path::new("n.py"), code).unwrap();

    let graph = analyzer.call_graph(&parsed);
    let f = graph.nodes.iter().find(|n| n.name == "f").unwrap();
    let g = graph.nodes.iter().find(|n| n.name == "g").unwrap();

    assert!(!f.calls.contains(&"h".to_string()), "h belongs to g, not f");
    assert_eq!(g.calls, vec!["h"]);
}

#[test]
fn test_recursive_calls_stay_name_references() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::C);
    let code = "int fib(int n) {\n    if (n < 2) return n;\n    return fib(n - 1) + fib(n - 2);\n}\n";
    let parsed = analyzer.parse(&provider, Path::new("fib.c"), code).unwrap();

    let graph = analyzer.call_graph(&parsed);
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].calls, vec!["fib"]);
}

// =============================================================================
// Search correctness
// =============================================================================

#[test]
fn test_find_function_single_definition() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::Python);
    let code = "def foo(): pass\n";
    let parsed = analyzer.parse(&provider, Path::new("foo.py"), code).unwrap();

    let result = analyzer.find_function(&parsed, "foo");
    assert_eq!(result.query, "foo");
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].name, "foo");
}

#[test]
fn test_absent_name_yields_empty_matches_not_error() {
    let provider = provider();
    for (language, path, code) in [
        (LanguageId::Python, "a.py", "def foo(): pass\n"),
        (LanguageId::C, "a.c", "void foo(void) {}\n"),
        (LanguageId::Cpp, "a.cpp", "void foo() {}\n"),
    ] {
        let analyzer = analyzer_for(language);
        let parsed = analyzer.parse(&provider, Path::new(path), code).unwrap();

        assert!(analyzer.find_function(&parsed, "missing").matches.is_empty());
        assert!(analyzer.find_variable(&parsed, "missing").matches.is_empty());
        assert!(analyzer.find_usage(&parsed, "missing").matches.is_empty());
    }
}

#[test]
fn test_search_is_case_sensitive() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::Python);
    let code = "def Foo(): pass\n";
    let parsed = analyzer.parse(&provider, Path::new("a.py"), code).unwrap();

    assert!(analyzer.find_function(&parsed, "foo").matches.is_empty());
    assert_eq!(analyzer.find_function(&parsed, "Foo").matches.len(), 1);
}

#[test]
fn test_find_usage_includes_declarations_and_references() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::C);
    let code = "int total;\n\nvoid bump(void) {\n    total = total + 1;\n}\n";
    let parsed = analyzer.parse(&provider, Path::new("t.c"), code).unwrap();

    let result = analyzer.find_usage(&parsed, "total");
    assert_eq!(result.matches.len(), 3);
    assert!(result.matches.iter().all(|m| m.kind == "reference"));
}

// =============================================================================
// Pattern queries
// =============================================================================

#[test]
fn test_invalid_query_is_typed_condition() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::Python);
    let code = "x = 1\n";
    let parsed = analyzer.parse(&provider, Path::new("q.py"), code).unwrap();

    let err = provider
        .run_query(
            LanguageId::Python,
            "(this_is_not_a_node_kind) @x",
            parsed.root(),
            &parsed.source,
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));

    let err = provider
        .run_query(LanguageId::Python, "((", parsed.root(), &parsed.source)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));
}

#[test]
fn test_query_returns_capture_records() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::C);
    let code = "int a(void) {}\nint b(void) {}\n";
    let parsed = analyzer.parse(&provider, Path::new("q.c"), code).unwrap();

    let matches = provider
        .run_query(
            LanguageId::C,
            "(function_definition declarator: (function_declarator declarator: (identifier) @name))",
            parsed.root(),
            &parsed.source,
        )
        .unwrap();

    let names: Vec<&str> = matches.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

// =============================================================================
// Dependencies
// =============================================================================

#[test]
fn test_python_dependency_order() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::Python);
    let code = "import os\nimport sys\n";
    let parsed = analyzer.parse(&provider, Path::new("d.py"), code).unwrap();

    assert_eq!(analyzer.dependencies(&parsed), vec!["os", "sys"]);
}

#[test]
fn test_c_include_order_and_stripping() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::C);
    let code = "#include <stdio.h>\n#include \"local.h\"\n";
    let parsed = analyzer.parse(&provider, Path::new("d.c"), code).unwrap();

    assert_eq!(analyzer.dependencies(&parsed), vec!["stdio.h", "local.h"]);
}

// =============================================================================
// Degraded parses
// =============================================================================

#[test]
fn test_broken_source_analyzes_with_error_notes() {
    let provider = provider();
    let analyzer = analyzer_for(LanguageId::Python);
    let code = "def broken(:\n    pass\n\ndef ok():\n    pass\n";

    let result = analyzer
        .analyze(&provider, Path::new("broken.py"), code)
        .expect("broken source must still analyze");

    assert!(!result.errors.is_empty());
    // The intact part of the file still yields symbols.
    assert!(result.symbols.iter().any(|s| s.name == "ok"));
}

// =============================================================================
// Extension resolution
// =============================================================================

#[test]
fn test_extension_resolution() {
    assert_eq!(
        analyzer_for_path(Path::new("x.py")).unwrap().language(),
        LanguageId::Python
    );
    assert_eq!(
        analyzer_for_path(Path::new("x.c")).unwrap().language(),
        LanguageId::C
    );
    for header in ["x.cpp", "x.cc", "x.cxx", "x.h", "x.hpp"] {
        assert_eq!(
            analyzer_for_path(Path::new(header)).unwrap().language(),
            LanguageId::Cpp,
            "{} must resolve to C++",
            header
        );
    }
    assert!(matches!(
        analyzer_for_path(Path::new("x.java")),
        Err(Error::UnsupportedExtension(_))
    ));
}

// =============================================================================
// Provider sharing
// =============================================================================

#[test]
fn test_one_provider_serves_all_languages() {
    let provider = provider();

    let py = analyzer_for(LanguageId::Python);
    let c = analyzer_for(LanguageId::C);
    let cpp = analyzer_for(LanguageId::Cpp);

    assert!(py.analyze(&provider, Path::new("a.py"), "x = 1\n").is_ok());
    assert!(c.analyze(&provider, Path::new("a.c"), "int x;\n").is_ok());
    assert!(cpp
        .analyze(&provider, Path::new("a.cpp"), "int x;\n")
        .is_ok());
    // Reuse after the pool is warm.
    assert!(py.analyze(&provider, Path::new("b.py"), "y = 2\n").is_ok());
}
