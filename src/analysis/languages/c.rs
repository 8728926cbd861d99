//! C language analyzer.
//!
//! Symbol policy: functions, structs, enums, unions, and typedefs are
//! recognized anywhere in the tree; variable declarations only at file
//! scope. A named struct/enum/union specifier yields a symbol only when
//! it carries a body, so `struct Point p;` does not re-declare `Point`.
//!
//! Variable search policy: declaration sites only (declarations,
//! parameters, struct members); C distinguishes declaration from use,
//! and uses are covered by `find_usage`.

use tree_sitter::Node;

use crate::analysis::model::{CallGraph, CallGraphNode, Location, SearchResult, Symbol};
use crate::analysis::provider::LanguageId;
use crate::analysis::traits::{LanguageAnalyzer, ParsedFile};

/// Declarator wrappers that nest toward the name in C.
const DECLARATOR_WRAPPERS: &[&str] = &[
    "pointer_declarator",
    "array_declarator",
    "function_declarator",
    "parenthesized_declarator",
    "init_declarator",
    "attributed_declarator",
];

/// Unwrap nested declarator wrappers to the innermost name-bearing
/// node.
///
/// The bool is true when the name is reached directly through a
/// `function_declarator`, which makes a plain declaration a function
/// prototype; crossing a parenthesized or pointer wrapper afterwards
/// (`int (*fp)(void)`) makes it a function-pointer variable instead.
fn unwrap_declarator(node: Node) -> Option<(Node, bool)> {
    let mut cur = node;
    let mut last_wrapper = "";
    loop {
        match cur.kind() {
            "identifier" | "field_identifier" | "type_identifier" => {
                return Some((cur, last_wrapper == "function_declarator"));
            }
            kind if DECLARATOR_WRAPPERS.contains(&kind) => {
                last_wrapper = kind;
                cur = cur
                    .child_by_field_name("declarator")
                    .or_else(|| cur.named_child(0))?;
            }
            _ => return None,
        }
    }
}

pub struct CAnalyzer;

impl CAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn walk_symbols(&self, node: Node, parsed: &ParsedFile, file_scope: bool, out: &mut Vec<Symbol>) {
        match node.kind() {
            "function_definition" => {
                if let Some((name, _)) = node
                    .child_by_field_name("declarator")
                    .and_then(unwrap_declarator)
                {
                    out.push(Symbol::from_node(
                        parsed.node_text(name),
                        "function",
                        node,
                        &parsed.path,
                    ));
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk_symbols(body, parsed, false, out);
                }
            }
            "declaration" => {
                // An inline struct/enum/union definition comes first in
                // source order.
                if let Some(ty) = node.child_by_field_name("type") {
                    self.walk_symbols(ty, parsed, file_scope, out);
                }
                if file_scope {
                    let mut cursor = node.walk();
                    for declarator in node.children_by_field_name("declarator", &mut cursor) {
                        if let Some((name, is_function)) = unwrap_declarator(declarator) {
                            let kind = if is_function { "function" } else { "variable" };
                            out.push(Symbol::from_node(
                                parsed.node_text(name),
                                kind,
                                declarator,
                                &parsed.path,
                            ));
                        }
                    }
                }
            }
            "struct_specifier" | "union_specifier" => {
                if let (Some(name), Some(body)) = (
                    node.child_by_field_name("name"),
                    node.child_by_field_name("body"),
                ) {
                    let kind = if node.kind() == "struct_specifier" {
                        "struct"
                    } else {
                        "union"
                    };
                    out.push(Symbol::from_node(
                        parsed.node_text(name),
                        kind,
                        node,
                        &parsed.path,
                    ));
                    self.walk_symbols(body, parsed, false, out);
                }
            }
            "enum_specifier" => {
                if let (Some(name), Some(_body)) = (
                    node.child_by_field_name("name"),
                    node.child_by_field_name("body"),
                ) {
                    out.push(Symbol::from_node(
                        parsed.node_text(name),
                        "enum",
                        node,
                        &parsed.path,
                    ));
                }
            }
            "type_definition" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.walk_symbols(ty, parsed, file_scope, out);
                }
                let mut cursor = node.walk();
                for declarator in node.children_by_field_name("declarator", &mut cursor) {
                    if let Some((name, _)) = unwrap_declarator(declarator) {
                        out.push(Symbol::from_node(
                            parsed.node_text(name),
                            "typedef",
                            declarator,
                            &parsed.path,
                        ));
                    }
                }
            }
            _ => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.walk_symbols(child, parsed, file_scope, out);
                }
            }
        }
    }

    fn walk_functions(&self, node: Node, parsed: &ParsedFile, out: &mut Vec<CallGraphNode>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "function_definition" {
                let name = child
                    .child_by_field_name("declarator")
                    .and_then(unwrap_declarator)
                    .map(|(n, _)| parsed.node_text(n).to_string());
                let body = child.child_by_field_name("body");

                if let Some(name) = name {
                    let mut calls = Vec::new();
                    if let Some(body) = body {
                        collect_calls(body, parsed, &mut calls);
                    }
                    out.push(CallGraphNode {
                        name,
                        location: Location::from_node(child),
                        calls,
                    });
                }
                if let Some(body) = body {
                    self.walk_functions(body, parsed, out);
                }
            } else {
                self.walk_functions(child, parsed, out);
            }
        }
    }

    fn walk_variables(&self, node: Node, parsed: &ParsedFile, name: &str, out: &mut Vec<Symbol>) {
        if matches!(
            node.kind(),
            "declaration" | "parameter_declaration" | "field_declaration"
        ) {
            let mut cursor = node.walk();
            for declarator in node.children_by_field_name("declarator", &mut cursor) {
                if let Some((id, is_function)) = unwrap_declarator(declarator) {
                    if !is_function && parsed.node_text(id) == name {
                        out.push(Symbol::from_node(name, "variable", declarator, &parsed.path));
                    }
                }
            }
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_variables(child, parsed, name, out);
        }
    }

    fn collect_deps(&self, node: Node, parsed: &ParsedFile, out: &mut Vec<String>) {
        if node.kind() == "preproc_include" {
            if let Some(path) = node.child_by_field_name("path") {
                let raw = parsed.node_text(path);
                let stripped = match path.kind() {
                    // <stdio.h> -> stdio.h
                    "system_lib_string" => raw.trim_matches(|c| c == '<' || c == '>'),
                    // "header.h" -> header.h
                    _ => raw.trim_matches('"'),
                };
                out.push(stripped.to_string());
            }
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_deps(child, parsed, out);
        }
    }
}

/// Scan a function body for call expressions, pre-order. Nested
/// function definitions keep their own calls.
pub(super) fn collect_calls(node: Node, parsed: &ParsedFile, out: &mut Vec<String>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "function_definition" {
            continue;
        }
        if child.kind() == "call_expression" {
            if let Some(callee) = child
                .child_by_field_name("function")
                .and_then(|f| callee_name(f, parsed))
            {
                if !out.contains(&callee) {
                    out.push(callee);
                }
            }
        }
        collect_calls(child, parsed, out);
    }
}

/// Textual terminal identifier of a C-family call target.
pub(super) fn callee_name(node: Node, parsed: &ParsedFile) -> Option<String> {
    match node.kind() {
        "identifier" | "field_identifier" => Some(parsed.node_text(node).to_string()),
        "field_expression" => node
            .child_by_field_name("field")
            .map(|f| parsed.node_text(f).to_string()),
        "qualified_identifier" => node
            .child_by_field_name("name")
            .and_then(|inner| callee_name(inner, parsed)),
        "template_function" => node
            .child_by_field_name("name")
            .and_then(|inner| callee_name(inner, parsed)),
        "pointer_expression" => node
            .child_by_field_name("argument")
            .or_else(|| node.named_child(0))
            .and_then(|inner| callee_name(inner, parsed)),
        "parenthesized_expression" | "call_expression" => node
            .named_child(0)
            .and_then(|inner| callee_name(inner, parsed)),
        _ => None,
    }
}

impl Default for CAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for CAnalyzer {
    fn language(&self) -> LanguageId {
        LanguageId::C
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["c", "h"]
    }

    fn identifier_kinds(&self) -> &'static [&'static str] {
        &["identifier", "field_identifier", "type_identifier"]
    }

    fn extract_symbols(&self, parsed: &ParsedFile) -> Vec<Symbol> {
        let mut symbols = Vec::new();
        self.walk_symbols(parsed.root(), parsed, true, &mut symbols);
        symbols
    }

    fn call_graph(&self, parsed: &ParsedFile) -> CallGraph {
        let mut nodes = Vec::new();
        self.walk_functions(parsed.root(), parsed, &mut nodes);
        CallGraph { nodes }
    }

    fn find_variable(&self, parsed: &ParsedFile, name: &str) -> SearchResult {
        let mut matches = Vec::new();
        self.walk_variables(parsed.root(), parsed, name, &mut matches);
        SearchResult::new(name, matches)
    }

    fn dependencies(&self, parsed: &ParsedFile) -> Vec<String> {
        let mut deps = Vec::new();
        self.collect_deps(parsed.root(), parsed, &mut deps);
        deps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::provider::SyntaxProvider;
    use std::path::Path;

    fn parse(source: &str) -> (CAnalyzer, ParsedFile) {
        let analyzer = CAnalyzer::new();
        let provider = SyntaxProvider::new();
        let parsed = analyzer
            .parse(&provider, Path::new("test.c"), source)
            .unwrap();
        (analyzer, parsed)
    }

    #[test]
    fn test_symbols_in_source_order() {
        let source = r#"
#include <stdio.h>

struct Point {
    int x;
    int y;
};

enum Color { RED, GREEN };

typedef struct Point PointT;

int counter;

int add(int a, int b) {
    return a + b;
}
"#;
        let (analyzer, parsed) = parse(source);
        let symbols = analyzer.extract_symbols(&parsed);
        let pairs: Vec<(&str, &str)> = symbols
            .iter()
            .map(|s| (s.name.as_str(), s.kind.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("Point", "struct"),
                ("Color", "enum"),
                ("PointT", "typedef"),
                ("counter", "variable"),
                ("add", "function"),
            ]
        );
    }

    #[test]
    fn test_multi_declarator_yields_one_symbol_each() {
        let source = "int a, b;\n";
        let (analyzer, parsed) = parse(source);
        let symbols = analyzer.extract_symbols(&parsed);
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(symbols.iter().all(|s| s.kind == "variable"));
    }

    #[test]
    fn test_declarator_unwrapping() {
        let source = r#"
int *pointer;
int array[10];
int (*fn_ptr)(void);
int prototype(int x);
"#;
        let (analyzer, parsed) = parse(source);
        let symbols = analyzer.extract_symbols(&parsed);
        let pairs: Vec<(&str, &str)> = symbols
            .iter()
            .map(|s| (s.name.as_str(), s.kind.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("pointer", "variable"),
                ("array", "variable"),
                // function pointer is a variable, not a prototype
                ("fn_ptr", "variable"),
                ("prototype", "function"),
            ]
        );
    }

    #[test]
    fn test_struct_tag_usage_is_not_a_declaration() {
        let source = r#"
struct Point { int x; };
struct Point origin;
"#;
        let (analyzer, parsed) = parse(source);
        let symbols = analyzer.extract_symbols(&parsed);
        let structs: Vec<&Symbol> = symbols.iter().filter(|s| s.kind == "struct").collect();
        assert_eq!(structs.len(), 1);
        assert!(symbols
            .iter()
            .any(|s| s.name == "origin" && s.kind == "variable"));
    }

    #[test]
    fn test_local_declarations_are_not_file_scope_symbols() {
        let source = r#"
int global;

void f(void) {
    int local;
}
"#;
        let (analyzer, parsed) = parse(source);
        let symbols = analyzer.extract_symbols(&parsed);
        assert!(symbols.iter().any(|s| s.name == "global"));
        assert!(!symbols.iter().any(|s| s.name == "local"));
    }

    #[test]
    fn test_call_graph() {
        let source = r#"
void helper(void) {}

void work(struct ctx *c) {
    helper();
    c->ops->flush(c);
    printf("done");
    helper();
}
"#;
        let (analyzer, parsed) = parse(source);
        let graph = analyzer.call_graph(&parsed);

        let names: Vec<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["helper", "work"]);
        assert!(graph.nodes[0].calls.is_empty());
        // field access chains keep only the terminal identifier;
        // repeats collapse to first appearance
        assert_eq!(graph.nodes[1].calls, vec!["helper", "flush", "printf"]);
    }

    #[test]
    fn test_find_variable_declaration_sites() {
        let source = r#"
int shared;

void f(int shared) {
    int shared;
    shared = 1;
}
"#;
        let (analyzer, parsed) = parse(source);
        let result = analyzer.find_variable(&parsed, "shared");
        // global, parameter, local - the plain assignment is a use,
        // not a declaration
        assert_eq!(result.matches.len(), 3);
        assert!(result.matches.iter().all(|m| m.kind == "variable"));
    }

    #[test]
    fn test_find_usage_covers_all_identifier_kinds() {
        let source = r#"
int value;

void f(void) {
    value = value + 1;
}
"#;
        let (analyzer, parsed) = parse(source);
        let result = analyzer.find_usage(&parsed, "value");
        assert_eq!(result.matches.len(), 3);
    }

    #[test]
    fn test_includes_in_source_order_with_duplicates() {
        let source = r#"
#include <stdio.h>
#include "config.h"
#include <stdlib.h>
#include <stdio.h>
"#;
        let (analyzer, parsed) = parse(source);
        let deps = analyzer.dependencies(&parsed);
        assert_eq!(deps, vec!["stdio.h", "config.h", "stdlib.h", "stdio.h"]);
    }

    #[test]
    fn test_find_function_prototype_and_definition() {
        let source = r#"
int frob(int x);

int frob(int x) {
    return x * 2;
}
"#;
        let (analyzer, parsed) = parse(source);
        let result = analyzer.find_function(&parsed, "frob");
        assert_eq!(result.matches.len(), 2);
    }
}
