//! C++ language analyzer.
//!
//! Extends the C node handling with classes, namespaces, alias
//! declarations, and the richer declarator forms: qualified names
//! (`void Foo::bar()` yields symbol "bar"), operator and destructor
//! names taken verbatim, reference declarators, and declarations
//! inside class bodies (members and method prototypes). Template
//! declarations are transparent to the walk.
//!
//! Variable search policy: declaration sites only (declarations,
//! parameters, class members), as in C.

use tree_sitter::Node;

use crate::analysis::model::{CallGraph, CallGraphNode, Location, SearchResult, Symbol};
use crate::analysis::provider::LanguageId;
use crate::analysis::traits::{LanguageAnalyzer, ParsedFile};

use super::c::{callee_name, collect_calls};

/// Declarator wrappers that nest toward the name in C++.
const DECLARATOR_WRAPPERS: &[&str] = &[
    "pointer_declarator",
    "array_declarator",
    "function_declarator",
    "parenthesized_declarator",
    "init_declarator",
    "attributed_declarator",
    "reference_declarator",
    "structured_binding_declarator",
    "variadic_declarator",
];

/// Unwrap nested declarator wrappers to the innermost name-bearing
/// node, descending through qualified names to the terminal identifier.
///
/// The bool marks function declarators, with the same function-pointer
/// caveat as the C analyzer.
fn unwrap_declarator(node: Node) -> Option<(Node, bool)> {
    let mut cur = node;
    let mut last_wrapper = "";
    loop {
        match cur.kind() {
            "identifier" | "field_identifier" | "type_identifier" | "operator_name"
            | "destructor_name" => {
                return Some((cur, last_wrapper == "function_declarator"));
            }
            // Transparent name qualification: Foo::bar, max<int>
            "qualified_identifier" | "template_function" => {
                cur = cur.child_by_field_name("name")?;
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

pub struct CppAnalyzer;

impl CppAnalyzer {
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
                if let Some(ty) = node.child_by_field_name("type") {
                    self.walk_symbols(ty, parsed, file_scope, out);
                }
                // Constructor declarations inside class bodies parse as
                // plain declarations, so function declarators count in
                // any scope; variables only at file/namespace scope.
                let mut cursor = node.walk();
                for declarator in node.children_by_field_name("declarator", &mut cursor) {
                    if let Some((name, is_function)) = unwrap_declarator(declarator) {
                        if is_function {
                            out.push(Symbol::from_node(
                                parsed.node_text(name),
                                "function",
                                declarator,
                                &parsed.path,
                            ));
                        } else if file_scope {
                            out.push(Symbol::from_node(
                                parsed.node_text(name),
                                "variable",
                                declarator,
                                &parsed.path,
                            ));
                        }
                    }
                }
            }
            // Members and method prototypes inside class bodies.
            "field_declaration" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.walk_symbols(ty, parsed, false, out);
                }
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
            "class_specifier" | "struct_specifier" | "union_specifier" => {
                if let (Some(name), Some(body)) = (
                    node.child_by_field_name("name"),
                    node.child_by_field_name("body"),
                ) {
                    let kind = match node.kind() {
                        "class_specifier" => "class",
                        "struct_specifier" => "struct",
                        _ => "union",
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
            // using X = Y;
            "alias_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    out.push(Symbol::from_node(
                        parsed.node_text(name),
                        "typedef",
                        node,
                        &parsed.path,
                    ));
                }
            }
            "namespace_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    out.push(Symbol::from_node(
                        parsed.node_text(name),
                        "namespace",
                        node,
                        &parsed.path,
                    ));
                }
                // Namespace scope declares at file scope.
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk_symbols(body, parsed, file_scope, out);
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
            "declaration"
                | "parameter_declaration"
                | "optional_parameter_declaration"
                | "field_declaration"
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
                    "system_lib_string" => raw.trim_matches(|c| c == '<' || c == '>'),
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

impl Default for CppAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for CppAnalyzer {
    fn language(&self) -> LanguageId {
        LanguageId::Cpp
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["cpp", "cc", "cxx", "h", "hpp"]
    }

    fn identifier_kinds(&self) -> &'static [&'static str] {
        &[
            "identifier",
            "field_identifier",
            "type_identifier",
            "namespace_identifier",
        ]
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
