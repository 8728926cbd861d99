//! Python language analyzer.
//!
//! Symbol policy: functions and classes at any nesting depth, plus
//! assignment targets at module scope (outside any function or class
//! body) as variables.
//!
//! Variable search policy: Python has no declaration form, so
//! `find_variable` returns binding sites (assignment, augmented
//! assignment, walrus, for-loop targets) as kind "variable" and every
//! other matching identifier as kind "reference".

use tree_sitter::Node;

use crate::analysis::model::{CallGraph, CallGraphNode, Location, SearchResult, Symbol};
use crate::analysis::provider::LanguageId;
use crate::analysis::traits::{LanguageAnalyzer, ParsedFile};

pub struct PythonAnalyzer;

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn walk_symbols(
        &self,
        node: Node,
        parsed: &ParsedFile,
        module_scope: bool,
        out: &mut Vec<Symbol>,
    ) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "function_definition" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        out.push(Symbol::from_node(
                            parsed.node_text(name),
                            "function",
                            child,
                            &parsed.path,
                        ));
                    }
                    if let Some(body) = child.child_by_field_name("body") {
                        self.walk_symbols(body, parsed, false, out);
                    }
                }
                "class_definition" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        out.push(Symbol::from_node(
                            parsed.node_text(name),
                            "class",
                            child,
                            &parsed.path,
                        ));
                    }
                    if let Some(body) = child.child_by_field_name("body") {
                        self.walk_symbols(body, parsed, false, out);
                    }
                }
                "assignment" if module_scope => {
                    if let Some(left) = child.child_by_field_name("left") {
                        self.push_targets(left, parsed, out);
                    }
                    // Chained assignment: x = y = 1
                    let mut rhs = child.child_by_field_name("right");
                    while let Some(inner) = rhs {
                        if inner.kind() != "assignment" {
                            break;
                        }
                        if let Some(left) = inner.child_by_field_name("left") {
                            self.push_targets(left, parsed, out);
                        }
                        rhs = inner.child_by_field_name("right");
                    }
                }
                _ => self.walk_symbols(child, parsed, module_scope, out),
            }
        }
    }

    fn push_targets(&self, target: Node, parsed: &ParsedFile, out: &mut Vec<Symbol>) {
        match target.kind() {
            "identifier" => {
                out.push(Symbol::from_node(
                    parsed.node_text(target),
                    "variable",
                    target,
                    &parsed.path,
                ));
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" => {
                let mut cursor = target.walk();
                for item in target.named_children(&mut cursor) {
                    self.push_targets(item, parsed, out);
                }
            }
            // attribute / subscript targets rebind existing objects,
            // not new names
            _ => {}
        }
    }

    fn walk_functions(&self, node: Node, parsed: &ParsedFile, out: &mut Vec<CallGraphNode>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "function_definition" {
                let name = child
                    .child_by_field_name("name")
                    .map(|n| parsed.node_text(n).to_string());
                let body = child.child_by_field_name("body");

                if let Some(name) = name {
                    let mut calls = Vec::new();
                    if let Some(body) = body {
                        self.collect_calls(body, parsed, &mut calls);
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

    fn collect_calls(&self, node: Node, parsed: &ParsedFile, out: &mut Vec<String>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            // Calls inside a nested def belong to that def's own node.
            if child.kind() == "function_definition" {
                continue;
            }
            if child.kind() == "call" {
                if let Some(callee) = child
                    .child_by_field_name("function")
                    .and_then(|f| self.callee_name(f, parsed))
                {
                    if !out.contains(&callee) {
                        out.push(callee);
                    }
                }
            }
            self.collect_calls(child, parsed, out);
        }
    }

    /// Textual terminal identifier of a call target; aliases, attribute
    /// chains, and indirection are not resolved.
    fn callee_name(&self, node: Node, parsed: &ParsedFile) -> Option<String> {
        match node.kind() {
            "identifier" => Some(parsed.node_text(node).to_string()),
            "attribute" => node
                .child_by_field_name("attribute")
                .map(|a| parsed.node_text(a).to_string()),
            "call" => node
                .child_by_field_name("function")
                .and_then(|f| self.callee_name(f, parsed)),
            "parenthesized_expression" => node
                .named_child(0)
                .and_then(|inner| self.callee_name(inner, parsed)),
            _ => None,
        }
    }

    fn is_binding_site(&self, node: Node) -> bool {
        let Some(parent) = node.parent() else {
            return false;
        };
        let node_id = Some(node.id());
        match parent.kind() {
            "assignment" | "augmented_assignment" => {
                parent.child_by_field_name("left").map(|n| n.id()) == node_id
            }
            "named_expression" => parent.child_by_field_name("name").map(|n| n.id()) == node_id,
            "for_statement" => parent.child_by_field_name("left").map(|n| n.id()) == node_id,
            "pattern_list" | "tuple_pattern" | "list_pattern" => self.is_binding_site(parent),
            _ => false,
        }
    }

    fn walk_variables(&self, node: Node, parsed: &ParsedFile, name: &str, out: &mut Vec<Symbol>) {
        if node.kind() == "identifier" && parsed.node_text(node) == name {
            let kind = if self.is_binding_site(node) {
                "variable"
            } else {
                "reference"
            };
            out.push(Symbol::from_node(name, kind, node, &parsed.path));
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_variables(child, parsed, name, out);
        }
    }

    fn collect_deps(&self, node: Node, parsed: &ParsedFile, out: &mut Vec<String>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "import_statement" => {
                    // import a, b as c -> "a", "b"
                    let mut names = child.walk();
                    for name in child.children_by_field_name("name", &mut names) {
                        match name.kind() {
                            "dotted_name" => out.push(parsed.node_text(name).to_string()),
                            "aliased_import" => {
                                if let Some(module) = name.child_by_field_name("name") {
                                    out.push(parsed.node_text(module).to_string());
                                }
                            }
                            _ => {}
                        }
                    }
                }
                "import_from_statement" => {
                    // from a.b import c -> "a.b"; relative forms verbatim
                    if let Some(module) = child.child_by_field_name("module_name") {
                        out.push(parsed.node_text(module).to_string());
                    }
                }
                _ => self.collect_deps(child, parsed, out),
            }
        }
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for PythonAnalyzer {
    fn language(&self) -> LanguageId {
        LanguageId::Python
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py"]
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
