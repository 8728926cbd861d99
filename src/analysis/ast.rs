//! AST normalization: concrete tree-sitter trees into [`AstNode`] trees.

use tree_sitter::Node;

use crate::analysis::model::AstNode;

/// Depth meaning "no limit".
pub const UNLIMITED_DEPTH: i32 = -1;

/// Build a normalized AST from a concrete syntax tree node.
///
/// `max_depth` bounds recursion: -1 is unlimited, 0 materializes the
/// root with no children. Text is populated whenever the output
/// children array ends up empty - whether the node is a true leaf or
/// the depth limit cut it off - and is the exact UTF-8 slice of the
/// node's byte span.
///
/// Normalization cannot fail on a well-formed provider tree.
pub fn build_ast(node: Node, source: &[u8], max_depth: i32) -> AstNode {
    build_ast_at(node, source, 0, max_depth)
}

fn build_ast_at(node: Node, source: &[u8], depth: i32, max_depth: i32) -> AstNode {
    let mut children = Vec::new();
    if max_depth == UNLIMITED_DEPTH || depth < max_depth {
        let mut cursor = node.walk();
        children = node
            .children(&mut cursor)
            .map(|child| build_ast_at(child, source, depth + 1, max_depth))
            .collect();
    }

    let text = if children.is_empty() {
        Some(node.utf8_text(source).unwrap_or("").to_string())
    } else {
        None
    };

    AstNode {
        kind: node.kind().to_string(),
        start_point: node.start_position().into(),
        end_point: node.end_position().into(),
        children,
        text,
        id: Some(node.id()),
    }
}

/// Collect human-readable notes for syntax errors in a tree.
///
/// ERROR nodes mark unparseable regions; missing nodes mark tokens the
/// parser inserted to recover. Both degrade the result without failing
/// the call.
pub fn syntax_errors(root: Node) -> Vec<String> {
    let mut errors = Vec::new();
    if root.has_error() {
        collect_errors(root, &mut errors);
    }
    errors
}

fn collect_errors(node: Node, errors: &mut Vec<String>) {
    if node.is_error() {
        let p = node.start_position();
        errors.push(format!("syntax error at {}:{}", p.row, p.column));
        return;
    }
    if node.is_missing() {
        let p = node.start_position();
        errors.push(format!("missing {} at {}:{}", node.kind(), p.row, p.column));
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, errors);
    }
}
