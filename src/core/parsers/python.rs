use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

const UTF8_BOM: char = '\u{feff}';

/// Why a source file could not be turned into a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("failed to load the Python grammar: {0}")]
    Grammar(String),
    #[error("parser produced no tree")]
    Aborted,
    #[error("invalid syntax at {line}:{column}")]
    Syntax { line: usize, column: usize },
}

/// A parsed Python module together with the text it was parsed from.
///
/// Node byte ranges always index into [`SyntaxTree::source`]. A leading BOM is
/// stripped before parsing and restored by the printer.
pub struct SyntaxTree {
    source: String,
    tree: Tree,
    has_bom: bool,
}

impl SyntaxTree {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn has_bom(&self) -> bool {
        self.has_bom
    }

    pub fn text(&self, node: Node<'_>) -> &str {
        node_text(&node, &self.source)
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("len", &self.source.len())
            .field("has_bom", &self.has_bom)
            .finish()
    }
}

/// Parse Python source into a [`SyntaxTree`].
///
/// tree-sitter recovers from most syntax errors by inserting ERROR or MISSING
/// nodes. A tree containing any of them is rejected: rewriting around a
/// recovered region could splice text into the wrong place.
pub fn parse_python(code: &str) -> Result<SyntaxTree, ParseError> {
    let (source, has_bom) = match code.strip_prefix(UTF8_BOM) {
        Some(stripped) => (stripped.to_string(), true),
        None => (code.to_string(), false),
    };

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseError::Grammar(e.to_string()))?;

    let tree = parser.parse(&source, None).ok_or(ParseError::Aborted)?;

    let root = tree.root_node();
    if root.has_error() {
        let position = first_error(root).unwrap_or(root).start_position();
        return Err(ParseError::Syntax {
            line: position.row + 1,
            column: position.column + 1,
        });
    }

    Ok(SyntaxTree {
        source,
        tree,
        has_bom,
    })
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Get text for a tree-sitter node.
pub fn node_text<'a>(node: &Node<'_>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Get the line number for a tree-sitter node (1-indexed).
pub fn node_line(node: &Node<'_>) -> usize {
    node.start_position().row + 1
}

/// Get the column number for a tree-sitter node (1-indexed, in bytes).
pub fn node_column(node: &Node<'_>) -> usize {
    node.start_position().column + 1
}
