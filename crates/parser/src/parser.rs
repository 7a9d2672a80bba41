use crate::error::{ParserError, Result};
use crate::types::{CallExpr, ParseTree, SyntaxNode};
use tree_sitter::{Node, Parser};

/// Tree-sitter backed parser producing the condensed declaration/call tree.
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| ParserError::Init(format!("Failed to set language: {e}")))?;

        Ok(Self { parser })
    }

    /// Parse one file's source into a condensed tree.
    ///
    /// Malformed source fails the whole file; callers skip it and continue
    /// with the rest of the workspace.
    pub fn parse(&mut self, source: &str) -> Result<ParseTree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParserError::Parse("Failed to parse source code".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ParserError::Malformed(format!(
                "syntax error near byte {}",
                first_error_offset(root)
            )));
        }

        let mut roots = Vec::new();
        condense_children(root, source, &mut roots);
        Ok(ParseTree::new(roots))
    }

    /// Extract the body text of every function/class declaration named
    /// `name`, in source order. Returns an empty list when nothing matches.
    ///
    /// The body is exactly the byte range of the declaration node, so
    /// decorator lines are not included.
    pub fn declaration_bodies(&mut self, source: &str, name: &str) -> Result<Vec<String>> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParserError::Parse("Failed to parse source code".to_string()))?;

        let mut bodies = Vec::new();
        collect_bodies(tree.root_node(), source, name, &mut bodies);
        Ok(bodies)
    }
}

fn first_error_offset(node: Node) -> usize {
    if node.is_error() || node.is_missing() {
        return node.start_byte();
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error_offset(child);
        }
    }
    node.start_byte()
}

fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

/// Condense all children of `node`, hoisting interesting descendants of
/// collapsed syntax into `out`.
fn condense_children(node: Node, source: &str, out: &mut Vec<SyntaxNode>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        condense(child, source, out);
    }
}

fn condense(node: Node, source: &str, out: &mut Vec<SyntaxNode>) {
    match node.kind() {
        "function_definition" => {
            let Some(name) = node.child_by_field_name("name") else {
                return condense_children(node, source, out);
            };
            let mut children = Vec::new();
            condense_children(node, source, &mut children);
            out.push(SyntaxNode::Function {
                name: node_text(name, source).to_string(),
                children,
            });
        }
        "class_definition" => {
            let Some(name) = node.child_by_field_name("name") else {
                return condense_children(node, source, out);
            };
            let name = node_text(name, source).to_string();
            let excluded = is_excluded_class(&name, node, source);
            let mut children = Vec::new();
            condense_children(node, source, &mut children);
            out.push(SyntaxNode::Class {
                name,
                excluded,
                children,
            });
        }
        "decorated_definition" => {
            // Decorator calls belong to the decorated declaration.
            let mut decorator_calls = Vec::new();
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if child.kind() == "decorator" {
                    condense_children(child, source, &mut decorator_calls);
                }
            }

            let Some(definition) = node.child_by_field_name("definition") else {
                return out.extend(decorator_calls);
            };
            let mut condensed = Vec::new();
            condense(definition, source, &mut condensed);
            match condensed.last_mut() {
                Some(SyntaxNode::Function { children, .. })
                | Some(SyntaxNode::Class { children, .. }) => children.extend(decorator_calls),
                _ => condensed.extend(decorator_calls),
            }
            out.extend(condensed);
        }
        "call" => match classify_call(node, source) {
            Some(expr) => {
                let mut children = Vec::new();
                if let Some(arguments) = node.child_by_field_name("arguments") {
                    condense_children(arguments, source, &mut children);
                }
                out.push(SyntaxNode::Call { expr, children });
            }
            // Unusable callee/receiver: drop the call, keep walking its
            // arguments so nested calls are not lost.
            None => condense_children(node, source, out),
        },
        _ => condense_children(node, source, out),
    }
}

/// Reduce a call to simple names, or report it unusable.
fn classify_call(node: Node, source: &str) -> Option<CallExpr> {
    let function = node.child_by_field_name("function")?;
    match function.kind() {
        "identifier" => Some(CallExpr::Bare {
            callee: node_text(function, source).to_string(),
        }),
        "attribute" => {
            let object = function.child_by_field_name("object")?;
            let attribute = function.child_by_field_name("attribute")?;
            if object.kind() != "identifier" {
                return None;
            }
            Some(CallExpr::Qualified {
                receiver: node_text(object, source).to_string(),
                method: node_text(attribute, source).to_string(),
            })
        }
        _ => None,
    }
}

/// Abstract-base classes and test classes never qualify their methods.
fn is_excluded_class(name: &str, node: Node, source: &str) -> bool {
    if name.starts_with("Test") {
        return true;
    }

    let Some(superclasses) = node.child_by_field_name("superclasses") else {
        return false;
    };
    let mut cursor = superclasses.walk();
    for base in superclasses.named_children(&mut cursor) {
        let text = node_text(base, source);
        if text == "ABC" || text.ends_with(".ABC") {
            return true;
        }
    }
    false
}

fn collect_bodies(node: Node, source: &str, name: &str, bodies: &mut Vec<String>) {
    if matches!(node.kind(), "function_definition" | "class_definition") {
        if let Some(ident) = node.child_by_field_name("name") {
            if node_text(ident, source) == name {
                bodies.push(node_text(node, source).to_string());
            }
        }
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_bodies(child, source, name, bodies);
    }
}
