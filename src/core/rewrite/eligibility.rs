//! Decides whether a class carries a session identifier.

use tree_sitter::Node;

use super::is_receiver_attribute;
use super::options::{EligibilityRule, RewriteOptions};

/// A class definition and whether its instances carry a session identifier.
#[derive(Debug, Clone, Copy)]
pub struct ClassScope<'t> {
    pub node: Node<'t>,
    pub has_session_identifier: bool,
}

impl<'t> ClassScope<'t> {
    /// Evaluate a `class_definition` node on its own. Enclosing classes never
    /// influence the result.
    pub fn enter(node: Node<'t>, source: &str, options: &RewriteOptions) -> Self {
        Self {
            node,
            has_session_identifier: assigns_session_identifier(node, source, options),
        }
    }
}

/// Whether `class` assigns `<receiver>.<session_attribute>`.
///
/// Under [`EligibilityRule::Methods`] only statements inside the class's own
/// methods count (closures inside those methods included, nested classes
/// excluded). Under [`EligibilityRule::ClassBody`] the whole class subtree
/// is searched.
pub fn assigns_session_identifier(class: Node<'_>, source: &str, options: &RewriteOptions) -> bool {
    let Some(body) = class.child_by_field_name("body") else {
        return false;
    };

    match options.eligibility {
        EligibilityRule::ClassBody => contains_session_assignment(body, source, options, true),
        EligibilityRule::Methods => {
            let mut cursor = body.walk();
            body.named_children(&mut cursor)
                .filter_map(method_definition)
                .filter_map(|method| method.child_by_field_name("body"))
                .any(|method_body| contains_session_assignment(method_body, source, options, false))
        }
    }
}

/// Unwrap decorators and return the node if it is a function definition.
fn method_definition(statement: Node<'_>) -> Option<Node<'_>> {
    match statement.kind() {
        "function_definition" => Some(statement),
        "decorated_definition" => statement
            .child_by_field_name("definition")
            .filter(|def| def.kind() == "function_definition"),
        _ => None,
    }
}

fn contains_session_assignment(
    node: Node<'_>,
    source: &str,
    options: &RewriteOptions,
    enter_classes: bool,
) -> bool {
    if node.kind() == "assignment" && is_session_assignment(node, source, options) {
        return true;
    }
    if node.kind() == "class_definition" && !enter_classes {
        return false;
    }

    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
    children
        .into_iter()
        .any(|child| contains_session_assignment(child, source, options, enter_classes))
}

/// `self.session_id = value`, `self.session_id: str = value` or the attribute
/// as one element of a tuple/list target. An annotation without a value
/// declares the attribute but does not assign it.
fn is_session_assignment(assignment: Node<'_>, source: &str, options: &RewriteOptions) -> bool {
    if assignment.child_by_field_name("right").is_none() {
        return false;
    }
    let Some(left) = assignment.child_by_field_name("left") else {
        return false;
    };
    target_contains_session(left, source, options)
}

fn target_contains_session(target: Node<'_>, source: &str, options: &RewriteOptions) -> bool {
    match target.kind() {
        "attribute" => {
            is_receiver_attribute(target, source, &options.receiver, &options.session_attribute)
        }
        "pattern_list" | "tuple_pattern" | "list_pattern" | "parenthesized_expression" => {
            let mut cursor = target.walk();
            let elements: Vec<Node<'_>> = target.named_children(&mut cursor).collect();
            elements
                .into_iter()
                .any(|element| target_contains_session(element, source, options))
        }
        _ => false,
    }
}
