//! Recognizes `self.logger.<level>(...)` calls.

use tree_sitter::Node;

use super::is_receiver_attribute;
use super::options::RewriteOptions;

/// Result of matching a call expression against the logging convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMatch<'t> {
    NotMatched,
    Matched(LoggingCall<'t>),
}

/// A call of shape `<receiver>.<logger>.<level>(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingCall<'t> {
    pub call: Node<'t>,
    pub level: &'t str,
    /// First positional argument, when there is one that can be rewritten.
    pub message: Option<Node<'t>>,
}

/// Match a `call` node. Any deviation from the convention is `NotMatched`.
pub fn match_logging_call<'t>(
    call: Node<'t>,
    source: &'t str,
    options: &RewriteOptions,
) -> CallMatch<'t> {
    if call.kind() != "call" {
        return CallMatch::NotMatched;
    }
    let Some(callee) = call.child_by_field_name("function") else {
        return CallMatch::NotMatched;
    };
    if callee.kind() != "attribute" {
        return CallMatch::NotMatched;
    }
    let (Some(object), Some(method)) = (
        callee.child_by_field_name("object"),
        callee.child_by_field_name("attribute"),
    ) else {
        return CallMatch::NotMatched;
    };

    let level = &source[method.byte_range()];
    if !options.is_level(level)
        || !is_receiver_attribute(object, source, &options.receiver, &options.logger_attribute)
    {
        return CallMatch::NotMatched;
    }

    let message = call
        .child_by_field_name("arguments")
        .and_then(first_positional_argument);

    CallMatch::Matched(LoggingCall {
        call,
        level,
        message,
    })
}

/// The first positional argument of an `argument_list`.
///
/// Splats (`*args`, `**kwargs`) and a bare generator argument
/// (`f(x for x in y)`) cannot be wrapped into a string, so they yield `None`.
fn first_positional_argument(arguments: Node<'_>) -> Option<Node<'_>> {
    if arguments.kind() != "argument_list" {
        return None;
    }
    let mut cursor = arguments.walk();
    let first = arguments
        .named_children(&mut cursor)
        .find(|arg| !matches!(arg.kind(), "comment" | "keyword_argument"))?;

    match first.kind() {
        "list_splat" | "dictionary_splat" | "parenthesized_list_splat" => None,
        _ => Some(first),
    }
}
