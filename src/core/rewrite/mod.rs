//! Session-id rewrite pass.
//!
//! ```text
//! SessionTagger (per module, threads class eligibility)
//!     ↓ class_definition
//! ClassScope::enter (does a method assign self.session_id?)
//!     ↓ call, inside an eligible class
//! match_logging_call (self.logger.<level>(...)?)
//!     ↓ first positional argument
//! MessageArgument::classify → is_enriched → prefixed
//!     ↓
//! Edit over the argument's byte range
//! ```

mod call_site;
mod eligibility;
mod message;
mod options;
mod transformer;

use tree_sitter::Node;

pub use call_site::{CallMatch, LoggingCall, match_logging_call};
pub use eligibility::{ClassScope, assigns_session_identifier};
pub use message::{InterpolatedString, MessageArgument, Segment, StringLiteral};
pub use options::{
    DEFAULT_LEVELS, DEFAULT_LOGGER_ATTRIBUTE, DEFAULT_RECEIVER, DEFAULT_SESSION_ATTRIBUTE,
    EligibilityRule, RewriteOptions, SEPARATOR,
};
pub use transformer::{Rewrite, RewrittenCall, SessionTagger};

use super::parsers::python::SyntaxTree;

/// Run the rewrite pass over a parsed module.
pub fn rewrite_module(tree: &SyntaxTree, options: &RewriteOptions) -> Rewrite {
    SessionTagger::rewrite(tree, options)
}

/// `<receiver>.<attribute>` where the receiver is a bare name.
pub(crate) fn is_receiver_attribute(
    node: Node<'_>,
    source: &str,
    receiver: &str,
    attribute: &str,
) -> bool {
    if node.kind() != "attribute" {
        return false;
    }
    let (Some(object), Some(name)) = (
        node.child_by_field_name("object"),
        node.child_by_field_name("attribute"),
    ) else {
        return false;
    };
    object.kind() == "identifier"
        && &source[object.byte_range()] == receiver
        && &source[name.byte_range()] == attribute
}
