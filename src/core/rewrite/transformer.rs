use tree_sitter::Node;

use super::call_site::{CallMatch, LoggingCall, match_logging_call};
use super::eligibility::ClassScope;
use super::message::{MessageArgument, quote_char};
use super::options::RewriteOptions;
use crate::core::parsers::printer::Edit;
use crate::core::parsers::python::{SyntaxTree, node_column, node_line};

/// A logging call whose message was prefixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenCall {
    pub line: usize,
    pub col: usize,
    pub level: String,
    /// Original message argument text.
    pub before: String,
    /// Replacement message argument text.
    pub after: String,
}

/// Outcome of one transformation pass over a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
    pub edits: Vec<Edit>,
    pub calls: Vec<RewrittenCall>,
}

impl Rewrite {
    /// Whether any call site was rewritten. Unmodified files are never printed.
    pub fn is_modified(&self) -> bool {
        !self.edits.is_empty()
    }
}

/// Walks a module and prefixes logging messages in eligible classes.
///
/// Eligibility is threaded through the recursion as a parameter: entering a
/// class replaces it with that class's own flag, and leaving the class
/// restores the caller's value simply by returning.
pub struct SessionTagger<'a> {
    source: &'a str,
    options: &'a RewriteOptions,
    calls: Vec<RewrittenCall>,
    /// Quote characters of the strings whose replacement fields enclose the
    /// node being visited, outermost first.
    enclosing_quotes: Vec<char>,
}

impl<'a> SessionTagger<'a> {
    pub fn new(source: &'a str, options: &'a RewriteOptions) -> Self {
        Self {
            source,
            options,
            calls: Vec::new(),
            enclosing_quotes: Vec::new(),
        }
    }

    pub fn rewrite(tree: &SyntaxTree, options: &RewriteOptions) -> Rewrite {
        let mut tagger = SessionTagger::new(tree.source(), options);
        let mut edits = tagger.visit(tree.root(), false);
        edits.sort_by_key(|e| e.range.start);
        tagger.calls.sort_by_key(|c| (c.line, c.col));
        Rewrite {
            edits,
            calls: tagger.calls,
        }
    }

    /// Returns the edits made within `node`, sorted and non-overlapping.
    fn visit(&mut self, node: Node<'a>, eligible: bool) -> Vec<Edit> {
        match node.kind() {
            "class_definition" => {
                let scope = ClassScope::enter(node, self.source, self.options);
                if !scope.has_session_identifier {
                    tracing::debug!(
                        line = node_line(&node),
                        "class has no session identifier, skipping its calls"
                    );
                }
                self.visit_children(node, scope.has_session_identifier)
            }
            "call" if eligible => self.visit_call(node),
            "string" => match quote_char(node, self.source) {
                Some(quote) => {
                    self.enclosing_quotes.push(quote);
                    let edits = self.visit_children(node, eligible);
                    self.enclosing_quotes.pop();
                    edits
                }
                None => self.visit_children(node, eligible),
            },
            _ => self.visit_children(node, eligible),
        }
    }

    fn visit_children(&mut self, node: Node<'a>, eligible: bool) -> Vec<Edit> {
        let mut cursor = node.walk();
        let children: Vec<Node<'a>> = node.named_children(&mut cursor).collect();
        children
            .into_iter()
            .flat_map(|child| self.visit(child, eligible))
            .collect()
    }

    fn visit_call(&mut self, node: Node<'a>) -> Vec<Edit> {
        // Inner calls first, so a rewritten message can embed them.
        let inner = self.visit_children(node, true);

        let CallMatch::Matched(call) = match_logging_call(node, self.source, self.options) else {
            return inner;
        };
        match self.rewrite_message(&call, &inner) {
            Some(edit) => {
                let mut edits: Vec<Edit> = inner
                    .into_iter()
                    .filter(|e| !e.is_within(&edit.range))
                    .collect();
                edits.push(edit);
                edits.sort_by_key(|e| e.range.start);
                edits
            }
            None => inner,
        }
    }

    fn rewrite_message(&mut self, call: &LoggingCall<'a>, inner: &[Edit]) -> Option<Edit> {
        let argument = call.message?;
        let message = MessageArgument::classify(argument, self.source);
        if message.is_enriched(self.source, self.options) {
            return None;
        }

        let Some(built) =
            message.prefixed(self.source, inner, self.options, &self.enclosing_quotes)
        else {
            tracing::debug!(
                line = node_line(&call.call),
                "message cannot be embedded in an f-string, leaving call unchanged"
            );
            return None;
        };
        let replacement = built.to_source();
        self.calls.push(RewrittenCall {
            line: node_line(&call.call),
            col: node_column(&call.call),
            level: call.level.to_string(),
            before: self.source[argument.byte_range()].to_string(),
            after: replacement.clone(),
        });
        Some(Edit::replace(argument.byte_range(), replacement))
    }
}
