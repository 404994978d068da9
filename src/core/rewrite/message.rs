//! Message classification and the session-prefixed replacement builder.
//!
//! Every message shape ends up as one f-string whose first segment is the
//! session reference and whose second segment is [`SEPARATOR`]. The original
//! message follows, unchanged in content and order.

use std::ops::Range;

use tree_sitter::Node;

use super::is_receiver_attribute;
use super::options::{RewriteOptions, SEPARATOR};
use crate::core::parsers::printer::{Edit, render_range};

/// Shape of the first positional argument of a logging call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageArgument<'t> {
    /// A string literal without interpolation.
    PlainLiteral(StringLiteral<'t>),
    /// An f-string.
    Interpolated(StringLiteral<'t>),
    /// Any other expression: names, calls, bytes, concatenations...
    Other(Node<'t>),
}

/// A single `string` node split into prefix, quote and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLiteral<'t> {
    pub node: Node<'t>,
    pub prefix: &'t str,
    pub quote: &'t str,
    body_start: usize,
    body_end: usize,
}

impl<'t> StringLiteral<'t> {
    fn from_node(node: Node<'t>, source: &'t str) -> Option<Self> {
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        let start = children.iter().find(|c| c.kind() == "string_start")?;
        let end = children.iter().rev().find(|c| c.kind() == "string_end")?;

        let opening = &source[start.byte_range()];
        let quote_at = opening.find(['"', '\''])?;
        Some(Self {
            node,
            prefix: &opening[..quote_at],
            quote: &opening[quote_at..],
            body_start: start.end_byte(),
            body_end: end.start_byte(),
        })
    }

    pub fn body(&self) -> Range<usize> {
        self.body_start..self.body_end
    }

    pub fn is_raw(&self) -> bool {
        self.prefix.contains(['r', 'R'])
    }

    fn has_prefix(&self, flag: char) -> bool {
        self.prefix
            .chars()
            .any(|c| c.eq_ignore_ascii_case(&flag))
    }

    fn interpolations(&self) -> Vec<Node<'t>> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "interpolation")
            .collect()
    }

    /// Byte ranges of the body split into literal and replacement-field
    /// segments, in source order. Empty literal gaps are omitted.
    pub fn segment_ranges(&self) -> Vec<(SegmentKind, Range<usize>)> {
        let mut segments = Vec::new();
        let mut cursor = self.body_start;
        for field in self.interpolations() {
            if field.start_byte() > cursor {
                segments.push((SegmentKind::Literal, cursor..field.start_byte()));
            }
            segments.push((SegmentKind::Expression, field.byte_range()));
            cursor = field.end_byte();
        }
        if self.body_end > cursor {
            segments.push((SegmentKind::Literal, cursor..self.body_end));
        }
        segments
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Literal,
    Expression,
}

/// One piece of an f-string body, in source form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text between replacement fields, braces already doubled.
    Literal(String),
    /// A replacement field including its braces, e.g. `{task!r}`.
    Expression(String),
}

impl Segment {
    fn as_source(&self) -> &str {
        match self {
            Segment::Literal(text) | Segment::Expression(text) => text,
        }
    }
}

/// A newly constructed f-string node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolatedString {
    pub prefix: String,
    pub quote: String,
    pub segments: Vec<Segment>,
}

impl InterpolatedString {
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.prefix);
        out.push_str(&self.quote);
        for segment in &self.segments {
            out.push_str(segment.as_source());
        }
        out.push_str(&self.quote);
        out
    }
}

impl<'t> MessageArgument<'t> {
    /// Classify an argument node. Every node lands in exactly one bucket.
    pub fn classify(node: Node<'t>, source: &'t str) -> Self {
        if node.kind() != "string" {
            return MessageArgument::Other(node);
        }
        match StringLiteral::from_node(node, source) {
            Some(literal) if literal.has_prefix('b') || literal.has_prefix('t') => {
                MessageArgument::Other(node)
            }
            Some(literal) if literal.has_prefix('f') => MessageArgument::Interpolated(literal),
            Some(literal) => MessageArgument::PlainLiteral(literal),
            None => MessageArgument::Other(node),
        }
    }

    pub fn node(&self) -> Node<'t> {
        match self {
            MessageArgument::PlainLiteral(literal) | MessageArgument::Interpolated(literal) => {
                literal.node
            }
            MessageArgument::Other(node) => *node,
        }
    }

    /// Whether the message already starts with the session reference.
    ///
    /// Only the first segment is inspected; a reference further into the
    /// message does not count.
    pub fn is_enriched(&self, source: &str, options: &RewriteOptions) -> bool {
        let MessageArgument::Interpolated(literal) = self else {
            return false;
        };
        literal
            .interpolations()
            .first()
            .filter(|field| field.start_byte() == literal.body_start)
            .is_some_and(|field| is_session_reference_field(*field, source, options))
    }

    /// Build the replacement f-string for this message.
    ///
    /// `edits` are rewrites already made to nodes nested inside the message;
    /// they are carried into the new segments. `enclosing_quotes` are the
    /// quote characters of f-strings the message itself sits in.
    ///
    /// Returns `None` when the message cannot be embedded in an f-string that
    /// parses before Python 3.12: an expression containing a backslash, or no
    /// quote left that differs from the enclosing ones.
    pub fn prefixed(
        &self,
        source: &str,
        edits: &[Edit],
        options: &RewriteOptions,
        enclosing_quotes: &[char],
    ) -> Option<InterpolatedString> {
        let mut segments = vec![
            Segment::Expression(format!("{{{}}}", options.session_reference())),
            Segment::Literal(SEPARATOR.to_string()),
        ];

        match self {
            MessageArgument::PlainLiteral(literal) => {
                let text = render_range(source, literal.body(), edits);
                segments.push(Segment::Literal(escape_braces(&text, literal.is_raw())));
                Some(InterpolatedString {
                    prefix: fstring_prefix(literal.prefix),
                    quote: literal.quote.to_string(),
                    segments,
                })
            }
            MessageArgument::Interpolated(literal) => {
                segments.extend(literal.segment_ranges().into_iter().map(|(kind, range)| {
                    let text = render_range(source, range, edits);
                    match kind {
                        SegmentKind::Literal => Segment::Literal(text),
                        SegmentKind::Expression => Segment::Expression(text),
                    }
                }));
                Some(InterpolatedString {
                    prefix: literal.prefix.to_string(),
                    quote: literal.quote.to_string(),
                    segments,
                })
            }
            MessageArgument::Other(node) => {
                let text = render_range(source, node.byte_range(), edits);
                if text.contains('\\') {
                    return None;
                }
                let quote = choose_quote(&text, enclosing_quotes)?;
                segments.push(Segment::Expression(wrap_expression(node.kind(), &text)));
                Some(InterpolatedString {
                    prefix: "f".to_string(),
                    quote: quote.to_string(),
                    segments,
                })
            }
        }
    }
}

/// `{self.session_id}` with no conversion, format spec or `=` marker.
fn is_session_reference_field(field: Node<'_>, source: &str, options: &RewriteOptions) -> bool {
    if field.child_by_field_name("type_conversion").is_some()
        || field.child_by_field_name("format_specifier").is_some()
    {
        return false;
    }
    let mut cursor = field.walk();
    if field.children(&mut cursor).any(|c| c.kind() == "=") {
        return false;
    }
    field
        .child_by_field_name("expression")
        .is_some_and(|expr| {
            is_receiver_attribute(expr, source, &options.receiver, &options.session_attribute)
        })
}

/// Prefix for the f-string made from a plain literal. `u` cannot be combined
/// with `f`; `r` is kept so escapes keep their meaning.
fn fstring_prefix(prefix: &str) -> String {
    let mut out: String = prefix
        .chars()
        .filter(|c| !c.eq_ignore_ascii_case(&'u'))
        .collect();
    out.push('f');
    out
}

/// Double literal braces. `\N{NAME}` escapes in non-raw strings keep their
/// single braces.
fn escape_braces(text: &str, raw: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if !raw => {
                out.push(c);
                let Some(escaped) = chars.next() else {
                    break;
                };
                match escaped {
                    // `\{` is not an escape; the brace is still literal text.
                    '{' => out.push_str("{{"),
                    '}' => out.push_str("}}"),
                    _ => out.push(escaped),
                }
                if escaped == 'N' && chars.peek() == Some(&'{') {
                    for named in chars.by_ref() {
                        out.push(named);
                        if named == '}' {
                            break;
                        }
                    }
                }
            }
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            _ => out.push(c),
        }
    }
    out
}

/// Replacement field for an arbitrary expression.
fn wrap_expression(kind: &str, text: &str) -> String {
    match kind {
        // A top-level `:` would start a format spec.
        "lambda" | "named_expression" => format!("{{({text})}}"),
        // `{{` would be read as an escaped brace.
        _ if text.starts_with('{') => format!("{{ {text}}}"),
        _ => format!("{{{text}}}"),
    }
}

/// Pick a quote that clashes neither with the embedded expression nor with
/// the f-strings the new one will be nested in.
fn choose_quote(expression: &str, enclosing_quotes: &[char]) -> Option<&'static str> {
    let multiline = expression.contains('\n');
    ["\"", "'", "\"\"\"", "'''"].into_iter().find(|quote| {
        if quote.starts_with(enclosing_quotes) {
            return false;
        }
        if quote.len() == 1 {
            !multiline && !expression.contains(quote)
        } else {
            !expression.contains(quote)
        }
    })
}

/// Quote character of a `string` node, e.g. `'` for `rf'...'`.
pub(super) fn quote_char(node: Node<'_>, source: &str) -> Option<char> {
    let start = node.child(0).filter(|c| c.kind() == "string_start")?;
    source[start.byte_range()]
        .chars()
        .find(|c| matches!(c, '"' | '\''))
}
