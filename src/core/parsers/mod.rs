//! Parsing and printing of Python source.
//!
//! - `python`: tree-sitter based parser producing a [`python::SyntaxTree`]
//! - `printer`: applies byte-range edits to a tree's source and re-validates it

pub mod printer;
pub mod python;
