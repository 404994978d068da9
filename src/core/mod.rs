//! Core engine.
//!
//! - `parsers`: Python parsing and edit printing (tree-sitter)
//! - `rewrite`: the session-id rewrite pass over one syntax tree
//! - `file_scanner`: Python source discovery
//! - `patcher`: per-file read, rewrite and atomic write, batched with rayon

pub mod file_scanner;
pub mod parsers;
pub mod patcher;
pub mod rewrite;
