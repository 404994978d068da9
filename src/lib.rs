//! sidtag - session-id tagging for Python logging calls
//!
//! sidtag rewrites Python sources so that every `self.logger.<level>(...)` call
//! made inside a class that assigns `self.session_id` carries the session
//! identifier in front of its message, e.g.
//! `self.logger.info(f"{self.session_id} | started {task}")`.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (`patch`, `init`)
//! - `config`: Configuration file loading and parsing
//! - `core`: Parsing, the rewrite pass, file discovery and the batch patcher

pub mod cli;
pub mod config;
pub mod core;
