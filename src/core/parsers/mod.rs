//! File parsers for source code and resource tables.
//!
//! This module provides parsers for different file types:
//! - `source`: TS/TSX/JS/JSX source file parser (uses swc for AST generation)
//! - `table`: Resource table files (boilerplate + one delimited JSON table region)

pub mod source;
pub mod table;
