//! loctext - compile-time i18n key extraction and table synchronization.
//!
//! loctext is a CLI tool and library that scans a TypeScript/JavaScript program for
//! calls to marked localization functions, keeps per-language resource tables in
//! sync with the keys the code uses, rewrites call sites to compact numeric indices
//! once every language has a translation, and can fill missing translations through
//! a machine-translation backend.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands and report printing)
//! - `config`: Configuration file loading and parsing
//! - `core`: The engine (program model, extraction, synchronization, minification, translation)
//! - `issues`: Issue type definitions and reporting
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;
