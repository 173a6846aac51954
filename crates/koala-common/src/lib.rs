//! Common utilities for the Koala browser.
//!
//! This crate provides shared infrastructure used by all browser components:
//! - **Warning System** - colored terminal output for unsupported features
//! - **Text utilities** - UTF-8/UTF-16 conversion and code point classification

pub mod text;
pub mod warning;
