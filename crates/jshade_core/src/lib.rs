//! jshade_core: Core utilities for the jshade obfuscation pipeline.
//!
//! Provides string interning, text spans, and collections used by every
//! phase crate.

pub mod collections;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use intern::{InternedString, StringInterner};
pub use text::{TextRange, TextSpan};
