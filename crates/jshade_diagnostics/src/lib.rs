//! jshade_diagnostics: Diagnostic messages and the fatal error taxonomy.
//!
//! Diagnostics carry structured information about where a transformation
//! run went wrong. Every error in this crate is fatal: an obfuscation run
//! either completes fully or aborts without producing output, because a
//! half-renamed tree is not behavior-preserving.

use jshade_core::text::TextSpan;
use std::fmt;
use thiserror::Error;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1001).
    pub code: u32,
    /// The category of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc.
    pub message: &'static str,
}

/// Message templates for every fault the obfuscation core can report.
pub mod messages {
    use super::{DiagnosticCategory, DiagnosticMessage};

    /// A declaration site does not hold the identifier node it must have.
    pub const EXPECTED_BINDING_IDENTIFIER: DiagnosticMessage = DiagnosticMessage {
        code: 1001,
        category: DiagnosticCategory::Error,
        message: "Expected an identifier in the binding position of a '{0}' node",
    };

    /// The name generator ran out of globally unique candidates.
    pub const NAME_GENERATION_EXHAUSTED: DiagnosticMessage = DiagnosticMessage {
        code: 1002,
        category: DiagnosticCategory::Error,
        message: "Unable to generate a further collision-free identifier after {0} attempts",
    };

    /// A node kind reached a transformer that does not handle it.
    pub const UNSUPPORTED_NODE_KIND: DiagnosticMessage = DiagnosticMessage {
        code: 1003,
        category: DiagnosticCategory::Error,
        message: "Node kind '{0}' is not supported by the {1}",
    };
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The source text span where this diagnostic occurred, if known.
    pub span: Option<TextSpan>,
    /// The resolved message text.
    pub message_text: String,
    /// The diagnostic code.
    pub code: u32,
    /// The category.
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a new diagnostic with span info.
    pub fn with_span(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: Some(span),
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = self.span {
            write!(f, "{}: ", span)?;
        }
        write!(f, "{} JS{}: {}", self.category, self.code, self.message_text)
    }
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Fatal faults that abort an obfuscation run.
///
/// All three variants are deterministic input-shape faults; retrying a run
/// with the same input cannot succeed, so none are recoverable.
#[derive(Debug, Error)]
pub enum ObfuscationError {
    /// A declaration node lacks the structure required to extract a binding
    /// target (malformed input tree).
    #[error("{0}")]
    ScopeResolution(Diagnostic),

    /// The name generator cannot produce a further globally-unique name.
    #[error("{0}")]
    NameGenerationExhausted(Diagnostic),

    /// A node kind reached a transformer that does not know how to handle it.
    #[error("{0}")]
    UnsupportedNode(Diagnostic),
}

impl ObfuscationError {
    /// The realized diagnostic behind this error.
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            ObfuscationError::ScopeResolution(d)
            | ObfuscationError::NameGenerationExhausted(d)
            | ObfuscationError::UnsupportedNode(d) => d,
        }
    }
}
