//! Literal re-encoding.
//!
//! Encoding only rewrites a literal's verbatim rendering; the semantic
//! value is never changed, so every encoded literal still decodes to the
//! value it carried before.

use jshade_ast::node::{NodeArena, NodeKind};
use jshade_ast::types::{LiteralValue, NodeId, Verbatim};
use jshade_diagnostics::{messages, Diagnostic, ObfuscationError};
use jshade_options::{NumericEncoding, ObfuscationOptions, StringEncoding};

/// The largest f64 that is still an exact integer (2^53 - 1). Values above
/// it cannot round-trip through `u64` formatting.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Re-renders literal nodes according to the configured encodings.
/// Stateless apart from configuration; encoding the same value twice
/// produces the same rendering.
pub struct LiteralEncoder {
    string_encoding: StringEncoding,
    numeric_encoding: NumericEncoding,
}

impl LiteralEncoder {
    pub fn new(options: &ObfuscationOptions) -> Self {
        Self {
            string_encoding: options.string_literal_encoding,
            numeric_encoding: options.numeric_literal_encoding,
        }
    }

    /// Encode the literal at `node`. Returns whether the rendering changed.
    pub fn encode(
        &self,
        arena: &mut NodeArena,
        node: NodeId,
    ) -> Result<bool, ObfuscationError> {
        let n = arena.get(node);
        let literal = match &n.kind {
            NodeKind::Literal(literal) => literal,
            other => {
                return Err(ObfuscationError::UnsupportedNode(Diagnostic::with_span(
                    n.span,
                    &messages::UNSUPPORTED_NODE_KIND,
                    &[other.name(), "literal encoder"],
                )))
            }
        };

        let encoded = match &literal.value {
            LiteralValue::String(value) => match self.string_encoding {
                StringEncoding::Disabled => None,
                StringEncoding::HexEscape => {
                    let quote = quote_of(&literal.raw);
                    Some(format!("{}{}{}", quote, hex_escape(value), quote))
                }
            },
            LiteralValue::Number(value) => match self.numeric_encoding {
                NumericEncoding::Disabled => None,
                NumericEncoding::AlternateBase => hex_number(*value),
            },
            // Booleans and null keep their keyword rendering. The
            // configuration surface accepts them so a rendering policy can
            // be added without changing callers.
            LiteralValue::Boolean(_) | LiteralValue::Null => None,
        };

        match encoded {
            Some(content) => {
                if let NodeKind::Literal(literal) = &mut arena.get_mut(node).kind {
                    literal.verbatim = Verbatim::primary(content);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// The quote character of a rendered string literal. Falls back to single
/// quotes for synthesized literals with no quoted raw text.
fn quote_of(raw: &str) -> char {
    match raw.chars().next() {
        Some('"') => '"',
        _ => '\'',
    }
}

/// Escape every character of `value` as `\xNN` (code points up to 0xFF) or
/// `\uNNNN` UTF-16 units (everything above). The result decodes back to
/// `value` under JS string escape semantics.
fn hex_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 4);
    let mut units = [0u16; 2];
    for ch in value.chars() {
        let cp = ch as u32;
        if cp <= 0xFF {
            out.push_str(&format!("\\x{:02x}", cp));
        } else {
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// Hexadecimal rendering for finite, non-negative integral numbers within
/// exact-integer range. Anything else keeps its default rendering.
fn hex_number(value: f64) -> Option<String> {
    let eligible = value.is_finite()
        && value >= 0.0
        && value.fract() == 0.0
        && value <= MAX_SAFE_INTEGER
        && !value.is_sign_negative();
    if eligible {
        Some(format!("0x{:x}", value as u64))
    } else {
        None
    }
}
