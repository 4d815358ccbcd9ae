//! jshade_options: obfuscation run configuration.
//!
//! Options load directly from JSON with the camelCase key names clients
//! use; every field has a default, so partial option files are fine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How string literal renderings are re-encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StringEncoding {
    /// Leave the literal's rendering alone.
    Disabled,
    /// Rewrite every character as a hexadecimal escape sequence.
    #[default]
    HexEscape,
}

/// How numeric literal renderings are re-encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumericEncoding {
    /// Leave the literal's rendering alone.
    Disabled,
    /// Render eligible integers in a non-decimal base.
    #[default]
    AlternateBase,
}

/// Configuration for one obfuscation run.
///
/// Renaming and both literal encodings are on by default; use
/// [`ObfuscationOptions::transforms_disabled`] for a run that only
/// analyzes scopes without changing the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObfuscationOptions {
    /// Replace every program-bound identifier with a generated name.
    pub identifier_renaming: bool,
    /// Declared names that must never be renamed even when bound.
    pub reserved_names: BTreeSet<String>,
    pub string_literal_encoding: StringEncoding,
    pub numeric_literal_encoding: NumericEncoding,
}

impl Default for ObfuscationOptions {
    fn default() -> Self {
        Self {
            identifier_renaming: true,
            reserved_names: BTreeSet::new(),
            string_literal_encoding: StringEncoding::default(),
            numeric_literal_encoding: NumericEncoding::default(),
        }
    }
}

impl ObfuscationOptions {
    /// Every transformation switched off. Scope analysis still runs.
    pub fn transforms_disabled() -> Self {
        Self {
            identifier_renaming: false,
            reserved_names: BTreeSet::new(),
            string_literal_encoding: StringEncoding::Disabled,
            numeric_literal_encoding: NumericEncoding::Disabled,
        }
    }

    /// Whether `name` is on the reserved list.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_names.contains(name)
    }
}

/// Parse an options document from a JSON string.
pub fn parse_options(content: &str) -> Result<ObfuscationOptions, serde_json::Error> {
    serde_json::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_all_transforms() {
        let options = ObfuscationOptions::default();
        assert!(options.identifier_renaming);
        assert_eq!(options.string_literal_encoding, StringEncoding::HexEscape);
        assert_eq!(options.numeric_literal_encoding, NumericEncoding::AlternateBase);
        assert!(options.reserved_names.is_empty());
    }

    #[test]
    fn test_transforms_disabled_preset() {
        let options = ObfuscationOptions::transforms_disabled();
        assert!(!options.identifier_renaming);
        assert_eq!(options.string_literal_encoding, StringEncoding::Disabled);
        assert_eq!(options.numeric_literal_encoding, NumericEncoding::Disabled);
    }

    #[test]
    fn test_parse_camel_case_json() {
        let options = parse_options(
            r#"{
                "identifierRenaming": false,
                "reservedNames": ["jQuery", "$"],
                "stringLiteralEncoding": "disabled",
                "numericLiteralEncoding": "alternateBase"
            }"#,
        )
        .unwrap();
        assert!(!options.identifier_renaming);
        assert!(options.is_reserved("jQuery"));
        assert!(options.is_reserved("$"));
        assert!(!options.is_reserved("jquery"));
        assert_eq!(options.string_literal_encoding, StringEncoding::Disabled);
        assert_eq!(options.numeric_literal_encoding, NumericEncoding::AlternateBase);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = parse_options(r#"{ "reservedNames": ["config"] }"#).unwrap();
        assert!(options.identifier_renaming);
        assert!(options.is_reserved("config"));
        assert_eq!(options.string_literal_encoding, StringEncoding::HexEscape);
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut options = ObfuscationOptions::default();
        options.reserved_names.insert("exports".to_string());
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("identifierRenaming"), "unexpected json: {}", json);
        assert!(json.contains("hexEscape"), "unexpected json: {}", json);
        let back: ObfuscationOptions = serde_json::from_str(&json).unwrap();
        assert!(back.is_reserved("exports"));
    }
}
