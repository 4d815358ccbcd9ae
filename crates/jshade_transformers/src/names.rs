//! Deterministic replacement-name generation.

use jshade_diagnostics::{messages, Diagnostic, ObfuscationError};

/// The first counter value. Keeps generated names at four hex digits or
/// more, matching the `_0x....` shape downstream tooling recognizes.
const FIRST_CANDIDATE: u32 = 0x1000;

/// How many rejected candidates a single request tolerates before the run
/// aborts. Reaching this means the input (or the reserved predicate)
/// swallowed tens of thousands of `_0x` names.
const MAX_ATTEMPTS: u32 = 50_000;

/// Generates `_0x<hex>` names from a sequential counter. One instance per
/// run, owned by the driver; the same input therefore always produces the
/// same names in the same order.
#[derive(Debug)]
pub struct NameGenerator {
    counter: u32,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self {
            counter: FIRST_CANDIDATE,
        }
    }

    /// Produce the next name for which `rejected` returns false.
    pub fn generate(
        &mut self,
        mut rejected: impl FnMut(&str) -> bool,
    ) -> Result<String, ObfuscationError> {
        for _ in 0..MAX_ATTEMPTS {
            let candidate = format!("_0x{:x}", self.counter);
            self.counter = self.counter.wrapping_add(1);
            if !rejected(&candidate) {
                return Ok(candidate);
            }
        }
        Err(ObfuscationError::NameGenerationExhausted(Diagnostic::new(
            &messages::NAME_GENERATION_EXHAUSTED,
            &[&MAX_ATTEMPTS.to_string()],
        )))
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}
