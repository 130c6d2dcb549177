//! Deterministic salted anonymization and display masking
//!
//! The same raw value always yields the same derived value for a given
//! salt, so hashes can serve as dedup/lookup keys; without the salt the
//! hashes are unlinkable across datasets. The salt itself is never logged
//! or persisted.

use crate::config::SecretString;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

/// Fixed digest returned for empty input.
///
/// 64 characters like a real digest but deliberately non-hex, so missing
/// values can never collide with each other (or with a real hash) during
/// dedup by hash column.
pub const NO_VALUE_SENTINEL: &str =
    "----------------------------------------------------------------";

/// Mask character used for redacted card digits
const MASK_CHAR: char = 'X';

/// Salted one-way hasher for identity and card numbers
pub struct Anonymizer {
    salt: SecretString,
}

impl Anonymizer {
    /// Creates an anonymizer around the process-wide secret salt
    pub fn new(salt: SecretString) -> Self {
        Self { salt }
    }

    /// Hashes a normalized identity-document number
    ///
    /// Returns a 64-character lowercase hex digest of `salt + value`, or
    /// [`NO_VALUE_SENTINEL`] when the value is empty.
    pub fn hash_identity(&self, value: &str) -> String {
        self.digest(value)
    }

    /// Hashes a normalized, digits-only card number
    pub fn hash_card(&self, value: &str) -> String {
        self.digest(value)
    }

    fn digest(&self, value: &str) -> String {
        if value.is_empty() {
            return NO_VALUE_SENTINEL.to_string();
        }

        let mut hasher = Sha256::new();
        hasher.update(self.salt.expose_secret().as_ref().as_bytes());
        hasher.update(value.as_bytes());
        let result = hasher.finalize();

        format!("{result:x}")
    }
}

/// Masks a card number for display
///
/// Length preserved, all but the last 4 digits replaced with a fixed mask
/// character; values of 4 digits or fewer are fully masked. Masking is for
/// human-facing fields only, never for lookup.
pub fn mask_card(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let len = digits.len();

    if len <= 4 {
        return MASK_CHAR.to_string().repeat(len);
    }

    let mut masked = MASK_CHAR.to_string().repeat(len - 4);
    masked.push_str(&digits[len - 4..]);
    masked
}
