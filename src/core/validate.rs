//! Field validators and normalizers
//!
//! Pure functions from a raw string to a `(normalized_value, FieldStatus)`
//! pair. They never fail and never mutate their input; blank input maps to
//! [`FieldStatus::Missing`], malformed input to [`FieldStatus::Invalid`].

use crate::domain::FieldStatus;
use regex::Regex;
use std::sync::OnceLock;

/// Check-letter alphabet for the Spanish DNI mod-23 scheme
const DNI_LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

/// First digits accepted for a national phone number
const PHONE_LEADING_DIGITS: &[char] = &['6', '7', '8', '9'];

fn dni_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{8})([A-Z])$").expect("static regex"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"))
}

/// Trims and folds Spanish diacritics out of free text (names, identifiers)
///
/// Mirrors the cleanup applied upstream so values compare equal across
/// extracts produced with different encodings.
pub fn clean_text(value: &str) -> String {
    value.trim().chars().map(fold_accent).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'Á' | 'À' | 'Ä' | 'Â' => 'A',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        other => other,
    }
}

/// Validates a Spanish identity-document number (DNI)
///
/// Normalizes by stripping whitespace/dashes and upper-casing; valid iff
/// the value is 8 digits plus a check letter matching the mod-23 checksum.
pub fn validate_dni(value: &str) -> (String, FieldStatus) {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase();

    if normalized.is_empty() {
        return (normalized, FieldStatus::Missing);
    }

    let status = match dni_regex().captures(&normalized) {
        Some(caps) => {
            // The 8-digit prefix always fits in u32
            let number: u32 = caps[1].parse().expect("8 digits");
            let expected = DNI_LETTERS[(number % 23) as usize] as char;
            if caps[2].chars().next() == Some(expected) {
                FieldStatus::Valid
            } else {
                FieldStatus::Invalid
            }
        }
        None => FieldStatus::Invalid,
    };

    (normalized, status)
}

/// Validates an email address
///
/// Normalizes by trimming and lower-casing; valid iff it has a non-empty
/// local part, a single `@`, a dotted domain and no internal whitespace.
pub fn validate_email(value: &str) -> (String, FieldStatus) {
    let normalized = value.trim().to_lowercase();

    if normalized.is_empty() {
        return (normalized, FieldStatus::Missing);
    }

    let status = if email_regex().is_match(&normalized) {
        FieldStatus::Valid
    } else {
        FieldStatus::Invalid
    };

    (normalized, status)
}

/// Validates a phone number
///
/// Normalizes by stripping separators (spaces, dashes, dots, parentheses)
/// and an optional leading country code (`+34` / `0034`); valid iff exactly
/// 9 digits remain and the first is in the allowed national set.
pub fn validate_phone(value: &str) -> (String, FieldStatus) {
    let mut normalized: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    if let Some(rest) = normalized.strip_prefix("+34") {
        normalized = rest.to_string();
    } else if let Some(rest) = normalized.strip_prefix("0034") {
        normalized = rest.to_string();
    }

    if normalized.is_empty() {
        return (normalized, FieldStatus::Missing);
    }

    let status = if normalized.len() == 9
        && normalized.chars().all(|c| c.is_ascii_digit())
        && normalized
            .chars()
            .next()
            .map(|c| PHONE_LEADING_DIGITS.contains(&c))
            .unwrap_or(false)
    {
        FieldStatus::Valid
    } else {
        FieldStatus::Invalid
    };

    (normalized, status)
}

/// Validates a payment card number
///
/// Normalizes by stripping spaces and dashes; valid iff 13 to 19 digits
/// remain and nothing else.
pub fn validate_card(value: &str) -> (String, FieldStatus) {
    let normalized: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    if normalized.is_empty() {
        return (normalized, FieldStatus::Missing);
    }

    let status = if (13..=19).contains(&normalized.len())
        && normalized.chars().all(|c| c.is_ascii_digit())
    {
        FieldStatus::Valid
    } else {
        FieldStatus::Invalid
    };

    (normalized, status)
}
