//! Secure secret handling using the secrecy crate
//!
//! The hashing salt and the database connection string live in memory as
//! [`SecretString`] values: zeroed on drop, redacted in Debug output, and
//! only readable through an explicit `expose_secret()` call. Neither value
//! is ever written to logs or serialized back out by the application.

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String implementing the traits `Secret` requires
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the secret in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the secret value starts with a prefix
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Parse the secret value into another type
    pub fn parse<F: std::str::FromStr>(&self) -> Result<F, F::Err> {
        self.0.parse()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a protected string (salt, connection string)
pub type SecretString = Secret<SecretValue>;

/// Helper to wrap a String in a SecretString
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_roundtrip() {
        let secret = secret_string("MI_SALT_SECRETA".to_string());
        assert_eq!(secret.expose_secret().as_ref(), "MI_SALT_SECRETA");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-salt".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("sensitive-salt"));
    }

    #[test]
    fn test_secret_deserializes_from_toml() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            salt: SecretString,
        }

        let wrapper: Wrapper = toml::from_str(r#"salt = "abc123""#).unwrap();
        assert_eq!(wrapper.salt.expose_secret().as_ref(), "abc123");
    }
}
