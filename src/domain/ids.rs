//! Domain identifier types with validation
//!
//! Newtype wrapper for the customer business identifier so it cannot be
//! mixed up with other plain strings once a row has been accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Customer business identifier (`cod_cliente`)
///
/// Unique and immutable once assigned by the upstream system; the upsert
/// key for the `clientes` table. Guaranteed non-empty and trimmed.
///
/// # Examples
///
/// ```
/// use tamiz::domain::ClienteId;
///
/// let id = ClienteId::new("C001").unwrap();
/// assert_eq!(id.as_str(), "C001");
/// assert!(ClienteId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClienteId(String);

impl ClienteId {
    /// Creates a new ClienteId, rejecting empty or whitespace-only input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("cod_cliente cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClienteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClienteId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ClienteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_id() {
        let id = ClienteId::new("C001").unwrap();
        assert_eq!(id.as_str(), "C001");
        assert_eq!(id.to_string(), "C001");
    }

    #[test]
    fn test_trims_whitespace() {
        let id = ClienteId::new("  C001  ").unwrap();
        assert_eq!(id.as_str(), "C001");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(ClienteId::new("").is_err());
        assert!(ClienteId::new("   ").is_err());
    }

    #[test]
    fn test_from_str() {
        let id: ClienteId = "C002".parse().unwrap();
        assert_eq!(id.as_str(), "C002");
    }
}
