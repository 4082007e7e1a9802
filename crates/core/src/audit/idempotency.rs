//! Client-supplied idempotency keys for checkout.

use std::fmt;

use crate::reconciliation::InventoryError;

/// Longest key accepted; matches the database column.
pub const MAX_KEY_LEN: usize = 255;

/// A validated idempotency key.
///
/// Replaying a checkout with the same key returns the original receipt
/// instead of decrementing stock a second time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Parses a raw header value. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdempotencyKey` if the key is blank or longer than
    /// [`MAX_KEY_LEN`] bytes.
    pub fn parse(raw: &str) -> Result<Self, InventoryError> {
        let key = raw.trim();
        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return Err(InventoryError::InvalidIdempotencyKey);
        }
        Ok(Self(key.to_string()))
    }

    /// The trimmed key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_trims() {
        let key = IdempotencyKey::parse("  req-42 ").unwrap();
        assert_eq!(key.as_str(), "req-42");
        assert_eq!(key.to_string(), "req-42");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_blank_rejected(#[case] raw: &str) {
        assert!(matches!(
            IdempotencyKey::parse(raw),
            Err(InventoryError::InvalidIdempotencyKey)
        ));
    }

    #[test]
    fn test_length_limit() {
        assert!(IdempotencyKey::parse(&"k".repeat(MAX_KEY_LEN)).is_ok());
        assert!(IdempotencyKey::parse(&"k".repeat(MAX_KEY_LEN + 1)).is_err());
    }
}
