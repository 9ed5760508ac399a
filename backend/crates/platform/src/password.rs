//! Password Hashing and Verification
//!
//! Two schemes are understood:
//! - `Sha256`: single-pass SHA-256 rendered as lowercase hex. Every existing
//!   credential row uses this format, so it remains the default.
//! - `Argon2id`: PHC string (`$argon2id$...`) with a random salt.
//!
//! Verification recognises the stored format on its own, so both kinds of
//! rows can coexist while the scheme for new writes is switched.

use std::fmt;
use std::str::FromStr;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{constant_time_eq, sha256_hex};

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password is required")]
    Empty,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Unknown password scheme: {0}")]
    UnknownScheme(String),
}

// ============================================================================
// Scheme
// ============================================================================

/// Hash format used when writing a new password
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    #[default]
    Sha256,
    Argon2id,
}

impl PasswordScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordScheme::Sha256 => "sha256",
            PasswordScheme::Argon2id => "argon2id",
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = PasswordHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" => Ok(PasswordScheme::Sha256),
            "argon2id" | "argon2" => Ok(PasswordScheme::Argon2id),
            other => Err(PasswordHashError::UnknownScheme(other.to_string())),
        }
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; Debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// The only policy enforced is presence. Whitespace is significant and
    /// kept as typed.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }
        Ok(Self(raw))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn hash(&self, scheme: PasswordScheme) -> Result<HashedPassword, PasswordHashError> {
        let hash = match scheme {
            PasswordScheme::Sha256 => sha256_hex(self.as_bytes()),
            PasswordScheme::Argon2id => {
                let salt = SaltString::generate(OsRng);
                Argon2::default()
                    .hash_password(self.as_bytes(), &salt)
                    .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
                    .to_string()
            }
        };
        Ok(HashedPassword { hash })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Stored password hash, either 64-char hex or an Argon2 PHC string
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a value read from the database
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn scheme(&self) -> PasswordScheme {
        if self.hash.starts_with("$argon2") {
            PasswordScheme::Argon2id
        } else {
            PasswordScheme::Sha256
        }
    }

    /// Verify a password against this hash
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        match self.scheme() {
            PasswordScheme::Argon2id => {
                let Ok(parsed) = PasswordHash::new(&self.hash) else {
                    return false;
                };
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            }
            PasswordScheme::Sha256 => {
                let candidate = sha256_hex(password.as_bytes());
                constant_time_eq(candidate.as_bytes(), self.hash.as_bytes())
            }
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("scheme", &self.scheme())
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pw(s: &str) -> ClearTextPassword {
        ClearTextPassword::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_password_empty() {
        let result = ClearTextPassword::new(String::new());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::Empty);
    }

    #[test]
    fn test_short_password_is_accepted() {
        assert!(ClearTextPassword::new("a".to_string()).is_ok());
    }

    #[test]
    fn test_sha256_hash_is_plain_hex_digest() {
        let hashed = pw("admin123").hash(PasswordScheme::Sha256).unwrap();
        assert_eq!(hashed.as_str(), sha256_hex(b"admin123"));
        assert_eq!(hashed.scheme(), PasswordScheme::Sha256);
    }

    #[test]
    fn test_sha256_verify() {
        let hashed = pw("secret1").hash(PasswordScheme::Sha256).unwrap();
        assert!(hashed.verify(&pw("secret1")));
        assert!(!hashed.verify(&pw("secret2")));
    }

    #[test]
    fn test_argon2_verify() {
        let hashed = pw("TestPassword123!").hash(PasswordScheme::Argon2id).unwrap();
        assert!(hashed.as_str().starts_with("$argon2id$"));
        assert!(hashed.verify(&pw("TestPassword123!")));
        assert!(!hashed.verify(&pw("WrongPassword123!")));
    }

    #[test]
    fn test_stored_rows_of_both_formats_verify() {
        let legacy = HashedPassword::from_stored(sha256_hex(b"hunter2"));
        let modern = HashedPassword::from_stored(
            pw("hunter2")
                .hash(PasswordScheme::Argon2id)
                .unwrap()
                .as_str()
                .to_string(),
        );
        assert!(legacy.verify(&pw("hunter2")));
        assert!(modern.verify(&pw("hunter2")));
    }

    #[test]
    fn test_malformed_argon2_never_verifies() {
        let broken = HashedPassword::from_stored("$argon2id$garbage");
        assert!(!broken.verify(&pw("anything")));
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("sha256".parse::<PasswordScheme>().unwrap(), PasswordScheme::Sha256);
        assert_eq!(
            "Argon2id".parse::<PasswordScheme>().unwrap(),
            PasswordScheme::Argon2id
        );
        assert!("md5".parse::<PasswordScheme>().is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = pw("secret");
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let hashed = password.hash(PasswordScheme::Sha256).unwrap();
        assert!(!format!("{:?}", hashed).contains(hashed.as_str()));
    }
}
