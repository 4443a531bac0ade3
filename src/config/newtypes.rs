//! Newtype wrappers for configuration values.

use std::fmt;

/// A bearer token used to authenticate against the topology builder API.
///
/// The token is sent as `Authorization: Bearer <token>` on every request.
///
/// # Security
///
/// The `Debug` implementation masks the token, displaying only
/// `AuthToken(*****)` so configurations can be logged safely.
///
/// # Example
///
/// ```rust
/// use tbclient::AuthToken;
///
/// let token = AuthToken::new("secret-token");
/// assert_eq!(token.as_ref(), "secret-token");
/// assert_eq!(format!("{:?}", token), "AuthToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the value of the `Authorization` header for this token.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl AsRef<str> for AuthToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AuthToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(*****)")
    }
}
