//! Credential verification for protected routes.

pub mod claims;
pub mod jwt;

use thiserror::Error;

/// Why a credential was rejected. Every variant surfaces as a plain 401;
/// the distinction exists for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No Authorization header on the request.
    #[error("missing credential")]
    MissingCredential,
    /// Header present but not `Bearer <token>`, or the token is not a
    /// decodable JWT.
    #[error("malformed credential")]
    MalformedCredential,
    /// Signature does not verify against the configured secret.
    #[error("invalid signature")]
    InvalidSignature,
    /// The token's `exp` claim is in the past.
    #[error("expired credential")]
    ExpiredCredential,
    /// Token verified but carries no usable `sub` claim.
    #[error("missing subject claim")]
    MissingSubjectClaim,
    /// No verification secret is configured; verification fails closed.
    #[error("verification secret not configured")]
    SecretNotConfigured,
}

pub use claims::AccessClaims;
pub use jwt::verify_access_token;
