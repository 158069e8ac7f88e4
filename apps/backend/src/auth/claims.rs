use serde::{Deserialize, Serialize};

/// Claims carried by access tokens issued by the external identity provider.
///
/// Tokens may carry more claims than these; anything not listed here is
/// ignored. `sub` is deserialized with a default so that a token missing it
/// still decodes and can be rejected with the precise reason instead of a
/// generic parse failure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccessClaims {
    /// External user identifier.
    #[serde(default)]
    pub sub: String,
    /// Expiry (seconds since epoch). Absent means the token does not expire.
    #[serde(default)]
    pub exp: Option<i64>,
}
