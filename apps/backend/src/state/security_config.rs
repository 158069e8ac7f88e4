use jsonwebtoken::Algorithm;

/// Verification settings for inbound bearer tokens.
///
/// Built once at startup and shared read-only through `AppState`; request
/// handling never reads the environment. The algorithm is pinned here, not
/// taken from token headers.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Shared secret for verifying token signatures. Empty means
    /// verification is unavailable and every attempt fails.
    pub jwt_secret: Vec<u8>,
    /// Accepted signing algorithm (HS256).
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }
}

impl Default for SecurityConfig {
    // Empty secret: verification fails closed until a real secret is set.
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
