use jsonwebtoken::{decode, DecodingKey, Validation};
use time::OffsetDateTime;

use crate::auth::claims::AccessClaims;
use crate::auth::AuthError;
use crate::state::security_config::SecurityConfig;

/// Verify a bearer token against the configured secret and return its claims.
///
/// The accepted algorithm is pinned by the config; whatever the token header
/// declares is irrelevant. `exp` is optional, but when present the current
/// time must be strictly before it. `sub` must be non-empty.
///
/// An unset or empty secret fails every verification (`SecretNotConfigured`)
/// rather than disabling verification.
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<AccessClaims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }

    // Externally issued tokens are not required to carry `exp`; the strict
    // expiry check below handles it when present.
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    validation.required_spec_claims.remove("exp");

    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        // A structurally valid token signed for another algorithm cannot
        // verify against our key either.
        jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredCredential,
        _ => AuthError::MalformedCredential,
    })?;

    let claims = data.claims;

    if let Some(exp) = claims.exp {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        if now >= exp {
            return Err(AuthError::ExpiredCredential);
        }
    }

    if claims.sub.trim().is_empty() {
        return Err(AuthError::MissingSubjectClaim);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::json;
    use time::OffsetDateTime;

    use super::verify_access_token;
    use crate::auth::AuthError;
    use crate::state::security_config::SecurityConfig;

    const SECRET: &str = "super-secure-test-secret-123";

    fn sign(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn now() -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }

    #[test]
    fn valid_token_exposes_subject_unchanged() {
        let security = SecurityConfig::new(SECRET.as_bytes());
        let token = sign(&json!({"sub": "user-123", "exp": now() + 3600}), SECRET);

        let claims = verify_access_token(&token, &security).unwrap();
        assert_eq!(claims.sub, "user-123");
    }

    #[test]
    fn verification_is_repeatable() {
        let security = SecurityConfig::new(SECRET.as_bytes());
        let token = sign(&json!({"sub": "user-123", "exp": now() + 3600}), SECRET);

        let first = verify_access_token(&token, &security).unwrap();
        let second = verify_access_token(&token, &security).unwrap();
        assert_eq!(first.sub, second.sub);
    }

    #[test]
    fn token_without_exp_is_accepted() {
        let security = SecurityConfig::new(SECRET.as_bytes());
        let token = sign(&json!({"sub": "user-123"}), SECRET);

        let claims = verify_access_token(&token, &security).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn wrong_secret_is_invalid_signature() {
        let security = SecurityConfig::new("correct-secret".as_bytes());
        let token = sign(&json!({"sub": "hacker"}), "wrong-secret");

        assert_eq!(
            verify_access_token(&token, &security),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let security = SecurityConfig::new(SECRET.as_bytes());
        let token = sign(&json!({"sub": "user-123", "exp": now() - 60}), SECRET);

        assert_eq!(
            verify_access_token(&token, &security),
            Err(AuthError::ExpiredCredential)
        );
    }

    #[test]
    fn exp_exactly_now_is_already_expired() {
        let security = SecurityConfig::new(SECRET.as_bytes());
        let token = sign(&json!({"sub": "user-123", "exp": now()}), SECRET);

        assert_eq!(
            verify_access_token(&token, &security),
            Err(AuthError::ExpiredCredential)
        );
    }

    #[test]
    fn expired_beats_bad_subject() {
        let security = SecurityConfig::new(SECRET.as_bytes());
        let token = sign(&json!({"exp": now() - 60}), SECRET);

        assert_eq!(
            verify_access_token(&token, &security),
            Err(AuthError::ExpiredCredential)
        );
    }

    #[test]
    fn missing_subject_is_rejected() {
        let security = SecurityConfig::new(SECRET.as_bytes());

        let no_sub = sign(&json!({"exp": now() + 3600}), SECRET);
        assert_eq!(
            verify_access_token(&no_sub, &security),
            Err(AuthError::MissingSubjectClaim)
        );

        let empty_sub = sign(&json!({"sub": "", "exp": now() + 3600}), SECRET);
        assert_eq!(
            verify_access_token(&empty_sub, &security),
            Err(AuthError::MissingSubjectClaim)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let security = SecurityConfig::new(SECRET.as_bytes());

        for token in ["", "not-a-jwt", "a.b", "a.b.c.d", "%%%.###.!!!"] {
            assert_eq!(
                verify_access_token(token, &security),
                Err(AuthError::MalformedCredential),
                "token {token:?} should be malformed"
            );
        }
    }

    #[test]
    fn empty_secret_fails_closed() {
        let security = SecurityConfig::new(Vec::new());

        // Even a token signed with an empty secret must not verify.
        let token = sign(&json!({"sub": "user-123"}), "");
        assert_eq!(
            verify_access_token(&token, &security),
            Err(AuthError::SecretNotConfigured)
        );
    }
}
