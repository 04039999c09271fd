//! Bearer token issuing and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{AuthError, AuthResult};

const BEARER_PREFIX: &str = "Bearer ";

/// Default token lifetime: 14 days
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 14;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC secret shared with whoever issues tokens
    pub secret: String,
    pub token_ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::days(DEFAULT_TOKEN_TTL_DAYS),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Claims carried by an editor's bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Editor user name
    pub name: String,
    /// Editor user id
    pub id: i64,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Claims issued now that expire after `ttl`
    pub fn new(name: impl Into<String>, id: i64, ttl: Duration) -> AuthResult<Self> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Encoding(format!("token lifetime {ttl} is out of range")))?;

        Ok(Self {
            name: name.into(),
            id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }
}

/// HS256 token service used by the auth middleware and the CLI
#[derive(Clone)]
pub struct JwtAuthenticator {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JwtAuthenticator {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token for an editor using the configured lifetime
    pub fn issue_token(&self, name: &str, id: i64) -> AuthResult<String> {
        self.encode_claims(&Claims::new(name, id, self.config.token_ttl)?)
    }

    pub fn encode_claims(&self, claims: &Claims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry of a raw token
    pub fn verify_token(&self, token: &str) -> AuthResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }

    /// Verify the value of an `Authorization: Bearer <token>` header
    pub fn verify_authorization_header(&self, header: Option<&str>) -> AuthResult<Claims> {
        let header = header.map(str::trim).filter(|h| !h.is_empty());
        let header = header.ok_or(AuthError::MissingToken)?;

        let token = header
            .get(..BEARER_PREFIX.len())
            .filter(|scheme| scheme.eq_ignore_ascii_case(BEARER_PREFIX))
            .map(|_| header[BEARER_PREFIX.len()..].trim())
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MalformedHeader)?;

        self.verify_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator(secret: &str) -> JwtAuthenticator {
        JwtAuthenticator::new(JwtConfig::new(secret))
    }

    #[test]
    fn test_issue_and_verify() {
        let auth = authenticator("test-secret");
        let token = auth.issue_token("editor", 7).unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.name, "editor");
        assert_eq!(claims.id, 7);
        assert_eq!(claims.exp - claims.iat, Duration::days(14).num_seconds());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = authenticator("one").issue_token("editor", 1).unwrap();
        let err = authenticator("two").verify_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = authenticator("test-secret");
        let claims = Claims::new("editor", 1, Duration::hours(-2)).unwrap();
        let token = auth.encode_claims(&claims).unwrap();

        assert_eq!(auth.verify_token(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_unrepresentable_lifetime_is_an_error() {
        let mut config = JwtConfig::new("test-secret");
        config.token_ttl = Duration::MAX;

        let err = JwtAuthenticator::new(config).issue_token("editor", 1).unwrap_err();
        assert!(matches!(err, AuthError::Encoding(_)));
    }

    #[test]
    fn test_authorization_header_parsing() {
        let auth = authenticator("test-secret");
        let token = auth.issue_token("editor", 1).unwrap();

        assert!(auth
            .verify_authorization_header(Some(&format!("Bearer {token}")))
            .is_ok());
        assert!(auth
            .verify_authorization_header(Some(&format!("bearer  {token} ")))
            .is_ok());

        assert_eq!(
            auth.verify_authorization_header(None),
            Err(AuthError::MissingToken)
        );
        assert_eq!(
            auth.verify_authorization_header(Some("   ")),
            Err(AuthError::MissingToken)
        );
        assert_eq!(
            auth.verify_authorization_header(Some(&format!("Basic {token}"))),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(
            auth.verify_authorization_header(Some("Bearer")),
            Err(AuthError::MalformedHeader)
        );
        assert!(matches!(
            auth.verify_authorization_header(Some("Bearer not-a-jwt")),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
