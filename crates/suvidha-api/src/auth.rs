//! # Access Tokens & Caller Identity
//!
//! Bearer-token authentication for citizen endpoints.
//!
//! ## Token Format
//!
//! Compact HS256 JWTs: `base64url(header).base64url(claims).base64url(mac)`
//! with no padding. Claims are `{sub, email, iat, exp}`; `sub` is the
//! user's UUID.
//!
//! ## Verification
//!
//! [`JwtIdentityProvider::verify`] checks, in order: three segments,
//! `alg == "HS256"`, the HMAC-SHA256 signature (constant-time via
//! `Mac::verify_slice`), expiry, and that `sub` parses as a UUID.
//!
//! ## Extraction
//!
//! Handlers take an [`AuthUser`] argument. It reads `Authorization`,
//! accepts either `Bearer <token>` or a bare token, and rejects with
//! 401 "Not authenticated" (no header) or 401 "Invalid token".

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::config::{AppConfig, JwtSecret};
use crate::error::AppError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// The only signing algorithm issued or accepted.
const ALGORITHM: &str = "HS256";

/// Why a token was rejected.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no access token presented")]
    Missing,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("token subject is not a user id")]
    InvalidSubject,
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Issues and verifies access tokens.
pub trait IdentityProvider: Send + Sync {
    /// Verify a token and return the user it was issued to.
    fn verify(&self, token: &str) -> Result<Uuid, AuthError>;

    /// Issue a token for a user.
    fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AuthError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 JWT identity provider.
pub struct JwtIdentityProvider {
    secret: JwtSecret,
    ttl: Duration,
}

impl std::fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityProvider")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtIdentityProvider {
    /// Create a provider signing with `secret`; tokens live for `ttl`.
    pub fn new(secret: JwtSecret, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Create a provider from the service configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            Duration::minutes(config.jwt_expire_minutes),
        )
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(self.secret.expose())
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Issue a token as of `now`.
    pub fn issue_at(
        &self,
        user_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(self.ttl)
                .ok_or_else(|| AuthError::Signing("token lifetime out of range".into()))?
                .timestamp(),
        };
        let header = serde_json::to_vec(&header).map_err(|e| AuthError::Signing(e.to_string()))?;
        let claims = serde_json::to_vec(&claims).map_err(|e| AuthError::Signing(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(claims)
        );
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature)))
    }

    /// Verify a token as of `now`, returning its claims.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AuthError::Malformed("expected three segments".into()));
        };

        let header: Header = decode_segment(header_b64, "header")?;
        if header.alg != ALGORITHM {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|e| AuthError::Malformed(format!("signature: {e}")))?;
        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::BadSignature)?;

        let claims: Claims = decode_segment(claims_b64, "claims")?;
        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }
        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject)?;
        Ok(claims)
    }
}

fn decode_segment<T: for<'de> Deserialize<'de>>(
    segment: &str,
    what: &str,
) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::Malformed(format!("{what}: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::Malformed(format!("{what}: {e}")))
}

impl IdentityProvider for JwtIdentityProvider {
    fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        let claims = self.verify_at(token, Utc::now())?;
        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject)
    }

    fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, email, Utc::now())
    }
}

/// Strip an optional `Bearer ` scheme from an `Authorization` value.
///
/// Returns `None` when nothing usable remains.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let value = header_value.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// The authenticated caller, extracted from the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AuthError::Missing)?;
        let user_id = state.identity.verify(token)?;
        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn provider() -> JwtIdentityProvider {
        JwtIdentityProvider::new(JwtSecret::new("unit-test-secret"), Duration::minutes(60))
    }

    #[test]
    fn issued_token_verifies() {
        let p = provider();
        let user = Uuid::new_v4();
        let token = p.issue(user, "a@example.in").unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(p.verify(&token).unwrap(), user);
    }

    #[test]
    fn claims_carry_email_and_lifetime() {
        let p = provider();
        let now = Utc::now();
        let token = p.issue_at(Uuid::new_v4(), "a@example.in", now).unwrap();
        let claims = p.verify_at(&token, now).unwrap();
        assert_eq!(claims.email, "a@example.in");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn oversized_lifetime_is_a_signing_error() {
        // Past chrono's representable range of dates.
        let p = JwtIdentityProvider::new(JwtSecret::new("k"), Duration::days(1_000_000_000));
        let err = p.issue(Uuid::new_v4(), "a@example.in").unwrap_err();
        assert!(matches!(err, AuthError::Signing(_)));
    }

    #[test]
    fn maximum_configured_lifetime_issues() {
        let p = JwtIdentityProvider::new(
            JwtSecret::new("k"),
            Duration::minutes(crate::config::MAX_JWT_EXPIRE_MINUTES),
        );
        let token = p.issue(Uuid::new_v4(), "a@example.in").unwrap();
        assert!(p.verify(&token).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let p = provider();
        let issued = Utc::now() - Duration::minutes(120);
        let token = p.issue_at(Uuid::new_v4(), "a@example.in", issued).unwrap();
        assert!(matches!(p.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn other_secret_is_bad_signature() {
        let token = provider().issue(Uuid::new_v4(), "a@example.in").unwrap();
        let other = JwtIdentityProvider::new(JwtSecret::new("another"), Duration::minutes(60));
        assert!(matches!(other.verify(&token), Err(AuthError::BadSignature)));
    }

    #[test]
    fn tampered_claims_are_bad_signature() {
        let p = provider();
        let token = p.issue(Uuid::new_v4(), "a@example.in").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&Claims {
                sub: Uuid::new_v4().to_string(),
                email: "mallory@example.in".into(),
                iat: 0,
                exp: i64::MAX,
            })
            .unwrap(),
        );
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);
        assert!(matches!(p.verify(&forged), Err(AuthError::BadSignature)));
    }

    #[test]
    fn none_algorithm_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(br#"{"sub":"x","email":"e","iat":0,"exp":0}"#);
        let token = format!("{header}.{claims}.");
        assert!(matches!(
            provider().verify(&token),
            Err(AuthError::UnsupportedAlgorithm(alg)) if alg == "none"
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(provider().verify("not-a-token"), Err(AuthError::Malformed(_))));
        assert!(matches!(provider().verify("a.b.c.d"), Err(AuthError::Malformed(_))));
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let p = provider();
        let now = Utc::now();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&Claims {
                sub: "user-42".into(),
                email: "e".into(),
                iat: now.timestamp(),
                exp: now.timestamp() + 60,
            })
            .unwrap(),
        );
        let input = format!("{header}.{claims}");
        let mut mac = p.mac().unwrap();
        mac.update(input.as_bytes());
        let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        let token = format!("{input}.{sig}");
        assert!(matches!(p.verify(&token), Err(AuthError::InvalidSubject)));
    }

    #[test]
    fn bearer_prefix_is_optional() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("   "), None);
    }

    #[test]
    fn debug_redacts_secret() {
        let debug = format!("{:?}", provider());
        assert!(!debug.contains("unit-test-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    // ── extractor ───────────────────────────────────────────────

    async fn whoami(user: AuthUser) -> String {
        user.user_id.to_string()
    }

    fn whoami_app(state: AppState) -> Router {
        Router::new().route("/whoami", get(whoami)).with_state(state)
    }

    #[tokio::test]
    async fn extractor_accepts_bearer_and_bare_tokens() {
        let state = AppState::in_memory();
        let user = Uuid::new_v4();
        let token = state.identity.issue(user, "a@example.in").unwrap();

        for value in [format!("Bearer {token}"), token.clone()] {
            let response = whoami_app(state.clone())
                .oneshot(
                    Request::builder()
                        .uri("/whoami")
                        .header("authorization", value)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn extractor_rejects_missing_and_invalid() {
        let state = AppState::in_memory();

        let response = whoami_app(state.clone())
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = whoami_app(state)
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("authorization", "Bearer nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
