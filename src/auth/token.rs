use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Fixed header for every token this service issues. Only HS256 is
/// supported; no algorithm negotiation happens on validation.
const HEADER_JSON: &str = r#"{"typ":"JWT","alg":"HS256"}"#;

/// Claims carried in the token payload.
///
/// `exp` is absent only in externally minted tokens; everything this
/// service issues carries one. A signed token without `exp` never
/// expires, matching the original validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub iat: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    pub user_id: i64,
    pub username: String,
}

/// Why a token was rejected. Internal diagnostics only; every variant
/// collapses to the same unauthorized outcome at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    Tampered,
    Expired,
}

/// Mints and validates compact signed bearer tokens.
///
/// The wire format is the standard three-segment `header.payload.signature`
/// layout: each segment base64url-encoded without padding, the signature
/// an HMAC-SHA256 over the two encoded segments keyed by a server-held
/// secret. Tokens are never stored server-side; a token dies only by
/// expiry or by the client discarding it.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    /// Issue a token for the given subject, valid from now until
    /// now + TTL.
    pub fn issue(&self, user_id: i64, username: &str) -> String {
        self.issue_at(user_id, username, Utc::now().timestamp())
    }

    fn issue_at(&self, user_id: i64, username: &str, now: i64) -> String {
        let claims = Claims {
            iat: now,
            exp: Some(now + self.ttl_secs),
            user_id,
            username: username.to_owned(),
        };
        let header = URL_SAFE_NO_PAD.encode(HEADER_JSON);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::to_string(&claims).expect("claims serialize to JSON"),
        );
        let signature = self.sign(&header, &payload);
        format!("{header}.{payload}.{signature}")
    }

    /// Validate a presented token against the current clock. All
    /// rejection paths collapse to `None`.
    pub fn validate(&self, token: &str) -> Option<Claims> {
        self.validate_at(token, Utc::now().timestamp())
    }

    pub fn validate_at(&self, token: &str, now: i64) -> Option<Claims> {
        match self.decode_at(token, now) {
            Ok(claims) => Some(claims),
            Err(reason) => {
                log::debug!("token rejected: {:?}", reason);
                None
            }
        }
    }

    fn decode_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        let &[header, payload, signature] = parts.as_slice() else {
            return Err(TokenError::Malformed);
        };

        // Signature first: nothing in an unauthenticated payload is
        // trusted, not even its JSON shape.
        let presented = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Tampered)?;
        let mut mac = self.mac();
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&presented)
            .map_err(|_| TokenError::Tampered)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.exp.is_some_and(|exp| exp < now) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn sign(&self, header: &str, payload: &str) -> String {
        let mut mac = self.mac();
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take a key of any size")
    }
}
