//! JWT token utilities.
//!
//! Tokens are signed either with a shared HS256 secret or with an RS256 key pair.
//! They carry the user id and the role id that was current when the token was
//! issued; the API re-reads the role on every request.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role ID at issue time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
}

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 86_400;

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Minimum length of an HS256 secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Signing and verification configuration.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    /// Token lifetime in seconds
    pub token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("token_expiry_secs", &self.token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Creates an HS256 configuration from a shared secret.
    pub fn from_secret(
        secret: &str,
        token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::InvalidKey(format!(
                "Secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            token_expiry_secs,
            leeway_secs,
        })
    }

    /// Creates an RS256 configuration from an RSA key pair in PEM format.
    pub fn from_rsa_pem(
        private_key_pem: &str,
        public_key_pem: &str,
        token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;

        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm: Algorithm::RS256,
            token_expiry_secs,
            leeway_secs,
        })
    }

    /// Signs a token for the given user.
    pub fn generate_token(
        &self,
        user_id: i64,
        role_id: Option<i64>,
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let exp = (now + Duration::seconds(self.token_expiry_secs)).timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            role_id,
            exp,
            iat: now.timestamp(),
            jti: jti.clone(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or_else(|| JwtError::EncodingError("Expiry out of range".to_string()))?;

        Ok(IssuedToken {
            token,
            jti,
            expires_at,
        })
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

/// Extracts user ID from validated claims.
pub fn extract_user_id(claims: &Claims) -> Result<i64, JwtError> {
    claims.sub.parse::<i64>().map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_for_jwt_testing_1234567890";

    fn create_test_config() -> JwtConfig {
        JwtConfig::from_secret(SECRET, DEFAULT_TOKEN_EXPIRY_SECS, 0).unwrap()
    }

    #[test]
    fn test_generate_and_validate_token() {
        let config = create_test_config();

        let issued = config.generate_token(42, Some(4)).unwrap();
        assert!(issued.token.contains('.'));

        let claims = config.validate_token(&issued.token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role_id, Some(4));
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(extract_user_id(&claims).unwrap(), 42);
    }

    #[test]
    fn test_default_expiry_is_one_day() {
        let config = create_test_config();
        let issued = config.generate_token(1, None).unwrap();
        let claims = config.validate_token(&issued.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 86_400);
        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = JwtConfig::from_secret("too-short", DEFAULT_TOKEN_EXPIRY_SECS, 0);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_expired_token() {
        let mut config = create_test_config();
        config.token_expiry_secs = -120;

        let issued = config.generate_token(1, None).unwrap();
        let result = config.validate_token(&issued.token);
        assert!(
            matches!(result, Err(JwtError::TokenExpired)),
            "Expected TokenExpired, got: {:?}",
            result
        );
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let config = create_test_config();
        let other =
            JwtConfig::from_secret("another_secret_key_for_jwt_testing_0987", 3600, 0).unwrap();

        let issued = other.generate_token(1, None).unwrap();
        assert!(matches!(
            config.validate_token(&issued.token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_token() {
        let config = create_test_config();
        assert!(config.validate_token("not_a_jwt").is_err());
    }

    #[test]
    fn test_unique_jti_per_token() {
        let config = create_test_config();
        let a = config.generate_token(1, None).unwrap();
        let b = config.generate_token(1, None).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_extract_user_id_rejects_non_numeric_subject() {
        let claims = Claims {
            sub: "abc".to_string(),
            role_id: None,
            exp: 0,
            iat: 0,
            jti: String::new(),
        };
        assert!(matches!(
            extract_user_id(&claims),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let debug = format!("{:?}", create_test_config());
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(SECRET));
    }
}
