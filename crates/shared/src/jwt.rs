//! JWT token generation and validation.
//!
//! Provides HMAC-signed access and refresh tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Claims, TokenKind, TokenPair};
pub use crate::config::JwtConfig;

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is of the wrong kind.
    #[error("invalid token")]
    Invalid,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry_secs", &self.config.access_token_expiry_secs)
            .field("refresh_token_expiry_secs", &self.config.refresh_token_expiry_secs)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn sign(
        &self,
        user_id: Uuid,
        company_id: Option<Uuid>,
        role: &str,
        typ: TokenKind,
        ttl_secs: u64,
    ) -> Result<String, JwtError> {
        let ttl = i64::try_from(ttl_secs).map_err(|e| JwtError::EncodingError(e.to_string()))?;
        let claims = Claims::new(user_id, company_id, role, typ, Utc::now() + Duration::seconds(ttl));

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Generates an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        company_id: Option<Uuid>,
        role: &str,
    ) -> Result<String, JwtError> {
        self.sign(
            user_id,
            company_id,
            role,
            TokenKind::Access,
            self.config.access_token_expiry_secs,
        )
    }

    /// Generates a refresh token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        company_id: Option<Uuid>,
        role: &str,
    ) -> Result<String, JwtError> {
        self.sign(
            user_id,
            company_id,
            role,
            TokenKind::Refresh,
            self.config.refresh_token_expiry_secs,
        )
    }

    /// Generates an access/refresh pair.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_pair(
        &self,
        user_id: Uuid,
        company_id: Option<Uuid>,
        role: &str,
    ) -> Result<TokenPair, JwtError> {
        Ok(TokenPair::new(
            self.generate_access_token(user_id, company_id, role)?,
            self.generate_refresh_token(user_id, company_id, role)?,
            self.config.access_token_expiry_secs,
        ))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Validates a token and requires it to be of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Invalid` if the kind does not match.
    pub fn validate_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.typ == kind {
            Ok(claims)
        } else {
            Err(JwtError::Invalid)
        }
    }

    /// Returns the access token expiration in seconds.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> u64 {
        self.config.access_token_expiry_secs
    }
}
