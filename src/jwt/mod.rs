//! Stateless session tokens.
//!
//! A token is a signed HS256 JWT carrying the subject email and role names
//! plus issued-at/expiry timestamps. Nothing is persisted server-side:
//! verification here is purely cryptographic and clock-based, and staleness
//! against live account state (deactivation, deletion) is the authorization
//! gate's responsibility.

use jwt_simple::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Role;

/// Custom claim set embedded next to the registered claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub roles: Vec<String>,
}

/// Claims of a successfully verified token.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub subject: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature or structure is wrong
    Invalid,
    /// Well-formed and correctly signed, but past its expiry
    Expired,
}

#[derive(Clone)]
pub struct TokenService {
    key: HS256Key,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            key: HS256Key::from_bytes(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Sign a session token for the subject with its current role set.
    /// Expiry is issued-at plus the configured TTL.
    pub fn issue(&self, email: &str, roles: &[Role]) -> Result<String, AppError> {
        let custom = SessionClaims {
            roles: roles.iter().map(|r| r.as_ref().to_string()).collect(),
        };
        let claims = Claims::with_custom_claims(custom, Duration::from_secs(self.ttl_secs))
            .with_subject(email);

        self.key
            .authenticate(claims)
            .map_err(|e| AppError::Internal(format!("failed to sign session token: {}", e)))
    }

    /// Verify signature and expiry. Does not consult any store.
    pub fn verify(&self, token: &str) -> Result<VerifiedSession, TokenError> {
        // No clock tolerance: a token is rejected the moment its expiry
        // passes.
        let mut options = VerificationOptions::default();
        options.time_tolerance = Some(Duration::from_secs(0));

        let claims = self
            .key
            .verify_token::<SessionClaims>(token, Some(options))
            .map_err(|e| match e.downcast_ref::<jwt_simple::JWTError>() {
                Some(jwt_simple::JWTError::TokenHasExpired) => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        let subject = claims.subject.ok_or(TokenError::Invalid)?;
        Ok(VerifiedSession {
            subject,
            roles: claims.custom.roles,
        })
    }
}
