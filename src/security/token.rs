use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{user, Role};
use crate::error::{AppError, AppResult};

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn subject_id(&self) -> AppResult<i32> {
        self.sub.parse().map_err(|_| AppError::invalid_token())
    }
}

/// Signs and verifies HS256 access tokens. No server-side session state.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::minutes(15)),
        }
    }

    pub fn issue(&self, user: &user::Model) -> AppResult<String> {
        self.issue_with_ttl(user.id, user.role, self.ttl)
    }

    /// A negative `ttl` yields an already expired token.
    pub fn issue_with_ttl(&self, user_id: i32, role: Role, ttl: chrono::Duration) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal("token lifetime is out of range".into()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
    }

    /// Bad signature, expiry and malformed input all collapse into the same error.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {e}");
                AppError::invalid_token()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", Duration::from_secs(15 * 60))
    }

    #[test]
    fn issued_token_round_trips_subject_and_role() {
        let tokens = service();
        let token = tokens
            .issue_with_ttl(42, Role::Recruiter, chrono::Duration::minutes(15))
            .unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.subject_id().unwrap(), 42);
        assert_eq!(claims.role, Role::Recruiter);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn unrepresentable_lifetime_is_an_error() {
        let tokens = service();
        let result = tokens.issue_with_ttl(42, Role::Candidate, chrono::Duration::weeks(52 * 1_000_000));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let token = tokens
            .issue_with_ttl(7, Role::Candidate, chrono::Duration::seconds(-5))
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(AppError::Authentication(_))));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = TokenService::new("someone-else", Duration::from_secs(60));
        let token = other
            .issue_with_ttl(1, Role::Admin, chrono::Duration::minutes(1))
            .unwrap();

        assert!(service().verify(&token).is_err());
        assert!(service().verify("not.a.jwt").is_err());
    }
}
