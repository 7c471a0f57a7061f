//! JWT access-token validation.
//!
//! Access tokens are HS256-signed JWTs minted by the identity provider with
//! the shared secret; the API only ever validates them. The claims carry
//! enough identity metadata to provision a profile on first sight.
//! [`generate_access_token`] exists for tests and local tooling.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use viralthumb_core::types::AccountId;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the account's UUID at the identity provider.
    pub sub: AccountId,
    /// The account's role name (`"user"` or `"admin"`).
    pub role: String,
    /// Email address, when the provider shares it.
    #[serde(default)]
    pub email: Option<String>,
    /// Preferred username, when the provider shares it.
    #[serde(default)]
    pub username: Option<String>,
    /// Display name, when the provider shares it.
    #[serde(default)]
    pub name: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for JWT validation (and test-only generation).
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Access token lifetime in minutes (default: 60). Only used when
    /// minting tokens locally.
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Validate a token and return its claims. Expiry is enforced.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256
    )?;
    Ok(data.claims)
}

/// Generate an HS256 access token for the given account.
///
/// Production tokens come from the identity provider; this mirrors its
/// shape for tests and local tooling.
pub fn generate_access_token(
    account_id: AccountId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: account_id,
        role: role.to_string(),
        email: None,
        username: None,
        name: None,
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            access_token_expiry_mins: 60,
        }
    }

    #[test]
    fn round_trip_preserves_claims() {
        let config = test_config();
        let id = Uuid::new_v4();
        let token = generate_access_token(id, "user", &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = generate_access_token(Uuid::new_v4(), "user", &config).unwrap();

        let other = JwtConfig {
            secret: "a-different-secret".to_string(),
            access_token_expiry_mins: 60,
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(validate_token("not.a.jwt", &test_config()).is_err());
    }
}
